use axum::{
    Router,
    routing::get,
};

use super::handlers::{
    create_athlete, delete_athlete, get_athlete, list_all_athletes, list_athletes,
    update_athlete,
};
use crate::state::SharedStore;

pub fn routes() -> Router<SharedStore> {
    Router::new()
        .route("/", get(list_athletes).post(create_athlete))
        .route("/all", get(list_all_athletes))
        .route(
            "/:id",
            get(get_athlete).put(update_athlete).delete(delete_athlete),
        )
}
