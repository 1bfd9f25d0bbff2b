use axum::{
    Router,
    http::Method,
    middleware,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::features::athletes;
use crate::middleware::rate_limit::{RateLimiter, rate_limit};
use crate::ApiDoc;
use crate::state::SharedStore;

/// Builds the application router together with its middleware stack.
pub fn router(store: SharedStore, config: &Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(config.cors_allowed_origin.clone())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api = Router::new()
        .nest("/api/v1/athletes", athletes::routes::routes())
        .layer(cors)
        .with_state(store);

    let limiter = RateLimiter::new(config.rate_limit);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api)
        .layer(middleware::from_fn_with_state(limiter, rate_limit))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO)),
        )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
        response::Response,
    };
    use serde_json::{Value, json};
    use storage::repository::InMemoryAthleteStore;
    use tower::ServiceExt;

    use super::*;
    use crate::config::RateLimitConfig;

    fn app() -> Router {
        router(Arc::new(InMemoryAthleteStore::new()), &Config::default())
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn bolt() -> Value {
        json!({
            "firstName": "Usain",
            "lastName": "Bolt",
            "birthDate": "1986-08-21",
            "nationality": "Jamaica",
            "discipline": "100m",
            "personalBest": "9.58",
            "bio": "Fastest man alive"
        })
    }

    fn athlete(first: &str, last: &str, nationality: &str, discipline: &str) -> Value {
        json!({
            "firstName": first,
            "lastName": last,
            "birthDate": "1990-01-01",
            "nationality": nationality,
            "discipline": discipline
        })
    }

    #[tokio::test]
    async fn test_create_returns_201_with_id() {
        let app = app();
        let response = send(&app, "POST", "/api/v1/athletes", Some(bolt())).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = json_body(response).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["firstName"], "Usain");
        assert_eq!(body["birthDate"], "1986-08-21");
    }

    #[tokio::test]
    async fn test_duplicate_create_returns_409() {
        let app = app();
        send(&app, "POST", "/api/v1/athletes", Some(bolt())).await;

        let mut again = bolt();
        again["nationality"] = json!("Brazil");
        again["discipline"] = json!("Marathon");
        let response = send(&app, "POST", "/api/v1/athletes", Some(again)).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = json_body(response).await;
        assert_eq!(body["status"], 409);
        assert_eq!(body["error"], "Conflict");
        assert_eq!(body["message"], "Athlete 'Usain Bolt' already exists");
    }

    #[tokio::test]
    async fn test_birth_date_round_trip() {
        let app = app();
        let response = send(
            &app,
            "POST",
            "/api/v1/athletes",
            Some(athlete("Jan", "Jansen", "NED", "800m")),
        )
        .await;
        let id = json_body(response).await["id"].as_i64().unwrap();

        let response = send(&app, "GET", &format!("/api/v1/athletes/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["birthDate"], "1990-01-01");
    }

    #[tokio::test]
    async fn test_field_validation_returns_400_with_errors() {
        let app = app();
        let body = json!({
            "firstName": "",
            "lastName": "x".repeat(31),
            "birthDate": "2999-01-01",
            "nationality": "Jamaica",
            "discipline": "100m"
        });
        let response = send(&app, "POST", "/api/v1/athletes", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["status"], 400);
        assert_eq!(body["errors"]["firstName"], "First name is required");
        assert_eq!(
            body["errors"]["lastName"],
            "Last name must not exceed 30 characters"
        );
        assert_eq!(
            body["errors"]["birthDate"],
            "Birth date must be in the past or present"
        );
    }

    #[tokio::test]
    async fn test_null_required_fields_return_field_errors() {
        let app = app();
        let mut body = bolt();
        body["firstName"] = Value::Null;
        body["birthDate"] = Value::Null;
        let response = send(&app, "POST", "/api/v1/athletes", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["errors"]["firstName"], "First name is required");
        assert_eq!(body["errors"]["birthDate"], "Birth date is required");
        assert!(body["errors"].get("lastName").is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_returns_400() {
        let app = app();
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/athletes")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["error"], "Bad Request");
        assert!(body["message"].is_string());
        assert!(body.get("errors").is_none());
    }

    #[tokio::test]
    async fn test_unparsable_birth_date_returns_400() {
        let app = app();
        let mut body = bolt();
        body["birthDate"] = json!("21/08/1986");
        let response = send(&app, "POST", "/api/v1/athletes", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_unknown_returns_404() {
        let app = app();
        let response = send(&app, "GET", "/api/v1/athletes/42", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = json_body(response).await;
        assert_eq!(body["message"], "Athlete with ID 42 not found.");
    }

    #[tokio::test]
    async fn test_non_numeric_id_returns_400() {
        let app = app();
        let response = send(&app, "GET", "/api/v1/athletes/abc", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_unknown_returns_204_then_get_404() {
        let app = app();
        let response = send(&app, "DELETE", "/api/v1/athletes/77", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, "GET", "/api/v1/athletes/77", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_existing_removes_it() {
        let app = app();
        send(&app, "POST", "/api/v1/athletes", Some(bolt())).await;

        let response = send(&app, "DELETE", "/api/v1/athletes/1", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, "GET", "/api/v1/athletes/1", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_fully_replaces_fields() {
        let app = app();
        send(&app, "POST", "/api/v1/athletes", Some(bolt())).await;

        let replacement = athlete("Yohan", "Blake", "JAM", "200m");
        let response = send(&app, "PUT", "/api/v1/athletes/1", Some(replacement)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["firstName"], "Yohan");
        assert_eq!(body["lastName"], "Blake");
        assert_eq!(body["birthDate"], "1990-01-01");
        assert_eq!(body["nationality"], "JAM");
        assert_eq!(body["discipline"], "200m");
        assert_eq!(body["personalBest"], Value::Null);
        assert_eq!(body["bio"], Value::Null);
    }

    #[tokio::test]
    async fn test_update_unknown_returns_404() {
        let app = app();
        let response = send(&app, "PUT", "/api/v1/athletes/5", Some(bolt())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_with_invalid_body_returns_400() {
        let app = app();
        send(&app, "POST", "/api/v1/athletes", Some(bolt())).await;

        let mut body = bolt();
        body["nationality"] = json!("   ");
        let response = send(&app, "PUT", "/api/v1/athletes/1", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_rejects_bad_paging() {
        let app = app();
        for query in ["page=-1", "size=0", "size=101", "size=-3", "page=abc"] {
            let response = send(&app, "GET", &format!("/api/v1/athletes?{query}"), None).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "query {query}");
        }
    }

    #[tokio::test]
    async fn test_list_defaults_and_envelope() {
        let app = app();
        for i in 0..12 {
            let body = athlete(&format!("Runner{i}"), "Doe", "Kenya", "Marathon");
            send(&app, "POST", "/api/v1/athletes", Some(body)).await;
        }

        let response = send(&app, "GET", "/api/v1/athletes", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["content"].as_array().unwrap().len(), 10);
        assert_eq!(body["page"], 0);
        assert_eq!(body["size"], 10);
        assert_eq!(body["totalElements"], 12);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["first"], true);
        assert_eq!(body["last"], false);

        let response = send(&app, "GET", "/api/v1/athletes?page=1", None).await;
        let body = json_body(response).await;
        assert_eq!(body["content"].as_array().unwrap().len(), 2);
        assert_eq!(body["first"], false);
        assert_eq!(body["last"], true);
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let app = app();
        let body = json_body(send(&app, "GET", "/api/v1/athletes", None).await).await;
        assert_eq!(body["totalElements"], 0);
        assert_eq!(body["totalPages"], 0);
        assert_eq!(body["first"], true);
        assert_eq!(body["last"], true);
    }

    #[tokio::test]
    async fn test_list_unknown_sort_falls_back_to_id() {
        let app = app();
        send(&app, "POST", "/api/v1/athletes", Some(athlete("Zoe", "A", "X", "Y"))).await;
        send(&app, "POST", "/api/v1/athletes", Some(athlete("Amy", "B", "X", "Y"))).await;

        let response = send(
            &app,
            "GET",
            "/api/v1/athletes?sortBy=notAField&direction=sideways",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["content"][0]["id"], 1);
        assert_eq!(body["content"][1]["id"], 2);

        let response = send(
            &app,
            "GET",
            "/api/v1/athletes?sortBy=firstName&direction=desc",
            None,
        )
        .await;
        let body = json_body(response).await;
        assert_eq!(body["content"][0]["firstName"], "Zoe");
    }

    #[tokio::test]
    async fn test_list_filters() {
        let app = app();
        send(&app, "POST", "/api/v1/athletes", Some(athlete("Usain", "Bolt", "Jamaica", "100m"))).await;
        send(&app, "POST", "/api/v1/athletes", Some(athlete("Elaine", "Thompson", "jamaica", "200m"))).await;
        send(&app, "POST", "/api/v1/athletes", Some(athlete("Noah", "Lyles", "USA", "200m"))).await;

        let body = json_body(send(&app, "GET", "/api/v1/athletes?nationality=Jamaica", None).await).await;
        assert_eq!(body["totalElements"], 2);

        let body = json_body(
            send(&app, "GET", "/api/v1/athletes?nationality=Jamaica&discipline=200m", None).await,
        )
        .await;
        assert_eq!(body["totalElements"], 1);
        assert_eq!(body["content"][0]["lastName"], "Thompson");

        let body = json_body(send(&app, "GET", "/api/v1/athletes?search=LYL", None).await).await;
        assert_eq!(body["totalElements"], 1);
        assert_eq!(body["content"][0]["firstName"], "Noah");

        let body = json_body(send(&app, "GET", "/api/v1/athletes?search=%20%20", None).await).await;
        assert_eq!(body["totalElements"], 3);
    }

    #[tokio::test]
    async fn test_list_all_returns_every_athlete() {
        let app = app();
        for i in 0..15 {
            let body = athlete(&format!("Runner{i}"), "Doe", "Kenya", "Marathon");
            send(&app, "POST", "/api/v1/athletes", Some(body)).await;
        }
        let response = send(&app, "GET", "/api/v1/athletes/all", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 15);
    }

    #[tokio::test]
    async fn test_rate_limit_returns_429_when_exhausted() {
        let config = Config {
            rate_limit: RateLimitConfig {
                capacity: 2,
                refill_amount: 2,
                refill_interval: Duration::from_secs(3600),
            },
            ..Config::default()
        };
        let app = router(Arc::new(InMemoryAthleteStore::new()), &config);

        for _ in 0..2 {
            let response = send(&app, "GET", "/api/v1/athletes", None).await;
            assert_eq!(response.status(), StatusCode::OK);
        }
        let response = send(&app, "GET", "/api/v1/athletes", None).await;
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(json_body(response).await["message"], "Too many requests");
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let app = app();
        let request = Request::builder()
            .method("GET")
            .uri("/api/v1/athletes")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let app = app();
        let response = send(&app, "GET", "/api-docs/openapi.json", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["paths"]["/api/v1/athletes"].is_object());
    }
}
