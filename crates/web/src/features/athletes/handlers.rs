use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    dto::{
        athlete::{AthleteListParams, AthleteRequest, AthleteResponse},
        common::PageResponse,
    },
    models::AthleteFields,
};

use crate::error::{ErrorResponse, WebError};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::SharedStore;

use super::services;

#[utoipa::path(
    get,
    path = "/api/v1/athletes",
    params(AthleteListParams),
    responses(
        (status = 200, description = "Successfully retrieved athletes", body = PageResponse<AthleteResponse>),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse)
    ),
    tag = "athletes"
)]
pub async fn list_athletes(
    State(store): State<SharedStore>,
    ApiQuery(params): ApiQuery<AthleteListParams>,
) -> Result<Response, WebError> {
    params.validate().map_err(WebError::BadRequest)?;

    let page = services::list_athletes(store.as_ref(), &params).await?;

    Ok(Json(PageResponse::<AthleteResponse>::from(page)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/athletes/all",
    responses(
        (status = 200, description = "Every athlete, unpaginated", body = Vec<AthleteResponse>)
    ),
    tag = "athletes"
)]
pub async fn list_all_athletes(State(store): State<SharedStore>) -> Result<Response, WebError> {
    let athletes = services::list_all_athletes(store.as_ref()).await?;

    let response: Vec<AthleteResponse> = athletes.into_iter().map(AthleteResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/athletes/{id}",
    params(
        ("id" = i64, Path, description = "Athlete id")
    ),
    responses(
        (status = 200, description = "Athlete found", body = AthleteResponse),
        (status = 404, description = "Athlete not found", body = ErrorResponse)
    ),
    tag = "athletes"
)]
pub async fn get_athlete(
    State(store): State<SharedStore>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Response, WebError> {
    let athlete = services::get_athlete(store.as_ref(), id).await?;

    Ok(Json(AthleteResponse::from(athlete)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/athletes",
    request_body = AthleteRequest,
    responses(
        (status = 201, description = "Athlete created successfully", body = AthleteResponse),
        (status = 400, description = "Invalid athlete data", body = ErrorResponse),
        (status = 409, description = "Athlete already exists", body = ErrorResponse)
    ),
    tag = "athletes"
)]
pub async fn create_athlete(
    State(store): State<SharedStore>,
    ApiJson(req): ApiJson<AthleteRequest>,
) -> Result<Response, WebError> {
    let fields = AthleteFields::try_from(req)?;

    let athlete = services::create_athlete(store.as_ref(), fields).await?;

    Ok((StatusCode::CREATED, Json(AthleteResponse::from(athlete))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/v1/athletes/{id}",
    params(
        ("id" = i64, Path, description = "Athlete id")
    ),
    request_body = AthleteRequest,
    responses(
        (status = 200, description = "Athlete updated successfully", body = AthleteResponse),
        (status = 400, description = "Invalid athlete data", body = ErrorResponse),
        (status = 404, description = "Athlete not found", body = ErrorResponse)
    ),
    tag = "athletes"
)]
pub async fn update_athlete(
    State(store): State<SharedStore>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<AthleteRequest>,
) -> Result<Response, WebError> {
    let fields = AthleteFields::try_from(req)?;

    let updated = services::update_athlete(store.as_ref(), id, fields).await?;

    Ok(Json(AthleteResponse::from(updated)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/v1/athletes/{id}",
    params(
        ("id" = i64, Path, description = "Athlete id")
    ),
    responses(
        (status = 204, description = "Athlete deleted, or did not exist")
    ),
    tag = "athletes"
)]
pub async fn delete_athlete(
    State(store): State<SharedStore>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Response, WebError> {
    services::delete_athlete(store.as_ref(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
