use axum::Json;
use axum::extract::Path;
use axum::routing::post;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;

use crate::db::repository;
use crate::error::AppError;
use crate::models::*;
use crate::services::{IngestReport, IngestService};
use crate::state::AppState;

#[derive(Serialize)]
struct CoursesResponse {
    courses: Vec<CourseDetail>,
}

#[derive(Serialize)]
struct ReviewsResponse {
    reviews: Vec<ReviewDetail>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest(
            "/api",
            Router::new()
                .route("/courses", get(list_courses))
                .route("/courses/{id}", get(get_course).delete(delete_course))
                .route("/reviews/{course_id}", get(list_reviews))
                .route("/users", post(create_user))
                .route("/users/{id}", get(get_user))
                .route(
                    "/users/{user_id}/courses/{course_id}",
                    post(save_course).delete(unsave_course),
                )
                .route("/admin/ingest", post(run_ingest)),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn list_courses(State(state): State<AppState>) -> Result<Json<CoursesResponse>, AppError> {
    let courses = repository::fetch_courses(&state.db).await?;

    let mut out = Vec::with_capacity(courses.len());
    for course in courses {
        let reviews = repository::fetch_reviews_for_course(&state.db, course.id).await?;
        out.push(CourseDetail::new(course, reviews));
    }

    Ok(Json(CoursesResponse { courses: out }))
}

async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CourseDetail>, AppError> {
    let course = repository::find_course_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;
    let reviews = repository::fetch_reviews_for_course(&state.db, id).await?;
    Ok(Json(CourseDetail::new(course, reviews)))
}

async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let ok = repository::delete_course(&state.db, id).await?;
    if ok {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

async fn list_reviews(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<Json<ReviewsResponse>, AppError> {
    repository::find_course_by_id(&state.db, course_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let reviews = repository::fetch_reviews_for_course(&state.db, course_id).await?;
    Ok(Json(ReviewsResponse {
        reviews: reviews.into_iter().map(ReviewDetail::from).collect(),
    }))
}

async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<NewUserRequest>,
) -> Result<Json<UserDetail>, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }
    if req.netid.trim().is_empty() {
        return Err(AppError::BadRequest("netid must not be empty".to_string()));
    }

    let user = repository::insert_user(&state.db, req.name.trim(), req.netid.trim()).await?;
    Ok(Json(UserDetail::new(user, Vec::new())))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserDetail>, AppError> {
    let user = repository::find_user_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;
    let courses = repository::fetch_saved_courses(&state.db, id).await?;
    Ok(Json(UserDetail::new(user, courses)))
}

async fn save_course(
    State(state): State<AppState>,
    Path((user_id, course_id)): Path<(i64, i64)>,
) -> Result<Json<UserDetail>, AppError> {
    let user = repository::find_user_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    repository::find_course_by_id(&state.db, course_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if repository::is_course_saved(&state.db, user_id, course_id).await? {
        return Err(AppError::Conflict("course already saved".to_string()));
    }

    repository::save_course(&state.db, user_id, course_id).await?;
    let courses = repository::fetch_saved_courses(&state.db, user_id).await?;
    Ok(Json(UserDetail::new(user, courses)))
}

async fn unsave_course(
    State(state): State<AppState>,
    Path((user_id, course_id)): Path<(i64, i64)>,
) -> Result<Json<UserDetail>, AppError> {
    let user = repository::find_user_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let removed = repository::unsave_course(&state.db, user_id, course_id).await?;
    if !removed {
        return Err(AppError::NotFound);
    }

    let courses = repository::fetch_saved_courses(&state.db, user_id).await?;
    Ok(Json(UserDetail::new(user, courses)))
}

/// Administrative trigger: runs the full three-stage pipeline synchronously
/// and reports per-stage counts, or the global failure message.
async fn run_ingest(State(state): State<AppState>) -> Result<Json<IngestReport>, AppError> {
    let service = IngestService::new(state.db.clone(), state.sources.clone());
    let report = service.run_all().await?;
    Ok(Json(report))
}
