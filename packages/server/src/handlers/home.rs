use axum::extract::State;
use tracing::instrument;

use crate::error::AppError;
use crate::models::home::HomePage;
use crate::models::shared::Page;
use crate::state::AppState;
use crate::utils::db::{CourseOrder, StudentOrder, list_colleges, list_courses, list_students};

#[utoipa::path(
    get,
    path = "/",
    tag = "Home",
    operation_id = "home",
    summary = "Dashboard of every table",
    description = "Students ordered by id, courses by code and colleges by code.",
    responses(
        (status = 200, description = "All three tables", body = HomePage),
    ),
)]
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<Page<HomePage>, AppError> {
    Ok(Page::ok(HomePage {
        students: list_students(&state.db, StudentOrder::Id).await?,
        courses: list_courses(&state.db, CourseOrder::Code).await?,
        colleges: list_colleges(&state.db).await?,
    }))
}
