use axum::extract::DefaultBodyLimit;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::ServerConfig;
use crate::handlers::{college, course, health, home, student};
use crate::state::AppState;

/// Every documented route. `/media/{*path}` is registered separately since
/// its wildcard has no OpenAPI form.
pub fn page_routes(config: &ServerConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(home::home))
        .routes(routes!(health::health))
        .merge(college_routes())
        .merge(course_routes())
        .merge(student_routes(config.max_upload_body))
}

fn college_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(college::add_college_form, college::add_college))
        .routes(routes!(college::delete_college_form, college::delete_college))
        .routes(routes!(college::update_college_list))
        .routes(routes!(college::edit_college_form, college::update_college))
}

fn course_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(course::add_course_form, course::add_course))
        .routes(routes!(course::delete_course_form, course::delete_course))
        .routes(routes!(course::update_course_list))
        .routes(routes!(course::edit_course_form, course::update_course))
}

fn student_routes(max_upload_body: usize) -> OpenApiRouter<AppState> {
    let uploads = OpenApiRouter::new()
        .routes(routes!(student::add_student_form, student::add_student))
        .routes(routes!(student::edit_student_form, student::update_student))
        .layer(DefaultBodyLimit::max(max_upload_body));

    OpenApiRouter::new()
        .routes(routes!(student::delete_student_form, student::delete_student))
        .routes(routes!(student::update_student_list))
        .merge(uploads)
}
