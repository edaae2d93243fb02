use axum::extract::{Path, State};
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::{info, instrument, warn};

use crate::entity::course;
use crate::error::{AppError, ErrorBody};
use crate::extractors::form::AppForm;
use crate::models::course::*;
use crate::models::shared::{FieldError, Flash, FormValidator, Page, required};
use crate::state::AppState;
use crate::utils::db::{CourseOrder, Violation, college_codes, constraint_violation, list_courses};

#[utoipa::path(
    get,
    path = "/add-courses",
    tag = "Courses",
    operation_id = "addCourseForm",
    summary = "Show the add-course form",
    description = "Courses are listed grouped by owning college.",
    responses(
        (status = 200, description = "Empty form, college options and all courses", body = CourseFormPage),
    ),
)]
#[instrument(skip(state))]
pub async fn add_course_form(
    State(state): State<AppState>,
) -> Result<Page<CourseFormPage>, AppError> {
    let colleges = college_codes(&state.db).await?;
    form_page(&state.db, Page::ok, None, Vec::new(), CourseForm::default(), colleges).await
}

#[utoipa::path(
    post,
    path = "/add-courses",
    tag = "Courses",
    operation_id = "addCourse",
    summary = "Add a course",
    description = "Validates the form and inserts the course. `resp_college` must name an existing college.",
    request_body(content = CourseForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Course added", body = CourseFormPage),
        (status = 400, description = "Field errors on the page", body = CourseFormPage),
        (status = 409, description = "Course already exists", body = CourseFormPage),
    ),
)]
#[instrument(skip(state, form), fields(course_code = %form.course_code))]
pub async fn add_course(
    State(state): State<AppState>,
    AppForm(form): AppForm<CourseForm>,
) -> Result<Page<CourseFormPage>, AppError> {
    let colleges = college_codes(&state.db).await?;
    let valid = match form.validate(&colleges) {
        Ok(valid) => valid,
        Err(errors) => {
            return form_page(
                &state.db,
                Page::invalid,
                Some(Flash::invalid()),
                errors,
                form,
                colleges,
            )
            .await;
        }
    };

    let txn = state.db.begin().await?;
    let row = course::ActiveModel {
        course_code: Set(valid.course_code.clone()),
        course_name: Set(valid.course_name),
        resp_college: Set(Some(valid.resp_college)),
    };

    match course::Entity::insert(row).exec_without_returning(&txn).await {
        Ok(_) => {
            txn.commit().await?;
            info!(course_code = %valid.course_code, "Course added");
            form_page(
                &state.db,
                Page::created,
                Some(Flash::success("Course Added Successfully!")),
                Vec::new(),
                CourseForm::default(),
                colleges,
            )
            .await
        }
        Err(e) => match constraint_violation(&e) {
            Some(Violation::Duplicate) => {
                txn.rollback().await?;
                warn!(course_code = %valid.course_code, "Duplicate course rejected");
                form_page(
                    &state.db,
                    Page::conflict,
                    Some(Flash::error("Course already exists!")),
                    Vec::new(),
                    form,
                    colleges,
                )
                .await
            }
            Some(Violation::MissingReference) => {
                txn.rollback().await?;
                let colleges = college_codes(&state.db).await?;
                form_page(
                    &state.db,
                    Page::invalid,
                    Some(Flash::invalid()),
                    stale_college(),
                    form,
                    colleges,
                )
                .await
            }
            None => Err(e.into()),
        },
    }
}

#[utoipa::path(
    get,
    path = "/delete-courses",
    tag = "Courses",
    operation_id = "deleteCourseForm",
    summary = "Show the delete-course form",
    responses(
        (status = 200, description = "All courses", body = CourseDeletePage),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_course_form(
    State(state): State<AppState>,
) -> Result<Page<CourseDeletePage>, AppError> {
    Ok(Page::ok(CourseDeletePage {
        flash: None,
        errors: Vec::new(),
        removed: None,
        courses: list_courses(&state.db, CourseOrder::Code).await?,
    }))
}

#[utoipa::path(
    post,
    path = "/delete-courses",
    tag = "Courses",
    operation_id = "deleteCourse",
    summary = "Delete a course",
    description = "Deletes the course with the given code. Enrolled students stay, with `course` cleared.",
    request_body(content = DeleteCourseForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Delete attempted; `removed` tells whether a row matched", body = CourseDeletePage),
        (status = 400, description = "Code missing", body = CourseDeletePage),
    ),
)]
#[instrument(skip(state, form), fields(course_code = %form.course_code))]
pub async fn delete_course(
    State(state): State<AppState>,
    AppForm(form): AppForm<DeleteCourseForm>,
) -> Result<Page<CourseDeletePage>, AppError> {
    let mut v = FormValidator::default();
    v.check("course_code", required(&form.course_code));
    let code = match v.finish(|| form.course_code.trim().to_string()) {
        Ok(code) => code,
        Err(errors) => {
            return Ok(Page::invalid(CourseDeletePage {
                flash: Some(Flash::invalid()),
                errors,
                removed: None,
                courses: list_courses(&state.db, CourseOrder::Code).await?,
            }));
        }
    };

    let txn = state.db.begin().await?;
    let res = course::Entity::delete_by_id(code.clone()).exec(&txn).await?;
    txn.commit().await?;

    let removed = res.rows_affected > 0;
    let flash = if removed {
        info!(course_code = %code, "Course removed");
        Flash::success("Course Removed Successfully!")
    } else {
        Flash::info(format!("No course with code '{code}'. Nothing was removed."))
    };

    Ok(Page::ok(CourseDeletePage {
        flash: Some(flash),
        errors: Vec::new(),
        removed: Some(removed),
        courses: list_courses(&state.db, CourseOrder::Code).await?,
    }))
}

#[utoipa::path(
    get,
    path = "/update-courses",
    tag = "Courses",
    operation_id = "listCoursesForUpdate",
    summary = "List courses with links to their edit forms",
    responses(
        (status = 200, description = "All courses", body = CourseListPage),
    ),
)]
#[instrument(skip(state))]
pub async fn update_course_list(
    State(state): State<AppState>,
) -> Result<Page<CourseListPage>, AppError> {
    Ok(Page::ok(CourseListPage {
        courses: list_courses(&state.db, CourseOrder::Code).await?,
    }))
}

#[utoipa::path(
    get,
    path = "/test1/{course_code}",
    tag = "Courses",
    operation_id = "editCourseForm",
    summary = "Show the edit form of one course",
    params(("course_code" = String, Path, description = "Current course code")),
    responses(
        (status = 200, description = "Form pre-filled with the stored row", body = CourseEditPage),
        (status = 404, description = "Course not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn edit_course_form(
    State(state): State<AppState>,
    Path(course_code): Path<String>,
) -> Result<Page<CourseEditPage>, AppError> {
    let record = find_course(&state.db, &course_code).await?;
    let form = CourseForm::from(&record);
    let colleges = college_codes(&state.db).await?;
    edit_page(&state.db, Page::ok, None, Vec::new(), record, form, colleges).await
}

#[utoipa::path(
    post,
    path = "/test1/{course_code}",
    tag = "Courses",
    operation_id = "updateCourse",
    summary = "Update a course",
    description = "Replaces every field of the course. A new code cascades to the students enrolled in it.",
    params(("course_code" = String, Path, description = "Current course code")),
    request_body(content = CourseForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Course updated", body = CourseEditPage),
        (status = 400, description = "Field errors on the page", body = CourseEditPage),
        (status = 404, description = "Course not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "New code already taken", body = CourseEditPage),
    ),
)]
#[instrument(skip(state, form), fields(new_code = %form.course_code))]
pub async fn update_course(
    State(state): State<AppState>,
    Path(course_code): Path<String>,
    AppForm(form): AppForm<CourseForm>,
) -> Result<Page<CourseEditPage>, AppError> {
    let record = find_course(&state.db, &course_code).await?;
    let colleges = college_codes(&state.db).await?;

    let valid = match form.validate(&colleges) {
        Ok(valid) => valid,
        Err(errors) => {
            return edit_page(
                &state.db,
                Page::invalid,
                Some(Flash::invalid()),
                errors,
                record,
                form,
                colleges,
            )
            .await;
        }
    };

    let txn = state.db.begin().await?;
    let result = course::Entity::update_many()
        .col_expr(
            course::Column::CourseCode,
            Expr::value(valid.course_code.clone()),
        )
        .col_expr(course::Column::CourseName, Expr::value(valid.course_name))
        .col_expr(
            course::Column::RespCollege,
            Expr::value(valid.resp_college),
        )
        .filter(course::Column::CourseCode.eq(&course_code))
        .exec(&txn)
        .await;

    match result {
        Ok(res) if res.rows_affected == 0 => {
            txn.rollback().await?;
            Err(not_found(&course_code))
        }
        Ok(_) => {
            txn.commit().await?;
            info!(old_code = %course_code, "Course updated");
            let updated = find_course(&state.db, &valid.course_code).await?;
            let form = CourseForm::from(&updated);
            edit_page(
                &state.db,
                Page::ok,
                Some(Flash::success("Course Updated Successfully!")),
                Vec::new(),
                updated,
                form,
                colleges,
            )
            .await
        }
        Err(e) => match constraint_violation(&e) {
            Some(Violation::Duplicate) => {
                txn.rollback().await?;
                warn!(old_code = %course_code, "Course update collided with an existing row");
                edit_page(
                    &state.db,
                    Page::conflict,
                    Some(Flash::error(
                        "Course Update Failed! Course code already exists!",
                    )),
                    Vec::new(),
                    record,
                    form,
                    colleges,
                )
                .await
            }
            Some(Violation::MissingReference) => {
                txn.rollback().await?;
                let colleges = college_codes(&state.db).await?;
                edit_page(
                    &state.db,
                    Page::invalid,
                    Some(Flash::invalid()),
                    stale_college(),
                    record,
                    form,
                    colleges,
                )
                .await
            }
            None => Err(e.into()),
        },
    }
}

/// The chosen college was deleted between validation and write.
fn stale_college() -> Vec<FieldError> {
    vec![FieldError {
        field: "resp_college",
        message: "Not a valid choice.".into(),
    }]
}

fn not_found(course_code: &str) -> AppError {
    AppError::NotFound(format!("Course '{course_code}' not found"))
}

async fn find_course<C: ConnectionTrait>(
    db: &C,
    course_code: &str,
) -> Result<course::Model, AppError> {
    course::Entity::find_by_id(course_code.to_string())
        .one(db)
        .await?
        .ok_or_else(|| not_found(course_code))
}

async fn form_page(
    db: &DatabaseConnection,
    status: fn(CourseFormPage) -> Page<CourseFormPage>,
    flash: Option<Flash>,
    errors: Vec<FieldError>,
    form: CourseForm,
    colleges: Vec<String>,
) -> Result<Page<CourseFormPage>, AppError> {
    Ok(status(CourseFormPage {
        flash,
        errors,
        form,
        options: CourseFormOptions { colleges },
        courses: list_courses(db, CourseOrder::College).await?,
    }))
}

async fn edit_page(
    db: &DatabaseConnection,
    status: fn(CourseEditPage) -> Page<CourseEditPage>,
    flash: Option<Flash>,
    errors: Vec<FieldError>,
    record: course::Model,
    form: CourseForm,
    colleges: Vec<String>,
) -> Result<Page<CourseEditPage>, AppError> {
    Ok(status(CourseEditPage {
        flash,
        errors,
        record: CourseResponse::from(record),
        form,
        options: CourseFormOptions { colleges },
        courses: list_courses(db, CourseOrder::Code).await?,
    }))
}
