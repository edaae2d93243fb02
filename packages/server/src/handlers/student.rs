use axum::extract::{Path, State};
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::{info, instrument, warn};

use crate::entity::student;
use crate::error::{AppError, ErrorBody};
use crate::extractors::form::AppForm;
use crate::extractors::multipart::StudentSubmission;
use crate::models::shared::{FieldError, Flash, Page};
use crate::models::student::*;
use crate::state::AppState;
use crate::utils::db::{
    StudentOrder, Violation, constraint_violation, course_codes, list_students,
};
use crate::utils::upload::upload_profile_pic;

#[utoipa::path(
    get,
    path = "/add-student",
    tag = "Students",
    operation_id = "addStudentForm",
    summary = "Show the add-student form",
    responses(
        (status = 200, description = "Empty form, options and all students", body = StudentFormPage),
    ),
)]
#[instrument(skip(state))]
pub async fn add_student_form(
    State(state): State<AppState>,
) -> Result<Page<StudentFormPage>, AppError> {
    let courses = course_codes(&state.db).await?;
    form_page(&state.db, Page::ok, None, Vec::new(), StudentForm::default(), courses).await
}

#[utoipa::path(
    post,
    path = "/add-student",
    tag = "Students",
    operation_id = "addStudent",
    summary = "Add a student",
    description = "Validates the form, uploads the optional `profile_pic` part when its extension is png, jpg or jpeg, and inserts the student. Files with other extensions are skipped.",
    request_body(content_type = "multipart/form-data", description = "Student fields plus an optional `profile_pic` file"),
    responses(
        (status = 201, description = "Student added", body = StudentFormPage),
        (status = 400, description = "Field errors on the page", body = StudentFormPage),
        (status = 409, description = "Student already exists", body = StudentFormPage),
        (status = 502, description = "Image host rejected the upload (UPLOAD_FAILED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, submission), fields(id = %submission.form.id))]
pub async fn add_student(
    State(state): State<AppState>,
    submission: StudentSubmission,
) -> Result<Page<StudentFormPage>, AppError> {
    let StudentSubmission { form, profile_pic } = submission;
    let courses = course_codes(&state.db).await?;

    let valid = match form.validate(&courses) {
        Ok(valid) => valid,
        Err(errors) => {
            return form_page(
                &state.db,
                Page::invalid,
                Some(invalid_flash(&errors)),
                errors,
                form,
                courses,
            )
            .await;
        }
    };

    let profile_pic = upload_profile_pic(
        state.images.as_ref(),
        profile_pic,
        &state.config.storage.folder,
    )
    .await
    .map_err(AppError::upload)?;

    let txn = state.db.begin().await?;
    let row = student::ActiveModel {
        id: Set(valid.id.clone()),
        first_name: Set(valid.first_name),
        last_name: Set(valid.last_name),
        year_lvl: Set(valid.year_lvl.as_str().to_string()),
        gender: Set(valid.gender.as_str().to_string()),
        course: Set(Some(valid.course)),
        profile_pic: Set(profile_pic),
    };

    match student::Entity::insert(row).exec_without_returning(&txn).await {
        Ok(_) => {
            txn.commit().await?;
            info!(id = %valid.id, "Student added");
            form_page(
                &state.db,
                Page::created,
                Some(Flash::success("Student Added Successfully!")),
                Vec::new(),
                StudentForm::default(),
                courses,
            )
            .await
        }
        Err(e) => match constraint_violation(&e) {
            Some(Violation::Duplicate) => {
                txn.rollback().await?;
                warn!(id = %valid.id, "Duplicate student rejected");
                form_page(
                    &state.db,
                    Page::conflict,
                    Some(Flash::error("Student already exists!")),
                    Vec::new(),
                    form,
                    courses,
                )
                .await
            }
            Some(Violation::MissingReference) => {
                txn.rollback().await?;
                let courses = course_codes(&state.db).await?;
                form_page(
                    &state.db,
                    Page::invalid,
                    Some(Flash::invalid()),
                    stale_course(),
                    form,
                    courses,
                )
                .await
            }
            None => Err(e.into()),
        },
    }
}

#[utoipa::path(
    get,
    path = "/delete-student",
    tag = "Students",
    operation_id = "deleteStudentForm",
    summary = "Show the delete-student form",
    responses(
        (status = 200, description = "All students", body = StudentDeletePage),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_student_form(
    State(state): State<AppState>,
) -> Result<Page<StudentDeletePage>, AppError> {
    Ok(Page::ok(StudentDeletePage {
        flash: None,
        errors: Vec::new(),
        removed: None,
        students: list_students(&state.db, StudentOrder::Id).await?,
    }))
}

#[utoipa::path(
    post,
    path = "/delete-student",
    tag = "Students",
    operation_id = "deleteStudent",
    summary = "Delete a student",
    description = "Deletes the student with the given id. An unknown id removes nothing and is reported with an info message.",
    request_body(content = DeleteStudentForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Delete attempted; `removed` tells whether a row matched", body = StudentDeletePage),
        (status = 400, description = "Id missing or malformed", body = StudentDeletePage),
    ),
)]
#[instrument(skip(state, form), fields(id = %form.id))]
pub async fn delete_student(
    State(state): State<AppState>,
    AppForm(form): AppForm<DeleteStudentForm>,
) -> Result<Page<StudentDeletePage>, AppError> {
    let id = match form.validate() {
        Ok(id) => id,
        Err(errors) => {
            return Ok(Page::invalid(StudentDeletePage {
                flash: Some(Flash::invalid()),
                errors,
                removed: None,
                students: list_students(&state.db, StudentOrder::Id).await?,
            }));
        }
    };

    let txn = state.db.begin().await?;
    let res = student::Entity::delete_by_id(id.clone()).exec(&txn).await?;
    txn.commit().await?;

    let removed = res.rows_affected > 0;
    let flash = if removed {
        info!(id = %id, "Student removed");
        Flash::success("Student Removed Successfully!")
    } else {
        Flash::info(format!("No student with id '{id}'. Nothing was removed."))
    };

    Ok(Page::ok(StudentDeletePage {
        flash: Some(flash),
        errors: Vec::new(),
        removed: Some(removed),
        students: list_students(&state.db, StudentOrder::Id).await?,
    }))
}

#[utoipa::path(
    get,
    path = "/update-student",
    tag = "Students",
    operation_id = "listStudentsForUpdate",
    summary = "List students with links to their edit forms",
    responses(
        (status = 200, description = "All students, by last name", body = StudentListPage),
    ),
)]
#[instrument(skip(state))]
pub async fn update_student_list(
    State(state): State<AppState>,
) -> Result<Page<StudentListPage>, AppError> {
    Ok(Page::ok(StudentListPage {
        students: list_students(&state.db, StudentOrder::LastName).await?,
    }))
}

#[utoipa::path(
    get,
    path = "/test2/{id}",
    tag = "Students",
    operation_id = "editStudentForm",
    summary = "Show the edit form of one student",
    params(("id" = String, Path, description = "Current student id")),
    responses(
        (status = 200, description = "Form pre-filled with the stored row", body = StudentEditPage),
        (status = 404, description = "Student not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn edit_student_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Page<StudentEditPage>, AppError> {
    let record = find_student(&state.db, &id).await?;
    let form = StudentForm::from(&record);
    let courses = course_codes(&state.db).await?;
    edit_page(&state.db, Page::ok, None, Vec::new(), record, form, courses).await
}

#[utoipa::path(
    post,
    path = "/test2/{id}",
    tag = "Students",
    operation_id = "updateStudent",
    summary = "Update a student",
    description = "Replaces every text field of the student. The stored profile picture is replaced only when a new png, jpg or jpeg file is sent.",
    params(("id" = String, Path, description = "Current student id")),
    request_body(content_type = "multipart/form-data", description = "Student fields plus an optional `profile_pic` file"),
    responses(
        (status = 200, description = "Student updated", body = StudentEditPage),
        (status = 400, description = "Field errors on the page", body = StudentEditPage),
        (status = 404, description = "Student not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "New id already taken", body = StudentEditPage),
        (status = 502, description = "Image host rejected the upload (UPLOAD_FAILED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, submission), fields(new_id = %submission.form.id))]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    submission: StudentSubmission,
) -> Result<Page<StudentEditPage>, AppError> {
    let StudentSubmission { form, profile_pic } = submission;
    let record = find_student(&state.db, &id).await?;
    let courses = course_codes(&state.db).await?;

    let valid = match form.validate(&courses) {
        Ok(valid) => valid,
        Err(errors) => {
            return edit_page(
                &state.db,
                Page::invalid,
                Some(invalid_flash(&errors)),
                errors,
                record,
                form,
                courses,
            )
            .await;
        }
    };

    let profile_pic = upload_profile_pic(
        state.images.as_ref(),
        profile_pic,
        &state.config.storage.folder,
    )
    .await
    .map_err(AppError::upload)?;

    let mut update = student::Entity::update_many()
        .col_expr(student::Column::Id, Expr::value(valid.id.clone()))
        .col_expr(student::Column::FirstName, Expr::value(valid.first_name))
        .col_expr(student::Column::LastName, Expr::value(valid.last_name))
        .col_expr(
            student::Column::YearLvl,
            Expr::value(valid.year_lvl.as_str()),
        )
        .col_expr(student::Column::Gender, Expr::value(valid.gender.as_str()))
        .col_expr(student::Column::Course, Expr::value(valid.course));
    if let Some(url) = profile_pic {
        update = update.col_expr(student::Column::ProfilePic, Expr::value(url));
    }

    let txn = state.db.begin().await?;
    let result = update
        .filter(student::Column::Id.eq(&id))
        .exec(&txn)
        .await;

    match result {
        Ok(res) if res.rows_affected == 0 => {
            txn.rollback().await?;
            Err(not_found(&id))
        }
        Ok(_) => {
            txn.commit().await?;
            info!(old_id = %id, "Student updated");
            let updated = find_student(&state.db, &valid.id).await?;
            let form = StudentForm::from(&updated);
            edit_page(
                &state.db,
                Page::ok,
                Some(Flash::success("Student Info Updated Successfully!")),
                Vec::new(),
                updated,
                form,
                courses,
            )
            .await
        }
        Err(e) => match constraint_violation(&e) {
            Some(Violation::Duplicate) => {
                txn.rollback().await?;
                warn!(old_id = %id, "Student update collided with an existing row");
                edit_page(
                    &state.db,
                    Page::conflict,
                    Some(Flash::error("Student Info Update Failed! ID already exists!")),
                    Vec::new(),
                    record,
                    form,
                    courses,
                )
                .await
            }
            Some(Violation::MissingReference) => {
                txn.rollback().await?;
                let courses = course_codes(&state.db).await?;
                edit_page(
                    &state.db,
                    Page::invalid,
                    Some(Flash::invalid()),
                    stale_course(),
                    record,
                    form,
                    courses,
                )
                .await
            }
            None => Err(e.into()),
        },
    }
}

fn invalid_flash(errors: &[FieldError]) -> Flash {
    if errors.iter().any(|e| e.field == "id") {
        Flash::error("Make sure to write the ID in YYYY-NNNN format")
    } else {
        Flash::invalid()
    }
}

/// The chosen course was deleted between validation and write.
fn stale_course() -> Vec<FieldError> {
    vec![FieldError {
        field: "course",
        message: "Not a valid choice.".into(),
    }]
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Student '{id}' not found"))
}

async fn find_student<C: ConnectionTrait>(db: &C, id: &str) -> Result<student::Model, AppError> {
    student::Entity::find_by_id(id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| not_found(id))
}

async fn form_page(
    db: &DatabaseConnection,
    status: fn(StudentFormPage) -> Page<StudentFormPage>,
    flash: Option<Flash>,
    errors: Vec<FieldError>,
    form: StudentForm,
    courses: Vec<String>,
) -> Result<Page<StudentFormPage>, AppError> {
    Ok(status(StudentFormPage {
        flash,
        errors,
        form,
        options: StudentFormOptions::new(courses),
        students: list_students(db, StudentOrder::LastName).await?,
    }))
}

async fn edit_page(
    db: &DatabaseConnection,
    status: fn(StudentEditPage) -> Page<StudentEditPage>,
    flash: Option<Flash>,
    errors: Vec<FieldError>,
    record: student::Model,
    form: StudentForm,
    courses: Vec<String>,
) -> Result<Page<StudentEditPage>, AppError> {
    Ok(status(StudentEditPage {
        flash,
        errors,
        record: StudentResponse::from(record),
        form,
        options: StudentFormOptions::new(courses),
        students: list_students(db, StudentOrder::LastName).await?,
    }))
}
