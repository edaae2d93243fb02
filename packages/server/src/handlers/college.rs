use axum::extract::{Path, State};
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::{info, instrument, warn};

use crate::entity::college;
use crate::error::{AppError, ErrorBody};
use crate::extractors::form::AppForm;
use crate::models::college::*;
use crate::models::shared::{FieldError, Flash, FormValidator, Page, required};
use crate::state::AppState;
use crate::utils::db::{Violation, constraint_violation, list_colleges};

#[utoipa::path(
    get,
    path = "/add-colleges",
    tag = "Colleges",
    operation_id = "addCollegeForm",
    summary = "Show the add-college form",
    responses(
        (status = 200, description = "Empty form and all colleges", body = CollegeFormPage),
    ),
)]
#[instrument(skip(state))]
pub async fn add_college_form(
    State(state): State<AppState>,
) -> Result<Page<CollegeFormPage>, AppError> {
    Ok(Page::ok(CollegeFormPage {
        flash: None,
        errors: Vec::new(),
        form: CollegeForm::default(),
        colleges: list_colleges(&state.db).await?,
    }))
}

#[utoipa::path(
    post,
    path = "/add-colleges",
    tag = "Colleges",
    operation_id = "addCollege",
    summary = "Add a college",
    description = "Validates the form and inserts the college. A taken code or name is reported on the page with status 409.",
    request_body(content = CollegeForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "College added", body = CollegeFormPage),
        (status = 400, description = "Field errors on the page", body = CollegeFormPage),
        (status = 409, description = "College already exists", body = CollegeFormPage),
    ),
)]
#[instrument(skip(state, form), fields(college_code = %form.college_code))]
pub async fn add_college(
    State(state): State<AppState>,
    AppForm(form): AppForm<CollegeForm>,
) -> Result<Page<CollegeFormPage>, AppError> {
    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            return form_page(&state.db, Page::invalid, Some(Flash::invalid()), errors, form).await;
        }
    };

    let txn = state.db.begin().await?;
    let row = college::ActiveModel {
        college_code: Set(valid.college_code.clone()),
        college_name: Set(valid.college_name),
    };

    match college::Entity::insert(row).exec_without_returning(&txn).await {
        Ok(_) => {
            txn.commit().await?;
            info!(college_code = %valid.college_code, "College added");
            form_page(
                &state.db,
                Page::created,
                Some(Flash::success("College Added Successfully!")),
                Vec::new(),
                CollegeForm::default(),
            )
            .await
        }
        Err(e) if constraint_violation(&e) == Some(Violation::Duplicate) => {
            txn.rollback().await?;
            warn!(college_code = %valid.college_code, "Duplicate college rejected");
            form_page(
                &state.db,
                Page::conflict,
                Some(Flash::error("College already exists!")),
                Vec::new(),
                form,
            )
            .await
        }
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    get,
    path = "/delete-colleges",
    tag = "Colleges",
    operation_id = "deleteCollegeForm",
    summary = "Show the delete-college form",
    responses(
        (status = 200, description = "All colleges", body = CollegeDeletePage),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_college_form(
    State(state): State<AppState>,
) -> Result<Page<CollegeDeletePage>, AppError> {
    Ok(Page::ok(CollegeDeletePage {
        flash: None,
        errors: Vec::new(),
        removed: None,
        colleges: list_colleges(&state.db).await?,
    }))
}

#[utoipa::path(
    post,
    path = "/delete-colleges",
    tag = "Colleges",
    operation_id = "deleteCollege",
    summary = "Delete a college",
    description = "Deletes the college with the given code. Its courses stay, with `resp_college` cleared. An unknown code removes nothing and is reported with an info message.",
    request_body(content = DeleteCollegeForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Delete attempted; `removed` tells whether a row matched", body = CollegeDeletePage),
        (status = 400, description = "Code missing", body = CollegeDeletePage),
    ),
)]
#[instrument(skip(state, form), fields(college_code = %form.college_code))]
pub async fn delete_college(
    State(state): State<AppState>,
    AppForm(form): AppForm<DeleteCollegeForm>,
) -> Result<Page<CollegeDeletePage>, AppError> {
    let mut v = FormValidator::default();
    v.check("college_code", required(&form.college_code));
    let code = match v.finish(|| form.college_code.trim().to_string()) {
        Ok(code) => code,
        Err(errors) => {
            return Ok(Page::invalid(CollegeDeletePage {
                flash: Some(Flash::invalid()),
                errors,
                removed: None,
                colleges: list_colleges(&state.db).await?,
            }));
        }
    };

    let txn = state.db.begin().await?;
    let res = college::Entity::delete_by_id(code.clone()).exec(&txn).await?;
    txn.commit().await?;

    let removed = res.rows_affected > 0;
    let flash = if removed {
        info!(college_code = %code, "College removed");
        Flash::success("College Removed Successfully!")
    } else {
        Flash::info(format!("No college with code '{code}'. Nothing was removed."))
    };

    Ok(Page::ok(CollegeDeletePage {
        flash: Some(flash),
        errors: Vec::new(),
        removed: Some(removed),
        colleges: list_colleges(&state.db).await?,
    }))
}

#[utoipa::path(
    get,
    path = "/update-colleges",
    tag = "Colleges",
    operation_id = "listCollegesForUpdate",
    summary = "List colleges with links to their edit forms",
    responses(
        (status = 200, description = "All colleges", body = CollegeListPage),
    ),
)]
#[instrument(skip(state))]
pub async fn update_college_list(
    State(state): State<AppState>,
) -> Result<Page<CollegeListPage>, AppError> {
    Ok(Page::ok(CollegeListPage {
        colleges: list_colleges(&state.db).await?,
    }))
}

#[utoipa::path(
    get,
    path = "/test/{college_code}",
    tag = "Colleges",
    operation_id = "editCollegeForm",
    summary = "Show the edit form of one college",
    params(("college_code" = String, Path, description = "Current college code")),
    responses(
        (status = 200, description = "Form pre-filled with the stored row", body = CollegeEditPage),
        (status = 404, description = "College not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn edit_college_form(
    State(state): State<AppState>,
    Path(college_code): Path<String>,
) -> Result<Page<CollegeEditPage>, AppError> {
    let record = find_college(&state.db, &college_code).await?;
    let form = CollegeForm::from(&record);
    edit_page(&state.db, Page::ok, None, Vec::new(), record, form).await
}

#[utoipa::path(
    post,
    path = "/test/{college_code}",
    tag = "Colleges",
    operation_id = "updateCollege",
    summary = "Update a college",
    description = "Replaces the code and name of the college. A new code cascades to the courses that reference it.",
    params(("college_code" = String, Path, description = "Current college code")),
    request_body(content = CollegeForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "College updated", body = CollegeEditPage),
        (status = 400, description = "Field errors on the page", body = CollegeEditPage),
        (status = 404, description = "College not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "New code or name already taken", body = CollegeEditPage),
    ),
)]
#[instrument(skip(state, form), fields(new_code = %form.college_code))]
pub async fn update_college(
    State(state): State<AppState>,
    Path(college_code): Path<String>,
    AppForm(form): AppForm<CollegeForm>,
) -> Result<Page<CollegeEditPage>, AppError> {
    let record = find_college(&state.db, &college_code).await?;

    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            return edit_page(
                &state.db,
                Page::invalid,
                Some(Flash::invalid()),
                errors,
                record,
                form,
            )
            .await;
        }
    };

    let txn = state.db.begin().await?;
    let result = college::Entity::update_many()
        .col_expr(
            college::Column::CollegeCode,
            Expr::value(valid.college_code.clone()),
        )
        .col_expr(
            college::Column::CollegeName,
            Expr::value(valid.college_name.clone()),
        )
        .filter(college::Column::CollegeCode.eq(&college_code))
        .exec(&txn)
        .await;

    match result {
        Ok(res) if res.rows_affected == 0 => {
            txn.rollback().await?;
            Err(not_found(&college_code))
        }
        Ok(_) => {
            txn.commit().await?;
            info!(old_code = %college_code, "College updated");
            let updated = find_college(&state.db, &valid.college_code).await?;
            let form = CollegeForm::from(&updated);
            edit_page(
                &state.db,
                Page::ok,
                Some(Flash::success("College Updated Successfully!")),
                Vec::new(),
                updated,
                form,
            )
            .await
        }
        Err(e) if constraint_violation(&e) == Some(Violation::Duplicate) => {
            txn.rollback().await?;
            warn!(old_code = %college_code, "College update collided with an existing row");
            edit_page(
                &state.db,
                Page::conflict,
                Some(Flash::error(
                    "College Update Failed! College code or name already exists!",
                )),
                Vec::new(),
                record,
                form,
            )
            .await
        }
        Err(e) => Err(e.into()),
    }
}

fn not_found(college_code: &str) -> AppError {
    AppError::NotFound(format!("College '{college_code}' not found"))
}

async fn find_college<C: ConnectionTrait>(
    db: &C,
    college_code: &str,
) -> Result<college::Model, AppError> {
    college::Entity::find_by_id(college_code.to_string())
        .one(db)
        .await?
        .ok_or_else(|| not_found(college_code))
}

async fn form_page(
    db: &DatabaseConnection,
    status: fn(CollegeFormPage) -> Page<CollegeFormPage>,
    flash: Option<Flash>,
    errors: Vec<FieldError>,
    form: CollegeForm,
) -> Result<Page<CollegeFormPage>, AppError> {
    Ok(status(CollegeFormPage {
        flash,
        errors,
        form,
        colleges: list_colleges(db).await?,
    }))
}

async fn edit_page(
    db: &DatabaseConnection,
    status: fn(CollegeEditPage) -> Page<CollegeEditPage>,
    flash: Option<Flash>,
    errors: Vec<FieldError>,
    record: college::Model,
    form: CollegeForm,
) -> Result<Page<CollegeEditPage>, AppError> {
    Ok(status(CollegeEditPage {
        flash,
        errors,
        record: CollegeResponse::from(record),
        form,
        colleges: list_colleges(db).await?,
    }))
}
