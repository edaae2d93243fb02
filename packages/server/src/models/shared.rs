use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Severity of a flash message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Error,
}

/// One-shot status message shown above a form.
#[derive(Clone, Debug, Serialize, utoipa::ToSchema)]
pub struct Flash {
    pub level: FlashLevel,
    #[schema(example = "College Added Successfully!")]
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    /// Shown with a form that was rejected field by field.
    pub fn invalid() -> Self {
        Self::error("Please correct the highlighted fields.")
    }
}

/// A rule a submitted field failed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct FieldError {
    #[schema(example = "college_name")]
    pub field: &'static str,
    #[schema(example = "Field must be between 7 and 64 characters long.")]
    pub message: String,
}

/// Collects the first failing rule of each field.
#[derive(Debug, Default)]
pub struct FormValidator {
    errors: Vec<FieldError>,
}

impl FormValidator {
    pub fn check(&mut self, field: &'static str, result: Result<(), String>) -> &mut Self {
        if let Err(message) = result {
            self.errors.push(FieldError { field, message });
        }
        self
    }

    pub fn finish<T>(self, valid: impl FnOnce() -> T) -> Result<T, Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(valid())
        } else {
            Err(self.errors)
        }
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

/// Longest code or person name accepted; the key columns are 150 wide.
pub const MAX_TEXT_LEN: usize = 150;

pub fn required(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("This field is required.".into());
    }
    Ok(())
}

/// Character count between `min` and `max`, inclusive.
pub fn length_between(value: &str, min: usize, max: usize) -> Result<(), String> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(format!(
            "Field must be between {min} and {max} characters long."
        ));
    }
    Ok(())
}

pub fn max_length(value: &str, max: usize) -> Result<(), String> {
    if value.trim().chars().count() > max {
        return Err(format!("Field cannot be longer than {max} characters."));
    }
    Ok(())
}

/// Codes become path segments of the edit routes.
pub fn path_safe(value: &str) -> Result<(), String> {
    if value.trim().contains(['/', '?', '#', '%']) {
        return Err("Field must not contain '/', '?', '#' or '%'.".into());
    }
    Ok(())
}

/// A required, path-safe code of at most [`MAX_TEXT_LEN`] characters.
pub fn code(value: &str) -> Result<(), String> {
    required(value)
        .and_then(|_| max_length(value, MAX_TEXT_LEN))
        .and_then(|_| path_safe(value))
}

/// A required course or college name of 7 to 64 characters.
pub fn display_name(value: &str) -> Result<(), String> {
    required(value).and_then(|_| length_between(value, 7, 64))
}

/// A required first or last name.
pub fn person_name(value: &str) -> Result<(), String> {
    required(value).and_then(|_| max_length(value, MAX_TEXT_LEN))
}

/// Student identifiers: digits, a hyphen, four digits, nine characters overall.
pub fn student_id(value: &str) -> Result<(), String> {
    required(value)?;
    let value = value.trim();
    let well_formed = value.split_once('-').is_some_and(|(head, tail)| {
        !head.is_empty()
            && head.chars().all(|c| c.is_ascii_digit())
            && tail.len() == 4
            && tail.chars().all(|c| c.is_ascii_digit())
    });
    if !well_formed {
        return Err("The format must be 'NNNN-NNNN'.".into());
    }
    if value.chars().count() != 9 {
        return Err("Must be exactly 9 characters!".into());
    }
    Ok(())
}

/// Value must equal one of the offered options.
pub fn one_of<S: AsRef<str>>(value: &str, options: &[S]) -> Result<(), String> {
    required(value)?;
    let value = value.trim();
    if !options.iter().any(|o| o.as_ref() == value) {
        return Err("Not a valid choice.".into());
    }
    Ok(())
}

/// A page model with the status it should be returned with.
///
/// Failed submissions still carry the re-queried table, so the client can
/// redraw the whole page from any response.
pub struct Page<T> {
    pub status: StatusCode,
    pub body: T,
}

impl<T> Page<T> {
    pub fn ok(body: T) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    pub fn created(body: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            body,
        }
    }

    pub fn invalid(body: T) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body,
        }
    }

    pub fn conflict(body: T) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            body,
        }
    }
}

impl<T: Serialize> IntoResponse for Page<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
