use axum::extract::{FromRequest, Multipart, Request};
use common::storage::ImageUpload;

use crate::error::AppError;
use crate::models::student::StudentForm;

/// Multipart name of the optional profile picture part.
pub const PROFILE_PIC_FIELD: &str = "profile_pic";

/// A student form submitted as `multipart/form-data`, with its optional
/// profile picture split out.
///
/// Text parts map onto [`StudentForm`] by name; any other part name is
/// rejected rather than ignored.
pub struct StudentSubmission {
    pub form: StudentForm,
    /// `None` when no file part was sent or the browser sent an empty one.
    pub profile_pic: Option<ImageUpload>,
}

impl<S> FromRequest<S> for StudentSubmission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        let mut form = StudentForm::default();
        let mut profile_pic = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == PROFILE_PIC_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?;
                let upload = ImageUpload::new(file_name, data.to_vec());
                profile_pic = (!upload.is_empty()).then_some(upload);
                continue;
            }

            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read '{name}': {e}")))?;
            let slot = match name.as_str() {
                "id" => &mut form.id,
                "first_name" => &mut form.first_name,
                "last_name" => &mut form.last_name,
                "course" => &mut form.course,
                "year_lvl" => &mut form.year_lvl,
                "gender" => &mut form.gender,
                other => {
                    return Err(AppError::Validation(format!(
                        "Unknown form field '{other}'"
                    )));
                }
            };
            *slot = value;
        }

        Ok(StudentSubmission { form, profile_pic })
    }
}
