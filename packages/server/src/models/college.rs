use serde::{Deserialize, Serialize};

use crate::entity::college;

use super::shared::{FieldError, Flash, FormValidator, code, display_name};

/// Submitted college form, used by both the add and the edit routes.
#[derive(Clone, Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CollegeForm {
    #[serde(default)]
    #[schema(example = "CAS")]
    pub college_code: String,
    #[serde(default)]
    #[schema(example = "Arts and Sciences")]
    pub college_name: String,
}

/// A college form that passed validation, values trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCollege {
    pub college_code: String,
    pub college_name: String,
}

impl CollegeForm {
    pub fn validate(&self) -> Result<ValidCollege, Vec<FieldError>> {
        let mut v = FormValidator::default();
        v.check("college_code", code(&self.college_code))
            .check("college_name", display_name(&self.college_name));
        v.finish(|| ValidCollege {
            college_code: self.college_code.trim().to_string(),
            college_name: self.college_name.trim().to_string(),
        })
    }
}

impl From<&college::Model> for CollegeForm {
    fn from(model: &college::Model) -> Self {
        Self {
            college_code: model.college_code.clone(),
            college_name: model.college_name.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct DeleteCollegeForm {
    #[serde(default)]
    #[schema(example = "CAS")]
    pub college_code: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CollegeResponse {
    #[schema(example = "CAS")]
    pub college_code: String,
    #[schema(example = "Arts and Sciences")]
    pub college_name: String,
    /// Path of this college's edit form.
    #[schema(example = "/test/CAS")]
    pub edit_path: String,
}

impl From<college::Model> for CollegeResponse {
    fn from(model: college::Model) -> Self {
        Self {
            edit_path: format!("/test/{}", model.college_code),
            college_code: model.college_code,
            college_name: model.college_name,
        }
    }
}

/// Page model of `/add-colleges`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CollegeFormPage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    /// Values to pre-fill the form with; empty after a successful add.
    pub form: CollegeForm,
    pub colleges: Vec<CollegeResponse>,
}

/// Page model of `/delete-colleges`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CollegeDeletePage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    /// Whether the submitted code matched a row. Absent on GET.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<bool>,
    pub colleges: Vec<CollegeResponse>,
}

/// Page model of `/update-colleges`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CollegeListPage {
    pub colleges: Vec<CollegeResponse>,
}

/// Page model of `/test/{college_code}`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CollegeEditPage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    /// The row as currently stored.
    pub record: CollegeResponse,
    pub form: CollegeForm,
    pub colleges: Vec<CollegeResponse>,
}
