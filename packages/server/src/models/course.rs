use serde::{Deserialize, Serialize};

use crate::entity::course;

use super::shared::{FieldError, Flash, FormValidator, code, display_name, one_of};

#[derive(Clone, Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CourseForm {
    #[serde(default)]
    #[schema(example = "CS101")]
    pub course_code: String,
    #[serde(default)]
    #[schema(example = "Intro to CS")]
    pub course_name: String,
    /// Code of the owning college; must be one of the offered options.
    #[serde(default)]
    #[schema(example = "CAS")]
    pub resp_college: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCourse {
    pub course_code: String,
    pub course_name: String,
    pub resp_college: String,
}

impl CourseForm {
    /// Validate against the college codes currently on offer.
    pub fn validate(&self, college_codes: &[String]) -> Result<ValidCourse, Vec<FieldError>> {
        let mut v = FormValidator::default();
        v.check("course_code", code(&self.course_code))
            .check("course_name", display_name(&self.course_name))
            .check("resp_college", one_of(&self.resp_college, college_codes));
        v.finish(|| ValidCourse {
            course_code: self.course_code.trim().to_string(),
            course_name: self.course_name.trim().to_string(),
            resp_college: self.resp_college.trim().to_string(),
        })
    }
}

impl From<&course::Model> for CourseForm {
    fn from(model: &course::Model) -> Self {
        Self {
            course_code: model.course_code.clone(),
            course_name: model.course_name.clone(),
            resp_college: model.resp_college.clone().unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct DeleteCourseForm {
    #[serde(default)]
    #[schema(example = "CS101")]
    pub course_code: String,
}

/// Choices offered by the course form.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CourseFormOptions {
    /// College codes, ordered.
    pub colleges: Vec<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CourseResponse {
    #[schema(example = "CS101")]
    pub course_code: String,
    #[schema(example = "Intro to CS")]
    pub course_name: String,
    /// `null` once the owning college has been deleted.
    #[schema(example = "CAS")]
    pub resp_college: Option<String>,
    #[schema(example = "/test1/CS101")]
    pub edit_path: String,
}

impl From<course::Model> for CourseResponse {
    fn from(model: course::Model) -> Self {
        Self {
            edit_path: format!("/test1/{}", model.course_code),
            course_code: model.course_code,
            course_name: model.course_name,
            resp_college: model.resp_college,
        }
    }
}

/// Page model of `/add-courses`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CourseFormPage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    pub form: CourseForm,
    pub options: CourseFormOptions,
    pub courses: Vec<CourseResponse>,
}

/// Page model of `/delete-courses`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CourseDeletePage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<bool>,
    pub courses: Vec<CourseResponse>,
}

/// Page model of `/update-courses`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CourseListPage {
    pub courses: Vec<CourseResponse>,
}

/// Page model of `/test1/{course_code}`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CourseEditPage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    pub record: CourseResponse,
    pub form: CourseForm,
    pub options: CourseFormOptions,
    pub courses: Vec<CourseResponse>,
}
