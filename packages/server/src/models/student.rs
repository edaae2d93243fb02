use serde::{Deserialize, Serialize};

use crate::entity::student;

use super::shared::{FieldError, Flash, FormValidator, one_of, person_name, student_id};

/// Class year. Stored as its label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum YearLevel {
    #[serde(rename = "1st Year")]
    First,
    #[serde(rename = "2nd Year")]
    Second,
    #[serde(rename = "3rd Year")]
    Third,
    #[serde(rename = "4th Year")]
    Fourth,
}

impl YearLevel {
    pub const ALL: [YearLevel; 4] = [Self::First, Self::Second, Self::Third, Self::Fourth];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "1st Year",
            Self::Second => "2nd Year",
            Self::Third => "3rd Year",
            Self::Fourth => "4th Year",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|y| y.as_str() == label.trim())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum Gender {
    M,
    F,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Self::M, Self::F, Self::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::M => "M",
            Self::F => "F",
            Self::Other => "Other",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_str() == label.trim())
    }
}

/// Text parts of a student form. The profile picture travels separately.
#[derive(Clone, Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct StudentForm {
    #[schema(example = "2021-0001")]
    pub id: String,
    #[schema(example = "Juan")]
    pub first_name: String,
    #[schema(example = "Dela Cruz")]
    pub last_name: String,
    /// Course code; must be one of the offered options.
    #[schema(example = "CS101")]
    pub course: String,
    #[schema(example = "1st Year")]
    pub year_lvl: String,
    #[schema(example = "M")]
    pub gender: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidStudent {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub course: String,
    pub year_lvl: YearLevel,
    pub gender: Gender,
}

impl StudentForm {
    /// Validate against the course codes currently on offer.
    pub fn validate(&self, course_codes: &[String]) -> Result<ValidStudent, Vec<FieldError>> {
        let year_labels = YearLevel::ALL.map(YearLevel::as_str);
        let gender_labels = Gender::ALL.map(Gender::as_str);

        let mut v = FormValidator::default();
        v.check("id", student_id(&self.id))
            .check("first_name", person_name(&self.first_name))
            .check("last_name", person_name(&self.last_name))
            .check("course", one_of(&self.course, course_codes))
            .check("year_lvl", one_of(&self.year_lvl, &year_labels))
            .check("gender", one_of(&self.gender, &gender_labels));
        let errors = v.into_errors();

        match (YearLevel::parse(&self.year_lvl), Gender::parse(&self.gender)) {
            (Some(year_lvl), Some(gender)) if errors.is_empty() => Ok(ValidStudent {
                id: self.id.trim().to_string(),
                first_name: self.first_name.trim().to_string(),
                last_name: self.last_name.trim().to_string(),
                course: self.course.trim().to_string(),
                year_lvl,
                gender,
            }),
            _ => Err(errors),
        }
    }
}

impl From<&student::Model> for StudentForm {
    fn from(model: &student::Model) -> Self {
        Self {
            id: model.id.clone(),
            first_name: model.first_name.clone(),
            last_name: model.last_name.clone(),
            course: model.course.clone().unwrap_or_default(),
            year_lvl: model.year_lvl.clone(),
            gender: model.gender.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct DeleteStudentForm {
    #[serde(default)]
    #[schema(example = "2021-0001")]
    pub id: String,
}

impl DeleteStudentForm {
    pub fn validate(&self) -> Result<String, Vec<FieldError>> {
        let mut v = FormValidator::default();
        v.check("id", student_id(&self.id));
        v.finish(|| self.id.trim().to_string())
    }
}

/// Choices offered by the student form.
#[derive(Serialize, utoipa::ToSchema)]
pub struct StudentFormOptions {
    /// Course codes, ordered.
    pub courses: Vec<String>,
    pub year_levels: Vec<&'static str>,
    pub genders: Vec<&'static str>,
}

impl StudentFormOptions {
    pub fn new(courses: Vec<String>) -> Self {
        Self {
            courses,
            year_levels: YearLevel::ALL.map(YearLevel::as_str).to_vec(),
            genders: Gender::ALL.map(Gender::as_str).to_vec(),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct StudentResponse {
    #[schema(example = "2021-0001")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[schema(example = "1st Year")]
    pub year_lvl: String,
    #[schema(example = "M")]
    pub gender: String,
    /// `null` once the course has been deleted.
    pub course: Option<String>,
    pub profile_pic: Option<String>,
    #[schema(example = "/test2/2021-0001")]
    pub edit_path: String,
}

impl From<student::Model> for StudentResponse {
    fn from(model: student::Model) -> Self {
        Self {
            edit_path: format!("/test2/{}", model.id),
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            year_lvl: model.year_lvl,
            gender: model.gender,
            course: model.course,
            profile_pic: model.profile_pic,
        }
    }
}

/// Page model of `/add-student`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct StudentFormPage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    pub form: StudentForm,
    pub options: StudentFormOptions,
    pub students: Vec<StudentResponse>,
}

/// Page model of `/delete-student`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct StudentDeletePage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<bool>,
    pub students: Vec<StudentResponse>,
}

/// Page model of `/update-student`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct StudentListPage {
    pub students: Vec<StudentResponse>,
}

/// Page model of `/test2/{id}`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct StudentEditPage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    pub record: StudentResponse,
    pub form: StudentForm,
    pub options: StudentFormOptions,
    pub students: Vec<StudentResponse>,
}
