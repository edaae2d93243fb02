use serde::Serialize;

use super::college::CollegeResponse;
use super::course::CourseResponse;
use super::student::StudentResponse;

/// Page model of the dashboard: every table, ordered by key.
#[derive(Serialize, utoipa::ToSchema)]
pub struct HomePage {
    pub students: Vec<StudentResponse>,
    pub courses: Vec<CourseResponse>,
    pub colleges: Vec<CollegeResponse>,
}
