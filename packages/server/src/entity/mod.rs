pub mod college;
pub mod course;
pub mod student;
