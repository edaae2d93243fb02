pub mod college;
pub mod course;
pub mod home;
pub mod shared;
pub mod student;
