pub mod college;
pub mod course;
pub mod health;
pub mod home;
pub mod media;
pub mod student;
