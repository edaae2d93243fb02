mod college;
mod course;
mod home;
