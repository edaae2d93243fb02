use sea_orm::{
    ConnectionTrait, DbErr, EntityTrait, QueryOrder, QuerySelect, SqlErr,
};

use crate::entity::{college, course, student};
use crate::models::college::CollegeResponse;
use crate::models::course::CourseResponse;
use crate::models::student::StudentResponse;

/// Constraint failures a handler turns into a page message instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// Primary or unique key already taken.
    Duplicate,
    /// A foreign key points at a row that no longer exists.
    MissingReference,
}

pub fn constraint_violation(err: &DbErr) -> Option<Violation> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Some(Violation::Duplicate),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => Some(Violation::MissingReference),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
pub enum CourseOrder {
    Code,
    /// Owning college first, then code.
    College,
}

#[derive(Debug, Clone, Copy)]
pub enum StudentOrder {
    Id,
    /// Surname first, then id.
    LastName,
}

pub async fn list_colleges<C: ConnectionTrait>(db: &C) -> Result<Vec<CollegeResponse>, DbErr> {
    let rows = college::Entity::find()
        .order_by_asc(college::Column::CollegeCode)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(CollegeResponse::from).collect())
}

pub async fn list_courses<C: ConnectionTrait>(
    db: &C,
    order: CourseOrder,
) -> Result<Vec<CourseResponse>, DbErr> {
    let mut select = course::Entity::find();
    if let CourseOrder::College = order {
        select = select.order_by_asc(course::Column::RespCollege);
    }
    let rows = select
        .order_by_asc(course::Column::CourseCode)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(CourseResponse::from).collect())
}

pub async fn list_students<C: ConnectionTrait>(
    db: &C,
    order: StudentOrder,
) -> Result<Vec<StudentResponse>, DbErr> {
    let mut select = student::Entity::find();
    if let StudentOrder::LastName = order {
        select = select.order_by_asc(student::Column::LastName);
    }
    let rows = select.order_by_asc(student::Column::Id).all(db).await?;
    Ok(rows.into_iter().map(StudentResponse::from).collect())
}

/// College codes offered by the course form's selector.
pub async fn college_codes<C: ConnectionTrait>(db: &C) -> Result<Vec<String>, DbErr> {
    college::Entity::find()
        .select_only()
        .column(college::Column::CollegeCode)
        .order_by_asc(college::Column::CollegeCode)
        .into_tuple::<String>()
        .all(db)
        .await
}

/// Course codes offered by the student form's selector.
pub async fn course_codes<C: ConnectionTrait>(db: &C) -> Result<Vec<String>, DbErr> {
    course::Entity::find()
        .select_only()
        .column(course::Column::CourseCode)
        .order_by_asc(course::Column::CourseCode)
        .into_tuple::<String>()
        .all(db)
        .await
}
