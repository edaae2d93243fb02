use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student")]
pub struct Model {
    /// `NNNN-NNNN` identifier. The format is enforced by the form layer only.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub first_name: String,
    pub last_name: String,
    pub year_lvl: String, // "1st Year" .. "4th Year", unconstrained column
    pub gender: String,   // "M" | "F" | "Other", unconstrained column

    pub course: Option<String>,
    #[sea_orm(
        belongs_to,
        from = "course",
        to = "course_code",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    pub enrolled_course: HasOne<super::course::Entity>,

    #[sea_orm(column_type = "String(StringLen::N(5000))", nullable)]
    pub profile_pic: Option<String>,
}

impl ActiveModelBehavior for ActiveModel {}
