use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub course_code: String,

    pub course_name: String,

    /// Owning college. Nulled when the college is deleted, rewritten when
    /// its code changes.
    pub resp_college: Option<String>,
    #[sea_orm(
        belongs_to,
        from = "resp_college",
        to = "college_code",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    pub college: HasOne<super::college::Entity>,

    #[sea_orm(has_many)]
    pub students: HasMany<super::student::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
