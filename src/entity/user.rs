use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub login: String,
    pub country: Option<String>,
    pub show_country: bool,
    pub layout: String,
    pub keymap: String,
    pub pronouns: Option<String>,
    pub theme: String,
    pub time_zone: Option<String>,
    pub referrer_id: Option<i32>,
    /// When set, the account is removed once this instant has passed.
    pub delete_at: Option<DateTimeUtc>,
    /// JSON object of page -> setting id -> value.
    pub settings: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::connection::Entity")]
    Connection,
}

impl Related<super::connection::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Connection.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
