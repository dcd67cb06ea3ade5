use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::UserType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub password_salt: String,
    pub user_type: String, // 'military' | 'charity'
    pub name: String,
    pub verified: bool,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn get_user_type(&self) -> Result<UserType, String> {
        self.user_type.parse()
    }

    pub fn is_military(&self) -> bool {
        self.get_user_type() == Ok(UserType::Military)
    }

    pub fn is_charity(&self) -> bool {
        self.get_user_type() == Ok(UserType::Charity)
    }
}
