use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::HelpRequestStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "help_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub offer_id: String,
    pub offer_title: String,
    pub military_id: String,
    pub military_name: String,
    pub charity_id: String,
    pub charity_name: String,
    pub requested_quantity: String,
    pub contact_info: String,
    pub message: Option<String>,
    pub status: String, // 'pending' | 'confirmed'
    pub confirmed_quantity: Option<i64>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::offers::Entity",
        from = "Column::OfferId",
        to = "super::offers::Column::Id"
    )]
    Offer,
}

impl Related<super::offers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Offer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn get_status(&self) -> Result<HelpRequestStatus, String> {
        self.status.parse()
    }

    pub fn is_pending(&self) -> bool {
        self.get_status() == Ok(HelpRequestStatus::Pending)
    }
}
