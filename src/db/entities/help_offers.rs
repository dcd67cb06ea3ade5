use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::HelpOfferStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "help_offers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub request_id: String,
    pub request_title: String,
    pub offer_id: Option<String>, // explicit source offer, when the volunteer named one
    pub volunteer_id: Option<String>,
    pub volunteer_name: Option<String>,
    pub military_id: String,
    pub military_name: String,
    pub available_quantity: String, // free text as proposed
    pub delivery_date: Option<String>,
    pub contact_info: String,
    pub message: Option<String>,
    pub status: String, // 'pending' | 'accepted'
    pub accepted_quantity: Option<i64>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::requests::Entity",
        from = "Column::RequestId",
        to = "super::requests::Column::Id"
    )]
    Request,
    #[sea_orm(
        belongs_to = "super::offers::Entity",
        from = "Column::OfferId",
        to = "super::offers::Column::Id"
    )]
    Offer,
}

impl Related<super::requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Request.def()
    }
}

impl Related<super::offers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Offer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn get_status(&self) -> Result<HelpOfferStatus, String> {
        self.status.parse()
    }

    pub fn is_pending(&self) -> bool {
        self.get_status() == Ok(HelpOfferStatus::Pending)
    }
}
