use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{Category, OfferStatus, Quantity};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "offers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub quantity_amount: i64,
    pub quantity_unit: String,
    pub delivery_location: Option<String>,
    pub author_id: String,
    pub author_name: String,
    pub status: String, // 'available' | 'exhausted' | 'cancelled'
    pub image_url: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::help_requests::Entity")]
    HelpRequests,
}

impl Related<super::help_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HelpRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn get_status(&self) -> Result<OfferStatus, String> {
        self.status.parse()
    }

    pub fn get_category(&self) -> Result<Category, String> {
        self.category.parse()
    }

    pub fn quantity(&self) -> Quantity {
        Quantity::new(self.quantity_amount, self.quantity_unit.clone())
    }

    pub fn quantity_text(&self) -> String {
        self.quantity().to_string()
    }

    pub fn is_available(&self) -> bool {
        self.get_status() == Ok(OfferStatus::Available)
    }
}
