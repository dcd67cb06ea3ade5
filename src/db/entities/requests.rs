use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{Category, Priority, Quantity, RequestStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String, // 'critical' | 'non-critical'
    pub quantity_amount: i64,
    pub quantity_unit: String,
    pub delivery_location: Option<String>,
    pub author_id: String,
    pub author_name: String,
    pub status: String, // 'pending' | 'in-progress' | 'completed' | 'cancelled'
    pub image_url: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::help_offers::Entity")]
    HelpOffers,
}

impl Related<super::help_offers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HelpOffers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn get_status(&self) -> Result<RequestStatus, String> {
        self.status.parse()
    }

    pub fn get_category(&self) -> Result<Category, String> {
        self.category.parse()
    }

    pub fn get_priority(&self) -> Result<Priority, String> {
        self.priority.parse()
    }

    pub fn quantity(&self) -> Quantity {
        Quantity::new(self.quantity_amount, self.quantity_unit.clone())
    }

    /// Quantity as shown to users, e.g. `"30 комплектів"`
    pub fn quantity_text(&self) -> String {
        self.quantity().to_string()
    }
}
