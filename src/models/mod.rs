mod identifiers;
pub mod quantity;
pub mod status;

pub use identifiers::{HelpOfferId, HelpRequestId, OfferId, RequestId, UserId};
pub use quantity::{Quantity, QuantityAdjustment, QuantityPolicy};
pub use status::{
    Category, HelpOfferStatus, HelpRequestStatus, OfferStatus, Priority, RequestStatus, UserType,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// The record tables known to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    User,
    Request,
    Offer,
    HelpOffer,
    HelpRequest,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::User => "user",
            RecordKind::Request => "request",
            RecordKind::Offer => "offer",
            RecordKind::HelpOffer => "help offer",
            RecordKind::HelpRequest => "help request",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub user_type: UserType,
    pub name: String,
}

/// Form data for a new request; author and status are filled in by the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRequest {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    /// Free text such as `"50 комплектів"`
    pub quantity: String,
    pub delivery_location: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOffer {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub quantity: String,
    pub delivery_location: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewHelpOffer {
    pub available_quantity: String,
    /// The volunteer's own offer this help is drawn from, when they name one
    pub offer_id: Option<OfferId>,
    pub delivery_date: Option<String>,
    pub contact_info: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewHelpRequest {
    pub requested_quantity: String,
    pub contact_info: String,
    pub message: Option<String>,
}

/// Partial update for a request; `None` leaves the field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub quantity: Option<String>,
    pub delivery_location: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfferPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub quantity: Option<String>,
    pub delivery_location: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HelpOfferPatch {
    pub delivery_date: Option<String>,
    pub contact_info: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HelpRequestPatch {
    pub contact_info: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub author_id: Option<UserId>,
}

#[derive(Debug, Clone, Default)]
pub struct OfferFilter {
    pub status: Option<OfferStatus>,
    pub category: Option<Category>,
    pub author_id: Option<UserId>,
}

/// Dashboard counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_requests: u64,
    pub completed_requests: u64,
    pub active_requests: u64,
    pub total_offers: u64,
    pub available_offers: u64,
    pub pending_help_offers: u64,
    pub pending_help_requests: u64,
    /// Completed share of all requests, rounded to a whole percent
    pub completion_rate: u8,
}
