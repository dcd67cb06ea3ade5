pub mod help_offers;
pub mod help_requests;
pub mod offers;
pub mod requests;
pub mod users;

// Re-export entities for convenience
pub use help_offers::{
    ActiveModel as HelpOfferActiveModel, Entity as HelpOffer, Model as HelpOfferModel,
};
pub use help_requests::{
    ActiveModel as HelpRequestActiveModel, Entity as HelpRequest, Model as HelpRequestModel,
};
pub use offers::{ActiveModel as OfferActiveModel, Entity as Offer, Model as OfferModel};
pub use requests::{ActiveModel as RequestActiveModel, Entity as Request, Model as RequestModel};
pub use users::{ActiveModel as UserActiveModel, Entity as User, Model as UserModel};
