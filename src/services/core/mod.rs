/// Stateless services; every function takes the `ServiceContext` it works against
pub mod auth;
pub mod help;
pub mod offers;
pub mod reconciliation;
pub mod requests;
pub mod seed;
pub mod statistics;

pub use auth::AuthService;
pub use help::HelpService;
pub use offers::OfferService;
pub use reconciliation::{ReconciliationReport, ReconciliationService, ReconciliationWarning};
pub use requests::RequestService;
pub use seed::{SeedService, SeedSummary};
pub use statistics::StatisticsService;
