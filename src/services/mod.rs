pub mod commands;
pub mod context;
pub mod core;

pub use context::ServiceContext;
