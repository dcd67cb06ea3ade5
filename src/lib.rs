// Library half of the aidbridge binary: the store, services and CLI wiring

#![allow(clippy::result_large_err)]

pub mod cli;
pub mod config;
pub mod db;
pub mod events;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use services::ServiceContext;
pub use utils::errors::AppError;
