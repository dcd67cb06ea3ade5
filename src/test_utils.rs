#![cfg(test)]

use crate::db::connection::Database;
use crate::db::entities::{OfferModel, RequestModel, UserModel};
use crate::db::repository::{
    OfferRepositoryImpl, Repository, RequestRepositoryImpl, UserRepositoryImpl,
};
use crate::models::{Category, OfferStatus, Priority, RequestStatus};
use anyhow::Result;
use sea_orm::DatabaseConnection as SeaOrmConnection;
use std::sync::Arc;
use tempfile::TempDir;

/// Test database wrapper that handles setup and teardown
pub struct TestDatabase {
    pub connection: Arc<SeaOrmConnection>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a new test database with migrations
    pub async fn new() -> Result<Self> {
        // Create temporary directory for test database
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("test.db");

        let db = Database::connect(&db_path).await?;
        db.migrate().await?;

        Ok(Self {
            connection: db.get_connection(),
            _temp_dir: temp_dir,
        })
    }
}

/// Insert a user of the given type with a unique email
pub async fn create_test_user(db: &Arc<SeaOrmConnection>, user_type: &str) -> Result<UserModel> {
    let id = uuid::Uuid::new_v4().to_string();
    let user = UserModel {
        email: format!("{}@test.local", id),
        id,
        password_hash: String::new(),
        password_salt: String::new(),
        user_type: user_type.to_string(),
        name: format!("Test {}", user_type),
        verified: true,
        created_at: chrono::Utc::now().naive_utc(),
    };
    UserRepositoryImpl::new_without_events(db.clone())
        .insert(user)
        .await
}

/// A pending medical request by `author`, not yet stored
pub fn request_model(author: &UserModel, title: &str, amount: i64, unit: &str) -> RequestModel {
    let now = chrono::Utc::now().naive_utc();
    RequestModel {
        id: uuid::Uuid::new_v4().to_string(),
        title: title.to_string(),
        description: format!("{} for testing", title),
        category: Category::Medical.as_str().to_string(),
        priority: Priority::NonCritical.as_str().to_string(),
        quantity_amount: amount,
        quantity_unit: unit.to_string(),
        delivery_location: None,
        author_id: author.id.clone(),
        author_name: author.name.clone(),
        status: RequestStatus::Pending.as_str().to_string(),
        image_url: None,
        created_at: now,
        updated_at: now,
    }
}

/// An available medical offer by `author`, not yet stored
pub fn offer_model(author: &UserModel, title: &str, amount: i64, unit: &str) -> OfferModel {
    let now = chrono::Utc::now().naive_utc();
    OfferModel {
        id: uuid::Uuid::new_v4().to_string(),
        title: title.to_string(),
        description: format!("{} for testing", title),
        category: Category::Medical.as_str().to_string(),
        quantity_amount: amount,
        quantity_unit: unit.to_string(),
        delivery_location: None,
        author_id: author.id.clone(),
        author_name: author.name.clone(),
        status: OfferStatus::Available.as_str().to_string(),
        image_url: None,
        created_at: now,
        updated_at: now,
    }
}

pub async fn insert_request(
    db: &Arc<SeaOrmConnection>,
    author: &UserModel,
    amount: i64,
    unit: &str,
) -> Result<RequestModel> {
    RequestRepositoryImpl::new_without_events(db.clone())
        .insert(request_model(author, "Медичне обладнання", amount, unit))
        .await
}

pub async fn insert_offer(
    db: &Arc<SeaOrmConnection>,
    author: &UserModel,
    amount: i64,
    unit: &str,
) -> Result<OfferModel> {
    OfferRepositoryImpl::new_without_events(db.clone())
        .insert(offer_model(author, "Медичні препарати", amount, unit))
        .await
}
