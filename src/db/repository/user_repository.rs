use super::{BaseRepository, Repository};
use crate::db::entities::{User, UserActiveModel, UserModel, users};
use crate::events::{
    event_bus::EventBus,
    types::{DatabaseEvent, EventPayload, EventSource, EventType},
};
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, Set,
};
use std::sync::Arc;

/// Repository trait for User entities
#[async_trait]
pub trait UserRepository: Repository<UserModel> {
    /// Find a user by email. Emails are stored lowercased, so pass a
    /// normalized address.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>>;

    /// Find users of one type
    async fn find_by_type(&self, user_type: &str) -> Result<Vec<UserModel>>;
}

#[derive(Debug)]
pub struct UserRepositoryImpl {
    base: BaseRepository,
}

impl UserRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>, event_bus: Arc<EventBus>) -> Self {
        Self {
            base: BaseRepository::new(db, event_bus),
        }
    }

    pub fn new_without_events(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new_without_events(db),
        }
    }
}

#[async_trait]
impl Repository<UserModel> for UserRepositoryImpl {
    type Entity = User;

    async fn find_by_id(&self, id: &str) -> Result<Option<UserModel>> {
        Ok(User::find_by_id(id).one(self.base.db.as_ref()).await?)
    }

    async fn find_all(&self) -> Result<Vec<UserModel>> {
        Ok(User::find().all(self.base.db.as_ref()).await?)
    }

    async fn insert(&self, entity: UserModel) -> Result<UserModel> {
        let active_model = UserActiveModel {
            id: Set(entity.id),
            email: Set(entity.email),
            password_hash: Set(entity.password_hash),
            password_salt: Set(entity.password_salt),
            user_type: Set(entity.user_type),
            name: Set(entity.name),
            verified: Set(entity.verified),
            created_at: Set(chrono::Utc::now().naive_utc()),
        };

        let result = active_model.insert(self.base.db.as_ref()).await?;

        if let Some(event_bus) = &self.base.event_bus {
            let event = DatabaseEvent::new(
                EventType::UserRegistered,
                EventPayload::User {
                    user_id: result.id.clone(),
                    user_type: result.user_type.clone(),
                },
            )
            .with_source(EventSource::Repository("user".to_string()));

            if let Err(e) = event_bus.publish(event).await {
                tracing::warn!("Failed to publish UserRegistered event: {}", e);
            }
        }

        Ok(result)
    }

    async fn update(&self, entity: UserModel) -> Result<UserModel> {
        let active_model = UserActiveModel {
            id: Unchanged(entity.id),
            email: Set(entity.email),
            password_hash: Set(entity.password_hash),
            password_salt: Set(entity.password_salt),
            user_type: Set(entity.user_type),
            name: Set(entity.name),
            verified: Set(entity.verified),
            created_at: Unchanged(entity.created_at),
        };
        Ok(active_model.update(self.base.db.as_ref()).await?)
    }

    async fn count(&self) -> Result<u64> {
        Ok(User::find().count(self.base.db.as_ref()).await?)
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>> {
        Ok(User::find()
            .filter(users::Column::Email.eq(email))
            .one(self.base.db.as_ref())
            .await?)
    }

    async fn find_by_type(&self, user_type: &str) -> Result<Vec<UserModel>> {
        Ok(User::find()
            .filter(users::Column::UserType.eq(user_type))
            .all(self.base.db.as_ref())
            .await?)
    }
}
