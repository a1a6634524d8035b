use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::users::{InsertUserEntity, UserEntity};

#[async_trait]
#[automock]
pub trait UserRepository {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>>;
    /// `None` when the email is already registered.
    async fn register(&self, insert_user_entity: InsertUserEntity) -> Result<Option<UserEntity>>;
    async fn set_stripe_customer_id(&self, user_id: Uuid, customer_id: &str) -> Result<()>;
}
