mod brand;
mod event;
mod schema;
mod subscription;
mod users;

#[cfg(test)]
pub mod memory;

pub use schema::init_schema;

use crate::errors::ServiceError;
use crate::models::{brand::Brand, event::Event, subscription::Subscription};
use async_trait::async_trait;
use chrono::NaiveDate;
use mysql_async::{Opts, Pool};

/// Storage seam for users, brands, events and the subscription ledger.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn user_exists(&self, user_id: i64) -> Result<bool, ServiceError>;

    /// Returns the ids from `brand_ids` that exist in the brand catalog.
    async fn existing_brand_ids(&self, brand_ids: &[i64]) -> Result<Vec<i64>, ServiceError>;

    /// Inserts all pairs atomically; pairs already present are skipped.
    /// Returns the number of rows actually inserted.
    async fn insert_subscriptions(&self, user_id: i64, brand_ids: &[i64])
        -> Result<u64, ServiceError>;

    async fn find_subscription(
        &self,
        user_id: i64,
        brand_id: i64,
    ) -> Result<Option<Subscription>, ServiceError>;

    async fn get_subscription(&self, id: i64) -> Result<Option<Subscription>, ServiceError>;

    async fn list_subscriptions(&self, user_id: Option<i64>)
        -> Result<Vec<Subscription>, ServiceError>;

    async fn delete_subscriptions(&self, user_id: i64, brand_id: i64) -> Result<u64, ServiceError>;

    async fn delete_subscription(&self, id: i64) -> Result<u64, ServiceError>;

    /// Rewrites the pair of subscription `id`. A pair held by another row is
    /// rejected with `InvalidInput`.
    async fn update_subscription(
        &self,
        id: i64,
        user_id: i64,
        brand_id: i64,
    ) -> Result<(), ServiceError>;

    /// Brands the user follows, ordered by (category_id, name), names compared
    /// case-insensitively as under MySQL's default collation.
    async fn subscribed_brands(&self, user_id: i64) -> Result<Vec<Brand>, ServiceError>;

    /// Events of the brands the user follows, ordered by (brand_id, id).
    async fn subscribed_events(&self, user_id: i64) -> Result<Vec<Event>, ServiceError>;
}

/// Creates a connection pool from a `mysql://` URL.
pub fn create_pool(database_url: &str) -> Result<Pool, ServiceError> {
    let opts = Opts::from_url(database_url)?;
    Ok(Pool::new(opts))
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| ServiceError::Internal(format!("Invalid date '{}' in database: {}", value, e)))
}

/// MySQL-backed store
pub struct MySqlStore {
    pub db_pool: Pool,
}

impl MySqlStore {
    pub fn new(db_pool: Pool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionStore for MySqlStore {
    async fn user_exists(&self, user_id: i64) -> Result<bool, ServiceError> {
        let mut conn = self.db_pool.get_conn().await?;
        users::user_exists(&mut conn, user_id).await
    }

    async fn existing_brand_ids(&self, brand_ids: &[i64]) -> Result<Vec<i64>, ServiceError> {
        let mut conn = self.db_pool.get_conn().await?;
        brand::get_existing_brand_ids(&mut conn, brand_ids).await
    }

    async fn insert_subscriptions(
        &self,
        user_id: i64,
        brand_ids: &[i64],
    ) -> Result<u64, ServiceError> {
        let mut conn = self.db_pool.get_conn().await?;
        subscription::insert_subscriptions(&mut conn, user_id, brand_ids).await
    }

    async fn find_subscription(
        &self,
        user_id: i64,
        brand_id: i64,
    ) -> Result<Option<Subscription>, ServiceError> {
        let mut conn = self.db_pool.get_conn().await?;
        subscription::find_subscription(&mut conn, user_id, brand_id).await
    }

    async fn get_subscription(&self, id: i64) -> Result<Option<Subscription>, ServiceError> {
        let mut conn = self.db_pool.get_conn().await?;
        subscription::get_subscription(&mut conn, id).await
    }

    async fn list_subscriptions(
        &self,
        user_id: Option<i64>,
    ) -> Result<Vec<Subscription>, ServiceError> {
        let mut conn = self.db_pool.get_conn().await?;
        subscription::list_subscriptions(&mut conn, user_id).await
    }

    async fn delete_subscriptions(&self, user_id: i64, brand_id: i64) -> Result<u64, ServiceError> {
        let mut conn = self.db_pool.get_conn().await?;
        subscription::delete_subscriptions(&mut conn, user_id, brand_id).await
    }

    async fn delete_subscription(&self, id: i64) -> Result<u64, ServiceError> {
        let mut conn = self.db_pool.get_conn().await?;
        subscription::delete_subscription(&mut conn, id).await
    }

    async fn update_subscription(
        &self,
        id: i64,
        user_id: i64,
        brand_id: i64,
    ) -> Result<(), ServiceError> {
        let mut conn = self.db_pool.get_conn().await?;
        subscription::update_subscription(&mut conn, id, user_id, brand_id).await?;
        Ok(())
    }

    async fn subscribed_brands(&self, user_id: i64) -> Result<Vec<Brand>, ServiceError> {
        let mut conn = self.db_pool.get_conn().await?;
        brand::get_subscribed_brands(&mut conn, user_id).await
    }

    async fn subscribed_events(&self, user_id: i64) -> Result<Vec<Event>, ServiceError> {
        let mut conn = self.db_pool.get_conn().await?;
        event::get_subscribed_events(&mut conn, user_id).await
    }
}
