use crate::{
    database::SubscriptionStore,
    errors::ServiceError,
    models::{brand::Brand, event::Event, subscription::Subscription},
};
use log::info;
use std::collections::HashMap;
use std::sync::Arc;

/// Result of a single subscribe call
#[derive(Debug, PartialEq)]
pub enum SubscribeOutcome {
    Created(Subscription),
    Existing(Subscription),
}

pub struct SubscriptionService {
    store: Arc<dyn SubscriptionStore>,
}

impl SubscriptionService {
    pub fn new(store: Arc<dyn SubscriptionStore>) -> Self {
        Self { store }
    }

    /// Subscribes a user to one brand. An existing pair is returned as is.
    pub async fn subscribe(
        &self,
        user_id: i64,
        brand_id: i64,
    ) -> Result<SubscribeOutcome, ServiceError> {
        self.ensure_user(user_id).await?;
        self.ensure_brands(&[brand_id]).await?;

        let inserted = self.store.insert_subscriptions(user_id, &[brand_id]).await?;
        let subscription = self
            .store
            .find_subscription(user_id, brand_id)
            .await?
            .ok_or_else(|| {
                ServiceError::Internal(format!(
                    "Subscription of user {} to brand {} vanished after insert",
                    user_id, brand_id
                ))
            })?;

        if inserted == 0 {
            return Ok(SubscribeOutcome::Existing(subscription));
        }
        info!("User {} subscribed to brand {}", user_id, brand_id);
        Ok(SubscribeOutcome::Created(subscription))
    }

    /// Subscribes a user to several brands at once. Either every brand is
    /// known and all pairs are written, or nothing is written.
    pub async fn subscribe_many(&self, user_id: i64, brand_ids: &[i64]) -> Result<(), ServiceError> {
        let mut unique = Vec::with_capacity(brand_ids.len());
        for id in brand_ids {
            if !unique.contains(id) {
                unique.push(*id);
            }
        }

        self.ensure_user(user_id).await?;
        self.ensure_brands(&unique).await?;
        self.store.insert_subscriptions(user_id, &unique).await?;

        info!("User {} subscribed to brands {:?}", user_id, unique);
        Ok(())
    }

    /// Removes the subscription if present. Returns the number of rows removed.
    pub async fn unsubscribe(&self, user_id: i64, brand_id: i64) -> Result<u64, ServiceError> {
        let removed = self.store.delete_subscriptions(user_id, brand_id).await?;
        if removed > 0 {
            info!("User {} unsubscribed from brand {}", user_id, brand_id);
        }
        Ok(removed)
    }

    /// Brands the user follows, ordered by category then name.
    pub async fn my_brands(&self, user_id: i64) -> Result<Vec<Brand>, ServiceError> {
        self.store.subscribed_brands(user_id).await
    }

    /// Events of the followed brands, one group per brand in `my_brands` order.
    pub async fn events_for_you(&self, user_id: i64) -> Result<Vec<Vec<Event>>, ServiceError> {
        let brands = self.store.subscribed_brands(user_id).await?;
        let events = self.store.subscribed_events(user_id).await?;

        let mut by_brand: HashMap<i64, Vec<Event>> = HashMap::new();
        for event in events {
            by_brand.entry(event.brand_id).or_default().push(event);
        }

        Ok(brands
            .iter()
            .map(|brand| by_brand.remove(&brand.id).unwrap_or_default())
            .collect())
    }

    pub async fn list_subscriptions(
        &self,
        user_id: Option<i64>,
    ) -> Result<Vec<Subscription>, ServiceError> {
        self.store.list_subscriptions(user_id).await
    }

    pub async fn get_subscription(&self, id: i64) -> Result<Subscription, ServiceError> {
        self.store
            .get_subscription(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Subscription not found: {}", id)))
    }

    /// Rewrites subscription `id`; fields left as `None` keep their value.
    pub async fn update_subscription(
        &self,
        id: i64,
        user_id: Option<i64>,
        brand_id: Option<i64>,
    ) -> Result<Subscription, ServiceError> {
        let current = self.get_subscription(id).await?;
        let user_id = user_id.unwrap_or(current.user_id);
        let brand_id = brand_id.unwrap_or(current.brand_id);

        self.ensure_user(user_id).await?;
        self.ensure_brands(&[brand_id]).await?;

        if let Some(other) = self.store.find_subscription(user_id, brand_id).await? {
            if other.id != id {
                return Err(ServiceError::InvalidInput(format!(
                    "User {} is already subscribed to brand {}",
                    user_id, brand_id
                )));
            }
        }

        self.store.update_subscription(id, user_id, brand_id).await?;
        info!(
            "Subscription {} now links user {} to brand {}",
            id, user_id, brand_id
        );
        self.get_subscription(id).await
    }

    pub async fn delete_subscription(&self, id: i64) -> Result<(), ServiceError> {
        if self.store.delete_subscription(id).await? == 0 {
            return Err(ServiceError::NotFound(format!("Subscription not found: {}", id)));
        }
        info!("Subscription {} deleted", id);
        Ok(())
    }

    async fn ensure_user(&self, user_id: i64) -> Result<(), ServiceError> {
        if !self.store.user_exists(user_id).await? {
            log::warn!("Subscription requested for unknown user {}", user_id);
            return Err(ServiceError::NotFound(format!("User not found: {}", user_id)));
        }
        Ok(())
    }

    async fn ensure_brands(&self, brand_ids: &[i64]) -> Result<(), ServiceError> {
        let existing = self.store.existing_brand_ids(brand_ids).await?;
        let missing: Vec<String> = brand_ids
            .iter()
            .filter(|id| !existing.contains(id))
            .map(|id| id.to_string())
            .collect();

        if !missing.is_empty() {
            log::warn!("Subscription requested for unknown brands {}", missing.join(", "));
            return Err(ServiceError::NotFound(format!(
                "Brand not found: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }
}
