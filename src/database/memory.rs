use super::SubscriptionStore;
use crate::errors::ServiceError;
use crate::models::{brand::Brand, event::Event, subscription::Subscription};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashSet;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    users: HashSet<i64>,
    brands: Vec<Brand>,
    events: Vec<Event>,
    subscriptions: Vec<Subscription>,
    next_subscription_id: i64,
}

/// In-memory store mirroring the MySQL queries, for tests.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, user_id: i64) {
        self.tables.write().await.users.insert(user_id);
    }

    pub async fn add_brand(&self, id: i64, category_id: i64, name: &str) {
        let date = NaiveDate::from_ymd_opt(2021, 7, 11).unwrap_or_default();
        self.tables.write().await.brands.push(Brand {
            id,
            created_date: date,
            update_date: date,
            category_id,
            image: format!("brand_logo/{}.jpg", name),
            banner_image: None,
            name: name.to_string(),
            text: format!("about {}", name),
        });
    }

    pub async fn add_event(&self, id: i64, brand_id: i64, title: &str) {
        let date = NaiveDate::from_ymd_opt(2021, 8, 1).unwrap_or_default();
        self.tables.write().await.events.push(Event {
            id,
            brand_id,
            title: title.to_string(),
            image: String::new(),
            text: String::new(),
            start_date: date,
            end_date: None,
            created_date: date,
            update_date: date,
        });
    }
}

#[async_trait]
impl SubscriptionStore for MemoryStore {
    async fn user_exists(&self, user_id: i64) -> Result<bool, ServiceError> {
        Ok(self.tables.read().await.users.contains(&user_id))
    }

    async fn existing_brand_ids(&self, brand_ids: &[i64]) -> Result<Vec<i64>, ServiceError> {
        let tables = self.tables.read().await;
        Ok(tables
            .brands
            .iter()
            .map(|b| b.id)
            .filter(|id| brand_ids.contains(id))
            .collect())
    }

    async fn insert_subscriptions(
        &self,
        user_id: i64,
        brand_ids: &[i64],
    ) -> Result<u64, ServiceError> {
        let mut tables = self.tables.write().await;
        let mut inserted = 0;
        for brand_id in brand_ids {
            let exists = tables
                .subscriptions
                .iter()
                .any(|s| s.user_id == user_id && s.brand_id == *brand_id);
            if !exists {
                tables.next_subscription_id += 1;
                let id = tables.next_subscription_id;
                tables.subscriptions.push(Subscription {
                    id,
                    user_id,
                    brand_id: *brand_id,
                });
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn find_subscription(
        &self,
        user_id: i64,
        brand_id: i64,
    ) -> Result<Option<Subscription>, ServiceError> {
        let tables = self.tables.read().await;
        Ok(tables
            .subscriptions
            .iter()
            .find(|s| s.user_id == user_id && s.brand_id == brand_id)
            .cloned())
    }

    async fn get_subscription(&self, id: i64) -> Result<Option<Subscription>, ServiceError> {
        let tables = self.tables.read().await;
        Ok(tables.subscriptions.iter().find(|s| s.id == id).cloned())
    }

    async fn list_subscriptions(
        &self,
        user_id: Option<i64>,
    ) -> Result<Vec<Subscription>, ServiceError> {
        let tables = self.tables.read().await;
        Ok(tables
            .subscriptions
            .iter()
            .filter(|s| user_id.map_or(true, |u| s.user_id == u))
            .cloned()
            .collect())
    }

    async fn delete_subscriptions(&self, user_id: i64, brand_id: i64) -> Result<u64, ServiceError> {
        let mut tables = self.tables.write().await;
        let before = tables.subscriptions.len();
        tables
            .subscriptions
            .retain(|s| !(s.user_id == user_id && s.brand_id == brand_id));
        Ok((before - tables.subscriptions.len()) as u64)
    }

    async fn delete_subscription(&self, id: i64) -> Result<u64, ServiceError> {
        let mut tables = self.tables.write().await;
        let before = tables.subscriptions.len();
        tables.subscriptions.retain(|s| s.id != id);
        Ok((before - tables.subscriptions.len()) as u64)
    }

    async fn update_subscription(
        &self,
        id: i64,
        user_id: i64,
        brand_id: i64,
    ) -> Result<(), ServiceError> {
        let mut tables = self.tables.write().await;
        // uniq_user_brand
        if tables
            .subscriptions
            .iter()
            .any(|s| s.id != id && s.user_id == user_id && s.brand_id == brand_id)
        {
            return Err(ServiceError::InvalidInput(format!(
                "User {} is already subscribed to brand {}",
                user_id, brand_id
            )));
        }
        if let Some(row) = tables.subscriptions.iter_mut().find(|s| s.id == id) {
            row.user_id = user_id;
            row.brand_id = brand_id;
        }
        Ok(())
    }

    async fn subscribed_brands(&self, user_id: i64) -> Result<Vec<Brand>, ServiceError> {
        let tables = self.tables.read().await;
        let followed: HashSet<i64> = tables
            .subscriptions
            .iter()
            .filter(|s| s.user_id == user_id)
            .map(|s| s.brand_id)
            .collect();
        let mut brands: Vec<Brand> = tables
            .brands
            .iter()
            .filter(|b| followed.contains(&b.id))
            .cloned()
            .collect();
        // MySQL's default collation compares names case-insensitively
        brands.sort_by_cached_key(|b| (b.category_id, b.name.to_lowercase()));
        Ok(brands)
    }

    async fn subscribed_events(&self, user_id: i64) -> Result<Vec<Event>, ServiceError> {
        let tables = self.tables.read().await;
        let followed: HashSet<i64> = tables
            .subscriptions
            .iter()
            .filter(|s| s.user_id == user_id)
            .map(|s| s.brand_id)
            .collect();
        let mut events: Vec<Event> = tables
            .events
            .iter()
            .filter(|e| followed.contains(&e.brand_id))
            .cloned()
            .collect();
        events.sort_by_key(|e| (e.brand_id, e.id));
        Ok(events)
    }
}
