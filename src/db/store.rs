//! Repository abstraction over the rental collections.
//!
//! Handlers and services only see `Store`; the in-memory backend lives in
//! [`crate::db::memory`] and can be replaced by any type implementing
//! [`Repository`] without touching call sites.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    agency::Agency, client::Client, employee::Employee, payment::Payment,
    reservation::Reservation, review::Review, user::User, vehicle::Vehicle,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A record addressed by a numeric id assigned on insert.
pub trait Entity: Clone + Send + Sync + 'static {
    const NAME: &'static str;

    fn id(&self) -> u32;
    fn set_id(&mut self, id: u32);
}

#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn all(&self) -> StoreResult<Vec<T>>;

    async fn get(&self, id: u32) -> StoreResult<Option<T>>;

    async fn find(
        &self,
        predicate: &(dyn for<'r> Fn(&'r T) -> bool + Send + Sync),
    ) -> StoreResult<Vec<T>>;

    /// Stores `item` under a fresh id and returns the stored copy.
    async fn insert(&self, item: T) -> StoreResult<T>;

    /// Replaces the record with `id`; `None` when it does not exist.
    async fn replace(&self, id: u32, item: T) -> StoreResult<Option<T>>;

    async fn delete(&self, id: u32) -> StoreResult<bool>;

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.all().await?.len())
    }
}

pub struct Store {
    pub vehicles: Arc<dyn Repository<Vehicle>>,
    pub clients: Arc<dyn Repository<Client>>,
    pub reservations: Arc<dyn Repository<Reservation>>,
    pub employees: Arc<dyn Repository<Employee>>,
    pub payments: Arc<dyn Repository<Payment>>,
    pub reviews: Arc<dyn Repository<Review>>,
    pub users: Arc<dyn Repository<User>>,
    pub agencies: Arc<dyn Repository<Agency>>,
}
