use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::error::ApiResult;
use crate::db::seed::seed_demo_data;
use crate::db::store::{Entity, Repository, Store, StoreError, StoreResult};

/// Vector-backed repository. Ids come from a per-table counter and are
/// never handed out twice, even after the highest row is deleted.
pub struct MemoryRepository<T> {
    table: RwLock<Table<T>>,
}

struct Table<T> {
    rows: Vec<T>,
    last_id: u32,
}

impl<T: Entity> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                rows: Vec::new(),
                last_id: 0,
            }),
        }
    }
}

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryRepository<T> {
    async fn all(&self) -> StoreResult<Vec<T>> {
        Ok(self.table.read().await.rows.clone())
    }

    async fn get(&self, id: u32) -> StoreResult<Option<T>> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|row| row.id() == id).cloned())
    }

    async fn find(
        &self,
        predicate: &(dyn for<'r> Fn(&'r T) -> bool + Send + Sync),
    ) -> StoreResult<Vec<T>> {
        let table = self.table.read().await;
        Ok(table.rows.iter().filter(|row| predicate(row)).cloned().collect())
    }

    async fn insert(&self, mut item: T) -> StoreResult<T> {
        let mut table = self.table.write().await;
        let next_id = table
            .last_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Unavailable(format!("{} ids exhausted", T::NAME)))?;
        table.last_id = next_id;
        item.set_id(next_id);
        table.rows.push(item.clone());
        Ok(item)
    }

    async fn replace(&self, id: u32, mut item: T) -> StoreResult<Option<T>> {
        let mut table = self.table.write().await;
        match table.rows.iter_mut().find(|row| row.id() == id) {
            Some(slot) => {
                item.set_id(id);
                *slot = item.clone();
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: u32) -> StoreResult<bool> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|row| row.id() != id);
        Ok(table.rows.len() != before)
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.table.read().await.rows.len())
    }
}

impl Store {
    /// A store with every collection empty.
    pub fn in_memory() -> Self {
        Self {
            vehicles: Arc::new(MemoryRepository::new()),
            clients: Arc::new(MemoryRepository::new()),
            reservations: Arc::new(MemoryRepository::new()),
            employees: Arc::new(MemoryRepository::new()),
            payments: Arc::new(MemoryRepository::new()),
            reviews: Arc::new(MemoryRepository::new()),
            users: Arc::new(MemoryRepository::new()),
            agencies: Arc::new(MemoryRepository::new()),
        }
    }
}

pub async fn create_store(config: &AppConfig) -> ApiResult<Arc<Store>> {
    log::info!("Creating in-memory store");
    let store = Store::in_memory();

    if config.seed_demo_data {
        seed_demo_data(&store, config.bcrypt_cost).await?;
        log::info!(
            "Seeded demo data: {} vehicles, {} clients, {} reservations",
            store.vehicles.count().await?,
            store.clients.count().await?,
            store.reservations.count().await?
        );
    } else {
        log::warn!("SEED_DEMO_DATA disabled, starting with an empty store");
    }

    Ok(Arc::new(store))
}
