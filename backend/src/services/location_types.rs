//! Location type registry

use chrono::Utc;
use shared::{LocationType, LocationTypeInput};
use uuid::Uuid;

use crate::error::AppResult;
use crate::store::InventoryStore;

#[derive(Clone)]
pub struct LocationTypeService {
    store: InventoryStore,
}

impl LocationTypeService {
    pub fn new(store: InventoryStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Vec<LocationType> {
        self.store.read().await.location_types().to_vec()
    }

    pub async fn create(&self, input: LocationTypeInput) -> AppResult<LocationType> {
        let location_type = self
            .store
            .write()
            .await
            .create_location_type(input, Utc::now())?;
        tracing::info!(id = %location_type.id, name = %location_type.name, "Location type created");
        Ok(location_type)
    }

    pub async fn update(&self, id: Uuid, input: LocationTypeInput) -> AppResult<LocationType> {
        let location_type = self
            .store
            .write()
            .await
            .update_location_type(id, input, Utc::now())?;
        tracing::info!(id = %location_type.id, name = %location_type.name, "Location type updated");
        Ok(location_type)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<LocationType> {
        let location_type = self.store.write().await.delete_location_type(id)?;
        tracing::info!(id = %location_type.id, name = %location_type.name, "Location type deleted");
        Ok(location_type)
    }
}
