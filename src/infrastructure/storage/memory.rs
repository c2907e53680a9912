//! In-memory delivery settings storage

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::{
    DeliverySettings, DeliverySettingsRepository, DomainResult, StoredDeliverySettings,
};

/// Process-local holder for the admin-managed tariff.
pub struct InMemoryDeliverySettingsRepository {
    current: RwLock<StoredDeliverySettings>,
}

impl InMemoryDeliverySettingsRepository {
    pub fn new(settings: DeliverySettings) -> Self {
        Self {
            current: RwLock::new(StoredDeliverySettings {
                settings,
                updated_at: Utc::now(),
            }),
        }
    }
}

impl Default for InMemoryDeliverySettingsRepository {
    fn default() -> Self {
        Self::new(DeliverySettings::default())
    }
}

#[async_trait]
impl DeliverySettingsRepository for InMemoryDeliverySettingsRepository {
    async fn get(&self) -> DomainResult<StoredDeliverySettings> {
        Ok(self.current.read().await.clone())
    }

    async fn save(&self, settings: DeliverySettings) -> DomainResult<StoredDeliverySettings> {
        let mut current = self.current.write().await;
        *current = StoredDeliverySettings {
            settings,
            updated_at: Utc::now(),
        };
        Ok(current.clone())
    }
}

// ── Tests ──────────────────────────────────────────────────────
