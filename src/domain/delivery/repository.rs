//! Delivery settings repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::settings::DeliverySettings;
use crate::domain::DomainResult;

/// Settings as currently stored, with the time of the last change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredDeliverySettings {
    pub settings: DeliverySettings,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait DeliverySettingsRepository: Send + Sync {
    async fn get(&self) -> DomainResult<StoredDeliverySettings>;
    async fn save(&self, settings: DeliverySettings) -> DomainResult<StoredDeliverySettings>;
}
