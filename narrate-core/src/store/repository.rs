use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{Employee, PaymentSnapshot};

/// Key under which payment history and the 2026 settlement flag live.
pub const PAYMENT_STATE_KEY: &str = "taxnarrate_payment_state";
/// Key under which the payroll roster lives.
pub const EMPLOYEES_KEY: &str = "taxnarrate_employees";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// String key/value persistence for serialised snapshots.
///
/// Values are opaque to the store. Writes replace the whole value; the last
/// writer wins.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn load(
        &self,
        key: &str,
    ) -> Result<Option<String>, StoreError>;

    async fn save(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// [`StoreError::NotFound`] when nothing is stored under `key`.
    async fn remove(
        &self,
        key: &str,
    ) -> Result<(), StoreError>;
}

async fn load_or_default<T>(
    store: &dyn SnapshotStore,
    key: &str,
) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = store.load(key).await? else {
        return Ok(T::default());
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(err) => {
            warn!(%key, error = %err, "stored snapshot is unreadable, starting fresh");
            Ok(T::default())
        }
    }
}

async fn save_json<T>(
    store: &dyn SnapshotStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|e| StoreError::Backend(e.to_string()))?;
    store.save(key, &raw).await?;
    info!(%key, bytes = raw.len(), "snapshot saved");
    Ok(())
}

/// Missing or corrupt data yields an empty snapshot.
pub async fn load_payment_snapshot(
    store: &dyn SnapshotStore
) -> Result<PaymentSnapshot, StoreError> {
    load_or_default(store, PAYMENT_STATE_KEY).await
}

pub async fn save_payment_snapshot(
    store: &dyn SnapshotStore,
    snapshot: &PaymentSnapshot,
) -> Result<(), StoreError> {
    save_json(store, PAYMENT_STATE_KEY, snapshot).await
}

/// Missing or corrupt data yields an empty roster.
pub async fn load_roster(store: &dyn SnapshotStore) -> Result<Vec<Employee>, StoreError> {
    load_or_default(store, EMPLOYEES_KEY).await
}

pub async fn save_roster(
    store: &dyn SnapshotStore,
    employees: &[Employee],
) -> Result<(), StoreError> {
    save_json(store, EMPLOYEES_KEY, employees).await
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{
        EmployeeStatus, PaymentHistoryItem, PaymentMethod, SubscriptionReceipt, SubscriptionTier,
        UserType,
    };
    use crate::store::InMemoryStore;

    fn employee() -> Employee {
        Employee {
            id: "EMP-MJX1K2".to_string(),
            name: "Ada Obi".to_string(),
            email: "ada@example.com".to_string(),
            tin: "12345678-0001".to_string(),
            monthly_gross: dec!(250000),
            monthly_tax: dec!(38967),
            annual_tax: dec!(467600),
            selected: true,
            status: EmployeeStatus::Active,
            date_added: Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn missing_keys_load_defaults() {
        let store = InMemoryStore::new();

        assert_eq!(
            load_payment_snapshot(&store).await.unwrap(),
            PaymentSnapshot::default()
        );
        assert!(load_roster(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_json_falls_back_silently() {
        let store = InMemoryStore::new();
        store.save(PAYMENT_STATE_KEY, "{not json").await.unwrap();
        store.save(EMPLOYEES_KEY, "[{\"id\": 3}]").await.unwrap();

        assert_eq!(
            load_payment_snapshot(&store).await.unwrap(),
            PaymentSnapshot::default()
        );
        assert!(load_roster(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn payment_snapshot_survives_a_save() {
        let store = InMemoryStore::new();
        let receipt = SubscriptionReceipt {
            transaction_ref: "TXN1767225600000ABCD".to_string(),
            date: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            amount: dec!(15000),
            mode: SubscriptionTier::SecurePlus,
            method: PaymentMethod::Card,
            user_type: UserType::Individual,
        };
        let snapshot = PaymentSnapshot {
            payment_history: vec![PaymentHistoryItem::from(receipt)],
            tax_paid_for_2026: true,
        };

        save_payment_snapshot(&store, &snapshot).await.unwrap();

        assert_eq!(load_payment_snapshot(&store).await.unwrap(), snapshot);
    }

    #[tokio::test]
    async fn roster_is_stored_as_camel_case_json() {
        let store = InMemoryStore::new();

        save_roster(&store, &[employee()]).await.unwrap();

        let raw = store.load(EMPLOYEES_KEY).await.unwrap().unwrap();
        assert!(raw.contains("\"monthlyGross\":250000"));
        assert_eq!(load_roster(&store).await.unwrap(), vec![employee()]);
    }

    #[tokio::test]
    async fn partial_payment_state_uses_field_defaults() {
        let store = InMemoryStore::new();
        store
            .save(PAYMENT_STATE_KEY, "{\"taxPaidFor2026\": true}")
            .await
            .unwrap();

        let snapshot = load_payment_snapshot(&store).await.unwrap();

        assert!(snapshot.tax_paid_for_2026);
        assert!(snapshot.payment_history.is_empty());
    }
}
