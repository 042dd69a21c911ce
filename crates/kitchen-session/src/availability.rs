//! 可用量與產品目錄的讀取
//!
//! 讀取失敗時降級為空資料並記錄警告；缺少的產品可用量視為 0。

use chrono::NaiveDate;
use kitchen_core::{AvailabilitySnapshot, Product};
use kitchen_store::ProductionStore;

/// 讀取指定日期的可用量快照
pub async fn load_snapshot(store: &dyn ProductionStore, as_of: NaiveDate) -> AvailabilitySnapshot {
    match store.availability(Some(as_of)).await {
        Ok(records) => {
            let snapshot = AvailabilitySnapshot::from_records(Some(as_of), records);
            tracing::debug!(%as_of, products = snapshot.len(), "可用量已更新");
            snapshot
        }
        Err(err) => {
            tracing::warn!(%as_of, error = %err, "無法讀取可用量，以空快照計");
            AvailabilitySnapshot::new(Some(as_of))
        }
    }
}

/// 讀取產品目錄
pub async fn load_catalog(store: &dyn ProductionStore) -> Vec<Product> {
    store.products().await.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "無法讀取產品目錄");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitchen_store::InMemoryStore;

    #[tokio::test]
    async fn test_snapshot_from_store() {
        let store = InMemoryStore::new().with_products(vec![Product::new(1, "Milk Tea").with_stock(3, 0)]);
        let today = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();

        let snapshot = load_snapshot(&store, today).await;

        assert_eq!(snapshot.as_of(), Some(today));
        assert_eq!(snapshot.available("milk tea"), 3);
        assert_eq!(snapshot.available("Oolong"), 0);
    }

    #[tokio::test]
    async fn test_unreachable_store_degrades_to_empty() {
        let store = InMemoryStore::new().with_products(vec![Product::new(1, "Milk Tea").with_stock(3, 0)]);
        let today = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();
        store.set_fail_reads(true).await;

        let snapshot = load_snapshot(&store, today).await;
        let catalog = load_catalog(&store).await;

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.as_of(), Some(today));
        assert_eq!(snapshot.available("Milk Tea"), 0);
        assert!(catalog.is_empty());
        assert_eq!(store.call_count().await, 2);

        store.set_fail_reads(false).await;
        assert_eq!(load_catalog(&store).await.len(), 1);
        assert_eq!(load_snapshot(&store, today).await.available("Milk Tea"), 3);
    }
}
