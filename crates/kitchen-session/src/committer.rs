//! 生產計劃確認與刪除

use std::collections::BTreeMap;

use chrono::NaiveDate;
use kitchen_core::{CommitReceipt, CommitRequest, OrderId, PlanError};
use kitchen_store::ProductionStore;
use uuid::Uuid;

use crate::Result;

/// 全部刪除的管理指令
///
/// 建立時產生一次性確認碼，操作員必須原樣輸入才會執行。
#[derive(Debug, Clone)]
pub struct PurgeAllCommand {
    token: Uuid,
}

impl PurgeAllCommand {
    pub fn new() -> Self {
        Self {
            token: Uuid::new_v4(),
        }
    }

    /// 顯示給操作員的確認碼
    pub fn token(&self) -> String {
        self.token.to_string()
    }

    /// 驗證操作員輸入的確認碼
    pub fn confirm(&self, input: &str) -> std::result::Result<(), PlanError> {
        match Uuid::parse_str(input.trim()) {
            Ok(token) if token == self.token => Ok(()),
            _ => Err(PlanError::ConfirmationMismatch),
        }
    }
}

impl Default for PurgeAllCommand {
    fn default() -> Self {
        Self::new()
    }
}

/// 生產計劃確認器
pub struct PlanCommitter<'a> {
    store: &'a dyn ProductionStore,
}

impl<'a> PlanCommitter<'a> {
    pub fn new(store: &'a dyn ProductionStore) -> Self {
        Self { store }
    }

    /// 確認排產
    ///
    /// 日期與選取在送出請求之前驗證；送出的是該生產日期的完整期望狀態。
    pub async fn commit(
        &self,
        manufacturing_date: Option<NaiveDate>,
        delivery_date: Option<NaiveDate>,
        order_ids: Vec<OrderId>,
        quantities: BTreeMap<String, i64>,
    ) -> Result<CommitReceipt> {
        let request = CommitRequest::new(manufacturing_date, delivery_date, order_ids, quantities)?;

        tracing::info!(
            "確認排產: 生產日期 {}，配送日期 {}，{} 筆訂單，{} 項產品",
            request.manufacturing_date(),
            request.delivery_date(),
            request.order_ids().len(),
            request.quantities().len()
        );

        let receipt = self.store.confirm_schedule(&request).await?;
        tracing::info!(
            inserted = receipt.inserted_products,
            schedule_id = ?receipt.schedule_id,
            "排產已確認"
        );
        Ok(receipt)
    }

    /// 刪除指定日期的計劃與生產狀態
    pub async fn delete_day(&self, date: NaiveDate) -> Result<()> {
        self.store.delete_production_plan(date).await?;
        tracing::info!("已刪除 {} 的生產計劃", date);
        Ok(())
    }

    /// 刪除所有計劃與生產狀態
    pub async fn purge_all(&self, command: &PurgeAllCommand, confirmation: &str) -> Result<u64> {
        command.confirm(confirmation)?;

        let deleted = self.store.delete_all_production_plans().await?;
        tracing::warn!("已刪除全部生產計劃，共 {} 筆", deleted);
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitchen_store::InMemoryStore;
    use rstest::rstest;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    #[rstest]
    #[case(None, Some(date(2)), vec![1])]
    #[case(Some(date(1)), None, vec![1])]
    #[case(Some(date(1)), Some(date(2)), vec![])]
    #[tokio::test]
    async fn test_validation_happens_before_store(
        #[case] manufacturing: Option<NaiveDate>,
        #[case] delivery: Option<NaiveDate>,
        #[case] ids: Vec<OrderId>,
    ) {
        let store = InMemoryStore::new();
        let committer = PlanCommitter::new(&store);

        let err = committer
            .commit(manufacturing, delivery, ids, BTreeMap::new())
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(store.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let store = InMemoryStore::new();
        store.set_fail_writes(true).await;

        let result = PlanCommitter::new(&store)
            .commit(Some(date(1)), Some(date(2)), vec![1], BTreeMap::new())
            .await;

        assert!(matches!(result, Err(crate::SessionError::Store(_))));
    }

    #[tokio::test]
    async fn test_purge_requires_matching_token() {
        let store = InMemoryStore::new();
        let committer = PlanCommitter::new(&store);
        let command = PurgeAllCommand::new();

        let wrong = committer.purge_all(&command, "yes").await;
        assert!(matches!(
            wrong,
            Err(crate::SessionError::Plan(PlanError::ConfirmationMismatch))
        ));
        assert_eq!(store.write_count().await, 0);

        let token = format!(" {} ", command.token());
        assert_eq!(committer.purge_all(&command, &token).await.unwrap(), 0);
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(PurgeAllCommand::new().token(), PurgeAllCommand::new().token());
    }
}
