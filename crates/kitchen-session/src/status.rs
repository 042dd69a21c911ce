//! 生產狀態追蹤

use chrono::NaiveDate;
use futures::future::join_all;
use kitchen_calc::{DayOverview, ProductionLine};
use kitchen_core::{calendar::week_starting, ProductionPlan, ProductionStatus};
use kitchen_store::ProductionStore;

use crate::Result;

/// 生產狀態追蹤器
pub struct StatusTracker<'a> {
    store: &'a dyn ProductionStore,
}

impl<'a> StatusTracker<'a> {
    pub fn new(store: &'a dyn ProductionStore) -> Self {
        Self { store }
    }

    /// 更新生產狀態（不檢查該日是否有計劃）
    pub async fn set_status(
        &self,
        date: NaiveDate,
        product_name: &str,
        status: ProductionStatus,
    ) -> Result<()> {
        self.store
            .set_production_status(date, product_name, status)
            .await?;
        tracing::info!("{} {} → {}", date, product_name, status.as_str());
        Ok(())
    }

    /// 指定日期的計劃
    pub async fn plan(&self, date: NaiveDate) -> Result<ProductionPlan> {
        Ok(self.store.production_plan(date).await?)
    }

    /// 指定日期的生產清單
    pub async fn production_list(&self, date: NaiveDate) -> Result<Vec<ProductionLine>> {
        let (plan, statuses) = futures::try_join!(
            self.store.production_plan(date),
            self.store.production_statuses(date)
        )?;
        Ok(ProductionLine::summarize(&plan, &statuses))
    }

    /// 從起始日起七天的生產概況；單日失敗以空資料計
    pub async fn weekly_overview(&self, start: NaiveDate) -> Vec<DayOverview> {
        let requests = week_starting(start).into_iter().map(|date| async move {
            match self.production_list(date).await {
                Ok(lines) => DayOverview::from_lines(date, &lines),
                Err(err) => {
                    tracing::warn!(%date, error = %err, "無法讀取生產清單");
                    DayOverview::empty(date)
                }
            }
        });
        join_all(requests).await
    }
}
