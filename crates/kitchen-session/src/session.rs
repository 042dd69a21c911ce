//! 排產作業階段

use std::sync::Arc;

use chrono::NaiveDate;
use kitchen_calc::{
    DemandAggregator, DemandTotals, ManualAdjustments, NettingCalculator, NettingReport,
};
use kitchen_core::{AvailabilitySnapshot, CommitReceipt, OrderId, PoolWindow, Product, ReferenceClock};
use kitchen_store::{DateCount, ProductionStore};

use crate::availability::{load_catalog, load_snapshot};
use crate::committer::{PlanCommitter, PurgeAllCommand};
use crate::pool::{order_counts, OrderPool};
use crate::selection::OrderSelection;
use crate::shipping::ShippingDesk;
use crate::status::StatusTracker;
use crate::Result;

/// 排產作業階段
///
/// 持有訂單池、選取、可用量快照與手動調整。選取與調整只存在於記憶體中，
/// 確認排產成功後清空。
pub struct SchedulingSession {
    store: Arc<dyn ProductionStore>,
    clock: Arc<dyn ReferenceClock>,
    pool: OrderPool,
    selection: OrderSelection,
    adjustments: ManualAdjustments,
    snapshot: AvailabilitySnapshot,
    catalog: Vec<Product>,
    manufacturing_date: Option<NaiveDate>,
    delivery_date: Option<NaiveDate>,
    last_committed: Option<NaiveDate>,
}

impl SchedulingSession {
    /// 創建新的作業階段（尚未載入任何資料）
    pub fn new(store: Arc<dyn ProductionStore>, clock: Arc<dyn ReferenceClock>) -> Self {
        let window = PoolWindow::from_clock(clock.as_ref());
        Self {
            store,
            clock,
            pool: OrderPool::empty(window),
            selection: OrderSelection::new(),
            adjustments: ManualAdjustments::new(),
            snapshot: AvailabilitySnapshot::default(),
            catalog: Vec::new(),
            manufacturing_date: None,
            delivery_date: None,
            last_committed: None,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// 重新載入訂單池、可用量與產品目錄
    pub async fn refresh(&mut self) {
        self.refresh_pool().await;
        self.refresh_availability().await;
        self.refresh_catalog().await;
    }

    /// 重新載入訂單池；已不在池中的訂單自動取消選取
    pub async fn refresh_pool(&mut self) -> &OrderPool {
        let window = PoolWindow::from_clock(self.clock.as_ref());
        self.pool = OrderPool::load(self.store.as_ref(), window).await;

        let pool = &self.pool;
        self.selection.retain(|id| pool.contains(id));
        &self.pool
    }

    pub async fn refresh_availability(&mut self) -> &AvailabilitySnapshot {
        self.snapshot = load_snapshot(self.store.as_ref(), self.clock.today()).await;
        &self.snapshot
    }

    pub async fn refresh_catalog(&mut self) -> &[Product] {
        self.catalog = load_catalog(self.store.as_ref()).await;
        &self.catalog
    }

    /// 訂單池時間窗內各日期的訂單筆數
    pub async fn order_counts(&self) -> Vec<DateCount> {
        order_counts(self.store.as_ref(), self.pool.window()).await
    }

    // ---- 選取 ----

    pub fn toggle(&mut self, id: OrderId) -> bool {
        self.selection.toggle(id)
    }

    pub fn select(&mut self, id: OrderId) {
        self.selection.select(id);
    }

    pub fn deselect(&mut self, id: OrderId) {
        self.selection.deselect(id);
    }

    /// 選取指定日期的所有訂單
    pub fn select_all_on(&mut self, date: NaiveDate) -> usize {
        let ids = self.pool.ids_on(date);
        self.selection.select_all(ids)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ---- 日期 ----

    pub fn set_manufacturing_date(&mut self, date: Option<NaiveDate>) {
        self.manufacturing_date = date;
    }

    pub fn set_delivery_date(&mut self, date: Option<NaiveDate>) {
        self.delivery_date = date;
    }

    // ---- 淨需求 ----

    /// 已選取訂單的總需求（跨日期）
    pub fn demand(&self) -> DemandTotals {
        DemandAggregator::aggregate(self.selection.as_set(), self.pool.orders())
    }

    /// 預覽淨需求
    pub fn preview(&self) -> NettingReport {
        NettingCalculator::calculate(&self.catalog, &self.demand(), &self.snapshot, &self.adjustments)
    }

    fn base_required(&self, product_name: &str) -> i64 {
        NettingCalculator::base_required(
            self.demand().demand(product_name),
            self.snapshot.available(product_name),
        )
    }

    /// 直接設定生產數量，回傳最終數量
    pub fn set_manufacturing_quantity(&mut self, product_name: &str, value: i64) -> i64 {
        let base = self.base_required(product_name);
        self.adjustments.set_absolute(product_name, base, value)
    }

    pub fn increment(&mut self, product_name: &str) -> i64 {
        let base = self.base_required(product_name);
        self.adjustments.increment(product_name, base)
    }

    pub fn decrement(&mut self, product_name: &str) -> i64 {
        let base = self.base_required(product_name);
        self.adjustments.decrement(product_name, base)
    }

    // ---- 確認與刪除 ----

    /// 確認排產
    ///
    /// 成功後清空選取與手動調整，已排產訂單移出訂單池。
    pub async fn commit(&mut self) -> Result<CommitReceipt> {
        let order_ids = self.selection.ids();
        let quantities = self.preview().committable_quantities();

        let receipt = PlanCommitter::new(self.store.as_ref())
            .commit(
                self.manufacturing_date,
                self.delivery_date,
                order_ids.clone(),
                quantities,
            )
            .await?;

        self.pool.remove_orders(&order_ids);
        self.selection.clear();
        self.adjustments.clear();
        self.last_committed = self.manufacturing_date;
        Ok(receipt)
    }

    /// 刪除指定日期的計劃，並重新載入訂單池
    pub async fn delete_day(&mut self, date: NaiveDate) -> Result<()> {
        PlanCommitter::new(self.store.as_ref()).delete_day(date).await?;
        if self.last_committed == Some(date) {
            self.last_committed = None;
        }
        self.refresh_pool().await;
        Ok(())
    }

    /// 撤銷最近一次確認的排產，回傳被撤銷的生產日期
    pub async fn undo_last_commit(&mut self) -> Result<Option<NaiveDate>> {
        let Some(date) = self.last_committed else {
            return Ok(None);
        };
        self.delete_day(date).await?;
        Ok(Some(date))
    }

    /// 刪除所有計劃（需確認碼）
    pub async fn purge_all(&mut self, command: &PurgeAllCommand, confirmation: &str) -> Result<u64> {
        let deleted = PlanCommitter::new(self.store.as_ref())
            .purge_all(command, confirmation)
            .await?;
        self.last_committed = None;
        self.refresh_pool().await;
        Ok(deleted)
    }

    // ---- 其他作業 ----

    pub fn status_tracker(&self) -> StatusTracker<'_> {
        StatusTracker::new(self.store.as_ref())
    }

    pub fn shipping_desk(&self) -> ShippingDesk<'_> {
        ShippingDesk::new(self.store.as_ref(), self.clock.today())
    }

    // ---- 狀態 ----

    pub fn pool(&self) -> &OrderPool {
        &self.pool
    }

    pub fn selection(&self) -> &OrderSelection {
        &self.selection
    }

    pub fn adjustments(&self) -> &ManualAdjustments {
        &self.adjustments
    }

    pub fn snapshot(&self) -> &AvailabilitySnapshot {
        &self.snapshot
    }

    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    pub fn manufacturing_date(&self) -> Option<NaiveDate> {
        self.manufacturing_date
    }

    pub fn delivery_date(&self) -> Option<NaiveDate> {
        self.delivery_date
    }

    pub fn last_committed(&self) -> Option<NaiveDate> {
        self.last_committed
    }
}
