//! 記憶體實作
//!
//! 行為與後端一致：確認排產以日期為單位整批覆蓋，刪除某日計劃時
//! 該日的訂單回到未排產狀態。可注入故障以測試降級路徑。

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use kitchen_core::{
    AvailabilityRecord, CommitReceipt, CommitRequest, Order, OrderId, Product, ProductKey,
    ProductionPlan, ProductionStatus, ShippingStatus, StatusEntry,
};
use tokio::sync::RwLock;

use crate::wire::DateCount;
use crate::{ProductionStore, Result, StoreError};

#[derive(Debug, Default)]
struct MemoryState {
    products: Vec<Product>,
    orders: BTreeMap<OrderId, Order>,
    /// 訂單 → 所屬生產日期
    scheduled: HashMap<OrderId, NaiveDate>,
    plans: BTreeMap<NaiveDate, ProductionPlan>,
    statuses: BTreeMap<(NaiveDate, ProductKey), StatusEntry>,
    failing_dates: HashSet<NaiveDate>,
    fail_reads: bool,
    fail_writes: bool,
    calls: usize,
    writes: usize,
    next_schedule_id: i64,
}

impl MemoryState {
    fn read(&mut self, date: Option<NaiveDate>) -> Result<()> {
        self.calls += 1;
        if self.fail_reads {
            return Err(StoreError::Unavailable("讀取暫時無法使用".to_string()));
        }
        match date {
            Some(date) if self.failing_dates.contains(&date) => {
                Err(StoreError::Unavailable(format!("{date} 的資料暫時無法讀取")))
            }
            _ => Ok(()),
        }
    }

    fn write(&mut self) -> Result<()> {
        self.calls += 1;
        self.writes += 1;
        if self.fail_writes {
            return Err(StoreError::Unavailable("寫入暫時無法使用".to_string()));
        }
        Ok(())
    }

    fn unschedule_date(&mut self, date: NaiveDate) {
        self.scheduled.retain(|_, scheduled_on| *scheduled_on != date);
    }
}

/// 記憶體中的排產資料服務
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 設定產品目錄
    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.state.get_mut().products = products;
        self
    }

    /// 加入訂單
    pub fn with_orders(mut self, orders: Vec<Order>) -> Self {
        let state = self.state.get_mut();
        for order in orders {
            state.orders.insert(order.id, order);
        }
        self
    }

    /// 調整產品庫存（模擬其他使用者的操作）
    pub async fn set_stock(&self, product_name: &str, current_stock: i64) {
        let key = ProductKey::new(product_name);
        let mut state = self.state.write().await;
        if let Some(product) = state.products.iter_mut().find(|p| p.key() == key) {
            product.current_stock = current_stock;
        }
    }

    /// 讓指定日期的讀取失敗（包含以該日期為基準的可用量）
    pub async fn fail_date(&self, date: NaiveDate) {
        self.state.write().await.failing_dates.insert(date);
    }

    /// 讓所有讀取失敗
    pub async fn set_fail_reads(&self, fail: bool) {
        self.state.write().await.fail_reads = fail;
    }

    /// 讓所有寫入失敗
    pub async fn set_fail_writes(&self, fail: bool) {
        self.state.write().await.fail_writes = fail;
    }

    /// 累計呼叫次數（讀取與寫入）
    pub async fn call_count(&self) -> usize {
        self.state.read().await.calls
    }

    /// 累計寫入次數
    pub async fn write_count(&self) -> usize {
        self.state.read().await.writes
    }

    /// 訂單所屬的生產日期
    pub async fn scheduled_on(&self, id: OrderId) -> Option<NaiveDate> {
        self.state.read().await.scheduled.get(&id).copied()
    }

    pub async fn is_scheduled(&self, id: OrderId) -> bool {
        self.scheduled_on(id).await.is_some()
    }
}

#[async_trait]
impl ProductionStore for InMemoryStore {
    async fn dates_with_orders(&self) -> Result<Vec<DateCount>> {
        let mut state = self.state.write().await;
        state.read(None)?;

        let mut counts: BTreeMap<NaiveDate, u32> = BTreeMap::new();
        for order in state.orders.values() {
            *counts.entry(order.order_date).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(date, count)| DateCount { date, count })
            .collect())
    }

    async fn unscheduled_orders(&self, date: NaiveDate) -> Result<Vec<Order>> {
        let mut state = self.state.write().await;
        state.read(Some(date))?;

        Ok(state
            .orders
            .values()
            .filter(|order| order.order_date == date && !state.scheduled.contains_key(&order.id))
            .cloned()
            .collect())
    }

    async fn order(&self, id: OrderId) -> Result<Order> {
        let mut state = self.state.write().await;
        state.read(None)?;

        state
            .orders
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("訂單 {id}")))
    }

    async fn availability(&self, as_of: Option<NaiveDate>) -> Result<Vec<AvailabilityRecord>> {
        let mut state = self.state.write().await;
        state.read(as_of)?;

        let mut outstanding: HashMap<ProductKey, i64> = HashMap::new();
        for order in state.orders.values() {
            if order.is_shipped() || as_of.is_some_and(|as_of| order.order_date < as_of) {
                continue;
            }
            for item in order.items.iter().filter(|item| item.quantity > 0) {
                *outstanding.entry(item.key()).or_default() += item.quantity;
            }
        }

        Ok(state
            .products
            .iter()
            .map(|product| {
                let committed = outstanding.get(&product.key()).copied().unwrap_or(0);
                AvailabilityRecord::new(product.name.clone(), product.current_stock, committed)
            })
            .collect())
    }

    async fn production_plan(&self, date: NaiveDate) -> Result<ProductionPlan> {
        let mut state = self.state.write().await;
        state.read(Some(date))?;

        Ok(state
            .plans
            .get(&date)
            .cloned()
            .unwrap_or_else(|| ProductionPlan::empty(date)))
    }

    async fn production_statuses(&self, date: NaiveDate) -> Result<Vec<StatusEntry>> {
        let mut state = self.state.write().await;
        state.read(Some(date))?;

        Ok(state
            .statuses
            .iter()
            .filter(|((status_date, _), _)| *status_date == date)
            .map(|(_, entry)| entry.clone())
            .collect())
    }

    async fn products(&self) -> Result<Vec<Product>> {
        let mut state = self.state.write().await;
        state.read(None)?;
        Ok(state.products.clone())
    }

    async fn confirm_schedule(&self, request: &CommitRequest) -> Result<CommitReceipt> {
        let mut state = self.state.write().await;
        state.write()?;

        let date = request.manufacturing_date();
        let plan = request.to_plan();
        let inserted_products = plan.entries.len() as u32;
        state.plans.insert(date, plan);
        // 該日期以本次請求為準；未再列入的訂單回到未排產
        state.unschedule_date(date);
        for &id in request.order_ids() {
            state.scheduled.insert(id, date);
        }

        state.next_schedule_id += 1;
        tracing::debug!(%date, inserted_products, "記憶體排產已確認");
        Ok(CommitReceipt {
            inserted_products,
            schedule_id: Some(state.next_schedule_id),
        })
    }

    async fn delete_production_plan(&self, date: NaiveDate) -> Result<()> {
        let mut state = self.state.write().await;
        state.write()?;

        state.plans.remove(&date);
        state.statuses.retain(|(status_date, _), _| *status_date != date);
        state.unschedule_date(date);
        Ok(())
    }

    async fn delete_all_production_plans(&self) -> Result<u64> {
        let mut state = self.state.write().await;
        state.write()?;

        let deleted: usize = state.plans.values().map(|plan| plan.entries.len()).sum();
        state.plans.clear();
        state.statuses.clear();
        state.scheduled.clear();
        Ok(deleted as u64)
    }

    async fn set_shipping_status(&self, id: OrderId, status: ShippingStatus) -> Result<()> {
        let mut state = self.state.write().await;
        state.write()?;

        let order = state
            .orders
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("訂單 {id}")))?;
        order.shipping_status = status;
        Ok(())
    }

    async fn set_production_status(
        &self,
        date: NaiveDate,
        product_name: &str,
        status: ProductionStatus,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        state.write()?;

        state.statuses.insert(
            (date, ProductKey::new(product_name)),
            StatusEntry {
                product_name: product_name.to_string(),
                status,
            },
        );
        Ok(())
    }
}
