//! 未排產訂單池
//!
//! 視窗內每個日期各發一個請求並同時等待；單一日期失敗只記錄警告，
//! 該日期以零筆訂單計。

use std::collections::HashSet;

use chrono::NaiveDate;
use futures::future::join_all;
use kitchen_core::{order::sort_by_arrival, Order, OrderId, PoolWindow};
use kitchen_store::{DateCount, ProductionStore};

/// 單一日期的訂單
#[derive(Debug, Clone)]
pub struct DayOrders {
    pub date: NaiveDate,
    pub orders: Vec<Order>,
    /// 讀取失敗（orders 為空）
    pub failed: bool,
}

/// 訂單池
#[derive(Debug, Clone)]
pub struct OrderPool {
    window: PoolWindow,
    days: Vec<DayOrders>,
}

impl OrderPool {
    pub fn empty(window: PoolWindow) -> Self {
        Self {
            window,
            days: Vec::new(),
        }
    }

    /// 載入視窗內所有日期的未排產訂單
    pub async fn load(store: &dyn ProductionStore, window: PoolWindow) -> Self {
        let requests = window.dates().into_iter().map(|date| async move {
            let result = store.unscheduled_orders(date).await;
            (date, result)
        });

        let days: Vec<DayOrders> = join_all(requests)
            .await
            .into_iter()
            .map(|(date, result)| match result {
                Ok(mut orders) => {
                    sort_by_arrival(&mut orders);
                    DayOrders {
                        date,
                        orders,
                        failed: false,
                    }
                }
                Err(err) => {
                    tracing::warn!(%date, error = %err, "無法讀取該日訂單，以零筆計");
                    DayOrders {
                        date,
                        orders: Vec::new(),
                        failed: true,
                    }
                }
            })
            .collect();

        let pool = Self { window, days };
        tracing::info!(
            "訂單池載入完成: {} ~ {}，共 {} 筆訂單",
            window.start,
            window.end,
            pool.len()
        );
        pool
    }

    pub fn window(&self) -> PoolWindow {
        self.window
    }

    pub fn days(&self) -> &[DayOrders] {
        &self.days
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayOrders> {
        self.days.iter().find(|day| day.date == date)
    }

    /// 所有訂單（依日期、再依建立時間）
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.days.iter().flat_map(|day| day.orders.iter())
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders().find(|order| order.id == id)
    }

    pub fn contains(&self, id: OrderId) -> bool {
        self.order(id).is_some()
    }

    /// 指定日期的訂單ID
    pub fn ids_on(&self, date: NaiveDate) -> Vec<OrderId> {
        self.day(date)
            .map(|day| day.orders.iter().map(|order| order.id).collect())
            .unwrap_or_default()
    }

    /// 讀取失敗的日期
    pub fn failed_dates(&self) -> Vec<NaiveDate> {
        self.days
            .iter()
            .filter(|day| day.failed)
            .map(|day| day.date)
            .collect()
    }

    /// 移除已排產的訂單
    pub fn remove_orders(&mut self, ids: &[OrderId]) {
        let ids: HashSet<OrderId> = ids.iter().copied().collect();
        for day in &mut self.days {
            day.orders.retain(|order| !ids.contains(&order.id));
        }
    }

    pub fn len(&self) -> usize {
        self.days.iter().map(|day| day.orders.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 視窗內各日期的訂單筆數；讀取失敗時回傳空列表
pub async fn order_counts(store: &dyn ProductionStore, window: PoolWindow) -> Vec<DateCount> {
    match store.dates_with_orders().await {
        Ok(counts) => counts
            .into_iter()
            .filter(|count| window.contains(count.date))
            .collect(),
        Err(err) => {
            tracing::warn!(error = %err, "無法讀取訂單日曆");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use kitchen_core::LineItem;
    use kitchen_store::InMemoryStore;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    fn at(d: u32, hour: u32) -> NaiveDateTime {
        date(d).and_hms_opt(hour, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_failed_date_does_not_abort_window() {
        let store = InMemoryStore::new().with_orders(vec![
            Order::new(1, date(9)).with_item(LineItem::new("Milk Tea", 1)),
            Order::new(2, date(10)).with_item(LineItem::new("Milk Tea", 1)),
            Order::new(3, date(11)).with_item(LineItem::new("Milk Tea", 1)),
        ]);
        store.fail_date(date(10)).await;

        let pool = OrderPool::load(&store, PoolWindow::around(date(11))).await;

        assert_eq!(pool.days().len(), 15);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.failed_dates(), vec![date(10)]);
        assert!(pool.contains(1));
        assert!(!pool.contains(2));
    }

    #[tokio::test]
    async fn test_orders_sorted_by_creation_time() {
        let store = InMemoryStore::new().with_orders(vec![
            Order::new(1, date(5)).with_created_at(at(5, 12)),
            Order::new(2, date(5)).with_created_at(at(5, 8)),
            Order::new(3, date(5)),
            Order::new(4, date(5)).with_created_at(at(5, 8)),
        ]);

        let pool = OrderPool::load(&store, PoolWindow::with_bounds(date(5), date(5))).await;

        assert_eq!(pool.ids_on(date(5)), vec![2, 4, 1, 3]);
    }

    #[tokio::test]
    async fn test_remove_orders() {
        let store = InMemoryStore::new().with_orders(vec![
            Order::new(1, date(5)),
            Order::new(2, date(6)),
        ]);
        let mut pool = OrderPool::load(&store, PoolWindow::with_bounds(date(5), date(6))).await;

        pool.remove_orders(&[1]);

        assert_eq!(pool.len(), 1);
        assert!(pool.ids_on(date(5)).is_empty());
    }

    #[tokio::test]
    async fn test_order_counts_restricted_to_window() {
        let store = InMemoryStore::new().with_orders(vec![
            Order::new(1, date(1)),
            Order::new(2, date(20)),
            Order::new(3, date(20)),
        ]);

        let counts = order_counts(&store, PoolWindow::with_bounds(date(15), date(25))).await;

        assert_eq!(counts, vec![DateCount { date: date(20), count: 2 }]);
    }
}
