//! 出貨作業

use chrono::NaiveDate;
use kitchen_calc::{ShipCheck, ShippingGate};
use kitchen_core::{OrderId, ShippingStatus};
use kitchen_store::ProductionStore;

use crate::availability::load_snapshot;
use crate::Result;

/// 出貨台：檢查與更新出貨狀態
///
/// 每次檢查都重新讀取訂單與可用量。
pub struct ShippingDesk<'a> {
    store: &'a dyn ProductionStore,
    as_of: NaiveDate,
}

impl<'a> ShippingDesk<'a> {
    pub fn new(store: &'a dyn ProductionStore, as_of: NaiveDate) -> Self {
        Self { store, as_of }
    }

    /// 檢查訂單是否可以出貨
    pub async fn check(&self, order_id: OrderId) -> Result<ShipCheck> {
        let order = self.store.order(order_id).await?;
        let snapshot = load_snapshot(self.store, self.as_of).await;
        Ok(ShippingGate::check(&order, &snapshot))
    }

    /// 標記為已出貨（庫存不足時拒絕）
    pub async fn mark_shipped(&self, order_id: OrderId) -> Result<ShipCheck> {
        let order = self.store.order(order_id).await?;
        let snapshot = load_snapshot(self.store, self.as_of).await;
        let check = ShippingGate::check(&order, &snapshot);

        let next = order.shipping_status.transition(
            ShippingStatus::Shipped,
            order_id,
            check.shippable,
            &check.reason(),
        )?;
        self.store.set_shipping_status(order_id, next).await?;
        tracing::info!("訂單 {} 已出貨", order_id);
        Ok(check)
    }

    /// 改回待出貨
    pub async fn mark_pending(&self, order_id: OrderId) -> Result<()> {
        let order = self.store.order(order_id).await?;
        let next = order
            .shipping_status
            .transition(ShippingStatus::Pending, order_id, true, "")?;
        self.store.set_shipping_status(order_id, next).await?;
        tracing::info!("訂單 {} 改回待出貨", order_id);
        Ok(())
    }
}
