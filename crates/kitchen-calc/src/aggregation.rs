//! 需求彙總
//!
//! 跨日期彙總：被選取訂單的需求一律併入同一組產品總量，與訂單日期無關。

use std::collections::{BTreeMap, HashSet};

use kitchen_core::{Order, OrderId, ProductKey};

/// 單一產品的彙總需求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemandLine {
    /// 顯示名稱（第一次出現的寫法）
    pub product_name: String,

    /// 總需求量
    pub quantity: i64,

    /// 貢獻此需求的訂單數
    pub order_count: usize,
}

/// 各產品彙總需求
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemandTotals {
    lines: BTreeMap<ProductKey, DemandLine>,
}

impl DemandTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// 累加需求；非正數量不計入，溢位時停在 `i64::MAX`
    pub fn add(&mut self, product_name: &str, quantity: i64) {
        if quantity <= 0 {
            return;
        }
        let line = self
            .lines
            .entry(ProductKey::new(product_name))
            .or_insert_with(|| DemandLine {
                product_name: product_name.trim().to_string(),
                quantity: 0,
                order_count: 0,
            });
        line.quantity = line.quantity.checked_add(quantity).unwrap_or_else(|| {
            tracing::warn!("{} 的需求量超出上限，以 {} 計", line.product_name, i64::MAX);
            i64::MAX
        });
    }

    /// 指定產品的需求量；未出現的產品為 0
    pub fn demand(&self, product_name: &str) -> i64 {
        self.demand_by_key(&ProductKey::new(product_name))
    }

    pub fn demand_by_key(&self, key: &ProductKey) -> i64 {
        self.lines.get(key).map_or(0, |line| line.quantity)
    }

    pub fn get(&self, key: &ProductKey) -> Option<&DemandLine> {
        self.lines.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProductKey, &DemandLine)> {
        self.lines.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn total(&self) -> i64 {
        self.lines
            .values()
            .fold(0i64, |acc, line| acc.saturating_add(line.quantity))
    }
}

/// 需求彙總器
pub struct DemandAggregator;

impl DemandAggregator {
    /// 彙總被選取訂單的需求
    ///
    /// `orders` 可以橫跨多個日期；同一張訂單重複出現只計一次。
    pub fn aggregate<'a, I>(selected: &HashSet<OrderId>, orders: I) -> DemandTotals
    where
        I: IntoIterator<Item = &'a Order>,
    {
        let mut totals = DemandTotals::new();
        let mut seen = HashSet::new();
        let mut dates = HashSet::new();

        for order in orders {
            if !selected.contains(&order.id) || !seen.insert(order.id) {
                continue;
            }
            dates.insert(order.order_date);

            let mut touched = HashSet::new();
            for item in &order.items {
                if item.quantity <= 0 {
                    continue;
                }
                totals.add(&item.product_name, item.quantity);
                touched.insert(item.key());
            }
            for key in touched {
                if let Some(line) = totals.lines.get_mut(&key) {
                    line.order_count += 1;
                }
            }
        }

        if seen.len() < selected.len() {
            tracing::debug!(
                "選取 {} 張訂單，其中 {} 張不在訂單池中",
                selected.len(),
                selected.len() - seen.len()
            );
        }
        tracing::debug!(
            "需求彙總：{} 張訂單、{} 個日期、{} 項產品",
            seen.len(),
            dates.len(),
            totals.len()
        );

        totals
    }
}
