//! 手動調整
//!
//! 操作員的修正以「差值」儲存，而不是絕對值：
//! 重新計算淨需求時基礎量會改變，但差值保持不變，直到操作員再次編輯。

use std::collections::HashMap;

use kitchen_core::ProductKey;

/// 基礎量與調整差值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdjustedQuantity {
    pub base: i64,
    pub delta: i64,
}

impl AdjustedQuantity {
    pub fn new(base: i64, delta: i64) -> Self {
        Self { base, delta }
    }

    /// 最終數量 = max(base + delta, 0)
    pub fn absolute(&self) -> i64 {
        self.base.saturating_add(self.delta).max(0)
    }

    /// 直接指定最終數量，回推差值
    pub fn set_absolute(&mut self, value: i64) {
        self.delta = value.saturating_sub(self.base);
    }
}

/// 工作階段內的手動調整（不持久化）
#[derive(Debug, Clone, Default)]
pub struct ManualAdjustments {
    deltas: HashMap<ProductKey, i64>,
}

impl ManualAdjustments {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定產品的調整差值；未調整為 0
    pub fn delta(&self, product_name: &str) -> i64 {
        self.delta_by_key(&ProductKey::new(product_name))
    }

    pub fn delta_by_key(&self, key: &ProductKey) -> i64 {
        self.deltas.get(key).copied().unwrap_or(0)
    }

    /// 是否有明確的調整記錄
    pub fn contains(&self, key: &ProductKey) -> bool {
        self.deltas.contains_key(key)
    }

    /// 直接設定差值
    pub fn set_delta(&mut self, product_name: &str, delta: i64) {
        self.deltas.insert(ProductKey::new(product_name), delta);
    }

    /// 以目前的基礎量換算：設定最終數量，差值 = value - base
    pub fn set_absolute(&mut self, product_name: &str, base: i64, value: i64) -> i64 {
        let mut quantity = AdjustedQuantity::new(base, self.delta(product_name));
        quantity.set_absolute(value.max(0));
        self.set_delta(product_name, quantity.delta);
        quantity.absolute()
    }

    /// 最終數量 +1
    pub fn increment(&mut self, product_name: &str, base: i64) -> i64 {
        let current = self.project(product_name, base);
        self.set_absolute(product_name, base, current.saturating_add(1))
    }

    /// 最終數量 -1（不低於 0）
    pub fn decrement(&mut self, product_name: &str, base: i64) -> i64 {
        let current = self.project(product_name, base);
        self.set_absolute(product_name, base, current.saturating_sub(1).max(0))
    }

    /// 投影最終數量
    pub fn project(&self, product_name: &str, base: i64) -> i64 {
        AdjustedQuantity::new(base, self.delta(product_name)).absolute()
    }

    pub fn clear(&mut self) {
        self.deltas.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_survives_base_change() {
        let mut adjustments = ManualAdjustments::new();

        // 基礎量 4，操作員指定 10 → 差值 6
        assert_eq!(adjustments.set_absolute("Milk Tea", 4, 10), 10);
        assert_eq!(adjustments.delta("milk tea"), 6);

        // 基礎量變成 1，差值不重算
        assert_eq!(adjustments.project("Milk Tea", 1), 7);
    }

    #[test]
    fn test_increment_and_decrement() {
        let mut adjustments = ManualAdjustments::new();

        assert_eq!(adjustments.increment("Green Tea", 2), 3);
        assert_eq!(adjustments.increment("Green Tea", 2), 4);
        assert_eq!(adjustments.delta("Green Tea"), 2);

        assert_eq!(adjustments.decrement("Oolong", 0), 0);
        assert_eq!(adjustments.delta("Oolong"), 0);
        assert!(adjustments.contains(&ProductKey::new("oolong")));
    }

    #[test]
    fn test_extreme_values_saturate() {
        let mut adjustments = ManualAdjustments::new();

        assert_eq!(adjustments.set_absolute("Milk Tea", 4, i64::MAX), i64::MAX);
        assert_eq!(adjustments.increment("Milk Tea", 4), i64::MAX);
        assert_eq!(AdjustedQuantity::new(i64::MAX, i64::MAX).absolute(), i64::MAX);
        assert_eq!(AdjustedQuantity::new(0, i64::MIN).absolute(), 0);
    }

    #[test]
    fn test_projection_never_negative() {
        let quantity = AdjustedQuantity::new(3, -10);
        assert_eq!(quantity.absolute(), 0);
    }
}
