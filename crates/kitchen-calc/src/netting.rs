//! 淨需求計算

use std::collections::HashSet;

use kitchen_core::{AvailabilitySnapshot, Product, ProductKey};

use crate::adjustment::{AdjustedQuantity, ManualAdjustments};
use crate::aggregation::DemandTotals;
use crate::{NettingReport, PlanWarning};

/// 單一產品的淨需求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetRequirement {
    /// 產品名稱
    pub product_name: String,
    /// 正規化鍵
    pub key: ProductKey,
    /// 總需求
    pub demand: i64,
    /// 可用庫存
    pub available: i64,
    /// 已承諾未出貨（僅供參考）
    pub committed_outstanding: i64,
    /// 基礎生產量 = max(需求 - 可用, 0)
    pub base_required: i64,
    /// 手動調整差值
    pub adjustment: i64,
    /// 最終生產量 = max(基礎 + 差值, 0)
    pub final_required: i64,
    /// 是否低於最低庫存
    pub low_stock: bool,
    /// 是否有明確的手動調整
    adjusted: bool,
}

impl NetRequirement {
    pub fn is_adjusted(&self) -> bool {
        self.adjusted
    }
}

/// 淨需求計算器
pub struct NettingCalculator;

impl NettingCalculator {
    /// 基礎生產量
    pub fn base_required(demand: i64, available: i64) -> i64 {
        demand.saturating_sub(available).max(0)
    }

    /// 計算淨需求
    ///
    /// 產品目錄中的每一項都會出現在結果中（需求為 0 亦然）；
    /// 有需求但不在目錄中的產品排在最後，並產生警告。
    pub fn calculate(
        catalog: &[Product],
        demand: &DemandTotals,
        availability: &AvailabilitySnapshot,
        adjustments: &ManualAdjustments,
    ) -> NettingReport {
        let mut report = NettingReport::empty();
        let mut seen = HashSet::new();

        for product in catalog {
            let key = product.key();
            if !seen.insert(key.clone()) {
                report.add_warning(PlanWarning::info(
                    product.name.clone(),
                    "產品目錄中有重複名稱，只計算第一筆".to_string(),
                ));
                continue;
            }
            report.requirements.push(Self::requirement(
                &product.name,
                key,
                demand,
                availability,
                adjustments,
                product.is_below_min_stock(),
            ));
        }

        for (key, line) in demand.iter() {
            if seen.contains(key) {
                continue;
            }
            report.add_warning(PlanWarning::warning(
                line.product_name.clone(),
                "產品不在目錄中，仍納入生產計算".to_string(),
            ));
            report.requirements.push(Self::requirement(
                &line.product_name,
                key.clone(),
                demand,
                availability,
                adjustments,
                false,
            ));
        }

        tracing::debug!(
            "淨需求計算完成：{} 項產品，總生產量 {}",
            report.requirements.len(),
            report.total_to_manufacture()
        );

        report
    }

    fn requirement(
        product_name: &str,
        key: ProductKey,
        demand: &DemandTotals,
        availability: &AvailabilitySnapshot,
        adjustments: &ManualAdjustments,
        low_stock: bool,
    ) -> NetRequirement {
        let demand_qty = demand.demand_by_key(&key);
        let record = availability.get_by_key(&key);
        let available = record.map_or(0, |r| r.available);
        let base_required = Self::base_required(demand_qty, available);
        let adjustment = adjustments.delta_by_key(&key);

        NetRequirement {
            product_name: product_name.to_string(),
            demand: demand_qty,
            available,
            committed_outstanding: record.map_or(0, |r| r.committed_outstanding),
            base_required,
            adjustment,
            final_required: AdjustedQuantity::new(base_required, adjustment).absolute(),
            low_stock,
            adjusted: adjustments.contains(&key),
            key,
        }
    }
}
