//! 訂單選取

use std::collections::HashSet;

use kitchen_core::OrderId;

/// 訂單選取集合
///
/// 純粹的集合操作，不會觸發任何寫入。
#[derive(Debug, Clone, Default)]
pub struct OrderSelection {
    selected: HashSet<OrderId>,
}

impl OrderSelection {
    /// 創建空的選取
    pub fn new() -> Self {
        Self {
            selected: HashSet::new(),
        }
    }

    /// 切換選取狀態，回傳切換後是否為選取
    pub fn toggle(&mut self, id: OrderId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    pub fn select(&mut self, id: OrderId) {
        self.selected.insert(id);
    }

    pub fn deselect(&mut self, id: OrderId) {
        self.selected.remove(&id);
    }

    /// 批次選取，回傳新加入的筆數
    pub fn select_all<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = OrderId>,
    {
        ids.into_iter().filter(|id| self.selected.insert(*id)).count()
    }

    pub fn is_selected(&self, id: OrderId) -> bool {
        self.selected.contains(&id)
    }

    /// 只保留仍存在於訂單池中的訂單
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(OrderId) -> bool,
    {
        self.selected.retain(|id| keep(*id));
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// 已選取的訂單（遞增排序）
    pub fn ids(&self) -> Vec<OrderId> {
        let mut ids: Vec<OrderId> = self.selected.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn as_set(&self) -> &HashSet<OrderId> {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut selection = OrderSelection::new();

        assert!(selection.toggle(3));
        assert!(selection.is_selected(3));
        assert!(!selection.toggle(3));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_select_all_counts_new_ids() {
        let mut selection = OrderSelection::new();
        selection.select(2);

        assert_eq!(selection.select_all([1, 2, 3]), 2);
        assert_eq!(selection.ids(), vec![1, 2, 3]);
    }

    #[test]
    fn test_retain() {
        let mut selection = OrderSelection::new();
        selection.select_all([1, 2, 3, 4]);
        selection.deselect(4);

        selection.retain(|id| id != 2);
        assert_eq!(selection.ids(), vec![1, 3]);
    }
}
