//! 髒標記追蹤

use std::collections::BTreeSet;

/// 產品髒標記追蹤器
#[derive(Debug, Default)]
pub struct DirtyTracker {
    dirty_products: BTreeSet<String>,
}

impl DirtyTracker {
    /// 創建新的追蹤器
    pub fn new() -> Self {
        Self::default()
    }

    /// 標記產品為髒
    pub fn mark_dirty(&mut self, product_id: &str) {
        self.dirty_products.insert(product_id.to_string());
    }

    /// 檢查產品是否為髒
    pub fn is_dirty(&self, product_id: &str) -> bool {
        self.dirty_products.contains(product_id)
    }

    pub fn len(&self) -> usize {
        self.dirty_products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirty_products.is_empty()
    }

    /// 取出所有髒產品（依產品ID排序）並清除標記
    pub fn take_dirty(&mut self) -> Vec<String> {
        std::mem::take(&mut self.dirty_products).into_iter().collect()
    }
}
