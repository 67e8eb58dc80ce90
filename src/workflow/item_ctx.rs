//! 条目处理上下文
//!
//! 封装"我正在处理第几个条目"这一信息

use std::fmt::Display;

use crate::models::Item;

/// 条目处理上下文
#[derive(Debug, Clone)]
pub struct ItemCtx {
    /// 条目序号（从1开始，也是输出表的 MolID）
    pub index: usize,

    /// 条目总数（仅用于日志显示）
    pub total: usize,

    /// 输入条目
    pub item: Item,
}

impl ItemCtx {
    pub fn new(index: usize, total: usize, item: Item) -> Self {
        Self { index, total, item }
    }
}

impl Display for ItemCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[条目 {}/{}]", self.index, self.total)
    }
}
