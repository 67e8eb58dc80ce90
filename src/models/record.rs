//! 结果面板文本与解析后的记录

use indexmap::IndexMap;

use crate::models::item::Item;

/// 触发读取时结果面板的原始文本（按行）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPanelText {
    lines: Vec<String>,
}

impl RawPanelText {
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// 单个模型对单个条目的结果
///
/// `experimental` 只在服务返回三个值时存在。
/// `probability` 会被解析保存，但不写入输出表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub model: String,
    pub experimental: Option<String>,
    pub probability: Option<String>,
    pub prediction: Option<String>,
}

/// 模型名 → 记录，保持面板中的出现顺序
pub type RecordMap = IndexMap<String, ResultRecord>;

/// 一个条目及其全部记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemResult {
    pub item: Item,
    pub records: RecordMap,
}

/// 全部条目的结果，按输入顺序逐条追加
#[derive(Debug, Clone, Default)]
pub struct ItemResultSet {
    entries: Vec<ItemResult>,
}

impl ItemResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个已完成条目的结果，写入后不再修改
    pub fn push(&mut self, item: Item, records: RecordMap) {
        self.entries.push(ItemResult { item, records });
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemResult> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
