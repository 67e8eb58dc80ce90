//! 输入条目与模型集合

use std::fmt;

use indexmap::IndexSet;

/// 输入条目（一个 SMILES 字符串）
///
/// 读入后不可变，每次运行只处理一次
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item(String);

impl Item {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 用户请求的模型集合
///
/// 有序且不重复，顺序只影响显示
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelSet {
    models: IndexSet<String>,
}

impl ModelSet {
    pub fn new<I, S>(models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            models: models.into_iter().map(Into::into).collect(),
        }
    }

    /// 加入模型，已存在时返回 false
    pub fn insert(&mut self, model: impl Into<String>) -> bool {
        self.models.insert(model.into())
    }

    pub fn contains(&self, model: &str) -> bool {
        self.models.contains(model)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
