//! 页面元素定位器
//!
//! - `LocatorRegistry`：符号名 → 定位字符串（`xpaths.ini`）
//! - `ModelLocators`：模型名 → 模型勾选框定位器（`modelxpaths.ini`）
//! - `PageLocators`：流程用到的九个结构性元素，启动时一次性解析

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use tracing::{error, warn};

use crate::error::ConfigError;
use crate::models::item::ModelSet;

/// 查找元素的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    XPath,
    Css,
}

/// 单个元素的定位器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub strategy: Strategy,
    pub selector: String,
}

impl Locator {
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::XPath,
            selector: selector.into(),
        }
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Css,
            selector: selector.into(),
        }
    }

    /// 解析注册表中的定位字符串
    ///
    /// 支持 `xpath:` / `css:` / `class:` 前缀；无前缀时以 `/` 或 `(` 开头的视为 XPath，
    /// 其余视为 class 名称
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let value = value.trim();
        let invalid = || ConfigError::InvalidLocator {
            value: value.to_string(),
        };

        let locator = if let Some(rest) = value.strip_prefix("xpath:") {
            Self::xpath(rest.trim())
        } else if let Some(rest) = value.strip_prefix("css:") {
            Self::css(rest.trim())
        } else if let Some(rest) = value.strip_prefix("class:") {
            Self::class_name(rest).ok_or_else(invalid)?
        } else if value.starts_with('/') || value.starts_with('(') {
            Self::xpath(value)
        } else {
            Self::class_name(value).ok_or_else(invalid)?
        };

        if locator.selector.is_empty() {
            return Err(invalid());
        }
        Ok(locator)
    }

    fn class_name(names: &str) -> Option<Self> {
        let classes: Vec<&str> = names.split_whitespace().collect();
        if classes.is_empty() {
            return None;
        }
        Some(Self::css(format!(".{}", classes.join("."))))
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.strategy {
            Strategy::XPath => write!(f, "xpath:{}", self.selector),
            Strategy::Css => write!(f, "css:{}", self.selector),
        }
    }
}

/// 元素定位器注册表
///
/// 键不区分大小写；值为第一个 `=` 之后的全部内容；重复的键以最后一次为准
#[derive(Debug, Clone, Default)]
pub struct LocatorRegistry {
    source: String,
    entries: HashMap<String, String>,
    duplicates: Vec<String>,
}

impl LocatorRegistry {
    /// 从 `name=value` 文本解析注册表
    ///
    /// 每出现一次重复键就记录一次警告
    pub fn parse(text: &str, source: &str) -> Self {
        let mut registry = Self {
            source: source.to_string(),
            ..Default::default()
        };

        for line in text.lines() {
            let Some((name, value)) = line.split_once('=') else {
                continue;
            };
            let name = name.trim().to_lowercase();
            if name.is_empty() {
                continue;
            }
            let value = value.trim().to_string();

            if registry.entries.insert(name.clone(), value).is_some() {
                warn!("⚠️ {} 中元素名重复: {}，定位器将被覆盖", source, name);
                registry.duplicates.push(name);
            }
        }

        registry
    }

    /// 读取原始定位字符串
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.entries.get(&name.to_lowercase()).map(String::as_str)
    }

    /// 查找并解析定位器，缺失时报告致命错误
    pub fn get(&self, name: &str) -> Result<Locator, ConfigError> {
        match self.raw(name) {
            Some(value) => Locator::parse(value),
            None => {
                error!("❌ {} 中没有为元素 '{}' 指定定位器", self.source, name.to_lowercase());
                Err(ConfigError::MissingLocator {
                    name: name.to_lowercase(),
                })
            }
        }
    }

    /// 每次重复出现的键（按出现顺序）
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 解析流程所需的全部结构性元素
    pub fn page_locators(&self) -> Result<PageLocators, ConfigError> {
        Ok(PageLocators {
            accept: self.get("accept")?,
            model_tab: self.get("model_tab")?,
            smiles_tab: self.get("smitab")?,
            smiles_box: self.get("smibox")?,
            smiles_go: self.get("smigo")?,
            predict: self.get("predict")?,
            status: self.get("status")?,
            end_ok: self.get("endok")?,
            table: self.get("table")?,
        })
    }
}

/// 流程中用到的页面元素
#[derive(Debug, Clone)]
pub struct PageLocators {
    /// 使用条款确认按钮
    pub accept: Locator,
    /// 模型选择标签页
    pub model_tab: Locator,
    /// SMILES 输入标签页
    pub smiles_tab: Locator,
    /// SMILES 输入框
    pub smiles_box: Locator,
    /// SMILES 确认按钮
    pub smiles_go: Locator,
    /// 执行预测按钮
    pub predict: Locator,
    /// 计算状态文本
    pub status: Locator,
    /// 计算完成确认按钮
    pub end_ok: Locator,
    /// 结果面板
    pub table: Locator,
}

/// 模型名 → 模型勾选框定位器
#[derive(Debug, Clone, Default)]
pub struct ModelLocators {
    entries: IndexMap<String, Locator>,
}

impl ModelLocators {
    /// 解析 `model=locator` 文本，不含 `=` 的行被跳过
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut entries = IndexMap::new();
        for line in text.lines() {
            let Some((model, value)) = line.split_once('=') else {
                continue;
            };
            let model = model.trim();
            if model.is_empty() {
                continue;
            }
            entries.insert(model.to_string(), Locator::parse(value)?);
        }
        Ok(Self { entries })
    }

    pub fn get(&self, model: &str) -> Result<&Locator, ConfigError> {
        self.entries.get(model).ok_or_else(|| ConfigError::UnknownModel {
            model: model.to_string(),
        })
    }

    /// 确认每个请求的模型都有定位器
    pub fn ensure_covers(&self, models: &ModelSet) -> Result<(), ConfigError> {
        for model in models.iter() {
            self.get(model)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
