//! 结果面板解析 - 业务能力层
//!
//! 把结果面板的纯文本转换为 模型 → 记录 的映射，不关心流程

use indexmap::IndexMap;
use tracing::debug;

use crate::models::{ModelSet, RawPanelText, RecordMap, ResultRecord};

/// 面板顶部的表头行数
pub const PANEL_HEADER_LINES: usize = 5;

/// 结果面板解析器
///
/// 先按原始行数跳过面板表头，再只把与请求模型名完全相同的行当作分组标题，
/// 其后直到下一个标题的行（包括空行）都是该模型的值
pub struct ResultParser<'a> {
    models: &'a ModelSet,
    header_lines: usize,
}

impl<'a> ResultParser<'a> {
    pub fn new(models: &'a ModelSet) -> Self {
        Self {
            models,
            header_lines: PANEL_HEADER_LINES,
        }
    }

    pub fn with_header_lines(mut self, header_lines: usize) -> Self {
        self.header_lines = header_lines;
        self
    }

    /// 解析一个条目的结果面板
    pub fn parse(&self, panel: &RawPanelText) -> RecordMap {
        let mut groups: IndexMap<&str, Vec<&str>> = IndexMap::new();
        let mut current: Option<&str> = None;

        let lines = panel
            .lines()
            .iter()
            .skip(self.header_lines)
            .map(|line| line.trim_end_matches('\r'));

        for line in lines {
            if self.models.contains(line) {
                // 同一模型再次出现时重新开始该分组
                groups.insert(line, Vec::new());
                current = Some(line);
            } else if let Some(values) = current.and_then(|model| groups.get_mut(model)) {
                values.push(line);
            }
        }

        groups
            .into_iter()
            .filter_map(|(model, values)| {
                let record = group_to_record(model, &values);
                if record.is_none() {
                    debug!("丢弃模型 {} 的结果: {} 个值", model, values.len());
                }
                record.map(|r| (model.to_string(), r))
            })
            .collect()
    }
}

/// 两个值：概率、预测；三个值：实验值、概率、预测；其余数量不产生记录
fn group_to_record(model: &str, values: &[&str]) -> Option<ResultRecord> {
    let (experimental, probability, prediction) = match values {
        [probability, prediction] => (None, probability, prediction),
        [experimental, probability, prediction] => (Some(experimental), probability, prediction),
        _ => return None,
    };
    Some(ResultRecord {
        model: model.to_string(),
        experimental: experimental.map(|v| v.to_string()),
        probability: Some(probability.to_string()),
        prediction: Some(prediction.to_string()),
    })
}
