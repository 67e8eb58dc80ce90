//! 结果汇总 - 业务能力层
//!
//! 先根据实际出现的模型建立列定义，再按条目逐行填值

use indexmap::IndexSet;

use crate::models::{Item, ItemResultSet, ModelSet, ResultRecord};

/// 输出列对应的记录字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Experimental,
    Prediction,
}

/// 一个模型列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub model: String,
    pub field: Field,
}

impl ColumnSpec {
    pub fn header(&self) -> String {
        match self.field {
            Field::Experimental => format!("{} - Experimental", self.model),
            Field::Prediction => format!("{} - Prediction", self.model),
        }
    }

    fn value<'r>(&self, record: &'r ResultRecord) -> Option<&'r str> {
        match self.field {
            Field::Experimental => record.experimental.as_deref(),
            Field::Prediction => record.prediction.as_deref(),
        }
    }
}

/// 输出表的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    /// 从1开始的序号
    pub mol_id: usize,
    pub item: Item,
    /// 与 `OutputTable::columns` 一一对应，未报告的模型为 None
    pub cells: Vec<Option<String>>,
}

/// 汇总后的宽表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputTable {
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<OutputRow>,
}

impl OutputTable {
    /// 全部表头：MolID、SMILES，然后是各模型列
    pub fn headers(&self) -> Vec<String> {
        let mut headers = vec!["MolID".to_string(), "SMILES".to_string()];
        headers.extend(self.columns.iter().map(ColumnSpec::header));
        headers
    }

    /// 按表头取某行某列的值
    pub fn cell(&self, row: usize, header: &str) -> Option<&str> {
        let column = self.columns.iter().position(|c| c.header() == header)?;
        self.rows.get(row)?.cells.get(column)?.as_deref()
    }
}

/// 建立列定义：所有条目中报告过且被请求的模型，按首次出现顺序，每个模型两列
pub fn build_schema(results: &ItemResultSet, models: &ModelSet) -> Vec<ColumnSpec> {
    let mut seen: IndexSet<&str> = IndexSet::new();
    for result in results.iter() {
        for model in result.records.keys() {
            if models.contains(model) {
                seen.insert(model);
            }
        }
    }

    seen.into_iter()
        .flat_map(|model| {
            [Field::Experimental, Field::Prediction].map(|field| ColumnSpec {
                model: model.to_string(),
                field,
            })
        })
        .collect()
}

/// 把所有条目的结果汇总为一张表
pub fn aggregate(results: &ItemResultSet, models: &ModelSet) -> OutputTable {
    let columns = build_schema(results, models);

    let rows = results
        .iter()
        .enumerate()
        .map(|(i, result)| OutputRow {
            mol_id: i + 1,
            item: result.item.clone(),
            cells: columns
                .iter()
                .map(|column| {
                    result
                        .records
                        .get(&column.model)
                        .and_then(|record| column.value(record))
                        .map(str::to_string)
                })
                .collect(),
        })
        .collect();

    OutputTable { columns, rows }
}
