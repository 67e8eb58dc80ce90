//! 报告写入服务 - 业务能力层
//!
//! 只负责把汇总表写成 CSV 文件

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::services::aggregator::OutputTable;

/// CSV 报告写入服务
pub struct ReportWriter {
    report_path: PathBuf,
}

impl ReportWriter {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            report_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.report_path
    }

    /// 写入整张表，缺失的值写为空单元格
    pub fn write(&self, table: &OutputTable) -> AppResult<()> {
        let path_str = self.report_path.display().to_string();
        debug!("写入报告: {} 行 | {} 列", table.rows.len(), table.columns.len() + 2);

        if let Some(parent) = self.report_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::file_write_failed(path_str.clone(), e))?;
        }

        let file = File::create(&self.report_path)
            .map_err(|e| AppError::file_write_failed(path_str.clone(), e))?;
        let mut w = BufWriter::new(file);
        write_table(&mut w, table)
            .and_then(|_| w.flush())
            .map_err(|e| AppError::file_write_failed(path_str.clone(), e))?;

        info!("✓ 报告已写入: {}", path_str);
        Ok(())
    }
}

/// 把整张表写到任意 writer
pub fn write_table<W: Write>(mut w: W, table: &OutputTable) -> io::Result<()> {
    write_row(&mut w, table.headers().iter().map(String::as_str))?;
    for row in &table.rows {
        let mol_id = row.mol_id.to_string();
        let cells = [mol_id.as_str(), row.item.as_str()]
            .into_iter()
            .chain(row.cells.iter().map(|c| c.as_deref().unwrap_or("")));
        write_row(&mut w, cells)?;
    }
    Ok(())
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<'a, W: Write>(mut w: W, row: impl IntoIterator<Item = &'a str>) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;
    use crate::services::aggregator::{ColumnSpec, Field, OutputRow};

    fn table() -> OutputTable {
        OutputTable {
            columns: vec![
                ColumnSpec {
                    model: "Skin Irritation".to_string(),
                    field: Field::Experimental,
                },
                ColumnSpec {
                    model: "Skin Irritation".to_string(),
                    field: Field::Prediction,
                },
            ],
            rows: vec![
                OutputRow {
                    mol_id: 1,
                    item: Item::new("CCO"),
                    cells: vec![Some("0.2".to_string()), Some("Negative".to_string())],
                },
                OutputRow {
                    mol_id: 2,
                    item: Item::new("C(=O)\"x\",y"),
                    cells: vec![None, Some("Positive".to_string())],
                },
            ],
        }
    }

    #[test]
    fn test_write_table_quotes_and_leaves_missing_empty() {
        let mut buf = Vec::new();
        write_table(&mut buf, &table()).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text,
            "MolID,SMILES,Skin Irritation - Experimental,Skin Irritation - Prediction\n\
             1,CCO,0.2,Negative\n\
             2,\"C(=O)\"\"x\"\",y\",,Positive\n"
        );
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.csv");
        let writer = ReportWriter::with_path(&path);
        writer.write(&table()).unwrap();

        let content = std::fs::read_to_string(writer.path()).unwrap();
        assert!(content.starts_with("MolID,SMILES,"));
        assert_eq!(content.lines().count(), 3);
    }
}
