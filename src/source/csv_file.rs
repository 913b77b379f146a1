use csv::ReaderBuilder;
use std::path::PathBuf;

use crate::error::{ProcurementError, Result};
use crate::models::RawRow;
use super::RowSource;

/// 从 CSV 文件读取采购单表格
#[derive(Debug, Clone)]
pub struct CsvRowSource {
    path: PathBuf,
}

impl CsvRowSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn read_from<R: std::io::Read>(reader: R) -> Result<Vec<RawRow>> {
        // 表头交给规范化阶段跳过, 这里按原样返回所有行
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (index, record) in rdr.records().enumerate() {
            let record = record.map_err(|e| ProcurementError::Fetch(format!("row {}: {}", index, e)))?;
            rows.push(RawRow::new(index, record.iter().map(str::to_string).collect()));
        }
        Ok(rows)
    }
}

impl RowSource for CsvRowSource {
    fn fetch_rows(&self) -> Result<Vec<RawRow>> {
        let file = std::fs::File::open(&self.path).map_err(|e| {
            ProcurementError::Fetch(format!("{}: {}", self.path.display(), e))
        })?;
        Self::read_from(file)
    }
}
