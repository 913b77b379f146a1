use std::sync::{Arc, Mutex};

use crate::error::{ProcurementError, Result};
use crate::models::RawRow;
use super::RowSource;

/// 内存数据源; 可在运行时替换内容或模拟故障
#[derive(Debug, Clone, Default)]
pub struct MemoryRowSource {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    rows: Vec<Vec<String>>,
    failure: Option<String>,
}

impl MemoryRowSource {
    pub fn new<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let source = Self::default();
        source.replace_rows(rows);
        source
    }

    pub fn replace_rows<I, R, S>(&self, rows: I)
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        if let Ok(mut state) = self.state.lock() {
            state.rows = rows;
        }
    }

    /// 之后的读取都返回该错误, 传 None 恢复
    pub fn set_failure(&self, failure: Option<&str>) {
        if let Ok(mut state) = self.state.lock() {
            state.failure = failure.map(str::to_string);
        }
    }
}

impl RowSource for MemoryRowSource {
    fn fetch_rows(&self) -> Result<Vec<RawRow>> {
        let state = self
            .state
            .lock()
            .map_err(|_| ProcurementError::Fetch("row source lock poisoned".to_string()))?;
        if let Some(message) = &state.failure {
            return Err(ProcurementError::Fetch(message.clone()));
        }
        Ok(state
            .rows
            .iter()
            .enumerate()
            .map(|(index, fields)| RawRow::new(index, fields.clone()))
            .collect())
    }
}
