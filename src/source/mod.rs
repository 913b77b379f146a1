pub mod csv_file;
pub mod memory;

pub use csv_file::CsvRowSource;
pub use memory::MemoryRowSource;

use crate::error::Result;
use crate::models::RawRow;

/// 表格数据源: 每次返回完整快照 (包括表头行)
pub trait RowSource: Send {
    fn fetch_rows(&self) -> Result<Vec<RawRow>>;
}
