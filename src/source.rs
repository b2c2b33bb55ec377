use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;

/// One raw spreadsheet row: column name → cell text. Cells arrive as
/// strings; typing happens in the normalizer.
pub type RawRow = HashMap<String, String>;

/// External row-source: the spreadsheet-backed order store.
///
/// Implementations live outside this crate (the Sheets adapter, test
/// doubles, the file-backed source in the CLI). Failures surface as
/// `Error::DataFetch` and abort the current invocation only.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Fetch all rows for the named sheet or range, in sheet order.
    async fn fetch_rows(&self, sheet: &str) -> Result<Vec<RawRow>>;
}
