//! ccat (ColorCat) - 以語法高亮輸出檔案的 cat

pub mod app;
pub mod cli;
pub mod color;
pub mod config;
pub mod context;
pub mod error;
pub mod highlight;
pub mod listing;
pub mod printer;
pub mod status;
pub mod utils;

// 重新導出常用類型
pub use context::{AppContext, Terminals};
pub use error::{CcatError, Result};
