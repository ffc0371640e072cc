//! 持久化設定檔（ccat.json）
//!
//! 只有白名單中的鍵會被讀取與寫回；檔案不存在等同於空設定。

use crate::error::{CcatError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "ccat.json";

/// 覆寫設定檔位置的環境變數
pub const CONFIG_ENV: &str = "CCAT_CONFIG";

/// 設定檔位置：`CCAT_CONFIG`，否則與執行檔放在一起
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

/// 可持久化的鍵（白名單）；其他鍵讀取時忽略
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// 副檔名 -> lexer 名稱，例如 {".h": "c"}
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ext_lexers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linenos: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl PersistedConfig {
    /// 讀取設定檔；不存在時回傳 None
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let text = fs::read_to_string(path).map_err(|source| CcatError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| CcatError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(config))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let write_err = |source: io::Error| CcatError::ConfigWrite {
            path: path.to_path_buf(),
            source,
        };

        let mut text = serde_json::to_string_pretty(self)
            .map_err(|e| write_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        text.push('\n');
        fs::write(path, text).map_err(write_err)
    }

    /// 所有值都是空的 / false
    pub fn is_empty(&self) -> bool {
        self.background.is_none()
            && self.ext_lexers.is_empty()
            && self.format.is_none()
            && self.linenos.is_none()
            && self.style.is_none()
    }
}
