// 錯誤型別

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 顏色層（前景 / 背景），用於錯誤訊息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Fore,
    Back,
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layer::Fore => f.write_str("fore"),
            Layer::Back => f.write_str("back"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CcatError {
    #[error("Invalid number for {layer}: {value} Must be in range 0-255")]
    InvalidExtendedColor { layer: Layer, value: String },

    #[error("Bad formatter name: {0}")]
    UnknownFormatter(String),

    #[error("Invalid style name: {0}")]
    UnknownStyle(String),

    #[error("Bad lexer name: {0}")]
    UnknownLexer(String),

    #[error("bad pattern: {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid argument, {0}")]
    InvalidArgument(String),

    #[error("Unable to read file: {name}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("Unable to write output")]
    Write(#[source] io::Error),

    #[error("Error loading config from {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error parsing config from {}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Error saving config to {}", path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CcatError {
    /// 使用者輸入錯誤的提示指令
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            CcatError::UnknownFormatter(_) => {
                Some("Use 'ccat --formatters' to list known formatter names.")
            }
            CcatError::UnknownStyle(_) => Some("Use 'ccat --styles' to list known style names."),
            CcatError::UnknownLexer(_) => Some("Use 'ccat --lexers' to list known lexer names."),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CcatError>;
