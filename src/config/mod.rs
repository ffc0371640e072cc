//! 設定解析
//!
//! 合併順序：命令列 > 設定檔 > 內建預設值。
//! 執行期欄位（終端偵測、行號策略）在合併後才推導。

mod file;

pub use file::{config_path, PersistedConfig, CONFIG_ENV, CONFIG_FILE_NAME};

use crate::cli::CliOptions;
use crate::context::Terminals;
use crate::error::Result;
use crate::printer::Input;
use std::collections::BTreeMap;
use std::error::Error;
use std::path::Path;

pub const DEFAULT_FORMAT: &str = "terminal";
pub const HTML_FORMAT: &str = "html";

/// 背景模式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Background {
    Light,
    #[default]
    Dark,
}

impl Background {
    /// 不認得的值一律視為 dark
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(|n| n.trim().to_ascii_lowercase()).as_deref() {
            Some("l") | Some("light") => Background::Light,
            _ => Background::Dark,
        }
    }
}

/// 本次執行的最終設定
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub background: Option<String>,
    pub format: Option<String>,
    pub style: Option<String>,
    pub linenos: bool,
    pub ext_lexers: BTreeMap<String, String>,
    pub lexer: Option<String>,
    pub guess: bool,
    pub nolinenos: bool,
    pub printnames: bool,
    /// `--colors`：即使輸出被導向也強制著色
    pub colors: bool,
    /// 實際是否停用顏色（旗標或輸出不是終端）
    pub nocolors: bool,
    pub debug: bool,
    pub inputs: Vec<Input>,
    pub stdin_tty: bool,
    pub stdout_tty: bool,
    /// 由 ccat 自己加上行號
    pub number_lines: bool,
    /// 由 HTML formatter 加上行號
    pub html_linenos: bool,
}

impl EffectiveConfig {
    pub fn format_name(&self) -> &str {
        self.format.as_deref().unwrap_or(DEFAULT_FORMAT)
    }

    pub fn background_mode(&self) -> Background {
        Background::from_name(self.background.as_deref())
    }

    pub fn is_html(&self) -> bool {
        self.format_name().eq_ignore_ascii_case(HTML_FORMAT)
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

/// 讀取設定檔；失敗時記錄後當作空設定
fn load_persisted(path: &Path) -> PersistedConfig {
    match PersistedConfig::load(path) {
        Ok(Some(persisted)) => {
            log::debug!("Config loaded from: {}", path.display());
            persisted
        }
        Ok(None) => PersistedConfig::default(),
        Err(err) => {
            let cause = err.source().map(|s| s.to_string()).unwrap_or_default();
            log::warn!("{}: {}", err, cause);
            PersistedConfig::default()
        }
    }
}

/// 合併命令列、設定檔與執行期狀態
pub fn resolve(
    cli: &CliOptions,
    persisted_path: &Path,
    terminals: Terminals,
    debug: bool,
) -> EffectiveConfig {
    let persisted = load_persisted(persisted_path);

    // 命令列沒設定的白名單鍵才從設定檔補上
    let background =
        non_empty(cli.background.as_ref()).or(non_empty(persisted.background.as_ref()));
    let format = non_empty(cli.format.as_ref()).or(non_empty(persisted.format.as_ref()));
    let style = non_empty(cli.style.as_ref()).or(non_empty(persisted.style.as_ref()));
    let linenos = cli.linenos || persisted.linenos.unwrap_or(false);

    let inputs = if cli.files.is_empty() {
        vec![Input::Stdin]
    } else {
        cli.files.iter().map(|name| Input::from_arg(name)).collect()
    };

    let mut config = EffectiveConfig {
        background,
        format,
        style,
        linenos,
        ext_lexers: persisted.ext_lexers,
        lexer: non_empty(cli.lexer.as_ref()),
        guess: cli.guess,
        nolinenos: cli.nolinenos,
        printnames: cli.printnames,
        colors: cli.colors,
        nocolors: cli.nocolors,
        debug,
        inputs,
        stdin_tty: terminals.stdin,
        stdout_tty: terminals.stdout,
        number_lines: false,
        html_linenos: false,
    };

    // HTML 可以安全地導向；其他格式在非終端時停用顏色，除非 --colors
    let html = config.is_html();
    let piped = !config.stdout_tty && !config.colors && !html;
    if piped {
        config.nocolors = true;
    }

    // HTML 預設就有行號，只有 -N 會關閉
    config.html_linenos = html && !config.nolinenos;
    config.number_lines = config.linenos && !config.nolinenos && !html && !piped;

    log::debug!("Final printer config: {:?}", config);
    config
}

/// 將白名單中非空的值寫回設定檔
///
/// 沒有任何值時不寫入（避免以空內容覆蓋有用的設定檔），回傳 false。
pub fn persist(config: &EffectiveConfig, path: &Path) -> Result<bool> {
    let persisted = PersistedConfig {
        background: non_empty(config.background.as_ref()),
        ext_lexers: config.ext_lexers.clone(),
        format: non_empty(config.format.as_ref()),
        linenos: config.linenos.then_some(true),
        style: non_empty(config.style.as_ref()),
    };

    if persisted.is_empty() {
        log::debug!("No config to save.");
        return Ok(false);
    }

    log::debug!("Saving config to {}: {:?}", path.display(), persisted);
    persisted.save(path)?;
    Ok(true)
}
