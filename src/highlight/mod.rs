//! 語法高亮
//!
//! 所有斷詞與著色都交給 syntect；這裡只負責挑選語法（lexer）、
//! 主題（style）與輸出格式（formatter）。

mod engine;
mod lexer;

pub use engine::{default_style, HighlightEngine, OutputFormat};
pub use lexer::{LexerMatch, LexerOrigin, LexerResolver};

use once_cell::sync::Lazy;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

/// 全域語法集（延遲載入，syntect 內建語法）
static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

/// 全域主題集（使用 syntect 內建主題）
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

/// 取得可用語法清單
pub fn available_syntaxes() -> &'static [SyntaxReference] {
    SYNTAX_SET.syntaxes()
}

/// 取得可用主題清單（已排序）
pub fn available_styles() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = THEME_SET.themes.keys().map(String::as_str).collect();
    names.sort_unstable_by_key(|name| name.to_lowercase());
    names
}

/// 依名稱尋找主題（不分大小寫）
pub fn find_style(name: &str) -> Option<(&'static str, &'static Theme)> {
    let name = name.trim();
    THEME_SET
        .themes
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(key, theme)| (key.as_str(), theme))
}
