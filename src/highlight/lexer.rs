// 語法（lexer）選擇
//
// 順序：明確名稱 -> 檔名 -> 內容猜測 -> 純文字

use super::SYNTAX_SET;
use crate::error::{CcatError, Result};
use std::collections::BTreeMap;
use std::path::Path;
use syntect::parsing::SyntaxReference;

/// lexer 的來源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexerOrigin {
    Name,
    ExtensionConfig,
    Filename,
    Guess,
    PlainText,
}

#[derive(Debug, Clone, Copy)]
pub struct LexerMatch {
    pub syntax: &'static SyntaxReference,
    pub origin: LexerOrigin,
}

impl LexerMatch {
    pub fn name(&self) -> &'static str {
        &self.syntax.name
    }
}

pub struct LexerResolver {
    /// 副檔名（小寫、含點）-> lexer 名稱
    ext_lexers: BTreeMap<String, String>,
}

impl LexerResolver {
    pub fn new(ext_lexers: &BTreeMap<String, String>) -> Self {
        let ext_lexers = ext_lexers
            .iter()
            .map(|(ext, name)| {
                let ext = ext.trim().to_lowercase();
                let ext = if ext.starts_with('.') { ext } else { format!(".{}", ext) };
                (ext, name.clone())
            })
            .collect();
        Self { ext_lexers }
    }

    /// 為一個輸入挑選 lexer
    ///
    /// `filename` 為 None 代表 stdin。明確指定的名稱找不到、檔名也無法判斷時回傳錯誤；
    /// 其餘情況最後一定會落到純文字。
    pub fn resolve(
        &self,
        explicit: Option<&str>,
        filename: Option<&Path>,
        content: &str,
        guess: bool,
    ) -> Result<LexerMatch> {
        if guess {
            return Ok(Self::guess(content));
        }

        if let Some(name) = explicit {
            return Self::resolve_explicit(name, filename);
        }

        if let Some(path) = filename {
            if let Some(found) = self.by_configured_extension(path) {
                return Ok(found);
            }
            if let Some(syntax) = Self::for_filename(path) {
                return Ok(LexerMatch {
                    syntax,
                    origin: LexerOrigin::Filename,
                });
            }
        }

        Ok(Self::guess(content))
    }

    /// 使用者指定的名稱；找不到時改用檔名判斷
    pub fn resolve_explicit(name: &str, filename: Option<&Path>) -> Result<LexerMatch> {
        if let Some(syntax) = Self::by_name(name) {
            return Ok(LexerMatch {
                syntax,
                origin: LexerOrigin::Name,
            });
        }
        if let Some(syntax) = filename.and_then(Self::for_filename) {
            log::warn!("Unknown lexer {:?}, using {} from file name", name, syntax.name);
            return Ok(LexerMatch {
                syntax,
                origin: LexerOrigin::Filename,
            });
        }
        Err(CcatError::UnknownLexer(name.to_string()))
    }

    /// 設定檔中的 ext_lexers
    fn by_configured_extension(&self, path: &Path) -> Option<LexerMatch> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        let name = self.ext_lexers.get(&format!(".{}", ext))?;

        match Self::by_name(name) {
            Some(syntax) => {
                log::debug!("Set lexer name by user config extension: .{} -> {}", ext, name);
                Some(LexerMatch {
                    syntax,
                    origin: LexerOrigin::ExtensionConfig,
                })
            }
            None => {
                log::warn!("Unknown lexer {:?} configured for .{}", name, ext);
                None
            }
        }
    }

    /// 依名稱、別名或副檔名尋找
    pub fn by_name(name: &str) -> Option<&'static SyntaxReference> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        SYNTAX_SET
            .find_syntax_by_name(name)
            // 副檔名或不分大小寫的名稱
            .or_else(|| SYNTAX_SET.find_syntax_by_token(name))
            .or_else(|| match name.to_lowercase().as_str() {
                "text" | "plain" | "plaintext" => Some(SYNTAX_SET.find_syntax_plain_text()),
                _ => None,
            })
    }

    /// 從檔案路徑檢測語法
    pub fn for_filename(path: &Path) -> Option<&'static SyntaxReference> {
        // 1. 從副檔名檢測
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if let Some(syntax) = SYNTAX_SET
                .find_syntax_by_extension(ext)
                .or_else(|| SYNTAX_SET.find_syntax_by_extension(&ext.to_lowercase()))
            {
                return Some(syntax);
            }
        }

        // 2. 從檔名檢測（例如 Makefile, Dockerfile）
        let name = path.file_name().and_then(|n| n.to_str())?;
        if let Some(syntax) = SYNTAX_SET
            .find_syntax_by_extension(name)
            .or_else(|| SYNTAX_SET.find_syntax_by_name(name))
        {
            return Some(syntax);
        }

        // 特殊檔名處理
        match name.to_lowercase().as_str() {
            ".bashrc" | ".bash_profile" | ".bash_login" | ".bash_logout" | ".zshrc"
            | ".zprofile" | ".zshenv" | ".zlogin" | ".zlogout" | ".profile" | "bashrc"
            | "bash_profile" => SYNTAX_SET
                .find_syntax_by_name("Bourne Again Shell (bash)")
                .or_else(|| SYNTAX_SET.find_syntax_by_extension("sh")),
            "makefile" | "gnumakefile" => SYNTAX_SET.find_syntax_by_name("Makefile"),
            "dockerfile" => SYNTAX_SET.find_syntax_by_name("Dockerfile"),
            _ => None,
        }
    }

    /// 從內容猜測；永遠有結果（最後是純文字）
    pub fn guess(content: &str) -> LexerMatch {
        let first_line = content.lines().find(|line| !line.trim().is_empty());

        let guessed = first_line
            .and_then(|line| SYNTAX_SET.find_syntax_by_first_line(line))
            .or_else(|| {
                let trimmed = content.trim_start();
                let looks_like_json = trimmed.starts_with('{') || trimmed.starts_with('[');
                if looks_like_json && serde_json::from_str::<serde_json::Value>(content).is_ok() {
                    SYNTAX_SET.find_syntax_by_extension("json")
                } else {
                    None
                }
            });

        match guessed {
            Some(syntax) => LexerMatch {
                syntax,
                origin: LexerOrigin::Guess,
            },
            None => LexerMatch {
                syntax: SYNTAX_SET.find_syntax_plain_text(),
                origin: LexerOrigin::PlainText,
            },
        }
    }
}
