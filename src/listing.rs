// 列出可用的 lexer / style / formatter
//
// 有 PATTERN 時只列出符合的項目（不分大小寫）；完全沒有符合時回傳結束碼 1。

use crate::cli::ListKind;
use crate::error::{CcatError, Result};
use crate::highlight::{available_styles, available_syntaxes, OutputFormat};
use regex::{Regex, RegexBuilder};
use std::io::Write;

fn compile(pattern: Option<&str>) -> Result<Option<Regex>> {
    pattern
        .map(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| CcatError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })
        })
        .transpose()
}

fn matching_suffix(pattern: Option<&Regex>) -> String {
    pattern
        .map(|pat| format!(" matching '{}'", pat.as_str()))
        .unwrap_or_default()
}

fn write_err(e: std::io::Error) -> CcatError {
    CcatError::Write(e)
}

/// 執行列表指令，回傳結束碼
pub fn run<W: Write, E: Write>(
    kind: ListKind,
    pattern: Option<&str>,
    out: &mut W,
    err: &mut E,
) -> Result<i32> {
    let pattern = compile(pattern)?;
    let found = match kind {
        ListKind::Lexers => list_lexers(pattern.as_ref(), out)?,
        ListKind::Styles => list_styles(pattern.as_ref(), out)?,
        ListKind::Formatters => list_formatters(pattern.as_ref(), out)?,
    };

    if found > 0 {
        return Ok(0);
    }

    let label = match kind {
        ListKind::Lexers => "lexers",
        ListKind::Styles => "styles",
        ListKind::Formatters => "formatters",
    };
    // 沒有 PATTERN 時清單不會是空的
    let pattern = pattern.as_ref().map(Regex::as_str).unwrap_or_default();
    writeln!(err, "\nNo {} matching: '{}'", label, pattern).map_err(write_err)?;
    Ok(1)
}

pub fn list_lexers<W: Write>(pattern: Option<&Regex>, out: &mut W) -> Result<usize> {
    let mut syntaxes: Vec<_> = available_syntaxes().iter().collect();
    syntaxes.sort_by_key(|syntax| syntax.name.to_lowercase());

    let mut total = 0;
    for syntax in syntaxes {
        let matches = pattern.map_or(true, |pat| {
            pat.is_match(&syntax.name) || syntax.file_extensions.iter().any(|ext| pat.is_match(ext))
        });
        if !matches {
            continue;
        }

        if total == 0 {
            writeln!(out, "\nLexer names{}:", matching_suffix(pattern)).map_err(write_err)?;
        }
        total += 1;

        writeln!(out, "\n{}", syntax.name).map_err(write_err)?;
        if !syntax.file_extensions.is_empty() {
            let mut extensions = syntax.file_extensions.clone();
            extensions.sort();
            writeln!(out, "    extensions: {}", extensions.join(", ")).map_err(write_err)?;
        }
    }
    Ok(total)
}

pub fn list_styles<W: Write>(pattern: Option<&Regex>, out: &mut W) -> Result<usize> {
    let styles: Vec<&str> = available_styles()
        .into_iter()
        .filter(|name| pattern.map_or(true, |pat| pat.is_match(name)))
        .collect();
    if styles.is_empty() {
        return Ok(0);
    }

    writeln!(out, "\nStyle names{}:", matching_suffix(pattern)).map_err(write_err)?;
    for name in &styles {
        writeln!(out, "    {}", name).map_err(write_err)?;
    }
    Ok(styles.len())
}

pub fn list_formatters<W: Write>(pattern: Option<&Regex>, out: &mut W) -> Result<usize> {
    let names: Vec<&str> = OutputFormat::ALL
        .iter()
        .map(|format| format.name())
        .filter(|name| pattern.map_or(true, |pat| pat.is_match(name)))
        .collect();
    if names.is_empty() {
        return Ok(0);
    }

    writeln!(out, "\nAvailable formatters{}:", matching_suffix(pattern)).map_err(write_err)?;
    for name in &names {
        writeln!(out, "    {}", name).map_err(write_err)?;
    }
    Ok(names.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_list(kind: ListKind, pattern: Option<&str>) -> (i32, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(kind, pattern, &mut out, &mut err).unwrap();
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_list_formatters() {
        let (code, out, _) = run_list(ListKind::Formatters, None);
        assert_eq!(code, 0);
        assert_eq!(
            out,
            "\nAvailable formatters:\n    terminal\n    256\n    truecolor\n    html\n"
        );
    }

    #[test]
    fn test_list_styles_with_pattern() {
        let (code, out, _) = run_list(ListKind::Styles, Some("OCEAN"));
        assert_eq!(code, 0);
        assert!(out.starts_with("\nStyle names matching 'OCEAN':\n"));
        assert!(out.contains("    base16-ocean.dark\n"));
        assert!(!out.contains("InspiredGitHub"));
    }

    #[test]
    fn test_list_lexers_matches_extension() {
        let (code, out, _) = run_list(ListKind::Lexers, Some("^rs$"));
        assert_eq!(code, 0);
        assert!(out.contains("\nRust\n"));
        assert!(out.contains("extensions: rs"));
    }

    #[test]
    fn test_no_matches_exit_one() {
        let (code, out, err) = run_list(ListKind::Styles, Some("zzz-nothing"));
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert_eq!(err, "\nNo styles matching: 'zzz-nothing'\n");
    }

    #[test]
    fn test_bad_pattern() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = run(ListKind::Lexers, Some("(unclosed"), &mut out, &mut err);
        assert!(matches!(result, Err(CcatError::InvalidPattern { .. })));
    }
}
