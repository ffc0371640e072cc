//! 語法高亮引擎
//!
//! 實現特點：
//! - 每一行輸出都是獨立的（換行前 reset），行號前綴不會被染色
//! - 256 色 / 真彩色只在顏色變化時輸出色碼
//! - 輸出結尾永遠是換行，呼叫端負責去掉多出來的空行

use super::{find_style, SYNTAX_SET};
use crate::color::{ColorSpec, Painter, CLOSE, CSI};
use crate::config::Background;
use crate::error::{CcatError, Result};
use crate::utils::digit_count;
use std::fmt::Write;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Color, FontStyle, Style, Theme};
use syntect::html::{
    append_highlighted_html_for_styled_line, start_highlighted_html_snippet, IncludeBackground,
};
use syntect::parsing::SyntaxReference;
use syntect::util::LinesWithEndings;

/// 輸出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// 16 色 ANSI
    Terminal,
    /// xterm 256 色
    Ansi256,
    /// 24-bit 真彩色
    TrueColor,
    /// 完整 HTML 文件
    Html,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Terminal,
        OutputFormat::Ansi256,
        OutputFormat::TrueColor,
        OutputFormat::Html,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Terminal => "terminal",
            OutputFormat::Ansi256 => "256",
            OutputFormat::TrueColor => "truecolor",
            OutputFormat::Html => "html",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(name))
    }
}

/// 未指定 style 時依背景挑選
pub fn default_style(background: Background) -> &'static str {
    match background {
        Background::Dark => "base16-ocean.dark",
        Background::Light => "InspiredGitHub",
    }
}

/// 16 色調色盤（xterm 預設值）
const BASIC_PALETTE: [(&str, (u8, u8, u8)); 16] = [
    ("black", (0, 0, 0)),
    ("red", (205, 0, 0)),
    ("green", (0, 205, 0)),
    ("yellow", (205, 205, 0)),
    ("blue", (0, 0, 238)),
    ("magenta", (205, 0, 205)),
    ("cyan", (0, 205, 205)),
    ("white", (229, 229, 229)),
    ("lightblack", (127, 127, 127)),
    ("lightred", (255, 0, 0)),
    ("lightgreen", (0, 255, 0)),
    ("lightyellow", (255, 255, 0)),
    ("lightblue", (92, 92, 255)),
    ("lightmagenta", (255, 0, 255)),
    ("lightcyan", (0, 255, 255)),
    ("lightwhite", (255, 255, 255)),
];

/// 最接近的 16 色名稱
fn nearest_basic(color: Color) -> &'static str {
    let distance = |(r, g, b): (u8, u8, u8)| {
        let dr = i32::from(color.r) - i32::from(r);
        let dg = i32::from(color.g) - i32::from(g);
        let db = i32::from(color.b) - i32::from(b);
        dr * dr + dg * dg + db * db
    };
    BASIC_PALETTE
        .iter()
        .min_by_key(|(_, rgb)| distance(*rgb))
        .map(|(name, _)| *name)
        .unwrap_or("white")
}

/// 避免文字與背景同色
fn adapt_to_background(name: &'static str, background: Background) -> &'static str {
    match (background, name) {
        (Background::Light, "white" | "lightwhite") => "black",
        (Background::Light, "lightyellow") => "yellow",
        (Background::Dark, "black") => "lightblack",
        _ => name,
    }
}

fn font_style_name(font_style: FontStyle) -> Option<&'static str> {
    if font_style.contains(FontStyle::BOLD) {
        Some("bold")
    } else if font_style.contains(FontStyle::ITALIC) {
        Some("italic")
    } else if font_style.contains(FontStyle::UNDERLINE) {
        Some("underline")
    } else {
        None
    }
}

fn font_style_codes(font_style: FontStyle) -> String {
    let mut codes = String::new();
    if font_style.contains(FontStyle::BOLD) {
        codes.push_str("1;");
    }
    if font_style.contains(FontStyle::ITALIC) {
        codes.push_str("3;");
    }
    if font_style.contains(FontStyle::UNDERLINE) {
        codes.push_str("4;");
    }
    codes
}

/// 移除行尾的換行符（\n, \r, \r\n）
#[inline]
fn strip_line_endings(s: &str) -> &str {
    s.strip_suffix("\r\n")
        .or_else(|| s.strip_suffix('\n'))
        .or_else(|| s.strip_suffix('\r'))
        .unwrap_or(s)
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// 語法高亮引擎（formatter + style）
pub struct HighlightEngine {
    format: OutputFormat,
    style_name: &'static str,
    theme: &'static Theme,
    background: Background,
    html_linenos: bool,
    painter: Painter,
}

impl HighlightEngine {
    /// 依 formatter 名稱、style 名稱與背景建立引擎
    pub fn new(format_name: &str, style: Option<&str>, background: Background) -> Result<Self> {
        let format = OutputFormat::from_name(format_name)
            .ok_or_else(|| CcatError::UnknownFormatter(format_name.to_string()))?;

        let requested = style.unwrap_or_else(|| default_style(background));
        let (style_name, theme) =
            find_style(requested).ok_or_else(|| CcatError::UnknownStyle(requested.to_string()))?;

        log::debug!(
            "Formatter args for {}: style={}, bg={:?}",
            format.name(),
            style_name,
            background
        );

        Ok(Self {
            format,
            style_name,
            theme,
            background,
            html_linenos: false,
            painter: Painter::new(true),
        })
    }

    /// HTML 自己輸出行號
    pub fn with_html_linenos(mut self, enabled: bool) -> Self {
        self.html_linenos = enabled;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn style_name(&self) -> &'static str {
        self.style_name
    }

    /// 高亮整份內容；輸出以換行結尾
    pub fn highlight(&self, content: &str, syntax: &SyntaxReference) -> String {
        if self.format == OutputFormat::Html {
            return self.highlight_html(content, syntax);
        }

        let mut highlighter = HighlightLines::new(syntax, self.theme);
        let mut output = String::with_capacity(content.len() * 2);

        for line in LinesWithEndings::from(content) {
            match highlighter.highlight_line(line, &SYNTAX_SET) {
                Ok(ranges) => output.push_str(&self.ranges_to_ansi(&ranges)),
                Err(e) => {
                    // 降級為純文字
                    log::warn!("Syntax highlighting failed: {}", e);
                    output.push_str(strip_line_endings(line));
                }
            }
            output.push('\n');
        }

        output
    }

    fn ranges_to_ansi(&self, ranges: &[(Style, &str)]) -> String {
        match self.format {
            OutputFormat::Terminal => self.ranges_to_basic(ranges),
            _ => self.ranges_to_extended(ranges),
        }
    }

    /// 16 色：每個 token 透過 Painter 組出色碼
    fn ranges_to_basic(&self, ranges: &[(Style, &str)]) -> String {
        let mut output = String::with_capacity(256);

        for (style, text) in ranges {
            let clean = strip_line_endings(text);
            if clean.is_empty() {
                continue;
            }
            if clean.trim().is_empty() {
                output.push_str(clean);
                continue;
            }

            let fore = adapt_to_background(nearest_basic(style.foreground), self.background);
            let spec = ColorSpec {
                fore: Some(fore),
                back: None,
                style: font_style_name(style.font_style),
            };
            output.push_str(&self.painter.wrap(clean, spec));
        }

        output
    }

    /// 256 色 / 真彩色：只在顏色變化時輸出色碼
    fn ranges_to_extended(&self, ranges: &[(Style, &str)]) -> String {
        let mut output = String::with_capacity(256);
        let mut last: Option<(Color, FontStyle)> = None;

        for (style, text) in ranges {
            let clean = strip_line_endings(text);
            if clean.is_empty() {
                continue;
            }

            let fg = style.foreground;
            let current = (fg, style.font_style);
            if last != Some(current) {
                // 字型樣式可能變少，先 reset
                if last.is_some() {
                    output.push_str(CLOSE);
                }
                let fonts = font_style_codes(style.font_style);
                if self.format == OutputFormat::TrueColor {
                    let _ = write!(output, "{}{}38;2;{};{};{}m", CSI, fonts, fg.r, fg.g, fg.b);
                } else {
                    let code = ansi_colours::ansi256_from_rgb((fg.r, fg.g, fg.b));
                    let _ = write!(output, "{}{}38;5;{}m", CSI, fonts, code);
                }
                last = Some(current);
            }

            output.push_str(clean);
        }

        // 只在有輸出色碼時才需要 reset
        if last.is_some() {
            output.push_str(CLOSE);
        }

        output
    }

    /// 完整 HTML 文件
    fn highlight_html(&self, content: &str, syntax: &SyntaxReference) -> String {
        let mut highlighter = HighlightLines::new(syntax, self.theme);
        let (mut body, background) = start_highlighted_html_snippet(self.theme);

        let lines: Vec<&str> = LinesWithEndings::from(content).collect();
        let width = digit_count(lines.len());

        for (index, line) in lines.iter().enumerate() {
            if self.html_linenos {
                let _ = write!(
                    body,
                    "<span class=\"lineno\" style=\"color:#888888;\">{:>width$} </span>",
                    index + 1,
                    width = width
                );
            }

            let rendered = highlighter
                .highlight_line(line, &SYNTAX_SET)
                .map_err(|e| e.to_string())
                .and_then(|ranges| {
                    let mut html = String::new();
                    append_highlighted_html_for_styled_line(
                        &ranges,
                        IncludeBackground::IfDifferent(background),
                        &mut html,
                    )
                    .map(|_| html)
                    .map_err(|e| e.to_string())
                });
            match rendered {
                Ok(html) => body.push_str(&html),
                Err(e) => {
                    log::warn!("Syntax highlighting failed: {}", e);
                    body.push_str(&escape_html(line));
                }
            }
        }
        if !body.ends_with('\n') {
            body.push('\n');
        }
        body.push_str("</pre>");

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
             <title>ColorCat</title>\n</head>\n\
             <body style=\"background-color:#{:02x}{:02x}{:02x};\">\n{}\n</body>\n</html>\n",
            background.r, background.g, background.b, body
        )
    }
}
