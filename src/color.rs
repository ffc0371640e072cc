//! ANSI 色碼組合
//!
//! 將顏色 / 樣式名稱（以及 256 色索引）轉換為 ANSI 控制序列。
//! 所有代碼合併在同一個序列中，樣式代碼永遠排在顏色代碼之前，
//! 避免 reset 樣式覆蓋之後的顏色。

use crate::error::{CcatError, Layer, Result};
use crate::utils::visual_width;

/// Control Sequence Introducer
pub const CSI: &str = "\x1b[";
/// 通用結束序列
pub const CLOSE: &str = "\x1b[0m";

/// 基本八色（索引 0-7）
const BASE_COLORS: [(&str, u16); 8] = [
    ("black", 0),
    ("red", 1),
    ("green", 2),
    ("yellow", 3),
    ("blue", 4),
    ("magenta", 5),
    ("cyan", 6),
    ("white", 7),
];

/// 顏色名稱 -> 代碼；未知名稱回傳 None
fn color_code(layer: Layer, name: &str) -> Option<u16> {
    let name = name.trim().to_ascii_lowercase();
    if name == "reset" {
        return Some(match layer {
            Layer::Fore => 39,
            Layer::Back => 49,
        });
    }

    // 接受 lightred / light-red / light_red
    let (light, base) = match name.strip_prefix("light") {
        Some(rest) => (true, rest.trim_start_matches(['-', '_'])),
        None => (false, name.as_str()),
    };
    let (_, index) = BASE_COLORS.iter().find(|(n, _)| *n == base)?;

    let offset = match (layer, light) {
        (Layer::Fore, false) => 30,
        (Layer::Fore, true) => 90,
        (Layer::Back, false) => 40,
        (Layer::Back, true) => 100,
    };
    Some(offset + index)
}

/// 樣式名稱（含別名）-> 代碼
fn style_code(name: &str) -> Option<u16> {
    let code = match name.trim().to_ascii_lowercase().as_str() {
        "r" | "reset" | "reset_all" => 0,
        "b" | "bright" | "bold" => 1,
        "d" | "dim" => 2,
        "i" | "italic" => 3,
        "u" | "underline" | "underlined" => 4,
        "f" | "flash" => 5,
        "h" | "highlight" | "hilight" | "hilite" | "reverse" => 7,
        "n" | "normal" | "none" => 22,
        _ => return None,
    };
    Some(code)
}

fn sequence(codes: &[String]) -> String {
    format!("{}{}m", CSI, codes.join(";"))
}

/// 一次格式化呼叫的顏色設定
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorSpec<'a> {
    pub fore: Option<&'a str>,
    pub back: Option<&'a str>,
    pub style: Option<&'a str>,
}

impl<'a> ColorSpec<'a> {
    pub fn fore(name: &'a str) -> Self {
        Self {
            fore: Some(name),
            ..Self::default()
        }
    }

    pub fn style(name: &'a str) -> Self {
        Self {
            style: Some(name),
            ..Self::default()
        }
    }

    pub fn with_back(mut self, name: &'a str) -> Self {
        self.back = Some(name);
        self
    }

    pub fn with_style(mut self, name: &'a str) -> Self {
        self.style = Some(name);
        self
    }

    /// 依「樣式、背景、前景」順序組出代碼清單
    fn codes(&self) -> Vec<String> {
        let mut codes = Vec::with_capacity(3);
        if let Some(code) = self.style.and_then(style_code) {
            codes.push(code.to_string());
        }
        if let Some(code) = self.back.and_then(|n| color_code(Layer::Back, n)) {
            codes.push(code.to_string());
        }
        if let Some(code) = self.fore.and_then(|n| color_code(Layer::Fore, n)) {
            codes.push(code.to_string());
        }
        codes
    }
}

/// 已驗證的 256 色索引
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtendedColor(u8);

impl ExtendedColor {
    pub fn new(layer: Layer, value: i64) -> Result<Self> {
        u8::try_from(value)
            .map(ExtendedColor)
            .map_err(|_| CcatError::InvalidExtendedColor {
                layer,
                value: value.to_string(),
            })
    }

    /// 從文字解析（非數字同樣視為錯誤）
    pub fn parse(layer: Layer, value: &str) -> Result<Self> {
        let number = value
            .trim()
            .parse::<i64>()
            .map_err(|_| CcatError::InvalidExtendedColor {
                layer,
                value: value.to_string(),
            })?;
        Self::new(layer, number)
    }

    pub fn index(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// 著色器
///
/// 停用時（輸出不是終端且未強制）所有操作原樣回傳輸入。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// 以開啟序列與結束序列包住文字
    pub fn wrap(&self, text: &str, spec: ColorSpec<'_>) -> String {
        if !self.enabled {
            return text.to_string();
        }
        if text.is_empty() {
            return CLOSE.to_string();
        }
        format!("{}{}{}", sequence(&spec.codes()), text, CLOSE)
    }

    /// 只指定前景色的捷徑
    pub fn paint(&self, text: &str, fore: &str) -> String {
        self.wrap(text, ColorSpec::fore(fore))
    }

    /// 使用 256 色（38;5;N / 48;5;N）
    pub fn wrap_extended(
        &self,
        text: &str,
        fore: Option<i64>,
        back: Option<i64>,
        style: Option<&str>,
    ) -> Result<String> {
        // 驗證不受終端狀態影響
        let fore = fore
            .map(|v| ExtendedColor::new(Layer::Fore, v))
            .transpose()?;
        let back = back
            .map(|v| ExtendedColor::new(Layer::Back, v))
            .transpose()?;

        if !self.enabled {
            return Ok(text.to_string());
        }
        if text.is_empty() {
            return Ok(CLOSE.to_string());
        }

        let mut codes = Vec::with_capacity(3);
        if let Some(code) = style.and_then(style_code) {
            codes.push(code.to_string());
        }
        if let Some(back) = back {
            codes.push(format!("48;5;{}", back.index()));
        }
        if let Some(fore) = fore {
            codes.push(format!("38;5;{}", fore.index()));
        }
        Ok(format!("{}{}{}", sequence(&codes), text, CLOSE))
    }

    /// 對齊到指定寬度；只對文字著色，填充字元保持原樣
    pub fn justify(
        &self,
        text: &str,
        width: usize,
        align: Align,
        pad_char: char,
        spec: ColorSpec<'_>,
    ) -> String {
        let padding: String = std::iter::repeat(pad_char)
            .take(width.saturating_sub(visual_width(text)))
            .collect();
        let colored = self.wrap(text, spec);
        match align {
            Align::Left => colored + &padding,
            Align::Right => padding + &colored,
        }
    }
}
