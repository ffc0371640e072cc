mod logger;

pub use logger::init_logger;

use unicode_width::UnicodeWidthChar;

/// 計算字符串的視覺寬度（考慮寬字元）
/// 中文字元等寬字元會正確計算為 2，ASCII 字元計算為 1
pub fn visual_width(s: &str) -> usize {
    s.chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(1))
        .sum()
}

/// 數字的位數（行號欄寬）
pub fn digit_count(mut n: usize) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}
