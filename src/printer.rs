//! 檔案輸出
//!
//! 每個輸入：開啟 -> 讀取 -> （選擇 lexer）-> 高亮 -> 加行號或原樣輸出。
//! 開啟或讀取失敗只影響該輸入，其他輸入照常處理。
//! stdin 每次執行最多讀一次，之後的請求直接略過。

use crate::color::{ColorSpec, Painter};
use crate::config::EffectiveConfig;
use crate::error::{CcatError, Result};
use crate::highlight::{HighlightEngine, LexerResolver};
use crate::status::Reporter;
use crate::utils::digit_count;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// 行號分隔符號的 256 色索引
const SEPARATOR_COLOR: i64 = 245;

/// 一個輸入來源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    /// 空字串或 `-` 代表 stdin
    pub fn from_arg(arg: &str) -> Self {
        let arg = arg.trim();
        if arg.is_empty() || arg == "-" {
            Input::Stdin
        } else {
            Input::File(PathBuf::from(arg))
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Input::Stdin => "stdin".to_string(),
            Input::File(path) => path.display().to_string(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Input::Stdin => None,
            Input::File(path) => Some(path),
        }
    }
}

/// 所有輸入共用的列印設定
#[derive(Debug, Clone, Default)]
pub struct PrintSettings {
    pub number_lines: bool,
    pub printnames: bool,
    pub lexer: Option<String>,
    pub guess: bool,
    /// stdin 與 stdout 都是終端時提示如何結束輸入
    pub stdin_prompt: bool,
    pub debug: bool,
}

impl PrintSettings {
    pub fn from_config(config: &EffectiveConfig) -> Self {
        Self {
            number_lines: config.number_lines,
            printnames: config.printnames,
            lexer: config.lexer.clone(),
            guess: config.guess,
            stdin_prompt: config.stdin_tty && config.stdout_tty,
            debug: config.debug,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrintSummary {
    pub printed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl PrintSummary {
    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Printed,
    Skipped,
}

pub struct FilePrinter<'a, W: Write, R: Read> {
    settings: PrintSettings,
    /// None 代表停用顏色，直接輸出原始位元組
    engine: Option<&'a HighlightEngine>,
    lexers: &'a LexerResolver,
    reporter: &'a Reporter,
    painter: Painter,
    out: W,
    stdin: R,
    stdin_consumed: bool,
}

impl<'a, W: Write, R: Read> FilePrinter<'a, W, R> {
    pub fn new(
        settings: PrintSettings,
        engine: Option<&'a HighlightEngine>,
        lexers: &'a LexerResolver,
        reporter: &'a Reporter,
        out: W,
        stdin: R,
    ) -> Self {
        Self {
            settings,
            engine,
            lexers,
            reporter,
            painter: Painter::new(engine.is_some()),
            out,
            stdin,
            stdin_consumed: false,
        }
    }

    /// 依序列印所有輸入，錯誤逐項回報
    pub fn print_all(&mut self, inputs: &[Input]) -> PrintSummary {
        let mut summary = PrintSummary::default();

        for input in inputs {
            match self.print_input(input) {
                Ok(Outcome::Printed) => summary.printed += 1,
                Ok(Outcome::Skipped) => summary.skipped += 1,
                Err(CcatError::Write(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
                    // 下游已關閉（例如 `| head`），安靜結束
                    log::debug!("Output closed, stopping.");
                    break;
                }
                Err(err) => {
                    self.reporter.error(&err);
                    summary.failed += 1;
                }
            }
        }

        summary
    }

    pub fn print_input(&mut self, input: &Input) -> Result<Outcome> {
        let bytes = match input {
            Input::Stdin => {
                if self.stdin_consumed {
                    log::debug!("stdin was already read, skipping.");
                    if self.settings.debug {
                        self.reporter.status("stdin was already read, skipping.", None);
                    }
                    return Ok(Outcome::Skipped);
                }
                self.stdin_consumed = true;

                if self.settings.stdin_prompt {
                    self.reporter
                        .status("\nUsing stdin, press CTRL + D for end of file.", None);
                }
                self.read_stdin()?
            }
            Input::File(path) => read_file(path)?,
        };

        // 名稱標頭在 lexer 確定之後才輸出
        match self.engine {
            Some(engine) => self.print_highlighted(engine, input, &bytes)?,
            None => {
                self.print_name(input)?;
                self.print_raw(&bytes)?;
            }
        }
        self.out.flush().map_err(CcatError::Write)?;

        Ok(Outcome::Printed)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn read_stdin(&mut self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.stdin
            .read_to_end(&mut bytes)
            .map_err(|source| CcatError::Read {
                name: "stdin".to_string(),
                source,
            })?;
        Ok(bytes)
    }

    fn print_name(&mut self, input: &Input) -> Result<()> {
        if !self.settings.printnames {
            return Ok(());
        }
        let name = self.painter.paint(&input.display_name(), "blue");
        writeln!(self.out, "\n{}:", name).map_err(CcatError::Write)
    }

    /// 行號前綴：依總行數補零對齊
    fn line_prefix(&self, number: usize, width: usize) -> Result<String> {
        let number = self.painter.wrap(
            &format!("{:0width$}", number, width = width),
            ColorSpec::fore("cyan"),
        );
        let separator = self
            .painter
            .wrap_extended(":", Some(SEPARATOR_COLOR), None, None)?;
        Ok(format!("{}{} ", number, separator))
    }

    fn print_highlighted(
        &mut self,
        engine: &HighlightEngine,
        input: &Input,
        bytes: &[u8],
    ) -> Result<()> {
        let content = decode(&input.display_name(), bytes);

        let lexer = self.lexers.resolve(
            self.settings.lexer.as_deref(),
            input.path(),
            &content,
            self.settings.guess,
        )?;
        log::debug!("lexer: {} ({:?})", lexer.name(), lexer.origin);
        if self.settings.debug {
            self.reporter.status("lexer:", Some(lexer.name()));
        }
        self.print_name(input)?;

        let highlighted = engine.highlight(&content, lexer.syntax);
        let mut lines: Vec<&str> = highlighted.split('\n').collect();
        // 高亮輸出多出的最後一個空行
        if lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        if self.settings.number_lines {
            let width = digit_count(lines.len());
            for (index, line) in lines.iter().enumerate() {
                let prefix = self.line_prefix(index + 1, width)?;
                writeln!(self.out, "{}{}", prefix, line).map_err(CcatError::Write)?;
            }
        } else {
            for line in lines {
                writeln!(self.out, "{}", line).map_err(CcatError::Write)?;
            }
        }
        Ok(())
    }

    /// 不經過高亮，保留原始內容
    fn print_raw(&mut self, bytes: &[u8]) -> Result<()> {
        if !self.settings.number_lines {
            return self.out.write_all(bytes).map_err(CcatError::Write);
        }

        let mut lines: Vec<&[u8]> = bytes.split(|b| *b == b'\n').collect();
        if lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        let width = digit_count(lines.len());
        for (index, line) in lines.iter().enumerate() {
            let prefix = self.line_prefix(index + 1, width)?;
            self.out
                .write_all(prefix.as_bytes())
                .and_then(|_| self.out.write_all(line))
                .and_then(|_| self.out.write_all(b"\n"))
                .map_err(CcatError::Write)?;
        }
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    let read_err = |source: io::Error| CcatError::Read {
        name: path.display().to_string(),
        source,
    };

    // 檔案在這個區塊結束時關閉
    let mut file = File::open(path).map_err(read_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(read_err)?;
    Ok(bytes)
}

/// 解碼為 UTF-8（依 BOM 判斷 UTF-16），無效序列以替代字元取代
fn decode(name: &str, bytes: &[u8]) -> String {
    let (text, encoding, had_errors) = encoding_rs::UTF_8.decode(bytes);
    if encoding != encoding_rs::UTF_8 {
        log::debug!("Decoded {} as {}", name, encoding.name());
    }
    if had_errors {
        log::warn!("Encoding errors detected in: {}", name);
    }
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Background;
    use crate::context::Terminals;
    use std::collections::BTreeMap;
    use std::io::Cursor;

    fn strip(s: &str) -> String {
        let mut out = String::new();
        let mut chars = s.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch == '\x1b' && chars.peek() == Some(&'[') {
                for c in chars.by_ref() {
                    if c.is_ascii_alphabetic() {
                        break;
                    }
                }
                continue;
            }
            out.push(ch);
        }
        out
    }

    fn numbered_lines(count: usize) -> String {
        (1..=count).map(|i| format!("line {}\n", i)).collect()
    }

    struct Fixture {
        lexers: LexerResolver,
        reporter: Reporter,
        engine: HighlightEngine,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                lexers: LexerResolver::new(&BTreeMap::new()),
                reporter: Reporter::new(Terminals::none()),
                engine: HighlightEngine::new("terminal", None, Background::Dark).unwrap(),
            }
        }

        fn run(
            &self,
            settings: PrintSettings,
            colors: bool,
            stdin: &str,
            inputs: &[Input],
        ) -> (String, PrintSummary) {
            let engine = colors.then_some(&self.engine);
            let mut printer = FilePrinter::new(
                settings,
                engine,
                &self.lexers,
                &self.reporter,
                Vec::new(),
                Cursor::new(stdin.as_bytes().to_vec()),
            );
            let summary = printer.print_all(inputs);
            let out = String::from_utf8(printer.into_inner()).unwrap();
            (out, summary)
        }
    }

    #[test]
    fn test_input_from_arg() {
        assert_eq!(Input::from_arg("-"), Input::Stdin);
        assert_eq!(Input::from_arg("  "), Input::Stdin);
        assert_eq!(Input::from_arg(" a.rs "), Input::File(PathBuf::from("a.rs")));
    }

    #[test]
    fn test_stdin_read_once() {
        let fixture = Fixture::new();
        let settings = PrintSettings {
            printnames: true,
            ..Default::default()
        };

        let (out, summary) = fixture.run(settings, false, "hello\n", &[Input::Stdin, Input::Stdin]);
        assert_eq!(out, "\nstdin:\nhello\n");
        assert_eq!(summary.printed, 1);
        assert_eq!(summary.skipped, 1);
        assert!(summary.success());
    }

    #[test]
    fn test_raw_output_is_exact() {
        let fixture = Fixture::new();
        let content = "a\r\n\tb  \n\nno newline";
        let (out, _) = fixture.run(PrintSettings::default(), false, content, &[Input::Stdin]);
        assert_eq!(out, content);
    }

    #[test]
    fn test_raw_invalid_utf8_preserved() {
        let fixture = Fixture::new();
        let lexers = &fixture.lexers;
        let bytes = vec![b'a', 0xff, 0xfe, b'\n'];
        let mut printer = FilePrinter::new(
            PrintSettings::default(),
            None,
            lexers,
            &fixture.reporter,
            Vec::new(),
            Cursor::new(bytes.clone()),
        );
        printer.print_all(&[Input::Stdin]);
        assert_eq!(printer.into_inner(), bytes);
    }

    #[test]
    fn test_nine_lines_one_digit() {
        let fixture = Fixture::new();
        let settings = PrintSettings {
            number_lines: true,
            ..Default::default()
        };
        let (out, _) = fixture.run(settings, false, &numbered_lines(9), &[Input::Stdin]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "1: line 1");
        assert_eq!(lines[8], "9: line 9");
    }

    #[test]
    fn test_ten_lines_two_digits() {
        let fixture = Fixture::new();
        let settings = PrintSettings {
            number_lines: true,
            ..Default::default()
        };
        let (out, _) = fixture.run(settings, false, &numbered_lines(10), &[Input::Stdin]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "01: line 1");
        assert_eq!(lines[9], "10: line 10");
    }

    #[test]
    fn test_highlighted_numbers_are_colored() {
        let fixture = Fixture::new();
        let settings = PrintSettings {
            number_lines: true,
            lexer: Some("rust".into()),
            ..Default::default()
        };
        let (out, summary) = fixture.run(settings, true, &numbered_lines(10), &[Input::Stdin]);
        assert!(summary.success());
        assert!(out.starts_with("\x1b[36m01\x1b[0m\x1b[38;5;245m:\x1b[0m "));
        let plain = strip(&out);
        assert_eq!(plain.lines().count(), 10);
        assert!(plain.starts_with("01: line 1\n"));
    }

    #[test]
    fn test_highlight_drops_trailing_empty_line() {
        let fixture = Fixture::new();
        let settings = PrintSettings {
            lexer: Some("rust".into()),
            ..Default::default()
        };

        let content = "fn a() {}\nfn b() {}\n";
        let (out, _) = fixture.run(settings.clone(), true, content, &[Input::Stdin]);
        assert_eq!(strip(&out), "fn a() {}\nfn b() {}\n");

        // 原本的空白行保留
        let (out, _) = fixture.run(settings, true, "fn a() {}\n\n", &[Input::Stdin]);
        assert_eq!(strip(&out), "fn a() {}\n\n");
    }

    #[test]
    fn test_missing_file_continues() {
        let fixture = Fixture::new();
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present.txt");
        std::fs::write(&present, "here\n").unwrap();

        let inputs = [
            Input::File(dir.path().join("missing.txt")),
            Input::File(present),
        ];
        let (out, summary) = fixture.run(PrintSettings::default(), false, "", &inputs);
        assert_eq!(out, "here\n");
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.printed, 1);
        assert!(!summary.success());
    }

    #[test]
    fn test_bad_lexer_fails_only_that_input() {
        let fixture = Fixture::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.rs");
        std::fs::write(&path, "fn main() {}\n").unwrap();

        let settings = PrintSettings {
            lexer: Some("no-such-lexer".into()),
            printnames: true,
            ..Default::default()
        };
        let inputs = [Input::Stdin, Input::File(path.clone())];
        let (out, summary) = fixture.run(settings, true, "text\n", &inputs);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.printed, 1);

        // 失敗的輸入不留下名稱標頭
        let plain = strip(&out);
        assert!(!plain.contains("stdin:"));
        assert_eq!(plain, format!("\n{}:\nfn main() {{}}\n", path.display()));
    }

    #[test]
    fn test_file_lexer_from_extension() {
        let fixture = Fixture::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.rs");
        std::fs::write(&path, "fn main() {}\n").unwrap();

        let (out, summary) = fixture.run(PrintSettings::default(), true, "", &[Input::File(path)]);
        assert!(summary.success());
        assert!(out.contains("\x1b["));
        assert_eq!(strip(&out), "fn main() {}\n");
    }

    #[test]
    fn test_empty_input() {
        let fixture = Fixture::new();
        let (out, summary) = fixture.run(PrintSettings::default(), true, "", &[Input::Stdin]);
        assert!(summary.success());
        assert!(out.is_empty());
    }

    #[test]
    fn test_decode_utf16_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "hi".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode("utf16.txt", &bytes), "hi");
        assert_eq!(decode("bad.txt", &[b'a', 0xff]), "a\u{fffd}");
    }
}
