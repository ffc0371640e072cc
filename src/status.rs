//! 狀態與錯誤訊息
//!
//! 狀態訊息只寫到第一個可用的終端（stdout 優先，其次 stderr），
//! 不值得被導向到檔案；錯誤訊息一律寫到 stderr。

use crate::color::{ColorSpec, Painter};
use crate::context::Terminals;
use crate::error::CcatError;
use std::error::Error;
use std::io::{self, Write};

pub struct Reporter {
    terminals: Terminals,
}

impl Reporter {
    pub fn new(terminals: Terminals) -> Self {
        Self { terminals }
    }

    /// 一般狀態訊息，`value` 會以粗體藍色接在訊息後
    pub fn status(&self, msg: &str, value: Option<&str>) {
        let line = render_status(&Painter::new(true), msg, value);
        if self.terminals.stdout {
            let _ = writeln!(io::stdout(), "{}", line);
        } else if self.terminals.stderr {
            let _ = writeln!(io::stderr(), "{}", line);
        }
    }

    /// 錯誤訊息（含錯誤鏈與提示指令）
    pub fn error(&self, err: &CcatError) {
        let painter = Painter::new(self.terminals.stderr);
        let _ = write!(io::stderr(), "{}", render_error(&painter, err));
    }

    /// 使用方式錯誤：訊息加上著色的用法
    pub fn usage_error(&self, err: &CcatError, usage: &str) {
        let painter = Painter::new(self.terminals.stderr);
        let _ = writeln!(
            io::stderr(),
            "{}\n{}",
            painter.paint(&err.to_string(), "red"),
            usage
        );
    }
}

pub fn render_status(painter: &Painter, msg: &str, value: Option<&str>) -> String {
    let mut line = painter.paint(msg, "cyan");
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        line.push(' ');
        line.push_str(&painter.wrap(value, ColorSpec::fore("blue").with_style("bold")));
    }
    line
}

pub fn render_error(painter: &Painter, err: &CcatError) -> String {
    let mut out = format!("\n{}\n", painter.paint(&err.to_string(), "red"));

    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(&painter.wrap(
            &cause.to_string(),
            ColorSpec::fore("red").with_style("bold"),
        ));
        out.push('\n');
        source = cause.source();
    }

    if let Some(hint) = err.hint() {
        out.push_str(&painter.paint(hint, "cyan"));
        out.push('\n');
    }
    out
}
