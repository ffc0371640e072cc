// 應用程式上下文：啟動時建立一次，傳給所有需要的元件

use crate::status::Reporter;
use crossterm::tty::IsTty;
use std::io;

/// 標準串流是否為互動式終端
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Terminals {
    pub stdin: bool,
    pub stdout: bool,
    pub stderr: bool,
}

impl Terminals {
    pub fn detect() -> Self {
        Self {
            stdin: io::stdin().is_tty(),
            stdout: io::stdout().is_tty(),
            stderr: io::stderr().is_tty(),
        }
    }

    /// 所有串流都不是終端（測試、管線）
    pub fn none() -> Self {
        Self::default()
    }
}

pub struct AppContext {
    pub debug: bool,
    pub terminals: Terminals,
    pub reporter: Reporter,
}

impl AppContext {
    pub fn new(terminals: Terminals, debug: bool) -> Self {
        Self {
            debug,
            terminals,
            reporter: Reporter::new(terminals),
        }
    }
}
