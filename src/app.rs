//! 主流程：依解析後的指令分派

use crate::cli::{self, CliOptions, Command};
use crate::color::Painter;
use crate::config::{self, config_path, EffectiveConfig};
use crate::context::AppContext;
use crate::error::{CcatError, Result};
use crate::highlight::{HighlightEngine, LexerResolver};
use crate::listing;
use crate::printer::{FilePrinter, PrintSettings};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// 執行指令，回傳結束碼
pub fn run(ctx: &AppContext, command: Command) -> i32 {
    let result = match command {
        Command::Help => print_text(&cli::render_help(&Painter::new(ctx.terminals.stdout))),
        Command::Version => print_text(&cli::version_string()),
        Command::List { kind, pattern } => {
            let stdout = io::stdout();
            let stderr = io::stderr();
            listing::run(kind, pattern.as_deref(), &mut stdout.lock(), &mut stderr.lock())
        }
        Command::Print(options) => print_files(ctx, &options, &config_path()),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            ctx.reporter.error(&err);
            1
        }
    }
}

fn print_text(text: &str) -> Result<i32> {
    writeln!(io::stdout(), "{}", text).map_err(CcatError::Write)?;
    Ok(0)
}

/// 列印所有輸入；全部成功且未指定 --nosave 時保存設定
pub fn print_files(ctx: &AppContext, options: &CliOptions, persisted_path: &Path) -> Result<i32> {
    let config = config::resolve(options, persisted_path, ctx.terminals, ctx.debug);

    // 無效的 style / formatter / lexer 名稱在讀任何檔案前就失敗
    let engine = build_engine(&config)?;
    check_lexer(&config)?;
    if ctx.debug {
        ctx.reporter.status("Formatter:", Some(engine.format().name()));
        ctx.reporter.status("Style:", Some(engine.style_name()));
    }

    let engine = if config.nocolors {
        log::debug!("Colors disabled, printing raw content.");
        None
    } else {
        Some(&engine)
    };
    let lexers = LexerResolver::new(&config.ext_lexers);

    let stdout = io::stdout();
    let stdin = io::stdin();
    let mut printer = FilePrinter::new(
        PrintSettings::from_config(&config),
        engine,
        &lexers,
        &ctx.reporter,
        BufWriter::new(stdout.lock()),
        stdin.lock(),
    );
    let summary = printer.print_all(&config.inputs);
    drop(printer);
    log::debug!("Print summary: {:?}", summary);

    if !summary.success() {
        return Ok(1);
    }

    if options.nosave {
        log::debug!("Not saving config (--nosave).");
    } else {
        save_config(ctx, &config, persisted_path);
    }
    Ok(0)
}

/// 停用顏色時同樣建立，用來驗證名稱
fn build_engine(config: &EffectiveConfig) -> Result<HighlightEngine> {
    let engine = HighlightEngine::new(
        config.format_name(),
        config.style.as_deref(),
        config.background_mode(),
    )?;
    Ok(engine.with_html_linenos(config.html_linenos))
}

/// 指定的 lexer 必須對每個輸入都有效，不論是否著色
fn check_lexer(config: &EffectiveConfig) -> Result<()> {
    let Some(name) = config.lexer.as_deref().filter(|_| !config.guess) else {
        return Ok(());
    };
    for input in &config.inputs {
        LexerResolver::resolve_explicit(name, input.path())?;
    }
    Ok(())
}

/// 保存失敗只回報，不影響結束碼
fn save_config(ctx: &AppContext, config: &EffectiveConfig, path: &Path) {
    match config::persist(config, path) {
        Ok(true) => {
            if ctx.debug {
                let path = path.display().to_string();
                ctx.reporter.status("Config saved to:", Some(&path));
            }
        }
        Ok(false) => {}
        Err(err) => ctx.reporter.error(&err),
    }
}
