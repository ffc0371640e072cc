use anyhow::Result;
use ccat::cli::{self, parse_args};
use ccat::color::Painter;
use ccat::{app, utils, AppContext, Terminals};
use std::env;

fn main() -> Result<()> {
    let terminals = Terminals::detect();

    let parsed = match parse_args(env::args_os().skip(1)) {
        Ok(parsed) => parsed,
        Err(err) => {
            let ctx = AppContext::new(terminals, false);
            let usage = cli::render_usage(&Painter::new(terminals.stderr));
            ctx.reporter.usage_error(&err, &usage);
            std::process::exit(1);
        }
    };

    // 初始化日誌
    utils::init_logger(parsed.debug);

    let ctx = AppContext::new(terminals, parsed.debug);
    let code = app::run(&ctx, parsed.command);
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}
