//! 命令列旗標
//!
//! 旗標以靜態的 `FlagSpec` 表描述；解析（pico-args）與說明文字
//! 都從同一份表產生。

use crate::color::{Align, ColorSpec, Painter};
use crate::error::{CcatError, Result};
use pico_args::Arguments;
use std::ffi::OsString;

pub const NAME: &str = "ColorCat";
pub const SCRIPT: &str = "ccat";

pub fn version_string() -> String {
    format!("{} v. {}", NAME, env!("CARGO_PKG_VERSION"))
}

/// 一個旗標的描述
#[derive(Debug, Clone, Copy)]
pub struct FlagSpec {
    pub short: Option<&'static str>,
    pub long: &'static str,
    /// 需要值時的佔位名稱
    pub value: Option<&'static str>,
    pub help: &'static [&'static str],
}

impl FlagSpec {
    /// 說明文字左欄，例如 `-s name,--style name`
    pub fn label(&self) -> String {
        let with_value = |flag: &str| match self.value {
            Some(value) => format!("{} {}", flag, value),
            None => flag.to_string(),
        };
        match self.short {
            Some(short) => format!("{},{}", with_value(short), with_value(self.long)),
            None => with_value(self.long),
        }
    }

    fn contains(&self, args: &mut Arguments) -> bool {
        match self.short {
            Some(short) => args.contains([short, self.long]),
            None => args.contains(self.long),
        }
    }

    fn value(&self, args: &mut Arguments) -> Result<Option<String>> {
        let value = match self.short {
            Some(short) => args.opt_value_from_str([short, self.long]),
            None => args.opt_value_from_str(self.long),
        };
        value.map_err(|e| CcatError::InvalidArgument(e.to_string()))
    }
}

pub const BACKGROUND: FlagSpec = FlagSpec {
    short: Some("-b"),
    long: "--background",
    value: Some("style"),
    help: &["Either 'light', or 'dark'.", "Changes the highlight style."],
};
pub const COLORS: FlagSpec = FlagSpec {
    short: Some("-c"),
    long: "--colors",
    value: None,
    help: &["Force colors, even when piping output."],
};
pub const NOCOLORS: FlagSpec = FlagSpec {
    short: Some("-C"),
    long: "--nocolors",
    value: None,
    help: &["Don't use colors."],
};
pub const DEBUG: FlagSpec = FlagSpec {
    short: Some("-D"),
    long: "--debug",
    value: None,
    help: &["Debug mode. Show more info."],
};
pub const FORMAT: FlagSpec = FlagSpec {
    short: Some("-f"),
    long: "--format",
    value: Some("name"),
    help: &["Format for output.", "Default: terminal"],
};
pub const FORMATTERS: FlagSpec = FlagSpec {
    short: Some("-F"),
    long: "--formatters",
    value: None,
    help: &["List all available formatters."],
};
pub const GUESS: FlagSpec = FlagSpec {
    short: Some("-g"),
    long: "--guess",
    value: None,
    help: &["Guess lexer by file content."],
};
pub const HELP: FlagSpec = FlagSpec {
    short: Some("-h"),
    long: "--help",
    value: None,
    help: &["Show this help message."],
};
pub const LEXER: FlagSpec = FlagSpec {
    short: Some("-l"),
    long: "--lexer",
    value: Some("name"),
    help: &["Use this language/lexer name."],
};
pub const LEXERS: FlagSpec = FlagSpec {
    short: Some("-L"),
    long: "--lexers",
    value: None,
    help: &["List all known lexer names."],
};
pub const LINENOS: FlagSpec = FlagSpec {
    short: Some("-n"),
    long: "--linenos",
    value: None,
    help: &["Print line numbers."],
};
pub const NOLINENOS: FlagSpec = FlagSpec {
    short: Some("-N"),
    long: "--nolinenos",
    value: None,
    help: &["Don't print line numbers.", "Overrides config setting."],
};
pub const NOSAVE: FlagSpec = FlagSpec {
    short: None,
    long: "--nosave",
    value: None,
    help: &["Don't save options in config file."],
};
pub const PRINTNAMES: FlagSpec = FlagSpec {
    short: Some("-p"),
    long: "--printnames",
    value: None,
    help: &["Print file names."],
};
pub const STYLE: FlagSpec = FlagSpec {
    short: Some("-s"),
    long: "--style",
    value: Some("name"),
    help: &["Use this style (theme) name."],
};
pub const STYLES: FlagSpec = FlagSpec {
    short: Some("-S"),
    long: "--styles",
    value: None,
    help: &["List all known style names."],
};
pub const VERSION: FlagSpec = FlagSpec {
    short: Some("-v"),
    long: "--version",
    value: None,
    help: &["Show version."],
};

/// 說明文字中的旗標順序
pub const FLAGS: &[FlagSpec] = &[
    BACKGROUND, COLORS, NOCOLORS, DEBUG, FORMAT, FORMATTERS, GUESS, HELP, LEXER, LEXERS, LINENOS,
    NOLINENOS, NOSAVE, PRINTNAMES, STYLE, STYLES, VERSION,
];

/// 位置參數
pub const POSITIONALS: &[(&str, &[&str])] = &[
    (
        "FILE",
        &[
            "One or many files to print.",
            "When - is given, or no FILEs are given,",
            "use stdin.",
        ],
    ),
    (
        "PATTERN",
        &[
            "Only list items with this regex/text",
            "pattern in the name or description.",
        ],
    ),
];

/// 用法；`{}` 為程式名稱，其餘為接續行
const USAGE: &[&str] = &[
    "{} -h | -v",
    "{} [FILE...] [-b style] [-f name] [-g | -l name] [-s name]",
    "     [-c | -C] [-D] [-n | -N] [-p] [--nosave]",
    "{} (-F | -L | -S) [PATTERN]",
];

const INDENT: &str = "    ";
const LABEL_WIDTH: usize = 29;

/// 列印檔案時的選項
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub files: Vec<String>,
    pub background: Option<String>,
    pub format: Option<String>,
    pub lexer: Option<String>,
    pub style: Option<String>,
    pub guess: bool,
    pub linenos: bool,
    pub nolinenos: bool,
    pub printnames: bool,
    pub colors: bool,
    pub nocolors: bool,
    pub nosave: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Lexers,
    Styles,
    Formatters,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Version,
    List {
        kind: ListKind,
        pattern: Option<String>,
    },
    Print(CliOptions),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArgs {
    pub debug: bool,
    pub command: Command,
}

fn conflict(a: &FlagSpec, b: &FlagSpec) -> CcatError {
    CcatError::InvalidArgument(format!("{} and {} cannot be used together", a.long, b.long))
}

pub fn parse_args<I>(args: I) -> Result<ParsedArgs>
where
    I: IntoIterator<Item = OsString>,
{
    // `--` 之後的一切都視為檔名，不交給旗標解析
    let mut raw: Vec<OsString> = args.into_iter().collect();
    let trailing = match raw.iter().position(|arg| arg == "--") {
        Some(index) => {
            let trailing = raw.split_off(index + 1);
            raw.pop();
            trailing
        }
        None => Vec::new(),
    };
    let mut args = Arguments::from_vec(raw);

    let help = HELP.contains(&mut args);
    let version = VERSION.contains(&mut args);
    let debug = DEBUG.contains(&mut args);
    let lexers = LEXERS.contains(&mut args);
    let styles = STYLES.contains(&mut args);
    let formatters = FORMATTERS.contains(&mut args);

    let mut options = CliOptions {
        files: Vec::new(),
        background: BACKGROUND.value(&mut args)?,
        format: FORMAT.value(&mut args)?,
        lexer: LEXER.value(&mut args)?,
        style: STYLE.value(&mut args)?,
        guess: GUESS.contains(&mut args),
        linenos: LINENOS.contains(&mut args),
        nolinenos: NOLINENOS.contains(&mut args),
        printnames: PRINTNAMES.contains(&mut args),
        colors: COLORS.contains(&mut args),
        nocolors: NOCOLORS.contains(&mut args),
        nosave: NOSAVE.contains(&mut args),
    };
    let mut free = free_args(args.finish(), false)?;
    free.extend(free_args(trailing, true)?);

    let command = if help {
        Command::Help
    } else if version {
        Command::Version
    } else if lexers || styles || formatters {
        let kinds = [
            (lexers, ListKind::Lexers),
            (styles, ListKind::Styles),
            (formatters, ListKind::Formatters),
        ];
        let mut selected = kinds.iter().filter(|(on, _)| *on).map(|(_, kind)| *kind);
        let kind = selected.next().unwrap_or(ListKind::Lexers);
        if selected.next().is_some() {
            return Err(CcatError::InvalidArgument(
                "only one of --formatters, --lexers, --styles may be used".to_string(),
            ));
        }
        if free.len() > 1 {
            return Err(CcatError::InvalidArgument(
                "only one PATTERN may be given".to_string(),
            ));
        }
        Command::List {
            kind,
            pattern: free.into_iter().next(),
        }
    } else {
        if options.guess && options.lexer.is_some() {
            return Err(conflict(&GUESS, &LEXER));
        }
        if options.colors && options.nocolors {
            return Err(conflict(&COLORS, &NOCOLORS));
        }
        if options.linenos && options.nolinenos {
            return Err(conflict(&LINENOS, &NOLINENOS));
        }
        options.files = free;
        Command::Print(options)
    };

    Ok(ParsedArgs { debug, command })
}

/// 剩餘的位置參數；`only_files` 時不檢查未知旗標
fn free_args(rest: Vec<OsString>, only_files: bool) -> Result<Vec<String>> {
    let mut free = Vec::with_capacity(rest.len());

    for arg in rest {
        let arg = arg.into_string().map_err(|raw| {
            CcatError::InvalidArgument(format!("not valid unicode: {}", raw.to_string_lossy()))
        })?;

        if !only_files && arg.starts_with('-') && arg != "-" {
            return Err(CcatError::InvalidArgument(format!("unknown option: {}", arg)));
        }
        free.push(arg);
    }
    Ok(free)
}

/// 著色的用法區塊
pub fn render_usage(painter: &Painter) -> String {
    let mut out = painter.wrap("Usage:", ColorSpec::style("bold"));
    for line in USAGE {
        out.push('\n');
        out.push_str(INDENT);
        out.push_str(&line.replace("{}", &painter.paint(SCRIPT, "green")));
    }
    out
}

/// 完整說明文字，由旗標表產生
pub fn render_help(painter: &Painter) -> String {
    let mut out = painter.wrap(&version_string(), ColorSpec::fore("red").with_style("bold"));
    out.push('\n');
    out.push_str(&render_usage(painter));
    out.push_str("\n\n");
    out.push_str(&painter.wrap("Options:", ColorSpec::style("bold")));

    let rows = POSITIONALS
        .iter()
        .map(|(name, help)| (name.to_string(), *help))
        .chain(FLAGS.iter().map(|flag| (flag.label(), flag.help)));

    for (label, help) in rows {
        out.push('\n');
        out.push_str(INDENT);
        let label = painter.justify(&label, LABEL_WIDTH, Align::Left, ' ', ColorSpec::fore("blue"));
        out.push_str(&label);

        let mut lines = help.iter();
        if let Some(first) = lines.next() {
            out.push_str(": ");
            out.push_str(&painter.paint(first, "green"));
        }
        for line in lines {
            out.push('\n');
            out.push_str(&" ".repeat(INDENT.len() + LABEL_WIDTH + 2));
            out.push_str(&painter.paint(line, "green"));
        }
    }
    out
}
