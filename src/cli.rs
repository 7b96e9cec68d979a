use clap::{App, Arg, ArgMatches};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use crate::diagnostics::TracingConfig;

// Exit Codes for different types of errors
pub const ERR_IO_ERROR: i32 = 1;
pub const ERR_LEXER_ERROR: i32 = 2;
pub const ERR_PARSER_ERROR: i32 = 3;
pub const ERR_TRANSLATION_ERROR: i32 = 4;
pub const ERR_MANIFEST_WRITE_ERROR: i32 = 5;
pub const ERR_INVALID_ARGUMENT: i32 = 6;

/// The stage after which compilation stops.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Stage {
    Lexer,
    Parser,
    Translate,
}

pub fn print_errs(errs: &[String]) {
    for e in errs {
        eprintln!("{}", e);
    }
}

pub fn configure_cli() -> clap::App<'static, 'static> {
    let app = App::new("minicc")
        .version("0.1.0")
        .author("Erich Ess")
        .about("Compiles a small subset of C into 32-bit x86 assembly for use by the NASM assembler")
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .takes_value(true)
                .required(true)
                .help("Source code file to compile"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .required(true)
                .help("Name the output file that the assembly will be written to"),
        )
        .arg(
            Arg::with_name("stage")
                .long("stage")
                .possible_values(&["lexer", "parser", "translate"])
                .takes_value(true)
                .help("Stops compilation after the given stage. Nothing is written when stopping before translate")
        )
        .arg(
            Arg::with_name("manifest")
                .long("manifest")
                .takes_value(false)
                .help("Write a manifest file listing the global variables and functions of the program next to the output file.")
        )
        .arg(
            Arg::with_name("log-level")
                .long("log-level")
                .possible_values(&["error", "warn", "info", "debug", "trace"])
                .takes_value(true)
                .help("Writes log messages of the given level and above to stderr")
        )
        .arg(
            Arg::with_name("trace-lexer")
                .long("trace-lexer")
                .takes_value(true)
                .help("Prints out a trace of all the steps the lexer follows as it converts the source text into tokens.  The current character is printed next to the step.
                Takes the same line ranges as --trace-parser.")
        )
        .arg(
            Arg::with_name("trace-parser")
                .long("trace-parser")
                .takes_value(true)
                .help("Prints out a trace of all the steps the parser follows as it converts the token vector into an AST.  The current token is printed next to the step.
                Takes `all`, a line `N`, or a range of lines `N:`, `:N` or `N:M`.")
        );
    app
}

pub fn get_stage(args: &ArgMatches) -> Result<Option<Stage>, String> {
    match args.value_of("stage") {
        None => Ok(None),
        Some("lexer") => Ok(Some(Stage::Lexer)),
        Some("parser") => Ok(Some(Stage::Parser)),
        Some("translate") => Ok(Some(Stage::Translate)),
        Some(s) => Err(format!("Unknown stage: {}", s)),
    }
}

pub fn get_log_level(args: &ArgMatches) -> Option<LevelFilter> {
    match args.value_of("log-level") {
        Some("error") => Some(LevelFilter::Error),
        Some("warn") => Some(LevelFilter::Warn),
        Some("info") => Some(LevelFilter::Info),
        Some("debug") => Some(LevelFilter::Debug),
        Some("trace") => Some(LevelFilter::Trace),
        _ => None,
    }
}

pub fn configure_logging(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
}

fn get_tracing(args: &ArgMatches, name: &str) -> Result<TracingConfig, String> {
    match args.value_of(name) {
        None => Ok(TracingConfig::Off),
        Some(range) => range.parse(),
    }
}

pub fn get_lexer_tracing(args: &ArgMatches) -> Result<TracingConfig, String> {
    get_tracing(args, "trace-lexer")
}

pub fn get_parser_tracing(args: &ArgMatches) -> Result<TracingConfig, String> {
    get_tracing(args, "trace-parser")
}
