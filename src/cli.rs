use std::fs::File;

use clap::{App, Arg, ArgMatches};
use log::LevelFilter;
use simplelog::{Config, WriteLogger};

use crate::compiler::ProjectError;

// Exit Codes for different types of errors
pub const ERR_TYPE_CHECK: i32 = 1;
pub const ERR_LOAD_ERROR: i32 = 2;
pub const ERR_PARSER_ERROR: i32 = 3;
pub const ERR_LAYOUT_WRITE_ERROR: i32 = 4;
pub const ERR_LEXER_ERROR: i32 = 5;
pub const ERR_IMPORT_ERROR: i32 = 6;

/// The stage after which the compiler stops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Lexer,
    Parser,
    Semantic,
}

/// The format in which the memory layout is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emit {
    LayoutYaml,
    LayoutJson,
}

pub fn print_errs(errs: &[String]) {
    for e in errs {
        eprintln!("{}", e);
    }
}

pub fn configure_cli() -> clap::App<'static, 'static> {
    App::new("Sprig Compiler")
        .version("0.1.0")
        .about("Verifies Sprig language files and computes the memory layout of the program")
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .takes_value(true)
                .required(true)
                .help("Source code file to compile. Files it imports are read from the same directory"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .required(false)
                .help("File that the memory layout will be written to. Written to stdout when not given"),
        )
        .arg(
            Arg::with_name("emit")
                .long("emit")
                .possible_values(&["layout-yaml", "layout-json"])
                .takes_value(true)
                .help("Writes the memory layout of the program in the given format")
        )
        .arg(
            Arg::with_name("stop-after")
                .long("stop-after")
                .possible_values(&["lexer", "parser", "semantic"])
                .takes_value(true)
                .help("Stops compilation after the given stage")
        )
        .arg(
            Arg::with_name("log-level")
                .long("log-level")
                .possible_values(&["error", "warn", "info", "debug", "trace"])
                .takes_value(true)
                .help("Enables logging at the given level. Use trace to follow every step of the lexer and parser")
        )
        .arg(
            Arg::with_name("log-file")
                .long("log-file")
                .takes_value(true)
                .requires("log-level")
                .help("File that the log is written to. Written to stderr when not given")
        )
}

pub fn get_stage(args: &ArgMatches) -> Option<Stage> {
    match args.value_of("stop-after")? {
        "lexer" => Some(Stage::Lexer),
        "parser" => Some(Stage::Parser),
        "semantic" => Some(Stage::Semantic),
        _ => None,
    }
}

pub fn get_emit(args: &ArgMatches) -> Option<Emit> {
    match args.value_of("emit")? {
        "layout-yaml" => Some(Emit::LayoutYaml),
        "layout-json" => Some(Emit::LayoutJson),
        _ => None,
    }
}

pub fn get_log_level(args: &ArgMatches) -> Option<LevelFilter> {
    match args.value_of("log-level")? {
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// Sends the log to `log_file`, or to stderr if no file is given.
pub fn configure_logging(level: LevelFilter, log_file: Option<&str>) -> Result<(), String> {
    let result = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|e| format!("{}: {}", path, e))?;
            WriteLogger::init(level, Config::default(), file)
        }
        None => WriteLogger::init(level, Config::default(), std::io::stderr()),
    };
    result.map_err(|e| e.to_string())
}

/// The exit code reported for a failed compilation.
pub fn exit_code(err: &ProjectError) -> i32 {
    match err {
        ProjectError::Load { .. } => ERR_LOAD_ERROR,
        ProjectError::Lexer { .. } => ERR_LEXER_ERROR,
        ProjectError::Parser { .. } => ERR_PARSER_ERROR,
        ProjectError::Semantic { .. } => ERR_TYPE_CHECK,
        ProjectError::CircularImport { .. } | ProjectError::Import { .. } => ERR_IMPORT_ERROR,
    }
}
