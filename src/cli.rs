use std::fs::File;

use clap::{App, Arg, ArgMatches};
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use crate::compiler::{CompilerDisplay, Diagnostic, Source, Stage};
use crate::config::MachineConfig;
use crate::result::Result;

// Exit Codes for different types of errors
pub const ERR_LEXER_ERROR: i32 = 1;
pub const ERR_MACRO_ERROR: i32 = 2;
pub const ERR_PARSER_ERROR: i32 = 3;
pub const ERR_LINK_ERROR: i32 = 4;
pub const ERR_IO_ERROR: i32 = 5;
pub const ERR_RUN_ERROR: i32 = 6;
pub const ERR_CONFIG_ERROR: i32 = 7;

/// The exit code for a failed compilation: the code of the earliest stage
/// which reported a problem.
pub fn exit_code(diags: &[Diagnostic]) -> i32 {
    match diags.iter().map(|d| d.stage()).min() {
        Some(Stage::Lexer) => ERR_LEXER_ERROR,
        Some(Stage::Macros) => ERR_MACRO_ERROR,
        Some(Stage::Parser) => ERR_PARSER_ERROR,
        Some(Stage::Semantics) | Some(Stage::Assembler) => ERR_LINK_ERROR,
        None => 0,
    }
}

pub fn print_errs(diags: &[Diagnostic], src: &Source) {
    for d in diags {
        match d.fmt(src) {
            Ok(msg) => eprintln!("{}", msg),
            Err(e) => eprintln!("{:?} (could not render: {:?})", d, e),
        }
    }
}

pub fn configure_cli() -> clap::App<'static, 'static> {
    let app = App::new("S9B Assembler")
        .version("0.1.0")
        .author("Erich Ess")
        .about("Assembles S9B source into a memory image and optionally runs it on the S9B interpreter")
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .takes_value(true)
                .required(true)
                .help("Source code file to assemble"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .help("Write the assembled memory image, as JSON, to this file"),
        )
        .arg(
            Arg::with_name("manifest")
                .long("manifest")
                .takes_value(true)
                .help("Write a YAML manifest of every label and its address to this file"),
        )
        .arg(
            Arg::with_name("run")
                .short("r")
                .long("run")
                .help("Run the assembled program on the interpreter and print its output"),
        )
        .arg(
            Arg::with_name("trace")
                .long("trace")
                .help("While running, print every message the machine produces rather than only its output"),
        )
        .arg(
            Arg::with_name("max-ticks")
                .long("max-ticks")
                .takes_value(true)
                .help("The number of micro steps after which a run is abandoned"),
        )
        .arg(
            Arg::with_name("word-bits")
                .long("word-bits")
                .takes_value(true)
                .help("Width of a machine word, from 9 to 16 bits"),
        )
        .arg(
            Arg::with_name("memory-size")
                .long("memory-size")
                .takes_value(true)
                .help("Number of words of memory the interpreter has"),
        )
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .takes_value(true)
                .help("YAML file describing the machine. Command line flags override its values."),
        )
        .arg(
            Arg::with_name("stage")
                .long("stage")
                .possible_values(&["lexer", "macros", "parser", "semantics"])
                .takes_value(true)
                .help("Stop after the given stage and report its diagnostics"),
        )
        .arg(
            Arg::with_name("log-level")
                .long("log-level")
                .possible_values(&["off", "error", "warn", "info", "debug", "trace"])
                .takes_value(true)
                .help("Sets the level of the compiler's log output"),
        );
    app
}

pub fn get_log_level(args: &ArgMatches) -> Option<LevelFilter> {
    match args.value_of("log-level").unwrap_or("warn") {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

pub fn configure_logging(level: LevelFilter) -> Result<()> {
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .map_err(|e| format!("Failed to configure logger: {}", e))
}

pub fn get_stage(args: &ArgMatches) -> Result<Option<Stage>> {
    match args.value_of("stage") {
        None => Ok(None),
        Some("lexer") => Ok(Some(Stage::Lexer)),
        Some("macros") => Ok(Some(Stage::Macros)),
        Some("parser") => Ok(Some(Stage::Parser)),
        Some("semantics") => Ok(Some(Stage::Semantics)),
        Some(s) => Err(format!("Unknown stage: {}", s)),
    }
}

/// Reads the machine description from `--config`, if given, then applies
/// the overrides given on the command line.
pub fn get_machine_config(args: &ArgMatches) -> Result<MachineConfig> {
    let mut config = match args.value_of("config") {
        Some(path) => {
            let file = File::open(path).map_err(|e| format!("Could not open {}: {}", path, e))?;
            MachineConfig::read(file).map_err(|e| format!("{}: {}", path, e))?
        }
        None => MachineConfig::default(),
    };

    if let Some(bits) = parse_arg(args, "word-bits")? {
        config.word_bits = bits;
    }
    if let Some(size) = parse_arg(args, "memory-size")? {
        config.memory_size = size;
    }
    if let Some(ticks) = parse_arg(args, "max-ticks")? {
        config.max_ticks = ticks;
    }

    Ok(config)
}

fn parse_arg<T: std::str::FromStr>(args: &ArgMatches, name: &str) -> Result<Option<T>> {
    args.value_of(name)
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| format!("Invalid value for --{}: {}", name, v))
        })
        .transpose()
}
