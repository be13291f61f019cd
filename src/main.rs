use std::{
    env,
    path::Path,
    process::ExitCode,
    time::Instant,
};

use env_logger::Env;
use meow::{
    format_diagnostic,
    lexer::{
        lexer::tokenize_with,
        tokens::{ConfigError, TokenConfig, DEFAULT_CONFIG},
    },
    parser::parser::parse,
    type_checker::type_checker::type_check,
    unit::CompilationUnit,
};

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        log::error!("Usage: {} <file>", args.first().map(String::as_str).unwrap_or("meow"));
        return ExitCode::FAILURE;
    }

    let config = match load_config() {
        Ok(config) => config,
        Err(error) => {
            log::error!("{}", error);
            return ExitCode::FAILURE;
        }
    };

    let mut unit = match CompilationUnit::from_file(Path::new(&args[1])) {
        Ok(unit) => unit,
        Err(error) => {
            log::error!("Failed to read {}: {}", args[1], error);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    let tokens = tokenize_with(&mut unit, &config);
    log::debug!("Tokenized in {:?}", start.elapsed());

    let parse_start = Instant::now();
    let definitions = parse(&mut unit, tokens);
    log::debug!("Parsed in {:?}", parse_start.elapsed());

    let type_check_start = Instant::now();
    type_check(&mut unit, &definitions);
    log::debug!("Type checked in {:?}", type_check_start.elapsed());

    for diagnostic in unit.diagnostics() {
        eprintln!("{}\n", format_diagnostic(&unit, diagnostic));
    }

    if unit.errored() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Token tables from `MEOW_SYMBOLS` / `MEOW_KEYWORDS` when both are set,
/// otherwise the embedded defaults.
fn load_config() -> Result<TokenConfig, ConfigError> {
    match (env::var("MEOW_SYMBOLS"), env::var("MEOW_KEYWORDS")) {
        (Ok(symbols), Ok(keywords)) => TokenConfig::load(Path::new(&symbols), Path::new(&keywords)),
        _ => Ok(DEFAULT_CONFIG.clone()),
    }
}
