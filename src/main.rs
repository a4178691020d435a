//! NovelReader main entry point
//!
//! Parses arguments, sets up logging and hands over to `app::run`.
//! Every failure ends the process with exit code 1.

use clap::CommandFactory;
use log::{debug, info};
use novelreader::app;
use novelreader::cli::Args;
use novelreader::NovelReaderError;
use std::io;
use std::process;

fn main() {
    let args = Args::parse_normalized();
    init_logging(args.debug);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = app::run(&args, &mut out);

    if let Err(e) = &result {
        debug!("Fatal error: {:?}", e);
        eprintln!("Error: {}", e);
        if matches!(e, NovelReaderError::Input(_)) && args.file.is_none() {
            eprintln!();
            let _ = Args::command().print_help();
        }
    }

    process::exit(app::exit_code(&result));
}

fn init_logging(debug_mode: bool) {
    if debug_mode {
        // Debug mode: write to novelreader.log file
        use std::fs::OpenOptions;
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open("novelreader.log")
        {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Warning: Failed to open novelreader.log for debug logging: {}", e);
                eprintln!("Continuing with debug logging to stderr...");
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .init();
            }
        }

        info!(
            "NovelReader version {} starting (debug mode)",
            novelreader::VERSION
        );
    } else {
        // Normal mode: warnings (skipped segments, fallbacks) and errors to stderr
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }
}
