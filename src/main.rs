use dbview::config::{self, Config};
use dbview::filters::has_database_extension;
use dbview::rpc::{self, DatabaseService};
use std::io;
use std::path::Path;
use tracing::{error, info, warn};

const USAGE: &str = "usage: dbview [--config <path>] [<database>]";

/// Command-line arguments after the program name
#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<String>,
    database: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = iter.next().ok_or("--config needs a path")?;
                parsed.config = Some(path.clone());
            }
            flag if flag.starts_with('-') => return Err(format!("unknown option: {}", flag)),
            path if parsed.database.is_none() => parsed.database = Some(path.to_string()),
            extra => return Err(format!("unexpected argument: {}", extra)),
        }
    }
    Ok(parsed)
}

fn main() {
    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}\n{}", msg, USAGE);
            std::process::exit(2);
        }
    };

    let config = match &args.config {
        Some(path) => match config::load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path, e);
                std::process::exit(2);
            }
        },
        None => Config::default(),
    };

    // stdout carries responses, so logs go to stderr
    tracing_subscriber::fmt()
        .with_max_level(config.log.max_level().unwrap_or(tracing::Level::INFO))
        .with_writer(io::stderr)
        .init();

    info!("Starting dbview...");
    let service = DatabaseService::new(config.sqlite.clone());

    if let Some(path) = &args.database {
        if !has_database_extension(Path::new(path)) {
            warn!("{} does not have a SQLite file extension", path);
        }
        if let Err(e) = service.open_database(path) {
            error!("Failed to open database: {}", e);
        }
    }

    if let Err(e) = rpc::serve(&service, io::stdin().lock(), io::stdout().lock()) {
        error!("Request channel failed: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = service.close_database() {
        warn!("Error while closing database on exit: {}", e);
    }
}
