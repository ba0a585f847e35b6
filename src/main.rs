use std::fs::File;
use std::process::ExitCode;

use clap::Parser;
use quotes::BackendKind;
use quotes::core::acquisition::{AcquisitionLoop, SessionOptions};
use quotes::core::config::{self, ResolvedConfig};
use quotes::core::store::SqliteStore;
use quotes::inference::build_backend;
use quotes::term::{InputDecoder, TerminalConsole};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "quotes", about = "Generate quotes and keep the ones you like")]
struct Args {
    /// Theme for the quotes (random when omitted)
    theme: Option<String>,

    /// Log prompts and rate limit headers
    #[arg(short, long)]
    verbose: bool,

    /// Text-generation backend to use
    #[arg(short, long, value_enum)]
    backend: Option<BackendKind>,
}

fn init_logging(verbose: bool) {
    // Initialize file logger - writes to quotes.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    if let Ok(log_file) = File::create("quotes.log") {
        let _ = WriteLogger::init(level, log_config, log_file);
    }
}

async fn run(args: Args, config: ResolvedConfig) -> ExitCode {
    let backend = match build_backend(&config) {
        Ok(backend) => backend,
        Err(e) => {
            log::error!("Startup failed: {}", e);
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let store = match SqliteStore::open(&config.database_path) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Could not open {}: {}", config.database_path.display(), e);
            eprintln!("Error: could not open {}: {e}", config.database_path.display());
            return ExitCode::FAILURE;
        }
    };

    let options = SessionOptions {
        theme: args.theme,
        verbose: args.verbose,
        exit_on_unmapped_key: config.exit_on_unmapped_key,
    };
    let mut session = AcquisitionLoop::new(
        backend,
        store,
        InputDecoder::stdin(),
        TerminalConsole::stdout(),
        options,
    );

    match session.run().await {
        Ok(reason) => {
            log::info!("Exiting: {:?}", reason);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Session aborted: {}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();
    init_logging(args.verbose);

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config: {}", e);
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let resolved = config::resolve(&file_config, args.backend);

    log::info!(
        "Quotes starting up with backend: {:?}, theme: {:?}",
        resolved.backend,
        args.theme
    );

    run(args, resolved).await
}
