//! View Accounting CLI
//!
//! Loads a content-item catalog, streams view events against it, and
//! outputs final view records (and optionally the payment ledger).
//!
//! # Usage
//!
//! ```bash
//! cargo run -- items.csv events.csv > views.csv
//! cargo run -- items.csv events.csv payments.csv > views.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;
use view_accounting::{
    EngineError, ItemCatalog, LedgerGateway, MemoryViewStore, Result, ViewAccountingEngine,
};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        return Err(EngineError::MissingArgument);
    }

    let items_file = File::open(&args[1])?;
    let catalog = ItemCatalog::load_csv(BufReader::new(items_file))?;

    let mut engine = ViewAccountingEngine::new(MemoryViewStore::new(), LedgerGateway::new());

    let events_file = File::open(&args[2])?;
    engine.process_events(&catalog, BufReader::new(events_file))?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    engine.store().write_csv(handle)?;

    if let Some(payments_path) = args.get(3) {
        let payments_file = File::create(payments_path)?;
        engine.gateway().write_csv(payments_file)?;
    }

    Ok(())
}
