//! Thermo Ledger CLI
//!
//! Records one reading session into the usage ledger kept in a data folder.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- ./heating-data
//! ```
//!
//! The folder holds `radiators_registry.csv`, `config.json`, and the usage
//! ledger named in the config.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `info` or `debug` to control logging verbosity

use log::warn;
use std::env;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;
use thermo_ledger::{
    default_opener, usage_config, ConfigFile, ConsoleInput, CsvRegistry, CsvStorage,
    LedgerBuilder, LedgerError, Prompter, Result, SessionContext, CONFIG_FILE, REGISTRY_FILE,
};

const INTRO: &str = "
                THERMO LEDGER

Records heat usage readings from your radiators' heat cost allocators.

Press **Enter** to continue...";

const OPEN_USAGE: &str = "
The usage file containing all radiator data is ready.
Would you like to open it now? (yes/no)
";

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(LedgerError::MissingArgument);
    }

    let folder = PathBuf::from(&args[1]);
    let config = ConfigFile::new(folder.join(CONFIG_FILE));
    let mut ctx = config.load()?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = ConsoleInput::new(stdin.lock(), stdout.lock());

    session(&mut input, &folder, &config, &mut ctx)
}

fn session<R: BufRead, W: Write>(
    input: &mut ConsoleInput<R, W>,
    folder: &Path,
    config: &ConfigFile,
    ctx: &mut SessionContext,
) -> Result<()> {
    input.pause(INTRO)?;

    let settings = usage_config::configure(ctx, input)?;
    let path = folder.join(&settings.file_name);
    let mut engine = LedgerBuilder::new(path, settings).load(&CsvStorage)?;

    let registry = CsvRegistry::new(folder.join(REGISTRY_FILE));
    let summary = engine.record_block(ctx, &registry, input)?;

    engine.save(&CsvStorage)?;
    config.save(ctx)?;
    input.say(&format!(
        "Usage file saved successfully to {} (block at row {}, total {}).",
        engine.path().display(),
        summary.start_row,
        summary.total
    ))?;

    if input.confirm(OPEN_USAGE)? {
        if let Err(e) = default_opener().open(engine.path()) {
            warn!("Could not open {}: {}", engine.path().display(), e);
            input.say("Automatic file opening failed; please open the file manually.")?;
        }
    }

    Ok(())
}
