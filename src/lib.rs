//! # Thermo Ledger
//!
//! Records periodic heat-usage readings for a fixed set of radiators into an
//! append-only tabular ledger. Each run appends one block: a row per device,
//! a total row, a merged note, and blank separator rows.
//!
//! ## Design Principles
//!
//! - **Append-only history**: rows of earlier blocks are never rewritten
//! - **Exact arithmetic**: `actual_value = coefficient * raw_reading` with
//!   integers or `rust_decimal`, never floats
//! - **Ordinal carry-forward**: valve settings move from the previous block
//!   by device position
//! - **Explicit session state**: a `SessionContext` value carries the
//!   persisted bookkeeping between runs
//!
//! ## Example
//!
//! ```no_run
//! use std::io::{stdin, stdout};
//! use thermo_ledger::{
//!     ConsoleInput, CsvRegistry, CsvStorage, ConfigFile, LedgerBuilder, usage_config,
//! };
//!
//! let config = ConfigFile::new("data/config.json");
//! let mut ctx = config.load().unwrap();
//! let mut input = ConsoleInput::new(stdin().lock(), stdout());
//!
//! let settings = usage_config::configure(&mut ctx, &mut input).unwrap();
//! let mut engine = LedgerBuilder::new(format!("data/{}", settings.file_name), settings)
//!     .load(&CsvStorage)
//!     .unwrap();
//! engine
//!     .record_block(&mut ctx, &CsvRegistry::new("data/radiators_registry.csv"), &mut input)
//!     .unwrap();
//! engine.save(&CsvStorage).unwrap();
//! config.save(&mut ctx).unwrap();
//! ```

pub mod carry_forward;
pub mod columns;
pub mod device;
pub mod engine;
pub mod entry;
pub mod error;
pub mod fields;
pub mod finalizer;
pub mod input;
pub mod opener;
pub mod session;
pub mod store;
pub mod tracker;
pub mod usage_config;
pub mod value;

pub use carry_forward::{CarryForwardReport, Resolution};
pub use columns::Column;
pub use device::{CsvRegistry, Device, Registry, REGISTRY_FILE};
pub use engine::{BlockSummary, LedgerBuilder, UsageLedgerEngine};
pub use error::{LedgerError, Result};
pub use fields::{DateFormat, DateInputMode};
pub use input::{ConsoleInput, Prompter};
pub use opener::{default_opener, FileOpener, NoopOpener, SystemOpener};
pub use session::{ConfigFile, ConfigKey, SessionContext, CONFIG_FILE};
pub use store::{CsvStorage, LedgerStorage, Loaded, MergedRegion, TabularStore};
pub use tracker::{begin_block, Block, BlockRows};
pub use usage_config::UsageSettings;
pub use value::{InputKind, Value};
