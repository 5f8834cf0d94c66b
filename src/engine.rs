//! Usage ledger engine.
//!
//! Appends one block per run to the usage ledger: device rows copied from the
//! registry, the session date, valve settings carried forward from the
//! previous block, raw readings, derived actual values, and the finalized
//! total, note, and separator rows.

use crate::carry_forward::{carry_forward, CarryForwardReport};
use crate::columns::{self, Column, HEADER_ROW, SHEET_TITLE};
use crate::device::{Device, Registry};
use crate::entry::enter_column;
use crate::error::{LedgerError, Result};
use crate::fields::{self, format_date, DateInputMode};
use crate::finalizer::finalize_block;
use crate::input::Prompter;
use crate::session::{ConfigKey, SessionContext};
use crate::store::{Annotation, LedgerStorage, TabularStore};
use crate::tracker::{begin_block, Block};
use crate::usage_config::UsageSettings;
use crate::value::{InputKind, Value};
use chrono::{Datelike, Local, NaiveDate};
use log::{debug, info};
use std::path::{Path, PathBuf};

const DATA_ENTRY_INTRO: &str = "
                USAGE FILE DATA ENTRY

The usage file has been pre-filled with radiator data from your registry file.

Next, depending on your configuration, dates may be added automatically or entered manually.
You will then be asked to enter the valve setting for each radiator,
followed by the corresponding raw reading from the HCA device.
Lastly, you will have the option to add any notes about the day's readings.

Press **Enter** to continue...";

const ENTER_DATE: &str = "
                ENTER DATE

Please provide the date for when the radiator recordings were taken.";

const RAW_READINGS: &str = "
                RAW READINGS

Please, enter the Raw Reading from the HCA device for each radiator.
";

const VALVE_HEADER_NOTE: &str = "NOTE:\nNumbers saved as text. Warnings about mixed types are expected.";
const NOTE_AUTHOR: &str = "Thermo Ledger";

/// Outcome of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSummary {
    pub start_row: usize,
    pub last_start_row: usize,
    pub device_count: usize,
    pub date: String,
    pub total: Value,
    pub note: String,
    pub valves: CarryForwardReport,
}

/// First phase: everything the engine needs except the loaded ledger.
#[derive(Debug, Clone)]
pub struct LedgerBuilder {
    path: PathBuf,
    settings: UsageSettings,
    today: Option<NaiveDate>,
}

impl LedgerBuilder {
    pub fn new(path: impl Into<PathBuf>, settings: UsageSettings) -> Self {
        LedgerBuilder {
            path: path.into(),
            settings,
            today: None,
        }
    }

    /// Overrides the date used in `Auto` mode.
    pub fn today(mut self, date: NaiveDate) -> Self {
        self.today = Some(date);
        self
    }

    /// Loads or creates the ledger, producing a ready engine.
    pub fn load<S: LedgerStorage + ?Sized>(self, storage: &S) -> Result<UsageLedgerEngine> {
        let loaded = storage.load_or_create(&self.path)?;
        Ok(UsageLedgerEngine {
            store: loaded.store,
            created: loaded.created,
            path: self.path,
            settings: self.settings,
            today: self.today.unwrap_or_else(|| Local::now().date_naive()),
        })
    }
}

/// Appends blocks to a loaded usage ledger.
///
/// The engine owns the store for the whole run; nothing reaches disk until
/// `save` is called.
///
/// # Invariants
///
/// - Rows of earlier blocks are never written; the only value read from the
///   previous block is its valve-setting column.
/// - Each new block starts right after the last written row.
pub struct UsageLedgerEngine {
    store: TabularStore,
    created: bool,
    path: PathBuf,
    settings: UsageSettings,
    today: NaiveDate,
}

impl UsageLedgerEngine {
    /// Records one reading session as a new block.
    pub fn record_block<R, P>(
        &mut self,
        ctx: &mut SessionContext,
        registry: &R,
        prompter: &mut P,
    ) -> Result<BlockSummary>
    where
        R: Registry + ?Sized,
        P: Prompter + ?Sized,
    {
        if self.store.max_row() < HEADER_ROW {
            self.initialize_sheet();
        }

        let rows = begin_block(&self.store, ctx);
        let devices = registry.devices()?;
        ctx.set(ConfigKey::DeviceCount, devices.len());
        let block = Block::new(rows, devices.len());

        info!("Starting population of block at row {}", block.start_row());
        self.fill_registry_data(&block, &devices);

        prompter.pause(DATA_ENTRY_INTRO)?;
        let date = self.session_date(prompter)?;
        self.fill_dates(&block, &date);

        let first_block = self.created || !rows.has_previous();
        if first_block {
            self.annotate_valve_header();
        }
        let valves = carry_forward(&mut self.store, prompter, &block, first_block)?;

        info!("Prompting for raw readings");
        prompter.say(RAW_READINGS)?;
        enter_column(
            &mut self.store,
            prompter,
            &block,
            Column::RawReading,
            InputKind::Integer,
        )?;

        self.fill_actual_values(&block)?;
        let finalized = finalize_block(&mut self.store, prompter, &block)?;

        Ok(BlockSummary {
            start_row: rows.start_row,
            last_start_row: rows.last_start_row,
            device_count: block.device_count,
            date,
            total: finalized.total,
            note: finalized.note,
            valves,
        })
    }

    /// Persists the ledger through the storage collaborator.
    pub fn save<S: LedgerStorage + ?Sized>(&self, storage: &S) -> Result<()> {
        storage.save(&self.store, &self.path)
    }

    pub fn store(&self) -> &TabularStore {
        &self.store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if the ledger did not exist before this run.
    pub fn is_new(&self) -> bool {
        self.created
    }

    /// Applies sheet metadata and writes the header row.
    fn initialize_sheet(&mut self) {
        info!("Customizing the usage worksheet");
        self.store
            .customize(SHEET_TITLE, HEADER_ROW, &columns::widths());
        self.store.append_row(columns::headers());
    }

    /// Writes name, id, and coefficient for every device, in registry order.
    fn fill_registry_data(&mut self, block: &Block, devices: &[Device]) {
        info!("Filling usage file with registry data");
        for (row, device) in block.device_rows().zip(devices) {
            self.store
                .set_cell(row, Column::DeviceName.index(), device.name.as_str());
            self.store.set_cell(row, Column::DeviceId.index(), device.id);
            self.store.set_cell(
                row,
                Column::Coefficient.index(),
                device.coefficient.clone(),
            );
        }
    }

    /// Same date on every device row and on the total row.
    fn fill_dates(&mut self, block: &Block, date: &str) {
        info!(
            "Filling rows {}..={} with the session date {}",
            block.start_row(),
            block.total_row(),
            date
        );
        for row in block.start_row()..=block.total_row() {
            self.store.set_cell(row, Column::Date.index(), date);
        }
    }

    fn annotate_valve_header(&mut self) {
        self.store.annotate(
            HEADER_ROW,
            Column::ValveSetting.index(),
            Annotation {
                text: VALVE_HEADER_NOTE.to_string(),
                author: NOTE_AUTHOR.to_string(),
            },
        );
    }

    fn fill_actual_values(&mut self, block: &Block) -> Result<()> {
        info!("Filling usage file with the actual values");
        for row in block.device_rows() {
            let coefficient = self.store.cell(row, Column::Coefficient.index());
            let raw = match self.store.cell(row, Column::RawReading.index()) {
                Some(Value::Int(raw)) => *raw,
                _ => {
                    return Err(LedgerError::NonNumericCell {
                        row,
                        column: Column::RawReading.index(),
                    })
                }
            };
            let coefficient = match coefficient {
                Some(c) if c.is_numeric() => c,
                _ => {
                    return Err(LedgerError::NonNumericCell {
                        row,
                        column: Column::Coefficient.index(),
                    })
                }
            };
            let actual =
                fields::actual_value(coefficient, raw).ok_or(LedgerError::Overflow {
                    row,
                    column: Column::ActualValue.index(),
                })?;
            debug!("Row {}: {} x {} = {}", row, coefficient, raw, actual);
            self.store
                .set_cell(row, Column::ActualValue.index(), actual);
        }
        Ok(())
    }

    fn session_date<P: Prompter + ?Sized>(&self, prompter: &mut P) -> Result<String> {
        let date = match self.settings.input_mode {
            DateInputMode::Auto => self.today,
            DateInputMode::Manual => self.prompt_manual_date(prompter)?,
        };
        Ok(format_date(date, self.settings.date_format))
    }

    /// Asks for day, month, and year until they form a real, confirmed date.
    fn prompt_manual_date<P: Prompter + ?Sized>(&self, prompter: &mut P) -> Result<NaiveDate> {
        info!("Prompting user for manual date entry");
        prompter.say(ENTER_DATE)?;

        loop {
            let day = prompter.integer("Day (1 - 31): ", Some(1), Some(31))?;
            let month = prompter.integer("Month (1 - 12): ", Some(1), Some(12))?;
            let year = prompter.integer(
                &format!("Year (e.g., {}): ", self.today.year()),
                Some(1),
                Some(9999),
            )?;

            // Bounds above keep all three within u32/i32.
            let date = match NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32) {
                Some(date) => date,
                None => {
                    info!("User entered an invalid date: {}-{}-{}", year, month, day);
                    prompter.say(&format!(
                        "Invalid date: {:02}/{:02}/{}. Please provide a correct one.",
                        day, month, year
                    ))?;
                    continue;
                }
            };

            let formatted = format_date(date, self.settings.date_format);
            prompter.say(&format!("The date you provided is: {}.", formatted))?;
            if prompter.confirm("Confirm this date? (yes/no)\n")? {
                return Ok(date);
            }
        }
    }
}
