//! Carries valve settings from the previous block into the new one.
//!
//! Devices are matched by ordinal: device `i` of the new block takes its
//! setting from row `last_start_row + i`, whatever device that row named.
//! Adding, removing, or reordering devices between runs shifts the match.

use crate::columns::Column;
use crate::entry::{device_name, enter_column};
use crate::error::Result;
use crate::input::{prompt_value, Prompter};
use crate::store::TabularStore;
use crate::tracker::Block;
use crate::value::{InputKind, Value};
use log::{debug, info};

/// Shown before valve settings are entered for a first block.
pub const VALVE_SETTING_ENTRY: &str = "
                ENTER VALVE SETTING

Please enter the valve setting for each radiator.
You can enter numbers (e.g. 2), words (e.g. 'two'), fractions (e.g. '2 and a half'),
decimals (e.g. '2.1'), or any description that matches your valve.
If your valve is set to antifreeze, enter 'antifreeze'.

Press **Enter** to continue...";

/// Shown before the previous block's valve settings are reviewed.
pub const VALVE_SETTING_UPDATE: &str = "
                VALVE SETTING UPDATE

Since the valve settings were already entered in a previous run, we'll now review them.
For each radiator, you'll see the current valve setting and be asked if you want to modify it.
If you wish to make a change, answer 'yes' when asked; else, the existing value will be kept.

Press **Enter** to continue...";

/// Review progress for one device.
#[derive(Debug, Clone, PartialEq)]
enum ValveState {
    /// Showing the previous setting.
    Review,
    /// Collecting a replacement.
    Enter,
    /// Replacement collected, awaiting confirmation.
    Confirm(Value),
}

/// How a device's setting was settled. These are the only ways out.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Previous setting copied verbatim.
    Keep(Value),
    /// New setting confirmed by the user.
    Applied(Value),
}

impl Resolution {
    pub fn value(&self) -> &Value {
        match self {
            Resolution::Keep(v) | Resolution::Applied(v) => v,
        }
    }
}

/// Counts of how settings were settled in one block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CarryForwardReport {
    pub kept: usize,
    pub applied: usize,
    /// Devices with no previous setting to review, entered from scratch.
    pub entered: usize,
}

/// Fills the valve-setting column of the new block.
///
/// Without a previous block every device is asked for an initial value and
/// the column gets one review pass. Otherwise each previous value is shown
/// and either kept or replaced. Every device row holds a value on return.
pub fn carry_forward<P: Prompter + ?Sized>(
    store: &mut TabularStore,
    prompter: &mut P,
    block: &Block,
    first_block: bool,
) -> Result<CarryForwardReport> {
    let column = Column::ValveSetting.index();

    if first_block {
        prompter.pause(VALVE_SETTING_ENTRY)?;
        info!("Prompting for initial valve settings");
        enter_column(store, prompter, block, Column::ValveSetting, InputKind::Text)?;
        return Ok(CarryForwardReport {
            entered: block.device_count,
            ..Default::default()
        });
    }

    prompter.pause(VALVE_SETTING_UPDATE)?;
    info!("Reviewing valve settings");

    let mut report = CarryForwardReport::default();
    for (ordinal, row) in block.device_rows().enumerate() {
        let name = device_name(store, row);
        let previous = store
            .cell(block.previous_row(ordinal), column)
            .filter(|v| !v.is_blank())
            .cloned();

        let resolution = match previous {
            Some(current) => reconcile(prompter, &name, current)?,
            None => {
                info!(
                    "No previous valve setting for '{}' at row {}, asking for one",
                    name,
                    block.previous_row(ordinal)
                );
                report.entered += 1;
                let prompt = format!("\nEnter valve setting for '{}': ", name);
                let entered = prompt_value(prompter, InputKind::Text, &prompt)?;
                store.set_cell(row, column, entered);
                continue;
            }
        };

        match &resolution {
            Resolution::Keep(_) => report.kept += 1,
            Resolution::Applied(_) => report.applied += 1,
        }
        debug!("Valve setting for '{}': {:?}", name, resolution);
        store.set_cell(row, column, resolution.value().clone());
    }

    info!(
        "Valve settings: {} kept, {} changed, {} entered",
        report.kept, report.applied, report.entered
    );
    Ok(report)
}

/// Runs the review/enter/confirm cycle for one device.
fn reconcile<P: Prompter + ?Sized>(
    prompter: &mut P,
    name: &str,
    current: Value,
) -> Result<Resolution> {
    let mut state = ValveState::Review;
    loop {
        state = match state {
            ValveState::Review => {
                let prompt = format!(
                    "\nCurrent valve setting for '{}': {}\nDo you want to change it? (yes/no):\n",
                    name, current
                );
                if !prompter.confirm(&prompt)? {
                    return Ok(Resolution::Keep(current));
                }
                ValveState::Enter
            }
            ValveState::Enter => {
                let prompt = format!("\nEnter new valve setting for '{}': ", name);
                ValveState::Confirm(prompt_value(prompter, InputKind::Text, &prompt)?)
            }
            ValveState::Confirm(new) => {
                prompter.say(&format!("\nCurrent value: {}. New value: {}", current, new))?;
                if prompter.confirm("Apply this change? (yes/no)\n")? {
                    return Ok(Resolution::Applied(new));
                }
                ValveState::Enter
            }
        };
    }
}
