//! Column-wide data entry with a review pass.

use crate::columns::Column;
use crate::error::Result;
use crate::input::{prompt_value, Prompter};
use crate::store::TabularStore;
use crate::tracker::Block;
use crate::value::{InputKind, Value};
use log::info;

/// Asks for one value per device row of `column`, then shows them all and
/// offers to re-enter the whole column until the user accepts it.
///
/// Empty rows are asked with `kind`. A row that already holds a value, as on
/// a correction pass, is asked with the strategy for that value's type.
pub fn enter_column<P: Prompter + ?Sized>(
    store: &mut TabularStore,
    prompter: &mut P,
    block: &Block,
    column: Column,
    kind: InputKind,
) -> Result<()> {
    let label = column.header();
    loop {
        for row in block.device_rows() {
            let prompt = format!("{} for {}: ", label, device_name(store, row));
            let row_kind = store
                .cell(row, column.index())
                .map(InputKind::of)
                .unwrap_or(kind);
            let value = prompt_value(prompter, row_kind, &prompt)?;
            store.set_cell(row, column.index(), value);
        }

        if !review_column(store, prompter, block, column)? {
            prompter.say(&format!("Great! Your {} values have been saved.", label))?;
            return Ok(());
        }
        info!("User chose to re-enter the {} column", label);
    }
}

/// Lists the block's values for `column`; returns `true` if the user wants
/// to change them.
fn review_column<P: Prompter + ?Sized>(
    store: &TabularStore,
    prompter: &mut P,
    block: &Block,
    column: Column,
) -> Result<bool> {
    let label = column.header();
    prompter.say(&format!(
        "\nReview the {} values you just entered. You can make corrections if needed:\n",
        label
    ))?;
    for row in block.device_rows() {
        let value = store
            .cell(row, column.index())
            .map(Value::to_string)
            .unwrap_or_default();
        prompter.say(&format!("- {} {}: {}", device_name(store, row), label, value))?;
    }
    prompter.confirm(&format!(
        "\nWould you like to modify any of these {} values? (yes/no)\n",
        label
    ))
}

/// Name written in the device column of `row`.
pub(crate) fn device_name(store: &TabularStore, row: usize) -> String {
    store
        .cell(row, Column::DeviceName.index())
        .map(Value::to_string)
        .unwrap_or_default()
}
