//! Closes a block: total row, merged note, separator rows.

use crate::columns::{Column, BLANK_LINES};
use crate::error::{LedgerError, Result};
use crate::fields;
use crate::input::Prompter;
use crate::store::{Alignment, Horizontal, MergedRegion, TabularStore, Vertical};
use crate::tracker::Block;
use crate::value::Value;
use log::info;

/// Note written when the user declines to add one.
pub const DEFAULT_NOTE: &str = "No additional notes.";

const NOTE_PROMPT: &str = "\nWould you like to add a note for today's session? (yes/no)\n";

/// What the finalizer wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct Finalized {
    pub total: Value,
    pub note: String,
}

/// Writes the block total, asks for a note, merges the notes region, and
/// appends the separator rows.
pub fn finalize_block<P: Prompter + ?Sized>(
    store: &mut TabularStore,
    prompter: &mut P,
    block: &Block,
) -> Result<Finalized> {
    let total = write_total(store, block)?;

    let note = if prompter.confirm(NOTE_PROMPT)? {
        prompter.text("\nEnter your note:\n")?
    } else {
        DEFAULT_NOTE.to_string()
    };
    write_note(store, block, &note);

    append_blank_lines(store);

    Ok(Finalized { total, note })
}

/// Sums the block's actual values into the total row.
pub fn write_total(store: &mut TabularStore, block: &Block) -> Result<Value> {
    let column = Column::ActualValue.index();
    let mut values = Vec::with_capacity(block.device_count);
    for row in block.device_rows() {
        match store.cell(row, column) {
            Some(value) if value.is_numeric() => values.push(value.clone()),
            _ => return Err(LedgerError::NonNumericCell { row, column }),
        }
    }

    let total = fields::total(&values).ok_or(LedgerError::Overflow {
        row: block.total_row(),
        column: Column::Total.index(),
    })?;

    info!("Writing total {} at row {}", total, block.total_row());
    store.set_cell(block.total_row(), Column::Total.index(), total.clone());
    Ok(total)
}

/// Merges the notes column over the device rows and stores the note once,
/// in the first row of the region.
pub fn write_note(store: &mut TabularStore, block: &Block, note: &str) {
    let column = Column::Notes.index();
    let first = block.start_row();
    let last = block.total_row() - 1;

    store.merge_region(MergedRegion {
        start_row: first,
        end_row: last,
        start_column: column,
        end_column: column,
    });
    store.set_cell(first, column, note);
    store.set_alignment(
        first,
        column,
        Alignment {
            vertical: Vertical::Top,
            horizontal: Horizontal::Left,
            wrap_text: true,
        },
    );
    info!("Added note to rows {}..={}", first, last);
}

/// Appends the blank separator rows after the block.
pub fn append_blank_lines(store: &mut TabularStore) {
    info!("Adding {} blank lines to the usage file", BLANK_LINES);
    for _ in 0..BLANK_LINES {
        store.append_row([""]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ConsoleInput;
    use crate::tracker::BlockRows;
    use std::io::Cursor;

    fn block_with_values(values: &[i64]) -> (TabularStore, Block) {
        let mut store = TabularStore::new();
        store.append_row(["header"]);
        for (i, v) in values.iter().enumerate() {
            store.set_cell(2 + i, Column::ActualValue.index(), Value::Int(*v));
        }
        let block = Block::new(
            BlockRows {
                start_row: 2,
                last_start_row: 2,
            },
            values.len(),
        );
        (store, block)
    }

    #[test]
    fn test_total_written_below_last_device() {
        let (mut store, block) = block_with_values(&[10, 14, 45]);
        let total = write_total(&mut store, &block).unwrap();

        assert_eq!(total, Value::Int(69));
        assert_eq!(store.cell(5, 7), Some(&Value::Int(69)));
    }

    #[test]
    fn test_missing_actual_value_is_an_error() {
        let (mut store, block) = block_with_values(&[10, 14]);
        let block = Block::new(block.rows, 3);

        assert!(matches!(
            write_total(&mut store, &block),
            Err(LedgerError::NonNumericCell { row: 4, column: 6 })
        ));
    }

    #[test]
    fn test_declined_note_uses_default() {
        let (mut store, block) = block_with_values(&[1, 2, 3]);
        let mut input = ConsoleInput::new(Cursor::new("no\n"), Vec::new());

        let done = finalize_block(&mut store, &mut input, &block).unwrap();
        assert_eq!(done.note, DEFAULT_NOTE);
        assert_eq!(store.cell(2, 9), Some(&Value::from(DEFAULT_NOTE)));
    }

    #[test]
    fn test_note_stored_once_across_merged_rows() {
        let (mut store, block) = block_with_values(&[1, 2, 3]);
        let mut input = ConsoleInput::new(Cursor::new("yes\nBoiler serviced\n"), Vec::new());

        finalize_block(&mut store, &mut input, &block).unwrap();

        assert_eq!(store.cell(2, 9), Some(&Value::from("Boiler serviced")));
        assert!(store.cell(3, 9).is_none());
        assert!(store.cell(4, 9).is_none());
        assert_eq!(
            store.merged_regions(),
            &[MergedRegion {
                start_row: 2,
                end_row: 4,
                start_column: 9,
                end_column: 9,
            }]
        );
        let alignment = store.alignment(2, 9).unwrap();
        assert!(alignment.wrap_text);
        assert_eq!(alignment.vertical, Vertical::Top);
        assert_eq!(alignment.horizontal, Horizontal::Left);
    }

    #[test]
    fn test_blank_lines_follow_total_row() {
        let (mut store, block) = block_with_values(&[1, 2, 3]);
        let mut input = ConsoleInput::new(Cursor::new("no\n"), Vec::new());

        finalize_block(&mut store, &mut input, &block).unwrap();

        // Total row 5, then three separators.
        assert_eq!(store.max_row(), 5 + BLANK_LINES);
        for row in 6..=8 {
            assert!(store.cell(row, 1).unwrap().is_blank());
        }
    }
}
