//! Locates the rows of the new block and of the previous one.

use crate::columns::HEADER_ROW;
use crate::session::{ConfigKey, SessionContext};
use crate::store::TabularStore;
use log::{info, warn};
use std::ops::Range;

/// Start rows of the block being written and of the block before it.
///
/// On the first run both are equal: there is no previous block to carry
/// values forward from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRows {
    pub start_row: usize,
    pub last_start_row: usize,
}

impl BlockRows {
    /// Returns `true` if a previous block exists.
    pub fn has_previous(&self) -> bool {
        self.last_start_row != self.start_row
    }
}

/// Row geometry of one block: device rows followed by the total row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub rows: BlockRows,
    pub device_count: usize,
}

impl Block {
    /// Block of `device_count` device rows starting at `rows.start_row`.
    pub fn new(rows: BlockRows, device_count: usize) -> Self {
        Block { rows, device_count }
    }

    /// First device row.
    pub fn start_row(&self) -> usize {
        self.rows.start_row
    }

    /// Rows holding one device each.
    pub fn device_rows(&self) -> Range<usize> {
        self.rows.start_row..self.rows.start_row + self.device_count
    }

    /// Row directly after the last device row.
    pub fn total_row(&self) -> usize {
        self.rows.start_row + self.device_count
    }

    /// Row of device `ordinal` in the previous block.
    pub fn previous_row(&self, ordinal: usize) -> usize {
        self.rows.last_start_row + ordinal
    }
}

/// Computes the new block's rows and records them in the session context.
///
/// `start_row` is one past the last written row. `last_start_row` is the
/// `start_row` recorded by the previous run; if none was recorded, or the
/// recorded row cannot belong to this ledger, it falls back to `start_row`.
pub fn begin_block(store: &TabularStore, ctx: &mut SessionContext) -> BlockRows {
    let start_row = store.max_row().max(HEADER_ROW) + 1;

    let last_start_row = match ctx.get::<usize>(ConfigKey::StartRow) {
        Some(previous) if previous > HEADER_ROW && previous < start_row => previous,
        Some(previous) => {
            warn!(
                "Recorded start row {} does not fit a ledger ending at row {}, ignoring it",
                previous,
                store.max_row()
            );
            start_row
        }
        None => start_row,
    };

    ctx.set(ConfigKey::StartRow, start_row);
    ctx.set(ConfigKey::LastStartRow, last_start_row);

    info!(
        "New block starts at row {} (previous block at row {})",
        start_row, last_start_row
    );
    BlockRows {
        start_row,
        last_start_row,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with_rows(rows: usize) -> TabularStore {
        let mut store = TabularStore::new();
        for _ in 0..rows {
            store.append_row(["x"]);
        }
        store
    }

    #[test]
    fn test_first_run_has_no_previous_block() {
        let store = ledger_with_rows(1);
        let mut ctx = SessionContext::new();

        let rows = begin_block(&store, &mut ctx);
        assert_eq!(rows.start_row, 2);
        assert_eq!(rows.last_start_row, 2);
        assert!(!rows.has_previous());
        assert!(ctx.is_dirty());
        assert_eq!(ctx.get::<usize>(ConfigKey::StartRow), Some(2));
        assert_eq!(ctx.get::<usize>(ConfigKey::LastStartRow), Some(2));
    }

    #[test]
    fn test_second_run_points_at_first_block() {
        // Header, three device rows, total row.
        let store = ledger_with_rows(5);
        let mut ctx = SessionContext::new();
        ctx.set(ConfigKey::StartRow, 2usize);

        let rows = begin_block(&store, &mut ctx);
        assert_eq!(rows.start_row, 6);
        assert_eq!(rows.last_start_row, 2);
        assert!(rows.has_previous());
        assert_eq!(ctx.get::<usize>(ConfigKey::StartRow), Some(6));
        assert_eq!(ctx.get::<usize>(ConfigKey::LastStartRow), Some(2));
    }

    #[test]
    fn test_empty_ledger_starts_below_header() {
        let store = TabularStore::new();
        let mut ctx = SessionContext::new();
        assert_eq!(begin_block(&store, &mut ctx).start_row, 2);
    }

    #[test]
    fn test_stale_start_row_is_ignored() {
        // Recorded for a longer ledger, e.g. a previous season's file.
        let store = ledger_with_rows(1);
        let mut ctx = SessionContext::new();
        ctx.set(ConfigKey::StartRow, 40usize);

        let rows = begin_block(&store, &mut ctx);
        assert_eq!(rows.last_start_row, rows.start_row);
    }

    #[test]
    fn test_block_geometry() {
        let block = Block::new(
            BlockRows {
                start_row: 9,
                last_start_row: 2,
            },
            3,
        );
        assert_eq!(block.device_rows(), 9..12);
        assert_eq!(block.total_row(), 12);
        assert_eq!(block.previous_row(2), 4);
    }
}
