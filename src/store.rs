//! In-memory tabular store and its CSV-backed persistence.
//!
//! The store is a 1-indexed grid of optional cells. Layout that a CSV file
//! cannot carry (merged regions, annotations, alignment, sheet metadata) is
//! kept in a sidecar `<file>.layout.json`.

use crate::error::Result;
use crate::value::Value;
use csv::{ReaderBuilder, WriterBuilder};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A rectangular cell region, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedRegion {
    pub start_row: usize,
    pub end_row: usize,
    pub start_column: usize,
    pub end_column: usize,
}

impl MergedRegion {
    /// Returns `true` if the cell lies inside the region.
    pub fn contains(&self, row: usize, column: usize) -> bool {
        (self.start_row..=self.end_row).contains(&row)
            && (self.start_column..=self.end_column).contains(&column)
    }
}

/// A comment attached to a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    pub author: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vertical {
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Horizontal {
    Left,
    Center,
    Right,
}

/// How a cell's text is laid out when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    pub vertical: Vertical,
    pub horizontal: Horizontal,
    pub wrap_text: bool,
}

/// Everything about the sheet that is not a cell value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetLayout {
    pub title: String,
    pub frozen_rows: usize,
    pub column_widths: BTreeMap<usize, usize>,
    pub merged: Vec<MergedRegion>,
    pub annotations: BTreeMap<String, Annotation>,
    pub alignments: BTreeMap<String, Alignment>,
}

fn cell_key(row: usize, column: usize) -> String {
    format!("{}:{}", row, column)
}

/// A 2-D grid of cells addressable by 1-indexed `(row, column)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularStore {
    rows: Vec<Vec<Option<Value>>>,
    layout: SheetLayout,
}

impl TabularStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the last row that has been written, `0` when empty.
    ///
    /// A row counts once any of its cells has been written, even with blank
    /// text, so separator rows keep later blocks apart.
    pub fn max_row(&self) -> usize {
        self.rows.len()
    }

    /// Returns the cell value, if any.
    pub fn cell(&self, row: usize, column: usize) -> Option<&Value> {
        if row == 0 || column == 0 {
            return None;
        }
        self.rows.get(row - 1)?.get(column - 1)?.as_ref()
    }

    /// Writes a cell, growing the grid as needed.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `column` is `0`; every caller addresses cells
    /// through `Column` and block rows, which start at `1`.
    pub fn set_cell(&mut self, row: usize, column: usize, value: impl Into<Value>) {
        let row_idx = row.checked_sub(1).expect("rows are 1-indexed");
        let col_idx = column.checked_sub(1).expect("columns are 1-indexed");
        if self.rows.len() <= row_idx {
            self.rows.resize_with(row, Vec::new);
        }
        let cells = &mut self.rows[row_idx];
        if cells.len() <= col_idx {
            cells.resize(column, None);
        }
        cells[col_idx] = Some(value.into());
    }

    /// Appends a row after `max_row`, returning its index.
    pub fn append_row<I, V>(&mut self, values: I) -> usize
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let row = self.max_row() + 1;
        self.rows.push(values.into_iter().map(|v| Some(v.into())).collect());
        row
    }

    /// Merges a rectangular region into one logical cell.
    pub fn merge_region(&mut self, region: MergedRegion) {
        self.layout.merged.push(region);
    }

    /// Merged regions in the order they were created.
    pub fn merged_regions(&self) -> &[MergedRegion] {
        &self.layout.merged
    }

    /// Attaches a comment to a cell, replacing any existing one.
    pub fn annotate(&mut self, row: usize, column: usize, annotation: Annotation) {
        self.layout
            .annotations
            .insert(cell_key(row, column), annotation);
    }

    /// Returns the annotation attached to a cell, if any.
    pub fn annotation(&self, row: usize, column: usize) -> Option<&Annotation> {
        self.layout.annotations.get(&cell_key(row, column))
    }

    pub fn set_alignment(&mut self, row: usize, column: usize, alignment: Alignment) {
        self.layout
            .alignments
            .insert(cell_key(row, column), alignment);
    }

    pub fn alignment(&self, row: usize, column: usize) -> Option<&Alignment> {
        self.layout.alignments.get(&cell_key(row, column))
    }

    /// Sets the sheet title, frozen header rows, and per-column widths.
    pub fn customize(&mut self, title: &str, frozen_rows: usize, widths: &[usize]) {
        self.layout.title = title.to_string();
        self.layout.frozen_rows = frozen_rows;
        self.layout.column_widths = widths
            .iter()
            .enumerate()
            .map(|(idx, width)| (idx + 1, *width))
            .collect();
    }

    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }
}

/// A store together with whether it was freshly created.
#[derive(Debug)]
pub struct Loaded {
    pub store: TabularStore,
    pub created: bool,
}

/// Storage collaborator: loads and saves whole stores.
pub trait LedgerStorage {
    /// Loads the store at `path`, or returns an empty one if it does not exist.
    fn load_or_create(&self, path: &Path) -> Result<Loaded>;

    /// Persists the store. The write either fully lands or leaves the old file.
    fn save(&self, store: &TabularStore, path: &Path) -> Result<()>;
}

/// Path of the layout sidecar for a ledger file.
pub fn layout_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".layout.json");
    path.with_file_name(name)
}

/// Replaces `path` with `bytes` through a temp file in the same folder, so
/// readers see either the old contents or the new ones.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}

/// CSV grid plus JSON layout sidecar.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvStorage;

impl CsvStorage {
    fn read_grid(path: &Path) -> Result<Vec<Vec<Option<Value>>>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut cells: Vec<Option<Value>> = record.iter().map(Value::parse_cell).collect();
            while matches!(cells.last(), Some(None)) {
                cells.pop();
            }
            rows.push(cells);
        }
        Ok(rows)
    }
}

impl LedgerStorage for CsvStorage {
    fn load_or_create(&self, path: &Path) -> Result<Loaded> {
        if !path.exists() {
            info!("Creating new ledger at {}", path.display());
            return Ok(Loaded {
                store: TabularStore::new(),
                created: true,
            });
        }

        let rows = Self::read_grid(path)?;
        let sidecar = layout_path(path);
        let layout = if sidecar.exists() {
            serde_json::from_reader(BufReader::new(File::open(&sidecar)?))?
        } else {
            debug!("No layout sidecar for {}", path.display());
            SheetLayout::default()
        };

        info!("Loaded ledger {} ({} rows)", path.display(), rows.len());
        Ok(Loaded {
            store: TabularStore { rows, layout },
            created: false,
        })
    }

    fn save(&self, store: &TabularStore, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let width = store.rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        for cells in &store.rows {
            let record: Vec<String> = (0..width)
                .map(|idx| match cells.get(idx) {
                    Some(Some(value)) => value.to_cell(),
                    _ => String::new(),
                })
                .collect();
            writer.write_record(&record)?;
        }
        let grid = writer.into_inner().map_err(|e| e.into_error())?;

        write_atomic(path, &grid)?;
        write_atomic(&layout_path(path), &serde_json::to_vec_pretty(&store.layout)?)?;

        info!("Saved ledger {} ({} rows)", path.display(), store.max_row());
        Ok(())
    }
}
