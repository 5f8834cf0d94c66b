//! Fixed layout of the usage sheet.

/// The header occupies the first row; blocks start below it.
pub const HEADER_ROW: usize = 1;

/// Blank rows appended after every block.
pub const BLANK_LINES: usize = 3;

/// Title applied to a newly created ledger.
pub const SHEET_TITLE: &str = "Radiators Usage";

/// Extra width added to each header's length.
const COL_EXTRA_SPACE: usize = 10;

/// Width of the notes column.
const NOTES_WIDTH: usize = 50;

/// Usage sheet columns, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Date = 1,
    DeviceName = 2,
    DeviceId = 3,
    Coefficient = 4,
    RawReading = 5,
    ActualValue = 6,
    Total = 7,
    ValveSetting = 8,
    Notes = 9,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::Date,
        Column::DeviceName,
        Column::DeviceId,
        Column::Coefficient,
        Column::RawReading,
        Column::ActualValue,
        Column::Total,
        Column::ValveSetting,
        Column::Notes,
    ];

    /// 1-based column index.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Label written in the header row.
    pub fn header(self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::DeviceName => "Radiator Name",
            Column::DeviceId => "Radiator ID",
            Column::Coefficient => "Coefficient",
            Column::RawReading => "Raw Reading",
            Column::ActualValue => "Actual Value",
            Column::Total => "Total",
            Column::ValveSetting => "Valve Setting",
            Column::Notes => "Notes",
        }
    }

    /// Display width: the header plus padding, wider for notes.
    pub fn width(self) -> usize {
        match self {
            Column::Notes => NOTES_WIDTH,
            other => other.header().len() + COL_EXTRA_SPACE,
        }
    }
}

/// Header labels in column order.
pub fn headers() -> Vec<&'static str> {
    Column::ALL.iter().map(|c| c.header()).collect()
}

/// Column widths in column order.
pub fn widths() -> Vec<usize> {
    Column::ALL.iter().map(|c| c.width()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_follow_file_order() {
        for (pos, column) in Column::ALL.iter().enumerate() {
            assert_eq!(column.index(), pos + 1);
        }
    }

    #[test]
    fn test_widths() {
        assert_eq!(Column::Date.width(), 14);
        assert_eq!(Column::Notes.width(), 50);
        assert_eq!(widths().len(), headers().len());
    }
}
