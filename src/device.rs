//! Devices and the registry that lists them.

use crate::error::{LedgerError, Result};
use crate::value::Value;
use csv::{ReaderBuilder, Trim};
use log::{debug, info};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default registry file name inside the data folder.
pub const REGISTRY_FILE: &str = "radiators_registry.csv";

/// A tracked radiator.
///
/// Names are unique and never change once registered; the coefficient turns
/// a raw HCA reading into a comparable usage value.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub name: String,
    pub id: i64,
    pub coefficient: Value,
}

impl Device {
    pub fn new(name: impl Into<String>, id: i64, coefficient: impl Into<Value>) -> Self {
        Device {
            name: name.into(),
            id,
            coefficient: coefficient.into(),
        }
    }
}

/// Source of the ordered device list.
pub trait Registry {
    /// Returns the devices in registry order.
    fn devices(&self) -> Result<Vec<Device>>;
}

impl Registry for Vec<Device> {
    fn devices(&self) -> Result<Vec<Device>> {
        if self.is_empty() {
            return Err(LedgerError::EmptyRegistry);
        }
        Ok(self.clone())
    }
}

/// Raw registry record as read from CSV.
#[derive(Debug, Deserialize)]
struct DeviceRecord {
    #[serde(rename = "Radiator Name")]
    name: String,

    #[serde(rename = "Radiator ID")]
    id: i64,

    #[serde(rename = "Coefficient")]
    coefficient: Value,
}

/// Registry backed by a `Radiator Name,Radiator ID,Coefficient` CSV file.
pub struct CsvRegistry {
    path: PathBuf,
}

impl CsvRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvRegistry { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Registry for CsvRegistry {
    fn devices(&self) -> Result<Vec<Device>> {
        if !self.path.exists() {
            return Err(LedgerError::MissingRegistry {
                path: self.path.clone(),
            });
        }

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_path(&self.path)?;

        let mut devices = Vec::new();
        for (row_idx, result) in reader.deserialize::<DeviceRecord>().enumerate() {
            let row = row_idx + 2; // 1-indexed, accounting for header row
            let record = result.map_err(|e| LedgerError::InvalidRegistryRow {
                row,
                message: e.to_string(),
            })?;

            if !record.coefficient.is_numeric() {
                return Err(LedgerError::InvalidRegistryRow {
                    row,
                    message: format!("coefficient '{}' is not a number", record.coefficient),
                });
            }

            debug!("Registry row {}: {}", row, record.name);
            devices.push(Device::new(record.name, record.id, record.coefficient));
        }

        if devices.is_empty() {
            return Err(LedgerError::EmptyRegistry);
        }

        info!("Loaded {} devices from {}", devices.len(), self.path.display());
        Ok(devices)
    }
}
