use serde::Serialize;

use crate::satusehat_client::api::CountsBlock;
use crate::satusehat_client::helpers::rounded_percentage;
use crate::types::MonitorError;

pub const DATA_SYNC: &str = "dataSync";
pub const FHIR_RESOURCES: &str = "fhirResources";
pub const VALIDATION: &str = "validation";

/// Record counters for one synchronized data category.
///
/// `synced_records` never exceeds `total_records`; the constructor enforces it.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct SyncCategory {
    name: String,
    total_records: u64,
    synced_records: u64,
}

impl SyncCategory {
    pub fn new(
        name: impl Into<String>,
        total_records: u64,
        synced_records: u64,
    ) -> Result<Self, MonitorError> {
        let name = name.into();
        if synced_records > total_records {
            return Err(MonitorError::Validation(format!(
                "{name}: synced ({synced_records}) exceeds total ({total_records})"
            )));
        }
        Ok(Self {
            name,
            total_records,
            synced_records,
        })
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            total_records: 0,
            synced_records: 0,
        }
    }

    /// Builds a category from its wire counters, rejecting missing or negative counts.
    pub fn from_counts(name: &str, counts: Option<&CountsBlock>) -> Result<Self, MonitorError> {
        let counts =
            counts.ok_or_else(|| MonitorError::Validation(format!("{name} block is missing")))?;
        let total = non_negative(name, "total", counts.total)?;
        let synced = non_negative(name, "synced", counts.synced)?;
        Self::new(name, total, synced)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    pub fn synced_records(&self) -> u64 {
        self.synced_records
    }

    /// Completion in whole percent, 0 for an empty category.
    pub fn percentage(&self) -> u8 {
        rounded_percentage(self.synced_records, self.total_records)
    }
}

fn non_negative(category: &str, field: &str, value: Option<i64>) -> Result<u64, MonitorError> {
    match value {
        Some(count) if count >= 0 => Ok(count as u64),
        Some(count) => Err(MonitorError::Validation(format!(
            "{category}.{field} is negative ({count})"
        ))),
        None => Err(MonitorError::Validation(format!(
            "{category}.{field} is missing"
        ))),
    }
}
