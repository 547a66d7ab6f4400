// Contact list export
//
// Projects merged records into the ten-column CSV the radio import tools
// expect. Column order is fixed; three columns are constants.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::format::{format_city, format_name, CITY_MAX_LEN, NAME_MAX_LEN};
use crate::registry::{CallsignMap, PrimaryRecord};

/// Every exported contact is a private call with no alert tone.
pub const CALL_TYPE: &str = "Private Call";
pub const CALL_ALERT: &str = "None";

const OUTPUT_HEADER: [&str; 10] = [
    "No.",
    "Radio ID",
    "Callsign",
    "Name",
    "City",
    "State",
    "Country",
    "Remarks",
    "Call Type",
    "Call Alert",
];

/// One line of the importable contact list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactRow {
    #[serde(rename = "No.")]
    pub number: usize,
    #[serde(rename = "Radio ID")]
    pub radio_id: String,
    #[serde(rename = "Callsign")]
    pub callsign: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Remarks")]
    pub remarks: String,
    #[serde(rename = "Call Type")]
    pub call_type: String,
    #[serde(rename = "Call Alert")]
    pub call_alert: String,
}

/// Project the merged records into numbered, display-ready rows.
/// Sequence numbers are 1-based and follow primary-load insertion order.
pub fn contact_rows(records: &CallsignMap<PrimaryRecord>) -> Vec<ContactRow> {
    records
        .iter()
        .enumerate()
        .map(|(index, (callsign, rec))| ContactRow {
            number: index + 1,
            radio_id: rec.radio_id.clone(),
            callsign: callsign.to_string(),
            name: format_name(&rec.first_name, &rec.last_name, NAME_MAX_LEN),
            city: format_city(&rec.city, CITY_MAX_LEN),
            state: rec.state.clone(),
            country: rec.country.clone(),
            remarks: String::new(),
            call_type: CALL_TYPE.to_string(),
            call_alert: CALL_ALERT.to_string(),
        })
        .collect()
}

/// Write the contact list CSV to any writer.
pub fn write_contacts<W: Write>(records: &CallsignMap<PrimaryRecord>, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let rows = contact_rows(records);
    if rows.is_empty() {
        // serialize() emits the header with the first row; an empty set
        // still has to produce a header-only file
        csv_writer
            .write_record(OUTPUT_HEADER)
            .context("Failed to write contact list header")?;
    }
    for row in rows {
        csv_writer
            .serialize(row)
            .context("Failed to write contact row")?;
    }

    csv_writer.flush().context("Failed to flush contact list")?;
    Ok(())
}

/// Write the contact list to a file. Write failures are fatal to the run.
pub fn export_contacts(records: &CallsignMap<PrimaryRecord>, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    write_contacts(records, file)
        .with_context(|| format!("Failed to write contact list: {}", path.display()))
}

// ============================================================================
// TESTS
// ============================================================================
