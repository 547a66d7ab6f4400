// Registry loading - the two identity sources
//
// The global registry (radioid.net dump) is UTF-8 and comma-delimited; the
// Norwegian national registry is a legacy single-byte export delimited with
// semicolons. Both are indexed by canonical callsign, which is the sole
// join key between them.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::normalize::{format_callsign, normalize_text};

// ============================================================================
// RECORD TYPES
// ============================================================================

/// One row of the global registry, normalized.
/// Mutated in place when the reconciler finds a Norwegian match.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryRecord {
    /// Numeric DMR id as a string; coerced to "0" when the source value
    /// is not purely numeric
    pub radio_id: String,
    pub callsign: String,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    /// Carried raw from the source; replaced wholesale by the derived
    /// county on a regional match
    pub state: String,
    pub country: String,
}

/// One row of the Norwegian registry, normalized. Read-only after load.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionalRecord {
    pub callsign: String,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    /// Present only when the source value is exactly four digits
    pub postal_code: Option<String>,
    pub country: String,
}

// ============================================================================
// CALLSIGN INDEX
// ============================================================================

/// Insertion-order-preserving map keyed by canonical callsign.
///
/// Sequence numbers in the export are assigned in primary-load order, and
/// within-source duplicates must overwrite in place (last row wins, first
/// position kept), so a plain `HashMap` is not enough: this pairs the hash
/// index with a key vector that remembers first-insertion order.
#[derive(Debug, Clone)]
pub struct CallsignMap<T> {
    order: Vec<String>,
    entries: HashMap<String, T>,
}

impl<T> Default for CallsignMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CallsignMap<T> {
    pub fn new() -> Self {
        CallsignMap {
            order: Vec::new(),
            entries: HashMap::new(),
        }
    }

    /// Insert or overwrite. A repeated key replaces the stored value but
    /// keeps its original position in iteration order.
    pub fn insert(&mut self, callsign: String, record: T) {
        if self.entries.insert(callsign.clone(), record).is_none() {
            self.order.push(callsign);
        }
    }

    pub fn get(&self, callsign: &str) -> Option<&T> {
        self.entries.get(callsign)
    }

    pub fn get_mut(&mut self, callsign: &str) -> Option<&mut T> {
        self.entries.get_mut(callsign)
    }

    pub fn contains(&self, callsign: &str) -> bool {
        self.entries.contains_key(callsign)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate `(callsign, record)` pairs in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.order
            .iter()
            .map(move |key| (key.as_str(), &self.entries[key]))
    }
}

// ============================================================================
// LOADERS
// ============================================================================

/// Load the global registry from disk. Missing or unreadable files are
/// fatal; the file must be valid UTF-8.
pub fn load_primary(path: &Path) -> Result<CallsignMap<PrimaryRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read primary registry: {}", path.display()))?;
    let records = parse_primary(&content)
        .with_context(|| format!("Failed to parse primary registry: {}", path.display()))?;
    log::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Load the Norwegian registry from disk, decoding its legacy encoding.
pub fn load_regional(path: &Path) -> Result<CallsignMap<RegionalRecord>> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read regional registry: {}", path.display()))?;
    let content = decode_registry_bytes(bytes);
    let records = parse_regional(&content)
        .with_context(|| format!("Failed to parse regional registry: {}", path.display()))?;
    log::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Decode registry bytes that may not be UTF-8.
///
/// Try UTF-8 first; on failure, recover the buffer from the error and fall
/// back to Windows-1252, a byte-compatible superset of the ISO-8859-1 the
/// Norwegian registry actually ships.
pub(crate) fn decode_registry_bytes(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    }
}

/// Parse the global registry from already-decoded text.
pub fn parse_primary(content: &str) -> Result<CallsignMap<PrimaryRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let radio_id_col = column_index(&headers, "RADIO_ID", "primary registry")?;
    let callsign_col = column_index(&headers, "CALLSIGN", "primary registry")?;
    let first_name_col = column_index(&headers, "FIRST_NAME", "primary registry")?;
    let last_name_col = column_index(&headers, "LAST_NAME", "primary registry")?;
    let city_col = column_index(&headers, "CITY", "primary registry")?;
    let state_col = column_index(&headers, "STATE", "primary registry")?;
    let country_col = column_index(&headers, "COUNTRY", "primary registry")?;

    let mut records = CallsignMap::new();

    for (line_num, result) in reader.records().enumerate() {
        let row = result.with_context(|| {
            format!("Failed to parse primary registry line {}", line_num + 2)
        })?;
        let field = |col: usize| row.get(col).unwrap_or("");

        let callsign = format_callsign(field(callsign_col));
        let record = PrimaryRecord {
            radio_id: coerce_radio_id(field(radio_id_col)),
            callsign: callsign.clone(),
            first_name: normalize_text(field(first_name_col)),
            last_name: normalize_text(field(last_name_col)),
            city: normalize_text(field(city_col)),
            state: field(state_col).to_string(),
            country: normalize_text(field(country_col)),
        };

        records.insert(callsign, record);
    }

    Ok(records)
}

/// Parse the Norwegian registry from already-decoded text.
pub fn parse_regional(content: &str) -> Result<CallsignMap<RegionalRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let callsign_col = column_index(&headers, "Kallesignal", "regional registry")?;
    let first_name_col = column_index(&headers, "Fornavn", "regional registry")?;
    let last_name_col = column_index(&headers, "Etternavn", "regional registry")?;
    let city_col = column_index(&headers, "Poststed", "regional registry")?;
    let postal_col = column_index(&headers, "Postnr", "regional registry")?;
    let country_col = column_index(&headers, "Land", "regional registry")?;

    let mut records = CallsignMap::new();

    for (line_num, result) in reader.records().enumerate() {
        let row = result.with_context(|| {
            format!("Failed to parse regional registry line {}", line_num + 2)
        })?;
        let field = |col: usize| row.get(col).unwrap_or("");

        let callsign = format_callsign(field(callsign_col));
        let record = RegionalRecord {
            callsign: callsign.clone(),
            first_name: normalize_text(field(first_name_col)),
            last_name: normalize_text(field(last_name_col)),
            city: normalize_text(field(city_col)),
            postal_code: coerce_postal_code(field(postal_col)),
            country: normalize_text(field(country_col)),
        };

        records.insert(callsign, record);
    }

    Ok(records)
}

/// Locate a required header column, failing loudly when it is absent.
fn column_index(headers: &csv::StringRecord, name: &str, source: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .with_context(|| format!("{}: required column '{}' missing from header", source, name))
}

/// Radio ids must be purely numeric; anything else becomes "0".
/// Silent, deterministic fallback; the row is kept either way.
fn coerce_radio_id(raw: &str) -> String {
    if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) {
        raw.to_string()
    } else {
        "0".to_string()
    }
}

/// Postal codes must be exactly four digits; anything else is absent.
fn coerce_postal_code(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.len() == 4 && trimmed.chars().all(|c| c.is_ascii_digit()) {
        Some(trimmed.to_string())
    } else {
        None
    }
}

// ============================================================================
// TESTS
// ============================================================================
