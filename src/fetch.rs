// 📡 Source retrieval - keep the two registry dumps fresh
//
// Conditional fetch with If-Modified-Since, bounded retry with exponential
// backoff, and a JSON sidecar per source recording freshness plus a content
// fingerprint. The build pipeline never reads the sidecars; they exist so
// an unchanged source is not downloaded twice.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::thread;
use std::time::Duration;

/// Global registry dump (radioid.net).
pub const PRIMARY_URL: &str = "https://radioid.net/static/user.csv";

/// Norwegian licensee list (Nkom attachment download).
pub const REGIONAL_URL: &str = "https://nkom.no/frekvenser-og-elektronisk-utstyr/radioamator/_/attachment/download/e7908c8f-ab3e-47b3-9e1e-8aa86e13664f:25cd0f93a2d15d065245df12e84a0bac95b6d2e9/Liste%20over%20norske%20radioamat%C3%B8rer%20(CSV).csv";

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// What a fetch attempt concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// New content was written to disk
    Downloaded,
    /// Server answered 304; the local file is untouched
    NotModified,
}

// ============================================================================
// FRESHNESS SIDECAR
// ============================================================================

/// Per-source metadata, persisted as pretty JSON next to the data file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceMeta {
    /// Opaque echo of the server's Last-Modified header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,

    /// SHA-256 fingerprint of the file as last downloaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,

    /// When the last successful download finished
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,

    /// Statistics recorded after download; the pipeline ignores these
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_contacts: Option<u64>,

    // BTreeMap keeps the serialized sidecar stable between runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts_per_country: Option<BTreeMap<String, u64>>,
}

impl SourceMeta {
    /// Load a sidecar. Missing files yield empty metadata; corrupt files
    /// are logged and also yield empty metadata, since the next successful
    /// fetch rewrites them.
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return SourceMeta::default(),
        };
        match serde_json::from_str(&content) {
            Ok(meta) => meta,
            Err(e) => {
                log::error!("Corrupt metadata in {}: {}", path.display(), e);
                SourceMeta::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to save metadata: {}", path.display()))?;
        log::info!("Metadata saved to {}", path.display());
        Ok(())
    }
}

/// SHA-256 fingerprint of a file, streamed in chunks.
pub fn sha256_digest(path: &Path) -> Result<String> {
    let mut file = fs::File::open(path)
        .with_context(|| format!("Failed to open {} for hashing", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// DOWNLOAD
// ============================================================================

/// Download one source unless the server still has the version we hold.
///
/// Sends `If-Modified-Since` with the stored Last-Modified stamp (skipped
/// when `force` is set); a 304 leaves the local file untouched. On new
/// content the file is replaced and the sidecar updated with the new
/// stamp, fingerprint and timestamp.
pub fn fetch_source(url: &str, dest: &Path, meta_path: &Path, force: bool) -> Result<FetchStatus> {
    let mut meta = SourceMeta::load(meta_path);
    log::info!("Starting download from {}", url);

    let client = reqwest::blocking::Client::builder()
        .user_agent(format!("dmr-contacts/{}", env!("CARGO_PKG_VERSION")))
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    let if_modified_since = if force {
        None
    } else {
        meta.last_modified.as_deref()
    };
    let response = request_with_backoff(&client, url, if_modified_since)?;

    if response.status() == reqwest::StatusCode::NOT_MODIFIED {
        log::info!("Not modified since last download: {}", url);
        return Ok(FetchStatus::NotModified);
    }

    let last_modified = response
        .headers()
        .get(reqwest::header::LAST_MODIFIED)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let body = response
        .bytes()
        .with_context(|| format!("Failed to read response body from {}", url))?;
    fs::write(dest, &body).with_context(|| format!("Failed to write {}", dest.display()))?;
    log::info!("Downloaded {} bytes to {}", body.len(), dest.display());

    meta.last_modified = last_modified;
    meta.sha256 = Some(sha256_digest(dest)?);
    meta.fetched_at = Some(Utc::now());
    meta.save(meta_path)?;

    Ok(FetchStatus::Downloaded)
}

/// GET with bounded retry and exponential backoff. A 304 counts as success
/// here; transport errors and HTTP error statuses are retried.
fn request_with_backoff(
    client: &reqwest::blocking::Client,
    url: &str,
    if_modified_since: Option<&str>,
) -> Result<reqwest::blocking::Response> {
    let mut attempt = 0;
    loop {
        attempt += 1;

        let mut request = client.get(url);
        if let Some(stamp) = if_modified_since {
            request = request.header(reqwest::header::IF_MODIFIED_SINCE, stamp);
        }

        let outcome = request.send().map_err(anyhow::Error::from).and_then(|resp| {
            let status = resp.status();
            if status == reqwest::StatusCode::NOT_MODIFIED || status.is_success() {
                Ok(resp)
            } else {
                bail!("HTTP {} from {}", status, url)
            }
        });

        match outcome {
            Ok(resp) => return Ok(resp),
            Err(e) if attempt < MAX_RETRIES => {
                let delay = Duration::from_secs(2u64.pow(attempt));
                log::warn!(
                    "Download error: {}. Retrying ({}/{}) in {}s...",
                    e,
                    attempt,
                    MAX_RETRIES,
                    delay.as_secs()
                );
                thread::sleep(delay);
            }
            Err(e) => {
                return Err(e.context(format!(
                    "Download failed after {} attempts: {}",
                    MAX_RETRIES, url
                )))
            }
        }
    }
}

// ============================================================================
// STATISTICS
// ============================================================================

/// Count contacts per country in a downloaded file and record the totals
/// in its sidecar. Rows with an empty country value are not counted.
pub fn record_statistics(
    path: &Path,
    meta_path: &Path,
    delimiter: u8,
    country_column: &str,
) -> Result<u64> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read {} for statistics", path.display()))?;
    let content = crate::registry::decode_registry_bytes(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let country_col = headers
        .iter()
        .position(|h| h == country_column)
        .with_context(|| {
            format!(
                "{}: column '{}' missing from header",
                path.display(),
                country_column
            )
        })?;

    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for result in reader.records() {
        let row = result?;
        let country = row.get(country_col).unwrap_or("");
        if !country.is_empty() {
            *counts.entry(country.to_string()).or_insert(0) += 1;
        }
    }

    let total: u64 = counts.values().sum();
    let mut meta = SourceMeta::load(meta_path);
    meta.total_contacts = Some(total);
    meta.contacts_per_country = Some(counts);
    meta.save(meta_path)?;

    log::info!("Contact statistics updated in {}", meta_path.display());
    Ok(total)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_metadata_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("user.meta");

        let meta = SourceMeta {
            last_modified: Some("Wed, 01 Jan 2025 00:00:00 GMT".to_string()),
            sha256: Some("abc123".to_string()),
            fetched_at: Some(Utc::now()),
            total_contacts: Some(42),
            contacts_per_country: None,
        };
        meta.save(&path).unwrap();

        let loaded = SourceMeta::load(&path);
        assert_eq!(loaded, meta);
    }

    #[test]
    fn test_metadata_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let loaded = SourceMeta::load(&dir.path().join("nope.meta"));
        assert_eq!(loaded, SourceMeta::default());
    }

    #[test]
    fn test_metadata_corrupt_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("user.meta");
        fs::write(&path, "{not json").unwrap();

        let loaded = SourceMeta::load(&path);
        assert_eq!(loaded, SourceMeta::default());
    }

    #[test]
    fn test_sha256_digest_known_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "abc").unwrap();

        assert_eq!(
            sha256_digest(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_record_statistics_counts_per_country() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("user.csv");
        let meta_path = dir.path().join("user.meta");
        fs::write(
            &csv_path,
            "RADIO_ID,CALLSIGN,COUNTRY\n1,LA1A,Norway\n2,LA2B,Norway\n3,OZ1C,Denmark\n4,XX9X,\n",
        )
        .unwrap();

        let total = record_statistics(&csv_path, &meta_path, b',', "COUNTRY").unwrap();
        assert_eq!(total, 3);

        let meta = SourceMeta::load(&meta_path);
        let counts = meta.contacts_per_country.unwrap();
        assert_eq!(counts.get("Norway"), Some(&2));
        assert_eq!(counts.get("Denmark"), Some(&1));
        assert_eq!(meta.total_contacts, Some(3));
    }

    #[test]
    fn test_record_statistics_missing_column_is_fatal() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("user.csv");
        let meta_path = dir.path().join("user.meta");
        fs::write(&csv_path, "RADIO_ID,CALLSIGN\n1,LA1A\n").unwrap();

        let err = record_statistics(&csv_path, &meta_path, b',', "COUNTRY").unwrap_err();
        assert!(err.to_string().contains("COUNTRY"));
    }
}
