// DMR Contact Directory - Core Library
// Builds a radio-importable contact list by reconciling the global DMR
// registry with the Norwegian national licensee registry.

pub mod export;
pub mod format;
pub mod normalize;
pub mod reconcile;
pub mod regions;
pub mod registry;

#[cfg(feature = "fetch")]
pub mod fetch;

// Re-export the pipeline surface
pub use export::{contact_rows, export_contacts, write_contacts, ContactRow};
pub use format::{format_city, format_name, CITY_MAX_LEN, NAME_MAX_LEN};
pub use normalize::{format_callsign, normalize_text};
pub use reconcile::merge;
pub use regions::county_for_postal_code;
pub use registry::{
    load_primary, load_regional, parse_primary, parse_regional, CallsignMap, PrimaryRecord,
    RegionalRecord,
};

#[cfg(feature = "fetch")]
pub use fetch::{fetch_source, record_statistics, FetchStatus, SourceMeta};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
