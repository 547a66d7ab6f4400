use anyhow::Result;
use std::env;
use std::path::Path;

use dmr_contacts::{export_contacts, load_primary, load_regional, merge};

// Well-known local filenames, shared between `update` and `build`
const PRIMARY_CSV: &str = "user.csv";
const REGIONAL_CSV: &str = "user-no.csv";
const OUTPUT_CSV: &str = "digital_contacts_list.csv";
const PRIMARY_META: &str = "user.meta";
const REGIONAL_META: &str = "user-no.meta";

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("dmr_contacts=info"),
    )
    .init();

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("update") => {
            let force = args.iter().any(|a| a == "-f" || a == "--force");
            run_update(force)?;
        }
        Some("build") | None => run_build()?,
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            eprintln!("Usage: dmr-contacts [update [-f|--force] | build]");
            std::process::exit(2);
        }
    }

    Ok(())
}

fn run_build() -> Result<()> {
    println!("Building contact list...");

    let mut primary = load_primary(Path::new(PRIMARY_CSV))?;
    println!("✓ Loaded {} contacts from {}", primary.len(), PRIMARY_CSV);

    let regional = load_regional(Path::new(REGIONAL_CSV))?;
    println!(
        "✓ Loaded {} Norwegian licensees from {}",
        regional.len(),
        REGIONAL_CSV
    );

    let matched = merge(&mut primary, &regional);
    println!("✓ Enriched {} contacts from the Norwegian registry", matched);

    export_contacts(&primary, Path::new(OUTPUT_CSV))?;
    println!("✓ Wrote {} contacts to {}", primary.len(), OUTPUT_CSV);

    Ok(())
}

#[cfg(feature = "fetch")]
fn run_update(force: bool) -> Result<()> {
    use dmr_contacts::fetch::{self, FetchStatus};

    let sources = [
        (
            "DMR",
            fetch::PRIMARY_URL,
            PRIMARY_CSV,
            PRIMARY_META,
            b',',
            "COUNTRY",
        ),
        (
            "Norwegian",
            fetch::REGIONAL_URL,
            REGIONAL_CSV,
            REGIONAL_META,
            b';',
            "Land",
        ),
    ];

    for (label, url, file, meta, delimiter, country_column) in sources {
        let status = fetch::fetch_source(url, Path::new(file), Path::new(meta), force)?;
        match status {
            FetchStatus::Downloaded => {
                let total = fetch::record_statistics(
                    Path::new(file),
                    Path::new(meta),
                    delimiter,
                    country_column,
                )?;
                println!("✓ {} database updated: {} contacts", label, total);
            }
            FetchStatus::NotModified => {
                println!("No updates found for {} database.", label);
            }
        }
    }

    Ok(())
}

#[cfg(not(feature = "fetch"))]
fn run_update(_force: bool) -> Result<()> {
    eprintln!("❌ Network retrieval not available!");
    eprintln!("   Rebuild with: cargo build --features fetch");
    std::process::exit(1);
}
