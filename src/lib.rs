//! ngr-convert: turn NGR partnership XML exports into Airtable-ready CSVs
//!
//! This library flattens the nested partnership → payee → user tree of an
//! NGR export into three deduplicated entity tables plus one link table,
//! then writes them as four CSV files and one bundled ZIP archive.

pub mod bundle;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod table;

use std::path::PathBuf;

use anyhow::Result;

pub use error::NgrConvertError;
use normalize::OutputTables;

/// Options for converting an NGR export
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Path to the NGR XML export
    pub input_path: PathBuf,
    /// Directory for the four CSV files and the ZIP bundle
    pub output_dir: PathBuf,
    /// Output path for the ZIP bundle (defaults to ngr_export_<timestamp>.zip in the output directory)
    pub bundle_path: Option<PathBuf>,
    /// Enable verbose output
    pub verbose: bool,
}

/// Convert an NGR XML export into four CSV files and a ZIP bundle
pub fn convert_export(options: ConvertOptions) -> Result<PathBuf> {
    if options.verbose {
        println!("Converting export: {}", options.input_path.display());
    }

    // Step 1: Read the XML export
    let xml =
        std::fs::read_to_string(&options.input_path).map_err(|e| NgrConvertError::InputReadError {
            path: options.input_path.clone(),
            source: e,
        })?;

    // Step 2: Flatten the partnership tree into raw rows
    let raw = extract::extract(&xml)?;

    if options.verbose {
        println!(
            "Extracted {} partnerships, {} payees, {} users",
            raw.grn.len(),
            raw.payees.len(),
            raw.users.len()
        );
    }

    // Step 3: Deduplicate into the four output tables
    let tables = normalize::normalize(&raw);

    if options.verbose {
        println!(
            "Deduplicated to {} GRNs, {} payees, {} users, {} links",
            tables.grn.len(),
            tables.payees.len(),
            tables.users.len(),
            tables.mapping.len()
        );
    }

    // Step 4: Write the CSV artifacts
    bundle::write_csv_files(&tables, &options.output_dir)?;

    // Step 5: Bundle everything into a ZIP
    let bundle_path = options.bundle_path.clone().unwrap_or_else(|| {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        options.output_dir.join(format!("ngr_export_{}.zip", stamp))
    });
    bundle::create_bundle(&tables, &bundle_path)?;

    if options.verbose {
        println!("Created bundle: {}", bundle_path.display());
    }

    Ok(bundle_path)
}

/// Convert raw XML text into the four output tables without touching the
/// file system. Callers that own their own I/O use this directly.
pub fn convert_xml(xml: &str) -> Result<OutputTables, NgrConvertError> {
    let raw = extract::extract(xml)?;
    Ok(normalize::normalize(&raw))
}
