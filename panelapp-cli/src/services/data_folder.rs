//! Resolution of dated data folders (`<data_path>/YYYYMMDD`)

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;
use std::path::{Path, PathBuf};

/// Newest `YYYYMMDD` subdirectory of `data_path`
///
/// Folder names must be real calendar dates. Names are compared as text,
/// which for this format is chronological order.
pub fn latest_dated_folder(data_path: &Path) -> Result<PathBuf> {
    if !data_path.exists() {
        anyhow::bail!("Data path does not exist: {}", data_path.display());
    }

    let mut dated = Vec::new();
    for entry in std::fs::read_dir(data_path)
        .with_context(|| format!("Failed to list data path: {}", data_path.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if is_date_folder_name(&name) {
            dated.push((name, entry.path()));
        }
    }

    let (_, latest) = dated
        .into_iter()
        .max_by(|a, b| a.0.cmp(&b.0))
        .with_context(|| format!("No dated data folders found in {}", data_path.display()))?;

    info!("Using latest data folder: {}", latest.display());
    Ok(latest)
}

fn is_date_folder_name(name: &str) -> bool {
    name.len() == 8
        && name.chars().all(|c| c.is_ascii_digit())
        && NaiveDate::parse_from_str(name, "%Y%m%d").is_ok()
}
