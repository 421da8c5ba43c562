//! `panel_list.tsv` summary: built from downloaded panel pages, read back as
//! the entity catalog for incremental gene extraction.

use anyhow::{Context, Result};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::api::{Panel, list_page_files, panels_from_page};
use crate::sync::Entity;

/// File name of the summary inside the data directory
pub const PANEL_LIST_FILE: &str = "panel_list.tsv";

/// Prefix of the downloaded panel list pages
pub const PANEL_PAGE_PREFIX: &str = "panels";

/// Column order of the summary
pub const HEADERS: [&str; 7] = [
    "id",
    "name",
    "version",
    "version_created",
    "number_of_genes",
    "number_of_strs",
    "number_of_regions",
];

/// One summary row per panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelListRow {
    pub id: String,
    pub name: String,
    pub version: String,
    pub version_created: String,
    pub number_of_genes: u64,
    pub number_of_strs: u64,
    pub number_of_regions: u64,
}

impl From<&Panel> for PanelListRow {
    fn from(panel: &Panel) -> Self {
        Self {
            id: panel.id_string(),
            name: panel.name.clone().unwrap_or_default(),
            version: panel.version_string(),
            version_created: panel.version_created.clone().unwrap_or_default(),
            number_of_genes: panel.stats.number_of_genes,
            number_of_strs: panel.stats.number_of_strs,
            number_of_regions: panel.stats.number_of_regions,
        }
    }
}

/// Summary rows from every `panels_page_<n>.json` in `json_dir`
///
/// Pages are read in page order. A page that cannot be read or parsed is
/// logged and skipped.
pub fn collect_rows(json_dir: &Path) -> Result<Vec<PanelListRow>> {
    let mut rows = Vec::new();

    for (page, path) in list_page_files(json_dir, PANEL_PAGE_PREFIX)? {
        let parsed = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))
            .and_then(|content| {
                serde_json::from_str::<serde_json::Value>(&content)
                    .with_context(|| format!("Invalid JSON in {}", path.display()))
            });

        match parsed {
            Ok(body) => rows.extend(panels_from_page(&body).iter().map(PanelListRow::from)),
            Err(e) => error!("Skipping panel page {}: {:#}", page, e),
        }
    }

    Ok(rows)
}

/// Write the tab-separated summary with a header row
pub fn write_panel_list(path: &Path, rows: &[PanelListRow]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(HEADERS)?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write panel {}", row.id))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}

/// Read the summary as an entity catalog
///
/// Rows without an id are skipped silently, rows with a non-numeric id are
/// skipped with a warning. Missing names default to "Unknown".
pub fn read_panel_list(path: &Path) -> Result<Vec<Entity>> {
    if !path.exists() {
        anyhow::bail!("Panel list file not found: {}", path.display());
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header of {}", path.display()))?
        .clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);

    let id_col = column("id")
        .with_context(|| format!("Panel list has no 'id' column: {}", path.display()))?;
    let name_col = column("name");
    let created_col = column("version_created");

    let mut entities = Vec::new();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("Error parsing panel list row: {}", e);
                continue;
            }
        };
        let line = record.position().map_or(0, |p| p.line());
        let field = |col: Option<usize>| {
            col.and_then(|c| record.get(c))
                .map(str::trim)
                .unwrap_or_default()
                .to_string()
        };

        let id = field(Some(id_col));
        if id.is_empty() {
            continue;
        }
        if !id.chars().all(|c| c.is_ascii_digit()) {
            warn!("Invalid panel ID on line {}: {}", line, id);
            continue;
        }

        let name = field(name_col);
        entities.push(Entity::new(
            id,
            field(created_col),
            if name.is_empty() { "Unknown".to_string() } else { name },
        ));
    }

    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::page_file_name;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn row(id: &str, name: &str, created: &str) -> PanelListRow {
        PanelListRow {
            id: id.to_string(),
            name: name.to_string(),
            version: "1.0".to_string(),
            version_created: created.to_string(),
            number_of_genes: 10,
            number_of_strs: 1,
            number_of_regions: 0,
        }
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(PANEL_LIST_FILE);
        let rows = vec![
            row("137", "Mendeliome", "2024-03-01T00:00:00Z"),
            row("3", "Epilepsy, \"early onset\"", "2023-12-01T10:00:00+10:00"),
        ];

        write_panel_list(&path, &rows).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next().unwrap(), HEADERS.join("\t"));
        assert_eq!(
            lines.next().unwrap(),
            "137\tMendeliome\t1.0\t2024-03-01T00:00:00Z\t10\t1\t0"
        );

        let entities = read_panel_list(&path).unwrap();
        assert_eq!(
            entities,
            vec![
                Entity::new("137", "2024-03-01T00:00:00Z", "Mendeliome"),
                Entity::new("3", "2023-12-01T10:00:00+10:00", "Epilepsy, \"early onset\""),
            ]
        );
    }

    #[test]
    fn test_empty_list_still_has_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(PANEL_LIST_FILE);

        write_panel_list(&path, &[]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap().trim(), HEADERS.join("\t"));
        assert!(read_panel_list(&path).unwrap().is_empty());
    }

    #[test]
    fn test_read_skips_invalid_ids_and_defaults_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(PANEL_LIST_FILE);
        fs::write(
            &path,
            "id\tname\tversion\tversion_created\n\
             12\tCardiac\t0.5\t2024-01-01T00:00:00Z\n\
             abc\tBroken\t0.1\t2024-01-01T00:00:00Z\n\
             \tNo id\t0.1\t2024-01-01T00:00:00Z\n\
             14\t\t0.2\n",
        )
        .unwrap();

        let entities = read_panel_list(&path).unwrap();
        assert_eq!(
            entities,
            vec![
                Entity::new("12", "2024-01-01T00:00:00Z", "Cardiac"),
                Entity::new("14", "", "Unknown"),
            ]
        );
    }

    #[test]
    fn test_read_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        assert!(read_panel_list(&dir.path().join(PANEL_LIST_FILE)).is_err());
    }

    #[test]
    fn test_read_requires_id_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(PANEL_LIST_FILE);
        fs::write(&path, "name\tversion\nX\t1\n").unwrap();
        assert!(read_panel_list(&path).is_err());
    }

    #[test]
    fn test_collect_rows_in_page_order() {
        let dir = TempDir::new().unwrap();
        let page = |ids: &[u64]| {
            let results: Vec<serde_json::Value> = ids
                .iter()
                .map(|id| {
                    json!({
                        "id": id,
                        "name": format!("Panel {}", id),
                        "version": "1.1",
                        "version_created": "2024-01-01T00:00:00Z",
                        "stats": {"number_of_genes": id * 2}
                    })
                })
                .collect();
            json!({ "results": results })
        };

        fs::write(dir.path().join(page_file_name("panels", 2)), page(&[3]).to_string()).unwrap();
        fs::write(dir.path().join(page_file_name("panels", 10)), page(&[4]).to_string()).unwrap();
        fs::write(dir.path().join(page_file_name("panels", 1)), page(&[1, 2]).to_string()).unwrap();
        fs::write(dir.path().join(page_file_name("panels", 3)), "{ not json").unwrap();

        let rows = collect_rows(dir.path()).unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
        assert_eq!(rows[2].number_of_genes, 6);
        assert_eq!(rows[2].number_of_strs, 0);
        assert_eq!(rows[0].name, "Panel 1");
    }
}
