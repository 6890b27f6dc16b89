//! Import of custom activity definitions from `.activities` files
//!
//! Each non-empty, non-comment line defines one activity:
//!
//! ```text
//! # category | id | name | kg CO2 per unit | unit
//! food | oat-milk | Oat Milk | 0.9 | liters
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::catalog::{self, Catalog};
use crate::error::ImportError;
use crate::models::{ActivityCategory, ActivityDefinition};
use crate::store::SqliteStore;

const EXTENSION: &str = "activities";

/// Find all `*.activities` files under `dir`, sorted by path
pub fn find_activity_files(dir: &Path) -> Result<Vec<PathBuf>, ImportError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|source| ImportError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == EXTENSION) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Line parser for the activity file format
pub struct ActivityParser {
    line_re: Regex,
}

impl ActivityParser {
    pub fn new() -> Result<Self, ImportError> {
        let line_re = Regex::new(
            r"^\s*(?P<category>\w+)\s*\|\s*(?P<id>[A-Za-z0-9][\w-]*)\s*\|\s*(?P<name>[^|]*?)\s*\|\s*(?P<factor>\d+(?:\.\d+)?)\s*\|\s*(?P<unit>[^|]*?)\s*$",
        )?;
        Ok(Self { line_re })
    }

    /// Parse one line. `Ok(None)` for blank lines and comments; `Err` with a
    /// reason for lines that don't describe a valid activity.
    pub fn parse_line(&self, line: &str) -> Result<Option<ActivityDefinition>, String> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let cap = self
            .line_re
            .captures(trimmed)
            .ok_or_else(|| "expected 'category | id | name | factor | unit'".to_string())?;

        let category: ActivityCategory = cap["category"].parse().map_err(|e| format!("{e}"))?;
        let emission_factor: f64 = cap["factor"].parse().map_err(|e| format!("bad factor: {e}"))?;

        let name = cap["name"].to_string();
        let unit = cap["unit"].to_string();
        if name.is_empty() || unit.is_empty() {
            return Err("name and unit must not be empty".to_string());
        }

        let definition = ActivityDefinition {
            id: cap["id"].to_string(),
            category,
            name,
            emission_factor,
            unit,
        };
        catalog::validate(&definition).map_err(|e| e.to_string())?;
        Ok(Some(definition))
    }

    /// Parse a whole file; invalid lines are logged and counted
    pub fn parse_file(&self, path: &Path) -> Result<(Vec<ActivityDefinition>, usize), ImportError> {
        let content = fs::read_to_string(path).map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut definitions = Vec::new();
        let mut skipped = 0;
        for (idx, line) in content.lines().enumerate() {
            match self.parse_line(line) {
                Ok(Some(def)) => definitions.push(def),
                Ok(None) => {}
                Err(reason) => {
                    warn!(file = %path.display(), line = idx + 1, %reason, "skipping activity line");
                    skipped += 1;
                }
            }
        }
        Ok((definitions, skipped))
    }
}

/// Import every activity file under `dir` into the store
pub fn import_to_store(store: &SqliteStore, dir: &Path) -> anyhow::Result<ImportStats> {
    let parser = ActivityParser::new()?;
    let files = find_activity_files(dir)?;
    info!(count = files.len(), dir = %dir.display(), "found activity files");

    // Built-in ids can't be overridden, and the first file to define an id wins
    let mut seen = Catalog::builtin();
    let mut stats = ImportStats::default();

    for path in &files {
        let (definitions, skipped) = parser.parse_file(path)?;
        stats.files += 1;
        stats.skipped += skipped;

        for definition in definitions {
            let id = definition.id.clone();
            match seen.insert(definition.clone()) {
                Ok(()) => {
                    store.upsert_activity(&definition)?;
                    stats.definitions += 1;
                    debug!(%id, file = %path.display(), "imported activity");
                }
                Err(e) => {
                    warn!(%id, file = %path.display(), error = %e, "skipping activity");
                    stats.skipped += 1;
                }
            }
        }
    }

    Ok(stats)
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportStats {
    pub files: usize,
    pub definitions: usize,
    pub skipped: usize,
}

impl std::fmt::Display for ImportStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Imported {} activities from {} files. Skipped: {}",
            self.definitions, self.files, self.skipped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ActivityParser {
        ActivityParser::new().unwrap()
    }

    #[test]
    fn test_parse_valid_line() {
        let def = parser()
            .parse_line("  Food | oat-milk | Oat Milk (Barista) | 0.9 | liters ")
            .unwrap()
            .unwrap();
        assert_eq!(def.category, ActivityCategory::Food);
        assert_eq!(def.id, "oat-milk");
        assert_eq!(def.name, "Oat Milk (Barista)");
        assert_eq!(def.emission_factor, 0.9);
        assert_eq!(def.unit, "liters");
    }

    #[test]
    fn test_blank_and_comment_lines_ignored() {
        assert_eq!(parser().parse_line("   ").unwrap(), None);
        assert_eq!(parser().parse_line("# food | x | X | 1 | kg").unwrap(), None);
    }

    #[test]
    fn test_invalid_lines_rejected() {
        let p = parser();
        assert!(p.parse_line("food | oat-milk | Oat Milk | 0.9").is_err());
        assert!(p.parse_line("plasma | x | X | 1 | kg").is_err());
        assert!(p.parse_line("food | x | X | -1 | kg").is_err());
        assert!(p.parse_line("food | x |  | 1 | kg").is_err());
    }

    #[test]
    fn test_import_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("regional");
        fs::create_dir(&nested).unwrap();
        fs::write(
            dir.path().join("food.activities"),
            "# custom foods\nfood | oat-milk | Oat Milk | 0.9 | liters\nfood | beef | Beef | 1 | kg\nnot a line\n",
        )
        .unwrap();
        fs::write(
            nested.join("transport.activities"),
            "transport | e-scooter | E-Scooter | 0.02 | km\nfood | oat-milk | Oat Milk | 0.5 | liters\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "water | x | X | 1 | l\n").unwrap();

        let store = SqliteStore::open_in_memory().unwrap();
        let stats = import_to_store(&store, dir.path()).unwrap();

        assert_eq!(stats, ImportStats { files: 2, definitions: 2, skipped: 3 });
        let ids: Vec<_> = store.custom_activities().unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["e-scooter", "oat-milk"]);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(import_to_store(&store, Path::new("/definitely/not/here")).is_err());
    }
}
