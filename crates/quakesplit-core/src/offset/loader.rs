use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::offset::LayoutEntry;

/// Load layout rows from a JSON array file
pub fn load_layouts(path: &Path) -> Result<Vec<LayoutEntry>> {
    let content = fs::read_to_string(path)?;
    let entries: Vec<LayoutEntry> = serde_json::from_str(&content)?;

    for entry in &entries {
        entry.validate().map_err(|e| {
            Error::InvalidLayout(format!("{} in {}: {}", entry.layout.version, path.display(), e))
        })?;
    }

    Ok(entries)
}

/// Write layout rows as pretty-printed JSON
pub fn save_layouts(path: &Path, entries: &[LayoutEntry]) -> Result<()> {
    let content = serde_json::to_string_pretty(entries)?;
    fs::write(path, content)?;
    info!("Saved {} layout(s) to {}", entries.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::DeepPointer;
    use crate::offset::LayoutTable;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layouts.json");

        let entries: Vec<LayoutEntry> = LayoutTable::builtin().entries().cloned().collect();
        save_layouts(&path, &entries).unwrap();

        let loaded = load_layouts(&path).unwrap();
        assert_eq!(loaded, entries);
    }

    #[test]
    fn test_load_minimal_entry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layouts.json");
        fs::write(
            &path,
            r#"[{
                "process_name": "joequake-gl",
                "module_size": 4096,
                "layout": {
                    "version": "custom",
                    "map_name": {"base": 16, "offsets": [0]},
                    "map_time": {"base": 32, "offsets": [0]},
                    "game_state": {"base": 48, "offsets": [0]},
                    "counter": {"base": 64, "offsets": [0]},
                    "total_time": {"module": "qdq.dll", "base": 80, "offsets": [0, 4]},
                    "game_name": {"base": 96, "offsets": [0]}
                }
            }]"#,
        )
        .unwrap();

        let loaded = load_layouts(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded[0].total_time_variants.is_empty());
        assert_eq!(loaded[0].layout.total_time.module.as_deref(), Some("qdq.dll"));
        assert_eq!(loaded[0].layout.counter, Some(DeepPointer::direct(64)));
    }

    #[test]
    fn test_load_rejects_empty_chain() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layouts.json");
        let mut entry = LayoutTable::builtin().entries().next().cloned().unwrap();
        entry.layout.map_time.offsets = std::borrow::Cow::Owned(Vec::new());
        fs::write(&path, serde_json::to_string(&vec![entry]).unwrap()).unwrap();

        assert!(matches!(load_layouts(&path), Err(Error::InvalidLayout(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_layouts(Path::new("/nonexistent/layouts.json")).unwrap_err();
        assert!(err.is_not_found());
    }
}
