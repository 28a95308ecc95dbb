/// Save files: complete JSON snapshots of challenge progress
///
/// Layout:
/// ```json
/// {
///   "save_name": "run1.json",
///   "created_date": "2025-01-15T10:30:00.123456",
///   "used_moves": [false, true, ...],
///   "move_history": [{"id": 2, "name": "...", "timestamp": "2025-01-15 10:30:00"}],
///   "metadata": {"game_version": "Platinum", "challenge_type": "Single Use",
///                "total_moves": 469, "used_count": 1}
/// }
/// ```
/// `move_history` may be absent. Every save rewrites the whole file.

use std::fs;
use std::path::Path;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::checklist::{ChecklistSnapshot, ChecklistState, UsageLogEntry};
use crate::error::{Result, TrackerError};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SaveMetadata {
    pub game_version: String,
    pub challenge_type: String,
    pub total_moves: usize,
    pub used_count: usize,
}

impl Default for SaveMetadata {
    fn default() -> Self {
        Self {
            game_version: "Platinum".to_string(),
            challenge_type: "Single Use".to_string(),
            total_moves: 0,
            used_count: 0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SaveFile {
    #[serde(default)]
    pub save_name: String,
    #[serde(default)]
    pub created_date: Option<NaiveDateTime>,
    pub used_moves: Vec<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_history: Option<Vec<UsageLogEntry>>,
    #[serde(default)]
    pub metadata: SaveMetadata,
}

impl SaveFile {
    /// Capture `state` under `save_name`, tagged with the game and
    /// challenge labels
    pub fn capture(state: &ChecklistState, save_name: &str, game_version: &str, challenge_type: &str) -> Self {
        let snapshot = state.snapshot();
        Self {
            save_name: save_name.to_string(),
            created_date: Some(Local::now().naive_local()),
            metadata: SaveMetadata {
                game_version: game_version.to_string(),
                challenge_type: challenge_type.to_string(),
                total_moves: snapshot.used_moves.len(),
                used_count: snapshot.used_moves.iter().filter(|used| **used).count(),
            },
            used_moves: snapshot.used_moves,
            move_history: snapshot.move_history,
        }
    }

    pub fn snapshot(&self) -> ChecklistSnapshot {
        ChecklistSnapshot {
            used_moves: self.used_moves.clone(),
            move_history: self.move_history.clone(),
        }
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Write `save` to `path`, creating parent directories as needed
pub fn save(save: &SaveFile, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| TrackerError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let json = save
        .to_json()
        .map_err(|e| TrackerError::FormatInvalid(e.to_string()))?;

    fs::write(path, json).map_err(|source| TrackerError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        "Saved challenge to {} ({}/{} used)",
        path.display(),
        save.metadata.used_count,
        save.metadata.total_moves
    );
    Ok(())
}

/// Read a save file from `path`
///
/// # Errors
/// * `FileNotFound` - nothing at `path`
/// * `FormatInvalid` - not JSON, or a required field is missing or mistyped
pub fn load(path: &Path) -> Result<SaveFile> {
    if !path.is_file() {
        return Err(TrackerError::FileNotFound(path.to_path_buf()));
    }

    let json = fs::read_to_string(path).map_err(|source| TrackerError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let save = SaveFile::from_json(&json).map_err(|e| TrackerError::FormatInvalid(e.to_string()))?;
    info!("Loaded save {:?} from {}", save.save_name, path.display());
    Ok(save)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;
    use tempfile::TempDir;

    #[test]
    fn test_capture_fills_metadata() {
        let catalog = fixtures::numbered(469);
        let mut state = ChecklistState::new(&catalog, true);
        state.consume(catalog.get(120).unwrap()).unwrap();

        let save = SaveFile::capture(&state, "run.json", "Platinum", "Single Use");
        assert_eq!(save.metadata.total_moves, 469);
        assert_eq!(save.metadata.used_count, 1);
        assert_eq!(save.used_moves.len(), 469);
        assert!(save.used_moves[119]);
        assert_eq!(save.move_history.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_save_creates_parent_dirs_and_loads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("saves").join("nested").join("run.json");

        let catalog = fixtures::numbered(10);
        let mut state = ChecklistState::new(&catalog, true);
        state.consume(catalog.get(4).unwrap()).unwrap();
        let written = SaveFile::capture(&state, "run.json", "Platinum", "Single Use");

        save(&written, &path).unwrap();
        let read = load(&path).unwrap();

        assert_eq!(read.used_moves, written.used_moves);
        assert_eq!(read.move_history, written.move_history);
        assert_eq!(read.metadata, written.metadata);
        assert_eq!(read.save_name, "run.json");
    }

    #[test]
    fn test_history_omitted_when_log_disabled() {
        let catalog = fixtures::numbered(3);
        let state = ChecklistState::new(&catalog, false);
        let json = SaveFile::capture(&state, "a.json", "Platinum", "Single Use")
            .to_json()
            .unwrap();
        assert!(!json.contains("move_history"));
        assert!(json.contains("\"used_moves\""));
    }

    #[test]
    fn test_load_tolerates_older_files() {
        let json = r#"{
            "save_name": "old.json",
            "created_date": "2025-01-15T10:30:00.123456",
            "used_moves": [true, false],
            "metadata": {"game_version": "Platinum", "challenge_type": "Single Use",
                         "total_moves": 2, "used_count": 1}
        }"#;
        let save = SaveFile::from_json(json).unwrap();
        assert_eq!(save.move_history, None);
        assert!(save.created_date.is_some());

        let minimal = SaveFile::from_json(r#"{"used_moves": [false]}"#).unwrap();
        assert_eq!(minimal.metadata.game_version, "Platinum");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, TrackerError::FileNotFound(_)));
    }

    #[test]
    fn test_load_rejects_bad_shapes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");

        for body in [
            "not json",
            r#"{"save_name": "x"}"#,
            r#"{"used_moves": "yes"}"#,
            r#"{"used_moves": [true], "move_history": [{"id": 1}]}"#,
        ] {
            fs::write(&path, body).unwrap();
            assert!(
                matches!(load(&path), Err(TrackerError::FormatInvalid(_))),
                "body {:?} should be rejected",
                body
            );
        }
    }
}
