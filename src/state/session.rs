/// A challenge session: the loaded catalog, its checklist, and the files
/// that mirror it
///
/// Using a move runs in a fixed order: mark the checklist, write the signal
/// file, then auto-save if a save file is open. Only the first step can fail
/// the action. The other two are logged and reported but never undo the use.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use super::checklist::{ChecklistState, UsageLogEntry};
use super::filter::{self, FilterSpec, ViewRow};
use super::save::{self, SaveFile};
use crate::catalog::Catalog;
use crate::error::{Result, TrackerError};
use crate::settings::ChallengeSettings;
use crate::signal::SignalEmitter;

/// Number of log entries the history panel shows
pub const HISTORY_PANEL_LIMIT: usize = 50;

/// What happened to the auto-save after a use
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoSave {
    /// Disabled, or no save file open
    Skipped,
    Saved(PathBuf),
    Failed(String),
}

/// Result of a successful `use_move`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseReport {
    pub id: u32,
    pub name: String,
    /// Set when the signal file could not be written
    pub signal_error: Option<String>,
    pub auto_save: AutoSave,
}

/// Used / total counter for the status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub used: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.used as f64 * 100.0 / self.total as f64
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({:.1}%)", self.used, self.total, self.percent())
    }
}

/// Pull the id out of a picker label such as "120. 몸통박치기"
pub fn parse_selection(text: &str) -> Result<u32> {
    let text = text.trim();
    let head = text.split('.').next().unwrap_or_default().trim();
    head.parse::<u32>()
        .map_err(|_| TrackerError::InvalidSelection(text.to_string()))
}

#[derive(Debug)]
pub struct Session {
    catalog: Arc<Catalog>,
    checklist: ChecklistState,
    emitter: SignalEmitter,
    config: ChallengeSettings,
    save_path: Option<PathBuf>,
}

impl Session {
    pub fn new(catalog: Arc<Catalog>, config: &ChallengeSettings) -> Self {
        let checklist = ChecklistState::new(&catalog, config.log_enabled);
        Self {
            catalog,
            checklist,
            emitter: SignalEmitter::new(&config.signal_path, config.signal_encoding),
            config: config.clone(),
            save_path: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn checklist(&self) -> &ChecklistState {
        &self.checklist
    }

    /// Save file currently associated with the session
    pub fn save_path(&self) -> Option<&Path> {
        self.save_path.as_deref()
    }

    pub fn saves_dir(&self) -> &Path {
        &self.config.saves_dir
    }

    pub fn progress(&self) -> Progress {
        Progress {
            used: self.checklist.consumed_count(),
            total: self.checklist.len(),
        }
    }

    /// The filtered, sorted move table
    pub fn view(&self, spec: &FilterSpec) -> Vec<ViewRow<'_>> {
        filter::apply(&self.catalog, &self.checklist, spec)
    }

    /// Picker labels for unused moves whose name or id contains `query`
    pub fn available_moves(&self, query: &str) -> Vec<String> {
        let needle = query.trim().to_lowercase();
        self.catalog
            .items()
            .iter()
            .filter(|item| !self.checklist.is_consumed(item.id))
            .filter(|item| {
                needle.is_empty()
                    || item.name.to_lowercase().contains(&needle)
                    || item.id.to_string().contains(&needle)
            })
            .map(|item| item.picker_label())
            .collect()
    }

    /// Picker label for `id` if that move is still available
    pub fn pick(&self, id: u32) -> Option<String> {
        let item = self.catalog.get(id)?;
        (!self.checklist.is_consumed(id)).then(|| item.picker_label())
    }

    /// Latest log entries first, each paired with its 1-based position in
    /// the full log
    pub fn recent_history(&self, limit: usize) -> Vec<(usize, &UsageLogEntry)> {
        let log = self.checklist.log();
        log.iter()
            .enumerate()
            .rev()
            .take(limit)
            .map(|(index, entry)| (index + 1, entry))
            .collect()
    }

    /// Use a move: checklist, then signal, then auto-save
    pub fn use_move(&mut self, id: u32) -> Result<UseReport> {
        let catalog = Arc::clone(&self.catalog);
        let item = catalog.get(id).ok_or(TrackerError::UnknownItem(id))?;
        self.checklist.consume(item)?;

        let signal_error = match self.emitter.emit(id) {
            Ok(()) => None,
            Err(e) => {
                warn!("{}", e);
                Some(e.to_string())
            }
        };

        let auto_save = if self.config.auto_save_on_consume {
            match self.save() {
                Ok(Some(path)) => AutoSave::Saved(path),
                Ok(None) => AutoSave::Skipped,
                Err(e) => {
                    warn!("Auto-save after use failed: {}", e);
                    AutoSave::Failed(e.to_string())
                }
            }
        } else {
            AutoSave::Skipped
        };

        Ok(UseReport {
            id,
            name: item.name.clone(),
            signal_error,
            auto_save,
        })
    }

    /// Clear all progress, keeping the open save file
    pub fn reset_all(&mut self) {
        self.checklist.reset_all();
    }

    /// Clear all progress and forget the open save file
    pub fn new_challenge(&mut self) {
        self.checklist.reset_all();
        self.save_path = None;
        info!("Started a new challenge");
    }

    /// Write to the open save file. `Ok(None)` means no file is open and the
    /// caller should ask for one.
    pub fn save(&self) -> Result<Option<PathBuf>> {
        let Some(path) = self.save_path.clone() else {
            return Ok(None);
        };
        self.write_save(&path)?;
        Ok(Some(path))
    }

    /// Write to `path` and make it the open save file
    pub fn save_as(&mut self, path: &Path) -> Result<()> {
        self.write_save(path)?;
        self.save_path = Some(path.to_path_buf());
        Ok(())
    }

    fn write_save(&self, path: &Path) -> Result<()> {
        let save_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let snapshot = SaveFile::capture(
            &self.checklist,
            &save_name,
            &self.config.game_version,
            &self.config.challenge_type,
        );
        save::save(&snapshot, path)
    }

    /// Replace progress with the contents of `path` and make it the open
    /// save file. On error nothing changes.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let file = save::load(path)?;
        self.checklist.restore(&file.snapshot());
        self.save_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Swap in a reloaded catalog, carrying progress across by id
    pub fn replace_catalog(&mut self, catalog: Arc<Catalog>) {
        let snapshot = self.checklist.snapshot();
        let mut checklist = ChecklistState::new(&catalog, self.config.log_enabled);
        checklist.restore(&snapshot);

        self.catalog = catalog;
        self.checklist = checklist;
        info!("Catalog replaced ({} moves)", self.catalog.len());
    }
}
