/// Signal file for the in-game automation script
///
/// After each use the id of that move is written to a fixed file, replacing
/// what was there. The script polls this file. Nothing is read back, and a
/// failed write never undoes the use.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, TrackerError};

/// How the id is written
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SignalEncoding {
    /// "120"
    #[default]
    Decimal,
    /// "0078"
    Hex,
}

impl SignalEncoding {
    pub fn encode(self, id: u32) -> String {
        match self {
            SignalEncoding::Decimal => id.to_string(),
            SignalEncoding::Hex => format!("{:04X}", id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignalEmitter {
    path: PathBuf,
    encoding: SignalEncoding,
}

impl SignalEmitter {
    pub fn new(path: impl Into<PathBuf>, encoding: SignalEncoding) -> Self {
        Self {
            path: path.into(),
            encoding,
        }
    }

    /// Overwrite the signal file with `id`
    ///
    /// # Errors
    /// * `SignalWriteFailed` - the directory or file could not be written
    pub fn emit(&self, id: u32) -> Result<()> {
        let failed = |source| TrackerError::SignalWriteFailed {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(failed)?;
        }

        let payload = self.encoding.encode(id);
        fs::write(&self.path, &payload).map_err(failed)?;

        info!("Signalled move {} to {}", payload, self.path.display());
        Ok(())
    }
}
