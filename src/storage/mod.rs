//! Storage layer for organizer data.
//!
//! All data lives under one data root:
//!
//! ```text
//! <root>/init/<module>_data.json     one JSON document per module
//! <root>/img/<nodeId>_<rand><ext>    images uploaded to the ideas canvas
//! <root>/backups/backup_<ts>/        snapshot copies of init/*_data.json
//! <root>/config.kdl                  per-root configuration
//! <root>/action.log                  JSONL audit log of CLI invocations
//! ```
//!
//! Every store follows the same contract: load the whole document (a missing
//! file is the empty default), mutate it in memory, and rewrite the whole
//! file atomically. Stores are cheap handles created from a [`Storage`].

pub mod atomic;
pub mod board;
pub mod canvas;
pub mod collection;
pub mod steps;

pub use board::BoardStore;
pub use canvas::CanvasStore;
pub use collection::{Collection, JsonDocument, Loaded};
pub use steps::StepStore;

use crate::backup::BackupManager;
use crate::models::{CalendarEvent, Goal, LinkRecord};
use crate::{Error, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the default data root.
pub const DATA_DIR_ENV: &str = "ORG_DATA_DIR";

/// Suffix shared by every module document; backups copy exactly these files.
pub const DATA_FILE_SUFFIX: &str = "_data.json";

pub const LINKS_FILE: &str = "links_data.json";
pub const EVENTS_FILE: &str = "calendario_data.json";
pub const GOALS_FILE: &str = "objetivos_data.json";
pub const STEPS_FILE: &str = "passos_data.json";
pub const BOARD_FILE: &str = "planejamento_data.json";
pub const CANVAS_FILE: &str = "ideias_data.json";

/// Handle on one data root.
#[derive(Debug, Clone)]
pub struct Storage {
    /// Root directory holding init/, img/ and backups/
    pub root: PathBuf,
}

impl Storage {
    /// Create a storage handle for the given data root. Nothing is touched on disk.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open storage at the resolved data root (explicit path, env var, or platform default).
    pub fn open(explicit_root: Option<&Path>) -> Result<Self> {
        Ok(Self::new(get_data_root(explicit_root)?))
    }

    /// Create the img/ and backups/ directories if missing.
    ///
    /// init/ is left to the first document write, so a root that never held a
    /// document has nothing to snapshot.
    pub fn ensure_layout(&self) -> Result<()> {
        fs::create_dir_all(self.image_dir())?;
        fs::create_dir_all(self.backup_dir())?;
        Ok(())
    }

    /// Directory holding the live module documents.
    pub fn init_dir(&self) -> PathBuf {
        self.root.join("init")
    }

    /// Directory holding uploaded canvas images.
    pub fn image_dir(&self) -> PathBuf {
        self.root.join("img")
    }

    /// Directory holding backup snapshots.
    pub fn backup_dir(&self) -> PathBuf {
        self.root.join("backups")
    }

    pub fn links(&self) -> Collection<LinkRecord> {
        Collection::new(self.init_dir(), LINKS_FILE)
    }

    pub fn events(&self) -> Collection<CalendarEvent> {
        Collection::new(self.init_dir(), EVENTS_FILE)
    }

    pub fn goals(&self) -> Collection<Goal> {
        Collection::new(self.init_dir(), GOALS_FILE)
    }

    pub fn steps(&self) -> StepStore {
        StepStore::new(self.init_dir(), STEPS_FILE)
    }

    pub fn board(&self) -> BoardStore {
        BoardStore::new(self.init_dir(), BOARD_FILE)
    }

    pub fn canvas(&self) -> CanvasStore {
        CanvasStore::new(self.init_dir(), CANVAS_FILE, self.image_dir())
    }

    /// Backup manager for this root with the default retention cap.
    pub fn backups(&self) -> BackupManager {
        BackupManager::new(&self.root)
    }
}

/// Resolve the data root.
///
/// Priority: explicit path > `ORG_DATA_DIR` env var > `<platform data dir>/organizer`.
pub fn get_data_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    let data_dir = dirs::data_dir()
        .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))?;
    Ok(data_dir.join("organizer"))
}

/// Generate a record ID.
///
/// Format: `<prefix>-<4 hex chars>`, hashed from the seed and the current time.
pub fn generate_id(prefix: &str, seed: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hasher.update(
        chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or(0)
            .to_le_bytes(),
    );
    let hash = hasher.finalize();
    let hash_hex = format!("{:x}", hash);
    format!("{}-{}", prefix, &hash_hex[..4])
}

/// Reject names that could resolve outside their parent directory.
///
/// `what` names the kind of entry in the error message (e.g. "backup name").
pub fn validate_file_name(name: &str, what: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(Error::InvalidInput(format!("Invalid {}: {:?}", what, name)));
    }
    if name.contains(['/', '\\']) {
        return Err(Error::InvalidInput(format!(
            "Invalid {} (path separators are not allowed): {}",
            what, name
        )));
    }
    Ok(())
}

/// True when `name` is a module document copied by backups.
pub fn is_data_file_name(name: &str) -> bool {
    name.ends_with(DATA_FILE_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestEnv;
    use serial_test::serial;

    #[test]
    fn test_generate_id_format() {
        let id = generate_id("lnk", "test seed");
        assert!(id.starts_with("lnk-"));
        assert_eq!(id.len(), 8);
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_id_uniqueness() {
        let id1 = generate_id("step", "seed1");
        let id2 = generate_id("step", "seed2");
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_layout_paths() {
        let storage = Storage::new("/data");
        assert_eq!(storage.init_dir(), PathBuf::from("/data/init"));
        assert_eq!(storage.image_dir(), PathBuf::from("/data/img"));
        assert_eq!(storage.backup_dir(), PathBuf::from("/data/backups"));
    }

    #[test]
    fn test_ensure_layout_creates_directories() {
        let env = TestEnv::new();
        let storage = env.storage();
        storage.ensure_layout().unwrap();
        assert!(storage.image_dir().is_dir());
        assert!(storage.backup_dir().is_dir());
        assert!(!storage.init_dir().exists());
    }

    #[test]
    fn test_module_documents_end_with_data_suffix() {
        for name in [LINKS_FILE, EVENTS_FILE, GOALS_FILE, STEPS_FILE, BOARD_FILE, CANVAS_FILE] {
            assert!(is_data_file_name(name), "{} must be picked up by backups", name);
        }
        assert!(!is_data_file_name("config.kdl"));
    }

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("backup_2024-01-01_00-00-00", "backup name").is_ok());
        assert!(validate_file_name("a/b", "backup name").is_err());
        assert!(validate_file_name("a\\b", "backup name").is_err());
        assert!(validate_file_name("..", "backup name").is_err());
        assert!(validate_file_name("", "backup name").is_err());
    }

    #[test]
    fn test_explicit_data_root_wins() {
        let root = get_data_root(Some(Path::new("/explicit"))).unwrap();
        assert_eq!(root, PathBuf::from("/explicit"));
    }

    #[test]
    #[serial]
    fn test_data_root_from_env() {
        // SAFETY: serialized with every other test that touches the environment.
        unsafe { std::env::set_var(DATA_DIR_ENV, "/from-env") };
        let root = get_data_root(None).unwrap();
        unsafe { std::env::remove_var(DATA_DIR_ENV) };
        assert_eq!(root, PathBuf::from("/from-env"));
    }
}
