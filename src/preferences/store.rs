// Preferences store - Load at startup, save at shutdown

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Preferences, PreferencesError};

const APP_DIR: &str = "metromono";
const FILE_NAME: &str = "preferences";
/// Used when the platform has no config directory
const FALLBACK_FILE: &str = ".metromono";

/// Result of reading the preferences file
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Preferences),
    /// No file yet (first run)
    Missing,
    /// File present but unusable; defaults apply
    Malformed(PreferencesError),
}

impl LoadOutcome {
    /// Stored values, or defaults when missing or malformed
    pub fn preferences(&self) -> Preferences {
        match self {
            LoadOutcome::Loaded(prefs) => *prefs,
            LoadOutcome::Missing | LoadOutcome::Malformed(_) => Preferences::default(),
        }
    }
}

/// File-backed preferences
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Store in the user's config directory
    pub fn at_default_location() -> Self {
        Self::new(Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        match dirs::config_dir() {
            Some(dir) => dir.join(APP_DIR).join(FILE_NAME),
            None => PathBuf::from(FALLBACK_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> LoadOutcome {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No preferences at {}, using defaults", self.path.display());
                return LoadOutcome::Missing;
            }
            Err(e) => {
                log::warn!("Cannot read {}: {}", self.path.display(), e);
                return LoadOutcome::Malformed(e.into());
            }
        };

        match Preferences::parse(&text) {
            Ok(prefs) => {
                log::info!("Loaded preferences from {}: {:?}", self.path.display(), prefs);
                LoadOutcome::Loaded(prefs)
            }
            Err(e) => {
                log::warn!("Malformed preferences in {}: {}", self.path.display(), e);
                LoadOutcome::Malformed(e)
            }
        }
    }

    /// Overwrite the file with `prefs`, creating its directory if needed
    pub fn save(&self, prefs: &Preferences) -> Result<(), PreferencesError> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, prefs.to_string())?;
        log::info!("Saved preferences to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::timeline::{Tempo, TimeSignature, Tone};
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let store = PreferencesStore::new(dir.path().join("preferences"));

        let outcome = store.load();
        assert!(matches!(outcome, LoadOutcome::Missing));
        assert_eq!(outcome.preferences(), Preferences::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = PreferencesStore::new(dir.path().join("nested").join("preferences"));
        let prefs = Preferences {
            tempo: Tempo::new(97).unwrap(),
            time_signature: TimeSignature::TwoFour,
            tone: Tone::C,
        };

        store.save(&prefs).unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "97\n2\nC\n");

        match store.load() {
            LoadOutcome::Loaded(loaded) => assert_eq!(loaded, prefs),
            other => panic!("expected Loaded, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences");
        fs::write(&path, "sixty\n0\nA\n").unwrap();

        let outcome = PreferencesStore::new(&path).load();
        assert!(matches!(
            outcome,
            LoadOutcome::Malformed(PreferencesError::InvalidNumber { .. })
        ));
        assert_eq!(outcome.preferences(), Preferences::default());
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences");
        fs::write(&path, "garbage that is longer than the new content\n").unwrap();

        PreferencesStore::new(&path)
            .save(&Preferences::default())
            .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "60\n0\nA\n");
    }

    #[test]
    fn test_directory_in_place_of_file_is_malformed() {
        let dir = tempdir().unwrap();
        let outcome = PreferencesStore::new(dir.path()).load();
        assert!(matches!(outcome, LoadOutcome::Malformed(_)));
    }
}
