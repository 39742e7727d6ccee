//! Snapshot persistence.
//!
//! Stores hold one opaque `MatchSkillState` per match id. `save` is an
//! optimistic compare-and-swap on `version`: the caller must have loaded
//! the version currently stored, otherwise the write is refused with
//! `StaleSnapshot` and nothing changes.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::core::{EngineError, EngineResult};

use super::snapshot::MatchSkillState;

/// Keyed snapshot storage.
pub trait SkillStateStore {
    /// Load a match's snapshot, or the default state if none is stored.
    fn load(&self, match_id: &str) -> EngineResult<MatchSkillState>;

    /// Replace a match's snapshot and return it with its new version.
    fn save(&mut self, match_id: &str, state: &MatchSkillState) -> EngineResult<MatchSkillState>;
}

fn check_version(match_id: &str, stored: u64, state: &MatchSkillState) -> EngineResult<MatchSkillState> {
    if stored != state.version {
        warn!(match_id, expected = state.version, found = stored, "stale snapshot write refused");
        return Err(EngineError::StaleSnapshot {
            match_id: match_id.to_string(),
            expected: state.version,
            found: stored,
        });
    }
    let mut next = state.clone();
    next.version = stored + 1;
    Ok(next)
}

/// In-process store, one map entry per match.
#[derive(Clone, Debug, Default)]
pub struct MemoryStateStore {
    snapshots: FxHashMap<String, MatchSkillState>,
}

impl MemoryStateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Drop a match's snapshot.
    pub fn remove(&mut self, match_id: &str) -> Option<MatchSkillState> {
        self.snapshots.remove(match_id)
    }
}

impl SkillStateStore for MemoryStateStore {
    fn load(&self, match_id: &str) -> EngineResult<MatchSkillState> {
        Ok(self.snapshots.get(match_id).cloned().unwrap_or_default())
    }

    fn save(&mut self, match_id: &str, state: &MatchSkillState) -> EngineResult<MatchSkillState> {
        let stored = self.snapshots.get(match_id).map_or(0, |s| s.version);
        let next = check_version(match_id, stored, state)?;
        self.snapshots.insert(match_id.to_string(), next.clone());
        Ok(next)
    }
}

impl<S: SkillStateStore + ?Sized> SkillStateStore for &mut S {
    fn load(&self, match_id: &str) -> EngineResult<MatchSkillState> {
        (**self).load(match_id)
    }

    fn save(&mut self, match_id: &str, state: &MatchSkillState) -> EngineResult<MatchSkillState> {
        (**self).save(match_id, state)
    }
}

impl<S: SkillStateStore + ?Sized> SkillStateStore for Box<S> {
    fn load(&self, match_id: &str) -> EngineResult<MatchSkillState> {
        (**self).load(match_id)
    }

    fn save(&mut self, match_id: &str, state: &MatchSkillState) -> EngineResult<MatchSkillState> {
        (**self).save(match_id, state)
    }
}

/// One `<match_id>.json` file per match under a directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader never sees a half-written snapshot.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `match_id`.
    ///
    /// Bytes outside `[A-Za-z0-9-]` (including `_` itself) are written as
    /// `_` plus two hex digits. The encoding is reversible, so distinct ids
    /// never share a file, and no id can escape the directory.
    #[must_use]
    pub fn path_for(&self, match_id: &str) -> PathBuf {
        let mut name = String::with_capacity(match_id.len());
        for byte in match_id.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                name.push(char::from(byte));
            } else {
                name.push_str(&format!("_{:02X}", byte));
            }
        }
        self.dir.join(format!("{}.json", name))
    }

    fn read(path: &Path) -> EngineResult<Option<MatchSkillState>> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl SkillStateStore for JsonFileStore {
    fn load(&self, match_id: &str) -> EngineResult<MatchSkillState> {
        Ok(Self::read(&self.path_for(match_id))?.unwrap_or_default())
    }

    fn save(&mut self, match_id: &str, state: &MatchSkillState) -> EngineResult<MatchSkillState> {
        let path = self.path_for(match_id);
        let stored = Self::read(&path)?.map_or(0, |s| s.version);
        let next = check_version(match_id, stored, state)?;

        fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&next)?)?;
        fs::rename(&tmp, &path)?;

        debug!(match_id, version = next.version, path = %path.display(), "snapshot saved");
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("caro-skills-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_memory_store_versions() {
        let mut store = MemoryStateStore::new();
        let state = store.load("m1").unwrap();
        assert_eq!(state.version, 0);

        let saved = store.save("m1", &state).unwrap();
        assert_eq!(saved.version, 1);
        assert_eq!(store.load("m1").unwrap().version, 1);

        // Writing the old snapshot again loses the race.
        let err = store.save("m1", &state).unwrap_err();
        assert_eq!(err.code(), "stale_snapshot");
        assert_eq!(store.load("m1").unwrap().version, 1);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = scratch_dir("roundtrip");
        let mut store = JsonFileStore::new(&dir);

        let mut state = store.load("match-9").unwrap();
        assert_eq!(state, MatchSkillState::default());

        state.turn = 3;
        state.mana.insert(PlayerId::new(1), 8);
        let saved = store.save("match-9", &state).unwrap();

        let loaded = store.load("match-9").unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(loaded.turn, 3);
        assert!(store.path_for("match-9").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_names_stay_in_dir() {
        let store = JsonFileStore::new("/tmp/snapshots");
        assert_eq!(
            store.path_for("../etc/passwd"),
            PathBuf::from("/tmp/snapshots/_2E_2E_2Fetc_2Fpasswd.json")
        );
        assert_eq!(store.path_for("match_1"), PathBuf::from("/tmp/snapshots/match_5F1.json"));
        assert_ne!(store.path_for("match.1"), store.path_for("match_1"));
    }
}
