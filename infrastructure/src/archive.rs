//! Saved debates on disk.
//!
//! Each finished debate is written as one pretty-printed JSON file named
//! `{timestamp}_{question-slug}.json`, so a directory listing sorts
//! chronologically.

use agora_application::DebateOutcome;
use agora_domain::util::slugify;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const SLUG_LEN: usize = 50;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid debate file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Directory of saved debate outcomes
pub struct DebateArchive {
    dir: PathBuf,
}

impl DebateArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `$XDG_DATA_HOME/agora/debates`, falling back to `./debates`
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("agora").join("debates"))
            .unwrap_or_else(|| PathBuf::from("debates"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `outcome` and return the new file's path.
    pub fn save(&self, outcome: &DebateOutcome) -> Result<PathBuf, ArchiveError> {
        fs::create_dir_all(&self.dir).map_err(|source| ArchiveError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
        let slug = slugify(outcome.ledger.question().content(), SLUG_LEN);
        let path = self.dir.join(format!("{}_{}.json", stamp, slug));

        let json = serde_json::to_string_pretty(outcome).map_err(|source| ArchiveError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|source| ArchiveError::Io {
            path: path.clone(),
            source,
        })?;

        info!("Saved debate to {}", path.display());
        Ok(path)
    }

    /// Saved debate files, newest first. A missing directory is empty.
    pub fn list(&self) -> Result<Vec<PathBuf>, ArchiveError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(ArchiveError::Io {
                    path: self.dir.clone(),
                    source,
                });
            }
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();
        files.reverse();
        debug!("Found {} saved debates in {}", files.len(), self.dir.display());
        Ok(files)
    }

    pub fn load(&self, path: &Path) -> Result<DebateOutcome, ArchiveError> {
        let content = fs::read_to_string(path).map_err(|source| ArchiveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ArchiveError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participants::ScriptedParticipant;
    use agora_application::{DeferToScores, Participant, RunDebateInput, RunDebateUseCase};
    use agora_domain::{DebateConfig, Question};
    use std::sync::Arc;

    async fn finished_debate(question: &str) -> DebateOutcome {
        let participants: Vec<Arc<dyn Participant>> = ScriptedParticipant::default_panel()
            .into_iter()
            .map(|p| Arc::new(p) as Arc<dyn Participant>)
            .collect();
        let use_case = RunDebateUseCase::new(participants, Arc::new(DeferToScores));
        let input = RunDebateInput::new(
            Question::try_new(question).unwrap(),
            DebateConfig::default(),
        );
        use_case.execute(input).await.unwrap()
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let archive = DebateArchive::new(dir.path().join("debates"));
        let outcome = finished_debate("Should we adopt Rust?").await;

        let path = archive.save(&outcome).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.ends_with("_should-we-adopt-rust.json"));

        let loaded = archive.load(&path).unwrap();
        assert_eq!(loaded.verdict, outcome.verdict);
        assert_eq!(
            loaded.ledger.question().content(),
            "Should we adopt Rust?"
        );
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let archive = DebateArchive::new(dir.path());
        fs::write(dir.path().join("20240101T000000.000Z_old.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let newest = archive.save(&finished_debate("Tabs or spaces?").await).unwrap();

        let files = archive.list().unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0], newest);
    }

    #[test]
    fn test_missing_dir_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let archive = DebateArchive::new(dir.path().join("nowhere"));
        assert!(archive.list().unwrap().is_empty());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "not json").unwrap();
        let err = DebateArchive::new(dir.path()).load(&path).unwrap_err();
        assert!(matches!(err, ArchiveError::Json { .. }));
    }
}
