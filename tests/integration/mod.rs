//! Integration tests for versa
//!
//! Drives whole editing sessions against a tracked file in a temporary
//! directory: recording, pruning, reopening and loading versions back.

use ::versa::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use tracing::info;
use tracing_test::traced_test;

/// Test harness for editing sessions on one tracked file
pub struct VersaTestHarness {
    pub temp_dir: TempDir,
    pub config: VersaConfig,
    pub service: VersioningService<FileBackups>,
    pub rng: StdRng,
}

impl VersaTestHarness {
    /// Create a harness tracking `notes.txt` in a fresh directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config = VersaConfig {
            tracked_file: temp_dir.path().join("notes.txt"),
            ..Default::default()
        };
        let service = VersioningService::open(&config).unwrap();

        Self {
            temp_dir,
            config,
            service,
            rng: StdRng::seed_from_u64(42),
        }
    }

    /// Overwrite the tracked file
    pub fn edit(&self, content: &str) {
        fs::write(&self.config.tracked_file, content).unwrap();
    }

    /// Record the tracked file as a new version
    pub fn commit(&mut self) -> Result<u64> {
        let text = self.service.backups().read_tracked()?;
        self.service.add(text)
    }

    /// Drop the service and rebuild it from the backups on disk
    pub fn reopen(&mut self) {
        self.service = VersioningService::open(&self.config).unwrap();
    }

    /// Current tracked file content
    pub fn tracked(&self) -> String {
        fs::read_to_string(&self.config.tracked_file).unwrap()
    }

    /// Backup path for a version
    pub fn backup_path(&self, version: u64) -> PathBuf {
        self.service.backups().backup_path(version)
    }

    /// Random multi-line text made of a handful of words
    pub fn random_text(&mut self) -> String {
        const WORDS: &[&str] = &["alpha", "beta", "gamma", "delta", "omega", "-"];
        let lines = self.rng.random_range(1..8);
        (0..lines)
            .map(|_| {
                let words = self.rng.random_range(1..4);
                (0..words)
                    .map(|_| WORDS[self.rng.random_range(0..WORDS.len())])
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// `(version, content)` of every stored version
    pub fn history(&self) -> Vec<(u64, String)> {
        self.service
            .list_all()
            .map(|s| (s.version(), s.content().to_string()))
            .collect()
    }
}

#[test]
#[traced_test]
fn test_random_session_survives_reopen() {
    let mut harness = VersaTestHarness::new();
    let mut recorded = Vec::new();

    for round in 0..60 {
        let text = harness.random_text();
        harness.edit(&text);
        match harness.commit() {
            Ok(version) => recorded.push(version),
            Err(VersaError::DuplicateContent) => {}
            Err(e) => panic!("unexpected error: {}", e),
        }

        // Prune now and then
        if round % 7 == 6 && !recorded.is_empty() {
            let idx = harness.rng.random_range(0..recorded.len());
            let version = recorded.remove(idx);
            harness.service.remove(version).unwrap();
            assert!(!harness.backup_path(version).exists());
        }
    }

    info!("Recorded {} versions", recorded.len());
    let before = harness.history();
    let latest = harness.service.latest_version();
    assert_eq!(before.iter().map(|(v, _)| *v).collect::<Vec<_>>(), recorded);

    harness.reopen();
    assert_eq!(harness.history(), before);
    assert_eq!(harness.service.latest_version(), recorded.last().copied().unwrap_or(0));
    assert!(harness.service.latest_version() <= latest);
}

#[test]
fn test_load_round_trip_through_tracked_file() {
    let mut harness = VersaTestHarness::new();

    harness.edit("chapter one\ndraft");
    assert_eq!(harness.commit().unwrap(), 1);
    harness.edit("chapter one\nrevised\nepilogue");
    assert_eq!(harness.commit().unwrap(), 2);

    let content = harness.service.load(1).unwrap().content().to_string();
    harness.service.backups().write_tracked(&content).unwrap();
    assert_eq!(harness.tracked(), "chapter one\ndraft");

    // The restored text is already stored
    assert!(matches!(harness.commit(), Err(VersaError::DuplicateContent)));
    assert_eq!(harness.service.len(), 2);

    let diff = harness.service.compare(1, 2).unwrap();
    assert_eq!(
        diff.to_string(),
        "Line 1: <Identical>\nLine 2: draft <<>> revised\nLine 3: <Empty Line> <<>> epilogue\n"
    );
}

#[test]
fn test_removed_numbers_are_not_reused_across_sessions() {
    let mut harness = VersaTestHarness::new();

    for text in ["one", "two", "three"] {
        harness.edit(text);
        harness.commit().unwrap();
    }
    harness.service.remove(2).unwrap();
    harness.reopen();

    harness.edit("four");
    assert_eq!(harness.commit().unwrap(), 4);

    // Removing the highest number lets a later session hand it out again,
    // because nothing on disk remembers it
    harness.service.remove(4).unwrap();
    harness.reopen();
    harness.edit("four again");
    assert_eq!(harness.commit().unwrap(), 4);
}

#[test]
fn test_missing_tracked_file_is_reported() {
    let mut harness = VersaTestHarness::new();
    let err = harness.commit().unwrap_err();
    assert!(err.is_persistence());
    assert!(harness.service.is_empty());
}

#[test]
fn test_search_and_compare_after_reopen() {
    let mut harness = VersaTestHarness::new();

    harness.edit("fn main() {\n    println!(\"hi\");\n}\n");
    harness.commit().unwrap();
    harness.edit("fn main() {\n    todo!();\n}\n");
    harness.commit().unwrap();
    harness.edit("fn helper() {}\n");
    harness.commit().unwrap();
    harness.reopen();

    let hits: Vec<u64> = harness.service.search("main").iter().map(|h| h.version).collect();
    assert_eq!(hits, vec![1, 2]);
    assert!(harness.service.search("missing").is_empty());

    let diff = harness.service.compare(2, 3).unwrap();
    assert_eq!(diff.len(), 3);
    assert_eq!(diff.divergent_count(), 3);

    let err = harness.service.compare(1, 9).unwrap_err();
    assert!(matches!(err, VersaError::PartialNotFound { .. }));
}

#[test]
#[traced_test]
fn test_config_file_selects_backup_dir_and_mode() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("versa.json"),
        format!(
            r#"{{ "tracked_file": {:?}, "backup_dir": {:?}, "match_mode": "hash-only" }}"#,
            dir.path().join("essay.txt"),
            dir.path().join(".versions"),
        ),
    )
    .unwrap();

    let config = VersaConfig::load_or_default(dir.path()).unwrap();
    let mut service = VersioningService::open(&config).unwrap();
    assert_eq!(service.match_mode(), MatchMode::HashOnly);

    assert_eq!(service.add("intro").unwrap(), 1);
    assert!(dir.path().join(".versions").join("essay_1.txt").exists());
    assert!(matches!(service.add("intro"), Err(VersaError::DuplicateContent)));
}
