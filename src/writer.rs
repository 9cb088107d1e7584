//! Migration pair persistence
//!
//! Writes a freshly split blue/green pair to the migration file tree so
//! later migrations in the same invocation can see it (the graph will
//! only pick it up on the next load). The JSON shape here is this
//! crate's own fixture format; the host's writer owns the real one.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::BlueGreenConfig;
use crate::error::Result;
use crate::processor::Migration;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MigrationDocument<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    generated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    migration: &'a Migration,
}

/// Writer for blue/green migration pairs
pub struct MigrationFileWriter {
    root: PathBuf,
    config: BlueGreenConfig,
    directory_created: HashSet<String>,
    written_files: Vec<PathBuf>,
}

impl MigrationFileWriter {
    pub fn new(root: impl Into<PathBuf>, config: BlueGreenConfig) -> Self {
        Self {
            root: root.into(),
            config,
            directory_created: HashSet::new(),
            written_files: Vec::new(),
        }
    }

    /// Files written so far, in write order
    pub fn written_files(&self) -> &[PathBuf] {
        &self.written_files
    }

    /// Path a migration will be written to:
    /// `<root>/<app>/migrations/<name>.json`
    pub fn migration_path(&self, migration: &Migration) -> PathBuf {
        self.root
            .join(&migration.app_label)
            .join("migrations")
            .join(format!("{}.json", migration.name))
    }

    /// Write a blue/green pair to disk, blue first.
    ///
    /// In dry-run mode nothing is written; at verbosity 3 the full file
    /// content is logged instead.
    pub fn write_migration_pair(&mut self, blue: &Migration, green: &Migration) -> Result<()> {
        for migration in [blue, green] {
            self.write_migration(migration)?;
        }
        Ok(())
    }

    fn write_migration(&mut self, migration: &Migration) -> Result<()> {
        let path = self.migration_path(migration);

        if self.config.verbosity >= 1 {
            info!(path = %path.display(), "migration");
            for operation in &migration.operations {
                info!("    - {}", operation.describe());
            }
        }

        let document = MigrationDocument {
            generated_at: self.config.include_header.then(Utc::now),
            migration,
        };
        let content = serde_json::to_string_pretty(&document)?;

        if self.config.dry_run {
            if self.config.verbosity >= 3 {
                debug!(name = %migration.name, "full migration file:\n{content}");
            }
            return Ok(());
        }

        self.ensure_migrations_directory(&migration.app_label, &path)?;
        fs::write(&path, content)?;
        self.written_files.push(path);
        Ok(())
    }

    // The directory is created once per app per invocation.
    fn ensure_migrations_directory(&mut self, app_label: &str, path: &Path) -> Result<()> {
        if self.directory_created.contains(app_label) {
            return Ok(());
        }
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        self.directory_created.insert(app_label.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::DependencyRef;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn pair() -> (Migration, Migration) {
        let mut blue = Migration::new("shop", "0002_order_blue");
        blue.dependencies = vec![DependencyRef::new("shop", "0001_initial")];
        let mut green = Migration::new("shop", "0002_order_green");
        green.dependencies = vec![DependencyRef::new("shop", "0002_order_blue")];
        (blue, green)
    }

    #[test]
    fn test_writes_both_halves_and_records_them() {
        let tmp = TempDir::new().unwrap();
        let mut writer = MigrationFileWriter::new(tmp.path(), BlueGreenConfig::default());
        let (blue, green) = pair();

        writer.write_migration_pair(&blue, &green).unwrap();

        let blue_path = tmp.path().join("shop/migrations/0002_order_blue.json");
        let green_path = tmp.path().join("shop/migrations/0002_order_green.json");
        assert!(blue_path.is_file());
        assert!(green_path.is_file());
        assert_eq!(writer.written_files(), &[blue_path, green_path]);
    }

    #[test]
    fn test_header_stamp_follows_config() {
        let tmp = TempDir::new().unwrap();
        let mut config = BlueGreenConfig::default();
        config.include_header = false;
        let mut writer = MigrationFileWriter::new(tmp.path(), config);
        let (blue, green) = pair();

        writer.write_migration_pair(&blue, &green).unwrap();

        let content =
            fs::read_to_string(tmp.path().join("shop/migrations/0002_order_blue.json")).unwrap();
        assert!(!content.contains("generatedAt"));

        let mut writer =
            MigrationFileWriter::new(tmp.path(), BlueGreenConfig::default());
        writer.write_migration_pair(&blue, &green).unwrap();
        let content =
            fs::read_to_string(tmp.path().join("shop/migrations/0002_order_blue.json")).unwrap();
        assert!(content.contains("generatedAt"));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let mut config = BlueGreenConfig::default();
        config.dry_run = true;
        let mut writer = MigrationFileWriter::new(tmp.path(), config);
        let (blue, green) = pair();

        writer.write_migration_pair(&blue, &green).unwrap();

        assert!(writer.written_files().is_empty());
        assert!(!tmp.path().join("shop").exists());
    }

    #[test]
    fn test_written_file_round_trips_migration() {
        let tmp = TempDir::new().unwrap();
        let mut writer = MigrationFileWriter::new(tmp.path(), BlueGreenConfig::default());
        let (blue, green) = pair();
        writer.write_migration_pair(&blue, &green).unwrap();

        let content =
            fs::read_to_string(tmp.path().join("shop/migrations/0002_order_green.json")).unwrap();
        let parsed: Migration = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, green);
    }
}
