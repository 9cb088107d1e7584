//! Migration processor
//!
//! Splits one source migration into a blue/green pair and rewrites its
//! dependencies so both halves slot into the host's migration graph in a
//! correct execution order.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{BlueGreenError, Result};
use crate::operations::OperationSplitter;
use crate::operations::Operation;
use crate::processor::{BLUE_SUFFIX, GREEN_SUFFIX};
use crate::schema::ModelRegistry;

/// Reference to another migration: (app, migration name)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyRef {
    pub app_label: String,
    pub name: String,
}

impl DependencyRef {
    pub fn new(app_label: impl Into<String>, name: impl Into<String>) -> Self {
        Self { app_label: app_label.into(), name: name.into() }
    }
}

/// A migration as exchanged with the host framework: an ordered operation
/// list plus graph metadata. The host's own writer owns the on-disk file
/// format; this crate only fills in the field values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Migration {
    pub app_label: String,
    pub name: String,
    #[serde(default)]
    pub dependencies: Vec<DependencyRef>,
    pub operations: Vec<Operation>,
    #[serde(default)]
    pub initial: bool,
    #[serde(default)]
    pub replaces: Vec<DependencyRef>,
    #[serde(default)]
    pub run_before: Vec<DependencyRef>,
}

impl Migration {
    pub fn new(app_label: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            app_label: app_label.into(),
            name: name.into(),
            dependencies: Vec::new(),
            operations: Vec::new(),
            initial: false,
            replaces: Vec::new(),
            run_before: Vec::new(),
        }
    }
}

/// Answers "does migration (app, name) exist?" for dependency rewriting.
///
/// Two sources of truth back this: the loaded migration graph, and the
/// on-disk file listing. Migrations written earlier in the same
/// invocation are on disk but not yet in the graph.
pub trait MigrationExistenceOracle {
    fn exists(&self, app_label: &str, migration_name: &str) -> bool;
}

/// Oracle backed by the host's loaded migration graph
#[derive(Debug, Clone, Default)]
pub struct GraphOracle {
    nodes: HashSet<(String, String)>,
}

impl GraphOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self { nodes: nodes.into_iter().collect() }
    }

    pub fn add_node(&mut self, app_label: impl Into<String>, name: impl Into<String>) {
        self.nodes.insert((app_label.into(), name.into()));
    }
}

impl MigrationExistenceOracle for GraphOracle {
    fn exists(&self, app_label: &str, migration_name: &str) -> bool {
        self.nodes
            .contains(&(app_label.to_string(), migration_name.to_string()))
    }
}

/// Oracle backed by the migration file tree:
/// `<root>/<app>/migrations/<name>.json`
#[derive(Debug, Clone)]
pub struct FsOracle {
    root: PathBuf,
}

impl FsOracle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path a migration file would occupy
    pub fn migration_path(&self, app_label: &str, migration_name: &str) -> PathBuf {
        self.root
            .join(app_label)
            .join("migrations")
            .join(format!("{migration_name}.json"))
    }
}

impl MigrationExistenceOracle for FsOracle {
    fn exists(&self, app_label: &str, migration_name: &str) -> bool {
        self.migration_path(app_label, migration_name).is_file()
    }
}

/// Processor that splits standard migrations into blue/green pairs
pub struct MigrationProcessor<'a> {
    registry: &'a ModelRegistry,
    oracles: Vec<Box<dyn MigrationExistenceOracle + 'a>>,
}

impl<'a> MigrationProcessor<'a> {
    pub fn new(registry: &'a ModelRegistry) -> Self {
        Self { registry, oracles: Vec::new() }
    }

    /// Register an existence oracle. Oracles are queried in registration
    /// order; the first hit wins.
    pub fn with_oracle(mut self, oracle: impl MigrationExistenceOracle + 'a) -> Self {
        self.oracles.push(Box::new(oracle));
        self
    }

    fn migration_exists(&self, app_label: &str, migration_name: &str) -> bool {
        self.oracles.iter().any(|o| o.exists(app_label, migration_name))
    }

    /// Split one migration into its blue and green halves.
    ///
    /// Fails with `ImpossibleOperation` before building anything if any
    /// operation mutates an object in place; there is no partial-split
    /// fallback and no partial output.
    pub fn process_migration(&self, migration: &Migration) -> Result<(Migration, Migration)> {
        let splitter = OperationSplitter::new(&migration.app_label, self.registry);

        let impossible = splitter.detect_impossible_operations(&migration.operations);
        if !impossible.is_empty() {
            return Err(BlueGreenError::ImpossibleOperation {
                operations: impossible.iter().map(|op| op.describe()).collect(),
            });
        }

        let (blue_operations, green_operations) =
            splitter.split_operations(&migration.operations)?;

        let mut blue = Migration::new(&migration.app_label, format!("{}{BLUE_SUFFIX}", migration.name));
        blue.dependencies = self.fix_dependencies(&migration.dependencies, false);
        blue.operations = blue_operations;
        blue.replaces = migration.replaces.clone();
        blue.run_before = migration.run_before.clone();
        blue.initial = migration.initial;

        let mut green =
            Migration::new(&migration.app_label, format!("{}{GREEN_SUFFIX}", migration.name));
        // Green always depends on exactly its own blue counterpart: that
        // ordering is what guarantees the additive changes exist before
        // the destructive ones run.
        green.dependencies = vec![DependencyRef::new(&blue.app_label, &blue.name)];
        green.operations = green_operations;
        green.replaces = migration.replaces.clone();
        green.run_before = migration.run_before.clone();
        green.initial = migration.initial;

        info!(
            source = %migration.name,
            blue = %blue.name,
            green = %green.name,
            "split migration into blue/green pair"
        );

        Ok((blue, green))
    }

    /// Rewrite dependencies to point at same-color counterparts.
    ///
    /// Already-suffixed names pass through untouched. Otherwise the
    /// candidate `<name><suffix>` is checked against the oracles: a hit
    /// means the dependency was itself split and gets redirected; a miss
    /// means a vanilla dependency that stays as-is.
    fn fix_dependencies(&self, dependencies: &[DependencyRef], is_green: bool) -> Vec<DependencyRef> {
        let target_suffix = if is_green { GREEN_SUFFIX } else { BLUE_SUFFIX };

        dependencies
            .iter()
            .map(|dep| {
                if dep.name.ends_with(BLUE_SUFFIX) || dep.name.ends_with(GREEN_SUFFIX) {
                    return dep.clone();
                }

                let target_name = format!("{}{target_suffix}", dep.name);
                if self.migration_exists(&dep.app_label, &target_name) {
                    debug!(
                        from = %dep.name,
                        to = %target_name,
                        app = %dep.app_label,
                        "rewrote dependency to split counterpart"
                    );
                    DependencyRef::new(&dep.app_label, target_name)
                } else {
                    dep.clone()
                }
            })
            .collect()
    }
}
