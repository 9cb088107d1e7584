//! # bluegreen
//!
//! Blue-Green Migration Engine - zero-downtime schema migration splitting.
//!
//! Splits a single schema migration into two sequential migrations: a
//! **blue** phase that only adds new schema objects (safe to apply while
//! old application code still serves traffic) and a **green** phase that
//! removes old objects after the application has cut over.
//!
//! The host migration framework stays in charge of change detection,
//! graph resolution and SQL execution; this crate takes its typed
//! operation lists and produces the split pairs:
//!
//! - **Operation splitting**: per-category policies decide how each
//!   operation decomposes, with renames becoming "create new, copy data,
//!   later drop old"
//! - **Dependency rewriting**: dependencies are redirected to same-color
//!   counterparts so the pair slots into the migration graph correctly
//! - **Plan filtering**: an apply step in blue or green mode skips the
//!   opposing color
//! - **SQL synthesis**: identifier-safe data-copy statements, validated
//!   against the schemas involved before anything is generated
//!
//! ## Example
//!
//! ```rust
//! use bluegreen::{Migration, MigrationProcessor, ModelRegistry, Operation};
//! use bluegreen::schema::FieldDef;
//!
//! let registry = ModelRegistry::new();
//! let processor = MigrationProcessor::new(&registry);
//!
//! let mut migration = Migration::new("shop", "0002_order");
//! migration.operations = vec![
//!     Operation::AddField {
//!         model_name: "order".into(),
//!         name: "reference".into(),
//!         field: FieldDef::new("reference", "text"),
//!         preserve_default: true,
//!         old_name: None,
//!     },
//!     Operation::RemoveField { model_name: "order".into(), name: "legacy".into() },
//! ];
//!
//! let (blue, green) = processor.process_migration(&migration).unwrap();
//! assert_eq!(blue.name, "0002_order_blue");
//! assert_eq!(green.dependencies[0].name, "0002_order_blue");
//! ```

pub mod config;
pub mod error;
pub mod operations;
pub mod processor;
pub mod schema;
pub mod sql;
pub mod writer;

// Re-exports for convenient access
pub use config::{BlueGreenConfig, ImpossiblePolicy, MigrationPhase};
pub use error::{BlueGreenError, Result};
pub use operations::{Operation, OperationSplitter, SplitResult};
pub use processor::{
    DependencyRef, DeploymentMode, FsOracle, GraphOracle, Migration,
    MigrationExistenceOracle, MigrationProcessor, PlanFilter, PlanItem, BLUE_SUFFIX,
    GREEN_SUFFIX,
};
pub use schema::{ModelRegistry, ModelSchema};
pub use sql::{SchemaValidator, SqlBuilder};
pub use writer::MigrationFileWriter;
