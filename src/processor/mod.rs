//! Migration processing
//!
//! Turns one source migration into a blue/green pair and filters
//! execution plans by deployment mode.

pub mod migration_processor;
pub mod plan_filter;

pub use migration_processor::{
    DependencyRef, FsOracle, GraphOracle, Migration, MigrationExistenceOracle,
    MigrationProcessor,
};
pub use plan_filter::{DeploymentMode, PlanFilter, PlanItem};

/// Name suffix of blue migrations. Part of the wire contract with the
/// host's file-based migration loader.
pub const BLUE_SUFFIX: &str = "_blue";

/// Name suffix of green migrations.
pub const GREEN_SUFFIX: &str = "_green";
