//! Operation splitter
//!
//! Dispatches every operation of a migration to its category policy and
//! assembles the flattened blue/green lists.

use tracing::debug;

use crate::error::Result;
use crate::operations::strategies::{
    split_constraint_operation, split_field_operation, split_index_operation,
    split_model_operation,
};
use crate::operations::{Operation, SplitResult};
use crate::schema::ModelRegistry;

/// Splits migration operations into blue and green phases for one app
pub struct OperationSplitter<'a> {
    app_label: String,
    registry: &'a ModelRegistry,
}

impl<'a> OperationSplitter<'a> {
    pub fn new(app_label: impl Into<String>, registry: &'a ModelRegistry) -> Self {
        Self { app_label: app_label.into(), registry }
    }

    /// Split a single operation into blue/green phases.
    ///
    /// Impossible kinds come back as a pass-through `SplitResult` with
    /// `impossible` set; that is a signal for the caller, not an error at
    /// this level. The match over kinds is exhaustive: a new operation
    /// kind will not compile until it gets a policy.
    pub fn split_operation(&self, operation: &Operation) -> Result<SplitResult> {
        if operation.is_impossible() {
            return Ok(SplitResult::impossible(operation.clone()));
        }

        let result = match operation {
            Operation::CreateModel { .. }
            | Operation::DeleteModel { .. }
            | Operation::RenameModel { .. } => {
                split_model_operation(operation, &self.app_label, self.registry)?
            }

            Operation::AddField { .. }
            | Operation::RemoveField { .. }
            | Operation::RenameField { .. } => {
                split_field_operation(operation, &self.app_label, self.registry)?
            }

            Operation::AddIndex { .. }
            | Operation::RemoveIndex { .. }
            | Operation::RenameIndex { .. } => {
                split_index_operation(operation, &self.app_label, self.registry)?
            }

            Operation::AddConstraint { .. } | Operation::RemoveConstraint { .. } => {
                split_constraint_operation(operation)?
            }

            // Raw SQL carries no schema intent the engine can classify;
            // it stays in the blue phase with the rest of the additive work.
            Operation::RunSql { .. } => SplitResult::blue_only(vec![operation.clone()]),

            // Handled by the is_impossible guard above; kept explicit so
            // the match stays exhaustive.
            Operation::AlterModelTable { .. }
            | Operation::AlterUniqueTogether { .. }
            | Operation::AlterIndexTogether { .. }
            | Operation::AlterModelOptions { .. }
            | Operation::AlterField { .. }
            | Operation::AlterOrderWithRespectTo { .. }
            | Operation::AlterModelManagers { .. } => SplitResult::impossible(operation.clone()),
        };

        debug!(
            operation = %operation.describe(),
            blue = result.blue.len(),
            green = result.green.len(),
            "split operation"
        );

        Ok(result)
    }

    /// Split a whole operation list into flattened blue/green lists,
    /// preserving the original relative order.
    pub fn split_operations(
        &self,
        operations: &[Operation],
    ) -> Result<(Vec<Operation>, Vec<Operation>)> {
        let mut blue_ops = Vec::new();
        let mut green_ops = Vec::new();

        for operation in operations {
            let result = self.split_operation(operation)?;
            blue_ops.extend(result.blue);
            green_ops.extend(result.green);
        }

        Ok((blue_ops, green_ops))
    }

    /// Operations that cannot be split into blue/green phases.
    ///
    /// For callers that need to fail fast before attempting any split.
    pub fn detect_impossible_operations<'ops>(
        &self,
        operations: &'ops [Operation],
    ) -> Vec<&'ops Operation> {
        operations.iter().filter(|op| op.is_impossible()).collect()
    }
}
