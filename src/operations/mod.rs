//! Migration operations
//!
//! Typed schema-change instructions and the machinery that splits them
//! into blue (additive) and green (destructive) phases.

pub mod splitter;
pub mod strategies;

pub use splitter::OperationSplitter;

use serde::{Deserialize, Serialize};

use crate::schema::{ConstraintDef, FieldDef, IndexDef};

/// An atomic schema-change instruction, as produced by the host
/// framework's change detector.
///
/// The set of kinds is closed: adding a variant forces every match in the
/// splitter to be extended, so a new kind can never silently fall through
/// to a default phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    CreateModel {
        name: String,
        fields: Vec<FieldDef>,
        /// Set when this create was synthesized from a rename
        #[serde(skip_serializing_if = "Option::is_none")]
        old_name: Option<String>,
    },
    DeleteModel {
        name: String,
    },
    RenameModel {
        old_name: String,
        new_name: String,
    },
    AddField {
        model_name: String,
        name: String,
        field: FieldDef,
        preserve_default: bool,
        /// Set when this add was synthesized from a rename
        #[serde(skip_serializing_if = "Option::is_none")]
        old_name: Option<String>,
    },
    RemoveField {
        model_name: String,
        name: String,
    },
    RenameField {
        model_name: String,
        old_name: String,
        new_name: String,
    },
    AddIndex {
        model_name: String,
        index: IndexDef,
        /// Set when this add was synthesized from a rename
        #[serde(skip_serializing_if = "Option::is_none")]
        old_name: Option<String>,
    },
    RemoveIndex {
        model_name: String,
        name: String,
    },
    RenameIndex {
        model_name: String,
        old_name: String,
        new_name: String,
    },
    AddConstraint {
        model_name: String,
        constraint: ConstraintDef,
    },
    RemoveConstraint {
        model_name: String,
        name: String,
    },
    /// Raw SQL executed by the host's SQL-execution instruction.
    /// The engine synthesizes these for data copies on renames.
    RunSql {
        sql: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reverse_sql: Option<String>,
    },
    // In-place alterations. None of these decompose into an additive half
    // and a destructive half; the processor refuses to split them.
    AlterModelTable {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        table: Option<String>,
    },
    AlterUniqueTogether {
        name: String,
        unique_together: Vec<Vec<String>>,
    },
    AlterIndexTogether {
        name: String,
        index_together: Vec<Vec<String>>,
    },
    AlterModelOptions {
        name: String,
    },
    AlterField {
        model_name: String,
        name: String,
        field: FieldDef,
    },
    AlterOrderWithRespectTo {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        order_with_respect_to: Option<String>,
    },
    AlterModelManagers {
        name: String,
    },
}

impl Operation {
    /// Whether this kind mutates an existing object in place, with no
    /// blue/green decomposition.
    pub fn is_impossible(&self) -> bool {
        matches!(
            self,
            Operation::AlterModelTable { .. }
                | Operation::AlterUniqueTogether { .. }
                | Operation::AlterIndexTogether { .. }
                | Operation::AlterModelOptions { .. }
                | Operation::AlterField { .. }
                | Operation::AlterOrderWithRespectTo { .. }
                | Operation::AlterModelManagers { .. }
        )
    }

    /// Kind name, for error messages and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::CreateModel { .. } => "CreateModel",
            Operation::DeleteModel { .. } => "DeleteModel",
            Operation::RenameModel { .. } => "RenameModel",
            Operation::AddField { .. } => "AddField",
            Operation::RemoveField { .. } => "RemoveField",
            Operation::RenameField { .. } => "RenameField",
            Operation::AddIndex { .. } => "AddIndex",
            Operation::RemoveIndex { .. } => "RemoveIndex",
            Operation::RenameIndex { .. } => "RenameIndex",
            Operation::AddConstraint { .. } => "AddConstraint",
            Operation::RemoveConstraint { .. } => "RemoveConstraint",
            Operation::RunSql { .. } => "RunSQL",
            Operation::AlterModelTable { .. } => "AlterModelTable",
            Operation::AlterUniqueTogether { .. } => "AlterUniqueTogether",
            Operation::AlterIndexTogether { .. } => "AlterIndexTogether",
            Operation::AlterModelOptions { .. } => "AlterModelOptions",
            Operation::AlterField { .. } => "AlterField",
            Operation::AlterOrderWithRespectTo { .. } => "AlterOrderWithRespectTo",
            Operation::AlterModelManagers { .. } => "AlterModelManagers",
        }
    }

    /// Get a human-readable description of the operation
    pub fn describe(&self) -> String {
        match self {
            Operation::CreateModel { name, .. } => format!("CreateModel: {name}"),
            Operation::DeleteModel { name } => format!("DeleteModel: {name}"),
            Operation::RenameModel { old_name, new_name } => {
                format!("RenameModel: {old_name} -> {new_name}")
            }
            Operation::AddField { model_name, name, .. } => {
                format!("AddField: {model_name}.{name}")
            }
            Operation::RemoveField { model_name, name } => {
                format!("RemoveField: {model_name}.{name}")
            }
            Operation::RenameField { model_name, old_name, new_name } => {
                format!("RenameField: {model_name}.{old_name} -> {model_name}.{new_name}")
            }
            Operation::AddIndex { model_name, index, .. } => {
                format!("AddIndex: {model_name}.{}", index.name)
            }
            Operation::RemoveIndex { model_name, name } => {
                format!("RemoveIndex: {model_name}.{name}")
            }
            Operation::RenameIndex { model_name, old_name, new_name } => {
                format!("RenameIndex: {model_name}.{old_name} -> {model_name}.{new_name}")
            }
            Operation::AddConstraint { model_name, constraint } => {
                format!("AddConstraint: {model_name}.{}", constraint.name)
            }
            Operation::RemoveConstraint { model_name, name } => {
                format!("RemoveConstraint: {model_name}.{name}")
            }
            Operation::RunSql { sql, .. } => format!("RunSQL: {sql}"),
            Operation::AlterModelTable { name, .. } => format!("AlterModelTable: {name}"),
            Operation::AlterUniqueTogether { name, .. } => {
                format!("AlterUniqueTogether: {name}")
            }
            Operation::AlterIndexTogether { name, .. } => {
                format!("AlterIndexTogether: {name}")
            }
            Operation::AlterModelOptions { name } => format!("AlterModelOptions: {name}"),
            Operation::AlterField { model_name, name, .. } => {
                format!("AlterField: {model_name}.{name}")
            }
            Operation::AlterOrderWithRespectTo { name, .. } => {
                format!("AlterOrderWithRespectTo: {name}")
            }
            Operation::AlterModelManagers { name } => format!("AlterModelManagers: {name}"),
        }
    }

    /// Check if this is a destructive operation (belongs in the green phase)
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            Operation::DeleteModel { .. }
                | Operation::RemoveField { .. }
                | Operation::RemoveIndex { .. }
                | Operation::RemoveConstraint { .. }
        )
    }
}

/// Result of splitting one operation into blue/green phases.
///
/// Blue and green are two independently sized sequences; an empty
/// sequence means "no operation in this phase".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitResult {
    /// Operations for the blue (additive) phase
    pub blue: Vec<Operation>,
    /// Operations for the green (destructive) phase
    pub green: Vec<Operation>,
    /// Set when the operation cannot be split automatically; the
    /// original operation is passed through in `blue`.
    pub impossible: bool,
    /// Why the split is impossible, when it is
    pub reason: Option<String>,
}

impl SplitResult {
    /// Everything goes to the blue phase
    pub fn blue_only(ops: Vec<Operation>) -> Self {
        Self { blue: ops, ..Default::default() }
    }

    /// Everything goes to the green phase
    pub fn green_only(ops: Vec<Operation>) -> Self {
        Self { green: ops, ..Default::default() }
    }

    /// Pass-through for an operation that cannot be decomposed
    pub fn impossible(op: Operation) -> Self {
        let reason = format!("{} cannot be split into blue/green phases", op.kind());
        Self {
            blue: vec![op],
            green: Vec::new(),
            impossible: true,
            reason: Some(reason),
        }
    }

    pub fn has_blue(&self) -> bool {
        !self.blue.is_empty()
    }

    pub fn has_green(&self) -> bool {
        !self.green.is_empty()
    }
}
