//! Schema validation
//!
//! Compatibility checks between two table schemas, run before any
//! data-copy SQL is synthesized.

use std::collections::BTreeSet;

use crate::error::{schema_validation_error, Result};
use crate::schema::ModelSchema;

/// Validator for the schemas involved in a data copy
pub struct SchemaValidator;

impl SchemaValidator {
    /// Columns present in both models, sorted lexicographically.
    ///
    /// The deterministic order keeps generated SQL reproducible.
    pub fn get_common_columns(model_from: &ModelSchema, model_to: &ModelSchema) -> Vec<String> {
        let from: BTreeSet<&str> = model_from.fields.iter().map(|f| f.column.as_str()).collect();
        let to: BTreeSet<&str> = model_to.fields.iter().map(|f| f.column.as_str()).collect();

        from.intersection(&to).map(|c| c.to_string()).collect()
    }

    /// Check column-set compatibility for `INSERT INTO ... SELECT`.
    ///
    /// Non-strict mode requires every source column to exist in the
    /// target; strict mode additionally requires every target column to
    /// exist in the source. Returns `(ok, errors)`.
    pub fn validate_schema_compatibility(
        source_columns: &[String],
        target_columns: &[String],
        strict: bool,
    ) -> (bool, Vec<String>) {
        let mut errors = Vec::new();
        let source: BTreeSet<&str> = source_columns.iter().map(String::as_str).collect();
        let target: BTreeSet<&str> = target_columns.iter().map(String::as_str).collect();

        let missing_in_target: Vec<&str> = source.difference(&target).copied().collect();
        if !missing_in_target.is_empty() {
            errors.push(format!(
                "Columns missing in target table: {}",
                missing_in_target.join(", ")
            ));
        }

        if strict {
            let missing_in_source: Vec<&str> = target.difference(&source).copied().collect();
            if !missing_in_source.is_empty() {
                errors.push(format!(
                    "Columns missing in source table: {}",
                    missing_in_source.join(", ")
                ));
            }
        }

        (errors.is_empty(), errors)
    }

    /// Check that every column in `columns` exists on the model.
    /// Returns `(ok, missing)` with missing columns sorted.
    pub fn validate_column_list(model: &ModelSchema, columns: &[String]) -> (bool, Vec<String>) {
        let known: BTreeSet<&str> = model.fields.iter().map(|f| f.column.as_str()).collect();
        let missing: Vec<String> = columns
            .iter()
            .filter(|c| !known.contains(c.as_str()))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        (missing.is_empty(), missing)
    }

    /// Column names in field-declaration order.
    ///
    /// INSERT column lists must follow this order so source and
    /// destination stay aligned.
    pub fn get_column_order(model: &ModelSchema) -> Vec<String> {
        model.column_names()
    }

    /// Check that a copy between two models is meaningful.
    ///
    /// Fails when the models share zero columns. A single shared column
    /// (even just the primary key) is accepted; partial copies are a
    /// deliberate capability.
    pub fn check_safe_for_insert_select(
        source_model: &ModelSchema,
        target_model: &ModelSchema,
    ) -> Result<Vec<String>> {
        let common = Self::get_common_columns(source_model, target_model);

        if common.is_empty() {
            return Err(schema_validation_error(format!(
                "No common columns between {} and {}",
                source_model.name, target_model.name
            )));
        }

        Ok(common)
    }
}
