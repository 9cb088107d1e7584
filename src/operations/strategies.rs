//! Split policies per operation category
//!
//! One policy per schema-object category (model / field / index /
//! constraint). Additive halves go to blue, destructive halves to green,
//! and every rename becomes "create new, copy data, later drop old" so
//! both objects coexist during the cutover window.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::operations::{Operation, SplitResult};
use crate::schema::ModelRegistry;
use crate::sql::{SchemaValidator, SqlBuilder};

/// Split model operations (Create/Delete/Rename).
pub fn split_model_operation(
    op: &Operation,
    app_label: &str,
    registry: &ModelRegistry,
) -> Result<SplitResult> {
    match op {
        // Blue: create the model, Green: nothing
        Operation::CreateModel { .. } => Ok(SplitResult::blue_only(vec![op.clone()])),

        // Blue: nothing, Green: delete the model
        Operation::DeleteModel { .. } => Ok(SplitResult::green_only(vec![op.clone()])),

        // Blue: create the new model + copy data, Green: drop the old one
        Operation::RenameModel { old_name, new_name } => {
            let model = registry.get_model(app_label, new_name)?;
            let old_table = SqlBuilder::build_table_name(app_label, old_name);

            // When the old model is still resolvable, restrict the copy to
            // the validated common columns; otherwise the renamed-away
            // schema is gone from current state and the new model's full
            // column list is the only source of truth.
            let columns = match registry.try_get_model(app_label, old_name) {
                Some(old_model) => {
                    let common: BTreeSet<String> =
                        SchemaValidator::check_safe_for_insert_select(old_model, model)?
                            .into_iter()
                            .collect();
                    model
                        .column_names()
                        .into_iter()
                        .filter(|c| common.contains(c))
                        .collect()
                }
                None => SqlBuilder::build_column_list_from_model(model),
            };

            let add_operation = Operation::CreateModel {
                name: model.name.clone(),
                fields: model.fields.clone(),
                old_name: Some(old_name.clone()),
            };
            let run_sql =
                SqlBuilder::build_insert_select(&old_table, &model.table_name, &columns, None)?;
            let drop_operation = Operation::DeleteModel { name: old_name.clone() };

            Ok(SplitResult {
                blue: vec![add_operation, run_sql],
                green: vec![drop_operation],
                ..Default::default()
            })
        }

        other => Ok(SplitResult::blue_only(vec![other.clone()])),
    }
}

/// Split field operations (Add/Remove/Rename).
pub fn split_field_operation(
    op: &Operation,
    app_label: &str,
    registry: &ModelRegistry,
) -> Result<SplitResult> {
    match op {
        // Blue: add the field, Green: nothing
        Operation::AddField { .. } => Ok(SplitResult::blue_only(vec![op.clone()])),

        // Blue: nothing, Green: remove the field
        Operation::RemoveField { .. } => Ok(SplitResult::green_only(vec![op.clone()])),

        // Blue: add the new field + copy column values, Green: remove the old field
        Operation::RenameField { model_name, old_name, new_name } => {
            let model = registry.get_model(app_label, model_name)?;
            let field = registry.get_field(model, new_name)?;

            let add_operation = Operation::AddField {
                model_name: model.name.to_lowercase(),
                name: new_name.clone(),
                field: field.clone(),
                preserve_default: true,
                old_name: Some(old_name.clone()),
            };
            let run_sql = SqlBuilder::build_update_field_copy(
                &model.table_name,
                new_name,
                old_name,
                None,
                None,
            )?;
            let drop_operation = Operation::RemoveField {
                model_name: model.name.to_lowercase(),
                name: old_name.clone(),
            };

            Ok(SplitResult {
                blue: vec![add_operation, run_sql],
                green: vec![drop_operation],
                ..Default::default()
            })
        }

        other => Ok(SplitResult::blue_only(vec![other.clone()])),
    }
}

/// Split index operations (Add/Remove/Rename).
pub fn split_index_operation(
    op: &Operation,
    app_label: &str,
    registry: &ModelRegistry,
) -> Result<SplitResult> {
    match op {
        // Blue: add the index, Green: nothing
        Operation::AddIndex { .. } => Ok(SplitResult::blue_only(vec![op.clone()])),

        // Blue: nothing, Green: remove the index
        Operation::RemoveIndex { .. } => Ok(SplitResult::green_only(vec![op.clone()])),

        // Blue: create the new index, Green: drop the old one. Indexes
        // hold no data, so no copy step is synthesized.
        Operation::RenameIndex { model_name, old_name, new_name } => {
            let model = registry.get_model(app_label, model_name)?;
            let index = registry.get_index(model, new_name)?;

            let add_operation = Operation::AddIndex {
                model_name: model.name.to_lowercase(),
                index: index.clone(),
                old_name: Some(old_name.clone()),
            };
            let drop_operation = Operation::RemoveIndex {
                model_name: model.name.to_lowercase(),
                name: old_name.clone(),
            };

            Ok(SplitResult {
                blue: vec![add_operation],
                green: vec![drop_operation],
                ..Default::default()
            })
        }

        other => Ok(SplitResult::blue_only(vec![other.clone()])),
    }
}

/// Split constraint operations (Add/Remove).
pub fn split_constraint_operation(op: &Operation) -> Result<SplitResult> {
    match op {
        // Blue: add the constraint, Green: nothing
        Operation::AddConstraint { .. } => Ok(SplitResult::blue_only(vec![op.clone()])),

        // Blue: nothing, Green: remove the constraint
        Operation::RemoveConstraint { .. } => Ok(SplitResult::green_only(vec![op.clone()])),

        other => Ok(SplitResult::blue_only(vec![other.clone()])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BlueGreenError;
    use crate::schema::{FieldDef, IndexDef, ModelSchema};
    use pretty_assertions::assert_eq;

    fn registry_with_order() -> ModelRegistry {
        let mut registry = ModelRegistry::new();
        registry.register(
            ModelSchema::new("shop", "Order")
                .with_field(FieldDef::new("id", "integer").primary_key())
                .with_field(FieldDef::new("number", "integer"))
                .with_field(FieldDef::new("reference", "text"))
                .with_index(IndexDef {
                    name: "order_reference_idx".to_string(),
                    fields: vec!["reference".to_string()],
                    unique: false,
                }),
        );
        registry
    }

    #[test]
    fn test_rename_model_synthesizes_create_copy_drop() {
        let registry = registry_with_order();
        let op = Operation::RenameModel {
            old_name: "Invoice".to_string(),
            new_name: "Order".to_string(),
        };

        let result = split_model_operation(&op, "shop", &registry).unwrap();

        assert_eq!(result.blue.len(), 2);
        match &result.blue[0] {
            Operation::CreateModel { name, old_name, fields } => {
                assert_eq!(name, "Order");
                assert_eq!(old_name.as_deref(), Some("Invoice"));
                assert_eq!(fields.len(), 3);
            }
            other => panic!("expected CreateModel, got {}", other.kind()),
        }
        match &result.blue[1] {
            Operation::RunSql { sql, .. } => {
                // Old model is gone from state: full target column list,
                // in declaration order.
                assert_eq!(
                    sql,
                    "INSERT INTO \"shop_invoice\" (\"id\", \"number\", \"reference\") \
                     SELECT \"id\", \"number\", \"reference\" FROM \"shop_order\""
                );
            }
            other => panic!("expected RunSql, got {}", other.kind()),
        }
        assert_eq!(
            result.green,
            vec![Operation::DeleteModel { name: "Invoice".to_string() }]
        );
    }

    #[test]
    fn test_rename_model_restricts_copy_to_common_columns() {
        let mut registry = registry_with_order();
        // The old model is still resolvable with a partially different schema.
        registry.register(
            ModelSchema::new("shop", "Invoice")
                .with_field(FieldDef::new("id", "integer").primary_key())
                .with_field(FieldDef::new("reference", "text"))
                .with_field(FieldDef::new("legacy_code", "text")),
        );
        let op = Operation::RenameModel {
            old_name: "Invoice".to_string(),
            new_name: "Order".to_string(),
        };

        let result = split_model_operation(&op, "shop", &registry).unwrap();
        match &result.blue[1] {
            // Common columns only, in the target model's declaration order
            Operation::RunSql { sql, .. } => assert_eq!(
                sql,
                "INSERT INTO \"shop_invoice\" (\"id\", \"reference\") \
                 SELECT \"id\", \"reference\" FROM \"shop_order\""
            ),
            other => panic!("expected RunSql, got {}", other.kind()),
        }
    }

    #[test]
    fn test_rename_model_fails_on_disjoint_schemas() {
        let mut registry = registry_with_order();
        registry.register(
            ModelSchema::new("shop", "Invoice").with_field(FieldDef::new("uuid", "uuid")),
        );
        let op = Operation::RenameModel {
            old_name: "Invoice".to_string(),
            new_name: "Order".to_string(),
        };

        let err = split_model_operation(&op, "shop", &registry).unwrap_err();
        assert!(matches!(err, BlueGreenError::SchemaValidation(_)));
    }

    #[test]
    fn test_rename_model_unknown_target_fails() {
        let registry = ModelRegistry::new();
        let op = Operation::RenameModel {
            old_name: "Invoice".to_string(),
            new_name: "Order".to_string(),
        };
        let err = split_model_operation(&op, "shop", &registry).unwrap_err();
        assert!(matches!(err, BlueGreenError::ModelNotFound { .. }));
    }

    #[test]
    fn test_rename_field_synthesizes_add_copy_remove() {
        let registry = registry_with_order();
        let op = Operation::RenameField {
            model_name: "Order".to_string(),
            old_name: "num".to_string(),
            new_name: "number".to_string(),
        };

        let result = split_field_operation(&op, "shop", &registry).unwrap();

        assert_eq!(result.blue.len(), 2);
        match &result.blue[0] {
            Operation::AddField { model_name, name, preserve_default, old_name, .. } => {
                assert_eq!(model_name, "order");
                assert_eq!(name, "number");
                assert!(*preserve_default);
                assert_eq!(old_name.as_deref(), Some("num"));
            }
            other => panic!("expected AddField, got {}", other.kind()),
        }
        match &result.blue[1] {
            Operation::RunSql { sql, .. } => {
                assert_eq!(sql, "UPDATE \"shop_order\" SET \"number\" = \"num\"");
            }
            other => panic!("expected RunSql, got {}", other.kind()),
        }
        assert_eq!(
            result.green,
            vec![Operation::RemoveField {
                model_name: "order".to_string(),
                name: "num".to_string(),
            }]
        );
    }

    #[test]
    fn test_rename_field_unknown_field_fails() {
        let registry = registry_with_order();
        let op = Operation::RenameField {
            model_name: "Order".to_string(),
            old_name: "num".to_string(),
            new_name: "missing".to_string(),
        };
        let err = split_field_operation(&op, "shop", &registry).unwrap_err();
        assert!(matches!(err, BlueGreenError::FieldNotFound { .. }));
    }

    #[test]
    fn test_rename_index_has_no_copy_step() {
        let registry = registry_with_order();
        let op = Operation::RenameIndex {
            model_name: "Order".to_string(),
            old_name: "order_ref_idx".to_string(),
            new_name: "order_reference_idx".to_string(),
        };

        let result = split_index_operation(&op, "shop", &registry).unwrap();

        assert_eq!(result.blue.len(), 1);
        match &result.blue[0] {
            Operation::AddIndex { index, old_name, .. } => {
                assert_eq!(index.name, "order_reference_idx");
                assert_eq!(old_name.as_deref(), Some("order_ref_idx"));
            }
            other => panic!("expected AddIndex, got {}", other.kind()),
        }
        assert_eq!(
            result.green,
            vec![Operation::RemoveIndex {
                model_name: "order".to_string(),
                name: "order_ref_idx".to_string(),
            }]
        );
    }

    #[test]
    fn test_rename_index_unknown_index_fails() {
        let registry = registry_with_order();
        let op = Operation::RenameIndex {
            model_name: "Order".to_string(),
            old_name: "a".to_string(),
            new_name: "missing_idx".to_string(),
        };
        let err = split_index_operation(&op, "shop", &registry).unwrap_err();
        assert!(matches!(err, BlueGreenError::IndexNotFound { .. }));
    }

    #[test]
    fn test_constraints_split_additive_destructive() {
        let add = Operation::AddConstraint {
            model_name: "order".to_string(),
            constraint: crate::schema::ConstraintDef {
                name: "number_gte_0".to_string(),
                expression: Some("number >= 0".to_string()),
            },
        };
        let result = split_constraint_operation(&add).unwrap();
        assert_eq!(result.blue, vec![add.clone()]);
        assert!(result.green.is_empty());

        let remove = Operation::RemoveConstraint {
            model_name: "order".to_string(),
            name: "number_gte_0".to_string(),
        };
        let result = split_constraint_operation(&remove).unwrap();
        assert!(result.blue.is_empty());
        assert_eq!(result.green, vec![remove]);
    }
}
