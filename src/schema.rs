//! Host model state
//!
//! Typed view of the host framework's current model state. The splitting
//! engine never introspects a live database; the host hands it these
//! definitions and the engine resolves rename targets against them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{BlueGreenError, Result};

/// Field definition within a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    /// Logical field name
    pub name: String,
    /// Database column name (usually equals the field name)
    pub column: String,
    pub data_type: String,
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub is_primary_key: bool,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            column: name.clone(),
            name,
            data_type: data_type.into(),
            nullable: false,
            default_value: None,
            is_primary_key: false,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default_value = Some(default.into());
        self
    }
}

/// Index definition within a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDef {
    pub name: String,
    pub fields: Vec<String>,
    pub unique: bool,
}

/// Constraint definition within a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintDef {
    pub name: String,
    /// Check expression or constraint body, as rendered by the host
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

/// A model as the host framework currently sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSchema {
    pub app_label: String,
    pub name: String,
    /// Database table backing the model
    pub table_name: String,
    /// Fields in declaration order. Order matters: INSERT column lists
    /// are derived from it.
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub indexes: Vec<IndexDef>,
    #[serde(default)]
    pub constraints: Vec<ConstraintDef>,
}

impl ModelSchema {
    pub fn new(app_label: impl Into<String>, name: impl Into<String>) -> Self {
        let app_label = app_label.into();
        let name = name.into();
        let table_name = format!("{}_{}", app_label, name.to_lowercase());
        Self {
            app_label,
            name,
            table_name,
            fields: Vec::new(),
            indexes: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_index(mut self, index: IndexDef) -> Self {
        self.indexes.push(index);
        self
    }

    /// Column names in field-declaration order
    pub fn column_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.column.clone()).collect()
    }
}

/// Read-only registry of current model state, keyed by (app, model).
///
/// Lookups are case-insensitive on the model name, matching the host
/// framework's resolution behavior.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: HashMap<(String, String), ModelSchema>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, model: ModelSchema) {
        let key = (model.app_label.clone(), model.name.to_lowercase());
        self.models.insert(key, model);
    }

    /// Resolve a model, or fail with `ModelNotFound`.
    pub fn get_model(&self, app_label: &str, model_name: &str) -> Result<&ModelSchema> {
        self.models
            .get(&(app_label.to_string(), model_name.to_lowercase()))
            .ok_or_else(|| BlueGreenError::ModelNotFound {
                app: app_label.to_string(),
                model: model_name.to_string(),
            })
    }

    /// Resolve a model if it is still present in current state.
    pub fn try_get_model(&self, app_label: &str, model_name: &str) -> Option<&ModelSchema> {
        self.models
            .get(&(app_label.to_string(), model_name.to_lowercase()))
    }

    /// Resolve a field by name, or fail with `FieldNotFound`.
    pub fn get_field<'a>(&self, model: &'a ModelSchema, field_name: &str) -> Result<&'a FieldDef> {
        model
            .fields
            .iter()
            .find(|f| f.name == field_name)
            .ok_or_else(|| BlueGreenError::FieldNotFound {
                model: model.name.clone(),
                field: field_name.to_string(),
            })
    }

    /// Resolve an index by name, or fail with `IndexNotFound`.
    pub fn get_index<'a>(&self, model: &'a ModelSchema, index_name: &str) -> Result<&'a IndexDef> {
        model
            .indexes
            .iter()
            .find(|idx| idx.name == index_name)
            .ok_or_else(|| BlueGreenError::IndexNotFound {
                model: model.name.clone(),
                index: index_name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BlueGreenError;
    use pretty_assertions::assert_eq;

    fn order_model() -> ModelSchema {
        ModelSchema::new("shop", "Order")
            .with_field(FieldDef::new("id", "integer").primary_key())
            .with_field(FieldDef::new("number", "integer"))
            .with_field(FieldDef::new("created_at", "timestamptz"))
            .with_index(IndexDef {
                name: "order_number_idx".to_string(),
                fields: vec!["number".to_string()],
                unique: false,
            })
    }

    #[test]
    fn test_table_name_derived_from_app_and_model() {
        let model = order_model();
        assert_eq!(model.table_name, "shop_order");
    }

    #[test]
    fn test_column_names_preserve_declaration_order() {
        let model = order_model();
        assert_eq!(model.column_names(), vec!["id", "number", "created_at"]);
    }

    #[test]
    fn test_model_lookup_is_case_insensitive() {
        let mut registry = ModelRegistry::new();
        registry.register(order_model());

        assert!(registry.get_model("shop", "order").is_ok());
        assert!(registry.get_model("shop", "Order").is_ok());
    }

    #[test]
    fn test_missing_model_reports_app_and_name() {
        let registry = ModelRegistry::new();
        let err = registry.get_model("shop", "Order").unwrap_err();
        assert!(matches!(err, BlueGreenError::ModelNotFound { .. }));
        assert_eq!(err.to_string(), "Model 'Order' not found in app 'shop'");
    }

    #[test]
    fn test_field_and_index_lookup() {
        let mut registry = ModelRegistry::new();
        registry.register(order_model());
        let model = registry.get_model("shop", "Order").unwrap();

        assert_eq!(registry.get_field(model, "number").unwrap().column, "number");
        assert!(matches!(
            registry.get_field(model, "missing").unwrap_err(),
            BlueGreenError::FieldNotFound { .. }
        ));

        assert!(registry.get_index(model, "order_number_idx").is_ok());
        assert!(matches!(
            registry.get_index(model, "nope").unwrap_err(),
            BlueGreenError::IndexNotFound { .. }
        ));
    }
}
