//! SQL builder
//!
//! Generates the data-copy statements embedded in blue migrations.
//! Every identifier is quoted individually; raw names never reach the
//! statement text.

use crate::error::Result;
use crate::operations::Operation;
use crate::schema::ModelSchema;
use crate::sql::quote::{quote_identifier, quote_identifiers};

/// Builder for copy-on-rename SQL operations
pub struct SqlBuilder;

impl SqlBuilder {
    /// Generate `INSERT INTO <source> (<cols>) SELECT <cols> FROM <target>`.
    ///
    /// The copy direction is from the currently-live table into the newly
    /// created one, so both coexist during the deployment window. The
    /// reverse statement defaults to a no-op: dropping the new table on
    /// rollback already discards the copied rows.
    pub fn build_insert_select(
        source_table: &str,
        target_table: &str,
        columns: &[String],
        reverse_sql: Option<String>,
    ) -> Result<Operation> {
        let source_quoted = quote_identifier(source_table)?;
        let target_quoted = quote_identifier(target_table)?;
        let columns_list = Self::build_quoted_column_list(columns)?;

        let sql = format!(
            "INSERT INTO {source_quoted} ({columns_list}) SELECT {columns_list} FROM {target_quoted}"
        );

        Ok(Operation::RunSql { sql, reverse_sql })
    }

    /// Generate `UPDATE <table> SET <new_column> = <old_column>` with an
    /// optional WHERE clause.
    pub fn build_update_field_copy(
        table: &str,
        new_column: &str,
        old_column: &str,
        where_clause: Option<&str>,
        reverse_sql: Option<String>,
    ) -> Result<Operation> {
        let table_quoted = quote_identifier(table)?;
        let new_quoted = quote_identifier(new_column)?;
        let old_quoted = quote_identifier(old_column)?;

        let mut sql = format!("UPDATE {table_quoted} SET {new_quoted} = {old_quoted}");
        if let Some(clause) = where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(clause);
        }

        Ok(Operation::RunSql { sql, reverse_sql })
    }

    /// Column names from a model's declared fields, in declaration order
    pub fn build_column_list_from_model(model: &ModelSchema) -> Vec<String> {
        model.column_names()
    }

    /// Quote a column list and join it with commas
    pub fn build_quoted_column_list(columns: &[String]) -> Result<String> {
        Ok(quote_identifiers(columns)?.join(", "))
    }

    /// Table name for a model: `<app>_<model>` lower-cased
    pub fn build_table_name(app_label: &str, model_name: &str) -> String {
        format!("{}_{}", app_label, model_name.to_lowercase())
    }
}
