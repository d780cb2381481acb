use serde_json::Value;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FilterData, FilterOrderInfo, SqlResult};

/// A validated query against one collection table.
pub struct Filter {
    table_name: String,
    where_data: Option<Value>,
    order_data: Vec<FilterOrderInfo>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        Self::validate_table_name(&table_name)?;
        Ok(Self {
            table_name,
            where_data: None,
            order_data: vec![],
        })
    }

    pub fn assign(&mut self, data: FilterData) -> Result<&mut Self, FilterError> {
        if let Some(where_clause) = data.where_clause { self.where_clause(where_clause)?; }
        if let Some(order) = data.order { self.order(order)?; }
        Ok(self)
    }

    pub fn where_clause(&mut self, conditions: Value) -> Result<&mut Self, FilterError> {
        FilterWhere::validate(&conditions)?;
        self.where_data = Some(conditions);
        Ok(self)
    }

    pub fn order(&mut self, order_spec: Value) -> Result<&mut Self, FilterError> {
        self.order_data = FilterOrder::validate_and_parse(&order_spec)?;
        Ok(self)
    }

    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let where_result = self.to_where_sql(0)?;
        let query = format!(
            "SELECT data FROM \"{}\" WHERE {} {}",
            self.table_name,
            where_result.query,
            FilterOrder::generate(&self.order_data)
        );
        Ok(SqlResult { query, params: where_result.params })
    }

    pub fn to_where_sql(&self, starting_param_index: usize) -> Result<SqlResult, FilterError> {
        let (query, params) = match self.where_data {
            Some(ref where_data) => FilterWhere::generate(where_data, starting_param_index)?,
            None => ("1=1".to_string(), vec![]),
        };
        Ok(SqlResult { query, params })
    }

    /// Primary key of the first matching row, for single-row updates and deletes.
    pub fn to_first_pk_sql(&self, starting_param_index: usize) -> Result<SqlResult, FilterError> {
        let where_result = self.to_where_sql(starting_param_index)?;
        let query = format!(
            "SELECT pk FROM \"{}\" WHERE {} ORDER BY pk ASC LIMIT 1",
            self.table_name, where_result.query
        );
        Ok(SqlResult { query, params: where_result.params })
    }

    pub fn matches(&self, document: &Value) -> Result<bool, FilterError> {
        match self.where_data {
            Some(ref where_data) => FilterWhere::matches(where_data, document),
            None => Ok(true),
        }
    }

    /// In-memory equivalent of `to_sql`.
    pub fn apply<'a>(&self, documents: impl IntoIterator<Item = &'a Value>) -> Result<Vec<Value>, FilterError> {
        let mut out = Vec::new();
        for document in documents {
            if self.matches(document)? {
                out.push(document.clone());
            }
        }
        FilterOrder::sort(&mut out, &self.order_data);
        Ok(out)
    }

    fn validate_table_name(name: &str) -> Result<(), FilterError> {
        let valid_start = matches!(name.chars().next(), Some(c) if c.is_alphabetic() || c == '_');
        if !valid_start || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(FilterError::InvalidTableName(format!("Invalid table name format: {}", name)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_select_with_where_and_order() {
        let mut filter = Filter::new("tareas").unwrap();
        filter
            .assign(FilterData::eq("estado", "Pendiente").order_by("fecha, hora_inicio"))
            .unwrap();
        let sql = filter.to_sql().unwrap();
        assert_eq!(
            sql.query,
            "SELECT data FROM \"tareas\" WHERE data->'estado' = $1 ORDER BY data->'fecha' ASC, data->'hora_inicio' ASC, pk ASC"
        );
        assert_eq!(sql.params, vec![json!("Pendiente")]);
    }

    #[test]
    fn rejects_bad_table_names() {
        assert!(Filter::new("").is_err());
        assert!(Filter::new("users; drop").is_err());
    }

    #[test]
    fn apply_filters_and_sorts() {
        let docs = vec![
            json!({ "id_agenda": 2, "estado": "programada" }),
            json!({ "id_agenda": 1, "estado": "programada" }),
            json!({ "id_agenda": 3, "estado": "cancelada" }),
        ];
        let mut filter = Filter::new("agendas").unwrap();
        filter
            .assign(FilterData::eq("estado", "programada").order_by(json!({ "id_agenda": "asc" })))
            .unwrap();
        let out = filter.apply(&docs).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["id_agenda"], 1);
    }
}
