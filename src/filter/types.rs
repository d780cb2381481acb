use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterOp {
    #[serde(rename = "$eq")]
    Eq,
    #[serde(rename = "$in")]
    In,
}

/// Query description shared by every store backend: `where_clause` is an
/// object of `{ field: value }` or `{ field: { "$in": [..] } }` entries and
/// `order` follows the `"field asc, other desc"` / `{ field: "desc" }` forms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterData {
    pub where_clause: Option<Value>,
    pub order: Option<Value>,
}

impl FilterData {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn where_clause(where_clause: Value) -> Self {
        Self {
            where_clause: Some(where_clause),
            order: None,
        }
    }

    /// Single-field equality, the common natural-key lookup.
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        let mut object = serde_json::Map::new();
        object.insert(field.to_string(), value.into());
        Self::where_clause(Value::Object(object))
    }

    pub fn order_by(mut self, order: impl Into<Value>) -> Self {
        self.order = Some(order.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct FilterWhereInfo {
    pub field: String,
    pub operator: FilterOp,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterOrderInfo {
    pub field: String,
    pub sort: SortDirection,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}
