use serde_json::Value;

use super::error::FilterError;
use super::filter_where::{field_expression, json_cmp, validate_field_name};
use super::types::{FilterOrderInfo, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    pub fn validate_and_parse(order: &Value) -> Result<Vec<FilterOrderInfo>, FilterError> {
        let infos = match order {
            Value::String(s) => Self::parse_order_string(s),
            Value::Array(arr) => {
                // Expect array of strings like ["fecha asc", "hora_inicio asc"]
                let mut out = Vec::new();
                for v in arr {
                    if let Value::String(s) = v { out.extend(Self::parse_order_string(s)); }
                }
                out
            }
            Value::Object(obj) => {
                // { "id_agenda": "desc" }
                obj.iter()
                    .map(|(k, v)| {
                        let sort = match v.as_str().unwrap_or("asc").to_ascii_lowercase().as_str() {
                            "desc" => SortDirection::Desc,
                            _ => SortDirection::Asc,
                        };
                        FilterOrderInfo { field: k.clone(), sort }
                    })
                    .collect()
            }
            _ => vec![],
        };
        for info in &infos {
            validate_field_name(&info.field)?;
        }
        Ok(infos)
    }

    fn parse_order_string(s: &str) -> Vec<FilterOrderInfo> {
        // split on commas, then each token into field and direction
        let mut out = Vec::new();
        for part in s.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() { continue; }
            let mut it = trimmed.split_whitespace();
            if let Some(field) = it.next() {
                let dir = it.next().unwrap_or("asc");
                let sort = if dir.eq_ignore_ascii_case("desc") { SortDirection::Desc } else { SortDirection::Asc };
                out.push(FilterOrderInfo { field: field.to_string(), sort });
            }
        }
        out
    }

    /// Insertion order (`pk`) breaks ties so both backends agree.
    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        let mut parts: Vec<String> = infos
            .iter()
            .map(|i| format!("{} {}", field_expression(&i.field), i.sort.to_sql()))
            .collect();
        parts.push("pk ASC".to_string());
        format!("ORDER BY {}", parts.join(", "))
    }

    /// Stable in-memory sort; documents are kept in insertion order otherwise.
    pub fn sort(documents: &mut [Value], infos: &[FilterOrderInfo]) {
        if infos.is_empty() { return; }
        documents.sort_by(|a, b| {
            for info in infos {
                let ordering = json_cmp(
                    a.get(&info.field).unwrap_or(&Value::Null),
                    b.get(&info.field).unwrap_or(&Value::Null),
                );
                let ordering = match info.sort {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                };
                if ordering != std::cmp::Ordering::Equal {
                    return ordering;
                }
            }
            std::cmp::Ordering::Equal
        });
    }
}
