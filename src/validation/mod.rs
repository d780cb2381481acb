//! Declarative request schemas.
//!
//! Each operation declares a [`Schema`] as a const table of [`Field`]s.
//! [`validate`] checks a JSON payload against it and returns the normalized
//! payload: numeric strings become numbers, dates become RFC 3339 UTC
//! timestamps and defaults are filled in. Handlers then deserialize the
//! normalized value into their typed input.

pub mod extract;

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::{Map, Number, Value};

use crate::error::ApiError;

pub use extract::{ValidJson, ValidPath, ValidQuery, Validated};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pattern {
    /// 7 to 10 digits
    Identity,
    /// exactly 10 digits
    Phone,
    /// `H:mm` or `HH:mm`, 24h clock
    Time,
    Email,
}

impl Pattern {
    pub fn matches(&self, s: &str) -> bool {
        match self {
            Pattern::Identity => (7..=10).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit()),
            Pattern::Phone => s.len() == 10 && s.bytes().all(|b| b.is_ascii_digit()),
            Pattern::Time => is_time(s),
            Pattern::Email => is_email(s),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Pattern::Identity => "must have between 7 and 10 digits",
            Pattern::Phone => "must have 10 digits",
            Pattern::Time => "must use the HH:mm format",
            Pattern::Email => "must be a valid email",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Rule {
    Str { min: usize, pattern: Option<Pattern> },
    /// Identity given either as a JSON number or a digit string; stored as a string.
    IdentityNumber,
    Number,
    Bool,
    Date,
    StringArray,
    OneOf(&'static [&'static str]),
}

impl Rule {
    pub const STRING: Rule = Rule::Str { min: 0, pattern: None };
    pub const IDENTITY: Rule = Rule::Str { min: 0, pattern: Some(Pattern::Identity) };
    pub const PHONE: Rule = Rule::Str { min: 0, pattern: Some(Pattern::Phone) };
    pub const TIME: Rule = Rule::Str { min: 0, pattern: Some(Pattern::Time) };
    pub const EMAIL: Rule = Rule::Str { min: 0, pattern: Some(Pattern::Email) };

    pub const fn min(min: usize) -> Rule {
        Rule::Str { min, pattern: None }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum DefaultValue {
    Str(&'static str),
    Bool(bool),
}

impl DefaultValue {
    fn to_value(self) -> Value {
        match self {
            DefaultValue::Str(s) => Value::String(s.to_string()),
            DefaultValue::Bool(b) => Value::Bool(b),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub rule: Rule,
    pub required: bool,
    pub default: Option<DefaultValue>,
}

impl Field {
    pub const fn required(name: &'static str, rule: Rule) -> Self {
        Self { name, rule, required: true, default: None }
    }

    pub const fn optional(name: &'static str, rule: Rule) -> Self {
        Self { name, rule, required: false, default: None }
    }

    pub const fn or(self, default: DefaultValue) -> Self {
        Self { default: Some(default), ..self }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub fields: &'static [Field],
    /// Keys not listed in `fields` pass through untouched instead of failing.
    pub allow_unknown: bool,
}

impl Schema {
    pub const fn new(fields: &'static [Field]) -> Self {
        Self { fields, allow_unknown: false }
    }

    pub const fn allow_unknown(self) -> Self {
        Self { allow_unknown: true, ..self }
    }
}

pub fn validate(schema: &Schema, payload: &Value) -> Result<Value, ApiError> {
    let empty = Map::new();
    let input = match payload {
        Value::Object(map) => map,
        Value::Null => &empty,
        _ => return Err(ApiError::validation_error("Payload must be a JSON object", None)),
    };

    let mut output = Map::new();
    let mut errors: Vec<(String, String)> = Vec::new();

    for field in schema.fields {
        match input.get(field.name) {
            Some(value) => match check(field, value) {
                Ok(normalized) => {
                    output.insert(field.name.to_string(), normalized);
                }
                Err(message) => errors.push((field.name.to_string(), message)),
            },
            None => {
                if let Some(default) = field.default {
                    output.insert(field.name.to_string(), default.to_value());
                } else if field.required {
                    errors.push((field.name.to_string(), format!("\"{}\" is required", field.name)));
                }
            }
        }
    }

    for (key, value) in input {
        if schema.fields.iter().any(|f| f.name == key) {
            continue;
        }
        if schema.allow_unknown {
            output.insert(key.clone(), value.clone());
        } else {
            errors.push((key.clone(), format!("\"{}\" is not allowed", key)));
        }
    }

    if errors.is_empty() {
        return Ok(Value::Object(output));
    }

    let message = errors[0].1.clone();
    let field_errors: HashMap<String, String> = errors.into_iter().collect();
    Err(ApiError::validation_error(message, Some(field_errors)))
}

fn check(field: &Field, value: &Value) -> Result<Value, String> {
    let name = field.name;
    match field.rule {
        Rule::Str { min, pattern } => {
            let s = value.as_str().ok_or_else(|| format!("\"{}\" must be a string", name))?;
            if s.is_empty() {
                return Err(format!("\"{}\" is not allowed to be empty", name));
            }
            if s.chars().count() < min {
                return Err(format!("\"{}\" must be at least {} characters long", name, min));
            }
            if let Some(pattern) = pattern {
                if !pattern.matches(s) {
                    return Err(format!("\"{}\" {}", name, pattern.describe()));
                }
            }
            Ok(value.clone())
        }
        Rule::IdentityNumber => {
            let s = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) if n.is_u64() => n.to_string(),
                _ => return Err(format!("\"{}\" must be a number", name)),
            };
            if Pattern::Identity.matches(&s) {
                Ok(Value::String(s))
            } else {
                Err(format!("\"{}\" {}", name, Pattern::Identity.describe()))
            }
        }
        Rule::Number => coerce_number(value).ok_or_else(|| format!("\"{}\" must be a number", name)),
        Rule::Bool => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
            _ => Err(format!("\"{}\" must be a boolean", name)),
        },
        Rule::Date => value
            .as_str()
            .and_then(parse_date)
            .map(|dt| Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
            .ok_or_else(|| format!("\"{}\" must be a valid date", name)),
        Rule::StringArray => match value {
            Value::Array(items) if items.iter().all(Value::is_string) => Ok(value.clone()),
            _ => Err(format!("\"{}\" must be an array of strings", name)),
        },
        Rule::OneOf(allowed) => match value.as_str() {
            Some(s) if allowed.contains(&s) => Ok(value.clone()),
            _ => Err(format!("\"{}\" must be one of [{}]", name, allowed.join(", "))),
        },
    }
}

/// Numbers pass through; numeric strings are converted. Whole values become integers.
fn coerce_number(value: &Value) -> Option<Value> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() {
        return None;
    }
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Some(Value::Number(Number::from(n as i64)))
    } else {
        Number::from_f64(n).map(Value::Number)
    }
}

/// RFC 3339 timestamps or plain `YYYY-MM-DD` dates (taken as UTC midnight).
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn is_time(s: &str) -> bool {
    let Some((hour, minute)) = s.split_once(':') else {
        return false;
    };
    let digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    if !digits(hour) || !digits(minute) || hour.len() > 2 || minute.len() != 2 {
        return false;
    }
    let in_range = |p: &str, max: u32| p.parse::<u32>().map(|v| v <= max).unwrap_or(false);
    in_range(hour, 23) && in_range(minute, 59)
}

fn is_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !host.starts_with('.') && tld.len() >= 2 && tld.chars().all(char::is_alphabetic),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const USER: Schema = Schema::new(&[
        Field::required("numeroIdentificacion", Rule::IDENTITY),
        Field::required("nombres", Rule::min(3)),
        Field::required("telefono", Rule::PHONE),
        Field::required("id_rol", Rule::Number),
        Field::optional("estado", Rule::OneOf(&["activo", "inactivo"])).or(DefaultValue::Str("activo")),
    ]);

    fn field_errors(err: ApiError) -> HashMap<String, String> {
        match err {
            ApiError::ValidationError { field_errors: Some(f), .. } => f,
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn normalizes_numbers_and_fills_defaults() {
        let out = validate(
            &USER,
            &json!({ "numeroIdentificacion": "1234567", "nombres": "Ana", "telefono": "3001234567", "id_rol": "2" }),
        )
        .unwrap();
        assert_eq!(out["id_rol"], json!(2));
        assert_eq!(out["estado"], "activo");
    }

    #[test]
    fn reports_every_failing_field() {
        let err = validate(
            &USER,
            &json!({ "numeroIdentificacion": "12ab", "nombres": "An", "telefono": "300", "extra": true }),
        )
        .unwrap_err();
        let errors = field_errors(err);
        assert!(errors.contains_key("numeroIdentificacion"));
        assert!(errors["nombres"].contains("at least 3"));
        assert!(errors.contains_key("telefono"));
        assert_eq!(errors["id_rol"], "\"id_rol\" is required");
        assert_eq!(errors["extra"], "\"extra\" is not allowed");
    }

    #[test]
    fn rejects_bad_enum_and_empty_strings() {
        let err = validate(
            &USER,
            &json!({ "numeroIdentificacion": "1234567", "nombres": "", "telefono": "3001234567", "id_rol": 1, "estado": "borrado" }),
        )
        .unwrap_err();
        let errors = field_errors(err);
        assert!(errors["nombres"].contains("empty"));
        assert!(errors["estado"].contains("activo, inactivo"));
    }

    #[test]
    fn dates_accept_rfc3339_and_plain_days() {
        const S: Schema = Schema::new(&[Field::required("fecha", Rule::Date)]);
        let out = validate(&S, &json!({ "fecha": "2024-05-01" })).unwrap();
        assert_eq!(out["fecha"], "2024-05-01T00:00:00Z");
        let out = validate(&S, &json!({ "fecha": "2024-05-01T10:30:00-05:00" })).unwrap();
        assert_eq!(out["fecha"], "2024-05-01T15:30:00Z");
        assert!(validate(&S, &json!({ "fecha": "mañana" })).is_err());
    }

    #[test]
    fn identity_numbers_accept_numbers_and_strings() {
        const S: Schema = Schema::new(&[Field::required("numeroIdentificacion", Rule::IdentityNumber)]);
        assert_eq!(validate(&S, &json!({ "numeroIdentificacion": 1234567 })).unwrap()["numeroIdentificacion"], "1234567");
        assert_eq!(validate(&S, &json!({ "numeroIdentificacion": "1234567" })).unwrap()["numeroIdentificacion"], "1234567");
        assert!(validate(&S, &json!({ "numeroIdentificacion": 12 })).is_err());
    }

    #[test]
    fn patterns() {
        assert!(Pattern::Time.matches("9:05"));
        assert!(Pattern::Time.matches("23:59"));
        assert!(!Pattern::Time.matches("24:00"));
        assert!(!Pattern::Time.matches("12:5"));
        assert!(Pattern::Identity.matches("1234567890"));
        assert!(!Pattern::Identity.matches("12345678901"));
        assert!(Pattern::Email.matches("ana@bufete.co"));
        assert!(!Pattern::Email.matches("ana@bufete"));
        assert!(!Pattern::Email.matches("ana @bufete.co"));
    }

    #[test]
    fn unknown_keys_pass_when_allowed() {
        const S: Schema = Schema::new(&[Field::required("id_agenda", Rule::Number)]).allow_unknown();
        let out = validate(&S, &json!({ "id_agenda": "7", "other": "x" })).unwrap();
        assert_eq!(out["id_agenda"], 7);
        assert_eq!(out["other"], "x");
        assert!(validate(&S, &json!({ "id_agenda": "siete" })).is_err());
    }
}
