//! Typed parameter binding.
//!
//! Callers hand over a loosely typed map of named values. Binding checks each
//! name against the operation's [`FieldSpec`] table, coerces the value to the
//! declared [`FieldKind`], and fails fast on anything unknown, malformed or
//! missing. Nothing here touches the network.

use crate::error::{RdsError, RdsResult};
use crate::types::Tag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value type of an operation field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    /// 32-bit integer.
    Integer,
    Boolean,
    TextList,
    TagList,
    /// RFC 3339 timestamp, sent as given.
    Timestamp,
    /// Text restricted to a fixed set of values.
    OneOf(&'static [&'static str]),
}

/// One named input field of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub aliases: &'static [&'static str],
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            aliases: &[],
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            aliases: &[],
        }
    }

    pub const fn aliased(self, aliases: &'static [&'static str]) -> Self {
        Self {
            name: self.name,
            kind: self.kind,
            required: self.required,
            aliases,
        }
    }

    /// Whether `name` refers to this field, by name or alias.
    pub fn matches(&self, name: &str) -> bool {
        let wanted = normalize_name(name);
        normalize_name(self.name) == wanted
            || self.aliases.iter().any(|a| normalize_name(a) == wanted)
    }
}

/// `MaxRecords`, accepted under its singular legacy spelling too.
pub(crate) const MAX_RECORDS: FieldSpec =
    FieldSpec::optional("MaxRecords", FieldKind::Integer).aliased(&["MaxRecord", "MaxItemsPerPage"]);

/// `Marker`, the continuation token of list operations.
pub(crate) const MARKER: FieldSpec =
    FieldSpec::optional("Marker", FieldKind::Text).aliased(&["NextToken"]);

/// A caller-supplied parameter value before binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<String>),
    Tags(Vec<Tag>),
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(v: Vec<String>) -> Self {
        Self::List(v)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(v: Vec<&str>) -> Self {
        Self::List(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<Tag>> for ParamValue {
    fn from(v: Vec<Tag>) -> Self {
        Self::Tags(v)
    }
}

/// Lowercase and drop `-` and `_`, so `db-cluster-identifier`,
/// `db_cluster_identifier` and `DBClusterIdentifier` compare equal.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Look up a field by name or alias.
pub fn find_field(fields: &'static [FieldSpec], name: &str) -> Option<&'static FieldSpec> {
    fields.iter().find(|f| f.matches(name))
}

/// Parameters validated against an operation's field table.
///
/// Values are keyed by canonical field name and already coerced to the
/// field's kind. A field that is present holds an explicit value, which may
/// be empty; an absent field was never supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParams {
    action: &'static str,
    values: BTreeMap<&'static str, ParamValue>,
}

impl BoundParams {
    pub fn bind(
        action: &'static str,
        fields: &'static [FieldSpec],
        raw: &BTreeMap<String, ParamValue>,
    ) -> RdsResult<Self> {
        let mut values = BTreeMap::new();
        for (name, value) in raw {
            let spec = find_field(fields, name).ok_or_else(|| RdsError::UnknownParameter {
                operation: action,
                parameter: name.clone(),
            })?;
            let coerced = coerce(action, spec, value)?;
            if values.insert(spec.name, coerced).is_some() {
                return Err(RdsError::InvalidParameter {
                    operation: action,
                    parameter: spec.name.to_string(),
                    reason: "given more than once".to_string(),
                });
            }
        }

        if let Some(missing) = fields
            .iter()
            .find(|f| f.required && !values.contains_key(f.name))
        {
            return Err(RdsError::MissingRequiredField {
                operation: action,
                field: missing.name,
            });
        }

        log::debug!("{}: validated {} parameter(s)", action, values.len());
        Ok(Self { action, values })
    }

    pub fn action(&self) -> &'static str {
        self.action
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn text(&self, name: &str) -> Option<String> {
        match self.values.get(name) {
            Some(ParamValue::Text(s)) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn required_text(&self, name: &'static str) -> RdsResult<String> {
        self.text(name).ok_or(RdsError::MissingRequiredField {
            operation: self.action,
            field: name,
        })
    }

    pub fn int(&self, name: &str) -> Option<i32> {
        match self.values.get(name) {
            Some(ParamValue::Int(i)) => i32::try_from(*i).ok(),
            _ => None,
        }
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(ParamValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn list(&self, name: &str) -> Option<Vec<String>> {
        match self.values.get(name) {
            Some(ParamValue::List(l)) => Some(l.clone()),
            _ => None,
        }
    }

    pub fn required_list(&self, name: &'static str) -> RdsResult<Vec<String>> {
        self.list(name).ok_or(RdsError::MissingRequiredField {
            operation: self.action,
            field: name,
        })
    }

    pub fn tags(&self, name: &str) -> Option<Vec<Tag>> {
        match self.values.get(name) {
            Some(ParamValue::Tags(t)) => Some(t.clone()),
            _ => None,
        }
    }

    pub fn required_tags(&self, name: &'static str) -> RdsResult<Vec<Tag>> {
        self.tags(name).ok_or(RdsError::MissingRequiredField {
            operation: self.action,
            field: name,
        })
    }
}

fn coerce(action: &'static str, spec: &FieldSpec, value: &ParamValue) -> RdsResult<ParamValue> {
    let invalid = |reason: String| RdsError::InvalidParameter {
        operation: action,
        parameter: spec.name.to_string(),
        reason,
    };

    match (spec.kind, value) {
        (FieldKind::Text, ParamValue::Text(s)) => Ok(ParamValue::Text(s.clone())),
        (FieldKind::Text, ParamValue::Int(i)) => Ok(ParamValue::Text(i.to_string())),
        (FieldKind::Text, ParamValue::Bool(b)) => Ok(ParamValue::Text(b.to_string())),

        (FieldKind::Integer, ParamValue::Int(i)) => check_i32(*i).map_err(invalid),
        (FieldKind::Integer, ParamValue::Text(s)) => match s.trim().parse::<i64>() {
            Ok(i) => check_i32(i).map_err(invalid),
            Err(_) => Err(invalid(format!("'{}' is not an integer", s))),
        },

        (FieldKind::Boolean, ParamValue::Bool(b)) => Ok(ParamValue::Bool(*b)),
        (FieldKind::Boolean, ParamValue::Text(s)) => match s.trim().to_ascii_lowercase().as_str()
        {
            "true" => Ok(ParamValue::Bool(true)),
            "false" => Ok(ParamValue::Bool(false)),
            _ => Err(invalid(format!("'{}' is not a boolean", s))),
        },

        (FieldKind::TextList, ParamValue::List(l)) => Ok(ParamValue::List(l.clone())),
        (FieldKind::TextList, ParamValue::Text(s)) => Ok(ParamValue::List(vec![s.clone()])),

        (FieldKind::TagList, ParamValue::Tags(t)) => Ok(ParamValue::Tags(t.clone())),
        (FieldKind::TagList, ParamValue::List(l)) if l.is_empty() => Ok(ParamValue::Tags(Vec::new())),

        (FieldKind::Timestamp, ParamValue::Text(s)) => chrono::DateTime::parse_from_rfc3339(s)
            .map(|_| ParamValue::Text(s.clone()))
            .map_err(|e| invalid(format!("'{}' is not an RFC 3339 timestamp: {}", s, e))),

        (FieldKind::OneOf(allowed), ParamValue::Text(s)) => {
            if allowed.contains(&s.as_str()) {
                Ok(ParamValue::Text(s.clone()))
            } else {
                Err(invalid(format!("'{}' is not one of: {}", s, allowed.join(", "))))
            }
        }

        (kind, other) => Err(invalid(format!(
            "expected {}, got {}",
            kind_name(kind),
            value_name(other)
        ))),
    }
}

fn check_i32(i: i64) -> Result<ParamValue, String> {
    if i32::try_from(i).is_ok() {
        Ok(ParamValue::Int(i))
    } else {
        Err(format!("{} is out of range", i))
    }
}

fn kind_name(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text => "text",
        FieldKind::Integer => "an integer",
        FieldKind::Boolean => "a boolean",
        FieldKind::TextList => "a list of strings",
        FieldKind::TagList => "a list of tags",
        FieldKind::Timestamp => "a timestamp",
        FieldKind::OneOf(_) => "an enumerated value",
    }
}

fn value_name(value: &ParamValue) -> &'static str {
    match value {
        ParamValue::Bool(_) => "a boolean",
        ParamValue::Int(_) => "an integer",
        ParamValue::Text(_) => "text",
        ParamValue::List(_) => "a list",
        ParamValue::Tags(_) => "a tag list",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::required("DBClusterIdentifier", FieldKind::Text),
        FieldSpec::optional("Port", FieldKind::Integer),
        FieldSpec::optional("ApplyImmediately", FieldKind::Boolean),
        FieldSpec::optional("VpcSecurityGroupIds", FieldKind::TextList),
        FieldSpec::optional("Tags", FieldKind::TagList),
        FieldSpec::optional("BacktrackTo", FieldKind::Timestamp),
        FieldSpec::optional("SourceType", FieldKind::OneOf(&["db-cluster", "db-instance"])),
        MAX_RECORDS,
    ];

    fn raw(pairs: &[(&str, ParamValue)]) -> BTreeMap<String, ParamValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn binds_by_normalized_name() {
        let bound = BoundParams::bind(
            "Op",
            FIELDS,
            &raw(&[
                ("db-cluster-identifier", "c1".into()),
                ("port", "3306".into()),
                ("apply_immediately", "TRUE".into()),
            ]),
        )
        .unwrap();
        assert_eq!(bound.text("DBClusterIdentifier").as_deref(), Some("c1"));
        assert_eq!(bound.int("Port"), Some(3306));
        assert_eq!(bound.flag("ApplyImmediately"), Some(true));
    }

    #[test]
    fn alias_binds_to_canonical_field() {
        let bound = BoundParams::bind(
            "Op",
            FIELDS,
            &raw(&[("DBClusterIdentifier", "c1".into()), ("MaxRecord", 2i64.into())]),
        )
        .unwrap();
        assert_eq!(bound.int("MaxRecords"), Some(2));
    }

    #[test]
    fn same_field_twice_is_invalid() {
        let err = BoundParams::bind(
            "Op",
            FIELDS,
            &raw(&[
                ("DBClusterIdentifier", "c1".into()),
                ("MaxRecord", 2i64.into()),
                ("MaxRecords", 3i64.into()),
            ]),
        )
        .unwrap_err();
        assert!(matches!(err, RdsError::InvalidParameter { .. }));
    }

    #[test]
    fn missing_required_field() {
        let err = BoundParams::bind("Op", FIELDS, &raw(&[("Port", 1i64.into())])).unwrap_err();
        match err {
            RdsError::MissingRequiredField { operation, field } => {
                assert_eq!(operation, "Op");
                assert_eq!(field, "DBClusterIdentifier");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn explicit_empty_counts_as_present() {
        let bound =
            BoundParams::bind("Op", FIELDS, &raw(&[("DBClusterIdentifier", "".into())])).unwrap();
        assert_eq!(bound.text("DBClusterIdentifier").as_deref(), Some(""));
    }

    #[test]
    fn unknown_parameter() {
        let err = BoundParams::bind(
            "Op",
            FIELDS,
            &raw(&[("DBClusterIdentifier", "c1".into()), ("Colour", "red".into())]),
        )
        .unwrap_err();
        assert!(matches!(err, RdsError::UnknownParameter { ref parameter, .. } if parameter == "Colour"));
    }

    #[test]
    fn type_mismatch_and_range() {
        for (name, value) in [
            ("Port", ParamValue::from("abc")),
            ("Port", ParamValue::Int(i64::from(i32::MAX) + 1)),
            ("ApplyImmediately", ParamValue::from("maybe")),
            ("Tags", ParamValue::from("env=prod")),
            ("BacktrackTo", ParamValue::from("yesterday")),
            ("SourceType", ParamValue::from("db-proxy")),
        ] {
            let err = BoundParams::bind(
                "Op",
                FIELDS,
                &raw(&[("DBClusterIdentifier", "c1".into()), (name, value)]),
            )
            .unwrap_err();
            assert!(
                matches!(err, RdsError::InvalidParameter { .. }),
                "{} should be invalid: {:?}",
                name,
                err
            );
        }
    }

    #[test]
    fn list_coercions() {
        let bound = BoundParams::bind(
            "Op",
            FIELDS,
            &raw(&[
                ("DBClusterIdentifier", "c1".into()),
                ("VpcSecurityGroupIds", "sg-1".into()),
                ("Tags", ParamValue::List(vec![])),
            ]),
        )
        .unwrap();
        assert_eq!(bound.list("VpcSecurityGroupIds"), Some(vec!["sg-1".to_string()]));
        assert_eq!(bound.tags("Tags"), Some(vec![]));
    }

    #[test]
    fn timestamp_accepted() {
        let bound = BoundParams::bind(
            "Op",
            FIELDS,
            &raw(&[
                ("DBClusterIdentifier", "c1".into()),
                ("BacktrackTo", "2024-03-01T10:00:00Z".into()),
            ]),
        )
        .unwrap();
        assert_eq!(bound.text("BacktrackTo").as_deref(), Some("2024-03-01T10:00:00Z"));
    }

    #[test]
    fn param_value_untagged_json() {
        let v: ParamValue = serde_json::from_str(r#"[{"Key":"env","Value":"prod"}]"#).unwrap();
        assert_eq!(v, ParamValue::Tags(vec![Tag::new("env", "prod")]));
        let v: ParamValue = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(v, ParamValue::from(vec!["a", "b"]));
        let v: ParamValue = serde_json::from_str("42").unwrap();
        assert_eq!(v, ParamValue::Int(42));
    }

    #[test]
    fn normalize() {
        assert_eq!(normalize_name("Describe-DB_Clusters"), "describedbclusters");
    }
}
