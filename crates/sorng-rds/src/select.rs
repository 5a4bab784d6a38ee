//! Projection selectors.
//!
//! A selector is resolved into a [`Projector`] once per invocation, before
//! the first network call, and the same projector is applied to every page.

use crate::error::{RdsError, RdsResult};
use crate::operation::{Operation, Projection};
use crate::params::{find_field, normalize_name, BoundParams};
use serde::Serialize;
use serde_json::Value;

/// Caller-facing selector syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Select {
    /// `*`: the whole response.
    All,
    /// A response field.
    Field(String),
    /// `^Name`: echo the bound value of input parameter `Name`.
    Param(String),
}

impl Select {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s == "*" {
            Self::All
        } else if let Some(param) = s.strip_prefix('^') {
            Self::Param(param.to_string())
        } else {
            Self::Field(s.to_string())
        }
    }
}

/// A resolved extraction rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Projector {
    Whole,
    /// Serialized key of the response field.
    Field(String),
    Echo(Value),
    Nothing,
}

impl Projector {
    pub fn resolve<O: Operation>(
        select: Option<&str>,
        pass_thru: bool,
        params: &BoundParams,
    ) -> RdsResult<Self> {
        let err = |reason: String| RdsError::Selector {
            operation: O::ACTION,
            reason,
        };

        if pass_thru {
            if select.is_some() {
                return Err(err("pass-thru cannot be combined with select".to_string()));
            }
            let param = O::PASS_THRU
                .ok_or_else(|| err("operation has no pass-thru parameter".to_string()))?;
            return Ok(Self::Echo(echo(params, param)?));
        }

        match select.map(Select::parse) {
            None => match O::PROJECTION {
                Projection::Whole => Ok(Self::Whole),
                Projection::Nothing => Ok(Self::Nothing),
                Projection::Field(name) => resolve_field::<O>(name).map(Self::Field),
            },
            Some(Select::All) => Ok(Self::Whole),
            Some(Select::Param(name)) => {
                let spec = find_field(O::FIELDS, &name)
                    .ok_or_else(|| err(format!("'{}' is not a parameter", name)))?;
                Ok(Self::Echo(echo(params, spec.name)?))
            }
            Some(Select::Field(name)) => resolve_field::<O>(&name).map(Self::Field),
        }
    }

    /// Values to emit for one response (or one page of a list response).
    pub fn project<R: Serialize>(&self, response: &R) -> RdsResult<Vec<Value>> {
        match self {
            Self::Whole => Ok(vec![serde_json::to_value(response)?]),
            Self::Field(key) => {
                let mut value = serde_json::to_value(response)?;
                Ok(match value.get_mut(key.as_str()).map(Value::take) {
                    Some(Value::Array(items)) => items,
                    Some(Value::Null) | None => Vec::new(),
                    Some(other) => vec![other],
                })
            }
            Self::Echo(value) => Ok(vec![value.clone()]),
            Self::Nothing => Ok(Vec::new()),
        }
    }
}

fn echo(params: &BoundParams, name: &str) -> RdsResult<Value> {
    match params.get(name) {
        Some(v) => Ok(serde_json::to_value(v)?),
        None => Ok(Value::Null),
    }
}

/// Match `name` against the serialized keys of the operation's response.
fn resolve_field<O: Operation>(name: &str) -> RdsResult<String> {
    let keys = response_keys::<O>()?;
    let wanted = normalize_name(name);
    keys.iter()
        .find(|k| normalize_name(k) == wanted)
        .cloned()
        .ok_or_else(|| RdsError::Selector {
            operation: O::ACTION,
            reason: format!(
                "'{}' is not a response field (valid: {})",
                name,
                keys.join(", ")
            ),
        })
}

pub(crate) fn response_keys<O: Operation>() -> RdsResult<Vec<String>> {
    match serde_json::to_value(O::Response::default())? {
        Value::Object(map) => Ok(map.keys().cloned().collect()),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{
        CopyDBClusterParameterGroup, DeleteDBClusterParameterGroup, DescribeDBClusters,
        StartDBCluster,
    };
    use crate::params::ParamValue;
    use std::collections::BTreeMap;

    fn bound<O: Operation>(pairs: &[(&str, &str)]) -> BoundParams {
        let raw: BTreeMap<String, ParamValue> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), ParamValue::from(*v)))
            .collect();
        BoundParams::bind(O::ACTION, O::FIELDS, &raw).unwrap()
    }

    #[test]
    fn parse_forms() {
        assert_eq!(Select::parse("*"), Select::All);
        assert_eq!(Select::parse("^DBClusterIdentifier"), Select::Param("DBClusterIdentifier".into()));
        assert_eq!(Select::parse("Marker"), Select::Field("Marker".into()));
    }

    #[test]
    fn default_projection_resolves_to_field() {
        let p = bound::<StartDBCluster>(&[("DBClusterIdentifier", "c1")]);
        let proj = Projector::resolve::<StartDBCluster>(None, false, &p).unwrap();
        assert_eq!(proj, Projector::Field("db_cluster".into()));
    }

    #[test]
    fn field_selector_is_normalized() {
        let p = bound::<DescribeDBClusters>(&[]);
        let proj = Projector::resolve::<DescribeDBClusters>(Some("Marker"), false, &p).unwrap();
        assert_eq!(proj, Projector::Field("marker".into()));
        let proj = Projector::resolve::<DescribeDBClusters>(Some("DBClusters"), false, &p).unwrap();
        assert_eq!(proj, Projector::Field("db_clusters".into()));
    }

    #[test]
    fn unknown_field_lists_valid_ones() {
        let p = bound::<DescribeDBClusters>(&[]);
        let err = Projector::resolve::<DescribeDBClusters>(Some("Nope"), false, &p).unwrap_err();
        assert!(matches!(err, RdsError::Selector { .. }));
        assert!(err.to_string().contains("db_clusters"));
    }

    #[test]
    fn param_echo() {
        let p = bound::<StartDBCluster>(&[("DBClusterIdentifier", "c1")]);
        let proj =
            Projector::resolve::<StartDBCluster>(Some("^DBClusterIdentifier"), false, &p).unwrap();
        assert_eq!(proj, Projector::Echo(Value::String("c1".into())));
        assert!(Projector::resolve::<StartDBCluster>(Some("^Bogus"), false, &p).is_err());
    }

    #[test]
    fn pass_thru_rules() {
        let p = bound::<DeleteDBClusterParameterGroup>(&[("DBClusterParameterGroupName", "pg")]);
        let proj = Projector::resolve::<DeleteDBClusterParameterGroup>(None, true, &p).unwrap();
        assert_eq!(proj, Projector::Echo(Value::String("pg".into())));

        let err = Projector::resolve::<DeleteDBClusterParameterGroup>(Some("*"), true, &p)
            .unwrap_err();
        assert!(matches!(err, RdsError::Selector { .. }));

        let p = bound::<StartDBCluster>(&[("DBClusterIdentifier", "c1")]);
        assert!(Projector::resolve::<StartDBCluster>(None, true, &p).is_err());
    }

    #[test]
    fn every_default_projection_resolves() {
        let p = bound::<CopyDBClusterParameterGroup>(&[
            ("SourceDBClusterParameterGroupIdentifier", "a"),
            ("TargetDBClusterParameterGroupIdentifier", "b"),
            ("TargetDBClusterParameterGroupDescription", "c"),
        ]);
        let proj = Projector::resolve::<CopyDBClusterParameterGroup>(None, false, &p).unwrap();
        assert_eq!(proj, Projector::Field("db_cluster_parameter_group".into()));
    }

    #[test]
    fn project_field_flattens_arrays_and_skips_null() {
        let value = serde_json::json!({ "items": [1, 2], "one": "x", "none": null });
        assert_eq!(
            Projector::Field("items".into()).project(&value).unwrap(),
            vec![Value::from(1), Value::from(2)]
        );
        assert_eq!(Projector::Field("one".into()).project(&value).unwrap(), vec![Value::from("x")]);
        assert!(Projector::Field("none".into()).project(&value).unwrap().is_empty());
        assert!(Projector::Nothing.project(&value).unwrap().is_empty());
        assert_eq!(Projector::Whole.project(&value).unwrap(), vec![value.clone()]);
    }
}
