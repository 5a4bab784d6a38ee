//! Aurora cluster parameter groups.

use crate::error::RdsResult;
use crate::operation::{paginated, Operation, Projection};
use crate::params::{BoundParams, FieldKind, FieldSpec, MARKER, MAX_RECORDS};
use crate::query::xml::xml_text;
use crate::query::{FromQueryXml, QueryWriter, ToQuery};
use crate::transport::RdsTransport;
use crate::types::{parse_list, parse_one, DBClusterParameterGroup, Parameter, Tag};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

// ── CopyDBClusterParameterGroup ─────────────────────────────────────────

pub struct CopyDBClusterParameterGroup;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CopyDBClusterParameterGroupInput {
    pub source_db_cluster_parameter_group_identifier: String,
    pub target_db_cluster_parameter_group_identifier: String,
    pub target_db_cluster_parameter_group_description: String,
    pub tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyDBClusterParameterGroupOutput {
    pub db_cluster_parameter_group: Option<DBClusterParameterGroup>,
}

impl Operation for CopyDBClusterParameterGroup {
    type Request = CopyDBClusterParameterGroupInput;
    type Response = CopyDBClusterParameterGroupOutput;

    const ACTION: &'static str = "CopyDBClusterParameterGroup";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("SourceDBClusterParameterGroupIdentifier", FieldKind::Text)
            .aliased(&["Source"]),
        FieldSpec::required("TargetDBClusterParameterGroupIdentifier", FieldKind::Text)
            .aliased(&["Target"]),
        FieldSpec::required("TargetDBClusterParameterGroupDescription", FieldKind::Text)
            .aliased(&["Description"]),
        FieldSpec::optional("Tags", FieldKind::TagList),
    ];
    const PROJECTION: Projection = Projection::Field("db_cluster_parameter_group");
    const MUTATING: bool = true;

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(CopyDBClusterParameterGroupInput {
            source_db_cluster_parameter_group_identifier: p
                .required_text("SourceDBClusterParameterGroupIdentifier")?,
            target_db_cluster_parameter_group_identifier: p
                .required_text("TargetDBClusterParameterGroupIdentifier")?,
            target_db_cluster_parameter_group_description: p
                .required_text("TargetDBClusterParameterGroupDescription")?,
            tags: p.tags("Tags"),
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.copy_db_cluster_parameter_group(request, cancel)
    }
}

impl ToQuery for CopyDBClusterParameterGroupInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.text(
            "SourceDBClusterParameterGroupIdentifier",
            &self.source_db_cluster_parameter_group_identifier,
        )
        .text(
            "TargetDBClusterParameterGroupIdentifier",
            &self.target_db_cluster_parameter_group_identifier,
        )
        .text(
            "TargetDBClusterParameterGroupDescription",
            &self.target_db_cluster_parameter_group_description,
        )
        .tags("Tags", &self.tags);
    }
}

impl FromQueryXml for CopyDBClusterParameterGroupOutput {
    fn from_query_xml(r: &str) -> Self {
        Self {
            db_cluster_parameter_group: parse_one(
                r,
                "DBClusterParameterGroup",
                DBClusterParameterGroup::from_xml,
            ),
        }
    }
}

// ── CreateDBClusterParameterGroup ───────────────────────────────────────

pub struct CreateDBClusterParameterGroup;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateDBClusterParameterGroupInput {
    pub db_cluster_parameter_group_name: String,
    pub db_parameter_group_family: String,
    pub description: String,
    pub tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateDBClusterParameterGroupOutput {
    pub db_cluster_parameter_group: Option<DBClusterParameterGroup>,
}

impl Operation for CreateDBClusterParameterGroup {
    type Request = CreateDBClusterParameterGroupInput;
    type Response = CreateDBClusterParameterGroupOutput;

    const ACTION: &'static str = "CreateDBClusterParameterGroup";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("DBClusterParameterGroupName", FieldKind::Text),
        FieldSpec::required("DBParameterGroupFamily", FieldKind::Text).aliased(&["Family"]),
        FieldSpec::required("Description", FieldKind::Text),
        FieldSpec::optional("Tags", FieldKind::TagList),
    ];
    const PROJECTION: Projection = Projection::Field("db_cluster_parameter_group");
    const MUTATING: bool = true;

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(CreateDBClusterParameterGroupInput {
            db_cluster_parameter_group_name: p.required_text("DBClusterParameterGroupName")?,
            db_parameter_group_family: p.required_text("DBParameterGroupFamily")?,
            description: p.required_text("Description")?,
            tags: p.tags("Tags"),
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.create_db_cluster_parameter_group(request, cancel)
    }
}

impl ToQuery for CreateDBClusterParameterGroupInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.text("DBClusterParameterGroupName", &self.db_cluster_parameter_group_name)
            .text("DBParameterGroupFamily", &self.db_parameter_group_family)
            .text("Description", &self.description)
            .tags("Tags", &self.tags);
    }
}

impl FromQueryXml for CreateDBClusterParameterGroupOutput {
    fn from_query_xml(r: &str) -> Self {
        Self {
            db_cluster_parameter_group: parse_one(
                r,
                "DBClusterParameterGroup",
                DBClusterParameterGroup::from_xml,
            ),
        }
    }
}

// ── DeleteDBClusterParameterGroup ───────────────────────────────────────

pub struct DeleteDBClusterParameterGroup;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteDBClusterParameterGroupInput {
    pub db_cluster_parameter_group_name: String,
}

/// The service returns no payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteDBClusterParameterGroupOutput {}

impl Operation for DeleteDBClusterParameterGroup {
    type Request = DeleteDBClusterParameterGroupInput;
    type Response = DeleteDBClusterParameterGroupOutput;

    const ACTION: &'static str = "DeleteDBClusterParameterGroup";
    const FIELDS: &'static [FieldSpec] =
        &[FieldSpec::required("DBClusterParameterGroupName", FieldKind::Text)];
    const PROJECTION: Projection = Projection::Nothing;
    const MUTATING: bool = true;
    const PASS_THRU: Option<&'static str> = Some("DBClusterParameterGroupName");

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(DeleteDBClusterParameterGroupInput {
            db_cluster_parameter_group_name: p.required_text("DBClusterParameterGroupName")?,
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.delete_db_cluster_parameter_group(request, cancel)
    }
}

impl ToQuery for DeleteDBClusterParameterGroupInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.text("DBClusterParameterGroupName", &self.db_cluster_parameter_group_name);
    }
}

impl FromQueryXml for DeleteDBClusterParameterGroupOutput {
    fn from_query_xml(_: &str) -> Self {
        Self {}
    }
}

// ── ResetDBClusterParameterGroup ────────────────────────────────────────

pub struct ResetDBClusterParameterGroup;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResetDBClusterParameterGroupInput {
    pub db_cluster_parameter_group_name: String,
    pub reset_all_parameters: Option<bool>,
    /// Names of the parameters to reset.
    pub parameters: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResetDBClusterParameterGroupOutput {
    pub db_cluster_parameter_group_name: Option<String>,
}

impl Operation for ResetDBClusterParameterGroup {
    type Request = ResetDBClusterParameterGroupInput;
    type Response = ResetDBClusterParameterGroupOutput;

    const ACTION: &'static str = "ResetDBClusterParameterGroup";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("DBClusterParameterGroupName", FieldKind::Text),
        FieldSpec::optional("ResetAllParameters", FieldKind::Boolean),
        FieldSpec::optional("Parameters", FieldKind::TextList).aliased(&["ParameterNames"]),
    ];
    const PROJECTION: Projection = Projection::Field("db_cluster_parameter_group_name");
    const MUTATING: bool = true;

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(ResetDBClusterParameterGroupInput {
            db_cluster_parameter_group_name: p.required_text("DBClusterParameterGroupName")?,
            reset_all_parameters: p.flag("ResetAllParameters"),
            parameters: p.list("Parameters"),
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.reset_db_cluster_parameter_group(request, cancel)
    }
}

impl ToQuery for ResetDBClusterParameterGroupInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.text("DBClusterParameterGroupName", &self.db_cluster_parameter_group_name)
            .opt_bool("ResetAllParameters", self.reset_all_parameters)
            .list_of("Parameters", "Parameter", "ParameterName", &self.parameters);
    }
}

impl FromQueryXml for ResetDBClusterParameterGroupOutput {
    fn from_query_xml(r: &str) -> Self {
        Self {
            db_cluster_parameter_group_name: xml_text(r, "DBClusterParameterGroupName"),
        }
    }
}

// ── DescribeDBClusterParameterGroups ────────────────────────────────────

pub struct DescribeDBClusterParameterGroups;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescribeDBClusterParameterGroupsInput {
    pub db_cluster_parameter_group_name: Option<String>,
    pub max_records: Option<i32>,
    pub marker: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescribeDBClusterParameterGroupsOutput {
    pub db_cluster_parameter_groups: Vec<DBClusterParameterGroup>,
    pub marker: Option<String>,
}

impl Operation for DescribeDBClusterParameterGroups {
    type Request = DescribeDBClusterParameterGroupsInput;
    type Response = DescribeDBClusterParameterGroupsOutput;

    const ACTION: &'static str = "DescribeDBClusterParameterGroups";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("DBClusterParameterGroupName", FieldKind::Text),
        MAX_RECORDS,
        MARKER,
    ];
    const PROJECTION: Projection = Projection::Field("db_cluster_parameter_groups");

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(DescribeDBClusterParameterGroupsInput {
            db_cluster_parameter_group_name: p.text("DBClusterParameterGroupName"),
            max_records: p.int("MaxRecords"),
            marker: p.text("Marker"),
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.describe_db_cluster_parameter_groups(request, cancel)
    }
}

paginated!(
    DescribeDBClusterParameterGroups,
    DBClusterParameterGroup,
    db_cluster_parameter_groups
);

impl ToQuery for DescribeDBClusterParameterGroupsInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.opt_text("DBClusterParameterGroupName", &self.db_cluster_parameter_group_name)
            .opt_int("MaxRecords", self.max_records)
            .opt_text("Marker", &self.marker);
    }
}

impl FromQueryXml for DescribeDBClusterParameterGroupsOutput {
    fn from_query_xml(r: &str) -> Self {
        Self {
            db_cluster_parameter_groups: parse_list(
                r,
                "DBClusterParameterGroups",
                "DBClusterParameterGroup",
                DBClusterParameterGroup::from_xml,
            ),
            marker: xml_text(r, "Marker"),
        }
    }
}

// ── DescribeDBClusterParameters ─────────────────────────────────────────

pub struct DescribeDBClusterParameters;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescribeDBClusterParametersInput {
    pub db_cluster_parameter_group_name: String,
    /// `user`, `engine` or `service`.
    pub source: Option<String>,
    pub max_records: Option<i32>,
    pub marker: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescribeDBClusterParametersOutput {
    pub parameters: Vec<Parameter>,
    pub marker: Option<String>,
}

impl Operation for DescribeDBClusterParameters {
    type Request = DescribeDBClusterParametersInput;
    type Response = DescribeDBClusterParametersOutput;

    const ACTION: &'static str = "DescribeDBClusterParameters";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("DBClusterParameterGroupName", FieldKind::Text),
        FieldSpec::optional("Source", FieldKind::OneOf(&["user", "engine", "service"])),
        MAX_RECORDS,
        MARKER,
    ];
    const PROJECTION: Projection = Projection::Field("parameters");

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(DescribeDBClusterParametersInput {
            db_cluster_parameter_group_name: p.required_text("DBClusterParameterGroupName")?,
            source: p.text("Source"),
            max_records: p.int("MaxRecords"),
            marker: p.text("Marker"),
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.describe_db_cluster_parameters(request, cancel)
    }
}

paginated!(DescribeDBClusterParameters, Parameter, parameters);

impl ToQuery for DescribeDBClusterParametersInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.text("DBClusterParameterGroupName", &self.db_cluster_parameter_group_name)
            .opt_text("Source", &self.source)
            .opt_int("MaxRecords", self.max_records)
            .opt_text("Marker", &self.marker);
    }
}

impl FromQueryXml for DescribeDBClusterParametersOutput {
    fn from_query_xml(r: &str) -> Self {
        Self {
            parameters: parse_list(r, "Parameters", "Parameter", Parameter::from_xml),
            marker: xml_text(r, "Marker"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;
    use std::collections::BTreeMap;

    fn bind<O: Operation>(pairs: Vec<(&str, ParamValue)>) -> RdsResult<O::Request> {
        let raw: BTreeMap<String, ParamValue> =
            pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        O::build(&BoundParams::bind(O::ACTION, O::FIELDS, &raw)?)
    }

    #[test]
    fn copy_builds_with_aliases() {
        let req = bind::<CopyDBClusterParameterGroup>(vec![
            ("Source", "default.aurora-mysql8.0".into()),
            ("Target", "custom-pg".into()),
            ("Description", "copied".into()),
            ("Tags", ParamValue::Tags(vec![Tag::new("env", "dev")])),
        ])
        .unwrap();
        assert_eq!(req.source_db_cluster_parameter_group_identifier, "default.aurora-mysql8.0");
        assert_eq!(req.target_db_cluster_parameter_group_identifier, "custom-pg");
        assert_eq!(req.tags.as_ref().map(Vec::len), Some(1));

        let mut w = QueryWriter::new(CopyDBClusterParameterGroup::ACTION);
        req.write_query(&mut w);
        assert_eq!(w.get("TargetDBClusterParameterGroupDescription"), Some("copied"));
        assert_eq!(w.get("Tags.Tag.1.Key"), Some("env"));
    }

    #[test]
    fn reset_encodes_parameter_names() {
        let req = bind::<ResetDBClusterParameterGroup>(vec![
            ("DBClusterParameterGroupName", "pg".into()),
            ("ParameterNames", ParamValue::from(vec!["max_connections", "wait_timeout"])),
        ])
        .unwrap();
        let mut w = QueryWriter::new(ResetDBClusterParameterGroup::ACTION);
        req.write_query(&mut w);
        assert_eq!(w.get("Parameters.Parameter.2.ParameterName"), Some("wait_timeout"));
        assert_eq!(w.get("ResetAllParameters"), None);
    }

    #[test]
    fn describe_parameters_rejects_unknown_source() {
        let err = bind::<DescribeDBClusterParameters>(vec![
            ("DBClusterParameterGroupName", "pg".into()),
            ("Source", "customer".into()),
        ])
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn describe_groups_from_xml() {
        let xml = r#"<DescribeDBClusterParameterGroupsResult>
            <DBClusterParameterGroups>
              <DBClusterParameterGroup>
                <DBClusterParameterGroupName>pg-a</DBClusterParameterGroupName>
                <DBParameterGroupFamily>aurora-postgresql15</DBParameterGroupFamily>
                <Description>a</Description>
              </DBClusterParameterGroup>
              <DBClusterParameterGroup>
                <DBClusterParameterGroupName>pg-b</DBClusterParameterGroupName>
              </DBClusterParameterGroup>
            </DBClusterParameterGroups>
            <Marker>next-1</Marker>
          </DescribeDBClusterParameterGroupsResult>"#;
        let out = DescribeDBClusterParameterGroupsOutput::from_query_xml(xml);
        assert_eq!(out.db_cluster_parameter_groups.len(), 2);
        assert_eq!(out.db_cluster_parameter_groups[0].db_parameter_group_family, "aurora-postgresql15");
        assert_eq!(out.marker.as_deref(), Some("next-1"));
    }

    #[test]
    fn reset_output_from_xml() {
        let out = ResetDBClusterParameterGroupOutput::from_query_xml(
            "<ResetDBClusterParameterGroupResult><DBClusterParameterGroupName>pg</DBClusterParameterGroupName></ResetDBClusterParameterGroupResult>",
        );
        assert_eq!(out.db_cluster_parameter_group_name.as_deref(), Some("pg"));
    }
}
