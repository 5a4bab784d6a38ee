//! RDS Proxy.

use crate::error::RdsResult;
use crate::operation::{paginated, Operation, Projection};
use crate::params::{BoundParams, FieldKind, FieldSpec, MARKER, MAX_RECORDS};
use crate::query::xml::xml_text;
use crate::query::{FromQueryXml, QueryWriter, ToQuery};
use crate::transport::RdsTransport;
use crate::types::{parse_list, parse_one, DBProxy};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Response shape of the mutating proxy actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DBProxyOutput {
    pub db_proxy: Option<DBProxy>,
}

impl FromQueryXml for DBProxyOutput {
    fn from_query_xml(r: &str) -> Self {
        Self {
            db_proxy: parse_one(r, "DBProxy", DBProxy::from_xml),
        }
    }
}

// ── ModifyDBProxy ───────────────────────────────────────────────────────

pub struct ModifyDBProxy;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModifyDBProxyInput {
    pub db_proxy_name: String,
    pub new_db_proxy_name: Option<String>,
    pub require_tls: Option<bool>,
    /// Seconds a client connection may idle before the proxy closes it.
    pub idle_client_timeout: Option<i32>,
    pub debug_logging: Option<bool>,
    pub role_arn: Option<String>,
    pub security_groups: Option<Vec<String>>,
}

impl Operation for ModifyDBProxy {
    type Request = ModifyDBProxyInput;
    type Response = DBProxyOutput;

    const ACTION: &'static str = "ModifyDBProxy";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("DBProxyName", FieldKind::Text),
        FieldSpec::optional("NewDBProxyName", FieldKind::Text),
        FieldSpec::optional("RequireTLS", FieldKind::Boolean),
        FieldSpec::optional("IdleClientTimeout", FieldKind::Integer),
        FieldSpec::optional("DebugLogging", FieldKind::Boolean),
        FieldSpec::optional("RoleArn", FieldKind::Text),
        FieldSpec::optional("SecurityGroups", FieldKind::TextList),
    ];
    const PROJECTION: Projection = Projection::Field("db_proxy");
    const MUTATING: bool = true;

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(ModifyDBProxyInput {
            db_proxy_name: p.required_text("DBProxyName")?,
            new_db_proxy_name: p.text("NewDBProxyName"),
            require_tls: p.flag("RequireTLS"),
            idle_client_timeout: p.int("IdleClientTimeout"),
            debug_logging: p.flag("DebugLogging"),
            role_arn: p.text("RoleArn"),
            security_groups: p.list("SecurityGroups"),
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.modify_db_proxy(request, cancel)
    }
}

impl ToQuery for ModifyDBProxyInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.text("DBProxyName", &self.db_proxy_name)
            .opt_text("NewDBProxyName", &self.new_db_proxy_name)
            .opt_bool("RequireTLS", self.require_tls)
            .opt_int("IdleClientTimeout", self.idle_client_timeout)
            .opt_bool("DebugLogging", self.debug_logging)
            .opt_text("RoleArn", &self.role_arn)
            .list("SecurityGroups", "member", &self.security_groups);
    }
}

// ── DeleteDBProxy ───────────────────────────────────────────────────────

pub struct DeleteDBProxy;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteDBProxyInput {
    pub db_proxy_name: String,
}

impl Operation for DeleteDBProxy {
    type Request = DeleteDBProxyInput;
    type Response = DBProxyOutput;

    const ACTION: &'static str = "DeleteDBProxy";
    const FIELDS: &'static [FieldSpec] = &[FieldSpec::required("DBProxyName", FieldKind::Text)];
    const PROJECTION: Projection = Projection::Field("db_proxy");
    const MUTATING: bool = true;

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(DeleteDBProxyInput {
            db_proxy_name: p.required_text("DBProxyName")?,
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.delete_db_proxy(request, cancel)
    }
}

impl ToQuery for DeleteDBProxyInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.text("DBProxyName", &self.db_proxy_name);
    }
}

// ── DescribeDBProxies ───────────────────────────────────────────────────

pub struct DescribeDBProxies;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescribeDBProxiesInput {
    pub db_proxy_name: Option<String>,
    pub max_records: Option<i32>,
    pub marker: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescribeDBProxiesOutput {
    pub db_proxies: Vec<DBProxy>,
    pub marker: Option<String>,
}

impl Operation for DescribeDBProxies {
    type Request = DescribeDBProxiesInput;
    type Response = DescribeDBProxiesOutput;

    const ACTION: &'static str = "DescribeDBProxies";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("DBProxyName", FieldKind::Text),
        MAX_RECORDS,
        MARKER,
    ];
    const PROJECTION: Projection = Projection::Field("db_proxies");

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(DescribeDBProxiesInput {
            db_proxy_name: p.text("DBProxyName"),
            max_records: p.int("MaxRecords"),
            marker: p.text("Marker"),
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.describe_db_proxies(request, cancel)
    }
}

paginated!(DescribeDBProxies, DBProxy, db_proxies);

impl ToQuery for DescribeDBProxiesInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.opt_text("DBProxyName", &self.db_proxy_name)
            .opt_int("MaxRecords", self.max_records)
            .opt_text("Marker", &self.marker);
    }
}

impl FromQueryXml for DescribeDBProxiesOutput {
    fn from_query_xml(r: &str) -> Self {
        Self {
            db_proxies: parse_list(r, "DBProxies", "member", DBProxy::from_xml),
            marker: xml_text(r, "Marker"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modify_explicit_empty_security_groups_is_sent() {
        let req = ModifyDBProxyInput {
            db_proxy_name: "p1".into(),
            security_groups: Some(vec![]),
            idle_client_timeout: Some(1800),
            ..Default::default()
        };
        let mut w = QueryWriter::new(ModifyDBProxy::ACTION);
        req.write_query(&mut w);
        assert_eq!(w.get("SecurityGroups"), Some(""));
        assert_eq!(w.get("IdleClientTimeout"), Some("1800"));
        assert_eq!(w.get("RequireTLS"), None);
    }

    #[test]
    fn describe_from_xml() {
        let xml = r#"<DescribeDBProxiesResult>
            <DBProxies>
              <member>
                <DBProxyName>p1</DBProxyName>
                <EngineFamily>POSTGRESQL</EngineFamily>
                <VpcSubnetIds><member>subnet-a</member></VpcSubnetIds>
              </member>
            </DBProxies>
            <Marker>m-2</Marker>
          </DescribeDBProxiesResult>"#;
        let out = DescribeDBProxiesOutput::from_query_xml(xml);
        assert_eq!(out.db_proxies.len(), 1);
        assert_eq!(out.db_proxies[0].engine_family.as_deref(), Some("POSTGRESQL"));
        assert_eq!(out.db_proxies[0].vpc_subnet_ids, vec!["subnet-a"]);
        assert_eq!(out.marker.as_deref(), Some("m-2"));
    }
}
