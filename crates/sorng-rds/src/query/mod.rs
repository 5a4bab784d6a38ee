//! AWS Query protocol transport.
//!
//! Requests are flattened into form parameters (`Action`, `Version`, then the
//! operation's fields, lists as `Name.member.N`), posted through a
//! [`QueryExchange`], and the `<{Action}Result>` element of the XML reply is
//! decoded into the operation's response record.

pub mod client;
pub mod xml;

use crate::error::RdsResult;
use crate::operation::Operation;
use crate::transport::transport_via;
use crate::types::Tag;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// RDS API version sent with every request.
pub const API_VERSION: &str = "2014-10-31";

/// Form parameters of one Query request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryWriter {
    params: BTreeMap<String, String>,
}

impl QueryWriter {
    pub fn new(action: &str) -> Self {
        let mut params = BTreeMap::new();
        params.insert("Action".to_string(), action.to_string());
        params.insert("Version".to_string(), API_VERSION.to_string());
        Self { params }
    }

    pub fn text(&mut self, name: &str, value: &str) -> &mut Self {
        self.params.insert(name.to_string(), value.to_string());
        self
    }

    pub fn opt_text(&mut self, name: &str, value: &Option<String>) -> &mut Self {
        if let Some(v) = value {
            self.text(name, v);
        }
        self
    }

    pub fn opt_int(&mut self, name: &str, value: Option<i32>) -> &mut Self {
        if let Some(v) = value {
            self.text(name, &v.to_string());
        }
        self
    }

    pub fn opt_long(&mut self, name: &str, value: Option<i64>) -> &mut Self {
        if let Some(v) = value {
            self.text(name, &v.to_string());
        }
        self
    }

    pub fn opt_bool(&mut self, name: &str, value: Option<bool>) -> &mut Self {
        if let Some(v) = value {
            self.text(name, if v { "true" } else { "false" });
        }
        self
    }

    /// `name.member.1`, `name.member.2`, … An explicit empty list is sent as
    /// a bare `name=`.
    pub fn list(&mut self, name: &str, member: &str, values: &Option<Vec<String>>) -> &mut Self {
        if let Some(values) = values {
            if values.is_empty() {
                self.text(name, "");
            }
            for (i, v) in values.iter().enumerate() {
                self.text(&format!("{}.{}.{}", name, member, i + 1), v);
            }
        }
        self
    }

    /// Like [`list`](Self::list) with each entry nested under `field`:
    /// `name.member.N.field`.
    pub fn list_of(
        &mut self,
        name: &str,
        member: &str,
        field: &str,
        values: &Option<Vec<String>>,
    ) -> &mut Self {
        if let Some(values) = values {
            if values.is_empty() {
                self.text(name, "");
            }
            for (i, v) in values.iter().enumerate() {
                self.text(&format!("{}.{}.{}.{}", name, member, i + 1, field), v);
            }
        }
        self
    }

    /// `name.Tag.N.Key` / `name.Tag.N.Value`.
    pub fn tags(&mut self, name: &str, tags: &Option<Vec<Tag>>) -> &mut Self {
        if let Some(tags) = tags {
            if tags.is_empty() {
                self.text(name, "");
            }
            for (i, tag) in tags.iter().enumerate() {
                self.text(&format!("{}.Tag.{}.Key", name, i + 1), &tag.key);
                self.text(&format!("{}.Tag.{}.Value", name, i + 1), &tag.value);
            }
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn into_params(self) -> BTreeMap<String, String> {
        self.params
    }
}

/// Encodes a request record as Query form parameters.
pub trait ToQuery {
    fn write_query(&self, w: &mut QueryWriter);
}

/// Decodes a response record from its `<{Action}Result>` element.
pub trait FromQueryXml: Sized {
    fn from_query_xml(result: &str) -> Self;
}

/// Posts encoded parameters and returns the raw XML body of a successful
/// reply. Failed replies are returned as service errors.
#[async_trait]
pub trait QueryExchange: Send + Sync {
    async fn post(
        &self,
        params: BTreeMap<String, String>,
        cancel: &CancellationToken,
    ) -> RdsResult<String>;
}

/// [`crate::RdsTransport`] speaking the Query protocol through an exchange.
#[derive(Clone)]
pub struct QueryTransport {
    exchange: Arc<dyn QueryExchange>,
}

impl QueryTransport {
    pub fn new(exchange: Arc<dyn QueryExchange>) -> Self {
        Self { exchange }
    }

    async fn round_trip<O>(
        &self,
        request: O::Request,
        cancel: &CancellationToken,
    ) -> RdsResult<O::Response>
    where
        O: Operation,
        O::Request: ToQuery,
        O::Response: FromQueryXml,
    {
        let mut w = QueryWriter::new(O::ACTION);
        request.write_query(&mut w);
        let params = w.into_params();
        log::debug!("{}: posting {} form parameter(s)", O::ACTION, params.len());

        let body = self.exchange.post(params, cancel).await?;
        let result = xml::result_block(&body, O::ACTION);
        Ok(O::Response::from_query_xml(&result))
    }
}

crate::ops::with_operations!(transport_via, QueryTransport, round_trip);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_basics() {
        let mut w = QueryWriter::new("ModifyDBCluster");
        w.text("DBClusterIdentifier", "c1")
            .opt_text("NewDBClusterIdentifier", &None)
            .opt_int("Port", Some(3306))
            .opt_bool("ApplyImmediately", Some(false));
        assert_eq!(w.get("Action"), Some("ModifyDBCluster"));
        assert_eq!(w.get("Version"), Some(API_VERSION));
        assert_eq!(w.get("Port"), Some("3306"));
        assert_eq!(w.get("ApplyImmediately"), Some("false"));
        assert_eq!(w.get("NewDBClusterIdentifier"), None);
    }

    #[test]
    fn writer_lists() {
        let mut w = QueryWriter::new("X");
        w.list(
            "VpcSecurityGroupIds",
            "VpcSecurityGroupId",
            &Some(vec!["sg-1".into(), "sg-2".into()]),
        )
        .list("TagKeys", "member", &Some(vec![]))
        .list_of("Parameters", "Parameter", "ParameterName", &Some(vec!["max_connections".into()]));
        assert_eq!(w.get("VpcSecurityGroupIds.VpcSecurityGroupId.2"), Some("sg-2"));
        assert_eq!(w.get("TagKeys"), Some(""));
        assert_eq!(w.get("Parameters.Parameter.1.ParameterName"), Some("max_connections"));
    }

    #[test]
    fn writer_tags() {
        let mut w = QueryWriter::new("AddTagsToResource");
        w.tags("Tags", &Some(vec![Tag::new("env", "prod"), Tag::new("team", "db")]));
        assert_eq!(w.get("Tags.Tag.1.Key"), Some("env"));
        assert_eq!(w.get("Tags.Tag.2.Value"), Some("db"));
        let mut w = QueryWriter::new("X");
        w.tags("Tags", &None);
        assert_eq!(w.into_params().len(), 2);
    }
}
