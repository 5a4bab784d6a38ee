//! Resource tagging. Resources are addressed by ARN.

use crate::error::RdsResult;
use crate::operation::{Operation, Projection};
use crate::params::{BoundParams, FieldKind, FieldSpec};
use crate::query::{FromQueryXml, QueryWriter, ToQuery};
use crate::transport::RdsTransport;
use crate::types::{parse_list, Tag};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

// ── AddTagsToResource ───────────────────────────────────────────────────

pub struct AddTagsToResource;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddTagsToResourceInput {
    pub resource_name: String,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddTagsToResourceOutput {}

impl Operation for AddTagsToResource {
    type Request = AddTagsToResourceInput;
    type Response = AddTagsToResourceOutput;

    const ACTION: &'static str = "AddTagsToResource";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("ResourceName", FieldKind::Text).aliased(&["ResourceArn"]),
        FieldSpec::required("Tags", FieldKind::TagList).aliased(&["Tag"]),
    ];
    const PROJECTION: Projection = Projection::Nothing;
    const MUTATING: bool = true;
    const PASS_THRU: Option<&'static str> = Some("ResourceName");

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(AddTagsToResourceInput {
            resource_name: p.required_text("ResourceName")?,
            tags: p.required_tags("Tags")?,
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.add_tags_to_resource(request, cancel)
    }
}

impl ToQuery for AddTagsToResourceInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.text("ResourceName", &self.resource_name)
            .tags("Tags", &Some(self.tags.clone()));
    }
}

impl FromQueryXml for AddTagsToResourceOutput {
    fn from_query_xml(_: &str) -> Self {
        Self {}
    }
}

// ── RemoveTagsFromResource ──────────────────────────────────────────────

pub struct RemoveTagsFromResource;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoveTagsFromResourceInput {
    pub resource_name: String,
    pub tag_keys: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoveTagsFromResourceOutput {}

impl Operation for RemoveTagsFromResource {
    type Request = RemoveTagsFromResourceInput;
    type Response = RemoveTagsFromResourceOutput;

    const ACTION: &'static str = "RemoveTagsFromResource";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("ResourceName", FieldKind::Text).aliased(&["ResourceArn"]),
        FieldSpec::required("TagKeys", FieldKind::TextList).aliased(&["TagKey"]),
    ];
    const PROJECTION: Projection = Projection::Nothing;
    const MUTATING: bool = true;
    const PASS_THRU: Option<&'static str> = Some("ResourceName");

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(RemoveTagsFromResourceInput {
            resource_name: p.required_text("ResourceName")?,
            tag_keys: p.required_list("TagKeys")?,
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.remove_tags_from_resource(request, cancel)
    }
}

impl ToQuery for RemoveTagsFromResourceInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.text("ResourceName", &self.resource_name)
            .list("TagKeys", "member", &Some(self.tag_keys.clone()));
    }
}

impl FromQueryXml for RemoveTagsFromResourceOutput {
    fn from_query_xml(_: &str) -> Self {
        Self {}
    }
}

// ── ListTagsForResource ─────────────────────────────────────────────────

pub struct ListTagsForResource;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListTagsForResourceInput {
    pub resource_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListTagsForResourceOutput {
    pub tag_list: Vec<Tag>,
}

impl Operation for ListTagsForResource {
    type Request = ListTagsForResourceInput;
    type Response = ListTagsForResourceOutput;

    const ACTION: &'static str = "ListTagsForResource";
    const FIELDS: &'static [FieldSpec] =
        &[FieldSpec::required("ResourceName", FieldKind::Text).aliased(&["ResourceArn"])];
    const PROJECTION: Projection = Projection::Field("tag_list");

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(ListTagsForResourceInput {
            resource_name: p.required_text("ResourceName")?,
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.list_tags_for_resource(request, cancel)
    }
}

impl ToQuery for ListTagsForResourceInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.text("ResourceName", &self.resource_name);
    }
}

impl FromQueryXml for ListTagsForResourceOutput {
    fn from_query_xml(r: &str) -> Self {
        Self {
            tag_list: parse_list(r, "TagList", "Tag", Tag::from_xml),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_tags_query() {
        let req = AddTagsToResourceInput {
            resource_name: "arn:aws:rds:us-east-1:123:cluster:c1".into(),
            tags: vec![Tag::new("env", "prod")],
        };
        let mut w = QueryWriter::new(AddTagsToResource::ACTION);
        req.write_query(&mut w);
        assert_eq!(w.get("Tags.Tag.1.Key"), Some("env"));
        assert_eq!(w.get("Tags.Tag.1.Value"), Some("prod"));
    }

    #[test]
    fn remove_tags_query() {
        let req = RemoveTagsFromResourceInput {
            resource_name: "arn".into(),
            tag_keys: vec!["env".into(), "team".into()],
        };
        let mut w = QueryWriter::new(RemoveTagsFromResource::ACTION);
        req.write_query(&mut w);
        assert_eq!(w.get("TagKeys.member.2"), Some("team"));
    }

    #[test]
    fn list_tags_from_xml() {
        let out = ListTagsForResourceOutput::from_query_xml(
            "<ListTagsForResourceResult><TagList><Tag><Key>env</Key><Value>prod</Value></Tag></TagList></ListTagsForResourceResult>",
        );
        assert_eq!(out.tag_list, vec![Tag::new("env", "prod")]);
    }
}
