//! Service events.

use crate::error::RdsResult;
use crate::operation::{paginated, Operation, Projection};
use crate::params::{BoundParams, FieldKind, FieldSpec, MARKER, MAX_RECORDS};
use crate::query::xml::xml_text;
use crate::query::{FromQueryXml, QueryWriter, ToQuery};
use crate::transport::RdsTransport;
use crate::types::{parse_list, Event};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

const SOURCE_TYPES: &[&str] = &[
    "db-instance",
    "db-parameter-group",
    "db-security-group",
    "db-snapshot",
    "db-cluster",
    "db-cluster-snapshot",
    "custom-engine-version",
    "db-proxy",
    "blue-green-deployment",
];

pub struct DescribeEvents;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescribeEventsInput {
    pub source_identifier: Option<String>,
    pub source_type: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    /// Minutes of history to return.
    pub duration: Option<i32>,
    pub event_categories: Option<Vec<String>>,
    pub max_records: Option<i32>,
    pub marker: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescribeEventsOutput {
    pub events: Vec<Event>,
    pub marker: Option<String>,
}

impl Operation for DescribeEvents {
    type Request = DescribeEventsInput;
    type Response = DescribeEventsOutput;

    const ACTION: &'static str = "DescribeEvents";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("SourceIdentifier", FieldKind::Text),
        FieldSpec::optional("SourceType", FieldKind::OneOf(SOURCE_TYPES)),
        FieldSpec::optional("StartTime", FieldKind::Timestamp),
        FieldSpec::optional("EndTime", FieldKind::Timestamp),
        FieldSpec::optional("Duration", FieldKind::Integer),
        FieldSpec::optional("EventCategories", FieldKind::TextList).aliased(&["EventCategory"]),
        MAX_RECORDS,
        MARKER,
    ];
    const PROJECTION: Projection = Projection::Field("events");

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(DescribeEventsInput {
            source_identifier: p.text("SourceIdentifier"),
            source_type: p.text("SourceType"),
            start_time: p.text("StartTime"),
            end_time: p.text("EndTime"),
            duration: p.int("Duration"),
            event_categories: p.list("EventCategories"),
            max_records: p.int("MaxRecords"),
            marker: p.text("Marker"),
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.describe_events(request, cancel)
    }
}

paginated!(DescribeEvents, Event, events);

impl ToQuery for DescribeEventsInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.opt_text("SourceIdentifier", &self.source_identifier)
            .opt_text("SourceType", &self.source_type)
            .opt_text("StartTime", &self.start_time)
            .opt_text("EndTime", &self.end_time)
            .opt_int("Duration", self.duration)
            .list("EventCategories", "EventCategory", &self.event_categories)
            .opt_int("MaxRecords", self.max_records)
            .opt_text("Marker", &self.marker);
    }
}

impl FromQueryXml for DescribeEventsOutput {
    fn from_query_xml(r: &str) -> Self {
        Self {
            events: parse_list(r, "Events", "Event", Event::from_xml),
            marker: xml_text(r, "Marker"),
        }
    }
}
