//! Aurora cluster snapshots.

use crate::error::RdsResult;
use crate::operation::{paginated, Operation, Projection};
use crate::params::{BoundParams, FieldKind, FieldSpec, MARKER, MAX_RECORDS};
use crate::query::xml::xml_text;
use crate::query::{FromQueryXml, QueryWriter, ToQuery};
use crate::transport::RdsTransport;
use crate::types::{parse_list, parse_one, DBClusterSnapshot, Tag};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

const SNAPSHOT_TYPES: &[&str] = &["automated", "manual", "shared", "public", "awsbackup"];

// ── CopyDBClusterSnapshot ───────────────────────────────────────────────

pub struct CopyDBClusterSnapshot;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CopyDBClusterSnapshotInput {
    pub source_db_cluster_snapshot_identifier: String,
    pub target_db_cluster_snapshot_identifier: String,
    pub kms_key_id: Option<String>,
    /// Presigned `CopyDBClusterSnapshot` URL for cross-region copies.
    pub pre_signed_url: Option<String>,
    pub copy_tags: Option<bool>,
    pub tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyDBClusterSnapshotOutput {
    pub db_cluster_snapshot: Option<DBClusterSnapshot>,
}

impl Operation for CopyDBClusterSnapshot {
    type Request = CopyDBClusterSnapshotInput;
    type Response = CopyDBClusterSnapshotOutput;

    const ACTION: &'static str = "CopyDBClusterSnapshot";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("SourceDBClusterSnapshotIdentifier", FieldKind::Text),
        FieldSpec::required("TargetDBClusterSnapshotIdentifier", FieldKind::Text),
        FieldSpec::optional("KmsKeyId", FieldKind::Text),
        FieldSpec::optional("PreSignedUrl", FieldKind::Text),
        FieldSpec::optional("CopyTags", FieldKind::Boolean),
        FieldSpec::optional("Tags", FieldKind::TagList),
    ];
    const PROJECTION: Projection = Projection::Field("db_cluster_snapshot");
    const MUTATING: bool = true;

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(CopyDBClusterSnapshotInput {
            source_db_cluster_snapshot_identifier: p
                .required_text("SourceDBClusterSnapshotIdentifier")?,
            target_db_cluster_snapshot_identifier: p
                .required_text("TargetDBClusterSnapshotIdentifier")?,
            kms_key_id: p.text("KmsKeyId"),
            pre_signed_url: p.text("PreSignedUrl"),
            copy_tags: p.flag("CopyTags"),
            tags: p.tags("Tags"),
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.copy_db_cluster_snapshot(request, cancel)
    }
}

impl ToQuery for CopyDBClusterSnapshotInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.text(
            "SourceDBClusterSnapshotIdentifier",
            &self.source_db_cluster_snapshot_identifier,
        )
        .text(
            "TargetDBClusterSnapshotIdentifier",
            &self.target_db_cluster_snapshot_identifier,
        )
        .opt_text("KmsKeyId", &self.kms_key_id)
        .opt_text("PreSignedUrl", &self.pre_signed_url)
        .opt_bool("CopyTags", self.copy_tags)
        .tags("Tags", &self.tags);
    }
}

impl FromQueryXml for CopyDBClusterSnapshotOutput {
    fn from_query_xml(r: &str) -> Self {
        Self {
            db_cluster_snapshot: parse_one(r, "DBClusterSnapshot", DBClusterSnapshot::from_xml),
        }
    }
}

// ── DescribeDBClusterSnapshots ──────────────────────────────────────────

pub struct DescribeDBClusterSnapshots;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescribeDBClusterSnapshotsInput {
    pub db_cluster_identifier: Option<String>,
    pub db_cluster_snapshot_identifier: Option<String>,
    pub snapshot_type: Option<String>,
    pub include_shared: Option<bool>,
    pub include_public: Option<bool>,
    pub max_records: Option<i32>,
    pub marker: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescribeDBClusterSnapshotsOutput {
    pub db_cluster_snapshots: Vec<DBClusterSnapshot>,
    pub marker: Option<String>,
}

impl Operation for DescribeDBClusterSnapshots {
    type Request = DescribeDBClusterSnapshotsInput;
    type Response = DescribeDBClusterSnapshotsOutput;

    const ACTION: &'static str = "DescribeDBClusterSnapshots";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("DBClusterIdentifier", FieldKind::Text),
        FieldSpec::optional("DBClusterSnapshotIdentifier", FieldKind::Text),
        FieldSpec::optional("SnapshotType", FieldKind::OneOf(SNAPSHOT_TYPES)),
        FieldSpec::optional("IncludeShared", FieldKind::Boolean),
        FieldSpec::optional("IncludePublic", FieldKind::Boolean),
        MAX_RECORDS,
        MARKER,
    ];
    const PROJECTION: Projection = Projection::Field("db_cluster_snapshots");

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(DescribeDBClusterSnapshotsInput {
            db_cluster_identifier: p.text("DBClusterIdentifier"),
            db_cluster_snapshot_identifier: p.text("DBClusterSnapshotIdentifier"),
            snapshot_type: p.text("SnapshotType"),
            include_shared: p.flag("IncludeShared"),
            include_public: p.flag("IncludePublic"),
            max_records: p.int("MaxRecords"),
            marker: p.text("Marker"),
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.describe_db_cluster_snapshots(request, cancel)
    }
}

paginated!(
    DescribeDBClusterSnapshots,
    DBClusterSnapshot,
    db_cluster_snapshots
);

impl ToQuery for DescribeDBClusterSnapshotsInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.opt_text("DBClusterIdentifier", &self.db_cluster_identifier)
            .opt_text("DBClusterSnapshotIdentifier", &self.db_cluster_snapshot_identifier)
            .opt_text("SnapshotType", &self.snapshot_type)
            .opt_bool("IncludeShared", self.include_shared)
            .opt_bool("IncludePublic", self.include_public)
            .opt_int("MaxRecords", self.max_records)
            .opt_text("Marker", &self.marker);
    }
}

impl FromQueryXml for DescribeDBClusterSnapshotsOutput {
    fn from_query_xml(r: &str) -> Self {
        Self {
            db_cluster_snapshots: parse_list(
                r,
                "DBClusterSnapshots",
                "DBClusterSnapshot",
                DBClusterSnapshot::from_xml,
            ),
            marker: xml_text(r, "Marker"),
        }
    }
}
