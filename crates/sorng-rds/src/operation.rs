//! The per-operation contract driven by the generic mapper.

use crate::error::RdsResult;
use crate::params::{BoundParams, FieldSpec};
use crate::transport::RdsTransport;
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// What a command emits when the caller gives no selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// The whole response.
    Whole,
    /// One response field, named by its serialized key.
    Field(&'static str),
    /// Nothing; the operation has no meaningful output.
    Nothing,
}

/// One RDS API action.
///
/// Implementors are zero-sized marker types. Everything operation-specific
/// (field table, request building, the transport method to call, default
/// projection) hangs off the type, so one [`crate::Mapper`] serves them all.
pub trait Operation: Send + Sync + 'static {
    type Request: Serialize + Clone + Send + Sync + 'static;
    type Response: Serialize + DeserializeOwned + Default + Send + 'static;

    /// API action name, e.g. `DescribeDBClusters`.
    const ACTION: &'static str;
    const FIELDS: &'static [FieldSpec];
    const PROJECTION: Projection;
    /// Whether the action changes server-side state.
    const MUTATING: bool = false;
    /// Input field echoed by the legacy pass-thru switch.
    const PASS_THRU: Option<&'static str> = None;

    fn build(params: &BoundParams) -> RdsResult<Self::Request>;

    fn invoke<'a>(
        transport: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>>;
}

/// A list operation continued with a `Marker`.
pub trait Paginated: Operation {
    type Item: Serialize + Send + 'static;

    fn set_marker(request: &mut Self::Request, marker: Option<String>);
    fn marker(request: &Self::Request) -> Option<&str>;
    fn next_marker(response: &Self::Response) -> Option<&str>;
    fn into_items(response: Self::Response) -> Vec<Self::Item>;
}

/// How many pages a paginated call fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    /// Follow markers until the service returns none.
    Auto,
    /// Fetch exactly one page.
    Single,
}

impl PageMode {
    /// A caller-supplied marker or an explicit opt-out selects a single page.
    pub fn for_request<O: Paginated>(request: &O::Request, no_auto_iteration: bool) -> Self {
        if no_auto_iteration || O::marker(request).is_some() {
            Self::Single
        } else {
            Self::Auto
        }
    }
}

/// Implement [`Paginated`] for a list operation whose response carries
/// `marker` and an item vector.
macro_rules! paginated {
    ($op:ty, $item:ty, $items:ident) => {
        impl $crate::operation::Paginated for $op {
            type Item = $item;

            fn set_marker(request: &mut Self::Request, marker: Option<String>) {
                request.marker = marker;
            }

            fn marker(request: &Self::Request) -> Option<&str> {
                request.marker.as_deref()
            }

            fn next_marker(response: &Self::Response) -> Option<&str> {
                response.marker.as_deref()
            }

            fn into_items(response: Self::Response) -> Vec<Self::Item> {
                response.$items
            }
        }
    };
}
pub(crate) use paginated;
