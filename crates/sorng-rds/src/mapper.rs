//! The generic command mapper and its pagination driver.
//!
//! ```text
//! marker := caller-supplied marker or none
//! loop:
//!     request.Marker = marker
//!     response = transport(request)      error → yield it, stop
//!     yield response
//!     marker = response.Marker
//! until single-page mode or marker is empty
//! ```
//!
//! Pages are fetched strictly one after another and only when the consumer
//! polls for more, so dropping or truncating the stream stops the loop.

use crate::error::{RdsError, RdsResult};
use crate::operation::{Operation, PageMode, Paginated};
use crate::params::{BoundParams, ParamValue};
use crate::transport::RdsTransport;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Lazy stream of pages or items.
pub type PageStream<T> = BoxStream<'static, RdsResult<T>>;

/// Drives one [`Operation`] against a transport.
pub struct Mapper<O: Operation> {
    transport: Arc<dyn RdsTransport>,
    _op: PhantomData<fn() -> O>,
}

impl<O: Operation> Clone for Mapper<O> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            _op: PhantomData,
        }
    }
}

impl<O: Operation> Mapper<O> {
    pub fn new(transport: Arc<dyn RdsTransport>) -> Self {
        Self {
            transport,
            _op: PhantomData,
        }
    }

    /// Bind `params` against the operation's fields and build its request.
    pub fn request(params: &BTreeMap<String, ParamValue>) -> RdsResult<O::Request> {
        let bound = BoundParams::bind(O::ACTION, O::FIELDS, params)?;
        O::build(&bound)
    }

    /// Issue exactly one call.
    pub async fn call(&self, request: O::Request, cancel: &CancellationToken) -> RdsResult<O::Response> {
        call_once::<O>(self.transport.as_ref(), request, cancel, 1).await
    }
}

impl<O: Paginated> Mapper<O> {
    /// Stream whole response pages.
    pub fn pages(
        &self,
        request: O::Request,
        mode: PageMode,
        cancel: CancellationToken,
    ) -> PageStream<O::Response> {
        let state = PageState::<O> {
            transport: Arc::clone(&self.transport),
            request,
            cursor: Cursor::Start,
            mode,
            cancel,
            page: 0,
        };

        stream::unfold(state, |mut state| async move {
            let mut request = state.request.clone();
            match std::mem::replace(&mut state.cursor, Cursor::Exhausted) {
                Cursor::Exhausted => return None,
                Cursor::Start => {}
                Cursor::Resume(marker) => O::set_marker(&mut request, Some(marker)),
            }
            state.page += 1;

            let result =
                call_once::<O>(state.transport.as_ref(), request, &state.cancel, state.page).await;
            if let Ok(ref response) = result {
                state.cursor = match (state.mode, O::next_marker(response)) {
                    (PageMode::Auto, Some(marker)) if !marker.is_empty() => {
                        Cursor::Resume(marker.to_string())
                    }
                    _ => {
                        log::debug!("{}: exhausted after {} page(s)", O::ACTION, state.page);
                        Cursor::Exhausted
                    }
                };
            }
            Some((result, state))
        })
        .boxed()
    }

    /// Stream the items of every page, in order.
    pub fn items(
        &self,
        request: O::Request,
        mode: PageMode,
        cancel: CancellationToken,
    ) -> PageStream<O::Item> {
        self.pages(request, mode, cancel)
            .map_ok(|page| {
                stream::iter(O::into_items(page).into_iter().map(Ok::<_, RdsError>))
            })
            .try_flatten()
            .boxed()
    }
}

enum Cursor {
    Start,
    Resume(String),
    Exhausted,
}

struct PageState<O: Operation> {
    transport: Arc<dyn RdsTransport>,
    /// Template for every page; only the marker changes.
    request: O::Request,
    cursor: Cursor,
    mode: PageMode,
    cancel: CancellationToken,
    page: usize,
}

async fn call_once<O: Operation>(
    transport: &dyn RdsTransport,
    request: O::Request,
    cancel: &CancellationToken,
    page: usize,
) -> RdsResult<O::Response> {
    if cancel.is_cancelled() {
        log::debug!("{}: cancelled before call {}", O::ACTION, page);
        return Err(RdsError::Cancelled {
            operation: O::ACTION,
        });
    }

    log::debug!("{}: calling transport (call {})", O::ACTION, page);
    match O::invoke(transport, request, cancel).await {
        Ok(response) => {
            log::debug!("{}: call {} succeeded", O::ACTION, page);
            Ok(response)
        }
        Err(e) => {
            let e = e.for_action(O::ACTION);
            log::warn!("{}: call {} failed: {}", O::ACTION, page, e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::ops::{
        DescribeDBClusters, DescribeDBClustersInput, DescribeDBClustersOutput, StopDBCluster,
        StopDBClusterInput,
    };
    use crate::transport::SimulatedTransport;
    use crate::types::DBCluster;

    fn page(ids: &[&str], marker: Option<&str>) -> DescribeDBClustersOutput {
        DescribeDBClustersOutput {
            db_clusters: ids
                .iter()
                .map(|id| DBCluster {
                    db_cluster_identifier: id.to_string(),
                    ..Default::default()
                })
                .collect(),
            marker: marker.map(str::to_string),
        }
    }

    fn ids(items: &[DBCluster]) -> Vec<&str> {
        items.iter().map(|c| c.db_cluster_identifier.as_str()).collect()
    }

    #[tokio::test]
    async fn follows_markers_until_empty() {
        let t = SimulatedTransport::new();
        t.push_response::<DescribeDBClusters>(page(&["a"], Some("m1"))).await;
        t.push_response::<DescribeDBClusters>(page(&[], Some("m2"))).await;
        t.push_response::<DescribeDBClusters>(page(&["b"], Some(""))).await;

        let mapper = Mapper::<DescribeDBClusters>::new(t.clone());
        let items: Vec<DBCluster> = mapper
            .items(DescribeDBClustersInput::default(), PageMode::Auto, CancellationToken::new())
            .try_collect()
            .await
            .unwrap();
        assert_eq!(ids(&items), vec!["a", "b"]);

        let calls = t.calls().await;
        assert_eq!(calls.len(), 3);
        assert!(calls[0].request["marker"].is_null());
        assert_eq!(calls[1].request["marker"], "m1");
        assert_eq!(calls[2].request["marker"], "m2");
    }

    #[tokio::test]
    async fn single_mode_fetches_one_page() {
        let t = SimulatedTransport::new();
        t.push_response::<DescribeDBClusters>(page(&["a"], Some("m1"))).await;
        t.push_response::<DescribeDBClusters>(page(&["b"], None)).await;

        let mapper = Mapper::<DescribeDBClusters>::new(t.clone());
        let pages: Vec<_> = mapper
            .pages(DescribeDBClustersInput::default(), PageMode::Single, CancellationToken::new())
            .try_collect()
            .await
            .unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].marker.as_deref(), Some("m1"));
        assert_eq!(t.total_calls().await, 1);
    }

    #[tokio::test]
    async fn error_ends_the_stream() {
        let t = SimulatedTransport::new();
        t.push_response::<DescribeDBClusters>(page(&["a"], Some("m1"))).await;
        t.push_error("DescribeDBClusters", ServiceError::new("Throttling", "slow down", 400))
            .await;
        t.push_response::<DescribeDBClusters>(page(&["b"], None)).await;

        let mapper = Mapper::<DescribeDBClusters>::new(t.clone());
        let results: Vec<_> = mapper
            .items(DescribeDBClustersInput::default(), PageMode::Auto, CancellationToken::new())
            .collect()
            .await;
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        let err = results[1].as_ref().unwrap_err();
        assert_eq!(
            err.service_error().and_then(|e| e.action.as_deref()),
            Some("DescribeDBClusters")
        );
        assert_eq!(t.total_calls().await, 2);
        assert_eq!(t.pending("DescribeDBClusters").await, 1);
    }

    #[tokio::test]
    async fn cancellation_is_checked_between_pages() {
        let t = SimulatedTransport::new();
        t.push_response::<DescribeDBClusters>(page(&["a"], Some("m1"))).await;
        t.push_response::<DescribeDBClusters>(page(&["b"], None)).await;

        let cancel = CancellationToken::new();
        let mapper = Mapper::<DescribeDBClusters>::new(t.clone());
        let mut pages = mapper.pages(DescribeDBClustersInput::default(), PageMode::Auto, cancel.clone());

        assert!(pages.next().await.unwrap().is_ok());
        cancel.cancel();
        let second = pages.next().await.unwrap();
        assert!(matches!(second, Err(RdsError::Cancelled { .. })));
        assert!(pages.next().await.is_none());
        assert_eq!(t.total_calls().await, 1);
    }

    #[tokio::test]
    async fn call_checks_cancellation_first() {
        let t = SimulatedTransport::new();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = Mapper::<StopDBCluster>::new(t.clone())
            .call(
                StopDBClusterInput {
                    db_cluster_identifier: "c1".into(),
                },
                &cancel,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RdsError::Cancelled { operation: "StopDBCluster" }));
        assert_eq!(t.total_calls().await, 0);
    }

    #[test]
    fn request_validates_before_building() {
        let params = BTreeMap::from([("MaxRecords".to_string(), ParamValue::from("x"))]);
        assert!(Mapper::<DescribeDBClusters>::request(&params).is_err());
        let params = BTreeMap::from([("MaxRecords".to_string(), ParamValue::from(20i64))]);
        assert_eq!(
            Mapper::<DescribeDBClusters>::request(&params).unwrap().max_records,
            Some(20)
        );
    }
}
