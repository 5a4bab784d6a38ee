//! Auto-pagination through the public command surface.

use futures::StreamExt;
use sorng_rds::ops::{
    DescribeDBClusterBacktracks, DescribeDBClusterBacktracksOutput, DescribeDBClusters,
    DescribeDBClustersOutput,
};
use sorng_rds::types::{DBCluster, DBClusterBacktrack};
use sorng_rds::{
    CancellationToken, Invocation, RdsConfig, RdsError, RdsService, ServiceError,
    SimulatedTransport,
};
use std::sync::Arc;

fn clusters(ids: &[&str], marker: Option<&str>) -> DescribeDBClustersOutput {
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

fn backtracks(ids: &[&str], marker: &str) -> DescribeDBClusterBacktracksOutput {
    DescribeDBClusterBacktracksOutput {
        db_cluster_backtracks: ids
            .iter()
            .map(|id| DBClusterBacktrack {
                db_cluster_identifier: "aurora-1".into(),
                backtrack_identifier: id.to_string(),
                ..Default::default()
            })
            .collect(),
        marker: Some(marker.to_string()),
    }
}

fn service(t: &Arc<SimulatedTransport>) -> RdsService {
    RdsService::new(t.clone(), RdsConfig::default())
}

fn identifiers(values: &[serde_json::Value]) -> Vec<&str> {
    values
        .iter()
        .filter_map(|v| v["db_cluster_identifier"].as_str())
        .collect()
}

async fn script_two_pages(t: &SimulatedTransport) {
    t.push_response::<DescribeDBClusters>(clusters(&["a", "b", "c"], Some("tok")))
        .await;
    t.push_response::<DescribeDBClusters>(clusters(&["d"], None)).await;
}

#[tokio::test]
async fn items_from_all_pages_in_order() {
    let t = SimulatedTransport::new();
    script_two_pages(&t).await;

    let values = service(&t)
        .invoke(&Invocation::new("DescribeDBClusters"))
        .unwrap()
        .collect()
        .await
        .unwrap();

    assert_eq!(identifiers(&values), vec!["a", "b", "c", "d"]);
    let calls = t.calls().await;
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].request["marker"], "tok");
}

#[tokio::test]
async fn one_call_per_page_until_marker_is_empty() {
    let t = SimulatedTransport::new();
    t.push_response::<DescribeDBClusters>(clusters(&["A"], Some("m1"))).await;
    t.push_response::<DescribeDBClusters>(clusters(&["B"], Some("m2"))).await;
    t.push_response::<DescribeDBClusters>(clusters(&["C"], Some("m3"))).await;
    t.push_response::<DescribeDBClusters>(clusters(&["D"], Some(""))).await;

    let values = service(&t)
        .invoke(&Invocation::new("DescribeDBClusters"))
        .unwrap()
        .collect()
        .await
        .unwrap();

    assert_eq!(identifiers(&values), vec!["A", "B", "C", "D"]);
    assert_eq!(t.total_calls().await, 4);
}

#[tokio::test]
async fn caller_marker_fetches_one_page() {
    let t = SimulatedTransport::new();
    t.push_response::<DescribeDBClusters>(clusters(&["d"], Some("next")))
        .await;

    let values = service(&t)
        .invoke(&Invocation::new("DescribeDBClusters").param("Marker", "tok"))
        .unwrap()
        .collect()
        .await
        .unwrap();

    assert_eq!(identifiers(&values), vec!["d"]);
    let calls = t.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].request["marker"], "tok");
}

#[tokio::test]
async fn empty_caller_marker_still_fetches_one_page() {
    let t = SimulatedTransport::new();
    script_two_pages(&t).await;

    let values = service(&t)
        .invoke(&Invocation::new("DescribeDBClusters").param("Marker", ""))
        .unwrap()
        .collect()
        .await
        .unwrap();

    assert_eq!(identifiers(&values), vec!["a", "b", "c"]);
    let calls = t.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].request["marker"], "");
}

#[tokio::test]
async fn no_auto_iteration_fetches_one_page() {
    let t = SimulatedTransport::new();
    script_two_pages(&t).await;

    let values = service(&t)
        .invoke(&Invocation::new("describe-db-clusters").no_auto_iteration())
        .unwrap()
        .collect()
        .await
        .unwrap();

    assert_eq!(identifiers(&values), vec!["a", "b", "c"]);
    assert_eq!(t.total_calls().await, 1);
    assert_eq!(t.pending("DescribeDBClusters").await, 1);
}

#[tokio::test]
async fn invocations_do_not_share_pagination_state() {
    let t = SimulatedTransport::new();
    script_two_pages(&t).await;
    script_two_pages(&t).await;
    let svc = service(&t);

    let first = svc
        .invoke(&Invocation::new("DescribeDBClusters"))
        .unwrap()
        .collect()
        .await
        .unwrap();
    let second = svc
        .invoke(&Invocation::new("DescribeDBClusters"))
        .unwrap()
        .collect()
        .await
        .unwrap();

    assert_eq!(first, second);
    let calls = t.calls().await;
    assert_eq!(calls.len(), 4);
    assert!(calls[2].request["marker"].is_null());
}

#[tokio::test]
async fn backtracks_follow_markers_until_empty() {
    let t = SimulatedTransport::new();
    t.push_response::<DescribeDBClusterBacktracks>(backtracks(&["b1", "b2"], "M1"))
        .await;
    t.push_response::<DescribeDBClusterBacktracks>(backtracks(&["b3", "b4"], "M2"))
        .await;
    t.push_response::<DescribeDBClusterBacktracks>(backtracks(&["b5"], ""))
        .await;

    let values = service(&t)
        .invoke(
            &Invocation::new("DescribeDBClusterBacktracks")
                .param("DBClusterIdentifier", "aurora-1")
                .param("MaxRecord", 2i64),
        )
        .unwrap()
        .collect()
        .await
        .unwrap();

    let ids: Vec<_> = values
        .iter()
        .filter_map(|v| v["backtrack_identifier"].as_str())
        .collect();
    assert_eq!(ids, vec!["b1", "b2", "b3", "b4", "b5"]);

    let calls = t.calls().await;
    assert_eq!(calls.len(), 3);
    for call in &calls {
        assert_eq!(call.request["db_cluster_identifier"], "aurora-1");
        assert_eq!(call.request["max_records"], 2);
    }
    assert_eq!(calls[1].request["marker"], "M1");
    assert_eq!(calls[2].request["marker"], "M2");
}

#[tokio::test]
async fn bad_selector_fails_before_first_page() {
    let t = SimulatedTransport::new();
    script_two_pages(&t).await;

    let err = service(&t)
        .invoke(&Invocation::new("DescribeDBClusters").select("NoSuchField"))
        .unwrap_err();

    assert!(matches!(err, RdsError::Selector { .. }));
    assert_eq!(t.total_calls().await, 0);
}

#[tokio::test]
async fn named_selector_is_fixed_across_pages() {
    let t = SimulatedTransport::new();
    t.push_response::<DescribeDBClusters>(clusters(&["a"], Some("m1"))).await;
    t.push_response::<DescribeDBClusters>(clusters(&["b"], None)).await;

    let values = service(&t)
        .invoke(&Invocation::new("DescribeDBClusters").select("Marker"))
        .unwrap()
        .collect()
        .await
        .unwrap();

    assert_eq!(values, vec![serde_json::json!("m1")]);
    assert_eq!(t.total_calls().await, 2);
}

#[tokio::test]
async fn select_all_emits_whole_pages() {
    let t = SimulatedTransport::new();
    script_two_pages(&t).await;

    let values = service(&t)
        .invoke(&Invocation::new("DescribeDBClusters").select("*"))
        .unwrap()
        .collect()
        .await
        .unwrap();

    assert_eq!(values.len(), 2);
    assert_eq!(values[0]["marker"], "tok");
    assert_eq!(values[1]["db_clusters"][0]["db_cluster_identifier"], "d");
    assert!(values[1]["marker"].is_null());
}

#[tokio::test]
async fn max_items_stops_paging() {
    let t = SimulatedTransport::new();
    script_two_pages(&t).await;

    let values = service(&t)
        .invoke(&Invocation::new("DescribeDBClusters").max_items(2))
        .unwrap()
        .collect()
        .await
        .unwrap();

    assert_eq!(identifiers(&values), vec!["a", "b"]);
    assert_eq!(t.total_calls().await, 1);
}

#[tokio::test]
async fn error_on_second_page_is_last_element() {
    let t = SimulatedTransport::new();
    t.push_response::<DescribeDBClusters>(clusters(&["a", "b"], Some("tok")))
        .await;
    t.push_error(
        "DescribeDBClusters",
        ServiceError::new("Throttling", "Rate exceeded", 400),
    )
    .await;

    let results: Vec<_> = service(&t)
        .invoke(&Invocation::new("DescribeDBClusters"))
        .unwrap()
        .into_stream()
        .collect()
        .await;

    assert_eq!(results.len(), 3);
    assert!(results[..2].iter().all(Result::is_ok));
    let err = results[2].as_ref().unwrap_err();
    let service_err = err.service_error().unwrap();
    assert_eq!(service_err.code, "Throttling");
    assert!(service_err.retryable);
    assert_eq!(t.total_calls().await, 2);
}

#[tokio::test]
async fn cancelled_token_stops_before_next_page() {
    let t = SimulatedTransport::new();
    script_two_pages(&t).await;
    let cancel = CancellationToken::new();

    let mut stream = service(&t)
        .invoke_with_cancel(&Invocation::new("DescribeDBClusters"), cancel.clone())
        .unwrap()
        .into_stream();

    for _ in 0..3 {
        assert!(stream.next().await.unwrap().is_ok());
    }
    cancel.cancel();
    assert!(matches!(
        stream.next().await,
        Some(Err(RdsError::Cancelled { .. }))
    ));
    assert!(stream.next().await.is_none());
    assert_eq!(t.total_calls().await, 1);
}
