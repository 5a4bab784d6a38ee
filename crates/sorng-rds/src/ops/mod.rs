//! RDS operations, one zero-sized type per API action.
//!
//! Each group file holds, per operation, the `<Op>Input` request record, the
//! `<Op>Output` response record, the [`crate::Operation`] impl and the Query
//! protocol encoding.

pub mod cluster;
pub mod cluster_parameter_group;
pub mod events;
pub mod global_cluster;
pub mod proxy;
pub mod snapshot;
pub mod tagging;

pub use cluster::*;
pub use cluster_parameter_group::*;
pub use events::*;
pub use global_cluster::*;
pub use proxy::*;
pub use snapshot::*;
pub use tagging::*;

/// The operation table: `transport_method => OperationType as CommandKind`.
///
/// Expands `$callback! { $($arg),* ; <table> }`; the transport trait, the
/// transport impls and the command registry are all generated from it.
macro_rules! with_operations {
    ($callback:ident $(, $arg:tt)*) => {
        $callback! {
            $($arg),* ;
            // Cluster parameter groups
            copy_db_cluster_parameter_group => CopyDBClusterParameterGroup as Unpaged,
            create_db_cluster_parameter_group => CreateDBClusterParameterGroup as Unpaged,
            delete_db_cluster_parameter_group => DeleteDBClusterParameterGroup as Unpaged,
            reset_db_cluster_parameter_group => ResetDBClusterParameterGroup as Unpaged,
            describe_db_cluster_parameter_groups => DescribeDBClusterParameterGroups as Paged,
            describe_db_cluster_parameters => DescribeDBClusterParameters as Paged,
            // Global clusters
            create_global_cluster => CreateGlobalCluster as Unpaged,
            modify_global_cluster => ModifyGlobalCluster as Unpaged,
            delete_global_cluster => DeleteGlobalCluster as Unpaged,
            remove_from_global_cluster => RemoveFromGlobalCluster as Unpaged,
            failover_global_cluster => FailoverGlobalCluster as Unpaged,
            describe_global_clusters => DescribeGlobalClusters as Paged,
            // Proxies
            modify_db_proxy => ModifyDBProxy as Unpaged,
            delete_db_proxy => DeleteDBProxy as Unpaged,
            describe_db_proxies => DescribeDBProxies as Paged,
            // Clusters
            modify_db_cluster => ModifyDBCluster as Unpaged,
            start_db_cluster => StartDBCluster as Unpaged,
            stop_db_cluster => StopDBCluster as Unpaged,
            failover_db_cluster => FailoverDBCluster as Unpaged,
            delete_db_cluster => DeleteDBCluster as Unpaged,
            backtrack_db_cluster => BacktrackDBCluster as Unpaged,
            describe_db_clusters => DescribeDBClusters as Paged,
            describe_db_cluster_backtracks => DescribeDBClusterBacktracks as Paged,
            // Cluster snapshots
            copy_db_cluster_snapshot => CopyDBClusterSnapshot as Unpaged,
            describe_db_cluster_snapshots => DescribeDBClusterSnapshots as Paged,
            // Tagging
            add_tags_to_resource => AddTagsToResource as Unpaged,
            remove_tags_from_resource => RemoveTagsFromResource as Unpaged,
            list_tags_for_resource => ListTagsForResource as Unpaged,
            // Events
            describe_events => DescribeEvents as Paged,
        }
    };
}
pub(crate) use with_operations;
