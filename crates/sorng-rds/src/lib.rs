//! # sorng-rds – Amazon RDS command mappers
//!
//! Every RDS API operation supported here is one zero-sized type implementing
//! [`Operation`]. A single generic [`Mapper`] drives all of them: bind and
//! validate named parameters, build the request, call the injected
//! transport, and project the response. List operations additionally
//! implement [`Paginated`] and are streamed lazily, following the
//! continuation marker until the service stops returning one.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │  RdsService  (service.rs)                        │
//! │  ├── CommandRegistry  (registry.rs)              │
//! │  ├── Confirm  (mutating commands)                │
//! │  └── Arc<dyn RdsTransport>                       │
//! ├──────────────────────────────────────────────────┤
//! │  Command  (command.rs)                           │
//! │  bind → select → confirm → build → stream        │
//! │  ├── BoundParams  (params.rs)                    │
//! │  ├── Projector    (select.rs)                    │
//! │  └── Mapper<O>    (mapper.rs, pagination)        │
//! ├──────────────────────────────────────────────────┤
//! │  Operations  (ops/*.rs, one type per action)     │
//! ├──────────────────────────────────────────────────┤
//! │  RdsTransport  (transport.rs)                    │
//! │  ├── SimulatedTransport  (scripted, in-memory)   │
//! │  └── QueryTransport      (query/, AWS Query API) │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Group                     | Paginated                                  |
//! |---------------------------|--------------------------------------------|
//! | Cluster parameter groups  | DescribeDBClusterParameterGroups, DescribeDBClusterParameters |
//! | Global clusters           | DescribeGlobalClusters                     |
//! | Proxies                   | DescribeDBProxies                          |
//! | Clusters                  | DescribeDBClusters, DescribeDBClusterBacktracks |
//! | Cluster snapshots         | DescribeDBClusterSnapshots                 |
//! | Tagging                   | –                                          |
//! | Events                    | DescribeEvents                             |

/// Service name used in endpoints and error reports.
pub const SERVICE: &str = "rds";

// ── Sub-modules ─────────────────────────────────────────────────────────

pub mod error;
pub mod config;
pub mod types;
pub mod params;
pub mod select;
pub mod operation;
pub mod ops;
pub mod transport;
pub mod query;
pub mod mapper;
pub mod command;
pub mod registry;
pub mod service;

#[cfg(feature = "tauri-commands")]
pub mod commands;

// ── Re-exports for ergonomic access ─────────────────────────────────────

pub use command::{Command, CommandOutput, Invocation};
pub use config::{AwsRegion, RdsConfig};
pub use error::{RdsError, RdsResult, ServiceError};
pub use mapper::{Mapper, PageStream};
pub use operation::{Operation, PageMode, Paginated, Projection};
pub use params::{BoundParams, FieldKind, FieldSpec, ParamValue};
pub use query::client::{HttpExchange, NoSigning, RequestSigner};
pub use query::QueryTransport;
pub use registry::{CommandInfo, CommandRegistry};
pub use select::{Projector, Select};
pub use service::{AutoConfirm, Confirm, RdsService, RdsServiceState};
pub use transport::{RdsTransport, RecordedCall, SimulatedTransport};
pub use types::Tag;

#[cfg(feature = "tauri-commands")]
pub use commands::{invoke_rds_command, list_rds_commands};

pub use tokio_util::sync::CancellationToken;
