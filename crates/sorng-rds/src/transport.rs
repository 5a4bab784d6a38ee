//! Transport abstraction and the in-memory simulated transport.
//!
//! The mapper only ever talks to an [`RdsTransport`]: one async method per
//! operation, taking the request value and a cancellation token. Signing,
//! retries and connection reuse belong to implementations.

use crate::error::{RdsResult, ServiceError};
use crate::operation::Operation;
use crate::ops;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

macro_rules! declare_transport {
    (; $( $method:ident => $op:ident as $kind:ident ),* $(,)?) => {
        /// Client-side view of the RDS API, one method per operation.
        #[async_trait]
        pub trait RdsTransport: Send + Sync {
            $(
                #[doc = concat!("Call `", stringify!($op), "`.")]
                async fn $method(
                    &self,
                    request: <ops::$op as Operation>::Request,
                    cancel: &CancellationToken,
                ) -> RdsResult<<ops::$op as Operation>::Response>;
            )*
        }
    };
}

crate::ops::with_operations!(declare_transport);

/// Implement [`RdsTransport`] for `$ty` by routing every method through a
/// generic `self.$via::<Op>(request, cancel)`.
macro_rules! transport_via {
    ($ty:ty, $via:ident; $( $method:ident => $op:ident as $kind:ident ),* $(,)?) => {
        #[async_trait::async_trait]
        impl $crate::transport::RdsTransport for $ty {
            $(
                async fn $method(
                    &self,
                    request: <$crate::ops::$op as $crate::operation::Operation>::Request,
                    cancel: &tokio_util::sync::CancellationToken,
                ) -> $crate::error::RdsResult<
                    <$crate::ops::$op as $crate::operation::Operation>::Response,
                > {
                    self.$via::<$crate::ops::$op>(request, cancel).await
                }
            )*
        }
    };
}
pub(crate) use transport_via;

// ── Simulated transport ─────────────────────────────────────────────────

/// A call observed by [`SimulatedTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub action: &'static str,
    /// The request as JSON.
    pub request: Value,
}

/// In-memory transport answering from per-action scripts.
///
/// Responses are queued per action and consumed in order. Every call is
/// recorded, including those that fail.
#[derive(Default)]
pub struct SimulatedTransport {
    scripts: Mutex<HashMap<&'static str, VecDeque<Result<Value, ServiceError>>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl SimulatedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a typed response for `O`.
    pub async fn push_response<O: Operation>(&self, response: O::Response) {
        match serde_json::to_value(&response) {
            Ok(value) => self.push_json(O::ACTION, value).await,
            Err(e) => {
                log::error!("{}: cannot script response: {}", O::ACTION, e);
            }
        }
    }

    /// Queue a raw JSON response for `action`.
    pub async fn push_json(&self, action: &'static str, response: Value) {
        let mut scripts = self.scripts.lock().await;
        scripts.entry(action).or_default().push_back(Ok(response));
    }

    /// Queue a service failure for `action`.
    pub async fn push_error(&self, action: &'static str, error: ServiceError) {
        let mut scripts = self.scripts.lock().await;
        scripts.entry(action).or_default().push_back(Err(error));
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self, action: &str) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| c.action == action)
            .count()
    }

    pub async fn total_calls(&self) -> usize {
        self.calls.lock().await.len()
    }

    /// Responses still queued for `action`.
    pub async fn pending(&self, action: &str) -> usize {
        self.scripts
            .lock()
            .await
            .get(action)
            .map(VecDeque::len)
            .unwrap_or(0)
    }

    async fn dispatch<O: Operation>(
        &self,
        request: O::Request,
        _cancel: &CancellationToken,
    ) -> RdsResult<O::Response> {
        let recorded = serde_json::to_value(&request)?;
        self.calls.lock().await.push(RecordedCall {
            action: O::ACTION,
            request: recorded,
        });

        let next = self
            .scripts
            .lock()
            .await
            .get_mut(O::ACTION)
            .and_then(VecDeque::pop_front);

        match next {
            Some(Ok(value)) => Ok(serde_json::from_value(value)?),
            Some(Err(e)) => Err(e.into()),
            None => Err(ServiceError::new(
                "NoScriptedResponse",
                &format!("no scripted response for {}", O::ACTION),
                0,
            )
            .into()),
        }
    }
}

crate::ops::with_operations!(transport_via, SimulatedTransport, dispatch);
