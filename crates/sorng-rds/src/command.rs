//! Caller-facing command layer.
//!
//! An [`Invocation`] names a command and carries loosely typed parameters
//! plus the output options. Running it goes through the same steps for every
//! operation:
//!
//! 1. bind and validate parameters (no network on failure)
//! 2. resolve the selector into a projector (no network on failure)
//! 3. confirm, for mutating operations when required
//! 4. build the request
//! 5. return a lazy stream; calls happen as it is consumed

use crate::config::RdsConfig;
use crate::error::{RdsError, RdsResult};
use crate::mapper::Mapper;
use crate::operation::{Operation, PageMode, Paginated};
use crate::params::{BoundParams, FieldSpec, ParamValue};
use crate::select::Projector;
use crate::service::Confirm;
use crate::transport::RdsTransport;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// One request to run a command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Invocation {
    /// Action name in any spelling, e.g. `describe-db-clusters`.
    pub command: String,
    pub parameters: BTreeMap<String, ParamValue>,
    /// `*`, a response field name, or `^Parameter`.
    pub select: Option<String>,
    /// Legacy switch echoing the operation's pass-thru parameter.
    pub pass_thru: bool,
    /// Skip the confirmation step.
    pub force: bool,
    /// Fetch a single page only.
    pub no_auto_iteration: bool,
    /// Stop after this many emitted values.
    pub max_items: Option<usize>,
}

impl Invocation {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Default::default()
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn select(mut self, selector: impl Into<String>) -> Self {
        self.select = Some(selector.into());
        self
    }

    pub fn pass_thru(mut self) -> Self {
        self.pass_thru = true;
        self
    }

    pub fn force(mut self) -> Self {
        self.force = true;
        self
    }

    pub fn no_auto_iteration(mut self) -> Self {
        self.no_auto_iteration = true;
        self
    }

    pub fn max_items(mut self, n: usize) -> Self {
        self.max_items = Some(n);
        self
    }
}

/// Collaborators a command runs with.
pub struct RunContext<'a> {
    pub transport: Arc<dyn RdsTransport>,
    pub config: &'a RdsConfig,
    pub confirm: &'a dyn Confirm,
    pub cancel: CancellationToken,
}

/// An operation behind a uniform, object-safe interface.
pub trait Command: Send + Sync {
    fn action(&self) -> &'static str;
    fn fields(&self) -> &'static [FieldSpec];
    fn is_mutating(&self) -> bool;
    fn is_paginated(&self) -> bool;
    fn pass_thru(&self) -> Option<&'static str>;
    fn run(&self, ctx: RunContext<'_>, invocation: &Invocation) -> RdsResult<CommandOutput>;
}

/// Command for a single-call operation.
pub struct Unpaged<O>(PhantomData<fn() -> O>);

impl<O: Operation> Unpaged<O> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<O: Operation> Default for Unpaged<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Operation> Command for Unpaged<O> {
    fn action(&self) -> &'static str {
        O::ACTION
    }

    fn fields(&self) -> &'static [FieldSpec] {
        O::FIELDS
    }

    fn is_mutating(&self) -> bool {
        O::MUTATING
    }

    fn is_paginated(&self) -> bool {
        false
    }

    fn pass_thru(&self) -> Option<&'static str> {
        O::PASS_THRU
    }

    fn run(&self, ctx: RunContext<'_>, invocation: &Invocation) -> RdsResult<CommandOutput> {
        let (projector, request) = prepare::<O>(&ctx, invocation)?;
        let mapper = Mapper::<O>::new(ctx.transport);
        let cancel = ctx.cancel;

        let values = stream::once(async move {
            let response = mapper.call(request, &cancel).await?;
            projector.project(&response)
        })
        .map_ok(|values| stream::iter(values.into_iter().map(Ok::<_, RdsError>)))
        .try_flatten()
        .boxed();

        Ok(CommandOutput::new(O::ACTION, values, invocation.max_items))
    }
}

/// Command for a marker-paginated list operation.
pub struct Paged<O>(PhantomData<fn() -> O>);

impl<O: Paginated> Paged<O> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<O: Paginated> Default for Paged<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Paginated> Command for Paged<O> {
    fn action(&self) -> &'static str {
        O::ACTION
    }

    fn fields(&self) -> &'static [FieldSpec] {
        O::FIELDS
    }

    fn is_mutating(&self) -> bool {
        O::MUTATING
    }

    fn is_paginated(&self) -> bool {
        true
    }

    fn pass_thru(&self) -> Option<&'static str> {
        O::PASS_THRU
    }

    fn run(&self, ctx: RunContext<'_>, invocation: &Invocation) -> RdsResult<CommandOutput> {
        let (projector, request) = prepare::<O>(&ctx, invocation)?;
        let mode = PageMode::for_request::<O>(&request, invocation.no_auto_iteration);
        log::debug!("{}: {:?} pagination", O::ACTION, mode);

        let values = Mapper::<O>::new(ctx.transport)
            .pages(request, mode, ctx.cancel)
            .map(move |page| page.and_then(|p| projector.project(&p)))
            .map_ok(|values| stream::iter(values.into_iter().map(Ok::<_, RdsError>)))
            .try_flatten()
            .boxed();

        Ok(CommandOutput::new(O::ACTION, values, invocation.max_items))
    }
}

/// Everything that can fail before the first network call.
fn prepare<O: Operation>(
    ctx: &RunContext<'_>,
    invocation: &Invocation,
) -> RdsResult<(Projector, O::Request)> {
    let bound = BoundParams::bind(O::ACTION, O::FIELDS, &invocation.parameters)?;
    let projector =
        Projector::resolve::<O>(invocation.select.as_deref(), invocation.pass_thru, &bound)?;

    if O::MUTATING && ctx.config.require_confirmation && !invocation.force {
        let target = confirm_target::<O>(&bound);
        if !ctx.confirm.confirm(O::ACTION, &target) {
            log::info!("{} on '{}' declined", O::ACTION, target);
            return Err(RdsError::NotConfirmed {
                operation: O::ACTION,
                target,
            });
        }
    }

    let request = O::build(&bound)?;
    log::debug!("{}: request built", O::ACTION);
    Ok((projector, request))
}

/// The resource a mutating command acts on: the pass-thru parameter, or the
/// first required text field.
fn confirm_target<O: Operation>(bound: &BoundParams) -> String {
    O::PASS_THRU
        .into_iter()
        .chain(O::FIELDS.iter().filter(|f| f.required).map(|f| f.name))
        .find_map(|name| bound.text(name))
        .unwrap_or_else(|| O::ACTION.to_string())
}

/// Projected output of one invocation.
pub struct CommandOutput {
    id: Uuid,
    action: &'static str,
    values: BoxStream<'static, RdsResult<Value>>,
}

impl CommandOutput {
    pub fn new(
        action: &'static str,
        values: BoxStream<'static, RdsResult<Value>>,
        max_items: Option<usize>,
    ) -> Self {
        let values = match max_items {
            Some(n) => values.take(n).boxed(),
            None => values,
        };
        let id = Uuid::new_v4();
        log::debug!("{}: invocation {}", action, id);
        Self { id, action, values }
    }

    /// Invocation id, for correlating log lines and errors.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn action(&self) -> &'static str {
        self.action
    }

    /// The values as they arrive. An error is always the last element.
    pub fn into_stream(self) -> BoxStream<'static, RdsResult<Value>> {
        self.values
    }

    /// All values, or the first error. Values received before an error are
    /// discarded.
    pub async fn collect(self) -> RdsResult<Vec<Value>> {
        let (id, action) = (self.id, self.action);
        self.values.try_collect().await.map_err(|e| {
            log::error!("{} [{}] failed: {}", action, id, e);
            e
        })
    }
}

impl fmt::Debug for CommandOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandOutput")
            .field("id", &self.id)
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{DeleteDBCluster, DescribeDBClusters, StartDBCluster};

    #[test]
    fn invocation_builder() {
        let inv = Invocation::new("start-db-cluster")
            .param("DBClusterIdentifier", "c1")
            .select("^DBClusterIdentifier")
            .force()
            .max_items(3);
        assert_eq!(inv.parameters.len(), 1);
        assert!(inv.force);
        assert_eq!(inv.max_items, Some(3));
    }

    #[test]
    fn invocation_from_json() {
        let inv: Invocation = serde_json::from_str(
            r#"{"command":"DescribeDBClusters","parameters":{"MaxRecords":20},"no_auto_iteration":true}"#,
        )
        .unwrap();
        assert_eq!(inv.parameters["MaxRecords"], ParamValue::Int(20));
        assert!(inv.no_auto_iteration);
        assert!(!inv.pass_thru);
    }

    #[test]
    fn command_metadata() {
        let c: Box<dyn Command> = Box::new(Paged::<DescribeDBClusters>::new());
        assert!(c.is_paginated());
        assert!(!c.is_mutating());
        let c: Box<dyn Command> = Box::new(Unpaged::<StartDBCluster>::new());
        assert!(c.is_mutating());
        assert_eq!(c.action(), "StartDBCluster");
    }

    #[test]
    fn confirm_target_prefers_identifier() {
        let raw = BTreeMap::from([
            ("DBClusterIdentifier".to_string(), ParamValue::from("c1")),
            ("SkipFinalSnapshot".to_string(), ParamValue::from(true)),
        ]);
        let bound =
            BoundParams::bind(DeleteDBCluster::ACTION, DeleteDBCluster::FIELDS, &raw).unwrap();
        assert_eq!(confirm_target::<DeleteDBCluster>(&bound), "c1");
    }
}
