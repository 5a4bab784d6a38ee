//! Service façade: configuration, transport, command registry and the
//! confirmation hook, behind one shareable handle.

use crate::command::{CommandOutput, Invocation, RunContext};
use crate::config::RdsConfig;
use crate::error::RdsResult;
use crate::mapper::Mapper;
use crate::operation::Operation;
use crate::query::client::{HttpExchange, RequestSigner};
use crate::query::QueryTransport;
use crate::registry::{CommandInfo, CommandRegistry};
use crate::transport::RdsTransport;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Asks whether a mutating command may proceed.
#[cfg_attr(test, mockall::automock)]
pub trait Confirm: Send + Sync {
    /// `target` names the resource acted on.
    fn confirm(&self, action: &str, target: &str) -> bool;
}

/// Approves everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl Confirm for AutoConfirm {
    fn confirm(&self, _action: &str, _target: &str) -> bool {
        true
    }
}

/// Shared state handle, as managed by the host application.
pub type RdsServiceState = Arc<RdsService>;

pub struct RdsService {
    transport: Arc<dyn RdsTransport>,
    registry: CommandRegistry,
    config: RdsConfig,
    confirm: Arc<dyn Confirm>,
}

impl RdsService {
    /// Service over an existing transport. Confirmation defaults to
    /// [`AutoConfirm`].
    pub fn new(transport: Arc<dyn RdsTransport>, config: RdsConfig) -> Self {
        Self {
            transport,
            registry: CommandRegistry::rds(),
            config,
            confirm: Arc::new(AutoConfirm),
        }
    }

    pub fn with_confirm(mut self, confirm: Arc<dyn Confirm>) -> Self {
        self.confirm = confirm;
        self
    }

    /// Service speaking the Query protocol over HTTPS to the configured
    /// endpoint.
    pub fn from_config(config: RdsConfig, signer: Arc<dyn RequestSigner>) -> RdsResult<Self> {
        config.validate()?;
        let exchange = HttpExchange::new(&config, signer)?;
        log::info!(
            "RDS service for region {} at {}",
            config.region.name,
            config.endpoint()
        );
        let transport = QueryTransport::new(Arc::new(exchange));
        Ok(Self::new(Arc::new(transport), config))
    }

    pub fn config(&self) -> &RdsConfig {
        &self.config
    }

    pub fn transport(&self) -> Arc<dyn RdsTransport> {
        Arc::clone(&self.transport)
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn commands(&self) -> Vec<CommandInfo> {
        self.registry.infos()
    }

    /// Typed access to one operation, bypassing the command layer.
    pub fn mapper<O: Operation>(&self) -> Mapper<O> {
        Mapper::new(self.transport())
    }

    pub fn invoke(&self, invocation: &Invocation) -> RdsResult<CommandOutput> {
        self.invoke_with_cancel(invocation, CancellationToken::new())
    }

    /// Run a command. Validation, selector and confirmation failures are
    /// returned here; service failures arrive through the output stream.
    pub fn invoke_with_cancel(
        &self,
        invocation: &Invocation,
        cancel: CancellationToken,
    ) -> RdsResult<CommandOutput> {
        let command = self.registry.get(&invocation.command)?;
        log::debug!("invoking {}", command.action());
        let ctx = RunContext {
            transport: self.transport(),
            config: &self.config,
            confirm: self.confirm.as_ref(),
            cancel,
        };
        command.run(ctx, invocation).map_err(|e| {
            log::warn!("{} rejected: {}", command.action(), e);
            e
        })
    }
}
