//! Command lookup by action name.

use crate::command::{Command, Paged, Unpaged};
use crate::error::{RdsError, RdsResult};
use crate::params::{normalize_name, FieldSpec};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Registered commands, keyed by normalized action name so that
/// `DescribeDBClusters`, `describe-db-clusters` and `describe_db_clusters`
/// all resolve to the same entry.
#[derive(Default, Clone)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Arc<dyn Command>>,
}

/// Metadata describing one command, as listed to callers.
#[derive(Debug, Clone, Serialize)]
pub struct CommandInfo {
    pub action: &'static str,
    pub mutating: bool,
    pub paginated: bool,
    pub pass_thru: Option<&'static str>,
    pub fields: &'static [FieldSpec],
}

macro_rules! register_all {
    ($registry:ident ; $( $method:ident => $op:ident as $kind:ident ),* $(,)?) => {
        $( $registry.register($kind::<$crate::ops::$op>::new()); )*
    };
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every supported RDS operation.
    pub fn rds() -> Self {
        let mut registry = Self::new();
        crate::ops::with_operations!(register_all, registry);
        log::debug!("registered {} RDS commands", registry.len());
        registry
    }

    /// Add a command, replacing any with the same action name.
    pub fn register(&mut self, command: impl Command + 'static) {
        let key = normalize_name(command.action());
        if self.commands.insert(key, Arc::new(command)).is_some() {
            log::warn!("command registered twice; keeping the latest");
        }
    }

    pub fn get(&self, name: &str) -> RdsResult<Arc<dyn Command>> {
        self.commands
            .get(&normalize_name(name))
            .cloned()
            .ok_or_else(|| RdsError::UnknownCommand(name.to_string()))
    }

    /// Action names in normalized-key order.
    pub fn actions(&self) -> Vec<&'static str> {
        self.commands.values().map(|c| c.action()).collect()
    }

    pub fn infos(&self) -> Vec<CommandInfo> {
        self.commands
            .values()
            .map(|c| CommandInfo {
                action: c.action(),
                mutating: c.is_mutating(),
                paginated: c.is_paginated(),
                pass_thru: c.pass_thru(),
                fields: c.fields(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rds_registry_is_complete() {
        let registry = CommandRegistry::rds();
        assert_eq!(registry.len(), 29);
        let paged = registry.infos().iter().filter(|i| i.paginated).count();
        assert_eq!(paged, 9);
    }

    #[test]
    fn lookup_ignores_spelling() {
        let registry = CommandRegistry::rds();
        for name in ["DescribeDBClusters", "describe-db-clusters", "describe_db_clusters"] {
            assert_eq!(registry.get(name).unwrap().action(), "DescribeDBClusters");
        }
    }

    #[test]
    fn unknown_command() {
        let err = CommandRegistry::rds().get("DescribeDBInstances").err().unwrap();
        assert!(matches!(err, RdsError::UnknownCommand(ref n) if n == "DescribeDBInstances"));
    }

    #[test]
    fn infos_mark_mutations() {
        let registry = CommandRegistry::rds();
        let infos = registry.infos();
        let delete = infos.iter().find(|i| i.action == "DeleteDBCluster").unwrap();
        assert!(delete.mutating);
        assert!(!delete.paginated);
        let tags = infos.iter().find(|i| i.action == "ListTagsForResource").unwrap();
        assert!(!tags.mutating);
    }
}
