//! Client configuration and region handling.
//!
//! Configuration is layered: [`RdsConfig::default`], then a YAML file
//! ([`RdsConfig::from_file`]), then environment variables
//! ([`RdsConfig::apply_env`]). Call [`RdsConfig::validate`] before building a
//! transport from it.

use crate::error::{RdsError, RdsResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ── Regions ─────────────────────────────────────────────────────────────

/// Regions where RDS is offered.
pub const AWS_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "af-south-1",
    "ap-east-1",
    "ap-south-1",
    "ap-south-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "ap-southeast-4",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ca-central-1",
    "ca-west-1",
    "eu-central-1",
    "eu-central-2",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-south-1",
    "eu-south-2",
    "eu-north-1",
    "il-central-1",
    "me-south-1",
    "me-central-1",
    "sa-east-1",
    // GovCloud
    "us-gov-east-1",
    "us-gov-west-1",
    // China
    "cn-north-1",
    "cn-northwest-1",
];

/// AWS region configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct AwsRegion {
    /// Region code (e.g., "us-east-1").
    pub name: String,
}

impl AwsRegion {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Regional RDS endpoint: `https://rds.{region}.{dns_suffix}`.
    pub fn endpoint(&self) -> String {
        format!("https://{}.{}.{}", crate::SERVICE, self.name, self.dns_suffix())
    }

    pub fn is_valid(&self) -> bool {
        AWS_REGIONS.contains(&self.name.as_str())
    }

    /// Return the partition for this region (aws, aws-cn, aws-us-gov).
    pub fn partition(&self) -> &str {
        if self.name.starts_with("cn-") {
            "aws-cn"
        } else if self.name.starts_with("us-gov-") {
            "aws-us-gov"
        } else {
            "aws"
        }
    }

    /// DNS suffix of the region's partition.
    pub fn dns_suffix(&self) -> &'static str {
        match self.partition() {
            "aws-cn" => "amazonaws.com.cn",
            _ => "amazonaws.com",
        }
    }
}

impl Default for AwsRegion {
    fn default() -> Self {
        Self {
            name: "us-east-1".to_string(),
        }
    }
}

// ── Client configuration ────────────────────────────────────────────────

/// Settings shared by the service front-end and the Query transport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RdsConfig {
    pub region: AwsRegion,
    /// Endpoint override (emulators, signing proxies, VPC endpoints).
    pub endpoint_url: Option<String>,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Appended to the User-Agent header.
    pub app_name: Option<String>,
    /// Ask the confirmer before running mutating commands without `force`.
    pub require_confirmation: bool,
}

impl Default for RdsConfig {
    fn default() -> Self {
        Self {
            region: AwsRegion::default(),
            endpoint_url: None,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            app_name: Some("SortOfRemoteNG".to_string()),
            require_confirmation: false,
        }
    }
}

impl RdsConfig {
    /// Defaults overlaid with environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Parse a YAML document. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> RdsResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| RdsError::Config(format!("invalid YAML: {}", e)))
    }

    /// Load a YAML config file.
    pub fn from_file(path: impl AsRef<Path>) -> RdsResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            RdsError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&text)
    }

    /// Overlay the standard AWS environment variables.
    ///
    /// `AWS_REGION` wins over `AWS_DEFAULT_REGION`; the service-specific
    /// `AWS_ENDPOINT_URL_RDS` wins over the global `AWS_ENDPOINT_URL`.
    pub fn apply_env(&mut self) {
        if let Some(region) = env_var("AWS_REGION").or_else(|| env_var("AWS_DEFAULT_REGION")) {
            self.region = AwsRegion::new(&region);
        }
        if let Some(url) = env_var("AWS_ENDPOINT_URL_RDS").or_else(|| env_var("AWS_ENDPOINT_URL")) {
            self.endpoint_url = Some(url);
        }
        if let Some(flag) = env_var("SORNG_RDS_REQUIRE_CONFIRMATION") {
            self.require_confirmation = matches!(flag.as_str(), "1" | "true" | "yes");
        }
    }

    /// The endpoint requests are posted to.
    pub fn endpoint(&self) -> String {
        match self.endpoint_url {
            Some(ref url) => url.clone(),
            None => self.region.endpoint(),
        }
    }

    pub fn user_agent(&self) -> String {
        match self.app_name {
            Some(ref app) => format!("{}/1.0 sorng-rds/{}", app, env!("CARGO_PKG_VERSION")),
            None => format!("sorng-rds/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn validate(&self) -> RdsResult<()> {
        if self.region.name.is_empty() {
            return Err(RdsError::Config("Region is required".to_string()));
        }
        if !self.region.is_valid() {
            log::warn!(
                "Region '{}' is not in the known region list; using it as given",
                self.region.name
            );
        }
        if let Some(ref url) = self.endpoint_url {
            let parsed = url::Url::parse(url)
                .map_err(|e| RdsError::Config(format!("invalid endpoint URL '{}': {}", url, e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(RdsError::Config(format!(
                    "endpoint URL '{}' must use http or https",
                    url
                )));
            }
        }
        if self.request_timeout_secs == 0 {
            return Err(RdsError::Config("request timeout must be positive".to_string()));
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
