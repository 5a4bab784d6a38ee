//! HTTPS exchange for the Query protocol.
//!
//! Posts form-encoded parameters to the RDS endpoint and hands back the XML
//! body. Signing is delegated to a [`RequestSigner`] so credentials never
//! pass through this crate.

use super::QueryExchange;
use crate::config::RdsConfig;
use crate::error::{RdsError, RdsResult, ServiceError};
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Client;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// RFC 3986 unreserved characters stay literal; everything else is escaped.
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Adds authentication to an outgoing request, typically SigV4 headers.
pub trait RequestSigner: Send + Sync {
    /// `headers` already holds `host` and `content-type`; the signer may add
    /// to them.
    fn sign(
        &self,
        method: &str,
        url: &str,
        headers: &mut BTreeMap<String, String>,
        body: &str,
    ) -> RdsResult<()>;
}

/// Sends requests unsigned. For emulators and signing proxies.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSigning;

impl RequestSigner for NoSigning {
    fn sign(&self, _: &str, _: &str, _: &mut BTreeMap<String, String>, _: &str) -> RdsResult<()> {
        Ok(())
    }
}

pub struct HttpExchange {
    http: Client,
    endpoint: String,
    host: String,
    user_agent: String,
    signer: Arc<dyn RequestSigner>,
}

impl HttpExchange {
    pub fn new(config: &RdsConfig, signer: Arc<dyn RequestSigner>) -> RdsResult<Self> {
        let endpoint = config.endpoint();
        let url = url::Url::parse(&endpoint)
            .map_err(|e| RdsError::Config(format!("invalid endpoint '{}': {}", endpoint, e)))?;
        let host = match (url.host_str(), url.port()) {
            (Some(h), Some(p)) => format!("{}:{}", h, p),
            (Some(h), None) => h.to_string(),
            (None, _) => {
                return Err(RdsError::Config(format!("endpoint '{}' has no host", endpoint)))
            }
        };

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| RdsError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint,
            host,
            user_agent: config.user_agent(),
            signer,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl QueryExchange for HttpExchange {
    /// The token is checked by the caller before each call; a request
    /// already in flight runs to completion or timeout.
    async fn post(
        &self,
        params: BTreeMap<String, String>,
        _cancel: &CancellationToken,
    ) -> RdsResult<String> {
        let body = form_encode(&params);
        let mut headers = BTreeMap::new();
        headers.insert("host".to_string(), self.host.clone());
        headers.insert(
            "content-type".to_string(),
            "application/x-www-form-urlencoded; charset=utf-8".to_string(),
        );
        self.signer.sign("POST", &self.endpoint, &mut headers, &body)?;

        let mut req = self.http.post(&self.endpoint);
        for (key, value) in &headers {
            req = req.header(key.as_str(), value.as_str());
        }
        req = req.header("user-agent", &self.user_agent);

        let resp = req.body(body).send().await.map_err(ServiceError::from)?;
        let status = resp.status().as_u16();
        let request_id = resp
            .headers()
            .get("x-amzn-requestid")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = resp.text().await.map_err(ServiceError::from)?;

        if (200..300).contains(&status) {
            return Ok(text);
        }

        let mut err = ServiceError::parse_xml_error(status, &text);
        if err.request_id.is_none() {
            err.request_id = request_id;
        }
        log::debug!("HTTP {} from {}: {}", status, self.endpoint, err.code);
        Err(err.into())
    }
}

/// `application/x-www-form-urlencoded` body from sorted parameters.
pub(crate) fn form_encode(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, FORM_ENCODE_SET),
                utf8_percent_encode(v, FORM_ENCODE_SET)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
