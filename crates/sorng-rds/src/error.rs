//! Error types for RDS command mapping.
//!
//! Failures fall into three groups:
//!
//! * **validation**: the caller's parameters are wrong (missing required
//!   field, unknown parameter, bad value). Raised before any network call.
//! * **configuration**: the projection selector or the client setup is
//!   invalid. Also raised before any network call.
//! * **service**: the transport call failed. The original [`ServiceError`]
//!   is carried unchanged; this layer never retries.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned by the RDS service or by the transport that reached it.
///
/// Shape follows the AWS SDK error model: code, message, HTTP status and
/// request id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceError {
    /// The AWS error code (e.g., "DBClusterNotFoundFault").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// The HTTP status code returned by the API (0 when no response arrived).
    pub status_code: u16,
    /// AWS request ID for tracing.
    pub request_id: Option<String>,
    /// The service that returned the error.
    pub service: String,
    /// The API action that failed.
    pub action: Option<String>,
    /// Whether a transport-level retry could succeed.
    pub retryable: bool,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AWS {} error [{}]: {} (HTTP {})",
            self.service, self.code, self.message, self.status_code
        )?;
        if let Some(ref action) = self.action {
            write!(f, " [Action: {}]", action)?;
        }
        if let Some(ref req_id) = self.request_id {
            write!(f, " [RequestId: {}]", req_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ServiceError {}

impl ServiceError {
    pub fn new(code: &str, message: &str, status_code: u16) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            status_code,
            request_id: None,
            service: crate::SERVICE.to_string(),
            action: None,
            retryable: Self::is_retryable_code(code, status_code),
        }
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    pub fn with_action(mut self, action: &str) -> Self {
        self.action = Some(action.to_string());
        self
    }

    /// Whether the code/status is one a retrying transport would try again.
    fn is_retryable_code(code: &str, status_code: u16) -> bool {
        if matches!(status_code, 429 | 502 | 503 | 504) {
            return true;
        }
        matches!(
            code,
            "Throttling"
                | "ThrottlingException"
                | "RequestLimitExceeded"
                | "InternalFailure"
                | "ServiceUnavailable"
                | "RequestTimeout"
        )
    }

    /// Parse an AWS Query protocol error document.
    ///
    /// ```xml
    /// <ErrorResponse>
    ///   <Error>
    ///     <Code>DBClusterNotFoundFault</Code>
    ///     <Message>DBCluster c1 not found.</Message>
    ///   </Error>
    ///   <RequestId>abc-123</RequestId>
    /// </ErrorResponse>
    /// ```
    pub fn parse_xml_error(status_code: u16, body: &str) -> Self {
        let code = crate::query::xml::xml_text(body, "Code")
            .unwrap_or_else(|| "UnknownError".to_string());
        let message = crate::query::xml::xml_text(body, "Message")
            .unwrap_or_else(|| format!("HTTP {} from {}", status_code, crate::SERVICE));
        let request_id = crate::query::xml::xml_text(body, "RequestId")
            .or_else(|| crate::query::xml::xml_text(body, "RequestID"));

        let mut err = Self::new(&code, &message, status_code);
        err.request_id = request_id;
        err
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            code: "HttpError".to_string(),
            message: err.to_string(),
            status_code: err.status().map(|s| s.as_u16()).unwrap_or(0),
            request_id: None,
            service: "http".to_string(),
            action: None,
            retryable: err.is_timeout() || err.is_connect(),
        }
    }
}

/// Top-level error type for command mapping.
#[derive(Debug, Error)]
pub enum RdsError {
    /// A required field was not supplied. No network call was made.
    #[error("{operation}: missing required field '{field}'")]
    MissingRequiredField {
        operation: &'static str,
        field: &'static str,
    },

    /// A parameter name matches no field of the operation.
    #[error("{operation}: unknown parameter '{parameter}'")]
    UnknownParameter {
        operation: &'static str,
        parameter: String,
    },

    /// A parameter value has the wrong type or is out of range.
    #[error("{operation}: invalid value for '{parameter}': {reason}")]
    InvalidParameter {
        operation: &'static str,
        parameter: String,
        reason: String,
    },

    /// No command is registered under this name.
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// The projection selector cannot be applied to this operation.
    #[error("{operation}: {reason}")]
    Selector {
        operation: &'static str,
        reason: String,
    },

    /// A mutating command was declined at the confirmation step.
    #[error("{operation}: not confirmed for '{target}'")]
    NotConfirmed {
        operation: &'static str,
        target: String,
    },

    /// The invocation was cancelled before the next call was issued.
    #[error("{operation}: cancelled")]
    Cancelled { operation: &'static str },

    /// The transport call failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A response could not be converted for projection.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Client configuration is unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

impl RdsError {
    /// True for caller-fixable errors raised before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredField { .. }
                | Self::UnknownParameter { .. }
                | Self::InvalidParameter { .. }
                | Self::UnknownCommand(_)
                | Self::Selector { .. }
        )
    }

    /// The service error carried by this error, if any.
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            Self::Service(e) => Some(e),
            _ => None,
        }
    }

    /// Tag a service error with the action that produced it.
    pub(crate) fn for_action(self, action: &str) -> Self {
        match self {
            Self::Service(e) if e.action.is_none() => Self::Service(e.with_action(action)),
            other => other,
        }
    }
}

/// Convert RdsError to a Tauri-compatible String error.
impl From<RdsError> for String {
    fn from(err: RdsError) -> String {
        err.to_string()
    }
}

/// Convenience result type for RDS command mapping.
pub type RdsResult<T> = Result<T, RdsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_display() {
        let err = ServiceError::new("DBClusterNotFoundFault", "DBCluster c1 not found.", 404);
        let s = err.to_string();
        assert!(s.contains("rds"));
        assert!(s.contains("DBClusterNotFoundFault"));
        assert!(s.contains("404"));
    }

    #[test]
    fn service_error_display_with_request_id_and_action() {
        let err = ServiceError::new("InvalidParameterValue", "bad", 400)
            .with_request_id("req-abc-123")
            .with_action("DescribeDBClusters");
        let s = err.to_string();
        assert!(s.contains("req-abc-123"));
        assert!(s.contains("DescribeDBClusters"));
    }

    #[test]
    fn parse_xml_error_basic() {
        let xml = r#"<ErrorResponse><Error><Type>Sender</Type><Code>DBProxyNotFoundFault</Code><Message>Proxy p1 not found</Message></Error><RequestId>xyz-789</RequestId></ErrorResponse>"#;
        let err = ServiceError::parse_xml_error(404, xml);
        assert_eq!(err.code, "DBProxyNotFoundFault");
        assert_eq!(err.message, "Proxy p1 not found");
        assert_eq!(err.request_id.as_deref(), Some("xyz-789"));
        assert!(!err.retryable);
    }

    #[test]
    fn parse_xml_error_without_body() {
        let err = ServiceError::parse_xml_error(503, "");
        assert_eq!(err.code, "UnknownError");
        assert!(err.retryable);
    }

    #[test]
    fn throttling_is_retryable() {
        assert!(ServiceError::new("Throttling", "Rate exceeded", 400).retryable);
        assert!(!ServiceError::new("AccessDenied", "no", 403).retryable);
    }

    #[test]
    fn validation_classification() {
        let missing = RdsError::MissingRequiredField {
            operation: "StartDBCluster",
            field: "DBClusterIdentifier",
        };
        assert!(missing.is_validation());
        let service = RdsError::from(ServiceError::new("InternalFailure", "boom", 500));
        assert!(!service.is_validation());
        assert_eq!(service.service_error().map(|e| e.code.as_str()), Some("InternalFailure"));
    }

    #[test]
    fn for_action_tags_untagged_service_errors_only() {
        let err = RdsError::from(ServiceError::new("X", "y", 400)).for_action("StopDBCluster");
        assert_eq!(
            err.service_error().and_then(|e| e.action.as_deref()),
            Some("StopDBCluster")
        );
        let err = RdsError::from(ServiceError::new("X", "y", 400).with_action("First"))
            .for_action("Second");
        assert_eq!(err.service_error().and_then(|e| e.action.as_deref()), Some("First"));
    }

    #[test]
    fn into_string_for_tauri() {
        let s: String = RdsError::UnknownCommand("Nope".into()).into();
        assert!(s.contains("Nope"));
    }
}
