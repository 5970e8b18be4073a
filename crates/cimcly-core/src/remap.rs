// ── Error remapping scope ──
//
// Every call into the api layer runs inside a `Remap`, which converts the
// api error taxonomy into `CoreError` with target and operation context and
// logs the failure before handing it back. Nothing is swallowed.

use std::future::Future;

use cimcly_api::Error as ApiError;
use tracing::warn;

use crate::error::{CoreError, INVALID_RESPONSE};

/// Scoped failure policy for one operation against one target.
#[derive(Debug, Clone, Copy)]
pub struct Remap<'a> {
    target: &'a str,
    operation: &'a str,
}

impl<'a> Remap<'a> {
    pub fn new(target: &'a str, operation: &'a str) -> Self {
        Self { target, operation }
    }

    /// Await `fut`, remapping (and logging) its error.
    pub async fn run<T, F>(self, fut: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        fut.await.map_err(|e| self.classify(e))
    }

    /// Translate one api error into the core taxonomy and log it.
    pub fn classify(&self, err: ApiError) -> CoreError {
        warn!(
            target_host = self.target,
            operation = self.operation,
            error = %err,
            "operation failed"
        );

        let target = self.target.to_owned();
        let operation = self.operation.to_owned();
        match err {
            ApiError::Timeout { timeout, .. } => CoreError::TransportTimeout {
                target,
                operation,
                timeout_secs: timeout.as_secs(),
            },
            ApiError::Connection { reason, .. } => CoreError::TransportConnection {
                target,
                operation,
                reason,
            },
            ApiError::Http(e) => CoreError::TransportConnection {
                target,
                operation,
                reason: e.to_string(),
            },
            ApiError::Tls(reason) => CoreError::TransportConnection {
                target,
                operation,
                reason: format!("TLS error: {reason}"),
            },
            ApiError::Protocol { code, description } => CoreError::Protocol {
                target,
                operation,
                code,
                description,
            },
            ApiError::MalformedResponse { message, .. } => CoreError::Protocol {
                target,
                operation,
                code: INVALID_RESPONSE.into(),
                description: message,
            },
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid address {target:?}: {e}"),
            },
            ApiError::Serialization(message) => CoreError::Validation { message },
            ApiError::NotAuthenticated => CoreError::NotAuthenticated,
            ApiError::InvalidState { action, state } => CoreError::Session {
                message: format!("cannot {action} while session is {state}"),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use cimcly_api::SessionState;

    use super::*;

    fn remap() -> Remap<'static> {
        Remap::new("10.0.0.10", "psus")
    }

    #[test]
    fn timeout_keeps_context() {
        let err = remap().classify(ApiError::Timeout {
            target: "10.0.0.10".into(),
            timeout: Duration::from_secs(30),
        });
        match &err {
            CoreError::TransportTimeout {
                target,
                operation,
                timeout_secs,
            } => {
                assert_eq!(target, "10.0.0.10");
                assert_eq!(operation, "psus");
                assert_eq!(*timeout_secs, 30);
            }
            other => panic!("expected TransportTimeout, got {other:?}"),
        }
        assert!(err.outcome_unknown());
    }

    #[test]
    fn protocol_error_passes_code_through() {
        let err = remap().classify(ApiError::Protocol {
            code: "552".into(),
            description: "Authorization required".into(),
        });
        assert!(matches!(err, CoreError::Protocol { ref code, .. } if code == "552"));
        assert!(!err.outcome_unknown());
    }

    #[test]
    fn malformed_response_is_invalid_response() {
        let err = remap().classify(ApiError::MalformedResponse {
            message: "unexpected end of input".into(),
            status: Some(502),
            body: String::new(),
        });
        assert!(matches!(err, CoreError::Protocol { ref code, .. } if code == INVALID_RESPONSE));
    }

    #[test]
    fn session_errors() {
        assert!(matches!(
            remap().classify(ApiError::NotAuthenticated),
            CoreError::NotAuthenticated
        ));
        assert!(matches!(
            remap().classify(ApiError::InvalidState {
                action: "log in",
                state: SessionState::LoggedOut,
            }),
            CoreError::Session { .. }
        ));
    }

    #[test]
    fn login_protocol_failure_is_authentication() {
        let err = Remap::new("10.0.0.10", "login").classify(ApiError::Protocol {
            code: "551".into(),
            description: "Authentication failed".into(),
        });
        assert!(err.is_authentication());
    }

    #[tokio::test]
    async fn run_passes_success_through() {
        let value = remap()
            .run(async { Ok::<_, ApiError>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);

        let err = remap()
            .run(async { Err::<(), _>(ApiError::NotAuthenticated) })
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotAuthenticated));
    }
}
