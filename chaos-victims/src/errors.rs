use std::io::{self, ErrorKind};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Backing errors for all provisioning and state operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("authentication failed ({message})")]
    Authentication { message: String },
    #[error("quota exceeded or throttled ({message})")]
    Throttling { message: String },
    #[error("network failure ({message})")]
    Network { message: String },
    #[error("not found ({message})")]
    NotFound { message: String },
    #[error("failed API ({message})")]
    API { message: String, is_retryable: bool },
    #[error("failed for other reasons ({message})")]
    Other { message: String, is_retryable: bool },
}

impl Error {
    /// Returns the error message in "String".
    #[inline]
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Error::Authentication { message }
            | Error::Throttling { message }
            | Error::Network { message }
            | Error::NotFound { message }
            | Error::API { message, .. }
            | Error::Other { message, .. } => message.clone(),
        }
    }

    /// Returns if the error is retryable.
    /// Nothing in this crate retries, the caller decides.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Throttling { .. } | Error::Network { .. } => true,
            Error::Authentication { .. } | Error::NotFound { .. } => false,
            Error::API { is_retryable, .. } | Error::Other { is_retryable, .. } => *is_retryable,
        }
    }

    /// Maps a provider error code (e.g., EC2 "AuthFailure") to an error.
    pub fn classify_code(code: Option<&str>, message: String) -> Self {
        let code = match code {
            Some(c) => c,
            None => {
                return Error::API {
                    message,
                    is_retryable: false,
                }
            }
        };

        match code {
            "AuthFailure"
            | "UnauthorizedOperation"
            | "InvalidClientTokenId"
            | "SignatureDoesNotMatch"
            | "OptInRequired"
            | "Blocked" => Error::Authentication { message },

            "RequestLimitExceeded"
            | "Throttling"
            | "InstanceLimitExceeded"
            | "InsufficientInstanceCapacity"
            | "VcpuLimitExceeded"
            | "MaxSpotInstanceCountExceeded" => Error::Throttling { message },

            c if c.ends_with(".NotFound") => Error::NotFound { message },

            c => Error::API {
                message,
                is_retryable: c == "InternalError" || c == "ServiceUnavailable",
            },
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            ErrorKind::NotFound => Error::NotFound {
                message: e.to_string(),
            },
            _ => Error::Other {
                message: e.to_string(),
                is_retryable: false,
            },
        }
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> Self {
        let kind = match e {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Authentication { .. } => ErrorKind::PermissionDenied,
            Error::Network { .. } => ErrorKind::TimedOut,
            _ => ErrorKind::Other,
        };
        io::Error::new(kind, e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_code() {
        let e = Error::classify_code(Some("AuthFailure"), "bad key".to_string());
        assert!(matches!(e, Error::Authentication { .. }));
        assert!(!e.is_retryable());
        assert_eq!(e.message(), "bad key");

        let e = Error::classify_code(Some("InstanceLimitExceeded"), String::new());
        assert!(matches!(e, Error::Throttling { .. }));
        assert!(e.is_retryable());

        let e = Error::classify_code(Some("InvalidInstanceID.NotFound"), String::new());
        assert!(matches!(e, Error::NotFound { .. }));

        let e = Error::classify_code(Some("InvalidParameterValue"), String::new());
        assert!(matches!(
            e,
            Error::API {
                is_retryable: false,
                ..
            }
        ));

        let e = Error::classify_code(Some("ServiceUnavailable"), String::new());
        assert!(e.is_retryable());

        let e = Error::classify_code(None, "no code".to_string());
        assert!(matches!(e, Error::API { .. }));
    }

    #[test]
    fn test_io_conversions() {
        let e: Error = io::Error::new(ErrorKind::NotFound, "gone").into();
        assert!(matches!(e, Error::NotFound { .. }));

        let e: Error = io::Error::new(ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(e, Error::Other { .. }));

        let e: io::Error = Error::Authentication {
            message: "expired".to_string(),
        }
        .into();
        assert_eq!(e.kind(), ErrorKind::PermissionDenied);

        let e: io::Error = Error::NotFound {
            message: "state".to_string(),
        }
        .into();
        assert_eq!(e.kind(), ErrorKind::NotFound);
    }
}
