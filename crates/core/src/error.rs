// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tagged error type shared across transport, retry, recovery, and
//! degradation. Everything that crosses a component boundary in this
//! crate is an [`ArgoError`], never a raw string or a bare opaque error.

use std::fmt;

/// The closed set of error categories a caller can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Auth,
    Permission,
    Network,
    Timeout,
    Tls,
    /// Carries the HTTP status code for non-auth 4xx/5xx responses.
    Http(u16),
    Parse,
    Validation,
    Config,
    Unavailable,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "AUTH",
            Self::Permission => "PERMISSION",
            Self::Network => "NETWORK",
            Self::Timeout => "TIMEOUT",
            Self::Tls => "TLS",
            Self::Http(_) => "HTTP",
            Self::Parse => "PARSE",
            Self::Validation => "VALIDATION",
            Self::Config => "CONFIG",
            Self::Unavailable => "UNAVAILABLE",
            Self::Internal => "INTERNAL",
        }
    }

    /// Whether this kind is, in principle, worth retrying. C2's
    /// `shouldRetry` narrows this further (idempotency, attempt budget);
    /// this just rules out the categories that are never retryable.
    pub fn is_retryable_category(&self) -> bool {
        !matches!(self, Self::Auth | Self::Permission | Self::Config | Self::Validation)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(code) => write!(f, "HTTP_{code}"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Structured context attached by C4 to every operation error (§4.4, §7).
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    pub operation: Option<String>,
    pub server: Option<String>,
    pub app_name: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self { operation: Some(operation.into()), server: None, app_name: None }
    }

    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    pub fn with_app(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }
}

/// The tagged error propagated above C1 (§4.1, §7).
#[derive(Debug, Clone)]
pub struct ArgoError {
    pub kind: ErrorKind,
    pub message: String,
    pub recoverable: bool,
    pub user_action: Option<String>,
    pub context: ErrorContext,
}

impl ArgoError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let recoverable = kind.is_retryable_category();
        Self { kind, message: message.into(), recoverable, context: ErrorContext::default(), user_action: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.user_action = Some(hint.into());
        self
    }

    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = context;
        self
    }

    pub fn recoverable(mut self, recoverable: bool) -> Self {
        self.recoverable = recoverable;
        self
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Auth, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    pub fn tls(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Tls, message)
    }

    pub fn http(code: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Http(code), message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// §7 classification: does C5 treat this as retry-triggering?
    pub fn triggers_stream_recovery(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Network | ErrorKind::Timeout | ErrorKind::Http(_) | ErrorKind::Unavailable
        )
    }
}

impl fmt::Display for ArgoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(op) = &self.context.operation {
            write!(f, " (operation={op}")?;
            if let Some(app) = &self.context.app_name {
                write!(f, ", app={app}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl std::error::Error for ArgoError {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
