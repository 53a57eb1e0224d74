//! User-facing notifications.
//!
//! The console never renders anything itself; it hands [`Toast`]s to a
//! [`Notifier`] supplied by the host.

use serde::Serialize;

/// Toast severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Warning,
    Error,
}

/// A single notification shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Warning,
            message: message.into(),
        }
    }
}

/// Sink for toasts
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Notifier that only writes toasts to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, toast: Toast) {
        match toast.level {
            ToastLevel::Error => tracing::error!(message = %toast.message, "toast"),
            ToastLevel::Warning => tracing::warn!(message = %toast.message, "toast"),
            ToastLevel::Success => tracing::info!(message = %toast.message, "toast"),
        }
    }
}
