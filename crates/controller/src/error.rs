//! Error type for the tray controller.

use std::sync::Arc;

use traybridge_binary::BinaryError;
use traybridge_process::ProcessError;
use traybridge_protocol::DecodeError;

/// Errors produced by [`SysTray`](crate::SysTray).
///
/// `Binary` errors are returned from construction. Everything else is
/// delivered to the error listeners as it happens, or returned from
/// [`SysTray::send_action`](crate::SysTray::send_action).
#[derive(Debug, Clone, thiserror::Error)]
pub enum TrayError {
    #[error(transparent)]
    Binary(Arc<BinaryError>),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("protocol error: {0}")]
    Decode(#[from] DecodeError),

    #[error("failed to encode message: {0}")]
    Encode(#[source] Arc<serde_json::Error>),
}

impl From<BinaryError> for TrayError {
    fn from(e: BinaryError) -> Self {
        TrayError::Binary(Arc::new(e))
    }
}

impl From<serde_json::Error> for TrayError {
    fn from(e: serde_json::Error) -> Self {
        TrayError::Encode(Arc::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_error_is_transparent() {
        let err = TrayError::from(BinaryError::UnsupportedPlatform {
            os: "plan9".into(),
            arch: "mips".into(),
        });
        assert_eq!(err.to_string(), "no tray renderer for platform plan9/mips");
    }

    #[test]
    fn decode_error_is_prefixed() {
        let err = TrayError::from(DecodeError::UnknownType {
            kind: "hover".into(),
        });
        assert!(err.to_string().starts_with("protocol error:"));
    }
}
