//! Exit status of the renderer process.

use std::fmt;
use std::process::ExitStatus;

/// How the renderer exited. Either field may be absent: a process killed
/// by a signal has no code, and a status that could not be collected has
/// neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExitInfo {
    pub code: Option<i32>,
    pub signal: Option<i32>,
}

impl ExitInfo {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for ExitInfo {
    fn from(status: ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = {
            use std::os::unix::process::ExitStatusExt;
            status.signal()
        };
        #[cfg(not(unix))]
        let signal = None;

        Self {
            code: status.code(),
            signal,
        }
    }
}

impl fmt::Display for ExitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code, self.signal) {
            (Some(code), _) => write!(f, "exit code {code}"),
            (None, Some(signal)) => write!(f, "signal {signal}"),
            (None, None) => write!(f, "unknown status"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_variants() {
        let code = ExitInfo {
            code: Some(3),
            signal: None,
        };
        let signal = ExitInfo {
            code: None,
            signal: Some(9),
        };
        assert_eq!(code.to_string(), "exit code 3");
        assert_eq!(signal.to_string(), "signal 9");
        assert_eq!(ExitInfo::default().to_string(), "unknown status");
    }

    #[test]
    fn success_only_on_zero() {
        assert!(
            ExitInfo {
                code: Some(0),
                signal: None
            }
            .success()
        );
        assert!(!ExitInfo::default().success());
    }

    #[cfg(unix)]
    #[test]
    fn from_raw_signal_status() {
        use std::os::unix::process::ExitStatusExt;
        let info = ExitInfo::from(ExitStatus::from_raw(9));
        assert_eq!(info.code, None);
        assert_eq!(info.signal, Some(9));
    }
}
