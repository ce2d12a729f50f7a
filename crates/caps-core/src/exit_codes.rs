//! Exit codes for the caps CLI.
//!
//! Exit code ranges:
//! - 0: Success
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors

/// Exit codes for caps operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Clean = 0,

    /// Invalid arguments
    ArgsError = 10,

    /// Manifest or registry failed validation
    ValidationError = 11,

    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Exit code for an error.
    pub fn for_error(err: &caps_common::Error) -> Self {
        match err {
            caps_common::Error::Io(_) => ExitCode::IoError,
            // Parse failures are bad input, not broken disks.
            _ => ExitCode::ValidationError,
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.as_i32() as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Clean.as_i32(), 0);
        assert_eq!(ExitCode::ArgsError.as_i32(), 10);
        assert_eq!(ExitCode::ValidationError.as_i32(), 11);
        assert_eq!(ExitCode::InternalError.as_i32(), 20);
        assert_eq!(ExitCode::IoError.as_i32(), 21);
    }

    #[test]
    fn test_exit_code_for_error() {
        let unknown = caps_common::Error::UnknownBaselineSet {
            name: "v9".to_string(),
        };
        assert_eq!(ExitCode::for_error(&unknown), ExitCode::ValidationError);

        let io = caps_common::Error::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(ExitCode::for_error(&io), ExitCode::IoError);

        let yaml = caps_common::Error::Yaml("bad".to_string());
        assert_eq!(ExitCode::for_error(&yaml), ExitCode::ValidationError);
    }
}
