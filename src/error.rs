use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Only a small part of what can go wrong while printing a value ends up here. Incomplete types,
/// optimized-out values, invalid float encodings and reads past the end of mapped target memory
/// are rendered as inline placeholders and never reach the caller. What remains are the
/// conditions that abort a whole print operation, plus errors raised at the configuration
/// boundary.
///
/// # Error Categories
///
/// ## Print Aborts
/// - [`Error::MemoryRead`] - The target could not deliver bytes for a reason other than the
///   address being unmapped
/// - [`Error::Cancelled`] - A cancellation request was observed at a checkpoint
///
/// ## Configuration Errors
/// - [`Error::Configuration`] - A setting was rejected, the prior value is unchanged
/// - [`Error::UnknownFormat`] - A format letter outside `d u x o b h w g`
///
/// ## Internal Errors
/// - [`Error::Malformed`] - A value or type violated its layout invariants
/// - [`Error::Io`] - Flushing rendered output to a writer failed
/// - [`Error::Format`] - The output sink rejected a write
///
/// # Examples
///
/// ```rust
/// use valscope::{Error, PrintSettings};
///
/// let mut settings = PrintSettings::new();
/// match settings.set_output_radix(7) {
///     Err(Error::Configuration(message)) => eprintln!("{message}"),
///     Err(e) => eprintln!("Other error: {e}"),
///     Ok(_) => unreachable!(),
/// }
/// assert_eq!(settings.policy().output_radix(), 10);
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Reading target memory failed with a transport error.
    ///
    /// Unlike an out-of-bounds read, which is reported inline next to the partially printed
    /// value, any other failure of the target-access primitive aborts the print operation.
    ///
    /// # Fields
    ///
    /// * `address` - The target address at which the read stopped
    /// * `reason` - The underlying failure reported by the target
    #[error("Error reading memory address 0x{address:x}: {reason}.")]
    MemoryRead {
        /// The target address at which the read failed
        address: u64,
        /// The underlying failure reported by the target
        reason: String,
    },

    /// The print operation observed a cancellation request and unwound.
    #[error("Quit")]
    Cancelled,

    /// A configuration value was rejected.
    ///
    /// The setting keeps its previous value. The message is the text shown to the user.
    #[error("{0}")]
    Configuration(String),

    /// A format letter outside of the supported set was requested.
    #[error("Undefined output format \"{0}\"")]
    UnknownFormat(char),

    /// A value or type is internally inconsistent.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// I/O error while flushing rendered output.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The output sink rejected a write.
    #[error("Formatting failed: {0}")]
    Format(#[from] std::fmt::Error),
}

impl Error {
    /// Returns `true` if this error is the result of a cancellation request.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_read_message() {
        let err = Error::MemoryRead {
            address: 0x1000,
            reason: "permission denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Error reading memory address 0x1000: permission denied."
        );
    }

    #[test]
    fn test_malformed_macro() {
        let err = malformed_error!("bad length {}", 3);
        match err {
            Error::Malformed { message, .. } => assert_eq!(message, "bad length 3"),
            other => panic!("unexpected error {other}"),
        }
        assert!(Error::Cancelled.is_cancelled());
    }
}
