use thiserror::Error;

use crate::metadata::{identity::MemberKey, model::UsageKind};

macro_rules! protocol_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::ProtocolViolation {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::ProtocolViolation {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Contract Violations
/// - [`Error::ProtocolViolation`] - The builder protocol was driven out of order
/// - [`Error::KindMismatch`] - A member key already resolves to a member of another kind
/// - [`Error::NotFound`] - A query was issued for a node that cannot answer it
///
/// Contract violations indicate a desynchronized traversal driver and are not meant to be
/// recovered from. The current module is abandoned when one is raised.
///
/// ## Input Errors
/// - [`Error::Decode`] - A module could not be decoded
/// - [`Error::RecursionLimit`] - Traversal nested deeper than the configured limit
///
/// Input errors are reported per module by the [`crate::project::Mapper`]; the remaining
/// modules of a run are still modeled.
///
/// # Examples
///
/// ```rust
/// use dotimpact::{Error, metadata::{builder::ModelBuilder, model::QueryRoot}};
///
/// let mut root = QueryRoot::new();
/// let mut builder = ModelBuilder::new(&mut root);
/// match builder.end_type() {
///     Err(Error::ProtocolViolation { message, .. }) => println!("desync: {}", message),
///     other => panic!("unexpected {:?}", other),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The builder protocol was violated.
    ///
    /// Raised when an `End*` does not close the innermost open scope of the same kind, when
    /// a mutator is issued without a scope it can apply to, or when a builder is finished
    /// with scopes still open. The error includes the source location where the violation
    /// was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Description of the violated expectation
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Protocol violation - {file}:{line}: {message}")]
    ProtocolViolation {
        /// The message to be printed for the ProtocolViolation error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A member was requested with a kind that differs from the existing member under the
    /// same key.
    #[error("Member {key} is a {found}, not a {expected}")]
    KindMismatch {
        /// The key that was looked up
        key: MemberKey,
        /// The kind the caller asked for
        expected: UsageKind,
        /// The kind stored under the key
        found: UsageKind,
    },

    /// A module could not be decoded.
    ///
    /// Produced by [`crate::inspection::ModuleSource`] implementations. The module named
    /// here contributes nothing (or an incomplete, flagged subtree) to the model.
    #[error("Failed to decode module {module}: {message}")]
    Decode {
        /// Name of the module that failed
        module: String,
        /// Decoder-provided failure description
        message: String,
    },

    /// Recursion limit reached.
    ///
    /// The associated value shows the recursion limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// A query was issued against a node that cannot answer it.
    #[error("{0}")]
    NotFound(String),
}
