//! Core types shared across the library
//!
//! The error surface is deliberately tiny: every timing operation is a total
//! function over its state (stopping twice is a no-op, popping at the root
//! saturates). Only two situations are rejected, and both are programmer
//! errors rather than runtime conditions to recover from.

/// Monotonic tick count. Ticks are nanoseconds on a process-local scale; the
/// value `0` is reserved as the "unset" sentinel for timestamp cells.
pub type Ticks = u64;

/// Result type for fallible timing operations
pub type Result<T> = std::result::Result<T, TimerError>;

/// Errors that can occur while building timing hierarchies
#[derive(Debug, thiserror::Error)]
pub enum TimerError {
    /// A relationship constructor was called without a required participant,
    /// e.g. a last-sibling without its parent.
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    /// A mapping operation was invoked on a modeller after its advancement
    /// sequence had already been generated.
    #[error("modeller already finalized: hierarchy operations are no longer available")]
    ModellerFinalized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_problem() {
        let err = TimerError::MissingArgument("parent");
        assert_eq!(err.to_string(), "missing required argument: parent");

        let err = TimerError::ModellerFinalized;
        assert!(err.to_string().contains("finalized"));
    }
}
