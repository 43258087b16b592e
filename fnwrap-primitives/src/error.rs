//! Shared error definitions for tool construction and dispatch.

use thiserror::Error;

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building tool descriptors or dispatching calls.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A mandatory construction argument was not supplied.
    #[error("missing argument `{argument}`")]
    MissingArgument {
        /// Name of the absent argument.
        argument: String,
    },

    /// A supplied value does not have the kind the operation needs.
    #[error("`{argument}` has the wrong kind: {reason}")]
    TypeKind {
        /// Name of the offending argument.
        argument: String,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Descriptor construction failed validation.
    #[error("invalid tool descriptor: {reason}")]
    Validation {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Call dispatch named a function that was never registered.
    #[error("function `{name}` is not registered")]
    NotRegistered {
        /// Name of the missing function.
        name: String,
    },

    /// Supplied arguments do not satisfy the target signature.
    #[error("cannot bind arguments for `{function}`: {reason}")]
    Binding {
        /// Function whose signature rejected the arguments.
        function: String,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// The encoded argument payload could not be decoded into named arguments.
    #[error("malformed arguments for `{function}`: {reason}")]
    MalformedArguments {
        /// Function the arguments were addressed to.
        function: String,
        /// Decoder error or shape mismatch.
        reason: String,
    },

    /// The native function body reported a failure.
    #[error("function `{function}` failed: {reason}")]
    Execution {
        /// Function that failed.
        function: String,
        /// Human-readable error returned by the implementation.
        reason: String,
    },

    /// The registry lock was poisoned by a panicking writer.
    #[error("function registry lock poisoned")]
    RegistryPoisoned,
}

impl Error {
    /// Creates a missing-argument error.
    #[must_use]
    pub fn missing_argument(argument: impl Into<String>) -> Self {
        Self::MissingArgument {
            argument: argument.into(),
        }
    }

    /// Creates a type-kind error.
    #[must_use]
    pub fn type_kind(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TypeKind {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    /// Creates a validation error from the supplied reason.
    #[must_use]
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Creates a binding error.
    #[must_use]
    pub fn binding(function: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Binding {
            function: function.into(),
            reason: reason.into(),
        }
    }

    /// Creates an execution error. Function bodies usually leave `function`
    /// empty; the registry fills it in before the error reaches the caller.
    #[must_use]
    pub fn execution(function: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Execution {
            function: function.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors raised while constructing a descriptor.
    #[must_use]
    pub const fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::MissingArgument { .. } | Self::TypeKind { .. } | Self::Validation { .. }
        )
    }
}
