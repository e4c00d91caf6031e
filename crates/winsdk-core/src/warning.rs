//! Warnings from best-effort operations
//!
//! Config and cache loads, file layout and ignore-file edits never abort a
//! workflow. They return an [`Outcome`] carrying the value that could be
//! produced plus every [`Warning`] raised on the way, and the caller decides
//! whether to print them.

use std::fmt;
use tracing::warn;

/// A non-fatal problem encountered by a best-effort operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// What was being attempted (a path, a package, a step name)
    pub context: String,

    /// Human readable description of the problem
    pub message: String,
}

impl Warning {
    /// Create a new warning
    pub fn new(context: impl Into<String>, message: impl ToString) -> Self {
        Self {
            context: context.into(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.message)
    }
}

/// Value produced by a best-effort operation together with its warnings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    /// The produced value (possibly a degraded default)
    pub value: T,

    /// Problems encountered while producing it
    pub warnings: Vec<Warning>,
}

impl<T> Outcome<T> {
    /// An outcome with no warnings
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// An outcome carrying a single warning
    pub fn degraded(value: T, warning: Warning) -> Self {
        Self {
            value,
            warnings: vec![warning],
        }
    }

    /// Record a warning
    pub fn push(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    /// Absorb the warnings of another outcome and return its value
    pub fn absorb<U>(&mut self, other: Outcome<U>) -> U {
        self.warnings.extend(other.warnings);
        other.value
    }

    /// True when no warnings were raised
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Map the value, keeping the warnings
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            warnings: self.warnings,
        }
    }

    /// Emit every warning through tracing and return the value
    pub fn log_warnings(self) -> T {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
        self.value
    }

    /// Split into value and warnings
    pub fn into_parts(self) -> (T, Vec<Warning>) {
        (self.value, self.warnings)
    }
}

impl<T: Default> Default for Outcome<T> {
    fn default() -> Self {
        Self::clean(T::default())
    }
}
