//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! out-of-range parameters, design-wide configuration problems and invalid block geometry.
//! Non-fatal outcomes (a sampler running out of attempts) are reported as
//! [`GenerationWarning`] values inside the result instead.
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Where an invalid parameter was found.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Scope {
    /// The design-wide default parameters.
    Defaults,
    /// The override record of a named block.
    Block(String),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Defaults => f.write_str("design defaults"),
            Scope::Block(name) => write!(f, "block '{name}'"),
        }
    }
}

/// Reason a block polygon was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GeometryIssue {
    Empty,
    NonFinite,
    ZeroArea,
    SelfIntersecting,
}

impl fmt::Display for GeometryIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GeometryIssue::Empty => "polygon has fewer than three distinct vertices",
            GeometryIssue::NonFinite => "polygon has non-finite coordinates",
            GeometryIssue::ZeroArea => "polygon has zero area",
            GeometryIssue::SelfIntersecting => "polygon rings intersect themselves or each other",
        };
        f.write_str(text)
    }
}

/// Coarse classification of an [`Error`], for callers that route by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Configuration,
    InvalidGeometry,
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Error {
    #[error("invalid {field} in {scope}: {message}")]
    Validation {
        scope: Scope,
        field: &'static str,
        message: String,
    },

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("invalid geometry for block '{block}': {issue}")]
    InvalidGeometry { block: String, issue: GeometryIssue },
}

impl Error {
    pub(crate) fn validation(scope: &Scope, field: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            scope: scope.clone(),
            field,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::InvalidGeometry { .. } => ErrorKind::InvalidGeometry,
        }
    }

    /// Name of the block the error refers to, if it is block-specific.
    pub fn block(&self) -> Option<&str> {
        match self {
            Error::Validation {
                scope: Scope::Block(name),
                ..
            } => Some(name),
            Error::InvalidGeometry { block, .. } => Some(block),
            _ => None,
        }
    }
}

/// Non-fatal condition raised while generating points for a block.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GenerationWarning {
    /// The sampler stopped before reaching its target, or fell below the
    /// block's minimum. `achieved` is the number of points actually produced.
    PartialGeneration {
        block: String,
        requested: usize,
        achieved: usize,
        minimum: usize,
    },
}

impl GenerationWarning {
    pub fn block(&self) -> &str {
        match self {
            GenerationWarning::PartialGeneration { block, .. } => block,
        }
    }
}

impl fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationWarning::PartialGeneration {
                block,
                requested,
                achieved,
                minimum,
            } => write!(
                f,
                "block '{block}': generated {achieved} of {requested} requested plots (minimum {minimum})"
            ),
        }
    }
}
