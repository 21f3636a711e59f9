//! Failures surfaced by the cascade core.
//!
//! An empty candidate list is not a failure; it resolves to
//! [`ResolutionResult::NoMatch`](crate::ResolutionResult::NoMatch).

use core::error::Error;
use core::fmt::{self, Display, Formatter};

/// Why a candidate declaration was rejected before ranking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MalformedReason {
    /// The declaration has an empty property name.
    EmptyProperty,
    /// The candidate targets a different property than the first candidate.
    PropertyMismatch {
        /// Property of the first candidate in the list.
        expected: String,
        /// Property of the offending candidate.
        found: String,
    },
    /// The declaration names a layer the registry never saw.
    UnknownLayer {
        /// Qualified name carried by the declaration.
        name: String,
    },
    /// The declaration carries an order index that disagrees with the registry.
    LayerOrderMismatch {
        /// Qualified name carried by the declaration.
        name: String,
        /// Order index carried by the declaration.
        declared: u32,
        /// Order index the registry assigned to that name.
        registered: u32,
    },
}

impl Display for MalformedReason {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyProperty => write!(formatter, "property name is empty"),
            Self::PropertyMismatch { expected, found } => {
                write!(formatter, "expected property `{expected}`, found `{found}`")
            }
            Self::UnknownLayer { name } => write!(formatter, "layer `{name}` was never declared"),
            Self::LayerOrderMismatch {
                name,
                declared,
                registered,
            } => write!(
                formatter,
                "layer `{name}` carries order {declared} but the registry assigned {registered}"
            ),
        }
    }
}

/// Why a qualified layer name could not be parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerNameReason {
    /// The whole name is empty.
    Empty,
    /// A dot-separated segment is empty (leading, trailing or doubled dot).
    EmptySegment,
    /// A segment is not a CSS identifier.
    NotAnIdentifier,
}

impl Display for LayerNameReason {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Empty => "name is empty",
            Self::EmptySegment => "name contains an empty segment",
            Self::NotAnIdentifier => "segment is not an identifier",
        };
        formatter.write_str(text)
    }
}

/// Errors reported by the registry and the resolver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CascadeError {
    /// A candidate violates the resolver's input contract.
    MalformedDeclaration {
        /// Position of the offending candidate in the input list.
        index: usize,
        /// What is wrong with it.
        reason: MalformedReason,
    },
    /// A layer name string could not be parsed.
    InvalidLayerName {
        /// The rejected input.
        name: String,
        /// What is wrong with it.
        reason: LayerNameReason,
    },
}

impl Display for CascadeError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedDeclaration { index, reason } => {
                write!(formatter, "malformed declaration at index {index}: {reason}")
            }
            Self::InvalidLayerName { name, reason } => {
                write!(formatter, "invalid layer name `{name}`: {reason}")
            }
        }
    }
}

impl Error for CascadeError {}
