//! Picking the winning declaration among matched candidates.
//! Spec: <https://www.w3.org/TR/css-cascade-5/#cascade-sort>
//!
//! Candidates are compared on importance, then layer order, then
//! specificity, then source order. Important declarations rank layers in
//! reverse, with unlayered styles on top.

use core::cmp::Ordering;
use log::trace;

use crate::declaration::Declaration;
use crate::error::{CascadeError, MalformedReason};
use crate::layer::{LayerRank, LayerRegistry};

/// Which importance bucket a declaration belongs to. Each bucket ranks
/// layers with its own comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bucket {
    Normal,
    Important,
}

impl Bucket {
    #[inline]
    pub const fn of(declaration: &Declaration) -> Self {
        if declaration.important() {
            Self::Important
        } else {
            Self::Normal
        }
    }

    /// Compare two layer ranks within this bucket. `Greater` means `left`
    /// takes precedence.
    #[inline]
    pub fn compare_layers(self, left: LayerRank, right: LayerRank) -> Ordering {
        match self {
            Self::Normal => compare_normal_layers(left, right),
            Self::Important => compare_important_layers(left, right),
        }
    }
}

/// Normal declarations: unlayered loses to every layer, later layers win.
fn compare_normal_layers(left: LayerRank, right: LayerRank) -> Ordering {
    match (left, right) {
        (LayerRank::Unlayered, LayerRank::Unlayered) => Ordering::Equal,
        (LayerRank::Unlayered, LayerRank::Layered(_)) => Ordering::Less,
        (LayerRank::Layered(_), LayerRank::Unlayered) => Ordering::Greater,
        (LayerRank::Layered(left_order), LayerRank::Layered(right_order)) => {
            left_order.cmp(&right_order)
        }
    }
}

/// Important declarations: unlayered beats every layer, earlier layers win.
fn compare_important_layers(left: LayerRank, right: LayerRank) -> Ordering {
    match (left, right) {
        (LayerRank::Unlayered, LayerRank::Unlayered) => Ordering::Equal,
        (LayerRank::Unlayered, LayerRank::Layered(_)) => Ordering::Greater,
        (LayerRank::Layered(_), LayerRank::Unlayered) => Ordering::Less,
        (LayerRank::Layered(left_order), LayerRank::Layered(right_order)) => {
            right_order.cmp(&left_order)
        }
    }
}

/// Compare two candidates for the same property.
/// Returns `Ordering::Greater` if `left` should win over `right`.
///
/// Two candidates naming the same layer share its rank even if their stored
/// orders disagree, so stale refs cannot split one layer in two.
pub fn compare_declarations(left: &Declaration, right: &Declaration) -> Ordering {
    // Important outranks normal whatever the layer or specificity.
    if left.important() != right.important() {
        return left.important().cmp(&right.important());
    }

    let layers = match (left.layer(), right.layer()) {
        (Some(left_layer), Some(right_layer)) if left_layer.name == right_layer.name => {
            Ordering::Equal
        }
        _ => Bucket::of(left).compare_layers(left.layer_rank(), right.layer_rank()),
    };
    layers
        .then_with(|| left.specificity().cmp(&right.specificity()))
        .then_with(|| left.source_order().cmp(&right.source_order()))
}

/// Outcome of one resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionResult<'decl> {
    /// The declaration that takes effect.
    Winner(&'decl Declaration),
    /// There were no candidates.
    NoMatch,
}

impl<'decl> ResolutionResult<'decl> {
    #[inline]
    pub const fn winner(self) -> Option<&'decl Declaration> {
        match self {
            Self::Winner(declaration) => Some(declaration),
            Self::NoMatch => None,
        }
    }

    #[inline]
    pub const fn is_no_match(self) -> bool {
        matches!(self, Self::NoMatch)
    }

    /// Value of the winning declaration.
    #[inline]
    pub fn value(self) -> Option<&'decl str> {
        self.winner().map(Declaration::value)
    }
}

/// Resolver behaviour switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Reject candidates that break the input contract instead of ranking them.
    ///
    /// When off, layer refs are trusted as given: a ref's stored order decides
    /// its rank, except that two refs naming the same layer always tie on layer.
    pub validate: bool,
}

impl Default for ResolverOptions {
    #[inline]
    fn default() -> Self {
        Self { validate: true }
    }
}

/// Resolves candidate lists against a read-only layer registry.
///
/// Holds no state of its own, so one resolver can be shared across threads
/// once the registry has stopped changing.
#[derive(Clone, Copy, Debug)]
pub struct CascadeResolver<'reg> {
    registry: &'reg LayerRegistry,
    options: ResolverOptions,
}

impl<'reg> CascadeResolver<'reg> {
    #[inline]
    pub fn new(registry: &'reg LayerRegistry) -> Self {
        Self::with_options(registry, ResolverOptions::default())
    }

    #[inline]
    pub const fn with_options(registry: &'reg LayerRegistry, options: ResolverOptions) -> Self {
        Self { registry, options }
    }

    #[inline]
    pub const fn registry(&self) -> &'reg LayerRegistry {
        self.registry
    }

    #[inline]
    pub const fn options(&self) -> ResolverOptions {
        self.options
    }

    /// Pick the winning declaration. Among exact ties the earliest candidate
    /// in the list is kept.
    ///
    /// # Errors
    /// With validation enabled, returns `CascadeError::MalformedDeclaration`
    /// for the first candidate that has an empty property, targets a
    /// different property than the first candidate, or carries a layer that
    /// disagrees with the registry.
    pub fn resolve<'decl>(
        &self,
        candidates: &'decl [Declaration],
    ) -> Result<ResolutionResult<'decl>, CascadeError> {
        if self.options.validate {
            self.validate(candidates)?;
        }
        let result = match candidates {
            [] => ResolutionResult::NoMatch,
            [only] => ResolutionResult::Winner(only),
            [first, rest @ ..] => {
                let mut winner = first;
                for candidate in rest {
                    if compare_declarations(candidate, winner) == Ordering::Greater {
                        winner = candidate;
                    }
                }
                ResolutionResult::Winner(winner)
            }
        };
        if let ResolutionResult::Winner(winner) = result {
            trace!(
                "cascade `{}`: `{}` wins among {} candidate(s)",
                winner.property(),
                winner.value(),
                candidates.len()
            );
        }
        Ok(result)
    }

    /// All candidates ordered from highest to lowest precedence. The head of
    /// the list is the winner `resolve` reports.
    ///
    /// # Errors
    /// Same validation failures as [`CascadeResolver::resolve`].
    pub fn rank<'decl>(
        &self,
        candidates: &'decl [Declaration],
    ) -> Result<Vec<&'decl Declaration>, CascadeError> {
        if self.options.validate {
            self.validate(candidates)?;
        }
        let mut ranked: Vec<&Declaration> = candidates.iter().collect();
        // Stable sort keeps earlier candidates first among exact ties.
        ranked.sort_by(|left, right| compare_declarations(right, left));
        Ok(ranked)
    }

    fn validate(&self, candidates: &[Declaration]) -> Result<(), CascadeError> {
        let Some(first) = candidates.first() else {
            return Ok(());
        };
        for (index, candidate) in candidates.iter().enumerate() {
            let malformed = |reason| CascadeError::MalformedDeclaration { index, reason };
            if candidate.property().is_empty() {
                return Err(malformed(MalformedReason::EmptyProperty));
            }
            if candidate.property() != first.property() {
                return Err(malformed(MalformedReason::PropertyMismatch {
                    expected: first.property().to_owned(),
                    found: candidate.property().to_owned(),
                }));
            }
            let Some(layer) = candidate.layer() else {
                continue;
            };
            match self.registry.order_of(&layer.name) {
                LayerRank::Unlayered => {
                    return Err(malformed(MalformedReason::UnknownLayer {
                        name: layer.name.to_string(),
                    }));
                }
                LayerRank::Layered(registered) if registered != layer.order => {
                    return Err(malformed(MalformedReason::LayerOrderMismatch {
                        name: layer.name.to_string(),
                        declared: layer.order,
                        registered,
                    }));
                }
                LayerRank::Layered(_) => {}
            }
        }
        Ok(())
    }
}
