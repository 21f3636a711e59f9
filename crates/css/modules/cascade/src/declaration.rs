//! Candidate declarations handed to the resolver.

use serde::{Deserialize, Serialize};

use crate::layer::{LayerRank, LayerRef};
use crate::origin::Origin;
use crate::specificity::Specificity;

/// One matched declaration competing for a property on an element.
///
/// Built once by the upstream matcher and read-only afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    property: String,
    value: String,
    #[serde(default)]
    origin: Origin,
    #[serde(default)]
    important: bool,
    #[serde(default)]
    layer: Option<LayerRef>,
    #[serde(default)]
    specificity: Specificity,
    source_order: u32,
}

impl Declaration {
    /// A normal, unlayered author declaration with zero specificity.
    pub fn new(property: impl Into<String>, value: impl Into<String>, source_order: u32) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            origin: Origin::Author,
            important: false,
            layer: None,
            specificity: Specificity::ZERO,
            source_order,
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_important(mut self, important: bool) -> Self {
        self.important = important;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_layer(mut self, layer: LayerRef) -> Self {
        self.layer = Some(layer);
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_specificity(mut self, specificity: Specificity) -> Self {
        self.specificity = specificity;
        self
    }

    #[inline]
    pub fn property(&self) -> &str {
        &self.property
    }

    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[inline]
    pub const fn origin(&self) -> Origin {
        self.origin
    }

    #[inline]
    pub const fn important(&self) -> bool {
        self.important
    }

    #[inline]
    pub const fn layer(&self) -> Option<&LayerRef> {
        self.layer.as_ref()
    }

    /// Layer rank; `Unlayered` when no layer is attached.
    #[inline]
    pub const fn layer_rank(&self) -> LayerRank {
        match &self.layer {
            Some(layer) => layer.rank(),
            None => LayerRank::Unlayered,
        }
    }

    #[inline]
    pub const fn specificity(&self) -> Specificity {
        self.specificity
    }

    #[inline]
    pub const fn source_order(&self) -> u32 {
        self.source_order
    }
}
