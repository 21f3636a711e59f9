//! CSS Cascading and Inheritance Level 5: cascade sorting with cascade layers.
//! Spec: <https://www.w3.org/TR/css-cascade-5/>
//!
//! Given declarations already matched to one property on one element, this
//! crate picks the one that takes effect. Ranking keys, highest first:
//! importance, layer order (reversed for `!important`), specificity, source
//! order.
//!
//! Origin precedence is not ranked here. Callers hand in candidates from a
//! single origin tier; see [`Origin::tier`].

#![forbid(unsafe_code)]

mod declaration;
mod error;
mod layer;
mod origin;
mod resolver;
mod shared;
mod specificity;

pub use declaration::Declaration;
pub use error::{CascadeError, LayerNameReason, MalformedReason};
pub use layer::{LayerName, LayerRank, LayerRef, LayerRegistry, LayerSegment};
pub use origin::Origin;
pub use resolver::{
    Bucket, CascadeResolver, ResolutionResult, ResolverOptions, compare_declarations,
};
pub use shared::SharedLayerRegistry;
pub use specificity::Specificity;
