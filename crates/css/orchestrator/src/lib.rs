//! Feeds matched stylesheets into the cascade and reports cascaded values.
//!
//! A [`CascadeSession`] collects the rule trees matched for one element,
//! declares their `@layer`s in first-seen order, applies origin precedence and
//! hands each property's candidates to [`css_cascade::CascadeResolver`].

#![forbid(unsafe_code)]

mod collect;
pub mod layer_prelude;
mod origin_filter;
mod session;
pub mod types;

pub use css_cascade;
pub use layer_prelude::{
    LayerPrelude, LayerPreludeError, parse_layer_block_prelude, parse_layer_prelude,
    parse_layer_statement_prelude,
};
pub use origin_filter::retain_top_origin_tier;
pub use session::{CascadeSession, SessionOptions};
