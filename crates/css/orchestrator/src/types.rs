//! Matched rule trees handed over by the selector matcher.
//!
//! Style rules here have already matched the element under consideration;
//! only their specificity and declarations are kept.

use anyhow::{Context as _, Result};
pub use css_cascade::{LayerName, Origin, Specificity};

use crate::layer_prelude::{parse_layer_block_prelude, parse_layer_statement_prelude};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyDeclaration {
    pub name: String,
    pub value: String,
    pub important: bool,
}

impl PropertyDeclaration {
    #[inline]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            important: false,
        }
    }

    #[inline]
    pub fn important(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            important: true,
            ..Self::new(name, value)
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleRule {
    /// Specificity of the selector that matched.
    pub specificity: Specificity,
    pub declarations: Vec<PropertyDeclaration>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rule {
    Style(StyleRule),
    /// `@layer <name>? { ... }`; the name is relative to the enclosing layer.
    LayerBlock {
        name: Option<LayerName>,
        rules: Vec<Rule>,
    },
    /// `@layer a, b.c;`
    LayerStatement(Vec<LayerName>),
}

impl Rule {
    /// Build a layer block from its raw prelude text.
    ///
    /// # Errors
    /// Returns an error if the prelude is not empty or a single layer name.
    pub fn layer_block(prelude: &str, rules: Vec<Self>) -> Result<Self> {
        let name = parse_layer_block_prelude(prelude)
            .with_context(|| format!("invalid @layer block prelude `{prelude}`"))?;
        Ok(Self::LayerBlock { name, rules })
    }

    /// Build a layer statement from its raw prelude text.
    ///
    /// # Errors
    /// Returns an error if the prelude is not a list of layer names.
    pub fn layer_statement(prelude: &str) -> Result<Self> {
        let names = parse_layer_statement_prelude(prelude)
            .with_context(|| format!("invalid @layer statement prelude `{prelude}`"))?;
        Ok(Self::LayerStatement(names))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
    pub origin: Origin,
}

impl Default for Stylesheet {
    #[inline]
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            origin: Origin::Author,
        }
    }
}

impl Stylesheet {
    #[inline]
    pub const fn new(origin: Origin, rules: Vec<Rule>) -> Self {
        Self { rules, origin }
    }
}
