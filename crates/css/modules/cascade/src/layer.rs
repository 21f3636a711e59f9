//! Cascade layer names and the layer order registry.
//! Spec: <https://www.w3.org/TR/css-cascade-5/#layering>
//!
//! Layers are kept in a flat map keyed by their fully qualified dotted name.
//! Order indices are handed out in first-seen order; declaring `a.b.c`
//! declares `a` and `a.b` first when they are new.

use core::fmt::{self, Display, Formatter};
use core::str::FromStr;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{CascadeError, LayerNameReason};

/// One component of a qualified layer name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LayerSegment {
    /// An author-supplied identifier.
    Named(String),
    /// A synthetic segment standing in for an `@layer { ... }` block without a
    /// name. No string parses into this variant, so it can never be reopened.
    Anonymous(u32),
}

impl Display for LayerSegment {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => formatter.write_str(name),
            Self::Anonymous(serial) => write!(formatter, "<anonymous-{serial}>"),
        }
    }
}

/// Fully qualified layer name, outermost segment first.
///
/// Serializes as a list of segment strings and deserializes through
/// [`LayerName::from_idents`], so escaped identifiers such as `1st` or `a.b`
/// survive a round trip. An anonymous segment serializes as its
/// `<anonymous-n>` marker and comes back as a named segment, which never
/// matches the anonymous layer it was written from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LayerName {
    segments: Vec<LayerSegment>,
}

impl LayerName {
    /// Parse a dotted name such as `framework.base`.
    ///
    /// # Errors
    /// Returns `CascadeError::InvalidLayerName` for an empty name, an empty
    /// segment, or a segment that is not a plain CSS identifier.
    pub fn parse(qualified: &str) -> Result<Self, CascadeError> {
        let invalid = |reason| CascadeError::InvalidLayerName {
            name: qualified.to_owned(),
            reason,
        };
        if qualified.is_empty() {
            return Err(invalid(LayerNameReason::Empty));
        }
        let mut segments = Vec::new();
        for segment in qualified.split('.') {
            if segment.is_empty() {
                return Err(invalid(LayerNameReason::EmptySegment));
            }
            if !is_identifier(segment) {
                return Err(invalid(LayerNameReason::NotAnIdentifier));
            }
            segments.push(LayerSegment::Named(segment.to_owned()));
        }
        Ok(Self { segments })
    }

    /// Build a name from already tokenized identifier values.
    ///
    /// Identifier values may contain characters that only survive CSS
    /// escaping, so segments are only checked for emptiness here.
    ///
    /// # Errors
    /// Returns `CascadeError::InvalidLayerName` when there are no segments or
    /// one of them is empty.
    pub fn from_idents<I>(idents: I) -> Result<Self, CascadeError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let segments: Vec<LayerSegment> = idents
            .into_iter()
            .map(|ident| LayerSegment::Named(ident.into()))
            .collect();
        let name = Self { segments };
        if name.segments.is_empty() {
            return Err(CascadeError::InvalidLayerName {
                name: String::new(),
                reason: LayerNameReason::Empty,
            });
        }
        if name
            .segments
            .iter()
            .any(|segment| matches!(segment, LayerSegment::Named(text) if text.is_empty()))
        {
            return Err(CascadeError::InvalidLayerName {
                name: name.to_string(),
                reason: LayerNameReason::EmptySegment,
            });
        }
        Ok(name)
    }

    #[inline]
    pub fn segments(&self) -> &[LayerSegment] {
        &self.segments
    }

    /// Number of segments; `1` for a top-level layer.
    #[inline]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Enclosing layer, if this one is nested.
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.segments.split_last()?;
        (!init.is_empty()).then(|| Self {
            segments: init.to_vec(),
        })
    }

    /// `self` followed by every segment of `relative`.
    pub fn join(&self, relative: &Self) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(relative.segments.iter().cloned());
        Self { segments }
    }

    /// True if any segment is anonymous.
    pub fn is_anonymous(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, LayerSegment::Anonymous(_)))
    }

    /// Every proper ancestor followed by the name itself, outermost first.
    fn prefixes(&self) -> impl Iterator<Item = Self> + '_ {
        (1..=self.segments.len()).map(|len| Self {
            segments: self.segments[..len].to_vec(),
        })
    }

    fn nested(parent: Option<&Self>, relative: &Self) -> Self {
        parent.map_or_else(|| relative.clone(), |outer| outer.join(relative))
    }
}

impl Display for LayerName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            if position > 0 {
                formatter.write_str(".")?;
            }
            write!(formatter, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for LayerName {
    type Err = CascadeError;

    #[inline]
    fn from_str(qualified: &str) -> Result<Self, Self::Err> {
        Self::parse(qualified)
    }
}

impl TryFrom<Vec<String>> for LayerName {
    type Error = CascadeError;

    #[inline]
    fn try_from(idents: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_idents(idents)
    }
}

impl From<LayerName> for Vec<String> {
    #[inline]
    fn from(name: LayerName) -> Self {
        name.segments
            .iter()
            .map(|segment| match segment {
                LayerSegment::Named(text) => text.clone(),
                LayerSegment::Anonymous(_) => segment.to_string(),
            })
            .collect()
    }
}

/// Identifier check for unescaped names: `-`, `_`, ASCII letters, digits and
/// non-ASCII code points, not starting with a digit or with `-` + digit.
fn is_identifier(text: &str) -> bool {
    let is_name_start = |ch: char| ch.is_ascii_alphabetic() || ch == '_' || !ch.is_ascii();
    let is_name_char = |ch: char| is_name_start(ch) || ch.is_ascii_digit() || ch == '-';
    let mut chars = text.chars();
    let valid_start = match chars.next() {
        Some('-') => match chars.clone().next() {
            Some(next) => is_name_start(next) || next == '-',
            None => false,
        },
        Some(first) => is_name_start(first),
        None => false,
    };
    valid_start && chars.all(is_name_char)
}

/// A declaration's resolved layer: order index plus qualified name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerRef {
    /// Order index assigned by the registry at first declaration.
    pub order: u32,
    /// Fully qualified dotted name.
    pub name: LayerName,
}

impl LayerRef {
    #[inline]
    pub const fn rank(&self) -> LayerRank {
        LayerRank::Layered(self.order)
    }
}

/// Position of a declaration in layer order.
///
/// Deliberately not `Ord`: unlayered sorts below every layer for normal
/// declarations and above every layer for important ones, so callers must
/// pick a direction explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerRank {
    Unlayered,
    Layered(u32),
}

impl LayerRank {
    #[inline]
    pub const fn is_unlayered(self) -> bool {
        matches!(self, Self::Unlayered)
    }

    #[inline]
    pub const fn order(self) -> Option<u32> {
        match self {
            Self::Unlayered => None,
            Self::Layered(order) => Some(order),
        }
    }
}

/// Qualified layer name → order index, in first-declaration order.
///
/// The registry only grows; there is no removal.
#[derive(Clone, Debug, Default)]
pub struct LayerRegistry {
    /// Order index by qualified name.
    order_by_name: HashMap<LayerName, u32>,
    /// Names indexed by their order.
    names: Vec<LayerName>,
    /// Serial for the next anonymous segment.
    next_anonymous: u32,
}

impl LayerRegistry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name`, assigning indices to any new ancestors first.
    /// Redeclaring a known name returns its existing index unchanged.
    pub fn declare(&mut self, name: &LayerName) -> LayerRef {
        let mut order = 0;
        for prefix in name.prefixes() {
            order = self.declare_single(prefix);
        }
        LayerRef {
            order,
            name: name.clone(),
        }
    }

    /// Parse and declare a dotted name.
    ///
    /// # Errors
    /// Returns `CascadeError::InvalidLayerName` when `qualified` does not parse.
    #[inline]
    pub fn declare_qualified(&mut self, qualified: &str) -> Result<LayerRef, CascadeError> {
        let name = LayerName::parse(qualified)?;
        Ok(self.declare(&name))
    }

    /// Declare `relative` inside `parent` (or at top level when `None`).
    #[inline]
    pub fn declare_nested(&mut self, parent: Option<&LayerName>, relative: &LayerName) -> LayerRef {
        self.declare(&LayerName::nested(parent, relative))
    }

    /// Allocate a fresh anonymous layer inside `parent`.
    pub fn declare_anonymous(&mut self, parent: Option<&LayerName>) -> LayerRef {
        let serial = self.next_anonymous;
        self.next_anonymous = self.next_anonymous.saturating_add(1);
        let relative = LayerName {
            segments: vec![LayerSegment::Anonymous(serial)],
        };
        self.declare_nested(parent, &relative)
    }

    /// Declare several names in order, as `@layer a, b, c;` does.
    pub fn declare_all<'names, I>(&mut self, names: I) -> Vec<LayerRef>
    where
        I: IntoIterator<Item = &'names LayerName>,
    {
        names.into_iter().map(|name| self.declare(name)).collect()
    }

    /// Layer rank of `name`; names never declared are unlayered.
    #[inline]
    pub fn order_of(&self, name: &LayerName) -> LayerRank {
        self.order_by_name
            .get(name)
            .map_or(LayerRank::Unlayered, |order| LayerRank::Layered(*order))
    }

    /// The registered reference for `name`, if declared.
    #[inline]
    pub fn get(&self, name: &LayerName) -> Option<LayerRef> {
        self.order_by_name.get(name).map(|order| LayerRef {
            order: *order,
            name: name.clone(),
        })
    }

    /// Name registered at `order`.
    #[inline]
    pub fn name_at(&self, order: u32) -> Option<&LayerName> {
        self.names.get(order as usize)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Registered layers in order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &LayerName)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(order, name)| (order as u32, name))
    }

    fn declare_single(&mut self, name: LayerName) -> u32 {
        if let Some(order) = self.order_by_name.get(&name) {
            return *order;
        }
        let order = self.names.len() as u32;
        debug!("declared cascade layer `{name}` at order {order}");
        self.order_by_name.insert(name.clone(), order);
        self.names.push(name);
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(qualified: &str) -> LayerName {
        LayerName::parse(qualified).unwrap_or_else(|err| panic!("{err}"))
    }

    #[test]
    fn indices_follow_first_declaration() {
        let mut registry = LayerRegistry::new();
        assert_eq!(registry.declare(&name("reset")).order, 0);
        assert_eq!(registry.declare(&name("theme")).order, 1);
        assert_eq!(registry.declare(&name("reset")).order, 0);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.order_of(&name("theme")), LayerRank::Layered(1));
        assert_eq!(registry.order_of(&name("missing")), LayerRank::Unlayered);
    }

    #[test]
    fn ancestors_are_declared_before_the_leaf() {
        let mut registry = LayerRegistry::new();
        let leaf = registry.declare(&name("framework.base.reset"));
        assert_eq!(leaf.order, 2);
        assert_eq!(registry.order_of(&name("framework")), LayerRank::Layered(0));
        assert_eq!(registry.order_of(&name("framework.base")), LayerRank::Layered(1));
        let names: Vec<String> = registry.iter().map(|(_, layer)| layer.to_string()).collect();
        assert_eq!(names, ["framework", "framework.base", "framework.base.reset"]);
    }

    #[test]
    fn same_leaf_under_different_parents_is_distinct() {
        let mut registry = LayerRegistry::new();
        let first = registry.declare_nested(Some(&name("a")), &name("base"));
        let second = registry.declare_nested(Some(&name("b")), &name("base"));
        assert_ne!(first.order, second.order);
        assert_eq!(first.name.to_string(), "a.base");
        assert_eq!(second.name.to_string(), "b.base");
    }

    #[test]
    fn anonymous_layers_never_collide() {
        let mut registry = LayerRegistry::new();
        let first = registry.declare_anonymous(None);
        let second = registry.declare_anonymous(None);
        assert_ne!(first, second);
        assert!(first.name.is_anonymous());
        assert!(LayerName::parse(&first.name.to_string()).is_err());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn rejects_malformed_names() {
        for (input, reason) in [
            ("", LayerNameReason::Empty),
            ("a..b", LayerNameReason::EmptySegment),
            (".a", LayerNameReason::EmptySegment),
            ("1st", LayerNameReason::NotAnIdentifier),
            ("has space", LayerNameReason::NotAnIdentifier),
            ("-9", LayerNameReason::NotAnIdentifier),
        ] {
            assert_eq!(
                LayerName::parse(input),
                Err(CascadeError::InvalidLayerName {
                    name: input.to_owned(),
                    reason,
                })
            );
        }
        assert!(LayerName::parse("--custom").is_ok());
        assert!(LayerName::parse("_private.héllo").is_ok());
    }

    #[test]
    fn escaped_identifiers_survive_json() -> Result<(), serde_json::Error> {
        let escaped = LayerName::from_idents(["1st", "a.b"])
            .unwrap_or_else(|err| panic!("{err}"));
        let json = serde_json::to_string(&escaped)?;
        assert_eq!(json, r#"["1st","a.b"]"#);
        assert_eq!(serde_json::from_str::<LayerName>(&json)?, escaped);

        assert!(serde_json::from_str::<LayerName>("[]").is_err());
        assert!(serde_json::from_str::<LayerName>(r#"["a",""]"#).is_err());
        Ok(())
    }

    #[test]
    fn anonymous_names_do_not_reopen_through_json() -> Result<(), serde_json::Error> {
        let mut registry = LayerRegistry::new();
        let anonymous = registry.declare_anonymous(None);
        let json = serde_json::to_string(&anonymous.name)?;
        let restored: LayerName = serde_json::from_str(&json)?;
        assert_ne!(restored, anonymous.name);
        assert!(!restored.is_anonymous());
        assert!(registry.get(&restored).is_none());
        Ok(())
    }

    #[test]
    fn parent_strips_last_segment() {
        assert_eq!(name("a.b.c").parent(), Some(name("a.b")));
        assert_eq!(name("a").parent(), None);
        assert_eq!(name("a.b").depth(), 2);
    }
}
