//! One resolution session: the stylesheets matched for a single element.
//!
//! Each origin has its own layer order, so the session keeps one registry per
//! origin. The source-order counter is shared by every stylesheet added to
//! the session. Sessions never observe each other's layers.

use std::collections::BTreeMap;

use anyhow::{Context as _, Result, bail};
use css_cascade::{CascadeResolver, Declaration, LayerRegistry, Origin, ResolverOptions};
use log::debug;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::collect::Collector;
use crate::origin_filter::retain_top_origin_tier;
use crate::types::Stylesheet;

/// Session behaviour switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionOptions {
    pub resolver: ResolverOptions,
    /// Keep only the highest origin/importance tier before layer resolution.
    /// With this off, candidates for one property must all share an origin.
    pub origin_filter: bool,
    /// Minimum number of distinct properties before resolving on the rayon pool.
    pub parallel_threshold: usize,
}

impl Default for SessionOptions {
    #[inline]
    fn default() -> Self {
        Self {
            resolver: ResolverOptions::default(),
            origin_filter: true,
            parallel_threshold: 32,
        }
    }
}

#[derive(Debug, Default)]
pub struct CascadeSession {
    options: SessionOptions,
    /// Layer order per origin, indexed by `origin_slot`.
    registries: [LayerRegistry; 3],
    declarations: Vec<Declaration>,
    next_source_order: u32,
}

impl CascadeSession {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_options(options: SessionOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Flatten `sheet` into this session. Returns how many declarations it added.
    pub fn add_stylesheet(&mut self, sheet: &Stylesheet) -> usize {
        let before = self.declarations.len();
        let registry = &mut self.registries[origin_slot(sheet.origin)];
        Collector::new(
            registry,
            &mut self.next_source_order,
            &mut self.declarations,
            sheet.origin,
        )
        .collect(&sheet.rules, None);
        let added = self.declarations.len() - before;
        debug!(
            "collected {added} declaration(s) from {:?} stylesheet; {} layer(s) in that origin",
            sheet.origin,
            self.registry(sheet.origin).len()
        );
        added
    }

    /// Layer order declared by stylesheets of `origin`.
    #[inline]
    pub const fn registry(&self, origin: Origin) -> &LayerRegistry {
        &self.registries[origin_slot(origin)]
    }

    #[inline]
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    #[inline]
    pub const fn options(&self) -> SessionOptions {
        self.options
    }

    /// Candidates for `property`, origin-filtered when enabled.
    pub fn candidates_for(&self, property: &str) -> Vec<Declaration> {
        let property = property.to_ascii_lowercase();
        let mut candidates: Vec<Declaration> = self
            .declarations
            .iter()
            .filter(|decl| decl.property() == property)
            .cloned()
            .collect();
        if self.options.origin_filter {
            retain_top_origin_tier(&mut candidates);
        }
        candidates
    }

    /// The declaration that takes effect for `property`, if any.
    ///
    /// # Errors
    /// Returns an error if the resolver rejects the candidate list.
    pub fn cascaded_value(&self, property: &str) -> Result<Option<Declaration>> {
        let candidates = self.candidates_for(property);
        self.resolve_group(property, &candidates)
    }

    /// Every candidate for `property`, winner first.
    ///
    /// # Errors
    /// Returns an error if the resolver rejects the candidate list.
    pub fn cascade_chain(&self, property: &str) -> Result<Vec<Declaration>> {
        let candidates = self.candidates_for(property);
        let ranked = self
            .resolver_for(property, &candidates)?
            .rank(&candidates)
            .with_context(|| format!("ranking candidates for `{property}`"))?;
        Ok(ranked.into_iter().cloned().collect())
    }

    /// The winning declaration for every property seen in this session.
    ///
    /// # Errors
    /// Returns the first resolver failure, naming the property.
    pub fn cascaded_values(&self) -> Result<BTreeMap<String, Declaration>> {
        let mut groups: BTreeMap<String, Vec<Declaration>> = BTreeMap::new();
        for decl in &self.declarations {
            groups
                .entry(decl.property().to_owned())
                .or_default()
                .push(decl.clone());
        }
        if self.options.origin_filter {
            for candidates in groups.values_mut() {
                retain_top_origin_tier(candidates);
            }
        }
        let groups: Vec<(String, Vec<Declaration>)> = groups.into_iter().collect();
        let resolved = self.resolve_groups(groups)?;
        Ok(resolved
            .into_iter()
            .filter_map(|(property, winner)| winner.map(|decl| (property, decl)))
            .collect())
    }

    #[cfg(feature = "parallel")]
    fn resolve_groups(
        &self,
        groups: Vec<(String, Vec<Declaration>)>,
    ) -> Result<Vec<(String, Option<Declaration>)>> {
        if groups.len() < self.options.parallel_threshold {
            return self.resolve_groups_sequential(groups);
        }
        debug!("resolving {} properties in parallel", groups.len());
        groups
            .into_par_iter()
            .map(|(property, candidates)| {
                self.resolve_group(&property, &candidates)
                    .map(|winner| (property, winner))
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn resolve_groups(
        &self,
        groups: Vec<(String, Vec<Declaration>)>,
    ) -> Result<Vec<(String, Option<Declaration>)>> {
        self.resolve_groups_sequential(groups)
    }

    fn resolve_groups_sequential(
        &self,
        groups: Vec<(String, Vec<Declaration>)>,
    ) -> Result<Vec<(String, Option<Declaration>)>> {
        groups
            .into_iter()
            .map(|(property, candidates)| {
                self.resolve_group(&property, &candidates)
                    .map(|winner| (property, winner))
            })
            .collect()
    }

    fn resolve_group(
        &self,
        property: &str,
        candidates: &[Declaration],
    ) -> Result<Option<Declaration>> {
        let result = self
            .resolver_for(property, candidates)?
            .resolve(candidates)
            .with_context(|| format!("resolving `{property}`"))?;
        Ok(result.winner().cloned())
    }

    /// Resolver over the registry of the origin the candidates come from.
    fn resolver_for(
        &self,
        property: &str,
        candidates: &[Declaration],
    ) -> Result<CascadeResolver<'_>> {
        let origin = candidates.first().map_or(Origin::Author, Declaration::origin);
        if candidates.iter().any(|decl| decl.origin() != origin) {
            bail!(
                "candidates for `{property}` span several origins, whose layer orders are unrelated"
            );
        }
        Ok(CascadeResolver::with_options(
            self.registry(origin),
            self.options.resolver,
        ))
    }
}

const fn origin_slot(origin: Origin) -> usize {
    match origin {
        Origin::UserAgent => 0,
        Origin::User => 1,
        Origin::Author => 2,
    }
}
