//! Flattening matched rule trees into cascade candidates.

use css_cascade::{Declaration, LayerRef, LayerRegistry, Origin};

use crate::types::{Rule, StyleRule};

/// Walks rule trees, declaring layers as they appear and stamping each
/// declaration with the next source-order index.
pub struct Collector<'session> {
    registry: &'session mut LayerRegistry,
    next_source_order: &'session mut u32,
    out: &'session mut Vec<Declaration>,
    origin: Origin,
}

impl<'session> Collector<'session> {
    pub fn new(
        registry: &'session mut LayerRegistry,
        next_source_order: &'session mut u32,
        out: &'session mut Vec<Declaration>,
        origin: Origin,
    ) -> Self {
        Self {
            registry,
            next_source_order,
            out,
            origin,
        }
    }

    /// Collect `rules` as children of `current` (top level when `None`).
    pub fn collect(&mut self, rules: &[Rule], current: Option<&LayerRef>) {
        let parent = current.map(|layer| &layer.name);
        for rule in rules {
            match rule {
                Rule::Style(style) => self.push_style(style, current),
                Rule::LayerBlock { name, rules: children } => {
                    let layer = match name {
                        Some(relative) => self.registry.declare_nested(parent, relative),
                        None => self.registry.declare_anonymous(parent),
                    };
                    self.collect(children, Some(&layer));
                }
                Rule::LayerStatement(names) => {
                    for relative in names {
                        self.registry.declare_nested(parent, relative);
                    }
                }
            }
        }
    }

    fn push_style(&mut self, style: &StyleRule, layer: Option<&LayerRef>) {
        for property in &style.declarations {
            let order = *self.next_source_order;
            *self.next_source_order = order.saturating_add(1);
            let mut decl = Declaration::new(
                property.name.to_ascii_lowercase(),
                property.value.clone(),
                order,
            )
            .with_origin(self.origin)
            .with_important(property.important)
            .with_specificity(style.specificity);
            if let Some(layer_ref) = layer {
                decl = decl.with_layer(layer_ref.clone());
            }
            self.out.push(decl);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PropertyDeclaration;
    use css_cascade::{LayerName, LayerRank, Specificity};

    fn style(name: &str, value: &str) -> Rule {
        Rule::Style(StyleRule {
            specificity: Specificity(0, 0, 1),
            declarations: vec![PropertyDeclaration::new(name, value)],
        })
    }

    fn layer_name(qualified: &str) -> LayerName {
        LayerName::parse(qualified).unwrap_or_else(|err| panic!("{err}"))
    }

    #[test]
    fn nested_blocks_compose_qualified_names() {
        let rules = vec![
            Rule::LayerStatement(vec![layer_name("reset"), layer_name("framework")]),
            Rule::LayerBlock {
                name: Some(layer_name("framework")),
                rules: vec![Rule::LayerBlock {
                    name: Some(layer_name("base")),
                    rules: vec![style("color", "grey")],
                }],
            },
            style("color", "black"),
        ];
        let mut registry = LayerRegistry::new();
        let mut next = 0;
        let mut out = Vec::new();
        Collector::new(&mut registry, &mut next, &mut out, Origin::Author).collect(&rules, None);

        assert_eq!(next, 2);
        assert_eq!(registry.order_of(&layer_name("framework.base")), LayerRank::Layered(2));
        let layers: Vec<Option<String>> = out
            .iter()
            .map(|decl| decl.layer().map(|layer| layer.name.to_string()))
            .collect();
        assert_eq!(layers, [Some("framework.base".to_owned()), None]);
    }

    #[test]
    fn anonymous_blocks_get_separate_layers() {
        let rules = vec![
            Rule::LayerBlock {
                name: None,
                rules: vec![style("color", "a")],
            },
            Rule::LayerBlock {
                name: None,
                rules: vec![style("color", "b")],
            },
        ];
        let mut registry = LayerRegistry::new();
        let mut next = 10;
        let mut out = Vec::new();
        Collector::new(&mut registry, &mut next, &mut out, Origin::User).collect(&rules, None);

        let orders: Vec<Option<u32>> = out.iter().map(|decl| decl.layer_rank().order()).collect();
        assert_eq!(orders, [Some(0), Some(1)]);
        assert!(out.iter().all(|decl| decl.origin() == Origin::User));
        assert_eq!(out.first().map(Declaration::source_order), Some(10));
    }
}
