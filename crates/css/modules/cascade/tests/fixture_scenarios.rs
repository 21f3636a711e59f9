#![cfg(test)]
#![allow(
    clippy::missing_panics_doc,
    reason = "Assertions in tests are expected"
)]

use core::error::Error;
use css_cascade::{CascadeResolver, Declaration, LayerRegistry, Specificity};
use serde::Deserialize;

#[derive(Deserialize)]
struct Scenario {
    name: String,
    layers: Vec<String>,
    candidates: Vec<Candidate>,
    expected: Option<String>,
}

#[derive(Deserialize)]
struct Candidate {
    property: String,
    value: String,
    #[serde(default)]
    layer: Option<String>,
    #[serde(default)]
    important: bool,
    #[serde(default)]
    specificity: Specificity,
    source_order: u32,
}

fn build(
    registry: &mut LayerRegistry,
    candidates: Vec<Candidate>,
) -> Result<Vec<Declaration>, Box<dyn Error>> {
    let mut out = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let mut decl = Declaration::new(candidate.property, candidate.value, candidate.source_order)
            .with_important(candidate.important)
            .with_specificity(candidate.specificity);
        if let Some(layer) = candidate.layer {
            decl = decl.with_layer(registry.declare_qualified(&layer)?);
        }
        out.push(decl);
    }
    Ok(out)
}

#[test]
fn layer_scenarios_resolve_to_expected_winner() -> Result<(), Box<dyn Error>> {
    let _ = env_logger::builder().is_test(true).try_init();
    let scenarios: Vec<Scenario> =
        serde_json::from_str(include_str!("fixtures/layer_scenarios.json"))?;
    assert!(!scenarios.is_empty());

    for scenario in scenarios {
        let mut registry = LayerRegistry::new();
        for layer in &scenario.layers {
            registry.declare_qualified(layer)?;
        }
        let candidates = build(&mut registry, scenario.candidates)?;
        let result = CascadeResolver::new(&registry).resolve(&candidates)?;
        assert_eq!(
            result.value(),
            scenario.expected.as_deref(),
            "scenario `{}`",
            scenario.name
        );
    }
    Ok(())
}

#[test]
fn declarations_replay_through_json() -> Result<(), Box<dyn Error>> {
    let mut registry = LayerRegistry::new();
    let theme = registry.declare_qualified("framework.theme")?;
    let original = Declaration::new("color", "lime", 4)
        .with_layer(theme)
        .with_important(true)
        .with_specificity(Specificity(0, 2, 1));

    let json = serde_json::to_string(&original)?;
    assert!(json.contains(r#"["framework","theme"]"#));
    let replayed: Declaration = serde_json::from_str(&json)?;
    assert_eq!(replayed, original);
    Ok(())
}
