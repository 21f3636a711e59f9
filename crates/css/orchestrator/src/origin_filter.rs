//! Origin precedence applied before layer resolution.
//! Spec: <https://www.w3.org/TR/css-cascade-5/#cascade-origin>
//!
//! The resolver assumes every candidate sits in one origin/importance tier.
//! This keeps only the candidates of the highest tier present.

use css_cascade::Declaration;
use log::debug;

/// Keep the candidates in the highest origin/importance tier.
pub fn retain_top_origin_tier(candidates: &mut Vec<Declaration>) {
    let Some(top) = candidates
        .iter()
        .map(|decl| decl.origin().tier(decl.important()))
        .max()
    else {
        return;
    };
    let before = candidates.len();
    candidates.retain(|decl| decl.origin().tier(decl.important()) == top);
    if candidates.len() != before {
        debug!(
            "origin filter kept {} of {before} candidate(s) at tier {top}",
            candidates.len()
        );
    }
}
