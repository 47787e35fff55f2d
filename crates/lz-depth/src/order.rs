use core::cmp::Reverse;
use std::collections::{BTreeSet, HashSet};

use log::{debug, warn};
use lz_core::{DepthOrder, Error, ShapeLayer};

use crate::graph::{LayerGraph, build_dominance_graph};
use crate::options::DepthOrderingOptions;
use crate::scc::{Component, ComponentId, strongly_connected_components};

/// Assigns every shape layer a depth, `0` being the farthest.
///
/// Touching layers whose areas differ by more than `delta` are ordered
/// larger-behind-smaller. Mutually dominating groups are collapsed and laid
/// out as a unit, members by area descending then id. Unconstrained groups
/// are ordered by total area descending, then discovery.
///
/// Cyclic or ambiguous input never fails; only invalid layer sets do.
pub fn order_depth(
    layers: &[ShapeLayer],
    opts: &DepthOrderingOptions,
) -> Result<DepthOrder, Error> {
    validate_layers(layers)?;

    let delta = opts.effective_delta();
    let graph = build_dominance_graph(layers, delta);
    let components = strongly_connected_components(&graph);
    let ordered = topological_order(&graph, &components);

    let mut assignments = Vec::with_capacity(layers.len());
    for cid in ordered {
        let mut members = components[cid].members.clone();
        members.sort_by(|&a, &b| {
            layers[b]
                .area()
                .cmp(&layers[a].area())
                .then_with(|| layers[a].id().cmp(layers[b].id()))
        });
        for m in members {
            let depth = assignments.len();
            assignments.push((layers[m].id(), depth));
        }
    }

    debug!(
        "ordered {} layers: {} dominance edges, {} components (delta={delta})",
        layers.len(),
        graph.edges.len(),
        components.len()
    );

    DepthOrder::new(assignments)
}

fn validate_layers(layers: &[ShapeLayer]) -> Result<(), Error> {
    let Some(first) = layers.first() else {
        return Err(Error::EmptyLayerSet);
    };

    let expected = first.mask().dims();
    let mut seen = HashSet::with_capacity(layers.len());
    for layer in layers {
        let actual = layer.mask().dims();
        if actual != expected {
            return Err(Error::MaskDimensionMismatch {
                layer: layer.id().to_string(),
                expected,
                actual,
            });
        }
        if !seen.insert(layer.id()) {
            return Err(Error::InvalidLayer(format!(
                "duplicate layer id '{}'",
                layer.id()
            )));
        }
    }
    Ok(())
}

/// Kahn's algorithm over the condensation of `graph`.
///
/// The ready set pops the largest total area first, ties by component id.
fn topological_order(graph: &LayerGraph, components: &[Component]) -> Vec<ComponentId> {
    let n = components.len();

    let mut component_of = vec![0; graph.len()];
    for c in components {
        for &m in &c.members {
            component_of[m] = c.id;
        }
    }

    let mut successors = vec![BTreeSet::new(); n];
    let mut in_degree = vec![0_usize; n];
    for e in graph.iter_edges() {
        let (from, to) = (component_of[e.from], component_of[e.to]);
        if from != to && successors[from].insert(to) {
            in_degree[to] += 1;
        }
    }

    let priority = |c: &Component| (Reverse(c.total_area), c.id);
    let mut ready = components
        .iter()
        .filter(|c| in_degree[c.id] == 0)
        .map(priority)
        .collect::<BTreeSet<_>>();

    let mut ordered = Vec::with_capacity(n);
    let mut placed = vec![false; n];
    while let Some((_, cid)) = ready.pop_first() {
        ordered.push(cid);
        placed[cid] = true;
        for &next in &successors[cid] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.insert(priority(&components[next]));
            }
        }
    }

    if ordered.len() != n {
        let mut rest = components
            .iter()
            .filter(|c| !placed[c.id])
            .map(priority)
            .collect::<Vec<_>>();
        rest.sort_unstable();
        warn!(
            "topological sort left {} of {n} components unplaced; appending by area",
            rest.len()
        );
        ordered.extend(rest.into_iter().map(|(_, cid)| cid));
    }

    ordered
}
