use crate::graph::{LayerGraph, NodeId};

pub type ComponentId = usize;

/// A strongly connected component of the dominance graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Completion order of the component in Tarjan's algorithm.
    pub id: ComponentId,
    pub members: Vec<NodeId>,
    pub total_area: usize,
}

const UNVISITED: usize = usize::MAX;

#[derive(Debug, Clone, Copy)]
struct Frame {
    node: NodeId,
    next_edge: usize,
}

struct Tarjan {
    index: Vec<usize>,
    low: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<NodeId>,
    next_index: usize,
}

impl Tarjan {
    fn new(n: usize) -> Self {
        Self {
            index: vec![UNVISITED; n],
            low: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::with_capacity(n),
            next_index: 0,
        }
    }

    fn visit(&mut self, v: NodeId) -> Frame {
        self.index[v] = self.next_index;
        self.low[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
        Frame {
            node: v,
            next_edge: 0,
        }
    }

    /// Pops the component rooted at `root` off the node stack.
    fn pop_component(&mut self, root: NodeId) -> Vec<NodeId> {
        let mut members = Vec::new();
        while let Some(w) = self.stack.pop() {
            self.on_stack[w] = false;
            members.push(w);
            if w == root {
                break;
            }
        }
        members
    }
}

/// Tarjan's algorithm driven by an explicit work stack.
///
/// Components come out in completion order: every component is emitted
/// after all components reachable from it.
pub fn strongly_connected_components(graph: &LayerGraph) -> Vec<Component> {
    let n = graph.len();
    let mut state = Tarjan::new(n);
    let mut work = Vec::new();
    let mut components = Vec::new();

    for root in 0..n {
        if state.index[root] != UNVISITED {
            continue;
        }
        work.push(state.visit(root));

        while let Some(frame) = work.last_mut() {
            let v = frame.node;
            if let Some(&e) = graph.nodes[v].out_edges.get(frame.next_edge) {
                frame.next_edge += 1;
                let w = graph.edges[e].to;
                if state.index[w] == UNVISITED {
                    work.push(state.visit(w));
                } else if state.on_stack[w] {
                    state.low[v] = state.low[v].min(state.index[w]);
                }
                continue;
            }

            work.pop();
            if let Some(parent) = work.last() {
                state.low[parent.node] = state.low[parent.node].min(state.low[v]);
            }

            if state.low[v] == state.index[v] {
                let members = state.pop_component(v);
                let total_area = members.iter().map(|&m| graph.nodes[m].area).sum();
                components.push(Component {
                    id: components.len(),
                    members,
                    total_area,
                });
            }
        }
    }

    components
}

#[cfg(test)]
mod tests {
    use super::strongly_connected_components;
    use crate::graph::{DominanceEdge, LayerGraph, LayerNode};

    fn graph(areas: &[usize], edges: &[(usize, usize)]) -> LayerGraph {
        let mut g = LayerGraph {
            nodes: areas
                .iter()
                .enumerate()
                .map(|(id, &area)| LayerNode {
                    id,
                    area,
                    out_edges: Vec::new(),
                })
                .collect(),
            edges: Vec::new(),
        };
        for &(from, to) in edges {
            let id = g.edges.len();
            g.edges.push(DominanceEdge {
                id,
                from,
                to,
                shared_boundary: 1,
                area_ratio: 1.0,
            });
            g.nodes[from].out_edges.push(id);
        }
        g
    }

    fn sorted_members(g: &LayerGraph) -> Vec<Vec<usize>> {
        strongly_connected_components(g)
            .into_iter()
            .map(|c| {
                let mut m = c.members;
                m.sort_unstable();
                m
            })
            .collect()
    }

    #[test]
    fn chain_completes_sinks_first() {
        let g = graph(&[25, 9, 1], &[(0, 1), (0, 2), (1, 2)]);
        let comps = strongly_connected_components(&g);

        assert_eq!(comps.len(), 3);
        assert_eq!(comps[0].members, vec![2]);
        assert_eq!(comps[1].members, vec![1]);
        assert_eq!(comps[2].members, vec![0]);
        assert_eq!(
            comps.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn cycle_collapses_into_one_component() {
        let g = graph(&[3, 4, 5, 6], &[(0, 1), (1, 2), (2, 0), (2, 3)]);
        let comps = strongly_connected_components(&g);

        assert_eq!(sorted_members(&g), vec![vec![3], vec![0, 1, 2]]);
        assert_eq!(comps[1].total_area, 12);
        assert_eq!(comps[0].total_area, 6);
    }

    #[test]
    fn isolated_nodes_and_self_loops() {
        let g = graph(&[1, 2, 3], &[(1, 1)]);
        assert_eq!(sorted_members(&g), vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn long_path_does_not_recurse() {
        let n = 50_000;
        let edges = (0..n - 1).map(|i| (i, i + 1)).collect::<Vec<_>>();
        let g = graph(&vec![1; n], &edges);
        let comps = strongly_connected_components(&g);

        assert_eq!(comps.len(), n);
        assert_eq!(comps[0].members, vec![n - 1]);
    }

    #[test]
    fn empty_graph() {
        assert!(strongly_connected_components(&LayerGraph::default()).is_empty());
    }
}
