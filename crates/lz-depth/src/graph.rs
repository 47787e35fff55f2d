use lz_core::{RasterMask, ShapeLayer};

pub type NodeId = usize;
pub type EdgeId = usize;

/// One layer in the dominance graph. `id` is the layer's index in the
/// input slice.
#[derive(Debug, Clone)]
pub struct LayerNode {
    pub id: NodeId,
    pub area: usize,
    pub out_edges: Vec<EdgeId>,
}

/// `from` lies behind `to`: the two layers touch and `from` is clearly
/// larger.
#[derive(Debug, Clone, PartialEq)]
pub struct DominanceEdge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub shared_boundary: usize,
    pub area_ratio: f32,
}

/// Directed graph over layers. Cycles are allowed.
#[derive(Debug, Clone, Default)]
pub struct LayerGraph {
    pub nodes: Vec<LayerNode>,
    pub edges: Vec<DominanceEdge>,
}

impl LayerGraph {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[node]
            .out_edges
            .iter()
            .map(|&e| self.edges[e].to)
    }

    pub fn iter_edges(&self) -> impl Iterator<Item = &DominanceEdge> {
        self.edges.iter()
    }
}

/// Number of 4-neighbour pixel pairs with the first pixel in `a` and the
/// second in `b`.
///
/// Masks of different dimensions share nothing.
pub fn shared_boundary(a: &RasterMask, b: &RasterMask) -> usize {
    if a.dims() != b.dims() {
        return 0;
    }
    let (Some(ba), Some(bb)) = (a.bounds(), b.bounds()) else {
        return 0;
    };

    let (width, height) = a.dims();
    if ba.dilate1(width, height).intersect(&bb).is_none() {
        return 0;
    }

    let mut shared = 0;
    for p in a.iter_ones() {
        let x = p % width;
        let y = p / width;
        if x > 0 && b.bit(p - 1) {
            shared += 1;
        }
        if x + 1 < width && b.bit(p + 1) {
            shared += 1;
        }
        if y > 0 && b.bit(p - width) {
            shared += 1;
        }
        if y + 1 < height && b.bit(p + width) {
            shared += 1;
        }
    }
    shared
}

/// `|a - b| / max(a, b)`, `0` when both are zero.
pub fn area_difference_ratio(a: usize, b: usize) -> f32 {
    let larger = a.max(b);
    if larger == 0 {
        return 0.0;
    }
    a.abs_diff(b) as f32 / larger as f32
}

/// Builds the dominance graph: for every touching pair whose relative area
/// difference exceeds `delta`, one edge from the larger layer to the
/// smaller.
///
/// Masks are assumed to share dimensions; see [`crate::order_depth`].
pub fn build_dominance_graph(layers: &[ShapeLayer], delta: f32) -> LayerGraph {
    let mut graph = LayerGraph {
        nodes: layers
            .iter()
            .enumerate()
            .map(|(id, l)| LayerNode {
                id,
                area: l.area(),
                out_edges: Vec::new(),
            })
            .collect(),
        edges: Vec::new(),
    };

    for i in 0..layers.len() {
        for j in (i + 1)..layers.len() {
            let shared = shared_boundary(layers[i].mask(), layers[j].mask());
            if shared == 0 {
                continue;
            }

            let (ai, aj) = (layers[i].area(), layers[j].area());
            let ratio = area_difference_ratio(ai, aj);
            if ratio <= delta {
                continue;
            }

            let (from, to) = if ai >= aj { (i, j) } else { (j, i) };
            let id = graph.edges.len();
            graph.edges.push(DominanceEdge {
                id,
                from,
                to,
                shared_boundary: shared,
                area_ratio: ratio,
            });
            graph.nodes[from].out_edges.push(id);
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use lz_core::RasterMask;

    use super::{area_difference_ratio, build_dominance_graph, shared_boundary};
    use crate::test_support::rect_layer;

    fn mask(width: usize, height: usize, indices: &[usize]) -> RasterMask {
        RasterMask::from_indices(width, height, indices).expect("valid mask")
    }

    #[test]
    fn shared_boundary_counts_four_neighbour_pairs() {
        // Left column against right column of a 2x2 image.
        let a = mask(2, 2, &[0, 2]);
        let b = mask(2, 2, &[1, 3]);
        assert_eq!(shared_boundary(&a, &b), 2);
        assert_eq!(shared_boundary(&b, &a), 2);

        // Diagonal contact is not adjacency.
        let c = mask(2, 2, &[0]);
        let d = mask(2, 2, &[3]);
        assert_eq!(shared_boundary(&c, &d), 0);
    }

    #[test]
    fn distant_and_empty_masks_share_nothing() {
        let a = mask(8, 8, &[0]);
        let b = mask(8, 8, &[63]);
        let empty = RasterMask::new(8, 8, &[false; 64]).expect("valid mask");
        let other_dims = mask(4, 4, &[1]);

        assert_eq!(shared_boundary(&a, &b), 0);
        assert_eq!(shared_boundary(&a, &empty), 0);
        assert_eq!(shared_boundary(&a, &other_dims), 0);
    }

    #[test]
    fn area_ratio() {
        assert_eq!(area_difference_ratio(0, 0), 0.0);
        assert_eq!(area_difference_ratio(10, 10), 0.0);
        assert!((area_difference_ratio(4, 16) - 0.75).abs() < 1e-6);
        assert!((area_difference_ratio(16, 4) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn larger_layer_points_at_smaller() {
        let layers = [
            rect_layer("small", 1, 1, 1, 1, 4, 4),
            rect_layer("big", 0, 0, 4, 4, 4, 4),
        ];
        let graph = build_dominance_graph(&layers, 0.05);

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].from, 1);
        assert_eq!(graph.edges[0].to, 0);
        assert_eq!(graph.successors(1).collect::<Vec<_>>(), vec![0]);
        assert_eq!(graph.successors(0).count(), 0);
    }

    #[test]
    fn near_equal_areas_get_no_edge() {
        let layers = [
            rect_layer("a", 0, 0, 2, 2, 4, 2),
            rect_layer("b", 2, 0, 2, 2, 4, 2),
        ];
        assert!(build_dominance_graph(&layers, 0.05).edges.is_empty());

        // Ratio exactly at delta stays unordered.
        let layers = [
            rect_layer("a", 0, 0, 2, 2, 4, 2),
            rect_layer("b", 2, 0, 1, 2, 4, 2),
        ];
        assert!(build_dominance_graph(&layers, 0.5).edges.is_empty());
        assert_eq!(build_dominance_graph(&layers, 0.49).edges.len(), 1);
    }
}
