use std::collections::{HashMap, HashSet};

use lz_core::{DepthOrder, Error, ShapeLayer};

/// A layer paired with its depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthSortedLayer<'a> {
    pub layer: &'a ShapeLayer,
    pub depth: usize,
}

impl DepthSortedLayer<'_> {
    pub fn id(&self) -> &str {
        self.layer.id()
    }
}

/// Picks layers for output and sorts them back to front (depth, then id).
///
/// With `selected` set to a non-empty list only those ids are returned; the
/// list must not contain empty or repeated ids, and every id must name one
/// of `layers`. Every returned layer must be present in `order`.
pub fn select_by_depth<'a>(
    layers: &'a [ShapeLayer],
    order: &DepthOrder,
    selected: Option<&[&str]>,
) -> Result<Vec<DepthSortedLayer<'a>>, Error> {
    if layers.is_empty() {
        return Err(Error::EmptyLayerSet);
    }

    let mut by_id = HashMap::with_capacity(layers.len());
    for layer in layers {
        if by_id.insert(layer.id(), layer).is_some() {
            return Err(Error::InvalidLayer(format!(
                "duplicate layer id '{}'",
                layer.id()
            )));
        }
    }

    let ids = match selected {
        Some(ids) if !ids.is_empty() => {
            let mut seen = HashSet::with_capacity(ids.len());
            for id in ids {
                if id.trim().is_empty() {
                    return Err(Error::InvalidLayer(
                        "selected layer ids must be non-empty".to_string(),
                    ));
                }
                if !seen.insert(*id) {
                    return Err(Error::InvalidLayer(format!(
                        "layer id '{id}' is selected more than once"
                    )));
                }
            }
            ids.to_vec()
        }
        _ => layers.iter().map(ShapeLayer::id).collect(),
    };

    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        let layer = by_id
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownLayer(id.to_string()))?;
        out.push(DepthSortedLayer {
            layer,
            depth: order.depth(id)?,
        });
    }

    out.sort_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.id().cmp(b.id())));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use lz_core::{DepthOrder, Error};

    use super::select_by_depth;
    use crate::test_support::rect_layer;

    #[test]
    fn all_layers_sorted_by_depth() {
        let layers = [
            rect_layer("front", 1, 1, 1, 1, 3, 3),
            rect_layer("back", 0, 0, 3, 3, 3, 3),
        ];
        let order = DepthOrder::new([("back", 0), ("front", 1)]).expect("valid order");

        let out = select_by_depth(&layers, &order, None).expect("selected");
        assert_eq!(
            out.iter().map(|l| (l.id(), l.depth)).collect::<Vec<_>>(),
            vec![("back", 0), ("front", 1)]
        );

        let empty_selection: &[&str] = &[];
        assert_eq!(
            select_by_depth(&layers, &order, Some(empty_selection)).expect("selected"),
            out
        );
    }

    #[test]
    fn selection_filters_and_validates() {
        let layers = [
            rect_layer("a", 0, 0, 1, 1, 3, 3),
            rect_layer("b", 1, 0, 1, 1, 3, 3),
            rect_layer("c", 2, 0, 1, 1, 3, 3),
        ];
        let order = DepthOrder::new([("c", 0), ("a", 1), ("b", 2)]).expect("valid order");

        let out = select_by_depth(&layers, &order, Some(&["b", "c"])).expect("selected");
        assert_eq!(out.iter().map(|l| l.id()).collect::<Vec<_>>(), vec!["c", "b"]);

        assert!(matches!(
            select_by_depth(&layers, &order, Some(&[" "])),
            Err(Error::InvalidLayer(_))
        ));
        assert!(matches!(
            select_by_depth(&layers, &order, Some(&["a", "a"])),
            Err(Error::InvalidLayer(_))
        ));
        assert_eq!(
            select_by_depth(&layers, &order, Some(&["zzz"])),
            Err(Error::UnknownLayer("zzz".to_string()))
        );
    }

    #[test]
    fn layer_missing_from_order_is_rejected() {
        let layers = [
            rect_layer("a", 0, 0, 1, 1, 3, 3),
            rect_layer("b", 1, 0, 1, 1, 3, 3),
        ];
        let order = DepthOrder::new([("a", 0)]).expect("valid order");
        assert_eq!(
            select_by_depth(&layers, &order, None),
            Err(Error::UnknownLayer("b".to_string()))
        );
        assert_eq!(
            select_by_depth(&[], &order, None),
            Err(Error::EmptyLayerSet)
        );
    }
}
