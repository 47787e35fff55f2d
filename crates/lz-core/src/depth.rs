use core::cmp::Ordering;
use std::collections::HashMap;

use crate::Error;

/// Total back-to-front order of layers. Depth `0` is the farthest layer.
///
/// Depths form a dense permutation of `0..len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthOrder {
    depth_by_id: HashMap<String, usize>,
    ids_by_depth: Vec<String>,
}

impl DepthOrder {
    pub fn new<I, S>(assignments: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let pairs = assignments
            .into_iter()
            .map(|(id, depth)| (id.into(), depth))
            .collect::<Vec<_>>();
        if pairs.is_empty() {
            return Err(Error::InvalidDepthOrder("at least one layer is required"));
        }

        let n = pairs.len();
        let mut slots: Vec<Option<String>> = vec![None; n];
        let mut depth_by_id = HashMap::with_capacity(n);

        for (id, depth) in pairs {
            if id.trim().is_empty() {
                return Err(Error::InvalidDepthOrder("layer id must be non-empty"));
            }
            if depth >= n {
                return Err(Error::InvalidDepthOrder("depth indices must be dense"));
            }
            if slots[depth].is_some() {
                return Err(Error::InvalidDepthOrder("depth indices must be unique"));
            }
            if depth_by_id.insert(id.clone(), depth).is_some() {
                return Err(Error::InvalidDepthOrder("layer ids must be unique"));
            }
            slots[depth] = Some(id);
        }

        // `n` distinct depths below `n` fill every slot.
        let ids_by_depth = slots.into_iter().flatten().collect();

        Ok(Self {
            depth_by_id,
            ids_by_depth,
        })
    }

    pub fn depth(&self, id: &str) -> Result<usize, Error> {
        self.depth_by_id
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownLayer(id.to_string()))
    }

    /// `Less` when `left` lies behind `right`.
    pub fn compare(&self, left: &str, right: &str) -> Result<Ordering, Error> {
        Ok(self.depth(left)?.cmp(&self.depth(right)?))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.depth_by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.ids_by_depth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids_by_depth.is_empty()
    }

    /// Layer id at the given depth.
    pub fn id_at(&self, depth: usize) -> Option<&str> {
        self.ids_by_depth.get(depth).map(String::as_str)
    }

    /// Layer ids from farthest to nearest.
    pub fn iter_back_to_front(&self) -> impl Iterator<Item = (&str, usize)> {
        self.ids_by_depth
            .iter()
            .enumerate()
            .map(|(depth, id)| (id.as_str(), depth))
    }
}

#[cfg(test)]
mod tests {
    use core::cmp::Ordering;

    use super::DepthOrder;
    use crate::Error;

    #[test]
    fn lookup_and_compare() {
        let order = DepthOrder::new([("front", 2), ("back", 0), ("mid", 1)]).expect("valid order");

        assert_eq!(order.len(), 3);
        assert_eq!(order.depth("back"), Ok(0));
        assert_eq!(order.compare("back", "front"), Ok(Ordering::Less));
        assert_eq!(order.compare("front", "mid"), Ok(Ordering::Greater));
        assert_eq!(order.id_at(1), Some("mid"));
        assert_eq!(
            order.iter_back_to_front().map(|(id, _)| id).collect::<Vec<_>>(),
            vec!["back", "mid", "front"]
        );
    }

    #[test]
    fn unknown_id_is_an_error() {
        let order = DepthOrder::new([("a", 0)]).expect("valid order");
        assert_eq!(
            order.depth("missing"),
            Err(Error::UnknownLayer("missing".to_string()))
        );
        assert!(order.compare("a", "missing").is_err());
        assert!(!order.contains("missing"));
    }

    #[test]
    fn rejects_gaps_duplicates_and_empty() {
        assert!(DepthOrder::new(Vec::<(String, usize)>::new()).is_err());
        assert!(DepthOrder::new([("a", 0), ("b", 2)]).is_err());
        assert!(DepthOrder::new([("a", 0), ("b", 0)]).is_err());
        assert!(DepthOrder::new([("a", 0), ("a", 1)]).is_err());
        assert!(DepthOrder::new([("", 0)]).is_err());
    }
}
