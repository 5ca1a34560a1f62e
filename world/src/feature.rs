use glam::IVec2;
use serde::{Deserialize, Serialize};
use util::HashMap;

/// A multi-cell terrain object, like a bush, anchored at one cell.
#[derive(Clone, Default, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LargeFeature {
    pub anchor: IVec2,
    pub kind: String,
}

impl LargeFeature {
    pub fn new(anchor: impl Into<IVec2>, kind: impl Into<String>) -> Self {
        LargeFeature {
            anchor: anchor.into(),
            kind: kind.into(),
        }
    }
}

/// Large feature collection indexed by anchor cell.
///
/// Several features may share an anchor.
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct FeatureIndex {
    by_anchor: HashMap<IVec2, Vec<LargeFeature>>,
    len: usize,
}

impl FeatureIndex {
    pub fn insert(&mut self, feature: LargeFeature) {
        self.by_anchor
            .entry(feature.anchor)
            .or_default()
            .push(feature);
        self.len += 1;
    }

    /// Features anchored at `pos`.
    pub fn at(&self, pos: IVec2) -> &[LargeFeature] {
        self.by_anchor.get(&pos).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Remove every feature anchored at `pos`.
    pub fn remove_at(&mut self, pos: IVec2) -> Vec<LargeFeature> {
        let removed = self.by_anchor.remove(&pos).unwrap_or_default();
        self.len -= removed.len();
        removed
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate features ordered by anchor, row-major.
    pub fn iter(&self) -> impl Iterator<Item = &LargeFeature> {
        let mut anchors: Vec<&IVec2> = self.by_anchor.keys().collect();
        anchors.sort_by_key(|p| (p.y, p.x));
        anchors.into_iter().flat_map(|p| self.by_anchor[p].iter())
    }
}

impl FromIterator<LargeFeature> for FeatureIndex {
    fn from_iter<T: IntoIterator<Item = LargeFeature>>(iter: T) -> Self {
        let mut ret = FeatureIndex::default();
        for f in iter {
            ret.insert(f);
        }
        ret
    }
}

#[cfg(test)]
mod test {
    use glam::ivec2;

    use super::*;

    #[test]
    fn shared_anchor_removal() {
        let mut index = FeatureIndex::from_iter([
            LargeFeature::new([3, 4], "bush"),
            LargeFeature::new([3, 4], "bush"),
            LargeFeature::new([5, 4], "bush"),
        ]);
        assert_eq!(index.len(), 3);
        assert_eq!(index.at(ivec2(3, 4)).len(), 2);

        let removed = index.remove_at(ivec2(3, 4));
        assert_eq!(removed.len(), 2);
        assert_eq!(index.len(), 1);
        assert!(index.at(ivec2(3, 4)).is_empty());

        assert!(index.remove_at(ivec2(3, 4)).is_empty());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn ordered_iteration() {
        let index = FeatureIndex::from_iter([
            LargeFeature::new([9, 1], "c"),
            LargeFeature::new([0, 2], "d"),
            LargeFeature::new([1, 1], "b"),
            LargeFeature::new([5, 0], "a"),
        ]);
        let kinds: String = index.iter().map(|f| f.kind.as_str()).collect();
        assert_eq!(kinds, "abcd");
    }
}
