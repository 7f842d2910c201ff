use std::collections::BTreeSet;

/// Dog ids the user marked as match candidates.
///
/// Client-local only. Independent of the displayed page: a favorite stays
/// here after its dog scrolls off screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    ids: BTreeSet<String>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `dog_id` if absent, remove it if present. Returns whether it is
    /// now a favorite.
    pub fn toggle(&mut self, dog_id: &str) -> bool {
        if self.ids.remove(dog_id) {
            false
        } else {
            self.ids.insert(dog_id.to_string());
            true
        }
    }

    pub fn contains(&self, dog_id: &str) -> bool {
        self.ids.contains(dog_id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }
}
