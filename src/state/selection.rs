use crate::markup::RecommendationBlock;

pub const COMPARE_LIMIT: usize = 3;

/// Session-scoped selection sets. A recommendation has no identifier other
/// than its display name, so membership is keyed by name equality; two
/// colleges sharing a name are indistinguishable here and a removal takes
/// every entry with that name.
#[derive(Debug, Clone, Default)]
pub struct SelectionSets {
    compare: Vec<RecommendationBlock>,
    saved: Vec<RecommendationBlock>,
}

impl SelectionSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle a block in the compare list. Adding a new name while the list
    /// is at capacity is a no-op.
    pub fn toggle_compare(&mut self, block: &RecommendationBlock) {
        if contains_name(&self.compare, &block.name) {
            self.compare.retain(|entry| entry.name != block.name);
        } else if self.compare.len() < COMPARE_LIMIT {
            self.compare.push(block.clone());
        }
    }

    pub fn toggle_saved(&mut self, block: &RecommendationBlock) {
        if contains_name(&self.saved, &block.name) {
            self.saved.retain(|entry| entry.name != block.name);
        } else {
            self.saved.push(block.clone());
        }
    }

    pub fn remove_compared(&mut self, name: &str) {
        self.compare.retain(|entry| entry.name != name);
    }

    pub fn remove_saved(&mut self, name: &str) {
        self.saved.retain(|entry| entry.name != name);
    }

    pub fn is_compared(&self, name: &str) -> bool {
        contains_name(&self.compare, name)
    }

    pub fn is_saved(&self, name: &str) -> bool {
        contains_name(&self.saved, name)
    }

    pub fn compared(&self) -> &[RecommendationBlock] {
        &self.compare
    }

    pub fn saved(&self) -> &[RecommendationBlock] {
        &self.saved
    }
}

fn contains_name(entries: &[RecommendationBlock], name: &str) -> bool {
    entries.iter().any(|entry| entry.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_list_caps_at_three() {
        let mut sets = SelectionSets::new();
        for name in ["A", "B", "C"] {
            sets.toggle_compare(&RecommendationBlock::named(name));
        }
        assert_eq!(sets.compared().len(), 3);

        sets.toggle_compare(&RecommendationBlock::named("D"));
        assert_eq!(sets.compared().len(), 3);
        assert!(!sets.is_compared("D"));
    }

    #[test]
    fn test_toggle_removes_present_entry_by_name() {
        let mut sets = SelectionSets::new();
        sets.toggle_compare(&RecommendationBlock::named("Acme U"));
        assert!(sets.is_compared("Acme U"));

        sets.toggle_compare(&RecommendationBlock::named("Acme U"));
        assert!(!sets.is_compared("Acme U"));
        assert!(sets.compared().is_empty());
    }

    #[test]
    fn test_same_name_blocks_collapse_under_name_identity() {
        // Two distinct colleges with the same display name: toggling the
        // second one in behaves as a removal of the first, and a removal by
        // name leaves nothing behind.
        let mut first = RecommendationBlock::named("Acme U");
        first.country = Some("Japan".to_string());
        let mut second = RecommendationBlock::named("Acme U");
        second.country = Some("Canada".to_string());

        let mut sets = SelectionSets::new();
        sets.toggle_compare(&first);
        sets.toggle_compare(&second);
        assert!(sets.compared().is_empty());

        sets.remove_compared("Acme U");
        assert!(sets.compared().is_empty());
    }

    #[test]
    fn test_saved_list_has_no_capacity_limit() {
        let mut sets = SelectionSets::new();
        for index in 0..5 {
            sets.toggle_saved(&RecommendationBlock::named(format!("College {index}")));
        }
        assert_eq!(sets.saved().len(), 5);
        assert!(sets.is_saved("College 4"));
    }

    #[test]
    fn test_removal_after_cap_reopens_a_slot() {
        let mut sets = SelectionSets::new();
        for name in ["A", "B", "C"] {
            sets.toggle_compare(&RecommendationBlock::named(name));
        }
        sets.toggle_compare(&RecommendationBlock::named("B"));
        sets.toggle_compare(&RecommendationBlock::named("D"));

        assert_eq!(sets.compared().len(), 3);
        assert!(sets.is_compared("D"));
        assert!(!sets.is_compared("B"));
    }
}
