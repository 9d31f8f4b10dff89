/// Supplements the user has picked for their own stack, in the order they were picked.
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::catalog::SupplementRecord;

/// One line of the stack view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StackItem {
    pub id: String,
    pub name: String,
    pub dosage: String,
}

impl From<&SupplementRecord> for StackItem {
    fn from(record: &SupplementRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            dosage: record.dosage.clone(),
        }
    }
}

/// Ordered selection keyed by supplement id. A record appears at most once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplementStack {
    items: Vec<SupplementRecord>,
}

impl SupplementStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|s| s.id == id)
    }

    /// Add `record` if no entry has its id, remove that entry otherwise.
    /// Returns whether the supplement is now selected.
    pub fn toggle(&mut self, record: &SupplementRecord) -> bool {
        if let Some(pos) = self.items.iter().position(|s| s.id == record.id) {
            self.items.remove(pos);
            false
        } else {
            self.items.push(record.clone());
            true
        }
    }

    pub fn records(&self) -> &[SupplementRecord] {
        &self.items
    }

    pub fn items(&self) -> Vec<StackItem> {
        self.items.iter().map(StackItem::from).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ids, Catalog};

    #[test]
    fn toggle_adds_then_removes() {
        let catalog = Catalog::builtin();
        let creatine = catalog.require(ids::CREATINE).unwrap();
        let mut stack = SupplementStack::new();

        assert!(stack.toggle(creatine));
        assert!(stack.contains(ids::CREATINE));
        assert!(!stack.toggle(creatine));
        assert!(stack.is_empty());
    }

    #[test]
    fn keeps_selection_order() {
        let catalog = Catalog::builtin();
        let mut stack = SupplementStack::new();
        for id in [ids::MAGNESIUM, ids::WHEY_PROTEIN, ids::OMEGA_3] {
            stack.toggle(catalog.require(id).unwrap());
        }
        stack.toggle(catalog.require(ids::WHEY_PROTEIN).unwrap());

        let items = stack.items();
        let picked: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(picked, [ids::MAGNESIUM, ids::OMEGA_3]);
        assert_eq!(items[0].dosage, catalog.require(ids::MAGNESIUM).unwrap().dosage);
    }

    #[test]
    fn same_id_counts_once() {
        let catalog = Catalog::builtin();
        let omega = catalog.require(ids::OMEGA_3).unwrap().clone();
        let mut renamed = omega.clone();
        renamed.name = "Fish Oil".to_string();

        let mut stack = SupplementStack::new();
        stack.toggle(&omega);
        assert!(!stack.toggle(&renamed));
        assert_eq!(stack.len(), 0);
    }
}
