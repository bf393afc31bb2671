//! Snapshot-level diff: compare two lists of tracked entities.
//!
//! An entity's identity is its position in the list. Entities present at the
//! same position on both sides are diffed field by field under the prefix
//! `"{index}."`; positions present on one side only produce a single
//! entity-level record keyed `"{index}"`.
//!
//! Reordering the upstream list therefore shows up as field changes at every
//! shifted position rather than as a move.

use otr_types::{ChangeRecord, Document, Operation};
use tracing::debug;

use crate::path_diff::diff_documents;

/// The result of comparing two snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// The list of changes, in emission order.
    pub changes: Vec<ChangeRecord>,
}

impl ChangeSet {
    /// Create an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Number of field-level additions.
    pub fn additions(&self) -> usize {
        self.count_fields(Operation::Added)
    }

    /// Number of field-level removals.
    pub fn removals(&self) -> usize {
        self.count_fields(Operation::Removed)
    }

    /// Number of modified values.
    pub fn modifications(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| c.operation == Operation::Changed)
            .count()
    }

    /// Number of entities that appeared at the end of the list.
    pub fn entities_added(&self) -> usize {
        self.count_entities(Operation::Added)
    }

    /// Number of entities that dropped off the end of the list.
    pub fn entities_removed(&self) -> usize {
        self.count_entities(Operation::Removed)
    }

    /// Consume the set, yielding the records for appending to history.
    pub fn into_records(self) -> Vec<ChangeRecord> {
        self.changes
    }

    fn count_fields(&self, op: Operation) -> usize {
        self.changes
            .iter()
            .filter(|c| c.operation == op && !c.is_entity_level())
            .count()
    }

    fn count_entities(&self, op: Operation) -> usize {
        self.changes
            .iter()
            .filter(|c| c.operation == op && c.is_entity_level())
            .count()
    }
}

impl IntoIterator for ChangeSet {
    type Item = ChangeRecord;
    type IntoIter = std::vec::IntoIter<ChangeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

/// Compare two entity lists position by position.
pub fn compare_snapshots(old: &[Document], new: &[Document]) -> ChangeSet {
    let mut changes = Vec::new();

    for (index, (old_entity, new_entity)) in old.iter().zip(new).enumerate() {
        changes.extend(diff_documents(old_entity, new_entity, &format!("{index}.")));
    }

    // At most one of these runs: whichever list is longer.
    for (index, old_entity) in old.iter().enumerate().skip(new.len()) {
        changes.push(ChangeRecord::entity_removed(index, old_entity.clone()));
    }
    for (index, new_entity) in new.iter().enumerate().skip(old.len()) {
        changes.push(ChangeRecord::entity_added(index, new_entity.clone()));
    }

    let set = ChangeSet { changes };
    debug!(
        old_entities = old.len(),
        new_entities = new.len(),
        changes = set.len(),
        "compared snapshots"
    );
    set
}
