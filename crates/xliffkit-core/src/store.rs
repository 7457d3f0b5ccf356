use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::TransUnit;

/// What to do when an incoming unit's id already exists in the group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Keep the unit that arrived first, discard the incoming one.
    #[default]
    KeepFirst,
    /// Replace the existing unit with the incoming one.
    Overwrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    SkippedDuplicate,
    Replaced,
}

/// Structural metadata of a `<file>` element that the engine never inspects,
/// only carries through: the attribute list in document order and the raw
/// inner XML of the `<header>` block, if any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupMeta {
    pub attrs: Vec<(String, String)>,
    pub header_xml: Option<String>,
}

/// Units belonging to one logical source file (one `<file original="...">`
/// element), in insertion order, indexed by id.
#[derive(Debug, Clone)]
pub struct FileGroup {
    pub original: String,
    pub meta: GroupMeta,
    units: Vec<TransUnit>,
    index: HashMap<String, usize>,
}

impl FileGroup {
    pub fn new(original: impl Into<String>, meta: GroupMeta) -> Self {
        FileGroup {
            original: original.into(),
            meta,
            units: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&TransUnit> {
        self.index.get(id).map(|&i| &self.units[i])
    }

    pub fn insert(&mut self, unit: TransUnit, policy: ConflictPolicy) -> InsertOutcome {
        debug_assert!(!unit.id.is_empty(), "unit id must be non-empty");
        match self.index.get(&unit.id) {
            Some(&i) => match policy {
                ConflictPolicy::KeepFirst => InsertOutcome::SkippedDuplicate,
                ConflictPolicy::Overwrite => {
                    self.units[i] = unit;
                    InsertOutcome::Replaced
                }
            },
            None => {
                self.index.insert(unit.id.clone(), self.units.len());
                self.units.push(unit);
                InsertOutcome::Inserted
            }
        }
    }

    pub fn units(&self) -> &[TransUnit] {
        &self.units
    }

    /// Consume the group, yielding its units in insertion order.
    pub fn into_units(self) -> Vec<TransUnit> {
        self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// In-memory index of one document: path -> [`FileGroup`], at most one group
/// per path. Keyed by a `BTreeMap` so paths iterate in lexicographic order
/// and output stays reproducible regardless of input discovery order.
///
/// Reconciliation operations never mutate their inputs; they build a fresh
/// store, so read-only sharing across operations is safe by construction.
#[derive(Debug, Clone, Default)]
pub struct UnitStore {
    /// Root `<xliff>` element attributes (namespace declarations included),
    /// carried verbatim for re-serialization. Empty for in-memory stores.
    pub doc_attrs: Vec<(String, String)>,
    groups: BTreeMap<String, FileGroup>,
}

impl UnitStore {
    pub fn new() -> Self {
        UnitStore::default()
    }

    pub fn lookup(&self, path: &str, id: &str) -> Option<&TransUnit> {
        self.groups.get(path).and_then(|g| g.get(id))
    }

    pub fn group(&self, path: &str) -> Option<&FileGroup> {
        self.groups.get(path)
    }

    /// Insert `unit` into the group named `path`, creating the group with
    /// `template` metadata when it does not exist yet.
    pub fn insert_or_skip(
        &mut self,
        path: &str,
        unit: TransUnit,
        template: &GroupMeta,
        policy: ConflictPolicy,
    ) -> InsertOutcome {
        let group = self
            .groups
            .entry(path.to_string())
            .or_insert_with(|| FileGroup::new(path, template.clone()));
        group.insert(unit, policy)
    }

    /// Adopt a fully built group. Any existing group at the same path is
    /// replaced wholesale.
    pub fn insert_group(&mut self, group: FileGroup) {
        self.groups.insert(group.original.clone(), group);
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn groups(&self) -> impl Iterator<Item = &FileGroup> {
        self.groups.values()
    }

    pub fn units(&self, path: &str) -> impl Iterator<Item = &TransUnit> {
        self.groups.get(path).into_iter().flat_map(|g| g.units().iter())
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn total_units(&self) -> usize {
        self.groups.values().map(FileGroup::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
