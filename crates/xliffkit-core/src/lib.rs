use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod report;
mod store;

pub use report::{CombineGroupStat, CombineReport, DiffReport, EnrichReport, SampleReport};
pub use store::{ConflictPolicy, FileGroup, GroupMeta, InsertOutcome, UnitStore};

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Slot name of the document's own translation (the XLIFF `<target>` element).
pub const TARGET_SLOT: &str = "target";

/// Default slot name for a second translation attached by enrichment.
pub const CLASSIC_SLOT: &str = "target-classic";

/// A single translatable string extracted from an XLIFF document: its stable
/// id, the original-language text, and any number of named translation slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransUnit {
    pub id: String,
    /// Original-language text (may be missing in partial deliveries).
    pub source: Option<String>,
    /// Slot name -> translated text. The document's own translation lives in
    /// [`TARGET_SLOT`]; enrichment adds further named slots.
    pub translations: BTreeMap<String, String>,
    /// `trans-unit` element attributes other than `id`, in document order.
    pub attrs: Vec<(String, String)>,
    pub note: Option<String>,
}

impl TransUnit {
    pub fn new(id: impl Into<String>) -> Self {
        TransUnit {
            id: id.into(),
            source: None,
            translations: BTreeMap::new(),
            attrs: Vec::new(),
            note: None,
        }
    }

    pub fn slot(&self, name: &str) -> Option<&str> {
        self.translations.get(name).map(String::as_str)
    }

    pub fn set_slot(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.translations.insert(name.into(), value.into());
    }

    /// Same id, source and translations. Attributes and notes are envelope,
    /// not content, and do not participate.
    pub fn same_content(&self, other: &TransUnit) -> bool {
        self.id == other.id && self.source == other.source && self.translations == other.translations
    }
}

#[derive(Debug, Error)]
pub enum XliffError {
    /// The byte stream is not well-formed XML.
    #[error("malformed document: {0}")]
    MalformedDocument(String),
    /// Well-formed XML that is not an XLIFF document we understand.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error("{0}")]
    Other(String),
}
