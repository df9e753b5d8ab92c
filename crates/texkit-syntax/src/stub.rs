//! Persistable summaries of entry keys.
//!
//! A stub keeps just enough of a [`BibtexId`] to answer "which keys does this
//! file define, and where" without reparsing the source. Stubs are grouped per
//! file in [`FileStubs`] and serialized as JSON. Storing and querying them
//! across a project is left to the caller.

use rowan::{TextRange, TextSize};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ast::{BibtexFile, BibtexId};

#[derive(Debug, Error)]
pub enum StubError {
    #[error("malformed stub data: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("stub version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("unknown stub element type `{0}`")]
    UnknownElementType(String),
}

/// The persisted form of one entry key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdStub {
    pub identifier: String,
    pub start: u32,
    pub end: u32,
}

impl IdStub {
    pub fn new(identifier: impl Into<String>, range: TextRange) -> Self {
        Self {
            identifier: identifier.into(),
            start: range.start().into(),
            end: range.end().into(),
        }
    }

    /// Range of the key node in the source the stub was built from.
    pub fn range(&self) -> TextRange {
        TextRange::new(TextSize::from(self.start), TextSize::from(self.end.max(self.start)))
    }
}

/// Type descriptor for a kind of stub: a stable name plus the version of its
/// serialized layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StubElementType {
    pub name: String,
    pub version: u32,
}

impl StubElementType {
    pub const BIBTEX_ID: &'static str = "BIBTEX_ID";
    /// Bump whenever [`IdStub`] changes shape.
    pub const BIBTEX_ID_VERSION: u32 = 1;

    pub fn bibtex_id() -> Self {
        Self {
            name: Self::BIBTEX_ID.to_string(),
            version: Self::BIBTEX_ID_VERSION,
        }
    }

    pub fn create_stub(&self, id: &BibtexId) -> IdStub {
        IdStub::new(id.identifier(), id.text_range())
    }

    pub fn create_element(&self, stub: IdStub) -> BibtexId {
        BibtexId::from_stub(stub, self.clone())
    }
}

/// All id stubs of one `.bib` file, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStubs {
    pub element_type: StubElementType,
    pub stubs: Vec<IdStub>,
}

impl FileStubs {
    pub fn build(file: &BibtexFile) -> Self {
        let element_type = StubElementType::bibtex_id();
        let stubs = file.ids().map(|id| element_type.create_stub(&id)).collect();
        Self {
            element_type,
            stubs,
        }
    }

    pub fn to_json(&self) -> Result<String, StubError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decodes stubs written by [`to_json`](Self::to_json), rejecting data
    /// written for another element type or layout version.
    pub fn from_json(data: &str) -> Result<Self, StubError> {
        let stubs: Self = serde_json::from_str(data)?;
        if stubs.element_type.name != StubElementType::BIBTEX_ID {
            return Err(StubError::UnknownElementType(stubs.element_type.name));
        }
        if stubs.element_type.version != StubElementType::BIBTEX_ID_VERSION {
            return Err(StubError::VersionMismatch {
                expected: StubElementType::BIBTEX_ID_VERSION,
                found: stubs.element_type.version,
            });
        }
        Ok(stubs)
    }

    /// Stub-backed ids, one per stub.
    pub fn elements(&self) -> impl Iterator<Item = BibtexId> + '_ {
        self.stubs
            .iter()
            .cloned()
            .map(|stub| self.element_type.create_element(stub))
    }

    pub fn find(&self, identifier: &str) -> Option<BibtexId> {
        self.elements().find(|id| id.identifier() == identifier)
    }
}
