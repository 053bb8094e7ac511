//! Collaborator contracts consumed by the settings cache.
//!
//! A [`SettingsSource`] enumerates raw descriptors from the built-in
//! catalog and from an override location. A [`SettingsParser`] turns
//! one descriptor into a settings object, or rejects it.

use crate::error::{Rejection, SourceError};
use compact_str::CompactString;
use std::fmt;
use std::path::{Path, PathBuf};

/// One raw settings definition, either held in memory or backed by a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    /// An in-memory definition, typically from the bundled catalog.
    Inline {
        origin: CompactString,
        contents: String,
    },
    /// A definition stored in a file the parser must read itself.
    File(PathBuf),
}

impl Descriptor {
    pub fn inline(origin: impl Into<CompactString>, contents: impl Into<String>) -> Self {
        Self::Inline {
            origin: origin.into(),
            contents: contents.into(),
        }
    }

    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }

    /// Human-readable origin used in diagnostics.
    pub fn origin(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::Inline { origin, .. } => write!(f, "built-in:{origin}"),
            Descriptor::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Lazily enumerated descriptors. An `Err` item aborts the enumeration.
pub type DescriptorIter<'a> = Box<dyn Iterator<Item = Result<Descriptor, SourceError>> + Send + 'a>;

/// A settings object that knows the key it is indexed under.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Enumerates raw descriptors.
///
/// Enumeration runs on the blocking pool, so implementations may touch
/// the filesystem directly.
pub trait SettingsSource: Send + Sync + 'static {
    /// Descriptors from the bundled catalog.
    fn built_in(&self) -> DescriptorIter<'_>;

    /// Descriptors layered on top of the catalog.
    ///
    /// Yields nothing when no override location exists.
    fn overrides(&self) -> DescriptorIter<'_>;
}

/// Turns descriptors into settings objects.
pub trait SettingsParser: Send + Sync + 'static {
    type Output: Keyed + Send + Sync + 'static;

    fn parse(&self, descriptor: &Descriptor) -> Result<Self::Output, Rejection>;

    /// Domain filter applied to successfully parsed objects.
    fn accepts(&self, _parsed: &Self::Output) -> bool {
        true
    }
}
