//! Character creation options.
//!
//! A `CharacterOptions` value describes one rule-set variant used when
//! building a character: which build method applies, how many points are
//! available, which sourcebooks are allowed, and optionally which
//! optional module it belongs to.

mod catalog;
mod parser;

pub use catalog::{BUILT_IN, CatalogSource};
pub use parser::OptionsParser;

use crate::source::Keyed;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a character's starting resources are allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildMethod {
    Priority,
    SumToTen,
    Karma,
    LifeModule,
}

impl fmt::Display for BuildMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildMethod::Priority => write!(f, "priority"),
            BuildMethod::SumToTen => write!(f, "sum to ten"),
            BuildMethod::Karma => write!(f, "karma"),
            BuildMethod::LifeModule => write!(f, "life module"),
        }
    }
}

/// One named set of character creation options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterOptions {
    /// Display name, also the cache key.
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub build_method: BuildMethod,
    /// Karma available at creation.
    pub build_karma: u32,
    /// Highest availability rating allowed for starting gear.
    #[serde(default = "default_max_availability")]
    pub max_availability: u32,
    /// Karma that may be converted into starting nuyen.
    #[serde(default = "default_max_nuyen_karma")]
    pub max_nuyen_karma: u32,
    /// Sourcebook codes whose content is enabled.
    #[serde(default = "default_books")]
    pub books: Vec<String>,
    /// Optional ruleset this entry belongs to. Entries for a module that
    /// is not enabled are ignored.
    #[serde(default)]
    pub module: Option<String>,
}

fn default_max_availability() -> u32 {
    12
}

fn default_max_nuyen_karma() -> u32 {
    10
}

fn default_books() -> Vec<String> {
    vec!["SR5".to_string()]
}

impl CharacterOptions {
    pub fn allows_book(&self, code: &str) -> bool {
        self.books.iter().any(|book| book.eq_ignore_ascii_case(code))
    }
}

impl Keyed for CharacterOptions {
    fn key(&self) -> &str {
        &self.name
    }
}
