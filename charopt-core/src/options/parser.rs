//! TOML parser for character options.

use super::CharacterOptions;
use crate::error::Rejection;
use crate::source::{Descriptor, SettingsParser};
use std::borrow::Cow;
use std::collections::HashSet;

/// Parses [`CharacterOptions`] from TOML and filters out entries that
/// belong to a module which is not enabled.
#[derive(Debug, Clone, Default)]
pub struct OptionsParser {
    enabled_modules: HashSet<String>,
}

impl OptionsParser {
    pub fn new<I, M>(enabled_modules: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        Self {
            enabled_modules: enabled_modules.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_module_enabled(&self, module: &str) -> bool {
        self.enabled_modules.contains(module)
    }
}

impl SettingsParser for OptionsParser {
    type Output = CharacterOptions;

    fn parse(&self, descriptor: &Descriptor) -> Result<CharacterOptions, Rejection> {
        let text = match descriptor {
            Descriptor::Inline { contents, .. } => Cow::Borrowed(contents.as_str()),
            Descriptor::File(path) => {
                Cow::Owned(std::fs::read_to_string(path).map_err(|source| {
                    Rejection::Unreadable {
                        origin: descriptor.origin(),
                        source,
                    }
                })?)
            }
        };

        let options: CharacterOptions =
            toml::from_str(&text).map_err(|e| Rejection::Malformed {
                origin: descriptor.origin(),
                message: e.to_string(),
            })?;

        if options.name.trim().is_empty() {
            return Err(Rejection::Malformed {
                origin: descriptor.origin(),
                message: "name must not be empty".to_string(),
            });
        }

        Ok(options)
    }

    fn accepts(&self, parsed: &CharacterOptions) -> bool {
        parsed
            .module
            .as_deref()
            .is_none_or(|module| self.is_module_enabled(module))
    }
}
