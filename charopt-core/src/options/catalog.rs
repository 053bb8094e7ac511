//! Bundled character options and the override directory.

use crate::error::SourceError;
use crate::source::{Descriptor, DescriptorIter, SettingsSource};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Built-in catalog as `(origin, toml)` pairs.
pub const BUILT_IN: &[(&str, &str)] = &[
    (
        "standard",
        r#"
name = "Standard"
description = "Priority build with the core rulebook."
build_method = "priority"
build_karma = 25
"#,
    ),
    (
        "street-level",
        r#"
name = "Street Level"
description = "Low-powered runners fresh off the street."
build_method = "priority"
build_karma = 13
max_availability = 10
max_nuyen_karma = 5
"#,
    ),
    (
        "prime-runner",
        r#"
name = "Prime Runner"
description = "Seasoned professionals with better gear."
build_method = "priority"
build_karma = 35
max_availability = 15
max_nuyen_karma = 25
books = ["SR5", "RG"]
"#,
    ),
    (
        "karma-build",
        r#"
name = "Karma Build"
description = "Point buy using karma for every choice."
build_method = "karma"
build_karma = 800
"#,
    ),
    (
        "life-modules",
        r#"
name = "Life Modules"
description = "Build a character from their life story."
build_method = "life_module"
build_karma = 750
books = ["SR5", "RF"]
module = "run-faster"
"#,
    ),
];

/// The bundled catalog plus an optional directory of `*.toml` overrides.
#[derive(Debug, Clone, Default)]
pub struct CatalogSource {
    overrides_dir: Option<PathBuf>,
}

impl CatalogSource {
    pub fn new(overrides_dir: Option<PathBuf>) -> Self {
        Self { overrides_dir }
    }

    pub fn overrides_dir(&self) -> Option<&Path> {
        self.overrides_dir.as_deref()
    }
}

impl SettingsSource for CatalogSource {
    fn built_in(&self) -> DescriptorIter<'_> {
        Box::new(
            BUILT_IN
                .iter()
                .map(|(origin, contents)| Ok(Descriptor::inline(*origin, *contents))),
        )
    }

    /// Override files in file-name order.
    ///
    /// An unreadable directory entry ends the listing with an error after
    /// the files collected so far.
    fn overrides(&self) -> DescriptorIter<'_> {
        let Some(dir) = &self.overrides_dir else {
            return Box::new(std::iter::empty());
        };

        let io_error = |source| SourceError::Io {
            path: dir.clone(),
            source,
        };

        let listing = match fs::read_dir(dir) {
            Ok(listing) => listing,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(dir = %dir.display(), "override directory does not exist");
                return Box::new(std::iter::empty());
            }
            Err(e) => return Box::new(std::iter::once(Err(io_error(e)))),
        };

        let mut files = Vec::new();
        let mut fault = None;
        for entry in listing {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.extension().is_some_and(|ext| ext == "toml") && path.is_file() {
                        files.push(path);
                    }
                }
                Err(e) => {
                    fault = Some(io_error(e));
                    break;
                }
            }
        }
        files.sort();

        debug!(dir = %dir.display(), files = files.len(), "listed override files");
        Box::new(
            files
                .into_iter()
                .map(|path| Ok(Descriptor::File(path)))
                .chain(fault.map(Err)),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::options::OptionsParser;
    use crate::source::{Keyed, SettingsParser};
    use std::collections::HashSet;

    #[test]
    fn test_built_in_catalog_parses() {
        let parser = OptionsParser::default();
        let keys: HashSet<String> = CatalogSource::default()
            .built_in()
            .map(|item| parser.parse(&item.unwrap()).unwrap().key().to_string())
            .collect();

        assert_eq!(keys.len(), BUILT_IN.len());
        assert!(keys.contains("Standard"));
        assert!(keys.contains("Life Modules"));
    }

    #[test]
    fn test_missing_override_dir_is_empty() {
        assert_eq!(CatalogSource::new(None).overrides().count(), 0);

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not-here");
        assert_eq!(CatalogSource::new(Some(missing)).overrides().count(), 0);
    }

    #[test]
    fn test_overrides_only_list_toml_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.toml"), "").unwrap();
        fs::write(dir.path().join("a.toml"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("nested.toml")).unwrap();

        let source = CatalogSource::new(Some(dir.path().to_path_buf()));
        let files: Vec<Descriptor> = source.overrides().map(Result::unwrap).collect();

        assert_eq!(
            files,
            vec![
                Descriptor::file(dir.path().join("a.toml")),
                Descriptor::file(dir.path().join("b.toml")),
            ]
        );
    }

    #[test]
    fn test_override_dir_that_is_a_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("settings");
        fs::write(&file, "").unwrap();

        let source = CatalogSource::new(Some(file));
        let mut items = source.overrides();
        assert!(matches!(items.next(), Some(Err(SourceError::Io { .. }))));
        assert!(items.next().is_none());
    }
}
