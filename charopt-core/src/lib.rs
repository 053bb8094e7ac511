#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod error;
pub mod options;
pub mod source;

pub use cache::{FanOut, LoadStatus, SettingsCache, SettingsMap};
pub use error::{CacheError, Rejection, SourceError};
pub use source::{Descriptor, DescriptorIter, Keyed, SettingsParser, SettingsSource};
