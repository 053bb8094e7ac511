//! Single-flight population of the settings cache.
//!
//! The population runs in two phases, built-in descriptors first and
//! override descriptors second. Each phase enumerates its source on the
//! blocking pool, then fans out one parse job per descriptor there too, and completes only after every job
//! it spawned has finished. Accepted results are inserted with
//! first-writer-wins semantics, so on a key shared by a built-in and an
//! override the built-in is kept.

use super::snapshot::SettingsMap;
use super::status::{LoadStatus, StatusCell};
use crate::error::{CacheError, SourceError};
use crate::source::{Descriptor, Keyed, SettingsParser, SettingsSource};
use compact_str::CompactString;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

type Entries<T> = DashMap<CompactString, Arc<T>>;

/// How parse jobs within one phase are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FanOut {
    /// Parse every descriptor of a phase concurrently.
    #[default]
    Parallel,
    /// Parse descriptors one at a time in enumeration order.
    Sequential,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    BuiltIn,
    Overrides,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::BuiltIn => write!(f, "built-in"),
            Phase::Overrides => write!(f, "overrides"),
        }
    }
}

/// A lazily populated mapping from settings key to settings object.
///
/// Cloning is cheap and every clone shares the same state. Construct
/// one per application (or per test) and hand clones to the callers.
pub struct SettingsCache<S, P: SettingsParser> {
    inner: Arc<Inner<S, P>>,
}

struct Inner<S, P: SettingsParser> {
    source: Arc<S>,
    parser: Arc<P>,
    fan_out: FanOut,
    entries: Arc<Entries<P::Output>>,
    status: StatusCell<P::Output>,
}

impl<S, P> SettingsCache<S, P>
where
    S: SettingsSource,
    P: SettingsParser,
{
    pub fn new(source: S, parser: P) -> Self {
        Self::with_fan_out(source, parser, FanOut::default())
    }

    pub fn with_fan_out(source: S, parser: P, fan_out: FanOut) -> Self {
        Self {
            inner: Arc::new(Inner {
                source: Arc::new(source),
                parser: Arc::new(parser),
                fan_out,
                entries: Arc::new(DashMap::new()),
                status: StatusCell::new(),
            }),
        }
    }

    /// Return the fully populated mapping, building it on first use.
    ///
    /// The first caller claims the population and every caller waits for
    /// it to finish. If the population faults, only the claiming call
    /// returns the error. The cache still becomes ready, and every other
    /// caller receives the entries inserted before the fault.
    pub async fn all(&self) -> Result<Arc<SettingsMap<P::Output>>, CacheError> {
        if self.inner.status.claim() {
            debug!("claimed settings population");
            // Run detached so cancelling this call cannot interrupt the build.
            let inner = Arc::clone(&self.inner);
            let outcome = tokio::spawn(async move { inner.populate().await })
                .await
                .map_err(CacheError::from)
                .and_then(|result| result);

            if let Err(err) = outcome {
                let kept = self.inner.status.ready().map_or(0, |map| map.len());
                warn!(
                    error = %err,
                    entries = kept,
                    "settings population failed, serving partial cache"
                );
                return Err(err);
            }
        }

        self.inner.status.wait_ready().await
    }

    /// The mapping if it is already populated, without waiting.
    pub fn try_get(&self) -> Option<Arc<SettingsMap<P::Output>>> {
        self.inner.status.ready()
    }

    pub fn status(&self) -> LoadStatus {
        self.inner.status.status()
    }
}

impl<S, P: SettingsParser> Clone for SettingsCache<S, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Publishes the snapshot on drop, whichever way the population exits.
struct ReadyGuard<'a, S, P: SettingsParser> {
    inner: &'a Inner<S, P>,
}

impl<S, P: SettingsParser> Drop for ReadyGuard<'_, S, P> {
    fn drop(&mut self) {
        self.inner
            .status
            .publish(SettingsMap::freeze(&self.inner.entries));
    }
}

impl<S, P> Inner<S, P>
where
    S: SettingsSource,
    P: SettingsParser,
{
    async fn populate(&self) -> Result<(), CacheError> {
        let _ready = ReadyGuard { inner: self };
        let started = Instant::now();
        self.entries.clear();

        self.run_phase(Phase::BuiltIn).await?;
        self.run_phase(Phase::Overrides).await?;

        info!(
            entries = self.entries.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "settings cache populated"
        );
        Ok(())
    }

    /// Parse every descriptor of one phase.
    ///
    /// A source error or panic stops the enumeration. Descriptors listed
    /// before it are still parsed and awaited, so their entries land
    /// before the snapshot is taken.
    async fn run_phase(&self, phase: Phase) -> Result<(), CacheError> {
        let (descriptors, mut fault) = self.enumerate(phase).await?;
        let mut jobs = JoinSet::new();
        let mut spawned = 0usize;

        for descriptor in descriptors {
            spawned += 1;
            jobs.spawn_blocking(parse_job(
                Arc::clone(&self.parser),
                Arc::clone(&self.entries),
                descriptor,
            ));

            if self.fan_out == FanOut::Sequential {
                if let Some(err) = drain(&mut jobs).await {
                    fault = Some(err);
                    break;
                }
            }
        }

        if let Some(err) = drain(&mut jobs).await {
            fault.get_or_insert(err);
        }

        debug!(%phase, descriptors = spawned, "settings phase finished");
        match fault {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// List the descriptors of one phase on the blocking pool.
    ///
    /// Returns the descriptors yielded before any fault, and the fault.
    async fn enumerate(
        &self,
        phase: Phase,
    ) -> Result<(Vec<Descriptor>, Option<CacheError>), CacheError> {
        let source = Arc::clone(&self.source);
        let listed = tokio::task::spawn_blocking(move || {
            let mut descriptors = Vec::new();
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                let items = match phase {
                    Phase::BuiltIn => source.built_in(),
                    Phase::Overrides => source.overrides(),
                };
                for item in items {
                    descriptors.push(item?);
                }
                Ok::<(), SourceError>(())
            }));
            let fault = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(err)) => Some(CacheError::Source(err)),
                Err(_) => Some(CacheError::SourcePanicked {
                    phase: phase.to_string(),
                }),
            };
            (descriptors, fault)
        })
        .await?;
        Ok(listed)
    }
}

fn parse_job<P: SettingsParser>(
    parser: Arc<P>,
    entries: Arc<Entries<P::Output>>,
    descriptor: Descriptor,
) -> impl FnOnce() -> Result<(), CacheError> + Send + 'static {
    move || {
        panic::catch_unwind(AssertUnwindSafe(|| {
            insert_parsed(parser.as_ref(), &entries, &descriptor)
        }))
        .map_err(|_| CacheError::ParserPanicked {
            origin: descriptor.origin(),
        })
    }
}

fn insert_parsed<P: SettingsParser>(
    parser: &P,
    entries: &Entries<P::Output>,
    descriptor: &Descriptor,
) {
    let parsed = match parser.parse(descriptor) {
        Ok(parsed) => parsed,
        Err(rejection) => {
            debug!(%rejection, "skipping settings descriptor");
            return;
        }
    };

    if !parser.accepts(&parsed) {
        debug!(origin = %descriptor, key = parsed.key(), "settings filtered out");
        return;
    }

    // First writer wins, later duplicates are dropped.
    if let Entry::Vacant(slot) = entries.entry(CompactString::from(parsed.key())) {
        slot.insert(Arc::new(parsed));
    }
}

/// Await every job in the set and return the first failure.
async fn drain(jobs: &mut JoinSet<Result<(), CacheError>>) -> Option<CacheError> {
    let mut first = None;
    while let Some(joined) = jobs.join_next().await {
        if let Err(err) = joined.map_err(CacheError::from).and_then(|result| result) {
            first.get_or_insert(err);
        }
    }
    first
}
