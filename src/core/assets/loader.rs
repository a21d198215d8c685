//=========================================================================
// Asset Loader
//=========================================================================
//
// Turns every manifest entry into exactly one background fetch and
// exactly one terminal resolution.
//
// Architecture:
// ```text
//  Worker threads (one per entry):          Frame thread:
//  ┌──────────────────────────────┐        ┌───────────────────────────┐
//  │ Fetcher::fetch (+ retries)   │        │ AssetLoader::pump()       │
//  │   ↓                          │        │   ├─ put(name, handle)    │
//  │ persist to persist_dir/key   │        │   ├─ mark_completed()     │
//  │   ↓                          │        │   └─ per ReadinessPolicy  │
//  │ Decoder::decode(kind)        │        └───────────────────────────┘
//  │   ↓                          │                     ↑
//  │ LoadOutcome ─────────────────┼─────────────────────┘
//  └──────────────────────────────┘   completion queue (crossbeam)
// ```
//
// Completion order is arbitrary; only the aggregate count feeds the gate.
// In-flight fetches are never cancelled and, unless a timeout is set,
// a stalled request stalls readiness indefinitely.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use log::{debug, error, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::{AssetHandle, AssetKind, AssetStore, Decoder, Manifest, ManifestEntry, StandardDecoder};
use crate::core::config::{ReadinessPolicy, ShellConfig};
use crate::core::error::{AssetError, ConfigurationError};

//=== Progress ============================================================

/// Download progress snapshot. Purely observational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub received: u64,
    pub total: Option<u64>,
}

//=== Fetcher =============================================================

/// Retrieves the full body of a remote resource.
///
/// Called from loader worker threads; `on_progress` may fire zero or
/// many times before the call returns.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str, on_progress: &mut dyn FnMut(Progress)) -> Result<Vec<u8>, AssetError>;
}

//=== HttpFetcher =========================================================

/// Plain HTTP GET over `reqwest::blocking`. No body, no auth.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    timeout: Option<Duration>,
}

impl HttpFetcher {
    const USER_AGENT: &'static str = "LumenShell/0.1";
    const CHUNK_SIZE: usize = 16 * 1024;
    const MAX_PREALLOC: u64 = 8 * 1024 * 1024;

    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, on_progress: &mut dyn FnMut(Progress)) -> Result<Vec<u8>, AssetError> {
        let network = |status: Option<u16>, message: String| AssetError::Network {
            url: url.to_string(),
            status,
            message,
        };

        let client = reqwest::blocking::Client::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(self.timeout)
            .build()
            .map_err(|e| network(None, e.to_string()))?;

        let mut response = client
            .get(url)
            .send()
            .map_err(|e| network(e.status().map(|s| s.as_u16()), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(network(
                Some(status.as_u16()),
                status.canonical_reason().unwrap_or("unexpected status").to_string(),
            ));
        }

        let total = response.content_length();
        let mut body = Vec::with_capacity(total.unwrap_or(0).min(Self::MAX_PREALLOC) as usize);
        let mut chunk = vec![0u8; Self::CHUNK_SIZE];

        loop {
            let read = response
                .read(&mut chunk)
                .map_err(|e| network(Some(status.as_u16()), e.to_string()))?;
            if read == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..read]);
            on_progress(Progress {
                received: body.len() as u64,
                total,
            });
        }

        Ok(body)
    }
}

//=== LoadOutcome =========================================================

/// Terminal resolution of one manifest entry, posted by its worker.
#[derive(Debug)]
pub struct LoadOutcome {
    pub name: String,
    pub kind: AssetKind,
    pub result: Result<AssetHandle, AssetError>,
}

//=== AssetLoader =========================================================

/// Issues one fetch per manifest entry and feeds results into the store.
///
/// # Lifecycle
///
/// 1. `start()` - spawns all workers without waiting on any of them
/// 2. `pump()` - called once per loading tick, applies queued outcomes
/// 3. Workers exit after posting their outcome; nothing is cancelled
pub struct AssetLoader {
    fetcher: Arc<dyn Fetcher>,
    decoder: Arc<dyn Decoder>,
    policy: ReadinessPolicy,
    max_retries: u32,
    retry_delay: Duration,
    persist_dir: Option<PathBuf>,
    sender: Sender<LoadOutcome>,
    receiver: Receiver<LoadOutcome>,
    workers: Vec<(String, AssetKind, JoinHandle<()>)>,
    resolved: HashSet<String>,
    issued: usize,
}

impl AssetLoader {
    //--- Construction -----------------------------------------------------

    /// Creates a loader with explicit fetch and decode strategies and
    /// default policy settings.
    pub fn new(fetcher: Arc<dyn Fetcher>, decoder: Arc<dyn Decoder>) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            fetcher,
            decoder,
            policy: ReadinessPolicy::default(),
            max_retries: 0,
            retry_delay: Duration::ZERO,
            persist_dir: None,
            sender,
            receiver,
            workers: Vec::new(),
            resolved: HashSet::new(),
            issued: 0,
        }
    }

    /// HTTP fetching and standard decoding, configured from `config`.
    pub fn from_config(config: &ShellConfig) -> Self {
        Self::new(
            Arc::new(HttpFetcher::new(config.fetch_timeout)),
            Arc::new(StandardDecoder::new(config.font_px)),
        )
        .with_policy(config.readiness_policy)
        .with_retries(config.max_retries, config.retry_delay)
        .with_persist_dir(config.persist_dir.clone())
    }

    pub fn with_policy(mut self, policy: ReadinessPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_persist_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.persist_dir = dir;
        self
    }

    //--- Start ------------------------------------------------------------

    /// Spawns one worker per manifest entry.
    ///
    /// The store must already hold `manifest` (see [`AssetStore::register`]);
    /// loading can only be started once per store.
    pub fn start(&mut self, manifest: &Manifest, store: &AssetStore) -> Result<(), ConfigurationError> {
        store.begin_loading()?;
        info!(target: "assets::loader", "Fetching {} assets", manifest.len());

        for entry in manifest.entries() {
            self.spawn_worker(entry.clone());
        }
        Ok(())
    }

    fn spawn_worker(&mut self, entry: ManifestEntry) {
        let name = entry.key();
        let kind = entry.kind;
        self.issued += 1;

        let job = WorkerJob {
            entry,
            name: name.clone(),
            fetcher: Arc::clone(&self.fetcher),
            decoder: Arc::clone(&self.decoder),
            max_retries: self.max_retries,
            retry_delay: self.retry_delay,
            persist_dir: self.persist_dir.clone(),
            sender: self.sender.clone(),
        };

        let spawned = thread::Builder::new()
            .name(format!("asset-{name}"))
            .spawn(move || job.run());

        match spawned {
            Ok(handle) => self.workers.push((name, kind, handle)),
            Err(e) => {
                error!(target: "assets::loader", "Cannot spawn worker for '{}': {}", name, e);
                let _ = self.sender.send(LoadOutcome {
                    result: Err(AssetError::Network {
                        url: name.clone(),
                        status: None,
                        message: format!("worker spawn failed: {e}"),
                    }),
                    name,
                    kind,
                });
            }
        }
    }

    //--- Completion -------------------------------------------------------

    /// Applies every outcome queued so far. Never blocks.
    ///
    /// Returns the number of outcomes applied.
    pub fn pump(&mut self, store: &AssetStore) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.receiver.try_recv() {
            self.apply(outcome, store);
            applied += 1;
        }
        applied += self.reap_workers(store);
        applied
    }

    /// Blocks until every issued entry has resolved or `timeout` elapses.
    ///
    /// For headless drivers and tests; the frame loop only uses [`pump`].
    ///
    /// [`pump`]: Self::pump
    pub fn wait(&mut self, store: &AssetStore, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        let mut applied = self.pump(store);

        while self.pending() > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(outcome) => {
                    self.apply(outcome, store);
                    applied += 1;
                }
                Err(RecvTimeoutError::Timeout) => {
                    applied += self.reap_workers(store);
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
            applied += self.reap_workers(store);
        }
        applied
    }

    /// Entries issued but not yet resolved.
    pub fn pending(&self) -> usize {
        self.issued - self.resolved.len()
    }

    fn apply(&mut self, outcome: LoadOutcome, store: &AssetStore) {
        let LoadOutcome { name, kind, result } = outcome;
        if !self.resolved.insert(name.clone()) {
            warn!(target: "assets::loader", "Duplicate resolution for '{}' ignored", name);
            return;
        }

        match result {
            Ok(handle) => {
                info!(target: "assets::loader", "Loaded {:?} '{}'", kind, name);
                store.put(name, handle);
                store.mark_completed();
            }
            Err(err) => {
                store.record_failure();
                match (&err, self.policy) {
                    (AssetError::Network { .. }, ReadinessPolicy::Strict) => {
                        error!(
                            target: "assets::loader",
                            "{} ('{}' is not counted; the shell will stay in the loading state)",
                            err,
                            name
                        );
                    }
                    _ => {
                        warn!(target: "assets::loader", "{} ('{}' will be absent)", err, name);
                        store.mark_completed();
                    }
                }
            }
        }
    }

    /// Joins finished workers; a worker that died before posting its
    /// outcome is resolved as a decode failure so readiness cannot stall.
    fn reap_workers(&mut self, store: &AssetStore) -> usize {
        let mut applied = 0;
        let mut still_running = Vec::with_capacity(self.workers.len());

        for (name, kind, handle) in std::mem::take(&mut self.workers) {
            if !handle.is_finished() {
                still_running.push((name, kind, handle));
                continue;
            }

            // The outcome is sent before the worker returns
            while let Ok(outcome) = self.receiver.try_recv() {
                self.apply(outcome, store);
                applied += 1;
            }

            if handle.join().is_err() && !self.resolved.contains(&name) {
                error!(target: "assets::loader", "Worker for '{}' panicked", name);
                self.apply(
                    LoadOutcome {
                        result: Err(AssetError::Decode {
                            name: name.clone(),
                            kind,
                            message: "worker panicked".to_string(),
                        }),
                        name,
                        kind,
                    },
                    store,
                );
                applied += 1;
            }
        }

        self.workers = still_running;
        applied
    }
}

//=== WorkerJob ===========================================================

/// Everything a worker thread needs to resolve one entry.
struct WorkerJob {
    entry: ManifestEntry,
    name: String,
    fetcher: Arc<dyn Fetcher>,
    decoder: Arc<dyn Decoder>,
    max_retries: u32,
    retry_delay: Duration,
    persist_dir: Option<PathBuf>,
    sender: Sender<LoadOutcome>,
}

impl WorkerJob {
    fn run(self) {
        let result = self.resolve();
        let outcome = LoadOutcome {
            name: self.name.clone(),
            kind: self.entry.kind,
            result,
        };
        if self.sender.send(outcome).is_err() {
            debug!(target: "assets::loader", "Loader dropped, discarding '{}'", self.name);
        }
    }

    fn resolve(&self) -> Result<AssetHandle, AssetError> {
        let payload = self.fetch_with_retry()?;
        info!(
            target: "assets::loader",
            "Finished downloading {} bytes from URL {}",
            payload.len(),
            self.entry.location
        );

        if let Some(dir) = &self.persist_dir {
            if let Err(e) = persist(dir, &self.name, &payload) {
                warn!(target: "assets::loader", "{}; decoding from memory", e);
            }
        }

        self.decoder.decode(&self.name, self.entry.kind, &payload)
    }

    fn fetch_with_retry(&self) -> Result<Vec<u8>, AssetError> {
        let url = self.entry.location.as_str();
        let mut attempt = 0;

        loop {
            let mut log_progress = |p: Progress| match p.total {
                Some(total) if total > 0 => trace!(
                    target: "assets::loader",
                    "Downloading {}.. {:.2}% complete.",
                    url,
                    p.received as f64 * 100.0 / total as f64
                ),
                _ => trace!(
                    target: "assets::loader",
                    "Downloading {}.. {} bytes complete.",
                    url,
                    p.received
                ),
            };

            match self.fetcher.fetch(url, &mut log_progress) {
                Ok(payload) => return Ok(payload),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        target: "assets::loader",
                        "{} (retry {}/{})",
                        e,
                        attempt,
                        self.max_retries
                    );
                    thread::sleep(self.retry_delay);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Writes the raw payload next to its key inside `dir`.
fn persist(dir: &Path, name: &str, payload: &[u8]) -> Result<(), AssetError> {
    let path = dir.join(name);
    std::fs::create_dir_all(dir)
        .and_then(|()| std::fs::write(&path, payload))
        .map_err(|source| AssetError::Persist { path, source })
}

//=========================================================================
// Unit Tests
//=========================================================================
