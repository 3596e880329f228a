//! Cache Proxy Core
//!
//! The interception policy and version lifecycle over the durable cache.
//! Cache-first is deliberate: the manifest is static build output, so
//! revalidation against the network is pure overhead until a new version
//! activates and reseeds.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{GovernorError, Result};
use crate::proxy::fetch::is_read;
use crate::proxy::{CacheStorage, Fetch, FetchRequest, FetchResponse, LifecycleState};

// == Proxy Stats ==
/// Counters for how intercepted requests were resolved.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProxyStats {
    /// Requests served straight from the durable cache
    pub cache_hits: u64,
    /// Requests that went to the network
    pub network_fetches: u64,
    /// Requests passed through untouched (non-GET or excluded URL)
    pub passthroughs: u64,
    /// Navigations rescued by the cached root document while offline
    pub offline_fallbacks: u64,
}

// == Cache Proxy ==
/// Versioned cache-first proxy at the outbound request boundary.
///
/// Generic over its two seams: the durable cache and the fetch
/// primitive. Exactly one cache generation (named by `version`) is
/// current; activation deletes every other generation.
#[derive(Debug)]
pub struct CacheProxy<S: CacheStorage, F: Fetch> {
    /// Current cache generation name, fixed at build/deploy time
    version: String,
    /// Static resource identifiers seeded at install (the app shell)
    manifest: Vec<String>,
    /// URL substrings that must never be cached
    exclusions: Vec<String>,
    /// Cached document served to navigations when the network is down
    root_document: String,
    state: LifecycleState,
    storage: S,
    fetcher: F,
    stats: ProxyStats,
}

impl<S: CacheStorage, F: Fetch> CacheProxy<S, F> {
    // == Constructor ==
    /// Creates an uninstalled proxy instance.
    ///
    /// # Arguments
    /// * `version` - Name of the cache generation this instance owns
    /// * `manifest` - Shell resources to seed during install
    /// * `exclusions` - URL markers that bypass the cache entirely
    /// * `root_document` - Offline fallback target for navigations
    pub fn new(
        version: impl Into<String>,
        manifest: Vec<String>,
        exclusions: Vec<String>,
        root_document: impl Into<String>,
        storage: S,
        fetcher: F,
    ) -> Self {
        Self {
            version: version.into(),
            manifest,
            exclusions,
            root_document: root_document.into(),
            state: LifecycleState::Uninstalled,
            storage,
            fetcher,
            stats: ProxyStats::default(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Current cache generation name.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Resolution counters.
    pub fn stats(&self) -> ProxyStats {
        self.stats.clone()
    }

    /// The durable cache, for diagnostics.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    // == Install ==
    /// Seeds the current generation with the full manifest.
    ///
    /// All-or-nothing: every resource is fetched first, and any failure
    /// (including a non-200) aborts the step with nothing written, so a
    /// partially-seeded shell can never be observed. The error propagates
    /// so the host retries installation.
    pub async fn install(&mut self) -> Result<()> {
        if self.state != LifecycleState::Uninstalled {
            return Err(GovernorError::Lifecycle(format!(
                "install invalid from state {:?}",
                self.state
            )));
        }

        let mut seeded = Vec::with_capacity(self.manifest.len());
        for url in self.manifest.clone() {
            let response = self
                .fetcher
                .fetch(&FetchRequest::get(&url))
                .await
                .map_err(|err| GovernorError::InstallFailed(err.to_string()))?;

            if response.status != 200 {
                return Err(GovernorError::InstallFailed(format!(
                    "manifest resource {} returned status {}",
                    url, response.status
                )));
            }
            seeded.push((url, response));
        }

        self.storage.open(&self.version);
        self.storage.put_all(&self.version, seeded);

        // Ready to take over immediately; no graceful handoff delay
        self.state = LifecycleState::Installed;
        info!(
            "proxy install complete: {} resources seeded into '{}'",
            self.manifest.len(),
            self.version
        );
        Ok(())
    }

    // == Activate ==
    /// Takes control: deletes every generation other than the current
    /// one, then starts intercepting in-flight requests immediately.
    pub fn activate(&mut self) -> Result<()> {
        if self.state != LifecycleState::Installed {
            return Err(GovernorError::Lifecycle(format!(
                "activate invalid from state {:?}",
                self.state
            )));
        }

        for name in self.storage.list_names() {
            if name != self.version {
                self.storage.delete(&name);
                info!("proxy activate: deleted stale cache generation '{}'", name);
            }
        }

        self.state = LifecycleState::Active;
        Ok(())
    }

    fn is_excluded(&self, url: &str) -> bool {
        self.exclusions.iter().any(|marker| url.contains(marker))
    }

    // == Handle Fetch ==
    /// Applies the interception policy to one outbound request.
    ///
    /// Non-GET methods and excluded URLs pass through untouched. Everything
    /// else is served cache-first; misses go to the network, and only
    /// successful same-origin responses are duplicated into the cache.
    /// When the network fails on a navigation, the cached root document is
    /// served if present; otherwise the failure propagates.
    pub async fn handle(&mut self, request: &FetchRequest) -> Result<FetchResponse> {
        // Before activation this instance does not intercept at all
        if !self.state.is_active() {
            self.stats.passthroughs += 1;
            return self.fetcher.fetch(request).await;
        }

        if !is_read(&request.method) || self.is_excluded(&request.url) {
            self.stats.passthroughs += 1;
            return self.fetcher.fetch(request).await;
        }

        if let Some(cached) = self.storage.match_url(&self.version, &request.url) {
            debug!("proxy: cache hit for {}", request.url);
            self.stats.cache_hits += 1;
            return Ok(cached);
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                self.stats.network_fetches += 1;
                if response.is_cacheable() {
                    // The body was read once by the fetcher; the cache
                    // takes a duplicate and the original goes back to the
                    // caller. Concurrent misses may both write; the later
                    // equivalent response simply wins.
                    self.storage.put(&self.version, &request.url, response.clone());
                }
                Ok(response)
            }
            Err(err) if request.is_navigation => {
                match self.storage.match_url(&self.version, &self.root_document) {
                    Some(fallback) => {
                        warn!(
                            "proxy: network down for navigation {}, serving cached {}",
                            request.url, self.root_document
                        );
                        self.stats.offline_fallbacks += 1;
                        Ok(fallback)
                    }
                    None => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }
}
