//! Company search orchestration.
//!
//! One orchestrator owns the whole search screen: the result list, place
//! suggestions for the location field, the map viewport and the filter
//! sheet. Cancellation works the same way in every lane: starting new work
//! aborts the previous task and bumps a generation counter, and every state
//! write re-checks its generation under the lock, so a slow response that
//! slips past the abort still cannot overwrite newer results.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::sleep;

use svchub_core::filters::{DEFAULT_CENTER, DEFAULT_RADIUS_KM};
use svchub_core::geo::{snap_radius_kilometers, Coordinate, MapRegion};
use svchub_core::models::{group_catalog_items, CatalogCategory, CompanySummary, Envelope, Place};
use svchub_core::prelude::*;
use svchub_core::SearchFilters;

use crate::config::{Tuning, DEFAULT_MAP_SPAN_DEGREES};
use crate::gateway::Gateway;
use crate::session::{ExpiryPolicy, SessionStore};
use crate::state::StateCell;

const SEARCH_FAILED_FALLBACK: &str = "Unable to load companies.";
const CATALOGS_FAILED_FALLBACK: &str = "Unable to load service filters.";

/// Viewport shown before any location is known.
pub fn default_map_region() -> MapRegion {
    MapRegion::new(
        DEFAULT_CENTER,
        DEFAULT_MAP_SPAN_DEGREES,
        DEFAULT_MAP_SPAN_DEGREES,
    )
}

/// Everything the search screen renders.
#[derive(Debug, Clone)]
pub struct SearchSnapshot {
    pub companies: Vec<CompanySummary>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Free-text contents of the location field, echoed back to the UI.
    pub location_query: String,
    pub suggestions: Vec<Place>,
    pub map_region: MapRegion,
    pub radius_kilometers: f64,
    pub catalog_categories: Vec<CatalogCategory>,
    pub is_loading_catalogs: bool,
    pub catalog_error: Option<String>,
}

impl Default for SearchSnapshot {
    fn default() -> Self {
        Self {
            companies: Vec::new(),
            is_loading: false,
            error: None,
            location_query: String::new(),
            suggestions: Vec::new(),
            map_region: default_map_region(),
            radius_kilometers: DEFAULT_RADIUS_KM,
            catalog_categories: Vec::new(),
            is_loading_catalogs: false,
            catalog_error: None,
        }
    }
}

/// One cancellation lane per concern. Lanes are independent: a new search
/// never cancels a pending suggestion fetch and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lane {
    Search,
    Suggest,
    MapPan,
}

struct SearchGuard {
    filters: SearchFilters,
    search_text: String,
    minimum_rating: i32,
    selected_services: BTreeSet<String>,
    radius_kilometers: f64,
    user_pinned: bool,
    last_automatic_coordinate: Option<Coordinate>,
    /// Last region we put on screen ourselves; used to tell user pans from
    /// programmatic echoes.
    observed_region: MapRegion,
    has_loaded_initial: bool,
    catalogs_inflight: bool,
    search_generation: u64,
    suggest_generation: u64,
    map_generation: u64,
    search_task: Option<AbortHandle>,
    suggest_task: Option<AbortHandle>,
    map_task: Option<AbortHandle>,
}

impl Default for SearchGuard {
    fn default() -> Self {
        Self {
            filters: SearchFilters::default(),
            search_text: String::new(),
            minimum_rating: 0,
            selected_services: BTreeSet::new(),
            radius_kilometers: DEFAULT_RADIUS_KM,
            user_pinned: false,
            last_automatic_coordinate: None,
            observed_region: default_map_region(),
            has_loaded_initial: false,
            catalogs_inflight: false,
            search_generation: 0,
            suggest_generation: 0,
            map_generation: 0,
            search_task: None,
            suggest_task: None,
            map_task: None,
        }
    }
}

pub struct SearchOrchestrator<G> {
    inner: Arc<SearchInner<G>>,
}

impl<G> Clone for SearchOrchestrator<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct SearchInner<G> {
    gateway: G,
    store: SessionStore,
    policy: ExpiryPolicy,
    tuning: Tuning,
    state: StateCell<SearchSnapshot>,
    guard: Mutex<SearchGuard>,
}

impl<G: Gateway + Send + Sync + 'static> SearchOrchestrator<G> {
    pub fn new(gateway: G, store: SessionStore, policy: ExpiryPolicy) -> Self {
        Self::with_tuning(gateway, store, policy, Tuning::default())
    }

    pub fn with_tuning(
        gateway: G,
        store: SessionStore,
        policy: ExpiryPolicy,
        tuning: Tuning,
    ) -> Self {
        Self {
            inner: Arc::new(SearchInner {
                gateway,
                store,
                policy,
                tuning,
                state: StateCell::new(SearchSnapshot::default()),
                guard: Mutex::new(SearchGuard::default()),
            }),
        }
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.inner.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.inner.state.subscribe()
    }

    pub fn current_filters(&self) -> SearchFilters {
        self.inner.lock().filters.clone()
    }

    pub fn is_user_pinned(&self) -> bool {
        self.inner.lock().user_pinned
    }

    // ─────────────────────────────────────────────────────────
    // Filter inputs
    // ─────────────────────────────────────────────────────────

    pub fn set_search_text(&self, text: impl Into<String>) {
        self.inner.lock().search_text = text.into();
    }

    pub fn set_minimum_rating(&self, rating: i32) {
        self.inner.lock().minimum_rating = rating.clamp(0, 5);
    }

    pub fn set_selected_services(&self, services: BTreeSet<String>) {
        self.inner.lock().selected_services = services;
    }

    pub fn toggle_service(&self, name: &str) {
        let mut guard = self.inner.lock();
        if !guard.selected_services.remove(name) {
            guard.selected_services.insert(name.to_string());
        }
    }

    pub fn set_radius_kilometers(&self, kilometers: f64) {
        let kilometers = snap_radius_kilometers(kilometers);
        self.inner.lock().radius_kilometers = kilometers;
        self.inner.state.update(|s| s.radius_kilometers = kilometers);
    }

    pub fn clear_filters(&self) {
        let mut guard = self.inner.lock();
        guard.search_text.clear();
        guard.minimum_rating = 0;
        guard.selected_services.clear();
    }

    // ─────────────────────────────────────────────────────────
    // Company search
    // ─────────────────────────────────────────────────────────

    /// Run a search once on first use; later calls are no-ops.
    pub async fn load_initial_results(&self) {
        {
            let mut guard = self.inner.lock();
            if guard.has_loaded_initial {
                return;
            }
            guard.has_loaded_initial = true;
        }
        self.search().await;
    }

    /// Cancel any in-flight search and run a new one with the current
    /// filter inputs.
    pub async fn search(&self) {
        let _ = self.inner.spawn_search().await;
    }

    /// Fire-and-forget variant of [`search`](Self::search).
    pub fn start_search(&self) -> JoinHandle<()> {
        self.inner.spawn_search()
    }

    // ─────────────────────────────────────────────────────────
    // Location field
    // ─────────────────────────────────────────────────────────

    /// Record a keystroke in the location field. Queries shorter than the
    /// suggestion threshold clear the list without a network call; longer
    /// ones fetch suggestions after the debounce window.
    pub fn update_location_query(&self, query: &str) -> Option<JoinHandle<()>> {
        self.inner.spawn_suggestions(query.to_string())
    }

    /// Commit to a suggested place: pin the location, recenter the map and
    /// re-run the search.
    pub async fn select_place(&self, place: &Place) {
        let coordinate = place.coordinate();
        let label = place.label();
        {
            let mut guard = self.inner.lock();
            if let Some(task) = guard.suggest_task.take() {
                task.abort();
            }
            guard.suggest_generation += 1;
            guard.user_pinned = true;
            guard.filters.update_center(coordinate);
            let region = guard.observed_region.recentered(coordinate);
            guard.observed_region = region;
            self.inner.state.update(move |s| {
                s.location_query = label;
                s.suggestions.clear();
                s.map_region = region;
            });
        }
        self.search().await;
    }

    /// Apply a device-location fix. Ignored while the user has pinned a
    /// location, and below the noise threshold relative to the last fix;
    /// returns the search task spawned for an accepted fix.
    pub fn update_user_location(&self, coordinate: Coordinate) -> Option<JoinHandle<()>> {
        {
            let mut guard = self.inner.lock();
            if guard.user_pinned {
                return None;
            }
            if let Some(last) = guard.last_automatic_coordinate {
                if last.delta(coordinate) <= self.inner.tuning.location_noise_threshold {
                    return None;
                }
            }
            guard.last_automatic_coordinate = Some(coordinate);
            guard.filters.update_center(coordinate);
            guard.has_loaded_initial = true;
            let region = guard.observed_region.recentered(coordinate);
            guard.observed_region = region;
            self.inner.state.update(move |s| s.map_region = region);
        }
        Some(self.inner.spawn_search())
    }

    /// Drop the pin, return to the default center and re-run the search.
    pub async fn reset_to_default_location(&self) {
        {
            let mut guard = self.inner.lock();
            if let Some(task) = guard.suggest_task.take() {
                task.abort();
            }
            guard.suggest_generation += 1;
            guard.user_pinned = false;
            guard.filters.update_center(DEFAULT_CENTER);
            let region = default_map_region();
            guard.observed_region = region;
            self.inner.state.update(move |s| {
                s.location_query.clear();
                s.suggestions.clear();
                s.map_region = region;
            });
        }
        self.search().await;
    }

    // ─────────────────────────────────────────────────────────
    // Map viewport
    // ─────────────────────────────────────────────────────────

    /// React to a map viewport change. Deltas at or below the epsilon are
    /// echoes of our own recentering and are ignored; real pans pin the
    /// location and, after the debounce window, recenter the filters,
    /// derive a radius from the zoom level and re-run the search.
    pub fn handle_region_change(&self, region: MapRegion) -> Option<JoinHandle<()>> {
        self.inner.spawn_region_change(region)
    }

    // ─────────────────────────────────────────────────────────
    // Service catalog
    // ─────────────────────────────────────────────────────────

    /// Fetch the catalog once; cached for the lifetime of the orchestrator.
    pub async fn load_catalogs_if_needed(&self) {
        let already_loaded = self.inner.state.read(|s| !s.catalog_categories.is_empty());
        if already_loaded {
            return;
        }
        self.inner.fetch_catalogs().await;
    }

    pub async fn refresh_catalogs(&self) {
        self.inner.fetch_catalogs().await;
    }
}

impl<G: Gateway + Send + Sync + 'static> SearchInner<G> {
    fn lock(&self) -> MutexGuard<'_, SearchGuard> {
        match self.guard.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lane_generation(guard: &SearchGuard, lane: Lane) -> u64 {
        match lane {
            Lane::Search => guard.search_generation,
            Lane::Suggest => guard.suggest_generation,
            Lane::MapPan => guard.map_generation,
        }
    }

    fn lane_is_current(&self, lane: Lane, generation: u64) -> bool {
        Self::lane_generation(&self.lock(), lane) == generation
    }

    /// Apply a state change only if `generation` is still the latest for
    /// its lane. Returns false when the work was superseded.
    fn commit(
        &self,
        lane: Lane,
        generation: u64,
        apply: impl FnOnce(&mut SearchSnapshot),
    ) -> bool {
        let guard = self.lock();
        if Self::lane_generation(&guard, lane) != generation {
            return false;
        }
        self.state.update(apply);
        true
    }

    fn spawn_search(self: &Arc<Self>) -> JoinHandle<()> {
        let generation = {
            let mut guard = self.lock();
            if let Some(task) = guard.search_task.take() {
                task.abort();
            }
            guard.search_generation += 1;
            guard.filters.search_text = guard.search_text.trim().to_string();
            guard.filters.minimum_rating = guard.minimum_rating;
            guard.filters.catalog_items = guard.selected_services.iter().cloned().collect();
            let radius_kilometers = guard.radius_kilometers;
            guard.filters.set_radius_kilometers(radius_kilometers);
            guard.search_generation
        };
        let inner = Arc::clone(self);
        let handle = tokio::spawn(async move { inner.run_search(generation).await });
        self.lock().search_task = Some(handle.abort_handle());
        handle
    }

    async fn run_search(self: Arc<Self>, generation: u64) {
        let filters = { self.lock().filters.clone() };
        if !self.commit(Lane::Search, generation, |s| {
            s.is_loading = true;
            s.error = None;
        }) {
            return;
        }

        let token = self.store.token();
        let outcome = self.gateway.search_companies(token.as_deref(), &filters).await;
        if let Ok(envelope) = &outcome {
            self.store.absorb(envelope);
        }
        if let Some(message) = self.policy.intercept(&outcome) {
            self.commit(Lane::Search, generation, move |s| {
                s.is_loading = false;
                s.companies.clear();
                s.error = Some(message);
            });
            return;
        }

        match outcome {
            Ok(envelope) if envelope.did_succeed() => {
                let companies = envelope.companies().to_vec();
                debug!(count = companies.len(), "company search completed");
                self.commit(Lane::Search, generation, move |s| {
                    s.is_loading = false;
                    s.error = None;
                    s.companies = companies;
                });
            }
            Ok(envelope) => {
                let message = envelope
                    .description()
                    .unwrap_or(SEARCH_FAILED_FALLBACK)
                    .to_string();
                self.commit(Lane::Search, generation, move |s| {
                    s.is_loading = false;
                    s.companies.clear();
                    s.error = Some(message);
                });
            }
            Err(err) => {
                warn!("company search failed: {err}");
                let message = err.to_string();
                self.commit(Lane::Search, generation, move |s| {
                    s.is_loading = false;
                    s.companies.clear();
                    s.error = Some(message);
                });
            }
        }
    }

    fn spawn_suggestions(self: &Arc<Self>, query: String) -> Option<JoinHandle<()>> {
        let trimmed = query.trim().to_string();
        let generation = {
            let mut guard = self.lock();
            if let Some(task) = guard.suggest_task.take() {
                task.abort();
            }
            guard.suggest_generation += 1;
            guard.suggest_generation
        };
        self.state.update(move |s| s.location_query = query);

        if trimmed.chars().count() < self.tuning.suggestion_min_chars {
            self.state.update(|s| s.suggestions.clear());
            return None;
        }

        let inner = Arc::clone(self);
        let handle = tokio::spawn(async move { inner.run_suggestions(generation, trimmed).await });
        self.lock().suggest_task = Some(handle.abort_handle());
        Some(handle)
    }

    async fn run_suggestions(self: Arc<Self>, generation: u64, query: String) {
        sleep(self.tuning.debounce).await;
        if !self.lane_is_current(Lane::Suggest, generation) {
            return;
        }

        let token = self.store.token();
        match self.gateway.find_places(token.as_deref(), &query).await {
            Ok(response) => {
                self.store.absorb(&response);
                let mut places = response.places;
                places.truncate(self.tuning.max_suggestions);
                self.commit(Lane::Suggest, generation, move |s| s.suggestions = places);
            }
            Err(err) => {
                debug!("place lookup failed: {err}");
                self.commit(Lane::Suggest, generation, |s| s.suggestions.clear());
            }
        }
    }

    fn spawn_region_change(self: &Arc<Self>, region: MapRegion) -> Option<JoinHandle<()>> {
        let generation = {
            let mut guard = self.lock();
            let epsilon = self.tuning.region_epsilon;
            if region.center_delta(&guard.observed_region) <= epsilon
                && region.span_delta(&guard.observed_region) <= epsilon
            {
                return None;
            }
            guard.observed_region = region;
            guard.user_pinned = true;
            if let Some(task) = guard.map_task.take() {
                task.abort();
            }
            guard.map_generation += 1;
            guard.map_generation
        };
        let inner = Arc::clone(self);
        let handle = tokio::spawn(async move { inner.run_region_change(generation, region).await });
        self.lock().map_task = Some(handle.abort_handle());
        Some(handle)
    }

    async fn run_region_change(self: Arc<Self>, generation: u64, region: MapRegion) {
        sleep(self.tuning.debounce).await;
        let radius = region.radius_kilometers();
        {
            let mut guard = self.lock();
            if guard.map_generation != generation {
                return;
            }
            guard.filters.update_center(region.center);
            guard.radius_kilometers = radius;
            self.state.update(move |s| {
                s.location_query.clear();
                s.suggestions.clear();
                s.map_region = region;
                s.radius_kilometers = radius;
            });
        }
        let _ = self.spawn_search();
    }

    async fn fetch_catalogs(&self) {
        {
            let mut guard = self.lock();
            if guard.catalogs_inflight {
                return;
            }
            guard.catalogs_inflight = true;
        }
        self.state.update(|s| {
            s.is_loading_catalogs = true;
            s.catalog_error = None;
        });

        let token = self.store.token();
        let outcome = self.gateway.fetch_catalogs(token.as_deref(), "").await;
        if let Ok(envelope) = &outcome {
            self.store.absorb(envelope);
        }
        match outcome {
            Ok(envelope) if envelope.did_succeed() => {
                let categories = group_catalog_items(&envelope.catalog_list);
                self.state.update(move |s| {
                    s.is_loading_catalogs = false;
                    s.catalog_categories = categories;
                });
            }
            Ok(envelope) => {
                let message = envelope
                    .description()
                    .unwrap_or(CATALOGS_FAILED_FALLBACK)
                    .to_string();
                self.state.update(move |s| {
                    s.is_loading_catalogs = false;
                    s.catalog_error = Some(message);
                });
            }
            Err(err) => {
                warn!("catalog fetch failed: {err}");
                let message = err.to_string();
                self.state.update(move |s| {
                    s.is_loading_catalogs = false;
                    s.catalog_error = Some(message);
                });
            }
        }
        self.lock().catalogs_inflight = false;
    }
}
