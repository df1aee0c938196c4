//! Company detail orchestration.
//!
//! Selecting a company fans out three fetches at once: the detail record,
//! business hours and service areas. The legs fail independently; hours or
//! areas that cannot load leave their section empty without tearing down
//! the whole screen. A single generation counter covers all three legs, so
//! selecting another company (or dismissing) discards every pending commit
//! from the previous selection.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};

use svchub_core::models::{
    BusinessHour, CompanyDetail, CompanySummary, Envelope, ServiceArea,
};
use svchub_core::prelude::*;

use crate::gateway::Gateway;
use crate::session::{ExpiryPolicy, SessionStore};
use crate::state::StateCell;

const DETAIL_FAILED_FALLBACK: &str = "Unable to load company details.";

#[derive(Debug, Clone, Default)]
pub struct DetailSnapshot {
    /// Summary the user tapped; shown while the full detail loads.
    pub selected: Option<CompanySummary>,
    pub detail: Option<CompanyDetail>,
    /// Weekday-ordered, one entry per day.
    pub hours: Vec<BusinessHour>,
    pub areas: Vec<ServiceArea>,
    pub is_loading: bool,
    pub error: Option<String>,
}

pub struct DetailOrchestrator<G> {
    inner: Arc<DetailInner<G>>,
}

impl<G> Clone for DetailOrchestrator<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct DetailInner<G> {
    gateway: G,
    store: SessionStore,
    policy: ExpiryPolicy,
    state: StateCell<DetailSnapshot>,
    guard: Mutex<DetailGuard>,
}

#[derive(Default)]
struct DetailGuard {
    generation: u64,
    task: Option<AbortHandle>,
    selected_uuid: Option<String>,
}

impl<G: Gateway + Send + Sync + 'static> DetailOrchestrator<G> {
    pub fn new(gateway: G, store: SessionStore, policy: ExpiryPolicy) -> Self {
        Self {
            inner: Arc::new(DetailInner {
                gateway,
                store,
                policy,
                state: StateCell::new(DetailSnapshot::default()),
                guard: Mutex::new(DetailGuard::default()),
            }),
        }
    }

    pub fn snapshot(&self) -> DetailSnapshot {
        self.inner.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailSnapshot> {
        self.inner.state.subscribe()
    }

    /// Show a company, cancelling any previous selection's fetches.
    pub fn select(&self, company: &CompanySummary) -> JoinHandle<()> {
        let uuid = company.uuid.clone();
        let generation = {
            let mut guard = self.inner.lock();
            if let Some(task) = guard.task.take() {
                task.abort();
            }
            guard.generation += 1;
            guard.selected_uuid = Some(uuid.clone());
            guard.generation
        };
        self.inner.state.set(DetailSnapshot {
            selected: Some(company.clone()),
            ..DetailSnapshot::default()
        });
        self.inner.spawn_fetch(generation, uuid)
    }

    /// Re-fetch the current selection, if any.
    pub fn refresh(&self) -> Option<JoinHandle<()>> {
        let (generation, uuid) = {
            let mut guard = self.inner.lock();
            let uuid = guard.selected_uuid.clone()?;
            if let Some(task) = guard.task.take() {
                task.abort();
            }
            guard.generation += 1;
            (guard.generation, uuid)
        };
        Some(self.inner.spawn_fetch(generation, uuid))
    }

    /// Close the detail screen and drop any in-flight fetches.
    pub fn dismiss(&self) {
        {
            let mut guard = self.inner.lock();
            if let Some(task) = guard.task.take() {
                task.abort();
            }
            guard.generation += 1;
            guard.selected_uuid = None;
        }
        self.inner.state.set(DetailSnapshot::default());
    }
}

impl<G: Gateway + Send + Sync + 'static> DetailInner<G> {
    fn lock(&self) -> MutexGuard<'_, DetailGuard> {
        match self.guard.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Apply a state change only if `generation` is still current.
    fn commit(&self, generation: u64, apply: impl FnOnce(&mut DetailSnapshot)) -> bool {
        let guard = self.lock();
        if guard.generation != generation {
            return false;
        }
        self.state.update(apply);
        true
    }

    fn spawn_fetch(self: &Arc<Self>, generation: u64, uuid: String) -> JoinHandle<()> {
        let inner = Arc::clone(self);
        let handle = tokio::spawn(async move { inner.run_fetch(generation, uuid).await });
        self.lock().task = Some(handle.abort_handle());
        handle
    }

    async fn run_fetch(self: Arc<Self>, generation: u64, uuid: String) {
        if !self.commit(generation, |s| {
            s.is_loading = true;
            s.error = None;
        }) {
            return;
        }
        let token = self.store.token();

        let detail_leg = async {
            let outcome = self.gateway.company_detail(token.as_deref(), &uuid).await;
            if let Ok(envelope) = &outcome {
                self.store.absorb(envelope);
            }
            if let Some(message) = self.policy.intercept(&outcome) {
                self.commit(generation, move |s| s.error = Some(message));
                return;
            }
            match outcome {
                Ok(envelope) if envelope.did_succeed() && envelope.company.is_some() => {
                    let detail = envelope.company;
                    self.commit(generation, move |s| s.detail = detail);
                }
                Ok(envelope) => {
                    let message = envelope
                        .description()
                        .unwrap_or(DETAIL_FAILED_FALLBACK)
                        .to_string();
                    self.commit(generation, move |s| s.error = Some(message));
                }
                Err(err) => {
                    warn!(%uuid, "detail fetch failed: {err}");
                    let message = err.to_string();
                    self.commit(generation, move |s| s.error = Some(message));
                }
            }
        };

        let hours_leg = async {
            let outcome = self.gateway.business_hours(token.as_deref(), &uuid).await;
            if let Ok(envelope) = &outcome {
                self.store.absorb(envelope);
            }
            if self.policy.intercept(&outcome).is_some() {
                return;
            }
            match outcome {
                Ok(envelope) if envelope.did_succeed() => {
                    let mut hours = envelope.business_hours;
                    hours.sort_by_key(BusinessHour::sort_order);
                    hours.dedup_by_key(|hour| hour.day_key());
                    self.commit(generation, move |s| s.hours = hours);
                }
                Ok(_) => {
                    self.commit(generation, |s| s.hours.clear());
                }
                Err(err) => {
                    debug!(%uuid, "business hours fetch failed: {err}");
                    self.commit(generation, |s| s.hours.clear());
                }
            }
        };

        let areas_leg = async {
            let outcome = self.gateway.service_areas(token.as_deref(), &uuid).await;
            if let Ok(envelope) = &outcome {
                self.store.absorb(envelope);
            }
            if self.policy.intercept(&outcome).is_some() {
                return;
            }
            match outcome {
                Ok(envelope) if envelope.did_succeed() => {
                    let areas = envelope.company_area_list;
                    self.commit(generation, move |s| s.areas = areas);
                }
                Ok(_) => {
                    self.commit(generation, |s| s.areas.clear());
                }
                Err(err) => {
                    debug!(%uuid, "service areas fetch failed: {err}");
                    self.commit(generation, |s| s.areas.clear());
                }
            }
        };

        tokio::join!(detail_leg, hours_leg, areas_leg);
        self.commit(generation, |s| s.is_loading = false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, FakeGateway};
    use std::time::Duration;
    use svchub_core::Error;
    use tokio::sync::Notify;

    fn summary(uuid: &str, name: &str) -> CompanySummary {
        serde_json::from_value(serde_json::json!({"uuid": uuid, "name": name})).unwrap()
    }

    fn orchestrator(
        fake: &Arc<FakeGateway>,
    ) -> (
        tempfile::TempDir,
        DetailOrchestrator<Arc<FakeGateway>>,
        ExpiryPolicy,
        SessionStore,
    ) {
        let (dir, store) = test_support::session_in_tempdir();
        let policy = ExpiryPolicy::new(store.clone());
        let detail = DetailOrchestrator::new(Arc::clone(fake), store.clone(), policy.clone());
        (dir, detail, policy, store)
    }

    #[tokio::test]
    async fn test_all_three_legs_populate_the_snapshot() {
        let fake = FakeGateway::shared();
        fake.detail
            .push(Ok(test_support::detail_response("c1", "Spark Electrical")));
        fake.hours
            .push(Ok(test_support::hours_response(&["WEDNESDAY", "MONDAY"])));
        fake.areas
            .push(Ok(test_support::areas_response(&["Northern Suburbs"])));
        let (_dir, detail, _policy, _store) = orchestrator(&fake);

        detail.select(&summary("c1", "Spark Electrical")).await.unwrap();

        let snapshot = detail.snapshot();
        assert_eq!(snapshot.detail.as_ref().unwrap().uuid, "c1");
        assert!(!snapshot.is_loading);
        assert!(snapshot.error.is_none());
        let days: Vec<String> = snapshot.hours.iter().map(BusinessHour::day_key).collect();
        assert_eq!(days, ["MONDAY", "WEDNESDAY"]);
        assert_eq!(snapshot.areas.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_side_legs_leave_sections_empty() {
        let fake = FakeGateway::shared();
        fake.detail
            .push(Ok(test_support::detail_response("c1", "Spark Electrical")));
        fake.hours.push(Err(Error::transport("timed out")));
        fake.areas.push(Err(Error::transport("timed out")));
        let (_dir, detail, _policy, _store) = orchestrator(&fake);

        detail.select(&summary("c1", "Spark Electrical")).await.unwrap();

        let snapshot = detail.snapshot();
        assert_eq!(snapshot.detail.as_ref().unwrap().name, "Spark Electrical");
        assert!(snapshot.hours.is_empty());
        assert!(snapshot.areas.is_empty());
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_failed_detail_leg_surfaces_an_error() {
        let fake = FakeGateway::shared();
        fake.detail.push(Err(Error::transport("timed out")));
        fake.hours.push(Ok(test_support::hours_response(&[])));
        fake.areas.push(Ok(test_support::areas_response(&[])));
        let (_dir, detail, _policy, _store) = orchestrator(&fake);

        detail.select(&summary("c1", "Spark Electrical")).await.unwrap();

        let snapshot = detail.snapshot();
        assert!(snapshot.detail.is_none());
        assert!(snapshot.error.is_some());
        assert_eq!(snapshot.selected.as_ref().unwrap().uuid, "c1");
    }

    #[tokio::test]
    async fn test_newer_selection_discards_stale_responses() {
        let fake = FakeGateway::shared();
        let gate = Arc::new(Notify::new());
        fake.detail
            .push_gated(Arc::clone(&gate), Ok(test_support::detail_response("a", "Old")));
        fake.detail.push(Ok(test_support::detail_response("b", "New")));
        for _ in 0..2 {
            fake.hours.push(Ok(test_support::hours_response(&[])));
            fake.areas.push(Ok(test_support::areas_response(&[])));
        }
        let (_dir, detail, _policy, _store) = orchestrator(&fake);

        let _first = detail.select(&summary("a", "Old"));
        test_support::wait_until("first detail fetch to reach the gateway", || {
            fake.detail.calls() == 1
        })
        .await;
        detail.select(&summary("b", "New")).await.unwrap();
        gate.notify_one();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let snapshot = detail.snapshot();
        assert_eq!(snapshot.detail.as_ref().unwrap().uuid, "b");
        assert_eq!(snapshot.selected.as_ref().unwrap().uuid, "b");
    }

    #[tokio::test]
    async fn test_dismiss_clears_the_screen() {
        let fake = FakeGateway::shared();
        fake.detail
            .push(Ok(test_support::detail_response("c1", "Spark Electrical")));
        fake.hours.push(Ok(test_support::hours_response(&["MONDAY"])));
        fake.areas.push(Ok(test_support::areas_response(&[])));
        let (_dir, detail, _policy, _store) = orchestrator(&fake);

        detail.select(&summary("c1", "Spark Electrical")).await.unwrap();
        detail.dismiss();

        let snapshot = detail.snapshot();
        assert!(snapshot.selected.is_none());
        assert!(snapshot.detail.is_none());
        assert!(snapshot.hours.is_empty());
        assert!(detail.refresh().is_none());
    }

    #[tokio::test]
    async fn test_unauthorized_detail_clears_session() {
        let fake = FakeGateway::shared();
        fake.detail.push(Err(Error::Unauthorized));
        fake.hours.push(Ok(test_support::hours_response(&[])));
        fake.areas.push(Ok(test_support::areas_response(&[])));
        let (_dir, detail, policy, store) = orchestrator(&fake);
        store.set_token(Some("tok"));

        detail.select(&summary("c1", "Spark Electrical")).await.unwrap();

        assert!(store.token().is_none());
        assert!(policy.needs_login());
        assert!(detail.snapshot().error.is_some());
    }

    #[tokio::test]
    async fn test_refresh_refetches_the_current_selection() {
        let fake = FakeGateway::shared();
        for name in ["First", "Second"] {
            fake.detail.push(Ok(test_support::detail_response("c1", name)));
            fake.hours.push(Ok(test_support::hours_response(&[])));
            fake.areas.push(Ok(test_support::areas_response(&[])));
        }
        let (_dir, detail, _policy, _store) = orchestrator(&fake);

        detail.select(&summary("c1", "First")).await.unwrap();
        detail.refresh().unwrap().await.unwrap();

        assert_eq!(fake.detail.calls(), 2);
        assert_eq!(detail.snapshot().detail.as_ref().unwrap().name, "Second");
    }
}
