//! Contribution statistics for the profile screen.

use std::sync::Arc;

use tokio::sync::watch;

use svchub_core::models::{
    ContributionAward, ContributionBadge, ContributionPlacement, ContributionStats, Envelope,
};
use svchub_core::prelude::*;

use crate::gateway::Gateway;
use crate::session::{ExpiryPolicy, SessionStore};
use crate::state::StateCell;

const STATS_FAILED_FALLBACK: &str = "Unable to load contribution stats.";

/// Display order for placement and badge categories: overall first, then
/// creator, reviewer, anything else alphabetically after that.
fn category_rank(category: &str) -> (u8, String) {
    let lowered = category.to_lowercase();
    let rank = match lowered.as_str() {
        "overall" => 0,
        "creator" => 1,
        "reviewer" => 2,
        _ => 3,
    };
    (rank, lowered)
}

/// Badges show rank badges before percentile badges within a category.
fn badge_rank(badge: &ContributionBadge) -> (u8, String, u8) {
    let (category_rank, category) = category_rank(&badge.category);
    let kind_rank = match badge.kind.as_str() {
        "RANK" => 0,
        "TOP_PERCENT" => 1,
        _ => 2,
    };
    (category_rank, category, kind_rank)
}

pub fn ordered_placements(stats: &ContributionStats) -> Vec<ContributionPlacement> {
    let mut placements = stats.placements.clone().unwrap_or_default();
    placements.sort_by_key(|placement| category_rank(&placement.category));
    placements
}

pub fn ordered_badges(stats: &ContributionStats) -> Vec<ContributionBadge> {
    let mut badges = stats.badges.clone().unwrap_or_default();
    badges.sort_by_key(badge_rank);
    badges
}

pub fn ordered_awards(stats: &ContributionStats) -> Vec<ContributionAward> {
    let mut awards = stats.awards.clone().unwrap_or_default();
    awards.sort_by_key(|award| category_rank(&award.category));
    awards
}

#[derive(Debug, Clone, Default)]
pub struct ContributionsSnapshot {
    pub stats: Option<ContributionStats>,
    pub is_loading: bool,
    pub error: Option<String>,
}

pub struct ContributionsOrchestrator<G> {
    inner: Arc<ContributionsInner<G>>,
}

impl<G> Clone for ContributionsOrchestrator<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ContributionsInner<G> {
    gateway: G,
    store: SessionStore,
    policy: ExpiryPolicy,
    state: StateCell<ContributionsSnapshot>,
}

impl<G: Gateway + Send + Sync + 'static> ContributionsOrchestrator<G> {
    pub fn new(gateway: G, store: SessionStore, policy: ExpiryPolicy) -> Self {
        Self {
            inner: Arc::new(ContributionsInner {
                gateway,
                store,
                policy,
                state: StateCell::new(ContributionsSnapshot::default()),
            }),
        }
    }

    pub fn snapshot(&self) -> ContributionsSnapshot {
        self.inner.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<ContributionsSnapshot> {
        self.inner.state.subscribe()
    }

    /// Fetch the signed-in user's contribution stats. Without a user the
    /// snapshot stays empty and no request is made.
    pub async fn load_stats(&self) {
        let Some(user) = self.inner.store.user() else {
            self.inner.state.update(|s| s.stats = None);
            return;
        };
        self.inner.state.update(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let token = self.inner.store.token();
        let outcome = self
            .inner
            .gateway
            .contribution_stats(token.as_deref(), &user.uuid)
            .await;
        if let Ok(envelope) = &outcome {
            self.inner.store.absorb(envelope);
        }
        if let Some(message) = self.inner.policy.intercept(&outcome) {
            self.inner.state.update(move |s| {
                s.is_loading = false;
                s.stats = None;
                s.error = Some(message);
            });
            return;
        }

        match outcome {
            Ok(envelope) if envelope.did_succeed() => {
                let stats = envelope.stats;
                self.inner.state.update(move |s| {
                    s.is_loading = false;
                    s.stats = stats;
                });
            }
            Ok(envelope) => {
                let message = envelope
                    .description()
                    .unwrap_or(STATS_FAILED_FALLBACK)
                    .to_string();
                self.inner.state.update(move |s| {
                    s.is_loading = false;
                    s.error = Some(message);
                });
            }
            Err(err) => {
                warn!("contribution stats fetch failed: {err}");
                let message = err.to_string();
                self.inner.state.update(move |s| {
                    s.is_loading = false;
                    s.error = Some(message);
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, FakeGateway};

    fn stats_with_categories() -> ContributionStats {
        serde_json::from_value(serde_json::json!({
            "placements": [
                {"category": "reviewer", "rank": 3},
                {"category": "overall", "rank": 12},
                {"category": "creator", "rank": 5},
                {"category": "archive", "rank": 1}
            ],
            "badges": [
                {"category": "creator", "type": "TOP_PERCENT", "label": "Top 5%"},
                {"category": "creator", "type": "RANK", "label": "#5"},
                {"category": "overall", "type": "RANK", "label": "#12"}
            ],
            "awards": [
                {"category": "creator", "title": "Gold"},
                {"category": "overall", "title": "Silver"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_placements_order_overall_creator_reviewer_then_rest() {
        let ordered = ordered_placements(&stats_with_categories());
        let categories: Vec<&str> = ordered.iter().map(|p| p.category.as_str()).collect();
        assert_eq!(categories, ["overall", "creator", "reviewer", "archive"]);
    }

    #[test]
    fn test_badges_order_rank_before_percentile_within_category() {
        let ordered = ordered_badges(&stats_with_categories());
        let labels: Vec<&str> = ordered.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["#12", "#5", "Top 5%"]);
    }

    #[test]
    fn test_awards_follow_category_order() {
        let ordered = ordered_awards(&stats_with_categories());
        let titles: Vec<&str> = ordered.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["Silver", "Gold"]);
    }

    #[tokio::test]
    async fn test_stats_require_a_user() {
        let fake = FakeGateway::shared();
        let (_dir, store) = test_support::session_in_tempdir();
        let policy = ExpiryPolicy::new(store.clone());
        let contributions =
            ContributionsOrchestrator::new(Arc::clone(&fake), store.clone(), policy.clone());

        contributions.load_stats().await;
        assert_eq!(fake.stats.calls(), 0);

        store.set_user(Some(test_support::sample_user()));
        fake.stats.push(Ok(test_support::stats_response(7)));
        contributions.load_stats().await;

        let snapshot = contributions.snapshot();
        assert_eq!(
            snapshot.stats.unwrap().total_contributions,
            Some(7)
        );
        assert!(!snapshot.is_loading);
    }

    #[tokio::test]
    async fn test_expired_session_clears_stats_and_requests_login() {
        let fake = FakeGateway::shared();
        let (_dir, store) = test_support::session_in_tempdir();
        store.set_token(Some("tok"));
        store.set_user(Some(test_support::sample_user()));
        let policy = ExpiryPolicy::new(store.clone());
        let contributions =
            ContributionsOrchestrator::new(Arc::clone(&fake), store.clone(), policy.clone());
        fake.stats.push(Ok(test_support::token_expired()));

        contributions.load_stats().await;

        assert!(policy.needs_login());
        assert!(store.token().is_none());
        assert!(contributions.snapshot().stats.is_none());
    }
}
