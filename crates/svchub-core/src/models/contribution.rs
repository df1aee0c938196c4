//! Contribution statistics for a user's profile

use serde::Deserialize;

use super::envelope::{impl_envelope, ResponseCode};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionStatsResponse {
    pub response_code: Option<ResponseCode>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub token: Option<String>,
    pub stats: Option<ContributionStats>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionStats {
    pub creator_count: Option<i64>,
    pub reviewer_count: Option<i64>,
    pub total_contributions: Option<i64>,
    pub placements: Option<Vec<ContributionPlacement>>,
    pub badges: Option<Vec<ContributionBadge>>,
    pub awards: Option<Vec<ContributionAward>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionPlacement {
    pub category: String,
    pub count: Option<i64>,
    pub rank: Option<i64>,
    pub total_participants: Option<i64>,
    pub percentile: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionBadge {
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub rank: Option<i64>,
    pub percentile: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionAward {
    pub category: String,
    pub title: String,
    pub rank: Option<i64>,
}

impl_envelope!(ContributionStatsResponse);
