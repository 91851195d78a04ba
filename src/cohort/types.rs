//! Data types produced by the cohort summary.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::feedback::{Band, Tier};

/// Mean and spread of one score column within a group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnAggregate {
    pub avg: f64,
    pub stddev: f64,
}

/// Everything known about one tier's students.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierAggregate {
    pub tier: Tier,
    pub students: usize,
    pub criteria: BTreeMap<String, ColumnAggregate>,
    pub average: ColumnAggregate,
    pub band: Band,
    pub feedback: String,
    pub overall_feedback: String,
    pub labels: BTreeMap<String, usize>,
}

/// Complete summary, serialized as `summaries/cohort.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortSummary {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    pub students: usize,
    pub errors: usize,
    pub tiers: Vec<TierAggregate>,
}
