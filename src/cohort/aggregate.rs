use crate::cohort::types::{CohortSummary, ColumnAggregate, TierAggregate};
use crate::cohort::utility::{mean, stddev};
use crate::feedback::{Band, Tier, overall_feedback, select_tier, tier_feedback};
use crate::record::FeedbackRecord;
use crate::scores::{AverageScore, CRITERIA, ScoreVector};
use chrono::Utc;
use std::collections::BTreeMap;

/// Summarizes evaluated records per feedback tier.
///
/// Error rows and rows with incomplete inputs are only counted. Tiers with no
/// students are left out; the rest come out ordered Year1..Year4, Overall.
pub fn aggregate_records(records: &[FeedbackRecord]) -> CohortSummary {
    let mut groups: BTreeMap<Tier, Vec<(ScoreVector, Option<&str>)>> = BTreeMap::new();
    let mut errors = 0usize;

    for record in records {
        match record.scores() {
            Some(scores) => groups
                .entry(select_tier(Some(scores.year)))
                .or_default()
                .push((scores, record.label.as_deref())),
            None => errors += 1,
        }
    }

    let students = groups.values().map(Vec::len).sum();
    let tiers = groups
        .into_iter()
        .map(|(tier, members)| aggregate_tier(tier, &members))
        .collect();

    CohortSummary {
        schema_version: 1,
        generated_at: Utc::now(),
        students,
        errors,
        tiers,
    }
}

fn aggregate_tier(tier: Tier, members: &[(ScoreVector, Option<&str>)]) -> TierAggregate {
    let mut criteria = BTreeMap::new();
    for (idx, name) in CRITERIA.iter().enumerate() {
        let column: Vec<f64> = members.iter().map(|(s, _)| s.criteria()[idx]).collect();
        criteria.insert(name.to_string(), column_aggregate(&column));
    }

    let averages: Vec<f64> = members.iter().map(|(s, _)| s.average().value()).collect();
    let average = column_aggregate(&averages);
    let group_avg = AverageScore(average.avg);

    let mut labels = BTreeMap::new();
    for label in members.iter().filter_map(|(_, label)| *label) {
        *labels.entry(label.to_string()).or_insert(0) += 1;
    }

    TierAggregate {
        tier,
        students: members.len(),
        criteria,
        band: Band::for_average(average.avg),
        feedback: tier_feedback(tier, group_avg).to_string(),
        overall_feedback: overall_feedback(group_avg).to_string(),
        average,
        labels,
    }
}

fn column_aggregate(values: &[f64]) -> ColumnAggregate {
    let avg = mean(values);
    ColumnAggregate {
        avg,
        stddev: stddev(values, avg),
    }
}
