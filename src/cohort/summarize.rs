use crate::cohort::aggregate::aggregate_records;
use crate::cohort::types::CohortSummary;
use crate::cohort::writetos3::write_json_to_s3;
use crate::output::{print_json, write_json_file};
use crate::record::FeedbackRecord;
use anyhow::{Context, Result};
use std::fs::File;
use tracing::info;

pub const SUMMARY_KEY: &str = "summaries/cohort.json";

/// Where a finished summary goes.
#[derive(Debug, Clone, Default)]
pub struct SummaryTarget {
    /// Local JSON file; stdout when absent.
    pub output: Option<String>,
    pub s3_bucket: Option<String>,
    pub gzip: bool,
}

/// Aggregates a records CSV and publishes the summary to every target.
#[tracing::instrument(skip(target))]
pub async fn summarize(records_path: &str, target: &SummaryTarget) -> Result<CohortSummary> {
    let records = load_records(records_path)?;
    let summary = aggregate_records(&records);
    info!(
        students = summary.students,
        errors = summary.errors,
        tiers = summary.tiers.len(),
        "Cohort aggregated"
    );

    match &target.output {
        Some(path) => {
            write_json_file(path, &summary)?;
            info!(path = %path, "Summary written");
        }
        None => print_json(&summary)?,
    }

    if let Some(bucket) = &target.s3_bucket {
        let config = aws_config::load_from_env().await;
        let s3 = aws_sdk_s3::Client::new(&config);
        let key = if target.gzip {
            format!("{SUMMARY_KEY}.gz")
        } else {
            SUMMARY_KEY.to_string()
        };
        write_json_to_s3(&s3, bucket, &key, &summary, target.gzip).await?;
        info!(bucket = %bucket, key = %key, "Summary uploaded to S3");
    }

    Ok(summary)
}

pub fn load_records(path: &str) -> Result<Vec<FeedbackRecord>> {
    let file = File::open(path).with_context(|| format!("failed to open {path}"))?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut rows = Vec::new();

    for result in rdr.deserialize() {
        let record: FeedbackRecord = result.with_context(|| format!("bad record in {path}"))?;
        rows.push(record);
    }

    Ok(rows)
}
