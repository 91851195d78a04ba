//! Evaluating a whole class list from CSV.
//!
//! Rows are answered concurrently on the tokio runtime; a row that fails
//! becomes an error record and never aborts the rest of the batch.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tokio::sync::Semaphore;
use tracing::{Instrument, debug, error, info, warn};

use crate::classifier::LabelPredictor;
use crate::record::FeedbackRecord;
use crate::scores::ScoreVector;
use crate::service::FeedbackService;

const ID_COLUMN: &str = "student_id";

/// One CSV row as a request body keyed by column name. Blank and absent
/// cells are left out so they count as missing. Numeric cells become JSON
/// numbers; anything else stays a string and fails validation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StudentRow {
    pub student_id: Option<String>,
    pub fields: Map<String, Value>,
    /// Set when the row itself could not be read.
    pub read_error: Option<String>,
}

pub fn read_students(path: &str) -> Result<Vec<StudentRow>> {
    let file = std::fs::File::open(path).with_context(|| format!("failed to open {path}"))?;
    read_students_from(file)
}

pub fn read_students_from(reader: impl std::io::Read) -> Result<Vec<StudentRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Unreadable CSV row");
                rows.push(StudentRow {
                    read_error: Some(e.to_string()),
                    ..Default::default()
                });
                continue;
            }
        };

        let mut row = StudentRow::default();
        for (name, cell) in headers.iter().zip(record.iter()) {
            if cell.is_empty() {
                continue;
            }
            if name == ID_COLUMN {
                row.student_id = Some(cell.to_string());
            } else {
                row.fields.insert(name.to_string(), cell_value(cell));
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

fn cell_value(cell: &str) -> Value {
    cell.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map_or_else(|| Value::String(cell.to_string()), Value::Number)
}

/// Evaluates one row into a record; failures become error records.
pub fn evaluate_row<P: LabelPredictor>(
    service: &FeedbackService<P>,
    row: &StudentRow,
) -> FeedbackRecord {
    if let Some(message) = &row.read_error {
        return FeedbackRecord::from_error("validation_error", message)
            .with_student_id(row.student_id.as_deref());
    }

    let outcome = ScoreVector::from_map(&row.fields)
        .and_then(|scores| service.respond(&scores).map(|resp| (scores, resp)));

    let record = match outcome {
        Ok((scores, resp)) => FeedbackRecord::from_response(&scores, &resp),
        Err(err) => {
            debug!(kind = err.kind(), error = %err, "Row rejected");
            let mut record = FeedbackRecord::from_feedback_error(&err);
            fill_readable_inputs(&mut record, &row.fields);
            record
        }
    };
    record.with_student_id(row.student_id.as_deref())
}

/// Evaluates all rows with at most `concurrency` in flight. Output order
/// follows input order.
#[tracing::instrument(skip(service, rows), fields(rows = rows.len()))]
pub async fn evaluate_batch<P>(
    service: FeedbackService<P>,
    rows: Vec<StudentRow>,
    concurrency: usize,
) -> Vec<FeedbackRecord>
where
    P: LabelPredictor + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = Vec::with_capacity(rows.len());

    for (idx, row) in rows.into_iter().enumerate() {
        let sem = Arc::clone(&semaphore);
        let service = service.clone();
        let span = tracing::debug_span!("evaluate_row", row = idx, student_id = ?row.student_id);

        let task = tokio::spawn(
            async move {
                let _permit = sem.acquire_owned().await.ok();
                evaluate_row(&service, &row)
            }
            .instrument(span),
        );
        tasks.push(task);
    }

    let mut records = Vec::with_capacity(tasks.len());
    for task in tasks {
        match task.await {
            Ok(record) => records.push(record),
            Err(e) => {
                error!(error = %e, "Row evaluation task failed");
                records.push(FeedbackRecord::from_error("task_failed", &e.to_string()));
            }
        }
    }

    let failed = records.iter().filter(|r| r.is_error()).count();
    info!(
        evaluated = records.len(),
        failed, "Batch evaluation finished"
    );
    records
}

fn fill_readable_inputs(record: &mut FeedbackRecord, fields: &Map<String, Value>) {
    let read = |name: &str| {
        fields
            .get(name)
            .and_then(Value::as_f64)
    };
    record.content_quality = read("content_quality");
    record.presentation_skills = read("presentation_skills");
    record.slide_design = read("slide_design");
    record.engagement = read("engagement");
    record.time_management = read("time_management");
    record.year = read("year");
}
