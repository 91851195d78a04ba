//! Cohort summaries over evaluated records.
//!
//! Successful records are grouped by feedback tier (one group per academic
//! year, plus everything else under the overall tier), averaged per
//! criterion and given the tier text for the group mean. The result can be
//! written locally or uploaded to S3 as JSON.

pub mod aggregate;
pub mod summarize;
pub mod types;
pub mod utility;
pub mod writetos3;
