//! Deterministic, tier-based feedback text.
//!
//! Every tier shares the same four bands (see [`Band`]); only the text
//! attached to each band differs. Nothing in here can fail.

mod band;
mod tier;

pub use band::Band;
pub use tier::Tier;

use crate::scores::AverageScore;

/// Fixed text for the band `average` falls into within `tier`.
pub fn tier_feedback(tier: Tier, average: AverageScore) -> &'static str {
    tier.text(Band::for_average(average.value()))
}

/// Shorthand for `tier_feedback(Tier::Overall, average)`.
pub fn overall_feedback(average: AverageScore) -> &'static str {
    tier_feedback(Tier::Overall, average)
}

pub fn select_tier(year: Option<f64>) -> Tier {
    Tier::for_year(year)
}
