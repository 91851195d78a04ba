use serde::Serialize;

/// Score band within a feedback tier.
///
/// | Average     | Band      |
/// |-------------|-----------|
/// | >= 8.5      | Excellent |
/// | >= 7.0      | Good      |
/// | >= 5.5      | Fair      |
/// | < 5.5       | Poor      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Inclusive lower bounds, checked top-down. Anything below the last bound,
/// NaN included, is [`Band::Poor`].
const BANDS: &[(f64, Band)] = &[
    (8.5, Band::Excellent),
    (7.0, Band::Good),
    (5.5, Band::Fair),
];

impl Band {
    pub const ALL: [Band; 4] = [Band::Excellent, Band::Good, Band::Fair, Band::Poor];

    pub fn for_average(avg: f64) -> Band {
        BANDS
            .iter()
            .find(|(threshold, _)| avg >= *threshold)
            .map(|(_, band)| *band)
            .unwrap_or(Band::Poor)
    }

    /// Position in [`Band::ALL`], used to index tier text tables.
    pub fn index(self) -> usize {
        match self {
            Band::Excellent => 0,
            Band::Good => 1,
            Band::Fair => 2,
            Band::Poor => 3,
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Band::Excellent => "excellent",
            Band::Good => "good",
            Band::Fair => "fair",
            Band::Poor => "poor",
        };
        f.write_str(name)
    }
}
