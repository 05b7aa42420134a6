use std::fmt;

/// Scale factor applied to the product of the three activity ratios.
pub const PSCORE_SCALE: f64 = 1.0e5;

/// pScores at or above this are [`Advisory::High`].
pub const HIGH_PSCORE: f64 = 300.0;

/// pScores at or above this (and below [`HIGH_PSCORE`]) are [`Advisory::Moderate`].
pub const MODERATE_PSCORE: f64 = 100.0;

/// HTS activity statistics of one scaffold, as stored in the `scaffold` table.
///
/// `cpd` counts compounds, `sub` substances (samples of a compound), `ass`
/// assays and `sam` samples (wells).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScaffoldStats {
    pub ncpd_total: i64,
    pub ncpd_tested: i64,
    pub ncpd_active: i64,
    pub nsub_total: i64,
    pub nsub_tested: i64,
    pub nsub_active: i64,
    pub nass_tested: i64,
    pub nass_active: i64,
    pub nsam_tested: i64,
    pub nsam_active: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScaffoldRecord {
    pub id: i64,
    pub smiles: String,
    pub tree: Option<String>,
    pub stats: ScaffoldStats,
    pub in_drug: bool,
}

impl ScaffoldRecord {
    pub fn pscore(&self, medians: &Medians) -> f64 {
        pscore(&self.stats, medians)
    }
}

/// Database-wide medians of the tested counts, from the `metadata` table.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Medians {
    pub nsub_tested: f64,
    pub nass_tested: f64,
    pub nsam_tested: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DbMetadata {
    pub description: Option<String>,
    pub date_built: Option<String>,
    pub medians: Medians,
}

/// A compound containing a scaffold, as listed by `scaf2cpd`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundRef {
    pub id: i64,
    pub smiles: Option<String>,
}

/// Inclusive bounds on scaffold IDs; open ends are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IdRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl IdRange {
    pub fn new(min: Option<i64>, max: Option<i64>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.min.is_none_or(|lo| id >= lo) && self.max.is_none_or(|hi| id <= hi)
    }

    /// Bounds with open ends filled by the extreme `i64` values.
    pub fn bounds(&self) -> (i64, i64) {
        (self.min.unwrap_or(i64::MIN), self.max.unwrap_or(i64::MAX))
    }

    pub fn is_empty(&self) -> bool {
        matches!((self.min, self.max), (Some(lo), Some(hi)) if lo > hi)
    }
}

/// Promiscuity score of a scaffold.
///
/// Product of the substance, assay and sample activity ratios, each damped by
/// the database median of the tested count, scaled by [`PSCORE_SCALE`].
pub fn pscore(stats: &ScaffoldStats, medians: &Medians) -> f64 {
    let ratio = |active: i64, tested: i64, median: f64| {
        let denom = tested as f64 + median;
        if denom > 0.0 {
            active as f64 / denom
        } else {
            0.0
        }
    };

    PSCORE_SCALE
        * ratio(stats.nsub_active, stats.nsub_tested, medians.nsub_tested)
        * ratio(stats.nass_active, stats.nass_tested, medians.nass_tested)
        * ratio(stats.nsam_active, stats.nsam_tested, medians.nsam_tested)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Advisory {
    Low,
    Moderate,
    High,
}

impl Advisory {
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_PSCORE {
            Advisory::High
        } else if score >= MODERATE_PSCORE {
            Advisory::Moderate
        } else {
            Advisory::Low
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::Low => write!(f, "low"),
            Advisory::Moderate => write!(f, "moderate"),
            Advisory::High => write!(f, "high"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(sub: (i64, i64), ass: (i64, i64), sam: (i64, i64)) -> ScaffoldStats {
        ScaffoldStats {
            nsub_tested: sub.0,
            nsub_active: sub.1,
            nass_tested: ass.0,
            nass_active: ass.1,
            nsam_tested: sam.0,
            nsam_active: sam.1,
            ..Default::default()
        }
    }

    const MEDIANS: Medians = Medians {
        nsub_tested: 2.0,
        nass_tested: 400.0,
        nsam_tested: 500.0,
    };

    #[test]
    fn zero_actives_score_zero() {
        let s = stats((10, 0), (500, 0), (600, 0));
        assert_eq!(pscore(&s, &MEDIANS), 0.0);
    }

    #[test]
    fn pscore_matches_hand_computation() {
        let s = stats((8, 4), (600, 60), (1500, 100));
        let expected = 1.0e5 * (4.0 / 10.0) * (60.0 / 1000.0) * (100.0 / 2000.0);
        assert!((pscore(&s, &MEDIANS) - expected).abs() < 1e-9);
        assert!((expected - 120.0).abs() < 1e-9);
    }

    #[test]
    fn pscore_grows_with_actives() {
        let lo = stats((8, 2), (600, 30), (1500, 50));
        let hi = stats((8, 4), (600, 30), (1500, 50));
        assert!(pscore(&hi, &MEDIANS) > pscore(&lo, &MEDIANS));
    }

    #[test]
    fn zero_denominator_scores_zero() {
        let s = stats((0, 1), (0, 1), (0, 1));
        assert_eq!(pscore(&s, &Medians::default()), 0.0);
    }

    #[test]
    fn advisory_bands() {
        assert_eq!(Advisory::from_score(0.0), Advisory::Low);
        assert_eq!(Advisory::from_score(99.9), Advisory::Low);
        assert_eq!(Advisory::from_score(100.0), Advisory::Moderate);
        assert_eq!(Advisory::from_score(299.9), Advisory::Moderate);
        assert_eq!(Advisory::from_score(300.0), Advisory::High);
        assert_eq!(Advisory::High.to_string(), "high");
    }

    #[test]
    fn id_range_bounds_and_membership() {
        let open = IdRange::default();
        assert!(open.contains(i64::MIN) && open.contains(i64::MAX));
        assert_eq!(open.bounds(), (i64::MIN, i64::MAX));

        let r = IdRange::new(Some(10), Some(20));
        assert!(r.contains(10) && r.contains(20));
        assert!(!r.contains(9) && !r.contains(21));
        assert!(!r.is_empty());
        assert!(IdRange::new(Some(5), Some(4)).is_empty());
    }
}
