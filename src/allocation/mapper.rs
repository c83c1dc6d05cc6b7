//! Allocation mapper.
//!
//! Quadrant weights:
//! - Inflation +, growth +: equities 33, gold 33, cash 33
//! - Inflation +, growth -: gold 50, cash 50
//! - Inflation -, growth +: equities 50, bonds 50
//! - Inflation -, growth -: bonds 50, cash 50

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::regime::{CoarseBand, Quadrant};

/// How to treat the three-way split that does not divide 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationPolicy {
    /// 33/33/33, summing to 99.
    #[default]
    AsPublished,
    /// 34/33/33, equities absorb the remainder so weights sum to 100.
    Normalized,
}

/// Percentage weights per asset bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Allocation {
    pub equities: Decimal,
    pub gold: Decimal,
    pub bonds: Decimal,
    pub cash: Decimal,
}

impl Allocation {
    /// Weights for a quadrant under a policy.
    pub fn for_quadrant(quadrant: Quadrant, policy: AllocationPolicy) -> Self {
        match quadrant {
            Quadrant::InflationGrowth => {
                let equities = match policy {
                    AllocationPolicy::AsPublished => pct(33),
                    AllocationPolicy::Normalized => pct(34),
                };
                Self {
                    equities,
                    gold: pct(33),
                    cash: pct(33),
                    ..Self::default()
                }
            }
            Quadrant::InflationContraction => Self {
                gold: pct(50),
                cash: pct(50),
                ..Self::default()
            },
            Quadrant::DisinflationGrowth => Self {
                equities: pct(50),
                bonds: pct(50),
                ..Self::default()
            },
            Quadrant::DisinflationContraction => Self {
                bonds: pct(50),
                cash: pct(50),
                ..Self::default()
            },
        }
    }

    /// Sum of all weights.
    pub fn total(&self) -> Decimal {
        self.equities + self.gold + self.bonds + self.cash
    }

    /// `(name, weight)` pairs in display order.
    pub fn weights(&self) -> [(&'static str, Decimal); 4] {
        [
            ("Equities", self.equities),
            ("Gold", self.gold),
            ("Bonds", self.bonds),
            ("Cash", self.cash),
        ]
    }
}

fn pct(value: u32) -> Decimal {
    Decimal::from(value)
}

/// Allocation for a pair of coarse bands.
pub fn allocate(inflation: CoarseBand, growth: CoarseBand, policy: AllocationPolicy) -> Allocation {
    Allocation::for_quadrant(Quadrant::from_bands(inflation, growth), policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn band(level: u8) -> CoarseBand {
        CoarseBand::new(level).unwrap()
    }

    #[test]
    fn test_inflation_growth_allocation() {
        let alloc = allocate(band(2), band(2), AllocationPolicy::AsPublished);
        assert_eq!(alloc.equities, dec!(33));
        assert_eq!(alloc.gold, dec!(33));
        assert_eq!(alloc.cash, dec!(33));
        assert_eq!(alloc.bonds, dec!(0));
        // 99, not 100. Candidate for AllocationPolicy::Normalized as the default.
        assert_eq!(alloc.total(), dec!(99));
    }

    #[test]
    fn test_normalized_policy_sums_to_100() {
        let alloc = allocate(band(3), band(4), AllocationPolicy::Normalized);
        assert_eq!(alloc.equities, dec!(34));
        assert_eq!(alloc.total(), dec!(100));
    }

    #[test]
    fn test_two_way_quadrants_sum_to_100() {
        let stagflation = allocate(band(4), band(1), AllocationPolicy::AsPublished);
        assert_eq!(stagflation.gold, dec!(50));
        assert_eq!(stagflation.cash, dec!(50));
        assert_eq!(stagflation.total(), dec!(100));

        let goldilocks = allocate(band(1), band(3), AllocationPolicy::AsPublished);
        assert_eq!(goldilocks.equities, dec!(50));
        assert_eq!(goldilocks.bonds, dec!(50));
        assert_eq!(goldilocks.total(), dec!(100));

        let deflation = allocate(band(0), band(0), AllocationPolicy::AsPublished);
        assert_eq!(deflation.bonds, dec!(50));
        assert_eq!(deflation.cash, dec!(50));
        assert_eq!(deflation.total(), dec!(100));
    }

    #[test]
    fn test_weights_are_non_negative_for_every_band_pair() {
        for infl in CoarseBand::all() {
            for gdp in CoarseBand::all() {
                let alloc = allocate(infl, gdp, AllocationPolicy::AsPublished);
                assert!(alloc.weights().iter().all(|(_, w)| *w >= Decimal::ZERO));
                assert!(alloc.total() == dec!(99) || alloc.total() == dec!(100));
            }
        }
    }
}
