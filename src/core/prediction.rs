use crate::core::features::FACTOR_NAMES;
use crate::models::{Factor, PredictionData, PriceRange};

/// Confidence reported with every prediction. A fixed constant, not a
/// statistically derived interval.
const CONFIDENCE: u8 = 90;

/// Half-width of the reported price band, as a fraction of the prediction.
const PRICE_BAND: f64 = 0.1;

/// Shape a raw scalar prediction and the model's static feature importances
/// into the response payload.
///
/// Factors are ranked by absolute importance before formatting. Importances
/// from the trained model are non-negative, so the negative branch of the
/// formatter is dead in practice; it is kept so a zero importance still
/// renders as `+0.0%`.
pub fn build_response(price: f64, importances: &[f64]) -> PredictionData {
    let mut ranked: Vec<(&'static str, f64)> = FACTOR_NAMES
        .iter()
        .copied()
        .zip(importances.iter().copied())
        .collect();

    ranked.sort_by(|a, b| {
        b.1.abs()
            .partial_cmp(&a.1.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let factors = ranked
        .into_iter()
        .map(|(name, importance)| Factor {
            name,
            impact: format_impact(importance),
        })
        .collect();

    PredictionData {
        price,
        price_range: PriceRange {
            low: price * (1.0 - PRICE_BAND),
            high: price * (1.0 + PRICE_BAND),
        },
        confidence: CONFIDENCE,
        factors,
    }
}

/// Signed percentage string for an importance weight.
fn format_impact(importance: f64) -> String {
    let percent = importance * 100.0;
    if importance >= 0.0 {
        format!("+{:.1}%", percent)
    } else {
        format!("-{:.1}%", percent.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_band_exact() {
        let data = build_response(50_000.0, &[0.0; 10]);
        assert_eq!(data.price, 50_000.0);
        assert_eq!(data.price_range.low, 0.9 * 50_000.0);
        assert_eq!(data.price_range.high, 1.1 * 50_000.0);
        assert_eq!(data.confidence, 90);
    }

    #[test]
    fn test_factors_ranked_by_absolute_impact() {
        let importances = [0.05, 0.30, 0.20, 0.01, 0.02, 0.03, 0.04, 0.06, 0.09, 0.20];
        let data = build_response(10_000.0, &importances);

        assert_eq!(data.factors.len(), 10);
        assert_eq!(data.factors[0].name, "Year"); // 0.30
        assert_eq!(data.factors[0].impact, "+30.0%");

        let impacts: Vec<f64> = data
            .factors
            .iter()
            .map(|f| f.impact.trim_start_matches('+').trim_end_matches('%').parse::<f64>().unwrap())
            .collect();
        for pair in impacts.windows(2) {
            assert!(pair[0] >= pair[1], "factors not in descending order");
        }
    }

    #[test]
    fn test_zero_importance_renders_positive() {
        let data = build_response(10_000.0, &[0.0; 10]);
        for factor in &data.factors {
            assert_eq!(factor.impact, "+0.0%");
        }
    }

    #[test]
    fn test_negative_branch_preserved() {
        assert_eq!(format_impact(-0.123), "-12.3%");
    }
}
