use std::collections::BTreeMap;

use crate::models::{CarSummary, PriceStats, YearPriceStats};

/// Summary statistics over a set of matched listings.
///
/// An empty set yields all-zero stats rather than an error; the comparator
/// treats "nothing matched" as a valid answer.
pub fn price_stats(cars: &[CarSummary]) -> PriceStats {
    if cars.is_empty() {
        return PriceStats::default();
    }

    let prices: Vec<i64> = cars.iter().map(|car| car.price).collect();
    let sum: i64 = prices.iter().sum();

    PriceStats {
        avg_price: sum as f64 / prices.len() as f64,
        min_price: *prices.iter().min().unwrap_or(&0),
        max_price: *prices.iter().max().unwrap_or(&0),
        count: cars.len() as i64,
    }
}

/// Per-year price breakdown, sorted by year descending.
pub fn price_by_year(cars: &[CarSummary]) -> Vec<YearPriceStats> {
    let mut by_year: BTreeMap<i32, Vec<i64>> = BTreeMap::new();
    for car in cars {
        by_year.entry(car.year).or_default().push(car.price);
    }

    by_year
        .into_iter()
        .rev()
        .map(|(year, prices)| {
            let sum: i64 = prices.iter().sum();
            YearPriceStats {
                year,
                avg_price: sum as f64 / prices.len() as f64,
                min_price: *prices.iter().min().unwrap_or(&0),
                max_price: *prices.iter().max().unwrap_or(&0),
                count: prices.len() as i64,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car(year: i32, price: i64) -> CarSummary {
        CarSummary {
            id: 1,
            make: "Toyota".to_string(),
            model: "Corolla".to_string(),
            year,
            price,
            mileage: 50_000,
            body_type: "Sedan".to_string(),
            cylinders: Some(4),
            transmission: "Automatic".to_string(),
            fuel_type: "Gasoline".to_string(),
            color: "White".to_string(),
            location: "Dubai".to_string(),
        }
    }

    #[test]
    fn test_empty_set_yields_zero_stats() {
        let stats = price_stats(&[]);
        assert_eq!(stats.avg_price, 0.0);
        assert_eq!(stats.min_price, 0);
        assert_eq!(stats.max_price, 0);
        assert_eq!(stats.count, 0);
        assert!(price_by_year(&[]).is_empty());
    }

    #[test]
    fn test_price_stats() {
        let cars = vec![car(2019, 40_000), car(2020, 60_000), car(2018, 50_000)];
        let stats = price_stats(&cars);

        assert_eq!(stats.avg_price, 50_000.0);
        assert_eq!(stats.min_price, 40_000);
        assert_eq!(stats.max_price, 60_000);
        assert_eq!(stats.count, 3);
    }

    #[test]
    fn test_price_by_year_sorted_descending() {
        let cars = vec![
            car(2018, 30_000),
            car(2020, 60_000),
            car(2020, 40_000),
            car(2019, 45_000),
        ];

        let breakdown = price_by_year(&cars);
        assert_eq!(breakdown.len(), 3);
        assert_eq!(breakdown[0].year, 2020);
        assert_eq!(breakdown[0].count, 2);
        assert_eq!(breakdown[0].avg_price, 50_000.0);
        assert_eq!(breakdown[0].min_price, 40_000);
        assert_eq!(breakdown[0].max_price, 60_000);
        assert_eq!(breakdown[1].year, 2019);
        assert_eq!(breakdown[2].year, 2018);
    }
}
