//! Aggregates derived from other records: product ratings and cart totals.

use crate::model::CartLine;
use serde::{Deserialize, Serialize};

/// Mean rating and review count of one product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewStats {
    /// Arithmetic mean, 0 when there are no reviews.
    pub rating: f64,
    pub count: u32,
}

impl ReviewStats {
    pub fn from_ratings(ratings: impl IntoIterator<Item = u8>) -> Self {
        let (sum, count) = ratings
            .into_iter()
            .fold((0u32, 0u32), |(sum, count), r| (sum + u32::from(r), count + 1));
        if count == 0 {
            return Self::default();
        }
        Self {
            rating: f64::from(sum) / f64::from(count),
            count,
        }
    }
}

/// Sum of discounted unit price times quantity over every line.
pub fn cart_total(lines: &[CartLine]) -> f64 {
    lines.iter().map(CartLine::subtotal).sum()
}

/// Number of units in the cart.
pub fn cart_count(lines: &[CartLine]) -> u32 {
    lines.iter().map(|line| line.quantity).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Product, ProductCreate, ProductId};

    #[test]
    fn review_stats_mean_and_count() {
        assert_eq!(ReviewStats::from_ratings([]), ReviewStats::default());
        assert_eq!(
            ReviewStats::from_ratings([4]),
            ReviewStats {
                rating: 4.0,
                count: 1
            }
        );
        assert_eq!(
            ReviewStats::from_ratings([4, 2]),
            ReviewStats {
                rating: 3.0,
                count: 2
            }
        );
    }

    #[test]
    fn cart_total_uses_discounted_prices() {
        let line = |price: f64, discount: Option<f64>, quantity: u32| CartLine {
            product: Product::new(
                ProductId(1),
                ProductCreate {
                    name: "x".into(),
                    price,
                    discount_percentage: discount,
                    ..Default::default()
                },
            ),
            quantity,
        };
        let lines = vec![line(100.0, Some(10.0), 2), line(25.0, None, 1)];
        assert_eq!(cart_total(&lines), 205.0);
        assert_eq!(cart_count(&lines), 3);
        assert_eq!(cart_total(&[]), 0.0);
    }
}
