//! Product filtering and sorting.
//!
//! [`apply`] is a pure function of `(products, spec)`: it never mutates its input and
//! always produces the same ordered output for the same arguments, which is what makes
//! [`CatalogView`](super::CatalogView) memoisation valid.

use crate::model::Product;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort order of the product listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// `created_at`, newest first.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    RatingDesc,
}

/// Inclusive price bounds, compared against the list price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

/// The user's choice of category, price range, search text and sort key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    pub category: Option<String>,
    pub price_range: Option<PriceRange>,
    /// Case-insensitive substring of name or description. Empty matches everything.
    pub search: String,
    pub sort: SortKey,
}

impl FilterSpec {
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_category(product) && self.matches_price(product) && self.matches_search(product)
    }

    fn matches_category(&self, product: &Product) -> bool {
        self.category
            .as_deref()
            .is_none_or(|category| product.category == category)
    }

    fn matches_price(&self, product: &Product) -> bool {
        self.price_range
            .is_none_or(|range| range.contains(product.price))
    }

    fn matches_search(&self, product: &Product) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        product.name.to_lowercase().contains(&needle)
            || product.description.to_lowercase().contains(&needle)
    }
}

impl SortKey {
    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortKey::Newest => b.created_at.cmp(&a.created_at),
            SortKey::PriceAsc => a.price.total_cmp(&b.price),
            SortKey::PriceDesc => b.price.total_cmp(&a.price),
            SortKey::RatingDesc => b.rating.total_cmp(&a.rating),
        }
    }
}

/// Filters `products` by `spec`, then sorts the survivors with one stable sort.
///
/// Products that compare equal under the sort key keep their input order.
pub fn apply(products: &[Product], spec: &FilterSpec) -> Vec<Product> {
    let mut result: Vec<Product> = products
        .iter()
        .filter(|product| spec.matches(product))
        .cloned()
        .collect();
    result.sort_by(|a, b| spec.sort.compare(a, b));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProductCreate, ProductId};
    use chrono::{DateTime, Duration};

    fn product(id: u32, name: &str, category: &str, price: f64, age_days: i64) -> Product {
        let mut p = Product::new(
            ProductId(id),
            ProductCreate {
                name: name.into(),
                description: format!("{name} for the home"),
                price,
                category: category.into(),
                stock: 1,
                ..Default::default()
            },
        );
        let epoch = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        p.created_at = epoch - Duration::days(age_days);
        p
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Denim Jeans", "clothing", 40.0, 3),
            product(2, "Sofa", "furniture", 500.0, 1),
            product(3, "Desk", "furniture", 120.0, 2),
            product(4, "T-Shirt", "clothing", 15.0, 0),
            product(5, "Chair", "furniture", 120.0, 5),
        ]
    }

    fn ids(products: &[Product]) -> Vec<u32> {
        products.iter().map(|p| p.id.0).collect()
    }

    #[test]
    fn default_spec_sorts_newest_first() {
        let result = apply(&catalog(), &FilterSpec::default());
        assert_eq!(ids(&result), vec![4, 2, 3, 1, 5]);
        for pair in result.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[test]
    fn category_filter_keeps_exactly_that_category() {
        let spec = FilterSpec {
            category: Some("furniture".into()),
            ..Default::default()
        };
        let result = apply(&catalog(), &spec);
        assert!(result.iter().all(|p| p.category == "furniture"));
        let mut got = ids(&result);
        got.sort();
        assert_eq!(got, vec![2, 3, 5]);
    }

    #[test]
    fn price_range_is_inclusive() {
        let spec = FilterSpec {
            price_range: Some(PriceRange::new(40.0, 120.0)),
            sort: SortKey::PriceAsc,
            ..Default::default()
        };
        let result = apply(&catalog(), &spec);
        // Both 120.0 products tie; input order (3 before 5) is kept.
        assert_eq!(ids(&result), vec![1, 3, 5]);
    }

    #[test]
    fn search_is_case_insensitive_over_name_or_description() {
        let mut items = catalog();
        items[1].description = "Three seater".into();
        let spec = FilterSpec {
            search: "de".into(),
            ..Default::default()
        };
        let result = apply(&items, &spec);
        let got = ids(&result);
        assert!(got.contains(&1), "Denim Jeans matches 'de'");
        assert!(got.contains(&3), "Desk matches 'de'");
        assert!(!got.contains(&2), "Sofa has no 'de' anywhere");

        let upper = FilterSpec {
            search: "HOME".into(),
            ..Default::default()
        };
        assert_eq!(apply(&items, &upper).len(), 4);
    }

    #[test]
    fn price_and_rating_sorts_are_stable() {
        let mut items = catalog();
        items[0].rating = 4.5;
        items[2].rating = 4.5;
        items[3].rating = 3.0;

        let by_rating = apply(
            &items,
            &FilterSpec {
                sort: SortKey::RatingDesc,
                ..Default::default()
            },
        );
        assert_eq!(ids(&by_rating), vec![1, 3, 4, 2, 5]);

        let by_price = apply(
            &items,
            &FilterSpec {
                sort: SortKey::PriceDesc,
                ..Default::default()
            },
        );
        assert_eq!(ids(&by_price), vec![2, 3, 5, 1, 4]);
    }

    #[test]
    fn pipeline_is_deterministic_and_leaves_input_alone() {
        let items = catalog();
        let before = items.clone();
        let spec = FilterSpec {
            category: Some("furniture".into()),
            search: "s".into(),
            sort: SortKey::PriceAsc,
            ..Default::default()
        };

        let first = apply(&items, &spec);
        let second = apply(&items, &spec);
        assert_eq!(first, second);
        assert_eq!(items, before);
    }

    #[test]
    fn sort_key_uses_kebab_case_names() {
        assert_eq!(
            serde_json::to_string(&SortKey::PriceAsc).unwrap(),
            "\"price-asc\""
        );
        let key: SortKey = serde_json::from_str("\"rating-desc\"").unwrap();
        assert_eq!(key, SortKey::RatingDesc);
    }
}
