// src/filter/mod.rs

use crate::db::{self, Fetched, Store};
use crate::models::{BoundQuery, Scalar, ALL_CITIES};

// UNION drops duplicates across both sources.
const CITIES_SQL: &str = r#"
    SELECT City FROM Providers WHERE City IS NOT NULL
    UNION
    SELECT Location FROM Food_Listings WHERE Location IS NOT NULL
"#;

/// Every distinct provider city and listing location, sorted.
pub async fn list_cities(store: &Store) -> Fetched<Vec<String>> {
    db::run_query(store, &BoundQuery::new(CITIES_SQL))
        .await
        .map(|table| {
            let mut cities: Vec<String> = table
                .rows
                .into_iter()
                .filter_map(|row| match row.into_iter().next() {
                    Some(Scalar::Null) | None => None,
                    Some(Scalar::Text(city)) => Some(city),
                    Some(other) => Some(other.to_string()),
                })
                .collect();
            cities.sort();
            cities.dedup();
            cities
        })
}

/// The selector's choices: `All Cities` first, then each city.
pub fn scope_options(cities: &[String]) -> Vec<String> {
    std::iter::once(ALL_CITIES.to_string())
        .chain(cities.iter().cloned())
        .collect()
}
