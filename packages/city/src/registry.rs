//! City registry: loads all city definitions from embedded TOML configs.
//!
//! Adding a city means adding a TOML file under `packages/city/cities/` and
//! listing it below.

use crate::{CityConfig, CityError, parse_city_toml};

/// TOML configs embedded at compile time.
const CITY_TOMLS: &[(&str, &str)] = &[
    ("delhi", include_str!("../cities/delhi.toml")),
    ("mumbai", include_str!("../cities/mumbai.toml")),
    ("bengaluru", include_str!("../cities/bengaluru.toml")),
    ("hyderabad", include_str!("../cities/hyderabad.toml")),
    ("chennai", include_str!("../cities/chennai.toml")),
    ("kolkata", include_str!("../cities/kolkata.toml")),
    ("pune", include_str!("../cities/pune.toml")),
    ("ahmedabad", include_str!("../cities/ahmedabad.toml")),
    ("jaipur", include_str!("../cities/jaipur.toml")),
    ("lucknow", include_str!("../cities/lucknow.toml")),
    ("bhubaneswar", include_str!("../cities/bhubaneswar.toml")),
    ("kochi", include_str!("../cities/kochi.toml")),
];

/// Total number of configured cities (used in tests).
#[cfg(test)]
const EXPECTED_CITY_COUNT: usize = 12;

/// Returns all configured cities in registry order.
///
/// # Panics
///
/// Panics if any TOML config is malformed (the configs are embedded, so
/// this is caught by the registry tests).
#[must_use]
pub fn all_cities() -> Vec<CityConfig> {
    CITY_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_city_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Looks up a city by name, case-insensitively.
///
/// # Errors
///
/// Returns [`CityError::UnknownCity`] if no configured city matches.
pub fn find_city(name: &str) -> Result<CityConfig, CityError> {
    all_cities()
        .into_iter()
        .find(|city| city.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| CityError::UnknownCity {
            name: name.to_string(),
        })
}

/// Resolves a list of city names. An empty list selects every configured
/// city.
///
/// # Errors
///
/// Returns [`CityError::UnknownCity`] for the first name that does not
/// match a configured city.
pub fn select_cities(names: &[String]) -> Result<Vec<CityConfig>, CityError> {
    if names.is_empty() {
        return Ok(all_cities());
    }

    names.iter().map(|name| find_city(name)).collect()
}
