#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Text-search collection for one city.
//!
//! [`TextSearchCollector::collect`] walks the city's search strategies in
//! order and pages through each one until the API stops returning a page
//! token, the hotel target is reached, or the daily text-search quota runs
//! out. Every page body is dumped verbatim before it is parsed. Records
//! must pass [`RawPlaceRecord::is_valid`] and the [`DedupLedger`] before
//! they are kept.
//!
//! A completed search is checkpointed: when the `text_search` stage is
//! already marked complete and `hotels_raw.json` exists, the saved list is
//! returned without touching the API.

use hotel_atlas_city::{CityConfig, resolve_strategy};
use hotel_atlas_client::{ApiUsage, Pacing, PlacesSearch};
use hotel_atlas_hotel_models::{ApiCategory, RawPlaceRecord};
use hotel_atlas_store::{
    DedupLedger, OutputLayout, ProgressStore, Stage, StoreError, read_json, write_json, write_raw,
};
use serde::Deserialize;

/// Errors that abort a city's text search.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    /// Checkpoint or artifact persistence failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// One page of a text-search response.
///
/// Places are kept as raw JSON values here so that one malformed record
/// only drops itself, not the whole page.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TextSearchPage {
    places: Vec<serde_json::Value>,
    next_page_token: Option<String>,
}

/// Drives the places API for one city.
pub struct TextSearchCollector<'a> {
    places: &'a dyn PlacesSearch,
    layout: &'a OutputLayout,
    pacing: Pacing,
}

impl<'a> TextSearchCollector<'a> {
    #[must_use]
    pub const fn new(places: &'a dyn PlacesSearch, layout: &'a OutputLayout, pacing: Pacing) -> Self {
        Self {
            places,
            layout,
            pacing,
        }
    }

    /// Collects up to `max_hotels` unique, valid place records for `city`.
    ///
    /// Records past `max_hotels` are never offered to the dedup ledger, so
    /// a later run can still collect them.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::Store`] if a raw dump or checkpoint artifact
    /// cannot be written. An unreadable checkpoint is logged and the search
    /// runs again. API failures never error: a failed page ends its strategy
    /// and the next strategy is tried.
    pub async fn collect(
        &self,
        city: &CityConfig,
        max_hotels: usize,
        usage: &mut ApiUsage,
    ) -> Result<Vec<RawPlaceRecord>, CollectError> {
        let progress = ProgressStore::new(self.layout.clone());
        let hotels_path = self.layout.hotels_raw(&city.name);

        let mut ledger = DedupLedger::load(self.layout, &city.name);

        if progress.load(&city.name).is_complete(Stage::TextSearch) && hotels_path.exists() {
            match read_json::<Vec<RawPlaceRecord>>(&hotels_path) {
                Ok(hotels) => {
                    log::info!(
                        "Text search already complete for {}, loaded {} hotels from checkpoint",
                        city.name,
                        hotels.len()
                    );
                    return Ok(hotels);
                }
                Err(e) => {
                    // The ledger holds the lost hotels, so it cannot be reused.
                    log::warn!(
                        "Checkpointed hotel list for {} is unreadable ({e}), searching again",
                        city.name
                    );
                    ledger = DedupLedger::default();
                }
            }
        }

        let mut hotels: Vec<RawPlaceRecord> = Vec::new();
        let mut min_review_count: Option<u64> = None;
        let mut quota_exhausted = false;

        'strategies: for (strategy_idx, strategy) in city.search_strategies.iter().enumerate() {
            if hotels.len() >= max_hotels {
                break;
            }

            let Some(query) = resolve_strategy(strategy, min_review_count) else {
                log::warn!("Skipping strategy {strategy:?}: no review count observed yet");
                continue;
            };
            log::info!(
                "Strategy {}/{}: {query}",
                strategy_idx + 1,
                city.search_strategies.len()
            );

            let mut page_token: Option<String> = None;
            let mut page = 0usize;

            while hotels.len() < max_hotels {
                usage
                    .wait_for_capacity(ApiCategory::TextSearch, self.pacing.rate_limit_poll)
                    .await;

                if usage.quota_exhausted(ApiCategory::TextSearch) {
                    log::warn!("Daily text search quota reached, stopping search for {}", city.name);
                    quota_exhausted = true;
                    break 'strategies;
                }

                let Some(body) = self
                    .places
                    .search_text(&query, page_token.as_deref())
                    .await
                else {
                    log::warn!("Text search failed for {query:?}, moving to next strategy");
                    break;
                };
                usage.record(ApiCategory::TextSearch, 1);

                write_raw(
                    &self.layout.text_search_dump(&city.name, strategy_idx, page),
                    &body,
                )?;

                let parsed: TextSearchPage = match serde_json::from_str(&body) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        log::warn!("Malformed text search response for {query:?}: {e}");
                        break;
                    }
                };

                if parsed.places.is_empty() {
                    log::debug!("No places on page {page} for {query:?}");
                    break;
                }

                let mut accepted = 0usize;
                for value in parsed.places {
                    if hotels.len() >= max_hotels {
                        break;
                    }
                    let record: RawPlaceRecord = match serde_json::from_value(value) {
                        Ok(record) => record,
                        Err(e) => {
                            log::debug!("Dropping unparseable place record: {e}");
                            continue;
                        }
                    };
                    if !record.is_valid() {
                        log::debug!("Dropping invalid place record {:?}", record.id);
                        continue;
                    }
                    if !ledger.offer(&record) {
                        log::debug!("Dropping duplicate place record {:?}", record.id);
                        continue;
                    }

                    if let Some(count) = record.user_rating_count {
                        min_review_count = Some(min_review_count.map_or(count, |m| m.min(count)));
                    }
                    hotels.push(record);
                    accepted += 1;
                }
                log::info!(
                    "  page {page}: {accepted} new hotels ({} total)",
                    hotels.len()
                );

                match parsed.next_page_token {
                    Some(token) if !token.is_empty() => page_token = Some(token),
                    _ => break,
                }
                page += 1;

                tokio::time::sleep(self.pacing.page_delay).await;
            }
        }

        write_json(&hotels_path, &hotels)?;
        ledger.save(self.layout, &city.name)?;

        if hotels.is_empty() {
            log::warn!("Text search found no hotels for {}", city.name);
        } else {
            progress.save(
                &city.name,
                Stage::TextSearch,
                serde_json::json!({
                    "hotels_count": hotels.len(),
                    "quota_exhausted": quota_exhausted,
                }),
            )?;
        }

        log::info!("Collected {} hotels for {}", hotels.len(), city.name);
        Ok(hotels)
    }
}
