#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal plumbing for the `hotel_atlas` binary.
//!
//! [`init_logger`] installs `pretty_env_logger` behind
//! `indicatif-log-bridge`, so log lines are suspended while progress bars
//! redraw. [`IndicatifProgress`] renders the pipeline's
//! [`ProgressCallback`] updates as `indicatif` bars.

use std::sync::Arc;
use std::time::Duration;

use hotel_atlas_client::ProgressCallback;
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

const CITIES_TEMPLATE: &str = "{msg} {wide_bar:.green/dim} {pos}/{len} cities [{elapsed_precise}]";
const HOTELS_TEMPLATE: &str = "  {msg} {wide_bar:.cyan/dim} {pos}/{len} hotels {percent}% [{eta}]";
const WAITING_TEMPLATE: &str = "{spinner:.cyan} {msg}";

fn bar_style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}

/// A [`ProgressCallback`] drawn as an `indicatif` bar.
///
/// Until the first `set_total` the bar spins; afterwards it switches to
/// `counted`.
pub struct IndicatifProgress {
    bar: ProgressBar,
    counted: ProgressStyle,
}

impl IndicatifProgress {
    /// Bar over the cities of a run.
    #[must_use]
    pub fn cities_bar(multi: &MultiProgress, total: u64) -> Arc<dyn ProgressCallback> {
        let counted = bar_style(CITIES_TEMPLATE);
        let bar = multi.add(ProgressBar::new(total).with_style(counted.clone()));
        bar.set_message("Cities");

        Arc::new(Self { bar, counted })
    }

    /// Bar over the hotels being enriched for the current city.
    #[must_use]
    pub fn hotels_bar(multi: &MultiProgress, message: &str) -> Arc<dyn ProgressCallback> {
        let waiting = ProgressStyle::with_template(WAITING_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let bar = multi.add(ProgressBar::new_spinner().with_style(waiting));
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_message(message.to_string());

        Arc::new(Self {
            bar,
            counted: bar_style(HOTELS_TEMPLATE),
        })
    }
}

impl ProgressCallback for IndicatifProgress {
    fn set_total(&self, total: u64) {
        self.bar.reset();
        self.bar.set_length(total);
        self.bar.set_style(self.counted.clone());
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}

/// Installs the global logger and returns the [`MultiProgress`] every bar
/// must be added to.
///
/// The level defaults to `info`; `RUST_LOG` overrides it.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    // Fails only if a logger is already installed.
    if indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .is_ok()
    {
        log::set_max_level(level);
    }

    multi
}
