//! Route-matrix batching and response parsing.
//!
//! Responses come either as a bare JSON array of elements or as an object
//! with a `matrix` array. Zero-valued fields are omitted on the wire, so a
//! missing index means `0` and a missing status means OK.

use std::collections::BTreeMap;
use std::ops::Range;

use serde::Deserialize;
use serde_json::Value;

/// Largest `origins × destinations` product sent in one request.
pub const MAX_MATRIX_ELEMENTS: usize = 625;

/// Origins per request once a matrix has to be split.
pub const ORIGIN_CHUNK: usize = 25;

/// Splits `origins` into the origin ranges to request.
///
/// A matrix within [`MAX_MATRIX_ELEMENTS`] is sent whole; anything larger is
/// split into [`ORIGIN_CHUNK`]-sized origin ranges against the full
/// destination list.
#[must_use]
pub fn plan_batches(origins: usize, destinations: usize) -> Vec<Range<usize>> {
    if origins == 0 || destinations == 0 {
        return Vec::new();
    }
    if origins * destinations <= MAX_MATRIX_ELEMENTS {
        return vec![0..origins];
    }

    (0..origins)
        .step_by(ORIGIN_CHUNK)
        .map(|start| start..(start + ORIGIN_CHUNK).min(origins))
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MatrixResponse {
    Bare(Vec<MatrixElement>),
    Wrapped {
        #[serde(default)]
        matrix: Vec<MatrixElement>,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct MatrixElement {
    origin_index: usize,
    destination_index: usize,
    distance_meters: Option<f64>,
    duration: Option<Value>,
    status: Option<Value>,
}

impl MatrixElement {
    fn is_ok(&self) -> bool {
        let code = match &self.status {
            None => return true,
            Some(Value::Object(status)) => match status.get("code") {
                None => return true,
                Some(code) => code,
            },
            Some(code) => code,
        };

        match code {
            Value::Number(n) => n.as_i64() == Some(0),
            Value::String(s) => s == "OK",
            Value::Null => true,
            _ => false,
        }
    }

    fn duration_seconds(&self) -> Option<f64> {
        let seconds = match self.duration.as_ref()? {
            Value::String(s) => s.strip_suffix('s')?.parse::<f64>().ok()?,
            Value::Object(obj) => match obj.get("seconds")? {
                Value::Number(n) => n.as_f64()?,
                Value::String(s) => s.parse::<f64>().ok()?,
                _ => return None,
            },
            _ => return None,
        };
        (seconds > 0.0).then_some(seconds)
    }
}

/// A routed leg between one hotel and one landmark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutedLeg {
    pub distance_km: f64,
    /// Absent when the element carried no positive duration.
    pub travel_time_minutes: Option<f64>,
}

/// Routed legs keyed by `(origin index, destination index)`.
pub type RoutedLegs = BTreeMap<(usize, usize), RoutedLeg>;

/// Parses one matrix response body and adds its usable elements to `legs`.
///
/// Element origin indexes are shifted by `origin_offset` so batched
/// responses line up with the full origin list. Only elements with an OK
/// status and a strictly positive distance are kept; the first usable
/// element for a pair wins.
///
/// # Errors
///
/// Returns the parse error if `body` is neither a bare element array nor an
/// object with a `matrix` array.
pub fn collect_legs(
    body: &str,
    origin_offset: usize,
    legs: &mut RoutedLegs,
) -> Result<usize, serde_json::Error> {
    let elements = match serde_json::from_str::<MatrixResponse>(body)? {
        MatrixResponse::Bare(elements) | MatrixResponse::Wrapped { matrix: elements } => elements,
    };

    let mut added = 0;
    for element in elements {
        if !element.is_ok() {
            continue;
        }
        let Some(meters) = element.distance_meters.filter(|m| *m > 0.0) else {
            continue;
        };

        let key = (element.origin_index + origin_offset, element.destination_index);
        if legs.contains_key(&key) {
            continue;
        }
        legs.insert(
            key,
            RoutedLeg {
                distance_km: meters / 1000.0,
                travel_time_minutes: element.duration_seconds().map(|s| s / 60.0),
            },
        );
        added += 1;
    }

    Ok(added)
}
