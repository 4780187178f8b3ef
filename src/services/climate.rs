//! Reduction of a daily climate series into a [`ClimateSummary`].
//!
//! Buckets are independent predicates evaluated against every day, so a wet
//! overcast day counts as both Rainy and Cloudy. The dominant condition is the
//! bucket with the most days, ties going to the earlier entry of [`BUCKETS`].

use crate::models::{
    ClimateSummary, ConditionBreakdown, DailyClimateSample, DailyConditions, MonthlyClimate,
    WeatherCondition, WindClassification,
};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

const RAIN_THRESHOLD_MM: f64 = 1.0;
const SNOW_THRESHOLD_CM: f64 = 0.1;
const SUNNY_MAX_CLOUD_COVER: f64 = 20.0;
const SUNNY_MIN_RADIATION: f64 = 15.0;
const CLOUDY_MIN_CLOUD_COVER: f64 = 50.0;

const KMH_TO_MS: f64 = 0.27778;

/// Sanitized view of a day used for classification
#[derive(Debug, Clone, Copy)]
struct Day {
    cloud_cover: f64,
    radiation: f64,
    rain: f64,
    snowfall: f64,
}

type Predicate = fn(&Day) -> bool;

/// Buckets in tie-break order
const BUCKETS: [(WeatherCondition, Predicate); 5] = [
    (WeatherCondition::Rainy, |d: &Day| d.rain > RAIN_THRESHOLD_MM),
    (WeatherCondition::Snowy, |d: &Day| d.snowfall > SNOW_THRESHOLD_CM),
    (WeatherCondition::Sunny, |d: &Day| {
        d.cloud_cover < SUNNY_MAX_CLOUD_COVER && d.radiation > SUNNY_MIN_RADIATION
    }),
    (WeatherCondition::Cloudy, |d: &Day| d.cloud_cover > CLOUDY_MIN_CLOUD_COVER),
    (WeatherCondition::PartlyCloudy, |d: &Day| {
        (SUNNY_MAX_CLOUD_COVER..=CLOUDY_MIN_CLOUD_COVER).contains(&d.cloud_cover)
    }),
];

/// Upper bounds (m/s, exclusive) of Beaufort forces 0 to 11; anything above is force 12
const BEAUFORT_SCALE: [(f64, &str); 12] = [
    (0.3, "Calm"),
    (1.6, "Light Air"),
    (3.4, "Light Breeze"),
    (5.5, "Gentle Breeze"),
    (8.0, "Moderate Breeze"),
    (10.8, "Fresh Breeze"),
    (13.9, "Strong Breeze"),
    (17.2, "Near Gale"),
    (20.8, "Gale"),
    (24.5, "Strong Gale"),
    (28.5, "Whole Gale"),
    (32.7, "Storm Force"),
];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClimateError {
    #[error("no climate data available for the requested range")]
    NoData,
}

/// NaN and infinities count as zero
fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn raw_finite_mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Mean of the finite values, rounded to one decimal; `None` when there are none
fn finite_mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    raw_finite_mean(values).map(round1)
}

/// Classification happens before any rounding so a boundary is never crossed by display precision
fn mean_wind<'a>(
    samples: impl Iterator<Item = &'a DailyClimateSample>,
) -> Option<WindClassification> {
    raw_finite_mean(samples.map(|s| s.wind_speed_mean * KMH_TO_MS)).map(classify_wind)
}

/// Groups samples by calendar month. Days whose date does not parse are left out.
fn monthly_climate(samples: &[DailyClimateSample]) -> Vec<MonthlyClimate> {
    let mut months: BTreeMap<u32, Vec<&DailyClimateSample>> = BTreeMap::new();
    for sample in samples {
        match NaiveDate::parse_from_str(&sample.date, "%Y-%m-%d") {
            Ok(date) => months.entry(date.month()).or_default().push(sample),
            Err(_) => tracing::debug!(date = %sample.date, "Skipping undated climate sample"),
        }
    }

    months
        .into_iter()
        .map(|(month, days)| MonthlyClimate {
            month,
            days: days.len(),
            average_temperature: finite_mean(days.iter().map(|s| s.temperature_mean)),
            average_temperature_max: finite_mean(days.iter().map(|s| s.temperature_max)),
            average_temperature_min: finite_mean(days.iter().map(|s| s.temperature_min)),
            average_humidity: finite_mean(days.iter().map(|s| s.relative_humidity_mean)),
            wind: mean_wind(days.iter().copied()),
        })
        .collect()
}

/// Buckets matched by one day, in tie-break order
pub fn classify_day(sample: &DailyClimateSample) -> Vec<WeatherCondition> {
    let day = Day {
        cloud_cover: sanitize(sample.cloud_cover_mean),
        radiation: sanitize(sample.shortwave_radiation_sum),
        rain: sanitize(sample.rain_sum),
        snowfall: sanitize(sample.snowfall_sum),
    };
    BUCKETS
        .iter()
        .filter(|(_, predicate)| predicate(&day))
        .map(|(condition, _)| *condition)
        .collect()
}

/// Beaufort force for a wind speed in m/s
pub fn classify_wind(speed_ms: f64) -> WindClassification {
    let (number, description) = BEAUFORT_SCALE
        .iter()
        .enumerate()
        .find(|(_, (upper, _))| speed_ms < *upper)
        .map(|(force, (_, name))| (force as u8, *name))
        .unwrap_or((12, "Hurricane Force"));

    WindClassification {
        mean_speed_ms: round1(speed_ms),
        beaufort_number: number,
        description: description.to_string(),
    }
}

/// Summarize `samples`. Fails with [`ClimateError::NoData`] for an empty series.
pub fn summarize(samples: &[DailyClimateSample]) -> Result<ClimateSummary, ClimateError> {
    if samples.is_empty() {
        return Err(ClimateError::NoData);
    }
    let total_days = samples.len();

    let mut counts = [0usize; BUCKETS.len()];
    let mut daily = Vec::with_capacity(total_days);

    for sample in samples {
        let conditions = classify_day(sample);
        for condition in &conditions {
            if let Some(index) = BUCKETS.iter().position(|(c, _)| c == condition) {
                counts[index] += 1;
            }
        }
        daily.push(DailyConditions {
            date: sample.date.clone(),
            temperature_mean: sanitize(sample.temperature_mean),
            cloud_cover_mean: sanitize(sample.cloud_cover_mean),
            shortwave_radiation_sum: sanitize(sample.shortwave_radiation_sum),
            rain_sum: sanitize(sample.rain_sum),
            snowfall_sum: sanitize(sample.snowfall_sum),
            conditions,
        });
    }

    // Strictly greater keeps the earliest bucket on ties
    let mut dominant: Option<(WeatherCondition, usize)> = None;
    for ((condition, _), &count) in BUCKETS.iter().zip(&counts) {
        if count > 0 && dominant.is_none_or(|(_, best)| count > best) {
            dominant = Some((*condition, count));
        }
    }

    let weather_breakdown = BUCKETS
        .iter()
        .zip(&counts)
        .filter(|(_, count)| **count > 0)
        .map(|((condition, _), &days)| {
            (
                condition.as_str().to_string(),
                ConditionBreakdown {
                    days,
                    percentage: round1(100.0 * days as f64 / total_days as f64),
                },
            )
        })
        .collect::<BTreeMap<_, _>>();

    Ok(ClimateSummary {
        total_days,
        average_temperature: finite_mean(samples.iter().map(|s| s.temperature_mean)),
        average_temperature_max: finite_mean(samples.iter().map(|s| s.temperature_max)),
        average_temperature_min: finite_mean(samples.iter().map(|s| s.temperature_min)),
        average_humidity: finite_mean(samples.iter().map(|s| s.relative_humidity_mean)),
        average_humidity_max: finite_mean(samples.iter().map(|s| s.relative_humidity_max)),
        average_humidity_min: finite_mean(samples.iter().map(|s| s.relative_humidity_min)),
        wind: mean_wind(samples.iter()),
        average_wind_max_ms: finite_mean(samples.iter().map(|s| s.wind_speed_max * KMH_TO_MS)),
        dominant_condition: dominant.map(|(condition, _)| condition),
        weather_breakdown,
        daily,
        monthly: monthly_climate(samples),
    })
}
