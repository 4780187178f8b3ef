//! Climate samples, summaries and the weather endpoint models.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One day of provider data. Missing values are carried as NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyClimateSample {
    pub date: String,
    pub temperature_mean: f64,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub relative_humidity_mean: f64,
    pub relative_humidity_max: f64,
    pub relative_humidity_min: f64,
    /// km/h, as delivered by the provider
    pub wind_speed_mean: f64,
    /// km/h
    pub wind_speed_max: f64,
    /// Percent
    pub cloud_cover_mean: f64,
    /// MJ/m²
    pub shortwave_radiation_sum: f64,
    /// mm
    pub rain_sum: f64,
    /// cm
    pub snowfall_sum: f64,
}

impl DailyClimateSample {
    /// A day with every variable missing
    pub fn empty(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            temperature_mean: f64::NAN,
            temperature_max: f64::NAN,
            temperature_min: f64::NAN,
            relative_humidity_mean: f64::NAN,
            relative_humidity_max: f64::NAN,
            relative_humidity_min: f64::NAN,
            wind_speed_mean: f64::NAN,
            wind_speed_max: f64::NAN,
            cloud_cover_mean: f64::NAN,
            shortwave_radiation_sum: f64::NAN,
            rain_sum: f64::NAN,
            snowfall_sum: f64::NAN,
        }
    }
}

/// Sky and precipitation buckets, in tie-break order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Apiv2Schema)]
pub enum WeatherCondition {
    Rainy,
    Snowy,
    Sunny,
    Cloudy,
    #[serde(rename = "Partly Cloudy")]
    PartlyCloudy,
}

impl WeatherCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCondition::Rainy => "Rainy",
            WeatherCondition::Snowy => "Snowy",
            WeatherCondition::Sunny => "Sunny",
            WeatherCondition::Cloudy => "Cloudy",
            WeatherCondition::PartlyCloudy => "Partly Cloudy",
        }
    }
}

/// Day count and share of the range for one bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct ConditionBreakdown {
    pub days: usize,
    /// 100 * days / total days, one decimal
    pub percentage: f64,
}

/// Beaufort classification of the mean wind speed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct WindClassification {
    pub mean_speed_ms: f64,
    pub beaufort_number: u8,
    pub description: String,
}

/// Sanitized values for one day plus the buckets it matched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct DailyConditions {
    pub date: String,
    pub temperature_mean: f64,
    pub cloud_cover_mean: f64,
    pub shortwave_radiation_sum: f64,
    pub rain_sum: f64,
    pub snowfall_sum: f64,
    pub conditions: Vec<WeatherCondition>,
}

/// Aggregate over a date range. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct ClimateSummary {
    pub total_days: usize,
    /// Mean of the finite daily means, one decimal; null when none is finite
    pub average_temperature: Option<f64>,
    pub average_temperature_max: Option<f64>,
    pub average_temperature_min: Option<f64>,
    pub average_humidity: Option<f64>,
    pub average_humidity_max: Option<f64>,
    pub average_humidity_min: Option<f64>,
    /// Classified from the unrounded mean of the daily mean speeds
    pub wind: Option<WindClassification>,
    /// Mean of the daily maximum wind speeds in m/s, one decimal
    pub average_wind_max_ms: Option<f64>,
    /// Null when no day matched any bucket
    pub dominant_condition: Option<WeatherCondition>,
    /// Buckets with at least one day; they overlap, so shares may exceed 100 in total
    pub weather_breakdown: BTreeMap<String, ConditionBreakdown>,
    pub daily: Vec<DailyConditions>,
    /// Per calendar month present in the range, in month order
    pub monthly: Vec<MonthlyClimate>,
}

/// Averages over the days of one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct MonthlyClimate {
    /// 1 = January
    pub month: u32,
    pub days: usize,
    pub average_temperature: Option<f64>,
    pub average_temperature_max: Option<f64>,
    pub average_temperature_min: Option<f64>,
    pub average_humidity: Option<f64>,
    pub wind: Option<WindClassification>,
}

/// Query parameters for the weather endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct WeatherQuery {
    #[serde(rename = "departureDate", alias = "departure_date")]
    pub departure_date: Option<String>,
    #[serde(rename = "returnDate", alias = "return_date")]
    pub return_date: Option<String>,
}

/// Response model for `GET /weather/{iataCode}`
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct WeatherResponse {
    pub iata_code: String,
    pub city_name: String,
    pub country_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub start_date: String,
    pub end_date: String,
    pub summary: ClimateSummary,
}
