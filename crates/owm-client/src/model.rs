// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Current-weather response decoding.
//!
//! The service reports success or failure through the `cod` field of the
//! body rather than the HTTP status line, and it is inconsistent about the
//! field's type (`200` on success, `"404"` on most failures). Decoding goes
//! through a permissive wire struct first and is then classified into a
//! [`WeatherReport`] or a [`LookupError`].

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::LookupError;
use crate::units::Units;

/// `cod` value the service uses for a satisfied query.
pub const SUCCESS_CODE: u16 = 200;

/// Geographic position in WGS-84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Broad weather category, from the `main` field of a condition entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    /// Mist, smoke, haze, dust, fog, sand, ash, squall, tornado.
    Atmosphere,
    Other,
}

impl ConditionKind {
    #[must_use]
    pub fn from_main(main: &str) -> Self {
        match main {
            "Clear" => ConditionKind::Clear,
            "Clouds" => ConditionKind::Clouds,
            "Rain" => ConditionKind::Rain,
            "Drizzle" => ConditionKind::Drizzle,
            "Thunderstorm" => ConditionKind::Thunderstorm,
            "Snow" => ConditionKind::Snow,
            "Mist" | "Smoke" | "Haze" | "Dust" | "Fog" | "Sand" | "Ash" | "Squall"
            | "Tornado" => ConditionKind::Atmosphere,
            _ => ConditionKind::Other,
        }
    }
}

/// Weather condition as reported by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub kind: ConditionKind,
    /// Category string exactly as sent (`"Clouds"`).
    pub main: String,
    /// Human-readable text (`"overcast clouds"`).
    pub description: String,
    /// Icon code such as `04d`, when present.
    pub icon: Option<String>,
}

/// Outcome of a successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub name: String,
    pub country: Option<String>,
    pub coordinates: Coordinates,
    /// Temperature in the unit system of `units`.
    pub temperature: f64,
    pub feels_like: Option<f64>,
    pub humidity: Option<u8>,
    pub condition: Condition,
    pub observed_at: Option<DateTime<Utc>>,
    /// Unit system the lookup was made with.
    pub units: Units,
}

/// `cod` is a number on success and usually a string on failure.
/// Either form is read by value, so a string `"200"` also counts as success.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCode {
    Number(u16),
    Text(String),
}

impl RawCode {
    fn value(&self) -> Option<u16> {
        match self {
            RawCode::Number(code) => Some(*code),
            RawCode::Text(text) => text.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawMain {
    temp: f64,
    #[serde(default)]
    feels_like: Option<f64>,
    #[serde(default)]
    humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct RawCondition {
    main: String,
    description: String,
    #[serde(default)]
    icon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSys {
    #[serde(default)]
    country: Option<String>,
}

/// Body of `GET /data/2.5/weather`, success and failure shapes merged.
#[derive(Debug, Deserialize)]
struct RawResponse {
    cod: Option<RawCode>,
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    coord: Option<Coordinates>,
    #[serde(default)]
    main: Option<RawMain>,
    #[serde(default)]
    weather: Vec<RawCondition>,
    #[serde(default)]
    dt: Option<i64>,
    #[serde(default)]
    sys: Option<RawSys>,
}

/// Classify a response body.
///
/// The HTTP status is deliberately not an input: the service sends a JSON
/// body with a `cod` field for both outcomes.
pub fn interpret_body(body: &[u8], units: Units) -> Result<WeatherReport, LookupError> {
    let raw: RawResponse = serde_json::from_slice(body)?;

    let code = raw
        .cod
        .as_ref()
        .and_then(RawCode::value)
        .ok_or_else(|| LookupError::Malformed("missing or unreadable 'cod' field".to_string()))?;

    if code != SUCCESS_CODE {
        let message = match raw.message {
            Some(serde_json::Value::String(text)) => text,
            Some(serde_json::Value::Null) | None => {
                format!("Request failed with status {code}")
            }
            Some(other) => other.to_string(),
        };
        return Err(LookupError::Rejected { code, message });
    }

    let coordinates = raw
        .coord
        .ok_or_else(|| LookupError::Malformed("missing 'coord'".to_string()))?;
    let main = raw
        .main
        .ok_or_else(|| LookupError::Malformed("missing 'main'".to_string()))?;
    let first = raw
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::Malformed("empty 'weather' list".to_string()))?;

    Ok(WeatherReport {
        name: raw.name.unwrap_or_default(),
        country: raw.sys.and_then(|sys| sys.country).filter(|c| !c.is_empty()),
        coordinates,
        temperature: main.temp,
        feels_like: main.feels_like,
        humidity: main.humidity,
        condition: Condition {
            kind: ConditionKind::from_main(&first.main),
            main: first.main,
            description: first.description,
            icon: first.icon,
        },
        observed_at: raw.dt.and_then(|secs| DateTime::from_timestamp(secs, 0)),
        units,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONDON: &str = r#"{
        "cod": 200,
        "coord": {"lat": 51.5, "lon": -0.12},
        "name": "London",
        "main": {"temp": 60},
        "weather": [{"main": "Clouds", "description": "overcast clouds"}]
    }"#;

    #[test]
    fn test_success_body() {
        let report = interpret_body(LONDON.as_bytes(), Units::Imperial).unwrap();
        assert_eq!(report.name, "London");
        assert_eq!(report.coordinates, Coordinates::new(51.5, -0.12));
        assert!((report.temperature - 60.0).abs() < f64::EPSILON);
        assert_eq!(report.condition.kind, ConditionKind::Clouds);
        assert_eq!(report.condition.main, "Clouds");
        assert_eq!(report.condition.description, "overcast clouds");
        assert_eq!(report.units, Units::Imperial);
        assert!(report.observed_at.is_none());
        assert!(report.country.is_none());
    }

    #[test]
    fn test_full_success_body() {
        let body = r#"{
            "coord": {"lon": 2.35, "lat": 48.85},
            "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"},
                        {"id": 701, "main": "Mist", "description": "mist", "icon": "50d"}],
            "main": {"temp": 12.4, "feels_like": 11.8, "humidity": 87, "pressure": 1012},
            "dt": 1700000000,
            "sys": {"country": "FR"},
            "name": "Paris",
            "cod": 200
        }"#;
        let report = interpret_body(body.as_bytes(), Units::Metric).unwrap();
        assert_eq!(report.country.as_deref(), Some("FR"));
        assert_eq!(report.condition.kind, ConditionKind::Rain);
        assert_eq!(report.condition.icon.as_deref(), Some("10d"));
        assert_eq!(report.humidity, Some(87));
        assert_eq!(report.feels_like, Some(11.8));
        assert_eq!(report.observed_at.map(|t| t.timestamp()), Some(1_700_000_000));
        assert_eq!(report.units, Units::Metric);
    }

    #[test]
    fn test_string_success_code_is_accepted() {
        let body = LONDON.replace("\"cod\": 200", "\"cod\": \"200\"");
        assert!(body.contains("\"cod\": \"200\""));
        let report = interpret_body(body.as_bytes(), Units::Imperial).unwrap();
        assert_eq!(report.name, "London");
    }

    #[test]
    fn test_not_found_with_string_code() {
        let body = r#"{"cod": "404", "message": "city not found"}"#;
        let err = interpret_body(body.as_bytes(), Units::Imperial).unwrap_err();
        assert_eq!(
            err,
            LookupError::Rejected {
                code: 404,
                message: "city not found".to_string()
            }
        );
        assert!(!err.is_transport());
    }

    #[test]
    fn test_rejection_with_numeric_code() {
        let body = r#"{"cod": 401, "message": "Invalid API key. Please see https://openweathermap.org/faq#error401 for more info."}"#;
        match interpret_body(body.as_bytes(), Units::Imperial) {
            Err(LookupError::Rejected { code, message }) => {
                assert_eq!(code, 401);
                assert!(message.starts_with("Invalid API key"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_rejection_without_message() {
        let body = r#"{"cod": "500"}"#;
        let err = interpret_body(body.as_bytes(), Units::Imperial).unwrap_err();
        assert_eq!(err.to_string(), "Request failed with status 500");
    }

    #[test]
    fn test_success_missing_coord_is_malformed() {
        let body = r#"{"cod": 200, "name": "Nowhere", "main": {"temp": 1},
                       "weather": [{"main": "Clear", "description": "clear sky"}]}"#;
        let err = interpret_body(body.as_bytes(), Units::Imperial).unwrap_err();
        assert!(matches!(err, LookupError::Malformed(_)));
        assert!(err.is_transport());
    }

    #[test]
    fn test_success_with_empty_weather_is_malformed() {
        let body = r#"{"cod": 200, "name": "X", "coord": {"lat": 1, "lon": 2},
                       "main": {"temp": 1}, "weather": []}"#;
        assert!(matches!(
            interpret_body(body.as_bytes(), Units::Imperial),
            Err(LookupError::Malformed(_))
        ));
    }

    #[test]
    fn test_non_json_is_malformed() {
        let err = interpret_body(b"<html>Bad Gateway</html>", Units::Imperial).unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_condition_kinds() {
        assert_eq!(ConditionKind::from_main("Snow"), ConditionKind::Snow);
        assert_eq!(ConditionKind::from_main("Haze"), ConditionKind::Atmosphere);
        assert_eq!(ConditionKind::from_main("Sunny-ish"), ConditionKind::Other);
    }
}
