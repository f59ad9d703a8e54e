//! OpenWeatherMap client and report formatting.
//!
//! Lookups never fail the caller: any upstream problem is folded into a
//! user-facing fallback string, so the dispatcher always has something to
//! send back.

use chrono::{Local, TimeZone, Utc};
use serde::Deserialize;
use tracing::warn;

const API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Pressure arrives in hectopascals; the report shows mm of mercury.
const HPA_TO_MMHG: f64 = 0.750062;

/// Current conditions as OpenWeatherMap reports them.
#[derive(Debug, Deserialize)]
pub struct WeatherData {
    pub weather: Vec<Condition>,
    pub main: MainReadings,
    /// Meters.
    pub visibility: u32,
    pub wind: Wind,
    pub sys: SunTimes,
}

#[derive(Debug, Deserialize)]
pub struct Condition {
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    /// Hectopascals.
    pub pressure: f64,
    pub humidity: u8,
}

#[derive(Debug, Deserialize)]
pub struct Wind {
    pub speed: f64,
    pub deg: u16,
}

#[derive(Debug, Deserialize)]
pub struct SunTimes {
    pub sunrise: i64,
    pub sunset: i64,
}

/// Weather API client.
pub struct WeatherClient {
    client: reqwest::Client,
    api_key: String,
}

impl WeatherClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    /// Current weather for a named place. Anything that goes wrong becomes
    /// the not-found reply naming the place.
    pub async fn temperature_by_name(&self, place: &str) -> String {
        match self.fetch(&[("q", place.to_string())]).await {
            Ok(data) => format_report(&data).unwrap_or_else(|| not_found(place)),
            Err(e) => {
                warn!("Weather lookup for \"{place}\" failed: {e}");
                not_found(place)
            }
        }
    }

    /// Current weather at coordinates. Same contract as
    /// [`temperature_by_name`](Self::temperature_by_name).
    pub async fn temperature_by_coords(&self, latitude: f64, longitude: f64) -> String {
        let query = [("lat", latitude.to_string()), ("lon", longitude.to_string())];
        match self.fetch(&query).await {
            Ok(data) => format_report(&data).unwrap_or_else(unknown_location),
            Err(e) => {
                warn!("Weather lookup at ({latitude}, {longitude}) failed: {e}");
                unknown_location()
            }
        }
    }

    async fn fetch(&self, query: &[(&str, String)]) -> Result<WeatherData, String> {
        let response = self
            .client
            .get(API_URL)
            .query(query)
            .query(&[
                ("appid", self.api_key.as_str()),
                ("lang", "ru"),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("status {}", response.status()));
        }

        response
            .json::<WeatherData>()
            .await
            .map_err(|e| format!("unexpected response shape: {e}"))
    }
}

fn not_found(place: &str) -> String {
    format!("Я не нашел населенный пункт {place}")
}

fn unknown_location() -> String {
    "Я не знаю какая погода в этом месте.".to_string()
}

/// Render the fixed multi-line report. `None` when the response carries no
/// weather conditions to describe.
pub fn format_report(data: &WeatherData) -> Option<String> {
    let description = capitalize(&data.weather.first()?.description);
    let pressure = data.main.pressure * HPA_TO_MMHG;
    let sunrise = local_time(data.sys.sunrise);
    let sunset = local_time(data.sys.sunset);

    let report = format!(
        "
        {description}.
        Температура {temp} ℃, ощущается как {feels} ℃.
        Атмосферное давление {pressure:.2} мм рт. ст.
        Влажность {humidity} %.
        Видимость {visibility} метров.
        Ветер {speed} м/с {deg}°.
        Восход солнца {sunrise} МСК. Закат {sunset} МСК.
        ",
        temp = data.main.temp,
        feels = data.main.feels_like,
        humidity = data.main.humidity,
        visibility = data.visibility,
        speed = data.wind.speed,
        deg = data.wind.deg,
    );

    Some(strip_indent(&report))
}

/// Drop leading whitespace from every line so template indentation does not
/// leak into the user-visible message.
pub(crate) fn strip_indent(text: &str) -> String {
    text.split('\n')
        .map(str::trim_start)
        .collect::<Vec<_>>()
        .join("\n")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Unix timestamp as local wall-clock `HH:MM`.
fn local_time(ts: i64) -> String {
    Utc.timestamp_opt(ts, 0)
        .single()
        .map(|dt| dt.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trimmed-down copy of a real API payload; extra fields like "coord"
    // and "dt" exercise that unknown keys are ignored.
    const SAMPLE_JSON: &str = r#"{
        "coord": {"lon": 49.1221, "lat": 55.7887},
        "weather": [{"id": 804, "main": "Clouds", "description": "пасмурно", "icon": "04n"}],
        "main": {"temp": -3.5, "feels_like": -8.1, "pressure": 1000, "humidity": 83},
        "visibility": 10000,
        "wind": {"speed": 4.2, "deg": 250},
        "dt": 1675170000,
        "sys": {"sunrise": 1675143600, "sunset": 1675173600}
    }"#;

    fn sample() -> WeatherData {
        serde_json::from_str(SAMPLE_JSON).expect("sample must parse")
    }

    #[test]
    fn test_report_lines_have_no_leading_whitespace() {
        let report = format_report(&sample()).expect("report");
        for line in report.split('\n') {
            assert_eq!(line, line.trim_start());
        }
    }

    #[test]
    fn test_description_is_capitalized() {
        let report = format_report(&sample()).expect("report");
        assert!(report.starts_with("\nПасмурно.\n"));
    }

    #[test]
    fn test_pressure_in_mmhg_with_two_decimals() {
        let report = format_report(&sample()).expect("report");
        assert!(report.contains("Атмосферное давление 750.06 мм рт. ст."));
    }

    #[test]
    fn test_readings_rendered_as_given() {
        let report = format_report(&sample()).expect("report");
        assert!(report.contains("Температура -3.5 ℃, ощущается как -8.1 ℃."));
        assert!(report.contains("Влажность 83 %."));
        assert!(report.contains("Видимость 10000 метров."));
        assert!(report.contains("Ветер 4.2 м/с 250°."));
    }

    #[test]
    fn test_report_is_stable_across_calls() {
        let first = format_report(&sample()).expect("report");
        let second = format_report(&sample()).expect("report");
        assert_eq!(first, second);
    }

    #[test]
    fn test_local_time_shape_and_idempotence() {
        let formatted = local_time(1675143600);
        assert_eq!(formatted.len(), 5);
        assert_eq!(formatted.as_bytes()[2], b':');
        assert_eq!(local_time(1675143600), formatted);
    }

    #[test]
    fn test_empty_conditions_yield_no_report() {
        let mut data = sample();
        data.weather.clear();
        assert!(format_report(&data).is_none());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("пасмурно"), "Пасмурно");
        assert_eq!(capitalize("clear sky"), "Clear sky");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_strip_indent_keeps_blank_edge_lines() {
        assert_eq!(strip_indent("\n  a\n\n  b\n  "), "\na\n\nb\n");
    }

    #[test]
    fn test_fallback_strings() {
        assert_eq!(not_found("Тула"), "Я не нашел населенный пункт Тула");
        assert_eq!(unknown_location(), "Я не знаю какая погода в этом месте.");
    }
}
