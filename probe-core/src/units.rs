//! Unit conversions and display formatting for upstream values.

use serde_json::Value;

use crate::error::FetchError;

pub const KELVIN_OFFSET: f64 = 273.15;
pub const MPS_TO_MPH: f64 = 2.237;

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

pub fn mps_to_mph(mps: f64) -> f64 {
    mps * MPS_TO_MPH
}

/// `300.0` -> `"26.85 °C"`
pub fn format_temperature(kelvin: f64) -> String {
    format!("{:.2} °C", kelvin_to_celsius(kelvin))
}

/// `10.0` -> `"22.37 miles/hour"`
pub fn format_wind_speed(mps: f64) -> String {
    format!("{:.2} miles/hour", mps_to_mph(mps))
}

/// Render a JSON scalar the way it should appear on screen.
///
/// Strings lose their quotes, numbers keep their shortest form.
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `section[key]` rendered, or `default` when the key is absent or null.
pub fn field_or(section: &Value, key: &str, default: &str) -> String {
    match section.get(key) {
        Some(Value::Null) | None => default.to_string(),
        Some(value) => render(value),
    }
}

/// A field that must exist once its section does.
pub fn required<'a>(section: &'a Value, key: &str, path: &str) -> Result<&'a Value, FetchError> {
    match section.get(key) {
        Some(Value::Null) | None => Err(FetchError::missing_field(path)),
        Some(value) => Ok(value),
    }
}

pub fn required_f64(section: &Value, key: &str, path: &str) -> Result<f64, FetchError> {
    required(section, key, path)?
        .as_f64()
        .ok_or_else(|| FetchError::missing_field(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn temperature_from_kelvin() {
        assert_eq!(format_temperature(300.00), "26.85 °C");
        assert_eq!(format_temperature(273.15), "0.00 °C");
        assert_eq!(format_temperature(0.0), "-273.15 °C");
    }

    #[test]
    fn wind_speed_in_mph() {
        assert_eq!(format_wind_speed(10.0), "22.37 miles/hour");
        assert_eq!(format_wind_speed(0.0), "0.00 miles/hour");
    }

    #[test]
    fn render_strips_string_quotes() {
        assert_eq!(render(&json!("light rain")), "light rain");
        assert_eq!(render(&json!(1013)), "1013");
        assert_eq!(render(&json!(0.25)), "0.25");
    }

    #[test]
    fn field_or_treats_null_as_absent() {
        let section = json!({ "sea_level": null, "grnd_level": 1001 });

        assert_eq!(field_or(&section, "sea_level", "N/A"), "N/A");
        assert_eq!(field_or(&section, "missing", "N/A"), "N/A");
        assert_eq!(field_or(&section, "grnd_level", "N/A"), "1001");
    }

    #[test]
    fn required_reports_path() {
        let section = json!({ "temp": "warm" });

        let err = required(&section, "pressure", "main.pressure").unwrap_err();
        assert!(err.to_string().contains("main.pressure"));

        let err = required_f64(&section, "temp", "main.temp").unwrap_err();
        assert!(err.to_string().contains("main.temp"));
    }
}
