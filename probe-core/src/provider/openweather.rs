//! OpenWeatherMap geocode + current weather.

use serde_json::Value;

use crate::{
    error::FetchError,
    model::{FieldBag, GeoCoordinate, LocationQuery, NOT_AVAILABLE, WeatherReport},
    transport::{ApiRequest, HttpTransport, Transport},
    units::{field_or, format_temperature, format_wind_speed, render, required, required_f64},
};

pub const GEOCODE_URL: &str = "http://api.openweathermap.org/geo/1.0/direct";
pub const WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Two-stage lookup: resolve a place name, then fetch its current weather.
#[derive(Debug, Clone)]
pub struct WeatherLookupPipeline<T: Transport = HttpTransport> {
    transport: T,
    api_key: String,
    geocode_endpoint: String,
    weather_endpoint: String,
}

impl<T: Transport> WeatherLookupPipeline<T> {
    pub fn new(transport: T, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
            geocode_endpoint: GEOCODE_URL.to_string(),
            weather_endpoint: WEATHER_URL.to_string(),
        }
    }

    pub fn with_endpoints(
        mut self,
        geocode_endpoint: impl Into<String>,
        weather_endpoint: impl Into<String>,
    ) -> Self {
        self.geocode_endpoint = geocode_endpoint.into();
        self.weather_endpoint = weather_endpoint.into();
        self
    }

    /// Stage A: place name to coordinates.
    ///
    /// The query text is concatenated into the URL as-is, so characters such
    /// as `&` or `#` in the input end up altering the request.
    pub async fn resolve_location(&self, query: &LocationQuery) -> Result<GeoCoordinate, FetchError> {
        if query.city.is_empty() || query.country_code.is_empty() {
            return Err(FetchError::InvalidInput(
                "City name and country code are required.".to_string(),
            ));
        }

        let url = format!(
            "{}?q={},{},{}&appid={}",
            self.geocode_endpoint, query.city, query.state_code, query.country_code, self.api_key
        );

        let body = self
            .transport
            .get(&ApiRequest::get(url))
            .await
            .map_err(|source| FetchError::Network { what: "geo data", source })?;

        let matches: Vec<GeoCoordinate> = serde_json::from_str(&body)?;
        let first = matches.into_iter().next().ok_or(FetchError::Resolution)?;

        if !first.is_valid() {
            return Err(FetchError::MalformedResponse(format!(
                "coordinate out of range: lat {}, lon {}",
                first.latitude, first.longitude
            )));
        }

        tracing::debug!(lat = first.latitude, lon = first.longitude, "location resolved");
        Ok(first)
    }

    /// Stage B: current weather at a coordinate.
    pub async fn fetch_weather(&self, coordinate: GeoCoordinate) -> Result<FieldBag, FetchError> {
        let url = format!(
            "{}?lat={}&lon={}&appid={}",
            self.weather_endpoint, coordinate.latitude, coordinate.longitude, self.api_key
        );

        let body = self
            .transport
            .get(&ApiRequest::get(url))
            .await
            .map_err(|source| FetchError::Network { what: "weather data", source })?;

        let doc: Value = serde_json::from_str(&body)?;
        extract_weather(&doc)
    }

    /// Stage A then stage B. A failed geocode never reaches the weather endpoint.
    pub async fn lookup(&self, query: &LocationQuery) -> Result<WeatherReport, FetchError> {
        let coordinate = self.resolve_location(query).await?;
        let fields = self.fetch_weather(coordinate).await?;

        Ok(WeatherReport { coordinate, fields })
    }
}

fn section<'a>(doc: &'a Value, key: &str) -> Option<&'a Value> {
    doc.get(key).filter(|v| !v.is_null())
}

/// Turn a current-weather document into display fields.
///
/// Each section (`weather`, `main`, `wind`, `rain`) is optional; inside a
/// present section, fields without a placeholder are required.
pub fn extract_weather(doc: &Value) -> Result<FieldBag, FetchError> {
    match doc.get("cod") {
        Some(cod) if cod.as_f64() == Some(200.0) => {}
        other => {
            let cod = other.map(render).unwrap_or_else(|| "missing".to_string());
            return Err(FetchError::WeatherUnavailable(cod));
        }
    }

    let mut bag = FieldBag::new();

    if let Some(weather) = section(doc, "weather") {
        let description = weather
            .get(0)
            .and_then(|w| w.get("description"))
            .filter(|d| !d.is_null())
            .ok_or_else(|| FetchError::missing_field("weather[0].description"))?;
        bag.insert("description", render(description));
    }

    if let Some(main) = section(doc, "main") {
        bag.insert("temp", format_temperature(required_f64(main, "temp", "main.temp")?));
        bag.insert(
            "pressure",
            format!("{} hPa", render(required(main, "pressure", "main.pressure")?)),
        );
        bag.insert(
            "humidity",
            format!("{}%", render(required(main, "humidity", "main.humidity")?)),
        );
        bag.insert("sea_level", format!("{} hPa", field_or(main, "sea_level", NOT_AVAILABLE)));
        bag.insert("grnd_level", format!("{} hPa", field_or(main, "grnd_level", NOT_AVAILABLE)));
    }

    if let Some(wind) = section(doc, "wind") {
        bag.insert("speed", format_wind_speed(required_f64(wind, "speed", "wind.speed")?));
        bag.insert("deg", format!("{} degrees", render(required(wind, "deg", "wind.deg")?)));

        let gust = match wind.get("gust") {
            Some(Value::Null) | None => NOT_AVAILABLE.to_string(),
            Some(_) => format_wind_speed(required_f64(wind, "gust", "wind.gust")?),
        };
        bag.insert("gust", gust);
    }

    if let Some(rain) = section(doc, "rain") {
        bag.insert("precipitation", format!("{} mm/hr", field_or(rain, "1h", "0")));
    }

    Ok(bag)
}
