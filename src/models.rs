use serde::{Deserialize, Serialize};
use crate::errors::DecodeError;

/// One weather observation as it travels from the queue to the storage API
///
/// The field names are the wire names on both sides, so decoding and
/// re-encoding preserve the JSON structure. Every field is required,
/// unknown fields are ignored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    pub timestamp: String,
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: i64,
    pub pressure: i64,
    pub wind_speed: f64,
    pub wind_direction: i64,
    pub weather_condition: String,
    pub weather_description: String,
    pub cloudiness: i64,
    pub visibility: i64,
    pub sunrise: String,
    pub sunset: String,
}

impl WeatherRecord {
    /// Decodes a message body into a weather record
    ///
    /// # Arguments
    ///
    /// * 'body' - raw message body as delivered by the broker
    pub fn from_slice(body: &[u8]) -> Result<WeatherRecord, DecodeError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Encodes the record into the JSON body sent to the storage API
    ///
    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::{json, Value};

    pub(crate) const LIMA: &str = r#"{
        "timestamp": "2025-01-15T12:00:00Z",
        "city": "Lima",
        "country": "PE",
        "temperature": 21.5,
        "feels_like": 21.9,
        "humidity": 78,
        "pressure": 1013,
        "wind_speed": 4.6,
        "wind_direction": 200,
        "weather_condition": "Clouds",
        "weather_description": "overcast clouds",
        "cloudiness": 90,
        "visibility": 10000,
        "sunrise": "2025-01-15T10:47:00Z",
        "sunset": "2025-01-15T23:39:00Z"
    }"#;

    #[test]
    fn decodes_all_fields() {
        let record = WeatherRecord::from_slice(LIMA.as_bytes()).unwrap();

        assert_eq!(record.city, "Lima");
        assert_eq!(record.country, "PE");
        assert_eq!(record.temperature, 21.5);
        assert_eq!(record.feels_like, 21.9);
        assert_eq!(record.humidity, 78);
        assert_eq!(record.pressure, 1013);
        assert_eq!(record.wind_speed, 4.6);
        assert_eq!(record.wind_direction, 200);
        assert_eq!(record.weather_condition, "Clouds");
        assert_eq!(record.weather_description, "overcast clouds");
        assert_eq!(record.cloudiness, 90);
        assert_eq!(record.visibility, 10000);
        assert_eq!(record.sunrise, "2025-01-15T10:47:00Z");
        assert_eq!(record.sunset, "2025-01-15T23:39:00Z");
    }

    #[test]
    fn encoding_reproduces_inbound_structure() {
        let record = WeatherRecord::from_slice(LIMA.as_bytes()).unwrap();
        let encoded: Value = serde_json::from_slice(&record.to_vec().unwrap()).unwrap();
        let inbound: Value = serde_json::from_str(LIMA).unwrap();

        assert_eq!(encoded, inbound);
    }

    #[test]
    fn ignores_unknown_fields() {
        let mut value: Value = serde_json::from_str(LIMA).unwrap();
        value["source"] = json!("openweathermap");
        let body = serde_json::to_vec(&value).unwrap();

        assert!(WeatherRecord::from_slice(&body).is_ok());
    }

    #[test]
    fn rejects_malformed_bodies() {
        let mut missing: Value = serde_json::from_str(LIMA).unwrap();
        missing.as_object_mut().unwrap().remove("sunset");

        let mut wrong_type: Value = serde_json::from_str(LIMA).unwrap();
        wrong_type["humidity"] = json!(78.5);

        let truncated = &LIMA.as_bytes()[..LIMA.len() / 2];

        assert!(WeatherRecord::from_slice(b"not valid json").is_err());
        assert!(WeatherRecord::from_slice(truncated).is_err());
        assert!(WeatherRecord::from_slice(&serde_json::to_vec(&missing).unwrap()).is_err());
        assert!(WeatherRecord::from_slice(&serde_json::to_vec(&wrong_type).unwrap()).is_err());
        assert!(WeatherRecord::from_slice(b"").is_err());
    }
}
