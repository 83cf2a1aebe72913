use crate::config::PrayerConfig;
use crate::error::{AppError, AppResult};
use crate::models::{Jadwal, PrayerTimesResponse};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

const SOURCE_NAME: &str = "Aladhan API";

#[derive(Debug, Deserialize)]
struct TimingsEnvelope {
    code: u16,
    data: Option<TimingsData>,
}

#[derive(Debug, Deserialize)]
struct TimingsData {
    timings: Timings,
    date: DateInfo,
    #[serde(default)]
    meta: Option<Meta>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Timings {
    #[serde(default)]
    imsak: String,
    fajr: String,
    #[serde(default)]
    sunrise: String,
    dhuhr: String,
    asr: String,
    maghrib: String,
    isha: String,
}

#[derive(Debug, Deserialize)]
struct DateInfo {
    hijri: HijriDate,
}

#[derive(Debug, Deserialize)]
struct HijriDate {
    day: String,
    month: HijriMonth,
    year: String,
}

#[derive(Debug, Deserialize)]
struct HijriMonth {
    en: String,
}

#[derive(Debug, Deserialize)]
struct Meta {
    #[serde(default)]
    timezone: Option<String>,
}

/// Validated coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Both values are required; anything missing, non-numeric or out of range is a 400.
    pub fn parse(lat: Option<&str>, lng: Option<&str>) -> AppResult<Self> {
        let (Some(lat), Some(lng)) = (
            lat.map(str::trim).filter(|s| !s.is_empty()),
            lng.map(str::trim).filter(|s| !s.is_empty()),
        ) else {
            return Err(AppError::ValidationError(
                "Latitude and longitude are required".to_string(),
            ));
        };

        let lat: f64 = lat
            .parse()
            .map_err(|_| AppError::ValidationError("Latitude must be a number".to_string()))?;
        let lng: f64 = lng
            .parse()
            .map_err(|_| AppError::ValidationError("Longitude must be a number".to_string()))?;

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(AppError::ValidationError(
                "Coordinates are out of range".to_string(),
            ));
        }

        Ok(Self { lat, lng })
    }
}

#[derive(Clone)]
pub struct PrayerTimesService {
    client: Client,
    config: PrayerConfig,
}

impl PrayerTimesService {
    pub fn new(config: PrayerConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Timings for `date` at the given coordinates, reshaped into the public payload.
    pub async fn get_timings(
        &self,
        coords: Coordinates,
        date: NaiveDate,
    ) -> AppResult<PrayerTimesResponse> {
        let url = format!(
            "{}/timings/{}",
            self.config.base_url.trim_end_matches('/'),
            date.format("%d-%m-%Y")
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", coords.lat.to_string()),
                ("longitude", coords.lng.to_string()),
                ("method", self.config.method.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ExternalApiError(format!(
                "Prayer times API returned HTTP {}",
                status.as_u16()
            )));
        }

        let body = response.text().await?;
        let envelope: TimingsEnvelope = serde_json::from_str(&body).map_err(|e| {
            AppError::ExternalApiError(format!("Malformed prayer times payload: {e}"))
        })?;

        reshape(envelope, coords)
    }
}

fn reshape(envelope: TimingsEnvelope, coords: Coordinates) -> AppResult<PrayerTimesResponse> {
    if envelope.code != 200 {
        return Err(AppError::ExternalApiError(format!(
            "Prayer times API returned code {}",
            envelope.code
        )));
    }
    let data = envelope
        .data
        .ok_or_else(|| AppError::ExternalApiError("Prayer times payload has no data".into()))?;

    let mut lokasi = format!("{}, {}", coords.lat, coords.lng);
    if let Some(tz) = data.meta.and_then(|m| m.timezone) {
        lokasi.push_str(&format!(" ({tz})"));
    }

    let t = data.timings;
    let hijri = data.date.hijri;

    Ok(PrayerTimesResponse {
        lokasi,
        sumber: SOURCE_NAME.to_string(),
        jadwal: Jadwal {
            imsak: strip_zone(&t.imsak),
            fajr: strip_zone(&t.fajr),
            sunrise: strip_zone(&t.sunrise),
            dhuhr: strip_zone(&t.dhuhr),
            asr: strip_zone(&t.asr),
            maghrib: strip_zone(&t.maghrib),
            isha: strip_zone(&t.isha),
        },
        date: format!("{} {} {} H", hijri.day, hijri.month.en, hijri.year),
    })
}

/// Upstream sometimes appends the zone, e.g. "04:31 (WIB)".
fn strip_zone(time: &str) -> String {
    time.split_whitespace().next().unwrap_or("").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "code": 200,
        "status": "OK",
        "data": {
            "timings": {
                "Fajr": "04:21", "Sunrise": "05:33", "Dhuhr": "11:39", "Asr": "14:46",
                "Sunset": "17:45", "Maghrib": "17:45", "Isha": "18:55", "Imsak": "04:11",
                "Midnight": "23:39"
            },
            "date": {
                "readable": "16 Oct 2026",
                "hijri": {
                    "date": "04-05-1448", "day": "4",
                    "month": {"number": 5, "en": "Jumādá al-ūlá", "ar": "جُمادى الأولى"},
                    "year": "1448"
                }
            },
            "meta": {"timezone": "Asia/Jakarta"}
        }
    }"#;

    #[test]
    fn test_coordinates_parse() {
        assert!(Coordinates::parse(Some("-6.2"), Some("106.8")).is_ok());
        assert!(matches!(
            Coordinates::parse(None, Some("106.8")),
            Err(AppError::ValidationError(_))
        ));
        assert!(Coordinates::parse(Some("-6.2"), Some("")).is_err());
        assert!(Coordinates::parse(Some("abc"), Some("106.8")).is_err());
        assert!(Coordinates::parse(Some("91"), Some("106.8")).is_err());
    }

    #[test]
    fn test_reshape_sample_payload() {
        let envelope: TimingsEnvelope = serde_json::from_str(SAMPLE).unwrap();
        let coords = Coordinates { lat: -6.2, lng: 106.8 };
        let out = reshape(envelope, coords).unwrap();
        assert_eq!(out.lokasi, "-6.2, 106.8 (Asia/Jakarta)");
        assert_eq!(out.sumber, "Aladhan API");
        assert_eq!(out.jadwal.fajr, "04:21");
        assert_eq!(out.jadwal.isha, "18:55");
        assert_eq!(out.date, "4 Jumādá al-ūlá 1448 H");
    }

    #[test]
    fn test_reshape_rejects_error_code() {
        let envelope: TimingsEnvelope =
            serde_json::from_str(r#"{"code": 400, "status": "Bad Request", "data": null}"#).unwrap();
        let coords = Coordinates { lat: 0.0, lng: 0.0 };
        assert!(matches!(
            reshape(envelope, coords),
            Err(AppError::ExternalApiError(_))
        ));
    }

    #[test]
    fn test_strip_zone() {
        assert_eq!(strip_zone("04:31 (WIB)"), "04:31");
        assert_eq!(strip_zone("04:31"), "04:31");
    }
}
