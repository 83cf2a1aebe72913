use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Raw query; both values stay optional so missing coordinates produce our own 400 body.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct PrayerTimesQuery {
    #[schema(example = "-6.2")]
    pub lat: Option<String>,
    #[schema(example = "106.8")]
    pub lng: Option<String>,
}

/// Today's schedule. Field names follow the public contract consumed by the home page widget.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrayerTimesResponse {
    #[schema(example = "-6.2, 106.8 (Asia/Jakarta)")]
    pub lokasi: String,
    #[schema(example = "Aladhan API (Kemenag RI)")]
    pub sumber: String,
    pub jadwal: Jadwal,
    /// Hijri date, e.g. "4 Jumada al-Awwal 1448 H"
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Jadwal {
    #[serde(rename = "Imsak")]
    pub imsak: String,
    #[serde(rename = "Fajr")]
    pub fajr: String,
    #[serde(rename = "Sunrise")]
    pub sunrise: String,
    #[serde(rename = "Dhuhr")]
    pub dhuhr: String,
    #[serde(rename = "Asr")]
    pub asr: String,
    #[serde(rename = "Maghrib")]
    pub maghrib: String,
    #[serde(rename = "Isha")]
    pub isha: String,
}

impl Jadwal {
    /// (label, time) pairs in chronological order, for rendering.
    pub fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("Imsak", self.imsak.as_str()),
            ("Subuh", self.fajr.as_str()),
            ("Terbit", self.sunrise.as_str()),
            ("Dzuhur", self.dhuhr.as_str()),
            ("Ashar", self.asr.as_str()),
            ("Maghrib", self.maghrib.as_str()),
            ("Isya", self.isha.as_str()),
        ]
    }
}
