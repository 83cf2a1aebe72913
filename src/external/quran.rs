use crate::config::QuranConfig;
use crate::error::{AppError, AppResult};
use crate::models::{SURAH_COUNT, SurahDetail, SurahSummary, Verse, neighbours};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: u16,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteSurah {
    nomor: u16,
    nama: String,
    nama_latin: String,
    jumlah_ayat: u16,
    tempat_turun: String,
    arti: String,
    #[serde(default)]
    deskripsi: String,
    #[serde(default)]
    audio_full: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteSurahDetail {
    #[serde(flatten)]
    surah: RemoteSurah,
    #[serde(default)]
    ayat: Vec<RemoteAyah>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteAyah {
    nomor_ayat: u16,
    teks_arab: String,
    teks_latin: String,
    teks_indonesia: String,
    #[serde(default)]
    audio: BTreeMap<String, String>,
}

impl From<&RemoteSurah> for SurahSummary {
    fn from(s: &RemoteSurah) -> Self {
        Self {
            number: s.nomor,
            name: s.nama.clone(),
            latin_name: s.nama_latin.clone(),
            translation: s.arti.clone(),
            ayah_count: s.jumlah_ayat,
            revelation_place: s.tempat_turun.clone(),
        }
    }
}

/// Quran text adapter (equran.id v2 shaped API).
#[derive(Clone)]
pub struct QuranService {
    client: Client,
    config: QuranConfig,
}

impl QuranService {
    pub fn new(config: QuranConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub async fn list_surahs(&self) -> AppResult<Vec<SurahSummary>> {
        let surahs: Vec<RemoteSurah> = self.fetch("surat").await?;
        Ok(surahs.iter().map(SurahSummary::from).collect())
    }

    pub async fn get_surah(&self, number: u16) -> AppResult<SurahDetail> {
        if !(1..=SURAH_COUNT).contains(&number) {
            return Err(AppError::NotFound(format!("Surah {number} does not exist")));
        }
        let detail: RemoteSurahDetail = self.fetch(&format!("surat/{number}")).await?;
        Ok(into_detail(detail))
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound("Surah not found".to_string()));
        }
        if !status.is_success() {
            return Err(AppError::ExternalApiError(format!(
                "Quran API returned HTTP {}",
                status.as_u16()
            )));
        }

        let body = response.text().await?;
        let envelope: Envelope<T> = serde_json::from_str(&body)
            .map_err(|e| AppError::ExternalApiError(format!("Malformed Quran payload: {e}")))?;
        if envelope.code != 200 {
            return Err(AppError::ExternalApiError(format!(
                "Quran API returned code {}: {}",
                envelope.code, envelope.message
            )));
        }
        envelope
            .data
            .ok_or_else(|| AppError::ExternalApiError("Quran payload has no data".to_string()))
    }
}

fn into_detail(detail: RemoteSurahDetail) -> SurahDetail {
    let summary = SurahSummary::from(&detail.surah);
    let (previous, next) = neighbours(summary.number);
    SurahDetail {
        summary,
        description: detail.surah.deskripsi,
        audio_url: detail.surah.audio_full.into_values().next(),
        verses: detail
            .ayat
            .into_iter()
            .map(|a| Verse {
                number: a.nomor_ayat,
                arabic: a.teks_arab,
                latin: a.teks_latin,
                translation: a.teks_indonesia,
                audio_url: a.audio.into_values().next(),
            })
            .collect(),
        previous,
        next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL: &str = r#"{
        "code": 200,
        "message": "Data retrieved successfully",
        "data": {
            "nomor": 1,
            "nama": "الفاتحة",
            "namaLatin": "Al-Fatihah",
            "jumlahAyat": 7,
            "tempatTurun": "Mekah",
            "arti": "Pembukaan",
            "deskripsi": "Surat Al Faatihah ...",
            "audioFull": {"01": "https://cdn.example/full/001.mp3"},
            "ayat": [
                {
                    "nomorAyat": 1,
                    "teksArab": "بِسْمِ اللّٰهِ الرَّحْمٰنِ الرَّحِيْمِ",
                    "teksLatin": "bismillāhir-raḥmānir-raḥīm(i).",
                    "teksIndonesia": "Dengan nama Allah Yang Maha Pengasih, Maha Penyayang.",
                    "audio": {"01": "https://cdn.example/001001.mp3"}
                }
            ],
            "suratSelanjutnya": {"nomor": 2, "nama": "البقرة", "namaLatin": "Al-Baqarah", "jumlahAyat": 286},
            "suratSebelumnya": false
        }
    }"#;

    #[test]
    fn test_detail_payload_is_reshaped() {
        let envelope: Envelope<RemoteSurahDetail> = serde_json::from_str(DETAIL).unwrap();
        let detail = into_detail(envelope.data.unwrap());
        assert_eq!(detail.summary.latin_name, "Al-Fatihah");
        assert_eq!(detail.summary.ayah_count, 7);
        assert_eq!(detail.verses.len(), 1);
        assert_eq!(
            detail.verses[0].audio_url.as_deref(),
            Some("https://cdn.example/001001.mp3")
        );
        assert_eq!(detail.previous, None);
        assert_eq!(detail.next, Some(2));
    }

    #[actix_web::test]
    async fn test_out_of_range_surah_is_not_found() {
        let service = QuranService::new(QuranConfig {
            base_url: "http://127.0.0.1:9".to_string(),
        });
        assert!(matches!(
            service.get_surah(0).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.get_surah(115).await,
            Err(AppError::NotFound(_))
        ));
    }
}
