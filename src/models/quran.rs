use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const SURAH_COUNT: u16 = 114;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SurahSummary {
    pub number: u16,
    /// Arabic name
    pub name: String,
    pub latin_name: String,
    pub translation: String,
    pub ayah_count: u16,
    pub revelation_place: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Verse {
    pub number: u16,
    pub arabic: String,
    pub latin: String,
    pub translation: String,
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SurahDetail {
    #[serde(flatten)]
    pub summary: SurahSummary,
    pub description: String,
    pub audio_url: Option<String>,
    pub verses: Vec<Verse>,
    pub previous: Option<u16>,
    pub next: Option<u16>,
}

/// Neighbouring chapter numbers within 1..=114.
pub fn neighbours(number: u16) -> (Option<u16>, Option<u16>) {
    let prev = (number > 1).then(|| number - 1);
    let next = (number < SURAH_COUNT).then(|| number + 1);
    (prev, next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbours_at_edges() {
        assert_eq!(neighbours(1), (None, Some(2)));
        assert_eq!(neighbours(114), (Some(113), None));
        assert_eq!(neighbours(36), (Some(35), Some(37)));
    }
}
