//! Fixed mood-to-recommendation-parameter catalog.

/// Recommendation query targets for one mood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoodTargets {
    pub seed_genres: &'static str,
    pub target_valence: f64,
    pub target_energy: f64,
    pub target_danceability: Option<f64>,
    pub target_instrumentalness: Option<f64>,
}

static MOODS: &[(&str, MoodTargets)] = &[
    (
        "happy",
        MoodTargets {
            seed_genres: "pop,dance,party",
            target_valence: 0.88,
            target_energy: 0.78,
            target_danceability: Some(0.8),
            target_instrumentalness: None,
        },
    ),
    (
        "chill",
        MoodTargets {
            seed_genres: "chill,ambient,lo-fi",
            target_valence: 0.55,
            target_energy: 0.35,
            target_danceability: Some(0.45),
            target_instrumentalness: None,
        },
    ),
    (
        "energetic",
        MoodTargets {
            seed_genres: "edm,work-out,rock",
            target_valence: 0.72,
            target_energy: 0.94,
            target_danceability: Some(0.7),
            target_instrumentalness: None,
        },
    ),
    (
        "focused",
        MoodTargets {
            seed_genres: "classical,study,piano",
            target_valence: 0.48,
            target_energy: 0.4,
            target_danceability: None,
            target_instrumentalness: Some(0.82),
        },
    ),
    (
        "melancholic",
        MoodTargets {
            seed_genres: "acoustic,sad,indie",
            target_valence: 0.22,
            target_energy: 0.32,
            target_danceability: Some(0.3),
            target_instrumentalness: None,
        },
    ),
];

/// Look up the targets for a mood key, case-insensitively.
pub fn mood_targets(key: &str) -> Option<&'static MoodTargets> {
    let key = key.to_ascii_lowercase();
    MOODS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, targets)| targets)
}

pub fn supported_moods() -> impl Iterator<Item = &'static str> {
    MOODS.iter().map(|(name, _)| *name)
}

/// "happy" -> "Happy", for playlist titles.
pub fn display_name(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => key,
    }
}
