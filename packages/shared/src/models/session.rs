use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Communication mode a participant asked for. Two sessions are only ever
/// paired when their modes are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Text,
    Video,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Text => write!(f, "text"),
            Mode::Video => write!(f, "video"),
        }
    }
}

/// Matchmaking preferences declared by a connection when it joins the queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub user_id: Option<String>,
    pub interests: Vec<String>,
    pub language: String,
    pub location: String,
    pub mode: Mode,
}

impl Preferences {
    pub fn new(
        user_id: Option<String>,
        interests: Vec<String>,
        language: &str,
        location: &str,
        mode: Mode,
    ) -> Self {
        Preferences {
            user_id: user_id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
            interests: normalize_interests(interests),
            language: language.trim().to_lowercase(),
            location: location.trim().to_string(),
            mode,
        }
    }
}

/// Trims tags, drops blanks and removes duplicates while keeping the order in
/// which each tag first appeared.
pub fn normalize_interests(interests: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(interests.len());
    for interest in interests {
        let tag = interest.trim();
        if tag.is_empty() || normalized.iter().any(|existing| existing == tag) {
            continue;
        }
        normalized.push(tag.to_string());
    }
    normalized
}

/// The matchmaking state of one live connection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Session {
    pub connection_id: String,
    pub user_id: Option<String>,
    pub interests: Vec<String>,
    pub language: String,
    pub location: String,
    pub mode: Mode,
    pub joined_at: DateTime<Utc>,
}

impl Session {
    pub fn new(connection_id: &str, preferences: Preferences) -> Self {
        Session {
            connection_id: connection_id.to_string(),
            user_id: preferences.user_id,
            interests: preferences.interests,
            language: preferences.language,
            location: preferences.location,
            mode: preferences.mode,
            joined_at: Utc::now(),
        }
    }

    /// User id shown to partners and stamped on messages. Anonymous sessions
    /// fall back to their connection id.
    pub fn display_id(&self) -> &str {
        self.user_id.as_deref().unwrap_or(&self.connection_id)
    }

    pub fn shares_interest_with(&self, other: &Session) -> bool {
        self.interests
            .iter()
            .any(|interest| other.interests.contains(interest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_normalization() {
        let preferences = Preferences::new(
            Some("  user-1 ".to_string()),
            vec![
                " music".to_string(),
                "".to_string(),
                "art".to_string(),
                "music".to_string(),
            ],
            " EN ",
            " Dublin ",
            Mode::Video,
        );

        assert_eq!(preferences.user_id.as_deref(), Some("user-1"));
        assert_eq!(preferences.interests, vec!["music", "art"]);
        assert_eq!(preferences.language, "en");
        assert_eq!(preferences.location, "Dublin");
        assert_eq!(preferences.mode, Mode::Video);
    }

    #[test]
    fn test_blank_user_id_is_anonymous() {
        let preferences = Preferences::new(Some("   ".to_string()), vec![], "en", "", Mode::Text);
        assert!(preferences.user_id.is_none());

        let session = Session::new("conn-1", preferences);
        assert_eq!(session.display_id(), "conn-1");
    }

    #[test]
    fn test_shares_interest_with() {
        let a = Session::new(
            "a",
            Preferences::new(None, vec!["music".to_string()], "en", "", Mode::Text),
        );
        let b = Session::new(
            "b",
            Preferences::new(
                None,
                vec!["sports".to_string(), "music".to_string()],
                "fr",
                "",
                Mode::Text,
            ),
        );
        let c = Session::new("c", Preferences::new(None, vec![], "fr", "", Mode::Text));

        assert!(a.shares_interest_with(&b));
        assert!(b.shares_interest_with(&a));
        assert!(!a.shares_interest_with(&c));
    }

    #[test]
    fn test_mode_serialization() {
        assert_eq!(serde_json::to_string(&Mode::Video).unwrap(), "\"video\"");
        let mode: Mode = serde_json::from_str("\"text\"").unwrap();
        assert_eq!(mode, Mode::Text);
        assert!(serde_json::from_str::<Mode>("\"audio\"").is_err());
    }
}
