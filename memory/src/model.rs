use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Author of a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// Tag attached to a message for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Crisis,
    Mood,
    Normal,
}

/// One entry of the chat transcript. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
}

impl Message {
    pub fn new(
        id: u64,
        text: impl Into<String>,
        sender: Sender,
        timestamp: DateTime<Utc>,
        classification: Option<Classification>,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            sender,
            timestamp,
            classification,
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    pub fn is_crisis(&self) -> bool {
        self.classification == Some(Classification::Crisis)
    }
}

/// Self-reported emotional state offered by the mood picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Calm,
    Neutral,
    Sad,
    Anxious,
    Frustrated,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Happy,
        Mood::Calm,
        Mood::Neutral,
        Mood::Sad,
        Mood::Anxious,
        Mood::Frustrated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Calm => "calm",
            Mood::Neutral => "neutral",
            Mood::Sad => "sad",
            Mood::Anxious => "anxious",
            Mood::Frustrated => "frustrated",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Calm => "Calm",
            Mood::Neutral => "Neutral",
            Mood::Sad => "Sad",
            Mood::Anxious => "Anxious",
            Mood::Frustrated => "Frustrated",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Calm => "😌",
            Mood::Neutral => "😐",
            Mood::Sad => "😔",
            Mood::Anxious => "😰",
            Mood::Frustrated => "😤",
        }
    }

    /// Suggestion shown alongside the current mood
    pub fn recommendation(&self) -> &'static str {
        match self {
            Mood::Happy => {
                "That's wonderful to hear. Write down one thing that went well today so you can come back to it on harder days."
            }
            Mood::Calm => {
                "Keep this steady feeling going with a short mindful walk or a few minutes of focused breathing."
            }
            Mood::Neutral => {
                "Try the 5-4-3-2-1 grounding exercise: name 5 things you see, 4 you can touch, 3 you hear, 2 you smell and 1 you taste."
            }
            Mood::Sad => {
                "Be gentle with yourself today. Listening to calming music or calling a trusted friend or family member can help."
            }
            Mood::Anxious => {
                "Try deep breathing: inhale for 4 counts, hold for 4, and exhale for 6. Repeat a few times until your body settles."
            }
            Mood::Frustrated => {
                "Step away for a moment. Progressive muscle relaxation or splashing cold water on your face can release some tension."
            }
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str() == wanted)
            .ok_or_else(|| format!("Unknown mood: {}", s.trim()))
    }
}

/// A timestamped mood selection; the last one is the current mood
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: u64,
    pub mood: Mood,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
