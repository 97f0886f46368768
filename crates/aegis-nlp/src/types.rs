use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the user wants done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    CreateTask,
    SetReminder,
    StartQuiz,
    QuizResults,
    InformationRequest,
    HelpRequest,
    MemoryRecall,
    SecurityAssessment,
    GeneralChat,
}

impl Intent {
    pub const ALL: [Intent; 9] = [
        Intent::CreateTask,
        Intent::SetReminder,
        Intent::StartQuiz,
        Intent::QuizResults,
        Intent::InformationRequest,
        Intent::HelpRequest,
        Intent::MemoryRecall,
        Intent::SecurityAssessment,
        Intent::GeneralChat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateTask => "create_task",
            Self::SetReminder => "set_reminder",
            Self::StartQuiz => "start_quiz",
            Self::QuizResults => "quiz_results",
            Self::InformationRequest => "information_request",
            Self::HelpRequest => "help_request",
            Self::MemoryRecall => "memory_recall",
            Self::SecurityAssessment => "security_assessment",
            Self::GeneralChat => "general_chat",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.as_str() == s)
    }

    /// True for intents the task-creation consumer handles.
    pub fn is_task(&self) -> bool {
        matches!(self, Self::CreateTask | Self::SetReminder)
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity types that can be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Time,
    Email,
    Url,
    IpAddress,
    MacAddress,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Time => "TIME",
            Self::Email => "EMAIL",
            Self::Url => "URL",
            Self::IpAddress => "IP_ADDRESS",
            Self::MacAddress => "MAC_ADDRESS",
        }
    }
}

/// A typed, located substring of a message.
///
/// `start_index` and `length` are byte offsets into the original message,
/// so `&message[start_index..start_index + length] == value`. Entities of
/// different types may overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_type: EntityType,
    pub value: String,
    pub start_index: usize,
    pub length: usize,
}

impl Entity {
    pub fn end_index(&self) -> usize {
        self.start_index + self.length
    }
}

/// Coarse emotional tone of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Worried,
    Curious,
    Frustrated,
    Happy,
    Confused,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Worried => "worried",
            Self::Curious => "curious",
            Self::Frustrated => "frustrated",
            Self::Happy => "happy",
            Self::Confused => "confused",
            Self::Neutral => "neutral",
        }
    }
}

/// Everything the analyzer learned about one message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub original_message: String,
    pub intent: Intent,
    /// Keyword-density heuristic in `[0, 1]`, not a probability.
    pub confidence: f32,
    pub entities: Vec<Entity>,
    /// Insertion-ordered and never empty.
    pub topics: Vec<String>,
    /// `"Category: phrase"` strings.
    pub detected_phrases: Vec<String>,
    pub suggested_actions: Vec<String>,
    pub sentiment: Sentiment,
    pub processed_at: DateTime<Utc>,
}

impl AnalysisResult {
    /// Entities of one type, in document order.
    pub fn entities_of(&self, entity_type: EntityType) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(move |e| e.entity_type == entity_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_as_str_parse_roundtrip() {
        for intent in Intent::ALL {
            assert_eq!(Intent::parse(intent.as_str()), Some(intent));
        }
        assert_eq!(Intent::parse("unknown"), None);
        assert_eq!(Intent::parse("CREATE_TASK"), None);
    }

    #[test]
    fn test_intent_serializes_snake_case() {
        let json = serde_json::to_string(&Intent::SecurityAssessment).unwrap();
        assert_eq!(json, "\"security_assessment\"");
    }

    #[test]
    fn test_intent_is_task() {
        assert!(Intent::CreateTask.is_task());
        assert!(Intent::SetReminder.is_task());
        assert!(!Intent::StartQuiz.is_task());
        assert!(!Intent::GeneralChat.is_task());
    }

    #[test]
    fn test_entity_type_serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&EntityType::IpAddress).unwrap(),
            "\"IP_ADDRESS\""
        );
        assert_eq!(
            serde_json::to_string(&EntityType::MacAddress).unwrap(),
            "\"MAC_ADDRESS\""
        );
        assert_eq!(EntityType::Time.as_str(), "TIME");
    }

    #[test]
    fn test_entity_end_index() {
        let e = Entity {
            entity_type: EntityType::Email,
            value: "a@b.com".to_string(),
            start_index: 12,
            length: 7,
        };
        assert_eq!(e.end_index(), 19);
    }

    #[test]
    fn test_sentiment_as_str() {
        assert_eq!(Sentiment::Worried.as_str(), "worried");
        assert_eq!(Sentiment::Neutral.as_str(), "neutral");
    }
}
