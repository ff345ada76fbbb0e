use serde::Serialize;

const BOOKING_KEYWORDS: &[&str] = &[
    "book flight",
    "book hotel",
    "reserve",
    "purchase ticket",
    "buy ticket",
    "make reservation",
    "book travel",
    "book accommodation",
    "find flights",
    "search flights",
    "flight booking",
    "hotel booking",
];

const DOCUMENT_KEYWORDS: &[&str] = &[
    "visa application",
    "apply for visa",
    "process visa",
    "submit documents",
    "upload documents",
    "visa processing",
    "immigration documents",
    "document verification",
];

/// What the user is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Booking,
    Document,
    General,
}

pub trait IntentClassifier: Send + Sync {
    fn classify(&self, utterance: &str) -> Intent;
}

/// Case-insensitive substring matching against two fixed keyword lists.
///
/// Matching is deliberately permissive: no tokenization and no negation, so
/// "I don't want to reserve anything" still classifies as a booking. Booking
/// keywords are checked first and win when both lists match.
#[derive(Debug, Clone)]
pub struct KeywordIntent {
    booking: Vec<String>,
    document: Vec<String>,
}

impl Default for KeywordIntent {
    fn default() -> Self {
        Self::new(BOOKING_KEYWORDS, DOCUMENT_KEYWORDS)
    }
}

impl KeywordIntent {
    pub fn new(booking: &[&str], document: &[&str]) -> Self {
        Self {
            booking: booking.iter().map(|k| k.to_lowercase()).collect(),
            document: document.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn is_booking(&self, utterance: &str) -> bool {
        contains_any(&utterance.to_lowercase(), &self.booking)
    }

    pub fn is_document(&self, utterance: &str) -> bool {
        contains_any(&utterance.to_lowercase(), &self.document)
    }
}

fn contains_any(haystack: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| haystack.contains(k.as_str()))
}

impl IntentClassifier for KeywordIntent {
    fn classify(&self, utterance: &str) -> Intent {
        let intent = if self.is_booking(utterance) {
            Intent::Booking
        } else if self.is_document(utterance) {
            Intent::Document
        } else {
            Intent::General
        };
        tracing::debug!(?intent, "Classified utterance");
        intent
    }
}
