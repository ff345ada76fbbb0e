use serde::{Deserialize, Serialize};

/// One exchanged chat message as supplied by the caller.
///
/// `role` is kept as a free string: only `user` and `assistant` are forwarded
/// to the model, anything else is dropped when the conversation is assembled.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: String,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

// ───────────────────────────────────────────────────────────────────────────────
// Country facts
// ───────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CountryFacts {
    pub visa_requirements: VisaRequirements,
    pub cost_of_living: CostOfLiving,
    pub job_market: JobMarket,
    pub healthcare: Healthcare,
    pub education: Education,
    pub culture: Culture,
    pub immigration: ImmigrationInfo,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisaRequirements {
    pub processing_time: String,
    pub fees: String,
    pub requirements: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CostOfLiving {
    pub index: u32,
    pub rent: String,
    pub food: String,
    pub transport: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobMarket {
    pub status: String,
    pub average_salary: String,
    pub unemployment: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Healthcare {
    #[serde(rename = "type")]
    pub kind: String,
    pub cost: String,
    pub quality: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Education {
    pub system: String,
    pub cost: String,
    pub language: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Culture {
    pub language: String,
    pub diversity: String,
    pub climate: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImmigrationInfo {
    pub processing_time: String,
    pub fees: String,
    pub pathways: Vec<String>,
}

// ───────────────────────────────────────────────────────────────────────────────
// Gemini wire format
// ───────────────────────────────────────────────────────────────────────────────

pub const GEMINI_ROLE_USER: &str = "user";
pub const GEMINI_ROLE_MODEL: &str = "model";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeminiPart {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeminiContent {
    pub role: String,
    pub parts: Vec<GeminiPart>,
}

impl GeminiContent {
    pub fn user(text: impl Into<String>) -> Self {
        Self::with_role(GEMINI_ROLE_USER, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::with_role(GEMINI_ROLE_MODEL, text)
    }

    fn with_role(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![GeminiPart { text: text.into() }],
        }
    }

    /// Text of the first part, if any.
    pub fn text(&self) -> Option<&str> {
        self.parts.first().map(|p| p.text.as_str())
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    pub generation_config: GenerationConfig,
    pub safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Deserialize, Default)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CandidatePart {
    pub text: Option<String>,
}

impl GeminiResponse {
    /// `candidates[0].content.parts[0].text`, the only field the advice flow reads.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

// ───────────────────────────────────────────────────────────────────────────────
// Travel booking
// ───────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingKind {
    Flight,
    Hotel,
    Transport,
    Visa,
}

/// Request for an internal platform booking link.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    #[serde(rename = "type")]
    pub kind: BookingKind,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub passengers: Option<u32>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub user_permission: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlightOption {
    pub airline: String,
    pub flight_number: String,
    pub departure: String,
    pub arrival: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HotelOption {
    pub name: String,
    pub price_per_night: u32,
    pub rating: f32,
    pub features: Vec<String>,
}

// AviationStack flights response; every field is optional on the wire.
#[derive(Debug, Deserialize, Default)]
pub struct AviationResponse {
    pub data: Option<Vec<AviationFlight>>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AviationFlight {
    pub airline: Option<AviationAirline>,
    pub flight: Option<AviationFlightCode>,
    pub departure: Option<AviationAirport>,
    pub arrival: Option<AviationAirport>,
    pub flight_status: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AviationAirline {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AviationFlightCode {
    pub iata: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AviationAirport {
    pub airport: Option<String>,
}

impl From<AviationFlight> for FlightOption {
    fn from(f: AviationFlight) -> Self {
        Self {
            airline: f
                .airline
                .and_then(|a| a.name)
                .unwrap_or_else(|| "Unknown Airline".to_string()),
            flight_number: f
                .flight
                .and_then(|c| c.iata)
                .unwrap_or_else(|| "N/A".to_string()),
            departure: f
                .departure
                .and_then(|a| a.airport)
                .unwrap_or_else(|| "Unknown".to_string()),
            arrival: f
                .arrival
                .and_then(|a| a.airport)
                .unwrap_or_else(|| "Unknown".to_string()),
            status: f.flight_status.unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_request_serializes_camel_case() {
        let req = GeminiRequest {
            contents: vec![GeminiContent::user("hi")],
            generation_config: GenerationConfig {
                temperature: 0.7,
                top_k: 40,
                top_p: 0.95,
                max_output_tokens: 2000,
            },
            safety_settings: vec![SafetySetting {
                category: "HARM_CATEGORY_HARASSMENT".to_string(),
                threshold: "BLOCK_MEDIUM_AND_ABOVE".to_string(),
            }],
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(value["generationConfig"]["topK"], 40);
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 2000);
        assert_eq!(
            value["safetySettings"][0]["threshold"],
            "BLOCK_MEDIUM_AND_ABOVE"
        );
    }

    #[test]
    fn test_first_text_reads_only_first_candidate_part() {
        let resp: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[
                {"content":{"parts":[{"text":"first"},{"text":"second"}]},"finishReason":"STOP"},
                {"content":{"parts":[{"text":"other"}]}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(resp.first_text(), Some("first"));
    }

    #[test]
    fn test_first_text_missing_paths() {
        let empty: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.first_text(), None);

        let no_content: GeminiResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert_eq!(no_content.first_text(), None);

        let no_text: GeminiResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{}]}}]}"#).unwrap();
        assert_eq!(no_text.first_text(), None);
    }

    #[test]
    fn test_aviation_flight_defaults() {
        let flight: AviationFlight = serde_json::from_str(
            r#"{"airline":{"name":"Air Canada"},"flight":{},"departure":{"airport":"Toronto Pearson"}}"#,
        )
        .unwrap();
        let option = FlightOption::from(flight);
        assert_eq!(option.airline, "Air Canada");
        assert_eq!(option.flight_number, "N/A");
        assert_eq!(option.departure, "Toronto Pearson");
        assert_eq!(option.arrival, "Unknown");
        assert_eq!(option.status, "Unknown");
    }

    #[test]
    fn test_booking_request_accepts_type_field() {
        let req: BookingRequest =
            serde_json::from_str(r#"{"type":"hotel","to":"Berlin","userPermission":true}"#)
                .unwrap();
        assert_eq!(req.kind, BookingKind::Hotel);
        assert_eq!(req.to.as_deref(), Some("Berlin"));
        assert_eq!(req.user_permission, Some(true));
        assert!(req.from.is_none());
    }
}
