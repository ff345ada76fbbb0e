//! Travel booking and visa-document flows that bypass the model.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::enrich::recognize_countries;
use crate::error::{AdvisorError, Result};
use crate::models::{AviationResponse, BookingKind, BookingRequest, FlightOption, HotelOption};

pub const AVIATIONSTACK_API_URL: &str = "http://api.aviationstack.com/v1/flights";

const MAX_FLIGHT_OPTIONS: usize = 3;

// Same reserved set as JavaScript's encodeURIComponent.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

// Keywords match in any case, airport codes only in upper case. Country names
// such as "USA" are filtered out after matching.
static FROM_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?i:from)\s+([A-Z]{3})\b").expect("from pattern is a valid regex")
});
static TO_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?i:to)\s+([A-Z]{3})\b").expect("to pattern is a valid regex"));

// Trailing double spaces are markdown hard breaks.
pub const DOCUMENT_RESPONSE: &str = concat!(
    "# 📋 Visa Application\n",
    "- I can check documents, complete forms, and submit.  \n",
    "- Supported: Canada, USA, UK, Australia, Germany, more.  \n",
    "\n",
    "👉 Reply with \"Start visa for [Country]\" to begin.",
);

pub const BOOKING_ERROR_RESPONSE: &str = concat!(
    "❌ Booking temporarily unavailable.  \n",
    "I can still help with:\n",
    "- Flight search & comparison  \n",
    "- Hotel recommendations  \n",
    "- Visa guidance  \n",
    "- Immigration office locations  \n",
    "- Country-specific guides  \n",
    "\n",
    "Please rephrase your request or specify what you need help with.",
);

pub const NO_FLIGHTS_RESPONSE: &str =
    " Sorry, no flights were found for your request. Please try different dates or routes.";

/// What a booking utterance asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDetails {
    pub kind: BookingKind,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl BookingDetails {
    pub fn extract(utterance: &str) -> Self {
        let lower = utterance.to_lowercase();
        let kind = if lower.contains("hotel") || lower.contains("accommodation") {
            BookingKind::Hotel
        } else {
            BookingKind::Flight
        };
        let airport = |re: &Regex| {
            re.captures_iter(utterance)
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str())
                .find(|code| recognize_countries(code).is_empty())
                .map(str::to_string)
        };

        Self {
            kind,
            from: airport(&FROM_PATTERN),
            to: airport(&TO_PATTERN),
        }
    }
}

/// Flight-status lookup. Failures surface as an empty list, never an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FlightSearch: Send + Sync {
    async fn search(&self, from: &str, to: &str) -> Vec<FlightOption>;
}

pub struct AviationStackClient {
    client: Client,
    endpoint: String,
    access_key: Option<String>,
}

impl AviationStackClient {
    pub fn new(
        access_key: Option<String>,
        endpoint: String,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AdvisorError::Config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint,
            access_key,
        })
    }
}

/// Pass-through mapping of an AviationStack body; anything unreadable is empty.
pub fn parse_flights(body: &str) -> Vec<FlightOption> {
    match serde_json::from_str::<AviationResponse>(body) {
        Ok(resp) => resp
            .data
            .unwrap_or_default()
            .into_iter()
            .map(FlightOption::from)
            .collect(),
        Err(e) => {
            tracing::warn!("Error parsing flights response: {}", e);
            Vec::new()
        }
    }
}

#[async_trait]
impl FlightSearch for AviationStackClient {
    async fn search(&self, from: &str, to: &str) -> Vec<FlightOption> {
        let Some(access_key) = self.access_key.as_deref() else {
            tracing::warn!("AVIATIONSTACK_API_KEY not set, skipping flight lookup");
            return Vec::new();
        };

        tracing::info!("Searching flights {} -> {}", from, to);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("access_key", access_key), ("dep_iata", from), ("arr_iata", to)])
            .send()
            .await;

        let body = match response {
            Ok(r) => r.text().await,
            Err(e) => Err(e),
        };
        match body {
            Ok(body) => parse_flights(&body),
            Err(e) => {
                tracing::warn!("Error fetching flights: {}", e);
                Vec::new()
            }
        }
    }
}

/// Simulated hotel inventory.
pub fn search_hotels(_details: &BookingDetails) -> Vec<HotelOption> {
    vec![
        HotelOption {
            name: "Extended Stay Suites".to_string(),
            price_per_night: 120,
            rating: 4.5,
            features: vec!["Kitchen".to_string(), "Immigration docs support".to_string()],
        },
        HotelOption {
            name: "Business Hotel Central".to_string(),
            price_per_night: 180,
            rating: 4.2,
            features: vec!["WiFi".to_string(), "Concierge".to_string()],
        },
    ]
}

pub fn format_flight_options(flights: &[FlightOption]) -> String {
    if flights.is_empty() {
        return NO_FLIGHTS_RESPONSE.to_string();
    }

    let options = flights
        .iter()
        .take(MAX_FLIGHT_OPTIONS)
        .enumerate()
        .map(|(i, f)| {
            format!(
                "{}. {} – {}  \n   From: {} → To: {}  \n   Status: {}",
                i + 1,
                f.airline,
                f.flight_number,
                f.departure,
                f.arrival,
                f.status
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("# ✈️ Flight Options\n{options}\n\n👉 Reply with \"Book [Option]\" to continue.")
}

pub fn format_hotel_options(hotels: &[HotelOption]) -> String {
    let options = hotels
        .iter()
        .enumerate()
        .map(|(i, h)| {
            format!(
                "{}. {} – ${}/night – {}  ",
                i + 1,
                h.name,
                h.price_per_night,
                h.features.join(" + ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("# 🏨 Hotel Options\n{options}\n\n👉 Reply with \"Book [Option]\" to confirm.")
}

/// Internal platform path for a booking request.
pub fn generate_booking_link(request: &BookingRequest) -> String {
    let mut url = match request.kind {
        BookingKind::Flight => "/travel?service=flights&action=book",
        BookingKind::Hotel => "/travel?service=hotels&action=book",
        BookingKind::Transport => "/travel?service=transport&action=book",
        BookingKind::Visa => "/guide?action=visa-apply",
    }
    .to_string();

    for (name, value) in [
        ("from", &request.from),
        ("to", &request.to),
        ("date", &request.date),
    ] {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            url.push('&');
            url.push_str(name);
            url.push('=');
            url.extend(utf8_percent_encode(value, COMPONENT));
        }
    }
    url
}

/// Answers booking and document requests without calling the model.
pub struct BookingDesk {
    flights: Arc<dyn FlightSearch>,
}

impl BookingDesk {
    pub fn new(flights: Arc<dyn FlightSearch>) -> Self {
        Self { flights }
    }

    pub async fn handle_booking(&self, utterance: &str) -> String {
        let details = BookingDetails::extract(utterance);
        tracing::info!(?details, "Handling booking request");

        match details.kind {
            BookingKind::Hotel => format_hotel_options(&search_hotels(&details)),
            BookingKind::Flight => match (details.from.as_deref(), details.to.as_deref()) {
                (Some(from), Some(to)) => {
                    let flights = self.flights.search(from, to).await;
                    format_flight_options(&flights)
                }
                _ => BOOKING_ERROR_RESPONSE.to_string(),
            },
            // extract() only yields flight or hotel.
            BookingKind::Transport | BookingKind::Visa => BOOKING_ERROR_RESPONSE.to_string(),
        }
    }

    pub fn handle_document(&self, _utterance: &str) -> String {
        DOCUMENT_RESPONSE.to_string()
    }
}
