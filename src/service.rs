use std::sync::Arc;

use crate::augment::augment;
use crate::booking::{AviationStackClient, BookingDesk, FlightSearch, generate_booking_link};
use crate::config::Config;
use crate::conversation::assemble;
use crate::enrich::{ContextEnricher, FactsGenerator, SyntheticFacts};
use crate::error::Result;
use crate::gateway::AdviceGateway;
use crate::intent::{Intent, IntentClassifier, KeywordIntent};
use crate::locale::{self, DEFAULT_LANGUAGE};
use crate::models::{BookingRequest, ConversationTurn};
use crate::transport::{GeminiTransport, Transport};

/// Main service struct: routes an utterance to the booking desk, the document
/// handler or the model, and never lets a failure escape the public operation.
#[derive(Clone)]
pub struct AdvisorService {
    classifier: Arc<dyn IntentClassifier>,
    enricher: Arc<ContextEnricher>,
    gateway: Arc<AdviceGateway>,
    booking: Arc<BookingDesk>,
    default_language: String,
}

impl AdvisorService {
    pub fn new(cfg: &Config) -> Result<Self> {
        tracing::info!("AdvisorService::new() - Starting initialization");

        let transport = Arc::new(GeminiTransport::new(
            cfg.gemini.api_key.clone(),
            cfg.gemini.endpoint.clone(),
            cfg.gemini_timeout(),
        )?);
        let flights = Arc::new(AviationStackClient::new(
            cfg.aviation.api_key.clone(),
            cfg.aviation.endpoint.clone(),
            cfg.aviation_timeout(),
        )?);

        tracing::info!(
            timeout = ?cfg.gemini_timeout(),
            flight_lookup = cfg.aviation.api_key.is_some(),
            "AdvisorService::new() - Service initialization complete"
        );

        Ok(Self::from_parts(
            transport,
            flights,
            Arc::new(SyntheticFacts),
            cfg.service.default_language.clone(),
        ))
    }

    pub fn from_parts(
        transport: Arc<dyn Transport>,
        flights: Arc<dyn FlightSearch>,
        facts: Arc<dyn FactsGenerator>,
        default_language: String,
    ) -> Self {
        Self {
            classifier: Arc::new(KeywordIntent::default()),
            enricher: Arc::new(ContextEnricher::new(facts)),
            gateway: Arc::new(AdviceGateway::new(transport)),
            booking: Arc::new(BookingDesk::new(flights)),
            default_language,
        }
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn enricher(&self) -> &ContextEnricher {
        &self.enricher
    }

    /// Display-ready advice for one utterance. Failures become the localized fallback.
    pub async fn get_immigration_advice(
        &self,
        text: &str,
        language: &str,
        history: &[ConversationTurn],
    ) -> String {
        or_fallback(self.try_advice(text, language, history).await, language)
    }

    /// Same flow as [`get_immigration_advice`](Self::get_immigration_advice)
    /// but with the structured error left visible.
    pub async fn try_advice(
        &self,
        text: &str,
        language: &str,
        history: &[ConversationTurn],
    ) -> Result<String> {
        let intent = self.classifier.classify(text);
        tracing::info!(?intent, language, turns = history.len(), "Handling advice request");

        match intent {
            Intent::Booking => Ok(self.booking.handle_booking(text).await),
            Intent::Document => Ok(self.booking.handle_document(text)),
            Intent::General => self.general_advice(text, language, history).await,
        }
    }

    /// Enrich, prompt the model and augment, with no intent routing.
    async fn general_advice(
        &self,
        text: &str,
        language: &str,
        history: &[ConversationTurn],
    ) -> Result<String> {
        let enrichment = self.enricher.enrich(text);
        let prompt = locale::system_prompt(language, &enrichment);
        let messages = assemble(&prompt, history, text, &enrichment);

        let reply = self.gateway.send(messages).await?;
        Ok(augment(&reply, text))
    }

    /// Relocation guide for a city or country, in English.
    pub async fn get_location_info(&self, location: &str) -> String {
        let enrichment = self.enricher.enrich(&format!("information about {location}"));
        let prompt = format!(
            "Provide comprehensive immigration-focused information about {location}, including:
    - Immigration offices and their exact locations with directions
    - Safe neighborhoods recommended for new immigrants with rental prices
    - Essential services (banks that open accounts for newcomers, hospitals, schools)
    - Transportation options with costs and immigrant-friendly tips
    - Cultural integration advice and local customs
    - Job market information and networking opportunities
    - Cost of living breakdown with specific prices
    - Step-by-step first-week survival guide

    Format as a complete relocation guide with actionable information and specific details.

    Current data: {enrichment}"
        );

        // Generated prompts mention visas and bookings, so keyword routing is skipped.
        or_fallback(
            self.general_advice(&prompt, DEFAULT_LANGUAGE, &[]).await,
            DEFAULT_LANGUAGE,
        )
    }

    /// Casual walk-through of arriving in `location`, in English.
    pub async fn get_virtual_tour(&self, location: &str) -> String {
        let prompt = format!(
            "Give a friendly, easy-to-follow virtual tour of {location} for new immigrants:
- Airport arrival tips and what to expect
- Immigration process guidance
- Transport options to the city center with costs
- Key downtown spots and landmarks
- First-stop essentials: SIM cards, currency exchange, groceries
- Neighborhood safety and rental prices
- Immigration offices with directions and parking
- Banks friendly to newcomers
- Shopping areas for essentials
- Healthcare access tips

Keep it casual, helpful, and easy to visualize."
        );

        or_fallback(
            self.general_advice(&prompt, DEFAULT_LANGUAGE, &[]).await,
            DEFAULT_LANGUAGE,
        )
    }

    pub fn generate_booking_link(&self, request: &BookingRequest) -> String {
        generate_booking_link(request)
    }
}

fn or_fallback(result: Result<String>, language: &str) -> String {
    match result {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!("AI Service Error: {}", e);
            locale::fallback(language).to_string()
        }
    }
}
