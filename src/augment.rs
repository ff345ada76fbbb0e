//! Appends markdown action links to model output based on what the user asked.

use once_cell::sync::Lazy;
use regex::Regex;

static LOCATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(canada|usa|uk|germany|australia|france|spain|italy)\b")
        .expect("location pattern is a valid regex")
});

const BOOKING_BLOCK: &str = "\n\n## 🚀 **Instant Actions:**\n\
- **[📱 Book This Flight Now](/travel?action=book&type=flight)** - Complete booking in 2 minutes\n\
- **[🗺️ Airport Navigation Guide](/maps?category=airports)** - Step-by-step airport guidance\n\
- **[📋 Visa Requirements Check](/guide?action=visa-check)** - Verify your travel documents\n\
- **[🏨 Book Arrival Hotel](/travel?action=book&type=hotel)** - Secure accommodation\n";

const VISA_BLOCK: &str = "\n\n## 📋 **Visa Processing Center:**\n\
- **[📤 Start Visa Application](/guide?action=visa-apply)** - I'll process your application\n\
- **[📷 Upload Documents](/profile?section=documents)** - Secure document processing\n\
- **[🏛️ Find Immigration Offices](/maps?category=immigration)** - Locate nearest offices\n\
- **[📊 Track Application Status](/profile?section=applications)** - Monitor progress\n";

fn country_block(country: &str) -> String {
    format!(
        "\n\n## 🌍 **{upper} Immigration Hub:**\n\
         - **[📖 Complete {country} Guide](/guide?country={country})** - Everything you need to know\n\
         - **[🗺️ Explore {country} Cities](/maps?country={country})** - Virtual tours and navigation\n\
         - **[✈️ Book Travel to {country}](/travel?destination={country})** - Immigration-friendly bookings\n\
         - **[👥 Connect with {country} Community](/profile?section=community&country={country})** - Meet other immigrants\n",
        upper = country.to_uppercase(),
    )
}

/// First supported country named in `utterance`, lowercased.
pub fn mentioned_country(utterance: &str) -> Option<String> {
    LOCATION_PATTERN
        .captures(utterance)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_lowercase())
}

/// Returns `model_text` followed by any matching action blocks, in the order
/// booking, visa, country. `model_text` itself is never altered.
pub fn augment(model_text: &str, utterance: &str) -> String {
    let lower = utterance.to_lowercase();
    let mut out = String::from(model_text);

    if lower.contains("flight") || lower.contains("book") {
        out.push_str(BOOKING_BLOCK);
    }
    if lower.contains("visa") || lower.contains("immigration") {
        out.push_str(VISA_BLOCK);
    }
    if let Some(country) = mentioned_country(utterance) {
        out.push_str(&country_block(&country));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_block_only() {
        let out = augment("Model text.", "book a flight to Paris");
        assert_eq!(out, format!("Model text.{BOOKING_BLOCK}"));
    }

    #[test]
    fn test_visa_then_country_block() {
        let out = augment("Model text.", "visa for Germany");
        assert_eq!(
            out,
            format!("Model text.{VISA_BLOCK}{}", country_block("germany"))
        );
        assert!(!out.contains("Instant Actions"));
        assert!(out.contains("## 🌍 **GERMANY Immigration Hub:**"));
        assert!(out.contains("(/guide?country=germany)"));
    }

    #[test]
    fn test_all_three_blocks_in_fixed_order() {
        let out = augment("T", "Immigration and flights to Canada");
        let booking = out.find("Instant Actions").unwrap();
        let visa = out.find("Visa Processing Center").unwrap();
        let country = out.find("CANADA Immigration Hub").unwrap();
        assert!(out.starts_with('T'));
        assert!(booking < visa && visa < country);
    }

    #[test]
    fn test_no_blocks_returns_text_unchanged() {
        assert_eq!(augment("Plain answer", "what's the weather like?"), "Plain answer");
    }

    #[test]
    fn test_case_insensitive_keywords() {
        assert!(augment("", "FLIGHT times").contains("Instant Actions"));
        assert!(augment("", "VISA rules").contains("Visa Processing Center"));
    }

    #[test]
    fn test_country_uses_first_match_and_word_boundaries() {
        assert_eq!(
            mentioned_country("Is France or Spain better?").as_deref(),
            Some("france")
        );
        assert_eq!(mentioned_country("USA").as_deref(), Some("usa"));
        assert_eq!(mentioned_country("Canadian winters"), None);
        assert_eq!(mentioned_country("the Netherlands"), None);
    }
}
