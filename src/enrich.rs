//! Country recognition and the "real-time" facts appended to advice requests.
//!
//! Facts are produced by a [`FactsGenerator`] and memoized per country key in a
//! [`CountryFactsCache`] owned by the enricher, so two service instances never
//! share entries.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write as _;
use std::sync::Arc;

use crate::models::{
    CostOfLiving, CountryFacts, Culture, Education, Healthcare, ImmigrationInfo, JobMarket,
    VisaRequirements,
};

struct CountryPattern {
    key: &'static str,
    regex: Regex,
}

// Order matters: enrichment blocks follow this list, not the utterance.
static COUNTRY_PATTERNS: Lazy<Vec<CountryPattern>> = Lazy::new(|| {
    [
        ("canada", r"(?i)\b(canada|canadian)\b"),
        ("usa", r"(?i)\b(usa|america|united states)\b"),
        ("uk", r"(?i)\b(uk|britain|united kingdom)\b"),
        ("australia", r"(?i)\b(australia|australian)\b"),
        ("germany", r"(?i)\b(germany|german)\b"),
        ("france", r"(?i)\b(france|french)\b"),
        ("spain", r"(?i)\b(spain|spanish)\b"),
        ("italy", r"(?i)\b(italy|italian)\b"),
        ("netherlands", r"(?i)\b(netherlands|dutch)\b"),
        ("sweden", r"(?i)\b(sweden|swedish)\b"),
    ]
    .into_iter()
    .map(|(key, pattern)| CountryPattern {
        key,
        regex: Regex::new(pattern).expect("country pattern is a valid regex"),
    })
    .collect()
});

/// Canonical country keys mentioned in `utterance`, in pattern-table order.
///
/// Every alias of a country resolves to the same key ("America" and "United
/// States" both yield `usa`), and each country appears at most once.
pub fn recognize_countries(utterance: &str) -> Vec<&'static str> {
    COUNTRY_PATTERNS
        .iter()
        .filter(|p| p.regex.is_match(utterance))
        .map(|p| p.key)
        .collect()
}

/// Source of country facts. Swappable for a real data provider.
pub trait FactsGenerator: Send + Sync {
    fn generate(&self, country: &str) -> CountryFacts;
}

/// Placeholder facts; every country gets the same values.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntheticFacts;

impl FactsGenerator for SyntheticFacts {
    fn generate(&self, country: &str) -> CountryFacts {
        tracing::debug!("Synthesizing facts for {}", country);
        CountryFacts {
            visa_requirements: VisaRequirements {
                processing_time: "2-4 weeks".to_string(),
                fees: "$150-500".to_string(),
                requirements: vec![
                    "Passport".to_string(),
                    "Photos".to_string(),
                    "Financial proof".to_string(),
                    "Medical exam".to_string(),
                ],
            },
            cost_of_living: CostOfLiving {
                index: 75,
                rent: "$800-2000/month".to_string(),
                food: "$300-500/month".to_string(),
                transport: "$100-200/month".to_string(),
            },
            job_market: JobMarket {
                status: "Strong demand for skilled workers".to_string(),
                average_salary: "$45,000-80,000".to_string(),
                unemployment: "3.2%".to_string(),
            },
            healthcare: Healthcare {
                kind: "Universal healthcare".to_string(),
                cost: "Free/Low cost".to_string(),
                quality: "High".to_string(),
            },
            education: Education {
                system: "World-class universities".to_string(),
                cost: "$10,000-30,000/year".to_string(),
                language: "English".to_string(),
            },
            culture: Culture {
                language: "English".to_string(),
                diversity: "Highly multicultural".to_string(),
                climate: "Varies by region".to_string(),
            },
            immigration: ImmigrationInfo {
                processing_time: "6-12 months".to_string(),
                fees: "$1,500-3,000".to_string(),
                pathways: vec![
                    "Express Entry".to_string(),
                    "Provincial Nominee".to_string(),
                    "Family Sponsorship".to_string(),
                ],
            },
        }
    }
}

/// Country key → facts. No TTL and no eviction.
#[derive(Debug, Default)]
pub struct CountryFactsCache {
    entries: DashMap<String, Arc<CountryFacts>>,
}

impl CountryFactsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, country: &str) -> Option<Arc<CountryFacts>> {
        self.entries
            .get(&country.to_lowercase())
            .map(|e| Arc::clone(e.value()))
    }

    /// Returns the cached entry, creating it with `create` on a miss.
    ///
    /// The lookup and the insert happen under the same shard lock, so
    /// concurrent callers for one key run `create` at most once.
    pub fn get_or_insert_with<F>(&self, country: &str, create: F) -> Arc<CountryFacts>
    where
        F: FnOnce() -> CountryFacts,
    {
        let entry = self
            .entries
            .entry(country.to_lowercase())
            .or_insert_with(|| Arc::new(create()));
        Arc::clone(entry.value())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct ContextEnricher {
    cache: CountryFactsCache,
    generator: Arc<dyn FactsGenerator>,
}

impl Default for ContextEnricher {
    fn default() -> Self {
        Self::new(Arc::new(SyntheticFacts))
    }
}

impl ContextEnricher {
    pub fn new(generator: Arc<dyn FactsGenerator>) -> Self {
        Self {
            cache: CountryFactsCache::new(),
            generator,
        }
    }

    pub fn cache(&self) -> &CountryFactsCache {
        &self.cache
    }

    pub fn facts_for(&self, country: &str) -> Arc<CountryFacts> {
        self.cache
            .get_or_insert_with(country, || self.generator.generate(country))
    }

    /// Fact blocks for every recognized country, or an empty string.
    pub fn enrich(&self, utterance: &str) -> String {
        let countries = recognize_countries(utterance);
        if !countries.is_empty() {
            tracing::info!("Enriching request with facts for {:?}", countries);
        }

        let mut out = String::new();
        for country in countries {
            let facts = self.facts_for(country);
            // Writing into a String cannot fail.
            let _ = write!(
                out,
                "\n\nReal-time data for {country}:\n\
                 - Visa processing time: {}\n\
                 - Current visa fees: {}\n\
                 - Job market: {}\n\
                 - Cost of living index: {}\n\
                 - Healthcare system: {}\n",
                facts.immigration.processing_time,
                facts.immigration.fees,
                facts.job_market.status,
                facts.cost_of_living.index,
                facts.healthcare.kind,
            );
        }
        out
    }
}
