use std::collections::BTreeMap;

use crate::detection::is_suspicious_client_verification;
use crate::localization::Lang;
use crate::store::Collections;
use crate::utils::MessageFormatter;

/// suspicious entries listed in full before the rest is only counted
pub const SUSPICIOUS_LIST_LIMIT: usize = 5;
/// verification texts are cut to this many characters in the listing
pub const VERIFICATION_PREVIEW_CHARS: usize = 30;

const UNKNOWN: &str = "Unknown";
const CURRENCY_SYMBOLS: [char; 3] = ['€', '$', '£'];

#[derive(Debug, Clone, PartialEq)]
pub struct PriceStats {
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuspiciousClient {
    pub user_id: i64,
    pub city: String,
    pub verification_text: String,
}

/// aggregated view over stored profiles for the /admin command
#[derive(Debug, Clone, PartialEq)]
pub struct AdminSummary {
    pub translator_count: usize,
    pub client_count: usize,
    pub verified_clients: usize,
    pub unverified_clients: usize,
    pub suspicious: Vec<SuspiciousClient>,
    /// `None` when no stored price could be parsed
    pub prices: Option<PriceStats>,
    pub translators_by_city: BTreeMap<String, usize>,
    pub clients_by_city: BTreeMap<String, usize>,
    pub translators_by_level: BTreeMap<String, usize>,
}

/// parses a stored price, tolerating a currency symbol and a decimal comma
pub fn parse_stored_price(price: &str) -> Option<f64> {
    let cleaned: String = price.chars().filter(|c| !CURRENCY_SYMBOLS.contains(c)).collect();
    cleaned
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn non_empty_or_unknown(value: &str) -> String {
    if value.is_empty() {
        UNKNOWN.to_string()
    } else {
        value.to_string()
    }
}

impl AdminSummary {
    pub fn from_collections(data: &Collections) -> Self {
        let mut translators_by_city = BTreeMap::new();
        let mut translators_by_level = BTreeMap::new();
        let mut prices = Vec::new();

        for translator in data.translators.values() {
            *translators_by_city
                .entry(non_empty_or_unknown(&translator.city))
                .or_insert(0) += 1;
            *translators_by_level
                .entry(non_empty_or_unknown(&translator.language_level))
                .or_insert(0) += 1;
            if let Some(price) = parse_stored_price(&translator.price) {
                prices.push(price);
            }
        }

        let mut clients_by_city = BTreeMap::new();
        let mut verified_clients = 0;
        let mut suspicious = Vec::new();

        for client in data.clients.values() {
            let city = non_empty_or_unknown(&client.city);
            *clients_by_city.entry(city.clone()).or_insert(0) += 1;

            if client.registration_complete {
                verified_clients += 1;
            }

            if !client.service_needed.is_empty()
                && is_suspicious_client_verification(&client.service_needed)
            {
                suspicious.push(SuspiciousClient {
                    user_id: client.user_id,
                    city,
                    verification_text: client.service_needed.clone(),
                });
            }
        }

        Self {
            translator_count: data.translators.len(),
            client_count: data.clients.len(),
            verified_clients,
            unverified_clients: data.clients.len() - verified_clients,
            suspicious,
            prices: price_stats(&prices),
            translators_by_city,
            clients_by_city,
            translators_by_level,
        }
    }

    /// translators per client; with no clients the translator count itself
    pub fn ratio(&self) -> f64 {
        if self.client_count > 0 {
            self.translator_count as f64 / self.client_count as f64
        } else {
            self.translator_count as f64
        }
    }

    /// renders the summary as Telegram HTML
    pub fn render(&self, lang: Lang) -> String {
        let mut sections = vec![
            lang.summary_title().to_string(),
            lang.summary_totals(self.translator_count, self.client_count, self.ratio()),
            lang.summary_verification(
                self.verified_clients,
                self.unverified_clients,
                self.suspicious.len(),
            ),
        ];

        if let Some(prices) = &self.prices {
            sections.push(lang.summary_prices(prices.average, prices.min, prices.max));
        }

        sections.push(render_counts(lang.summary_translators_by_city(), &self.translators_by_city));
        sections.push(render_counts(lang.summary_clients_by_city(), &self.clients_by_city));
        sections.push(render_counts(lang.summary_levels(), &self.translators_by_level));

        if !self.suspicious.is_empty() {
            let mut lines = vec![lang.summary_suspicious_title().to_string()];
            for entry in self.suspicious.iter().take(SUSPICIOUS_LIST_LIMIT) {
                let preview = MessageFormatter::truncate_with_ellipsis(
                    &entry.verification_text,
                    VERIFICATION_PREVIEW_CHARS,
                );
                lines.push(lang.summary_suspicious_entry(
                    entry.user_id,
                    &MessageFormatter::escape_html(&entry.city),
                    &MessageFormatter::escape_html(&preview),
                ));
            }
            if self.suspicious.len() > SUSPICIOUS_LIST_LIMIT {
                lines.push(lang.summary_more(self.suspicious.len() - SUSPICIOUS_LIST_LIMIT));
            }
            sections.push(lines.join("\n"));
        }

        sections.join("\n\n")
    }
}

fn price_stats(prices: &[f64]) -> Option<PriceStats> {
    if prices.is_empty() {
        return None;
    }
    let sum: f64 = prices.iter().sum();
    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(PriceStats {
        average: sum / prices.len() as f64,
        min,
        max,
    })
}

fn render_counts(heading: &str, counts: &BTreeMap<String, usize>) -> String {
    let mut lines = vec![heading.to_string()];
    for (key, count) in counts {
        lines.push(format!("• {}: {}", MessageFormatter::escape_html(key), count));
    }
    lines.join("\n")
}
