use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Providers the worker can enrich from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Fotmob,
    Sofascore,
}

impl Provider {
    // lowercase slug used in keys and upstream paths
    pub fn slug(&self) -> &'static str {
        match self {
            Provider::Fotmob => "fotmob",
            Provider::Sofascore => "sofascore",
        }
    }

    // name reported in payloads
    pub fn label(&self) -> &'static str {
        match self {
            Provider::Fotmob => "FOTMOB",
            Provider::Sofascore => "SOFASCORE",
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Provider::Fotmob => "MATCH_DETAILS",
            Provider::Sofascore => "STATS",
        }
    }
}

// Fingerprint of one unit of enrichment work, e.g. "fotmob:123"
pub fn fingerprint(provider: Provider, match_id: &str) -> String {
    format!("{}:{}", provider.slug(), match_id)
}

// Enrichment payload returned to the API server
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentResponse {
    pub provider: String,
    pub kind: String,
    pub raw: Map<String, Value>,
    pub normalized_summary: NormalizedSummary,
    pub ttl_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSummary {
    pub last_updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fingerprint_joins_slug_and_id() {
        assert_eq!(fingerprint(Provider::Fotmob, "123"), "fotmob:123");
        assert_eq!(fingerprint(Provider::Sofascore, "abc"), "sofascore:abc");
    }

    #[test]
    fn response_serializes_camel_case() {
        let resp = EnrichmentResponse {
            provider: "FOTMOB".into(),
            kind: "MATCH_DETAILS".into(),
            raw: Map::new(),
            normalized_summary: NormalizedSummary {
                last_updated_at: "2026-01-01T00:00:00Z".into(),
            },
            ttl_seconds: 86400,
        };

        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["normalizedSummary"]["lastUpdatedAt"], json!("2026-01-01T00:00:00Z"));
        assert_eq!(value["ttlSeconds"], json!(86400));
    }
}
