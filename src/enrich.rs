use serde_json::{Map, Value, json};
use crate::error::EnrichError;
use crate::models::{EnrichmentResponse, NormalizedSummary, Provider};

// How long the API server should keep an enrichment row
pub const ENRICHMENT_TTL_SECONDS: u64 = 86400;

// Producer behind the cache: either synthesizes a placeholder payload or
// forwards to a scraper service.
pub enum Enricher {
    Stub,
    Upstream {
        client: reqwest::Client,
        base_url: String,
    },
}

impl Enricher {
    pub fn from_upstream(upstream_url: Option<&str>, client: reqwest::Client) -> Self {
        match upstream_url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => {
                // add http:// if not present
                let base_url = if url.starts_with("http") {
                    url.trim_end_matches('/').to_string()
                } else {
                    format!("http://{}", url.trim_end_matches('/'))
                };
                Enricher::Upstream { client, base_url }
            }
            None => Enricher::Stub,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Enricher::Stub => "stub".to_string(),
            Enricher::Upstream { base_url, .. } => format!("upstream {}", base_url),
        }
    }

    pub async fn enrich(&self, provider: Provider, match_id: &str) -> Result<EnrichmentResponse, EnrichError> {
        let raw = match self {
            Enricher::Stub => {
                let mut raw = Map::new();
                raw.insert("_stub".to_string(), Value::Bool(true));
                raw.insert("matchId".to_string(), json!(match_id));
                raw
            }
            Enricher::Upstream { client, base_url } => {
                fetch_upstream(client, base_url, provider, match_id).await?
            }
        };

        Ok(EnrichmentResponse {
            provider: provider.label().to_string(),
            kind: provider.kind().to_string(),
            raw,
            normalized_summary: NormalizedSummary {
                last_updated_at: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            },
            ttl_seconds: ENRICHMENT_TTL_SECONDS,
        })
    }
}

async fn fetch_upstream(
    client: &reqwest::Client,
    base_url: &str,
    provider: Provider,
    match_id: &str,
) -> Result<Map<String, Value>, EnrichError> {
    let url = upstream_url(base_url, provider, match_id)?;
    tracing::debug!(%url, "fetching upstream");

    let res = client.get(url).send().await?;
    if !res.status().is_success() {
        return Err(EnrichError::Status(res.status().as_u16()));
    }

    match res.json::<Value>().await {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(EnrichError::Decode(format!(
            "expected a JSON object, got {}",
            json_type(&other)
        ))),
        Err(e) => Err(EnrichError::Decode(e.to_string())),
    }
}

// Path segments are percent-encoded, so any match id stays a single segment
fn upstream_url(base_url: &str, provider: Provider, match_id: &str) -> Result<reqwest::Url, EnrichError> {
    let mut url = reqwest::Url::parse(base_url).map_err(|e| EnrichError::Url(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| EnrichError::Url(format!("{} cannot take a path", base_url)))?
        .pop_if_empty()
        .push(provider.slug())
        .push(match_id);
    Ok(url)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_payload_marks_itself() {
        let resp = Enricher::Stub.enrich(Provider::Fotmob, "4242").await.unwrap();

        assert_eq!(resp.provider, "FOTMOB");
        assert_eq!(resp.kind, "MATCH_DETAILS");
        assert_eq!(resp.raw.get("_stub"), Some(&Value::Bool(true)));
        assert_eq!(resp.raw.get("matchId"), Some(&json!("4242")));
        assert_eq!(resp.ttl_seconds, ENRICHMENT_TTL_SECONDS);
        assert!(resp.normalized_summary.last_updated_at.ends_with('Z'));
    }

    #[tokio::test]
    async fn sofascore_reports_stats_kind() {
        let resp = Enricher::Stub.enrich(Provider::Sofascore, "7").await.unwrap();
        assert_eq!(resp.provider, "SOFASCORE");
        assert_eq!(resp.kind, "STATS");
    }

    #[test]
    fn blank_upstream_falls_back_to_stub() {
        let client = reqwest::Client::new();
        assert!(matches!(Enricher::from_upstream(None, client.clone()), Enricher::Stub));
        assert!(matches!(Enricher::from_upstream(Some("  "), client), Enricher::Stub));
    }

    #[test]
    fn upstream_url_is_normalized() {
        let enricher = Enricher::from_upstream(Some("scraper:9000/"), reqwest::Client::new());
        assert_eq!(enricher.describe(), "upstream http://scraper:9000");
    }

    #[test]
    fn match_id_is_encoded_as_one_segment() {
        let url = upstream_url("http://scraper:9000", Provider::Fotmob, "12/5 é").unwrap();
        assert_eq!(url.as_str(), "http://scraper:9000/fotmob/12%2F5%20%C3%A9");

        let url = upstream_url("http://scraper:9000/api/", Provider::Sofascore, "12.5").unwrap();
        assert_eq!(url.as_str(), "http://scraper:9000/api/sofascore/12.5");
    }

    // Address that was just free; nothing listens on it once the listener drops
    fn closed_local_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_request_error() {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let enricher = Enricher::from_upstream(Some(closed_local_url().as_str()), client);
        let err = enricher.enrich(Provider::Fotmob, "1").await.unwrap_err();
        assert!(matches!(err, EnrichError::Request(_)));
    }
}
