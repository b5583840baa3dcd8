//! HTTP data source talking to the live backend.

use reqwest::{Client, StatusCode, Url};

use super::models::{MemberRecord, OrderRecord, StatsPayload, Suggestion};
use super::ApiError;

/// Wrapper payloads for the endpoints that nest their lists.
#[derive(serde::Deserialize)]
struct SuggestionEnvelope {
    results: Vec<Suggestion>,
}

#[derive(serde::Deserialize)]
struct MemberEnvelope {
    members: Vec<MemberRecord>,
}

#[derive(Debug, Clone)]
pub struct RemoteSource {
    client: Client,
    base: Url,
}

impl RemoteSource {
    pub fn new(base: &str) -> Result<Self, ApiError> {
        // A trailing slash matters for Url::join.
        let normalised = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        let base = Url::parse(&normalised).map_err(|_| ApiError::BadUrl(base.to_string()))?;
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub async fn fetch_orders(&self) -> Result<Vec<OrderRecord>, ApiError> {
        self.get_json("reports/datatable/get_orders_data/", &[]).await
    }

    pub async fn fetch_stats(
        &self,
        year: Option<i32>,
        search: &str,
    ) -> Result<StatsPayload, ApiError> {
        let year_param = year.map(|y| y.to_string());
        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(ref y) = year_param {
            params.push(("year", y));
        }
        if !search.trim().is_empty() {
            params.push(("search", search));
        }
        self.get_json("dashboard/stats/", &params).await
    }

    pub async fn fetch_suggestions(&self, query: &str) -> Result<Vec<Suggestion>, ApiError> {
        let envelope: SuggestionEnvelope = self
            .get_json("dashboard/event-autocomplete/", &[("q", query)])
            .await?;
        Ok(envelope.results)
    }

    pub async fn fetch_members(&self, event_id: i64) -> Result<Vec<MemberRecord>, ApiError> {
        let id = event_id.to_string();
        let envelope: MemberEnvelope =
            self.get_json("dashboard/members/", &[("event", &id)]).await?;
        Ok(envelope.members)
    }

    pub fn invoice_url(&self, invoice_id: i64) -> String {
        format!("{}dashboard/invoice/{invoice_id}/", self.base)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self
            .base
            .join(path)
            .map_err(|_| ApiError::BadUrl(path.to_string()))?;
        let response = self.client.get(url.clone()).query(params).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
            });
        }

        // Decode via serde_json so a shape mismatch reports the endpoint.
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| ApiError::Decode {
            context: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_url_matches_the_backend_route() {
        let source = RemoteSource::new("http://localhost:8000").unwrap();
        assert_eq!(
            source.invoice_url(17),
            "http://localhost:8000/dashboard/invoice/17/"
        );
    }

    #[test]
    fn base_url_gets_a_trailing_slash() {
        let source = RemoteSource::new("https://events.example.org/app").unwrap();
        assert_eq!(source.base().as_str(), "https://events.example.org/app/");
    }

    #[test]
    fn garbage_urls_are_rejected() {
        assert!(matches!(
            RemoteSource::new("http://"),
            Err(ApiError::BadUrl(_))
        ));
    }
}
