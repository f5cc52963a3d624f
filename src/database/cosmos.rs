use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use sha2::Sha256;
use tracing::debug;

use crate::config::CosmosConfig;
use crate::database::query_builder::ReadingQuery;
use crate::database::reading::Reading;
use crate::database::store::{ReadingStore, StoreError};

type HmacSha256 = Hmac<Sha256>;

const API_VERSION: &str = "2018-12-31";
const QUERY_CONTENT_TYPE: &str = "application/query+json";
const CONTINUATION_HEADER: &str = "x-ms-continuation";

/// One page of a document query response
#[derive(Debug, Deserialize)]
struct QueryPage {
    #[serde(rename = "Documents", default)]
    documents: Vec<Reading>,
}

/// Resolved connection settings, checked per request
struct Connection<'a> {
    endpoint: url::Url,
    key: Vec<u8>,
    database: &'a str,
    container: &'a str,
}

/// Reading store backed by the document database's REST query API.
///
/// Built once at startup whether or not configuration is complete; missing
/// settings surface as a `StoreError` on the first query.
pub struct CosmosStore {
    config: CosmosConfig,
    client: reqwest::Client,
}

impl CosmosStore {
    pub fn new(config: CosmosConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: CosmosConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn connection(&self) -> Result<Connection<'_>, StoreError> {
        let endpoint = self
            .config
            .endpoint
            .as_deref()
            .ok_or(StoreError::ConfigMissing("COSMOS_ENDPOINT"))?;
        let key = self
            .config
            .key
            .as_deref()
            .ok_or(StoreError::ConfigMissing("COSMOS_KEY"))?;
        let database = self
            .config
            .database
            .as_deref()
            .ok_or(StoreError::ConfigMissing("COSMOS_DATABASE"))?;
        let container = self
            .config
            .container
            .as_deref()
            .ok_or(StoreError::ConfigMissing("COSMOS_CONTAINER"))?;

        let endpoint = url::Url::parse(endpoint)
            .map_err(|e| StoreError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;
        let key = STANDARD.decode(key).map_err(|_| StoreError::InvalidKey)?;

        Ok(Connection { endpoint, key, database, container })
    }

    fn request_headers(
        key: &[u8],
        resource_link: &str,
        now: DateTime<Utc>,
        continuation: Option<&str>,
    ) -> Result<HeaderMap, StoreError> {
        let date = rfc1123(now);
        let token = auth_token(key, "post", "docs", resource_link, &date)?;

        let mut headers = HeaderMap::new();
        headers.insert("authorization", header_value(&token)?);
        headers.insert("x-ms-date", header_value(&date)?);
        headers.insert("x-ms-version", HeaderValue::from_static(API_VERSION));
        headers.insert("x-ms-documentdb-isquery", HeaderValue::from_static("True"));
        headers.insert(
            "x-ms-documentdb-query-enablecrosspartition",
            HeaderValue::from_static("True"),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(QUERY_CONTENT_TYPE));
        if let Some(token) = continuation {
            headers.insert(CONTINUATION_HEADER, header_value(token)?);
        }
        Ok(headers)
    }
}

#[async_trait]
impl ReadingStore for CosmosStore {
    fn name(&self) -> &'static str {
        "cosmos"
    }

    async fn query(&self, query: &ReadingQuery) -> Result<Vec<Reading>, StoreError> {
        let conn = self.connection()?;
        let spec = query.to_spec()?;
        let body = serde_json::to_vec(&spec).map_err(|e| StoreError::InvalidQuery(e.to_string()))?;

        let resource_link = format!("dbs/{}/colls/{}", conn.database, conn.container);
        let url = conn
            .endpoint
            .join(&format!("{}/docs", resource_link))
            .map_err(|e| StoreError::InvalidEndpoint(e.to_string()))?;

        let mut readings = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let headers =
                Self::request_headers(&conn.key, &resource_link, Utc::now(), continuation.as_deref())?;

            let response = self
                .client
                .post(url.clone())
                .headers(headers)
                .body(body.clone())
                .send()
                .await?;

            let status = response.status();
            let next = response
                .headers()
                .get(CONTINUATION_HEADER)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_string);

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(StoreError::Status { status: status.as_u16(), body });
            }

            let page: QueryPage = response
                .json()
                .await
                .map_err(|e| StoreError::Decode(e.to_string()))?;

            debug!(
                query = %spec.query,
                documents = page.documents.len(),
                more = next.is_some(),
                "Fetched query page"
            );
            readings.extend(page.documents);

            match next {
                Some(token) => continuation = Some(token),
                None => break,
            }
        }

        Ok(readings)
    }
}

/// Master-key authorization token for one request.
pub fn auth_token(
    key: &[u8],
    verb: &str,
    resource_type: &str,
    resource_link: &str,
    date: &str,
) -> Result<String, StoreError> {
    let payload = format!(
        "{}\n{}\n{}\n{}\n\n",
        verb.to_lowercase(),
        resource_type.to_lowercase(),
        resource_link,
        date.to_lowercase()
    );

    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| StoreError::InvalidKey)?;
    mac.update(payload.as_bytes());
    let signature = STANDARD.encode(mac.finalize().into_bytes());

    let raw = format!("type=master&ver=1.0&sig={}", signature);
    Ok(url::form_urlencoded::byte_serialize(raw.as_bytes()).collect())
}

/// HTTP date in the form the store signs, e.g. `Thu, 27 Apr 2017 00:51:12 GMT`
pub fn rfc1123(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn header_value(raw: &str) -> Result<HeaderValue, StoreError> {
    HeaderValue::from_str(raw).map_err(|e| StoreError::InvalidQuery(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // Published master-key sample
    const SAMPLE_KEY: &str =
        "dsZQi3KtZmCv1ljt3VNWNm7sQUF1y5rJfC6kv5JiwvW0EndXdDku/dkKBp8/ufDToSxLzR4y+O/0H/t4bQtVNw==";

    #[test]
    fn signs_known_sample() {
        let key = STANDARD.decode(SAMPLE_KEY).unwrap();
        let token = auth_token(&key, "GET", "dbs", "dbs/ToDoList", "Thu, 27 Apr 2017 00:51:12 GMT")
            .unwrap();
        assert_eq!(
            token,
            "type%3Dmaster%26ver%3D1.0%26sig%3Dc09PEVJrgp2uQRkr934kFbTqhByc7TVr3OHyqlu%2Bc%2Bc%3D"
        );
    }

    #[test]
    fn formats_http_date() {
        let at = Utc.with_ymd_and_hms(2017, 4, 27, 0, 51, 12).unwrap();
        assert_eq!(rfc1123(at), "Thu, 27 Apr 2017 00:51:12 GMT");
    }

    #[test]
    fn builds_query_headers() {
        let key = STANDARD.decode(SAMPLE_KEY).unwrap();
        let at = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();

        let headers =
            CosmosStore::request_headers(&key, "dbs/canal/colls/readings", at, Some("page-2")).unwrap();

        assert_eq!(headers["x-ms-documentdb-isquery"], "True");
        assert_eq!(headers["x-ms-documentdb-query-enablecrosspartition"], "True");
        assert_eq!(headers["content-type"], QUERY_CONTENT_TYPE);
        assert_eq!(headers["x-ms-version"], API_VERSION);
        assert_eq!(headers["x-ms-date"], "Wed, 15 Jan 2025 12:00:00 GMT");
        assert_eq!(headers[CONTINUATION_HEADER], "page-2");
        assert!(headers["authorization"]
            .to_str()
            .unwrap()
            .starts_with("type%3Dmaster%26ver%3D1.0%26sig%3D"));
    }

    #[tokio::test]
    async fn missing_configuration_fails_the_query() {
        let store = CosmosStore::new(CosmosConfig {
            endpoint: Some("https://example.documents.azure.com:443/".into()),
            key: Some(SAMPLE_KEY.into()),
            database: None,
            container: Some("readings".into()),
        });

        let err = store.query(&ReadingQuery::all()).await.unwrap_err();
        assert!(matches!(err, StoreError::ConfigMissing("COSMOS_DATABASE")));
    }

    #[tokio::test]
    async fn rejects_undecodable_key() {
        let store = CosmosStore::new(CosmosConfig {
            endpoint: Some("https://example.documents.azure.com:443/".into()),
            key: Some("not base64!".into()),
            database: Some("canal".into()),
            container: Some("readings".into()),
        });

        let err = store.query(&ReadingQuery::all()).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey));
    }
}
