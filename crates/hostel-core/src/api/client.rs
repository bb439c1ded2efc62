//! HTTP client for the hostel REST endpoints.
//!
//! `ApiClient` owns the connection pool and the JSON plumbing;
//! `RestAdapter` binds it to one resource collection URL.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::adapter::ResourceAdapter;
use super::{ApiError, ApiResult};
use crate::models::{DashboardDetails, Record, RecordId};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the hostel backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    /// Create a new API client with the default timeout
    pub fn new() -> ApiResult<Self> {
        Self::with_timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Bind this client to a resource collection at `base_url`.
    pub fn adapter<T: Record>(&self, base_url: impl Into<String>) -> RestAdapter<T> {
        RestAdapter::new(self.clone(), base_url)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> ApiResult<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let url = response.url().to_string();
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), url = %url, "Request rejected");
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response, url: &str) -> ApiResult<T> {
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::parse(&format!("Failed to parse JSON response from {}", url), e))
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self.client.get(url).send().await?;
        let response = Self::check_response(response).await?;
        Self::read_json(response, url).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, url: &str, body: &B) -> ApiResult<T> {
        let response = self.client.post(url).json(body).send().await?;
        let response = Self::check_response(response).await?;
        Self::read_json(response, url).await
    }

    async fn put<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> ApiResult<()> {
        let response = self.client.put(url).json(body).send().await?;
        Self::check_response(response).await?;
        Ok(())
    }

    async fn delete(&self, url: &str) -> ApiResult<()> {
        let response = self.client.delete(url).send().await?;
        Self::check_response(response).await?;
        Ok(())
    }

    // ===== Read-only endpoints =====

    /// Fetch the admin dashboard counters
    pub async fn fetch_dashboard_details(&self, url: &str) -> ApiResult<DashboardDetails> {
        debug!(url, "Fetching dashboard details");
        self.get(url).await
    }
}

/// `ResourceAdapter` over a json-server style REST collection.
///
/// `GET {base}` lists, `POST {base}` creates, `PUT {base}/{id}` replaces and
/// `DELETE {base}/{id}` removes. Failures are returned as-is, never retried.
pub struct RestAdapter<T> {
    api: ApiClient,
    base_url: String,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for RestAdapter<T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            base_url: self.base_url.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: Record> RestAdapter<T> {
    pub fn new(api: ApiClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            api,
            base_url,
            _record: PhantomData,
        }
    }

    pub fn collection_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/{id}` with the id pushed as one percent-encoded segment, so
    /// a text id can never step outside the collection.
    pub fn record_url(&self, id: &RecordId) -> ApiResult<String> {
        let segment = id.to_string();
        if segment == "." || segment == ".." {
            return Err(ApiError::Validation(format!("Invalid {} id: {}", T::LABEL, segment)));
        }
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::Parse(format!("Invalid {} URL {}: {}", T::PLURAL, self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Parse(format!("{} cannot hold record paths", self.base_url)))?
            .push(&segment);
        Ok(url.to_string())
    }

    /// JSON body for a POST. The server assigns the id, so any id key the
    /// record carries is dropped.
    fn create_body(record: &T) -> ApiResult<serde_json::Value> {
        let mut body = serde_json::to_value(record)
            .map_err(|e| ApiError::parse(&format!("Failed to encode {}", T::LABEL), e))?;
        if let Some(map) = body.as_object_mut() {
            map.remove("id");
        }
        Ok(body)
    }
}

#[async_trait]
impl<T: Record> ResourceAdapter<T> for RestAdapter<T> {
    async fn fetch_all(&self) -> ApiResult<Vec<T>> {
        debug!(url = %self.base_url, "Fetching {}", T::PLURAL);
        let records: Vec<T> = self.api.get(&self.base_url).await?;
        debug!(count = records.len(), "Fetched {}", T::PLURAL);
        Ok(records)
    }

    async fn create(&self, record: &T) -> ApiResult<T> {
        let body = Self::create_body(record)?;
        let created: T = self.api.post(&self.base_url, &body).await?;
        if created.persisted_id().is_none() {
            warn!(url = %self.base_url, "{} create response has no id", T::LABEL);
            return Err(ApiError::Parse(format!("{} create response has no id", T::LABEL)));
        }
        info!(id = ?created.id(), "{} created", T::LABEL);
        Ok(created)
    }

    async fn update(&self, id: &RecordId, record: &T) -> ApiResult<bool> {
        let url = self.record_url(id)?;
        self.api.put(&url, record).await?;
        info!(%id, "{} updated", T::LABEL);
        Ok(true)
    }

    async fn delete_by_id(&self, id: &RecordId) -> ApiResult<bool> {
        let url = self.record_url(id)?;
        self.api.delete(&url).await?;
        info!(%id, "{} deleted", T::LABEL);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SaveOutcome;
    use crate::models::{Notice, StudentInfo};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Nothing listens on the discard port in the test environment.
    const UNREACHABLE: &str = "http://127.0.0.1:9/studentInfo";

    #[test]
    fn test_record_urls() {
        let api = ApiClient::new().expect("client");
        let adapter: RestAdapter<Notice> = api.adapter("http://localhost:3001/notice/");
        assert_eq!(adapter.collection_url(), "http://localhost:3001/notice");
        assert_eq!(
            adapter.record_url(&RecordId::from(7)).expect("url"),
            "http://localhost:3001/notice/7"
        );
        assert_eq!(
            adapter.record_url(&RecordId::from("ab12")).expect("url"),
            "http://localhost:3001/notice/ab12"
        );
    }

    #[test]
    fn test_text_ids_stay_inside_collection() {
        let api = ApiClient::new().expect("client");
        let adapter: RestAdapter<Notice> = api.adapter("http://localhost:3001/notice");

        let url = adapter.record_url(&RecordId::from("../studentInfo/3")).expect("url");
        let parsed = Url::parse(&url).expect("valid url");
        let segments: Vec<&str> = parsed.path_segments().expect("segments").collect();
        assert_eq!(segments, ["notice", "..%2FstudentInfo%2F3"]);

        let url = adapter.record_url(&RecordId::from("7?_delete=all#x")).expect("url");
        let parsed = Url::parse(&url).expect("valid url");
        assert_eq!(parsed.query(), None);
        assert_eq!(parsed.fragment(), None);
        let segments: Vec<&str> = parsed.path_segments().expect("segments").collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], "notice");

        for dots in [".", ".."] {
            let result = adapter.record_url(&RecordId::from(dots));
            assert!(matches!(result, Err(ApiError::Validation(_))), "{:?}", result);
        }
    }

    #[test]
    fn test_create_body_has_no_id() {
        let notice = Notice::new("Holiday", "2024-01-01", "Closed").with_id(RecordId::from(""));
        let body = RestAdapter::<Notice>::create_body(&notice).expect("encode");
        assert!(body.get("id").is_none());
        assert_eq!(body["title"], "Holiday");
        assert_eq!(body["date"], "2024-01-01");
        assert_eq!(body["content"], "Closed");
    }

    #[tokio::test]
    async fn test_delete_without_id_never_touches_network() {
        let api = ApiClient::new().expect("client");
        let adapter: RestAdapter<StudentInfo> = api.adapter(UNREACHABLE);
        let result = adapter.delete(None).await;
        assert!(matches!(result, Err(ApiError::MissingIdentifier("Student"))));

        let empty = RecordId::from("");
        let result = adapter.delete(Some(&empty)).await;
        assert!(matches!(result, Err(ApiError::MissingIdentifier(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let api = ApiClient::with_timeout(Duration::from_secs(5)).expect("client");
        let adapter: RestAdapter<StudentInfo> = api.adapter(UNREACHABLE);
        let err = adapter.fetch_all().await.expect_err("nothing is listening");
        assert!(err.is_network(), "unexpected error: {:?}", err);
    }

    #[tokio::test]
    async fn test_dashboard_fetch_surfaces_network_error() {
        let api = ApiClient::with_timeout(Duration::from_secs(5)).expect("client");
        let err = api
            .fetch_dashboard_details("http://127.0.0.1:9/dashboard")
            .await
            .expect_err("nothing is listening");
        assert!(err.is_network());
    }

    /// Request line and body as seen by the stub server.
    #[derive(Debug)]
    struct Received {
        method: String,
        path: String,
        body: String,
    }

    /// Serve exactly one HTTP exchange on a random local port, answering
    /// with `status` and `body`. Returns the server's base URL.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Received>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            let header_end = loop {
                let n = socket.read(&mut chunk).await.expect("read");
                assert!(n > 0, "connection closed before headers");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
            let content_length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            while buf.len() < header_end + content_length {
                let n = socket.read(&mut chunk).await.expect("read");
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }

            let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
            let method = request_line.next().unwrap_or_default().to_string();
            let path = request_line.next().unwrap_or_default().to_string();

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.expect("write");
            let _ = socket.shutdown().await;

            Received {
                method,
                path,
                body: String::from_utf8_lossy(&buf[header_end..]).to_string(),
            }
        });
        (format!("http://{}", addr), handle)
    }

    fn json(body: &str) -> serde_json::Value {
        serde_json::from_str(body).expect("request body is JSON")
    }

    #[tokio::test]
    async fn test_fetch_all_decodes_collection() {
        let (base, server) = serve_once(
            "200 OK",
            r#"[{"id":1,"title":"Water cut","date":"2024-02-01","content":"Morning"},
                {"id":"x9","title":"Holiday","date":"2024-03-01","content":"Closed"}]"#,
        )
        .await;
        let api = ApiClient::new().expect("client");
        let adapter: RestAdapter<Notice> = api.adapter(format!("{}/notice", base));

        let notices = adapter.fetch_all().await.expect("fetch");
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].id, Some(RecordId::from(1)));
        assert_eq!(notices[1].id, Some(RecordId::from("x9")));

        let received = server.await.expect("server");
        assert_eq!(received.method, "GET");
        assert_eq!(received.path, "/notice");
    }

    #[tokio::test]
    async fn test_save_without_id_posts_to_collection() {
        let (base, server) = serve_once(
            "201 Created",
            r#"{"id":12,"title":"Holiday","date":"2024-01-01","content":"Closed"}"#,
        )
        .await;
        let api = ApiClient::new().expect("client");
        let adapter: RestAdapter<Notice> = api.adapter(format!("{}/notice", base));

        let outcome = adapter
            .save(&Notice::new("Holiday", "2024-01-01", "Closed"))
            .await
            .expect("save");
        match outcome {
            SaveOutcome::Created(created) => assert_eq!(created.id, Some(RecordId::from(12))),
            other => panic!("expected create, got {:?}", other),
        }

        let received = server.await.expect("server");
        assert_eq!(received.method, "POST");
        assert_eq!(received.path, "/notice");
        let body = json(&received.body);
        assert!(body.get("id").is_none());
        assert_eq!(body["title"], "Holiday");
    }

    #[tokio::test]
    async fn test_create_response_without_id_is_rejected() {
        let (base, server) = serve_once(
            "201 Created",
            r#"{"title":"Holiday","date":"2024-01-01","content":"Closed"}"#,
        )
        .await;
        let api = ApiClient::new().expect("client");
        let adapter: RestAdapter<Notice> = api.adapter(format!("{}/notice", base));

        let result = adapter.save(&Notice::new("Holiday", "2024-01-01", "Closed")).await;
        match result {
            Err(ApiError::Parse(message)) => assert!(message.contains("no id"), "{}", message),
            other => panic!("expected parse error, got {:?}", other),
        }
        server.await.expect("server");
    }

    #[tokio::test]
    async fn test_save_with_id_puts_to_record_url() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"id":7,"title":"Moved","date":"2024-01-01","content":"Hall B"}"#,
        )
        .await;
        let api = ApiClient::new().expect("client");
        let adapter: RestAdapter<Notice> = api.adapter(format!("{}/notice", base));

        let notice = Notice::new("Moved", "2024-01-01", "Hall B").with_id(RecordId::from(7));
        let outcome = adapter.save(&notice).await.expect("save");
        assert!(matches!(outcome, SaveOutcome::Updated(true)));

        let received = server.await.expect("server");
        assert_eq!(received.method, "PUT");
        assert_eq!(received.path, "/notice/7");
        assert_eq!(json(&received.body)["content"], "Hall B");
    }

    #[tokio::test]
    async fn test_delete_encodes_text_id() {
        let (base, server) = serve_once("200 OK", "{}").await;
        let api = ApiClient::new().expect("client");
        let adapter: RestAdapter<Notice> = api.adapter(format!("{}/notice", base));

        let id = RecordId::from("../studentInfo/3");
        assert!(adapter.delete(Some(&id)).await.expect("delete"));

        let received = server.await.expect("server");
        assert_eq!(received.method, "DELETE");
        assert_eq!(received.path, "/notice/..%2FstudentInfo%2F3");
    }

    #[tokio::test]
    async fn test_error_status_maps_to_http_error() {
        let (base, server) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await;
        let api = ApiClient::new().expect("client");
        let adapter: RestAdapter<StudentInfo> = api.adapter(format!("{}/studentInfo", base));

        let err = adapter
            .delete(Some(&RecordId::from(3)))
            .await
            .expect_err("server rejected");
        assert_eq!(err.to_string(), "Server error: Internal Server Error");
        match err {
            ApiError::Http { status, body, .. } => {
                assert_eq!(status, 500);
                assert!(body.contains("boom"));
            }
            other => panic!("expected http error, got {:?}", other),
        }

        let received = server.await.expect("server");
        assert_eq!(received.method, "DELETE");
        assert_eq!(received.path, "/studentInfo/3");
    }

    #[tokio::test]
    async fn test_malformed_json_is_parse_error() {
        let (base, server) = serve_once("200 OK", r#"[{"id":1,"title":"#).await;
        let api = ApiClient::new().expect("client");
        let adapter: RestAdapter<Notice> = api.adapter(format!("{}/notice", base));

        let err = adapter.fetch_all().await.expect_err("truncated body");
        assert!(matches!(err, ApiError::Parse(_)), "{:?}", err);
        server.await.expect("server");
    }

    #[tokio::test]
    async fn test_dashboard_details_over_http() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"numberOfStudents":120,"complaitsPending":4,"numberOfRooms":60,"numberOfStaff":9}"#,
        )
        .await;
        let api = ApiClient::new().expect("client");

        let details = api
            .fetch_dashboard_details(&format!("{}/dashboard", base))
            .await
            .expect("dashboard");
        assert_eq!(details.tiles()[1].1, 4);

        let received = server.await.expect("server");
        assert_eq!(received.method, "GET");
        assert_eq!(received.path, "/dashboard");
    }
}
