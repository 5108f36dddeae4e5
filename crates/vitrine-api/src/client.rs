//! HTTP client for the storefront API.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tracing::debug;
use url::Url;
use vitrine_catalog::{FavoriteProduct, Product};
use vitrine_core::Config;

use crate::error::{ApiError, ApiResult};

/// Largest error-response body carried into an [`ApiError::Status`].
const MAX_ERROR_BODY_LEN: usize = 512;

/// Client for the storefront REST API.
///
/// Carries no credential of its own; operations that need one take the
/// bearer token per call, the way the session layer hands tokens out.
#[derive(Clone)]
pub struct StorefrontClient {
    base_url: String,
    http_client: Client,
}

impl StorefrontClient {
    /// Create a client against the given base URL. `timeout` applies to
    /// every request; a timed-out call reads as a network failure.
    pub fn new(base_url: &Url, timeout: Duration) -> ApiResult<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Create a client from the core configuration.
    pub fn from_config(config: &Config) -> ApiResult<Self> {
        let base_url = config
            .api_base_url()
            .map_err(|e| ApiError::Config(e.to_string()))?;
        Self::new(&base_url, config.request_timeout())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// Fetch the full product catalog.
    pub async fn fetch_products(&self) -> ApiResult<Vec<Product>> {
        let url = self.endpoint("products");
        debug!(url = %url, "fetching catalog");

        let response = self.http_client.get(&url).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Fetch the server-computed daily specials.
    pub async fn fetch_daily_specials(&self) -> ApiResult<Vec<Product>> {
        let url = self.endpoint("products/daily-specials");
        debug!(url = %url, "fetching daily specials");

        let response = self.http_client.get(&url).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Fetch the authenticated user's favorites.
    pub async fn fetch_favorites(&self, access_token: &str) -> ApiResult<Vec<FavoriteProduct>> {
        let url = self.endpoint("favorites");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Add a product to the user's favorites. A conflict response means
    /// the product is already a favorite and counts as success.
    pub async fn add_favorite(&self, product_id: &str, access_token: &str) -> ApiResult<()> {
        let url = self.endpoint("favorites");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "productId": product_id }))
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            debug!(product_id, "favorite already present remotely");
            return Ok(());
        }
        Self::check_status(response).await?;
        Ok(())
    }

    /// Remove a product from the user's favorites. A missing favorite
    /// counts as removed.
    pub async fn remove_favorite(&self, product_id: &str, access_token: &str) -> ApiResult<()> {
        let url = self.endpoint(&format!("favorites/{product_id}"));

        let response = self
            .http_client
            .delete(&url)
            .bearer_auth(access_token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(product_id, "favorite already absent remotely");
            return Ok(());
        }
        Self::check_status(response).await?;
        Ok(())
    }

    /// Remove every favorite for the authenticated user.
    pub async fn clear_favorites(&self, access_token: &str) -> ApiResult<()> {
        let url = self.endpoint("favorites");

        let response = self
            .http_client
            .delete(&url)
            .bearer_auth(access_token)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Map non-success responses into [`ApiError::Status`]. Bodies are
    /// capped so an HTML error page cannot flood the logs.
    async fn check_status(response: Response) -> ApiResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let mut message = response.text().await.unwrap_or_default();
        if message.len() > MAX_ERROR_BODY_LEN {
            let cut = (0..=MAX_ERROR_BODY_LEN)
                .rev()
                .find(|&i| message.is_char_boundary(i))
                .unwrap_or(0);
            message.truncate(cut);
        }
        Err(ApiError::Status { status, message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    fn client_for(base: &str, timeout_ms: u64) -> StorefrontClient {
        let url = Url::parse(base).unwrap();
        StorefrontClient::new(&url, Duration::from_millis(timeout_ms)).unwrap()
    }

    /// Read one HTTP request off the socket, headers plus body.
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);

            if let Some(head_end) = data.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&data[..head_end]).to_lowercase();
                let content_length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if data.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).to_string()
    }

    /// Serve exactly one request with a canned response, returning the
    /// request text for assertions.
    async fn one_shot_server(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            request
        });

        (format!("http://{addr}"), handle)
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = client_for("http://localhost:9999/", 1000);
        assert_eq!(
            client.endpoint("products"),
            "http://localhost:9999/api/products"
        );
    }

    #[test]
    fn from_config_builds_against_configured_url() {
        let config = Config::new();
        let client = StorefrontClient::from_config(&config).unwrap();
        assert!(client.endpoint("products").ends_with("/api/products"));
    }

    #[tokio::test]
    async fn fetch_products_parses_catalog() {
        let (base, server) = one_shot_server(
            "200 OK",
            r#"[{"id":"p-1","name":"Mug","brand":"Northwind","price":12.5}]"#,
        )
        .await;
        let client = client_for(&base, 2000);

        let products = client.fetch_products().await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("GET /api/products HTTP/1.1"));
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "p-1");
        assert_eq!(products[0].price, 12.5);
    }

    #[tokio::test]
    async fn fetch_favorites_sends_bearer_credential() {
        let (base, server) = one_shot_server("200 OK", "[]").await;
        let client = client_for(&base, 2000);

        let favorites = client.fetch_favorites("tok-123").await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("GET /api/favorites HTTP/1.1"));
        assert!(request.contains("authorization: Bearer tok-123"));
        assert!(favorites.is_empty());
    }

    #[tokio::test]
    async fn add_favorite_posts_product_id() {
        let (base, server) = one_shot_server("201 Created", "{}").await;
        let client = client_for(&base, 2000);

        client.add_favorite("p-7", "tok-123").await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("POST /api/favorites HTTP/1.1"));
        assert!(request.contains("authorization: Bearer tok-123"));
        assert!(request.contains(r#"{"productId":"p-7"}"#));
    }

    #[tokio::test]
    async fn add_favorite_conflict_counts_as_success() {
        let (base, _server) = one_shot_server("409 Conflict", "{}").await;
        let client = client_for(&base, 2000);

        client.add_favorite("p-7", "tok-123").await.unwrap();
    }

    #[tokio::test]
    async fn remove_favorite_missing_counts_as_removed() {
        let (base, server) = one_shot_server("404 Not Found", "{}").await;
        let client = client_for(&base, 2000);

        client.remove_favorite("p-7", "tok-123").await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("DELETE /api/favorites/p-7 HTTP/1.1"));
    }

    #[tokio::test]
    async fn server_error_surfaces_status_and_body() {
        let (base, _server) = one_shot_server("500 Internal Server Error", "boom").await;
        let client = client_for(&base, 2000);

        let err = client.clear_favorites("tok-123").await.unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn oversized_error_body_is_capped() {
        let big_body: &'static str = "x".repeat(4096).leak();
        let (base, _server) = one_shot_server("500 Internal Server Error", big_body).await;
        let client = client_for(&base, 2000);

        let err = client.clear_favorites("tok-123").await.unwrap_err();
        match err {
            ApiError::Status { message, .. } => assert_eq!(message.len(), 512),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unresponsive_server_times_out_as_network_failure() {
        // Accepts the connection and then never answers.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(socket);
        });

        let client = client_for(&format!("http://{addr}"), 100);
        let err = client.fetch_products().await.unwrap_err();

        match err {
            ApiError::Http(e) => assert!(e.is_timeout()),
            other => panic!("unexpected error: {other:?}"),
        }
        server.abort();
    }
}
