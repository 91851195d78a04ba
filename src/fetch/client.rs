use async_trait::async_trait;
use reqwest::{Request, Response};

/// Transport for artifacts published over HTTP(S).
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
