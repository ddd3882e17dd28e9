//! REST client for the Tempero backend
//!
//! Implements the core's collaborator traits over HTTP. Every request is
//! relative to the configured base URL, so a backend mounted under a path
//! prefix (`http://host/api`) works as well as one at the root.

use anyhow::{Context, Result};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use tempero_core::{ApiError, Product, ProductApi, Sale, SalesApi, SalesSummary};

use crate::config::Config;

const PRODUCTS: &str = "produtos";
const SALES: &str = "vendas";

pub struct RestClient {
    http: reqwest::Client,
    base: Url,
}

impl RestClient {
    pub fn new(config: &Config) -> Result<Self> {
        let base = Url::parse(&config.api_url).with_context(|| format!("Invalid backend URL: {}", config.api_url))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("Backend URL cannot have paths appended: {}", config.api_url);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, base })
    }

    /// Base URL with `segments` appended, each percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Checked in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn search_endpoint(&self, term: &str) -> Url {
        let mut url = self.endpoint(&[PRODUCTS, "pesquisar"]);
        url.query_pairs_mut().append_pair("q", term);
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "Backend request");
        self.http.request(method, url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn read<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        decode(&bytes)
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

impl ProductApi for RestClient {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.read(self.request(Method::GET, self.endpoint(&[PRODUCTS]))).await
    }

    async fn find_product(&self, id: i64) -> Result<Product, ApiError> {
        let url = self.endpoint(&[PRODUCTS, &id.to_string()]);
        self.read(self.request(Method::GET, url)).await
    }

    async fn products_by_category(&self, category: &str) -> Result<Vec<Product>, ApiError> {
        let url = self.endpoint(&[PRODUCTS, "categoria", category]);
        self.read(self.request(Method::GET, url)).await
    }

    async fn search_products(&self, term: &str) -> Result<Vec<Product>, ApiError> {
        self.read(self.request(Method::GET, self.search_endpoint(term))).await
    }

    async fn create_product(&self, product: &Product) -> Result<Product, ApiError> {
        let request = self.request(Method::POST, self.endpoint(&[PRODUCTS])).json(product);
        self.read(request).await
    }

    async fn update_product(&self, id: i64, product: &Product) -> Result<Product, ApiError> {
        let url = self.endpoint(&[PRODUCTS, &id.to_string()]);
        self.read(self.request(Method::PUT, url).json(product)).await
    }

    async fn delete_product(&self, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&[PRODUCTS, &id.to_string()]);
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}

impl SalesApi for RestClient {
    async fn list_sales(&self) -> Result<Vec<Sale>, ApiError> {
        self.read(self.request(Method::GET, self.endpoint(&[SALES]))).await
    }

    async fn create_sale(&self, sale: &Sale) -> Result<Sale, ApiError> {
        let request = self.request(Method::POST, self.endpoint(&[SALES])).json(sale);
        self.read(request).await
    }

    async fn update_sale(&self, id: i64, sale: &Sale) -> Result<Sale, ApiError> {
        let url = self.endpoint(&[SALES, &id.to_string()]);
        self.read(self.request(Method::PUT, url).json(sale)).await
    }

    async fn delete_sale(&self, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&[SALES, &id.to_string()]);
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    async fn sales_summary(&self) -> Result<SalesSummary, ApiError> {
        self.read(self.request(Method::GET, self.endpoint(&[SALES, "resumo"]))).await
    }
}
