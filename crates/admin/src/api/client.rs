//! HTTP client for the catalog backend services.

use std::time::Duration;

use catalog_sync_core::validate::{self, Validated};
use catalog_sync_core::{
    Category, CategoryId, ProductDetail, ProductId, ProductSummary, ReportDate, ReportRow,
    Subcategory, SubcategoryId, SubmissionResult, error_message,
};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

use super::error::ApiError;

/// Client for one backend service.
///
/// The catalog, report and login services are configured separately and
/// each gets its own `BackendClient`.
#[derive(Clone)]
pub struct BackendClient {
    /// HTTP client.
    client: Client,
    /// Base URL without trailing slash.
    base_url: String,
    /// Timeout for `create_products`, replacing the client-wide one.
    bulk_timeout: Duration,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url)
            .field("bulk_timeout", &self.bulk_timeout)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct ProductIdsBody<'a> {
    product_ids: &'a [ProductId],
}

impl BackendClient {
    /// Create a client for the service at `base_url`.
    ///
    /// `timeout` applies to every call, including `create_products` until
    /// [`with_bulk_timeout`](Self::with_bulk_timeout) says otherwise.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            bulk_timeout: timeout,
        })
    }

    /// Use `timeout` for `create_products`.
    ///
    /// The backend creates the products one after another, so a batch can
    /// run well past the ordinary request timeout.
    #[must_use]
    pub fn with_bulk_timeout(mut self, timeout: Duration) -> Self {
        self.bulk_timeout = timeout;
        self
    }

    /// Get the service base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List root categories.
    ///
    /// `GET /api/categories/`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a list.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Validated<Category>, ApiError> {
        let body = self.get_json("/api/categories/").await?;
        let validated = validate::categories(&body)?;
        warn_skipped("category", &validated);
        Ok(validated)
    }

    /// List the subcategories of a category.
    ///
    /// `GET /api/categories/{category}`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body has no `childs` array.
    #[instrument(skip_all, fields(category = %category))]
    pub async fn subcategories(
        &self,
        category: &CategoryId,
    ) -> Result<Validated<Subcategory>, ApiError> {
        let path = format!("/api/categories/{}", segment(category.as_str()));
        let body = self.get_json(&path).await?;
        let validated = validate::subcategories(&body)?;
        warn_skipped("subcategory", &validated);
        Ok(validated)
    }

    /// List the products of a subcategory.
    ///
    /// `GET /api/categories/{category}/{subcategory}`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not
    /// `{childs: [{products: [...]}]}`.
    #[instrument(skip_all, fields(category = %category, subcategory = %subcategory))]
    pub async fn products(
        &self,
        category: &CategoryId,
        subcategory: &SubcategoryId,
    ) -> Result<Validated<ProductSummary>, ApiError> {
        let path = format!(
            "/api/categories/{}/{}",
            segment(category.as_str()),
            segment(subcategory.as_str())
        );
        let body = self.get_json(&path).await?;
        let validated = validate::products(&body)?;
        warn_skipped("product", &validated);
        Ok(validated)
    }

    /// Fetch one product's full record.
    ///
    /// `GET /api/product/{id}`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a product.
    #[instrument(skip_all, fields(product = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<ProductDetail, ApiError> {
        let path = format!("/api/product/{}", segment(id.as_str()));
        let body = self.get_json(&path).await?;
        Ok(validate::product_detail(body)?)
    }

    /// Fetch full records for several products in one request.
    ///
    /// `POST /api/products`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body has no `results` array.
    #[instrument(skip_all, fields(count = ids.len()))]
    pub async fn product_details(
        &self,
        ids: &[ProductId],
    ) -> Result<Validated<ProductDetail>, ApiError> {
        let body = self
            .post_json("/api/products", &ProductIdsBody { product_ids: ids })
            .await?;
        let validated = validate::product_details(&body)?;
        warn_skipped("product detail", &validated);
        Ok(validated)
    }

    /// Create one product on Shopify from its full record.
    ///
    /// `POST /api/shopify/create_product`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip_all, fields(product = %detail.id()))]
    pub async fn create_product(&self, detail: &ProductDetail) -> Result<(), ApiError> {
        self.post_json("/api/shopify/create_product", detail).await?;
        debug!("Product created on Shopify");
        Ok(())
    }

    /// Create several products on Shopify.
    ///
    /// `POST /api/shopify/create_products`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the backend rejects it, or the
    /// body has no `results` array.
    #[instrument(skip_all, fields(count = ids.len()))]
    pub async fn create_products(
        &self,
        ids: &[ProductId],
    ) -> Result<Validated<SubmissionResult>, ApiError> {
        let body = self
            .post_json_within(
                "/api/shopify/create_products",
                &ProductIdsBody { product_ids: ids },
                self.bulk_timeout,
            )
            .await?;
        let validated = validate::submission_results(&body)?;
        warn_skipped("submission result", &validated);
        Ok(validated)
    }

    /// Check operator credentials.
    ///
    /// `POST /api/login`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` carrying the backend `message` when the
    /// credentials are refused.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), ApiError> {
        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });
        self.post_json("/api/login", &body).await?;
        Ok(())
    }

    /// Fetch the changed-products report for one day.
    ///
    /// `GET /api/data?date=DD_MM_YYYY`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a list.
    #[instrument(skip_all, fields(date = %date))]
    pub async fn daily_report(&self, date: ReportDate) -> Result<Vec<ReportRow>, ApiError> {
        let path = format!("/api/data?date={}", date.query_value());
        let body = self.get_json(&path).await?;
        let list = body
            .as_array()
            .ok_or(catalog_sync_core::ShapeError::NotAList("report rows"))?;

        let mut rows = Vec::with_capacity(list.len());
        for raw in list {
            match serde_json::from_value::<ReportRow>(raw.clone()) {
                Ok(row) => rows.push(row),
                Err(e) => warn!(error = %e, entry = %raw, "Skipping malformed report row"),
            }
        }
        Ok(rows)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        let response = self.client.get(self.url(path)).send().await?;
        read_json(response).await
    }

    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        read_json(response).await
    }

    async fn post_json_within<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<Value, ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .timeout(timeout)
            .json(body)
            .send()
            .await?;
        read_json(response).await
    }
}

/// Decode a response body, turning non-2xx statuses into `ApiError::Rejected`.
///
/// An empty body decodes as `Value::Null`.
async fn read_json(response: Response) -> Result<Value, ApiError> {
    let status = response.status();
    let text = response.text().await?;

    let body = if text.trim().is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_str::<Value>(&text).map_err(|e| ApiError::Decode(e.to_string()))
    };

    if !status.is_success() {
        let message = body.ok().as_ref().and_then(error_message);
        warn!(status = status.as_u16(), message = ?message, "Backend rejected request");
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    body
}

fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

fn warn_skipped<T>(what: &str, validated: &Validated<T>) {
    for entry in &validated.skipped {
        warn!(kind = what, entry = %entry, "Skipping entry with unexpected format");
    }
}
