//! Display model of a product's full record.

use catalog_sync_core::ProductDetail;

pub const IN_STOCK: &str = "In stock";
pub const OUT_OF_STOCK: &str = "Out of stock";
pub const NOT_SPECIFIED: &str = "Not specified";
pub const NOT_AVAILABLE: &str = "Not available";

/// What the detail modal shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub id: String,
    pub title: String,
    pub in_stock: bool,
    pub availability: &'static str,
    pub brand: String,
    pub currency: String,
    pub price: String,
    pub sku: String,
    pub barcode: String,
    /// Sanitized HTML.
    pub body_html: String,
    pub gallery: Vec<String>,
}

impl From<&ProductDetail> for DetailView {
    fn from(detail: &ProductDetail) -> Self {
        let extra = detail.extra();
        Self {
            id: detail.id().to_string(),
            title: detail.title().to_string(),
            in_stock: detail.in_stock(),
            availability: if detail.in_stock() {
                IN_STOCK
            } else {
                OUT_OF_STOCK
            },
            brand: or_fallback(extra.brand.as_deref(), NOT_SPECIFIED),
            currency: or_fallback(extra.currency.as_deref(), NOT_SPECIFIED),
            price: extra
                .pvp_ecommerce
                .map_or_else(|| NOT_AVAILABLE.to_string(), |price| price.to_string()),
            sku: or_fallback(detail.sku(), NOT_AVAILABLE),
            barcode: or_fallback(extra.barcode.as_deref(), NOT_AVAILABLE),
            body_html: sanitize(detail.body().unwrap_or_default()),
            gallery: detail
                .gallery_urls()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Strip scripts, handlers and unknown tags from backend-supplied HTML.
#[must_use]
pub fn sanitize(html: &str) -> String {
    ammonia::clean(html)
}

fn or_fallback(value: Option<&str>, fallback: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
        .to_string()
}
