//! Display models for report rows and the row detail modal.

use catalog_sync_core::ReportRow;

use crate::detail::sanitize;

/// One line of the report table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRowView {
    pub id: Option<String>,
    pub preview: Option<String>,
    pub brand: String,
    pub category: String,
    pub title: String,
    pub description: String,
    pub stock: String,
    pub changes: String,
    pub out_of_stock: bool,
}

impl From<&ReportRow> for ReportRowView {
    fn from(row: &ReportRow) -> Self {
        Self {
            id: row.id.clone(),
            preview: row.preview_image(),
            brand: cell(row.brand.as_deref(), "-"),
            category: cell(row.category.as_deref(), "-"),
            title: cell(row.title.as_deref(), "-"),
            description: cell(row.description.as_deref(), "-"),
            stock: cell(row.stock.as_deref(), "0"),
            changes: cell(row.changes.as_deref(), "-"),
            out_of_stock: row.is_out_of_stock(),
        }
    }
}

/// The row detail modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDetailView {
    pub title: String,
    pub brand: String,
    pub description: String,
    pub category: String,
    pub stock: String,
    pub out_of_stock: bool,
    pub currency: String,
    pub price: String,
    pub changes: String,
    /// Sanitized HTML.
    pub body_html: String,
    pub gallery: Vec<String>,
}

impl From<&ReportRow> for ReportDetailView {
    fn from(row: &ReportRow) -> Self {
        Self {
            title: cell(row.title.as_deref(), "Untitled"),
            brand: cell(row.brand.as_deref(), "No brand"),
            description: cell(row.description.as_deref(), "Not available"),
            category: cell(row.category.as_deref(), "N/A"),
            stock: cell(row.stock.as_deref(), "0"),
            out_of_stock: row.is_out_of_stock(),
            currency: cell(row.currency.as_deref(), "N/A"),
            price: cell(row.price.as_deref(), "0"),
            changes: cell(row.changes.as_deref(), "0"),
            body_html: sanitize(row.body.as_deref().unwrap_or_default()),
            gallery: row.image_urls(),
        }
    }
}

fn cell(value: Option<&str>, fallback: &str) -> String {
    value.unwrap_or(fallback).to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_row_view_fallbacks() {
        let row: ReportRow = serde_json::from_value(json!({"ID": 4})).unwrap();
        let view = ReportRowView::from(&row);

        assert_eq!(view.id.as_deref(), Some("4"));
        assert_eq!(view.brand, "-");
        assert_eq!(view.stock, "0");
        assert!(view.preview.is_none());
    }

    #[test]
    fn test_detail_highlights_zero_stock() {
        let row: ReportRow = serde_json::from_value(json!({
            "ID": 9,
            "Title": "Auricular",
            "Stock": 0,
            "Body": "<b>Nuevo</b><img src=x onerror=alert(1)>",
            "Image_URLs": "'https://img/a_ICO.jpg', \"https://img/b.jpg\""
        }))
        .unwrap();

        let view = ReportDetailView::from(&row);

        assert!(view.out_of_stock);
        assert_eq!(view.stock, "0");
        assert!(!view.body_html.contains("onerror"));
        assert_eq!(view.gallery, vec!["https://img/a_ICO.jpg", "https://img/b.jpg"]);
    }
}
