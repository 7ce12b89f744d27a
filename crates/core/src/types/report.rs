//! Daily changed-products report.
//!
//! The report service serves one CSV per day converted to JSON records,
//! with empty cells as `""`.

use core::fmt;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::de::opt_text;

/// One row of the daily report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "ID", default, deserialize_with = "opt_text")]
    pub id: Option<String>,
    #[serde(rename = "Brand", default, deserialize_with = "opt_text")]
    pub brand: Option<String>,
    #[serde(rename = "Category", default, deserialize_with = "opt_text")]
    pub category: Option<String>,
    #[serde(rename = "Title", default, deserialize_with = "opt_text")]
    pub title: Option<String>,
    #[serde(rename = "Description", default, deserialize_with = "opt_text")]
    pub description: Option<String>,
    #[serde(rename = "Stock", default, deserialize_with = "opt_text")]
    pub stock: Option<String>,
    #[serde(rename = "Changes", default, deserialize_with = "opt_text")]
    pub changes: Option<String>,
    #[serde(rename = "Image_URLs", default, deserialize_with = "opt_text")]
    pub image_urls: Option<String>,
    #[serde(rename = "Body", default, deserialize_with = "opt_text")]
    pub body: Option<String>,
    #[serde(rename = "Currency", default, deserialize_with = "opt_text")]
    pub currency: Option<String>,
    #[serde(rename = "Price", default, deserialize_with = "opt_text")]
    pub price: Option<String>,
}

impl ReportRow {
    /// Image URLs from the comma-separated `Image_URLs` cell, quotes stripped.
    #[must_use]
    pub fn image_urls(&self) -> Vec<String> {
        self.image_urls
            .as_deref()
            .map(|cell| {
                cell.split(',')
                    .map(|url| url.trim().replace(['\'', '"'], ""))
                    .filter(|url| !url.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First icon-sized image (`ICO` in the URL), else the first image.
    #[must_use]
    pub fn preview_image(&self) -> Option<String> {
        let urls = self.image_urls();
        urls.iter()
            .find(|url| url.contains("ICO") || url.contains("ico"))
            .or_else(|| urls.first())
            .cloned()
    }

    /// Numeric stock, when the cell holds an integer.
    #[must_use]
    pub fn stock_level(&self) -> Option<i64> {
        self.stock.as_deref().and_then(|s| s.trim().parse().ok())
    }

    #[must_use]
    pub fn is_out_of_stock(&self) -> bool {
        self.stock_level() == Some(0)
    }
}

/// Errors that can occur when parsing a [`ReportDate`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportDateError {
    #[error("date must be formatted as YYYY-MM-DD or DD_MM_YYYY: {0}")]
    Invalid(String),
}

/// The day a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReportDate(NaiveDate);

impl ReportDate {
    const INPUT_FORMAT: &'static str = "%Y-%m-%d";
    const QUERY_FORMAT: &'static str = "%d_%m_%Y";

    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Today in the server's local time zone.
    #[must_use]
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Parse a date-picker value (`YYYY-MM-DD`) or a query value (`DD_MM_YYYY`).
    ///
    /// # Errors
    ///
    /// Returns an error if the input matches neither format.
    pub fn parse(raw: &str) -> Result<Self, ReportDateError> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, Self::INPUT_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(raw, Self::QUERY_FORMAT))
            .map(Self)
            .map_err(|_| ReportDateError::Invalid(raw.to_string()))
    }

    /// Value for the report service's `date` query parameter.
    #[must_use]
    pub fn query_value(&self) -> String {
        self.0.format(Self::QUERY_FORMAT).to_string()
    }

    /// Value for an HTML `<input type="date">`.
    #[must_use]
    pub fn input_value(&self) -> String {
        self.0.format(Self::INPUT_FORMAT).to_string()
    }
}

impl fmt::Display for ReportDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::INPUT_FORMAT))
    }
}
