//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// `1 product selected`, `3 products selected`.
///
/// Usage in templates: `{{ bulk.selected|selected_label }}`
#[askama::filter_fn]
pub fn selected_label(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(counted(&value.to_string(), "product", "products", " selected"))
}

/// `1 second`, `12 seconds`.
///
/// Usage in templates: `{{ batch.elapsed_secs|seconds }}`
#[askama::filter_fn]
pub fn seconds(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(counted(&value.to_string(), "second", "seconds", ""))
}

/// Percent-encode a value for use as one URL path segment.
///
/// Usage in templates: `/catalog/products/{{ row.id|url_segment }}`
#[askama::filter_fn]
pub fn url_segment(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(encode_segment(&value.to_string()))
}

fn encode_segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

fn counted(count: &str, one: &str, many: &str, suffix: &str) -> String {
    let noun = if count == "1" { one } else { many };
    format!("{count} {noun}{suffix}")
}
