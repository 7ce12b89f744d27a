//! Per-item results of pushing products to Shopify.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::id::ProductId;
use crate::de::value_text;

/// Outcome for one product of a bulk create request.
///
/// The bulk endpoint reports successes as `{product_id, shopify_product_id}`
/// and failures with `status: "error"` and a message under `error`,
/// `message` or `errors`. Failed items name the product under either
/// `product_id` or `pc_service_product_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionResult {
    Created {
        product_id: ProductId,
        shopify_product_id: String,
    },
    Failed {
        product_id: Option<ProductId>,
        message: String,
    },
}

impl SubmissionResult {
    /// Generic text used when a failed item carries no message.
    pub const UNKNOWN_ERROR: &'static str = "Unknown error";

    /// Interpret one entry of the `results` array.
    ///
    /// Returns `None` when the entry is not an object.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        let product_id = ["product_id", "pc_service_product_id"]
            .iter()
            .filter_map(|key| object.get(*key))
            .find_map(|v| ProductId::deserialize(v).ok());
        let is_error = object.get("status").and_then(Value::as_str) == Some("error");
        let shopify_id = object.get("shopify_product_id").and_then(value_text);

        match (is_error, product_id, shopify_id) {
            (false, Some(product_id), Some(shopify_product_id)) => Some(Self::Created {
                product_id,
                shopify_product_id,
            }),
            (_, product_id, _) => Some(Self::Failed {
                product_id,
                message: error_message(value).unwrap_or_else(|| Self::UNKNOWN_ERROR.to_string()),
            }),
        }
    }

    /// The product this result refers to, if the backend named it.
    #[must_use]
    pub const fn product_id(&self) -> Option<&ProductId> {
        match self {
            Self::Created { product_id, .. } => Some(product_id),
            Self::Failed { product_id, .. } => product_id.as_ref(),
        }
    }

    #[must_use]
    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

impl<'de> Deserialize<'de> for SubmissionResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value)
            .ok_or_else(|| serde::de::Error::custom("submission result must be an object"))
    }
}

/// Extract a human-readable error from a backend error body.
///
/// Looks at `error`, then `message`, then `errors`. Structured `errors`
/// values (Shopify returns objects keyed by field) are rendered as JSON.
#[must_use]
pub fn error_message(body: &Value) -> Option<String> {
    ["error", "message", "errors"]
        .iter()
        .filter_map(|key| body.get(*key))
        .find_map(|value| match value {
            Value::Null => None,
            Value::Object(_) | Value::Array(_) => Some(value.to_string()),
            scalar => value_text(scalar),
        })
}
