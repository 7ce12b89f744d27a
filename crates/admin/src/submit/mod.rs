//! Pushing products to Shopify through the catalog backend.
//!
//! Two paths exist: one product from the detail view ([`BatchSubmitter::submit_one`])
//! and the checked products of a table ([`BatchSubmitter::submit_many`]).
//! A bulk request runs in the background while an [`ElapsedTimer`] counts
//! the seconds; the navigator keeps the [`BatchProgress`] that the progress
//! view polls.

mod timer;

pub use timer::ElapsedTimer;

use catalog_sync_core::{ProductDetail, ProductId, SubmissionResult};
use tokio::sync::watch;
use tracing::{error, info, instrument};

use crate::api::{ApiError, BackendClient};
use crate::catalog::Ticket;

/// Shown when a single create fails without a backend message.
pub const SINGLE_FAILURE_MESSAGE: &str = "The product could not be created on Shopify.";

/// Shown when a bulk create fails without a backend message.
pub const BATCH_FAILURE_MESSAGE: &str = "The products could not be sent to Shopify.";

/// Result of creating one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SingleOutcome {
    Sent,
    Failed(String),
}

/// Result of a bulk create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The backend answered with per-item results.
    Completed {
        results: Vec<SubmissionResult>,
        elapsed_secs: u64,
    },
    /// The request as a whole failed.
    Failed { message: String, elapsed_secs: u64 },
}

/// One line of a bulk result summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub text: String,
    pub created: bool,
}

impl BatchOutcome {
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    #[must_use]
    pub const fn elapsed_secs(&self) -> u64 {
        match self {
            Self::Completed { elapsed_secs, .. } | Self::Failed { elapsed_secs, .. } => {
                *elapsed_secs
            }
        }
    }

    /// Per-item lines for a completed request, empty otherwise.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<SummaryLine> {
        let Self::Completed { results, .. } = self else {
            return Vec::new();
        };

        results
            .iter()
            .map(|result| match result {
                SubmissionResult::Created {
                    product_id,
                    shopify_product_id,
                } => SummaryLine {
                    text: format!("Product {product_id} - Shopify product {shopify_product_id}"),
                    created: true,
                },
                SubmissionResult::Failed {
                    product_id,
                    message,
                } => SummaryLine {
                    text: match product_id {
                        Some(id) => format!("Product {id} failed: {message}"),
                        None => format!("Product failed: {message}"),
                    },
                    created: false,
                },
            })
            .collect()
    }
}

/// A bulk submission started from a product table.
#[derive(Debug)]
pub struct BatchProgress {
    table: Ticket,
    product_ids: Vec<ProductId>,
    elapsed: watch::Receiver<u64>,
    outcome: Option<BatchOutcome>,
}

impl BatchProgress {
    #[must_use]
    pub const fn new(table: Ticket, product_ids: Vec<ProductId>, elapsed: watch::Receiver<u64>) -> Self {
        Self {
            table,
            product_ids,
            elapsed,
            outcome: None,
        }
    }

    /// Ticket of the product table the selection was taken from.
    #[must_use]
    pub const fn table(&self) -> Ticket {
        self.table
    }

    #[must_use]
    pub fn product_ids(&self) -> &[ProductId] {
        &self.product_ids
    }

    /// Seconds counted so far, or the final count once finished.
    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        self.outcome
            .as_ref()
            .map_or_else(|| *self.elapsed.borrow(), BatchOutcome::elapsed_secs)
    }

    #[must_use]
    pub const fn outcome(&self) -> Option<&BatchOutcome> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.outcome.is_none()
    }

    pub(crate) fn finish(&mut self, outcome: BatchOutcome) {
        self.outcome = Some(outcome);
    }
}

/// Sends products to the backend's Shopify create endpoints.
#[derive(Debug, Clone)]
pub struct BatchSubmitter {
    client: BackendClient,
}

impl BatchSubmitter {
    #[must_use]
    pub const fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Create one product from its full record.
    #[instrument(skip_all, fields(product = %detail.id()))]
    pub async fn submit_one(&self, detail: &ProductDetail) -> SingleOutcome {
        match self.client.create_product(detail).await {
            Ok(()) => {
                info!("Product sent to Shopify");
                SingleOutcome::Sent
            }
            Err(e) => {
                error!(error = %e, "Failed to send product to Shopify");
                SingleOutcome::Failed(failure_message(&e, SINGLE_FAILURE_MESSAGE))
            }
        }
    }

    /// Create several products in one request.
    ///
    /// `timer` must already be running; it is dropped as soon as the
    /// request resolves, so it never outlives the request.
    #[instrument(skip_all, fields(count = ids.len()))]
    pub async fn submit_many(&self, ids: &[ProductId], timer: ElapsedTimer) -> BatchOutcome {
        let response = self.client.create_products(ids).await;
        let elapsed_secs = timer.elapsed_secs();
        drop(timer);

        match response {
            Ok(validated) => {
                let created = validated.entries.iter().filter(|r| r.is_created()).count();
                info!(
                    created,
                    failed = validated.entries.len() - created,
                    elapsed_secs,
                    "Bulk submission finished"
                );
                BatchOutcome::Completed {
                    results: validated.entries,
                    elapsed_secs,
                }
            }
            Err(e) => {
                error!(error = %e, elapsed_secs, "Bulk submission failed");
                BatchOutcome::Failed {
                    message: failure_message(&e, BATCH_FAILURE_MESSAGE),
                    elapsed_secs,
                }
            }
        }
    }
}

fn failure_message(error: &ApiError, fallback: &str) -> String {
    error.server_message().unwrap_or(fallback).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> ProductId {
        ProductId::parse(raw).unwrap()
    }

    #[test]
    fn test_summary_lines() {
        let outcome = BatchOutcome::Completed {
            results: vec![
                SubmissionResult::Created {
                    product_id: id("783"),
                    shopify_product_id: "gid-1".to_string(),
                },
                SubmissionResult::Failed {
                    product_id: Some(id("784")),
                    message: "missing price".to_string(),
                },
                SubmissionResult::Failed {
                    product_id: None,
                    message: SubmissionResult::UNKNOWN_ERROR.to_string(),
                },
            ],
            elapsed_secs: 4,
        };

        let lines = outcome.summary_lines();

        assert_eq!(lines[0].text, "Product 783 - Shopify product gid-1");
        assert!(lines[0].created);
        assert_eq!(lines[1].text, "Product 784 failed: missing price");
        assert!(!lines[1].created);
        assert_eq!(lines[2].text, "Product failed: Unknown error");
    }

    #[test]
    fn test_failed_outcome_has_no_lines() {
        let outcome = BatchOutcome::Failed {
            message: BATCH_FAILURE_MESSAGE.to_string(),
            elapsed_secs: 1,
        };
        assert!(outcome.summary_lines().is_empty());
        assert!(!outcome.is_completed());
    }

    #[test]
    fn test_failure_message_prefers_backend_text() {
        let rejected = ApiError::Rejected {
            status: 400,
            message: Some("Producto sin precio".to_string()),
        };
        assert_eq!(
            failure_message(&rejected, SINGLE_FAILURE_MESSAGE),
            "Producto sin precio"
        );

        let transport = ApiError::Transport("connection refused".to_string());
        assert_eq!(
            failure_message(&transport, BATCH_FAILURE_MESSAGE),
            BATCH_FAILURE_MESSAGE
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_failure_stops_timer() {
        let client =
            BackendClient::new("http://127.0.0.1:9", std::time::Duration::from_secs(1)).unwrap();
        let submitter = BatchSubmitter::new(client);
        let timer = ElapsedTimer::start();
        let progress = timer.subscribe();

        let outcome = submitter.submit_many(&[id("1")], timer).await;
        let stopped_at = *progress.borrow();
        tokio::time::sleep(std::time::Duration::from_secs(5)).await;

        assert!(matches!(outcome, BatchOutcome::Failed { ref message, .. } if message == BATCH_FAILURE_MESSAGE));
        assert_eq!(*progress.borrow(), stopped_at);
    }
}
