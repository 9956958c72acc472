//! Fan-in side of the pipeline: drains and consumes every response

use crate::error::{BenchError, Result};
use crate::pool::ResponseOutcome;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Totals for one drained batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainSummary {
    pub responses: usize,
    pub bytes_read: u64,
}

/// Consumes responses until a whole batch is accounted for
#[derive(Debug, Clone, Default)]
pub struct ResponseCollector {
    log_bodies: bool,
}

impl ResponseCollector {
    pub fn new(log_bodies: bool) -> Self {
        Self { log_bodies }
    }

    /// Receive exactly `expected` responses, reading every body to the end
    ///
    /// Status codes are not judged. The first forwarded error is returned as
    /// is; a sink that closes early yields [`BenchError::MissingResponses`].
    pub async fn drain(
        &self,
        responses: &mut mpsc::Receiver<ResponseOutcome>,
        expected: usize,
    ) -> Result<DrainSummary> {
        let mut summary = DrainSummary::default();

        while summary.responses < expected {
            let outcome = match responses.recv().await {
                Some(outcome) => outcome,
                None => {
                    return Err(BenchError::MissingResponses {
                        expected,
                        received: summary.responses,
                    })
                }
            };

            let response = outcome?;
            let status = response.status();
            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-")
                .to_string();
            let body = response.read_all().await?;

            trace!(
                "Response {}: {} {} ({} bytes)",
                summary.responses,
                status,
                content_type,
                body.len()
            );
            if self.log_bodies {
                debug!("{}", String::from_utf8_lossy(&body));
            }

            summary.responses += 1;
            summary.bytes_read += body.len() as u64;
        }

        Ok(summary)
    }
}
