//! Fixed-size worker pool draining a shared request queue

use crate::error::{BenchError, Result};
use cmpbench_http::{GeneratedRequest, HttpClient, HttpError, RawResponse};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// What a worker forwards for each request it takes
pub type ResponseOutcome = std::result::Result<RawResponse, HttpError>;

/// Spawns workers that share one HTTP client
#[derive(Clone)]
pub struct WorkerPool {
    client: Arc<dyn HttpClient>,
    size: usize,
}

impl WorkerPool {
    pub fn new(client: Arc<dyn HttpClient>, size: usize) -> Self {
        Self { client, size }
    }

    /// Start `size` workers on the current runtime
    ///
    /// Each worker takes requests until `requests` is closed and empty. The
    /// response sink closes once every worker has returned, since each holds
    /// the only remaining senders.
    pub fn spawn(
        &self,
        requests: async_channel::Receiver<GeneratedRequest>,
        responses: mpsc::Sender<ResponseOutcome>,
    ) -> RunningPool {
        let mut workers = JoinSet::new();

        for worker_id in 0..self.size {
            workers.spawn(work(
                worker_id,
                Arc::clone(&self.client),
                requests.clone(),
                responses.clone(),
            ));
        }

        debug!("Spawned {} workers", self.size);
        RunningPool { requests, workers }
    }
}

/// Handle on a spawned pool; every worker is joined before it is dropped
pub struct RunningPool {
    requests: async_channel::Receiver<GeneratedRequest>,
    workers: JoinSet<usize>,
}

impl RunningPool {
    /// Number of workers not yet joined
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Wait for every worker; returns how many requests they took in total
    pub async fn join(mut self) -> Result<usize> {
        let mut executed = 0;
        let mut failure = None;

        while let Some(joined) = self.workers.join_next().await {
            match joined {
                Ok(count) => executed += count,
                Err(e) => {
                    warn!("Worker task ended abnormally: {}", e);
                    failure.get_or_insert(BenchError::Worker(e.to_string()));
                }
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(executed),
        }
    }

    /// Stop taking requests, cancel in-flight work and join all workers
    pub async fn shutdown(mut self) {
        self.requests.close();
        self.workers.abort_all();
        while self.workers.join_next().await.is_some() {}
        debug!("Worker pool shut down");
    }
}

/// Idle → Executing → Idle until the queue is closed and drained
async fn work(
    worker_id: usize,
    client: Arc<dyn HttpClient>,
    requests: async_channel::Receiver<GeneratedRequest>,
    responses: mpsc::Sender<ResponseOutcome>,
) -> usize {
    let mut executed = 0;

    while let Ok(request) = requests.recv().await {
        let outcome = client.execute(request).await;
        let failed = outcome.is_err();
        executed += 1;

        if responses.send(outcome).await.is_err() {
            debug!("Worker {} stopping: response sink closed", worker_id);
            break;
        }

        if failed {
            debug!("Worker {} stopping after request error", worker_id);
            break;
        }
    }

    executed
}
