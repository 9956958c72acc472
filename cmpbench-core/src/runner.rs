//! Benchmark coordinator: times one batch per target and builds the report

use crate::collector::ResponseCollector;
use crate::error::Result;
use crate::generator::RequestGenerator;
use crate::identity::IdentitySource;
use crate::pool::WorkerPool;
use crate::report::{build_report, Report, RunResult};
use crate::target::{Target, TargetRegistry};
use cmpbench_config::BenchmarkConfig;
use cmpbench_http::HttpClient;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Batch and pool parameters for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub requests_per_target: usize,
    pub workers: usize,
    pub seed: Option<u64>,
    pub log_bodies: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        (&BenchmarkConfig::default()).into()
    }
}

impl From<&BenchmarkConfig> for RunSettings {
    fn from(config: &BenchmarkConfig) -> Self {
        Self {
            requests_per_target: config.requests_per_target,
            workers: config.workers,
            seed: config.seed,
            log_bodies: config.log_bodies,
        }
    }
}

/// Runs targets one after another; only this coordinator appends results
pub struct BenchmarkRunner {
    client: Arc<dyn HttpClient>,
    settings: RunSettings,
    collector: ResponseCollector,
    rng: StdRng,
}

impl BenchmarkRunner {
    pub fn new(client: Arc<dyn HttpClient>, settings: RunSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            collector: ResponseCollector::new(settings.log_bodies),
            client,
            settings,
            rng,
        }
    }

    /// Time one batch of `count` requests against `target` on `pool_size` workers
    ///
    /// The clock covers generation, execution, draining and joining the pool.
    pub async fn run_target(
        &mut self,
        generator: &RequestGenerator,
        target: &Target,
        count: usize,
        pool_size: usize,
    ) -> Result<RunResult> {
        let start = Instant::now();

        let batch = generator.build_batch(target, count, &mut self.rng)?;
        debug!("Generated {} requests for {}", batch.len(), target);

        let (request_tx, request_rx) = async_channel::bounded(count.max(1));
        let (response_tx, mut response_rx) = mpsc::channel(pool_size.max(1));

        let pool = WorkerPool::new(Arc::clone(&self.client), pool_size).spawn(request_rx, response_tx);

        for request in batch {
            // Capacity covers the whole batch, so this never waits on workers
            if request_tx.send(request).await.is_err() {
                warn!("Request queue closed before the batch was queued");
                break;
            }
        }
        request_tx.close();

        let summary = match self.collector.drain(&mut response_rx, count).await {
            Ok(summary) => summary,
            Err(e) => {
                pool.shutdown().await;
                return Err(e);
            }
        };

        let executed = pool.join().await?;
        let elapsed = start.elapsed();

        debug!(
            "{}: {} requests executed, {} bytes read in {:?}",
            target.name(),
            executed,
            summary.bytes_read,
            elapsed
        );

        Ok(RunResult::new(target.name(), elapsed.as_secs_f64())
            .with_traffic(summary.responses, summary.bytes_read))
    }

    /// Fetch identities once, then benchmark every target in registry order
    ///
    /// The first failing target aborts the run.
    pub async fn run_all(
        &mut self,
        registry: &TargetRegistry,
        identities: &IdentitySource,
    ) -> Result<Report> {
        let generator = RequestGenerator::new(identities.fetch_identities().await?);
        let count = self.settings.requests_per_target;
        let workers = self.settings.workers;

        let mut results = Vec::with_capacity(registry.len());
        for target in registry.iter() {
            info!("working on {}", target.name());

            let result = self
                .run_target(&generator, target, count, workers)
                .await
                .map_err(|e| e.for_target(target.name()))?;

            info!(
                "{} finished {} requests in {:.3}s",
                result.name, result.requests, result.elapsed_time
            );
            results.push(result);
        }

        Ok(build_report(results))
    }
}
