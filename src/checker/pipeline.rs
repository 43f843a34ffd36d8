// src/checker/pipeline.rs
// =============================================================================
// The concurrent verification pipeline.
//
// How it works:
// 1. Deduplicate the incoming URLs
// 2. Spawn one tokio task per URL, at most `workers` in flight at a time
// 3. Fold each outcome into the summary as soon as its task finishes
// 4. Once every task is done, produce the RunSummary
//
// Only this function's loop touches the counters and the broken list, so
// the tasks themselves share no mutable state.
// =============================================================================

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::debug;

use super::http::{Outcome, Verify};

/// What the run means for the caller (and the process exit code)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    AllHealthy,
    SomeBroken,
    /// The run was aborted before any link could be checked
    Fatal,
}

impl Disposition {
    pub fn exit_code(self) -> i32 {
        match self {
            Disposition::AllHealthy => 0,
            Disposition::SomeBroken => 2,
            Disposition::Fatal => 1,
        }
    }
}

/// Aggregated result of one verification run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Number of distinct URLs checked
    pub total: usize,
    pub healthy: usize,
    /// (url, reason) in completion order
    pub broken: Vec<(String, String)>,
    pub disposition: Disposition,
}

/// Lifecycle of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Dispatching,
    Collecting,
    Summarized,
}

pub struct VerificationPipeline {
    verifier: Arc<dyn Verify>,
    workers: usize,
    state: PipelineState,
}

impl VerificationPipeline {
    // `workers` below 1 is bumped to 1 - a pool of zero would never finish
    pub fn new(verifier: Arc<dyn Verify>, workers: usize) -> Self {
        Self {
            verifier,
            workers: workers.max(1),
            state: PipelineState::Idle,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn transition(&mut self, next: PipelineState) {
        debug!(from = ?self.state, to = ?next, "pipeline state");
        self.state = next;
    }

    // Verifies every distinct URL exactly once and summarizes the results
    //
    // `on_complete` is called once per URL in completion order (useful for
    // progress output). Completion order is not submission order.
    pub async fn run<I, F>(&mut self, urls: I, mut on_complete: F) -> RunSummary
    where
        I: IntoIterator<Item = String>,
        F: FnMut(&str, &Outcome),
    {
        let urls: BTreeSet<String> = urls.into_iter().collect();
        let total = urls.len();

        self.transition(PipelineState::Dispatching);
        debug!(total, workers = self.workers, "dispatching verification tasks");

        // Each URL becomes its own tokio task so checks run in parallel on
        // the runtime's worker threads, not just interleaved on this one
        let verifier = Arc::clone(&self.verifier);
        let tasks = urls.into_iter().map(move |url| {
            let verifier = Arc::clone(&verifier);
            let task_url = url.clone();
            let handle = tokio::spawn(async move { verifier.verify(&task_url).await });
            async move {
                let outcome = match handle.await {
                    Ok(outcome) => outcome,
                    // A panicking check still has to produce a verdict
                    Err(e) => Outcome::BrokenTransport(format!("verification task failed: {}", e)),
                };
                (url, outcome)
            }
        });

        // .buffer_unordered(N): at most N checks in flight, results come
        // back as they finish
        let mut completions = stream::iter(tasks).buffer_unordered(self.workers);

        let mut healthy = 0;
        let mut broken = Vec::new();

        // Tasks are only spawned once the stream is polled, so we stay in
        // Dispatching until the first check comes back
        while let Some((url, outcome)) = completions.next().await {
            if self.state == PipelineState::Dispatching {
                self.transition(PipelineState::Collecting);
            }
            on_complete(&url, &outcome);
            if outcome.is_healthy() {
                healthy += 1;
            } else {
                broken.push((url, outcome.reason()));
            }
        }

        self.transition(PipelineState::Summarized);

        let disposition = if broken.is_empty() {
            Disposition::AllHealthy
        } else {
            Disposition::SomeBroken
        };

        RunSummary {
            total,
            healthy,
            broken,
            disposition,
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why spawn inside buffer_unordered?
//    - buffer_unordered alone polls every future on the current task, which
//      is concurrent but never parallel
//    - tokio::spawn hands each check to the runtime's thread pool, while
//      buffer_unordered still caps how many are started at once
//    - a task is only spawned when the stream pulls it, so the cap holds
//
// 2. Why is no Mutex needed for the counters?
//    - only the `while let` loop above writes them
//    - the tasks just return their Outcome
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    // Verifier that answers from a fixed table and tracks concurrency
    struct TableVerifier {
        answers: HashMap<String, Outcome>,
        calls: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl TableVerifier {
        fn new(answers: &[(&str, Outcome)]) -> Self {
            Self {
                answers: answers
                    .iter()
                    .map(|(url, outcome)| (url.to_string(), outcome.clone()))
                    .collect(),
                calls: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Verify for TableVerifier {
        async fn verify(&self, url: &str) -> Outcome {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.calls.lock().unwrap().push(url.to_string());

            tokio::time::sleep(Duration::from_millis(20)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if url.contains("panic") {
                panic!("verifier blew up");
            }
            self.answers
                .get(url)
                .cloned()
                .unwrap_or(Outcome::Healthy(200))
        }
    }

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_all_healthy() {
        let verifier = Arc::new(TableVerifier::new(&[]));
        let mut pipeline = VerificationPipeline::new(verifier, 4);
        assert_eq!(pipeline.state(), PipelineState::Idle);

        let summary = pipeline
            .run(urls(&["https://a.test/1", "https://a.test/2"]), |_, _| {})
            .await;

        assert_eq!(pipeline.state(), PipelineState::Summarized);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.healthy, 2);
        assert!(summary.broken.is_empty());
        assert_eq!(summary.disposition, Disposition::AllHealthy);
        assert_eq!(summary.disposition.exit_code(), 0);
    }

    #[tokio::test]
    async fn test_broken_links_are_collected() {
        let verifier = Arc::new(TableVerifier::new(&[
            ("https://a.test/ok", Outcome::Healthy(200)),
            ("https://a.test/missing", Outcome::BrokenStatus(404)),
            (
                "https://down.test/",
                Outcome::BrokenTransport("Connection failed: refused".to_string()),
            ),
        ]));
        let mut pipeline = VerificationPipeline::new(verifier, 2);

        let summary = pipeline
            .run(
                urls(&["https://a.test/ok", "https://a.test/missing", "https://down.test/"]),
                |_, _| {},
            )
            .await;

        assert_eq!(summary.total, 3);
        assert_eq!(summary.healthy, 1);
        assert_eq!(summary.disposition, Disposition::SomeBroken);
        assert_eq!(summary.disposition.exit_code(), 2);

        let mut broken = summary.broken.clone();
        broken.sort();
        assert_eq!(
            broken,
            vec![
                ("https://a.test/missing".to_string(), "404".to_string()),
                (
                    "https://down.test/".to_string(),
                    "Connection failed: refused".to_string()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_totals_add_up_and_each_url_checked_once() {
        let mut answers = Vec::new();
        let mut input = Vec::new();
        for i in 0..25 {
            let url = format!("https://a.test/{}", i);
            let outcome = if i % 3 == 0 {
                Outcome::BrokenStatus(500)
            } else {
                Outcome::Healthy(200)
            };
            answers.push((url.clone(), outcome));
            input.push(url.clone());
            // duplicates must not be checked twice
            input.push(url);
        }
        let table: Vec<(&str, Outcome)> = answers.iter().map(|(u, o)| (u.as_str(), o.clone())).collect();
        let verifier = Arc::new(TableVerifier::new(&table));
        let mut pipeline = VerificationPipeline::new(verifier.clone(), 5);

        let mut completed = 0;
        let summary = pipeline.run(input, |_, _| completed += 1).await;

        assert_eq!(summary.total, 25);
        assert_eq!(completed, 25);
        assert_eq!(summary.broken.len() + summary.healthy, summary.total);
        assert_eq!(summary.broken.len(), 9);

        let mut calls = verifier.calls.lock().unwrap().clone();
        calls.sort();
        calls.dedup();
        assert_eq!(calls.len(), 25);
        assert_eq!(verifier.calls.lock().unwrap().len(), 25);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_is_bounded() {
        let verifier = Arc::new(TableVerifier::new(&[]));
        let mut pipeline = VerificationPipeline::new(verifier.clone(), 3);

        let input: Vec<String> = (0..20).map(|i| format!("https://a.test/{}", i)).collect();
        let summary = pipeline.run(input, |_, _| {}).await;

        assert_eq!(summary.total, 20);
        let peak = verifier.peak.load(Ordering::SeqCst);
        assert!(peak <= 3, "peak concurrency was {}", peak);
        assert!(peak >= 2, "checks never overlapped");
    }

    #[tokio::test]
    async fn test_panicking_check_is_reported_as_broken() {
        let verifier = Arc::new(TableVerifier::new(&[]));
        let mut pipeline = VerificationPipeline::new(verifier, 2);

        let summary = pipeline
            .run(urls(&["https://a.test/fine", "https://a.test/panic"]), |_, _| {})
            .await;

        assert_eq!(summary.total, 2);
        assert_eq!(summary.healthy, 1);
        assert_eq!(summary.broken.len(), 1);
        assert_eq!(summary.broken[0].0, "https://a.test/panic");
        assert!(summary.broken[0].1.starts_with("verification task failed"));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let verifier = Arc::new(TableVerifier::new(&[]));
        let mut pipeline = VerificationPipeline::new(verifier, 0);

        let summary = pipeline.run(Vec::new(), |_, _| {}).await;
        assert_eq!(summary.total, 0);
        assert_eq!(summary.disposition, Disposition::AllHealthy);
        assert_eq!(pipeline.state(), PipelineState::Summarized);
    }

    #[tokio::test]
    async fn test_state_moves_through_lifecycle() {
        let verifier = Arc::new(TableVerifier::new(&[(
            "https://a.test/missing",
            Outcome::BrokenStatus(404),
        )]));
        let mut pipeline = VerificationPipeline::new(verifier, 2);
        assert_eq!(pipeline.state(), PipelineState::Idle);

        let first = pipeline
            .run(urls(&["https://a.test/ok", "https://a.test/missing"]), |_, _| {})
            .await;
        assert_eq!(pipeline.state(), PipelineState::Summarized);
        assert_eq!(first.disposition, Disposition::SomeBroken);

        // a second run on the same pipeline starts over from dispatch
        let second = pipeline.run(urls(&["https://a.test/ok"]), |_, _| {}).await;
        assert_eq!(pipeline.state(), PipelineState::Summarized);
        assert_eq!(second.total, 1);
        assert_eq!(second.disposition, Disposition::AllHealthy);
    }

    #[test]
    fn test_fatal_exit_code() {
        assert_eq!(Disposition::Fatal.exit_code(), 1);
    }
}
