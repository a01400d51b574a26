//! Concurrent fan-out over all bars with a single completion barrier.

use super::error::VenueError;
use super::fetcher::VenueFetcher;
use crate::ontap::models::{Target, Venue, VenueSet};
use crate::ontap::PageSource;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::{self, JoinSet};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Deadline used when the configured one does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Dispatches one fetch task per target and waits for all of them.
///
/// Each task owns the venue it builds and hands it back through the join set,
/// so no venue is ever written by more than one task.
pub struct Aggregator {
    fetcher: Arc<VenueFetcher>,
    max_concurrency: usize,
    deadline: Duration,
}

impl Aggregator {
    pub fn new(fetcher: VenueFetcher, max_concurrency: usize, deadline: Duration) -> Self {
        Self { fetcher: Arc::new(fetcher), max_concurrency: max_concurrency.max(1), deadline }
    }

    /// Fetches every target and returns exactly one venue per target, in target order.
    ///
    /// Tasks still running at the deadline are aborted and their venues carry
    /// [`VenueError::DeadlineExceeded`].
    pub async fn aggregate(&self, source: Arc<dyn PageSource>, targets: &[Target]) -> VenueSet {
        info!(
            "Fetching {} bars (concurrency: {}, deadline: {:?})",
            targets.len(),
            self.max_concurrency,
            self.deadline
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut join_set = JoinSet::new();
        let mut task_slots: HashMap<task::Id, usize> = HashMap::with_capacity(targets.len());

        for (index, target) in targets.iter().cloned().enumerate() {
            let source = Arc::clone(&source);
            let fetcher = Arc::clone(&self.fetcher);
            let semaphore = Arc::clone(&semaphore);

            let handle = join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let venue = fetcher.fetch(source.as_ref(), &target).await;
                (index, venue)
            });
            task_slots.insert(handle.id(), index);
        }

        let mut slots: Vec<Option<Venue>> = vec![None; targets.len()];
        let deadline = deadline_from_now(self.deadline);

        loop {
            match tokio::time::timeout_at(deadline, join_set.join_next()).await {
                Ok(Some(Ok((index, venue)))) => {
                    debug!("Collected {} ({} of {})", venue.name, index + 1, targets.len());
                    slots[index] = Some(venue);
                }
                Ok(Some(Err(e))) => {
                    warn!("Fetch task failed: {}", e);
                    if let Some(&index) = task_slots.get(&e.id()) {
                        slots[index] =
                            Some(Venue::failed(&targets[index], VenueError::TaskFailed(e.to_string())));
                    }
                }
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        "Deadline of {:?} exceeded with {} fetches outstanding",
                        self.deadline,
                        join_set.len()
                    );
                    join_set.abort_all();
                    break;
                }
            }
        }

        // Only fetches cut off by the deadline are left without a venue
        let venues: Vec<Venue> = slots
            .into_iter()
            .zip(targets)
            .map(|(slot, target)| {
                slot.unwrap_or_else(|| Venue::failed(target, VenueError::DeadlineExceeded))
            })
            .collect();

        let set = VenueSet::new(venues);
        info!("Collected {} bars ({} errors)", set.len(), set.error_count());
        set
    }
}

/// `now + deadline`, saturating to a far-future instant instead of overflowing.
fn deadline_from_now(deadline: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(deadline).unwrap_or_else(|| now + FAR_FUTURE)
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(VenueFetcher::default(), 16, Duration::from_secs(120))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::extract::PriceExtractor;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock source where each bar's URL decides its behaviour.
    ///
    /// `/fail/*` errors, `/slow/*` sleeps, `/panic/*` panics, everything else
    /// serves one tap priced by the trailing number in the URL.
    struct MockSource {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl MockSource {
        fn new() -> Self {
            Self { in_flight: AtomicUsize::new(0), peak: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl PageSource for MockSource {
        async fn directory(&self) -> Result<String> {
            Ok(String::new())
        }

        async fn venue(&self, url: &str) -> Result<String> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if url.contains("/fail/") {
                anyhow::bail!("connection refused");
            }
            if url.contains("/slow/") {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
            if url.contains("/panic/") {
                panic!("parser exploded on {}", url);
            }

            let price = url.rsplit('/').next().unwrap_or("0");
            Ok(format!(
                r#"<div class="panel panel-default">
                    <h4 class="cml_shadow">Beer {price}</h4>
                    <div class="col-xs-7">0.5l: {price}zł</div>
                </div>"#
            ))
        }

        fn directory_url(&self) -> &str {
            "https://ontap.pl/warszawa/multitaps"
        }
    }

    fn targets(paths: &[&str]) -> Vec<Target> {
        paths
            .iter()
            .enumerate()
            .map(|(i, p)| Target::named(format!("https://ontap.pl{}", p), format!("Bar {}", i + 1)))
            .collect()
    }

    fn aggregator(concurrency: usize, deadline: Duration) -> Aggregator {
        Aggregator::new(
            VenueFetcher::new(PriceExtractor::default(), Duration::from_secs(60)),
            concurrency,
            deadline,
        )
    }

    #[tokio::test]
    async fn test_one_venue_per_target() {
        let source: Arc<dyn PageSource> = Arc::new(MockSource::new());
        let targets = targets(&["/ok/12", "/ok/18", "/ok/25", "/ok/9", "/ok/14"]);

        let set = Aggregator::default().aggregate(source, &targets).await;

        assert_eq!(set.len(), targets.len());
        let urls: HashSet<_> = set.iter().map(|v| v.url.as_str()).collect();
        let expected: HashSet<_> = targets.iter().map(|t| t.url.as_str()).collect();
        assert_eq!(urls, expected);
    }

    #[tokio::test]
    async fn test_empty_targets() {
        let source: Arc<dyn PageSource> = Arc::new(MockSource::new());
        let set = Aggregator::default().aggregate(source, &[]).await;
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let source: Arc<dyn PageSource> = Arc::new(MockSource::new());
        let targets = targets(&["/ok/12", "/fail/1", "/ok/17"]);

        let set = Aggregator::default().aggregate(source, &targets).await;
        let venues = set.venues();

        assert_eq!(venues.len(), 3);
        assert_eq!(venues[0].items[0].price, 12);
        assert!(venues[0].errors.is_empty());

        assert!(venues[1].items.is_empty());
        assert_eq!(venues[1].errors.len(), 1);
        assert!(matches!(venues[1].errors[0], VenueError::Fetch(_)));

        assert_eq!(venues[2].items[0].price, 17);
        assert!(venues[2].errors.is_empty());
    }

    #[tokio::test]
    async fn test_concurrency_bound() {
        let mock = Arc::new(MockSource::new());
        let source: Arc<dyn PageSource> = mock.clone();
        let paths: Vec<String> = (1..=12).map(|i| format!("/ok/{}", i)).collect();
        let paths: Vec<&str> = paths.iter().map(String::as_str).collect();

        let set = aggregator(3, Duration::from_secs(60)).aggregate(source, &targets(&paths)).await;

        assert_eq!(set.len(), 12);
        assert!(mock.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_deadline_marks_unfinished_venues() {
        let source: Arc<dyn PageSource> = Arc::new(MockSource::new());
        let targets = targets(&["/ok/12", "/slow/1", "/ok/20"]);

        let set = aggregator(8, Duration::from_millis(300)).aggregate(source, &targets).await;
        let venues = set.venues();

        assert_eq!(venues.len(), 3);
        assert_eq!(venues[0].items.len(), 1);
        assert_eq!(venues[1].errors, vec![VenueError::DeadlineExceeded]);
        assert_eq!(venues[1].name, "Bar 2");
        assert_eq!(venues[2].items.len(), 1);
    }

    #[tokio::test]
    async fn test_panicking_task_still_yields_venue() {
        let source: Arc<dyn PageSource> = Arc::new(MockSource::new());
        let targets = targets(&["/ok/12", "/panic/1"]);

        let set = Aggregator::default().aggregate(source, &targets).await;
        let venues = set.venues();

        assert_eq!(venues.len(), 2);
        assert_eq!(venues[0].items.len(), 1);
        assert!(matches!(venues[1].errors[0], VenueError::TaskFailed(_)));
    }

    fn task_failure(venue: &Venue) -> &str {
        match &venue.errors[..] {
            [VenueError::TaskFailed(message)] => message,
            other => panic!("expected a single task failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_each_panic_stays_with_its_venue() {
        let source: Arc<dyn PageSource> = Arc::new(MockSource::new());
        let targets = targets(&["/panic/1", "/ok/12", "/panic/2"]);

        let set = Aggregator::default().aggregate(source, &targets).await;
        let venues = set.venues();

        assert_eq!(venues.len(), 3);
        assert!(task_failure(&venues[0]).contains("/panic/1"));
        assert!(!task_failure(&venues[0]).contains("/panic/2"));
        assert_eq!(venues[1].items.len(), 1);
        assert!(task_failure(&venues[2]).contains("/panic/2"));
    }

    #[tokio::test]
    async fn test_panic_before_deadline_is_not_a_timeout() {
        let source: Arc<dyn PageSource> = Arc::new(MockSource::new());
        let targets = targets(&["/panic/1", "/slow/1", "/ok/15"]);

        let set = aggregator(8, Duration::from_millis(300)).aggregate(source, &targets).await;
        let venues = set.venues();

        assert_eq!(venues.len(), 3);
        assert!(task_failure(&venues[0]).contains("/panic/1"));
        assert_eq!(venues[1].errors, vec![VenueError::DeadlineExceeded]);
        assert_eq!(venues[2].items[0].price, 15);
    }

    #[tokio::test]
    async fn test_huge_deadline_does_not_overflow() {
        let source: Arc<dyn PageSource> = Arc::new(MockSource::new());
        let targets = targets(&["/ok/12", "/ok/14"]);

        let set = aggregator(2, Duration::MAX).aggregate(source, &targets).await;

        assert_eq!(set.len(), 2);
        assert_eq!(set.error_count(), 0);
        assert!(deadline_from_now(Duration::MAX) > Instant::now());
    }
}
