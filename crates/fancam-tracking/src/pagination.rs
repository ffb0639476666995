//! Pagination over detection results.

use tracing::debug;

use fancam_models::{DetectionJobId, ResultPage};

use crate::error::{TrackingError, TrackingResult};
use crate::metrics;
use crate::providers::DetectionSource;

/// Default number of observations requested per page.
pub const DEFAULT_PAGE_SIZE: i32 = 100;

/// Largest page the detection service accepts.
pub const MAX_PAGE_SIZE: i32 = 1000;

/// Drives a [`DetectionSource`] until the last page.
///
/// No retries: the first failed fetch aborts the whole run.
pub struct PaginationDriver<'a> {
    source: &'a dyn DetectionSource,
    page_size: i32,
}

impl<'a> PaginationDriver<'a> {
    pub fn new(source: &'a dyn DetectionSource, page_size: i32) -> TrackingResult<Self> {
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(TrackingError::config_error(format!(
                "page size {} outside 1..={}",
                page_size, MAX_PAGE_SIZE
            )));
        }
        Ok(Self { source, page_size })
    }

    pub fn page_size(&self) -> i32 {
        self.page_size
    }

    /// Fetch every page of `job_id`, handing each page to `on_page` before
    /// the next page is requested.
    ///
    /// Returns the number of pages fetched.
    pub async fn fetch_all<F>(&self, job_id: &DetectionJobId, mut on_page: F) -> TrackingResult<u32>
    where
        F: FnMut(&ResultPage),
    {
        let mut next_token: Option<String> = None;
        let mut pages = 0u32;

        loop {
            let page = self
                .source
                .get_page(job_id, self.page_size, next_token.take())
                .await
                .inspect_err(|e| metrics::record_page_failure(self.source.name(), e))?;

            pages += 1;
            metrics::record_page(self.source.name(), page.observations.len());

            if let Some(video) = page.video.as_ref() {
                debug!(job_id = %job_id, page = pages, ?video, "Video metadata");
            }
            debug!(
                job_id = %job_id,
                page = pages,
                observations = page.observations.len(),
                has_more = !page.is_last(),
                "Fetched result page from {}",
                self.source.name()
            );

            on_page(&page);

            match page.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockDetectionSource;
    use fancam_models::{BoundingBox, PersonIndex, PersonObservation};
    use mockall::predicate::eq;
    use mockall::Sequence;

    fn observation(index: u32, timestamp: f64) -> PersonObservation {
        PersonObservation::new(
            PersonIndex(index),
            timestamp,
            Some(BoundingBox::new(0.0, 0.1, 0.2, 0.3)),
        )
    }

    fn page(n: usize, token: Option<&str>) -> ResultPage {
        let observations = (0..n).map(|i| observation(0, i as f64)).collect();
        ResultPage::new(observations, token.map(str::to_string))
    }

    fn job() -> DetectionJobId {
        DetectionJobId::from_string("job-1")
    }

    #[test]
    fn test_page_size_bounds() {
        let source = MockDetectionSource::new();
        assert!(PaginationDriver::new(&source, 0).is_err());
        assert!(PaginationDriver::new(&source, MAX_PAGE_SIZE + 1).is_err());
        assert_eq!(PaginationDriver::new(&source, 100).unwrap().page_size(), 100);
    }

    #[tokio::test]
    async fn test_fetch_all_follows_tokens_until_last_page() {
        let mut source = MockDetectionSource::new();
        let mut seq = Sequence::new();
        source.expect_name().return_const("mock");

        source
            .expect_get_page()
            .with(eq(job()), eq(50), eq(None::<String>))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(page(2, Some("t1"))));
        source
            .expect_get_page()
            .with(eq(job()), eq(50), eq(Some("t1".to_string())))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(page(3, Some("t2"))));
        source
            .expect_get_page()
            .with(eq(job()), eq(50), eq(Some("t2".to_string())))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(page(1, None)));

        let driver = PaginationDriver::new(&source, 50).unwrap();
        let mut calls = 0;
        let mut sizes = Vec::new();
        let pages = driver
            .fetch_all(&job(), |page| {
                calls += 1;
                sizes.push(page.observations.len());
            })
            .await
            .unwrap();

        assert_eq!(pages, 3);
        assert_eq!(calls, 3);
        assert_eq!(sizes, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn test_fetch_all_stops_on_first_error() {
        let mut source = MockDetectionSource::new();
        let mut seq = Sequence::new();
        source.expect_name().return_const("mock");

        source
            .expect_get_page()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(page(2, Some("t1"))));
        source
            .expect_get_page()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Err(TrackingError::page_fetch("throttled")));

        let driver = PaginationDriver::new(&source, DEFAULT_PAGE_SIZE).unwrap();
        let mut calls = 0;
        let result = driver.fetch_all(&job(), |_| calls += 1).await;

        assert!(matches!(result, Err(TrackingError::PageFetch(_))));
        assert_eq!(calls, 1);
        // A third fetch would fail the mock's `times(1)` expectations.
    }

    #[tokio::test]
    async fn test_single_page_without_token() {
        let mut source = MockDetectionSource::new();
        source.expect_name().return_const("mock");
        source
            .expect_get_page()
            .times(1)
            .returning(|_, _, _| Ok(page(0, None)));

        let driver = PaginationDriver::new(&source, DEFAULT_PAGE_SIZE).unwrap();
        let mut calls = 0;
        let pages = driver.fetch_all(&job(), |_| calls += 1).await.unwrap();

        assert_eq!(pages, 1);
        assert_eq!(calls, 1);
    }
}
