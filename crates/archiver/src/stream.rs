//! Lazy, page-at-a-time consumption of a repository listing.

use crate::filter::{Decision, FilterSpec, select};
use crate::platform::{self, PlatformClient, PlatformError, PlatformRepo, RepoPage};
use crate::progress::{ArchiveProgress, ProgressCallback, emit};

/// Sequential cursor over one owner's repositories.
///
/// Only the current page is held in memory. The stream can only be started
/// over by constructing a new one.
pub struct RepositoryStream<'a, C: PlatformClient + ?Sized> {
    client: &'a C,
    owner: String,
    next_page: Option<u32>,
}

impl<'a, C: PlatformClient + ?Sized> RepositoryStream<'a, C> {
    pub fn new(client: &'a C, owner: impl Into<String>) -> Self {
        Self {
            client,
            owner: owner.into(),
            next_page: Some(1),
        }
    }

    /// Fetch the next page, or `None` once the platform signalled the end.
    ///
    /// A next page that does not move forward fails the stream.
    pub async fn next_page(&mut self) -> platform::Result<Option<(u32, RepoPage)>> {
        let Some(page) = self.next_page else {
            return Ok(None);
        };

        let fetched = self.client.list_repos_page(&self.owner, page).await?;

        self.next_page = None;
        if let Some(next) = fetched.next_page
            && next <= page
        {
            return Err(PlatformError::internal(format!(
                "non-increasing next page {next} after {page}"
            )));
        }
        self.next_page = fetched.next_page;

        Ok(Some((page, fetched)))
    }
}

/// Outcome of draining a listing through the selector.
#[derive(Debug, Default)]
pub struct Selection {
    /// Matching repositories in listing order.
    pub candidates: Vec<PlatformRepo>,
    /// Number of repositories examined.
    pub processed: usize,
}

/// Drain `owner`'s listing and keep the repositories `spec` selects.
///
/// A failed page fetch aborts the whole drain: a partial listing would
/// produce a wrong candidate set.
pub async fn collect_candidates<C: PlatformClient + ?Sized>(
    client: &C,
    owner: &str,
    spec: &FilterSpec,
    on_progress: Option<&ProgressCallback>,
) -> platform::Result<Selection> {
    let mut stream = RepositoryStream::new(client, owner);
    let mut selection = Selection::default();
    let mut expected_pages = None;

    emit(
        on_progress,
        ArchiveProgress::FetchingRepos {
            owner: owner.to_string(),
        },
    );

    while let Some((page_number, page)) = stream.next_page().await? {
        expected_pages = page.last_page.or(expected_pages);
        let count = page.repos.len();

        for repo in page.repos {
            selection.processed += 1;
            match select(&repo, spec) {
                Decision::Include => {
                    emit(
                        on_progress,
                        ArchiveProgress::CandidateFound {
                            full_name: repo.full_name.clone(),
                        },
                    );
                    selection.candidates.push(repo);
                }
                Decision::Exclude(reason) => {
                    tracing::debug!(repo = %repo.full_name, %reason, "Skipped");
                    emit(
                        on_progress,
                        ArchiveProgress::RepoSkipped {
                            full_name: repo.full_name,
                            reason,
                        },
                    );
                }
            }
        }

        emit(
            on_progress,
            ArchiveProgress::FetchedPage {
                page: page_number,
                count,
                total_so_far: selection.processed,
                expected_pages,
            },
        );
    }

    emit(
        on_progress,
        ArchiveProgress::FetchComplete {
            total: selection.processed,
        },
    );
    emit(
        on_progress,
        ArchiveProgress::SelectionComplete {
            matched: selection.candidates.len(),
            processed: selection.processed,
        },
    );

    Ok(selection)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    use crate::filter::{AgeBounds, CompareField, RepoTypeFilter};
    use crate::platform::{RepoVisibility, UserInfo};

    use super::*;

    /// Serves a fixed list of pages and records which pages were requested.
    struct PagedClient {
        pages: Vec<platform::Result<RepoPage>>,
        requested: Mutex<Vec<u32>>,
    }

    impl PagedClient {
        fn new(pages: Vec<platform::Result<RepoPage>>) -> Self {
            Self {
                pages,
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<u32> {
            self.requested
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone()
        }
    }

    #[async_trait]
    impl PlatformClient for PagedClient {
        async fn get_authenticated_user(&self) -> platform::Result<UserInfo> {
            panic!("unused in tests")
        }

        async fn list_repos_page(&self, _owner: &str, page: u32) -> platform::Result<RepoPage> {
            self.requested
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(page);
            match self.pages.get(page as usize - 1) {
                Some(Ok(p)) => Ok(p.clone()),
                Some(Err(e)) => Err(PlatformError::api(e.to_string())),
                None => panic!("page {page} requested past the end"),
            }
        }

        async fn set_archived(&self, _owner: &str, _name: &str, _archived: bool) -> platform::Result<()> {
            panic!("unused in tests")
        }
    }

    fn repo(name: &str, year: i32) -> PlatformRepo {
        PlatformRepo {
            owner: "octocat".to_string(),
            name: name.to_string(),
            full_name: format!("octocat/{name}"),
            visibility: RepoVisibility::Public,
            is_fork: false,
            is_archived: false,
            is_disabled: false,
            created_at: None,
            updated_at: Some(Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap()),
            pushed_at: None,
        }
    }

    fn page(repos: Vec<PlatformRepo>, next_page: Option<u32>) -> platform::Result<RepoPage> {
        Ok(RepoPage {
            repos,
            next_page,
            last_page: Some(2),
        })
    }

    fn stale_before_2020() -> FilterSpec {
        FilterSpec::new(
            AgeBounds::Before(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()),
            [CompareField::UpdatedAt],
            [RepoTypeFilter::Public],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_next_page_walks_pages_in_order() {
        let client = PagedClient::new(vec![
            page(vec![repo("a", 2010), repo("b", 2011)], Some(2)),
            page(vec![repo("c", 2012)], None),
        ]);
        let mut stream = RepositoryStream::new(&client, "octocat");

        let mut names = Vec::new();
        while let Some((_, page)) = stream.next_page().await.unwrap() {
            names.extend(page.repos.into_iter().map(|r| r.name));
        }

        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(client.requested(), vec![1, 2]);
        assert!(stream.next_page().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_collect_candidates_keeps_arrival_order() {
        let client = PagedClient::new(vec![
            page(vec![repo("old-1", 2012), repo("new-1", 2023)], Some(2)),
            page(vec![repo("old-2", 2015), repo("new-2", 2024)], None),
        ]);

        let selection = collect_candidates(&client, "octocat", &stale_before_2020(), None)
            .await
            .unwrap();

        let names: Vec<_> = selection.candidates.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["old-1", "old-2"]);
        assert_eq!(selection.processed, 4);
    }

    #[tokio::test]
    async fn test_collect_candidates_aborts_on_page_failure() {
        let client = PagedClient::new(vec![
            page(vec![repo("old-1", 2012)], Some(2)),
            Err(PlatformError::network("connection reset")),
        ]);

        let result = collect_candidates(&client, "octocat", &stale_before_2020(), None).await;

        assert!(result.is_err());
        assert_eq!(client.requested(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_non_increasing_next_page_fails_listing() {
        let client = PagedClient::new(vec![Ok(RepoPage {
            repos: vec![repo("a", 2010)],
            next_page: Some(1),
            last_page: Some(3),
        })]);

        let result = collect_candidates(&client, "octocat", &stale_before_2020(), None).await;

        let Err(PlatformError::Internal { message }) = result else {
            panic!("expected the listing to fail");
        };
        assert!(message.contains("non-increasing next page 1 after 1"));
        assert_eq!(client.requested(), vec![1]);
    }

    #[tokio::test]
    async fn test_stream_ends_after_failed_page() {
        let client = PagedClient::new(vec![page(vec![repo("a", 2010)], Some(1))]);
        let mut stream = RepositoryStream::new(&client, "octocat");

        assert!(stream.next_page().await.is_err());
        assert!(stream.next_page().await.unwrap().is_none());
        assert_eq!(client.requested(), vec![1]);
    }

    #[tokio::test]
    async fn test_collect_candidates_emits_progress() {
        let client = PagedClient::new(vec![page(vec![repo("a", 2010), repo("b", 2024)], None)]);
        let events = std::sync::Arc::new(Mutex::new(Vec::new()));
        let sink = std::sync::Arc::clone(&events);
        let callback: ProgressCallback = Box::new(move |event| {
            sink.lock().unwrap_or_else(|e| e.into_inner()).push(event);
        });

        collect_candidates(&client, "octocat", &stale_before_2020(), Some(&callback))
            .await
            .unwrap();

        let events = events.lock().unwrap_or_else(|e| e.into_inner());
        assert!(matches!(events.first(), Some(ArchiveProgress::FetchingRepos { .. })));
        assert!(events.iter().any(|e| matches!(
            e,
            ArchiveProgress::RepoSkipped {
                reason: crate::filter::ExclusionReason::OutOfRange(CompareField::UpdatedAt),
                ..
            }
        )));
        assert!(matches!(
            events.last(),
            Some(ArchiveProgress::SelectionComplete {
                matched: 1,
                processed: 2
            })
        ));
    }
}
