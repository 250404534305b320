// GitHub API endpoint functions.
// One method per resource; list endpoints walk every page from the requested one onward.

use serde_json::Value;

use crate::cache::CacheKey;
use crate::error::Result;

use super::client::ForgeClient;
use super::pagination::PagedRequest;
use super::types::{CommitsQuery, IssuesQuery, PageRange, RepositoriesQuery, format_timestamp};

impl ForgeClient {
    /// Get a user by login.
    pub async fn get_user(&self, username: &str) -> Result<Value> {
        let key = CacheKey::new("get_user").param("username", username);
        self.fetch(key, &["users", username], &[]).await
    }

    /// Get all repositories of a user, from `query.pages.page` onward.
    pub async fn get_repositories(
        &self,
        username: &str,
        query: &RepositoriesQuery,
    ) -> Result<Vec<Value>> {
        self.fetch_all_pages(PagedRequest {
            key: CacheKey::new("get_repositories").param("username", username),
            segments: &["users", username, "repos"],
            filters: vec![
                ("type", Some(query.repo_type.to_string())),
                ("sort", Some(query.sort.to_string())),
                ("direction", Some(query.direction.to_string())),
            ],
            pages: query.pages,
        })
        .await
    }

    /// Get a specific repository.
    pub async fn get_repository(&self, owner: &str, repo: &str) -> Result<Value> {
        let key = CacheKey::new("get_repository")
            .param("owner", owner)
            .param("repo", repo);
        self.fetch(key, &["repos", owner, repo], &[]).await
    }

    /// Get commits of a repository. Filters left unset in `query` are not sent.
    pub async fn get_commits_from_repository(
        &self,
        owner: &str,
        repo: &str,
        query: &CommitsQuery,
    ) -> Result<Vec<Value>> {
        self.fetch_all_pages(PagedRequest {
            key: CacheKey::new("get_commits_from_repository")
                .param("owner", owner)
                .param("repo", repo),
            segments: &["repos", owner, repo, "commits"],
            filters: vec![
                ("sha", query.sha.clone()),
                ("path", query.path.clone()),
                ("author", query.author.clone()),
                ("since", query.since.as_ref().map(format_timestamp)),
                ("until", query.until.as_ref().map(format_timestamp)),
            ],
            pages: query.pages,
        })
        .await
    }

    /// Get contributors of a repository (first page only, as GitHub returns it).
    pub async fn get_contributors(&self, owner: &str, repo: &str) -> Result<Value> {
        let key = CacheKey::new("get_contributors")
            .param("owner", owner)
            .param("repo", repo);
        self.fetch(key, &["repos", owner, repo, "contributors"], &[])
            .await
    }

    /// Get issues of a repository in the given state.
    pub async fn get_issues(
        &self,
        owner: &str,
        repo: &str,
        query: &IssuesQuery,
    ) -> Result<Vec<Value>> {
        self.fetch_all_pages(PagedRequest {
            key: CacheKey::new("get_issues")
                .param("owner", owner)
                .param("repo", repo),
            segments: &["repos", owner, repo, "issues"],
            filters: vec![("state", Some(query.state.to_string()))],
            pages: query.pages,
        })
        .await
    }

    /// Get pull requests of a repository.
    pub async fn get_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        pages: PageRange,
    ) -> Result<Vec<Value>> {
        self.fetch_all_pages(PagedRequest {
            key: CacheKey::new("get_pull_requests")
                .param("owner", owner)
                .param("repo", repo),
            segments: &["repos", owner, repo, "pulls"],
            filters: Vec::new(),
            pages,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use crate::cache::{DEFAULT_TTL, MemoryStore};
    use crate::github::http::MockTransport;
    use crate::github::types::{IssueState, RepositorySort, RepositoryType, SortDirection};

    const API: &str = "https://api.github.com";

    fn client(mock: &MockTransport) -> ForgeClient {
        ForgeClient::with_transport("ghp_test", Arc::new(mock.clone())).unwrap()
    }

    fn cached_client(mock: &MockTransport) -> ForgeClient {
        client(mock).with_cache(Arc::new(MemoryStore::new()), DEFAULT_TTL)
    }

    #[tokio::test]
    async fn test_get_user_returns_body_unchanged() {
        let mock = MockTransport::new();
        let body = json!({
            "login": "octocat",
            "id": 583231,
            "site_admin": false,
            "plan": { "name": "pro", "space": 976562499 }
        });
        mock.push_json(format!("{API}/users/octocat"), &body);

        let user = client(&mock).get_user("octocat").await.unwrap();
        assert_eq!(user, body);
    }

    #[tokio::test]
    async fn test_get_user_not_found_makes_one_request() {
        let mock = MockTransport::new();
        mock.push_response(format!("{API}/users/ghost"), 404, r#"{"message":"Not Found"}"#);

        let err = client(&mock).get_user("ghost").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_get_repositories_sends_listing_params() {
        let mock = MockTransport::new();
        let url = format!(
            "{API}/users/octocat/repos?type=owner&sort=updated&direction=desc&per_page=2&page=1"
        );
        mock.push_json(url.clone(), &json!([{ "id": 1 }]));

        let query = RepositoriesQuery {
            repo_type: RepositoryType::Owner,
            sort: RepositorySort::Updated,
            direction: SortDirection::Desc,
            pages: PageRange { per_page: 2, page: 1 },
        };
        let repos = client(&mock).get_repositories("octocat", &query).await.unwrap();

        assert_eq!(repos, vec![json!({ "id": 1 })]);
        assert_eq!(mock.request_urls(), vec![url]);
    }

    #[tokio::test]
    async fn test_get_repositories_defaults() {
        let mock = MockTransport::new();
        let url = format!(
            "{API}/users/octocat/repos?type=all&sort=full_name&direction=asc&per_page=25&page=1"
        );
        mock.push_json(url.clone(), &json!([]));

        let repos = client(&mock)
            .get_repositories("octocat", &RepositoriesQuery::default())
            .await
            .unwrap();

        assert!(repos.is_empty());
        assert_eq!(mock.request_urls(), vec![url]);
    }

    #[tokio::test]
    async fn test_get_repository_and_contributors() {
        let mock = MockTransport::new();
        mock.push_json(format!("{API}/repos/rust-lang/rust"), &json!({ "full_name": "rust-lang/rust" }));
        mock.push_json(
            format!("{API}/repos/rust-lang/rust/contributors"),
            &json!([{ "login": "bors", "contributions": 1 }]),
        );

        let client = client(&mock);
        let repo = client.get_repository("rust-lang", "rust").await.unwrap();
        let contributors = client.get_contributors("rust-lang", "rust").await.unwrap();

        assert_eq!(repo["full_name"], "rust-lang/rust");
        assert_eq!(contributors[0]["login"], "bors");
    }

    #[tokio::test]
    async fn test_get_commits_omits_unset_filters() {
        let mock = MockTransport::new();
        let url = format!("{API}/repos/o/r/commits?author=octocat&per_page=25&page=1");
        mock.push_json(url.clone(), &json!([{ "sha": "abc" }]));

        let query = CommitsQuery {
            author: Some("octocat".to_string()),
            ..CommitsQuery::default()
        };
        let commits = client(&mock)
            .get_commits_from_repository("o", "r", &query)
            .await
            .unwrap();

        assert_eq!(commits.len(), 1);
        assert_eq!(mock.request_urls(), vec![url]);
    }

    #[tokio::test]
    async fn test_get_commits_sends_all_filters() {
        let mock = MockTransport::new();
        let url = format!(
            "{API}/repos/o/r/commits?sha=main&path=src%2Flib.rs&author=octocat\
             &since=2024-01-01T00%3A00%3A00Z&until=2024-02-01T00%3A00%3A00Z&per_page=10&page=1"
        );
        mock.push_json(url.clone(), &json!([]));

        let query = CommitsQuery {
            sha: Some("main".to_string()),
            path: Some("src/lib.rs".to_string()),
            author: Some("octocat".to_string()),
            since: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            until: Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
            pages: PageRange { per_page: 10, page: 1 },
        };
        client(&mock)
            .get_commits_from_repository("o", "r", &query)
            .await
            .unwrap();

        assert_eq!(mock.request_urls(), vec![url]);
    }

    #[tokio::test]
    async fn test_get_issues_walks_pages() {
        let mock = MockTransport::new();
        let page = |n: u32| format!("{API}/repos/o/r/issues?state=all&per_page=1&page={n}");
        mock.push_json(page(1), &json!([{ "number": 1 }]));
        mock.push_json(page(2), &json!([{ "number": 2 }]));
        mock.push_json(page(3), &json!([]));

        let query = IssuesQuery {
            state: IssueState::All,
            pages: PageRange { per_page: 1, page: 1 },
        };
        let issues = client(&mock).get_issues("o", "r", &query).await.unwrap();

        assert_eq!(issues, vec![json!({ "number": 1 }), json!({ "number": 2 })]);
        assert_eq!(mock.request_urls(), vec![page(1), page(2), page(3)]);
    }

    #[tokio::test]
    async fn test_get_pull_requests_uses_owner_then_repo() {
        let mock = MockTransport::new();
        let url = format!("{API}/repos/octocat/hello-world/pulls?per_page=25&page=1");
        mock.push_json(url.clone(), &json!([{ "number": 1347 }]));

        let pulls = client(&mock)
            .get_pull_requests("octocat", "hello-world", PageRange::default())
            .await
            .unwrap();

        assert_eq!(pulls[0]["number"], 1347);
        assert_eq!(mock.request_urls(), vec![url]);
    }

    #[tokio::test]
    async fn test_pull_request_pages_are_cached_under_distinct_keys() {
        let mock = MockTransport::new();
        let page = |n: u32| format!("{API}/repos/o/r/pulls?per_page=1&page={n}");
        mock.push_json(page(1), &json!([{ "number": 1 }]));
        mock.push_json(page(2), &json!([{ "number": 2 }]));
        mock.push_json(page(3), &json!([]));
        let client = cached_client(&mock);

        let pulls = client
            .get_pull_requests("o", "r", PageRange { per_page: 1, page: 1 })
            .await
            .unwrap();

        assert_eq!(pulls, vec![json!({ "number": 1 }), json!({ "number": 2 })]);
        assert_eq!(mock.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_identical_calls_hit_cache() {
        let mock = MockTransport::new();
        mock.push_json(format!("{API}/users/octocat"), &json!({ "login": "octocat" }));
        let client = cached_client(&mock);

        let first = client.get_user("octocat").await.unwrap();
        let second = client.get_user("octocat").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_different_params_miss_cache() {
        let mock = MockTransport::new();
        let open = format!("{API}/repos/o/r/issues?state=open&per_page=25&page=1");
        let closed = format!("{API}/repos/o/r/issues?state=closed&per_page=25&page=1");
        mock.push_json(open.clone(), &json!([{ "number": 1 }]));
        mock.push_json(closed.clone(), &json!([{ "number": 2 }]));
        let client = cached_client(&mock);

        let open_issues = client.get_issues("o", "r", &IssuesQuery::default()).await.unwrap();
        let closed_issues = client
            .get_issues(
                "o",
                "r",
                &IssuesQuery {
                    state: IssueState::Closed,
                    ..IssuesQuery::default()
                },
            )
            .await
            .unwrap();

        assert_ne!(open_issues, closed_issues);
        assert_eq!(mock.request_urls(), vec![open, closed]);
    }

    #[tokio::test]
    async fn test_failed_response_is_not_cached() {
        let mock = MockTransport::new();
        let url = format!("{API}/repos/o/r");
        mock.push_response(url.clone(), 500, "oops");
        mock.push_json(url, &json!({ "id": 9 }));
        let client = cached_client(&mock);

        assert!(client.get_repository("o", "r").await.is_err());
        let repo = client.get_repository("o", "r").await.unwrap();

        assert_eq!(repo, json!({ "id": 9 }));
        assert_eq!(mock.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_repository_and_contributors_keys_do_not_collide() {
        let mock = MockTransport::new();
        mock.push_json(format!("{API}/repos/o/r"), &json!({ "id": 1 }));
        mock.push_json(format!("{API}/repos/o/r/contributors"), &json!([]));
        let client = cached_client(&mock);

        let repo = client.get_repository("o", "r").await.unwrap();
        let contributors = client.get_contributors("o", "r").await.unwrap();

        assert_eq!(repo, json!({ "id": 1 }));
        assert_eq!(contributors, json!([]));
        assert_eq!(mock.requests().len(), 2);
    }
}
