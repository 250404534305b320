//! Client for a handful of GitHub REST endpoints: users, repositories,
//! commits, contributors, issues and pull requests.
//!
//! List endpoints fetch every page from the requested one onward and return
//! the concatenated items. Attach a [`cache::CacheStore`] to memoize each
//! page and resource response for a fixed TTL.
//!
//! ```no_run
//! # async fn run() -> github_forge::Result<()> {
//! use github_forge::{ForgeClient, IssuesQuery};
//!
//! let client = ForgeClient::from_env()?;
//! let issues = client.get_issues("rust-lang", "rust", &IssuesQuery::default()).await?;
//! println!("{} open issues", issues.len());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod github;

pub use config::Config;
pub use error::{ForgeError, Result};
pub use github::{
    CommitsQuery, ForgeClient, IssueState, IssuesQuery, PageRange, RepositoriesQuery,
    RepositorySort, RepositoryType, SortDirection,
};
