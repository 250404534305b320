// Query parameter types for the GitHub REST endpoints.
// Response bodies stay as `serde_json::Value`; only the request side is typed.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

pub const DEFAULT_PER_PAGE: u32 = 25;
pub const DEFAULT_PAGE: u32 = 1;

/// Implements `as_str`, `Display` and `FromStr` for a wire-valued enum.
macro_rules! wire_enum {
    ($name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(format!(
                        "invalid value '{}', expected one of: {}",
                        other,
                        [$($wire),+].join(", ")
                    )),
                }
            }
        }
    };
}

/// Which of a user's repositories to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepositoryType {
    #[default]
    All,
    Owner,
    Member,
}

wire_enum!(RepositoryType {
    All => "all",
    Owner => "owner",
    Member => "member",
});

/// Repository listing sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepositorySort {
    Created,
    Updated,
    Pushed,
    #[default]
    FullName,
}

wire_enum!(RepositorySort {
    Created => "created",
    Updated => "updated",
    Pushed => "pushed",
    FullName => "full_name",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

wire_enum!(SortDirection {
    Asc => "asc",
    Desc => "desc",
});

/// Issue state filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IssueState {
    #[default]
    Open,
    Closed,
    All,
}

wire_enum!(IssueState {
    Open => "open",
    Closed => "closed",
    All => "all",
});

/// Page size and first page for a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub per_page: u32,
    /// First page to fetch (1-based); later pages follow until a short page.
    pub page: u32,
}

impl Default for PageRange {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            page: DEFAULT_PAGE,
        }
    }
}

/// Parameters for `GET /users/{username}/repos`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoriesQuery {
    pub repo_type: RepositoryType,
    pub sort: RepositorySort,
    pub direction: SortDirection,
    pub pages: PageRange,
}

/// Parameters for `GET /repos/{owner}/{repo}/commits`. Unset filters are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitsQuery {
    /// SHA or branch to start listing from.
    pub sha: Option<String>,
    /// Only commits touching this file path.
    pub path: Option<String>,
    /// GitHub login or email of the commit author.
    pub author: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub pages: PageRange,
}

/// Parameters for `GET /repos/{owner}/{repo}/issues`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuesQuery {
    pub state: IssueState,
    pub pages: PageRange,
}

/// ISO 8601 timestamp in the `YYYY-MM-DDTHH:MM:SSZ` form GitHub expects.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
