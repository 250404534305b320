//! forge - query GitHub users, repositories, commits, issues and pull requests
//!
//! Prints the JSON response (all pages for listings) to stdout.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use github_forge::config::CacheBackend;
use github_forge::{
    CommitsQuery, Config, ForgeClient, IssueState, IssuesQuery, PageRange, RepositoriesQuery,
    RepositorySort, RepositoryType, Result, SortDirection,
};

#[derive(Parser)]
#[command(name = "forge")]
#[command(version, about = "Query the GitHub REST API and print JSON")]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, env = "GITHUB_FORGE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Bypass the response cache for this run
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show a user
    User { username: String },

    /// List a user's repositories
    Repos {
        username: String,
        #[arg(long = "type", default_value = "all")]
        repo_type: RepositoryType,
        #[arg(long, default_value = "full_name")]
        sort: RepositorySort,
        #[arg(long, default_value = "asc")]
        direction: SortDirection,
        #[command(flatten)]
        pages: PageArgs,
    },

    /// Show a repository
    Repo { owner: String, repo: String },

    /// List commits of a repository
    Commits {
        owner: String,
        repo: String,
        /// SHA or branch to start from
        #[arg(long)]
        sha: Option<String>,
        /// Only commits touching this path
        #[arg(long)]
        path: Option<String>,
        /// Login or email of the author
        #[arg(long)]
        author: Option<String>,
        /// RFC 3339 timestamp, e.g. 2024-01-01T00:00:00Z
        #[arg(long)]
        since: Option<DateTime<Utc>>,
        #[arg(long)]
        until: Option<DateTime<Utc>>,
        #[command(flatten)]
        pages: PageArgs,
    },

    /// List contributors of a repository
    Contributors { owner: String, repo: String },

    /// List issues of a repository
    Issues {
        owner: String,
        repo: String,
        #[arg(long, default_value = "open")]
        state: IssueState,
        #[command(flatten)]
        pages: PageArgs,
    },

    /// List pull requests of a repository
    Pulls {
        owner: String,
        repo: String,
        #[command(flatten)]
        pages: PageArgs,
    },
}

#[derive(Args)]
struct PageArgs {
    /// Items per page
    #[arg(long, default_value_t = 25)]
    per_page: u32,
    /// First page to fetch
    #[arg(long, default_value_t = 1)]
    page: u32,
}

impl From<PageArgs> for PageRange {
    fn from(args: PageArgs) -> Self {
        PageRange {
            per_page: args.per_page,
            page: args.page,
        }
    }
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env(|name| std::env::var(name).ok());
            config
        }
        None => Config::load()?,
    };
    if cli.no_cache {
        config.cache = CacheBackend::None;
    }

    let client = ForgeClient::from_config(&config)?;
    tracing::debug!(base_url = client.base_url(), cached = client.is_cached(), "client ready");
    let output = execute(&client, cli.command).await?;

    let rendered = serde_json::to_string_pretty(&output)?;
    println!("{}", rendered);
    Ok(())
}

async fn execute(client: &ForgeClient, command: Command) -> Result<Value> {
    let value = match command {
        Command::User { username } => client.get_user(&username).await?,
        Command::Repos {
            username,
            repo_type,
            sort,
            direction,
            pages,
        } => {
            let query = RepositoriesQuery {
                repo_type,
                sort,
                direction,
                pages: pages.into(),
            };
            Value::Array(client.get_repositories(&username, &query).await?)
        }
        Command::Repo { owner, repo } => client.get_repository(&owner, &repo).await?,
        Command::Commits {
            owner,
            repo,
            sha,
            path,
            author,
            since,
            until,
            pages,
        } => {
            let query = CommitsQuery {
                sha,
                path,
                author,
                since,
                until,
                pages: pages.into(),
            };
            Value::Array(
                client
                    .get_commits_from_repository(&owner, &repo, &query)
                    .await?,
            )
        }
        Command::Contributors { owner, repo } => client.get_contributors(&owner, &repo).await?,
        Command::Issues {
            owner,
            repo,
            state,
            pages,
        } => {
            let query = IssuesQuery {
                state,
                pages: pages.into(),
            };
            Value::Array(client.get_issues(&owner, &repo, &query).await?)
        }
        Command::Pulls { owner, repo, pages } => Value::Array(
            client
                .get_pull_requests(&owner, &repo, pages.into())
                .await?,
        ),
    };

    Ok(value)
}
