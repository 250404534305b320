// GitHub API module.
// Provides the client, transport seam and query types for the GitHub REST API.

pub mod client;
pub mod endpoints;
pub mod http;
pub mod pagination;
pub mod types;

pub use client::{ForgeClient, GITHUB_ACCEPT, GITHUB_API_VERSION};
pub use http::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use types::*;
