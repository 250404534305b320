//! Page-by-page fetching for list endpoints.
//!
//! GitHub list endpoints take `per_page`/`page`. Pages are requested one at a
//! time starting from the caller's page, and the loop ends on the first page
//! holding fewer than `per_page` items, an empty page included. When the total
//! is an exact multiple of `per_page`, the trailing empty page is what ends
//! the loop, so it costs one extra request.

use serde_json::Value;

use crate::cache::CacheKey;
use crate::error::{ForgeError, Result};

use super::client::ForgeClient;
use super::types::PageRange;

/// One paginated listing: where to send it and what to filter on.
pub(crate) struct PagedRequest<'a> {
    /// Cache key carrying the operation name and path parameters.
    pub key: CacheKey,
    pub segments: &'a [&'a str],
    /// Query filters sent before `per_page`/`page`; `None` values are left off.
    pub filters: Vec<(&'static str, Option<String>)>,
    pub pages: PageRange,
}

impl ForgeClient {
    /// Fetch every page from `request.pages.page` onward and concatenate the items.
    ///
    /// A failure on any page fails the whole call; items from earlier pages are discarded.
    pub(crate) async fn fetch_all_pages(&self, request: PagedRequest<'_>) -> Result<Vec<Value>> {
        let PageRange { per_page, page } = request.pages;
        if per_page == 0 {
            return Err(ForgeError::InvalidArgument(
                "per_page must be at least 1".to_string(),
            ));
        }

        let mut items = Vec::new();
        let mut page = page;

        loop {
            let mut key = request.key.clone();
            let mut query = Vec::with_capacity(request.filters.len() + 2);
            for (name, value) in &request.filters {
                key = key.opt_param(name, value.as_deref());
                if let Some(value) = value {
                    query.push((*name, value.clone()));
                }
            }
            key = key.param("per_page", per_page).param("page", page);
            query.push(("per_page", per_page.to_string()));
            query.push(("page", page.to_string()));

            let body = self.fetch(key, request.segments, &query).await?;
            let batch = match body {
                Value::Array(batch) => batch,
                other => {
                    return Err(ForgeError::UnexpectedResponse {
                        url: self.url(request.segments, &query)?,
                        reason: format!("expected a JSON array, got {}", json_kind(&other)),
                    });
                }
            };

            let count = batch.len();
            items.extend(batch);
            tracing::debug!(page, count, total = items.len(), "fetched page");

            if count != per_page as usize {
                break;
            }

            page = page.checked_add(1).ok_or_else(|| {
                ForgeError::InvalidArgument("page number overflowed".to_string())
            })?;
        }

        Ok(items)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
