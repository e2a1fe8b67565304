/*
 * Responsibility
 * - Query parameters shared by every list endpoint (?q=&limit=&offset=)
 * - Absent fields fall back to declared defaults; limit=0 means the default page
 */
use serde::Deserialize;

use crate::repos::ListOptions;

pub const DEFAULT_QUERY: &str = "";
pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const DEFAULT_OFFSET: usize = 0;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl From<ListParams> for ListOptions {
    fn from(params: ListParams) -> Self {
        ListOptions {
            query: params.q.unwrap_or_else(|| DEFAULT_QUERY.to_string()),
            limit: match params.limit {
                None | Some(0) => DEFAULT_PAGE_SIZE,
                Some(limit) => limit,
            },
            offset: params.offset.unwrap_or(DEFAULT_OFFSET),
        }
    }
}
