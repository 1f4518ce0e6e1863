//! Per-response metadata carried in HTTP headers.

use serde::Serialize;

use crate::http::HttpResponse;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const RATE_LIMIT_LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RATE_LIMIT_RESET_HEADER: &str = "x-ratelimit-reset";

/// Request id and rate-limit counters reported alongside a response.
///
/// Values are copied verbatim from the headers; nothing is parsed, so a
/// header that is present but malformed still shows up as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetaInformation {
    pub request_id: Option<String>,
    pub rate_limit_limit: Option<String>,
    pub rate_limit_remaining: Option<String>,
    pub rate_limit_reset: Option<String>,
}

impl MetaInformation {
    pub fn from_response(response: &HttpResponse) -> Self {
        let header = |name| response.header(name).map(str::to_string);
        MetaInformation {
            request_id: header(REQUEST_ID_HEADER),
            rate_limit_limit: header(RATE_LIMIT_LIMIT_HEADER),
            rate_limit_remaining: header(RATE_LIMIT_REMAINING_HEADER),
            rate_limit_reset: header(RATE_LIMIT_RESET_HEADER),
        }
    }
}
