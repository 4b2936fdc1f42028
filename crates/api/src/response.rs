//! Shared response envelope types for API handlers.
//!
//! API responses use a `{ "data": ... }` envelope. The cron and buddy-email
//! endpoints keep their own flat shapes because external schedulers and
//! clients depend on them.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
