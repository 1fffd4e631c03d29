//! Business logic services

pub mod session;
pub mod stats;

use uuid::Uuid;

use crate::db::Database;
use crate::error::{ApiError, Result};

/// Reject requests for users that do not exist at all.
///
/// A missing learning record is never an error; a missing user is.
pub(crate) async fn ensure_user(db: &Database, user_id: Uuid) -> Result<()> {
    if db.user_exists(user_id).await? {
        Ok(())
    } else {
        Err(ApiError::NotFound(format!("user {}", user_id)))
    }
}
