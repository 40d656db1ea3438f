use std::future::Future;
use std::time::Duration;

use crate::domain::DomainError;

/// Bounds an external call. Expiry becomes [`DomainError::Timeout`].
pub async fn with_deadline<T, F>(limit: Duration, what: &str, call: F) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| DomainError::timeout(format!("{what} exceeded {}s", limit.as_secs_f32())))?
}
