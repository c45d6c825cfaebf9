//! The ordered pre-test routine shared by both test-case flavors.
//!
//! Setup always runs reset → create → load → settle, in that order, so that
//! fixtures are visible to search before a test body executes.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::EsResult;

/// Setup and teardown of the indices a test case owns.
///
/// # Example
///
/// ```rust,no_run
/// use estester::{IndexLifecycle, SingleIndexConfig, SingleIndexTestCase};
///
/// # async fn example() -> estester::EsResult<()> {
/// let case = SingleIndexTestCase::new(SingleIndexConfig::default())?;
/// case.setup().await?;
/// let response = case.search(None).await?;
/// case.teardown().await?;
/// # let _ = response;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait IndexLifecycle: Send + Sync {
    /// Resets and creates the declared indices, then loads and settles fixtures.
    async fn setup(&self) -> EsResult<()>;

    /// Deletes the declared indices when the configuration asks for it.
    async fn teardown(&self) -> EsResult<()>;
}

/// Waits out the settle delay once; `None` or a zero delay returns at once.
pub async fn settle(timeout: Option<Duration>) {
    if let Some(delay) = timeout.filter(|d| !d.is_zero()) {
        tracing::debug!(delay = ?delay, "Waiting for fixtures to settle");
        tokio::time::sleep(delay).await;
    }
}
