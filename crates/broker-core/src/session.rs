use async_trait::async_trait;

/// Owner of a cached database session.
///
/// `invalidate` drops whatever session is held so the next consumer dials
/// again with the current configuration. Calling it with nothing cached is a
/// no-op.
#[async_trait]
pub trait SessionManager: Send + Sync {
    async fn invalidate(&self);
}
