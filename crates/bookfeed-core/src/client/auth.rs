//! Bearer token source

/// Read-only access to the current session token
pub trait TokenProvider: Send + Sync {
    /// Token to send as `Authorization: Bearer <token>`, if signed in
    fn bearer_token(&self) -> Option<String>;
}

/// A fixed token
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

impl<F> TokenProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn bearer_token(&self) -> Option<String> {
        self()
    }
}
