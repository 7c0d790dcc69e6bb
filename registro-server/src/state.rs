use axum::extract::FromRef;
use sqlx::{Pool, Postgres};

/// Shared state needed by requests. Handlers hold no mutable state of their
/// own; the pool is the only thing they share.
#[derive(Clone, FromRef)]
pub struct State {
    /// Database connection pool.
    pool: Pool<Postgres>,
}

impl State {
    /// Create a new state.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}
