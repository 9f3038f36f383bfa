//! Readiness probe that round-trips `SELECT 1` through the pool.

use async_trait::async_trait;
use diesel::sql_query;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ConnectivityError, ConnectivityProbe};

use super::pool::DbPool;

/// [`ConnectivityProbe`] backed by the shared connection pool.
#[derive(Clone)]
pub struct DieselConnectivityProbe {
    pool: DbPool,
}

impl DieselConnectivityProbe {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConnectivityProbe for DieselConnectivityProbe {
    async fn check(&self) -> Result<(), ConnectivityError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| ConnectivityError::unreachable(err.to_string()))?;
        sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| ConnectivityError::unreachable(err.to_string()))
    }
}
