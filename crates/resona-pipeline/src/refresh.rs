//! Realtime refresh path: reads that rebuild when a token is in hand and
//! fall back to cached state when it is not.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use resona_core::{
    ArchivedSnapshot, Error, Horizon, Result, Snapshot, SnapshotArchive, SnapshotCache,
};

use crate::orchestrator::SnapshotService;

/// Read-side entry point over the orchestrator, cache, and archive.
#[derive(Clone)]
pub struct SnapshotReader {
    service: SnapshotService,
    cache: Arc<dyn SnapshotCache>,
    archive: Arc<dyn SnapshotArchive>,
}

impl SnapshotReader {
    pub fn new(
        service: SnapshotService,
        cache: Arc<dyn SnapshotCache>,
        archive: Arc<dyn SnapshotArchive>,
    ) -> Self {
        Self {
            service,
            cache,
            archive,
        }
    }

    /// Read the snapshot for `(user, horizon)`, refreshing when a token is
    /// available.
    ///
    /// With a token, the orchestrator rebuilds; a `TokenExpired` refresh
    /// falls back to the cached snapshot when one exists and otherwise
    /// surfaces `TokenExpired`, leaving prior cache state untouched either
    /// way. Without a token the cached snapshot is served, or
    /// `Error::NoData` when there is none.
    #[instrument(skip(self, access_token), fields(subsystem = "pipeline", component = "refresh", op = "read", user_id = external_user_id, horizon = %horizon))]
    pub async fn read(
        &self,
        external_user_id: &str,
        access_token: Option<&str>,
        horizon: Horizon,
    ) -> Result<Snapshot> {
        let token = match access_token {
            Some(token) => token,
            None => {
                return match self.cache.get(external_user_id, horizon).await {
                    Some(snapshot) => Ok(snapshot),
                    None => Err(Error::NoData(format!(
                        "no snapshot for {} ({})",
                        external_user_id, horizon
                    ))),
                };
            }
        };

        match self.service.build(token, horizon).await {
            Ok(snapshot) => Ok(snapshot),
            Err(Error::TokenExpired) => match self.cache.get(external_user_id, horizon).await {
                Some(snapshot) => {
                    warn!("Refresh token expired, serving cached snapshot");
                    Ok(snapshot)
                }
                None => {
                    debug!("Refresh token expired and no cached snapshot");
                    Err(Error::TokenExpired)
                }
            },
            Err(e) => Err(e),
        }
    }

    /// All archived snapshots for a user, newest first.
    pub async fn history(&self, external_user_id: &str) -> Result<Vec<ArchivedSnapshot>> {
        self.archive.history(external_user_id).await
    }
}
