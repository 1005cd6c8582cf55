//! Chunk identifier allocation on the upload host.

use reqwest::StatusCode;
use uuid::Uuid;

use crate::api::client::AparatClient;
use crate::api::endpoints::CHUNK_PROBE;
use crate::api::transport::{HttpRequest, Transport};
use crate::error::{Error, Result};

/// Probes before giving up on finding an unused chunk id.
pub const MAX_CHUNK_ID_ATTEMPTS: u32 = 8;

impl<T: Transport> AparatClient<T> {
    /// A random chunk id the upload host reports as unknown.
    pub(crate) async fn allocate_chunk_id(&self) -> Result<String> {
        self.allocate_chunk_id_with(|| Uuid::new_v4().to_string())
            .await
    }

    /// Probe ids from `generate` until one is unused.
    ///
    /// Only a `404` marks an id as free; any other status counts as taken.
    pub(crate) async fn allocate_chunk_id_with<F>(&self, mut generate: F) -> Result<String>
    where
        F: FnMut() -> String + Send,
    {
        for attempt in 1..=MAX_CHUNK_ID_ATTEMPTS {
            let id = generate();
            let url = self.upload_url(&format!("{}/{}", CHUNK_PROBE, id));
            let response = self.send(HttpRequest::head(url).bare()).await?;

            if response.status == StatusCode::NOT_FOUND {
                tracing::debug!("Allocated chunk id {}", id);
                return Ok(id);
            }

            tracing::warn!(
                "Chunk id {} is taken (HTTP {}), attempt {}/{}",
                id,
                response.status,
                attempt,
                MAX_CHUNK_ID_ATTEMPTS
            );
        }

        Err(Error::ChunkIdAllocation {
            attempts: MAX_CHUNK_ID_ATTEMPTS,
        })
    }
}
