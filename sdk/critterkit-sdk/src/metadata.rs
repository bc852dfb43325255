//! Cosmetic species artwork lookup.
//!
//! Strictly outside the core: callers log failures and move on; nothing
//! here ever touches session state or the owned-token list.

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::{CritterSdkError, Result};
use crate::types::SpeciesId;

/// Display metadata for one critter species.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SpeciesArt {
    pub species: SpeciesId,
    pub name: String,
    pub sprite_url: String,
}

/// HTTP client for an external species art service.
#[derive(Clone)]
pub struct SpeciesArtClient {
    http: Client,
    base_url: Url,
}

impl SpeciesArtClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|err| {
            CritterSdkError::Connection(format!("invalid art endpoint {base_url}: {err}"))
        })?;
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    fn art_url(&self, species: SpeciesId) -> Result<Url> {
        self.base_url
            .join(&format!("species/{species}"))
            .map_err(|err| CritterSdkError::Connection(err.to_string()))
    }

    /// Fetch display metadata for `species`.
    pub async fn fetch(&self, species: SpeciesId) -> Result<SpeciesArt> {
        let url = self.art_url(species)?;
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(CritterSdkError::Connection(format!(
                "art service answered http status {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }
}
