use anyhow::Result;
use log::debug;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};

use crate::{
    download::{Downloader, HttpDownloader},
    http::HttpClient,
    registry::{ModrinthRegistry, Registry},
    runtime::Runtime,
    versions::{MojangManifest, VersionSource},
};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("modupdater/", env!("MODUPDATER_VERSION"));

/// Environment variable holding an optional registry API token.
pub const TOKEN_ENV: &str = "MODRINTH_TOKEN";

pub struct Config<R: Runtime, G: Registry, D: Downloader, V: VersionSource> {
    pub runtime: R,
    pub registry: G,
    pub downloader: D,
    pub versions: V,
}

impl<R: Runtime> Config<R, ModrinthRegistry, HttpDownloader, MojangManifest> {
    pub fn new(
        runtime: R,
        api_url: Option<String>,
        manifest_url: Option<String>,
    ) -> Result<Self> {
        let http_client = build_http_client(&runtime)?;

        Ok(Self {
            registry: ModrinthRegistry::new(http_client.clone(), api_url),
            downloader: HttpDownloader::new(http_client.clone()),
            versions: MojangManifest::new(http_client, manifest_url),
            runtime,
        })
    }
}

/// Builds the shared HTTP client, authenticating with `MODRINTH_TOKEN` when set.
pub fn build_http_client<R: Runtime + ?Sized>(runtime: &R) -> Result<HttpClient> {
    let mut headers = HeaderMap::new();

    if let Ok(token) = runtime.env_var(TOKEN_ENV)
        && !token.is_empty()
    {
        let mut auth_value = HeaderValue::from_str(&token)?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        debug!("Using {} for authentication", TOKEN_ENV);
    }

    let client = Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()?;

    Ok(HttpClient::new(client))
}
