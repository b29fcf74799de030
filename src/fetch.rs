use std::fs::File;
use std::path::Path;
use std::time::Duration;

use camino::Utf8PathBuf;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, info};

use crate::error::DataError;
use crate::store::DataStore;

/// Published index of accident archives.
pub const DEFAULT_INDEX_URL: &str = "https://ehw.fit.vutbr.cz/izv/";

pub trait IndexClient: Send + Sync {
    /// HTML of the archive index page.
    fn fetch_index(&self) -> Result<String, DataError>;
    /// Byte-for-byte download of one archive, addressed by the relative
    /// path discovered on the index page.
    fn download_archive(&self, href: &str, destination: &Path) -> Result<(), DataError>;
}

#[derive(Clone)]
pub struct HttpIndexClient {
    client: Client,
    base_url: String,
}

impl HttpIndexClient {
    pub fn new() -> Result<Self, DataError> {
        Self::with_base_url(DEFAULT_INDEX_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, DataError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("nehoda-dm/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| DataError::IndexHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|err| DataError::IndexHttp(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn archive_url(&self, href: &str) -> String {
        format!("{}{}", self.base_url, href)
    }

    fn write_response_to_file(
        &self,
        mut response: reqwest::blocking::Response,
        destination: &Path,
    ) -> Result<(), DataError> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "archive download failed".to_string());
            return Err(DataError::IndexStatus { status, message });
        }
        let mut file =
            File::create(destination).map_err(|err| DataError::Filesystem(err.to_string()))?;
        std::io::copy(&mut response, &mut file)
            .map_err(|err| DataError::Filesystem(err.to_string()))?;
        Ok(())
    }
}

impl IndexClient for HttpIndexClient {
    fn fetch_index(&self) -> Result<String, DataError> {
        let response = self
            .client
            .get(&self.base_url)
            .send()
            .map_err(|err| DataError::IndexHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "index request failed".to_string());
            return Err(DataError::IndexStatus { status, message });
        }
        response
            .text()
            .map_err(|err| DataError::IndexHttp(err.to_string()))
    }

    fn download_archive(&self, href: &str, destination: &Path) -> Result<(), DataError> {
        let url = self.archive_url(href);
        debug!("downloading {url}");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| DataError::IndexHttp(err.to_string()))?;
        self.write_response_to_file(response, destination)
    }
}

/// Relative archive paths discovered on the index page.
///
/// Each table row carries one button per published period; the download path
/// sits single-quoted inside the button's `onclick` attribute. The last
/// button of a row is the full-period archive, which supersedes the partial
/// ones before it.
pub fn archive_links(html: &str) -> Vec<String> {
    let quoted_zip = Regex::new(r"'([^']+\.zip)'").unwrap();
    html.split("<tr")
        .skip(1)
        .filter_map(|row| {
            quoted_zip
                .captures_iter(row)
                .last()
                .map(|captures| captures[1].to_string())
        })
        .collect()
}

fn archive_file_name(href: &str) -> &str {
    href.rsplit('/').next().unwrap_or(href)
}

/// Downloads every archive discovered on the index page into the store,
/// overwriting whatever is already there. Best-effort bulk refresh: the
/// first failure propagates, nothing is retried.
pub fn fetch_all<I: IndexClient + ?Sized>(
    client: &I,
    store: &DataStore,
) -> Result<Vec<Utf8PathBuf>, DataError> {
    store.ensure_root()?;
    let html = client.fetch_index()?;
    let links = archive_links(&html);
    info!("index lists {} archives", links.len());

    let mut downloaded = Vec::with_capacity(links.len());
    for href in &links {
        let destination = store.archive_path(archive_file_name(href));
        client.download_archive(href, destination.as_std_path())?;
        downloaded.push(destination);
    }
    Ok(downloaded)
}
