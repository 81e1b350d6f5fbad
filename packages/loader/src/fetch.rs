//! Reads a [`DataSource`] into memory.

use crate::{DataSource, LoadError};

/// Reads a local file or downloads a URL as text.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read, the request fails, or
/// the server answers with a non-success status.
pub async fn fetch_text(client: &reqwest::Client, source: &DataSource) -> Result<String, LoadError> {
    match source {
        DataSource::File(path) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .map_err(|error| LoadError::Io {
                    location: source.to_string(),
                    error,
                })?;
            log::debug!("Read {} bytes from {source}", text.len());
            Ok(text)
        }
        DataSource::Url(url) => {
            let http_error = |error| LoadError::Http {
                location: url.clone(),
                error,
            };

            let resp = client.get(url).send().await.map_err(http_error)?;
            if !resp.status().is_success() {
                return Err(LoadError::Status {
                    location: url.clone(),
                    status: resp.status().as_u16(),
                });
            }
            let text = resp.text().await.map_err(http_error)?;
            log::debug!("Downloaded {} bytes from {url}", text.len());
            Ok(text)
        }
    }
}
