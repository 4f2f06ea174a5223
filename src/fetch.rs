//! Where image bytes come from when the caller only has a URL.
//!
//! The pipeline itself works on bytes. [`ImageSource`] is the seam for whatever
//! actually performs the download; closures implement it, so tests and hosts with
//! their own HTTP stack can plug in directly. With the `fetch` feature on native
//! targets, [`HttpImageSource`] provides a blocking `reqwest` implementation.
//!
//! Nothing here retries. Retrying a transient failure is the caller's call.

use crate::error::Result;

pub trait ImageSource {
    fn fetch_image_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

impl<F> ImageSource for F
where
    F: Fn(&str) -> Result<Vec<u8>>,
{
    fn fetch_image_bytes(&self, url: &str) -> Result<Vec<u8>> {
        self(url)
    }
}

#[cfg(all(feature = "fetch", not(target_arch = "wasm32")))]
pub use http::HttpImageSource;

#[cfg(all(feature = "fetch", not(target_arch = "wasm32")))]
mod http {
    use super::ImageSource;
    use crate::error::{PaletteError, Result};
    use std::time::Duration;
    use tracing::debug;

    /// Blocking HTTP(S) downloader.
    #[derive(Debug, Clone)]
    pub struct HttpImageSource {
        client: reqwest::blocking::Client,
    }

    impl HttpImageSource {
        /// `timeout` bounds the whole request, connect through body.
        pub fn new(timeout: Duration) -> Result<Self> {
            let client = reqwest::blocking::Client::builder()
                .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                .timeout(timeout)
                .build()
                .map_err(|e| PaletteError::transport("<client>", e))?;

            Ok(Self { client })
        }
    }

    impl ImageSource for HttpImageSource {
        fn fetch_image_bytes(&self, url: &str) -> Result<Vec<u8>> {
            let response = self
                .client
                .get(url)
                .send()
                .and_then(|r| r.error_for_status())
                .map_err(|e| PaletteError::transport(url, e))?;

            let bytes = response.bytes().map_err(|e| PaletteError::transport(url, e))?;
            debug!(url, len = bytes.len(), "fetched image");

            Ok(bytes.to_vec())
        }
    }
}
