use anyhow::Context;
use serde::Deserialize;
use std::{convert::Infallible, fmt, path::PathBuf, str::FromStr, time::Duration};
use svgfetch::{ImageFetcher, Transport, VectorBackend, VectorDocument};
use tokio::fs;

/// Where an SVG comes from: an http(s) URL or a local file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "String")]
pub enum Source {
    Url(String),
    Path(PathBuf),
}

impl Source {
    pub async fn load<T, B>(
        &self,
        fetcher: &ImageFetcher<T, B>,
        timeout: Option<Duration>,
    ) -> anyhow::Result<VectorDocument<B>>
    where
        T: Transport,
        B: VectorBackend,
    {
        match self {
            Source::Url(url) => {
                let fetch = fetcher.fetch_document(url);

                let res = match timeout {
                    Some(limit) => tokio::time::timeout(limit, fetch)
                        .await
                        .with_context(|| format!("Timed out fetching {url}"))?,
                    None => fetch.await,
                };

                res.with_context(|| format!("Failed to fetch {url}"))
            }
            Source::Path(path) => {
                let data = fs::read(path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;

                VectorDocument::decode(fetcher.backend().clone(), &data)
                    .with_context(|| format!("Failed to decode {}", path.display()))
            }
        }
    }
}

impl From<String> for Source {
    fn from(value: String) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            Source::Url(value)
        } else {
            Source::Path(PathBuf::from(value))
        }
    }
}

impl FromStr for Source {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Source::from(s.to_string()))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{url}"),
            Source::Path(path) => write!(f, "{}", path.display()),
        }
    }
}
