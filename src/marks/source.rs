use async_trait::async_trait;
use futures::{StreamExt, stream};
use log::{debug, info};
use rayon::prelude::*;
use reqwest::redirect::Policy;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::constants::timeouts;
use crate::core::error::{MarkdashError, Result};
use crate::core::types::MarkTable;
use crate::marks::table::{TableOptions, load_table};
use crate::ui::progress::ProgressReporter;

/// Where a mark table comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Local(PathBuf),
    Remote(String),
}

impl Source {
    /// Classify an input argument; `http://` and `https://` inputs are remote
    pub fn parse(input: &str) -> Source {
        let lowered = input.to_ascii_lowercase();
        if lowered.starts_with("http://") || lowered.starts_with("https://") {
            Source::Remote(input.to_string())
        } else {
            Source::Local(PathBuf::from(input))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Source::Remote(_))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Local(path) => write!(f, "{}", path.display()),
            Source::Remote(url) => f.write_str(url),
        }
    }
}

/// Label of a remote table: the last path segment without query or extension
pub fn label_for_url(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let segment = without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(without_query);

    let stem = match segment.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => segment,
    };

    if stem.is_empty() {
        url.to_string()
    } else {
        stem.to_string()
    }
}

#[async_trait]
pub trait FetchCsv {
    /// Download the body of a remote CSV file
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// `FetchCsv` over plain HTTP(S), without authentication
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let user_agent = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(Policy::limited(timeouts::MAX_REDIRECTS))
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FetchCsv for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("Fetching {url}");
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(MarkdashError::Remote(format!("{url} answered {status}")));
        }

        Ok(response.text().await?)
    }
}

/// Load every source with the HTTP fetcher, keeping input order
pub async fn load_sources(
    sources: &[Source],
    options: &TableOptions,
    timeout: Duration,
    progress: Option<&ProgressReporter>,
) -> Result<Vec<MarkTable>> {
    let fetcher = HttpFetcher::new(timeout)?;
    load_sources_with(sources, options, &fetcher, progress).await
}

/// Load every source with the given fetcher, keeping input order.
///
/// Local files are parsed in parallel; remote files are fetched concurrently.
/// The first failure aborts the load.
pub async fn load_sources_with<F>(
    sources: &[Source],
    options: &TableOptions,
    fetcher: &F,
    progress: Option<&ProgressReporter>,
) -> Result<Vec<MarkTable>>
where
    F: FetchCsv + Sync,
{
    let mut slots: Vec<Option<MarkTable>> = vec![None; sources.len()];

    let local: Vec<(usize, &PathBuf)> = sources
        .iter()
        .enumerate()
        .filter_map(|(i, source)| match source {
            Source::Local(path) => Some((i, path)),
            Source::Remote(_) => None,
        })
        .collect();

    let local_tables: Vec<(usize, MarkTable)> = local
        .par_iter()
        .map(|(i, path)| {
            let table = load_table(path, options)?;
            if let Some(progress) = progress {
                progress.advance();
            }
            Ok((*i, table))
        })
        .collect::<Result<_>>()?;

    for (i, table) in local_tables {
        slots[i] = Some(table);
    }

    let remote: Vec<(usize, &str)> = sources
        .iter()
        .enumerate()
        .filter_map(|(i, source)| match source {
            Source::Remote(url) => Some((i, url.as_str())),
            Source::Local(_) => None,
        })
        .collect();

    if !remote.is_empty() {
        info!("Fetching {} remote table(s)", remote.len());
        let concurrency = remote.len().min(rayon::current_num_threads().max(1));
        let mut fetched = stream::iter(remote)
            .map(|(i, url)| async move {
                let body = fetcher.fetch(url).await?;
                let table =
                    MarkTable::from_reader(body.as_bytes(), &label_for_url(url), url, options)?;
                Ok::<_, MarkdashError>((i, table))
            })
            .buffer_unordered(concurrency);

        while let Some(result) = fetched.next().await {
            let (i, table) = result?;
            if let Some(progress) = progress {
                progress.advance();
            }
            slots[i] = Some(table);
        }
    }

    Ok(slots.into_iter().flatten().collect())
}
