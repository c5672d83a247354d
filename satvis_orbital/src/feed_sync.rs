/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! keeping the local element set caches of our feeds up-to-date. Each feed is checked with a conditional
//! request (ETag, or content-length if the server does not provide ETags) and only downloaded if it changed.
//! Downloads are verified (unpacked and parsed) before they atomically replace the cache file, and only then
//! do we record the new freshness state in the config. Failures of a single feed never affect other feeds -
//! we just keep using the cache of the failed feed and report it as stale

use std::{fmt, path::{Path,PathBuf}, sync::Arc, time::Duration};
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug,info,warn};
use satvis_common::{
    compress::unpack_text,
    fs::{ensure_writable_dir,file_length,filepath_contents,store_file_contents_in_dir},
    net::{conditional_get,get_content_length,ConditionalResponse}
};

use crate::{
    catalog::{Catalog,CatalogStore},
    config::{store_config,FeedDescriptor,SatvisConfig},
    errors::{op_failed,SatvisOrbitalError,Result},
    tle::{parse_records,parse_valid_records}
};

/// the abstraction of a remote feed source
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// retrieve url unless it is unchanged. `etag` and `cached_size` are the freshness state of our current cache
    /// (if there is any). Implementors can use either to avoid downloads of unchanged data
    async fn fetch (&self, url: &str, etag: Option<&str>, cached_size: Option<u64>) -> Result<ConditionalResponse>;
}

/// the live FeedFetcher that uses HTTP(S)
pub struct HttpFeedFetcher {
    client: Client
}

impl HttpFeedFetcher {
    pub fn new ()->Self {
        HttpFeedFetcher { client: Client::new() }
    }

    pub fn with_client (client: Client)->Self {
        HttpFeedFetcher { client }
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch (&self, url: &str, etag: Option<&str>, cached_size: Option<u64>) -> Result<ConditionalResponse> {
        if etag.is_none() {
            if let Some(size) = cached_size {
                match get_content_length( &self.client, url).await {
                    Ok(remote_size) if remote_size == size => {
                        return Ok( ConditionalResponse::NotModified ) // we assume equal length means same content
                    }
                    Ok(_) => {}
                    Err(e) => debug!("no content-length for {url}: {e}")
                }
            }
        }

        Ok( conditional_get( &self.client, url, etag).await? )
    }
}

/// the outcome of synchronizing a single feed
#[derive(Debug,Clone,PartialEq)]
pub enum FeedStatus {
    /// remote is unchanged, cache file still valid
    Unchanged,
    /// downloaded and stored a new cache file
    Updated { n_records: usize, size: u64 },
    /// we could not update - `cached` tells us if there is a previous cache file we still use
    Stale { reason: String, cached: bool }
}

impl FeedStatus {
    pub fn is_stale (&self)->bool {
        matches!( self, FeedStatus::Stale{..})
    }
}

impl fmt::Display for FeedStatus {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedStatus::Unchanged => write!(f, "unchanged"),
            FeedStatus::Updated{n_records,size} => write!(f, "updated ({n_records} records, {size} bytes)"),
            FeedStatus::Stale{reason,cached} => write!(f, "stale ({reason}, {})", if *cached {"using cache"} else {"no cache"}),
        }
    }
}

/// the result of a sync pass over all feeds. Nothing in here is fatal
#[derive(Debug,Clone,Default)]
pub struct SyncReport {
    pub feeds: Vec<(String,FeedStatus)>,
    pub warnings: Vec<String>,
}

impl SyncReport {
    pub fn status (&self, feed_name: &str)->Option<&FeedStatus> {
        self.feeds.iter().find( |(name,_)| name == feed_name).map( |(_,status)| status)
    }

    pub fn n_updated (&self)->usize {
        self.feeds.iter().filter( |(_,s)| matches!( s, FeedStatus::Updated{..})).count()
    }

    pub fn n_stale (&self)->usize {
        self.feeds.iter().filter( |(_,s)| s.is_stale()).count()
    }
}

impl fmt::Display for SyncReport {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} feeds ({} updated, {} stale)", self.feeds.len(), self.n_updated(), self.n_stale())?;
        for (name,status) in &self.feeds {
            write!(f, "\n  {name}: {status}")?;
        }
        for w in &self.warnings {
            write!(f, "\n  warning: {w}")?;
        }
        Ok(())
    }
}

/// freshness state of a successfully stored download
struct FeedToken {
    etag: Option<String>,
    size: u64
}

pub struct FeedSynchronizer<F: FeedFetcher = HttpFeedFetcher> {
    fetcher: F,
    config_path: Option<PathBuf>, // where to persist updated freshness state (if at all)
}

impl FeedSynchronizer<HttpFeedFetcher> {
    pub fn with_http (config_path: Option<PathBuf>)->Self {
        FeedSynchronizer::new( HttpFeedFetcher::new(), config_path)
    }
}

impl<F: FeedFetcher> FeedSynchronizer<F> {
    pub fn new (fetcher: F, config_path: Option<PathBuf>)->Self {
        FeedSynchronizer { fetcher, config_path }
    }

    pub fn fetcher (&self)->&F {
        &self.fetcher
    }

    /// bring all feed caches up-to-date. Feeds are processed concurrently, freshness tokens of successfully
    /// stored feeds are updated in `config` once all feeds are done, after which the config is persisted
    pub async fn sync (&self, config: &mut SatvisConfig)->SyncReport {
        let mut report = SyncReport::default();

        if let Err(e) = ensure_writable_dir( &config.cache_dir) {
            warn!("cache dir {:?} not writable: {e}", config.cache_dir);
            report.warnings.push( format!("cache dir {:?} not writable: {e}", config.cache_dir));
        }

        let cache_dir = config.cache_dir.clone();
        let results = join_all( config.feeds.iter().map( |feed| self.sync_feed( &cache_dir, feed))).await;

        let mut tokens_changed = false;
        for (feed, (status, token)) in config.feeds.iter_mut().zip( results.into_iter()) {
            if let Some(token) = token {
                if feed.etag != token.etag || feed.size != Some(token.size) {
                    feed.etag = token.etag;
                    feed.size = Some(token.size);
                    tokens_changed = true;
                }
            }
            report.feeds.push( (feed.name.clone(), status));
        }

        if tokens_changed {
            if let Some(path) = &self.config_path {
                if let Err(e) = store_config( path, config) {
                    warn!("failed to persist config {:?}: {e}", path);
                    report.warnings.push( format!("failed to persist config {:?}: {e}", path));
                }
            }
        }

        info!("feed sync: {report}");
        report
    }

    async fn sync_feed (&self, cache_dir: &Path, feed: &FeedDescriptor)->(FeedStatus,Option<FeedToken>) {
        let path = feed.cache_path( cache_dir);
        let cached_len = file_length( &path);
        let cached = cached_len.is_some();

        // freshness tokens are meaningless without a cache file to fall back to
        let (etag, size) = if cached {
            (feed.etag.as_deref(), feed.size.filter( |s| Some(*s) == cached_len))
        } else {
            (None, None)
        };

        match self.fetcher.fetch( &feed.url, etag, size).await {
            Ok(ConditionalResponse::NotModified) => {
                debug!("feed {} unchanged", feed.name);
                (FeedStatus::Unchanged, None)
            }
            Ok(ConditionalResponse::Modified{data, etag}) => {
                let text = match unpack_text( &data) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("discarding corrupt payload of feed {}: {e}", feed.name);
                        return (FeedStatus::Stale{ reason: format!("corrupt payload: {e}"), cached }, None)
                    }
                };

                let n_records = parse_records( &text, &feed.color).filter( |r| r.is_ok()).count();
                if n_records == 0 {
                    warn!("feed {} has no valid records, keeping previous cache", feed.name);
                    return (FeedStatus::Stale{ reason: "no valid records".to_string(), cached }, None)
                }

                match store_file_contents_in_dir( &cache_dir, feed.cache_file_name(), &data) {
                    Ok(path) => {
                        info!("updated feed {} ({} records) -> {:?}", feed.name, n_records, path);
                        let size = data.len() as u64;
                        (FeedStatus::Updated{ n_records, size }, Some( FeedToken{ etag, size }))
                    }
                    Err(e) => {
                        warn!("failed to store cache of feed {}: {e}", feed.name);
                        (FeedStatus::Stale{ reason: format!("cache write failed: {e}"), cached }, None)
                    }
                }
            }
            Err(e) => {
                warn!("failed to fetch feed {}: {e}", feed.name);
                (FeedStatus::Stale{ reason: e.to_string(), cached }, None)
            }
        }
    }

    /// sync all feeds, then rebuild the catalog from all cache files and publish it
    pub async fn refresh (&self, config: &mut SatvisConfig, store: &CatalogStore)->SyncReport {
        let report = self.sync( config).await;
        let catalog = load_catalog( config);

        if catalog.is_empty() && !store.is_empty() {
            warn!("refresh produced an empty catalog, keeping {} records", store.len());
        } else {
            info!("publishing catalog with {} records", catalog.len());
            store.replace( catalog);
        }
        report
    }
}

/// build a catalog from the cache files of all configured feeds. Feeds are loaded in config order, i.e. if
/// several feeds contain the same satellite the record of the last feed wins
pub fn load_catalog (config: &SatvisConfig)->Catalog {
    let mut catalog = Catalog::new();

    for feed in &config.feeds {
        let path = feed.cache_path( &config.cache_dir);
        if !path.is_file() {
            warn!("no cache file for feed {}", feed.name);
            continue
        }

        match read_cache_text( &path) {
            Ok(text) => {
                let n = catalog.len();
                catalog.extend( parse_valid_records( &text, &feed.color));
                debug!("loaded feed {} from {:?}, catalog size {} -> {}", feed.name, path, n, catalog.len());
            }
            Err(e) => warn!("failed to read cache of feed {}: {e}", feed.name)
        }
    }

    catalog
}

fn read_cache_text (path: &Path)->Result<String> {
    let data = filepath_contents( &path)?;
    Ok( unpack_text( &data)? )
}

/// periodically refresh the catalog in a background task. The first refresh happens after `interval`, i.e.
/// callers are expected to do their own initial refresh. A zero interval is rejected
pub fn spawn_refresh_task<F> (synchronizer: Arc<FeedSynchronizer<F>>, config: Arc<Mutex<SatvisConfig>>,
                              store: Arc<CatalogStore>, interval: Duration)->Result<JoinHandle<()>>
    where F: FeedFetcher + 'static
{
    if interval.is_zero() {
        return Err( op_failed!("refresh interval must not be zero"))
    }

    let handle = tokio::spawn( async move {
        let mut timer = tokio::time::interval( interval);
        timer.tick().await; // first tick completes immediately

        loop {
            timer.tick().await;
            let mut config = config.lock().await;
            let report = synchronizer.refresh( &mut config, &store).await;
            info!("scheduled refresh: {} updated, {} stale, catalog size {}", report.n_updated(), report.n_stale(), store.len());
        }
    });
    Ok(handle)
}
