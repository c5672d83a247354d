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

//! persisted configuration of the orbital engine. This is also where we keep the freshness state of
//! our feeds (etag and size of the last successful download), i.e. the synchronizer gets a `&mut SatvisConfig`
//! and we store the config back after each sync pass

use std::{path::{Path,PathBuf}, time::Duration};
use serde::{Serialize,Deserialize};
use satvis_common::{
    is_none,
    datetime::{deserialize_duration,serialize_duration,deserialize_optional_duration,serialize_optional_duration},
    fs::{filepath_contents_as_string,write_atomic},
    net::url_file_name
};

use crate::{errors::Result, propagator::ObserverLocation};

/// a remote source of element sets that is cached in a local file
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct FeedDescriptor {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub file: String,  // local cache filename (within SatvisConfig::cache_dir), defaults to the url filename
    pub color: String, // display color for all records of this feed

    // the last observed freshness state - only updated after the cache file was written
    #[serde(default,skip_serializing_if="is_none")]
    pub etag: Option<String>,
    #[serde(default,skip_serializing_if="is_none")]
    pub size: Option<u64>,
}

impl FeedDescriptor {
    pub fn new (name: impl ToString, url: impl ToString, file: impl ToString, color: impl ToString)->Self {
        FeedDescriptor {
            name: name.to_string(),
            url: url.to_string(),
            file: file.to_string(),
            color: color.to_string(),
            etag: None,
            size: None
        }
    }

    pub fn cache_file_name (&self)->&str {
        if self.file.is_empty() {
            url_file_name( &self.url).unwrap_or( &self.name)
        } else {
            &self.file
        }
    }

    pub fn cache_path (&self, cache_dir: &Path)->PathBuf {
        cache_dir.join( self.cache_file_name())
    }
}

#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct SatvisConfig {
    pub cache_dir: PathBuf,
    pub feeds: Vec<FeedDescriptor>,

    /// simulated seconds per tick (negative runs backwards, zero freezes the clock)
    #[serde(default="default_sim_step_secs")]
    pub sim_step_secs: f64,

    /// if set each tick uses the current UTC time instead of advancing by sim_step_secs
    #[serde(default)]
    pub wall_clock: bool,

    /// real time between ticks
    #[serde(deserialize_with="deserialize_duration",serialize_with="serialize_duration",default="default_tick_pacing")]
    pub tick_pacing: Duration,

    #[serde(deserialize_with="deserialize_optional_duration",serialize_with="serialize_optional_duration",default,skip_serializing_if="is_none")]
    pub refresh_interval: Option<Duration>,

    #[serde(default,skip_serializing_if="is_none")]
    pub observer: Option<ObserverLocation>,
}

fn default_sim_step_secs()->f64 { 1.0 }
fn default_tick_pacing()->Duration { Duration::from_millis(250) }

impl SatvisConfig {
    pub fn new (cache_dir: impl Into<PathBuf>, feeds: Vec<FeedDescriptor>)->Self {
        SatvisConfig {
            cache_dir: cache_dir.into(),
            feeds,
            sim_step_secs: default_sim_step_secs(),
            wall_clock: false,
            tick_pacing: default_tick_pacing(),
            refresh_interval: None,
            observer: None
        }
    }

    pub fn feed (&self, name: &str)->Option<&FeedDescriptor> {
        self.feeds.iter().find( |f| f.name == name)
    }
}

pub fn load_config (path: impl AsRef<Path>) -> Result<SatvisConfig> {
    let contents = filepath_contents_as_string( &path.as_ref())?;
    Ok( ron::from_str(&contents)? )
}

/// store config so that a concurrent or interrupted writer never leaves a truncated file behind
pub fn store_config (path: impl AsRef<Path>, config: &SatvisConfig) -> Result<()> {
    let contents = ron::ser::to_string_pretty( config, ron::ser::PrettyConfig::default())?;
    write_atomic( path, contents.as_bytes())?;
    Ok(())
}
