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

use std::{path::PathBuf, sync::Arc};
use anyhow::{anyhow,bail,Result};
use chrono::{DateTime,Utc};
use clap::Parser;
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;
use satvis_orbital::{
    load_config, load_catalog, spawn_refresh_task, CatalogStore, FeedSynchronizer, ObserverLocation, PositionSink,
    PropagatedPosition, Propagator, SimClock, SimulationLoop, TrackedPosition
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "print observer relative positions of satellites from configured TLE feeds")]
pub struct Args {
    /// the config file (also stores feed freshness state)
    #[arg(short,long, default_value = "satvis.ron")]
    pub config: PathBuf,

    /// observer latitude in degrees (overrides config)
    #[arg(long, allow_hyphen_values=true)]
    pub lat: Option<f64>,

    /// observer longitude in degrees (overrides config)
    #[arg(long, allow_hyphen_values=true)]
    pub lon: Option<f64>,

    /// observer elevation in meters
    #[arg(long, default_value_t = 0.0, allow_hyphen_values=true)]
    pub elevation: f64,

    /// simulation start (RFC 3339), defaults to now
    #[arg(long)]
    pub start: Option<String>,

    /// number of ticks to run (unbounded if not set)
    #[arg(short,long)]
    pub ticks: Option<usize>,

    /// only print satellites above the observer horizon
    #[arg(long)]
    pub visible_only: bool,

    /// don't check remote feeds, just use cached files
    #[arg(long)]
    pub no_sync: bool,
}

struct ConsoleSink {
    visible_only: bool
}

impl PositionSink for ConsoleSink {
    fn update (&mut self, date: &DateTime<Utc>, positions: &[TrackedPosition]) -> satvis_orbital::Result<()> {
        println!("------- {}", date.format("%Y-%m-%dT%H:%M:%S%.3fZ"));

        for tp in positions {
            match &tp.position {
                PropagatedPosition::Valid(sp) => {
                    if !self.visible_only || sp.is_visible() {
                        println!("{:>6} {:<24} {:<8} {:>8.3}° {:>9.3}° {:>8.1}km  az {:>6.1}° el {:>6.1}° {:>9.1}km",
                            tp.sat_id, tp.name, tp.color, sp.latitude, sp.longitude, sp.height / 1000.0,
                            sp.azimuth, sp.elevation, sp.range / 1000.0);
                    }
                }
                PropagatedPosition::Invalid => {
                    if !self.visible_only {
                        println!("{:>6} {:<24} {:<8} -- invalid ({}) --", tp.sat_id, tp.name, tp.color, tp.model);
                    }
                }
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())  // use RUST_LOG to set max level
        .init();

    let args = Args::parse();
    let mut config = load_config( &args.config)?;

    let observer = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => ObserverLocation::new( lat, lon, args.elevation)?,
        (None, None) => config.observer.ok_or( anyhow!("no observer location (use --lat/--lon or set it in config)"))?,
        _ => bail!("observer location needs both --lat and --lon")
    };

    let store = Arc::new( CatalogStore::default());
    let synchronizer = Arc::new( FeedSynchronizer::with_http( Some(args.config.clone())));

    if args.no_sync {
        store.replace( load_catalog( &config));
    } else {
        let report = synchronizer.refresh( &mut config, &store).await;
        println!("{report}");
    }

    if store.is_empty() {
        bail!("no orbital records available")
    }
    println!("tracking {} satellites from {}", store.len(), observer);

    let clock = if config.wall_clock {
        SimClock::wall_clock()
    } else {
        let start = match &args.start {
            Some(start) => DateTime::parse_from_rfc3339( start)?.with_timezone(&Utc),
            None => Utc::now()
        };
        SimClock::new( start, config.sim_step_secs)
    };

    let refresh_task = match config.refresh_interval.filter( |_| !args.no_sync) {
        Some(interval) => Some( spawn_refresh_task( synchronizer.clone(), Arc::new( Mutex::new( config.clone())), store.clone(), interval)?),
        None => None
    };

    let mut sim = SimulationLoop::new( clock, Propagator::new( observer), store);
    let mut sink = ConsoleSink { visible_only: args.visible_only };
    sim.run( &mut sink, config.tick_pacing, args.ticks).await?;

    if let Some(task) = refresh_task {
        task.abort();
    }

    Ok(())
}
