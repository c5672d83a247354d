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

use chrono::{DateTime,TimeZone};
use satkit::Instant;

pub mod errors;
pub use errors::{SatvisOrbitalError,Result};

pub mod config;
pub mod tle;
pub mod catalog;
pub mod propagator;
pub mod sim_clock;
pub mod sim_loop;
pub mod feed_sync;

pub use config::{SatvisConfig,FeedDescriptor,load_config,store_config};
pub use tle::{OrbitalRecord,OrbitalElements,OrbitModel,parse_records,parse_valid_records};
pub use catalog::{Catalog,CatalogStore};
pub use propagator::{ObserverLocation,Propagator,PropagatedPosition,SubPoint};
pub use sim_clock::{SimClock,SimulationState,ClockMode};
pub use sim_loop::{SimulationLoop,TrackedPosition,PositionSink};
pub use feed_sync::{FeedFetcher,HttpFeedFetcher,FeedSynchronizer,FeedStatus,SyncReport,load_catalog,spawn_refresh_task};
pub use satvis_common::net::ConditionalResponse;

//--- general utility functions

pub fn instant_from_datetime<Z> (dt: DateTime<Z>)->Instant where Z:TimeZone {
    Instant::from_unixtime( dt.timestamp_millis() as f64 / 1000.0)
}

