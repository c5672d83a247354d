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

//! the tick → propagate → sink cycle. Ticks are strictly sequential: the sink receives all positions of a
//! tick before the next tick is computed

use std::{sync::Arc, time::Duration};
use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};
use tracing::{debug,info};

use crate::{
    catalog::{Catalog,CatalogStore},
    errors::Result,
    propagator::{PropagatedPosition,Propagator},
    sim_clock::SimClock,
    tle::OrbitModel
};

/// what we hand to the renderer for each record and tick
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct TrackedPosition {
    pub sat_id: u32,
    pub name: String,
    pub color: String,
    pub model: OrbitModel,
    pub position: PropagatedPosition,
}

/// the consumer of propagation results (e.g. a map renderer). Returning an error stops the SimulationLoop
pub trait PositionSink {
    fn update (&mut self, date: &DateTime<Utc>, positions: &[TrackedPosition]) -> Result<()>;
}

/// a sink that just collects all ticks - mostly useful for testing and batch processing
impl PositionSink for Vec<(DateTime<Utc>,Vec<TrackedPosition>)> {
    fn update (&mut self, date: &DateTime<Utc>, positions: &[TrackedPosition]) -> Result<()> {
        self.push( (*date, positions.to_vec()) );
        Ok(())
    }
}

pub struct SimulationLoop {
    clock: SimClock,
    propagator: Propagator,
    store: Arc<CatalogStore>,
}

impl SimulationLoop {
    pub fn new (clock: SimClock, propagator: Propagator, store: Arc<CatalogStore>)->Self {
        SimulationLoop { clock, propagator, store }
    }

    pub fn clock (&self)->&SimClock { &self.clock }
    pub fn clock_mut (&mut self)->&mut SimClock { &mut self.clock }
    pub fn propagator (&self)->&Propagator { &self.propagator }

    /// advance the clock and propagate all records of the current catalog snapshot (in catalog order)
    pub fn step (&mut self)->(DateTime<Utc>,Vec<TrackedPosition>) {
        let date = self.clock.tick();
        let catalog = self.store.snapshot(); // a concurrent refresh does not affect this tick
        let positions = positions_at( &self.propagator, &catalog, &date);
        (date, positions)
    }

    /// run ticks until max_ticks is reached (if set) or the sink returns an error. Returns the number of
    /// completed ticks
    pub async fn run<S: PositionSink> (&mut self, sink: &mut S, pacing: Duration, max_ticks: Option<usize>)->Result<usize> {
        let mut n_ticks = 0;
        info!("starting simulation loop at {} for observer {}", self.clock.now(), self.propagator.observer());

        while max_ticks.map( |max| n_ticks < max).unwrap_or(true) {
            let (date, positions) = self.step();
            debug!("tick {} at {}: {} positions", n_ticks, date, positions.len());

            sink.update( &date, &positions)?;
            n_ticks += 1;

            if !pacing.is_zero() && max_ticks.map( |max| n_ticks < max).unwrap_or(true) {
                tokio::time::sleep( pacing).await;
            }
        }

        info!("simulation loop terminated after {} ticks", n_ticks);
        Ok(n_ticks)
    }
}

/// propagate all records of a catalog for the given time. Diverging records are reported as
/// `PropagatedPosition::Invalid`, they don't affect other records
pub fn positions_at (propagator: &Propagator, catalog: &Catalog, date: &DateTime<Utc>)->Vec<TrackedPosition> {
    catalog.iter().map( |rec| {
        TrackedPosition {
            sat_id: rec.sat_id,
            name: rec.name.clone(),
            color: rec.color.clone(),
            model: rec.model,
            position: propagator.propagate( rec, date)
        }
    }).collect()
}
