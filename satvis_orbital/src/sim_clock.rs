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

//! the simulation clock that drives propagation. The clock does not do any pacing - it only computes the
//! timestamp of the next tick. Pacing in real time is the job of the SimulationLoop

use chrono::{DateTime,TimeDelta,Utc};
use serde::{Serialize,Deserialize};
use satvis_common::datetime::{utc_now,time_delta_from_fractional_secs,fractional_secs_of_time_delta};

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum ClockMode {
    /// advance the simulated time by a (signed) step per tick
    Simulated,
    /// each tick returns the current UTC time
    WallClock
}

#[derive(Debug,Clone,PartialEq)]
pub struct SimulationState {
    pub date: DateTime<Utc>,
    pub step: TimeDelta,
    pub mode: ClockMode,
}

#[derive(Debug,Clone)]
pub struct SimClock {
    state: SimulationState
}

impl SimClock {
    /// a simulated clock starting at `start` and advancing `step_secs` (which can be negative or zero) per tick
    pub fn new (start: DateTime<Utc>, step_secs: f64)->Self {
        let state = SimulationState { date: start, step: time_delta_from_fractional_secs( step_secs), mode: ClockMode::Simulated };
        SimClock { state }
    }

    pub fn wall_clock ()->Self {
        let state = SimulationState { date: utc_now(), step: TimeDelta::zero(), mode: ClockMode::WallClock };
        SimClock { state }
    }

    /// advance the clock and return the new simulated timestamp
    pub fn tick (&mut self)->DateTime<Utc> {
        match self.state.mode {
            ClockMode::Simulated => {
                // at the representable limits we just stay put
                if let Some(date) = self.state.date.checked_add_signed( self.state.step) {
                    self.state.date = date;
                }
            }
            ClockMode::WallClock => {
                self.state.date = utc_now();
            }
        }
        self.state.date
    }

    pub fn now (&self)->DateTime<Utc> {
        self.state.date
    }

    pub fn set_step (&mut self, step_secs: f64) {
        self.state.step = time_delta_from_fractional_secs( step_secs);
    }

    pub fn step_secs (&self)->f64 {
        fractional_secs_of_time_delta( &self.state.step)
    }

    pub fn set_date (&mut self, date: DateTime<Utc>) {
        self.state.date = date;
    }

    pub fn set_mode (&mut self, mode: ClockMode) {
        self.state.mode = mode;
    }

    pub fn state (&self)->&SimulationState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_forward_backward() {
        let t0 = Utc.with_ymd_and_hms( 2025, 3, 17, 22, 0, 0).unwrap();
        let mut clock = SimClock::new( t0, 30.5);

        for _ in 0..10 { clock.tick(); }
        assert_eq!( clock.now(), t0 + TimeDelta::milliseconds(305_000));

        clock.set_step( -30.5);
        for _ in 0..10 { clock.tick(); }
        assert_eq!( clock.now(), t0);
    }

    #[test]
    fn test_frozen() {
        let t0 = Utc.with_ymd_and_hms( 2025, 3, 17, 22, 0, 0).unwrap();
        let mut clock = SimClock::new( t0, 0.0);
        assert_eq!( clock.tick(), t0);
        assert_eq!( clock.tick(), t0);
    }

    #[test]
    fn test_wall_clock() {
        let mut clock = SimClock::wall_clock();
        let t0 = utc_now();
        let t1 = clock.tick();
        assert!( t1 >= t0);
        assert_eq!( clock.state().mode, ClockMode::WallClock);
    }
}
