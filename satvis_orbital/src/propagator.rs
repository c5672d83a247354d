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

//! observer relative propagation of orbital records. We use satkit's SGP4 implementation (which switches to
//! SDP4 for deep space orbits) to get TEME positions, rotate them into the earth fixed frame by means of
//! the Greenwich mean sidereal time and then compute sub-satellite points and look angles from the observer

use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};
use satkit::sgp4::{sgp4,SGP4Error};
use tracing::debug;
use satvis_common::{
    angle::{normalize_180,is_valid_latitude},
    cartesian3::Cartesian3,
    cartographic::Cartographic,
    datetime::gmst,
    geo_constants::POLAR_EARTH_RADIUS
};

use crate::{
    errors::{SatvisOrbitalError,Result},
    instant_from_datetime,
    tle::{OrbitModel,OrbitalRecord}
};

/// margin above the apogee radius we still accept for near earth orbits (drag free SGP4 can overshoot)
const NEAR_EARTH_RADIUS_MARGIN: f64 = 500_000.0;

/// factor of the apogee radius we still accept for deep space orbits (lunar/solar perturbations)
const DEEP_SPACE_RADIUS_FACTOR: f64 = 1.5;

/// the ground position of the observer. Angles are in degrees, elevation in meters above the ellipsoid
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
#[serde(try_from="RawObserver")]
pub struct ObserverLocation {
    latitude: f64,
    longitude: f64,
    elevation: f64,
}

#[derive(Deserialize)]
struct RawObserver {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    elevation: f64,
}

impl TryFrom<RawObserver> for ObserverLocation {
    type Error = SatvisOrbitalError;

    fn try_from (raw: RawObserver)->Result<Self> {
        ObserverLocation::new( raw.latitude, raw.longitude, raw.elevation)
    }
}

impl ObserverLocation {
    /// create a validated observer location. Longitudes are normalized to [-180,180)
    pub fn new (latitude: f64, longitude: f64, elevation: f64)->Result<Self> {
        if !latitude.is_finite() || !is_valid_latitude( latitude) {
            return Err( SatvisOrbitalError::ObserverError( format!("latitude out of range: {latitude}")))
        }
        if !longitude.is_finite() {
            return Err( SatvisOrbitalError::ObserverError( format!("invalid longitude: {longitude}")))
        }
        if !elevation.is_finite() {
            return Err( SatvisOrbitalError::ObserverError( format!("invalid elevation: {elevation}")))
        }

        Ok( ObserverLocation { latitude, longitude: normalize_180( longitude), elevation } )
    }

    pub fn latitude (&self)->f64 { self.latitude }
    pub fn longitude (&self)->f64 { self.longitude }
    pub fn elevation (&self)->f64 { self.elevation }

    pub fn to_cartographic (&self)->Cartographic {
        Cartographic::from_degrees( self.longitude, self.latitude, self.elevation)
    }
}

impl std::fmt::Display for ObserverLocation {
    fn fmt (&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}°,{:.4}° ({:.0}m)", self.latitude, self.longitude, self.elevation)
    }
}

/// geographic sub-satellite point and observer relative look angles
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct SubPoint {
    pub latitude: f64,  // degrees
    pub longitude: f64, // degrees [-180,180)
    pub height: f64,    // meters above ellipsoid
    pub range: f64,     // slant range from observer in meters
    pub azimuth: f64,   // degrees [0,360)
    pub elevation: f64, // degrees above observer horizon
}

impl SubPoint {
    pub fn is_visible (&self)->bool {
        self.elevation > 0.0
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub enum PropagatedPosition {
    Valid(SubPoint),
    /// the propagator diverged (decayed orbit, numerically unstable elements etc.)
    Invalid
}

impl PropagatedPosition {
    pub fn is_valid (&self)->bool {
        matches!( self, PropagatedPosition::Valid(_))
    }

    pub fn sub_point (&self)->Option<&SubPoint> {
        match self {
            PropagatedPosition::Valid(sp) => Some(sp),
            PropagatedPosition::Invalid => None
        }
    }

    pub fn is_visible (&self)->bool {
        self.sub_point().map( |sp| sp.is_visible()).unwrap_or(false)
    }
}

/// propagates records for a fixed observer. This is stateless and deterministic - the same record and
/// time always produce the same position
#[derive(Debug,Clone)]
pub struct Propagator {
    observer: ObserverLocation,
    observer_pos: Cartographic,
}

impl Propagator {
    pub fn new (observer: ObserverLocation)->Self {
        let observer_pos = observer.to_cartographic();
        Propagator { observer, observer_pos }
    }

    pub fn observer (&self)->&ObserverLocation {
        &self.observer
    }

    pub fn propagate (&self, rec: &OrbitalRecord, date: &DateTime<Utc>)->PropagatedPosition {
        let tvec = vec![ instant_from_datetime( *date) ];
        let (pteme, _vteme, errs) = sgp4( &mut rec.tle().clone(), &tvec); // sgp4 mutates its TLE argument

        if pteme.ncols() == 0 {
            return PropagatedPosition::Invalid
        }
        if errs.first().is_some_and( |e| !matches!( e, SGP4Error::SGP4Success)) {
            debug!("sgp4 failed for {} at {}", rec.sat_id, date); // decayed or diverging elements
            return PropagatedPosition::Invalid
        }

        let p = Cartesian3::new( pteme[(0,0)], pteme[(1,0)], pteme[(2,0)]);
        self.position_from_teme( rec, date, &p)
    }

    /// turn a TEME position (in meters) of rec at the given time into a PropagatedPosition. Non-finite
    /// positions or radii outside of what the orbit model allows are reported as Invalid
    pub fn position_from_teme (&self, rec: &OrbitalRecord, date: &DateTime<Utc>, p_teme: &Cartesian3)->PropagatedPosition {
        if !p_teme.is_finite() {
            debug!("non-finite position for {} at {}", rec.sat_id, date);
            return PropagatedPosition::Invalid
        }

        let r = p_teme.length();
        let r_max = max_radius( rec);
        if r < POLAR_EARTH_RADIUS || r > r_max {
            debug!("implausible orbit radius {:.0}m for {} at {} (max {:.0}m)", r, rec.sat_id, date, r_max);
            return PropagatedPosition::Invalid
        }

        let p_ecef = p_teme.teme_to_ecef( gmst(date));
        let geo = Cartographic::from( &p_ecef);
        let look = self.observer_pos.look_angles( &p_ecef);

        PropagatedPosition::Valid( SubPoint {
            latitude: geo.latitude_deg(),
            longitude: geo.longitude_deg(),
            height: geo.height,
            range: look.range,
            azimuth: look.azimuth,
            elevation: look.elevation
        })
    }
}

fn max_radius (rec: &OrbitalRecord)->f64 {
    let r_apogee = rec.elements.apogee_radius();
    match rec.model {
        OrbitModel::NearEarth => r_apogee + NEAR_EARTH_RADIUS_MARGIN,
        OrbitModel::DeepSpace => r_apogee * DEEP_SPACE_RADIUS_FACTOR,
    }
}
