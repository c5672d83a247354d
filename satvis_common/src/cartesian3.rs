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

use std::ops::Sub;
use serde::{Serialize,Deserialize};
use crate::geo_constants::{EARTH_RADIUS_RATIO_SQUARED, EQUATORIAL_EARTH_RADIUS, E_EARTH_SQUARED};
use crate::cartographic::Cartographic;

/// note that we do not use uom here to allow for abstract coordinate systems (TEME and ECEF are
/// both represented as Cartesian3, in meters)
#[derive(Debug,Clone,Copy,Serialize,Deserialize,PartialEq)]
pub struct Cartesian3 {
    pub x: f64,
    pub y: f64,
    pub z: f64
}

impl Cartesian3 {
    pub fn new (x: f64, y: f64, z: f64)->Cartesian3 {
        Cartesian3{x,y,z}
    }

    pub fn zero ()->Cartesian3 {
        Cartesian3{x: 0.0, y: 0.0, z: 0.0}
    }

    pub fn length(&self) -> f64 {
        ((self.x * self.x) + (self.y * self.y) + (self.z * self.z)).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// rotate a TEME (true equator, mean equinox) position into the earth fixed frame, given the
    /// Greenwich mean sidereal time in radians. Polar motion is ignored
    pub fn teme_to_ecef (&self, gmst: f64) -> Cartesian3 {
        let (sin_g, cos_g) = gmst.sin_cos();
        Cartesian3 {
            x:  cos_g * self.x + sin_g * self.y,
            y: -sin_g * self.x + cos_g * self.y,
            z:  self.z
        }
    }

    /// rotate an ECEF difference vector into the local east-north-up frame of a geodetic reference
    /// point (angles in radians)
    pub fn to_enu (&self, latitude: f64, longitude: f64) -> Cartesian3 {
        let (sin_φ, cos_φ) = latitude.sin_cos();
        let (sin_λ, cos_λ) = longitude.sin_cos();

        Cartesian3 {
            x: -sin_λ * self.x + cos_λ * self.y,
            y: -sin_φ * cos_λ * self.x - sin_φ * sin_λ * self.y + cos_φ * self.z,
            z:  cos_φ * cos_λ * self.x + cos_φ * sin_λ * self.y + sin_φ * self.z
        }
    }
}

impl std::fmt::Display for Cartesian3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[ {}, {}, {} ]", self.x, self.y, self.z)
    }
}

impl Sub for Cartesian3 {
    type Output = Self;

    fn sub (self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z
        }
    }
}

impl Sub for &Cartesian3 {
    type Output = Cartesian3;

    fn sub (self, rhs: &Cartesian3) -> Cartesian3 {
        Cartesian3 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z
        }
    }
}

/// convert WGS84 into ECEF coordinates
impl From<Cartographic> for Cartesian3 {
    fn from(p: Cartographic) -> Self {
        Cartesian3::from(&p)
    }
}

impl From<&Cartographic> for Cartesian3 {
    fn from(p: &Cartographic) -> Self {
        let φ = p.latitude;
        let λ = p.longitude;
        let h = p.height;

        let sin_φ = φ.sin();
        let cos_φ = φ.cos();

        let b = EQUATORIAL_EARTH_RADIUS / ( 1.0 - E_EARTH_SQUARED* (sin_φ * sin_φ)).sqrt();
        let c = (b + h)*cos_φ;

        let x = c *  λ.cos();
        let y = c *  λ.sin();
        let z = (EARTH_RADIUS_RATIO_SQUARED * b + h) * sin_φ;

        Cartesian3::new( x, y, z)
    }
}
