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

//! angle normalization. Latitudes are kept in [-90,90], longitudes in [-180,180) and
//! full circle angles (azimuth, RAAN) in [0,360)

/// normalize to the half-open interval [-180,180)
#[inline]
pub fn normalize_180 (d: f64) -> f64 {
    let x = (d + 180.0).rem_euclid(360.0) - 180.0;
    if x >= 180.0 { x - 360.0 } else { x } // rem_euclid can round up to 360.0
}

/// normalize to the half-open interval [0,360)
#[inline]
pub fn normalize_360 (d: f64) -> f64 {
    let x = d.rem_euclid(360.0);
    if x >= 360.0 { 0.0 } else { x }
}

#[inline]
pub fn is_valid_latitude (d: f64) -> bool {
    d.is_finite() && d >= -90.0 && d <= 90.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_180() {
        assert_eq!( normalize_180(180.0), -180.0);
        assert_eq!( normalize_180(-180.0), -180.0);
        assert_eq!( normalize_180(190.0), -170.0);
        assert_eq!( normalize_180(-190.0), 170.0);
        assert_eq!( normalize_180(540.0), -180.0);
        assert_eq!( normalize_180(42.5), 42.5);
    }

    #[test]
    fn test_normalize_360() {
        assert_eq!( normalize_360(-10.0), 350.0);
        assert_eq!( normalize_360(360.0), 0.0);
        assert_eq!( normalize_360(725.0), 5.0);
    }
}
