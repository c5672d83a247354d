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

/// common geodetic constants that should be consistent through satvis crates

/// semi major axis in meters
pub const EQUATORIAL_EARTH_RADIUS: f64 = 6378137.0;

/// semi minor axis in meters
pub const POLAR_EARTH_RADIUS: f64 = 6356752.3142;

pub const EARTH_RADIUS_RATIO: f64 = POLAR_EARTH_RADIUS / EQUATORIAL_EARTH_RADIUS;  // b / a

/// b²/a² - squared ratio of minor/major axis
pub const EARTH_RADIUS_RATIO_SQUARED: f64 = EARTH_RADIUS_RATIO*EARTH_RADIUS_RATIO;

/// first eccentricity of earth
pub const E_EARTH: f64 = 0.08181919092890692;
pub const E_EARTH_SQUARED: f64 = E_EARTH*E_EARTH;

/// WGS84 gravitational parameter in m³/s²
pub const GM_EARTH: f64 = 3.986004418e14;

pub const SECONDS_PER_DAY: f64 = 86400.0;
