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
#![allow(uncommon_codepoints)]


pub mod macros;
pub mod fs;
pub mod net;
pub mod compress;
pub mod datetime;
pub mod angle;
pub mod geo_constants;
pub mod cartesian3;
pub mod cartographic;

// syntactic sugar - this is just more readable in many cases
#[inline(always)] pub fn asin(x:f64) -> f64 {x.asin() }
#[inline(always)] pub fn atan2(y:f64,x:f64) -> f64 { y.atan2(x) }
#[inline(always)] pub fn pow2(x:f64) -> f64 { x*x }

pub const TWO_PI: f64 = std::f64::consts::PI * 2.0;

// a global fn that can be used with serde(skip_serializing_if="satvis_common::is_none")
#[inline] pub fn is_none<T> (opt: &Option<T>)->bool { opt.is_none() }
