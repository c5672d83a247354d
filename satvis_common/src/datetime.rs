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

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize,Serializer,Deserializer};
use std::time::Duration;
use parse_duration::parse;

use crate::{geo_constants::SECONDS_PER_DAY, TWO_PI};

pub fn utc_now()->DateTime<Utc> {
    Utc::now()
}

/// convert fractional (signed) seconds into a chrono TimeDelta with microsecond resolution
pub fn time_delta_from_fractional_secs (secs: f64) -> TimeDelta {
    TimeDelta::microseconds( (secs * 1_000_000.0).round() as i64)
}

pub fn fractional_secs_of_time_delta (td: &TimeDelta) -> f64 {
    match td.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => td.num_milliseconds() as f64 / 1000.0
    }
}

/// fractional seconds since the unix epoch
pub fn unix_secs (dt: &DateTime<Utc>) -> f64 {
    dt.timestamp() as f64 + (dt.timestamp_subsec_nanos() as f64 / 1e9)
}

/// get UTC datetime from (full) year and fractional day-of-year (1.0 = Jan 1 00:00)
pub fn datetime_from_year_and_doy (year: i32, doy: f64) -> Option<DateTime<Utc>> {
    if !doy.is_finite() || doy < 1.0 || doy >= 367.0 { return None }

    let start = NaiveDate::from_ymd_opt( year, 1, 1)?.and_hms_opt(0, 0, 0)?.and_utc();
    let micros = ((doy - 1.0) * SECONDS_PER_DAY * 1_000_000.0).round() as i64;
    start.checked_add_signed( TimeDelta::microseconds(micros))
}

/// fractional day-of-year (1.0 = Jan 1 00:00) of given datetime, together with its year
pub fn year_and_doy (dt: &DateTime<Utc>) -> (i32, f64) {
    use chrono::Datelike;

    let year = dt.year();
    let start = NaiveDate::from_ymd_opt( year, 1, 1).and_then( |d| d.and_hms_opt(0,0,0)).map( |d| d.and_utc());
    match start {
        Some(start) => {
            let dt_secs = fractional_secs_of_time_delta( &(*dt - start));
            (year, 1.0 + dt_secs / SECONDS_PER_DAY)
        }
        None => (year, dt.ordinal() as f64)
    }
}

/// Greenwich mean sidereal time (IAU-82) in radians for the given UTC time (we use UTC as UT1
/// approximation, which is within the accuracy of SGP4)
pub fn gmst (dt: &DateTime<Utc>) -> f64 {
    let jd_ut1 = unix_secs(dt) / SECONDS_PER_DAY + 2440587.5;
    let t = (jd_ut1 - 2451545.0) / 36525.0;

    let gmst_secs = 67310.54841 + (876600.0 * 3600.0 + 8640184.812866) * t + 0.093104 * t * t - 6.2e-6 * t * t * t;
    let gmst_rad = (gmst_secs.rem_euclid( SECONDS_PER_DAY) / 240.0).to_radians(); // 240 sec per degree
    gmst_rad.rem_euclid( TWO_PI)
}

pub fn deserialize_duration <'a,D>(deserializer: D) -> Result<Duration,D::Error>
    where D: Deserializer<'a>
{
    String::deserialize(deserializer).and_then( |string| {
        parse(string.as_str())
            .map_err( |e| serde::de::Error::custom(format!("{:?}",e)))
    })
}

pub fn deserialize_optional_duration <'a,D>(deserializer: D) -> Result<Option<Duration>,D::Error>
    where D: Deserializer<'a>
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    if let Some(s) = s {
        let d =  parse(s.as_str()).map_err( |e| serde::de::Error::custom(format!("{:?}",e)))?;
        return Ok( Some(d) )
    }

    Ok(None)
}

pub fn serialize_duration<S: Serializer> (dur: &Duration, s: S) -> Result<S::Ok, S::Error>  {
    let dfm = format!("{:?}", dur);
    s.serialize_str(&dfm)
}

pub fn serialize_optional_duration<S>(dur: &Option<Duration>, s: S) -> Result<S::Ok, S::Error>
    where S: Serializer,
{
    if let Some(d) = dur {
        let dfm = format!("{:?}", d);
        return s.serialize_some(&dfm);
    }
    s.serialize_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_doy_roundtrip() {
        let dt = datetime_from_year_and_doy( 2008, 264.51782528).unwrap();
        assert_eq!( dt.format("%Y-%m-%d %H:%M").to_string(), "2008-09-20 12:25");

        let (year, doy) = year_and_doy(&dt);
        assert_eq!( year, 2008);
        assert!( (doy - 264.51782528).abs() < 1e-8);
    }

    #[test]
    fn test_gmst() {
        // Vallado example 3-5: 1992-08-20 12:14 UT1 → GMST 152.578788°
        let dt = Utc.with_ymd_and_hms( 1992, 8, 20, 12, 14, 0).unwrap();
        let g = gmst(&dt).to_degrees();
        assert!( (g - 152.578788).abs() < 0.01, "gmst = {g}");
    }
}
