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

//! parsing of NORAD two-line element sets (TLE) as they are distributed by celestrak and others.
//! Input text can contain any number of two- or three-line groups (the latter with a leading name line
//! that is optionally prefixed by `0 `). Element sets that fail to parse only invalidate themselves - the
//! rest of the input is still processed.
//!
//! Column layout (1-based, inclusive):
//! ```text
//! 1 NNNNNC NNNNNAAA NNNNN.NNNNNNNN +.NNNNNNNN +NNNNN-N +NNNNN-N N NNNNN
//! 2 NNNNN NNN.NNNN NNN.NNNN NNNNNNN NNN.NNNN NNN.NNNN NN.NNNNNNNNNNNNNN
//! ```

use std::{fmt, iter::Peekable, ops::Range, str::Lines};
use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};
use satkit::TLE;
use tracing::warn;
use satvis_common::{
    TWO_PI, pow2,
    datetime::{datetime_from_year_and_doy,year_and_doy},
    geo_constants::{GM_EARTH,SECONDS_PER_DAY}
};

use crate::errors::{tle_error, SatvisOrbitalError, Result};

pub const TLE_LINE_LEN: usize = 69;

/// orbits with a period of at least this many minutes are propagated with the deep space (SDP4) model
pub const DEEP_SPACE_PERIOD_MINUTES: f64 = 225.0;

const NDOT_MAX: f64 = 0.99999999; // largest value the ".NNNNNNNN" field can hold

const ALPHA5_LETTERS: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ"; // no 'I' and 'O'

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum OrbitModel {
    NearEarth,
    DeepSpace
}

impl OrbitModel {
    pub fn for_mean_motion (rev_per_day: f64)->Self {
        if 1440.0 / rev_per_day >= DEEP_SPACE_PERIOD_MINUTES { OrbitModel::DeepSpace } else { OrbitModel::NearEarth }
    }
}

impl fmt::Display for OrbitModel {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrbitModel::NearEarth => write!(f, "SGP4"),
            OrbitModel::DeepSpace => write!(f, "SDP4"),
        }
    }
}

/// the mean orbital elements of a TLE. Angles are in degrees, mean motion in rev/day
#[derive(Debug,Clone,PartialEq)]
pub struct OrbitalElements {
    pub epoch: DateTime<Utc>,
    pub mean_motion_dot: f64,  // first derivative of mean motion / 2 [rev/day²]
    pub mean_motion_ddot: f64, // second derivative of mean motion / 6 [rev/day³]
    pub bstar: f64,            // drag term [1/earth radii]
    pub ephemeris_type: u8,
    pub element_set_no: u32,
    pub inclination: f64,
    pub raan: f64,
    pub eccentricity: f64,
    pub arg_of_perigee: f64,
    pub mean_anomaly: f64,
    pub mean_motion: f64,
    pub rev_number: u32,
}

impl OrbitalElements {
    pub fn period_minutes (&self)->f64 {
        1440.0 / self.mean_motion
    }

    /// semi major axis in meters (Kepler's third law, no J2 correction)
    pub fn semi_major_axis (&self)->f64 {
        let n = self.mean_motion * TWO_PI / SECONDS_PER_DAY; // rad/sec
        (GM_EARTH / pow2(n)).cbrt()
    }

    pub fn apogee_radius (&self)->f64 {
        self.semi_major_axis() * (1.0 + self.eccentricity)
    }
}

/// a validated element set of a single satellite, together with the display color of the feed it came from
#[derive(Debug,Clone)]
pub struct OrbitalRecord {
    pub sat_id: u32,
    pub name: String,
    pub classification: char,
    pub intl_designator: String,
    pub elements: OrbitalElements,
    pub color: String,
    pub model: OrbitModel,

    tle: TLE, // the propagator input
}

impl OrbitalRecord {
    /// the satkit TLE for this record. Note that sgp4() mutates its TLE argument so callers have to clone
    pub fn tle (&self)->&TLE {
        &self.tle
    }

    pub fn epoch (&self)->DateTime<Utc> {
        self.elements.epoch
    }

    /// canonical (69 column) TLE lines for this record, with re-computed checksums
    pub fn to_tle_lines (&self)->(String,String) {
        format_tle_lines( self.sat_id, self.classification, &self.intl_designator, &self.elements)
    }
}

pub fn format_tle_lines (sat_id: u32, classification: char, intl_designator: &str, e: &OrbitalElements)->(String,String) {
    let (year, doy) = year_and_doy( &e.epoch);
    let sat_num = format_sat_id( sat_id);
    let intl: String = intl_designator.chars().take(8).collect();

    let line1 = format!("1 {}{} {:<8} {:02}{:012.8} {} {} {} {} {:>4}",
        sat_num, classification, intl, year.rem_euclid(100), doy,
        format_ndot( e.mean_motion_dot), format_exp_field( e.mean_motion_ddot), format_exp_field( e.bstar),
        e.ephemeris_type % 10, e.element_set_no % 10000);

    let ecc = (e.eccentricity * 1e7).round() as u64;
    let line2 = format!("2 {} {:>8.4} {:>8.4} {:07} {:>8.4} {:>8.4} {:>11.8}{:>5}",
        sat_num, e.inclination, e.raan, ecc.min(9_999_999), e.arg_of_perigee, e.mean_anomaly,
        e.mean_motion, e.rev_number % 100000);

    (with_checksum(line1), with_checksum(line2))
}

impl fmt::Display for OrbitalRecord {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {}, epoch {})", self.name, self.sat_id, self.model, self.elements.epoch.format("%Y-%m-%dT%H:%M:%S"))
    }
}

//--- parsing

/// lazy iterator over the element sets contained in some text. Each item is either a valid record or the
/// error that invalidated its group of lines
pub struct TleRecords<'a> {
    lines: Peekable<Lines<'a>>,
    color: &'a str,
}

impl<'a> Iterator for TleRecords<'a> {
    type Item = Result<OrbitalRecord>;

    fn next (&mut self)->Option<Self::Item> {
        let mut name: Option<&'a str> = None;

        while let Some(line) = self.lines.next() {
            let line = line.trim_end();

            if line.trim_start().is_empty() {
                name = None;

            } else if is_element_line( line, b'1') {
                let next = self.lines.peek().copied().map( str::trim_end);
                return match next {
                    Some(line2) if is_element_line( line2, b'2') => {
                        self.lines.next();
                        Some( parse_record( name, line, line2, self.color))
                    }
                    Some(line2) if is_broken_line2( line2) => {
                        self.lines.next(); // consumed so that it can't become the name of the next record
                        Some( Err( tle_error!("invalid line 2 '{}' for line 1: '{}'", line2, line)))
                    }
                    _ => Some( Err( tle_error!("line 1 without line 2: '{}'", line)))
                }

            } else if is_element_line( line, b'2') {
                return Some( Err( tle_error!("line 2 without line 1: '{}'", line)))

            } else if line.len() >= TLE_LINE_LEN-1 {
                warn!("ignoring unrecognized element line: '{line}'");
                name = None;

            } else {
                name = Some(line);
            }
        }
        None
    }
}

/// return a lazy iterator over all (valid or invalid) element sets in `text`. Records are tagged with `color`
pub fn parse_records<'a> (text: &'a str, color: &'a str)->TleRecords<'a> {
    TleRecords { lines: text.lines().peekable(), color }
}

/// lazy iterator over all valid records in `text`. Invalid element sets are logged and skipped
pub fn parse_valid_records<'a> (text: &'a str, color: &'a str)->impl Iterator<Item=OrbitalRecord> + 'a {
    parse_records( text, color).filter_map( |res| match res {
        Ok(rec) => Some(rec),
        Err(e) => { warn!("dropping element set: {e}"); None }
    })
}

fn is_element_line (line: &str, line_no: u8)->bool {
    let bs = line.as_bytes();
    bs.len() > 20 && bs[0] == line_no && bs[1] == b' '
}

/// a non-blank line following line 1 that is meant to be its line 2 but is malformed
fn is_broken_line2 (line: &str)->bool {
    !line.trim_start().is_empty() && (line.starts_with('2') || line.len() >= TLE_LINE_LEN-1)
}

/// parse a single element set from its two lines (and optional name line)
pub fn parse_record (name: Option<&str>, line1: &str, line2: &str, color: &str)->Result<OrbitalRecord> {
    let line1 = line1.trim_end();
    let line2 = line2.trim_end();
    check_line( line1, b'1')?;
    check_line( line2, b'2')?;

    let sat_id = parse_sat_id( field( line1, 2..7))?;
    let sat_id2 = parse_sat_id( field( line2, 2..7))?;
    if sat_id != sat_id2 {
        return Err( tle_error!("inconsistent satellite numbers {} and {}", sat_id, sat_id2))
    }

    let classification = line1[7..8].chars().next().filter( |c| !c.is_whitespace()).unwrap_or('U');
    let intl_designator = field( line1, 9..17).to_string();

    let yy: i32 = parse_num( line1, 18..20, "epoch year")?;
    let year = if yy < 57 { 2000 + yy } else { 1900 + yy };
    let doy: f64 = parse_num( line1, 20..32, "epoch day")?;
    let epoch = datetime_from_year_and_doy( year, doy).ok_or( tle_error!("invalid epoch day {} of {}", doy, year))?;

    let mean_motion_dot: f64 = parse_num( line1, 33..43, "mean motion dot")?;
    let mean_motion_ddot = parse_exp_field( field( line1, 44..52)).ok_or( tle_error!("invalid mean motion ddot '{}'", &line1[44..52]))?;
    let bstar = parse_exp_field( field( line1, 53..61)).ok_or( tle_error!("invalid bstar '{}'", &line1[53..61]))?;
    let ephemeris_type: u8 = parse_num_or_zero( line1, 62..63, "ephemeris type")?;
    let element_set_no: u32 = parse_num_or_zero( line1, 64..68, "element set number")?;

    let inclination: f64 = parse_num( line2, 8..16, "inclination")?;
    let raan: f64 = parse_num( line2, 17..25, "right ascension")?;
    let ecc_digits = field( line2, 26..33);
    if ecc_digits.is_empty() || !ecc_digits.bytes().all( |b| b.is_ascii_digit()) {
        return Err( tle_error!("invalid eccentricity '{}'", ecc_digits))
    }
    let eccentricity: f64 = format!("0.{ecc_digits}").parse().map_err( |_| tle_error!("invalid eccentricity '{}'", ecc_digits))?;
    let arg_of_perigee: f64 = parse_num( line2, 34..42, "argument of perigee")?;
    let mean_anomaly: f64 = parse_num( line2, 43..51, "mean anomaly")?;
    let mean_motion: f64 = parse_num( line2, 52..63, "mean motion")?;
    let rev_number: u32 = parse_num_or_zero( line2, 63..68, "revolution number")?;

    if !(0.0..=180.0).contains( &inclination) { return Err( tle_error!("inclination out of range: {}", inclination)) }
    if !(mean_motion > 0.0) { return Err( tle_error!("non-positive mean motion: {}", mean_motion)) }

    let elements = OrbitalElements {
        epoch, mean_motion_dot, mean_motion_ddot, bstar, ephemeris_type, element_set_no,
        inclination, raan, eccentricity, arg_of_perigee, mean_anomaly, mean_motion, rev_number
    };
    let model = OrbitModel::for_mean_motion( mean_motion);
    let name = name.map( |n| n.trim()).map( |n| n.strip_prefix("0 ").unwrap_or(n).trim())
        .filter( |n| !n.is_empty())
        .map( |n| n.to_string())
        .unwrap_or_else( || sat_id.to_string());

    // satkit gets the original lines if they are complete, canonical ones otherwise
    let tle = if line1.len() == TLE_LINE_LEN && line2.len() == TLE_LINE_LEN {
        load_tle( line1, line2)?
    } else {
        let (l1, l2) = format_tle_lines( sat_id, classification, &intl_designator, &elements);
        load_tle( &l1, &l2)?
    };

    let rec = OrbitalRecord { sat_id, name, classification, intl_designator, elements, color: color.to_string(), model, tle };
    Ok(rec)
}

fn load_tle (line1: &str, line2: &str)->Result<TLE> {
    TLE::load_2line( line1, line2).map_err( |e| tle_error!("satkit TLE import failed {:?}", e))
}

fn check_line (line: &str, line_no: u8)->Result<()> {
    if !line.is_ascii() {
        return Err( tle_error!("non-ascii characters in line {}: '{}'", line_no as char, line))
    }
    if line.len() != TLE_LINE_LEN && line.len() != TLE_LINE_LEN-1 {
        return Err( tle_error!("invalid length {} of line {}: '{}'", line.len(), line_no as char, line))
    }
    if line.as_bytes()[0] != line_no {
        return Err( tle_error!("not a line {}: '{}'", line_no as char, line))
    }

    if line.len() == TLE_LINE_LEN {
        let expected = checksum( line);
        let actual = line.as_bytes()[TLE_LINE_LEN-1];
        if !actual.is_ascii_digit() || (actual - b'0') != expected {
            return Err( tle_error!("checksum mismatch (expected {}): '{}'", expected, line))
        }
    }
    Ok(())
}

/// TLE checksum: sum of all digits in the first 68 columns plus 1 for each '-', modulo 10
pub fn checksum (line: &str)->u8 {
    let sum: u32 = line.bytes().take( TLE_LINE_LEN-1).map( |b| match b {
        b'0'..=b'9' => (b - b'0') as u32,
        b'-' => 1,
        _ => 0
    }).sum();
    (sum % 10) as u8
}

fn with_checksum (line: String)->String {
    let cs = checksum( &line);
    format!("{line}{cs}")
}

/// trimmed column range of an (ascii) line
#[inline]
fn field (line: &str, range: Range<usize>)->&str {
    line.get( range).unwrap_or("").trim()
}

fn parse_num<T: std::str::FromStr> (line: &str, range: Range<usize>, what: &str)->Result<T> {
    let s = field( line, range);
    s.parse::<T>().map_err( |_| tle_error!("invalid {} '{}'", what, s))
}

fn parse_num_or_zero<T: std::str::FromStr + Default> (line: &str, range: Range<usize>, what: &str)->Result<T> {
    if field( line, range.clone()).is_empty() { Ok( T::default()) } else { parse_num( line, range, what) }
}

/// parse a 5 digit catalog number, which can be in Alpha-5 format for numbers > 99999 (e.g. "A0001" = 100001)
pub fn parse_sat_id (s: &str)->Result<u32> {
    let s = s.trim();
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => {
            let hi = ALPHA5_LETTERS.find(c).ok_or( tle_error!("invalid alpha-5 satellite number '{}'", s))? as u32 + 10;
            let lo: u32 = chars.as_str().parse().map_err( |_| tle_error!("invalid alpha-5 satellite number '{}'", s))?;
            if chars.as_str().len() != 4 { return Err( tle_error!("invalid alpha-5 satellite number '{}'", s)) }
            Ok( hi * 10000 + lo)
        }
        Some(_) => s.parse().map_err( |_| tle_error!("invalid satellite number '{}'", s)),
        None => Err( tle_error!("missing satellite number"))
    }
}

pub fn format_sat_id (sat_id: u32)->String {
    if sat_id > 99999 {
        let hi = (sat_id / 10000) as usize;
        if let Some(c) = ALPHA5_LETTERS.chars().nth( hi.saturating_sub(10)).filter(|_| hi >= 10) {
            return format!("{}{:04}", c, sat_id % 10000)
        }
    }
    format!("{:05}", sat_id % 100000)
}

/// parse an implied decimal point field with exponent, e.g. "-11606-4" → -0.11606e-4. Blank fields are 0
pub fn parse_exp_field (s: &str)->Option<f64> {
    let s = s.trim();
    if s.is_empty() { return Some(0.0) }

    let (sign, s) = match s.as_bytes()[0] {
        b'-' => (-1.0, &s[1..]),
        b'+' => (1.0, &s[1..]),
        _ => (1.0, s)
    };

    if s.len() < 3 { return None }
    let (mantissa, exp) = s.split_at( s.len() - 2);
    let exp_sign = match exp.as_bytes()[0] {
        b'-' => -1,
        b'+' | b' ' => 1,
        _ => return None
    };
    let exp: i32 = exp[1..].parse().ok()?;

    let mantissa = mantissa.trim_start_matches('.');
    if mantissa.is_empty() || !mantissa.bytes().all( |b| b.is_ascii_digit()) { return None }
    let m: f64 = format!("0.{mantissa}").parse().ok()?;

    Some( sign * m * 10f64.powi( exp_sign * exp))
}

/// format a value as 8 column implied decimal point field with exponent
pub fn format_exp_field (v: f64)->String {
    if v == 0.0 || !v.is_finite() { return " 00000-0".to_string() }

    let sign = if v < 0.0 { '-' } else { ' ' };
    let a = v.abs();
    let mut exp = a.log10().floor() as i32 + 1;
    let mut mantissa = (a / 10f64.powi(exp) * 1e5).round() as i64;
    if mantissa >= 100000 {
        mantissa /= 10;
        exp += 1;
    }
    if exp < -9 { return " 00000-0".to_string() } // below field resolution
    let exp = exp.min(9);

    format!("{}{:05}{}{}", sign, mantissa, if exp < 0 { '-' } else { '+' }, exp.abs())
}

/// format the first derivative of mean motion as 10 column field without leading zero, e.g. "-.00002182".
/// Values outside of the field range are clamped
fn format_ndot (v: f64)->String {
    let v = if v.is_finite() { v.clamp( -NDOT_MAX, NDOT_MAX) } else { 0.0 };
    let digits = format!("{:.8}", v.abs());
    let digits = digits.strip_prefix('0').unwrap_or( &digits);
    format!("{}{:>9}", if v < 0.0 { '-' } else { ' ' }, digits)
}
