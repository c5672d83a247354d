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

use chrono::{TimeZone,Utc};
use satvis_orbital::{
    Catalog,
    tle::{parse_record,parse_records,parse_valid_records,OrbitModel}
};

/* #region test-data *************************************************************/

const ISS_1: &str = "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
const ISS_2: &str = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

const NOAA21_1: &str = "1 54234U 22150A   25076.92835707  .00000366  00000-0  19403-3 0  9994";
const NOAA21_2: &str = "2 54234  98.7204  17.0432 0002710  72.7407 287.4066 14.19556514121811";

const GPS_1: &str = "1 24876U 97035A   25076.50000000  .00000047  00000-0  10000-3 0  9991";
const GPS_2: &str = "2 24876  55.4890 218.1570 0037497 118.5920 241.8557  2.00565025200582";

fn feed_text()->String {
    format!("ISS (ZARYA)\n{ISS_1}\n{ISS_2}\n0 NOAA 21\n{NOAA21_1}\n{NOAA21_2}\nGPS BIIR-2  (PRN 13)\n{GPS_1}\n{GPS_2}\n")
}

/* #endregion test-data */

#[test]
fn test_parse_three_line_groups() {
    let text = feed_text();
    let recs: Vec<_> = parse_valid_records( &text, "red").collect();
    for r in &recs { println!("{r}"); }

    assert_eq!( recs.len(), 3);
    assert_eq!( recs.iter().map(|r| r.sat_id).collect::<Vec<_>>(), vec![25544, 54234, 24876]);
    assert_eq!( recs[0].name, "ISS (ZARYA)");
    assert_eq!( recs[1].name, "NOAA 21");
    assert_eq!( recs[2].name, "GPS BIIR-2  (PRN 13)");
    assert!( recs.iter().all( |r| r.color == "red"));

    assert_eq!( recs[0].model, OrbitModel::NearEarth);
    assert_eq!( recs[1].model, OrbitModel::NearEarth);
    assert_eq!( recs[2].model, OrbitModel::DeepSpace);

    let iss = &recs[0];
    assert_eq!( iss.classification, 'U');
    assert_eq!( iss.intl_designator, "98067A");
    let e = &iss.elements;
    assert_eq!( e.epoch.format("%Y-%m-%dT%H:%M:%S").to_string(), "2008-09-20T12:25:40");
    assert!( (e.epoch - Utc.with_ymd_and_hms( 2008, 9, 20, 12, 25, 40).unwrap()).num_milliseconds() == 104);
    assert_eq!( e.inclination, 51.6416);
    assert_eq!( e.raan, 247.4627);
    assert_eq!( e.eccentricity, 0.0006703);
    assert_eq!( e.arg_of_perigee, 130.5360);
    assert_eq!( e.mean_anomaly, 325.0288);
    assert_eq!( e.mean_motion, 15.72125391);
    assert_eq!( e.mean_motion_dot, -0.00002182);
    assert_eq!( e.mean_motion_ddot, 0.0);
    assert!( (e.bstar + 0.11606e-4).abs() < 1e-12);
    assert_eq!( e.element_set_no, 292);
    assert_eq!( e.rev_number, 56353);

    let a = e.semi_major_axis();
    assert!( a > 6_700_000.0 && a < 6_760_000.0, "ISS semi major axis {a}");
    assert!( (recs[2].elements.period_minutes() - 718.0).abs() < 1.0);
}

#[test]
fn test_two_line_groups() {
    let text = format!("{ISS_1}\n{ISS_2}\n{NOAA21_1}\n{NOAA21_2}\n");
    let recs: Vec<_> = parse_valid_records( &text, "blue").collect();

    assert_eq!( recs.len(), 2);
    assert_eq!( recs[0].name, "25544"); // no name line
    assert_eq!( recs[1].name, "54234");
}

#[test]
fn test_crlf_and_trailing_whitespace() {
    let text = format!("ISS (ZARYA)   \r\n{ISS_1}  \r\n{ISS_2}\r\n\r\n");
    let recs: Vec<_> = parse_valid_records( &text, "red").collect();

    assert_eq!( recs.len(), 1);
    assert_eq!( recs[0].name, "ISS (ZARYA)");
}

#[test]
fn test_malformed_records_are_isolated() {
    let bad_checksum = "1 54234U 22150A   25076.92835707  .00000366  00000-0  19403-3 0  9995";
    let bad_field = "2 54234  98.72X4  17.0432 0002710  72.7407 287.4066 14.19556514121811";
    let text = format!("ISS\n{ISS_1}\n{ISS_2}\nBAD CHECKSUM\n{bad_checksum}\n{NOAA21_2}\nBAD FIELD\n{NOAA21_1}\n{bad_field}\nTRUNCATED\n{GPS_1}\nGPS\n{GPS_1}\n{GPS_2}\n");

    let results: Vec<_> = parse_records( &text, "red").collect();
    for r in &results { println!("{r:?}"); }

    assert_eq!( results.len(), 5);
    assert!( results[0].is_ok());
    assert!( results[1].is_err());
    assert!( results[2].is_err());
    assert!( results[3].is_err()); // line 1 without line 2
    assert!( results[4].is_ok());

    let recs: Vec<_> = parse_valid_records( &text, "red").collect();
    assert_eq!( recs.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(), vec!["ISS", "GPS"]);
}

#[test]
fn test_orphan_line_2() {
    let text = format!("{NOAA21_2}\n{ISS_1}\n{ISS_2}\n");
    let results: Vec<_> = parse_records( &text, "red").collect();

    assert_eq!( results.len(), 2);
    assert!( results[0].is_err());
    assert_eq!( results[1].as_ref().unwrap().sat_id, 25544);
}

#[test]
fn test_broken_line_2_does_not_leak_into_next_record() {
    let wrong_prefix = format!("2X{}", &ISS_2[2..]);
    let truncated = &ISS_2[..14];

    for broken in [wrong_prefix.as_str(), truncated] {
        let text = format!("{ISS_1}\n{broken}\n{NOAA21_1}\n{NOAA21_2}\n");
        let results: Vec<_> = parse_records( &text, "red").collect();
        for r in &results { println!("{r:?}"); }

        assert_eq!( results.len(), 2);
        assert!( results[0].is_err());
        let noaa = results[1].as_ref().unwrap();
        assert_eq!( noaa.sat_id, 54234);
        assert_eq!( noaa.name, "54234");
    }
}

#[test]
fn test_garbage_element_line_is_not_a_name() {
    let garbage = format!("X{}", &ISS_2[1..]);
    let text = format!("NOAA 21\n{garbage}\n{NOAA21_1}\n{NOAA21_2}\n");
    let recs: Vec<_> = parse_valid_records( &text, "red").collect();

    assert_eq!( recs.len(), 1);
    assert_eq!( recs[0].name, "54234");
}

#[test]
fn test_out_of_range_ndot_keeps_line_length() {
    let mut rec = parse_record( None, ISS_1, ISS_2, "red").unwrap();
    rec.elements.mean_motion_dot = 1.5;

    let (l1, l2) = rec.to_tle_lines();
    println!("{l1}");
    assert_eq!( l1.len(), 69);
    assert_eq!( l2.len(), 69);
    assert_eq!( &l1[33..43], " .99999999");
    assert!( parse_record( None, &l1, &l2, "red").is_ok());
}

#[test]
fn test_checksum_mismatch() {
    let bad = format!("{}8", &ISS_1[..68]);
    assert!( parse_record( None, &bad, ISS_2, "red").is_err());
    assert!( parse_record( None, ISS_1, ISS_2, "red").is_ok());
}

#[test]
fn test_inconsistent_sat_ids() {
    let other = "2 54235  98.7204  17.0432 0002710  72.7407 287.4066 14.19556514121812";
    assert!( parse_record( None, NOAA21_1, other, "red").is_err());
}

#[test]
fn test_lines_without_checksum() {
    let rec = parse_record( Some("0 NOAA 21"), &NOAA21_1[..68], &NOAA21_2[..68], "cyan").unwrap();
    assert_eq!( rec.name, "NOAA 21");

    let (l1, l2) = rec.to_tle_lines();
    assert_eq!( l1, NOAA21_1);
    assert_eq!( l2, NOAA21_2);
}

#[test]
fn test_reserialize() {
    let rec = parse_record( None, ISS_1, ISS_2, "red").unwrap();
    let (l1, l2) = rec.to_tle_lines();
    assert_eq!( l1, ISS_1);
    assert_eq!( l2, ISS_2);
}

#[test]
fn test_roundtrip_within_precision() {
    let text = feed_text();

    for rec in parse_valid_records( &text, "red") {
        let (l1, l2) = rec.to_tle_lines();
        assert_eq!( l1.len(), 69);
        assert_eq!( l2.len(), 69);

        let rec2 = parse_record( Some(rec.name.as_str()), &l1, &l2, "red").unwrap();
        let (e1, e2) = (&rec.elements, &rec2.elements);

        assert_eq!( rec.sat_id, rec2.sat_id);
        assert_eq!( rec.name, rec2.name);
        assert_eq!( rec.intl_designator, rec2.intl_designator);
        assert_eq!( rec.model, rec2.model);
        assert!( (e1.epoch - e2.epoch).num_milliseconds().abs() <= 1);
        assert!( (e1.inclination - e2.inclination).abs() < 1e-4);
        assert!( (e1.raan - e2.raan).abs() < 1e-4);
        assert!( (e1.eccentricity - e2.eccentricity).abs() < 1e-7);
        assert!( (e1.arg_of_perigee - e2.arg_of_perigee).abs() < 1e-4);
        assert!( (e1.mean_anomaly - e2.mean_anomaly).abs() < 1e-4);
        assert!( (e1.mean_motion - e2.mean_motion).abs() < 1e-8);
        assert!( (e1.mean_motion_dot - e2.mean_motion_dot).abs() < 1e-8);
        assert!( (e1.bstar - e2.bstar).abs() <= e1.bstar.abs() * 1e-4);
        assert_eq!( e1.element_set_no, e2.element_set_no);
        assert_eq!( e1.rev_number, e2.rev_number);
    }
}

#[test]
fn test_duplicates_last_wins() {
    let text_a = format!("ISS (ZARYA)\n{ISS_1}\n{ISS_2}\nNOAA 21\n{NOAA21_1}\n{NOAA21_2}\n");
    let text_b = format!("ISS\n{ISS_1}\n{ISS_2}\n");

    let mut catalog: Catalog = parse_valid_records( &text_a, "red").collect();
    catalog.extend( parse_valid_records( &text_b, "green"));

    assert_eq!( catalog.len(), 2);
    let iss = catalog.get( 25544).unwrap();
    assert_eq!( iss.color, "green");
    assert_eq!( iss.name, "ISS");

    // replaced in place, i.e. order of first insertion
    assert_eq!( catalog.iter().map(|r| r.sat_id).collect::<Vec<_>>(), vec![25544, 54234]);
}
