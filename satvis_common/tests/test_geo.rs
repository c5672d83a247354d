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

use satvis_common::{
    cartesian3::Cartesian3,
    cartographic::Cartographic,
    geo_constants::{EQUATORIAL_EARTH_RADIUS,POLAR_EARTH_RADIUS}
};

fn assert_close (a: f64, b: f64, eps: f64) {
    assert!( (a - b).abs() <= eps, "{a} != {b} (eps {eps})");
}

#[test]
fn test_ecef_roundtrip() {
    for (lon, lat, h) in [(0.0, 0.0, 0.0), (-122.0558, 37.4125, 10.0), (151.2, -33.9, 408_000.0), (45.0, 89.5, 20_200_000.0)] {
        let p = Cartographic::from_degrees( lon, lat, h);
        let c = Cartesian3::from(&p);
        let p2 = Cartographic::from(&c);

        assert_close( p2.longitude_deg(), lon, 1e-8);
        assert_close( p2.latitude_deg(), lat, 1e-8);
        assert_close( p2.height, h, 1e-2);
    }
}

#[test]
fn test_axes() {
    let c = Cartesian3::from( Cartographic::from_degrees( 0.0, 0.0, 0.0));
    assert_close( c.x, EQUATORIAL_EARTH_RADIUS, 1e-6);

    let c = Cartesian3::from( Cartographic::from_degrees( 0.0, 90.0, 0.0));
    assert_close( c.z, POLAR_EARTH_RADIUS, 1e-3);
}

#[test]
fn test_look_angles_overhead() {
    let observer = Cartographic::from_degrees( -122.0558, 37.4125, 10.0);
    let target = Cartesian3::from( Cartographic::from_degrees( -122.0558, 37.4125, 400_000.0));

    let look = observer.look_angles( &target);
    assert_close( look.elevation, 90.0, 1e-4);
    assert_close( look.range, 399_990.0, 1e-3);
}

#[test]
fn test_look_angles_directions() {
    let observer = Cartographic::from_degrees( 0.0, 0.0, 0.0);

    // something high up north of us
    let north = Cartesian3::from( Cartographic::from_degrees( 0.0, 5.0, 1_000_000.0));
    let look = observer.look_angles( &north);
    assert_close( look.azimuth, 0.0, 1e-6);
    assert!( look.elevation > 0.0);

    let east = Cartesian3::from( Cartographic::from_degrees( 5.0, 0.0, 1_000_000.0));
    assert_close( observer.look_angles( &east).azimuth, 90.0, 1e-6);

    let west = Cartesian3::from( Cartographic::from_degrees( -5.0, 0.0, 1_000_000.0));
    assert_close( observer.look_angles( &west).azimuth, 270.0, 1e-6);

    // the other side of the earth is below the horizon
    let antipode = Cartesian3::from( Cartographic::from_degrees( 180.0, 0.0, 1_000_000.0));
    assert!( observer.look_angles( &antipode).elevation < -80.0);
}

#[test]
fn test_teme_to_ecef() {
    let p = Cartesian3::new( 7_000_000.0, 0.0, 1_000.0);

    let q = p.teme_to_ecef( 0.0);
    assert_eq!( q, p);

    // earth rotated by 90° means the point is now at -90° longitude
    let q = p.teme_to_ecef( std::f64::consts::FRAC_PI_2);
    assert_close( q.x, 0.0, 1e-6);
    assert_close( q.y, -7_000_000.0, 1e-6);
    assert_close( q.z, 1_000.0, 1e-9);
    assert_close( q.length(), p.length(), 1e-6);
}
