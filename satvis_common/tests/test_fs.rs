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

use std::fs;
use satvis_common::fs::{file_length,filepath_contents,filepath_contents_as_string,staging_path,store_file_contents_in_dir,sync_parent_dir,write_atomic};

#[test]
fn test_write_atomic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("visual.txt");

    write_atomic( &path, b"first").unwrap();
    assert_eq!( filepath_contents_as_string( &path).unwrap(), "first");

    write_atomic( &path, b"second version").unwrap();
    assert_eq!( filepath_contents( &path).unwrap(), b"second version");
    assert_eq!( file_length( &path), Some(14));

    // no staging files left behind
    let entries: Vec<_> = fs::read_dir( dir.path()).unwrap().collect();
    assert_eq!( entries.len(), 1);
    assert!( !staging_path( &path).unwrap().exists());
}

#[test]
fn test_write_atomic_failure_keeps_target() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("visual.txt");
    write_atomic( &path, b"cached").unwrap();

    // a directory in place of the staging file makes the write fail
    fs::create_dir( staging_path( &path).unwrap()).unwrap();
    assert!( write_atomic( &path, b"new").is_err());
    assert_eq!( filepath_contents_as_string( &path).unwrap(), "cached");
}

#[test]
fn test_sync_parent_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("visual.txt");
    write_atomic( &path, b"synced").unwrap();

    assert!( sync_parent_dir( &path).is_ok());
    assert!( sync_parent_dir( "visual.txt").is_ok()); // relative to the current dir

    #[cfg(unix)]
    assert!( sync_parent_dir( dir.path().join("missing").join("visual.txt")).is_err());
}

#[test]
fn test_store_in_new_dir() {
    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().join("cache").join("tle");

    let path = store_file_contents_in_dir( &cache_dir, "stations.txt", b"ISS (ZARYA)").unwrap();
    assert_eq!( path, cache_dir.join("stations.txt"));
    assert_eq!( filepath_contents_as_string( &path).unwrap(), "ISS (ZARYA)");
    assert_eq!( file_length( &cache_dir), None); // not a file
}
