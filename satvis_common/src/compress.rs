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

//! unpacking of (optionally) archived text payloads. We detect the packaging by magic bytes since
//! remote resource names are not reliable (e.g. `ALL_TLE.ZIP` vs. `visual.txt.gz`)

use std::io::{Cursor,Read};
use flate2::read::GzDecoder;
use zip::read::ZipArchive;

use crate::define_error;

define_error!{ pub SatvisCompressError =
    IOError(#[from] std::io::Error) : "IO error: {0}",
    ZipError(#[from] zip::result::ZipError) : "zip error: {0}",
    EmptyArchive(String) : "empty archive {0}"
}

pub type Result<T> = std::result::Result<T, SatvisCompressError>;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const GZ_MAGIC: &[u8] = &[0x1f, 0x8b];

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum Packaging {
    Zip,
    Gzip,
    Plain
}

pub fn packaging_of (data: &[u8]) -> Packaging {
    if data.starts_with(ZIP_MAGIC) { Packaging::Zip }
    else if data.starts_with(GZ_MAGIC) { Packaging::Gzip }
    else { Packaging::Plain }
}

pub fn gz_decompress_vec (v_in: &[u8]) -> Result<Vec<u8>> {
    let mut v_out = Vec::with_capacity( v_in.len() * 5);
    let mut decoder = GzDecoder::new(v_in);
    decoder.read_to_end( &mut v_out)?;
    Ok( v_out )
}

/// extract the first file entry of a zip archive
pub fn unzip_first_entry (v_in: &[u8]) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new( Cursor::new(v_in))?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_file() {
            let mut v_out = Vec::with_capacity( entry.size() as usize);
            entry.read_to_end( &mut v_out)?;
            return Ok(v_out)
        }
    }

    Err( SatvisCompressError::EmptyArchive(format!("{} entries", archive.len())) )
}

/// turn a raw payload into text, unpacking zip or gzip archives as required. Text is decoded lossy
/// since element set names are not guaranteed to be valid UTF-8
pub fn unpack_text (data: &[u8]) -> Result<String> {
    let bytes = match packaging_of(data) {
        Packaging::Zip => unzip_first_entry(data)?,
        Packaging::Gzip => gz_decompress_vec(data)?,
        Packaging::Plain => return Ok( String::from_utf8_lossy(data).into_owned() )
    };
    Ok( String::from_utf8_lossy(&bytes).into_owned() )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use flate2::{Compression,write::GzEncoder};

    #[test]
    fn test_unpack_gzip() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all( b"ISS (ZARYA)\n").unwrap();
        let data = encoder.finish().unwrap();

        assert_eq!( packaging_of(&data), Packaging::Gzip);
        assert_eq!( unpack_text(&data).unwrap(), "ISS (ZARYA)\n");
    }

    #[test]
    fn test_corrupt_zip() {
        let data = b"PK\x03\x04 this is not really a zip archive";
        assert_eq!( packaging_of(data), Packaging::Zip);
        assert!( unpack_text(data).is_err());
    }

    #[test]
    fn test_plain() {
        assert_eq!( unpack_text(b"plain").unwrap(), "plain");
    }
}
