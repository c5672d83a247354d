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

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SatvisOrbitalError>;

#[derive(Error,Debug)]
pub enum SatvisOrbitalError {

    #[error("TLE error {0}")]
    TleError( String ),

    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("network error {0}")]
    NetError( #[from] satvis_common::net::SatvisNetError),

    #[error("payload error {0}")]
    PayloadError( #[from] satvis_common::compress::SatvisCompressError),

    #[error("config parse error {0}")]
    ConfigParseError( #[from] ron::error::SpannedError),

    #[error("config serialization error {0}")]
    ConfigSerError( #[from] ron::Error),

    #[error("invalid observer location {0}")]
    ObserverError( String ),

    #[error("operation failed {0}")]
    OpFailedError(String),
}

macro_rules! tle_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        SatvisOrbitalError::TleError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use tle_error;

macro_rules! op_failed {
    ($fmt:literal $(, $arg:expr )* ) => {
        SatvisOrbitalError::OpFailedError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use op_failed;
