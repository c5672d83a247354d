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

///! common utility functions for network operations

use reqwest::{header::{HeaderMap,HeaderValue,ETAG,IF_NONE_MATCH,CONTENT_LENGTH}, Client, StatusCode};
use bytes::Bytes;
use regex::Regex;
use lazy_static::lazy_static;

use crate::define_error;

const PATH: usize = 5;

lazy_static! {
    // [scheme,user,host,port,path,query]
    static ref URL_RE: Regex = Regex::new( r"(.+)://(?:(.+)@)?([^:/]+)(?::(\d+))?(?:/([^?]+))?(?:\?(.+))?").unwrap();
    static ref FNAME_RE: Regex = Regex::new( r"(?:.*/)?(.*)").unwrap();
}

define_error!{ pub SatvisNetError =
    NotFoundError(String) : "not found {0}",
    HttpError(#[from] reqwest::Error) : "http error: {0}",
    OpFailed(String) : "operation failed: {0}"
}

pub type Result<T> = std::result::Result<T, SatvisNetError>;

/// result of a conditional GET request
#[derive(Debug)]
pub enum ConditionalResponse {
    /// the server confirmed our freshness token (HTTP 304)
    NotModified,

    /// the resource changed (or we didn't have a token). Contains the full payload and the new token (if any)
    Modified { data: Bytes, etag: Option<String> }
}

/// GET url with an optional `If-None-Match` freshness token. The payload is retrieved in chunks to support
/// large files. Anything other than 200 or 304 is an error
pub async fn conditional_get (client: &Client, url: &str, etag: Option<&str>) -> Result<ConditionalResponse> {
    let mut headers = HeaderMap::new();
    if let Some(etag) = etag {
        let v = HeaderValue::from_str(etag).map_err(|_| SatvisNetError::OpFailed(format!("invalid etag {etag}")))?;
        headers.insert( IF_NONE_MATCH, v);
    }

    let mut response = client.get(url).headers(headers).send().await?;

    match response.status() {
        StatusCode::NOT_MODIFIED => {
            Ok( ConditionalResponse::NotModified )
        }
        StatusCode::OK => {
            let etag = response.headers().get(ETAG)
                .and_then( |v| v.to_str().ok())
                .map( |s| s.to_string());

            let mut buf: Vec<u8> = Vec::with_capacity( response.content_length().unwrap_or(0) as usize);
            while let Some(chunk) = response.chunk().await? {
                buf.extend_from_slice(&chunk);
            }

            Ok( ConditionalResponse::Modified { data: Bytes::from(buf), etag } )
        }
        StatusCode::NOT_FOUND => {
            Err( SatvisNetError::NotFoundError(format!("{url}")))
        }
        other => {
            Err( SatvisNetError::OpFailed(format!("response status {other:?}")))
        }
    }
}

/// get content-length of URL without retrieving the actual content
pub async fn get_content_length (client: &Client, url: &str)->Result<u64> {
    let response = client.head(url).send().await?;

    if !response.status().is_success() {
        return Err( SatvisNetError::OpFailed(format!("response status {:?}", response.status())))
    }

    if let Some(content_length) = response.headers().get(CONTENT_LENGTH) {
        content_length.to_str()
            .map_err(|_| SatvisNetError::OpFailed("invalid header value".into()))?
            .parse()
            .map_err(|_| SatvisNetError::OpFailed("invalid content-length".into()))
    } else {
        Err( SatvisNetError::OpFailed("no content-length".into()))
    }
}

/// get filename part (last path element) of complete URL
/// NOTE - this does not work for partial (relative) URLs
pub fn url_file_name<'a> (url: &'a str) -> Option<&'a str> {
    URL_RE.captures( url)
    .and_then( |cap| cap.get( PATH))
    .map( |m| m.as_str())
    .and_then( |p| FNAME_RE.captures( p))
    .and_then( |cap| cap.get(1))
    .map( |m| m.as_str())
    .filter( |s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_file_name() {
        assert_eq!( url_file_name("https://celestrak.org/NORAD/elements/visual.txt"), Some("visual.txt"));
        assert_eq!( url_file_name("http://www.tle.info/data/ALL_TLE.ZIP"), Some("ALL_TLE.ZIP"));
        assert_eq!( url_file_name("http://www.tle.info/"), None);
    }
}
