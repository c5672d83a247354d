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

use std::fs::{self,File};
use std::io::{self,Read,Write,ErrorKind};
use std::path::{Path,PathBuf};
use std::process;

use crate::macros::io_error;

type Result<T> = std::result::Result<T,std::io::Error>;

pub fn filename<'a,T: AsRef<Path>> (path: &'a T)->Option<&'a str> {
    path.as_ref().file_name().and_then(|ostr| ostr.to_str())
}

/// check if dir pathname exists and is writable, try to create dir otherwise
pub fn ensure_writable_dir (path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    if path.is_dir() {
        let md = fs::metadata(&path)?;
        if md.permissions().readonly() {
            Err(io_error!(ErrorKind::PermissionDenied, "dir {:?} not writable", &path))
        } else {
            Ok(())
        }

    } else {
        fs::create_dir_all(path)
    }
}

pub fn file_length <P: AsRef<Path>> (path: P) -> Option<u64> {
    fs::metadata(path).ok().filter( |meta| meta.is_file()).map( |meta| meta.len() )
}

pub fn filepath_contents <P: AsRef<Path>> (path: &P) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    let mut contents: Vec<u8> = Vec::with_capacity(len as usize);
    file.read_to_end(&mut contents)?;
    Ok(contents)
}

pub fn filepath_contents_as_string <P: AsRef<Path>> (path: &P) -> Result<String> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    let mut contents = String::with_capacity(len as usize);
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// the (hidden) sibling path we use to stage atomic writes of `path`
pub fn staging_path (path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let fname = filename(&path).ok_or( io_error!(ErrorKind::InvalidInput, "not a file path: {:?}", path))?;
    Ok( path.with_file_name( format!(".{}.{}.tmp", fname, process::id())) )
}

/// write contents to path so that readers either see the old or the new file, never a truncated one.
/// This writes to a staging file within the same directory, syncs it and then renames it to the target
pub fn write_atomic (path: impl AsRef<Path>, contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let tmp_path = staging_path(path)?;

    let res = (|| {
        let mut file = File::create(&tmp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        fs::rename( &tmp_path, path)?;
        sync_parent_dir(path)
    })();

    if res.is_err() && tmp_path.is_file() {
        let _ = fs::remove_file(&tmp_path); // don't leave partial staging files behind
    }
    res
}

/// flush the directory entry of path so that a preceding rename survives a crash.
/// This is a no-op on platforms that can't open directories as files
#[cfg(unix)]
pub fn sync_parent_dir (path: impl AsRef<Path>) -> Result<()> {
    let dir = match path.as_ref().parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new(".")
    };
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
pub fn sync_parent_dir (_path: impl AsRef<Path>) -> Result<()> {
    Ok(())
}

/// atomically store contents to a file with given name in dir, creating dir if required
pub fn store_file_contents_in_dir<P: AsRef<Path>> (dir: &P, filename: &str, contents: &[u8]) -> Result<PathBuf> {
    ensure_writable_dir(dir)?;
    let path = dir.as_ref().join(filename);
    write_atomic( &path, contents)?;
    Ok(path)
}
