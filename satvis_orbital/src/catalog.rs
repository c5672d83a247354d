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

//! the set of orbital records we currently track. A Catalog is immutable once published - refreshes build
//! a new one and swap it into the CatalogStore, i.e. readers always see a consistent snapshot

use std::{collections::HashMap, sync::{Arc,RwLock}};
use crate::tle::OrbitalRecord;

#[derive(Debug,Clone,Default)]
pub struct Catalog {
    records: Vec<OrbitalRecord>,    // first insertion order
    index: HashMap<u32,usize>,      // sat_id -> records index
}

impl Catalog {
    pub fn new ()->Self {
        Catalog::default()
    }

    /// add record. A record for an already known sat_id replaces the old one in place (last one wins)
    pub fn insert (&mut self, rec: OrbitalRecord) {
        match self.index.get( &rec.sat_id) {
            Some(&idx) => self.records[idx] = rec,
            None => {
                self.index.insert( rec.sat_id, self.records.len());
                self.records.push( rec);
            }
        }
    }

    pub fn get (&self, sat_id: u32)->Option<&OrbitalRecord> {
        self.index.get( &sat_id).map( |&idx| &self.records[idx])
    }

    pub fn iter (&self)->impl Iterator<Item=&OrbitalRecord> {
        self.records.iter()
    }

    pub fn len (&self)->usize { self.records.len() }
    pub fn is_empty (&self)->bool { self.records.is_empty() }
}

impl FromIterator<OrbitalRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item=OrbitalRecord>> (iter: I)->Self {
        let mut catalog = Catalog::new();
        catalog.extend( iter);
        catalog
    }
}

impl Extend<OrbitalRecord> for Catalog {
    fn extend<I: IntoIterator<Item=OrbitalRecord>> (&mut self, iter: I) {
        for rec in iter {
            self.insert( rec);
        }
    }
}

/// shared holder of the current Catalog. Replacing is atomic with respect to `snapshot()`
#[derive(Debug,Default)]
pub struct CatalogStore {
    current: RwLock<Arc<Catalog>>
}

impl CatalogStore {
    pub fn new (catalog: Catalog)->Self {
        CatalogStore { current: RwLock::new( Arc::new(catalog)) }
    }

    /// the currently published catalog. This is cheap and does not block refreshes
    pub fn snapshot (&self)->Arc<Catalog> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone()
        }
    }

    /// publish a new catalog, returning the previous one
    pub fn replace (&self, catalog: Catalog)->Arc<Catalog> {
        let new_catalog = Arc::new(catalog);
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner()
        };
        std::mem::replace( &mut *guard, new_catalog)
    }

    pub fn get (&self, sat_id: u32)->Option<OrbitalRecord> {
        self.snapshot().get( sat_id).cloned()
    }

    pub fn len (&self)->usize {
        self.snapshot().len()
    }

    pub fn is_empty (&self)->bool {
        self.snapshot().is_empty()
    }
}
