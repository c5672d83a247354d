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

use std::path::PathBuf;
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use satvis_orbital::{load_config, CatalogStore, FeedSynchronizer};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "update local caches of configured TLE feeds")]
pub struct Args {
    /// the config file (feed freshness state is stored back into it)
    #[arg(short,long, default_value = "satvis.ron")]
    pub config: PathBuf,

    /// print all records of the resulting catalog
    #[arg(short,long)]
    pub list: bool,
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut config = load_config( &args.config)?;

    let synchronizer = FeedSynchronizer::with_http( Some(args.config.clone()));
    let store = CatalogStore::default();
    let report = synchronizer.refresh( &mut config, &store).await;
    println!("{report}");

    let catalog = store.snapshot();
    if args.list {
        for rec in catalog.iter() {
            println!("{:<8} {rec}", rec.color);
        }
    }
    println!("{} records in catalog", catalog.len());

    Ok(())
}
