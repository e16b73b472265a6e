//! Populate a Keymapp database with layout data on Keymapp's behalf.
//!
//! Keymapp (the ZSA keyboard desktop application) expects its local SQLite
//! database to contain the configurator metadata document and the revision
//! data of the layouts it should display. This program performs the network
//! calls needed to get them, and writes the results into the exact schema
//! Keymapp uses, so that Keymapp itself can be denied network access entirely
//! (with OpenSnitch, Little Snitch or a firewall rule).

pub mod error;
pub mod sync;

use crate::error::{ErrorKind, Result};
use crate::sync::{Report, StoreLocation, synchronize};
use exn::ResultExt;
use fkm_config::Settings;
use fkm_remote::{Client, HttpOptions, HttpTransport, LayoutAddress};
use std::sync::Arc;

/// Synchronize the layout at `address` into the configured store.
pub async fn run(settings: &Settings, address: &str) -> Result<Report> {
    let address = LayoutAddress::parse(address).map_err(ErrorKind::remote)?;
    let store = StoreLocation {
        path: settings.database_path().or_raise(|| ErrorKind::Config)?,
        mkdir: settings.mkdir,
    };
    let transport = HttpTransport::new(HttpOptions::from(&settings.remote)).map_err(ErrorKind::remote)?;
    let client = Client::new(Arc::new(transport));
    synchronize(&client, &store, &address).await
}
