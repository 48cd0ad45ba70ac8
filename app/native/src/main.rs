#![allow(clippy::multiple_crate_versions)]

//! PFD traffic map overlay tooling.
//!
//! Logging goes to stderr and is controlled by `PFD_TRAFFIC_MAP_LOG`
//! (`EnvFilter` syntax, default `info`).

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "PFD_TRAFFIC_MAP_LOG";

fn main() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    if let Err(err) = pfd_traffic_map_lib::cli::run() {
        eprintln!("pfd-traffic-map: {err}");
        std::process::exit(1);
    }
}
