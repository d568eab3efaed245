//! locus-core: Configuration, errors, logging and path filtering for locus.

pub mod build_info;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod paths;

pub use config::Config;
pub use error::{Error, Result};
pub use filter::PathFilter;
