//! Configuration source options for sealcfg

pub mod options;

pub use options::{ConfigOptions, ResolvedOptions};
