// Library crate for the lfl binary. Exposes the config, pipeline and output
// modules so integration tests can drive a full run.

pub mod config;
pub mod output;
pub mod pipeline;
