// SPDX-License-Identifier: MIT

//! Configuration for checks: polling, reporting, interactive mode and
//! initial variables

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    CheckConfig, InteractiveConfig, PollingConfig, ReportConfig, ENV_POLL_MAX,
    ENV_POLL_MIN_FRACTION,
};
