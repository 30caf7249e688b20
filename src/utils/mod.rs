//! Shared helpers for Arrow data and console/log output

pub mod arrow_utils;
pub mod logging;
