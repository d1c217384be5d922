//! Outer surface of playbridge: the TCP transport, a driver [`client`], the
//! headless [`demo`] host and the `pbridge` command line.

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod demo;
pub mod error;
pub mod logging;
pub mod output;
pub mod transport;
