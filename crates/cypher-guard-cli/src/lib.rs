//! Command-line front end for `cypher-guard`.
//!
//! The binary (`cyg`) is a thin wrapper: argument parsing lives in [`cli`],
//! config resolution in [`config`], and each subcommand in [`commands`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod output;
