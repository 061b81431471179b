//! Vending CLI
//!
//! Command-line front end for the ownership tokens of a Flathub application:
//! table output, logging setup and the list/create/revoke commands.

pub mod commands;
pub mod logging;
pub mod output;
