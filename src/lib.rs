//! Typed client for the Confluent Cloud control-plane REST API
//!
//! The [`confluent`] module holds the client and the resource operations.
//! [`config`] is the persisted configuration used by the `ccloud` binary.

pub mod config;
pub mod confluent;
