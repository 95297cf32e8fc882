//! Odoo Client Library
//!
//! Session client for the Odoo XML-RPC API: authenticate once, then run
//! generic model methods (search, read, create, write, unlink, ...).

pub mod client;
pub mod config;
pub mod domain;
pub mod error;

pub use client::{EndpointKind, OdooClient, Record, RecordId, ServerVersion, Uid};
pub use config::ClientConfig;
pub use domain::{Domain, SearchOptions};
pub use error::{ClientError, Result};
pub use xmlrpc_proto::{Kwargs, Struct, Value};
