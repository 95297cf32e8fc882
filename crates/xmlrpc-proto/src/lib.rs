//! XML-RPC Protocol Definitions
//!
//! This crate defines the value model and wire codec used to talk to an Odoo
//! server over XML-RPC. It performs no I/O.

pub mod codec;
pub mod error;
pub mod messages;
pub mod value;

pub use codec::XmlRpcCodec;
pub use error::{ProtocolError, Result};
pub use messages::{Fault, MethodCall, MethodResponse};
pub use value::{Kwargs, Struct, Value};
