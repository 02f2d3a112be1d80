//! Wire protocol for the backup server.
//!
//! One length-framed binary request per connection, one binary response.
//! All multi-byte integers are little-endian, no padding between fields.
//!
//! Request header: `client_id:u32 | version:u8 | op:u8`, then per-op fields.
//! Response header: `version:u8 | status:u16`, then per-status fields.

pub mod error;
pub mod request;
pub mod response;
pub mod wire;

pub use error::ProtocolError;
pub use request::Request;
pub use response::Response;
pub use wire::{Filename, Op, Payload, Status, MAX_NAME_LEN, PROTOCOL_VERSION};
