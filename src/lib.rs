//! # aaa-codec
//!
//! Wire-protocol core for RADIUS and Diameter AAA services: dictionary
//! loading and lookup, bit-exact packet and message codecs, attribute
//! manipulation and JSON interchange.
//!
//! ## Reference
//! RADIUS per [RFC 2865](https://tools.ietf.org/html/rfc2865) (with the
//! RFC 2868 tagged/salted attribute forms); Diameter per
//! [RFC 6733](https://tools.ietf.org/html/rfc6733).
//!
//! The crate is transport-free: encode and decode are pure functions over
//! `io::Read`/`io::Write`, dictionaries are built once and shared behind an
//! `Arc`, and the only process-global state is the pair of atomic
//! hop-by-hop/end-to-end id counters.

pub mod diameter;
pub mod dictionary;
pub mod error;
pub mod freeradius;
pub mod json;
pub mod radius;
pub mod value;

mod display;

pub use crate::diameter::DiameterMessage;
pub use crate::dictionary::{Dictionary, DEFAULT_DICT};
pub use crate::error::{Error, Result};
pub use crate::radius::Packet as RadiusPacket;
pub use crate::value::Value;
