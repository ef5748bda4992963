// Rust Bitcoin Address Codec Library
// Written by
//   The Rust Bitcoin Address Codec developers
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the CC0 Public Domain Dedication
// along with this software.
// If not, see <http://creativecommons.org/publicdomain/zero/1.0/>.
//

//! # Rust Bitcoin Address Codec Library
//!
//! This is a library that translates between Bitcoin output scripts (the
//! byte programs embedded in transaction outputs) and their user-facing
//! textual address forms, and that classifies output scripts into the
//! standard script categories.
//!
//! It is a codec, not a wallet: it never touches elliptic-curve keys
//! beyond checking their serialized size, never computes script or key
//! hashes, and never talks to a network. Every routine is a pure function
//! over its inputs plus a read-only [`network::constants::Params`]
//! record, so the whole crate is reentrant and thread-safe without any
//! coordination.
//!
//! ## Example: round-tripping a P2WPKH output
//!
//! ```rust
//! use bitcoin_addresses::network::constants::Network;
//! use bitcoin_addresses::util::address;
//! use bitcoin_addresses::Script;
//!
//! let params = Network::Bitcoin.params();
//! let script = Script::new_witness_program(0, &[0x75, 0x1e, 0x76, 0xe8,
//!     0x19, 0x91, 0x96, 0xd4, 0x54, 0x94, 0x1c, 0x45, 0xd1, 0xb3, 0xa3,
//!     0x23, 0xf1, 0x43, 0x3b, 0xd6]);
//!
//! let dest = address::extract_destinations(&script, params);
//! assert_eq!(dest.addresses[0], "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4");
//! assert_eq!(address::decode_destination(&dest.addresses[0], params), Ok(script));
//! ```

// Coding conventions
#![forbid(unsafe_code)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![deny(dead_code)]
#![deny(unused_imports)]
#![deny(missing_docs)]

// Re-export dependencies we control
#[macro_use]
pub extern crate bitcoin_hashes as hashes;

#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;
#[cfg(all(test, feature = "serde"))]
extern crate serde_json;

pub mod blockdata;
pub mod hash_types;
pub mod network;
pub mod util;

pub use blockdata::opcodes;
pub use blockdata::script::Script;
pub use blockdata::standard::{solve, ScriptKind};
pub use hash_types::{PubkeyHash, ScriptHash};
pub use network::constants::{Base58Type, Network, Params};
pub use util::address::{decode_destination, extract_destinations, is_valid};
pub use util::{address, base58, bech32};
