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

//! Addresses
//!
//! Translating output scripts to and from their textual address forms:
//! Base58Check for the legacy kinds, Bech32 for segwit v0 and Bech32m
//! for taproot and later witness versions. Which form a script takes on
//! a given network is bound by the [`Params`] record passed in by the
//! caller.
//!
//! # Example: parsing an address
//!
//! ```rust
//! use bitcoin_addresses::network::constants::Network;
//! use bitcoin_addresses::util::address;
//!
//! let params = Network::Bitcoin.params();
//! let script = address::decode_destination("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", params)
//!     .expect("valid address");
//! assert!(script.is_p2pkh());
//! ```

use std::{error, fmt};

use blockdata::opcodes;
use blockdata::script::Script;
use blockdata::standard::{self, ScriptKind};
use hash_types::{PubkeyHash, ScriptHash};
use hashes::Hash;
use network::constants::{Base58Type, Params};
use util::base58;
use util::bech32;

/// Maximum length of a witness program in bytes.
const MAX_WITNESS_PROGRAM_LENGTH: usize = 40;

/// Address error.
///
/// The `Display` rendering of each variant is a stable diagnostic
/// string; downstream tooling matches on the text, so it must not
/// change.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Error {
    /// A Base58 payload carried a known network prefix but the wrong
    /// payload length.
    InvalidBase58PayloadLength,
    /// A Base58 payload carried no known network prefix.
    UnknownBase58Prefix,
    /// The string parsed as Base58 but its checksum or length was wrong.
    InvalidBase58Checksum,
    /// The string is neither valid Bech32 nor valid Base58.
    UnknownEncoding,
    /// The bech32 data section was empty.
    EmptyBech32Data,
    /// The bech32 human-readable prefix belongs to a different network.
    InvalidBech32Prefix {
        /// The HRP the network parameters call for.
        expected: &'static str,
        /// The HRP the string carried.
        found: String,
    },
    /// A version 0 witness address carried a Bech32m checksum.
    V0MustUseBech32,
    /// A witness address of version 1 or above carried a plain Bech32
    /// checksum.
    V1MustUseBech32m,
    /// The bech32 data section did not end in valid zero padding.
    InvalidBech32Padding,
    /// A v0 witness program was neither 20 nor 32 bytes.
    InvalidSegwitV0ProgramLength(usize),
    /// The witness version was above 16.
    InvalidWitnessVersion,
    /// The witness program was outside 2..=40 bytes.
    InvalidWitnessProgramLength(usize),
}

fn byte_str(len: usize) -> &'static str {
    if len == 1 {
        "byte"
    } else {
        "bytes"
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidBase58PayloadLength => {
                f.write_str("Invalid length for Base58 address (P2PKH or P2SH)")
            }
            Error::UnknownBase58Prefix => {
                f.write_str("Invalid or unsupported Base58-encoded address.")
            }
            Error::InvalidBase58Checksum => {
                f.write_str("Invalid checksum or length of Base58 address (P2PKH or P2SH)")
            }
            Error::UnknownEncoding => {
                f.write_str("Invalid or unsupported Segwit (Bech32) or Base58 encoding.")
            }
            Error::EmptyBech32Data => f.write_str("Empty Bech32 data section"),
            Error::InvalidBech32Prefix { expected, ref found } => write!(
                f,
                "Invalid or unsupported prefix for Segwit (Bech32) address (expected {}, got {}).",
                expected, found
            ),
            Error::V0MustUseBech32 => {
                f.write_str("Version 0 witness address must use Bech32 checksum")
            }
            Error::V1MustUseBech32m => {
                f.write_str("Version 1+ witness address must use Bech32m checksum")
            }
            Error::InvalidBech32Padding => f.write_str("Invalid padding in Bech32 data section"),
            Error::InvalidSegwitV0ProgramLength(len) => write!(
                f,
                "Invalid Bech32 v0 address program size ({} {}), per BIP141",
                len,
                byte_str(len)
            ),
            Error::InvalidWitnessVersion => f.write_str("Invalid Bech32 address witness version"),
            Error::InvalidWitnessProgramLength(len) => {
                write!(f, "Invalid Bech32 address program size ({} {})", len, byte_str(len))
            }
        }
    }
}

impl error::Error for Error {}

/// A decoded address payload: what the address pays to, before any
/// script is constructed from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// P2PKH address.
    PubkeyHash(PubkeyHash),
    /// P2SH address.
    ScriptHash(ScriptHash),
    /// Segwit address.
    WitnessProgram {
        /// The witness program version, in `0..=16`.
        version: u8,
        /// The witness program.
        program: Vec<u8>,
    },
}

impl Payload {
    /// Generates the script pubkey spending to this payload.
    ///
    /// Witness versions past taproot (and version 1 with a non-taproot
    /// program length) append the program directly after the version
    /// opcode, with no length push. Such scripts do not satisfy the
    /// witness-program shape the solver recognizes, so they do not
    /// round-trip back through [`extract_destinations`].
    pub fn script_pubkey(&self) -> Script {
        match *self {
            Payload::PubkeyHash(ref hash) => Script::new_p2pkh(hash),
            Payload::ScriptHash(ref hash) => Script::new_p2sh(hash),
            Payload::WitnessProgram { version, program: ref prog } => {
                if version == 0 || (version == 1 && prog.len() == 32) {
                    Script::new_witness_program(version, prog)
                } else {
                    let mut script = Vec::with_capacity(1 + prog.len());
                    script.push(opcodes::encode_op_n(version).into_u8());
                    script.extend_from_slice(prog);
                    Script::from(script)
                }
            }
        }
    }
}

fn payload_from_str(s: &str, params: &Params) -> Result<Payload, Error> {
    // The network hint: does the string start with this network's HRP?
    // A valid Bech32 address of another network fails this test and is
    // routed to the Base58 branch below, where it then fails to parse.
    let hrp = params.bech32_hrp.as_bytes();
    let is_bech32 = s.len() >= hrp.len() && s.as_bytes()[..hrp.len()].eq_ignore_ascii_case(hrp);

    if !is_bech32 {
        match base58::from_check_limited(s, 21) {
            Ok(data) => {
                let pubkey_prefix = params.base58_prefix(Base58Type::PubkeyAddress);
                if data.len() == 20 + pubkey_prefix.len() && data.starts_with(pubkey_prefix) {
                    let hash = PubkeyHash::from_slice(&data[pubkey_prefix.len()..]).unwrap();
                    return Ok(Payload::PubkeyHash(hash));
                }
                let script_prefix = params.base58_prefix(Base58Type::ScriptAddress);
                if data.len() == 20 + script_prefix.len() && data.starts_with(script_prefix) {
                    let hash = ScriptHash::from_slice(&data[script_prefix.len()..]).unwrap();
                    return Ok(Payload::ScriptHash(hash));
                }
                // A known prefix at the wrong length gets the more
                // specific diagnostic
                if data.starts_with(pubkey_prefix) || data.starts_with(script_prefix) {
                    return Err(Error::InvalidBase58PayloadLength);
                }
                return Err(Error::UnknownBase58Prefix);
            }
            Err(_) => {
                // Distinguish a parseable string with a broken checksum
                // from something that is no known encoding at all
                return if base58::from_limited(s, 100).is_ok() {
                    Err(Error::InvalidBase58Checksum)
                } else {
                    Err(Error::UnknownEncoding)
                };
            }
        }
    }

    let dec = match bech32::decode(s) {
        Ok(dec) => dec,
        Err(_) => return Err(Error::UnknownEncoding),
    };
    if dec.data.is_empty() {
        return Err(Error::EmptyBech32Data);
    }
    if dec.hrp != params.bech32_hrp {
        return Err(Error::InvalidBech32Prefix {
            expected: params.bech32_hrp,
            found: dec.hrp,
        });
    }

    // The first symbol is the witness version; it dictates which
    // checksum flavour the string must have carried
    let version = dec.data[0];
    if version == 0 && dec.encoding != bech32::Encoding::Bech32 {
        return Err(Error::V0MustUseBech32);
    }
    if version != 0 && dec.encoding != bech32::Encoding::Bech32m {
        return Err(Error::V1MustUseBech32m);
    }

    let program = match bech32::convert_bits(5, 8, false, &dec.data[1..]) {
        Some(program) => program,
        None => return Err(Error::InvalidBech32Padding),
    };

    if version == 0 {
        if program.len() != 20 && program.len() != 32 {
            return Err(Error::InvalidSegwitV0ProgramLength(program.len()));
        }
    } else if version > 16 {
        return Err(Error::InvalidWitnessVersion);
    } else if program.len() < 2 || program.len() > MAX_WITNESS_PROGRAM_LENGTH {
        return Err(Error::InvalidWitnessProgramLength(program.len()));
    }

    Ok(Payload::WitnessProgram { version: version, program: program })
}

/// Parse a textual address against a network parameter set, returning
/// the output script it pays to.
pub fn decode_destination(s: &str, params: &Params) -> Result<Script, Error> {
    payload_from_str(s, params).map(|payload| payload.script_pubkey())
}

/// Whether a string parses as a valid address for the given network.
///
/// Accepts exactly the strings [`decode_destination`] accepts, without
/// constructing any script.
pub fn is_valid(s: &str, params: &Params) -> bool {
    payload_from_str(s, params).is_ok()
}

/// Addresses extracted from an output script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destinations {
    /// The extraction status flag. Bare multisig scripts keep this
    /// `false` even when `addresses` is populated, so callers that care
    /// about multisig must inspect the list rather than the flag.
    pub ok: bool,
    /// One textual address per extractable destination, in script order.
    pub addresses: Vec<String>,
}

impl Destinations {
    fn none() -> Destinations {
        Destinations { ok: false, addresses: vec![] }
    }

    fn single(address: String) -> Destinations {
        Destinations { ok: true, addresses: vec![address] }
    }
}

fn encode_base58_destination(payload: &[u8], prefix: &[u8]) -> String {
    let mut data = Vec::with_capacity(prefix.len() + payload.len());
    data.extend_from_slice(prefix);
    data.extend_from_slice(payload);
    base58::check_encode_slice(&data)
}

fn encode_segwit_destination(
    encoding: bech32::Encoding,
    version: u8,
    program: &[u8],
    params: &Params,
) -> Option<String> {
    let mut data = Vec::with_capacity(1 + (program.len() * 8 + 4) / 5);
    data.push(version);
    data.extend(bech32::convert_bits(8, 5, true, program).expect("bytes fit in 8 bits"));
    bech32::encode(encoding, params.bech32_hrp, &data).ok()
}

/// Render an output script as textual addresses for the given network.
///
/// The script is classified with [`standard::solve`] and one address is
/// encoded per destination. `NullData` and `NonStandard` scripts, and
/// payloads outside the encodable ranges, yield an empty result; this
/// function never fails.
///
/// Two legacy behaviors worth knowing about: P2PK outputs (and each key
/// of a bare multisig) encode the *full* serialized public key behind
/// the pubkey-address prefix, a Base58Check form no deployed wallet
/// recognizes; and multisig extraction reports `ok == false` even when
/// it produced addresses.
pub fn extract_destinations(script: &Script, params: &Params) -> Destinations {
    let (kind, solutions) = standard::solve(script);
    match kind {
        ScriptKind::PubKey => {
            if solutions[0].is_empty() {
                return Destinations::none();
            }
            Destinations::single(encode_base58_destination(
                &solutions[0],
                params.base58_prefix(Base58Type::PubkeyAddress),
            ))
        }
        ScriptKind::PubKeyHash => Destinations::single(encode_base58_destination(
            &solutions[0],
            params.base58_prefix(Base58Type::PubkeyAddress),
        )),
        ScriptKind::ScriptHash => Destinations::single(encode_base58_destination(
            &solutions[0],
            params.base58_prefix(Base58Type::ScriptAddress),
        )),
        ScriptKind::WitnessV0KeyHash | ScriptKind::WitnessV0ScriptHash => {
            match encode_segwit_destination(bech32::Encoding::Bech32, 0, &solutions[0], params) {
                Some(address) => Destinations::single(address),
                None => Destinations::none(),
            }
        }
        ScriptKind::WitnessV1Taproot => {
            match encode_segwit_destination(bech32::Encoding::Bech32m, 1, &solutions[0], params) {
                Some(address) => Destinations::single(address),
                None => Destinations::none(),
            }
        }
        ScriptKind::WitnessUnknown => {
            let version = solutions[0][0];
            let program = &solutions[1];
            if version < 1 || version > 16 {
                return Destinations::none();
            }
            if program.len() < 2 || program.len() > MAX_WITNESS_PROGRAM_LENGTH {
                return Destinations::none();
            }
            match encode_segwit_destination(bech32::Encoding::Bech32m, version, program, params) {
                Some(address) => Destinations::single(address),
                None => Destinations::none(),
            }
        }
        ScriptKind::Multisig => {
            // One address per embedded key, skipping empty ones. The
            // status flag stays false regardless.
            let mut addresses = vec![];
            for key in &solutions[1..solutions.len() - 1] {
                if key.is_empty() {
                    continue;
                }
                addresses.push(encode_base58_destination(
                    key,
                    params.base58_prefix(Base58Type::PubkeyAddress),
                ));
            }
            Destinations { ok: false, addresses: addresses }
        }
        ScriptKind::NullData | ScriptKind::NonStandard => Destinations::none(),
    }
}
