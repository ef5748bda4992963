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

//! Scripts
//!
//! A [`Script`] is the raw byte program found in a transaction output's
//! `scriptPubKey`. The codec treats it as opaque except where the
//! standard templates require reading it opcode by opcode, which is what
//! [`Instructions`] does: one opcode per step, together with the payload
//! of any data push (including the `OP_PUSHDATA1/2/4` forms with their
//! little-endian length bytes).

use std::{error, fmt};

use blockdata::opcodes;
use hash_types::{PubkeyHash, ScriptHash};
use hashes::hex::ToHex;
#[cfg(feature = "serde")]
use serde;

/// A Bitcoin output script.
#[derive(Clone, Default, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct Script(Box<[u8]>);

/// Ways that a script might fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A data push ran past the end of the script.
    EarlyEndOfScript,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::EarlyEndOfScript => f.write_str("unexpected end of script"),
        }
    }
}

impl error::Error for Error {}

impl Script {
    /// Creates a new empty script.
    pub fn new() -> Script {
        Script(vec![].into_boxed_slice())
    }

    /// Generates a P2PKH-type scriptPubkey.
    pub fn new_p2pkh(pubkey_hash: &PubkeyHash) -> Script {
        Builder::new()
            .push_opcode(opcodes::all::OP_DUP)
            .push_opcode(opcodes::all::OP_HASH160)
            .push_slice(&pubkey_hash[..])
            .push_opcode(opcodes::all::OP_EQUALVERIFY)
            .push_opcode(opcodes::all::OP_CHECKSIG)
            .into_script()
    }

    /// Generates a P2SH-type scriptPubkey from the hash of the redeem
    /// script.
    pub fn new_p2sh(script_hash: &ScriptHash) -> Script {
        Builder::new()
            .push_opcode(opcodes::all::OP_HASH160)
            .push_slice(&script_hash[..])
            .push_opcode(opcodes::all::OP_EQUAL)
            .into_script()
    }

    /// Generates a witness-program scriptPubkey from a version in
    /// `0..=16` and a program.
    pub fn new_witness_program(version: u8, program: &[u8]) -> Script {
        Builder::new()
            .push_opcode(opcodes::encode_op_n(version))
            .push_slice(program)
            .into_script()
    }

    /// The length in bytes of the script.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the script is the empty script.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the script data as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &*self.0
    }

    /// Returns a copy of the script data.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.clone().into_vec()
    }

    /// Checks whether a script pubkey is a P2SH output.
    #[inline]
    pub fn is_p2sh(&self) -> bool {
        self.0.len() == 23
            && self.0[0] == opcodes::all::OP_HASH160.into_u8()
            && self.0[1] == opcodes::all::OP_PUSHBYTES_20.into_u8()
            && self.0[22] == opcodes::all::OP_EQUAL.into_u8()
    }

    /// Checks whether a script pubkey is a P2PKH output.
    #[inline]
    pub fn is_p2pkh(&self) -> bool {
        self.0.len() == 25
            && self.0[0] == opcodes::all::OP_DUP.into_u8()
            && self.0[1] == opcodes::all::OP_HASH160.into_u8()
            && self.0[2] == opcodes::all::OP_PUSHBYTES_20.into_u8()
            && self.0[23] == opcodes::all::OP_EQUALVERIFY.into_u8()
            && self.0[24] == opcodes::all::OP_CHECKSIG.into_u8()
    }

    /// Checks whether a script pubkey starts with `OP_RETURN`.
    #[inline]
    pub fn is_op_return(&self) -> bool {
        !self.0.is_empty() && self.0[0] == opcodes::all::OP_RETURN.into_u8()
    }

    /// Parses the script as a witness program, returning the version and
    /// the program bytes.
    ///
    /// The shape rule is the BIP-141 one: total length in `4..=42`, a
    /// first byte of `OP_0` or `OP_1..OP_16`, and a second byte that is a
    /// direct push of exactly the remaining bytes.
    pub fn witness_program(&self) -> Option<(u8, &[u8])> {
        if self.0.len() < 4 || self.0.len() > 42 {
            return None;
        }
        let ver_op = opcodes::All::from(self.0[0]);
        if ver_op != opcodes::all::OP_PUSHBYTES_0 && !opcodes::is_small_integer(ver_op) {
            return None;
        }
        if self.0[1] as usize != self.0.len() - 2 {
            return None;
        }
        Some((opcodes::decode_op_n(ver_op), &self.0[2..]))
    }

    /// Checks whether a script pubkey is a witness program.
    #[inline]
    pub fn is_witness_program(&self) -> bool {
        self.witness_program().is_some()
    }

    /// Whether a script consists entirely of pushes.
    ///
    /// Everything up to `OP_16` counts as a push, so `OP_RESERVED` and
    /// the small-integer opcodes qualify. A truncated data push makes
    /// the script non-push-only.
    pub fn is_push_only(&self) -> bool {
        bytes_are_push_only(&self.0)
    }

    /// Iterate over the script in the form of `Instruction`s, which are
    /// an enum covering opcodes, datapushes and errors.
    pub fn instructions(&self) -> Instructions {
        Instructions { data: &self.0 }
    }
}

pub(crate) fn bytes_are_push_only(bytes: &[u8]) -> bool {
    for inst in (Instructions { data: bytes }) {
        match inst {
            Err(_) => return false,
            Ok(Instruction::PushBytes(_)) => {}
            Ok(Instruction::Op(op)) => {
                if op.into_u8() > opcodes::all::OP_PUSHNUM_16.into_u8() {
                    return false;
                }
            }
        }
    }
    true
}

impl From<Vec<u8>> for Script {
    fn from(v: Vec<u8>) -> Script {
        Script(v.into_boxed_slice())
    }
}

/// A "parsed opcode" which allows iterating over a [`Script`] in a more
/// sensible way.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Instruction<'a> {
    /// Push a bunch of data.
    PushBytes(&'a [u8]),
    /// Some non-push opcode.
    Op(opcodes::All),
}

/// Iterator over a script returning parsed opcodes.
pub struct Instructions<'a> {
    data: &'a [u8],
}

impl<'a> Instructions<'a> {
    pub(crate) fn from_bytes(data: &'a [u8]) -> Instructions<'a> {
        Instructions { data: data }
    }

    fn read_pushdata(&mut self, len_bytes: usize) -> Option<Result<Instruction<'a>, Error>> {
        if self.data.len() < 1 + len_bytes {
            self.data = &[];
            return Some(Err(Error::EarlyEndOfScript));
        }
        // Little-endian push length
        let mut n = 0usize;
        for i in 0..len_bytes {
            n |= (self.data[1 + i] as usize) << (8 * i);
        }
        if self.data.len() < 1 + len_bytes + n {
            self.data = &[];
            return Some(Err(Error::EarlyEndOfScript));
        }
        let ret = Instruction::PushBytes(&self.data[1 + len_bytes..1 + len_bytes + n]);
        self.data = &self.data[1 + len_bytes + n..];
        Some(Ok(ret))
    }
}

impl<'a> Iterator for Instructions<'a> {
    type Item = Result<Instruction<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.is_empty() {
            return None;
        }
        let opcode = opcodes::All::from(self.data[0]);
        if opcode == opcodes::all::OP_PUSHBYTES_0 {
            self.data = &self.data[1..];
            Some(Ok(Instruction::PushBytes(&[])))
        } else if let Some(n) = opcode.push_bytes_len() {
            if self.data.len() < n + 1 {
                self.data = &[];
                return Some(Err(Error::EarlyEndOfScript));
            }
            let ret = Instruction::PushBytes(&self.data[1..n + 1]);
            self.data = &self.data[n + 1..];
            Some(Ok(ret))
        } else if opcode == opcodes::all::OP_PUSHDATA1 {
            self.read_pushdata(1)
        } else if opcode == opcodes::all::OP_PUSHDATA2 {
            self.read_pushdata(2)
        } else if opcode == opcodes::all::OP_PUSHDATA4 {
            self.read_pushdata(4)
        } else {
            self.data = &self.data[1..];
            Some(Ok(Instruction::Op(opcode)))
        }
    }
}

/// An object which can be used to construct a script piece by piece.
#[derive(Default, PartialEq, Eq, Debug, Clone)]
pub struct Builder(Vec<u8>);

impl Builder {
    /// Creates a new empty script builder.
    pub fn new() -> Builder {
        Builder(vec![])
    }

    /// The length in bytes of the script under construction.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the script under construction is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Adds instructions to push some arbitrary data onto the stack,
    /// using the shortest push encoding for its length.
    pub fn push_slice(mut self, data: &[u8]) -> Builder {
        match data.len() as u64 {
            n if n < opcodes::all::OP_PUSHDATA1.into_u8() as u64 => {
                self.0.push(n as u8);
            }
            n if n < 0x100 => {
                self.0.push(opcodes::all::OP_PUSHDATA1.into_u8());
                self.0.push(n as u8);
            }
            n if n < 0x10000 => {
                self.0.push(opcodes::all::OP_PUSHDATA2.into_u8());
                self.0.push((n % 0x100) as u8);
                self.0.push((n / 0x100) as u8);
            }
            n if n < 0x100000000 => {
                self.0.push(opcodes::all::OP_PUSHDATA4.into_u8());
                self.0.push((n % 0x100) as u8);
                self.0.push(((n / 0x100) % 0x100) as u8);
                self.0.push(((n / 0x10000) % 0x100) as u8);
                self.0.push((n / 0x1000000) as u8);
            }
            _ => panic!("tried to put a 4bn+ sized object into a script!"),
        }
        self.0.extend(data.iter().cloned());
        self
    }

    /// Adds a single opcode to the script.
    pub fn push_opcode(mut self, data: opcodes::All) -> Builder {
        self.0.push(data.into_u8());
        self
    }

    /// Converts the `Builder` into an unmodifiable `Script`.
    pub fn into_script(self) -> Script {
        Script(self.0.into_boxed_slice())
    }
}

impl From<Vec<u8>> for Builder {
    fn from(v: Vec<u8>) -> Builder {
        Builder(v)
    }
}

// User-facing serialization for `Script`.
#[cfg(feature = "serde")]
impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&format!("{:x}", self))
        } else {
            serializer.serialize_bytes(self.as_bytes())
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Script, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use hashes::hex::FromHex;

        struct Visitor;
        impl<'de> serde::de::Visitor<'de> for Visitor {
            type Value = Script;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a script hex string or raw script bytes")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let v = Vec::from_hex(v).map_err(E::custom)?;
                Ok(Script::from(v))
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Script::from(v.to_vec()))
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_str(Visitor)
        } else {
            deserializer.deserialize_bytes(Visitor)
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for inst in self.instructions() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            match inst {
                Err(_) => return f.write_str("<push past end>"),
                Ok(Instruction::Op(op)) => write!(f, "{:?}", op)?,
                Ok(Instruction::PushBytes(data)) => {
                    if data.is_empty() {
                        f.write_str("OP_0")?;
                    } else {
                        write!(f, "OP_PUSHBYTES_{} {}", data.len(), data.to_hex())?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Script(")?;
        fmt::Display::fmt(self, f)?;
        f.write_str(")")
    }
}

impl fmt::LowerHex for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &ch in self.0.iter() {
            write!(f, "{:02x}", ch)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use hashes::hex::FromHex;

    use super::*;
    use blockdata::opcodes;

    macro_rules! hex_script (($hex:expr) => (Script::from(Vec::from_hex($hex).unwrap())));

    #[test]
    fn script_build() {
        let script = Builder::new()
            .push_opcode(opcodes::all::OP_DUP)
            .push_opcode(opcodes::all::OP_HASH160)
            .push_slice(&[0x16, 0x2c, 0x5e, 0xa7, 0x1c, 0x0b, 0x23, 0xf5, 0xb9, 0x02,
                          0x2e, 0xf0, 0x47, 0xc4, 0xa8, 0x64, 0x70, 0xa5, 0xb0, 0x70])
            .push_opcode(opcodes::all::OP_EQUALVERIFY)
            .push_opcode(opcodes::all::OP_CHECKSIG)
            .into_script();
        assert_eq!(
            format!("{:x}", script),
            "76a914162c5ea71c0b23f5b9022ef047c4a86470a5b07088ac"
        );
        assert!(script.is_p2pkh());
    }

    #[test]
    fn script_push_encodings() {
        // Direct pushes up to 75 bytes
        let script = Builder::new().push_slice(&[42; 75]).into_script();
        assert_eq!(script.as_bytes()[0], 75);
        assert_eq!(script.len(), 76);
        // OP_PUSHDATA1
        let script = Builder::new().push_slice(&[42; 76]).into_script();
        assert_eq!(script.as_bytes()[..2], [0x4c, 76]);
        assert_eq!(script.len(), 78);
        // OP_PUSHDATA2, little-endian length
        let script = Builder::new().push_slice(&[42; 0x102]).into_script();
        assert_eq!(script.as_bytes()[..3], [0x4d, 0x02, 0x01]);
        // Empty push
        let script = Builder::new().push_slice(&[]).into_script();
        assert_eq!(script.as_bytes(), &[0x00]);

        // All of them parse back to the same payload
        for len in &[0usize, 1, 75, 76, 255, 256, 0x102] {
            let script = Builder::new().push_slice(&vec![42; *len]).into_script();
            let mut iter = script.instructions();
            assert_eq!(iter.next(), Some(Ok(Instruction::PushBytes(&vec![42u8; *len][..]))));
            assert_eq!(iter.next(), None);
        }
    }

    #[test]
    fn script_instructions() {
        let script = hex_script!("76a914162c5ea71c0b23f5b9022ef047c4a86470a5b07088ac");
        let hash = Vec::from_hex("162c5ea71c0b23f5b9022ef047c4a86470a5b070").unwrap();
        let mut iter = script.instructions();
        assert_eq!(iter.next(), Some(Ok(Instruction::Op(opcodes::all::OP_DUP))));
        assert_eq!(iter.next(), Some(Ok(Instruction::Op(opcodes::all::OP_HASH160))));
        assert_eq!(iter.next(), Some(Ok(Instruction::PushBytes(&hash[..]))));
        assert_eq!(iter.next(), Some(Ok(Instruction::Op(opcodes::all::OP_EQUALVERIFY))));
        assert_eq!(iter.next(), Some(Ok(Instruction::Op(opcodes::all::OP_CHECKSIG))));
        assert_eq!(iter.next(), None);

        // A push claiming 255 bytes with none following
        let script = hex_script!("4cff00");
        assert_eq!(script.instructions().next(), Some(Err(Error::EarlyEndOfScript)));

        // A direct push cut short
        let script = hex_script!("14aabb");
        assert_eq!(script.instructions().next(), Some(Err(Error::EarlyEndOfScript)));
    }

    #[test]
    fn script_predicates() {
        assert!(hex_script!("a914162c5ea71c0b23f5b9022ef047c4a86470a5b07087").is_p2sh());
        assert!(!hex_script!("a914162c5ea71c0b23f5b9022ef047c4a86470a5b07088").is_p2sh());
        assert!(hex_script!("76a914162c5ea71c0b23f5b9022ef047c4a86470a5b07088ac").is_p2pkh());
        assert!(hex_script!("6a13636861726c6579206c6f766573206865696469").is_op_return());

        let script = hex_script!("0014751e76e8199196d454941c45d1b3a323f1433bd6");
        assert!(script.is_witness_program());
        let (version, program) = script.witness_program().unwrap();
        assert_eq!(version, 0);
        assert_eq!(program.len(), 20);

        let script = hex_script!("5120a60869f0dbcf1dc659c9cecbaf8050135ea9e8cdc487053f1dc6880949dc684c");
        assert_eq!(script.witness_program().map(|(v, p)| (v, p.len())), Some((1, 32)));

        // Wrong length byte is not a witness program
        assert!(!hex_script!("0013751e76e8199196d454941c45d1b3a323f1433bd6").is_witness_program());
        // Too short / too long
        assert!(!hex_script!("000175").is_witness_program());
        let mut long = vec![0x00, 41];
        long.extend(vec![0u8; 41]);
        assert!(!Script::from(long).is_witness_program());
    }

    #[test]
    fn script_is_push_only() {
        // OP_RESERVED and small integers count as pushes
        assert!(hex_script!("00510260ea").is_push_only());
        assert!(hex_script!("50").is_push_only());
        assert!(Script::new().is_push_only());
        // OP_DUP is not a push
        assert!(!hex_script!("76").is_push_only());
        // Truncated push
        assert!(!hex_script!("14aabb").is_push_only());
    }

    #[test]
    fn script_asm() {
        assert_eq!(
            hex_script!("76a914162c5ea71c0b23f5b9022ef047c4a86470a5b07088ac").to_string(),
            "OP_DUP OP_HASH160 OP_PUSHBYTES_20 162c5ea71c0b23f5b9022ef047c4a86470a5b070 \
             OP_EQUALVERIFY OP_CHECKSIG"
        );
        assert_eq!(hex_script!("00").to_string(), "OP_0");
        assert_eq!(hex_script!("4cff00").to_string(), "<push past end>");
    }

    #[test]
    #[cfg(feature = "serde")]
    fn script_json_serialize() {
        use serde_json;

        let original = hex_script!("827651a0698faaa9a8a7a687");
        let json = serde_json::to_value(&original).unwrap();
        assert_eq!(json, serde_json::Value::String("827651a0698faaa9a8a7a687".to_owned()));
        let des: Script = serde_json::from_value(json).unwrap();
        assert_eq!(des, original);
    }
}
