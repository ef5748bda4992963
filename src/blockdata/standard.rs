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

//! Standard script templates
//!
//! The solver: pattern-matches a raw output script against the set of
//! standard templates and extracts the semantic payload (public key, key
//! hash, script hash, witness program, multisig parameters). Scripts
//! that are valid but match no template classify as
//! [`ScriptKind::NonStandard`]; classification never fails.

use std::fmt;

use blockdata::opcodes;
use blockdata::script::{bytes_are_push_only, Instruction, Instructions, Script};

/// The standard categories an output script can classify into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScriptKind {
    /// The script matches none of the standard templates.
    NonStandard,
    /// Pay to public key.
    PubKey,
    /// Pay to public key hash.
    PubKeyHash,
    /// Pay to script hash.
    ScriptHash,
    /// Bare m-of-n multisignature.
    Multisig,
    /// `OP_RETURN` data carrier.
    NullData,
    /// Segwit v0 pay to witness public key hash.
    WitnessV0KeyHash,
    /// Segwit v0 pay to witness script hash.
    WitnessV0ScriptHash,
    /// Segwit v1 pay to taproot.
    WitnessV1Taproot,
    /// A witness program with a version not yet assigned a meaning.
    WitnessUnknown,
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            ScriptKind::NonStandard => "nonstandard",
            ScriptKind::PubKey => "pubkey",
            ScriptKind::PubKeyHash => "pubkeyhash",
            ScriptKind::ScriptHash => "scripthash",
            ScriptKind::Multisig => "multisig",
            ScriptKind::NullData => "nulldata",
            ScriptKind::WitnessV0KeyHash => "witness_v0_keyhash",
            ScriptKind::WitnessV0ScriptHash => "witness_v0_scripthash",
            ScriptKind::WitnessV1Taproot => "witness_v1_taproot",
            ScriptKind::WitnessUnknown => "witness_unknown",
        })
    }
}

// A public key is well-sized iff its tag byte says 33 bytes (compressed,
// tags 2 and 3) or 65 bytes (uncompressed or hybrid, tags 4, 6 and 7).
// Whether the bytes encode a point on the curve is out of scope.
fn valid_pubkey_size(key: &[u8]) -> bool {
    match key.first() {
        Some(&2) | Some(&3) => key.len() == 33,
        Some(&4) | Some(&6) | Some(&7) => key.len() == 65,
        _ => false,
    }
}

// <push 33|65 bytes> <pubkey> OP_CHECKSIG
fn match_pubkey(bytes: &[u8]) -> Option<&[u8]> {
    let checksig = opcodes::all::OP_CHECKSIG.into_u8();
    if bytes.len() == 67 && bytes[0] == 65 && bytes[66] == checksig {
        let pubkey = &bytes[1..66];
        if valid_pubkey_size(pubkey) {
            return Some(pubkey);
        }
    }
    if bytes.len() == 35 && bytes[0] == 33 && bytes[34] == checksig {
        let pubkey = &bytes[1..34];
        if valid_pubkey_size(pubkey) {
            return Some(pubkey);
        }
    }
    None
}

// <m> <pubkey_1> .. <pubkey_n> <n> OP_CHECKMULTISIG with m and n small
// integers, 1 <= m <= n <= 16, every key well-sized, nothing trailing.
fn match_multisig(bytes: &[u8]) -> Option<(u8, Vec<Vec<u8>>, u8)> {
    let (last, body) = bytes.split_last()?;
    if *last != opcodes::all::OP_CHECKMULTISIG.into_u8() {
        return None;
    }

    let mut iter = Instructions::from_bytes(body);
    let required = match iter.next() {
        Some(Ok(Instruction::Op(op))) if opcodes::is_small_integer(op) => opcodes::decode_op_n(op),
        _ => return None,
    };
    let mut keys: Vec<Vec<u8>> = vec![];
    let total;
    loop {
        match iter.next() {
            Some(Ok(Instruction::PushBytes(data))) if valid_pubkey_size(data) => {
                keys.push(data.to_vec());
            }
            Some(Ok(Instruction::Op(op))) if opcodes::is_small_integer(op) => {
                total = opcodes::decode_op_n(op);
                break;
            }
            _ => return None,
        }
    }
    if iter.next().is_some() {
        return None;
    }
    if keys.len() != total as usize || required > total {
        return None;
    }
    Some((required, keys, total))
}

/// Classify an output script against the standard templates, returning
/// its kind together with the extracted payload.
///
/// The payload shape is fixed per kind: a single hash or key for the
/// single-destination kinds, `[[version], program]` for
/// [`ScriptKind::WitnessUnknown`], `[[m], key_1, .., key_n, [n]]` for
/// [`ScriptKind::Multisig`], and empty for [`ScriptKind::NullData`] and
/// [`ScriptKind::NonStandard`].
///
/// Classification is a pure function of the script bytes: it never
/// fails and does not depend on any network parameters. The rule order
/// is significant; P2SH wins over everything, then witness programs,
/// null data, P2PK, P2PKH and bare multisig.
pub fn solve(script: &Script) -> (ScriptKind, Vec<Vec<u8>>) {
    let bytes = script.as_bytes();

    if script.is_p2sh() {
        return (ScriptKind::ScriptHash, vec![bytes[2..22].to_vec()]);
    }

    if let Some((version, program)) = script.witness_program() {
        return match (version, program.len()) {
            (0, 20) => (ScriptKind::WitnessV0KeyHash, vec![program.to_vec()]),
            (0, 32) => (ScriptKind::WitnessV0ScriptHash, vec![program.to_vec()]),
            (1, 32) => (ScriptKind::WitnessV1Taproot, vec![program.to_vec()]),
            (0, _) => (ScriptKind::NonStandard, vec![]),
            (v, _) => (ScriptKind::WitnessUnknown, vec![vec![v], program.to_vec()]),
        };
    }

    if script.is_op_return() && bytes_are_push_only(&bytes[1..]) {
        return (ScriptKind::NullData, vec![]);
    }

    if let Some(pubkey) = match_pubkey(bytes) {
        return (ScriptKind::PubKey, vec![pubkey.to_vec()]);
    }

    if script.is_p2pkh() {
        return (ScriptKind::PubKeyHash, vec![bytes[3..23].to_vec()]);
    }

    if let Some((required, keys, total)) = match_multisig(bytes) {
        let mut solutions = Vec::with_capacity(keys.len() + 2);
        solutions.push(vec![required]);
        solutions.extend(keys);
        solutions.push(vec![total]);
        return (ScriptKind::Multisig, solutions);
    }

    (ScriptKind::NonStandard, vec![])
}

#[cfg(test)]
mod tests {
    use hashes::hex::FromHex;

    use super::*;
    use blockdata::script::Script;

    macro_rules! hex (($hex:expr) => (Vec::from_hex($hex).unwrap()));
    macro_rules! hex_script (($hex:expr) => (Script::from(hex!($hex))));

    #[test]
    fn solve_p2pkh() {
        // OP_DUP OP_HASH160 OP_PUSHBYTES_20 <hash> OP_EQUALVERIFY OP_CHECKSIG
        let script = hex_script!("76a91412ab8dc588ca9d5787dde7eb29569da63c3a238c88ac");
        let (kind, solutions) = solve(&script);
        assert_eq!(kind, ScriptKind::PubKeyHash);
        assert_eq!(solutions, vec![hex!("12ab8dc588ca9d5787dde7eb29569da63c3a238c")]);
    }

    #[test]
    fn solve_p2pk() {
        // https://blockchain.info/tx/e36f06a8dfe44c3d64be2d3fe56c77f91f6a39da4a5ffc086ecb5db9664e8583
        // OP_PUSHBYTES_65 <uncompressed key> OP_CHECKSIG
        let script = hex_script!(
            "41044bca633a91de10df85a63d0a24cb09783148fe0e16c92e937fc4491580c860757148effa0595a955f\
             44078b48ba67fa198782e8bb68115da0daa8fde5301f7f9ac"
        );
        let (kind, solutions) = solve(&script);
        assert_eq!(kind, ScriptKind::PubKey);
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].len(), 65);
        assert_eq!(solutions[0][0], 0x04);

        // OP_PUSHBYTES_33 <compressed key> OP_CHECKSIG
        let script = hex_script!(
            "21022df8750480ad5b26950b25c7ba79d3e37d75f640f8e5d9bcd5b150a0f85014daac"
        );
        let (kind, solutions) = solve(&script);
        assert_eq!(kind, ScriptKind::PubKey);
        assert_eq!(solutions[0].len(), 33);

        // The right shape around a tag byte that is not a pubkey tag
        let script = hex_script!(
            "21092df8750480ad5b26950b25c7ba79d3e37d75f640f8e5d9bcd5b150a0f85014daac"
        );
        assert_eq!(solve(&script).0, ScriptKind::NonStandard);
    }

    #[test]
    fn solve_p2sh() {
        // OP_HASH160 OP_PUSHBYTES_20 <hash> OP_EQUAL
        let script = hex_script!("a914e9c3dd0c07aac76179ebc76a6c78d4d67c6c160a87");
        let (kind, solutions) = solve(&script);
        assert_eq!(kind, ScriptKind::ScriptHash);
        assert_eq!(solutions, vec![hex!("e9c3dd0c07aac76179ebc76a6c78d4d67c6c160a")]);
    }

    #[test]
    fn solve_multisig() {
        // 2-of-3 multisig:
        // OP_2 33 0x022df8750480ad5b26950b25c7ba79d3e37d75f640f8e5d9bcd5b150a0f85014da
        // 33 0x03e3818b65bcc73a7d64064106a859cc1a5a728c4345ff0b641209fba0d90de6e9
        // 33 0x021f2f6e1e50cb6a953935c3601284925decd3fd21bc445712576873fb8c6ebc18 OP_3 OP_CHECKMULTISIG
        let script = hex_script!(
            "5221022df8750480ad5b26950b25c7ba79d3e37d75f640f8e5d9bcd5b150a0f85014da2103e3818b65bcc\
             73a7d64064106a859cc1a5a728c4345ff0b641209fba0d90de6e921021f2f6e1e50cb6a953935c3601284\
             925decd3fd21bc445712576873fb8c6ebc1853ae"
        );
        let (kind, solutions) = solve(&script);
        assert_eq!(kind, ScriptKind::Multisig);
        assert_eq!(solutions.len(), 5);
        assert_eq!(solutions[0], vec![2]);
        assert_eq!(solutions[4], vec![3]);
        assert_eq!(
            solutions[1],
            hex!("022df8750480ad5b26950b25c7ba79d3e37d75f640f8e5d9bcd5b150a0f85014da")
        );

        // 1-of-1
        let script = hex_script!(
            "5121022df8750480ad5b26950b25c7ba79d3e37d75f640f8e5d9bcd5b150a0f85014da51ae"
        );
        assert_eq!(solve(&script).0, ScriptKind::Multisig);

        // m > n never matches
        let script = hex_script!(
            "5321022df8750480ad5b26950b25c7ba79d3e37d75f640f8e5d9bcd5b150a0f85014da2103e3818b65bcc\
             73a7d64064106a859cc1a5a728c4345ff0b641209fba0d90de6e952ae"
        );
        assert_eq!(solve(&script).0, ScriptKind::NonStandard);

        // Key count disagreeing with n never matches
        let script = hex_script!(
            "5121022df8750480ad5b26950b25c7ba79d3e37d75f640f8e5d9bcd5b150a0f85014da52ae"
        );
        assert_eq!(solve(&script).0, ScriptKind::NonStandard);

        // Trailing opcode after OP_CHECKMULTISIG never matches
        let script = hex_script!(
            "5121022df8750480ad5b26950b25c7ba79d3e37d75f640f8e5d9bcd5b150a0f85014da51ae75"
        );
        assert_eq!(solve(&script).0, ScriptKind::NonStandard);
    }

    #[test]
    fn solve_null_data() {
        // OP_RETURN 13 0x636861726c6579206c6f766573206865696469
        let script = hex_script!("6a13636861726c6579206c6f766573206865696469");
        let (kind, solutions) = solve(&script);
        assert_eq!(kind, ScriptKind::NullData);
        assert!(solutions.is_empty());

        // Bare OP_RETURN
        assert_eq!(solve(&hex_script!("6a")).0, ScriptKind::NullData);
        // OP_RETURN OP_RESERVED is push-only
        assert_eq!(solve(&hex_script!("6a50")).0, ScriptKind::NullData);
        // OP_RETURN followed by a non-push opcode is not
        assert_eq!(solve(&hex_script!("6a76")).0, ScriptKind::NonStandard);
        // OP_RETURN followed by a truncated push is not
        assert_eq!(solve(&hex_script!("6a14aabb")).0, ScriptKind::NonStandard);
    }

    #[test]
    fn solve_witness() {
        let script = hex_script!("0014751e76e8199196d454941c45d1b3a323f1433bd6");
        let (kind, solutions) = solve(&script);
        assert_eq!(kind, ScriptKind::WitnessV0KeyHash);
        assert_eq!(solutions, vec![hex!("751e76e8199196d454941c45d1b3a323f1433bd6")]);

        let script = hex_script!(
            "00201863143c14c5166804bd19203356da136c985678cd4d27a1b8c6329604903262"
        );
        assert_eq!(solve(&script).0, ScriptKind::WitnessV0ScriptHash);

        let script = hex_script!(
            "5120a60869f0dbcf1dc659c9cecbaf8050135ea9e8cdc487053f1dc6880949dc684c"
        );
        assert_eq!(solve(&script).0, ScriptKind::WitnessV1Taproot);

        // v1 with a 20-byte program is merely unknown
        let script = hex_script!("5114751e76e8199196d454941c45d1b3a323f1433bd6");
        let (kind, solutions) = solve(&script);
        assert_eq!(kind, ScriptKind::WitnessUnknown);
        assert_eq!(solutions.len(), 2);
        assert_eq!(solutions[0], vec![1]);
        assert_eq!(solutions[1], hex!("751e76e8199196d454941c45d1b3a323f1433bd6"));

        // v2, 16-byte program
        let script = hex_script!("5210751e76e8199196d454941c45d1b3a323");
        let (kind, solutions) = solve(&script);
        assert_eq!(kind, ScriptKind::WitnessUnknown);
        assert_eq!(solutions[0], vec![2]);

        // v0 with a program that is neither 20 nor 32 bytes
        let script = hex_script!("0013751e76e8199196d454941c45d1b3a323f1433b");
        assert_eq!(solve(&script), (ScriptKind::NonStandard, vec![]));
    }

    #[test]
    fn solve_non_standard() {
        // OP_IFDUP OP_IF OP_2SWAP OP_VERIFY OP_2OVER OP_DEPTH
        assert_eq!(solve(&hex_script!("736372697074")).0, ScriptKind::NonStandard);
        // A push claiming more bytes than the script has
        assert_eq!(solve(&hex_script!("4cff00")).0, ScriptKind::NonStandard);
        // Empty script
        assert_eq!(solve(&Script::new()).0, ScriptKind::NonStandard);
    }

    #[test]
    fn kind_strings() {
        assert_eq!(ScriptKind::PubKeyHash.to_string(), "pubkeyhash");
        assert_eq!(ScriptKind::WitnessV0KeyHash.to_string(), "witness_v0_keyhash");
        assert_eq!(ScriptKind::WitnessV1Taproot.to_string(), "witness_v1_taproot");
        assert_eq!(ScriptKind::NonStandard.to_string(), "nonstandard");
    }
}
