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

//! Network constants
//!
//! This module provides the [`Params`] records that bind textual
//! addresses to a specific Bitcoin network: the Base58 version prefixes
//! and the Bech32 human-readable prefix. The records are static and
//! read-only; every codec entry point takes one by reference.
//!
//! ```rust
//! use bitcoin_addresses::network::constants::Network;
//!
//! assert_eq!(Network::Bitcoin.params().bech32_hrp, "bc");
//! assert_eq!(Network::Regtest.params().bech32_hrp, "bcrt");
//! ```

use std::fmt;
use std::str::FromStr;

/// The cryptocurrency network to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Network {
    /// Classic Bitcoin
    Bitcoin,
    /// Bitcoin's testnet
    Testnet,
    /// Bitcoin's signet
    Signet,
    /// Bitcoin's regtest
    Regtest,
}

impl Network {
    /// Return the static address-format parameters for this network.
    pub fn params(self) -> &'static Params {
        match self {
            Network::Bitcoin => &MAINNET,
            Network::Testnet => &TESTNET,
            Network::Signet => &SIGNET,
            Network::Regtest => &REGTEST,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Network::Bitcoin => "bitcoin",
            Network::Testnet => "testnet",
            Network::Signet => "signet",
            Network::Regtest => "regtest",
        })
    }
}

impl FromStr for Network {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bitcoin" => Ok(Network::Bitcoin),
            "testnet" => Ok(Network::Testnet),
            "signet" => Ok(Network::Signet),
            "regtest" => Ok(Network::Regtest),
            _ => Err(()),
        }
    }
}

/// Keys into the Base58 prefix table of a [`Params`] record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Base58Type {
    /// Prefix for P2PKH-style addresses.
    PubkeyAddress,
    /// Prefix for P2SH addresses.
    ScriptAddress,
}

/// Address-format parameters of a single network.
///
/// The prefixes are byte strings rather than single bytes so that
/// networks with multi-byte version prefixes keep working; all four
/// built-in networks use one-byte prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Params {
    /// The network these parameters describe.
    pub network: Network,
    /// Base58 prefix prepended to pubkey-hash payloads.
    pub pubkey_address_prefix: &'static [u8],
    /// Base58 prefix prepended to script-hash payloads.
    pub script_address_prefix: &'static [u8],
    /// Human-readable prefix of Bech32/Bech32m addresses, lowercase ASCII.
    pub bech32_hrp: &'static str,
}

impl Params {
    /// Look up a Base58 version prefix by address type.
    pub fn base58_prefix(&self, which: Base58Type) -> &'static [u8] {
        match which {
            Base58Type::PubkeyAddress => self.pubkey_address_prefix,
            Base58Type::ScriptAddress => self.script_address_prefix,
        }
    }
}

/// Address-format parameters of the Bitcoin mainnet.
pub static MAINNET: Params = Params {
    network: Network::Bitcoin,
    pubkey_address_prefix: &[0x00],
    script_address_prefix: &[0x05],
    bech32_hrp: "bc",
};

/// Address-format parameters of the Bitcoin testnet.
pub static TESTNET: Params = Params {
    network: Network::Testnet,
    pubkey_address_prefix: &[0x6f],
    script_address_prefix: &[0xc4],
    bech32_hrp: "tb",
};

/// Address-format parameters of signet. Signet shares the testnet
/// prefixes and HRP.
pub static SIGNET: Params = Params {
    network: Network::Signet,
    pubkey_address_prefix: &[0x6f],
    script_address_prefix: &[0xc4],
    bech32_hrp: "tb",
};

/// Address-format parameters of regtest.
pub static REGTEST: Params = Params {
    network: Network::Regtest,
    pubkey_address_prefix: &[0x6f],
    script_address_prefix: &[0xc4],
    bech32_hrp: "bcrt",
};
