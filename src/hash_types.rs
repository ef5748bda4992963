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

//! File defines types for the hashes that appear inside output scripts
//! and addresses. The codec never computes these hashes; the newtypes
//! carry payload bytes that were hashed elsewhere.

use hashes::hash160;
use hashes::Hash;

hash_newtype!(PubkeyHash, hash160::Hash, 20, doc="A hash of a public key.");
hash_newtype!(ScriptHash, hash160::Hash, 20, doc="A hash of Bitcoin Script bytecode.");
