// AOCL LZMA match finder — Rust port

//! Dictionary-search subsystem of the LZMA encoder, ported from
//! aocl-compression (`algos/lzma/LzFind.c`, `algos/common/aoclHashChain.h`,
//! and the match-finder-facing parts of `LzmaEnc.c`).
//!
//! For every position in a sliding input window the subsystem locates
//! previous occurrences of the byte sequence at the cursor and emits them
//! as `(length, distance - 1)` pairs for the entropy coder.  Three
//! dictionary organizations are provided (binary search trees, interleaved
//! hash chains, and cache-efficient fixed-block hash chains), selected
//! per compression level and input size.

pub mod error;
pub mod find;
pub mod props;

// ─────────────────────────────────────────────────────────────────────────────
// Top-level re-exports for the primary API entry points.
// These mirror the main symbols of LzFind.h and LzmaEnc.h.
// ─────────────────────────────────────────────────────────────────────────────

/// Library error type.
pub use error::LzFindError;

/// Dictionary-search state.  Equivalent to `CMatchFinder` (construction:
/// `MatchFinder_Construct`, sizing: `MatchFinder_Create` /
/// `AOCL_MatchFinder_Create`).
pub use find::MatchFinder;

/// Function table over a dictionary handle.  Equivalent to `IMatchFinder2`.
pub use find::Mf2;

/// Reference function-table selection.  Equivalent to
/// `MatchFinder_CreateVTable`.
pub use find::create_vtable;

/// AOCL-optimized function-table selection.  Equivalent to
/// `AOCL_MatchFinder_CreateVTable`.
pub use find::aocl_create_vtable;

/// Saturating-subtract normalization over a slot table.  Equivalent to
/// `MatchFinder_Normalize3`.
pub use find::normalize3;

/// Block-aware normalization for the cache-efficient chain table.
/// Equivalent to `AOCL_NORMALIZE_HASH_CHAIN_TABLE`.
pub use find::normalize_hash_chain_table;

/// Hash-mask computation for the fixed-block dictionary.  Equivalent to
/// `AOCL_HC_COMPUTE_HASH_MASK`.
pub use find::compute_hash_mask;

/// Encoder properties.  Equivalent to `CLzmaEncProps` /
/// `LzmaEncProps_Init` / `LzmaEncProps_Normalize` /
/// `AOCL_LzmaEncProps_Normalize`.
pub use props::{parse_props_bytes, EncProps, PropsHeader};

// ─────────────────────────────────────────────────────────────────────────────
// Version API
// ─────────────────────────────────────────────────────────────────────────────

pub const LZFIND_VERSION_MAJOR: i32 = 4;
pub const LZFIND_VERSION_MINOR: i32 = 1;
pub const LZFIND_VERSION_RELEASE: i32 = 0;
pub const LZFIND_VERSION_STRING: &str = "4.1.0";

/// Returns the library version string (e.g. `"4.1.0"`).
pub fn version_string() -> &'static str {
    LZFIND_VERSION_STRING
}
