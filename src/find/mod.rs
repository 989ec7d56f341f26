//! Dictionary-search subsystem of the LZMA encoder: sliding input
//! window, fixed short-prefix hash tables, and three dictionary
//! organizations (binary trees, interleaved hash chains, cache-efficient
//! fixed-block hash chains) behind one match-enumerator interface.
//!
//! Rust port of aocl-compression `algos/lzma/LzFind.c` /
//! `algos/common/aoclHashChain.h`.  Module map:
//!
//! | Concern                       | Module        |
//! |-------------------------------|---------------|
//! | State, constants, raw reads   | [`types`]     |
//! | Window manager                | [`window`]    |
//! | Geometry and allocation       | [`create`]    |
//! | Init / limits / advance       | [`init`]      |
//! | Position normalization        | [`normalize`] |
//! | Prefix hashes                 | [`hash`]      |
//! | Byte comparison primitives    | [`compare`]   |
//! | Binary-tree walkers           | [`bt`]        |
//! | Interleaved hash chains       | [`hc`]        |
//! | Cache-efficient hash chains   | [`cehc`]      |
//! | Front-ends and function table | [`dispatch`]  |

pub mod bt;
pub mod cehc;
pub mod compare;
pub mod create;
pub mod dispatch;
pub mod hash;
pub mod hc;
pub mod init;
pub mod normalize;
pub mod types;
pub mod window;

pub use cehc::{
    circ_dec_head, circ_inc_head, HASH_CHAIN_16_LEVEL, HASH_CHAIN_MAX_16, HASH_CHAIN_MAX_8,
    HASH_CHAIN_SLOT_SZ_16, HASH_CHAIN_SLOT_SZ_8, K_HASH_GUARANTEE,
};
pub use create::compute_hash_mask;
pub use dispatch::{aocl_create_vtable, create_vtable, Mf2};
pub use normalize::{normalize3, normalize_hash_chain_table};
pub use types::{
    build_crc_table, MatchFinder, K_EMPTY_HASH_VALUE, K_EMPTY_SON_VALUE, K_MAX_VAL_FOR_NORMALIZE,
};
