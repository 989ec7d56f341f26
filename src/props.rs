//! Encoder properties: presets, normalization, validation, and the
//! 5-byte stream-header encoding.
//!
//! Translated from LzmaEnc.h / LzmaEnc.c:
//!   - `CLzmaEncProps`               → [`EncProps`]
//!   - `LzmaEncProps_Init`           → [`EncProps::default`]
//!   - `LzmaEncProps_Normalize`      → [`EncProps::normalize`]
//!   - `AOCL_LzmaEncProps_Normalize` → [`EncProps::normalize_opt`]
//!   - `LzmaEncProps_GetDictSize`    → [`EncProps::get_dict_size`]
//!   - parameter checks of `LzmaEnc_SetProps` → [`EncProps::validate`]
//!   - `LzmaEnc_WriteProperties` / `LzmaProps_Decode`
//!                                   → [`EncProps::write_props_bytes`] /
//!                                     [`parse_props_bytes`]
//!
//! The multithreading knobs of the C struct (`numThreads`, `affinity`)
//! are not ported; this crate's dictionary is single-threaded.

use std::io;

use log::debug;

use crate::error::LzFindError;
use crate::find::{
    aocl_create_vtable, MatchFinder, Mf2, HASH_CHAIN_16_LEVEL, HASH_CHAIN_SLOT_SZ_16,
    HASH_CHAIN_SLOT_SZ_8, K_HASH_GUARANTEE,
};

/// Maximum match length representable in the LZMA format.
pub const LZMA_MATCH_LEN_MAX: u32 = 273;

/// Encoder look-ahead margin kept on both sides of the window
/// (`kNumOpts` in the encoder).
pub const K_NUM_OPTS: u32 = 1 << 12;

/// Smallest dictionary a decoder will work with; smaller header values
/// clamp up to this.
pub const K_DIC_SIZE_MIN: u32 = 1 << 12;

/// Largest accepted dictionary (3 GiB).
pub const K_DIC_SIZE_MAX: u32 = 3 << 30;

/// Below this input size the cache-efficient hash chains stay off.
pub const MAX_SIZE_FOR_CE_HC_OFF: u64 = 32 * 1024;
/// At or above this input size the cache-efficient hash chains are on.
pub const MIN_SIZE_FOR_CE_HC_ON: u64 = (K_HASH_GUARANTEE as u64) * HASH_CHAIN_SLOT_SZ_8 as u64;

// Dictionary presets when cacheEfficientStrategy is requested; indexed by
// level.  Levels 5-9 coincide with the reference formula.
const CE_DICT_SIZES: [u32; 10] = [
    1 << 19,
    1 << 20,
    1 << 21,
    1 << 23,
    1 << 24,
    1 << 24,
    1 << 25,
    1 << 25,
    1 << 26,
    1 << 26,
];

/// Encoder-facing configuration.  `-1` (or `0` for sizes) means "derive
/// from the level during normalization".
///
/// Mirrors `CLzmaEncProps` plus the AOCL `srcLen` /
/// `cacheEfficientStrategy` extensions.
#[derive(Clone, Debug)]
pub struct EncProps {
    /// Compression level, `0..=9`.
    pub level: i32,
    /// Dictionary (history) size; `0` = preset by level.
    pub dict_size: u32,
    /// Literal-context bits, `0..=8`.
    pub lc: i32,
    /// Literal-position bits, `0..=4`.
    pub lp: i32,
    /// Position-state bits, `0..=4`.
    pub pb: i32,
    /// `0` = fast mode, `1` = normal mode.
    pub algo: i32,
    /// Fast bytes, `5..=273`: length ceiling per match search.
    pub fb: i32,
    /// `0` = hash chains, `1` = binary trees.
    pub bt_mode: i32,
    /// Hash prefix width, `2..=5`.
    pub num_hash_bytes: i32,
    /// Cut value: dictionary nodes examined per search, `1..=2^30`;
    /// `0` = preset.
    pub mc: u32,
    /// Write an end-of-stream marker.
    pub write_end_mark: u32,
    /// Estimated upper bound of the data size; shrinks the dictionary
    /// preset for small inputs.
    pub reduce_size: u64,
    /// Exact input size when known (`0` = unknown); drives the
    /// cache-efficient strategy choice.
    pub src_len: u64,
    /// Cache-efficient hash-chain dictionary: `-1` auto by `src_len`,
    /// `0` off, `1` on.  Forced off in binary-tree mode.
    pub cache_efficient_strategy: i32,
}

impl Default for EncProps {
    /// Equivalent to `LzmaEncProps_Init`.
    fn default() -> Self {
        EncProps {
            level: 5,
            dict_size: 0,
            lc: -1,
            lp: -1,
            pb: -1,
            algo: -1,
            fb: -1,
            bt_mode: -1,
            num_hash_bytes: -1,
            mc: 0,
            write_end_mark: 0,
            reduce_size: u64::MAX,
            src_len: 0,
            cache_efficient_strategy: -1,
        }
    }
}

impl EncProps {
    fn resolve_level(&mut self) -> i32 {
        let mut level = self.level;
        if level < 0 {
            level = 5;
        }
        self.level = level;
        level
    }

    fn reference_dict_preset(level: i32) -> u32 {
        if level <= 3 {
            1u32 << (level * 2 + 16)
        } else if level <= 6 {
            1u32 << (level + 19)
        } else if level <= 7 {
            1 << 25
        } else {
            1 << 26
        }
    }

    fn clamp_to_reduce_size(&mut self) {
        if (self.dict_size as u64) > self.reduce_size {
            let mut v = self.reduce_size as u32;
            if v < K_DIC_SIZE_MIN {
                v = K_DIC_SIZE_MIN;
            }
            if self.dict_size > v {
                self.dict_size = v;
            }
        }
    }

    fn resolve_scalar_fields(&mut self, level: i32) {
        if self.lc < 0 {
            self.lc = 3;
        }
        if self.lp < 0 {
            self.lp = 0;
        }
        if self.pb < 0 {
            self.pb = 2;
        }
        if self.algo < 0 {
            self.algo = if level < 5 { 0 } else { 1 };
        }
        if self.fb < 0 {
            self.fb = if level < 7 { 32 } else { 64 };
        }
        if self.bt_mode < 0 {
            self.bt_mode = if self.algo == 0 { 0 } else { 1 };
        }
        if self.num_hash_bytes < 0 {
            self.num_hash_bytes = if self.bt_mode != 0 { 4 } else { 5 };
        }
    }

    fn resolve_mc(&mut self) {
        if self.mc == 0 {
            self.mc = (16 + (self.fb as u32 >> 1)) >> (if self.bt_mode != 0 { 0 } else { 1 });
        }
    }

    /// Fill every `-1`/`0` field from the level presets.
    ///
    /// Equivalent to `LzmaEncProps_Normalize`.
    pub fn normalize(&mut self) {
        let level = self.resolve_level();
        if self.dict_size == 0 {
            self.dict_size = Self::reference_dict_preset(level);
        }
        self.clamp_to_reduce_size();
        self.resolve_scalar_fields(level);
        self.resolve_mc();
    }

    /// Like [`normalize`](Self::normalize), with the cache-efficient
    /// strategy resolved from `src_len` and the dictionary preset/floor
    /// adjusted for the fixed-block chain geometry.
    ///
    /// Strategy, with `cache_efficient_strategy = -1`:
    /// - `src_len < 32 KiB`: disabled
    /// - `32 KiB <= src_len < 512 KiB`: enabled iff `num_hash_bytes == 4`
    /// - `src_len >= 512 KiB`: enabled
    ///
    /// Explicit `0`/`1` is honored (hash-chain mode only; binary-tree
    /// mode always forces `0`).
    ///
    /// Equivalent to `AOCL_LzmaEncProps_Normalize`.
    pub fn normalize_opt(&mut self) {
        let level = self.resolve_level();
        self.resolve_scalar_fields(level);

        if self.bt_mode != 0 {
            self.cache_efficient_strategy = 0;
        } else if self.cache_efficient_strategy < 0 {
            self.cache_efficient_strategy = if self.src_len == 0 {
                0
            } else if self.src_len >= MIN_SIZE_FOR_CE_HC_ON {
                1
            } else if self.src_len >= MAX_SIZE_FOR_CE_HC_OFF {
                i32::from(self.num_hash_bytes == 4)
            } else {
                0
            };
        }

        if self.dict_size == 0 {
            self.dict_size = if self.cache_efficient_strategy == 1 {
                CE_DICT_SIZES[level.clamp(0, 9) as usize]
            } else {
                Self::reference_dict_preset(level)
            };
        }
        self.clamp_to_reduce_size();

        if self.cache_efficient_strategy == 1 {
            // the fixed-block table needs at least kHashGuarantee blocks
            let slot = if level < HASH_CHAIN_16_LEVEL as i32 {
                HASH_CHAIN_SLOT_SZ_8
            } else {
                HASH_CHAIN_SLOT_SZ_16
            } as u32;
            let min_dict = K_HASH_GUARANTEE * slot;
            if self.dict_size < min_dict {
                self.dict_size = min_dict;
            }
        }

        self.resolve_mc();
        debug!(
            "props: level={} dict={} btMode={} nhb={} ces={} fb={} mc={}",
            self.level,
            self.dict_size,
            self.bt_mode,
            self.num_hash_bytes,
            self.cache_efficient_strategy,
            self.fb,
            self.mc
        );
    }

    /// Dictionary size this configuration normalizes to, without
    /// mutating it.
    ///
    /// Equivalent to `LzmaEncProps_GetDictSize`.
    pub fn get_dict_size(&self) -> u32 {
        let mut p = self.clone();
        p.normalize();
        p.dict_size
    }

    /// Range checks; call after normalization.  Mirrors the parameter
    /// checks of `LzmaEnc_SetProps`, extended to every documented range.
    pub fn validate(&self) -> Result<(), LzFindError> {
        if !(0..=8).contains(&self.lc) {
            return Err(LzFindError::InvalidLc(self.lc));
        }
        if !(0..=4).contains(&self.lp) {
            return Err(LzFindError::InvalidLp(self.lp));
        }
        if !(0..=4).contains(&self.pb) {
            return Err(LzFindError::InvalidPb(self.pb));
        }
        if !(5..=LZMA_MATCH_LEN_MAX as i32).contains(&self.fb) {
            return Err(LzFindError::InvalidFb(self.fb));
        }
        if self.mc == 0 || self.mc > (1 << 30) {
            return Err(LzFindError::InvalidMc(self.mc));
        }
        if !(2..=5).contains(&self.num_hash_bytes) {
            return Err(LzFindError::InvalidNumHashBytes(self.num_hash_bytes));
        }
        if !(0..=1).contains(&self.bt_mode) {
            return Err(LzFindError::InvalidBtMode(self.bt_mode));
        }
        if self.dict_size < K_DIC_SIZE_MIN || self.dict_size > K_DIC_SIZE_MAX {
            return Err(LzFindError::InvalidDictSize(self.dict_size));
        }
        Ok(())
    }

    /// Encode the 5-byte stream header: the packed `lc/lp/pb` byte
    /// followed by the dictionary size, little-endian.
    ///
    /// Equivalent to `LzmaEnc_WriteProperties`.
    pub fn write_props_bytes(&self) -> Result<[u8; 5], LzFindError> {
        let b0 = (self.pb * 5 + self.lp) * 9 + self.lc;
        if !(0..225).contains(&b0) {
            return Err(LzFindError::PropsUnsupported);
        }
        let mut out = [0u8; 5];
        out[0] = b0 as u8;
        out[1..5].copy_from_slice(&self.dict_size.to_le_bytes());
        Ok(out)
    }
}

/// Decoded view of the 5-byte stream header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropsHeader {
    pub lc: u32,
    pub lp: u32,
    pub pb: u32,
    /// Already clamped up to the 4 KiB decoder minimum.
    pub dict_size: u32,
}

/// Decode a stream header produced by [`EncProps::write_props_bytes`].
///
/// Equivalent to `LzmaProps_Decode`.
pub fn parse_props_bytes(data: &[u8]) -> Result<PropsHeader, LzFindError> {
    if data.len() < 5 {
        return Err(LzFindError::PropsTruncated);
    }
    let mut d = data[0] as u32;
    if d >= 9 * 5 * 5 {
        return Err(LzFindError::PropsUnsupported);
    }
    let lc = d % 9;
    d /= 9;
    let lp = d % 5;
    let pb = d / 5;
    let mut dict_size = u32::from_le_bytes(data[1..5].try_into().unwrap());
    if dict_size < K_DIC_SIZE_MIN {
        dict_size = K_DIC_SIZE_MIN;
    }
    Ok(PropsHeader {
        lc,
        lp,
        pb,
        dict_size,
    })
}

impl MatchFinder {
    /// Build a ready-to-init match finder (plus its function table) from
    /// normalized encoder properties, attached to `stream`.
    ///
    /// Wires the fields the encoder sets on `CMatchFinder` before
    /// `AOCL_MatchFinder_Create`: layout flags, cut value, level, and the
    /// expected data size; `fb` becomes the per-search length ceiling.
    pub fn from_props(
        props: &EncProps,
        stream: Box<dyn io::Read>,
    ) -> Result<(MatchFinder, Mf2), LzFindError> {
        let mut props = props.clone();
        props.normalize_opt();
        props.validate()?;

        let mut p = MatchFinder::construct();
        p.bt_mode = props.bt_mode != 0;
        p.num_hash_bytes = props.num_hash_bytes as u32;
        p.cut_value = props.mc;
        p.level = props.level.clamp(0, 9) as u32;
        p.cache_efficient_search = props.cache_efficient_strategy == 1;
        p.expected_data_size = if props.src_len > 0 {
            props.src_len
        } else {
            props.reduce_size
        };
        p.set_stream(stream);

        let match_max_len = props.fb as u32;
        p.create_opt(
            props.dict_size,
            K_NUM_OPTS,
            match_max_len,
            LZMA_MATCH_LEN_MAX + 1,
        )?;
        let vtable = aocl_create_vtable(&p);
        Ok((p, vtable))
    }
}
