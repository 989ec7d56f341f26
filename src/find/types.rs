//! Match-finder state, sizing constants, and unaligned read helpers.
//!
//! Translated from LzFind.h (`CMatchFinder`, accessor macros) and
//! LzFind.c lines 57–75, 279–306:
//!   - `kBlockMoveAlign` / `kBlockSizeAlign` / `kBlockSizeReserveMin`
//!   - `kEmptyHashValue`, `kEmptySonValue`, `kMaxValForNormalize`
//!   - `CMatchFinder`                        → [`MatchFinder`]
//!   - `MatchFinder_SetDefaultSettings`      → [`MatchFinder::set_default_settings`]
//!   - `MatchFinder_Construct`               → [`MatchFinder::construct`]
//!   - `Inline_MatchFinder_GetNumAvailableBytes` → [`MatchFinder::num_available_bytes`]
//!   - `Inline_MatchFinder_GetPointerToCurrentPos` → [`MatchFinder::current_pos_slice`]
//!   - `GetUi16` / `GetUi32`                 → [`get_u16`] / [`get_u32`]

use std::io;

// ─────────────────────────────────────────────────────────────────────────────
// Block and slot constants (LzFind.c:57-71)
// ─────────────────────────────────────────────────────────────────────────────

/// Alignment of the tail copy performed by `move_block` (128 bytes).
pub const K_BLOCK_MOVE_ALIGN: usize = 1 << 7;

/// Alignment of the window allocation (64 KiB).
pub const K_BLOCK_SIZE_ALIGN: u32 = 1 << 16;

/// Minimum headroom demanded below 4 GiB; configurations that leave less
/// would thrash `move_block` and are rejected.
pub const K_BLOCK_SIZE_RESERVE_MIN: u32 = 1 << 24;

/// NO-VALUE marker in hash tables.  Must be zero.
pub const K_EMPTY_HASH_VALUE: u32 = 0;

/// NO-VALUE marker in dictionary (son) slots.  Must be zero.
pub const K_EMPTY_SON_VALUE: u32 = 0;

/// Position value at which normalization triggers.
///
/// `0` means the counter must wrap the full 32-bit range first (normalize
/// upon `u32::MAX + 1`).  The `extend-code-coverage` feature lowers the
/// threshold so small inputs exercise the normalizer, matching the
/// `AOCL_EXTEND_CODE_COVERAGE` build of the C source.
#[cfg(feature = "extend-code-coverage")]
pub const K_MAX_VAL_FOR_NORMALIZE: u32 = (1 << 20) + 0xFFF;
#[cfg(not(feature = "extend-code-coverage"))]
pub const K_MAX_VAL_FOR_NORMALIZE: u32 = 0;

/// CRC-32 (reversed) polynomial seeding the hash tables.
pub const K_CRC_POLY: u32 = 0xEDB8_8320;

// ─────────────────────────────────────────────────────────────────────────────
// Unaligned little-endian reads (LzFind.h GetUi16/GetUi32)
// ─────────────────────────────────────────────────────────────────────────────

/// Read 2 bytes at `buf[i..]` as a little-endian value.
///
/// Equivalent to `GetUi16`.  Used for equality pre-checks and the Bt2
/// head-table hash, where any consistent byte order works; LE is fixed so
/// all platforms hash identically.
#[inline(always)]
pub(crate) fn get_u16(buf: &[u8], i: usize) -> u32 {
    u16::from_le_bytes([buf[i], buf[i + 1]]) as u32
}

/// Read 4 bytes at `buf[i..]` as a little-endian `u32`.
///
/// Equivalent to `GetUi32`.
#[inline(always)]
pub(crate) fn get_u32(buf: &[u8], i: usize) -> u32 {
    u32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]])
}

/// Prefetch hint on the cursor bytes ahead of a chain walk.
///
/// Equivalent to `__builtin_prefetch(cur, 0, 2)`; a no-op off x86_64.
#[inline(always)]
pub(crate) fn prefetch_read(buf: &[u8], i: usize) {
    #[cfg(target_arch = "x86_64")]
    if i < buf.len() {
        use core::arch::x86_64::{_mm_prefetch, _MM_HINT_T1};
        // SAFETY: `i` is in bounds; prefetch has no observable effect.
        unsafe { _mm_prefetch::<_MM_HINT_T1>(buf.as_ptr().add(i) as *const i8) };
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        let _ = (buf, i);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CMatchFinder (LzFind.h:78-139)
// ─────────────────────────────────────────────────────────────────────────────

/// Dictionary-search state for one encoder instance.
///
/// Mirrors `CMatchFinder`.  The C `Byte *buffer` cursor pointer becomes
/// the index [`buf_pos`](Self::buf_pos) into the owned window allocation
/// (`bufferBase` → [`window`](Self::window)); `hash` and `son`, carved in C
/// from a single `CLzRef` allocation, are two separate vectors with the
/// same layouts:
///
/// ```text
/// hash                                          son
/// ---------------------------------------------------------------------
/// | 2-byte table | 3-byte table | head table |  | dictionary slots ... |
/// ---------------------------------------------------------------------
/// <-----fixed_hash_size-------->
/// <-------------hash_size_sum--------------->
/// ```
///
/// `son` holds `cyclicBufferSize` slots (hash-chain mode),
/// `2 * cyclicBufferSize` (binary-tree mode), or
/// `(hashMask + 1) * HASH_CHAIN_SLOT_SZ` fixed blocks (cache-efficient
/// hash-chain mode, where no separate head table exists).
pub struct MatchFinder {
    /// Window allocation of `block_size` bytes (`bufferBase`).
    pub(crate) window: Vec<u8>,
    /// Index of the cursor byte within `window` (the C `buffer` pointer).
    pub(crate) buf_pos: usize,
    pub(crate) pos: u32,
    pub(crate) pos_limit: u32,
    /// Wrap over zero is allowed (`stream_pos < pos`); always use
    /// `stream_pos.wrapping_sub(pos)`.
    pub(crate) stream_pos: u32,
    pub(crate) len_limit: u32,

    /// Current insertion slot; range `[0, cyclic_buffer_size)`.
    pub(crate) cyclic_buffer_pos: u32,
    /// Must be `history_size + 1`.
    pub(crate) cyclic_buffer_size: u32,

    pub(crate) stream_end_was_reached: bool,
    pub(crate) bt_mode: bool,

    pub(crate) match_max_len: u32,

    /// Fixed short-prefix tables followed (reference layouts) by the
    /// hash-head table.
    pub(crate) hash: Vec<u32>,
    /// The dictionary: binary trees, hash chains, or fixed chain blocks.
    pub(crate) son: Vec<u32>,
    /// Caps the number of significant hash bits.
    pub(crate) hash_mask: u32,
    /// Hard limit on dictionary nodes examined per search.
    pub(crate) cut_value: u32,

    /// Compression level, `0..=9`; selects the chain block size.
    pub(crate) level: u32,
    /// Enables the cache-efficient fixed-block chain dictionary
    /// (hash-chain mode only).
    pub(crate) cache_efficient_search: bool,

    pub(crate) stream: Option<Box<dyn io::Read>>,

    pub(crate) block_size: u32,
    pub(crate) keep_size_before: u32,
    pub(crate) keep_size_after: u32,

    pub(crate) num_hash_bytes: u32,
    /// Size of the search buffer aka dictionary.
    pub(crate) history_size: u32,
    /// Combined size of the 2-byte and 3-byte fixed tables.
    pub(crate) fixed_hash_size: u32,
    /// Size of all hash tables combined.
    pub(crate) hash_size_sum: u32,
    /// Latched stream error; `None` means the source is healthy.
    pub(crate) result: Option<io::Error>,
    /// CRC table used in hash calculation.
    pub(crate) crc: [u32; 256],
    /// Total slots allocated across `hash` and `son`; lets `create` keep
    /// an existing allocation when the geometry is unchanged.
    pub(crate) num_refs: usize,

    pub(crate) expected_data_size: u64,
}

/// The 256-entry table of the reversed CRC-32 polynomial that seeds the
/// prefix hashes.
pub fn build_crc_table() -> [u32; 256] {
    let mut crc = [0u32; 256];
    for (i, slot) in crc.iter_mut().enumerate() {
        let mut r = i as u32;
        for _ in 0..8 {
            r = (r >> 1) ^ (K_CRC_POLY & 0u32.wrapping_sub(r & 1));
        }
        *slot = r;
    }
    crc
}

impl MatchFinder {
    /// Equivalent to `MatchFinder_SetDefaultSettings`.
    pub(crate) fn set_default_settings(&mut self) {
        self.cut_value = 32;
        self.bt_mode = true;
        self.num_hash_bytes = 4;
    }

    /// Build a match finder with default settings and a seeded CRC table.
    ///
    /// Equivalent to `MatchFinder_Construct`.  No storage is allocated
    /// until [`create`](Self::create) / [`create_opt`](Self::create_opt).
    pub fn construct() -> Self {
        let crc = build_crc_table();
        let mut p = MatchFinder {
            window: Vec::new(),
            buf_pos: 0,
            pos: 0,
            pos_limit: 0,
            stream_pos: 0,
            len_limit: 0,
            cyclic_buffer_pos: 0,
            cyclic_buffer_size: 0,
            stream_end_was_reached: false,
            bt_mode: true,
            match_max_len: 0,
            hash: Vec::new(),
            son: Vec::new(),
            hash_mask: 0,
            cut_value: 0,
            level: 0,
            cache_efficient_search: false,
            stream: None,
            block_size: 0,
            keep_size_before: 0,
            keep_size_after: 0,
            num_hash_bytes: 4,
            history_size: 0,
            fixed_hash_size: 0,
            hash_size_sum: 0,
            result: None,
            crc,
            num_refs: 0,
            expected_data_size: u64::MAX,
        };
        p.set_default_settings();
        p
    }

    /// Attach the byte source the window will read from.
    pub fn set_stream(&mut self, stream: Box<dyn io::Read>) {
        self.stream = Some(stream);
    }

    /// Read-ahead bytes buffered past the cursor.
    ///
    /// Equivalent to `Inline_MatchFinder_GetNumAvailableBytes` /
    /// `GET_AVAIL_BYTES`.
    #[inline(always)]
    pub fn num_available_bytes(&self) -> u32 {
        self.stream_pos.wrapping_sub(self.pos)
    }

    /// The bytes at the cursor, valid until the next `get_matches`/`skip`.
    ///
    /// Safe rendition of `Inline_MatchFinder_GetPointerToCurrentPos`: the
    /// returned slice covers exactly the read-ahead.
    #[inline]
    pub fn current_pos_slice(&self) -> &[u8] {
        let avail = self.num_available_bytes() as usize;
        &self.window[self.buf_pos..self.buf_pos + avail]
    }

    /// The latched stream error, if a read from the source failed.
    /// Subsequent reads return no data; match emission over already
    /// buffered bytes continues.
    pub fn stream_result(&self) -> Option<&io::Error> {
        self.result.as_ref()
    }

    /// `true` once the source reported end of stream.
    pub fn stream_end_reached(&self) -> bool {
        self.stream_end_was_reached
    }

    /// Minimum length (in `u32` values) of the distances buffer callers
    /// must pass to `get_matches`: one `(len, dist)` pair per achievable
    /// length plus the fixed-table short matches.
    pub fn distances_bound(&self) -> usize {
        2 * (self.match_max_len as usize + 1)
    }

    /// Dictionary search selector: `!btMode && cacheEfficientSearch`.
    ///
    /// Equivalent to `USE_CACHE_EFFICIENT_HASH_CHAIN`.
    #[inline(always)]
    pub(crate) fn use_cache_efficient_hash_chain(&self) -> bool {
        !self.bt_mode && self.cache_efficient_search
    }
}

impl Default for MatchFinder {
    fn default() -> Self {
        Self::construct()
    }
}
