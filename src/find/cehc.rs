//! Cache-efficient fixed-block hash chains.
//!
//! Each hash value owns one contiguous block of `SLOT_SZ` slots inside
//! `son`; no separate head table exists.  Slot 0 of a block stores the
//! absolute slot index of the chain's current head (`hcHeadPos`), slots
//! `1..SLOT_SZ` form a circular buffer of chain nodes:
//!
//! ```text
//! [hcHeadPos | node node node ... ]
//!             <--- HASH_CHAIN_MAX --->
//! <------- HASH_CHAIN_SLOT_SZ ------->
//! ```
//!
//! Insertion decrements the head circularly, so forward traversal from
//! the head visits positions newest-first.
//!
//! Translated from aoclHashChain.h (`AOCL_COMMON_CEHCFIX_*`) and
//! LzFind.c lines 1300–1448:
//!   - `CIRC_INC_HEAD` / `AOCL_COMMON_CEHCFIX_CIRC_INC_HEAD` → [`circ_inc_head`]
//!   - `CIRC_DEC_HEAD` / `AOCL_COMMON_CEHCFIX_CIRC_DEC_HEAD` → [`circ_dec_head`]
//!   - `AOCL_COMMON_CEHCFIX_GET_HEAD`  → [`chain_get_head`]
//!   - `AOCL_COMMON_CEHCFIX_INSERT`    → [`chain_insert`]
//!   - `AOCL_HC_GETMATCHES_SPEC` / `AOCL_Hc_GetMatchesSpec_8` /
//!     `AOCL_Hc_GetMatchesSpec_16`     → [`cehc_get_matches_spec`]
//!     (const-generic over the block size instead of macro stamping)

use super::compare::find_matching_bytes_len;
use super::types::{get_u16, get_u32, prefetch_read, K_EMPTY_SON_VALUE};

/// Max chain length in an 8-slot block.
pub const HASH_CHAIN_MAX_8: usize = 7;
/// 8-slot block: head pointer plus chain.
pub const HASH_CHAIN_SLOT_SZ_8: usize = HASH_CHAIN_MAX_8 + 1;
/// Levels below this use 8-slot blocks, the rest 16-slot blocks.
pub const HASH_CHAIN_16_LEVEL: u32 = 2;

/// Max chain length in a 16-slot block.
pub const HASH_CHAIN_MAX_16: usize = 15;
/// 16-slot block: head pointer plus chain.
pub const HASH_CHAIN_SLOT_SZ_16: usize = HASH_CHAIN_MAX_16 + 1;

/// Minimum number of blocks in a cache-efficient dictionary; guarantees
/// the hash mask keeps 16 significant bits (and with them the byte-1/2
/// collision property).
pub const K_HASH_GUARANTEE: u32 = 1 << 16;

/// Empty head-pointer marker.
pub const K_EMPTY_HEAD_VALUE: u32 = 0;

// ─────────────────────────────────────────────────────────────────────────────
// Circular slot arithmetic
// hc_cur range must be: base + 1 <= hc_cur <= base + chain_max
// ─────────────────────────────────────────────────────────────────────────────

/// Circular increment that never lands on a block's slot 0.
///
/// Equivalent to `CIRC_INC_HEAD`.
#[inline(always)]
pub fn circ_inc_head(hc_cur: usize, slot_sz: usize, chain_max: usize) -> usize {
    if (hc_cur + 1) % slot_sz != 0 {
        hc_cur + 1
    } else {
        hc_cur + 1 - chain_max
    }
}

/// Circular decrement that never lands on a block's slot 0.
///
/// Equivalent to `CIRC_DEC_HEAD`.
#[inline(always)]
pub fn circ_dec_head(hc_cur: usize, slot_sz: usize, chain_max: usize) -> usize {
    if (hc_cur - 1) % slot_sz != 0 {
        hc_cur - 1
    } else {
        hc_cur + chain_max - 1
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Block accessors (aoclHashChain.h)
// Inputs are not validated; callers guarantee the tables are allocated
// and hash_idx is within the mask range.
// ─────────────────────────────────────────────────────────────────────────────

/// Head slot of the chain for `hash_idx`.  An unset block reads as
/// `base + 1` so the first insert lands on the first chain node.
///
/// Equivalent to `AOCL_COMMON_CEHCFIX_GET_HEAD`.
#[inline(always)]
pub fn chain_get_head(son: &[u32], hash_idx: usize, slot_sz: usize) -> usize {
    let base = hash_idx * slot_sz;
    let head = son[base];
    if head == K_EMPTY_HEAD_VALUE {
        base + 1
    } else {
        head as usize
    }
}

/// Insert `val` as the new chain head: decrement the head circularly,
/// write the value there, and point slot 0 at it.  `head_pos` must come
/// from [`chain_get_head`].
///
/// Equivalent to `AOCL_COMMON_CEHCFIX_INSERT`.
#[inline(always)]
pub fn chain_insert(
    son: &mut [u32],
    hash_idx: usize,
    head_pos: usize,
    val: u32,
    slot_sz: usize,
    chain_max: usize,
) {
    let base = hash_idx * slot_sz;
    let new_head = circ_dec_head(head_pos, slot_sz, chain_max);
    son[new_head] = val;
    son[base] = new_head as u32;
}

// ─────────────────────────────────────────────────────────────────────────────
// AOCL_HC_GETMATCHES_SPEC (LzFind.c:1333-1448)
// ─────────────────────────────────────────────────────────────────────────────

/// Walk the fixed-block chain for hash `hv` starting at `hc_head_pos`,
/// emit strictly lengthening `(len, delta - 1)` pairs, then insert `pos`
/// at a new head.  Requires `len_limit > max_len >= 3`.  Returns the
/// number of `u32` values written.
///
/// The per-candidate pre-check compares two bytes at `check_len` and four
/// bytes at the front in two unaligned loads; only candidates passing
/// both get the bulk comparison.  Checking 2 bytes instead of 1 at
/// `max_len` buys a slight compression-ratio gain.  `check_len` trails
/// `max_len` by one on entry and clamps back to `max_len - 1` whenever
/// `max_len >= len_limit - 1`, keeping both probe bytes inside
/// `len_limit`.
///
/// Termination: full lap back to the head slot, empty node, delta outside
/// the cyclic range, cut-value exhaustion, or a full `len_limit` match.
///
/// Equivalent to `AOCL_Hc_GetMatchesSpec_8` / `AOCL_Hc_GetMatchesSpec_16`
/// (`SLOT_SZ` 8 and 16 respectively).
pub fn cehc_get_matches_spec<const SLOT_SZ: usize>(
    len_limit: u32,
    hc_head_pos: usize,
    hv: u32,
    pos: u32,
    buf: &[u8],
    cur: usize,
    son: &mut [u32],
    cyclic_buffer_size: u32,
    mut cut_value: u32,
    d: &mut [u32],
    mut max_len: u32,
) -> usize {
    let chain_max = SLOT_SZ - 1;
    let lim = len_limit as usize;
    let mut dn = 0usize;

    let mut hc_cur = hc_head_pos; // current node, starting at the head
    let mut cur_match = son[hc_cur];
    let mut delta = pos.wrapping_sub(cur_match);
    let mut check_len = (max_len - 1) as usize; // keeps probes inside len_limit

    if cur_match > 0 && delta < cyclic_buffer_size {
        prefetch_read(buf, cur);
        loop {
            {
                let cand = cur - delta as usize;
                if get_u16(buf, cur + check_len) == get_u16(buf, cand + check_len)
                    && get_u32(buf, cur) == get_u32(buf, cand)
                {
                    // first 4 bytes already matched
                    let len = find_matching_bytes_len(4, lim, &buf[cur..], &buf[cand..]);
                    if (max_len as usize) < len {
                        d[dn] = len as u32;
                        d[dn + 1] = delta - 1;
                        dn += 2;
                        if len == lim {
                            // reached len_limit: insert pos and stop
                            chain_insert(son, hv as usize, hc_head_pos, pos, SLOT_SZ, chain_max);
                            return dn;
                        }
                        max_len = len as u32;
                        check_len = max_len as usize;
                        if max_len >= len_limit - 1 {
                            check_len = (max_len - 1) as usize;
                        }
                    }
                }
            }

            // move to the next (older) node in the chain
            hc_cur = circ_inc_head(hc_cur, SLOT_SZ, chain_max);
            if hc_cur == hc_head_pos {
                break; // completed one lap of the circular buffer
            }
            cur_match = son[hc_cur];
            if cur_match == K_EMPTY_SON_VALUE {
                break; // empty node: end of chain
            }
            delta = pos.wrapping_sub(cur_match);
            if delta >= cyclic_buffer_size {
                break; // match offset beyond the dictionary
            }
            cut_value -= 1;
            if cut_value == 0 {
                break;
            }
        }
    }
    chain_insert(son, hv as usize, hc_head_pos, pos, SLOT_SZ, chain_max);
    dn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circular_increment_block8_visits_all_chain_slots() {
        let mut cur = 1usize;
        let mut seen = Vec::new();
        for _ in 0..7 {
            cur = circ_inc_head(cur, HASH_CHAIN_SLOT_SZ_8, HASH_CHAIN_MAX_8);
            seen.push(cur);
        }
        assert_eq!(seen, vec![2, 3, 4, 5, 6, 7, 1]);
    }

    #[test]
    fn circular_decrement_block8_is_the_inverse() {
        for start in 1..=7usize {
            let inc = circ_inc_head(start, HASH_CHAIN_SLOT_SZ_8, HASH_CHAIN_MAX_8);
            assert_eq!(circ_dec_head(inc, HASH_CHAIN_SLOT_SZ_8, HASH_CHAIN_MAX_8), start);
        }
    }

    #[test]
    fn circular_ops_stay_off_slot_zero_block16() {
        let mut cur = 1usize;
        for _ in 0..64 {
            cur = circ_inc_head(cur, HASH_CHAIN_SLOT_SZ_16, HASH_CHAIN_MAX_16);
            assert!(cur % HASH_CHAIN_SLOT_SZ_16 != 0);
            assert!((1..HASH_CHAIN_SLOT_SZ_16).contains(&cur));
        }
    }

    #[test]
    fn circular_ops_respect_block_base_offset() {
        // second block of an 8-slot table: slots 9..=15
        let base = 8usize;
        let mut cur = base + 7;
        cur = circ_inc_head(cur, HASH_CHAIN_SLOT_SZ_8, HASH_CHAIN_MAX_8);
        assert_eq!(cur, base + 1);
        cur = circ_dec_head(cur, HASH_CHAIN_SLOT_SZ_8, HASH_CHAIN_MAX_8);
        assert_eq!(cur, base + 7);
    }

    #[test]
    fn insert_grows_backward_from_first_node() {
        let mut son = vec![0u32; 8];
        let mut head = chain_get_head(&son, 0, HASH_CHAIN_SLOT_SZ_8);
        assert_eq!(head, 1); // empty block seeds to base + 1
        chain_insert(&mut son, 0, head, 100, HASH_CHAIN_SLOT_SZ_8, HASH_CHAIN_MAX_8);
        assert_eq!(son[0], 7);
        assert_eq!(son[7], 100);
        head = chain_get_head(&son, 0, HASH_CHAIN_SLOT_SZ_8);
        chain_insert(&mut son, 0, head, 101, HASH_CHAIN_SLOT_SZ_8, HASH_CHAIN_MAX_8);
        assert_eq!(son[0], 6);
        assert_eq!(son[6], 101);
        // forward traversal from the head yields newest-first
        assert_eq!(son[chain_get_head(&son, 0, HASH_CHAIN_SLOT_SZ_8)], 101);
    }
}
