//! Position normalization: saturating subtraction over dictionary slots.
//!
//! Runs only when `pos` rolls over from `u32::MAX` (or early under the
//! `extend-code-coverage` feature).  Since that needs a > 4 GiB stream,
//! ordinary encodes never get here; the tests drive these functions
//! directly.
//!
//! Translated from LzFind.c lines 825–965:
//!   - `SASUB_32` / `LzFind_SaturSub_32`      → [`satur_sub_32`]
//!   - `MatchFinder_Normalize3`               → [`normalize3`]
//!   - AVX2 `LzFind_SaturSub_128/256` path    → [`satur_sub_avx2`]
//!   - `AOCL_SASUB_32` / `AOCL_NORMALIZE_HASH_CHAIN_TABLE`
//!                                            → [`normalize_hash_chain_table`]
//!   - `AOCL_MatchFinder_Normalize3`          → [`MatchFinder::normalize_opt`]
//!   - reference dispatch in the same function → [`MatchFinder::normalize`]

use log::debug;

use super::types::{MatchFinder, K_EMPTY_SON_VALUE};

// kEmptyHashValue must be zero: empty slots saturate back to empty.

/// Scalar saturating subtract, eight slots per iteration.
///
/// `items.len()` must be a multiple of 8.  Equivalent to
/// `LzFind_SaturSub_32`.
fn satur_sub_32(sub_value: u32, items: &mut [u32]) {
    debug_assert_eq!(items.len() % 8, 0);
    for c in items.chunks_exact_mut(8) {
        c[0] = c[0].max(sub_value) - sub_value;
        c[1] = c[1].max(sub_value) - sub_value;
        c[2] = c[2].max(sub_value) - sub_value;
        c[3] = c[3].max(sub_value) - sub_value;
        c[4] = c[4].max(sub_value) - sub_value;
        c[5] = c[5].max(sub_value) - sub_value;
        c[6] = c[6].max(sub_value) - sub_value;
        c[7] = c[7].max(sub_value) - sub_value;
    }
}

/// AVX2 saturating subtract, eight slots per vector.
///
/// `items.len()` must be a multiple of 8.  Produces bit-identical output
/// to [`satur_sub_32`].
///
/// # Safety
/// The caller must have verified AVX2 support at runtime.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn satur_sub_avx2(sub_value: u32, items: &mut [u32]) {
    use core::arch::x86_64::*;
    debug_assert_eq!(items.len() % 8, 0);
    let sub = _mm256_set1_epi32(sub_value as i32);
    let mut p = items.as_mut_ptr();
    let end = p.add(items.len());
    while p != end {
        let v = _mm256_loadu_si256(p as *const __m256i);
        let m = _mm256_max_epu32(v, sub);
        _mm256_storeu_si256(p as *mut __m256i, _mm256_sub_epi32(m, sub));
        p = p.add(8);
    }
}

#[inline]
fn satur_sub(sub_value: u32, items: &mut [u32]) {
    #[cfg(target_arch = "x86_64")]
    if std::arch::is_x86_feature_detected!("avx2") {
        // SAFETY: gated on the runtime AVX2 check; length is a multiple
        // of 8 per the callers below.
        unsafe { satur_sub_avx2(sub_value, items) };
        return;
    }
    satur_sub_32(sub_value, items);
}

/// Subtract `sub_value` from every slot, saturating at the empty marker:
/// values below `sub_value` (stale, out of history) become `0`.
///
/// Equivalent to `MatchFinder_Normalize3`.
pub fn normalize3(sub_value: u32, items: &mut [u32]) {
    let bulk_len = items.len() & !7usize;
    let (bulk, tail) = items.split_at_mut(bulk_len);
    if !bulk.is_empty() {
        satur_sub(sub_value, bulk);
    }
    for v in tail {
        let x = (*v).max(sub_value);
        *v = x - sub_value;
    }
}

/// Block-aware normalization for the cache-efficient chain table.
///
/// The first slot of each block holds the chain-head reference (a slot
/// index, not a position) and is left untouched; an empty head means the
/// block has no chain and is skipped whole.  Chain-node slots normalize
/// with empty and out-of-bound nodes reset to `0`.
///
/// Equivalent to `AOCL_NORMALIZE_HASH_CHAIN_TABLE` (+ `AOCL_SASUB_32`).
pub fn normalize_hash_chain_table(sub_value: u32, son: &mut [u32], slot_sz: usize) {
    for block in son.chunks_exact_mut(slot_sz) {
        // first node of each block is the head reference; do not modify
        if block[0] == K_EMPTY_SON_VALUE {
            continue; // empty head: there is no hash chain
        }
        for v in &mut block[1..] {
            let mut x = *v;
            if x == K_EMPTY_SON_VALUE || x < sub_value {
                x = sub_value;
            }
            *v = x - sub_value;
        }
    }
}

impl MatchFinder {
    /// Normalize the reference-layout tables: every hash slot and every
    /// son slot gets the same saturating subtraction.
    pub(crate) fn normalize(&mut self, sub_value: u32) {
        debug!("normalize: sub_value={:#x}", sub_value);
        let num_son_refs = (self.cyclic_buffer_size as usize) << (self.bt_mode as usize);
        normalize3(sub_value, &mut self.hash[..self.hash_size_sum as usize]);
        normalize3(sub_value, &mut self.son[..num_son_refs]);
    }

    /// Normalize whichever layout is active.
    ///
    /// Equivalent to `AOCL_MatchFinder_Normalize3`: cache-efficient mode
    /// normalizes the fixed tables plus the chain blocks (head pointers
    /// preserved); otherwise defers to the reference path.
    pub(crate) fn normalize_opt(&mut self, sub_value: u32) {
        if self.use_cache_efficient_hash_chain() {
            debug!("normalize_opt: cehc sub_value={:#x}", sub_value);
            normalize3(sub_value, &mut self.hash[..self.fixed_hash_size as usize]);
            let slot_sz = self.hash_chain_slot_sz();
            let num_sons = self.cehc_num_sons();
            normalize_hash_chain_table(sub_value, &mut self.son[..num_sons], slot_sz);
        } else {
            self.normalize(sub_value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_below_threshold_become_empty() {
        let mut items = [0u32, 3, 5, 8, 12];
        normalize3(5, &mut items);
        assert_eq!(items, [0, 0, 0, 3, 7]);
    }

    #[test]
    fn bulk_and_tail_agree() {
        // 19 items exercises the 8-wide bulk loop and a 3-item tail
        let mut a: Vec<u32> = (0..19u32).map(|i| i * 7).collect();
        let mut b = a.clone();
        normalize3(40, &mut a);
        for v in &mut b {
            *v = (*v).max(40) - 40;
        }
        assert_eq!(a, b);
    }

    #[test]
    fn head_pointer_slots_survive_block_normalize() {
        // two blocks of 8: first empty, second with head at slot 3
        let mut son = vec![0u32; 16];
        son[8] = 8 + 3;
        son[9] = 100;
        son[11] = 4; // below sub_value: drops out of history
        normalize_hash_chain_table(50, &mut son, 8);
        assert_eq!(&son[..8], &[0; 8]);
        assert_eq!(son[8], 11); // head reference untouched
        assert_eq!(son[9], 50);
        assert_eq!(son[11], 0);
    }
}
