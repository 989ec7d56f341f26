//! Dictionary geometry and allocation.
//!
//! Translated from LzFind.c lines 327–683:
//!   - `AllocRefs`                 → [`alloc_refs`]
//!   - `MatchFinder_Create`        → [`MatchFinder::create`]
//!   - `AOCL_MatchFinder_Create`   → [`MatchFinder::create_opt`]
//!   - `AOCL_HC_COMPUTE_HASH_MASK` → [`compute_hash_mask`]
//!   - `AOCL_SET_NUM_SONS`         → [`MatchFinder::cehc_num_sons`]
//!   - `MatchFinder_Free` / `AOCL_MatchFinder_Free` → [`MatchFinder::free`]

use log::debug;

use super::cehc::{HASH_CHAIN_SLOT_SZ_16, HASH_CHAIN_SLOT_SZ_8, K_HASH_GUARANTEE};
use super::hash::{K_HASH2_SIZE, K_HASH3_SIZE, K_LZ_HASH_CRC_SHIFT_2};
use super::types::MatchFinder;
use crate::error::LzFindError;

/// Allocate a zeroed `u32` table, surfacing allocation failure instead of
/// aborting.
///
/// Equivalent to `AllocRefs`.
fn alloc_refs(num: usize) -> Result<Vec<u32>, LzFindError> {
    let mut v: Vec<u32> = Vec::new();
    v.try_reserve_exact(num).map_err(|_| LzFindError::Alloc)?;
    v.resize(num, 0);
    Ok(v)
}

/// Hash mask for the cache-efficient hash-chain dictionary.
///
/// Hc4 and Hc5 are the only hash-chain configurations, so
/// `numHashBytes = 2, 3` are not accounted for here.  The 4- and 5-byte
/// hashes guarantee byte 1 and byte 2 of colliding cursors are equal
/// provided a mask of `(1 << 16) - 1` or higher is used; the walkers rely
/// on that, so the `K_HASH_GUARANTEE - 1` floor must stay.
///
/// The mask is the largest `2^N - 1` not greater than `block_cnt - 1`
/// (subject to the floor); when `block_cnt` is not a power of two the
/// propagated value is shifted back down.
///
/// Equivalent to `AOCL_HC_COMPUTE_HASH_MASK`.
pub fn compute_hash_mask(sz: u32, block_cnt: u32) -> u32 {
    let mut hs = sz;
    if hs != 0 {
        hs -= 1;
    }
    hs |= hs >> 1;
    hs |= hs >> 2;
    hs |= hs >> 4;
    hs |= hs >> 8;
    // lower 16 bits accounted for by the guarantee floor below
    while hs > block_cnt.wrapping_sub(1) {
        hs >>= 1;
    }
    hs | (K_HASH_GUARANTEE - 1)
}

impl MatchFinder {
    /// Chain block size selected by the level:
    /// `HASH_CHAIN_SLOT_SZ_8` below `HASH_CHAIN_16_LEVEL`, else
    /// `HASH_CHAIN_SLOT_SZ_16`.
    #[inline]
    pub(crate) fn hash_chain_slot_sz(&self) -> usize {
        if self.level < super::cehc::HASH_CHAIN_16_LEVEL {
            HASH_CHAIN_SLOT_SZ_8
        } else {
            HASH_CHAIN_SLOT_SZ_16
        }
    }

    /// Total dictionary slots in cache-efficient mode: one fixed block per
    /// hash value.
    ///
    /// Equivalent to `AOCL_SET_NUM_SONS`.
    #[inline]
    pub(crate) fn cehc_num_sons(&self) -> usize {
        (self.hash_mask as usize + 1) * self.hash_chain_slot_sz()
    }

    /// Release the dictionary tables and the window.
    ///
    /// Equivalent to `MatchFinder_Free` / `AOCL_MatchFinder_Free`; also
    /// what `Drop` does implicitly.
    pub fn free(&mut self) {
        self.hash = Vec::new();
        self.son = Vec::new();
        self.num_refs = 0;
        self.window = Vec::new();
        self.block_size = 0;
    }

    fn set_keep_sizes(
        &mut self,
        history_size: u32,
        keep_add_buffer_before: u32,
        match_max_len: u32,
        mut keep_add_buffer_after: u32,
    ) {
        // one additional byte in keep_size_before, since move_block runs
        // after pos++ and before dictionary use; wrapping arithmetic here
        // is caught by the overflow checks in get_block_size
        self.keep_size_before = history_size
            .wrapping_add(keep_add_buffer_before)
            .wrapping_add(1);
        keep_add_buffer_after = keep_add_buffer_after.wrapping_add(match_max_len);
        // we need keep_size_after >= num_hash_bytes
        if keep_add_buffer_after < self.num_hash_bytes {
            keep_add_buffer_after = self.num_hash_bytes;
        }
        self.keep_size_after = keep_add_buffer_after;
    }

    /// Reference head-table size: sized down from the history (and the
    /// expected data size), 16 low bits always set, bt5 raised to its
    /// recommended minimum.  Returns the mask (table size − 1).
    fn reference_hash_mask(&self, history_size: u32) -> u32 {
        let mut hs: u32 = (1 << 16) - 1;
        if self.num_hash_bytes != 2 {
            hs = history_size;
            if hs as u64 > self.expected_data_size {
                hs = self.expected_data_size as u32;
            }
            if hs != 0 {
                hs -= 1;
            }
            hs |= hs >> 1;
            hs |= hs >> 2;
            hs |= hs >> 4;
            hs |= hs >> 8;
            // 16 bits are propagated in hs; the low 16 bits are set below
            hs >>= 1;
            if hs >= (1 << 24) {
                if self.num_hash_bytes == 3 {
                    hs = (1 << 24) - 1;
                } else {
                    hs >>= 1;
                }
            }
            // (hash_size >= (1 << 16)) : required for numHashBytes > 2
            hs |= (1 << 16) - 1; /* don't change it! */
            if self.num_hash_bytes >= 5 {
                hs |= (256 << K_LZ_HASH_CRC_SHIFT_2) - 1;
            }
        }
        hs
    }

    fn alloc_tables(&mut self, hash_size_sum: u32, num_sons: usize) -> Result<(), LzFindError> {
        let new_size = hash_size_sum as usize + num_sons;
        if !self.hash.is_empty() && self.num_refs == new_size {
            return Ok(());
        }
        self.hash = Vec::new();
        self.son = Vec::new();
        self.num_refs = new_size;
        self.hash = alloc_refs(hash_size_sum as usize)?;
        self.son = alloc_refs(num_sons)?;
        Ok(())
    }

    /// Allocate the window and dictionary tables for the reference
    /// layouts.
    ///
    /// Conditions: `historySize <= 3 GiB`,
    /// `keepAddBufferBefore + matchMaxLen + keepAddBufferAfter < 511 MiB`
    /// (both enforced through the window sizing).
    ///
    /// Equivalent to `MatchFinder_Create`; on error the dictionary is left
    /// destroyed.
    pub fn create(
        &mut self,
        history_size: u32,
        keep_add_buffer_before: u32,
        match_max_len: u32,
        keep_add_buffer_after: u32,
    ) -> Result<(), LzFindError> {
        self.set_keep_sizes(
            history_size,
            keep_add_buffer_before,
            match_max_len,
            keep_add_buffer_after,
        );

        let res = (|| {
            let block_size = self
                .get_block_size(history_size)
                .ok_or(LzFindError::WindowTooLarge)?;
            self.lz_in_window_create(block_size)?;

            let new_cyclic_buffer_size = history_size + 1; // do not change it
            self.match_max_len = match_max_len;

            self.fixed_hash_size = 0;
            let mut hs = self.reference_hash_mask(history_size);
            self.hash_mask = hs;
            hs += 1; // size of head table required

            // space for the additional fixed hash tables
            if self.num_hash_bytes > 2 {
                self.fixed_hash_size += K_HASH2_SIZE;
            }
            if self.num_hash_bytes > 3 {
                self.fixed_hash_size += K_HASH3_SIZE;
            }
            hs += self.fixed_hash_size;

            self.history_size = history_size;
            self.hash_size_sum = hs;
            self.cyclic_buffer_size = new_cyclic_buffer_size;

            let mut num_sons = new_cyclic_buffer_size as usize;
            if self.bt_mode {
                // for bt, son is <left0> <right0> <left1> <right1> ...
                num_sons <<= 1;
            }
            self.alloc_tables(hs, num_sons)?;
            debug!(
                "create: bt_mode={} hash_mask={:#x} hash_size_sum={} num_sons={}",
                self.bt_mode, self.hash_mask, self.hash_size_sum, num_sons
            );
            Ok(())
        })();

        if res.is_err() {
            self.free();
        }
        res
    }

    /// Allocate the window and dictionary tables for the AOCL layouts.
    ///
    /// Changes wrt [`create`](Self::create):
    /// - hash-chain mode with cache-efficient search: head table folded
    ///   into fixed-size chain blocks inside `son`; table size derived
    ///   from the history; block size set by level; no 3-byte fixed table.
    /// - otherwise: same as reference except the 3-byte fixed table is
    ///   kept only for `numHashBytes = 5`.
    ///
    /// Equivalent to `AOCL_MatchFinder_Create`.
    pub fn create_opt(
        &mut self,
        history_size: u32,
        keep_add_buffer_before: u32,
        match_max_len: u32,
        keep_add_buffer_after: u32,
    ) -> Result<(), LzFindError> {
        self.set_keep_sizes(
            history_size,
            keep_add_buffer_before,
            match_max_len,
            keep_add_buffer_after,
        );

        let res = (|| {
            let block_size = self
                .get_block_size(history_size)
                .ok_or(LzFindError::WindowTooLarge)?;
            self.lz_in_window_create(block_size)?;

            let new_cyclic_buffer_size = history_size + 1; // do not change it
            self.match_max_len = match_max_len;

            if self.use_cache_efficient_hash_chain() {
                let mut hs = history_size;
                if hs as u64 > self.expected_data_size {
                    hs = self.expected_data_size as u32;
                }
                let block_cnt = hs / self.hash_chain_slot_sz() as u32;

                self.hash_mask = compute_hash_mask(block_cnt, block_cnt);
                debug_assert!(self.hash_mask + 1 >= K_HASH_GUARANTEE);

                // Fixed tables: numHashBytes = 3/4/5 all use the 2-byte
                // table only.
                self.fixed_hash_size = 0;
                if self.num_hash_bytes > 2 {
                    self.fixed_hash_size += K_HASH2_SIZE;
                }

                self.history_size = history_size;
                // this limit goes into the compressed stream header
                self.cyclic_buffer_size = new_cyclic_buffer_size;
                // fixed tables only; chain heads live inside the blocks
                self.hash_size_sum = self.fixed_hash_size;
                let num_sons = self.cehc_num_sons();
                self.alloc_tables(self.hash_size_sum, num_sons)?;
                debug!(
                    "create_opt: cehc slot_sz={} hash_mask={:#x} num_sons={}",
                    self.hash_chain_slot_sz(),
                    self.hash_mask,
                    num_sons
                );
            } else {
                // same as reference except the 3-byte fixed table is used
                // only when numHashBytes = 5
                self.fixed_hash_size = 0;
                let mut hs = self.reference_hash_mask(history_size);
                self.hash_mask = hs;
                hs += 1;

                if self.num_hash_bytes > 2 {
                    self.fixed_hash_size += K_HASH2_SIZE;
                }
                if self.num_hash_bytes > 4 {
                    self.fixed_hash_size += K_HASH3_SIZE;
                }
                hs += self.fixed_hash_size;

                self.history_size = history_size;
                self.hash_size_sum = hs;
                self.cyclic_buffer_size = new_cyclic_buffer_size;

                let mut num_sons = new_cyclic_buffer_size as usize;
                if self.bt_mode {
                    num_sons <<= 1;
                }
                self.alloc_tables(hs, num_sons)?;
                debug!(
                    "create_opt: bt_mode={} hash_mask={:#x} num_sons={}",
                    self.bt_mode, self.hash_mask, num_sons
                );
            }
            Ok(())
        })();

        if res.is_err() {
            self.free();
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_geometry_bt4() {
        let mut p = MatchFinder::construct();
        p.expected_data_size = u64::MAX;
        p.create(1 << 20, 0, 273, 0).unwrap();
        // 1 MiB history: mask propagates to 2^19-1 then gets the low-16 floor
        assert_eq!(p.hash_mask, (1 << 19) - 1);
        assert_eq!(p.fixed_hash_size, K_HASH2_SIZE + K_HASH3_SIZE);
        assert_eq!(p.hash_size_sum, (1 << 19) + p.fixed_hash_size);
        assert_eq!(p.son.len(), 2 * ((1 << 20) + 1));
    }

    #[test]
    fn cehc_geometry_level1_uses_8_slot_blocks() {
        let mut p = MatchFinder::construct();
        p.bt_mode = false;
        p.num_hash_bytes = 5;
        p.cache_efficient_search = true;
        p.level = 1;
        p.expected_data_size = 1 << 20;
        p.create_opt(1 << 20, 0, 273, 0).unwrap();
        assert_eq!(p.hash_chain_slot_sz(), HASH_CHAIN_SLOT_SZ_8);
        // 2^20 / 8 = 2^17 blocks; mask = 2^17 - 1
        assert_eq!(p.hash_mask, (1 << 17) - 1);
        assert_eq!(p.son.len(), (1 << 17) * 8);
        // no separate head table, 2-byte fixed table only
        assert_eq!(p.hash_size_sum, K_HASH2_SIZE);
    }

    #[test]
    fn mask_floor_holds_for_tiny_block_counts() {
        // block counts below the guarantee yield masks >= block_cnt;
        // the guarantee floor itself always holds
        let m = compute_hash_mask(K_HASH_GUARANTEE - 1, K_HASH_GUARANTEE - 1);
        assert!(m + 1 >= K_HASH_GUARANTEE);
        assert!(m >= K_HASH_GUARANTEE - 1);
    }

    #[test]
    fn rejects_overflowing_window() {
        let mut p = MatchFinder::construct();
        let r = p.create(u32::MAX - (1 << 10), 0, 273, 0);
        assert!(matches!(r, Err(LzFindError::WindowTooLarge)));
        assert!(p.hash.is_empty() && p.son.is_empty());
    }
}
