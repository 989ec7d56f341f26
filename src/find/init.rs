//! Table initialization and position/limit bookkeeping.
//!
//! Translated from LzFind.c lines 686–812, 977–1054, 1796–1815, 1851–1870:
//!   - `MatchFinder_SetLimits`        → [`MatchFinder::set_limits`]
//!   - `MatchFinder_Init_LowHash`     → [`MatchFinder::init_low_hash`]
//!   - `MatchFinder_Init_HighHash`    → [`MatchFinder::init_high_hash`]
//!   - `MatchFinder_Init_4`           → [`MatchFinder::init_pos_state`]
//!   - `MatchFinder_Init`             → [`MatchFinder::init`]
//!   - `AOCL_MatchFinder_Init`        → [`MatchFinder::init_opt`]
//!   - `MatchFinder_CheckLimits`      → [`MatchFinder::check_limits`]
//!   - `AOCL_MatchFinder_CheckLimits` → [`MatchFinder::check_limits_opt`]
//!   - `MatchFinder_MovePos` / `MOVE_POS`           → [`MatchFinder::move_pos`]
//!   - `AOCL_MatchFinder_MovePos` / `AOCL_MOVE_POS` → [`MatchFinder::move_pos_opt`]

use super::types::{MatchFinder, K_EMPTY_HASH_VALUE, K_MAX_VAL_FOR_NORMALIZE};

// (CYC_TO_POS_OFFSET == 0) is expected by some optimized code
const CYC_TO_POS_OFFSET: u32 = 0;

impl MatchFinder {
    /// Recompute `len_limit` and `pos_limit` from the cyclic-buffer
    /// headroom, the read-ahead, and the normalization threshold.
    ///
    /// Equivalent to `MatchFinder_SetLimits`.
    pub(crate) fn set_limits(&mut self) {
        let mut n = K_MAX_VAL_FOR_NORMALIZE.wrapping_sub(self.pos);
        if n == 0 {
            // we allow (pos == 0) at start even with (kMaxValForNormalize == 0)
            n = u32::MAX;
        }

        let k = self.cyclic_buffer_size - self.cyclic_buffer_pos;
        if k < n {
            n = k;
        }

        let mut k = self.num_available_bytes();
        {
            let ksa = self.keep_size_after;
            let mut mm = self.match_max_len;
            if k > ksa {
                // we must limit exactly to keep_size_after for read_block
                k -= ksa;
            } else if k >= mm {
                // the limitation for the len_limit update
                k -= mm;
                k += 1;
            } else {
                mm = k;
                if k != 0 {
                    k = 1;
                }
            }
            self.len_limit = mm;
        }
        if k < n {
            n = k;
        }

        self.pos_limit = self.pos.wrapping_add(n);
    }

    /// Zero the fixed short-prefix tables.
    ///
    /// Equivalent to `MatchFinder_Init_LowHash`.
    pub(crate) fn init_low_hash(&mut self) {
        self.hash[..self.fixed_hash_size as usize].fill(K_EMPTY_HASH_VALUE);
    }

    /// Zero the head table behind the fixed tables.
    ///
    /// Equivalent to `MatchFinder_Init_HighHash`.
    pub(crate) fn init_high_hash(&mut self) {
        let start = self.fixed_hash_size as usize;
        let num = self.hash_mask as usize + 1;
        self.hash[start..start + num].fill(K_EMPTY_HASH_VALUE);
    }

    /// Reset the cursor and counters for a fresh stream.
    ///
    /// Equivalent to `MatchFinder_Init_4`.  `kEmptyHashValue = 0` is the
    /// NO-VALUE marker, so encoding starts at `pos = 1`, the smallest
    /// optimal value; do not change it.
    pub(crate) fn init_pos_state(&mut self) {
        self.buf_pos = 0;
        self.pos = 1;
        self.stream_pos = 1;
        self.result = None;
        self.stream_end_was_reached = false;
    }

    /// Initialize the reference-layout dictionary and prime the window.
    ///
    /// Equivalent to `MatchFinder_Init`.
    pub fn init(&mut self) {
        self.init_high_hash(); // init head table
        self.init_low_hash(); // init fixed hash tables
        self.init_pos_state();
        self.read_block();
        self.cyclic_buffer_pos = self.pos - CYC_TO_POS_OFFSET; // init with relation to pos
        self.set_limits();
    }

    /// Initialize the AOCL-layout dictionary and prime the window.
    ///
    /// Changes wrt [`init`](Self::init): in cache-efficient hash-chain
    /// mode there is no separate head table; the chain blocks (head
    /// pointers and nodes) are zeroed instead.
    ///
    /// Equivalent to `AOCL_MatchFinder_Init`.
    pub fn init_opt(&mut self) {
        if self.use_cache_efficient_hash_chain() {
            let num_sons = self.cehc_num_sons();
            self.son[..num_sons].fill(super::types::K_EMPTY_SON_VALUE);
            self.init_low_hash();
            self.init_pos_state();
            self.read_block();
            self.cyclic_buffer_pos = self.pos - CYC_TO_POS_OFFSET;
            self.set_limits();
        } else {
            self.init();
        }
    }

    fn check_limits_body(&mut self, opt: bool) {
        if self.keep_size_after == self.num_available_bytes() {
            // we try to read only in the exact state
            // (keep_size_after == avail)
            if self.need_move() {
                self.move_block();
            }
            self.read_block();
        }

        if self.pos == K_MAX_VAL_FOR_NORMALIZE
            && self.num_available_bytes() >= self.num_hash_bytes
        // optional optimization for the last bytes of data: with it the
        // final positions of a 4 GiB input skip a wasteful normalization,
        // at the cost of not being able to resume afterwards
        {
            // after normalization we need (pos >= history_size + 1)
            let sub_value = self
                .pos
                .wrapping_sub(self.history_size)
                .wrapping_sub(1);
            // Inline_MatchFinder_ReduceOffsets
            self.pos = self.pos.wrapping_sub(sub_value);
            self.stream_pos = self.stream_pos.wrapping_sub(sub_value);
            if opt {
                self.normalize_opt(sub_value);
            } else {
                self.normalize(sub_value);
            }
        }

        if self.cyclic_buffer_pos == self.cyclic_buffer_size {
            self.cyclic_buffer_pos = 0;
        }
        self.set_limits();
    }

    /// Call only after a `pos` increment.
    ///
    /// Equivalent to `MatchFinder_CheckLimits`.
    pub(crate) fn check_limits(&mut self) {
        self.check_limits_body(false);
    }

    /// Handles the same overflow checks as [`check_limits`](Self::check_limits)
    /// with the cache-efficient normalizer.
    ///
    /// Equivalent to `AOCL_MatchFinder_CheckLimits`.
    pub(crate) fn check_limits_opt(&mut self) {
        self.check_limits_body(true);
    }

    /// Advance the cursor one byte, running the limit checks when the
    /// precomputed `pos_limit` is reached.
    ///
    /// Equivalent to `MOVE_POS` / `MatchFinder_MovePos`.  Note: when this
    /// runs at the end of stream data (`avail < num_hash_bytes`), the son
    /// record at the skipped cyclic position keeps its stale value; match
    /// searching cannot resume even if more data shows up later.
    #[inline]
    pub(crate) fn move_pos(&mut self) {
        self.cyclic_buffer_pos += 1;
        self.buf_pos += 1;
        let pos1 = self.pos.wrapping_add(1);
        self.pos = pos1;
        if pos1 == self.pos_limit {
            self.check_limits();
        }
    }

    /// Equivalent to `AOCL_MOVE_POS` / `AOCL_MatchFinder_MovePos`.
    #[inline]
    pub(crate) fn move_pos_opt(&mut self) {
        self.cyclic_buffer_pos += 1;
        self.buf_pos += 1;
        let pos1 = self.pos.wrapping_add(1);
        self.pos = pos1;
        if pos1 == self.pos_limit {
            self.check_limits_opt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn init_starts_at_pos_one() {
        let mut p = MatchFinder::construct();
        p.set_stream(Box::new(io::Cursor::new(b"abcabcabc".to_vec())));
        p.create(1 << 16, 0, 16, 0).unwrap();
        p.init();
        assert_eq!(p.pos, 1);
        assert_eq!(p.cyclic_buffer_pos, 1);
        assert_eq!(p.num_available_bytes(), 9);
        assert_eq!(p.current_pos_slice(), b"abcabcabc");
    }

    #[test]
    fn len_limit_clamps_to_available_near_stream_end() {
        let mut p = MatchFinder::construct();
        p.set_stream(Box::new(io::Cursor::new(vec![0u8; 5])));
        p.create(1 << 16, 0, 16, 0).unwrap();
        p.init();
        // avail (5) < match_max_len (16): len_limit clamps to what is left
        assert_eq!(p.len_limit, 5);
        assert_eq!(p.pos_limit, p.pos + 1);
    }
}
