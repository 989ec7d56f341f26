//! Binary-search-tree dictionary walkers.
//!
//! The dictionary is a forest of binary trees over one array of slot
//! pairs: `son[2*p]` holds the left child's position, `son[2*p + 1]` the
//! right.  Roots come from the hash head table.  Child links are absolute
//! positions translated to cyclic slots on each access, so the sliding
//! window overwrites nodes in place and nothing is ever freed.
//!
//! ```text
//!               [abcd] node_p=450
//!                  |
//!         ------------------
//!         |                |
//! [abcc] node_l=102  [abce] node_r=205
//! ```
//!
//! At offset (450 − 102) from the cursor holding `abcd` sits the match
//! `abcc`.  Each walk inserts the current position as the new root (unless
//! a match of `len_limit` length lets it splice and leave early).
//!
//! Translated from LzFind.c:
//!   - Lines 1217–1298: `GetMatchesSpec1`       → [`bt_get_matches_spec`]
//!   - Lines 1596–1674: `AOCL_GetMatchesSpec1`  → [`bt_get_matches_spec_ctz`]
//!   - Lines 1737–1793: `SkipMatchesSpec`       → [`bt_skip_matches_spec`]
//!   - Lines 1677–1733: `AOCL_SkipMatchesSpec`  → [`bt_skip_matches_spec_ctz`]

use super::compare::find_matching_bytes_len;
use super::types::K_EMPTY_HASH_VALUE;

#[inline(always)]
fn pair_slot(cyclic_buffer_pos: u32, delta: u32, cyclic_buffer_size: u32) -> usize {
    let slot = cyclic_buffer_pos
        + (if delta > cyclic_buffer_pos {
            cyclic_buffer_size
        } else {
            0
        })
        - delta;
    (slot as usize) << 1
}

/// Walk the tree rooted at `cur_match`, emit strictly lengthening
/// `(len, delta - 1)` pairs, and re-root the tree at `pos`.  Requires
/// `len_limit > max_len`.  Returns the number of `u32` values written.
///
/// The walk resumes byte comparison from `min(len0, len1)`: the tree
/// invariant guarantees every byte below that index already matched along
/// both subtree branches.  On a full `len_limit` match the candidate's
/// subtrees are spliced into the walker slots and the search ends; on
/// budget exhaustion or an out-of-range link both walker slots seal to
/// empty.
///
/// Equivalent to `GetMatchesSpec1`.
pub fn bt_get_matches_spec(
    len_limit: u32,
    mut cur_match: u32,
    pos: u32,
    buf: &[u8],
    cur: usize,
    son: &mut [u32],
    cyclic_buffer_pos: u32,
    cyclic_buffer_size: u32,
    mut cut_value: u32,
    d: &mut [u32],
    mut max_len: u32,
) -> usize {
    let mut ptr0 = ((cyclic_buffer_pos as usize) << 1) + 1; // right child
    let mut ptr1 = (cyclic_buffer_pos as usize) << 1; // left child
    let mut len0 = 0usize;
    let mut len1 = 0usize;
    let lim = len_limit as usize;
    let mut dn = 0usize;

    // Empty leaf slots read as position 0; their delta lands outside the
    // cyclic range, which this root-level bound also catches.
    let cm_check = if pos <= cyclic_buffer_size {
        0
    } else {
        pos - cyclic_buffer_size
    };

    if cm_check < cur_match {
        loop {
            let delta = pos - cur_match;
            {
                let pair = pair_slot(cyclic_buffer_pos, delta, cyclic_buffer_size);
                let cand = cur - delta as usize;
                let mut len = len0.min(len1);
                let pair0 = son[pair];
                if buf[cand + len] == buf[cur + len] {
                    len += 1;
                    if len != lim && buf[cand + len] == buf[cur + len] {
                        loop {
                            len += 1;
                            if len == lim {
                                break;
                            }
                            if buf[cand + len] != buf[cur + len] {
                                break;
                            }
                        }
                    }
                    if (max_len as usize) < len {
                        max_len = len as u32;
                        d[dn] = len as u32;
                        d[dn + 1] = delta - 1;
                        dn += 2;
                        if len == lim {
                            // full-limit match: splice and stop
                            son[ptr1] = pair0;
                            son[ptr0] = son[pair + 1];
                            return dn;
                        }
                    }
                }
                // cand[0..len-1] == cur[0..len-1], mismatch at cand[len]
                if buf[cand + len] < buf[cur + len] {
                    // candidate sorts below the cursor: publish as right-
                    // subtree parent, descend left
                    son[ptr1] = cur_match;
                    cur_match = son[pair + 1];
                    ptr1 = pair + 1;
                    len1 = len;
                } else {
                    son[ptr0] = cur_match;
                    cur_match = son[pair];
                    ptr0 = pair;
                    len0 = len;
                }
            }
            cut_value -= 1;
            if cut_value == 0 || cm_check >= cur_match {
                break;
            }
        }
    }

    son[ptr0] = K_EMPTY_HASH_VALUE;
    son[ptr1] = K_EMPTY_HASH_VALUE;
    dn
}

/// [`bt_get_matches_spec`] with the chunked ctz comparator.
///
/// Equivalent to `AOCL_GetMatchesSpec1` (changes wrt `GetMatchesSpec1`:
/// `AOCL_FIND_MATCHING_BYTES_LEN` used for matching).
pub fn bt_get_matches_spec_ctz(
    len_limit: u32,
    mut cur_match: u32,
    pos: u32,
    buf: &[u8],
    cur: usize,
    son: &mut [u32],
    cyclic_buffer_pos: u32,
    cyclic_buffer_size: u32,
    mut cut_value: u32,
    d: &mut [u32],
    mut max_len: u32,
) -> usize {
    let mut ptr0 = ((cyclic_buffer_pos as usize) << 1) + 1;
    let mut ptr1 = (cyclic_buffer_pos as usize) << 1;
    let mut len0 = 0usize;
    let mut len1 = 0usize;
    let lim = len_limit as usize;
    let mut dn = 0usize;

    let cm_check = if pos <= cyclic_buffer_size {
        0
    } else {
        pos - cyclic_buffer_size
    };

    if cm_check < cur_match {
        loop {
            let delta = pos - cur_match;
            {
                let pair = pair_slot(cyclic_buffer_pos, delta, cyclic_buffer_size);
                let cand = cur - delta as usize;
                let mut len = len0.min(len1);
                let pair0 = son[pair];
                if buf[cand + len] == buf[cur + len] {
                    len += 1;
                    len = find_matching_bytes_len(len, lim, &buf[cur..], &buf[cand..]);
                    if (max_len as usize) < len {
                        max_len = len as u32;
                        d[dn] = len as u32;
                        d[dn + 1] = delta - 1;
                        dn += 2;
                        if len == lim {
                            son[ptr1] = pair0;
                            son[ptr0] = son[pair + 1];
                            return dn;
                        }
                    }
                }
                if buf[cand + len] < buf[cur + len] {
                    son[ptr1] = cur_match;
                    cur_match = son[pair + 1];
                    ptr1 = pair + 1;
                    len1 = len;
                } else {
                    son[ptr0] = cur_match;
                    cur_match = son[pair];
                    ptr0 = pair;
                    len0 = len;
                }
            }
            cut_value -= 1;
            if cut_value == 0 || cm_check >= cur_match {
                break;
            }
        }
    }

    son[ptr0] = K_EMPTY_HASH_VALUE;
    son[ptr1] = K_EMPTY_HASH_VALUE;
    dn
}

/// Insert `pos` without recording matches.  Exact same tree manipulation
/// as [`bt_get_matches_spec`].
///
/// Equivalent to `SkipMatchesSpec`.
pub fn bt_skip_matches_spec(
    len_limit: u32,
    mut cur_match: u32,
    pos: u32,
    buf: &[u8],
    cur: usize,
    son: &mut [u32],
    cyclic_buffer_pos: u32,
    cyclic_buffer_size: u32,
    mut cut_value: u32,
) {
    let mut ptr0 = ((cyclic_buffer_pos as usize) << 1) + 1;
    let mut ptr1 = (cyclic_buffer_pos as usize) << 1;
    let mut len0 = 0usize;
    let mut len1 = 0usize;
    let lim = len_limit as usize;

    let cm_check = if pos <= cyclic_buffer_size {
        0
    } else {
        pos - cyclic_buffer_size
    };

    if cm_check < cur_match {
        loop {
            let delta = pos - cur_match;
            {
                let pair = pair_slot(cyclic_buffer_pos, delta, cyclic_buffer_size);
                let cand = cur - delta as usize;
                let mut len = len0.min(len1);
                if buf[cand + len] == buf[cur + len] {
                    loop {
                        len += 1;
                        if len == lim {
                            break;
                        }
                        if buf[cand + len] != buf[cur + len] {
                            break;
                        }
                    }
                    if len == lim {
                        son[ptr1] = son[pair];
                        son[ptr0] = son[pair + 1];
                        return;
                    }
                }
                if buf[cand + len] < buf[cur + len] {
                    son[ptr1] = cur_match;
                    cur_match = son[pair + 1];
                    ptr1 = pair + 1;
                    len1 = len;
                } else {
                    son[ptr0] = cur_match;
                    cur_match = son[pair];
                    ptr0 = pair;
                    len0 = len;
                }
            }
            cut_value -= 1;
            if cut_value == 0 || cm_check >= cur_match {
                break;
            }
        }
    }

    son[ptr0] = K_EMPTY_HASH_VALUE;
    son[ptr1] = K_EMPTY_HASH_VALUE;
}

/// [`bt_skip_matches_spec`] with the chunked ctz comparator.
///
/// Equivalent to `AOCL_SkipMatchesSpec`.
pub fn bt_skip_matches_spec_ctz(
    len_limit: u32,
    mut cur_match: u32,
    pos: u32,
    buf: &[u8],
    cur: usize,
    son: &mut [u32],
    cyclic_buffer_pos: u32,
    cyclic_buffer_size: u32,
    mut cut_value: u32,
) {
    let mut ptr0 = ((cyclic_buffer_pos as usize) << 1) + 1;
    let mut ptr1 = (cyclic_buffer_pos as usize) << 1;
    let mut len0 = 0usize;
    let mut len1 = 0usize;
    let lim = len_limit as usize;

    let cm_check = if pos <= cyclic_buffer_size {
        0
    } else {
        pos - cyclic_buffer_size
    };

    if cm_check < cur_match {
        loop {
            let delta = pos - cur_match;
            {
                let pair = pair_slot(cyclic_buffer_pos, delta, cyclic_buffer_size);
                let cand = cur - delta as usize;
                let mut len = len0.min(len1);
                if buf[cand + len] == buf[cur + len] {
                    len += 1;
                    len = find_matching_bytes_len(len, lim, &buf[cur..], &buf[cand..]);
                    if len == lim {
                        son[ptr1] = son[pair];
                        son[ptr0] = son[pair + 1];
                        return;
                    }
                }
                if buf[cand + len] < buf[cur + len] {
                    son[ptr1] = cur_match;
                    cur_match = son[pair + 1];
                    ptr1 = pair + 1;
                    len1 = len;
                } else {
                    son[ptr0] = cur_match;
                    cur_match = son[pair];
                    ptr0 = pair;
                    len0 = len;
                }
            }
            cut_value -= 1;
            if cut_value == 0 || cm_check >= cur_match {
                break;
            }
        }
    }

    son[ptr0] = K_EMPTY_HASH_VALUE;
    son[ptr1] = K_EMPTY_HASH_VALUE;
}
