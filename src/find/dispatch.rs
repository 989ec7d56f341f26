//! Match-enumerator front-ends and the function table.
//!
//! Each front-end computes the prefix hashes at the cursor, consults the
//! fixed 2-/3-byte tables for short candidates, then hands the running
//! `max_len` to the selected dictionary walker; `skip` variants insert
//! positions without emitting pairs.  Matches land in the caller's
//! `distances` buffer as `(len, dist - 1)` u32 pairs, strictly increasing
//! in length; the return value is the number of u32 values written.
//!
//! Translated from LzFind.c lines 1796–2990:
//!   - `GET_MATCHES_HEADER` / `SKIP_HEADER` / `MOVE_POS_RET` /
//!     `GET_MATCHES_FOOTER_*` / `SET_mmm` / `HC_SKIP_HEADER/FOOTER`:
//!     expanded inline in each function below
//!   - `Bt2_MatchFinder_GetMatches` / `_Skip`   → [`bt2_get_matches`] / [`bt2_skip`]
//!   - `Bt3_MatchFinder_GetMatches` / `_Skip`   → [`bt3_get_matches`] / [`bt3_skip`]
//!   - `Bt4_MatchFinder_GetMatches` / `_Skip`   → [`bt4_get_matches`] / [`bt4_skip`]
//!   - `Bt5_MatchFinder_GetMatches` / `_Skip`   → [`bt5_get_matches`] / [`bt5_skip`]
//!   - `Hc4_MatchFinder_GetMatches` / `_Skip`   → [`hc4_get_matches`] / [`hc4_skip`]
//!   - `Hc5_MatchFinder_GetMatches` / `_Skip`   → [`hc5_get_matches`] / [`hc5_skip`]
//!   - `AOCL_Bt4_MatchFinder_GetMatches` / `_Skip`
//!                                              → [`bt4_get_matches_opt`] / [`bt4_skip_opt`]
//!   - `AOCL_Hc4/5_MatchFinder_GetMatches` / `_Skip`
//!                                              → [`hc4_get_matches_opt`] … [`hc5_skip_opt`]
//!   - `AOCL_Hc4/5_MatchFinder_GetMatches_Cehc8/16` and skips
//!                                              → [`hc_get_matches_cehc`] wrappers
//!     (const-generic over the block size; the hash width stays a flag,
//!     mirroring the C macro parameter)
//!   - `IMatchFinder2` / `MatchFinder_CreateVTable` / `AOCL_MatchFinder_CreateVTable`
//!                                              → [`Mf2`] / [`create_vtable`] / [`aocl_create_vtable`]

use super::bt::{
    bt_get_matches_spec, bt_get_matches_spec_ctz, bt_skip_matches_spec, bt_skip_matches_spec_ctz,
};
use super::cehc::{
    cehc_get_matches_spec, chain_get_head, chain_insert, HASH_CHAIN_16_LEVEL,
    HASH_CHAIN_SLOT_SZ_16, HASH_CHAIN_SLOT_SZ_8,
};
use super::compare::update_max_len;
use super::hash::{
    hash2_calc, hash3_calc, hash4_calc, hash4_calc_nofix3, hash5_calc, hash5_calc_nofix3,
    K_FIX3_HASH_SIZE, K_FIX4_HASH_SIZE, K_FIX5_HASH_SIZE,
};
use super::hc::{hc_get_matches_spec, hc_get_matches_spec_guarded};
use super::types::MatchFinder;

const FIX3: usize = K_FIX3_HASH_SIZE as usize;
const FIX4: usize = K_FIX4_HASH_SIZE as usize;
const FIX5: usize = K_FIX5_HASH_SIZE as usize;

// SET_mmm: clamp candidate deltas to both the cyclic range and the
// positions that exist at all.
#[inline(always)]
fn set_mmm(p: &MatchFinder, pos: u32) -> u32 {
    p.cyclic_buffer_size.min(pos)
}

// ─────────────────────────────────────────────────────────────────────────────
// Reference BT front-ends
// ─────────────────────────────────────────────────────────────────────────────

/// Equivalent to `Bt2_MatchFinder_GetMatches`.
pub(crate) fn bt2_get_matches(p: &mut MatchFinder, distances: &mut [u32]) -> usize {
    let len_limit = p.len_limit;
    if len_limit < 2 {
        p.move_pos();
        return 0;
    }
    let cur = p.buf_pos;
    let hv = hash2_calc(&p.window[cur..]);
    let cur_match = p.hash[hv as usize];
    p.hash[hv as usize] = p.pos;
    let dn = bt_get_matches_spec(
        len_limit,
        cur_match,
        p.pos,
        &p.window,
        cur,
        &mut p.son,
        p.cyclic_buffer_pos,
        p.cyclic_buffer_size,
        p.cut_value,
        distances,
        1,
    );
    p.move_pos();
    dn
}

/// Equivalent to `Bt3_MatchFinder_GetMatches`.
pub(crate) fn bt3_get_matches(p: &mut MatchFinder, distances: &mut [u32]) -> usize {
    let len_limit = p.len_limit;
    if len_limit < 3 {
        p.move_pos();
        return 0;
    }
    let cur = p.buf_pos;
    let (h2, hv) = hash3_calc(&p.crc, &p.window[cur..], p.hash_mask);
    let pos = p.pos;

    let d2 = pos.wrapping_sub(p.hash[h2 as usize]);
    let cur_match = p.hash[FIX3 + hv as usize];
    p.hash[h2 as usize] = pos;
    p.hash[FIX3 + hv as usize] = pos;

    let mmm = set_mmm(p, pos);
    let mut max_len: u32 = 2;
    let mut dn = 0usize;

    if d2 < mmm && p.window[cur - d2 as usize] == p.window[cur] {
        max_len = update_max_len(&p.window, cur, d2, max_len, len_limit);
        distances[0] = max_len;
        distances[1] = d2 - 1;
        dn = 2;
        if max_len == len_limit {
            bt_skip_matches_spec(
                len_limit,
                cur_match,
                pos,
                &p.window,
                cur,
                &mut p.son,
                p.cyclic_buffer_pos,
                p.cyclic_buffer_size,
                p.cut_value,
            );
            p.move_pos();
            return dn;
        }
    }

    dn += bt_get_matches_spec(
        len_limit,
        cur_match,
        pos,
        &p.window,
        cur,
        &mut p.son,
        p.cyclic_buffer_pos,
        p.cyclic_buffer_size,
        p.cut_value,
        &mut distances[dn..],
        max_len,
    );
    p.move_pos();
    dn
}

/// Equivalent to `Bt4_MatchFinder_GetMatches`.
pub(crate) fn bt4_get_matches(p: &mut MatchFinder, distances: &mut [u32]) -> usize {
    let len_limit = p.len_limit;
    if len_limit < 4 {
        p.move_pos();
        return 0;
    }
    let cur = p.buf_pos;
    let (h2, h3, hv) = hash4_calc(&p.crc, &p.window[cur..], p.hash_mask);
    let pos = p.pos;

    let mut d2 = pos.wrapping_sub(p.hash[h2 as usize]); // dist to last 2-byte match
    let d3 = pos.wrapping_sub(p.hash[FIX3 + h3 as usize]); // dist to last 3-byte match
    let cur_match = p.hash[FIX4 + hv as usize];

    p.hash[h2 as usize] = pos;
    p.hash[FIX3 + h3 as usize] = pos;
    p.hash[FIX4 + hv as usize] = pos;

    let mmm = set_mmm(p, pos);
    let mut max_len: u32 = 3;
    let mut dn = 0usize;

    // exit points via break; runs once
    loop {
        if d2 < mmm && p.window[cur - d2 as usize] == p.window[cur] {
            distances[dn] = 2;
            distances[dn + 1] = d2 - 1;
            dn += 2;
            if p.window[cur - d2 as usize + 2] == p.window[cur + 2] {
                // 3rd byte matches at d2 as well; extend there
            } else if d3 < mmm && p.window[cur - d3 as usize] == p.window[cur] {
                distances[dn + 1] = d3 - 1;
                dn += 2;
                d2 = d3;
            } else {
                break;
            }
        } else if d3 < mmm && p.window[cur - d3 as usize] == p.window[cur] {
            distances[dn + 1] = d3 - 1;
            dn += 2;
            d2 = d3;
        } else {
            break;
        }

        // 2 or 3 bytes matched so far; count from max_len at offset d2
        max_len = update_max_len(&p.window, cur, d2, max_len, len_limit);
        distances[dn - 2] = max_len;

        // at len_limit already: d2 is the smallest offset, nothing better
        // at d3 or in the tree
        if max_len == len_limit {
            bt_skip_matches_spec(
                len_limit,
                cur_match,
                pos,
                &p.window,
                cur,
                &mut p.son,
                p.cyclic_buffer_pos,
                p.cyclic_buffer_size,
                p.cut_value,
            );
            p.move_pos();
            return dn;
        }
        break;
    }

    dn += bt_get_matches_spec(
        len_limit,
        cur_match,
        pos,
        &p.window,
        cur,
        &mut p.son,
        p.cyclic_buffer_pos,
        p.cyclic_buffer_size,
        p.cut_value,
        &mut distances[dn..],
        max_len,
    );
    p.move_pos();
    dn
}

/// Equivalent to `Bt5_MatchFinder_GetMatches`.
pub(crate) fn bt5_get_matches(p: &mut MatchFinder, distances: &mut [u32]) -> usize {
    let len_limit = p.len_limit;
    if len_limit < 5 {
        p.move_pos();
        return 0;
    }
    let cur = p.buf_pos;
    let (h2, h3, hv) = hash5_calc(&p.crc, &p.window[cur..], p.hash_mask);
    let pos = p.pos;

    let mut d2 = pos.wrapping_sub(p.hash[h2 as usize]);
    let d3 = pos.wrapping_sub(p.hash[FIX3 + h3 as usize]);
    let cur_match = p.hash[FIX5 + hv as usize];

    p.hash[h2 as usize] = pos;
    p.hash[FIX3 + h3 as usize] = pos;
    p.hash[FIX5 + hv as usize] = pos;

    let mmm = set_mmm(p, pos);
    let mut max_len: u32 = 4;
    let mut dn = 0usize;

    loop {
        if d2 < mmm && p.window[cur - d2 as usize] == p.window[cur] {
            distances[dn] = 2;
            distances[dn + 1] = d2 - 1;
            dn += 2;
            if p.window[cur - d2 as usize + 2] == p.window[cur + 2] {
            } else if d3 < mmm && p.window[cur - d3 as usize] == p.window[cur] {
                distances[dn + 1] = d3 - 1;
                dn += 2;
                d2 = d3;
            } else {
                break;
            }
        } else if d3 < mmm && p.window[cur - d3 as usize] == p.window[cur] {
            distances[dn + 1] = d3 - 1;
            dn += 2;
            d2 = d3;
        } else {
            break;
        }

        distances[dn - 2] = 3;
        if p.window[cur - d2 as usize + 3] != p.window[cur + 3] {
            break;
        }
        max_len = update_max_len(&p.window, cur, d2, max_len, len_limit);
        distances[dn - 2] = max_len;
        if max_len == len_limit {
            bt_skip_matches_spec(
                len_limit,
                cur_match,
                pos,
                &p.window,
                cur,
                &mut p.son,
                p.cyclic_buffer_pos,
                p.cyclic_buffer_size,
                p.cut_value,
            );
            p.move_pos();
            return dn;
        }
        break;
    }

    dn += bt_get_matches_spec(
        len_limit,
        cur_match,
        pos,
        &p.window,
        cur,
        &mut p.son,
        p.cyclic_buffer_pos,
        p.cyclic_buffer_size,
        p.cut_value,
        &mut distances[dn..],
        max_len,
    );
    p.move_pos();
    dn
}

// ─────────────────────────────────────────────────────────────────────────────
// Reference HC front-ends
// ─────────────────────────────────────────────────────────────────────────────

/// Equivalent to `Hc4_MatchFinder_GetMatches`.
pub(crate) fn hc4_get_matches(p: &mut MatchFinder, distances: &mut [u32]) -> usize {
    let len_limit = p.len_limit;
    if len_limit < 4 {
        p.move_pos();
        return 0;
    }
    let cur = p.buf_pos;
    let (h2, h3, hv) = hash4_calc(&p.crc, &p.window[cur..], p.hash_mask);
    let pos = p.pos;

    let mut d2 = pos.wrapping_sub(p.hash[h2 as usize]);
    let d3 = pos.wrapping_sub(p.hash[FIX3 + h3 as usize]);
    let cur_match = p.hash[FIX4 + hv as usize];

    p.hash[h2 as usize] = pos;
    p.hash[FIX3 + h3 as usize] = pos;
    p.hash[FIX4 + hv as usize] = pos;

    let mmm = set_mmm(p, pos);
    let mut max_len: u32 = 3;
    let mut dn = 0usize;

    loop {
        if d2 < mmm && p.window[cur - d2 as usize] == p.window[cur] {
            distances[dn] = 2;
            distances[dn + 1] = d2 - 1;
            dn += 2;
            if p.window[cur - d2 as usize + 2] == p.window[cur + 2] {
            } else if d3 < mmm && p.window[cur - d3 as usize] == p.window[cur] {
                distances[dn + 1] = d3 - 1;
                dn += 2;
                d2 = d3;
            } else {
                break;
            }
        } else if d3 < mmm && p.window[cur - d3 as usize] == p.window[cur] {
            distances[dn + 1] = d3 - 1;
            dn += 2;
            d2 = d3;
        } else {
            break;
        }

        max_len = update_max_len(&p.window, cur, d2, max_len, len_limit);
        distances[dn - 2] = max_len;
        if max_len == len_limit {
            // chain link still has to be written for this position
            p.son[p.cyclic_buffer_pos as usize] = cur_match;
            p.move_pos();
            return dn;
        }
        break;
    }

    dn += hc_get_matches_spec(
        len_limit,
        cur_match,
        pos,
        &p.window,
        cur,
        &mut p.son,
        p.cyclic_buffer_pos,
        p.cyclic_buffer_size,
        p.cut_value,
        &mut distances[dn..],
        max_len,
    );
    p.move_pos();
    dn
}

/// Equivalent to `Hc5_MatchFinder_GetMatches`.
pub(crate) fn hc5_get_matches(p: &mut MatchFinder, distances: &mut [u32]) -> usize {
    let len_limit = p.len_limit;
    if len_limit < 5 {
        p.move_pos();
        return 0;
    }
    let cur = p.buf_pos;
    let (h2, h3, hv) = hash5_calc(&p.crc, &p.window[cur..], p.hash_mask);
    let pos = p.pos;

    let mut d2 = pos.wrapping_sub(p.hash[h2 as usize]);
    let d3 = pos.wrapping_sub(p.hash[FIX3 + h3 as usize]);
    let cur_match = p.hash[FIX5 + hv as usize];

    p.hash[h2 as usize] = pos;
    p.hash[FIX3 + h3 as usize] = pos;
    p.hash[FIX5 + hv as usize] = pos;

    let mmm = set_mmm(p, pos);
    let mut max_len: u32 = 4;
    let mut dn = 0usize;

    loop {
        if d2 < mmm && p.window[cur - d2 as usize] == p.window[cur] {
            distances[dn] = 2;
            distances[dn + 1] = d2 - 1;
            dn += 2;
            if p.window[cur - d2 as usize + 2] == p.window[cur + 2] {
            } else if d3 < mmm && p.window[cur - d3 as usize] == p.window[cur] {
                distances[dn + 1] = d3 - 1;
                dn += 2;
                d2 = d3;
            } else {
                break;
            }
        } else if d3 < mmm && p.window[cur - d3 as usize] == p.window[cur] {
            distances[dn + 1] = d3 - 1;
            dn += 2;
            d2 = d3;
        } else {
            break;
        }

        distances[dn - 2] = 3;
        if p.window[cur - d2 as usize + 3] != p.window[cur + 3] {
            break;
        }
        max_len = update_max_len(&p.window, cur, d2, max_len, len_limit);
        distances[dn - 2] = max_len;
        if max_len == len_limit {
            p.son[p.cyclic_buffer_pos as usize] = cur_match;
            p.move_pos();
            return dn;
        }
        break;
    }

    dn += hc_get_matches_spec(
        len_limit,
        cur_match,
        pos,
        &p.window,
        cur,
        &mut p.son,
        p.cyclic_buffer_pos,
        p.cyclic_buffer_size,
        p.cut_value,
        &mut distances[dn..],
        max_len,
    );
    p.move_pos();
    dn
}

// ─────────────────────────────────────────────────────────────────────────────
// Reference skip variants
// ─────────────────────────────────────────────────────────────────────────────

/// Equivalent to `Bt2_MatchFinder_Skip`.
pub(crate) fn bt2_skip(p: &mut MatchFinder, mut num: u32) {
    if num == 0 {
        return;
    }
    loop {
        let len_limit = p.len_limit;
        if len_limit < 2 {
            p.move_pos();
        } else {
            let cur = p.buf_pos;
            let hv = hash2_calc(&p.window[cur..]);
            let cur_match = p.hash[hv as usize];
            p.hash[hv as usize] = p.pos;
            bt_skip_matches_spec(
                len_limit,
                cur_match,
                p.pos,
                &p.window,
                cur,
                &mut p.son,
                p.cyclic_buffer_pos,
                p.cyclic_buffer_size,
                p.cut_value,
            );
            p.move_pos();
        }
        num -= 1;
        if num == 0 {
            return;
        }
    }
}

/// Equivalent to `Bt3_MatchFinder_Skip`.
pub(crate) fn bt3_skip(p: &mut MatchFinder, mut num: u32) {
    if num == 0 {
        return;
    }
    loop {
        let len_limit = p.len_limit;
        if len_limit < 3 {
            p.move_pos();
        } else {
            let cur = p.buf_pos;
            let (h2, hv) = hash3_calc(&p.crc, &p.window[cur..], p.hash_mask);
            let pos = p.pos;
            let cur_match = p.hash[FIX3 + hv as usize];
            p.hash[h2 as usize] = pos;
            p.hash[FIX3 + hv as usize] = pos;
            bt_skip_matches_spec(
                len_limit,
                cur_match,
                pos,
                &p.window,
                cur,
                &mut p.son,
                p.cyclic_buffer_pos,
                p.cyclic_buffer_size,
                p.cut_value,
            );
            p.move_pos();
        }
        num -= 1;
        if num == 0 {
            return;
        }
    }
}

/// Equivalent to `Bt4_MatchFinder_Skip`.
pub(crate) fn bt4_skip(p: &mut MatchFinder, mut num: u32) {
    if num == 0 {
        return;
    }
    loop {
        let len_limit = p.len_limit;
        if len_limit < 4 {
            p.move_pos();
        } else {
            let cur = p.buf_pos;
            let (h2, h3, hv) = hash4_calc(&p.crc, &p.window[cur..], p.hash_mask);
            let pos = p.pos;
            let cur_match = p.hash[FIX4 + hv as usize];
            p.hash[h2 as usize] = pos;
            p.hash[FIX3 + h3 as usize] = pos;
            p.hash[FIX4 + hv as usize] = pos;
            bt_skip_matches_spec(
                len_limit,
                cur_match,
                pos,
                &p.window,
                cur,
                &mut p.son,
                p.cyclic_buffer_pos,
                p.cyclic_buffer_size,
                p.cut_value,
            );
            p.move_pos();
        }
        num -= 1;
        if num == 0 {
            return;
        }
    }
}

/// Equivalent to `Bt5_MatchFinder_Skip`.
pub(crate) fn bt5_skip(p: &mut MatchFinder, mut num: u32) {
    if num == 0 {
        return;
    }
    loop {
        let len_limit = p.len_limit;
        if len_limit < 5 {
            p.move_pos();
        } else {
            let cur = p.buf_pos;
            let (h2, h3, hv) = hash5_calc(&p.crc, &p.window[cur..], p.hash_mask);
            let pos = p.pos;
            let cur_match = p.hash[FIX5 + hv as usize];
            p.hash[h2 as usize] = pos;
            p.hash[FIX3 + h3 as usize] = pos;
            p.hash[FIX5 + hv as usize] = pos;
            bt_skip_matches_spec(
                len_limit,
                cur_match,
                pos,
                &p.window,
                cur,
                &mut p.son,
                p.cyclic_buffer_pos,
                p.cyclic_buffer_size,
                p.cut_value,
            );
            p.move_pos();
        }
        num -= 1;
        if num == 0 {
            return;
        }
    }
}

/// Equivalent to `Hc4_MatchFinder_Skip` (batched `HC_SKIP_HEADER` /
/// `HC_SKIP_FOOTER` form, bounded by `pos_limit` per batch).
pub(crate) fn hc4_skip(p: &mut MatchFinder, mut num: u32) {
    if num == 0 {
        return;
    }
    loop {
        if p.len_limit < 4 {
            p.move_pos();
            num -= 1;
            if num == 0 {
                return;
            }
            continue;
        }
        // (pos == pos_limit) is not allowed here
        let mut num2 = num;
        let rem = p.pos_limit - p.pos;
        if num2 > rem {
            num2 = rem;
        }
        num -= num2;
        let cyc_pos = p.cyclic_buffer_pos;
        p.cyclic_buffer_pos = cyc_pos + num2;
        let mut son_idx = cyc_pos as usize;
        let mut cur = p.buf_pos;
        let mut pos = p.pos;
        loop {
            let (h2, h3, hv) = hash4_calc(&p.crc, &p.window[cur..], p.hash_mask);
            let cur_match = p.hash[FIX4 + hv as usize];
            p.hash[h2 as usize] = pos;
            p.hash[FIX3 + h3 as usize] = pos;
            p.hash[FIX4 + hv as usize] = pos;
            p.son[son_idx] = cur_match;
            son_idx += 1;
            cur += 1;
            pos = pos.wrapping_add(1);
            num2 -= 1;
            if num2 == 0 {
                break;
            }
        }
        p.buf_pos = cur;
        p.pos = pos;
        if pos == p.pos_limit {
            p.check_limits();
        }
        if num == 0 {
            return;
        }
    }
}

/// Equivalent to `Hc5_MatchFinder_Skip`.
pub(crate) fn hc5_skip(p: &mut MatchFinder, mut num: u32) {
    if num == 0 {
        return;
    }
    loop {
        if p.len_limit < 5 {
            p.move_pos();
            num -= 1;
            if num == 0 {
                return;
            }
            continue;
        }
        let mut num2 = num;
        let rem = p.pos_limit - p.pos;
        if num2 > rem {
            num2 = rem;
        }
        num -= num2;
        let cyc_pos = p.cyclic_buffer_pos;
        p.cyclic_buffer_pos = cyc_pos + num2;
        let mut son_idx = cyc_pos as usize;
        let mut cur = p.buf_pos;
        let mut pos = p.pos;
        loop {
            let (h2, h3, hv) = hash5_calc(&p.crc, &p.window[cur..], p.hash_mask);
            let cur_match = p.hash[FIX5 + hv as usize];
            p.hash[h2 as usize] = pos;
            p.hash[FIX3 + h3 as usize] = pos;
            p.hash[FIX5 + hv as usize] = pos;
            p.son[son_idx] = cur_match;
            son_idx += 1;
            cur += 1;
            pos = pos.wrapping_add(1);
            num2 -= 1;
            if num2 == 0 {
                break;
            }
        }
        p.buf_pos = cur;
        p.pos = pos;
        if pos == p.pos_limit {
            p.check_limits();
        }
        if num == 0 {
            return;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AOCL front-ends, reference dictionary layouts (no 3-byte fixed table)
// ─────────────────────────────────────────────────────────────────────────────

/// Equivalent to `AOCL_Bt4_MatchFinder_GetMatches` (changes wrt
/// `Bt4_MatchFinder_GetMatches`: h3 table not used, ctz tree walker).
pub(crate) fn bt4_get_matches_opt(p: &mut MatchFinder, distances: &mut [u32]) -> usize {
    let len_limit = p.len_limit;
    if len_limit < 4 {
        p.move_pos_opt();
        return 0;
    }
    let cur = p.buf_pos;
    let (h2, hv) = hash4_calc_nofix3(&p.crc, &p.window[cur..], p.hash_mask);
    let pos = p.pos;

    let d2 = pos.wrapping_sub(p.hash[h2 as usize]);
    let cur_match = p.hash[FIX3 + hv as usize];

    p.hash[h2 as usize] = pos;
    p.hash[FIX3 + hv as usize] = pos;

    let mmm = set_mmm(p, pos);
    let mut max_len: u32 = 3;
    let mut dn = 0usize;

    loop {
        if d2 < mmm && p.window[cur - d2 as usize] == p.window[cur] {
            distances[dn] = 2;
            distances[dn + 1] = d2 - 1;
            dn += 2;
            if p.window[cur - d2 as usize + 2] != p.window[cur + 2] {
                break; // no match at min length; the tree takes over
            }
        } else {
            break;
        }

        max_len = update_max_len(&p.window, cur, d2, max_len, len_limit);
        distances[dn - 2] = max_len;
        if max_len == len_limit {
            bt_skip_matches_spec_ctz(
                len_limit,
                cur_match,
                pos,
                &p.window,
                cur,
                &mut p.son,
                p.cyclic_buffer_pos,
                p.cyclic_buffer_size,
                p.cut_value,
            );
            p.move_pos_opt();
            return dn;
        }
        break;
    }

    dn += bt_get_matches_spec_ctz(
        len_limit,
        cur_match,
        pos,
        &p.window,
        cur,
        &mut p.son,
        p.cyclic_buffer_pos,
        p.cyclic_buffer_size,
        p.cut_value,
        &mut distances[dn..],
        max_len,
    );
    p.move_pos_opt();
    dn
}

/// Equivalent to `AOCL_Bt4_MatchFinder_Skip`.
pub(crate) fn bt4_skip_opt(p: &mut MatchFinder, mut num: u32) {
    if num == 0 {
        return;
    }
    loop {
        let len_limit = p.len_limit;
        if len_limit < 4 {
            p.move_pos_opt();
        } else {
            let cur = p.buf_pos;
            let (h2, hv) = hash4_calc_nofix3(&p.crc, &p.window[cur..], p.hash_mask);
            let pos = p.pos;
            let cur_match = p.hash[FIX3 + hv as usize];
            p.hash[h2 as usize] = pos;
            p.hash[FIX3 + hv as usize] = pos;
            bt_skip_matches_spec_ctz(
                len_limit,
                cur_match,
                pos,
                &p.window,
                cur,
                &mut p.son,
                p.cyclic_buffer_pos,
                p.cyclic_buffer_size,
                p.cut_value,
            );
            p.move_pos_opt();
        }
        num -= 1;
        if num == 0 {
            return;
        }
    }
}

// The AOCL interleaved-HC front-ends share one shape; the hash width is
// the only difference, mirroring the C AOCL_HASH4/5_CALC macro parameter.
#[inline(always)]
fn hc_get_matches_opt_generic(p: &mut MatchFinder, distances: &mut [u32], five: bool) -> usize {
    let min_len = if five { 5 } else { 4 };
    let len_limit = p.len_limit;
    if len_limit < min_len {
        p.move_pos();
        return 0;
    }
    let cur = p.buf_pos;
    let (h2, hv) = if five {
        hash5_calc_nofix3(&p.crc, &p.window[cur..], p.hash_mask)
    } else {
        hash4_calc_nofix3(&p.crc, &p.window[cur..], p.hash_mask)
    };
    let pos = p.pos;

    let d2 = pos.wrapping_sub(p.hash[h2 as usize]);
    let cur_match = p.hash[FIX3 + hv as usize];

    p.hash[h2 as usize] = pos;
    p.hash[FIX3 + hv as usize] = pos;

    let mmm = set_mmm(p, pos);
    let mut max_len: u32 = 3;
    let mut dn = 0usize;

    loop {
        if d2 < mmm && p.window[cur - d2 as usize] == p.window[cur] {
            distances[dn] = 2;
            distances[dn + 1] = d2 - 1;
            dn += 2;
            if p.window[cur - d2 as usize + 2] != p.window[cur + 2] {
                break;
            }
        } else {
            break;
        }

        max_len = update_max_len(&p.window, cur, d2, max_len, len_limit);
        distances[dn - 2] = max_len;
        if max_len == len_limit {
            p.son[p.cyclic_buffer_pos as usize] = cur_match;
            p.move_pos();
            return dn;
        }
        break;
    }

    dn += hc_get_matches_spec_guarded(
        len_limit,
        cur_match,
        pos,
        &p.window,
        cur,
        &mut p.son,
        p.cyclic_buffer_pos,
        p.cyclic_buffer_size,
        p.cut_value,
        &mut distances[dn..],
        max_len,
    );
    p.move_pos_opt();
    dn
}

/// Equivalent to `AOCL_Hc4_MatchFinder_GetMatches`.
pub(crate) fn hc4_get_matches_opt(p: &mut MatchFinder, distances: &mut [u32]) -> usize {
    hc_get_matches_opt_generic(p, distances, false)
}

/// Equivalent to `AOCL_Hc5_MatchFinder_GetMatches`.
pub(crate) fn hc5_get_matches_opt(p: &mut MatchFinder, distances: &mut [u32]) -> usize {
    hc_get_matches_opt_generic(p, distances, true)
}

#[inline(always)]
fn hc_skip_opt_generic(p: &mut MatchFinder, mut num: u32, five: bool) {
    if num == 0 {
        return;
    }
    let min_len = if five { 5 } else { 4 };
    loop {
        if p.len_limit < min_len {
            p.move_pos();
            num -= 1;
            if num == 0 {
                return;
            }
            continue;
        }
        let mut num2 = num;
        let rem = p.pos_limit - p.pos;
        if num2 > rem {
            num2 = rem;
        }
        num -= num2;
        let cyc_pos = p.cyclic_buffer_pos;
        p.cyclic_buffer_pos = cyc_pos + num2;
        let mut son_idx = cyc_pos as usize;
        let mut cur = p.buf_pos;
        let mut pos = p.pos;
        loop {
            let (h2, hv) = if five {
                hash5_calc_nofix3(&p.crc, &p.window[cur..], p.hash_mask)
            } else {
                hash4_calc_nofix3(&p.crc, &p.window[cur..], p.hash_mask)
            };
            let cur_match = p.hash[FIX3 + hv as usize];
            p.hash[h2 as usize] = pos;
            p.hash[FIX3 + hv as usize] = pos;
            p.son[son_idx] = cur_match;
            son_idx += 1;
            cur += 1;
            pos = pos.wrapping_add(1);
            num2 -= 1;
            if num2 == 0 {
                break;
            }
        }
        p.buf_pos = cur;
        p.pos = pos;
        if pos == p.pos_limit {
            p.check_limits();
        }
        if num == 0 {
            return;
        }
    }
}

/// Equivalent to `AOCL_Hc4_MatchFinder_Skip`.
pub(crate) fn hc4_skip_opt(p: &mut MatchFinder, num: u32) {
    hc_skip_opt_generic(p, num, false)
}

/// Equivalent to `AOCL_Hc5_MatchFinder_Skip`.
pub(crate) fn hc5_skip_opt(p: &mut MatchFinder, num: u32) {
    hc_skip_opt_generic(p, num, true)
}

// ─────────────────────────────────────────────────────────────────────────────
// AOCL front-ends, cache-efficient dictionary
// ─────────────────────────────────────────────────────────────────────────────

/// Equivalent to `AOCL_HC_MF_GETMATCHES` instantiated per block size and
/// hash width (`AOCL_Hc4/5_MatchFinder_GetMatches_Cehc8/16`).
#[inline(always)]
fn hc_get_matches_cehc<const SLOT_SZ: usize>(
    p: &mut MatchFinder,
    distances: &mut [u32],
    five: bool,
) -> usize {
    let chain_max = SLOT_SZ - 1;
    let min_len = if five { 5 } else { 4 };
    let len_limit = p.len_limit;
    if len_limit < min_len {
        p.move_pos_opt();
        return 0;
    }
    let cur = p.buf_pos;
    let (h2, hv) = if five {
        hash5_calc_nofix3(&p.crc, &p.window[cur..], p.hash_mask)
    } else {
        hash4_calc_nofix3(&p.crc, &p.window[cur..], p.hash_mask)
    };
    let pos = p.pos;

    let d2 = pos.wrapping_sub(p.hash[h2 as usize]);
    let hc_head_pos = chain_get_head(&p.son, hv as usize, SLOT_SZ);
    p.hash[h2 as usize] = pos;

    let mmm = set_mmm(p, pos);
    let mut max_len: u32 = 3;
    let mut dn = 0usize;

    loop {
        if d2 < mmm && p.window[cur - d2 as usize] == p.window[cur] {
            distances[dn] = 2;
            distances[dn + 1] = d2 - 1;
            dn += 2;
            if p.window[cur - d2 as usize + 2] != p.window[cur + 2] {
                break;
            }
        } else {
            break;
        }

        max_len = update_max_len(&p.window, cur, d2, max_len, len_limit);
        distances[dn - 2] = max_len;
        if max_len == len_limit {
            // set pos at the current head before leaving
            chain_insert(&mut p.son, hv as usize, hc_head_pos, pos, SLOT_SZ, chain_max);
            p.move_pos_opt();
            return dn;
        }
        break;
    }

    dn += cehc_get_matches_spec::<SLOT_SZ>(
        len_limit,
        hc_head_pos,
        hv,
        pos,
        &p.window,
        cur,
        &mut p.son,
        p.cyclic_buffer_size,
        p.cut_value,
        &mut distances[dn..],
        max_len,
    );
    p.move_pos_opt();
    dn
}

/// Equivalent to `AOCL_HC_MF_SKIP` instantiated per block size and hash
/// width (`AOCL_Hc4/5_MatchFinder_Skip_Cehc8/16`).
#[inline(always)]
fn hc_skip_cehc<const SLOT_SZ: usize>(p: &mut MatchFinder, mut num: u32, five: bool) {
    if num == 0 {
        return;
    }
    let chain_max = SLOT_SZ - 1;
    let min_len = if five { 5 } else { 4 };
    loop {
        if p.len_limit < min_len {
            p.move_pos_opt();
            num -= 1;
            if num == 0 {
                return;
            }
            continue;
        }
        let mut num2 = num;
        let rem = p.pos_limit - p.pos;
        if num2 > rem {
            num2 = rem;
        }
        num -= num2;
        p.cyclic_buffer_pos += num2;
        let mut cur = p.buf_pos;
        let mut pos = p.pos;
        loop {
            let (h2, hv) = if five {
                hash5_calc_nofix3(&p.crc, &p.window[cur..], p.hash_mask)
            } else {
                hash4_calc_nofix3(&p.crc, &p.window[cur..], p.hash_mask)
            };
            let head = chain_get_head(&p.son, hv as usize, SLOT_SZ);
            p.hash[h2 as usize] = pos;
            chain_insert(&mut p.son, hv as usize, head, pos, SLOT_SZ, chain_max);
            cur += 1;
            pos = pos.wrapping_add(1);
            num2 -= 1;
            if num2 == 0 {
                break;
            }
        }
        p.buf_pos = cur;
        p.pos = pos;
        if pos == p.pos_limit {
            p.check_limits_opt();
        }
        if num == 0 {
            return;
        }
    }
}

pub(crate) fn hc4_get_matches_cehc8(p: &mut MatchFinder, d: &mut [u32]) -> usize {
    hc_get_matches_cehc::<HASH_CHAIN_SLOT_SZ_8>(p, d, false)
}
pub(crate) fn hc4_get_matches_cehc16(p: &mut MatchFinder, d: &mut [u32]) -> usize {
    hc_get_matches_cehc::<HASH_CHAIN_SLOT_SZ_16>(p, d, false)
}
pub(crate) fn hc5_get_matches_cehc8(p: &mut MatchFinder, d: &mut [u32]) -> usize {
    hc_get_matches_cehc::<HASH_CHAIN_SLOT_SZ_8>(p, d, true)
}
pub(crate) fn hc5_get_matches_cehc16(p: &mut MatchFinder, d: &mut [u32]) -> usize {
    hc_get_matches_cehc::<HASH_CHAIN_SLOT_SZ_16>(p, d, true)
}
pub(crate) fn hc4_skip_cehc8(p: &mut MatchFinder, num: u32) {
    hc_skip_cehc::<HASH_CHAIN_SLOT_SZ_8>(p, num, false)
}
pub(crate) fn hc4_skip_cehc16(p: &mut MatchFinder, num: u32) {
    hc_skip_cehc::<HASH_CHAIN_SLOT_SZ_16>(p, num, false)
}
pub(crate) fn hc5_skip_cehc8(p: &mut MatchFinder, num: u32) {
    hc_skip_cehc::<HASH_CHAIN_SLOT_SZ_8>(p, num, true)
}
pub(crate) fn hc5_skip_cehc16(p: &mut MatchFinder, num: u32) {
    hc_skip_cehc::<HASH_CHAIN_SLOT_SZ_16>(p, num, true)
}

// ─────────────────────────────────────────────────────────────────────────────
// Function table (IMatchFinder2)
// ─────────────────────────────────────────────────────────────────────────────

pub type MfInitFn = fn(&mut MatchFinder);
pub type MfNumAvailFn = fn(&MatchFinder) -> u32;
pub type MfCurPosFn = for<'a> fn(&'a MatchFinder) -> &'a [u8];
pub type MfGetMatchesFn = fn(&mut MatchFinder, &mut [u32]) -> usize;
pub type MfSkipFn = fn(&mut MatchFinder, u32);

/// Function table handed to the encoder; one dispatch decision at
/// construction, direct calls afterwards.
///
/// Mirrors `IMatchFinder2`.  Conditions: `get_num_available_bytes` must
/// be consulted before relying on match lengths near stream end;
/// `get_pointer_to_current_pos`'s slice must be used only before any
/// other call.
#[derive(Clone, Copy)]
pub struct Mf2 {
    pub init: MfInitFn,
    pub get_num_available_bytes: MfNumAvailFn,
    pub get_pointer_to_current_pos: MfCurPosFn,
    pub get_matches: MfGetMatchesFn,
    pub skip: MfSkipFn,
}

fn current_pos_slice(p: &MatchFinder) -> &[u8] {
    p.current_pos_slice()
}

fn num_available_bytes(p: &MatchFinder) -> u32 {
    p.num_available_bytes()
}

/// Select the reference routines for the configured layout.
///
/// Equivalent to `MatchFinder_CreateVTable`.
pub fn create_vtable(p: &MatchFinder) -> Mf2 {
    let (get_matches, skip): (MfGetMatchesFn, MfSkipFn) = if !p.bt_mode {
        if p.num_hash_bytes <= 4 {
            (hc4_get_matches, hc4_skip)
        } else {
            (hc5_get_matches, hc5_skip)
        }
    } else if p.num_hash_bytes == 2 {
        (bt2_get_matches, bt2_skip)
    } else if p.num_hash_bytes == 3 {
        (bt3_get_matches, bt3_skip)
    } else if p.num_hash_bytes == 4 {
        // default setting
        (bt4_get_matches, bt4_skip)
    } else {
        (bt5_get_matches, bt5_skip)
    };
    Mf2 {
        init: MatchFinder::init,
        get_num_available_bytes: num_available_bytes,
        get_pointer_to_current_pos: current_pos_slice,
        get_matches,
        skip,
    }
}

/// Select the AOCL-optimized routines where they exist
/// (`numHashBytes = 4, 5`, the defaults by level) and the reference ones
/// elsewhere.
///
/// Equivalent to `AOCL_MatchFinder_CreateVTable`.
pub fn aocl_create_vtable(p: &MatchFinder) -> Mf2 {
    let (get_matches, skip): (MfGetMatchesFn, MfSkipFn) = if !p.bt_mode {
        if !p.cache_efficient_search {
            if p.num_hash_bytes <= 4 {
                (hc4_get_matches_opt, hc4_skip_opt)
            } else {
                (hc5_get_matches_opt, hc5_skip_opt)
            }
        } else if p.num_hash_bytes <= 4 {
            if p.level < HASH_CHAIN_16_LEVEL {
                (hc4_get_matches_cehc8 as MfGetMatchesFn, hc4_skip_cehc8 as MfSkipFn)
            } else {
                (hc4_get_matches_cehc16, hc4_skip_cehc16)
            }
        } else if p.level < HASH_CHAIN_16_LEVEL {
            (hc5_get_matches_cehc8, hc5_skip_cehc8)
        } else {
            (hc5_get_matches_cehc16, hc5_skip_cehc16)
        }
    } else if p.num_hash_bytes == 2 {
        (bt2_get_matches, bt2_skip)
    } else if p.num_hash_bytes == 3 {
        (bt3_get_matches, bt3_skip)
    } else if p.num_hash_bytes == 4 {
        // default setting
        (bt4_get_matches_opt, bt4_skip_opt)
    } else {
        (bt5_get_matches, bt5_skip)
    };
    Mf2 {
        init: MatchFinder::init_opt,
        get_num_available_bytes: num_available_bytes,
        get_pointer_to_current_pos: current_pos_slice,
        get_matches,
        skip,
    }
}
