//! CRC-seeded prefix hash functions and fixed-table sizing.
//!
//! Translated from LzHash.h and LzFind.c lines 77–133:
//!   - `kHash2Size` / `kHash3Size` / `kFix3HashSize` / `kFix4HashSize` /
//!     `kFix5HashSize`, `kLzHash_CrcShift_1/2`
//!   - `HASH2_CALC`       → [`hash2_calc`]
//!   - `HASH3_CALC`       → [`hash3_calc`]
//!   - `HASH4_CALC`       → [`hash4_calc`]
//!   - `HASH5_CALC`       → [`hash5_calc`]
//!   - `AOCL_HASH4_CALC`  → [`hash4_calc_nofix3`]
//!   - `AOCL_HASH5_CALC`  → [`hash5_calc_nofix3`]

use super::types::get_u16;

// ─────────────────────────────────────────────────────────────────────────────
// Fixed-table geometry (LzHash.h)
// ─────────────────────────────────────────────────────────────────────────────

/// Entries in the 2-byte-prefix fixed table.
pub const K_HASH2_SIZE: u32 = 1 << 10;
/// Entries in the 3-byte-prefix fixed table.
pub const K_HASH3_SIZE: u32 = 1 << 16;

/// Offset of the head table when only the 2-byte fixed table precedes it.
pub const K_FIX3_HASH_SIZE: u32 = K_HASH2_SIZE;
/// Offset of the head table behind the 2-byte and 3-byte fixed tables.
pub const K_FIX4_HASH_SIZE: u32 = K_HASH2_SIZE + K_HASH3_SIZE;
/// The 5-byte configuration keeps the 4-byte fixed-table layout.
pub const K_FIX5_HASH_SIZE: u32 = K_FIX4_HASH_SIZE;

pub const K_LZ_HASH_CRC_SHIFT_1: u32 = 5;
pub const K_LZ_HASH_CRC_SHIFT_2: u32 = 10;

// ─────────────────────────────────────────────────────────────────────────────
// Hash calculations (LzFind.c:84-133)
//
// Collision guarantees, assuming hashMask >= (1 << 16) - 1:
//   h2 match                          => cur[0], cur[1] match is NOT implied;
//                                        but cur[0] match + h2 match => cur[1]
//                                        match (crc low byte is a bijection)
//   cur[0] match + hv(H3) match       => cur[1], cur[2] match
//   hv(H4) or hv(H5) match            => cur[1], cur[2] match
// The match enumerators rely on these to skip byte comparisons.
// ─────────────────────────────────────────────────────────────────────────────

/// 2-byte hash: the raw little-endian 16-bit value at the cursor.
///
/// Equivalent to `HASH2_CALC`.  If two positions agree on the value, both
/// prefix bytes agree.
#[inline(always)]
pub fn hash2_calc(cur: &[u8]) -> u32 {
    get_u16(cur, 0)
}

/// 3-byte hash; returns `(h2, hv)`.
///
/// Equivalent to `HASH3_CALC`.
#[inline(always)]
pub fn hash3_calc(crc: &[u32; 256], cur: &[u8], hash_mask: u32) -> (u32, u32) {
    let temp = crc[cur[0] as usize] ^ cur[1] as u32;
    let h2 = temp & (K_HASH2_SIZE - 1);
    let hv = (temp ^ ((cur[2] as u32) << 8)) & hash_mask;
    (h2, hv)
}

/// 4-byte hash; returns `(h2, h3, hv)`.
///
/// Equivalent to `HASH4_CALC`.
#[inline(always)]
pub fn hash4_calc(crc: &[u32; 256], cur: &[u8], hash_mask: u32) -> (u32, u32, u32) {
    let mut temp = crc[cur[0] as usize] ^ cur[1] as u32;
    let h2 = temp & (K_HASH2_SIZE - 1);
    temp ^= (cur[2] as u32) << 8;
    let h3 = temp & (K_HASH3_SIZE - 1);
    let hv = (temp ^ (crc[cur[3] as usize] << K_LZ_HASH_CRC_SHIFT_1)) & hash_mask;
    (h2, h3, hv)
}

/// 5-byte hash; returns `(h2, h3, hv)`.
///
/// Equivalent to `HASH5_CALC`.
#[inline(always)]
pub fn hash5_calc(crc: &[u32; 256], cur: &[u8], hash_mask: u32) -> (u32, u32, u32) {
    let mut temp = crc[cur[0] as usize] ^ cur[1] as u32;
    let h2 = temp & (K_HASH2_SIZE - 1);
    temp ^= (cur[2] as u32) << 8;
    let h3 = temp & (K_HASH3_SIZE - 1);
    temp ^= crc[cur[3] as usize] << K_LZ_HASH_CRC_SHIFT_1;
    let hv = (temp ^ (crc[cur[4] as usize] << K_LZ_HASH_CRC_SHIFT_2)) & hash_mask;
    (h2, h3, hv)
}

/// 4-byte hash without the 3-byte fixed table; returns `(h2, hv)`.
///
/// Equivalent to `AOCL_HASH4_CALC` (change wrt `HASH4_CALC`: h3 not
/// computed).
#[inline(always)]
pub fn hash4_calc_nofix3(crc: &[u32; 256], cur: &[u8], hash_mask: u32) -> (u32, u32) {
    let mut temp = crc[cur[0] as usize] ^ cur[1] as u32;
    let h2 = temp & (K_HASH2_SIZE - 1);
    temp ^= (cur[2] as u32) << 8;
    let hv = (temp ^ (crc[cur[3] as usize] << K_LZ_HASH_CRC_SHIFT_1)) & hash_mask;
    (h2, hv)
}

/// 5-byte hash without the 3-byte fixed table; returns `(h2, hv)`.
///
/// Equivalent to `AOCL_HASH5_CALC`.
#[inline(always)]
pub fn hash5_calc_nofix3(crc: &[u32; 256], cur: &[u8], hash_mask: u32) -> (u32, u32) {
    let mut temp = crc[cur[0] as usize] ^ cur[1] as u32;
    let h2 = temp & (K_HASH2_SIZE - 1);
    temp ^= (cur[2] as u32) << 8;
    temp ^= crc[cur[3] as usize] << K_LZ_HASH_CRC_SHIFT_1;
    let hv = (temp ^ (crc[cur[4] as usize] << K_LZ_HASH_CRC_SHIFT_2)) & hash_mask;
    (h2, hv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::find::MatchFinder;

    #[test]
    fn h5_and_h4_share_intermediate() {
        // H5 extends H4's pre-mask value; with the same mask they may
        // differ only through the fifth byte's contribution.
        let p = MatchFinder::construct();
        let cur = [0x41u8, 0x42, 0x43, 0x44, 0x00];
        let mask = (1 << 20) - 1;
        let (h2a, _h3, hv4) = hash4_calc(&p.crc, &cur, mask);
        let (h2b, hv5) = hash5_calc_nofix3(&p.crc, &cur, mask);
        assert_eq!(h2a, h2b);
        assert_eq!(hv5, (hv4 ^ (p.crc[0] << K_LZ_HASH_CRC_SHIFT_2)) & mask);
    }

    #[test]
    fn nofix3_variants_agree_on_hv() {
        let p = MatchFinder::construct();
        let cur = [0x10u8, 0x55, 0x9A, 0xFE, 0x07];
        let mask = (1 << 21) - 1;
        let (_, _, hv4) = hash4_calc(&p.crc, &cur, mask);
        let (_, hv4n) = hash4_calc_nofix3(&p.crc, &cur, mask);
        assert_eq!(hv4, hv4n);
        let (_, _, hv5) = hash5_calc(&p.crc, &cur, mask);
        let (_, hv5n) = hash5_calc_nofix3(&p.crc, &cur, mask);
        assert_eq!(hv5, hv5n);
    }
}
