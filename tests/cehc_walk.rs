//! Cache-efficient chain-walk scenarios.
//!
//! Ports the `LZMA_hcGetMatchesSpecLzFind` suite: one chain block is
//! populated with segment start positions, then walked against a cursor
//! string; the emitted `(len, dist - 1)` pairs must line up with the
//! expected matches, newest first, strictly increasing in length.

use lzfind::find::cehc::{
    cehc_get_matches_spec, chain_get_head, chain_insert, circ_dec_head, circ_inc_head,
    HASH_CHAIN_MAX_16, HASH_CHAIN_MAX_8, HASH_CHAIN_SLOT_SZ_16, HASH_CHAIN_SLOT_SZ_8,
};

const MIN_MATCH_LEN: u32 = 3;
const CUT_VALUE: u32 = 32;

struct WalkFixture {
    son: Vec<u32>,
    inp: Vec<u8>,
    slot_sz: usize,
    // (expected len, segment start) in expected emission order
    expected: Vec<(u32, u32)>,
}

impl WalkFixture {
    fn new(slot_sz: usize) -> Self {
        WalkFixture {
            son: vec![0; slot_sz],
            inp: Vec::new(),
            slot_sz,
            expected: Vec::new(),
        }
    }

    fn with_head(slot_sz: usize, head: u32) -> Self {
        let mut f = Self::new(slot_sz);
        f.son[0] = head;
        f
    }

    // Insert the segment start into the chain, then append the bytes.
    fn add_inp(&mut self, s: &str) {
        let val = self.inp.len() as u32;
        let head = chain_get_head(&self.son, 0, self.slot_sz);
        chain_insert(&mut self.son, 0, head, val, self.slot_sz, self.slot_sz - 1);
        self.inp.extend_from_slice(s.as_bytes());
    }

    // Same, but this segment is expected to be reported as a match.
    fn add_match(&mut self, s: &str) {
        let start = self.inp.len() as u32;
        self.expected.push((s.len() as u32, start));
        self.add_inp(s);
    }

    fn run(mut self, curstr: &str, len_limit: u32) {
        // matches must share at least MIN_MATCH_LEN bytes with the cursor
        for &(len, start) in &self.expected {
            assert!(len >= MIN_MATCH_LEN);
            let s = start as usize;
            assert_eq!(&self.inp[s..s + 3], &curstr.as_bytes()[..3]);
        }

        self.inp.extend_from_slice(curstr.as_bytes());
        let cur = self.inp.len() - curstr.len();
        let pos = cur as u32;

        // emission is newest-first, so ascending expected lengths
        let mut expected: Vec<(u32, u32)> = self
            .expected
            .iter()
            .map(|&(len, start)| (len.min(len_limit), pos - start - 1))
            .collect();
        expected.sort();

        let head = chain_get_head(&self.son, 0, self.slot_sz);
        let mut d = vec![0u32; 2 * CUT_VALUE as usize];
        let dn = if self.slot_sz == HASH_CHAIN_SLOT_SZ_8 {
            cehc_get_matches_spec::<HASH_CHAIN_SLOT_SZ_8>(
                len_limit,
                head,
                0,
                pos,
                &self.inp,
                cur,
                &mut self.son,
                u32::MAX,
                CUT_VALUE,
                &mut d,
                MIN_MATCH_LEN,
            )
        } else {
            cehc_get_matches_spec::<HASH_CHAIN_SLOT_SZ_16>(
                len_limit,
                head,
                0,
                pos,
                &self.inp,
                cur,
                &mut self.son,
                u32::MAX,
                CUT_VALUE,
                &mut d,
                MIN_MATCH_LEN,
            )
        };
        let got: Vec<(u32, u32)> = d[..dn].chunks(2).map(|c| (c[0], c[1])).collect();
        assert_eq!(got, expected);

        // the walk always ends by inserting pos at a fresh head
        let new_head = chain_get_head(&self.son, 0, self.slot_sz);
        assert_eq!(self.son[new_head], pos);
        assert_eq!(
            circ_inc_head(new_head, self.slot_sz, self.slot_sz - 1),
            head,
            "insertion decrements the head circularly"
        );
    }
}

#[test]
fn block8_longer_matches_down_the_chain() {
    let mut f = WalkFixture::new(HASH_CHAIN_SLOT_SZ_8);
    f.add_inp("qwertyabcd");
    f.add_inp("qwertyabced ");
    f.add_inp("qwerty ");
    f.add_match("qwertyabcd");
    f.add_match("qwertyab");
    f.add_inp("qwerty ");
    f.add_match("qwerty");
    f.run("qwertyabcd", 10);
}

#[test]
fn block8_longest_match_at_closest_offset() {
    // shorter matches at further offsets are not reported once the
    // nearest node already gives the full length
    let mut f = WalkFixture::new(HASH_CHAIN_SLOT_SZ_8);
    f.add_inp("qwertyabc");
    f.add_inp("qwertyabced ");
    f.add_inp("qwertyabc ");
    f.add_inp("qwertyab ");
    f.add_inp("qwertya ");
    f.add_inp("qwerty ");
    f.add_match("qwertyabcd");
    f.run("qwertyabcd", 10);
}

#[test]
fn block8_u16_precheck_skips_single_byte_improvement() {
    // After "qwertyabc" raises max_len to 9, the older "qwertyabcd"
    // candidate would only add one byte; the two-byte probe at check_len
    // rejects it.  (When max_len == len_limit - 1 the probe shifts back
    // one byte and such a match stays possible; this layout keeps
    // max_len != len_limit - 1 at that node.)
    let mut f = WalkFixture::new(HASH_CHAIN_SLOT_SZ_8);
    f.add_inp("qwertyabcd");
    f.add_inp("qwertyabced ");
    f.add_inp("qwerty ");
    f.add_inp("qwertyabcd"); // 1-byte improvement only: not reported
    f.add_match("qwertyabc");
    f.add_inp("qwerty ");
    f.add_match("qwertya");
    f.run("qwertyabcde", 11);
}

#[test]
fn block8_head_at_slot_4() {
    let mut f = WalkFixture::with_head(HASH_CHAIN_SLOT_SZ_8, 4);
    f.add_inp("qwertyabef");
    f.add_inp("qwertyabc7987");
    f.add_inp("qwerty ");
    f.add_inp("qwerty ");
    f.add_match("qwertyab");
    f.add_inp("qwer7645783");
    f.add_match("qwerty");
    f.run("qwertyabcd", 10);
}

#[test]
fn block8_head_at_slot_1() {
    let mut f = WalkFixture::with_head(HASH_CHAIN_SLOT_SZ_8, 1);
    f.add_inp("qwerty ");
    f.add_inp("qwerty#$%$%");
    f.add_inp("qwertyabe");
    f.add_match("qwertyabc");
    f.add_inp("qwe:&*89");
    f.add_inp("qwer76987");
    f.add_match("qwerty");
    f.run("qwertyabcd", 10);
}

#[test]
fn block8_match_longer_than_len_limit_is_clamped() {
    // actual match is 10 bytes; the walk reports len_limit and stops
    let mut f = WalkFixture::new(HASH_CHAIN_SLOT_SZ_8);
    f.add_inp("qwertyabc");
    f.add_inp("qwertyabced ");
    f.add_inp("qwertyabc ");
    f.add_inp("qwertyab ");
    f.add_inp("qwertya ");
    f.add_inp("qwerty ");
    f.add_match("qwertyabcd");
    f.run("qwertyabcd", 6);
}

#[test]
fn block16_full_chain() {
    let mut f = WalkFixture::new(HASH_CHAIN_SLOT_SZ_16);
    f.add_inp("qwert7987");
    f.add_inp("qwert^&&*");
    f.add_inp("qwertFGGHJ");
    f.add_inp("qwertsdad");
    f.add_inp("qwert");
    f.add_inp("qwert");
    f.add_inp("qwert");
    f.add_match("qwertyabcd");
    f.add_inp("qwerty123");
    f.add_inp("qwertyabced ");
    f.add_inp("qwertywe");
    f.add_inp("qwerty ");
    f.add_match("qwertyab");
    f.add_inp("asdfg");
    f.add_match("qwerty");
    f.run("qwertyabcd", 10);
}

#[test]
fn block16_partially_full_chain() {
    let mut f = WalkFixture::with_head(HASH_CHAIN_SLOT_SZ_16, 9);
    f.add_inp("qwert");
    f.add_match("qwertyabcd");
    f.add_inp("qwerty123");
    f.add_inp("qwertyabced ");
    f.add_inp("qwertywe");
    f.add_inp("qwerty ");
    f.add_match("qwertyab");
    f.add_inp("asdfg");
    f.add_match("qwerty");
    f.run("qwertyabcd", 10);
}

#[test]
fn circular_increment_sequence_block8() {
    let mut cur = 1usize;
    let mut seq = Vec::new();
    for _ in 0..7 {
        cur = circ_inc_head(cur, HASH_CHAIN_SLOT_SZ_8, HASH_CHAIN_MAX_8);
        seq.push(cur as u32);
    }
    assert_eq!(seq, [2, 3, 4, 5, 6, 7, 1]);
}

#[test]
fn circular_decrement_sequence_block16() {
    let mut cur = 1usize;
    let mut seq = Vec::new();
    for _ in 0..15 {
        cur = circ_dec_head(cur, HASH_CHAIN_SLOT_SZ_16, HASH_CHAIN_MAX_16);
        seq.push(cur as u32);
    }
    assert_eq!(seq, [15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1]);
}
