//! Input-window management: allocation, stream reads, and tail moves.
//!
//! Translated from LzFind.c lines 135–276 and 341–372:
//!   - `LzInWindow_Create2`       → [`MatchFinder::lz_in_window_create`]
//!   - `LzInWindow_Free`          → dropped `Vec` (RAII)
//!   - `MatchFinder_ReadBlock`    → [`MatchFinder::read_block`]
//!   - `MatchFinder_MoveBlock`    → [`MatchFinder::move_block`]
//!   - `MatchFinder_NeedMove`     → [`MatchFinder::need_move`]
//!   - `MatchFinder_ReadIfRequired` → [`MatchFinder::read_if_required`]
//!   - `GetBlockSize`             → [`MatchFinder::get_block_size`]

use std::io::ErrorKind;

use log::debug;

use super::types::{MatchFinder, K_BLOCK_MOVE_ALIGN, K_BLOCK_SIZE_ALIGN, K_BLOCK_SIZE_RESERVE_MIN};
use crate::error::LzFindError;

impl MatchFinder {
    /// Window size for a given history, with the reserve that keeps
    /// `move_block` rare.  Returns `None` when the sizing overflows 32-bit
    /// arithmetic or leaves less than `K_BLOCK_SIZE_RESERVE_MIN` headroom
    /// under 4 GiB (settings that would be slow are rejected).
    ///
    /// Equivalent to `GetBlockSize` (0 return → `None`).
    pub(crate) fn get_block_size(&self, history_size: u32) -> Option<u32> {
        let mut block_size = self.keep_size_before.wrapping_add(self.keep_size_after);

        // 32-bit overflow checks
        if self.keep_size_before < history_size || block_size < self.keep_size_before {
            return None;
        }

        let k_block_size_max = 0u32.wrapping_sub(K_BLOCK_SIZE_ALIGN);
        let rem = k_block_size_max - block_size;
        let reserve = (block_size >> (if block_size < (1 << 30) { 1 } else { 2 }))
            + (1 << 12)
            + K_BLOCK_MOVE_ALIGN as u32
            + K_BLOCK_SIZE_ALIGN;
        if block_size >= k_block_size_max || rem < K_BLOCK_SIZE_RESERVE_MIN {
            return None;
        }
        if reserve >= rem {
            block_size = k_block_size_max;
        } else {
            block_size += reserve;
            block_size &= !(K_BLOCK_SIZE_ALIGN - 1);
        }
        Some(block_size)
    }

    /// (Re)allocate the window buffer.  An existing allocation of the same
    /// size is kept.
    ///
    /// Equivalent to `LzInWindow_Create2`.
    pub(crate) fn lz_in_window_create(&mut self, block_size: u32) -> Result<(), LzFindError> {
        if block_size == 0 {
            return Err(LzFindError::WindowTooLarge);
        }
        if self.window.is_empty() || self.block_size != block_size {
            self.window = Vec::new();
            self.block_size = block_size;
            let mut buf = Vec::new();
            buf.try_reserve_exact(block_size as usize)
                .map_err(|_| LzFindError::Alloc)?;
            buf.resize(block_size as usize, 0);
            self.window = buf;
            debug!("window: allocated {} byte block", block_size);
        }
        Ok(())
    }

    /// Pull from the attached source until read-ahead exceeds
    /// `keep_size_after`, the stream ends, or a read fails.  Stream errors
    /// latch; later calls return immediately.
    ///
    /// Equivalent to `MatchFinder_ReadBlock`.
    pub(crate) fn read_block(&mut self) {
        if self.stream_end_was_reached || self.result.is_some() {
            return;
        }

        // We use the (stream_pos - pos) read-ahead count; stream_pos
        // wrapping below pos is allowed.
        loop {
            let dest = self.buf_pos + self.num_available_bytes() as usize;
            if dest >= self.block_size as usize {
                // need_move()/move_block() keep more than keep_size_after
                // free at the end of the block, so this branch is not
                // reached in the normal call order.
                return;
            }

            let stream = match self.stream.as_mut() {
                Some(s) => s,
                None => {
                    self.stream_end_was_reached = true;
                    return;
                }
            };
            match stream.read(&mut self.window[dest..]) {
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.result = Some(e);
                    return;
                }
                Ok(0) => {
                    self.stream_end_was_reached = true;
                    return;
                }
                Ok(n) => {
                    self.stream_pos = self.stream_pos.wrapping_add(n as u32);
                    if self.num_available_bytes() > self.keep_size_after {
                        return;
                    }
                    // we keep one byte more than requested by create();
                    // (avail >= keep_size_after) is the minimal required size
                }
            }
        }
        // on exit: result latched || stream end || avail > keep_size_after
    }

    /// Copy the live tail of the window to the base, 128-byte aligned,
    /// preserving the read-ahead count.
    ///
    /// Equivalent to `MatchFinder_MoveBlock`.
    pub fn move_block(&mut self) {
        let offset = self.buf_pos - self.keep_size_before as usize;
        let keep_before = (offset & (K_BLOCK_MOVE_ALIGN - 1)) + self.keep_size_before as usize;
        let src = offset & !(K_BLOCK_MOVE_ALIGN - 1);
        let len = keep_before + self.num_available_bytes() as usize;
        debug!("window: move_block src={} len={}", src, len);
        self.window.copy_within(src..src + len, 0);
        self.buf_pos = keep_before;
    }

    /// `true` when fewer than `keep_size_after` bytes remain between the
    /// cursor and the end of the window buffer.
    ///
    /// Equivalent to `MatchFinder_NeedMove`.
    pub fn need_move(&self) -> bool {
        if self.stream_end_was_reached || self.result.is_some() {
            return false;
        }
        (self.block_size as usize - self.buf_pos) <= self.keep_size_after as usize
    }

    /// Equivalent to `MatchFinder_ReadIfRequired`.
    pub fn read_if_required(&mut self) {
        if self.keep_size_after >= self.num_available_bytes() {
            self.read_block();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct FailingReader;
    impl io::Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::Other, "source broke"))
        }
    }

    #[test]
    fn stream_error_is_latched() {
        let mut p = MatchFinder::construct();
        p.set_stream(Box::new(FailingReader));
        p.create(1 << 16, 0, 16, 0).unwrap();
        p.init();
        assert!(p.stream_result().is_some());
        assert_eq!(p.num_available_bytes(), 0);
        // further reads are no-ops
        p.read_if_required();
        assert!(p.stream_result().is_some());
    }

    #[test]
    fn eof_sets_stream_end() {
        let mut p = MatchFinder::construct();
        // 10 bytes is below keep_size_after, so init's read loop runs to EOF
        p.set_stream(Box::new(io::Cursor::new(vec![7u8; 10])));
        p.create(1 << 16, 0, 16, 0).unwrap();
        p.init();
        assert!(p.stream_end_reached());
        assert_eq!(p.num_available_bytes(), 10);
    }
}
