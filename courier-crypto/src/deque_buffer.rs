//! A growable byte buffer with cheap front extension.

use std::ops::Index;
use std::slice::SliceIndex;

/// Byte buffer that can grow at both ends.
///
/// The encrypted envelope is assembled back-to-front: the inner message is
/// written, encrypted in place, and only then does the `key_id || msg_key`
/// header go in front of it. Reserving headroom up front makes that prepend
/// a plain copy instead of a shift of the whole ciphertext.
#[derive(Clone, Debug)]
pub struct DequeBuffer {
    buf: Vec<u8>,
    head: usize,
}

impl DequeBuffer {
    /// Create with room for `back` bytes of data and `front` bytes of
    /// headroom before it.
    pub fn with_capacity(back: usize, front: usize) -> Self {
        let mut buf = Vec::with_capacity(front + back);
        buf.resize(front, 0);
        Self { buf, head: front }
    }

    /// Prepend `slice`, regrowing the headroom if it has run out.
    pub fn extend_front(&mut self, slice: &[u8]) {
        if slice.len() > self.head {
            let shortfall = slice.len() - self.head;
            let old_len = self.buf.len();
            self.buf.resize(old_len + shortfall, 0);
            self.buf.copy_within(self.head..old_len, self.head + shortfall);
            self.head += shortfall;
        }
        self.head -= slice.len();
        self.buf[self.head..self.head + slice.len()].copy_from_slice(slice);
    }

    /// Number of bytes in the buffer.
    pub fn len(&self) -> usize {
        self.buf.len() - self.head
    }

    /// True if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.head == self.buf.len()
    }
}

impl AsRef<[u8]> for DequeBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.buf[self.head..]
    }
}

impl AsMut<[u8]> for DequeBuffer {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.head..]
    }
}

impl<I: SliceIndex<[u8]>> Index<I> for DequeBuffer {
    type Output = I::Output;
    fn index(&self, i: I) -> &Self::Output {
        self.as_ref().index(i)
    }
}

impl Extend<u8> for DequeBuffer {
    fn extend<T: IntoIterator<Item = u8>>(&mut self, iter: T) {
        self.buf.extend(iter);
    }
}

impl<'a> Extend<&'a u8> for DequeBuffer {
    fn extend<T: IntoIterator<Item = &'a u8>>(&mut self, iter: T) {
        self.buf.extend(iter);
    }
}
