//! リング演算
//!
//! プロジェクト一覧を環状に扱う。先頭と末尾は隣り合う。
//! 長さ0のリングは作れないので、剰余演算でゼロ除算は起きない。

use std::num::NonZeroUsize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ring {
    len: NonZeroUsize,
}

impl Ring {
    /// 長さ0なら None
    pub fn new(len: usize) -> Option<Self> {
        NonZeroUsize::new(len).map(|len| Self { len })
    }

    pub fn len(&self) -> usize {
        self.len.get()
    }

    /// 範囲外のインデックスを正規化
    pub fn wrap(&self, index: usize) -> usize {
        index % self.len()
    }

    pub fn next(&self, index: usize) -> usize {
        (self.wrap(index) + 1) % self.len()
    }

    pub fn prev(&self, index: usize) -> usize {
        (self.wrap(index) + self.len() - 1) % self.len()
    }

    /// `from` から `to` への符号付き最短距離
    ///
    /// 偶数長でちょうど半周のときは正の向き（+len/2）に揃える。
    pub fn distance(&self, from: usize, to: usize) -> isize {
        let len = self.len();
        let forward = (self.wrap(to) + len - self.wrap(from)) % len;
        if forward * 2 > len {
            forward as isize - len as isize
        } else {
            forward as isize
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ring_rejected() {
        assert!(Ring::new(0).is_none());
    }

    #[test]
    fn test_next_prev_wrap() {
        let ring = Ring::new(3).unwrap();
        assert_eq!(ring.next(2), 0);
        assert_eq!(ring.prev(0), 2);
        assert_eq!(ring.next(7), 2);
        assert_eq!(ring.prev(4), 0);
    }

    #[test]
    fn test_single_item_ring() {
        let ring = Ring::new(1).unwrap();
        assert_eq!(ring.next(0), 0);
        assert_eq!(ring.prev(0), 0);
        assert_eq!(ring.distance(0, 0), 0);
    }

    #[test]
    fn test_distance_odd_ring() {
        let ring = Ring::new(5).unwrap();
        let distances: Vec<isize> = (1..5).map(|i| ring.distance(0, i)).collect();
        assert_eq!(distances, vec![1, 2, -2, -1]);
    }

    #[test]
    fn test_distance_even_ring_tie_is_positive() {
        let ring = Ring::new(4).unwrap();
        assert_eq!(ring.distance(0, 2), 2);
        assert_eq!(ring.distance(2, 0), 2);
        assert_eq!(ring.distance(1, 3), 2);
        assert_eq!(ring.distance(3, 1), 2);
    }

    #[test]
    fn test_distance_is_antisymmetric_off_tie() {
        let ring = Ring::new(7).unwrap();
        for a in 0..7 {
            for b in 0..7 {
                assert_eq!(ring.distance(a, b), -ring.distance(b, a));
            }
        }
    }
}
