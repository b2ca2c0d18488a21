//! Global coordinate helpers.

use crate::chunk::CHUNK_SIZE;

const SIDE: i64 = CHUNK_SIZE as i64;

/// Splits one global axis value into its chunk index and local offset.
///
/// Uses floor division and true modulo, so negative values map to the
/// chunk below with a non-negative local offset: `-1` is local 63 of
/// chunk -1.
pub fn split_axis(v: i64) -> (i64, usize) {
    (v.div_euclid(SIDE), v.rem_euclid(SIDE) as usize)
}

/// Maps a global point to its owning chunk coordinate and local offsets.
pub fn chunk_and_local(x: i64, y: i64) -> ((i64, i64), (usize, usize)) {
    let (cx, lx) = split_axis(x);
    let (cy, ly) = split_axis(y);
    ((cx, cy), (lx, ly))
}

/// Maps an arbitrary point into the rectangle `[0, w) x [0, h)`.
///
/// True mathematical modulo: the result is never negative, for any
/// input sign.
pub fn wrap_point((x, y): (i64, i64), (w, h): (u64, u64)) -> (u64, u64) {
    (
        x.rem_euclid(w as i64) as u64,
        y.rem_euclid(h as i64) as u64,
    )
}

#[cfg(test)]
mod tests {
    use super::{chunk_and_local, split_axis, wrap_point, SIDE};

    #[test]
    fn split_axis_is_floor_division() {
        assert_eq!(split_axis(0), (0, 0));
        assert_eq!(split_axis(63), (0, 63));
        assert_eq!(split_axis(64), (1, 0));
        assert_eq!(split_axis(-1), (-1, 63));
        assert_eq!(split_axis(-64), (-1, 0));
        assert_eq!(split_axis(-65), (-2, 63));
    }

    #[test]
    fn chunk_and_local_round_trips() {
        for &v in &[-130, -64, -1, 0, 1, 63, 64, 200] {
            let ((cx, _), (lx, _)) = chunk_and_local(v, 0);
            assert_eq!(cx * SIDE + lx as i64, v);
        }
    }

    #[test]
    fn negative_wrap() {
        assert_eq!(wrap_point((-2, -6), (5, 5)), (3, 4));
    }

    #[test]
    fn positive_wrap() {
        assert_eq!(wrap_point((5, 15), (5, 5)), (0, 0));
    }
}
