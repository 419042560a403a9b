//! Square matrices backing the Floyd-Warshall kernels.
//!
//! [`SquareMatrix`] is a flat row-major `n x n` buffer. For the parallel
//! kernel, [`bands_mut`](SquareMatrix::bands_mut) carves the buffer into
//! disjoint mutable row bands -- one per worker -- so each worker owns its
//! rows exclusively while the matrix as a whole stays the only shared state.

/// Row-major `n x n` matrix.
#[derive(Clone, Debug)]
pub struct SquareMatrix<T> {
    n: usize,
    data: Vec<T>,
}

impl<T: Copy> SquareMatrix<T> {
    /// A matrix with every cell set to `fill`.
    pub fn new(n: usize, fill: T) -> Self {
        Self {
            n,
            data: vec![fill; n * n],
        }
    }

    /// Side length.
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[i * self.n + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        self.data[i * self.n + j] = value;
    }

    /// Split the matrix into disjoint mutable row bands.
    ///
    /// `bands` must be contiguous `(idx, start_row, end_row)` ranges covering
    /// `0..n` in order (the shape produced by
    /// [`split_ranges`](crate::utils::split_ranges)). Each returned slice
    /// holds rows `start..end` of one band, `(end - start) * n` cells long.
    pub fn bands_mut(&mut self, bands: &[(usize, usize, usize)]) -> Vec<&mut [T]> {
        let n = self.n;
        let mut out = Vec::with_capacity(bands.len());
        let mut rest = self.data.as_mut_slice();
        let mut covered = 0usize;
        for &(_, start, end) in bands {
            assert_eq!(start, covered, "bands must be contiguous from row 0");
            let (band, tail) = rest.split_at_mut((end - start) * n);
            out.push(band);
            rest = tail;
            covered = end;
        }
        assert_eq!(covered, n, "bands must cover every row");
        out
    }
}
