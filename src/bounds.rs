/// Generic axis-aligned bounding box for N-dimensional space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox<const D: usize> {
    pub min: [f64; D],
    pub max: [f64; D],
}

impl<const D: usize> BoundingBox<D> {
    pub fn new(min: [f64; D], max: [f64; D]) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every position, or the zero box at the origin
    /// when there are no positions.
    pub fn from_points<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = [f64; D]>,
    {
        let mut min = [f64::INFINITY; D];
        let mut max = [f64::NEG_INFINITY; D];
        let mut any = false;

        for p in positions {
            any = true;
            for i in 0..D {
                if p[i] < min[i] { min[i] = p[i]; }
                if p[i] > max[i] { max[i] = p[i]; }
            }
        }

        if !any {
            return Self::new([0.0; D], [0.0; D]);
        }
        Self { min, max }
    }

    /// Side length along `axis`.
    pub fn extent(&self, axis: usize) -> f64 {
        self.max[axis] - self.min[axis]
    }

    /// Length of the main diagonal.
    pub fn diagonal(&self) -> f64 {
        (0..D).map(|i| self.extent(i) * self.extent(i)).sum::<f64>().sqrt()
    }

    /// Whether `p` lies inside the box, boundary included.
    pub fn contains(&self, p: &[f64; D]) -> bool {
        (0..D).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }

    /// True if the box has zero size along at least one axis.
    pub fn is_degenerate(&self) -> bool {
        (0..D).any(|i| self.extent(i) == 0.0)
    }

    /// Finite corners with `min <= max` on every axis.
    pub fn is_valid(&self) -> bool {
        (0..D).all(|i| self.min[i].is_finite() && self.max[i].is_finite() && self.min[i] <= self.max[i])
    }
}
