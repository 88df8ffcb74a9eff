use crate::vec3::Vec3;

/// A dense 3-D array of Vec3 backed by one contiguous allocation.
/// Using a 1d vec to represent the 3D array for speed; x is the
/// slowest-varying index and z the fastest, so `(ix, iy, iz)` maps to
/// `(ix * size_y + iy) * size_z + iz`, the same layout a nested
/// `[ix][iy][iz]` array would have.
///
/// Every element is zeroed at construction. If the allocation cannot
/// be satisfied the process aborts; a simulation with no grid cannot
/// limp along, so there is deliberately no recovery path.
pub struct Grid3 {
    data: Vec<Vec3>,
    size_x: usize,
    size_y: usize,
    size_z: usize,
}

impl Grid3 {
    pub fn new(size_x: usize, size_y: usize, size_z: usize) -> Grid3 {
        Grid3 {
            data: vec![Vec3::ZERO; size_x * size_y * size_z],
            size_x,
            size_y,
            size_z,
        }
    }

    #[inline(always)]
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.size_x, self.size_y, self.size_z)
    }

    #[inline(always)]
    fn get_index(&self, ix: usize, iy: usize, iz: usize) -> usize {
        if !cfg!(feature = "unchecked") {
            assert!(ix < self.size_x);
            assert!(iy < self.size_y);
            assert!(iz < self.size_z);
        }
        (ix * self.size_y + iy) * self.size_z + iz
    }

    /// Zero every element. One pass over the flat storage.
    pub fn clear(&mut self) {
        for v in self.data.iter_mut() {
            v.zero();
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vec3> {
        self.data.iter()
    }

    /// # Safety
    /// The caller must have checked `ix < size_x`, `iy < size_y` and
    /// `iz < size_z`, typically by asserting the worst-case index of a
    /// stencil loop before entering it.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, ix: usize, iy: usize, iz: usize) -> &Vec3 {
        self.data
            .get_unchecked((ix * self.size_y + iy) * self.size_z + iz)
    }
}

impl std::ops::Index<(usize, usize, usize)> for Grid3 {
    type Output = Vec3;
    #[inline(always)]
    fn index(&self, (ix, iy, iz): (usize, usize, usize)) -> &Vec3 {
        &self.data[self.get_index(ix, iy, iz)]
    }
}

impl std::ops::IndexMut<(usize, usize, usize)> for Grid3 {
    #[inline(always)]
    fn index_mut(&mut self, (ix, iy, iz): (usize, usize, usize)) -> &mut Vec3 {
        let ind = self.get_index(ix, iy, iz);
        &mut self.data[ind]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3::Vec3;

    #[test]
    fn zero_initialized() {
        let g = Grid3::new(4, 5, 6);
        assert_eq!(g.dims(), (4, 5, 6));
        assert!(g.iter().all(|v| *v == Vec3::ZERO));
    }

    #[test]
    fn round_trip_interior_and_boundary() {
        let mut g = Grid3::new(8, 6, 7);
        let val = Vec3::new(1.0, -2.0, 3.0);
        // an interior index, the origin corner and the far corner
        for &ind in &[(3, 4, 5), (0, 0, 0), (7, 5, 6)] {
            g[ind] = val;
            assert_eq!(g[ind], val);
        }
        g.clear();
        assert!(g.iter().all(|v| *v == Vec3::ZERO));
    }

    #[test]
    fn distinct_indices_do_not_alias() {
        let mut g = Grid3::new(3, 3, 3);
        g[(1, 2, 0)] = Vec3::new(1.0, 0.0, 0.0);
        g[(2, 0, 1)] = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(g[(1, 2, 0)], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(g[(2, 0, 1)], Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(g[(0, 1, 2)], Vec3::ZERO);
    }

    #[test]
    #[should_panic]
    fn out_of_range_index_panics() {
        let g = Grid3::new(3, 3, 3);
        let _ = g[(3, 0, 0)];
    }
}
