use crate::flds::Flds;
use crate::grid::Grid3;
use crate::prtls::Plasma;
use crate::shape::{weights5, weights5_shifted};
use crate::vec3::Vec3;
use crate::{Float, Sim};

/// The field-particle coupling core. Owns the current-density grid
/// and the cell-centered copies of E and B for the whole lifetime of
/// a run; all three share the extents of the field arrays.
pub struct Solver {
    pub j: Grid3,  // deposited current, staggered like E
    pub ec: Grid3, // cell-centered E, rebuilt once per step
    pub bc: Grid3, // cell-centered B, rebuilt once per step
}

impl Solver {
    pub fn new(sim: &Sim) -> Solver {
        Solver {
            j: Grid3::new(sim.size_x, sim.size_y, sim.size_z),
            ec: Grid3::new(sim.size_x, sim.size_y, sim.size_z),
            bc: Grid3::new(sim.size_x, sim.size_y, sim.size_z),
        }
    }

    pub fn clear_j(&mut self) {
        self.j.clear();
    }

    /// Average the staggered E and B onto cell centers so the pusher
    /// can sample both fields at one location. E components need the
    /// 2 samples straddling the center along their own axis, B
    /// components the 4 samples around their face axis. Pure
    /// grid-to-grid transform; ghost layers are assumed current.
    pub fn calc_on_center(&mut self, flds: &Flds) {
        let (lx, ly, lz) = self.ec.dims();
        let e = &flds.e;
        let b = &flds.b;
        for i in 0..lx - 1 {
            for j in 0..ly - 1 {
                for k in 0..lz - 1 {
                    let ec = &mut self.ec[(i, j, k)];
                    ec.x = 0.5 * (e[(i, j, k)].x + e[(i + 1, j, k)].x);
                    ec.y = 0.5 * (e[(i, j, k)].y + e[(i, j + 1, k)].y);
                    ec.z = 0.5 * (e[(i, j, k)].z + e[(i, j, k + 1)].z);

                    let bc = &mut self.bc[(i, j, k)];
                    bc.x = 0.25
                        * (b[(i, j, k)].x
                            + b[(i, j + 1, k)].x
                            + b[(i, j, k + 1)].x
                            + b[(i, j + 1, k + 1)].x);
                    bc.y = 0.25
                        * (b[(i, j, k)].y
                            + b[(i + 1, j, k)].y
                            + b[(i, j, k + 1)].y
                            + b[(i + 1, j, k + 1)].y);
                    bc.z = 0.25
                        * (b[(i, j, k)].z
                            + b[(i + 1, j, k)].z
                            + b[(i, j + 1, k)].z
                            + b[(i + 1, j + 1, k)].z);
                }
            }
        }
    }

    /// Esirkepov density decomposition: turn each particle's motion
    /// over one step into current on the grid such that the discrete
    /// continuity equation holds exactly, cell by cell. No divergence
    /// cleaning needed afterwards.
    pub fn density_decomposition(&mut self, plasma: &Plasma) {
        const W1_3: Float = 1.0 / 3.0;
        let q = plasma.charge;

        // old-position weights, and the weight change from the move
        let mut s0 = [[0.0 as Float; 5]; 3];
        let mut ds = [[0.0 as Float; 5]; 3];
        // per-offset flux weights, one per axis. Only the active
        // index range is written and read each particle, so no
        // clearing between particles.
        let mut w = [[[[0.0 as Float; 3]; 5]; 5]; 5];

        for p in plasma.prtls.iter() {
            let r0 = p.r;
            let r1 = p.r + p.v;

            let ishift = r1.x as usize as isize - r0.x as usize as isize;
            let jshift = r1.y as usize as isize - r0.y as usize as isize;
            let kshift = r1.z as usize as isize - r0.z as usize as isize;

            if !cfg!(feature = "unchecked") {
                // one cell per step per axis is the CFL-type contract
                // of the scheme; a bigger jump means the caller's
                // timestep is too large and the deposit would be
                // silently wrong.
                assert!(ishift.abs() <= 1, "prtl crossed >1 cell in x");
                assert!(jshift.abs() <= 1, "prtl crossed >1 cell in y");
                assert!(kshift.abs() <= 1, "prtl crossed >1 cell in z");
                // stencil base is floor(r0) - 2 per axis
                assert!(r0.x >= 2.0 && r0.y >= 2.0 && r0.z >= 2.0);
            }

            weights5(&mut s0[0], r0.x);
            weights5(&mut s0[1], r0.y);
            weights5(&mut s0[2], r0.z);

            // new-position weights expressed in the old index frame,
            // minus the old weights
            weights5_shifted(&mut ds[0], r1.x, ishift);
            weights5_shifted(&mut ds[1], r1.y, jshift);
            weights5_shifted(&mut ds[2], r1.z, kshift);
            for axis in 0..3 {
                for i in 0..5 {
                    ds[axis][i] -= s0[axis][i];
                }
            }

            // minimal span covering both supports: 3 cells if the
            // particle stayed in its cell, 4 biased toward the shift
            let imin = if ishift < 0 { 0 } else { 1 };
            let imax = if ishift > 0 { 4 } else { 3 };
            let jmin = if jshift < 0 { 0 } else { 1 };
            let jmax = if jshift > 0 { 4 } else { 3 };
            let kmin = if kshift < 0 { 0 } else { 1 };
            let kmax = if kshift > 0 { 4 } else { 3 };

            for i in imin..=imax {
                for j in jmin..=jmax {
                    for k in kmin..=kmax {
                        w[i][j][k][0] = ds[0][i]
                            * (s0[1][j] * s0[2][k]
                                + 0.5 * ds[1][j] * s0[2][k]
                                + 0.5 * s0[1][j] * ds[2][k]
                                + W1_3 * ds[1][j] * ds[2][k]);
                        w[i][j][k][1] = ds[1][j]
                            * (s0[0][i] * s0[2][k]
                                + 0.5 * ds[0][i] * s0[2][k]
                                + 0.5 * s0[0][i] * ds[2][k]
                                + W1_3 * ds[0][i] * ds[2][k]);
                        w[i][j][k][2] = ds[2][k]
                            * (s0[0][i] * s0[1][j]
                                + 0.5 * ds[0][i] * s0[1][j]
                                + 0.5 * s0[0][i] * ds[1][j]
                                + W1_3 * ds[0][i] * ds[1][j]);
                    }
                }
            }

            // One particle's current, accumulated by the running sum
            // that *is* the discretized continuity equation: the
            // current leaving a cell face equals the current entering
            // it minus q times the flux weight there, taken in
            // increasing index order along each axis. Fresh zeroed
            // scratch per particle, 6 wide to hold the 5-tap support
            // plus the half-cell stagger.
            let mut j0 = [[[Vec3::ZERO; 6]; 6]; 6];
            for i in imin..=imax {
                for j in jmin..=jmax {
                    for k in kmin..=kmax {
                        j0[i + 1][j][k].x = j0[i][j][k].x - q * w[i][j][k][0];
                        j0[i][j + 1][k].y = j0[i][j][k].y - q * w[i][j][k][1];
                        j0[i][j][k + 1].z = j0[i][j][k].z - q * w[i][j][k][2];
                    }
                }
            }

            // Scatter into the global array. Each component lands a
            // half cell up its own axis (stored at +1), matching the
            // E staggering.
            let ii = r0.x as usize - 2;
            let jj = r0.y as usize - 2;
            let kk = r0.z as usize - 2;
            for i in imin..=imax {
                for j in jmin..=jmax {
                    for k in kmin..=kmax {
                        self.j[(ii + i + 1, jj + j, kk + k)].x += j0[i + 1][j][k].x;
                        self.j[(ii + i, jj + j + 1, kk + k)].y += j0[i][j + 1][k].y;
                        self.j[(ii + i, jj + j, kk + k + 1)].z += j0[i][j][k + 1].z;
                    }
                }
            }
        }
    }

    /// Fold the deposited current into E over the interior. The rest
    /// of the Maxwell update (curl terms, ghost exchange) lives with
    /// the field solver.
    pub fn update_e_by_j(&self, sim: &Sim, flds: &mut Flds) {
        for i in sim.delta..sim.size_x - sim.delta {
            for j in sim.delta..sim.size_y - sim.delta {
                for k in sim.delta..sim.size_z - sim.delta {
                    flds.e[(i, j, k)] -= self.j[(i, j, k)];
                }
            }
        }
    }
}
