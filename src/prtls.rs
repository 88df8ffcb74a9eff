use crate::shape::weights3;
use crate::solver::Solver;
use crate::vec3::Vec3;
use crate::{Float, Sim, PRTL_CHUNK_SIZE};
use rand::prelude::*;
use rand_distr::StandardNormal;
use rayon::prelude::*;

/// One macro-particle. Position is a continuous coordinate in
/// grid-cell units (one unit = one cell width), velocity an ordinary
/// 3-velocity in cells per timestep, not a momentum.
#[derive(Clone, Copy, Debug)]
pub struct Prtl {
    pub r: Vec3,
    pub v: Vec3,
}

/// A species: an ordered collection of particles sharing one charge
/// and one mass. The pusher mutates velocities, the position update
/// mutates positions; nothing here reorders the collection.
pub struct Plasma {
    pub prtls: Vec<Prtl>,
    pub charge: Float,
    pub mass: Float,
    pub vth: Float,
}

impl Plasma {
    pub fn new(sim: &Sim, charge: Float, mass: Float, vth: Float) -> Plasma {
        let mut plasma = Plasma {
            prtls: Vec::with_capacity(sim.prtl_num),
            charge,
            mass,
            vth,
        };
        plasma.initialize_positions(sim);
        plasma.initialize_velocities(sim);
        plasma
    }

    fn initialize_positions(&mut self, sim: &Sim) {
        // uniform loading: dens particles per interior cell, evenly
        // spaced along the cell diagonal
        for i in sim.delta..sim.size_x - sim.delta {
            for j in sim.delta..sim.size_y - sim.delta {
                for k in sim.delta..sim.size_z - sim.delta {
                    for n in 0..sim.dens as usize {
                        let r1 = (2 * n + 1) as Float / (2.0 * sim.dens as Float);
                        self.prtls.push(Prtl {
                            r: Vec3::new(i as Float + r1, j as Float + r1, k as Float + r1),
                            v: Vec3::ZERO,
                        });
                    }
                }
            }
        }
    }

    fn initialize_velocities(&mut self, sim: &Sim) {
        // Maxwellian with thermal spread vth * c per component
        let mut rng = thread_rng();
        for p in self.prtls.iter_mut() {
            p.v.x = rng.sample::<Float, _>(StandardNormal) * self.vth * sim.c;
            p.v.y = rng.sample::<Float, _>(StandardNormal) * self.vth * sim.c;
            p.v.z = rng.sample::<Float, _>(StandardNormal) * self.vth * sim.c;
        }
    }

    /// The position half of the leapfrog. Velocities are in cells per
    /// step, so this is a plain add; the deposition engine assumes
    /// exactly this displacement when it reconstructs the motion.
    pub fn update_position(&mut self) {
        for p in self.prtls.iter_mut() {
            p.r += p.v;
        }
    }

    /// Periodic wrap over the interior region on all three axes. A
    /// domain-decomposed run swaps this for the rank-to-rank exchange.
    pub fn apply_bc(&mut self, sim: &Sim) {
        let lo = sim.delta as Float;
        let span_x = (sim.size_x - 2 * sim.delta) as Float;
        let span_y = (sim.size_y - 2 * sim.delta) as Float;
        let span_z = (sim.size_z - 2 * sim.delta) as Float;
        for p in self.prtls.iter_mut() {
            if p.r.x < lo {
                p.r.x += span_x;
            } else if p.r.x >= lo + span_x {
                p.r.x -= span_x;
            }
            if p.r.y < lo {
                p.r.y += span_y;
            } else if p.r.y >= lo + span_y {
                p.r.y -= span_y;
            }
            if p.r.z < lo {
                p.r.z += span_z;
            } else if p.r.z >= lo + span_z {
                p.r.z -= span_z;
            }
        }
    }

    /// Relativistic Boris-Buneman velocity update under the centered
    /// fields. Reads ec/bc only and writes only per-particle state,
    /// so particles are pushed in parallel chunks.
    pub fn boris_push(&mut self, sim: &Sim, solver: &Solver) {
        let c = sim.c;
        let c2 = c * c;
        // half-step acceleration factor; dt is folded into the unit
        // system (velocities are per-step already)
        let hqm = 0.5 * self.charge / self.mass;

        let ec = &solver.ec;
        let bc = &solver.bc;
        let (nx, ny, nz) = ec.dims();
        if !cfg!(feature = "unchecked") {
            assert_eq!(ec.dims(), bc.dims());
        }

        self.prtls
            .par_chunks_mut(PRTL_CHUNK_SIZE)
            .for_each(|chunk| {
                let mut sx = [0.0 as Float; 3];
                let mut sy = [0.0 as Float; 3];
                let mut sz = [0.0 as Float; 3];
                for p in chunk.iter_mut() {
                    if !cfg!(feature = "unchecked") {
                        // keep the 27-point stencil inside the arrays
                        assert!(p.r.x >= 1.0 && p.r.y >= 1.0 && p.r.z >= 1.0);
                    }
                    weights3(&mut sx, p.r.x);
                    weights3(&mut sy, p.r.y);
                    weights3(&mut sz, p.r.z);

                    let ii = p.r.x as usize - 1;
                    let jj = p.r.y as usize - 1;
                    let kk = p.r.z as usize - 1;

                    if !cfg!(feature = "unchecked") {
                        assert!(ii + 2 < nx && jj + 2 < ny && kk + 2 < nz);
                    }

                    // gather E and B at the particle
                    let mut e = Vec3::ZERO;
                    let mut b = Vec3::ZERO;
                    for i in 0..3 {
                        for j in 0..3 {
                            for k in 0..3 {
                                let w = sx[i] * sy[j] * sz[k];
                                // safe because of the assertions above
                                unsafe {
                                    e += *ec.get_unchecked(ii + i, jj + j, kk + k) * w;
                                    b += *bc.get_unchecked(ii + i, jj + j, kk + k) * w;
                                }
                            }
                        }
                    }
                    e *= hqm;
                    b *= hqm;

                    // half electric kick on the proper velocity
                    let mut gamma = c / (c2 - p.v.mag2()).sqrt();
                    let mut u = p.v * gamma + e;

                    // magnetic rotation angle goes with proper time
                    gamma = c / (c2 + u.mag2()).sqrt();
                    b *= gamma;

                    // exact rotation, no first-order angle error
                    let boris = 2.0 / (1.0 + b.mag2());
                    let u_plus = (u + u.cross(b)) * boris;
                    u += u_plus.cross(b) + e;

                    // second half kick done; back to ordinary velocity
                    gamma = c / (c2 + u.mag2()).sqrt();
                    p.v = u * gamma;
                }
            });
    }
}
