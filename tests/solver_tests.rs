mod common;

use esirkepov_rs::flds::Flds;
use esirkepov_rs::prtls::{Plasma, Prtl};
use esirkepov_rs::shape::{weights5, weights5_shifted};
use esirkepov_rs::solver::Solver;
use esirkepov_rs::vec3::Vec3;
use esirkepov_rs::{Config, Float, Params, Setup, Sim};

const TOL: Float = 5e-6;

fn single_prtl(charge: Float, r: Vec3, v: Vec3) -> Plasma {
    Plasma {
        prtls: vec![Prtl { r, v }],
        charge,
        mass: 1.0,
        vth: 0.0,
    }
}

#[test]
fn deposit_at_rest_is_zero() {
    let sim = common::setup_sim();
    let mut solver = Solver::new(&sim);
    let plasma = single_prtl(1.0, Vec3::new(7.3, 8.6, 6.9), Vec3::ZERO);
    solver.density_decomposition(&plasma);
    assert!(solver.j.iter().all(|v| *v == Vec3::ZERO));
}

#[test]
fn deposit_single_x_crossing() {
    // q = 1 moving from (5,5,5) to (6,5,5) in one step: current only
    // in x, confined to the x-row covering the old and new supports,
    // and summing to q * vx.
    let sim = common::setup_sim();
    let mut solver = Solver::new(&sim);
    let plasma = single_prtl(1.0, Vec3::new(5.0, 5.0, 5.0), Vec3::new(1.0, 0.0, 0.0));
    solver.density_decomposition(&plasma);

    let (lx, ly, lz) = solver.j.dims();
    let mut jx_sum = 0.0 as Float;
    for i in 0..lx {
        for j in 0..ly {
            for k in 0..lz {
                let jv = solver.j[(i, j, k)];
                assert_eq!(jv.y, 0.0, "stray y-current at ({},{},{})", i, j, k);
                assert_eq!(jv.z, 0.0, "stray z-current at ({},{},{})", i, j, k);
                if jv.x != 0.0 {
                    // floor(5) - 2 .. floor(6) - 2 + 4
                    assert!(i >= 3 && i <= 8, "x-current outside span at x = {}", i);
                    assert!(j == 4 || j == 5);
                    assert!(k == 4 || k == 5);
                }
                jx_sum += jv.x;
            }
        }
    }
    assert!((jx_sum - 1.0).abs() < TOL, "total Jx = {}", jx_sum);

    // particle sits on the boundary between cells 4 and 5, so its
    // shape is split evenly: each of the 8 active cells carries
    // 1 * 0.5 * 0.5 * 0.5
    assert!((solver.j[(5, 4, 4)].x - 0.125).abs() < TOL);
    assert!((solver.j[(6, 5, 5)].x - 0.125).abs() < TOL);
}

#[test]
fn deposit_satisfies_discrete_continuity() {
    // The decrease in deposited charge density must equal the
    // discrete divergence of the deposited current, cell by cell.
    let sim = common::setup_sim();

    let cases = [
        // one boundary crossing in x
        (Vec3::new(5.8, 5.2, 5.4), Vec3::new(0.4, 0.1, -0.2)),
        // no crossing at all
        (Vec3::new(7.4, 6.5, 8.2), Vec3::new(0.05, -0.1, 0.2)),
        // simultaneous crossings, negative charge
        (Vec3::new(6.1, 7.9, 5.95), Vec3::new(-0.3, 0.3, 0.1)),
    ];

    for &(r0, v) in cases.iter() {
        let q: Float = if v.x < 0.0 { -1.0 } else { 1.0 };
        let mut solver = Solver::new(&sim);
        let plasma = single_prtl(q, r0, v);
        solver.density_decomposition(&plasma);

        let r1 = r0 + v;
        let ishift = r1.x as usize as isize - r0.x as usize as isize;
        let jshift = r1.y as usize as isize - r0.y as usize as isize;
        let kshift = r1.z as usize as isize - r0.z as usize as isize;

        let mut s0x = [0.0 as Float; 5];
        let mut s0y = [0.0 as Float; 5];
        let mut s0z = [0.0 as Float; 5];
        weights5(&mut s0x, r0.x);
        weights5(&mut s0y, r0.y);
        weights5(&mut s0z, r0.z);

        let mut s1x = [0.0 as Float; 5];
        let mut s1y = [0.0 as Float; 5];
        let mut s1z = [0.0 as Float; 5];
        weights5_shifted(&mut s1x, r1.x, ishift);
        weights5_shifted(&mut s1y, r1.y, jshift);
        weights5_shifted(&mut s1z, r1.z, kshift);

        let ii = r0.x as usize - 2;
        let jj = r0.y as usize - 2;
        let kk = r0.z as usize - 2;
        let jg = &solver.j;
        for i in 0..5 {
            for j in 0..5 {
                for k in 0..5 {
                    let d_rho = q * (s1x[i] * s1y[j] * s1z[k] - s0x[i] * s0y[j] * s0z[k]);
                    let (cx, cy, cz) = (ii + i, jj + j, kk + k);
                    let div_j = jg[(cx + 1, cy, cz)].x - jg[(cx, cy, cz)].x
                        + jg[(cx, cy + 1, cz)].y
                        - jg[(cx, cy, cz)].y
                        + jg[(cx, cy, cz + 1)].z
                        - jg[(cx, cy, cz)].z;
                    assert!(
                        (d_rho + div_j).abs() < TOL,
                        "continuity violated at offset ({},{},{}): d_rho = {}, div_j = {}",
                        i,
                        j,
                        k,
                        d_rho,
                        div_j
                    );
                }
            }
        }
    }
}

#[test]
fn center_averaging_of_uniform_fields() {
    let sim = common::setup_sim();
    let mut solver = Solver::new(&sim);
    let mut flds = Flds::new(&sim);

    let e0 = Vec3::new(1.0, 2.0, 3.0);
    let b0 = Vec3::new(-4.0, 5.0, -6.0);
    let (lx, ly, lz) = flds.e.dims();
    for i in 0..lx {
        for j in 0..ly {
            for k in 0..lz {
                flds.e[(i, j, k)] = e0;
                flds.b[(i, j, k)] = b0;
            }
        }
    }

    solver.calc_on_center(&flds);
    // a uniform field is its own centered average everywhere the
    // stencil fits
    for i in 0..lx - 1 {
        for j in 0..ly - 1 {
            for k in 0..lz - 1 {
                assert_eq!(solver.ec[(i, j, k)], e0);
                assert_eq!(solver.bc[(i, j, k)], b0);
            }
        }
    }
}

#[test]
fn center_averaging_of_linear_field() {
    let sim = common::setup_sim();
    let mut solver = Solver::new(&sim);
    let mut flds = Flds::new(&sim);

    // e_x and b_z varying linearly along x: the half-cell stagger
    // means the centered value lands at i + 1/2
    let (lx, ly, lz) = flds.e.dims();
    for i in 0..lx {
        for j in 0..ly {
            for k in 0..lz {
                flds.e[(i, j, k)].x = i as Float;
                flds.b[(i, j, k)].z = i as Float;
            }
        }
    }

    solver.calc_on_center(&flds);
    for i in 0..lx - 1 {
        for j in 0..ly - 1 {
            for k in 0..lz - 1 {
                assert!((solver.ec[(i, j, k)].x - (i as Float + 0.5)).abs() < TOL);
                assert!((solver.bc[(i, j, k)].z - (i as Float + 0.5)).abs() < TOL);
            }
        }
    }
}

#[test]
fn update_e_by_j_subtracts_interior_only() {
    let sim = common::setup_sim();
    let mut solver = Solver::new(&sim);
    let mut flds = Flds::new(&sim);

    solver.j[(8, 8, 8)] = Vec3::new(1.0, 2.0, 3.0);
    // ghost-layer current must not touch E here; folding it back in
    // is the boundary exchange's job
    solver.j[(0, 0, 0)] = Vec3::new(9.0, 9.0, 9.0);

    solver.update_e_by_j(&sim, &mut flds);
    assert_eq!(flds.e[(8, 8, 8)], Vec3::new(-1.0, -2.0, -3.0));
    assert_eq!(flds.e[(0, 0, 0)], Vec3::ZERO);
}

#[test]
fn clear_j_zeroes_everything() {
    let sim = common::setup_sim();
    let mut solver = Solver::new(&sim);
    let plasma = single_prtl(1.0, Vec3::new(5.5, 5.5, 5.5), Vec3::new(0.2, 0.1, 0.0));
    solver.density_decomposition(&plasma);
    assert!(solver.j.iter().any(|v| *v != Vec3::ZERO));
    solver.clear_j();
    assert!(solver.j.iter().all(|v| *v == Vec3::ZERO));
}

#[test]
fn rejects_undersized_grids() {
    let cfg = Config {
        setup: Setup { t_final: 1 },
        params: Params {
            size_x: 16,
            size_y: 16,
            size_z: 16,
            delta: 2, // too thin for the deposition stencil
            c: 0.5,
            dens: 1,
            vth: 1e-3,
        },
    };
    assert!(Sim::new(&cfg).is_err());

    let cfg = Config {
        setup: Setup { t_final: 1 },
        params: Params {
            size_x: 6, // no interior left after the margins
            size_y: 16,
            size_z: 16,
            delta: 3,
            c: 0.5,
            dens: 1,
            vth: 1e-3,
        },
    };
    assert!(Sim::new(&cfg).is_err());
}

#[test]
fn run_small_sim() {
    let cfg = Config {
        setup: Setup { t_final: 2 },
        params: Params {
            size_x: 12,
            size_y: 12,
            size_z: 12,
            delta: 3,
            c: 0.5,
            dens: 1,
            vth: 1e-3,
        },
    };
    esirkepov_rs::run(cfg).expect("small sim should complete");
}
