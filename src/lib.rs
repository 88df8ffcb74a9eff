use serde::Deserialize;
use std::fs;

use anyhow::{Context, Result};

pub mod flds;
pub mod grid;
pub mod prtls;
pub mod shape;
pub mod solver;
pub mod vec3;

use crate::flds::Flds;
use crate::prtls::Plasma;
use crate::solver::Solver;

// We use a type alias for f64/Float to easily support
// double and single precision.
#[cfg(feature = "dprec")]
pub type Float = f64;

#[cfg(not(feature = "dprec"))]
pub type Float = f32;

// How many particles each rayon worker grabs at a time in the pusher.
pub const PRTL_CHUNK_SIZE: usize = 10_000;

#[derive(Deserialize)]
pub struct Config {
    pub params: Params,
    pub setup: Setup,
}

#[derive(Deserialize)]
pub struct Setup {
    pub t_final: u32,
}

#[derive(Deserialize)]
pub struct Params {
    pub size_x: usize,
    pub size_y: usize,
    pub size_z: usize,
    pub delta: usize,
    pub c: Float,
    pub dens: u32,
    pub vth: Float,
}

impl Config {
    pub fn new() -> Result<Config> {
        let contents =
            fs::read_to_string("config.toml").context("Could not open the config.toml file")?;
        toml::from_str(&contents).with_context(|| "Could not parse Config file")
    }
}

pub struct Sim {
    pub size_x: usize, // total extents, ghost layers included
    pub size_y: usize,
    pub size_z: usize,
    pub delta: usize, // ghost / injection margin on every boundary
    pub c: Float,     // speed of light in cells per timestep
    pub dens: u32,    // # of prtls per species per cell
    pub vth: Float,
    pub t_final: u32,
    pub prtl_num: usize, // = dens * interior volume
}

impl Sim {
    pub fn new(cfg: &Config) -> Result<Sim> {
        // The deposition stencil reaches from floor(r) - 2 to
        // floor(r) + 3, so a margin of at least 3 cells keeps every
        // interior particle inside the arrays.
        if cfg.params.delta < 3 {
            return Err(anyhow::Error::msg("delta must be at least 3 cells"));
        }
        for &size in &[cfg.params.size_x, cfg.params.size_y, cfg.params.size_z] {
            if size <= 2 * cfg.params.delta {
                return Err(anyhow::Error::msg(
                    "Grid extent must exceed twice the ghost margin",
                ));
            }
        }
        if cfg.params.c <= 0.0 || cfg.params.c > 1.0 {
            // c > 1 cell per step would let a particle outrun the
            // single-cell-shift contract of the deposition scheme.
            return Err(anyhow::Error::msg(
                "c must lie in (0, 1] cells per timestep",
            ));
        }
        let interior_x = cfg.params.size_x - 2 * cfg.params.delta;
        let interior_y = cfg.params.size_y - 2 * cfg.params.delta;
        let interior_z = cfg.params.size_z - 2 * cfg.params.delta;
        Ok(Sim {
            size_x: cfg.params.size_x,
            size_y: cfg.params.size_y,
            size_z: cfg.params.size_z,
            delta: cfg.params.delta,
            c: cfg.params.c,
            dens: cfg.params.dens,
            vth: cfg.params.vth,
            t_final: cfg.setup.t_final,
            prtl_num: cfg.params.dens as usize * interior_x * interior_y * interior_z,
        })
    }
}

pub fn run(cfg: Config) -> Result<()> {
    let sim = Sim::new(&cfg)?;

    println!("initialzing prtls");
    let mut plasmas = Vec::<Plasma>::new();
    // ions, then lecs
    plasmas.push(Plasma::new(&sim, 1.0, 1.0, sim.vth));
    plasmas.push(Plasma::new(&sim, -1.0, 1.0, sim.vth));

    let mut flds = Flds::new(&sim);
    let mut solver = Solver::new(&sim);

    for t in 0..=sim.t_final {
        println!("{}", t);

        // The Maxwell half-steps and the ghost exchange belong to the
        // field solver; this core picks up once E and B are current.
        solver.calc_on_center(&flds);
        for plasma in plasmas.iter_mut() {
            plasma.boris_push(&sim, &solver);
        }

        solver.clear_j();
        for plasma in plasmas.iter() {
            solver.density_decomposition(plasma);
        }
        solver.update_e_by_j(&sim, &mut flds);

        for plasma in plasmas.iter_mut() {
            plasma.update_position();
            plasma.apply_bc(&sim);
        }
    }
    Ok(())
}
