use crate::grid::Grid3;
use crate::Sim;

/// The staggered E and B arrays. They are owned by the Maxwell/FDTD
/// solver in a full run; this core only reads them when centering
/// fields and writes E when folding in the deposited current, so the
/// struct stays a plain pair of grids.
///
/// Staggering convention (same one the deposition stagger follows):
/// E components sit on the edge midpoints along their own axis, B
/// components on the face centers normal to their own axis.
pub struct Flds {
    pub e: Grid3,
    pub b: Grid3,
}

impl Flds {
    pub fn new(sim: &Sim) -> Flds {
        Flds {
            e: Grid3::new(sim.size_x, sim.size_y, sim.size_z),
            b: Grid3::new(sim.size_x, sim.size_y, sim.size_z),
        }
    }
}
