use crate::Float;

// Quadratic (triangular) spline weights, the 2nd-order cloud shape.
// Cell i spans [i, i+1), so a particle at coordinate x sits in cell
// int(x) at sub-cell offset x - int(x) - 0.5 from the cell center,
// and its cloud covers the containing cell and one neighbor on each
// side. The truncation here must match the int() used for the cell
// shift in the deposition engine, or boundary-straddling particles
// break the partition of unity.

/// 3-tap weights over cells `int(x) - 1 ..= int(x) + 1`.
#[inline(always)]
pub fn weights3(s: &mut [Float; 3], x: Float) {
    let dx = x - (x as usize as Float) - 0.5;
    s[0] = 0.5 * (0.5 - dx) * (0.5 - dx);
    s[1] = 0.75 - dx * dx;
    s[2] = 0.5 * (0.5 + dx) * (0.5 + dx);
}

/// 5-tap weights over cells `int(x) - 2 ..= int(x) + 2`. Taps 0 and 4
/// stay zero; they exist so the shifted overload below can slide the
/// support one cell either way in the same index frame.
#[inline(always)]
pub fn weights5(s: &mut [Float; 5], x: Float) {
    *s = [0.0; 5];
    let dx = x - (x as usize as Float) - 0.5;
    s[1] = 0.5 * (0.5 - dx) * (0.5 - dx);
    s[2] = 0.75 - dx * dx;
    s[3] = 0.5 * (0.5 + dx) * (0.5 + dx);
}

/// Weights of the cloud at `x`, written in the index frame of a
/// position `shift` cells below: tap `2 + shift` is the containing
/// cell. Subtracting the unshifted weights of the old position then
/// gives the weight change caused purely by the particle's motion.
#[inline(always)]
pub fn weights5_shifted(s: &mut [Float; 5], x: Float, shift: isize) {
    if !cfg!(feature = "unchecked") {
        assert!(-1 <= shift && shift <= 1);
    }
    *s = [0.0; 5];
    let dx = x - (x as usize as Float) - 0.5;
    let base = (1 + shift) as usize;
    s[base] = 0.5 * (0.5 - dx) * (0.5 - dx);
    s[base + 1] = 0.75 - dx * dx;
    s[base + 2] = 0.5 * (0.5 + dx) * (0.5 + dx);
}
