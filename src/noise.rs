//! Noise kernel for the secondary wave octaves.
//!
//! Classic 3D gradient noise in the GPU-friendly form (permutation by the
//! polynomial `(34x² + x) mod 289`, gradients on an octahedron). The same
//! kernel is written in `water.wgsl`, so CPU evaluation and the vertex
//! shader agree to within float rounding.

use glam::{Vec3, Vec4};
use noise::NoiseFn;

/// Seedless classic Perlin noise; zero at every integer lattice point
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicPerlin;

impl ClassicPerlin {
    pub fn new() -> Self {
        Self
    }

    /// Sample noise at `p`, roughly in [-1, 1]
    pub fn sample(&self, p: Vec3) -> f32 {
        let pi0 = p.floor();
        let pi1 = mod289_3(pi0 + Vec3::ONE);
        let pi0 = mod289_3(pi0);
        let pf0 = p - p.floor();
        let pf1 = pf0 - Vec3::ONE;

        let ix = Vec4::new(pi0.x, pi1.x, pi0.x, pi1.x);
        let iy = Vec4::new(pi0.y, pi0.y, pi1.y, pi1.y);
        let iz0 = Vec4::splat(pi0.z);
        let iz1 = Vec4::splat(pi1.z);

        let ixy = permute(permute(ix) + iy);
        let (gx0, gy0, gz0) = gradients(permute(ixy + iz0));
        let (gx1, gy1, gz1) = gradients(permute(ixy + iz1));

        let g000 = Vec3::new(gx0.x, gy0.x, gz0.x);
        let g100 = Vec3::new(gx0.y, gy0.y, gz0.y);
        let g010 = Vec3::new(gx0.z, gy0.z, gz0.z);
        let g110 = Vec3::new(gx0.w, gy0.w, gz0.w);
        let g001 = Vec3::new(gx1.x, gy1.x, gz1.x);
        let g101 = Vec3::new(gx1.y, gy1.y, gz1.y);
        let g011 = Vec3::new(gx1.z, gy1.z, gz1.z);
        let g111 = Vec3::new(gx1.w, gy1.w, gz1.w);

        let norm0 = taylor_inv_sqrt(Vec4::new(
            g000.dot(g000),
            g010.dot(g010),
            g100.dot(g100),
            g110.dot(g110),
        ));
        let norm1 = taylor_inv_sqrt(Vec4::new(
            g001.dot(g001),
            g011.dot(g011),
            g101.dot(g101),
            g111.dot(g111),
        ));

        let n000 = (g000 * norm0.x).dot(pf0);
        let n100 = (g100 * norm0.z).dot(Vec3::new(pf1.x, pf0.y, pf0.z));
        let n010 = (g010 * norm0.y).dot(Vec3::new(pf0.x, pf1.y, pf0.z));
        let n110 = (g110 * norm0.w).dot(Vec3::new(pf1.x, pf1.y, pf0.z));
        let n001 = (g001 * norm1.x).dot(Vec3::new(pf0.x, pf0.y, pf1.z));
        let n101 = (g101 * norm1.z).dot(Vec3::new(pf1.x, pf0.y, pf1.z));
        let n011 = (g011 * norm1.y).dot(Vec3::new(pf0.x, pf1.y, pf1.z));
        let n111 = (g111 * norm1.w).dot(pf1);

        let f = fade(pf0);
        let n_z = mix4(
            Vec4::new(n000, n100, n010, n110),
            Vec4::new(n001, n101, n011, n111),
            f.z,
        );
        let n_y0 = mix(n_z.x, n_z.z, f.y);
        let n_y1 = mix(n_z.y, n_z.w, f.y);

        2.2 * mix(n_y0, n_y1, f.x)
    }
}

impl NoiseFn<f64, 3> for ClassicPerlin {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.sample(Vec3::new(point[0] as f32, point[1] as f32, point[2] as f32)) as f64
    }
}

/// Floored modulo (GLSL `mod`), not Rust's truncating `%`
fn mod289(x: Vec4) -> Vec4 {
    x - (x * (1.0 / 289.0)).floor() * 289.0
}

fn mod289_3(x: Vec3) -> Vec3 {
    x - (x * (1.0 / 289.0)).floor() * 289.0
}

fn permute(x: Vec4) -> Vec4 {
    mod289(((x * 34.0) + Vec4::ONE) * x)
}

fn taylor_inv_sqrt(r: Vec4) -> Vec4 {
    Vec4::splat(1.792_842_9) - r * 0.853_734_7
}

fn fade(t: Vec3) -> Vec3 {
    t * t * t * (t * (t * 6.0 - Vec3::splat(15.0)) + Vec3::splat(10.0))
}

/// GLSL `step(edge, x)`
fn step(edge: Vec4, x: Vec4) -> Vec4 {
    Vec4::new(
        if x.x < edge.x { 0.0 } else { 1.0 },
        if x.y < edge.y { 0.0 } else { 1.0 },
        if x.z < edge.z { 0.0 } else { 1.0 },
        if x.w < edge.w { 0.0 } else { 1.0 },
    )
}

/// Map four permutation values to gradient components on the octahedron
fn gradients(ixy: Vec4) -> (Vec4, Vec4, Vec4) {
    let gx = ixy * (1.0 / 7.0);
    let gy_floor = gx.floor() * (1.0 / 7.0);
    let gy = gy_floor - gy_floor.floor() - Vec4::splat(0.5);
    let gx = gx - gx.floor();
    let gz = Vec4::splat(0.5) - gx.abs() - gy.abs();

    let sz = step(gz, Vec4::ZERO);
    let gx = gx - sz * (step(Vec4::ZERO, gx) - Vec4::splat(0.5));
    let gy = gy - sz * (step(Vec4::ZERO, gy) - Vec4::splat(0.5));

    (gx, gy, gz)
}

fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

fn mix4(a: Vec4, b: Vec4, t: f32) -> Vec4 {
    a * (1.0 - t) + b * t
}
