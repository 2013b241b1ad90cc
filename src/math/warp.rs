// Copyright @yucwang 2023

use super::constants::{ INV_PI, PI, Float, Vector2f, Vector3f };

pub fn sample_uniform_sphere(u: &Vector2f) -> Vector3f {
    let z: Float = 1.0 - 2.0 * u.x;
    let r: Float = (1. - z * z).max(0.0).sqrt();
    let phi: Float = 2. * PI * u.y;

    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

fn sample_uniform_disk_concentric(u: &Vector2f) -> Vector2f {
    let r1: Float = 2.0 * u.x - 1.0;
    let r2: Float = 2.0 * u.y - 1.0;

    let phi: Float;
    let r:   Float;

    if r1 == 0. && r2 == 0. {
        r = 0.0;
        phi = 0.0;
    } else if r1 * r1 > r2 * r2 {
        r = r1;
        phi = (PI / 4.0) * (r2 / r1);
    } else {
        r = r2;
        phi = (PI / 2.0) - (r1 / r2) * (PI / 4.0);
    }

    let (sin_phi, cos_phi) = phi.sin_cos();

    Vector2f::new(r * cos_phi, r * sin_phi)
}

/// Cosine-weighted direction around +z.
pub fn sample_cosine_hemisphere(u: &Vector2f) -> Vector3f {
    let p = sample_uniform_disk_concentric(u);
    let z = (1. - p.x * p.x - p.y * p.y).max(0.0).sqrt();

    Vector3f::new(p.x, p.y, z)
}

pub fn sample_cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    cos_theta.max(0.0) * INV_PI
}

/// Uniform barycentric coordinates `(1 - b1 - b2, b1, b2)`.
pub fn square_to_triangle(u: &Vector2f) -> Vector3f {
    let su = u.x.sqrt();
    let b1 = 1.0 - su;
    let b2 = u.y * su;

    Vector3f::new(1.0 - b1 - b2, b1, b2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warps_stay_on_domain() {
        let grid = [0.0, 0.1, 0.25, 0.5, 0.75, 0.999];
        for &a in &grid {
            for &b in &grid {
                let u = Vector2f::new(a, b);

                let s = sample_uniform_sphere(&u);
                assert!((s.norm() - 1.0).abs() < 1e-9);

                let h = sample_cosine_hemisphere(&u);
                assert!((h.norm() - 1.0).abs() < 1e-9);
                assert!(h.z >= 0.0);

                let bary = square_to_triangle(&u);
                assert!(bary.iter().all(|c| *c >= -1e-12));
                assert!((bary.sum() - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_cosine_pdf() {
        assert!((sample_cosine_hemisphere_pdf(1.0) - INV_PI).abs() < 1e-12);
        assert_eq!(sample_cosine_hemisphere_pdf(-0.5), 0.0);
    }
}
