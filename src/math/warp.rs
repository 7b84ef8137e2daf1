// Copyright @yucwang 2023

use super::constants::{ PI, Float, Vector2f, Vector3f };

pub fn sample_uniform_sphere(u: &Vector2f) -> Vector3f {
    let z: Float = 1. - 2. * u.x;
    let r: Float = (1. - z * z).max(0.).sqrt();
    let phi: Float = 2. * PI * u.y;

    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

pub fn sample_uniform_disk_concentric(u: &Vector2f) -> Vector2f {
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

pub fn sample_cosine_hemisphere(u: &Vector2f) -> Vector3f {
    let p = sample_uniform_disk_concentric(u);
    let z = (1. - p.x * p.x - p.y * p.y).max(0.).sqrt();

    Vector3f::new(p.x, p.y, z)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sphere_is_unit_length() {
        for i in 0..8 {
            for j in 0..8 {
                let u = Vector2f::new(i as Float / 8.0, j as Float / 8.0);
                let v = sample_uniform_sphere(&u);
                assert!((v.norm() - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_cosine_hemisphere_stays_above() {
        for i in 0..8 {
            for j in 0..8 {
                let u = Vector2f::new((i as Float + 0.5) / 8.0, (j as Float + 0.5) / 8.0);
                let v = sample_cosine_hemisphere(&u);
                assert!(v.z >= 0.0);
                assert!((v.norm() - 1.0).abs() < 1e-5);
            }
        }
    }
}
