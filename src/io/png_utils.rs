// Copyright @yucwang 2026

use crate::io::ImageWriteError;
use crate::math::bitmap::Bitmap;
use crate::math::constants::Float;

/// Linear `[0, 1]` to the sRGB transfer curve.
pub fn linear_to_srgb(v: Float) -> Float {
    let v = if v.is_finite() { v.max(0.0).min(1.0) } else { 0.0 };
    if v <= 0.0031308 {
        12.92 * v
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

fn to_byte(v: Float) -> u8 {
    (linear_to_srgb(v) * 255.0 + 0.5).floor().max(0.0).min(255.0) as u8
}

/// Writes an already tonemapped image as 8-bit sRGB, row 0 at the top.
pub fn write_png_to_file(image: &Bitmap, file_path: &str) -> Result<(), ImageWriteError> {
    log::info!("Starting writing png image: {}.", file_path);

    let mut buffer = Vec::with_capacity(image.width() * image.height() * 3);
    for p in image.pixels() {
        buffer.push(to_byte(p.x));
        buffer.push(to_byte(p.y));
        buffer.push(to_byte(p.z));
    }
    image::save_buffer(file_path,
                       &buffer,
                       image.width() as u32,
                       image.height() as u32,
                       image::ColorType::Rgb8)?;

    log::info!("PNG written to: {}.", file_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector3f;

    #[test]
    fn test_srgb_curve_endpoints() {
        assert_eq!(to_byte(0.0), 0);
        assert_eq!(to_byte(1.0), 255);
        assert_eq!(to_byte(5.0), 255);
        assert_eq!(to_byte(Float::NAN), 0);
        // mid grey encodes brighter than linear
        assert!(to_byte(0.18) > 100 && to_byte(0.18) < 125);
    }

    #[test]
    fn test_png_write() {
        let mut bitmap = Bitmap::new(4, 3);
        bitmap[(1, 2)] = Vector3f::new(1.0, 0.5, 0.0);
        let path = std::env::temp_dir().join(format!("wavepath_png_{}.png", std::process::id()));
        let path = path.to_string_lossy().to_string();
        write_png_to_file(&bitmap, &path).unwrap();
        let metadata = std::fs::metadata(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert!(metadata.len() > 0);
    }
}
