/* Copyright 2020 @TwoCookingMice */

use crate::io::ImageWriteError;
use crate::math::bitmap::Bitmap;
use crate::math::constants::Vector3f;

// Write linear RGB to an EXR file, row 0 at the top.
pub fn write_exr_to_file(image: &Bitmap, file_path: &str) -> Result<(), ImageWriteError> {
    use exr::prelude::*;
    log::info!("Starting writing openexr images: {}.", file_path);

    let width = image.width();
    write_rgb_file(file_path, width, image.height(), |x, y| {
        let p = image.pixels()[y * width + x];
        (p.x, p.y, p.z)
    })?;

    log::info!("EXR written to: {}.", file_path);
    Ok(())
}

// Read the first RGBA layer of an EXR file, dropping alpha.
pub fn read_exr_from_file(file_path: &str) -> Result<Bitmap, ImageWriteError> {
    use exr::prelude::*;
    log::info!("Starting reading OpenEXR image from: {}.", file_path);

    let image = read()
        .no_deep_data()
        .largest_resolution_level()
        .rgba_channels(
            |resolution, _| Bitmap::new(resolution.width(), resolution.height()),
            |bitmap: &mut Bitmap, position, (r, g, b, _a): (f32, f32, f32, f32)| {
                bitmap[(position.x(), position.y())] = Vector3f::new(r, g, b);
            },
        )
        .first_valid_layer()
        .all_attributes()
        .from_file(file_path)?;

    let bitmap = image.layer_data.channel_data.pixels;
    log::info!("OpenEXR loaded, width = {}, height = {}.", bitmap.width(), bitmap.height());
    Ok(bitmap)
}
