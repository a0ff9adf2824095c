use image::RgbImage;

/// Convert the simulated panel's RGB888 framebuffer to an egui ColorImage.
pub fn frame_buffer_to_color_image(image: &RgbImage) -> egui::ColorImage {
    let w = image.width() as usize;
    let h = image.height() as usize;
    let pixels = image
        .pixels()
        .map(|p| egui::Color32::from_rgb(p[0], p[1], p[2]))
        .collect();

    egui::ColorImage {
        size: [w, h],
        pixels,
        source_size: Default::default(),
    }
}
