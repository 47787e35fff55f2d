//! Builds a layer stack for a small synthetic label map and prints it back
//! to front.
//!
//! Run from the workspace root:
//!   RUST_LOG=debug cargo run -p layerize --example nested_squares

use layerize::{
    Cancel, LabelMap, LayerizeConfig, RgbColor, ShapeLayerBuilderOptions, build_layers,
};

fn main() -> Result<(), layerize::Error> {
    env_logger::init();

    // Background with a framed square and a lone speckle.
    let (w, h) = (12, 10);
    let mut labels = vec![0_u32; w * h];
    for y in 2..8 {
        for x in 3..9 {
            let frame = y == 2 || y == 7 || x == 3 || x == 8;
            labels[y * w + x] = if frame { 1 } else { 2 };
        }
    }
    labels[w + 10] = 2;

    let palette = vec![
        RgbColor::new(244, 241, 222),
        RgbColor::new(61, 64, 91),
        RgbColor::new(224, 122, 95),
    ];
    let map = LabelMap::from_vec(w, h, labels, palette)?;

    let config = LayerizeConfig {
        segment: ShapeLayerBuilderOptions {
            noisy_component_min_pixel_count: 2,
            ..Default::default()
        },
        ..Default::default()
    };

    let stack = build_layers(&map, &config, &Cancel::new())?;
    for (layer, depth) in stack.back_to_front() {
        println!(
            "depth {depth}: {} {} area={} holes={}",
            layer.id(),
            layer.color(),
            layer.area(),
            layer.holes().len()
        );
    }
    for noise in stack.noisy_layers() {
        println!("noise: {} area={}", noise.id(), noise.area());
    }
    Ok(())
}
