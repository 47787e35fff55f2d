use criterion::{Criterion, black_box, criterion_group, criterion_main};
use lz_core::{LabelMap, RgbColor};
use lz_segment::{ShapeLayerBuilderOptions, segment};

/// Tiled blobs of four labels with a few isolated speckles.
fn synthetic_labels(width: usize, height: usize) -> LabelMap {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let tile = ((x / 48) + 3 * (y / 40)) % 4;
            let speckle = (x * 7 + y * 13) % 97 == 0;
            data.push(if speckle { 3 - tile as u32 } else { tile as u32 });
        }
    }

    let palette = vec![
        RgbColor::new(230, 57, 70),
        RgbColor::new(241, 250, 238),
        RgbColor::new(168, 218, 220),
        RgbColor::new(29, 53, 87),
    ];
    match LabelMap::from_vec(width, height, data, palette) {
        Ok(map) => map,
        Err(e) => panic!("synthetic labels: {e}"),
    }
}

fn bench_segment(c: &mut Criterion) {
    let labels = synthetic_labels(640, 480);
    let opts = ShapeLayerBuilderOptions {
        noisy_component_min_pixel_count: 4,
        ..Default::default()
    };

    c.bench_function("lz_segment_640x480", |b| {
        b.iter(|| {
            let out = segment(black_box(&labels), black_box(&opts));
            black_box(out.map(|r| (r.shape_layers.len(), r.noisy_layers.len())))
        });
    });
}

criterion_group!(benches, bench_segment);
criterion_main!(benches);
