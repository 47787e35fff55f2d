use layerize::{LabelMap, RgbColor};

/// Label map from ASCII rows, one digit per pixel.
pub fn label_map(rows: &[&str]) -> LabelMap {
    assert!(!rows.is_empty(), "at least one row required");
    let width = rows[0].len();
    let mut labels = Vec::with_capacity(width * rows.len());
    for row in rows {
        assert_eq!(row.len(), width, "ragged row {row:?}");
        labels.extend(row.chars().map(|c| c.to_digit(10).expect("digit label")));
    }
    let max = labels.iter().copied().max().unwrap_or(0);
    LabelMap::from_vec(width, rows.len(), labels, palette(max as usize + 1))
        .expect("valid label map")
}

/// Deterministic pseudo-random label map with `k` labels.
pub fn noise_map(width: usize, height: usize, k: u32, seed: u64) -> LabelMap {
    let mut state = seed.max(1);
    let mut labels = Vec::with_capacity(width * height);
    for _ in 0..width * height {
        // xorshift64
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        labels.push((state % u64::from(k)) as u32);
    }
    LabelMap::from_vec(width, height, labels, palette(k as usize)).expect("valid label map")
}

/// Blocky map: random labels per `cell x cell` tile, so components are
/// larger than single pixels.
pub fn blocky_map(width: usize, height: usize, cell: usize, k: u32, seed: u64) -> LabelMap {
    let tiles = noise_map(width.div_ceil(cell), height.div_ceil(cell), k, seed);
    let tw = tiles.width();
    let mut labels = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            labels.push(tiles.labels()[(y / cell) * tw + x / cell]);
        }
    }
    LabelMap::from_vec(width, height, labels, palette(k as usize)).expect("valid label map")
}

fn palette(n: usize) -> Vec<RgbColor> {
    (0..n)
        .map(|i| {
            let v = (i * 53 % 256) as u8;
            RgbColor::new(v, 255 - v, (i * 97 % 256) as u8)
        })
        .collect()
}
