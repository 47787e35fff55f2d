use std::collections::VecDeque;

use log::{debug, trace};
use lz_core::{Cancel, Error, LabelMap, NoisyLayer, Point2f, RasterMask, RgbColor, ShapeLayer};

use crate::options::ShapeLayerBuilderOptions;
use crate::trace::{TraceWorkspace, classify_loops};

/// Shape layers plus the components rejected as noise, both in discovery
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentationResult {
    pub shape_layers: Vec<ShapeLayer>,
    pub noisy_layers: Vec<NoisyLayer>,
}

impl SegmentationResult {
    pub fn layer(&self, id: &str) -> Option<&ShapeLayer> {
        self.shape_layers.iter().find(|l| l.id() == id)
    }

    /// Pixel count over shape and noise layers. Equals the image size.
    pub fn total_area(&self) -> usize {
        self.shape_layers.iter().map(ShapeLayer::area).sum::<usize>()
            + self.noisy_layers.iter().map(NoisyLayer::area).sum::<usize>()
    }
}

/// Sequential zero-padded ids: `layer-0001`, `layer-0002`, ...
#[derive(Debug, Clone)]
pub struct IdSequence {
    prefix: &'static str,
    next: usize,
}

impl IdSequence {
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix, next: 1 }
    }

    pub fn next_id(&mut self) -> String {
        let id = format!("{}-{:04}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    BelowPixelCount,
    BelowPerimeter,
    /// Admitted on thresholds but cut by the primary layer cap.
    Demoted,
}

impl Admission {
    fn is_admitted(self) -> bool {
        self == Self::Admitted
    }
}

#[derive(Debug)]
struct Candidate {
    label: u32,
    color: RgbColor,
    mask: RasterMask,
    outer: Vec<Point2f>,
    holes: Vec<Vec<Point2f>>,
    area: usize,
    admission: Admission,
}

/// Splits a label map into 4-connected same-label components.
///
/// See [`segment_with_cancel`].
pub fn segment(
    labels: &LabelMap,
    opts: &ShapeLayerBuilderOptions,
) -> Result<SegmentationResult, Error> {
    segment_with_cancel(labels, opts, &Cancel::new())
}

/// Splits a label map into 4-connected same-label components.
///
/// Components are discovered in row-major order of their first pixel. Each
/// becomes a [`ShapeLayer`] or, when it fails admission or the layer cap, a
/// [`NoisyLayer`]. Ids are assigned per family in discovery order.
///
/// `cancel` is polled once per seed pixel.
pub fn segment_with_cancel(
    labels: &LabelMap,
    opts: &ShapeLayerBuilderOptions,
    cancel: &Cancel,
) -> Result<SegmentationResult, Error> {
    opts.validate()?;

    let width = labels.width();
    let height = labels.height();
    let data = labels.labels();
    let n = data.len();

    let mut visited = vec![0_u8; n];
    let mut queue = VecDeque::new();
    let mut component = Vec::new();
    let mut workspace = TraceWorkspace::new();
    let mut candidates = Vec::new();

    for seed in 0..n {
        cancel.check()?;
        if visited[seed] != 0 {
            continue;
        }

        let label = data[seed];
        flood_fill(seed, data, width, height, &mut visited, &mut queue, &mut component);

        let mask = RasterMask::from_indices(width, height, &component)?;
        let loops = workspace.trace(&component, width)?;
        let boundary = classify_loops(loops)?;
        let perimeter = lz_core::perimeter(&boundary.outer);
        let area = component.len();
        let admission = admission(area, perimeter, opts);

        trace!(
            "component label={label} area={area} perimeter={perimeter:.1} holes={} {admission:?}",
            boundary.holes.len()
        );

        candidates.push(Candidate {
            label,
            color: labels.color_of(label),
            mask,
            outer: boundary.outer,
            holes: boundary.holes,
            area,
            admission,
        });
    }

    let demoted = match opts.layer_cap() {
        Some(cap) => enforce_layer_cap(&mut candidates, cap),
        None => 0,
    };

    let mut shape_ids = IdSequence::new("layer");
    let mut noise_ids = IdSequence::new("noise");
    let mut out = SegmentationResult::default();

    for c in candidates {
        if c.admission.is_admitted() {
            out.shape_layers.push(ShapeLayer::new(
                shape_ids.next_id(),
                c.color,
                c.mask,
                c.outer,
                c.holes,
                c.area,
            )?);
        } else {
            out.noisy_layers.push(NoisyLayer::new(
                noise_ids.next_id(),
                c.color,
                c.mask,
                c.outer,
                c.area,
            )?);
        }
    }

    debug!(
        "segmented {}x{} labels: {} shape layers, {} noisy layers ({} demoted by cap)",
        width,
        height,
        out.shape_layers.len(),
        out.noisy_layers.len(),
        demoted
    );

    Ok(out)
}

/// Admission verdict for one component. Thresholds are strict: a value equal
/// to the threshold is admitted.
pub fn admission(area: usize, perimeter: f32, opts: &ShapeLayerBuilderOptions) -> Admission {
    let min_px = opts.noisy_component_min_pixel_count;
    if min_px > 0 && area < min_px {
        return Admission::BelowPixelCount;
    }

    let min_perimeter = opts.noisy_component_min_perimeter;
    if min_perimeter > 0.0 && perimeter < min_perimeter {
        return Admission::BelowPerimeter;
    }

    Admission::Admitted
}

/// Demotes the smallest admitted components (ties by discovery order) until
/// at most `cap` remain. Returns the number demoted.
fn enforce_layer_cap(candidates: &mut [Candidate], cap: usize) -> usize {
    let mut admitted = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| c.admission.is_admitted())
        .map(|(i, c)| (c.area, i))
        .collect::<Vec<_>>();

    if admitted.len() <= cap {
        return 0;
    }

    admitted.sort_unstable();
    let excess = admitted.len() - cap;
    for &(_, i) in &admitted[..excess] {
        trace!(
            "demoting component label={} area={} over cap {cap}",
            candidates[i].label, candidates[i].area
        );
        candidates[i].admission = Admission::Demoted;
    }

    excess
}

/// Breadth-first 4-connected fill over pixels sharing the seed's label.
///
/// Fills `component` with the visited pixel indices in BFS order.
fn flood_fill(
    seed: usize,
    labels: &[u32],
    width: usize,
    height: usize,
    visited: &mut [u8],
    queue: &mut VecDeque<usize>,
    component: &mut Vec<usize>,
) {
    let label = labels[seed];
    queue.clear();
    component.clear();

    visited[seed] = 1;
    queue.push_back(seed);

    while let Some(p) = queue.pop_front() {
        component.push(p);

        let x = p % width;
        let y = p / width;
        let neighbors = [
            (x > 0).then(|| p - 1),
            (x + 1 < width).then(|| p + 1),
            (y > 0).then(|| p - width),
            (y + 1 < height).then(|| p + width),
        ];

        for nb in neighbors.into_iter().flatten() {
            if visited[nb] == 0 && labels[nb] == label {
                visited[nb] = 1;
                queue.push_back(nb);
            }
        }
    }
}
