//! Pixel-grid boundary tracing.
//!
//! Every component pixel contributes one directed unit edge per side that
//! faces a non-component pixel. Edges run along pixel corners with the
//! interior on the right-hand side (image coordinates, `y` down): top sides
//! eastward, right sides southward, bottom sides westward, left sides
//! northward. Each lattice vertex therefore has at most one outgoing edge per
//! direction, so edges are stored as a 4-bit mask per vertex.

use lz_core::{Error, Point2f, signed_area};

const EAST: u8 = 0;
const SOUTH: u8 = 1;
const WEST: u8 = 2;
const NORTH: u8 = 3;

const FIRST_STEP: [u8; 4] = [EAST, SOUTH, WEST, NORTH];
const COLLINEAR_EPS: f32 = 1e-6;

/// Outer boundary and holes of one component, both simplified.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentBoundary {
    pub outer: Vec<Point2f>,
    pub holes: Vec<Vec<Point2f>>,
}

/// Scratch buffers reused across the components of one segmentation call.
///
/// Buffers are sized to the bounding box of the component being traced.
#[derive(Debug, Default)]
pub(crate) struct TraceWorkspace {
    inside: Vec<u8>,
    out_edges: Vec<u8>,
    used: Vec<u8>,
}

impl TraceWorkspace {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Closed vertex loops of the component, in image coordinates.
    pub(crate) fn trace(
        &mut self,
        pixels: &[usize],
        width: usize,
    ) -> Result<Vec<Vec<Point2f>>, Error> {
        let Some((x0, y0, x1, y1)) = pixel_bounds(pixels, width) else {
            return Err(Error::MalformedBoundary("component has no pixels"));
        };

        let bw = x1 - x0 + 1;
        let bh = y1 - y0 + 1;
        let vw = bw + 1;
        let vh = bh + 1;

        let Self {
            inside,
            out_edges,
            used,
        } = self;

        inside.clear();
        inside.resize(bw * bh, 0);
        for &p in pixels {
            inside[(p / width - y0) * bw + (p % width - x0)] = 1;
        }

        out_edges.clear();
        out_edges.resize(vw * vh, 0);
        used.clear();
        used.resize(vw * vh, 0);

        let mut total = 0_usize;
        for ly in 0..bh {
            for lx in 0..bw {
                if inside[ly * bw + lx] == 0 {
                    continue;
                }

                let (x, y) = (lx as isize, ly as isize);
                let v = ly * vw + lx;
                if !occupied(inside, bw, bh, x, y - 1) {
                    out_edges[v] |= 1 << EAST;
                    total += 1;
                }
                if !occupied(inside, bw, bh, x + 1, y) {
                    out_edges[v + 1] |= 1 << SOUTH;
                    total += 1;
                }
                if !occupied(inside, bw, bh, x, y + 1) {
                    out_edges[v + vw + 1] |= 1 << WEST;
                    total += 1;
                }
                if !occupied(inside, bw, bh, x - 1, y) {
                    out_edges[v + vw] |= 1 << NORTH;
                    total += 1;
                }
            }
        }

        if total == 0 {
            return Err(Error::MalformedBoundary("component yields no boundary edges"));
        }

        let vertex = |v: usize| Point2f::new((x0 + v % vw) as f32, (y0 + v / vw) as f32);

        let mut loops = Vec::new();
        let mut consumed = 0_usize;
        for start in 0..vw * vh {
            while let Some(first) = pick_edge(out_edges[start] & !used[start], FIRST_STEP) {
                let mut points = vec![vertex(start)];
                let mut cur = start;
                let mut dir = first;

                loop {
                    mark_edge_used(used, cur, dir);
                    consumed += 1;
                    cur = step(cur, dir, vw);
                    if cur == start {
                        break;
                    }
                    if consumed >= total {
                        return Err(Error::MalformedBoundary("boundary walk did not close"));
                    }

                    points.push(vertex(cur));
                    let free = out_edges[cur] & !used[cur];
                    dir = pick_edge(free, [turn_left(dir), dir, turn_right(dir), turn_back(dir)])
                        .ok_or(Error::MalformedBoundary("boundary walk got stuck"))?;
                }

                loops.push(points);
            }
        }

        Ok(loops)
    }
}

/// Traces the directed boundary loops of a pixel set.
///
/// `pixels` are row-major indices into a `width x height` image. Loops
/// around filled regions have positive signed area, loops around holes
/// negative.
pub fn trace_loops(
    pixels: &[usize],
    width: usize,
    height: usize,
) -> Result<Vec<Vec<Point2f>>, Error> {
    check_pixels(pixels, width, height)?;
    TraceWorkspace::new().trace(pixels, width)
}

/// Traces, classifies and simplifies the boundary of a pixel set.
pub fn trace_component(
    pixels: &[usize],
    width: usize,
    height: usize,
) -> Result<ComponentBoundary, Error> {
    check_pixels(pixels, width, height)?;
    let loops = TraceWorkspace::new().trace(pixels, width)?;
    classify_loops(loops)
}

/// Picks the loop with the largest positive area as the outer boundary and
/// every negative loop as a hole.
pub(crate) fn classify_loops(loops: Vec<Vec<Point2f>>) -> Result<ComponentBoundary, Error> {
    let areas = loops.iter().map(|l| signed_area(l)).collect::<Vec<_>>();

    let mut outer_idx = None;
    for (i, &a) in areas.iter().enumerate() {
        if a > 0.0 && outer_idx.is_none_or(|best: usize| a > areas[best]) {
            outer_idx = Some(i);
        }
    }
    let Some(outer_idx) = outer_idx else {
        return Err(Error::MalformedBoundary("no boundary loop with positive area"));
    };

    let mut outer = None;
    let mut holes = Vec::new();
    for (i, l) in loops.into_iter().enumerate() {
        if i == outer_idx {
            outer = Some(simplify_loop(&l)?);
        } else if areas[i] < 0.0 {
            holes.push(simplify_loop(&l)?);
        }
    }

    let outer = outer.ok_or(Error::MalformedBoundary("outer loop vanished"))?;
    Ok(ComponentBoundary { outer, holes })
}

/// Removes vertices that continue straight on from their predecessor.
///
/// Reversals and corners are kept. Fewer than three surviving vertices is a
/// malformed boundary.
pub fn simplify_loop(points: &[Point2f]) -> Result<Vec<Point2f>, Error> {
    let n = points.len();
    let mut out: Vec<Point2f> = Vec::with_capacity(n);

    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let cur = points[i];
        let next = points[(i + 1) % n];

        let v1 = cur - prev;
        let v2 = next - cur;
        if v1.cross(v2).abs() <= COLLINEAR_EPS && v1.dot(v2) > 0.0 {
            continue;
        }

        if out.last() != Some(&cur) {
            out.push(cur);
        }
    }

    if out.len() < 3 {
        return Err(Error::MalformedBoundary(
            "fewer than three vertices survive simplification",
        ));
    }

    Ok(out)
}

fn check_pixels(pixels: &[usize], width: usize, height: usize) -> Result<(), Error> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    let len = width * height;
    if let Some(&bad) = pixels.iter().find(|&&p| p >= len) {
        return Err(Error::SizeMismatch {
            expected: len,
            actual: bad + 1,
        });
    }
    Ok(())
}

fn pixel_bounds(pixels: &[usize], width: usize) -> Option<(usize, usize, usize, usize)> {
    let mut it = pixels.iter().map(|&p| (p % width, p / width));
    let (x, y) = it.next()?;
    Some(it.fold((x, y, x, y), |(x0, y0, x1, y1), (x, y)| {
        (x0.min(x), y0.min(y), x1.max(x), y1.max(y))
    }))
}

#[inline]
fn occupied(inside: &[u8], bw: usize, bh: usize, x: isize, y: isize) -> bool {
    if x < 0 || y < 0 {
        return false;
    }
    let (xu, yu) = (x as usize, y as usize);
    xu < bw && yu < bh && inside[yu * bw + xu] != 0
}

#[inline]
fn pick_edge(free: u8, preference: [u8; 4]) -> Option<u8> {
    preference.into_iter().find(|&d| free & (1 << d) != 0)
}

#[inline]
fn mark_edge_used(used: &mut [u8], v: usize, dir: u8) {
    used[v] |= 1 << dir;
}

#[inline]
fn step(v: usize, dir: u8, vw: usize) -> usize {
    match dir {
        EAST => v + 1,
        SOUTH => v + vw,
        WEST => v - 1,
        _ => v - vw,
    }
}

#[inline]
fn turn_left(dir: u8) -> u8 {
    (dir + 3) & 3
}

#[inline]
fn turn_right(dir: u8) -> u8 {
    (dir + 1) & 3
}

#[inline]
fn turn_back(dir: u8) -> u8 {
    (dir + 2) & 3
}
