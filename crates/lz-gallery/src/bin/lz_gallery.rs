use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use image::{Rgb, RgbImage};
use layerize::{
    Cancel, DepthOrder, LabelMap, LayerStack, LayerizeConfig, NoisyLayer, Point2f, RasterMask,
    RgbColor, SegmentationResult, ShapeLayer, build_layers, order_depth, segment_with_cancel,
    select_by_depth,
};
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "lz_gallery")]
#[command(about = "Run layerize stages on JSON label-map fixtures")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(name = "segment")]
    Segment(CommonArgs),
    #[command(name = "depth_order")]
    DepthOrder(CommonArgs),
    #[command(name = "layers")]
    Layers(LayersArgs),
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    /// JSON with optional `segment` and `depth` sections.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "docs/fig/raw")]
    out: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct LayersArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Restrict output to these layer ids. Repeatable.
    #[arg(long = "export-layer")]
    export_layer: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Fixture {
    width: usize,
    height: usize,
    palette: Vec<[u8; 3]>,
    labels: Vec<u32>,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct ShapeLayerDto {
    id: String,
    color: String,
    area: usize,
    perimeter: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    depth: Option<usize>,
    boundary: Vec<[f32; 2]>,
    holes: Vec<Vec<[f32; 2]>>,
}

#[derive(Debug, Clone, Serialize)]
struct NoisyLayerDto {
    id: String,
    color: String,
    area: usize,
    perimeter: f32,
    boundary: Vec<[f32; 2]>,
}

#[derive(Debug, Clone, Serialize)]
struct LayersDto {
    width: usize,
    height: usize,
    shape_layers: Vec<ShapeLayerDto>,
    noisy_layers: Vec<NoisyLayerDto>,
}

#[derive(Debug, Clone, Serialize)]
struct DepthEntryDto {
    id: String,
    depth: usize,
}

#[derive(Debug, Clone, Serialize)]
struct DepthDto {
    back_to_front: Vec<DepthEntryDto>,
}

#[derive(Debug, Clone, Serialize)]
struct Meta {
    stage: &'static str,
    width: usize,
    height: usize,
    palette_len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    config: LayerizeConfig,
    shape_layers: usize,
    noisy_layers: usize,
    holes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    exported_layers: Option<usize>,
}

struct Case {
    dir: PathBuf,
    fixture: Fixture,
    labels: LabelMap,
    config: LayerizeConfig,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.cmd {
        Command::Segment(args) => run_segment(args),
        Command::DepthOrder(args) => run_depth_order(args),
        Command::Layers(args) => run_layers(args),
    }
}

fn run_segment(args: CommonArgs) -> Result<()> {
    let case = prepare_case(&args, "segment")?;
    let seg = segment_with_cancel(&case.labels, &case.config.segment, &Cancel::new())
        .context("segmenting label map")?;

    write_json(case.dir.join("layers.json"), &layers_dto(&case, &seg, None))?;
    write_json(case.dir.join("meta.json"), &meta(&case, "segment", &seg, None))?;
    info!("wrote segment outputs to {}", case.dir.display());
    Ok(())
}

fn run_depth_order(args: CommonArgs) -> Result<()> {
    let case = prepare_case(&args, "depth_order")?;
    let seg = segment_with_cancel(&case.labels, &case.config.segment, &Cancel::new())
        .context("segmenting label map")?;
    if seg.shape_layers.is_empty() {
        bail!("every component was classified as noise; nothing to order");
    }
    let order = order_depth(&seg.shape_layers, &case.config.depth).context("ordering layers")?;

    write_json(case.dir.join("depth.json"), &depth_dto(&order))?;
    write_json(
        case.dir.join("meta.json"),
        &meta(&case, "depth_order", &seg, None),
    )?;
    info!("wrote depth outputs to {}", case.dir.display());
    Ok(())
}

fn run_layers(args: LayersArgs) -> Result<()> {
    let case = prepare_case(&args.common, "layers")?;
    let stack =
        build_layers(&case.labels, &case.config, &Cancel::new()).context("building layer stack")?;

    let selected = args
        .export_layer
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>();
    let exported =
        select_by_depth(stack.shape_layers(), &stack.order, Some(selected.as_slice()))
            .context("selecting export layers")?;
    let exported_ids = exported.iter().map(|l| l.id()).collect::<HashSet<_>>();

    let mut dto = layers_dto(&case, &stack.segmentation, Some(&stack.order));
    dto.shape_layers.retain(|l| exported_ids.contains(&l.id.as_str()));
    dto.shape_layers
        .sort_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.id.cmp(&b.id)));

    write_json(case.dir.join("layers.json"), &dto)?;
    write_json(case.dir.join("depth.json"), &depth_dto(&stack.order))?;
    write_json(
        case.dir.join("meta.json"),
        &meta(&case, "layers", &stack.segmentation, Some(exported.len())),
    )?;

    let preview = render_preview(&case, &stack, &exported_ids);
    preview
        .save(case.dir.join("preview.png"))
        .context("writing layers preview.png")?;

    info!(
        "wrote {} layers ({} exported) to {}",
        stack.shape_layers().len(),
        exported.len(),
        case.dir.display()
    );
    Ok(())
}

fn prepare_case(common: &CommonArgs, case_name: &str) -> Result<Case> {
    ensure_file_exists(&common.input, "input")?;
    let fixture: Fixture = read_json(&common.input)
        .with_context(|| format!("reading fixture json at {}", common.input.display()))?;

    let config = match &common.config {
        Some(path) => {
            ensure_file_exists(path, "config")?;
            read_json::<LayerizeConfig>(path)
                .with_context(|| format!("reading config json at {}", path.display()))?
        }
        None => LayerizeConfig::default(),
    };

    let labels = label_map(&fixture)?;

    let dir = common.out.join(case_name);
    fs::create_dir_all(&dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;
    fs::copy(&common.input, dir.join("input.json")).with_context(|| {
        format!(
            "copying input {} -> {}",
            common.input.display(),
            dir.join("input.json").display()
        )
    })?;

    Ok(Case {
        dir,
        fixture,
        labels,
        config,
    })
}

fn label_map(fixture: &Fixture) -> Result<LabelMap> {
    if fixture.width == 0 || fixture.height == 0 {
        bail!(
            "fixture dimensions must be positive, got {}x{}",
            fixture.width,
            fixture.height
        );
    }
    let palette = fixture
        .palette
        .iter()
        .map(|&c| RgbColor::from(c))
        .collect::<Vec<_>>();
    LabelMap::from_vec(
        fixture.width,
        fixture.height,
        fixture.labels.clone(),
        palette,
    )
    .context("constructing label map from fixture")
}

fn points_dto(points: &[Point2f]) -> Vec<[f32; 2]> {
    points.iter().map(|p| [p.x, p.y]).collect()
}

fn shape_dto(layer: &ShapeLayer, order: Option<&DepthOrder>) -> ShapeLayerDto {
    ShapeLayerDto {
        id: layer.id().to_string(),
        color: layer.color().to_hex(),
        area: layer.area(),
        perimeter: layer.perimeter(),
        depth: order.and_then(|o| o.depth(layer.id()).ok()),
        boundary: points_dto(layer.boundary()),
        holes: layer.holes().iter().map(|h| points_dto(h)).collect(),
    }
}

fn noise_dto(layer: &NoisyLayer) -> NoisyLayerDto {
    NoisyLayerDto {
        id: layer.id().to_string(),
        color: layer.color().to_hex(),
        area: layer.area(),
        perimeter: layer.perimeter(),
        boundary: points_dto(layer.boundary()),
    }
}

fn layers_dto(case: &Case, seg: &SegmentationResult, order: Option<&DepthOrder>) -> LayersDto {
    LayersDto {
        width: case.labels.width(),
        height: case.labels.height(),
        shape_layers: seg
            .shape_layers
            .iter()
            .map(|l| shape_dto(l, order))
            .collect(),
        noisy_layers: seg.noisy_layers.iter().map(noise_dto).collect(),
    }
}

fn depth_dto(order: &DepthOrder) -> DepthDto {
    DepthDto {
        back_to_front: order
            .iter_back_to_front()
            .map(|(id, depth)| DepthEntryDto {
                id: id.to_string(),
                depth,
            })
            .collect(),
    }
}

fn meta(
    case: &Case,
    stage: &'static str,
    seg: &SegmentationResult,
    exported_layers: Option<usize>,
) -> Meta {
    Meta {
        stage,
        width: case.fixture.width,
        height: case.fixture.height,
        palette_len: case.fixture.palette.len(),
        notes: case.fixture.notes.clone(),
        config: case.config.clone(),
        shape_layers: seg.shape_layers.len(),
        noisy_layers: seg.noisy_layers.len(),
        holes: seg.shape_layers.iter().map(|l| l.holes().len()).sum(),
        exported_layers,
    }
}

/// Noise first, then exported layers back to front.
fn render_preview(case: &Case, stack: &LayerStack, exported_ids: &HashSet<&str>) -> RgbImage {
    let width = case.labels.width();
    let mut img = RgbImage::new(width as u32, case.labels.height() as u32);

    for noise in stack.noisy_layers() {
        paint_mask(&mut img, width, noise.mask(), noise.color());
    }
    for (layer, _) in stack.back_to_front() {
        if exported_ids.contains(&layer.id()) {
            paint_mask(&mut img, width, layer.mask(), layer.color());
        }
    }
    img
}

fn paint_mask(img: &mut RgbImage, width: usize, mask: &RasterMask, color: RgbColor) {
    let px = Rgb(color.to_array());
    for i in mask.iter_ones() {
        img.put_pixel((i % width) as u32, (i / width) as u32, px);
    }
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}
