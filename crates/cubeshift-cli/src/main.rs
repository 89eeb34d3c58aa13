use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use cubeshift_core::{
    ConvertConfig, ConvertOutput, ConvertedCubemap, CubeLayout, CustomPlacement, EquirectSampling,
    RotationFilter, compose_custom_from_set_with, convert_image, detect_format, faces_from_image,
    resolve_source, suggest_equirect_face_size, to_json_manifest,
};
use globset::{Glob, GlobSet, GlobSetBuilder};
use image::{ImageReader, RgbaImage};
use serde::Deserialize;
use tracing::{error, info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "cubeshift",
    about = "Detect and convert cubemap layouts (crosses, grids, strips, equirectangular)",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --no-progress or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the detected layout of each input image
    Detect(DetectArgs),
    /// Convert cubemaps into other layouts
    Convert(ConvertArgs),
    /// Compose a user-defined layout from a cubemap's faces
    Custom(CustomArgs),
    /// Simple timing bench (converts once, prints time per image)
    Bench(BenchArgs),
}

#[derive(Parser, Debug, Clone)]
struct DetectArgs {
    /// Input file or directory
    input: PathBuf,
    /// Include patterns (glob)
    #[arg(long)]
    include: Vec<String>,
    /// Exclude patterns (glob)
    #[arg(long)]
    exclude: Vec<String>,
    /// Print results as a JSON array
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug, Clone)]
struct SourceArgs {
    /// Source layout override (skips detection; required for equirectangular inputs without a 2:1, 8-divisible width)
    #[arg(long = "from", value_name = "LAYOUT", help_heading = "Source")]
    from: Option<CubeLayout>,
    /// Face size override
    #[arg(long, help_heading = "Source")]
    face_size: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
struct ConvertArgs {
    // Input/Output
    /// Input file or directory
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// YAML config file path (values override flags)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    #[command(flatten)]
    source: SourceArgs,

    // Targets
    /// Target layout (repeatable). Default: every layout but the source
    #[arg(long = "to", value_name = "LAYOUT", help_heading = "Targets")]
    to: Vec<CubeLayout>,
    /// Equirectangular source sampling: nearest | bicubic
    #[arg(long, default_value = "nearest", help_heading = "Targets")]
    equirect_sampling: EquirectSampling,
    /// Panorama size multiplier: output is 4k x 2k face sizes
    #[arg(long, default_value_t = 2, help_heading = "Targets")]
    equirect_oversample: u32,
    /// Project rows in parallel (requires feature `parallel`)
    #[arg(long, default_value_t = false, help_heading = "Targets")]
    parallel: bool,

    // Export
    /// Write a <name>.json manifest next to the outputs
    #[arg(long, default_value_t = false, help_heading = "Export")]
    manifest: bool,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: convert but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct CustomArgs {
    /// Input cubemap image
    input: PathBuf,
    /// YAML list of placements in draw order: [{face, x, y, rotation}]
    #[arg(long)]
    placements: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "out")]
    out_dir: PathBuf,
    /// Output base name (default: <stem>_custom)
    #[arg(short, long)]
    name: Option<String>,
    #[command(flatten)]
    source: SourceArgs,
    /// Resampling for non-right-angle rotations: nearest | bilinear
    #[arg(long, default_value = "bilinear")]
    rotation_filter: RotationFilter,
    /// Write a <name>.json manifest next to the output
    #[arg(long, default_value_t = false)]
    manifest: bool,
    /// Dry run: compose but do not write files
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Input file or directory
    input: PathBuf,
    #[command(flatten)]
    source: SourceArgs,
    /// Target layout (repeatable)
    #[arg(long = "to", value_name = "LAYOUT")]
    to: Vec<CubeLayout>,
    /// Project rows in parallel (requires feature `parallel`)
    #[arg(long, default_value_t = false)]
    parallel: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    let show_progress = cli.progress && !cli.quiet;
    match &cli.command {
        Commands::Detect(args) => run_detect(args),
        Commands::Convert(args) => run_convert(args, show_progress),
        Commands::Custom(args) => run_custom(args),
        Commands::Bench(b) => run_bench(b),
    }
}

fn run_detect(args: &DetectArgs) -> anyhow::Result<()> {
    let paths = gather_paths(&args.input, &args.include, &args.exclude)?;
    let mut rows = Vec::with_capacity(paths.len());
    for p in &paths {
        let (w, h) = match image::image_dimensions(p) {
            Ok(d) => d,
            Err(e) => {
                error!(?p, error = %e, "skip image");
                continue;
            }
        };
        let detected = detect_format(w as i64, h as i64);
        let equirect = suggest_equirect_face_size(w, h);
        if args.json {
            rows.push(serde_json::json!({
                "path": p.to_string_lossy().replace('\\', "/"),
                "width": w,
                "height": h,
                "detected": detected,
                "equirectFaceSize": equirect,
            }));
            continue;
        }
        match (detected, equirect) {
            (Some(info), _) => println!(
                "{}: {} face={} ({}x{})",
                p.display(),
                info.layout.label(),
                info.face_size,
                w,
                h
            ),
            (None, Some(fs)) => println!(
                "{}: unrecognized grid; as equirectangular face={} ({}x{})",
                p.display(),
                fs,
                w,
                h
            ),
            (None, None) => println!("{}: unrecognized ({}x{})", p.display(), w, h),
        }
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    }
    Ok(())
}

fn build_config(args: &ConvertArgs) -> anyhow::Result<ConvertConfig> {
    let cfg = ConvertConfig {
        source_layout: args.source.from,
        face_size: args.source.face_size,
        targets: args.to.clone(),
        equirect_sampling: args.equirect_sampling,
        equirect_oversample: args.equirect_oversample,
        parallel: args.parallel,
        ..Default::default()
    };
    // Config file values win over flags
    let cfg = if let Some(path) = &args.config {
        let file = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let y: YamlConfig =
            serde_yaml::from_str(&file).with_context(|| format!("parse {}", path.display()))?;
        y.into_convert_config(cfg)?
    } else {
        cfg
    };
    cfg.validate()?;
    if cfg.parallel && !cfg!(feature = "parallel") {
        warn!("--parallel ignored: built without the `parallel` feature");
    }
    Ok(cfg)
}

fn run_convert(cli: &ConvertArgs, show_progress: bool) -> anyhow::Result<()> {
    let cfg = build_config(cli)?;

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let paths = gather_paths(&cli.input, &cli.include, &cli.exclude)?;
    let inputs = load_images_with_progress(&paths, show_progress)?;
    info!(count = inputs.len(), "loaded input images");
    if !cli.dry_run {
        fs::create_dir_all(&cli.out_dir)
            .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;
    }

    let bar = progress_bar(inputs.len() as u64, "converting", show_progress)?;
    let mut failures = 0usize;
    for inp in &inputs {
        if let Some(b) = &bar {
            b.set_message(inp.stem.clone());
        }
        match convert_image(&inp.image, &cfg) {
            Ok(out) => write_outputs(&out, &inp.stem, &cli.out_dir, cli.manifest, cli.dry_run)?,
            Err(e) => {
                failures += 1;
                error!(path = ?inp.path, error = %e, "conversion failed");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    if failures > 0 && failures == inputs.len() {
        anyhow::bail!("no input could be converted ({failures} failed)");
    }
    Ok(())
}

fn write_outputs(
    out: &ConvertOutput,
    stem: &str,
    out_dir: &Path,
    manifest: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    for c in &out.outputs {
        let suffix = c.layout.map(|l| l.as_str()).unwrap_or("custom");
        let path = out_dir.join(format!("{stem}_{suffix}.png"));
        if dry_run {
            info!(?path, w = c.width, h = c.height, "would write (dry run)");
            continue;
        }
        c.rgba
            .save_with_format(&path, image::ImageFormat::Png)
            .with_context(|| format!("write {}", path.display()))?;
        info!(?path, w = c.width, h = c.height, "written");
    }
    if manifest {
        let json_path = out_dir.join(format!("{stem}.json"));
        let json = serde_json::to_string_pretty(&to_json_manifest(out))?;
        if dry_run {
            println!("{json}");
        } else {
            fs::write(&json_path, json).with_context(|| format!("write {}", json_path.display()))?;
            info!(?json_path, outputs = out.outputs.len(), "manifest written");
        }
    }
    Ok(())
}

fn run_custom(args: &CustomArgs) -> anyhow::Result<()> {
    let file = fs::read_to_string(&args.placements)
        .with_context(|| format!("read {}", args.placements.display()))?;
    let placements: Vec<CustomPlacement> = serde_yaml::from_str(&file)
        .with_context(|| format!("parse {}", args.placements.display()))?;

    let cfg = ConvertConfig {
        source_layout: args.source.from,
        face_size: args.source.face_size,
        rotation_filter: args.rotation_filter,
        ..Default::default()
    };
    cfg.validate()?;

    let image = load_image(&args.input)?;
    let source = resolve_source(&image, &cfg)?;
    info!(layout = %source.layout, face_size = source.face_size, "source resolved");
    let faces = faces_from_image(&image, &source, &cfg)?;
    let rgba = compose_custom_from_set_with(&faces, &placements, &cfg)?;

    let stem = file_stem(&args.input);
    let name = args.name.clone().unwrap_or_else(|| format!("{stem}_custom"));
    let out = ConvertOutput {
        source,
        faces,
        outputs: vec![ConvertedCubemap::new(None, rgba)],
    };
    if !args.dry_run {
        fs::create_dir_all(&args.out_dir)
            .with_context(|| format!("create out_dir {}", args.out_dir.display()))?;
    }
    let path = args.out_dir.join(format!("{name}.png"));
    let c = &out.outputs[0];
    if args.dry_run {
        info!(?path, w = c.width, h = c.height, "would write (dry run)");
    } else {
        c.rgba
            .save_with_format(&path, image::ImageFormat::Png)
            .with_context(|| format!("write {}", path.display()))?;
        info!(?path, w = c.width, h = c.height, faces = placements.len(), "custom layout written");
    }
    if args.manifest {
        let json = serde_json::to_string_pretty(&to_json_manifest(&out))?;
        if args.dry_run {
            println!("{json}");
        } else {
            let json_path = args.out_dir.join(format!("{name}.json"));
            fs::write(&json_path, json).with_context(|| format!("write {}", json_path.display()))?;
        }
    }
    Ok(())
}

fn run_bench(b: &BenchArgs) -> anyhow::Result<()> {
    use std::time::Instant;
    let paths = gather_paths(&b.input, &[], &[])?;
    let inputs = load_images_with_progress(&paths, false)?;
    let cfg = ConvertConfig {
        source_layout: b.source.from,
        face_size: b.source.face_size,
        targets: b.to.clone(),
        parallel: b.parallel,
        ..Default::default()
    };
    cfg.validate()?;
    let mut total = Duration::ZERO;
    for inp in &inputs {
        let start = Instant::now();
        let out = convert_image(&inp.image, &cfg)?;
        let dur = start.elapsed();
        total += dur;
        let pixels: u64 = out
            .outputs
            .iter()
            .map(|c| c.width as u64 * c.height as u64)
            .sum();
        println!(
            "{} source={} face={} outputs={} pixels={} time={}",
            inp.stem,
            out.source.layout,
            out.source.face_size,
            out.outputs.len(),
            pixels,
            bench_fmt_dur(dur)
        );
    }
    println!("images={} total={}", inputs.len(), bench_fmt_dur(total));
    Ok(())
}

fn bench_fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
}

fn build_globset(patterns: &[String]) -> anyhow::Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut b = GlobSetBuilder::new();
    for pat in patterns {
        b.add(Glob::new(pat).with_context(|| format!("bad glob {pat:?}"))?);
    }
    Ok(Some(b.build()?))
}

/// Image files under `path` (or `path` itself), sorted by name, filtered by
/// the include/exclude globs.
fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    let include = build_globset(include)?;
    let exclude = build_globset(exclude)?;
    let keep = |p: &Path| is_image(p) && !should_skip(p, include.as_ref(), exclude.as_ref());
    if path.is_file() {
        return Ok(if keep(path) { vec![path.to_path_buf()] } else { Vec::new() });
    }
    if !path.exists() {
        anyhow::bail!("input not found: {}", path.display());
    }
    Ok(WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && keep(e.path()))
        .map(|e| e.into_path())
        .collect())
}

fn should_skip(p: &Path, include: Option<&GlobSet>, exclude: Option<&GlobSet>) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    exclude.is_some_and(|ex| ex.is_match(&s)) || include.is_some_and(|inc| !inc.is_match(&s))
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp" | "tga")
    )
}

struct InputImage {
    path: PathBuf,
    stem: String,
    image: RgbaImage,
}

fn progress_bar(
    len: u64,
    verb: &str,
    show: bool,
) -> anyhow::Result<Option<indicatif::ProgressBar>> {
    use indicatif::{ProgressBar, ProgressStyle};
    if !show {
        return Ok(None);
    }
    let b = ProgressBar::new(len);
    b.set_style(ProgressStyle::with_template(&format!(
        "{{spinner:.green}} {verb} {{pos}}/{{len}} [{{elapsed_precise}}] {{wide_msg}}"
    ))?);
    Ok(Some(b))
}

fn load_images_with_progress(paths: &[PathBuf], progress: bool) -> anyhow::Result<Vec<InputImage>> {
    let bar = progress_bar(paths.len() as u64, "loading", progress)?;
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        match load_image(p) {
            Ok(image) => list.push(InputImage {
                path: p.clone(),
                stem: file_stem(p),
                image,
            }),
            Err(e) => {
                error!(?p, error = %e, "skip image");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn load_image(p: &Path) -> anyhow::Result<RgbaImage> {
    let img = ImageReader::open(p)
        .with_context(|| format!("open {}", p.display()))?
        .with_guessed_format()?
        .decode()
        .with_context(|| format!("decode {}", p.display()))?;
    Ok(img.to_rgba8())
}

fn file_stem(p: &Path) -> String {
    p.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("cubemap")
        .to_string()
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    source_layout: Option<String>,
    face_size: Option<u32>,
    targets: Option<Vec<String>>,
    rotation_filter: Option<String>,
    equirect_sampling: Option<String>,
    equirect_oversample: Option<u32>,
    parallel: Option<bool>,
}

impl YamlConfig {
    fn into_convert_config(self, mut cfg: ConvertConfig) -> anyhow::Result<ConvertConfig> {
        if let Some(v) = self.source_layout {
            cfg.source_layout = Some(parse_layout(&v)?);
        }
        if let Some(v) = self.face_size {
            cfg.face_size = Some(v);
        }
        if let Some(v) = self.targets {
            cfg.targets = v
                .iter()
                .map(|s| parse_layout(s))
                .collect::<anyhow::Result<Vec<_>>>()?;
        }
        if let Some(v) = self.rotation_filter {
            cfg.rotation_filter = v.parse().unwrap_or(cfg.rotation_filter);
        }
        if let Some(v) = self.equirect_sampling {
            cfg.equirect_sampling = v.parse().unwrap_or(cfg.equirect_sampling);
        }
        if let Some(v) = self.equirect_oversample {
            cfg.equirect_oversample = v;
        }
        if let Some(v) = self.parallel {
            cfg.parallel = v;
        }
        Ok(cfg)
    }
}

fn parse_layout(s: &str) -> anyhow::Result<CubeLayout> {
    s.parse::<CubeLayout>().map_err(anyhow::Error::msg)
}
