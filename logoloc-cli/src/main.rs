use clap::{Parser, ValueEnum};
use image::RgbImage;
use logoloc::io::owned_from_dynamic;
use logoloc::{
    compute_section, BoundingBox, Locator, LocatorConfig, MatchMethod, Method, ProfileStore,
    SectionSpec,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Batch logo detection with logo-relative section cropping"
)]
struct Cli {
    /// Image file or directory of images to process.
    input: PathBuf,
    /// Logo template image.
    #[arg(long, value_name = "FILE")]
    template: PathBuf,
    /// Matching strategy.
    #[arg(long, value_enum, default_value_t = MethodArg::Auto)]
    method: MethodArg,
    /// Output directory for crops, annotations, and the manifest.
    #[arg(long, default_value = "out")]
    out: PathBuf,
    /// Also write annotated copies with the detected rectangles drawn in.
    #[arg(long)]
    annotate: bool,
    /// Border thickness for the logo rectangle.
    #[arg(long, default_value_t = 4)]
    thickness: u32,
    /// Saved profile name defining the section rectangle.
    #[arg(long)]
    profile: Option<String>,
    /// Path of the profile store file.
    #[arg(long, value_name = "FILE", default_value = "profiles.json")]
    profiles: PathBuf,
    /// Section left edge, in multiples of the logo width.
    #[arg(long)]
    section_left_mul: Option<f64>,
    /// Section top edge, in multiples of the logo height.
    #[arg(long)]
    section_top_mul: Option<f64>,
    /// Section right edge (edge mode), in multiples of the logo width.
    #[arg(long)]
    section_right_mul: Option<f64>,
    /// Section bottom edge (edge mode), in multiples of the logo height.
    #[arg(long)]
    section_bottom_mul: Option<f64>,
    /// Section width (size mode), in multiples of the logo width.
    #[arg(long)]
    section_width_mul: Option<f64>,
    /// Section height (size mode), in multiples of the logo height.
    #[arg(long)]
    section_height_mul: Option<f64>,
    /// Border thickness for the section rectangle.
    #[arg(long, default_value_t = 3)]
    section_thickness: u32,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MethodArg {
    Auto,
    Orb,
    Template,
}

impl From<MethodArg> for Method {
    fn from(value: MethodArg) -> Self {
        match value {
            MethodArg::Auto => Method::Auto,
            MethodArg::Orb => Method::Orb,
            MethodArg::Template => Method::Template,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Status {
    Ok,
    LogoNotFound,
    Error,
}

#[derive(Debug, Serialize)]
struct ManifestEntry {
    file: String,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    logo_bbox: Option<BoundingBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    section_bbox: Option<BoundingBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<MatchMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ManifestEntry {
    fn failure(file: String, status: Status, error: Option<String>) -> Self {
        Self {
            file,
            status,
            logo_bbox: None,
            section_bbox: None,
            method: None,
            confidence: None,
            error,
        }
    }
}

/// Resolves the section definition: saved profile first, explicit multiplier
/// flags otherwise. A profile lookup miss fails the whole run.
fn resolve_section(cli: &Cli) -> Result<Option<(SectionSpec, u32)>, Box<dyn std::error::Error>> {
    if let Some(name) = &cli.profile {
        let store = ProfileStore::open(&cli.profiles);
        let profile = store.get(name)?;
        return Ok(Some((profile.section, profile.section_thickness)));
    }

    let (Some(left_mul), Some(top_mul)) = (cli.section_left_mul, cli.section_top_mul) else {
        return Ok(None);
    };
    let spec = if let (Some(right_mul), Some(bottom_mul)) =
        (cli.section_right_mul, cli.section_bottom_mul)
    {
        SectionSpec::Edge {
            left_mul,
            top_mul,
            right_mul,
            bottom_mul,
        }
    } else if let (Some(width_mul), Some(height_mul)) =
        (cli.section_width_mul, cli.section_height_mul)
    {
        SectionSpec::Size {
            left_mul,
            top_mul,
            width_mul,
            height_mul,
        }
    } else {
        return Err(
            "section multipliers require either right/bottom (edge mode) or width/height \
             (size mode)"
                .into(),
        );
    };
    Ok(Some((spec, cli.section_thickness)))
}

fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    let mut paths = Vec::new();
    for entry in fs::read_dir(input)? {
        let path = entry?.path();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        if matches!(ext.as_deref(), Some("png" | "jpg" | "jpeg")) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn draw_rect(img: &mut RgbImage, bbox: BoundingBox, color: [u8; 3], thickness: u32) {
    let (width, height) = img.dimensions();
    let x1 = bbox.right().min(width);
    let y1 = bbox.bottom().min(height);
    for t in 0..thickness {
        for x in bbox.x..x1 {
            if bbox.y + t < height {
                img.put_pixel(x, bbox.y + t, image::Rgb(color));
            }
            if y1 > t + 1 {
                img.put_pixel(x, y1 - t - 1, image::Rgb(color));
            }
        }
        for y in bbox.y..y1 {
            if bbox.x + t < width {
                img.put_pixel(bbox.x + t, y, image::Rgb(color));
            }
            if x1 > t + 1 {
                img.put_pixel(x1 - t - 1, y, image::Rgb(color));
            }
        }
    }
}

fn process_image(
    path: &Path,
    template: logoloc::ImageView<'_>,
    locator: &Locator,
    cli: &Cli,
    section: Option<&(SectionSpec, u32)>,
) -> Result<ManifestEntry, Box<dyn std::error::Error>> {
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_owned());

    let dynamic = image::open(path)?;
    let gray = owned_from_dynamic(&dynamic)?;
    let width = gray.width() as u32;
    let height = gray.height() as u32;

    let Some(detection) = locator.locate(gray.view(), template, cli.method.into())? else {
        eprintln!("[WARN] logo not found in {}", path.display());
        return Ok(ManifestEntry::failure(file, Status::LogoNotFound, None));
    };

    let section_bbox = section.and_then(|(spec, _)| {
        let bbox = compute_section(detection.bbox, width, height, spec);
        if bbox.is_none() {
            eprintln!(
                "[WARN] degenerate section for {} (clamped to zero area)",
                path.display()
            );
        }
        bbox
    });

    let rgb = dynamic.to_rgb8();
    if let Some(sec) = section_bbox {
        let crop = image::imageops::crop_imm(&rgb, sec.x, sec.y, sec.width, sec.height).to_image();
        crop.save(cli.out.join(format!("{stem}_section.png")))?;
    }
    if cli.annotate {
        let mut annotated = rgb;
        draw_rect(&mut annotated, detection.bbox, [255, 0, 0], cli.thickness);
        if let (Some(sec), Some((_, thickness))) = (section_bbox, section) {
            draw_rect(&mut annotated, sec, [0, 255, 0], *thickness);
        }
        annotated.save(cli.out.join(format!("{stem}_annotated.png")))?;
    }

    Ok(ManifestEntry {
        file,
        status: Status::Ok,
        logo_bbox: Some(detection.bbox),
        section_bbox,
        method: Some(detection.method),
        confidence: Some(detection.confidence),
        error: None,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("logoloc=info".parse()?))
            .with_target(false)
            .init();
    }

    let section = resolve_section(&cli)?;
    let inputs = collect_inputs(&cli.input)?;
    if inputs.is_empty() {
        return Err("no input images found".into());
    }
    fs::create_dir_all(&cli.out)?;

    let template = logoloc::io::load_gray_image(&cli.template)?;
    let locator = Locator::new(LocatorConfig::default());

    let mut manifest = Vec::with_capacity(inputs.len());
    for path in &inputs {
        let entry = match process_image(path, template.view(), &locator, &cli, section.as_ref()) {
            Ok(entry) => entry,
            // A bad file must not abort the batch.
            Err(err) => {
                eprintln!("[WARN] failed to process {}: {err}", path.display());
                let file = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                ManifestEntry::failure(file, Status::Error, Some(err.to_string()))
            }
        };
        manifest.push(entry);
    }

    let json = serde_json::to_string_pretty(&manifest)?;
    fs::write(cli.out.join("manifest.json"), json)?;
    Ok(())
}
