use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use image::ImageReader;

use leafgauge::config::ApplianceConfig;
use leafgauge::store::{DirStore, RecordStore};
use leafgauge::{LeafCounter, capture, detector, render};

#[derive(Parser)]
#[command(name = "leafgauge")]
#[command(about = "Estimate plant growth metrics from detector output and images")]
struct Cli {
    /// Path to input image file (written first when --capture is set)
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// JSON sidecar with detector boxes ([[x_min,y_min,x_max,y_max], ..])
    #[arg(short, long, value_name = "FILE")]
    detections: Option<PathBuf>,

    /// Appliance configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Capture the image with the configured camera command before processing
    #[arg(long)]
    capture: bool,

    /// Write a copy of the image with detection boxes burned in
    #[arg(long, value_name = "PATH")]
    annotated_out: Option<PathBuf>,

    /// Write a copy of the image with contour outlines burned in
    #[arg(long, value_name = "PATH")]
    contours_out: Option<PathBuf>,

    /// Push the growth record and images to a store rooted at this directory
    #[arg(long, value_name = "DIR")]
    store_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Cli::parse();

    let config = ApplianceConfig::load(args.config.as_deref())?;
    let engine = config.engine();

    if args.capture {
        log::info!("capturing image to {}", args.image_path.display());
        capture::capture_to(&config.capture, &args.image_path)?;
    }

    if args.verbose {
        println!("Loading image: {:?}", args.image_path);
    }
    let img = ImageReader::open(&args.image_path)?
        .decode()
        .with_context(|| format!("failed to decode image {}", args.image_path.display()))?;
    if args.verbose {
        println!("Image loaded: {}x{}\n", img.width(), img.height());
    }

    // Detector-based assessment, when a sidecar is present.
    let mut record = None;
    let mut detected_blob = None;
    if let Some(detections_path) = &args.detections {
        let boxes = detector::boxes_from_json_file(detections_path)?;
        if args.verbose {
            println!("Loaded {} detection box(es)", boxes.len());
        }

        let assessment = engine.assess(&boxes);
        if assessment.skipped_boxes > 0 {
            log::warn!(
                "skipped {} degenerate detection box(es)",
                assessment.skipped_boxes
            );
        }

        println!("=== Growth Assessment ===");
        println!("Leaf count:      {}", assessment.leaf_count);
        println!("Total leaf area: {:.2} cm2", assessment.total_leaf_area_cm2);
        println!("Height:          {:.2} cm", assessment.representative_height_cm);
        println!("Growth stage:    {}", assessment.stage);

        if let Some(out) = &args.annotated_out {
            let annotated = render::annotate_boxes(&img, &engine.annotations(&boxes));
            annotated
                .save(out)
                .with_context(|| format!("failed to save {}", out.display()))?;
            if args.verbose {
                println!("Annotated image saved to {}", out.display());
            }
            detected_blob = Some(out.clone());
        }

        record = Some(assessment.to_record());
    }

    // Independent contour cross-check. This is a second signal, not a
    // reconciliation of the detector count.
    let counter = LeafCounter::new();
    let contour_count = counter.count(&img)?;
    println!("\n=== Contour Cross-Check ===");
    println!("Contour leaf count: {}", contour_count.count);
    if let Some(out) = &args.contours_out {
        contour_count
            .annotated
            .save(out)
            .with_context(|| format!("failed to save {}", out.display()))?;
        if args.verbose {
            println!("Contour image saved to {}", out.display());
        }
    }

    if let Some(dir) = &args.store_dir {
        let store = DirStore::new(dir);
        let ts = capture::timestamp()?;

        if let Some(record) = &record {
            store.put_record(&format!("detections/{ts}/growth_parameters"), record)?;
        }

        let raw_bytes = std::fs::read(&args.image_path)
            .with_context(|| format!("failed to read {}", args.image_path.display()))?;
        store.put_blob(&format!("detections/{ts}/raw"), &raw_bytes)?;

        if let Some(detected_path) = &detected_blob {
            let detected_bytes = std::fs::read(detected_path)
                .with_context(|| format!("failed to read {}", detected_path.display()))?;
            store.put_blob(&format!("detections/{ts}/detected"), &detected_bytes)?;
        }

        log::info!("record and blobs stored under detections/{ts}");
    }

    Ok(())
}
