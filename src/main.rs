use clap::{Parser, Subcommand};
use pixtray::imaging::CropRect;
use pixtray::{EditorConfig, ImageCodec, RustCodec, Session, output, upload};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pixtray")]
#[command(about = "Batch image resize, crop, and zip export")]
#[command(long_about = "\
Batch image resize, crop, and zip export

Images are loaded into an in-memory tray, transformed, and written back out
as JPEG at quality 90. Directories are walked recursively; only files with
image extensions (jpg, jpeg, png, gif, webp) are picked up from them.

Examples:

  # Resize everything under shots/ to a shortest side of 800px, zip the results
  pixtray resize shots/ --size 800

  # Crop one image using a rectangle drawn on a 400x300 preview of it,
  # exporting at double density for a high-DPI display
  pixtray crop photo.jpg --rect 10,10,100,50 --displayed 400x300 --pixel-ratio 2

  # List what a tray loaded from these inputs would look like
  pixtray inspect shots/ extra.png

Run 'pixtray gen-config' for a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Path to a config.toml (stock defaults when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resize images to a shortest-side target and export a zip archive
    Resize {
        /// Image files and/or directories
        inputs: Vec<PathBuf>,
        /// Shortest-side target in pixels (config default when omitted)
        #[arg(long)]
        size: Option<u32>,
        /// Archive output path (timestamped name in the current dir when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Crop one image from a display-space rectangle
    Crop {
        /// Image file
        input: PathBuf,
        /// Crop rectangle as x,y,w,h in displayed coordinates
        #[arg(long)]
        rect: String,
        /// Displayed size the rectangle was drawn against, as WxH
        /// (natural size when omitted)
        #[arg(long)]
        displayed: Option<String>,
        /// Device-pixel-ratio multiplier (config default when omitted)
        #[arg(long)]
        pixel_ratio: Option<f64>,
        /// Output path (processed-<name>.jpg when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Load inputs into a tray and display it without transforming
    Inspect {
        /// Image files and/or directories
        inputs: Vec<PathBuf>,
        /// Emit the tray manifest as JSON instead of the tree view
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    let config = EditorConfig::load(cli.config.as_deref())?;
    let codec = RustCodec::new();

    match cli.command {
        Command::Resize { inputs, size, out } => {
            let files = upload::collect_inputs(&inputs)?;
            let mut session = Session::with_config(&config);
            session.upload(&codec, files)?;
            session.tray_mut().toggle_select_all();

            let target = size.unwrap_or(config.shortest_side);
            let count = session.resize_selected(&codec, target)?;
            println!("Resized {count} images to shortest side {target}px");

            match session.export_archive()? {
                Some(bundle) => {
                    let path = out.unwrap_or_else(|| PathBuf::from(&bundle.filename));
                    std::fs::write(&path, &bundle.bytes)?;
                    println!("Archive: {}", output::archive_line(&bundle));
                    println!("Wrote {}", path.display());
                }
                None => println!("Nothing processed; no archive written"),
            }
        }
        Command::Crop {
            input,
            rect,
            displayed,
            pixel_ratio,
            out,
        } => {
            let files = upload::collect_inputs(std::slice::from_ref(&input))?;
            let mut session = Session::with_config(&config);
            session.upload(&codec, files)?;

            let rect = parse_rect(&rect)?;
            let displayed = match displayed {
                Some(raw) => parse_size(&raw)?,
                None => {
                    // Rectangle drawn against the image at natural size
                    let record = session
                        .tray()
                        .active()
                        .ok_or("no image loaded")?;
                    let dims = codec.identify(&record.original.to_bytes()?)?;
                    (dims.width as f64, dims.height as f64)
                }
            };
            let ratio = pixel_ratio.unwrap_or(config.pixel_ratio);

            session.apply_crop(&codec, &rect, displayed, ratio)?;
            let (name, bytes) = session
                .download_active()?
                .ok_or("crop produced no output")?;
            let path = out.unwrap_or_else(|| PathBuf::from(&name));
            std::fs::write(&path, &bytes)?;
            println!("Wrote {}", path.display());
        }
        Command::Inspect { inputs, json } => {
            let files = upload::collect_inputs(&inputs)?;
            let mut session = Session::with_config(&config);
            session.upload(&codec, files)?;

            if json {
                let manifest = session.tray().manifest();
                println!("{}", serde_json::to_string_pretty(&manifest)?);
            } else {
                output::print_tray(session.tray());
            }
        }
        Command::GenConfig => {
            print!("{}", pixtray::config::stock_config_toml());
        }
    }

    Ok(())
}

/// Parse `x,y,w,h` into a display-space crop rectangle.
fn parse_rect(raw: &str) -> Result<CropRect, String> {
    let parts: Vec<f64> = raw
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| format!("invalid --rect '{raw}': expected x,y,w,h"))?;
    let [x, y, width, height] = parts[..] else {
        return Err(format!("invalid --rect '{raw}': expected 4 values"));
    };
    let rect = CropRect {
        x,
        y,
        width,
        height,
    };
    if !rect.has_area() {
        return Err(format!("invalid --rect '{raw}': width and height must be positive"));
    }
    Ok(rect)
}

/// Parse `WxH` into displayed dimensions.
fn parse_size(raw: &str) -> Result<(f64, f64), String> {
    let invalid = || format!("invalid --displayed '{raw}': expected WxH");
    let (w, h) = raw.split_once(['x', 'X']).ok_or_else(invalid)?;
    let w: f64 = w.trim().parse().map_err(|_| invalid())?;
    let h: f64 = h.trim().parse().map_err(|_| invalid())?;
    if w <= 0.0 || h <= 0.0 {
        return Err(invalid());
    }
    Ok((w, h))
}
