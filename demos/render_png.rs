use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "render_png", version)]
struct Args {
    /// Input icon tree JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Uniform scale applied to the icon's natural size.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Also write `<out>@<n>x.png` for each extra scale, rendered on a worker pool.
    #[arg(long = "also", value_delimiter = ',')]
    also: Vec<f64>,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let text = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read icon '{}'", args.in_path.display()))?;
    let tree = icontree::Tree::from_json_str(&text)?;

    let scales: Vec<f64> = std::iter::once(args.scale)
        .chain(args.also.iter().copied())
        .collect();
    let settings: Vec<_> = scales
        .iter()
        .map(|&s| icontree::RenderSettings::scaled(s))
        .collect();
    let threading = icontree::RenderThreading {
        parallel: true,
        threads: args.threads,
    };
    let frames = icontree::render_icon_batch(&tree, &settings, &threading)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    for (i, (frame, scale)) in frames.iter().zip(&scales).enumerate() {
        let out = if i == 0 {
            args.out.clone()
        } else {
            let stem = args
                .out
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "icon".to_string());
            args.out.with_file_name(format!("{stem}@{scale}x.png"))
        };
        if frame.width == 0 || frame.height == 0 {
            eprintln!(
                "skipping empty {}x{} frame for {}",
                frame.width,
                frame.height,
                out.display()
            );
            continue;
        }

        image::save_buffer_with_format(
            &out,
            &frame.data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", out.display()))?;
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}
