// CLI entry for brick_mosaic
use anyhow::{ensure, Result};
use brick_mosaic::{
    default_options, default_palette, load_palette_file, process, Mode, Options, Params,
};
use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    /// Nearest palette color per pixel
    Direct,
    /// Dithered quantization first, then one palette color per quantized color
    Quantize,
}

#[derive(Parser, Debug)]
#[command(name = "brick_mosaic", version, about = "Convert an image into a brick mosaic with a parts legend")]
struct Cli {
    /// Minimum size in pixels of the image's short side
    #[arg(long = "min-size")]
    min_size: Option<u32>,
    /// Brick density fraction (bricks per crop pixel along each axis)
    #[arg(long = "brick-size")]
    brick_size: Option<f64>,
    /// Color resolution mode
    #[arg(long = "mode", value_enum, default_value = "direct")]
    mode: ModeArg,
    /// Palette file (lines of `R,G,B` or `#RRGGBB`) overriding the built-in palette
    #[arg(long = "palette", value_hint = ValueHint::FilePath)]
    palette: Option<PathBuf>,
    /// Skip printing the mosaic grid and legend
    #[arg(long = "no-report", action = ArgAction::SetTrue)]
    no_report: bool,

    /// Input image path
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
    /// Directory for the output image (defaults to the input's directory)
    #[arg(value_hint = ValueHint::DirPath)]
    output_dir: Option<PathBuf>,
}

fn build_options(cli: &Cli) -> Options {
    let mut opts = default_options();
    if let Some(v) = cli.min_size {
        opts.min_size = v;
    }
    if let Some(v) = cli.brick_size {
        opts.brick_size = v;
    }
    opts.mode = match cli.mode {
        ModeArg::Direct => Mode::Direct,
        ModeArg::Quantize => Mode::Quantize,
    };
    opts
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let options = build_options(&cli);
    ensure!(options.min_size > 0, "--min-size must be positive");
    ensure!(
        options.brick_size > 0.0 && options.brick_size.is_finite(),
        "--brick-size must be a positive fraction"
    );

    let palette = match &cli.palette {
        Some(path) => load_palette_file(path)?,
        None => default_palette().clone(),
    };

    let params = Params {
        input: cli.input,
        output_dir: cli.output_dir,
        palette,
        options,
    };
    let (out_path, output) = process(&params)?;
    println!("Saved mosaic to {}", out_path.display());
    if !cli.no_report {
        print!("{}", brick_mosaic::report::render(&output.run, output.brick_h));
    }
    Ok(())
}
