use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use sabbia::canvas::{Cell, Material, PixelBuffer};
use sabbia::simulation;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a canvas, advance the simulation, write the results
    Run {
        /// Canvas to load: .psb or .png (empty canvas when omitted)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Sampling stride for PNG input, block size for PNG output
        #[arg(long, default_value_t = 4)]
        scale: u32,

        /// Number of simulation ticks to run
        #[arg(long, default_value_t = 60)]
        ticks: u32,

        /// Output .psb path (timestamped name when omitted)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Also rasterize the result to a PNG
        #[arg(long)]
        png: Option<PathBuf>,
    },

    /// Pour a seeded random scatter of cells and watch it settle
    Demo {
        #[arg(long, default_value_t = 1337)]
        seed: u64,

        /// Number of cells to scatter over the top half of the grid
        #[arg(long, default_value_t = 600)]
        cells: u32,

        #[arg(long, default_value_t = 120)]
        ticks: u32,

        /// Rasterize the settled canvas to a PNG
        #[arg(long)]
        png: Option<PathBuf>,

        #[arg(long, default_value_t = 4)]
        scale: u32,
    },

    /// Print cell count, bounds, and material histogram of a .psb file
    Info { input: PathBuf },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Run {
            input,
            scale,
            ticks,
            out,
            png,
        } => run(input, scale, ticks, out, png),
        Command::Demo {
            seed,
            cells,
            ticks,
            png,
            scale,
        } => demo(seed, cells, ticks, png, scale),
        Command::Info { input } => info(input),
    }
}

fn load_input(input: Option<PathBuf>, scale: u32) -> Result<PixelBuffer> {
    match input {
        None => Ok(PixelBuffer::new()),
        Some(path) => {
            let is_png = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
            let loaded = if is_png {
                PixelBuffer::load_png(&path, scale)
            } else {
                PixelBuffer::load_psb(&path)
            };
            loaded.with_context(|| format!("Failed to load canvas from {:?}", path))
        }
    }
}

fn timestamped_output() -> PathBuf {
    PathBuf::from(format!(
        "sabbia-export-{}.psb",
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    ))
}

fn run(
    input: Option<PathBuf>,
    scale: u32,
    ticks: u32,
    out: Option<PathBuf>,
    png: Option<PathBuf>,
) -> Result<()> {
    let mut buffer = load_input(input, scale)?;

    log::info!("running {} ticks over {} cells", ticks, buffer.len());
    for _ in 0..ticks {
        simulation::step(&mut buffer);
    }

    let out = out.unwrap_or_else(timestamped_output);
    buffer
        .save_psb(&out)
        .with_context(|| format!("Failed to save {:?}", out))?;
    if let Some(png_path) = &png {
        buffer
            .save_png(png_path, scale)
            .with_context(|| format!("Failed to export {:?}", png_path))?;
    }

    println!("wrote {} cells to {}", buffer.len(), out.display());
    Ok(())
}

fn demo(seed: u64, cells: u32, ticks: u32, png: Option<PathBuf>, scale: u32) -> Result<()> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut buffer = PixelBuffer::new();

    for _ in 0..cells {
        let col = rng.random_range(0..buffer.width());
        let row = rng.random_range(0..buffer.height() / 2);
        let material = Material::ALL[rng.random_range(0..Material::ALL.len())];
        buffer.add(Cell::new(col, row, material));
    }
    log::info!("scattered {} cells (seed {})", buffer.len(), seed);

    for _ in 0..ticks {
        simulation::step(&mut buffer);
    }

    if let Some(png_path) = &png {
        buffer
            .save_png(png_path, scale)
            .with_context(|| format!("Failed to export {:?}", png_path))?;
        println!("exported {}", png_path.display());
    }
    println!("settled to {} cells after {} ticks", buffer.len(), ticks);
    Ok(())
}

fn info(input: PathBuf) -> Result<()> {
    let buffer = PixelBuffer::load_psb(&input)
        .with_context(|| format!("Failed to load {:?}", input))?;

    println!(
        "{}: {} cells on a {}x{} grid",
        input.display(),
        buffer.len(),
        buffer.width(),
        buffer.height()
    );
    if buffer.is_empty() {
        return Ok(());
    }

    let mut min_col = u32::MAX;
    let mut min_row = u32::MAX;
    let mut max_col = 0;
    let mut max_row = 0;
    let mut counts = [0usize; Material::ALL.len()];
    for cell in buffer.iter() {
        min_col = min_col.min(cell.col);
        min_row = min_row.min(cell.row);
        max_col = max_col.max(cell.col);
        max_row = max_row.max(cell.row);
        counts[cell.material.tag() as usize] += 1;
    }

    println!("  bounds: ({}, {}) to ({}, {})", min_col, min_row, max_col, max_row);
    for material in Material::ALL {
        println!("  {:?}: {}", material, counts[material.tag() as usize]);
    }
    Ok(())
}
