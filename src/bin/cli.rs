// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! cpgrid CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use cpgrid::{export_snapshot, import_snapshot, GeometryConfig, Grid};
use nalgebra::{Point3, Vector3};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cpgrid")]
#[command(about = "Corner-point grid geometry tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a regular box grid snapshot
    Box {
        /// Dimensions as NCOL NROW NLAY
        #[arg(long, num_args = 3, default_values_t = [4, 3, 5])]
        dims: Vec<usize>,

        /// Origin as X Y Z
        #[arg(long, num_args = 3, default_values_t = [0.0, 0.0, 0.0], allow_negative_numbers = true)]
        origin: Vec<f64>,

        /// Cell size as DX DY DZ
        #[arg(long, num_args = 3, default_values_t = [1.0, 1.0, 1.0])]
        increment: Vec<f64>,

        /// Output snapshot file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print dimensions, active cells and geometrics of a snapshot
    Info {
        /// Input snapshot file
        input: PathBuf,

        /// Restrict statistics to active cells
        #[arg(long)]
        active_only: bool,
    },

    /// Reduce a snapshot to a single layer
    Reduce {
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Deactivate cells thinner than a threshold
    Thin {
        input: PathBuf,

        /// Minimum thickness
        #[arg(short, long, allow_negative_numbers = true)]
        threshold: f64,

        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Box {
            dims,
            origin,
            increment,
            output,
        } => box_command(dims, origin, increment, output, cli.verbose),
        Commands::Info { input, active_only } => info_command(input, *active_only),
        Commands::Reduce { input, output } => {
            let mut grid = load(input)?;
            let detached = grid.reduce_to_single_layer();
            if cli.verbose && !detached.is_empty() {
                println!("{} {} properties detached", "Warning:".yellow(), detached.len());
            }
            save(&grid, output)
        }
        Commands::Thin {
            input,
            threshold,
            output,
        } => {
            let mut grid = load(input)?;
            let changed = grid.deactivate_thin_cells(*threshold)?;
            println!(
                "Deactivated {} cells, {} active remain",
                changed.to_string().yellow(),
                grid.active_count().to_string().green()
            );
            save(&grid, output)
        }
    }
}

// A snapshot carries its own config; `cpgrid.toml` only applies to new grids.
fn load(input: &Path) -> Result<Grid> {
    import_snapshot(input)
}

fn save(grid: &Grid, output: &Path) -> Result<()> {
    export_snapshot(grid, output)?;
    println!("{} Wrote {}", "Success:".green(), output.display());
    Ok(())
}

fn box_command(
    dims: &[usize],
    origin: &[f64],
    increment: &[f64],
    output: &Path,
    verbose: bool,
) -> Result<()> {
    let grid = Grid::create_box(
        (dims[0], dims[1], dims[2]),
        Point3::new(origin[0], origin[1], origin[2]),
        Vector3::new(increment[0], increment[1], increment[2]),
    )?
    .with_config(GeometryConfig::load()?)?;

    if verbose {
        println!("Created {}x{}x{} box grid", dims[0], dims[1], dims[2]);
    }
    save(&grid, output)
}

fn info_command(input: &Path, active_only: bool) -> Result<()> {
    let grid = load(input)?;
    let geo = grid.geometrics(!active_only, true);

    println!("{}", "Grid Summary".bold());
    println!("{}", "=".repeat(40));
    println!(
        "Dimensions:    {} x {} x {}",
        grid.ncol(),
        grid.nrow(),
        grid.nlay()
    );
    println!(
        "Active cells:  {} of {}",
        grid.active_count().to_string().green(),
        grid.ntotal()
    );
    println!("Origin:        ({:.3}, {:.3}, {:.3})", geo.xori, geo.yori, geo.zori);
    println!("X range:       {:.3} .. {:.3}", geo.xmin, geo.xmax);
    println!("Y range:       {:.3} .. {:.3}", geo.ymin, geo.ymax);
    println!("Z range:       {:.3} .. {:.3}", geo.zmin, geo.zmax);
    let extent = geo.bounding_box().size();
    println!("Extent:        {:.3} x {:.3} x {:.3}", extent.x, extent.y, extent.z);
    println!(
        "Avg dx/dy/dz:  {:.4} / {:.4} / {:.4}",
        geo.avg_dx, geo.avg_dy, geo.avg_dz
    );
    println!("Avg rotation:  {:.4}", geo.avg_rotation);
    println!("Regularity:    {:?} ({})", geo.regularity, geo.regularity.flag());
    if geo.degenerate_cells > 0 {
        println!(
            "{} {} degenerate cells",
            "Warning:".yellow(),
            geo.degenerate_cells
        );
    }
    Ok(())
}
