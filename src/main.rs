use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use engine::{Data, PatchOutcome, Patcher};
use glam::{IVec2, ivec2};
use serde::{Serialize, de::DeserializeOwned};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use world::Location;

mod settings;
use settings::Settings;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(short, long, action = ArgAction::Count, global = true, help = "Log more, repeat for even more")]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply the layouts of a variant to a map.
    Patch(PatchArgs),
    /// Copy a run of sprites from an override image into a tilesheet atlas.
    Atlas(AtlasArgs),
    /// Apply the re-skins listed in patch data to a tilesheet atlas.
    Reskin(ReskinArgs),
}

#[derive(Parser, Debug)]
struct PatchArgs {
    #[arg(long, help = "Patch data file or directory")]
    data: PathBuf,

    #[arg(long, help = "Settings file, all flags are off without one")]
    settings: Option<PathBuf>,

    #[arg(long, help = "Map file to patch")]
    map: PathBuf,

    #[arg(long, help = "Layout variant to apply")]
    variant: String,

    #[arg(short, long, help = "Output file, standard output if omitted")]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct AtlasArgs {
    #[arg(long, help = "Tilesheet atlas image")]
    target: PathBuf,

    #[arg(long, help = "Override sprite image")]
    source: PathBuf,

    #[arg(long, help = "Atlas index of the first override sprite")]
    offset: u32,

    #[arg(long, help = "Number of override sprites")]
    count: u32,

    #[arg(long, default_value = "16x16", value_parser = parse_cell, help = "Sprite cell size")]
    cell: IVec2,

    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Parser, Debug)]
struct ReskinArgs {
    #[arg(long, help = "Patch data file or directory")]
    data: PathBuf,

    #[arg(long, help = "Directory of override images")]
    assets: PathBuf,

    #[arg(long, default_value = "default", help = "Symbolic tilesheet name")]
    tilesheet: String,

    #[arg(long, help = "Tilesheet atlas image")]
    target: PathBuf,

    #[arg(short, long)]
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    match args.command {
        Command::Patch(args) => patch(args),
        Command::Atlas(args) => atlas(args),
        Command::Reskin(args) => reskin(args),
    }
}

fn patch(args: PatchArgs) -> Result<()> {
    let data: Data = load(&args.data)?;
    let patcher = Patcher::new(data)
        .with_context(|| format!("bad patch data in {:?}", args.data))?;

    let settings: Settings = match &args.settings {
        Some(path) => load(path)?,
        None => Default::default(),
    };

    let mut map: Location = load(&args.map)?;
    log::info!("loaded {map}");

    if let PatchOutcome::Skipped { .. } =
        patcher.patch(&mut map, &args.variant, &settings)?
    {
        let known: Vec<&str> = patcher.variants().collect();
        log::info!("known variants: {}", known.join(", "));
    }

    save(&map, args.output.as_deref())
}

fn atlas(args: AtlasArgs) -> Result<()> {
    let mut atlas = gfx::load_image(&args.target)?;
    let sprites = gfx::SpriteMap::shifted(0..args.count, args.offset)
        .with_context(|| {
            format!("{} sprites at #{} run past the largest index", args.count, args.offset)
        })?;

    // Nothing gets written unless every sprite made it in.
    gfx::patch_atlas_from(&mut atlas, &args.source, &sprites, args.cell)
        .with_context(|| format!("failed to re-skin {:?}", args.target))?;

    write_png(&atlas, &args.output)
}

fn reskin(args: ReskinArgs) -> Result<()> {
    let patcher = Patcher::new(load(&args.data)?)
        .with_context(|| format!("bad patch data in {:?}", args.data))?;

    let mut atlas = gfx::load_image(&args.target)?;
    let n = patcher
        .reskin(&args.tilesheet, &mut atlas, &args.assets)
        .with_context(|| format!("failed to re-skin {:?}", args.target))?;
    if n == 0 {
        bail!("no re-skins for tilesheet {:?}", args.tilesheet);
    }
    log::info!("applied {n} re-skins to {:?}", args.target);

    write_png(&atlas, &args.output)
}

fn write_png(atlas: &gfx::Buffer<gfx::Rgba>, path: &Path) -> Result<()> {
    fs::write(path, atlas.to_png()?)
        .with_context(|| format!("failed to write {path:?}"))
}

/// Parse a `WxH` cell size.
fn parse_cell(s: &str) -> Result<IVec2, String> {
    let err = || format!("bad cell size {s:?}, expected eg. 16x16");
    let (w, h) = s.split_once('x').ok_or_else(err)?;
    let (w, h): (i32, i32) = (
        w.trim().parse().map_err(|_| err())?,
        h.trim().parse().map_err(|_| err())?,
    );
    if w < 1 || h < 1 {
        return Err(err());
    }
    Ok(ivec2(w, h))
}

/// Load a JSON file or an IDM file or directory tree.
fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if is_json(path) {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {path:?}"))?;
        return serde_json::from_str(&text)
            .with_context(|| format!("failed to parse {path:?}"));
    }

    let text = util::directory_to_idm(path)?;
    idm::from_str(&text).with_context(|| format!("failed to parse {path:?}"))
}

/// Save as JSON or IDM depending on file extension, IDM to standard
/// output if there is no file.
fn save<T: Serialize>(value: &T, path: Option<&Path>) -> Result<()> {
    let text = match path {
        Some(path) if is_json(path) => serde_json::to_string_pretty(value)?,
        _ => idm::to_string(value)?,
    };

    match path {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("failed to write {path:?}")),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json"))
}
