use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use scop::config::{Config, DEFAULT_CONFIG_FILE};
use scop::vulkan::StagedGeometry;
use scop::{AssembleOptions, DedupScope, Document, ErrorPolicy, NormalPolicy};

/// Load a Wavefront OBJ mesh and report the assembled geometry.
#[derive(Parser, Debug)]
#[command(name = "scop", version)]
struct Args {
    /// OBJ file to load
    path: PathBuf,

    /// Only assemble objects with this name
    #[arg(long)]
    object: Option<String>,

    /// Only assemble groups with this name
    #[arg(long)]
    group: Option<String>,

    /// How far vertex deduplication reaches
    #[arg(long, value_enum)]
    dedup: Option<DedupArg>,

    /// Drop primitives with bad references instead of failing
    #[arg(long)]
    skip_invalid: bool,

    /// What to do when some corners have no normal
    #[arg(long, value_enum)]
    normals: Option<NormalsArg>,

    /// Policy file (defaults to ./scop.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DedupArg {
    Assembly,
    Object,
    Group,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NormalsArg {
    Omit,
    Flat,
}

impl From<DedupArg> for DedupScope {
    fn from(arg: DedupArg) -> Self {
        match arg {
            DedupArg::Assembly => DedupScope::Assembly,
            DedupArg::Object => DedupScope::Object,
            DedupArg::Group => DedupScope::Group,
        }
    }
}

impl From<NormalsArg> for NormalPolicy {
    fn from(arg: NormalsArg) -> Self {
        match arg {
            NormalsArg::Omit => NormalPolicy::Omit,
            NormalsArg::Flat => NormalPolicy::Flat,
        }
    }
}

impl Args {
    fn assemble_options(&self) -> Result<AssembleOptions> {
        let config = match &self.config {
            Some(path) if !path.exists() => {
                bail!("Config file not found: {}", path.display());
            }

            Some(path) => Config::load(path)?,
            None => Config::load(&PathBuf::from(DEFAULT_CONFIG_FILE))?,
        };

        let mut options = config.assemble_options();

        if let Some(object) = &self.object {
            options.selection.object = Some(object.clone());
        }
        if let Some(group) = &self.group {
            options.selection.group = Some(group.clone());
        }
        if let Some(dedup) = self.dedup {
            options.dedup = dedup.into();
        }
        if self.skip_invalid {
            options.on_error = ErrorPolicy::Skip;
        }
        if let Some(normals) = self.normals {
            options.normals = normals.into();
        }

        return Ok(options);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let options = args.assemble_options()?;

    let file = File::open(&args.path)
        .with_context(|| format!("Failed to open {}", args.path.display()))?;
    let document = Document::parse(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", args.path.display()))?;
    info!("loaded {}", args.path.display());

    let assembly = document
        .assemble(&options)
        .with_context(|| format!("Failed to assemble {}", args.path.display()))?;
    let mesh = &assembly.mesh;

    let mut staged = StagedGeometry::new();
    mesh.upload_to(&mut staged)
        .context("Failed to stage geometry for upload")?;

    println!("objects: {}", document.objects.len());
    println!("groups: {}", document.group_count());
    println!("primitives: {}", document.primitive_count());
    println!("vertices: {}", mesh.vertex_count());
    println!("indices: {}", mesh.index_count());
    println!("triangles: {}", mesh.triangle_count());
    println!("attributes: {}", mesh.attributes);
    if let Some(layout) = staged.layout {
        println!(
            "vertex buffer: {} bytes, stride {}",
            staged.vertex_buffer_size(),
            layout.stride()
        );
    }
    println!("index buffer: {} bytes", staged.index_buffer_size());
    println!("skipped: {}", assembly.skipped.len());
    for error in &assembly.skipped {
        println!("  {}", error);
    }

    return Ok(());
}
