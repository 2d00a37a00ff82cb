//! octcad CLI — octree solid modeling from the command line.
//!
//! Builds octrees from primitives, JSON scene descriptors, or OBJ meshes;
//! measures decoded trees; combines two trees with a boolean operation;
//! and exports solid leaves as a colored OBJ mesh. Trees travel between
//! commands as linear-code text files, one code per file.

use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use octcad_kernel_booleans::{combine, BoolOp};
use octcad_kernel_math::{Aabb3, Point3, Vec3};
use octcad_kernel_octree::{build, decode, surface_area, volume, OctreeNode};
use octcad_kernel_primitives::{Block, Cone, Cylinder, Primitive, Sphere};

mod obj;

#[derive(Parser)]
#[command(name = "octcad")]
#[command(about = "Octree solid modeler: build, measure, combine, export", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an octree from a solid and emit its linear code
    Build {
        /// Maximum subdivision depth
        #[arg(long, default_value_t = 5)]
        depth: u32,
        /// Write the code here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(subcommand)]
        solid: SolidCommand,
    },
    /// Decode a linear code and report volume, area, and leaf count
    Measure {
        /// Path to a linear-code file
        file: PathBuf,
        /// Min corner of the tree's outer bounds
        #[arg(long, value_parser = parse_point3, allow_hyphen_values = true, default_value = "-5,-5,-5")]
        min: Point3,
        /// Max corner of the tree's outer bounds
        #[arg(long, value_parser = parse_point3, allow_hyphen_values = true, default_value = "5,5,5")]
        max: Point3,
        /// Translate the decoded bounds by this offset
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        translate: Option<Vec3>,
        /// Scale the decoded bounds about the origin
        #[arg(long)]
        scale: Option<f64>,
    },
    /// Combine two coded trees with a boolean operation
    Combine {
        /// First linear-code file
        a: PathBuf,
        /// Second linear-code file
        b: PathBuf,
        /// Boolean operation to apply
        #[arg(long, value_enum)]
        op: OpArg,
        /// Min corner of the shared outer bounds
        #[arg(long, value_parser = parse_point3, allow_hyphen_values = true, default_value = "-5,-5,-5")]
        min: Point3,
        /// Max corner of the shared outer bounds
        #[arg(long, value_parser = parse_point3, allow_hyphen_values = true, default_value = "5,5,5")]
        max: Point3,
        /// Write the combined code here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export a coded tree's solid leaves as a colored OBJ mesh
    Export {
        /// Path to a linear-code file
        file: PathBuf,
        /// Output OBJ path
        #[arg(short, long)]
        output: PathBuf,
        /// Min corner of the tree's outer bounds
        #[arg(long, value_parser = parse_point3, allow_hyphen_values = true, default_value = "-5,-5,-5")]
        min: Point3,
        /// Max corner of the tree's outer bounds
        #[arg(long, value_parser = parse_point3, allow_hyphen_values = true, default_value = "5,5,5")]
        max: Point3,
    },
}

#[derive(Subcommand)]
enum SolidCommand {
    /// Sphere from center and radius
    Sphere {
        /// Center as x,y,z
        #[arg(long, value_parser = parse_point3, allow_hyphen_values = true, default_value = "0,0,0")]
        center: Point3,
        /// Radius
        #[arg(long)]
        radius: f64,
    },
    /// Axis-aligned block from center and full extents
    Block {
        /// Center as x,y,z
        #[arg(long, value_parser = parse_point3, allow_hyphen_values = true, default_value = "0,0,0")]
        center: Point3,
        /// Full side lengths as x,y,z
        #[arg(long, value_parser = parse_vec3)]
        extents: Vec3,
    },
    /// Cylinder along +Z from base center, radius, and height
    Cylinder {
        /// Center of the base disc as x,y,z
        #[arg(long, value_parser = parse_point3, allow_hyphen_values = true, default_value = "0,0,0")]
        center: Point3,
        /// Radius
        #[arg(long)]
        radius: f64,
        /// Height along +Z
        #[arg(long)]
        height: f64,
    },
    /// Cone along +Z from base center, base radius, and height
    Cone {
        /// Center of the base disc as x,y,z
        #[arg(long, value_parser = parse_point3, allow_hyphen_values = true, default_value = "0,0,0")]
        center: Point3,
        /// Base radius
        #[arg(long)]
        radius: f64,
        /// Height along +Z
        #[arg(long)]
        height: f64,
    },
    /// Triangle mesh from an OBJ file (v/f lines only)
    Mesh {
        /// Path to the OBJ file
        file: PathBuf,
    },
    /// Primitive descriptor from a JSON scene file
    Scene {
        /// Path to the JSON file
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OpArg {
    Union,
    Intersection,
    Difference,
}

impl From<OpArg> for BoolOp {
    fn from(op: OpArg) -> Self {
        match op {
            OpArg::Union => BoolOp::Union,
            OpArg::Intersection => BoolOp::Intersection,
            OpArg::Difference => BoolOp::Difference,
        }
    }
}

fn parse_point3(s: &str) -> Result<Point3, String> {
    let v = parse_vec3(s)?;
    Ok(Point3::from(v))
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got {s:?}"));
    }
    let mut out = [0.0; 3];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse()
            .map_err(|e| format!("bad component {part:?}: {e}"))?;
    }
    Ok(Vec3::new(out[0], out[1], out[2]))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            depth,
            output,
            solid,
        } => build_command(depth, output.as_deref(), solid),
        Commands::Measure {
            file,
            min,
            max,
            translate,
            scale,
        } => measure_command(&file, bounds_from(min, max), translate, scale),
        Commands::Combine {
            a,
            b,
            op,
            min,
            max,
            output,
        } => combine_command(&a, &b, op.into(), bounds_from(min, max), output.as_deref()),
        Commands::Export {
            file,
            output,
            min,
            max,
        } => export_command(&file, &output, bounds_from(min, max)),
    }
}

fn bounds_from(min: Point3, max: Point3) -> Aabb3 {
    Aabb3::new(min, max)
}

fn build_command(depth: u32, output: Option<&Path>, solid: SolidCommand) -> Result<()> {
    let (root, code) = match solid {
        SolidCommand::Sphere { center, radius } => {
            let p = Primitive::Sphere(Sphere { center, radius });
            build(&p, p.bounding_box(), depth)
        }
        SolidCommand::Block { center, extents } => {
            let p = Primitive::Block(Block {
                center,
                extents,
                orientation: Vec3::zeros(),
            });
            build(&p, p.bounding_box(), depth)
        }
        SolidCommand::Cylinder {
            center,
            radius,
            height,
        } => {
            let p = Primitive::Cylinder(Cylinder {
                center,
                radius,
                height,
                orientation: Vec3::zeros(),
            });
            build(&p, p.bounding_box(), depth)
        }
        SolidCommand::Cone {
            center,
            radius,
            height,
        } => {
            let p = Primitive::Cone(Cone {
                center,
                radius,
                height,
                orientation: Vec3::zeros(),
            });
            build(&p, p.bounding_box(), depth)
        }
        SolidCommand::Mesh { file } => {
            let reader = BufReader::new(
                fs::File::open(&file).with_context(|| format!("opening {}", file.display()))?,
            );
            let soup = obj::parse_obj(reader)
                .with_context(|| format!("parsing OBJ {}", file.display()))?;
            info!(
                "loaded {} vertices, {} faces from {}",
                soup.vertices.len(),
                soup.faces.len(),
                file.display()
            );
            build(&soup, soup.bounding_cube(), depth)
        }
        SolidCommand::Scene { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let p: Primitive = serde_json::from_str(&text)
                .with_context(|| format!("parsing scene {}", file.display()))?;
            build(&p, p.bounding_box(), depth)
        }
    };

    info!(
        "built tree: {} solid leaves, code length {}",
        root.solid_leaves().len(),
        code.len()
    );
    write_code(&code, output)
}

fn measure_command(
    file: &Path,
    bounds: Aabb3,
    translate: Option<Vec3>,
    scale: Option<f64>,
) -> Result<()> {
    let code = read_code(file)?;
    let mut bounds = bounds;
    if let Some(t) = translate {
        bounds = bounds.translated(&t);
    }
    if let Some(s) = scale {
        bounds = bounds.scaled(s);
    }
    let root = decode(&code, bounds).with_context(|| format!("decoding {}", file.display()))?;
    report(&root)
}

fn combine_command(
    a: &Path,
    b: &Path,
    op: BoolOp,
    bounds: Aabb3,
    output: Option<&Path>,
) -> Result<()> {
    let code_a = read_code(a)?;
    let code_b = read_code(b)?;
    let tree_a = decode(&code_a, bounds).with_context(|| format!("decoding {}", a.display()))?;
    let tree_b = decode(&code_b, bounds).with_context(|| format!("decoding {}", b.display()))?;

    let (_, code) = combine(&tree_a, &tree_b, op)?;
    // Normalization pass: the combined code re-decoded against the shared
    // bounds is what downstream commands will see.
    let merged = decode(&code, bounds).context("re-decoding combined code")?;
    info!(
        "combined {:?}: {} solid leaves, code length {}",
        op,
        merged.solid_leaves().len(),
        code.len()
    );
    report(&merged)?;
    write_code(&code, output)
}

fn export_command(file: &Path, output: &Path, bounds: Aabb3) -> Result<()> {
    let code = read_code(file)?;
    let root = decode(&code, bounds).with_context(|| format!("decoding {}", file.display()))?;
    let mesh = root.to_mesh();
    info!(
        "export: {} vertices, {} triangles",
        mesh.num_vertices(),
        mesh.num_triangles()
    );

    let mut out = String::new();
    for v in mesh.vertices.chunks(6) {
        out.push_str(&format!(
            "v {} {} {} {} {} {}\n",
            v[0], v[1], v[2], v[3], v[4], v[5]
        ));
    }
    for tri in mesh.indices.chunks(3) {
        out.push_str(&format!("f {} {} {}\n", tri[0] + 1, tri[1] + 1, tri[2] + 1));
    }
    fs::write(output, out).with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}

fn report(root: &OctreeNode) -> Result<()> {
    println!("Volume: {}", volume(root)?);
    println!("Area: {}", surface_area(root));
    println!("Solid leaves: {}", root.solid_leaves().len());
    Ok(())
}

fn read_code(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(text.trim().to_string())
}

fn write_code(code: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, format!("{code}\n"))
                .with_context(|| format!("writing {}", path.display()))?;
        }
        None => println!("{code}"),
    }
    Ok(())
}
