mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Action, CliArgs, CommonArgs, FrameFormat, Format};
use image::RgbaImage;
use img_tissue_core::prelude::*;
use img_tissue_image::{
    apply_mesh_on_image, load_texture, RasterSettings, RasterSurface, SvgSurface,
};
use obj_exporter::{Geometry, ObjSet, Object, Primitive, Shape, TVertex, Vertex};
use serde::{Deserialize, Serialize};
use std::{
    fs::{create_dir_all, read_to_string, write},
    path::{Path, PathBuf},
};
use tracing_subscriber::EnvFilter;

/// Contents of `--settings` file.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct Settings {
    #[serde(default)]
    tissue: TissueSettings,
    #[serde(default)]
    raster: RasterSettings,
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.action.common().verbose);
    run_app(args)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .init();
}

fn run_app(args: CliArgs) -> Result<()> {
    match args.action {
        Action::Mesh { common, format } => {
            let settings = load_settings(&common)?;
            let texture = load_texture(&common.input)
                .with_context(|| format!("Cannot open input image: {}", common.input.display()))?;
            let mesh = TissueMesh::build(
                texture.width() as _,
                texture.height() as _,
                settings.tissue.grid(),
            );
            export_mesh(&mesh, texture, &format, &common.output)?;
            tracing::info!(output = %common.output.display(), triangles = mesh.len(), "mesh saved");
        }
        Action::Render {
            common,
            x,
            y,
            duration,
            fps,
            zoom_out,
            frames,
            href,
        } => {
            let settings = load_settings(&common)?;
            let texture = load_texture(&common.input)
                .with_context(|| format!("Cannot open input image: {}", common.input.display()))?;
            let (width, height) = (texture.width() as Scalar, texture.height() as Scalar);
            let job = RenderJob {
                focal: Coord::new(x, y),
                duration: duration.unwrap_or(settings.tissue.duration),
                step: 1000.0 / fps as Scalar,
                direction: if zoom_out {
                    ZoomDirection::Out
                } else {
                    ZoomDirection::In
                },
                output: common.output.clone(),
                extension: frames.extension(),
            };
            create_dir_all(&job.output).with_context(|| {
                format!("Cannot create output directory: {}", job.output.display())
            })?;
            let count = match frames {
                FrameFormat::Png => {
                    let surface = RasterSurface::with_settings(texture, settings.raster.clone());
                    let tissue =
                        ImgTissue::with_settings(surface, FrameQueue::default(), &settings.tissue);
                    render_frames(tissue, (width, height), &job, |surface, path| {
                        surface
                            .render()
                            .save(path)
                            .with_context(|| format!("Cannot save frame: {}", path.display()))
                    })?
                }
                FrameFormat::Svg => {
                    let href = href.unwrap_or_else(|| common.input.display().to_string());
                    let tissue = ImgTissue::with_settings(
                        SvgSurface::new(href),
                        FrameQueue::default(),
                        &settings.tissue,
                    );
                    render_frames(tissue, (width, height), &job, |surface, path| {
                        surface
                            .save(path)
                            .with_context(|| format!("Cannot save frame: {}", path.display()))
                    })?
                }
            };
            tracing::info!(output = %job.output.display(), frames = count, "animation rendered");
        }
    }
    Ok(())
}

/// Read settings file if given and apply command-line overrides.
fn load_settings(common: &CommonArgs) -> Result<Settings> {
    let mut settings = match &common.settings {
        Some(path) => {
            let contents = read_to_string(path)
                .with_context(|| format!("Cannot read settings file: {}", path.display()))?;
            match path.extension().and_then(|ext| ext.to_str()) {
                Some("json") => serde_json::from_str::<Settings>(&contents)
                    .with_context(|| format!("Cannot parse JSON settings: {}", path.display()))?,
                Some("yaml") | Some("yml") => serde_yaml::from_str::<Settings>(&contents)
                    .with_context(|| format!("Cannot parse YAML settings: {}", path.display()))?,
                _ => bail!("Unsupported settings file format: {}", path.display()),
            }
        }
        None => Settings::default(),
    };
    if let Some(columns) = common.columns {
        settings.tissue.columns = columns;
    }
    if let Some(rows) = common.rows {
        settings.tissue.rows = rows;
    }
    if let Some(title) = &common.title {
        settings.tissue.title = title.to_owned();
    }
    if common.verbose {
        tracing::debug!("{:#?}", settings);
    }
    Ok(settings)
}

fn export_mesh(
    mesh: &TissueMesh,
    texture: RgbaImage,
    format: &Format,
    output: &Path,
) -> Result<()> {
    if format.json {
        let contents = serde_json::to_string(mesh).context("Could not serialize JSON mesh")?;
        write(output, contents).context("Could not save mesh file")?;
    } else if format.json_pretty {
        let contents =
            serde_json::to_string_pretty(mesh).context("Could not serialize pretty JSON mesh")?;
        write(output, contents).context("Could not save mesh file")?;
    } else if format.yaml {
        let contents = serde_yaml::to_string(mesh).context("Could not serialize YAML mesh")?;
        write(output, contents).context("Could not save mesh file")?;
    } else if format.obj {
        let objects = ObjSet {
            material_library: None,
            objects: vec![mesh_to_object(mesh)],
        };
        obj_exporter::export_to_file(&objects, output).context("Cannot save mesh file")?;
    } else if format.png {
        let mut image = texture;
        apply_mesh_on_image(&mut image, mesh, [0, 255, 0, 255], [255, 0, 0, 255]);
        image.save(output).context("Cannot save output image")?;
    }
    Ok(())
}

fn mesh_to_object(mesh: &TissueMesh) -> Object {
    let (width, height) = (mesh.width(), mesh.height());
    Object {
        name: "tissue".to_owned(),
        vertices: mesh
            .dst_points()
            .iter()
            .map(|p| Vertex {
                x: p.x as _,
                y: p.y as _,
                z: 0.0,
            })
            .collect::<Vec<_>>(),
        tex_vertices: mesh
            .src_points()
            .iter()
            .map(|p| TVertex {
                u: (p.x / width) as _,
                v: (p.y / height) as _,
                w: 0.0,
            })
            .collect::<Vec<_>>(),
        normals: vec![Vertex {
            x: 0.0,
            y: 0.0,
            z: 1.0,
        }],
        geometry: vec![Geometry {
            material_name: None,
            shapes: mesh
                .triangles()
                .iter()
                .map(|t| Shape {
                    primitive: Primitive::Triangle(
                        (t.a, Some(t.a), Some(0)),
                        (t.b, Some(t.b), Some(0)),
                        (t.c, Some(t.c), Some(0)),
                    ),
                    groups: vec![],
                    smoothing_groups: vec![],
                })
                .collect::<Vec<_>>(),
        }],
    }
}

struct RenderJob {
    focal: Coord,
    duration: Scalar,
    step: Scalar,
    direction: ZoomDirection,
    output: PathBuf,
    extension: &'static str,
}

impl RenderJob {
    fn frame_path(&self, index: usize) -> PathBuf {
        self.output
            .join(format!("frame_{:04}.{}", index, self.extension))
    }
}

/// Play zoom on internal frame queue and save surface after every applied frame.
///
/// # Returns
/// Number of saved frames.
fn render_frames<S, F>(
    mut tissue: ImgTissue<S, FrameQueue>,
    (width, height): (Scalar, Scalar),
    job: &RenderJob,
    mut save: F,
) -> Result<usize>
where
    S: RenderSurface,
    F: FnMut(&mut S, &Path) -> Result<()>,
{
    tissue.set_image_size(width, height)?;
    tissue.zoom(job.focal, job.duration, job.direction);
    let mut time = 0.0;
    let mut count = 0;
    while tissue.state() == AnimatorState::Animating {
        if tissue.tick(time) {
            let path = job.frame_path(count);
            save(tissue.surface_mut(), &path)?;
            tracing::debug!(frame = count, time, path = %path.display(), "frame saved");
            count += 1;
        }
        time += job.step;
    }
    Ok(count)
}
