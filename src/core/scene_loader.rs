// Copyright @yucwang 2026

use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use log::{ debug, info, warn };
use nalgebra::Quaternion;
use thiserror::Error;

use crate::core::material::Material;
use crate::core::scene::{ Scene, SceneObject };
use crate::core::shape::Shape;
use crate::materials::dielectric::Dielectric;
use crate::materials::diffusive::Diffusive;
use crate::materials::metallic::Metallic;
use crate::math::constants::{ Float, Point3f, Rotation, Vector3f };
use crate::math::spectrum::{ Color, LightIntensity };
use crate::math::transform::Transform;
use crate::sensors::perspective::PerspectiveCamera;
use crate::shapes::cube::Cuboid;
use crate::shapes::ellipsoid::Ellipsoid;
use crate::shapes::plane::Plane;
use crate::shapes::triangle::Triangle;

#[derive(Debug, Error)]
pub enum SceneLoadError {
    #[error("failed to read scene description: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: cannot parse `{token}` as an argument of {command}")]
    InvalidNumber { line: usize, command: String, token: String },
    #[error("line {line}: {command} expects {expected} arguments, got {found}")]
    ArgumentCount { line: usize, command: String, expected: usize, found: usize },
    #[error("line {line}: {field} is specified twice")]
    Duplicate { line: usize, field: &'static str },
    #[error("{field} is not specified")]
    Missing { field: &'static str },
    #[error("primitive starting at line {line}: {field} is not specified")]
    MissingPrimitiveField { line: usize, field: &'static str },
    #[error("line {line}: {command} is only valid inside a primitive block")]
    OutsidePrimitive { line: usize, command: String },
    #[error("line {line}: {command} is only valid for {material} primitives")]
    WrongMaterial { line: usize, command: String, material: &'static str },
    #[error("line {line}: {field} is out of range")]
    OutOfRange { line: usize, field: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    pub max_depth: u32,
    pub samples_per_pixel: u32,
}

pub struct SceneDescription {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub settings: RenderSettings,
}

pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<SceneDescription, SceneLoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    info!("Loading scene description from {}.", path.display());
    load_scene_from_str(&text)
}

pub fn load_scene_from_str(text: &str) -> Result<SceneDescription, SceneLoadError> {
    let mut builder = SceneBuilder::default();

    for (idx, raw_line) in text.lines().enumerate() {
        let mut tokens = raw_line.split_whitespace();
        let command = match tokens.next() {
            Some(command) => command,
            None => continue,
        };
        let line = Line { number: idx + 1, command, args: tokens.collect() };
        builder.apply(&line)?;
    }

    builder.build()
}

struct Line<'a> {
    number: usize,
    command: &'a str,
    args: Vec<&'a str>,
}

impl<'a> Line<'a> {
    fn expect_args(&self, expected: usize) -> Result<(), SceneLoadError> {
        if self.args.len() != expected {
            return Err(SceneLoadError::ArgumentCount {
                line: self.number,
                command: self.command.to_string(),
                expected,
                found: self.args.len(),
            });
        }
        Ok(())
    }

    fn parse<T: FromStr>(&self, token: &str) -> Result<T, SceneLoadError> {
        token.parse::<T>().map_err(|_| SceneLoadError::InvalidNumber {
            line: self.number,
            command: self.command.to_string(),
            token: token.to_string(),
        })
    }

    fn floats<const N: usize>(&self) -> Result<[Float; N], SceneLoadError> {
        self.expect_args(N)?;
        let mut values = [0.0; N];
        for (value, token) in values.iter_mut().zip(&self.args) {
            *value = self.parse::<Float>(token)?;
            if !value.is_finite() {
                return Err(SceneLoadError::InvalidNumber {
                    line: self.number,
                    command: self.command.to_string(),
                    token: token.to_string(),
                });
            }
        }
        Ok(values)
    }

    fn vector(&self) -> Result<Vector3f, SceneLoadError> {
        let [x, y, z] = self.floats::<3>()?;
        Ok(Vector3f::new(x, y, z))
    }

    /// Radii or half-sizes; every component must be positive.
    fn extents(&self, field: &'static str) -> Result<Vector3f, SceneLoadError> {
        let v = self.vector()?;
        if v.iter().all(|&c| c > 0.0) {
            Ok(v)
        } else {
            Err(SceneLoadError::OutOfRange { line: self.number, field })
        }
    }

    fn point(&self) -> Result<Point3f, SceneLoadError> {
        self.vector().map(Point3f::from)
    }

    fn positive<T: FromStr + Default + PartialOrd>(&self, token: &str, field: &'static str) -> Result<T, SceneLoadError> {
        let value = self.parse::<T>(token)?;
        if value > T::default() {
            Ok(value)
        } else {
            Err(SceneLoadError::OutOfRange { line: self.number, field })
        }
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, line: &Line, field: &'static str) -> Result<(), SceneLoadError> {
    if slot.is_some() {
        return Err(SceneLoadError::Duplicate { line: line.number, field });
    }
    *slot = Some(value);
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Figure {
    Plane(Vector3f),
    Ellipsoid(Vector3f),
    Box(Vector3f),
    Triangle([Point3f; 3]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MaterialKind {
    Diffusive,
    Metallic,
    Dielectric,
}

#[derive(Default)]
struct PrimitiveBuilder {
    start_line: usize,
    figure: Option<Figure>,
    position: Option<Point3f>,
    rotation: Option<Rotation>,
    color: Option<Color>,
    emission: Option<LightIntensity>,
    material: Option<MaterialKind>,
    ior: Option<(Float, usize)>,
}

impl PrimitiveBuilder {
    fn new(start_line: usize) -> Self {
        Self { start_line, ..Default::default() }
    }

    fn is_empty(&self) -> bool {
        self.figure.is_none()
            && self.position.is_none()
            && self.rotation.is_none()
            && self.color.is_none()
            && self.emission.is_none()
            && self.material.is_none()
            && self.ior.is_none()
    }

    fn build(self) -> Result<SceneObject, SceneLoadError> {
        let missing = |field| SceneLoadError::MissingPrimitiveField { line: self.start_line, field };

        let figure = self.figure.ok_or_else(|| missing("figure"))?;
        let color = self.color.ok_or_else(|| missing("COLOR"))?;
        let transform = Transform::new(self.position.unwrap_or_else(Point3f::origin),
                                       self.rotation.unwrap_or_else(Rotation::identity));

        let shape: Arc<dyn Shape> = match figure {
            Figure::Plane(normal) => {
                Arc::new(Plane::through_point(transform.apply_vector(normal), &transform.position()))
            }
            Figure::Ellipsoid(radii) => Arc::new(Ellipsoid::new(radii, transform)),
            Figure::Box(half_size) => Arc::new(Cuboid::new(half_size, transform)),
            Figure::Triangle([p0, p1, p2]) => Arc::new(Triangle::with_transform(p0, p1, p2, &transform)),
        };

        let kind = self.material.unwrap_or(MaterialKind::Diffusive);
        match self.ior {
            Some((_, line)) if kind != MaterialKind::Dielectric => {
                return Err(SceneLoadError::WrongMaterial { line, command: "IOR".to_string(), material: "DIELECTRIC" });
            }
            _ => {}
        }
        let material: Arc<dyn Material> = match kind {
            MaterialKind::Diffusive => Arc::new(Diffusive),
            MaterialKind::Metallic => Arc::new(Metallic),
            MaterialKind::Dielectric => {
                let (ior, _) = self.ior.ok_or_else(|| missing("IOR"))?;
                Arc::new(Dielectric::new(ior))
            }
        };

        Ok(SceneObject::new(shape, color, material).with_emission(self.emission.unwrap_or(LightIntensity::NONE)))
    }
}

#[derive(Default)]
struct SceneBuilder {
    dimensions: Option<(usize, usize)>,
    background: Option<LightIntensity>,
    max_depth: Option<u32>,
    samples: Option<u32>,
    camera_position: Option<Point3f>,
    camera_right: Option<Vector3f>,
    camera_up: Option<Vector3f>,
    camera_forward: Option<Vector3f>,
    fov_x: Option<Float>,
    current: Option<PrimitiveBuilder>,
    objects: Vec<SceneObject>,
}

impl SceneBuilder {
    fn apply(&mut self, line: &Line) -> Result<(), SceneLoadError> {
        match line.command {
            "DIMENSIONS" => {
                line.expect_args(2)?;
                let width = line.positive::<usize>(line.args[0], "DIMENSIONS")?;
                let height = line.positive::<usize>(line.args[1], "DIMENSIONS")?;
                set_once(&mut self.dimensions, (width, height), line, "DIMENSIONS")
            }
            "BG_COLOR" => {
                let [r, g, b] = line.floats::<3>()?;
                set_once(&mut self.background, LightIntensity::new(r, g, b), line, "BG_COLOR")
            }
            "RAY_DEPTH" => {
                line.expect_args(1)?;
                let depth = line.parse::<u32>(line.args[0])?;
                set_once(&mut self.max_depth, depth, line, "RAY_DEPTH")
            }
            "SAMPLES" => {
                line.expect_args(1)?;
                let samples = line.positive::<u32>(line.args[0], "SAMPLES")?;
                set_once(&mut self.samples, samples, line, "SAMPLES")
            }
            "CAMERA_POSITION" => set_once(&mut self.camera_position, line.point()?, line, "CAMERA_POSITION"),
            "CAMERA_RIGHT" => set_once(&mut self.camera_right, line.vector()?, line, "CAMERA_RIGHT"),
            "CAMERA_UP" => set_once(&mut self.camera_up, line.vector()?, line, "CAMERA_UP"),
            "CAMERA_FORWARD" => set_once(&mut self.camera_forward, line.vector()?, line, "CAMERA_FORWARD"),
            "CAMERA_FOV_X" => {
                let [fov] = line.floats::<1>()?;
                set_once(&mut self.fov_x, fov, line, "CAMERA_FOV_X")
            }
            "NEW_PRIMITIVE" => {
                line.expect_args(0)?;
                self.finish_primitive()?;
                self.current = Some(PrimitiveBuilder::new(line.number));
                Ok(())
            }
            "PLANE" => self.set_figure(line, Figure::Plane(line.vector()?)),
            "ELLIPSOID" => self.set_figure(line, Figure::Ellipsoid(line.extents("ELLIPSOID")?)),
            "BOX" => self.set_figure(line, Figure::Box(line.extents("BOX")?)),
            "TRIANGLE" => {
                let v = line.floats::<9>()?;
                let vertices = [Point3f::new(v[0], v[1], v[2]),
                                Point3f::new(v[3], v[4], v[5]),
                                Point3f::new(v[6], v[7], v[8])];
                self.set_figure(line, Figure::Triangle(vertices))
            }
            "POSITION" => {
                let position = line.point()?;
                set_once(&mut self.primitive(line)?.position, position, line, "POSITION")
            }
            "ROTATION" => {
                let [x, y, z, w] = line.floats::<4>()?;
                let q = Quaternion::new(w, x, y, z);
                if !(q.norm() > 0.0) {
                    return Err(SceneLoadError::OutOfRange { line: line.number, field: "ROTATION" });
                }
                set_once(&mut self.primitive(line)?.rotation, Rotation::new_normalize(q), line, "ROTATION")
            }
            "COLOR" => {
                let [r, g, b] = line.floats::<3>()?;
                let color = Color::new(r, g, b)
                    .ok_or(SceneLoadError::OutOfRange { line: line.number, field: "COLOR" })?;
                set_once(&mut self.primitive(line)?.color, color, line, "COLOR")
            }
            "EMISSION" => {
                let [r, g, b] = line.floats::<3>()?;
                if r < 0.0 || g < 0.0 || b < 0.0 {
                    return Err(SceneLoadError::OutOfRange { line: line.number, field: "EMISSION" });
                }
                set_once(&mut self.primitive(line)?.emission, LightIntensity::new(r, g, b), line, "EMISSION")
            }
            "METALLIC" => {
                line.expect_args(0)?;
                set_once(&mut self.primitive(line)?.material, MaterialKind::Metallic, line, "material")
            }
            "DIELECTRIC" => {
                line.expect_args(0)?;
                set_once(&mut self.primitive(line)?.material, MaterialKind::Dielectric, line, "material")
            }
            "IOR" => {
                let [ior] = line.floats::<1>()?;
                if !(ior > 0.0) {
                    return Err(SceneLoadError::OutOfRange { line: line.number, field: "IOR" });
                }
                set_once(&mut self.primitive(line)?.ior, (ior, line.number), line, "IOR")
            }
            unknown => {
                warn!("line {}: unknown command {} {:?}, skipped", line.number, unknown, line.args);
                Ok(())
            }
        }
    }

    /// A figure command opens a primitive block when none is open.
    fn set_figure(&mut self, line: &Line, figure: Figure) -> Result<(), SceneLoadError> {
        let primitive = self.current.get_or_insert_with(|| PrimitiveBuilder::new(line.number));
        set_once(&mut primitive.figure, figure, line, "figure")
    }

    fn primitive(&mut self, line: &Line) -> Result<&mut PrimitiveBuilder, SceneLoadError> {
        self.current.as_mut().ok_or_else(|| SceneLoadError::OutsidePrimitive {
            line: line.number,
            command: line.command.to_string(),
        })
    }

    fn finish_primitive(&mut self) -> Result<(), SceneLoadError> {
        match self.current.take() {
            Some(primitive) if primitive.is_empty() => {
                debug!("Empty primitive block at line {} skipped.", primitive.start_line);
                Ok(())
            }
            Some(primitive) => {
                self.objects.push(primitive.build()?);
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn build(mut self) -> Result<SceneDescription, SceneLoadError> {
        self.finish_primitive()?;

        let (width, height) = self.dimensions.ok_or(SceneLoadError::Missing { field: "DIMENSIONS" })?;
        let max_depth = self.max_depth.ok_or(SceneLoadError::Missing { field: "RAY_DEPTH" })?;
        let samples_per_pixel = self.samples.ok_or(SceneLoadError::Missing { field: "SAMPLES" })?;
        let camera = PerspectiveCamera::new(
            self.camera_position.ok_or(SceneLoadError::Missing { field: "CAMERA_POSITION" })?,
            self.camera_right.ok_or(SceneLoadError::Missing { field: "CAMERA_RIGHT" })?,
            self.camera_up.ok_or(SceneLoadError::Missing { field: "CAMERA_UP" })?,
            self.camera_forward.ok_or(SceneLoadError::Missing { field: "CAMERA_FORWARD" })?,
            self.fov_x.ok_or(SceneLoadError::Missing { field: "CAMERA_FOV_X" })?,
            width,
            height,
        );

        let object_count = self.objects.len();
        let scene = Scene::new(self.objects, self.background.unwrap_or(LightIntensity::NONE));
        info!("Scene loaded: {}x{}, {} objects, {} lights.", width, height, object_count, scene.lights().len());

        Ok(SceneDescription {
            scene,
            camera,
            settings: RenderSettings { max_depth, samples_per_pixel },
        })
    }
}
