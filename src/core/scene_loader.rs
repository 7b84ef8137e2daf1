// Copyright @yucwang 2026

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::core::material::MaterialTable;
use crate::core::settings::RenderSettings;
use crate::emitters::background::Background;
use crate::emitters::light_list::LightList;
use crate::emitters::point::PointLight;
use crate::materials::dielectric::Dielectric;
use crate::materials::lambertian_diffuse::LambertianDiffuse;
use crate::materials::mirror::Mirror;
use crate::math::constants::{Float, Matrix4f, Point3f, Vector3f};
use crate::math::spectrum::RGBSpectrum;
use crate::math::transform::Transform;
use crate::sensors::perspective::PerspectiveCamera;
use crate::shapes::group::ShapeGroup;
use crate::shapes::rectangle::Rectangle;
use crate::shapes::sphere::Sphere;

#[derive(Debug)]
pub enum SceneLoadError {
    Io(std::io::Error),
    Parse(String),
    MissingField(&'static str),
}

impl fmt::Display for SceneLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneLoadError::Io(e) => write!(f, "failed to read scene: {}", e),
            SceneLoadError::Parse(msg) => write!(f, "failed to parse scene: {}", msg),
            SceneLoadError::MissingField(field) => write!(f, "scene is missing required field '{}'", field),
        }
    }
}

impl std::error::Error for SceneLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneLoadError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SceneLoadError {
    fn from(err: std::io::Error) -> Self {
        SceneLoadError::Io(err)
    }
}

impl From<quick_xml::Error> for SceneLoadError {
    fn from(err: quick_xml::Error) -> Self {
        SceneLoadError::Parse(err.to_string())
    }
}

/// Everything a scene file describes, ready to hand to a `PathEngine`.
pub struct SceneDescription {
    /// Defaults overridden by the file's integrator, sampler and film.
    pub settings: RenderSettings,
    pub camera: PerspectiveCamera,
    pub materials: MaterialTable,
    pub shapes: ShapeGroup,
    pub lights: LightList,
}

pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<SceneDescription, SceneLoadError> {
    let path = path.as_ref();
    log::info!("Loading scene from {}.", path.display());
    let xml = fs::read_to_string(path)?;
    parse_scene(&xml)
}

const OBJECT_TAGS: [&str; 8] = ["integrator", "sensor", "film", "sampler", "bsdf", "shape", "emitter", "transform"];

/// One open object element and the properties collected for it so far.
struct Node {
    tag: String,
    kind: String,
    id: Option<String>,
    props: HashMap<String, String>,
    refs: Vec<String>,
    to_world: Option<Matrix4f>,
    lookat: Option<(Vector3f, Vector3f, Vector3f)>,
    material: Option<usize>,
}

impl Node {
    fn new(tag: &str, attrs: &HashMap<String, String>) -> Self {
        Self {
            tag: tag.to_string(),
            kind: attrs.get("type").cloned().unwrap_or_default(),
            id: attrs.get("id").cloned(),
            props: HashMap::new(),
            refs: Vec::new(),
            to_world: if tag == "transform" { Some(Matrix4f::identity()) } else { None },
            lookat: None,
            material: None,
        }
    }

    fn float(&self, name: &str, default: Float) -> Result<Float, SceneLoadError> {
        self.props.get(name).map_or(Ok(default), |v| parse_float(v))
    }

    fn spectrum(&self, name: &str, default: RGBSpectrum) -> Result<RGBSpectrum, SceneLoadError> {
        self.props.get(name).map_or(Ok(default), |v| parse_spectrum(v))
    }

    fn transform(&self) -> Result<Transform, SceneLoadError> {
        Transform::try_new(self.to_world.unwrap_or_else(Matrix4f::identity))
            .ok_or_else(|| SceneLoadError::Parse(format!("singular to_world transform on <{}>", self.tag)))
    }
}

struct SceneBuilder {
    defaults: HashMap<String, String>,
    stack: Vec<Node>,
    settings: RenderSettings,
    camera: Option<PerspectiveCamera>,
    materials: MaterialTable,
    named_materials: HashMap<String, usize>,
    default_material: Option<usize>,
    shapes: ShapeGroup,
    lights: LightList,
}

pub fn parse_scene(xml: &str) -> Result<SceneDescription, SceneLoadError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    let mut builder = SceneBuilder {
        defaults: HashMap::new(),
        stack: Vec::new(),
        settings: RenderSettings::default(),
        camera: None,
        materials: MaterialTable::new(),
        named_materials: HashMap::new(),
        default_material: None,
        shapes: ShapeGroup::new(),
        lights: LightList::default(),
    };

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                let (tag, attrs) = builder.read_element(&e)?;
                if OBJECT_TAGS.contains(&tag.as_str()) {
                    builder.stack.push(Node::new(&tag, &attrs));
                } else {
                    builder.leaf(&tag, &attrs)?;
                }
            }
            Ok(Event::Empty(e)) => {
                let (tag, attrs) = builder.read_element(&e)?;
                if OBJECT_TAGS.contains(&tag.as_str()) {
                    builder.stack.push(Node::new(&tag, &attrs));
                    builder.close(&tag)?;
                } else {
                    builder.leaf(&tag, &attrs)?;
                }
            }
            Ok(Event::End(e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if OBJECT_TAGS.contains(&tag.as_str()) {
                    builder.close(&tag)?;
                }
            }
            Err(e) => {
                return Err(SceneLoadError::Parse(e.to_string()));
            }
            _ => {}
        }

        buf.clear();
    }

    builder.finish()
}

impl SceneBuilder {
    fn read_element(&self, e: &BytesStart) -> Result<(String, HashMap<String, String>), SceneLoadError> {
        let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
        let mut attrs = HashMap::new();
        for attr in e.attributes().flatten() {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr.unescape_value()
                .map_err(|err| SceneLoadError::Parse(err.to_string()))?;
            attrs.insert(key, resolve_value(&value, &self.defaults));
        }
        Ok((tag, attrs))
    }

    fn leaf(&mut self, tag: &str, attrs: &HashMap<String, String>) -> Result<(), SceneLoadError> {
        match tag {
            "scene" => {}
            "default" => {
                let name = attrs.get("name").ok_or(SceneLoadError::MissingField("default.name"))?;
                let value = attrs.get("value").ok_or(SceneLoadError::MissingField("default.value"))?;
                self.defaults.insert(name.clone(), value.clone());
            }
            "float" | "integer" | "boolean" | "string" | "rgb" | "spectrum" | "point" | "vector" => {
                let name = attrs.get("name").ok_or(SceneLoadError::MissingField("property.name"))?;
                let value = attrs.get("value").ok_or(SceneLoadError::MissingField("property.value"))?;
                match self.stack.last_mut() {
                    Some(node) => {
                        node.props.insert(name.clone(), value.clone());
                    }
                    None => log::warn!("ignoring top-level property '{}'", name),
                }
            }
            "ref" => {
                let id = attrs.get("id").ok_or(SceneLoadError::MissingField("ref.id"))?;
                if let Some(node) = self.stack.last_mut() {
                    node.refs.push(id.clone());
                }
            }
            "translate" | "scale" | "rotate" | "lookat" => self.transform_op(tag, attrs)?,
            other => log::debug!("skipping unsupported element <{}>", other),
        }
        Ok(())
    }

    fn transform_op(&mut self, tag: &str, attrs: &HashMap<String, String>) -> Result<(), SceneLoadError> {
        let node = match self.stack.last_mut() {
            Some(node) if node.tag == "transform" => node,
            _ => {
                log::warn!("<{}> outside of a transform is ignored", tag);
                return Ok(());
            }
        };
        let axis = |default: Float| -> Result<Vector3f, SceneLoadError> {
            let get = |k: &str| attrs.get(k).map_or(Ok(default), |v| parse_float(v));
            Ok(Vector3f::new(get("x")?, get("y")?, get("z")?))
        };

        let op = match tag {
            "translate" => Matrix4f::new_translation(&axis(0.0)?),
            "scale" => {
                let s = match attrs.get("value") {
                    Some(v) => Vector3f::repeat(parse_float(v)?),
                    None => axis(1.0)?,
                };
                Matrix4f::new_nonuniform_scaling(&s)
            }
            "rotate" => {
                let angle = attrs.get("angle").ok_or(SceneLoadError::MissingField("rotate.angle"))?;
                let angle = parse_float(angle)?.to_radians();
                let axis = axis(0.0)?;
                if axis.norm() == 0.0 {
                    return Err(SceneLoadError::Parse("rotate axis must be non-zero".to_string()));
                }
                Matrix4f::from_axis_angle(&nalgebra::Unit::new_normalize(axis), angle)
            }
            _ => {
                let origin = parse_vec3(attrs.get("origin").ok_or(SceneLoadError::MissingField("lookat.origin"))?)?;
                let target = parse_vec3(attrs.get("target").ok_or(SceneLoadError::MissingField("lookat.target"))?)?;
                let up = match attrs.get("up") {
                    Some(v) => parse_vec3(v)?,
                    None => Vector3f::new(0.0, 1.0, 0.0),
                };
                node.lookat = Some((origin, target, up));
                Matrix4f::face_towards(&Point3f::from(origin), &Point3f::from(target), &up)
            }
        };

        let current = node.to_world.unwrap_or_else(Matrix4f::identity);
        node.to_world = Some(op * current);
        Ok(())
    }

    fn close(&mut self, tag: &str) -> Result<(), SceneLoadError> {
        let node = match self.stack.pop() {
            Some(node) if node.tag == tag => node,
            _ => return Err(SceneLoadError::Parse(format!("unexpected closing tag </{}>", tag))),
        };

        match tag {
            "film" | "sampler" => {
                if let Some(parent) = self.stack.last_mut() {
                    parent.props.extend(node.props);
                }
            }
            "transform" => {
                if let Some(parent) = self.stack.last_mut() {
                    parent.to_world = node.to_world;
                    parent.lookat = node.lookat;
                }
            }
            "integrator" => self.apply_integrator(&node)?,
            "sensor" => self.build_sensor(&node)?,
            "bsdf" => {
                let id = self.build_material(&node)?;
                if let Some(name) = node.id {
                    self.named_materials.insert(name, id);
                }
                if let Some(parent) = self.stack.last_mut() {
                    if parent.tag == "shape" {
                        parent.material = Some(id);
                    }
                }
            }
            "shape" => self.build_shape(&node)?,
            "emitter" => {
                let inside_shape = self.stack.last().map_or(false, |parent| parent.tag == "shape");
                if inside_shape {
                    log::warn!("area emitters are not supported, ignoring emitter of type '{}'", node.kind);
                } else {
                    self.build_emitter(&node)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn apply_integrator(&mut self, node: &Node) -> Result<(), SceneLoadError> {
        match node.kind.as_str() {
            "path" => {}
            "ptracer" | "light" => self.settings.light_paths = true,
            other => return Err(SceneLoadError::Parse(format!("unsupported integrator: {}", other))),
        }

        if let Some(v) = node.props.get("max_depth") {
            let depth = parse_i64(v)?;
            if depth >= 1 {
                self.settings.max_depth = depth as u32;
            } else {
                log::warn!("max_depth {} is unbounded, keeping {}", depth, self.settings.max_depth);
            }
        }
        if let Some(v) = node.props.get("survive_rate") {
            self.settings.survive_rate = parse_float(v)?;
        }
        if let Some(v) = node.props.get("light_paths") {
            self.settings.light_paths = parse_bool(v)?;
        }
        if let Some(v) = node.props.get("light_lanes") {
            self.settings.light_lanes = parse_i64(v)?.max(0) as usize;
        }
        if let Some(v) = node.props.get("passes") {
            self.settings.passes = parse_i64(v)?.max(0) as u32;
        }
        if let Some(v) = node.props.get("seed") {
            self.settings.seed = parse_i64(v)? as u64;
        }
        Ok(())
    }

    fn build_sensor(&mut self, node: &Node) -> Result<(), SceneLoadError> {
        if node.kind != "perspective" {
            return Err(SceneLoadError::Parse(format!("unsupported sensor: {}", node.kind)));
        }
        if self.camera.is_some() {
            log::warn!("scene has more than one sensor, keeping the first");
            return Ok(());
        }

        if let Some(v) = node.props.get("width") {
            self.settings.width = parse_i64(v)?.max(0) as usize;
        }
        if let Some(v) = node.props.get("height") {
            self.settings.height = parse_i64(v)?.max(0) as usize;
        }
        if let Some(v) = node.props.get("sample_count") {
            self.settings.passes = parse_i64(v)?.max(0) as u32;
        }

        let mut camera = PerspectiveCamera::default();
        match (node.lookat, node.to_world) {
            (Some((origin, target, up)), _) => {
                camera.origin = origin;
                camera.target = target;
                camera.up = up;
            }
            (None, Some(_)) => {
                let t = node.transform()?;
                camera.origin = t.apply_point(Vector3f::zeros());
                camera.target = t.apply_point(Vector3f::new(0.0, 0.0, 1.0));
                camera.up = t.apply_vector(Vector3f::new(0.0, 1.0, 0.0));
            }
            (None, None) => {}
        }
        camera.fov_y_radians = node.float("fov", 45.0)?.to_radians();
        camera.near_clip = node.float("near_clip", camera.near_clip)?;
        camera.far_clip = node.float("far_clip", camera.far_clip)?;
        if self.settings.height > 0 {
            camera.aspect = self.settings.width as Float / self.settings.height as Float;
        }

        self.camera = Some(camera);
        Ok(())
    }

    fn build_material(&mut self, node: &Node) -> Result<usize, SceneLoadError> {
        let id = match node.kind.as_str() {
            "diffuse" => {
                let albedo = node.spectrum("reflectance", RGBSpectrum::splat(0.5))?;
                self.materials.add(Arc::new(LambertianDiffuse::new(albedo)))
            }
            "mirror" | "conductor" => {
                let reflectance = node.spectrum("specular_reflectance", RGBSpectrum::splat(1.0))?;
                self.materials.add(Arc::new(Mirror::new(reflectance)))
            }
            "dielectric" => {
                let int_ior = node.float("int_ior", 1.5046)?;
                let ext_ior = node.float("ext_ior", 1.000277)?;
                let reflectance = node.spectrum("specular_reflectance", RGBSpectrum::splat(1.0))?;
                let transmittance = node.spectrum("specular_transmittance", RGBSpectrum::splat(1.0))?;
                self.materials.add(Arc::new(Dielectric::with_tint(int_ior, ext_ior, reflectance, transmittance)))
            }
            other => return Err(SceneLoadError::Parse(format!("unsupported bsdf: {}", other))),
        };
        log::debug!("bsdf '{}' ({}) registered as material {}", node.id.as_deref().unwrap_or(""), node.kind, id);
        Ok(id)
    }

    fn shape_material(&mut self, node: &Node) -> usize {
        if let Some(id) = node.material {
            return id;
        }
        if let Some(name) = node.refs.first() {
            return match self.named_materials.get(name) {
                Some(id) => *id,
                None => {
                    log::warn!("shape references undefined bsdf '{}'", name);
                    usize::MAX
                }
            };
        }
        match self.default_material {
            Some(id) => id,
            None => {
                let id = self.materials.add(Arc::new(LambertianDiffuse::new(RGBSpectrum::splat(0.5))));
                self.default_material = Some(id);
                id
            }
        }
    }

    fn build_shape(&mut self, node: &Node) -> Result<(), SceneLoadError> {
        let to_world = node.transform()?;
        let material = self.shape_material(node);
        match node.kind.as_str() {
            "sphere" => {
                let center = match node.props.get("center") {
                    Some(v) => parse_vec3(v)?,
                    None => Vector3f::zeros(),
                };
                let radius = node.float("radius", 1.0)?;
                let scale = to_world.apply_vector(Vector3f::new(1.0, 0.0, 0.0)).norm();
                let sphere = Sphere::new(to_world.apply_point(center), radius * scale);
                self.shapes.add(Box::new(sphere), material);
            }
            "rectangle" => {
                self.shapes.add(Box::new(Rectangle::new(to_world)), material);
            }
            other => return Err(SceneLoadError::Parse(format!("unsupported shape: {}", other))),
        }
        Ok(())
    }

    fn build_emitter(&mut self, node: &Node) -> Result<(), SceneLoadError> {
        match node.kind.as_str() {
            "point" => {
                let position = match (node.props.get("position"), node.to_world) {
                    (Some(v), _) => parse_vec3(v)?,
                    (None, Some(_)) => node.transform()?.apply_point(Vector3f::zeros()),
                    (None, None) => Vector3f::zeros(),
                };
                let intensity = node.spectrum("intensity", RGBSpectrum::splat(1.0))?;
                self.lights.add(PointLight::new(position, intensity));
            }
            "constant" => {
                let radiance = node.spectrum("radiance", RGBSpectrum::splat(1.0))?;
                self.lights.set_background(Background::Constant(radiance));
            }
            "sky" => {
                let zenith = node.spectrum("zenith", RGBSpectrum::new(0.4, 0.6, 0.9))?;
                let horizon = node.spectrum("horizon", RGBSpectrum::new(0.8, 0.85, 0.9))?;
                let ground = node.spectrum("ground", RGBSpectrum::new(0.15, 0.1, 0.08))?;
                self.lights.set_background(Background::Sky { zenith, horizon, ground });
            }
            other => return Err(SceneLoadError::Parse(format!("unsupported emitter: {}", other))),
        }
        Ok(())
    }

    fn finish(self) -> Result<SceneDescription, SceneLoadError> {
        if let Some(node) = self.stack.last() {
            return Err(SceneLoadError::Parse(format!("unclosed element <{}>", node.tag)));
        }
        let camera = self.camera.ok_or(SceneLoadError::MissingField("sensor"))?;
        log::info!("Scene loaded: {} shapes, {} materials, {} lights.",
                   self.shapes.len(), self.materials.len(), self.lights.lights().len());

        Ok(SceneDescription {
            settings: self.settings,
            camera,
            materials: self.materials,
            shapes: self.shapes,
            lights: self.lights,
        })
    }
}

// Longest names first, so `$spp` never eats the prefix of `$spp_max`.
fn resolve_value(raw: &str, defaults: &HashMap<String, String>) -> String {
    if !raw.contains('$') {
        return raw.to_string();
    }
    let mut names: Vec<&String> = defaults.keys().collect();
    names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let mut out = raw.to_string();
    for k in names {
        out = out.replace(&format!("${}", k), &defaults[k]);
    }
    out
}

fn parse_float(value: &str) -> Result<Float, SceneLoadError> {
    value.trim().parse::<Float>().map_err(|_| SceneLoadError::Parse(format!("invalid float: {}", value)))
}

fn parse_i64(value: &str) -> Result<i64, SceneLoadError> {
    value.trim().parse::<i64>().map_err(|_| SceneLoadError::Parse(format!("invalid integer: {}", value)))
}

fn parse_bool(value: &str) -> Result<bool, SceneLoadError> {
    match value.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(SceneLoadError::Parse(format!("invalid boolean: {}", other))),
    }
}

fn parse_floats(value: &str) -> Result<Vec<Float>, SceneLoadError> {
    value.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(parse_float)
        .collect()
}

fn parse_vec3(value: &str) -> Result<Vector3f, SceneLoadError> {
    match parse_floats(value)?.as_slice() {
        [x, y, z] => Ok(Vector3f::new(*x, *y, *z)),
        _ => Err(SceneLoadError::Parse(format!("invalid vec3: {}", value))),
    }
}

fn parse_spectrum(value: &str) -> Result<RGBSpectrum, SceneLoadError> {
    match parse_floats(value)?.as_slice() {
        [v] => Ok(RGBSpectrum::splat(*v)),
        [r, g, b] => Ok(RGBSpectrum::new(*r, *g, *b)),
        _ => Err(SceneLoadError::Parse(format!("invalid color: {}", value))),
    }
}
