//! Collision archive data structures

use glam::Vec3;

/// Surface description shared by every shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Surface {
    /// Surface material id (concrete, grass, water, ...)
    pub material: u8,
    pub flag: u8,
    pub brightness: u8,
    pub light: u8,
}

/// Bounding volume of a model
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub radius: f32,
    pub center: Vec3,
    pub min: Vec3,
    pub max: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub surface: Surface,
}

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollisionBox {
    pub min: Vec3,
    pub max: Vec3,
    pub surface: Surface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Face {
    pub indices: [u32; 3],
    pub surface: Surface,
}

/// Triangle mesh
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.faces.is_empty()
    }
}

/// One collision primitive
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    Sphere(Sphere),
    Box(CollisionBox),
    Mesh(Mesh),
}

impl Shape {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sphere(_) => "sphere",
            Self::Box(_) => "box",
            Self::Mesh(_) => "mesh",
        }
    }
}

/// Collision for one model id.
///
/// Shapes are stored in file order: spheres, then boxes, then at most one mesh.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollisionModel {
    /// Model name; `None` when the name field is empty
    pub name: Option<String>,
    pub model_id: u16,
    pub bounds: Bounds,
    pub shapes: Vec<Shape>,
}

impl CollisionModel {
    pub fn spheres(&self) -> impl Iterator<Item = &Sphere> {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Sphere(sphere) => Some(sphere),
            _ => None,
        })
    }

    pub fn boxes(&self) -> impl Iterator<Item = &CollisionBox> {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Box(b) => Some(b),
            _ => None,
        })
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.shapes.iter().find_map(|shape| match shape {
            Shape::Mesh(mesh) => Some(mesh),
            _ => None,
        })
    }

    /// Bounds enclosing every shape
    pub fn compute_bounds(&self) -> Bounds {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for shape in &self.shapes {
            match shape {
                Shape::Sphere(sphere) => {
                    min = min.min(sphere.center - Vec3::splat(sphere.radius));
                    max = max.max(sphere.center + Vec3::splat(sphere.radius));
                }
                Shape::Box(b) => {
                    min = min.min(b.min);
                    max = max.max(b.max);
                }
                Shape::Mesh(mesh) => {
                    for vertex in &mesh.vertices {
                        min = min.min(*vertex);
                        max = max.max(*vertex);
                    }
                }
            }
        }
        if min.x > max.x {
            return Bounds::default();
        }
        let center = (min + max) * 0.5;
        Bounds {
            radius: (max - center).length(),
            center,
            min,
            max,
        }
    }
}

/// A `.col` archive: models stored back to back
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollisionFile {
    pub models: Vec<CollisionModel>,
}

impl CollisionFile {
    pub fn find(&self, name: &str) -> Option<&CollisionModel> {
        self.models
            .iter()
            .find(|model| model.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name)))
    }
}
