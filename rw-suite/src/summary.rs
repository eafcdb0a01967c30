//! Human and JSON readable overview of a decoded asset

use serde::Serialize;

use rw_core::{Decoded, RwVersion, Warning};
use rw_ide::IdeRows;
use rw_ipl::IplRows;

use crate::registry::{Asset, FormatKind};

/// One labelled figure of a summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stat {
    pub label: &'static str,
    pub value: String,
}

impl Stat {
    fn new(label: &'static str, value: impl ToString) -> Self {
        Self {
            label,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub format: FormatKind,
    pub description: &'static str,
    pub stats: Vec<Stat>,
    pub warnings: Vec<String>,
}

impl Summary {
    pub fn new(decoded: &Decoded<Asset>) -> Self {
        let format = decoded.value.kind();
        Self {
            format,
            description: format.describe(),
            stats: stats(&decoded.value),
            warnings: decoded.warnings.iter().map(Warning::to_string).collect(),
        }
    }
}

/// `3.6.0.3 (San Andreas)`, or the bare version when no game is known
pub fn version_label(version: RwVersion) -> String {
    match version.game() {
        Some(game) => format!("{version} ({game})"),
        None => version.to_string(),
    }
}

fn stats(asset: &Asset) -> Vec<Stat> {
    match asset {
        Asset::Model(clump) => vec![
            Stat::new("RenderWare version", version_label(clump.version)),
            Stat::new("Frames", clump.frames.len()),
            Stat::new("Geometries", clump.geometries.len()),
            Stat::new("Atomics", clump.atomics.len()),
            Stat::new(
                "Vertices",
                clump
                    .geometries
                    .iter()
                    .map(|g| g.vertex_count as usize)
                    .sum::<usize>(),
            ),
            Stat::new("Triangles", clump.triangle_count()),
            Stat::new(
                "Materials",
                clump
                    .geometries
                    .iter()
                    .map(|g| g.materials.len())
                    .sum::<usize>(),
            ),
        ],
        Asset::TextureDictionary(dictionary) => {
            let mut stats = vec![
                Stat::new("RenderWare version", version_label(dictionary.version)),
                Stat::new("Textures", dictionary.textures.len()),
            ];
            stats.extend(dictionary.textures.iter().map(|texture| {
                let pixels = match texture.compression() {
                    Some(compression) => format!("{compression:?}"),
                    None => format!("{:?}", texture.raster_format.pixel_format()),
                };
                Stat::new(
                    "Texture",
                    format!(
                        "{} {}x{} {pixels}, {} levels",
                        texture.name,
                        texture.width,
                        texture.height,
                        texture.mipmaps.len()
                    ),
                )
            }));
            stats
        }
        Asset::Collision(file) => {
            let mut stats = vec![Stat::new("Models", file.models.len())];
            stats.extend(file.models.iter().map(|model| {
                Stat::new(
                    "Model",
                    format!(
                        "{} (id {}): {} spheres, {} boxes, {} faces",
                        model.name.as_deref().unwrap_or("<unnamed>"),
                        model.model_id,
                        model.spheres().count(),
                        model.boxes().count(),
                        model.mesh().map_or(0, |mesh| mesh.faces.len())
                    ),
                )
            }));
            stats
        }
        Asset::Animation(package) => {
            let mut stats = vec![
                Stat::new("Package", &package.name),
                Stat::new("Layout", package.format),
                Stat::new("Animations", package.animations.len()),
            ];
            stats.extend(package.animations.iter().map(|animation| {
                Stat::new(
                    "Animation",
                    format!(
                        "{}: {} tracks, {:.3}s",
                        animation.name,
                        animation.tracks.len(),
                        animation.duration()
                    ),
                )
            }));
            stats
        }
        Asset::Definitions(file) => {
            let mut stats = vec![Stat::new("Sections", file.sections.len())];
            stats.extend(file.sections.iter().map(|section| {
                let typed = if matches!(section.rows, IdeRows::Raw(_)) {
                    "raw"
                } else {
                    "typed"
                };
                Stat::new(
                    "Section",
                    format!("{}: {} {typed} rows", section.name, section.rows.len()),
                )
            }));
            stats
        }
        Asset::Placements(file) => {
            let mut stats = vec![Stat::new("Sections", file.sections.len())];
            stats.extend(file.sections.iter().map(|section| {
                let typed = if matches!(section.rows, IplRows::Raw(_)) {
                    "raw"
                } else {
                    "typed"
                };
                Stat::new(
                    "Section",
                    format!("{}: {} {typed} rows", section.name, section.rows.len()),
                )
            }));
            stats
        }
        Asset::Archive(archive) => {
            let mut stats = vec![
                Stat::new("Entries", archive.entries.len()),
                Stat::new("Sectors", archive.total_sectors()),
            ];
            stats.extend(archive.entries.iter().map(|entry| {
                Stat::new(
                    "Entry",
                    format!("{}: {} sectors", entry.name, entry.sectors()),
                )
            }));
            stats
        }
    }
}
