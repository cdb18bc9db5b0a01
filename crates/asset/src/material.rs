//! Material library (MTL) parsing.

use std::collections::HashMap;

use glam::Vec3;

use crate::{
    error::{LoadError, LoadResult},
    reader::{TextReader, parse_f32, parse_i64, split},
    source::AssetSource,
};

/// Material records keyed by name.
pub type MaterialLibrary = HashMap<String, Material>;

/// One of the seven texture maps a material may reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Diffuse,
    Ambient,
    SpecularColor,
    SpecularPower,
    Alpha,
    Displacement,
    Bump,
}

/// Stand-in texture bound when a slot has no map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fallback {
    Black,
    White,
    FlatNormal,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 7] = [
        TextureSlot::Diffuse,
        TextureSlot::Ambient,
        TextureSlot::SpecularColor,
        TextureSlot::SpecularPower,
        TextureSlot::Alpha,
        TextureSlot::Displacement,
        TextureSlot::Bump,
    ];

    /// What to sample when the material leaves this slot empty.
    pub fn fallback(self) -> Fallback {
        match self {
            TextureSlot::Diffuse => Fallback::Black,
            TextureSlot::Displacement => Fallback::FlatNormal,
            _ => Fallback::White,
        }
    }
}

/// Surface description from a `newmtl` block.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Material {
    pub name: String,
    pub ambient_color: Vec3,
    pub diffuse_color: Vec3,
    pub specular_color: Vec3,
    pub shininess: f32,
    pub alpha: f32,
    pub illumination: i32,
    pub diffuse_map: Option<String>,
    pub ambient_map: Option<String>,
    pub specular_color_map: Option<String>,
    pub specular_power_map: Option<String>,
    pub alpha_map: Option<String>,
    pub displacement_map: Option<String>,
    pub bump_map: Option<String>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn texture_map(&self, slot: TextureSlot) -> Option<&str> {
        match slot {
            TextureSlot::Diffuse => self.diffuse_map.as_deref(),
            TextureSlot::Ambient => self.ambient_map.as_deref(),
            TextureSlot::SpecularColor => self.specular_color_map.as_deref(),
            TextureSlot::SpecularPower => self.specular_power_map.as_deref(),
            TextureSlot::Alpha => self.alpha_map.as_deref(),
            TextureSlot::Displacement => self.displacement_map.as_deref(),
            TextureSlot::Bump => self.bump_map.as_deref(),
        }
    }

    /// Every slot that references a file.
    pub fn texture_maps(&self) -> impl Iterator<Item = (TextureSlot, &str)> {
        TextureSlot::ALL
            .into_iter()
            .filter_map(|slot| self.texture_map(slot).map(|file| (slot, file)))
    }

    fn texture_map_mut(&mut self, slot: TextureSlot) -> &mut Option<String> {
        match slot {
            TextureSlot::Diffuse => &mut self.diffuse_map,
            TextureSlot::Ambient => &mut self.ambient_map,
            TextureSlot::SpecularColor => &mut self.specular_color_map,
            TextureSlot::SpecularPower => &mut self.specular_power_map,
            TextureSlot::Alpha => &mut self.alpha_map,
            TextureSlot::Displacement => &mut self.displacement_map,
            TextureSlot::Bump => &mut self.bump_map,
        }
    }
}

/// Texture record keywords, including the historical synonyms.
fn texture_slot_for(keyword: &str) -> Option<TextureSlot> {
    Some(match keyword {
        "map_Kd" => TextureSlot::Diffuse,
        "map_Ka" => TextureSlot::Ambient,
        "map_Ks" => TextureSlot::SpecularColor,
        "map_Ns" => TextureSlot::SpecularPower,
        "map_d" => TextureSlot::Alpha,
        "map_Disp" | "disp" => TextureSlot::Displacement,
        "map_bump" | "bump" => TextureSlot::Bump,
        _ => return None,
    })
}

/// Load the named library through `source` and append its materials to `library`.
pub fn load_material_library(
    source: &dyn AssetSource,
    name: &str,
    library: &mut MaterialLibrary,
) -> LoadResult<()> {
    let bytes = source.read(name)?;
    log::info!("Loading material library: {}", source.resolve(name).display());
    let before = library.len();
    parse_material_library(&bytes, library)?;
    log::info!("{}: {} materials", name, library.len() - before);
    Ok(())
}

/// Parse MTL text from a buffer, appending to `library`.
///
/// Redeclaring a name already in `library` is an error; the existing entry
/// stays untouched.
pub fn parse_material_library(src: &[u8], library: &mut MaterialLibrary) -> LoadResult<()> {
    let mut reader = TextReader::new(src);
    let mut current: Option<String> = None;

    while let Some(line) = reader.read_line() {
        if line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix('\t').unwrap_or(line);
        let parts = split(line, ' ');

        match parts.as_slice() {
            ["newmtl", name] => {
                if library.contains_key(*name) {
                    return Err(LoadError::DuplicateMaterialName((*name).to_owned()));
                }
                log::debug!("newmtl {}", name);
                library.insert((*name).to_owned(), Material::new(*name));
                current = Some((*name).to_owned());
            }
            [keyword, value] if is_scalar_property(keyword) => {
                let material = active(library, &current)?;
                match *keyword {
                    "illum" => material.illumination = parse_i64(value) as i32,
                    "Ns" => material.shininess = parse_f32(value),
                    "d" => material.alpha = parse_f32(value),
                    "Tr" => material.alpha = 1.0 - parse_f32(value),
                    other => {
                        if let Some(slot) = texture_slot_for(other) {
                            *material.texture_map_mut(slot) = Some((*value).to_owned());
                        }
                    }
                }
            }
            [keyword @ ("Ka" | "Kd" | "Ks"), r, g, b] => {
                let material = active(library, &current)?;
                let color = Vec3::new(parse_f32(r), parse_f32(g), parse_f32(b));
                match *keyword {
                    "Ka" => material.ambient_color = color,
                    "Kd" => material.diffuse_color = color,
                    "Ks" => material.specular_color = color,
                    _ => {}
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// Two-token property records.
fn is_scalar_property(keyword: &str) -> bool {
    matches!(keyword, "illum" | "Ns" | "d" | "Tr") || texture_slot_for(keyword).is_some()
}

/// Material the current property record applies to.
fn active<'l>(
    library: &'l mut MaterialLibrary,
    current: &Option<String>,
) -> LoadResult<&'l mut Material> {
    current
        .as_ref()
        .and_then(|name| library.get_mut(name))
        .ok_or(LoadError::PropertyWithoutActiveMaterial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    fn parse(src: &str) -> LoadResult<MaterialLibrary> {
        let mut lib = MaterialLibrary::new();
        parse_material_library(src.as_bytes(), &mut lib)?;
        Ok(lib)
    }

    #[test]
    fn parses_colors_scalars_and_maps() {
        let lib = parse(
            "# comment\n\
             newmtl Brick\n\
             \tNs 96.0\n\
             \tillum 2\n\
             \tKa 0.1 0.2 0.3\n\
             \tKd 1 0 0\n\
             \tKs 0.5 0.5 0.5\n\
             \td 0.75\n\
             \tmap_Kd brick_diff.png\n\
             \tmap_Ka brick_amb.png\n\
             \tmap_Ks brick_spec.png\n\
             \tmap_Ns brick_pow.png\n\
             \tmap_d brick_alpha.png\n\
             \tdisp brick_disp.png\n\
             \tbump brick_bump.png\n",
        )
        .unwrap();

        let m = &lib["Brick"];
        assert_eq!(m.name, "Brick");
        assert_eq!(m.shininess, 96.0);
        assert_eq!(m.illumination, 2);
        assert_eq!(m.ambient_color, Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(m.diffuse_color, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(m.specular_color, Vec3::splat(0.5));
        assert_eq!(m.alpha, 0.75);
        assert_eq!(m.diffuse_map.as_deref(), Some("brick_diff.png"));
        assert_eq!(m.ambient_map.as_deref(), Some("brick_amb.png"));
        assert_eq!(m.specular_color_map.as_deref(), Some("brick_spec.png"));
        assert_eq!(m.specular_power_map.as_deref(), Some("brick_pow.png"));
        assert_eq!(m.alpha_map.as_deref(), Some("brick_alpha.png"));
        assert_eq!(m.displacement_map.as_deref(), Some("brick_disp.png"));
        assert_eq!(m.bump_map.as_deref(), Some("brick_bump.png"));
        assert_eq!(m.texture_maps().count(), 7);
    }

    #[test]
    fn synonyms_and_transparency() {
        let lib = parse("newmtl A\nmap_Disp d.png\nmap_bump b.png\nTr 0.25\n").unwrap();
        let m = &lib["A"];
        assert_eq!(m.displacement_map.as_deref(), Some("d.png"));
        assert_eq!(m.bump_map.as_deref(), Some("b.png"));
        assert_eq!(m.alpha, 0.75);
    }

    #[test]
    fn properties_apply_to_latest_material() {
        let lib = parse("newmtl A\nKd 1 0 0\nnewmtl B\nKd 0 1 0\n").unwrap();
        assert_eq!(lib["A"].diffuse_color, Vec3::X);
        assert_eq!(lib["B"].diffuse_color, Vec3::Y);
    }

    #[test]
    fn duplicate_name_fails_and_keeps_first() {
        let mut lib = MaterialLibrary::new();
        let err = parse_material_library(b"newmtl Foo\nKd 1 0 0\nnewmtl Foo\nKd 0 0 1\n", &mut lib)
            .unwrap_err();
        assert!(matches!(err, LoadError::DuplicateMaterialName(ref n) if n == "Foo"));
        assert_eq!(lib.len(), 1);
        assert_eq!(lib["Foo"].diffuse_color, Vec3::X);
    }

    #[test]
    fn duplicate_across_libraries_fails() {
        let mut lib = MaterialLibrary::new();
        parse_material_library(b"newmtl Foo\n", &mut lib).unwrap();
        let err = parse_material_library(b"newmtl Foo\n", &mut lib).unwrap_err();
        assert_eq!(err.code(), 12);
    }

    #[test]
    fn property_before_newmtl_fails() {
        let err = parse("Kd 1 1 1\nnewmtl A\n").unwrap_err();
        assert!(matches!(err, LoadError::PropertyWithoutActiveMaterial));
        let err = parse("map_Kd a.png\n").unwrap_err();
        assert_eq!(err.code(), 20);
    }

    #[test]
    fn unknown_records_are_ignored() {
        let lib = parse("Ni 1.5\nnewmtl A\nTf 1 1 1\nKe 0 0 0\nsharpness 60\nKd 1 2\n").unwrap();
        assert_eq!(lib["A"], Material::new("A"));
    }

    #[test]
    fn wrong_arity_before_newmtl_is_ignored() {
        let lib = parse("Kd 1\nNs 1 2 3\nmap_Kd a b c\nnewmtl A\n").unwrap();
        assert_eq!(lib["A"], Material::new("A"));
    }

    #[test]
    fn fallbacks_per_slot() {
        assert_eq!(TextureSlot::Diffuse.fallback(), Fallback::Black);
        assert_eq!(TextureSlot::Displacement.fallback(), Fallback::FlatNormal);
        assert_eq!(TextureSlot::SpecularColor.fallback(), Fallback::White);
        assert_eq!(TextureSlot::SpecularPower.fallback(), Fallback::White);
    }

    #[test]
    fn load_reports_missing_library() {
        let src = MemorySource::new();
        let mut lib = MaterialLibrary::new();
        let err = load_material_library(&src, "nope.mtl", &mut lib).unwrap_err();
        assert_eq!(err.code(), 1);
    }
}
