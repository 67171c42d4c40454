//! Material records from MTL files.

use crate::error::{ObjError, ObjResult};
use crate::texture::{ImfChannel, TextureOptions};
use crate::types::FloatTuple;

/// Shininess (`Ns`) of a material that never sets it.
pub const DEFAULT_SHININESS: f32 = 100.0;

/// Opacity (`d`) of a material that never sets it.
pub const DEFAULT_OPACITY: f32 = 1.0;

/// Illumination model selected with `illum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IlluminationMode {
    ColorOnAmbientOff,
    ColorOnAmbientOn,
    HighlightOn,
    ReflectionOnRayTraceOn,
    TransparencyGlassOnReflectionRayTraceOn,
    ReflectionFresnelOnRayTraceOn,
    TransparencyRefractionOnReflectionFresnelOffRayTraceOn,
    TransparencyRefractionOnReflectionFresnelOnRayTraceOn,
    ReflectionOnRayTraceOff,
    TransparencyGlassOnReflectionRayTraceOff,
    ShadowOnInvisibleSurfaces,
}

impl IlluminationMode {
    const BY_CODE: [IlluminationMode; 11] = [
        IlluminationMode::ColorOnAmbientOff,
        IlluminationMode::ColorOnAmbientOn,
        IlluminationMode::HighlightOn,
        IlluminationMode::ReflectionOnRayTraceOn,
        IlluminationMode::TransparencyGlassOnReflectionRayTraceOn,
        IlluminationMode::ReflectionFresnelOnRayTraceOn,
        IlluminationMode::TransparencyRefractionOnReflectionFresnelOffRayTraceOn,
        IlluminationMode::TransparencyRefractionOnReflectionFresnelOnRayTraceOn,
        IlluminationMode::ReflectionOnRayTraceOff,
        IlluminationMode::TransparencyGlassOnReflectionRayTraceOff,
        IlluminationMode::ShadowOnInvisibleSurfaces,
    ];

    /// Map an `illum` code (0 to 10) to its mode.
    pub fn from_code(code: i64) -> ObjResult<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::BY_CODE.get(i).copied())
            .ok_or_else(|| ObjError::MalformedIndex {
                line: 0,
                details: format!("illumination mode {} is not in 0..=10", code),
            })
    }

    /// The `illum` code of this mode.
    pub fn code(self) -> u8 {
        Self::BY_CODE
            .iter()
            .position(|m| *m == self)
            .map_or(0, |i| i as u8)
    }
}

/// One named material.
///
/// Colors default to black, `ns` to [`DEFAULT_SHININESS`] and `d` to
/// [`DEFAULT_OPACITY`]. Optional properties are `None` until a directive
/// sets them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mtl {
    pub name: String,

    /// Ambient color (`Ka`).
    pub ka: FloatTuple,
    /// Diffuse color (`Kd`).
    pub kd: FloatTuple,
    /// Specular color (`Ks`).
    pub ks: FloatTuple,
    /// Transmission filter (`Tf`).
    pub tf: Option<FloatTuple>,
    /// Emissive color (`Ke`).
    pub ke: Option<FloatTuple>,

    /// Specular exponent (`Ns`).
    pub ns: f32,
    /// Optical density (`Ni`).
    pub ni: Option<f32>,
    /// Opacity (`d`, or `1 - Tr`).
    pub d: f32,
    /// Whether `d` was given with `-halo`.
    pub halo: bool,
    pub sharpness: Option<f32>,
    pub illum: Option<IlluminationMode>,

    // PBR extension scalars.
    pub pr: Option<f32>,
    pub pm: Option<f32>,
    pub ps: Option<f32>,
    pub pc: Option<f32>,
    pub pcr: Option<f32>,
    pub aniso: Option<f32>,
    pub anisor: Option<f32>,

    pub map_ka: Option<TextureOptions>,
    pub map_kd: Option<TextureOptions>,
    pub map_ks: Option<TextureOptions>,
    pub map_ns: Option<TextureOptions>,
    pub map_d: Option<TextureOptions>,
    pub bump: Option<TextureOptions>,
    pub disp: Option<TextureOptions>,
    pub decal: Option<TextureOptions>,
    /// Reflection maps; `refl` may appear several times.
    pub refl: Vec<TextureOptions>,
    pub map_pr: Option<TextureOptions>,
    pub map_pm: Option<TextureOptions>,
    pub map_ps: Option<TextureOptions>,
    pub map_ke: Option<TextureOptions>,
    pub norm: Option<TextureOptions>,
}

impl Mtl {
    /// Create a material with default values.
    pub fn new(name: impl Into<String>) -> Self {
        let black = FloatTuple::new3(0.0, 0.0, 0.0);
        Self {
            name: name.into(),
            ka: black,
            kd: black,
            ks: black,
            tf: None,
            ke: None,
            ns: DEFAULT_SHININESS,
            ni: None,
            d: DEFAULT_OPACITY,
            halo: false,
            sharpness: None,
            illum: None,
            pr: None,
            pm: None,
            ps: None,
            pc: None,
            pcr: None,
            aniso: None,
            anisor: None,
            map_ka: None,
            map_kd: None,
            map_ks: None,
            map_ns: None,
            map_d: None,
            bump: None,
            disp: None,
            decal: None,
            refl: Vec::new(),
            map_pr: None,
            map_pm: None,
            map_ps: None,
            map_ke: None,
            norm: None,
        }
    }

    /// Transparency, the complement of opacity.
    pub fn tr(&self) -> f32 {
        1.0 - self.d
    }

    /// Set opacity from a transparency value (`Tr`).
    pub fn set_tr(&mut self, tr: f32) {
        self.d = 1.0 - tr;
    }

    /// The single-slot texture map selected by `slot`.
    pub fn map(&self, slot: MapSlot) -> Option<&TextureOptions> {
        match slot {
            MapSlot::Ambient => self.map_ka.as_ref(),
            MapSlot::Diffuse => self.map_kd.as_ref(),
            MapSlot::Specular => self.map_ks.as_ref(),
            MapSlot::Shininess => self.map_ns.as_ref(),
            MapSlot::Opacity => self.map_d.as_ref(),
            MapSlot::Bump => self.bump.as_ref(),
            MapSlot::Displacement => self.disp.as_ref(),
            MapSlot::Decal => self.decal.as_ref(),
            MapSlot::Roughness => self.map_pr.as_ref(),
            MapSlot::Metallic => self.map_pm.as_ref(),
            MapSlot::Sheen => self.map_ps.as_ref(),
            MapSlot::Emissive => self.map_ke.as_ref(),
            MapSlot::Normal => self.norm.as_ref(),
        }
    }

    /// Mutable access to the texture map selected by `slot`.
    pub fn map_mut(&mut self, slot: MapSlot) -> &mut Option<TextureOptions> {
        match slot {
            MapSlot::Ambient => &mut self.map_ka,
            MapSlot::Diffuse => &mut self.map_kd,
            MapSlot::Specular => &mut self.map_ks,
            MapSlot::Shininess => &mut self.map_ns,
            MapSlot::Opacity => &mut self.map_d,
            MapSlot::Bump => &mut self.bump,
            MapSlot::Displacement => &mut self.disp,
            MapSlot::Decal => &mut self.decal,
            MapSlot::Roughness => &mut self.map_pr,
            MapSlot::Metallic => &mut self.map_pm,
            MapSlot::Sheen => &mut self.map_ps,
            MapSlot::Emissive => &mut self.map_ke,
            MapSlot::Normal => &mut self.norm,
        }
    }
}

/// The single-valued texture map slots of a material.
///
/// Reflection maps (`refl`) are repeatable and live in [`Mtl::refl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapSlot {
    Ambient,
    Diffuse,
    Specular,
    Shininess,
    Opacity,
    Bump,
    Displacement,
    Decal,
    Roughness,
    Metallic,
    Sheen,
    Emissive,
    Normal,
}

impl MapSlot {
    /// All slots, in the order the writer emits them (`refl` goes after
    /// [`MapSlot::Decal`]).
    pub const ALL: [MapSlot; 13] = [
        MapSlot::Ambient,
        MapSlot::Diffuse,
        MapSlot::Specular,
        MapSlot::Shininess,
        MapSlot::Opacity,
        MapSlot::Bump,
        MapSlot::Displacement,
        MapSlot::Decal,
        MapSlot::Roughness,
        MapSlot::Metallic,
        MapSlot::Sheen,
        MapSlot::Emissive,
        MapSlot::Normal,
    ];

    /// Canonical directive written for this slot.
    pub fn directive(self) -> &'static str {
        match self {
            MapSlot::Ambient => "map_Ka",
            MapSlot::Diffuse => "map_Kd",
            MapSlot::Specular => "map_Ks",
            MapSlot::Shininess => "map_Ns",
            MapSlot::Opacity => "map_d",
            MapSlot::Bump => "bump",
            MapSlot::Displacement => "disp",
            MapSlot::Decal => "decal",
            MapSlot::Roughness => "map_Pr",
            MapSlot::Metallic => "map_Pm",
            MapSlot::Sheen => "map_Ps",
            MapSlot::Emissive => "map_Ke",
            MapSlot::Normal => "norm",
        }
    }

    /// Slot for a (lowercased) map directive. `map_bump` is an alias of `bump`.
    pub fn from_directive(directive: &str) -> Option<Self> {
        if directive == "map_bump" {
            return Some(MapSlot::Bump);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|slot| slot.directive().eq_ignore_ascii_case(directive))
    }

    /// Channel assumed when a map line has no `-imfchan`.
    pub fn default_channel(self) -> Option<ImfChannel> {
        match self {
            MapSlot::Bump => Some(ImfChannel::Luminance),
            MapSlot::Decal => Some(ImfChannel::Matte),
            _ => None,
        }
    }
}
