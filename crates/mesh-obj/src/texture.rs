//! Texture map options for MTL map directives.
//!
//! A map line such as `map_Kd -o 0.5 -clamp on wood.png` is parsed into a
//! [`TextureOptions`] value. Options are immutable once built; use
//! [`TextureOptionsBuilder`] (or [`TextureOptions::to_builder`]) to create or
//! derive them.

use std::fmt;

use crate::error::{ObjError, ObjResult};
use crate::types::FloatTuple;

/// Channel of a texture file used for scalar maps (`-imfchan`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImfChannel {
    Red,
    Green,
    Blue,
    Matte,
    Luminance,
    ZDepth,
}

impl ImfChannel {
    const TABLE: [(ImfChannel, &'static str); 6] = [
        (ImfChannel::Red, "r"),
        (ImfChannel::Green, "g"),
        (ImfChannel::Blue, "b"),
        (ImfChannel::Matte, "m"),
        (ImfChannel::Luminance, "l"),
        (ImfChannel::ZDepth, "z"),
    ];

    /// The single-letter MTL keyword.
    pub fn as_str(self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(c, _)| *c == self)
            .map(|(_, s)| *s)
            .unwrap_or("l")
    }

    /// Parse the MTL keyword (case-insensitive).
    pub fn from_keyword(value: &str) -> ObjResult<Self> {
        let value = value.trim();
        Self::TABLE
            .iter()
            .find(|(_, s)| s.eq_ignore_ascii_case(value))
            .map(|(c, _)| *c)
            .ok_or_else(|| ObjError::InvalidEnumValue {
                line: 0,
                details: format!("unknown -imfchan value '{}'", value),
            })
    }
}

impl fmt::Display for ImfChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reflection map projection (`-type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextureType {
    Sphere,
    CubeTop,
    CubeBottom,
    CubeFront,
    CubeBack,
    CubeLeft,
    CubeRight,
}

impl TextureType {
    const TABLE: [(TextureType, &'static str); 7] = [
        (TextureType::Sphere, "sphere"),
        (TextureType::CubeTop, "cube_top"),
        (TextureType::CubeBottom, "cube_bottom"),
        (TextureType::CubeFront, "cube_front"),
        (TextureType::CubeBack, "cube_back"),
        (TextureType::CubeLeft, "cube_left"),
        (TextureType::CubeRight, "cube_right"),
    ];

    pub fn as_str(self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(t, _)| *t == self)
            .map(|(_, s)| *s)
            .unwrap_or("sphere")
    }

    pub fn from_keyword(value: &str) -> ObjResult<Self> {
        let value = value.trim();
        Self::TABLE
            .iter()
            .find(|(_, s)| s.eq_ignore_ascii_case(value))
            .map(|(t, _)| *t)
            .ok_or_else(|| ObjError::InvalidEnumValue {
                line: 0,
                details: format!("unknown -type value '{}'", value),
            })
    }
}

impl fmt::Display for TextureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options of one texture map: file name plus the MTL map flags.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextureOptions {
    file_name: String,
    blend_u: bool,
    blend_v: bool,
    boost: f32,
    mm_brightness: f32,
    mm_contrast: f32,
    origin_offset: FloatTuple,
    scale: FloatTuple,
    turbulence: FloatTuple,
    texture_resolution: f32,
    clamp: bool,
    color_correction: bool,
    bump_multiplier: f32,
    imf_channel: Option<ImfChannel>,
    texture_type: Option<TextureType>,
}

impl TextureOptions {
    /// Options with only a file name; everything else at its default.
    pub fn new(file_name: impl Into<String>) -> ObjResult<Self> {
        TextureOptionsBuilder::new().file_name(file_name).build()
    }

    /// Start a builder pre-filled with these options.
    pub fn to_builder(&self) -> TextureOptionsBuilder {
        TextureOptionsBuilder {
            file_name: Some(self.file_name.clone()),
            blend_u: self.blend_u,
            blend_v: self.blend_v,
            boost: self.boost,
            mm_brightness: self.mm_brightness,
            mm_contrast: self.mm_contrast,
            origin_offset: self.origin_offset,
            scale: self.scale,
            turbulence: self.turbulence,
            texture_resolution: self.texture_resolution,
            clamp: self.clamp,
            color_correction: self.color_correction,
            bump_multiplier: self.bump_multiplier,
            imf_channel: self.imf_channel,
            texture_type: self.texture_type,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn is_blend_u_enabled(&self) -> bool {
        self.blend_u
    }

    pub fn is_blend_v_enabled(&self) -> bool {
        self.blend_v
    }

    pub fn boost(&self) -> f32 {
        self.boost
    }

    /// Brightness (base) of the `-mm` modifier.
    pub fn mm_brightness(&self) -> f32 {
        self.mm_brightness
    }

    /// Contrast (gain) of the `-mm` modifier.
    pub fn mm_contrast(&self) -> f32 {
        self.mm_contrast
    }

    pub fn origin_offset(&self) -> FloatTuple {
        self.origin_offset
    }

    pub fn scale(&self) -> FloatTuple {
        self.scale
    }

    pub fn turbulence(&self) -> FloatTuple {
        self.turbulence
    }

    pub fn texture_resolution(&self) -> f32 {
        self.texture_resolution
    }

    pub fn is_clamp_enabled(&self) -> bool {
        self.clamp
    }

    pub fn is_color_correction_enabled(&self) -> bool {
        self.color_correction
    }

    pub fn bump_multiplier(&self) -> f32 {
        self.bump_multiplier
    }

    pub fn imf_channel(&self) -> Option<ImfChannel> {
        self.imf_channel
    }

    pub fn texture_type(&self) -> Option<TextureType> {
        self.texture_type
    }
}

/// Builder for [`TextureOptions`].
///
/// Every field has an independent default; only the file name is required.
#[derive(Debug, Clone)]
pub struct TextureOptionsBuilder {
    file_name: Option<String>,
    blend_u: bool,
    blend_v: bool,
    boost: f32,
    mm_brightness: f32,
    mm_contrast: f32,
    origin_offset: FloatTuple,
    scale: FloatTuple,
    turbulence: FloatTuple,
    texture_resolution: f32,
    clamp: bool,
    color_correction: bool,
    bump_multiplier: f32,
    imf_channel: Option<ImfChannel>,
    texture_type: Option<TextureType>,
}

impl Default for TextureOptionsBuilder {
    fn default() -> Self {
        Self {
            file_name: None,
            blend_u: true,
            blend_v: true,
            boost: 0.0,
            mm_brightness: 0.0,
            mm_contrast: 1.0,
            origin_offset: FloatTuple::new3(0.0, 0.0, 0.0),
            scale: FloatTuple::new3(1.0, 1.0, 1.0),
            turbulence: FloatTuple::new3(0.0, 0.0, 0.0),
            texture_resolution: 0.0,
            clamp: false,
            color_correction: false,
            bump_multiplier: 0.0,
            imf_channel: None,
            texture_type: None,
        }
    }
}

impl TextureOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn blend_u(mut self, enabled: bool) -> Self {
        self.blend_u = enabled;
        self
    }

    pub fn blend_v(mut self, enabled: bool) -> Self {
        self.blend_v = enabled;
        self
    }

    pub fn boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Set the `-mm` brightness and contrast pair.
    pub fn modify_map(mut self, brightness: f32, contrast: f32) -> Self {
        self.mm_brightness = brightness;
        self.mm_contrast = contrast;
        self
    }

    pub fn origin_offset(mut self, u: f32, v: f32, w: f32) -> Self {
        self.origin_offset = FloatTuple::new3(u, v, w);
        self
    }

    pub fn scale(mut self, u: f32, v: f32, w: f32) -> Self {
        self.scale = FloatTuple::new3(u, v, w);
        self
    }

    pub fn turbulence(mut self, u: f32, v: f32, w: f32) -> Self {
        self.turbulence = FloatTuple::new3(u, v, w);
        self
    }

    pub fn texture_resolution(mut self, resolution: f32) -> Self {
        self.texture_resolution = resolution;
        self
    }

    pub fn clamp(mut self, enabled: bool) -> Self {
        self.clamp = enabled;
        self
    }

    pub fn color_correction(mut self, enabled: bool) -> Self {
        self.color_correction = enabled;
        self
    }

    pub fn bump_multiplier(mut self, multiplier: f32) -> Self {
        self.bump_multiplier = multiplier;
        self
    }

    pub fn imf_channel(mut self, channel: Option<ImfChannel>) -> Self {
        self.imf_channel = channel;
        self
    }

    pub fn texture_type(mut self, texture_type: Option<TextureType>) -> Self {
        self.texture_type = texture_type;
        self
    }

    /// Finish the options. Fails if no non-empty file name was set.
    pub fn build(self) -> ObjResult<TextureOptions> {
        let file_name = match self.file_name {
            Some(name) if !name.is_empty() => name,
            _ => {
                return Err(ObjError::MissingRequiredField {
                    line: 0,
                    details: "texture map has no file name".to_string(),
                })
            }
        };
        Ok(TextureOptions {
            file_name,
            blend_u: self.blend_u,
            blend_v: self.blend_v,
            boost: self.boost,
            mm_brightness: self.mm_brightness,
            mm_contrast: self.mm_contrast,
            origin_offset: self.origin_offset,
            scale: self.scale,
            turbulence: self.turbulence,
            texture_resolution: self.texture_resolution,
            clamp: self.clamp,
            color_correction: self.color_correction,
            bump_multiplier: self.bump_multiplier,
            imf_channel: self.imf_channel,
            texture_type: self.texture_type,
        })
    }
}
