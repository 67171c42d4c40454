//! OBJ and MTL writers.
//!
//! Output is canonical: one directive per line, no comments, no blank lines,
//! and floats in their shortest round-trip form. Reading canonical output
//! back and writing it again reproduces it byte for byte.

use std::fmt::Write as _;
use std::io::Write;

use tracing::debug;

use crate::error::ObjResult;
use crate::mtl::{MapSlot, Mtl};
use crate::obj::{Obj, DEFAULT_GROUP_NAME};
use crate::texture::{ImfChannel, TextureOptions};
use crate::types::FloatTuple;

/// Write `obj` as OBJ text.
///
/// Group and material switches are written in front of the face at which
/// they were activated.
pub fn write_obj<W: Write>(obj: &Obj, mut writer: W) -> ObjResult<()> {
    if !obj.mtl_file_names().is_empty() {
        writeln!(writer, "mtllib {}", obj.mtl_file_names().join(" "))?;
    }
    for v in obj.vertices() {
        writeln!(writer, "v {}", v)?;
    }
    for vt in obj.tex_coords() {
        writeln!(writer, "vt {}", vt)?;
    }
    for vn in obj.normals() {
        writeln!(writer, "vn {}", vn)?;
    }

    let mut wrote_group = false;
    for (i, face) in obj.faces().iter().enumerate() {
        if let Some(names) = obj.activated_group_names(i) {
            let only_default = names.len() == 1 && names[0] == DEFAULT_GROUP_NAME;
            if wrote_group || !only_default {
                writeln!(writer, "g {}", names.join(" "))?;
            }
            wrote_group = true;
        }
        match obj.activated_material(i) {
            Some(Some(material)) => writeln!(writer, "usemtl {}", material)?,
            Some(None) => writeln!(writer, "usemtl")?,
            None => {}
        }
        writeln!(writer, "{}", face)?;
    }
    writer.flush()?;

    debug!(
        "Wrote OBJ: {} vertices, {} faces",
        obj.num_vertices(),
        obj.num_faces()
    );
    Ok(())
}

/// Write materials as MTL text, in slice order.
pub fn write_mtls<W: Write>(mtls: &[Mtl], mut writer: W) -> ObjResult<()> {
    for mtl in mtls {
        write_mtl(mtl, &mut writer)?;
    }
    writer.flush()?;
    debug!("Wrote MTL: {} materials", mtls.len());
    Ok(())
}

fn write_color<W: Write>(writer: &mut W, keyword: &str, color: &FloatTuple) -> ObjResult<()> {
    writeln!(writer, "{} {}", keyword, color)?;
    Ok(())
}

fn write_scalar<W: Write>(writer: &mut W, keyword: &str, value: Option<f32>) -> ObjResult<()> {
    if let Some(value) = value {
        writeln!(writer, "{} {}", keyword, value)?;
    }
    Ok(())
}

fn write_map<W: Write>(writer: &mut W, slot: MapSlot, mtl: &Mtl) -> ObjResult<()> {
    if let Some(options) = mtl.map(slot) {
        writeln!(
            writer,
            "{} {}",
            slot.directive(),
            texture_options_string(options, slot.default_channel())
        )?;
    }
    Ok(())
}

fn write_mtl<W: Write>(mtl: &Mtl, writer: &mut W) -> ObjResult<()> {
    writeln!(writer, "newmtl {}", mtl.name)?;
    write_color(writer, "Ka", &mtl.ka)?;
    write_color(writer, "Kd", &mtl.kd)?;
    write_color(writer, "Ks", &mtl.ks)?;
    if let Some(tf) = &mtl.tf {
        write_color(writer, "Tf", tf)?;
    }
    if let Some(ke) = &mtl.ke {
        write_color(writer, "Ke", ke)?;
    }
    writeln!(writer, "Ns {}", mtl.ns)?;
    write_scalar(writer, "Ni", mtl.ni)?;
    if mtl.halo {
        writeln!(writer, "d -halo {}", mtl.d)?;
    } else {
        writeln!(writer, "d {}", mtl.d)?;
    }
    write_scalar(writer, "sharpness", mtl.sharpness)?;
    if let Some(illum) = mtl.illum {
        writeln!(writer, "illum {}", illum.code())?;
    }
    write_scalar(writer, "Pr", mtl.pr)?;
    write_scalar(writer, "Pm", mtl.pm)?;
    write_scalar(writer, "Ps", mtl.ps)?;
    write_scalar(writer, "Pc", mtl.pc)?;
    write_scalar(writer, "Pcr", mtl.pcr)?;
    write_scalar(writer, "aniso", mtl.aniso)?;
    write_scalar(writer, "anisor", mtl.anisor)?;

    for slot in MapSlot::ALL {
        write_map(writer, slot, mtl)?;
        if slot == MapSlot::Decal {
            for refl in &mtl.refl {
                writeln!(writer, "refl {}", texture_options_string(refl, None))?;
            }
        }
    }
    Ok(())
}

/// The option string of a map line (everything after the directive).
///
/// Only options that differ from their defaults are written. The channel is
/// left out when it equals `default_channel`.
///
/// # Example
///
/// ```
/// use mesh_obj::{texture_options_string, TextureOptionsBuilder};
///
/// let options = TextureOptionsBuilder::new()
///     .file_name("wood.png")
///     .origin_offset(0.5, 0.0, 0.0)
///     .clamp(true)
///     .build()
///     .unwrap();
/// assert_eq!(texture_options_string(&options, None), "-o 0.5 0 0 -clamp on wood.png");
/// ```
pub fn texture_options_string(
    options: &TextureOptions,
    default_channel: Option<ImfChannel>,
) -> String {
    let mut s = String::new();
    // Writing into a String cannot fail.
    let _ = write_texture_options(&mut s, options, default_channel);
    s
}

fn write_texture_options(
    s: &mut String,
    options: &TextureOptions,
    default_channel: Option<ImfChannel>,
) -> std::fmt::Result {
    if !options.is_blend_u_enabled() {
        s.push_str("-blendu off ");
    }
    if !options.is_blend_v_enabled() {
        s.push_str("-blendv off ");
    }
    if options.boost() != 0.0 {
        write!(s, "-boost {} ", options.boost())?;
    }
    if options.mm_brightness() != 0.0 || options.mm_contrast() != 1.0 {
        write!(
            s,
            "-mm {} {} ",
            options.mm_brightness(),
            options.mm_contrast()
        )?;
    }
    let vectors = [
        ("-o", options.origin_offset(), 0.0),
        ("-s", options.scale(), 1.0),
        ("-t", options.turbulence(), 0.0),
    ];
    for (flag, value, neutral) in vectors {
        if value.as_slice().iter().any(|&c| c != neutral) {
            write!(s, "{} {} ", flag, value)?;
        }
    }
    if options.texture_resolution() != 0.0 {
        write!(s, "-texres {} ", options.texture_resolution())?;
    }
    if options.is_clamp_enabled() {
        s.push_str("-clamp on ");
    }
    if options.is_color_correction_enabled() {
        s.push_str("-cc on ");
    }
    if options.bump_multiplier() != 0.0 {
        write!(s, "-bm {} ", options.bump_multiplier())?;
    }
    if let Some(channel) = options.imf_channel() {
        if Some(channel) != default_channel {
            write!(s, "-imfchan {} ", channel)?;
        }
    }
    if let Some(kind) = options.texture_type() {
        write!(s, "-type {} ", kind)?;
    }
    s.push_str(options.file_name());
    Ok(())
}
