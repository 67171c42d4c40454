//! MTL material reader and texture map option parsing.

use std::io::BufRead;

use tracing::{debug, trace};

use super::lines::LogicalLines;
use super::{next_f32, parse_f32, read_floats, remainder};
use crate::error::{ObjError, ObjResult};
use crate::mtl::{IlluminationMode, MapSlot, Mtl};
use crate::texture::{ImfChannel, TextureOptions, TextureOptionsBuilder, TextureType};
use crate::types::FloatTuple;

/// Read all materials of an MTL document, in declaration order.
///
/// # Example
///
/// ```
/// let mtls = mesh_obj::read_mtls("newmtl m\nKa 1 0 0\nd 0.5\n".as_bytes()).unwrap();
/// assert_eq!(mtls.len(), 1);
/// assert_eq!(mtls[0].name, "m");
/// assert_eq!(mtls[0].d, 0.5);
/// ```
pub fn read_mtls<R: BufRead>(reader: R) -> ObjResult<Vec<Mtl>> {
    let mut mtls: Vec<Mtl> = Vec::new();
    for line in LogicalLines::new(reader) {
        let line = line?;
        read_directive(&line.text, &mut mtls).map_err(|e| e.at_line(line.number))?;
    }
    debug!("Read MTL: {} materials", mtls.len());
    Ok(mtls)
}

fn current<'a>(mtls: &'a mut [Mtl], keyword: &str) -> ObjResult<&'a mut Mtl> {
    mtls.last_mut().ok_or_else(|| ObjError::MissingContext {
        line: 0,
        details: format!("'{}' appears before any newmtl", keyword),
    })
}

fn color<'a>(tokens: impl Iterator<Item = &'a str>, keyword: &str) -> ObjResult<FloatTuple> {
    let values = read_floats(tokens, 3, 3, keyword)?;
    Ok(FloatTuple::new3(values[0], values[1], values[2]))
}

fn read_directive(text: &str, mtls: &mut Vec<Mtl>) -> ObjResult<()> {
    if text.is_empty() || text.starts_with('#') {
        return Ok(());
    }
    let mut tokens = text.split_whitespace();
    let Some(keyword) = tokens.next() else {
        return Ok(());
    };
    let lower = keyword.to_ascii_lowercase();

    match lower.as_str() {
        "newmtl" => {
            mtls.push(Mtl::new(remainder(text, keyword)));
        }
        "ka" => current(mtls, keyword)?.ka = color(tokens, keyword)?,
        "kd" => current(mtls, keyword)?.kd = color(tokens, keyword)?,
        "ks" => current(mtls, keyword)?.ks = color(tokens, keyword)?,
        "tf" => current(mtls, keyword)?.tf = Some(color(tokens, keyword)?),
        "ke" => current(mtls, keyword)?.ke = Some(color(tokens, keyword)?),
        "tr" => {
            let tr = next_f32(&mut tokens, keyword)?;
            current(mtls, keyword)?.set_tr(tr);
        }
        "d" => {
            let mtl = current(mtls, keyword)?;
            let mut first = tokens.next();
            let halo = first.is_some_and(|t| t.eq_ignore_ascii_case("-halo"));
            if halo {
                first = tokens.next();
            }
            let d = next_f32(&mut first.into_iter(), keyword)?;
            mtl.d = d;
            mtl.halo = halo;
        }
        "ns" => current(mtls, keyword)?.ns = next_f32(&mut tokens, keyword)?,
        "ni" => current(mtls, keyword)?.ni = Some(next_f32(&mut tokens, keyword)?),
        "sharpness" => current(mtls, keyword)?.sharpness = Some(next_f32(&mut tokens, keyword)?),
        "pr" => current(mtls, keyword)?.pr = Some(next_f32(&mut tokens, keyword)?),
        "pm" => current(mtls, keyword)?.pm = Some(next_f32(&mut tokens, keyword)?),
        "ps" => current(mtls, keyword)?.ps = Some(next_f32(&mut tokens, keyword)?),
        "pc" => current(mtls, keyword)?.pc = Some(next_f32(&mut tokens, keyword)?),
        "pcr" => current(mtls, keyword)?.pcr = Some(next_f32(&mut tokens, keyword)?),
        "aniso" => current(mtls, keyword)?.aniso = Some(next_f32(&mut tokens, keyword)?),
        "anisor" => current(mtls, keyword)?.anisor = Some(next_f32(&mut tokens, keyword)?),
        "illum" => {
            let token = tokens.next().ok_or_else(|| ObjError::TruncatedInput {
                line: 0,
                details: "missing illumination mode".to_string(),
            })?;
            let code = token.parse::<i64>().map_err(|_| ObjError::MalformedNumber {
                line: 0,
                details: format!("'{}' is not an illumination mode", token),
            })?;
            current(mtls, keyword)?.illum = Some(IlluminationMode::from_code(code)?);
        }
        "refl" => {
            let mtl = current(mtls, keyword)?;
            let args: Vec<&str> = tokens.collect();
            mtl.refl.push(parse_texture_options(&args, None)?);
        }
        other => match MapSlot::from_directive(other) {
            Some(slot) => {
                let mtl = current(mtls, keyword)?;
                let args: Vec<&str> = tokens.collect();
                *mtl.map_mut(slot) = Some(parse_texture_options(&args, slot.default_channel())?);
            }
            None => trace!("Ignoring MTL directive '{}'", keyword),
        },
    }
    Ok(())
}

fn option_value<'a>(tokens: &[&'a str], i: &mut usize, flag: &str) -> ObjResult<&'a str> {
    let value = tokens.get(*i).ok_or_else(|| ObjError::TruncatedInput {
        line: 0,
        details: format!("missing value for {}", flag),
    })?;
    *i += 1;
    Ok(value)
}

fn switch(value: &str) -> bool {
    value.eq_ignore_ascii_case("on") || value.eq_ignore_ascii_case("true")
}

/// One required float followed by up to two optional ones; missing
/// components take `neutral`.
fn option_vector(
    tokens: &[&str],
    i: &mut usize,
    flag: &str,
    neutral: f32,
) -> ObjResult<[f32; 3]> {
    let mut out = [neutral; 3];
    out[0] = parse_f32(option_value(tokens, i, flag)?)?;
    for slot in out.iter_mut().skip(1) {
        match tokens.get(*i).and_then(|t| t.parse::<f32>().ok()) {
            Some(value) => {
                *slot = value;
                *i += 1;
            }
            None => break,
        }
    }
    Ok(out)
}

/// Parse the tokens following a texture map directive.
///
/// Option flags are consumed left to right. The first token that is not a
/// known flag starts the file name, which runs to the end of the line.
/// `default_channel` is used when no `-imfchan` is given.
///
/// # Example
///
/// ```
/// use mesh_obj::{parse_texture_options, FloatTuple};
///
/// let options = parse_texture_options(&["-o", "0.1", "texture.png"], None).unwrap();
/// assert_eq!(options.file_name(), "texture.png");
/// assert_eq!(options.origin_offset(), FloatTuple::new3(0.1, 0.0, 0.0));
/// ```
pub fn parse_texture_options(
    tokens: &[&str],
    default_channel: Option<ImfChannel>,
) -> ObjResult<TextureOptions> {
    let mut builder = TextureOptionsBuilder::new().imf_channel(default_channel);
    let mut i = 0;

    while i < tokens.len() {
        let flag = tokens[i].to_ascii_lowercase();
        i += 1;
        builder = match flag.as_str() {
            "-blendu" => builder.blend_u(switch(option_value(tokens, &mut i, "-blendu")?)),
            "-blendv" => builder.blend_v(switch(option_value(tokens, &mut i, "-blendv")?)),
            "-boost" => builder.boost(parse_f32(option_value(tokens, &mut i, "-boost")?)?),
            "-mm" => {
                let brightness = parse_f32(option_value(tokens, &mut i, "-mm")?)?;
                let contrast = parse_f32(option_value(tokens, &mut i, "-mm")?)?;
                builder.modify_map(brightness, contrast)
            }
            "-o" => {
                let [u, v, w] = option_vector(tokens, &mut i, "-o", 0.0)?;
                builder.origin_offset(u, v, w)
            }
            "-s" => {
                let [u, v, w] = option_vector(tokens, &mut i, "-s", 1.0)?;
                builder.scale(u, v, w)
            }
            "-t" => {
                let [u, v, w] = option_vector(tokens, &mut i, "-t", 0.0)?;
                builder.turbulence(u, v, w)
            }
            "-texres" => builder
                .texture_resolution(parse_f32(option_value(tokens, &mut i, "-texres")?)?),
            "-clamp" => builder.clamp(switch(option_value(tokens, &mut i, "-clamp")?)),
            "-cc" => builder.color_correction(switch(option_value(tokens, &mut i, "-cc")?)),
            "-bm" => builder.bump_multiplier(parse_f32(option_value(tokens, &mut i, "-bm")?)?),
            "-imfchan" => builder.imf_channel(Some(ImfChannel::from_keyword(option_value(
                tokens, &mut i, "-imfchan",
            )?)?)),
            "-type" => builder.texture_type(Some(TextureType::from_keyword(option_value(
                tokens, &mut i, "-type",
            )?)?)),
            _ => {
                let name = tokens[i - 1..].join(" ");
                builder = builder.file_name(name);
                break;
            }
        };
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mtl::{DEFAULT_OPACITY, DEFAULT_SHININESS};
    use approx::assert_relative_eq;

    #[test]
    fn test_minimal_material() {
        let mtls = read_mtls("newmtl m\nKa 1 0 0\nd 0.5\n".as_bytes()).unwrap();
        assert_eq!(mtls.len(), 1);
        let m = &mtls[0];
        assert_eq!(m.name, "m");
        assert_eq!(m.ka, FloatTuple::new3(1.0, 0.0, 0.0));
        assert_eq!(m.kd, FloatTuple::new3(0.0, 0.0, 0.0));
        assert_eq!(m.ks, FloatTuple::new3(0.0, 0.0, 0.0));
        assert_eq!(m.d, 0.5);
        assert_eq!(m.ns, DEFAULT_SHININESS);
    }

    #[test]
    fn test_two_materials_in_order() {
        let text = "\
# two materials
newmtl first
Kd 1 0 0

newmtl second
Ka 1 1 1
Kd 1 1 1
Ks 1 1 1
Ns 0
d 0.5
map_Kd texture.png
";
        let mtls = read_mtls(text.as_bytes()).unwrap();
        assert_eq!(mtls.len(), 2);
        assert_eq!(mtls[0].name, "first");
        assert_eq!(mtls[0].d, DEFAULT_OPACITY);
        let second = &mtls[1];
        assert_eq!(second.ks, FloatTuple::new3(1.0, 1.0, 1.0));
        assert_eq!(second.ns, 0.0);
        assert_eq!(
            second.map_kd,
            Some(TextureOptions::new("texture.png").unwrap())
        );
    }

    #[test]
    fn test_whitespace_and_case() {
        let text = "  newmtl   material0  \n\tKA 1 0 0\nkd  1\t1 0\n KS 1 1 1 \nns 500\nMAP_KD   texture.png  \n";
        let mtls = read_mtls(text.as_bytes()).unwrap();
        assert_eq!(mtls.len(), 1);
        let m = &mtls[0];
        assert_eq!(m.name, "material0");
        assert_eq!(m.ka, FloatTuple::new3(1.0, 0.0, 0.0));
        assert_eq!(m.kd, FloatTuple::new3(1.0, 1.0, 0.0));
        assert_eq!(m.ks, FloatTuple::new3(1.0, 1.0, 1.0));
        assert_eq!(m.ns, 500.0);
        assert_eq!(m.map_kd.as_ref().map(|t| t.file_name()), Some("texture.png"));
    }

    #[test]
    fn test_broken_lines() {
        let text = "newmtl material0\nKa 1 \\\n0 0\nKd 1 1 \\\n  0\nmap_Kd -clamp on \\\ntexture.png\n";
        let mtls = read_mtls(text.as_bytes()).unwrap();
        let m = &mtls[0];
        assert_eq!(m.ka, FloatTuple::new3(1.0, 0.0, 0.0));
        assert_eq!(m.kd, FloatTuple::new3(1.0, 1.0, 0.0));
        let map = m.map_kd.as_ref().unwrap();
        assert!(map.is_clamp_enabled());
        assert_eq!(map.file_name(), "texture.png");
    }

    #[test]
    fn test_optional_scalars_and_pbr() {
        let text = "\
newmtl pbr
Tf 0.5 0.5 0.5
Ke 1 1 0
Ni 1.45
sharpness 60
Pr 0.3
Pm 0.9
Ps 0.1
Pc 0.2
Pcr 0.05
aniso 0.4
anisor 0.6
illum 2
";
        let m = &read_mtls(text.as_bytes()).unwrap()[0];
        assert_eq!(m.tf, Some(FloatTuple::new3(0.5, 0.5, 0.5)));
        assert_eq!(m.ke, Some(FloatTuple::new3(1.0, 1.0, 0.0)));
        assert_eq!(m.ni, Some(1.45));
        assert_eq!(m.sharpness, Some(60.0));
        assert_eq!(m.pr, Some(0.3));
        assert_eq!(m.pm, Some(0.9));
        assert_eq!(m.ps, Some(0.1));
        assert_eq!(m.pc, Some(0.2));
        assert_eq!(m.pcr, Some(0.05));
        assert_eq!(m.aniso, Some(0.4));
        assert_eq!(m.anisor, Some(0.6));
        assert_eq!(m.illum, Some(IlluminationMode::HighlightOn));
    }

    #[test]
    fn test_transparency_and_halo() {
        let m = &read_mtls("newmtl glass\nTr 0.25\n".as_bytes()).unwrap()[0];
        assert_relative_eq!(m.d, 0.75, epsilon = 1e-6);
        assert!(!m.halo);

        let m = &read_mtls("newmtl glow\nd -halo 0.4\n".as_bytes()).unwrap()[0];
        assert_relative_eq!(m.d, 0.4, epsilon = 1e-6);
        assert!(m.halo);
    }

    #[test]
    fn test_map_slots_and_default_channels() {
        let text = "\
newmtl m
map_bump normal.png
decal sticker.png
disp height.png
refl -type cube_top top.png
refl -type cube_bottom bottom.png
norm -imfchan r tangent.png
map_Pr rough.png
";
        let m = &read_mtls(text.as_bytes()).unwrap()[0];
        let bump = m.bump.as_ref().unwrap();
        assert_eq!(bump.file_name(), "normal.png");
        assert_eq!(bump.imf_channel(), Some(ImfChannel::Luminance));
        assert_eq!(
            m.decal.as_ref().unwrap().imf_channel(),
            Some(ImfChannel::Matte)
        );
        assert_eq!(m.disp.as_ref().unwrap().imf_channel(), None);
        assert_eq!(m.refl.len(), 2);
        assert_eq!(m.refl[0].texture_type(), Some(TextureType::CubeTop));
        assert_eq!(m.refl[1].file_name(), "bottom.png");
        assert_eq!(m.norm.as_ref().unwrap().imf_channel(), Some(ImfChannel::Red));
        assert_eq!(m.map_pr.as_ref().unwrap().file_name(), "rough.png");
    }

    #[test]
    fn test_illum_values() {
        for code in 0..=10 {
            let text = format!("newmtl m\nillum {}\n", code);
            let m = &read_mtls(text.as_bytes()).unwrap()[0];
            assert_eq!(m.illum.map(|i| i.code() as i64), Some(code));
        }
        let err = read_mtls("newmtl m\nillum 11\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ObjError::MalformedIndex { line: 2, .. }));
        let err = read_mtls("newmtl m\nillum two\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ObjError::MalformedNumber { line: 2, .. }));
    }

    #[test]
    fn test_property_before_newmtl() {
        let err = read_mtls("Kd 1 1 1\nnewmtl m\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ObjError::MissingContext { line: 1, .. }));
    }

    #[test]
    fn test_unknown_directives_are_ignored() {
        let mtls = read_mtls("newmtl m\nmap_unknown x.png\nfoo 1 2\n".as_bytes()).unwrap();
        assert_eq!(mtls.len(), 1);
    }

    #[test]
    fn test_missing_color_component() {
        let err = read_mtls("newmtl m\nKa 1 0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ObjError::TruncatedInput { line: 2, .. }));
    }

    #[test]
    fn test_texture_options_file_name_only() {
        let options = parse_texture_options(&["texture.png"], None).unwrap();
        assert_eq!(options, TextureOptions::new("texture.png").unwrap());
    }

    #[test]
    fn test_texture_options_all_options() {
        let tokens = [
            "-blendu", "off", "-blendv", "off", "-boost", "0.4", "-mm", "0.2", "0.33", "-o",
            "0.01", "0.02", "0.03", "-s", "0.04", "0.05", "0.06", "-t", "0.07", "0.08", "0.09",
            "-texres", ".44", "-clamp", "on", "-cc", "on", "-bm", "3.45", "-imfchan", "g",
            "-type", "sphere", "texture.png",
        ];
        let o = parse_texture_options(&tokens, None).unwrap();
        assert!(!o.is_blend_u_enabled());
        assert!(!o.is_blend_v_enabled());
        assert_relative_eq!(o.boost(), 0.4, epsilon = 1e-6);
        assert_relative_eq!(o.mm_brightness(), 0.2, epsilon = 1e-6);
        assert_relative_eq!(o.mm_contrast(), 0.33, epsilon = 1e-6);
        assert_eq!(o.origin_offset(), FloatTuple::new3(0.01, 0.02, 0.03));
        assert_eq!(o.scale(), FloatTuple::new3(0.04, 0.05, 0.06));
        assert_eq!(o.turbulence(), FloatTuple::new3(0.07, 0.08, 0.09));
        assert_relative_eq!(o.texture_resolution(), 0.44, epsilon = 1e-6);
        assert!(o.is_clamp_enabled());
        assert!(o.is_color_correction_enabled());
        assert_relative_eq!(o.bump_multiplier(), 3.45, epsilon = 1e-6);
        assert_eq!(o.imf_channel(), Some(ImfChannel::Green));
        assert_eq!(o.texture_type(), Some(TextureType::Sphere));
        assert_eq!(o.file_name(), "texture.png");
    }

    #[test]
    fn test_texture_options_missing_file_name() {
        let err = parse_texture_options(&["-blendu", "off", "-clamp", "on"], None).unwrap_err();
        assert!(matches!(err, ObjError::MissingRequiredField { .. }));
        let err = parse_texture_options(&[], None).unwrap_err();
        assert!(matches!(err, ObjError::MissingRequiredField { .. }));
    }

    #[test]
    fn test_texture_options_partial_vectors() {
        let o = parse_texture_options(&["-o", "0.1", "texture.png"], None).unwrap();
        assert_eq!(o.origin_offset(), FloatTuple::new3(0.1, 0.0, 0.0));
        assert_eq!(o.file_name(), "texture.png");

        let o = parse_texture_options(&["-o", "0.1", "0.2", "texture.png"], None).unwrap();
        assert_eq!(o.origin_offset(), FloatTuple::new3(0.1, 0.2, 0.0));

        let o = parse_texture_options(&["-s", "2", "texture.png"], None).unwrap();
        assert_eq!(o.scale(), FloatTuple::new3(2.0, 1.0, 1.0));
    }

    #[test]
    fn test_texture_options_channels_and_types() {
        for (keyword, channel) in [
            ("r", ImfChannel::Red),
            ("g", ImfChannel::Green),
            ("b", ImfChannel::Blue),
            ("m", ImfChannel::Matte),
            ("l", ImfChannel::Luminance),
            ("z", ImfChannel::ZDepth),
        ] {
            let o = parse_texture_options(&["-imfchan", keyword, "t.png"], None).unwrap();
            assert_eq!(o.imf_channel(), Some(channel));
        }
        for (keyword, kind) in [
            ("sphere", TextureType::Sphere),
            ("cube_top", TextureType::CubeTop),
            ("cube_bottom", TextureType::CubeBottom),
            ("cube_front", TextureType::CubeFront),
            ("cube_back", TextureType::CubeBack),
            ("cube_left", TextureType::CubeLeft),
            ("cube_right", TextureType::CubeRight),
        ] {
            let o = parse_texture_options(&["-type", keyword, "t.png"], None).unwrap();
            assert_eq!(o.texture_type(), Some(kind));
        }
        let err = parse_texture_options(&["-imfchan", "q", "t.png"], None).unwrap_err();
        assert!(matches!(err, ObjError::InvalidEnumValue { .. }));
    }

    #[test]
    fn test_texture_options_file_name_with_spaces() {
        let o = parse_texture_options(&["-bm", "0.5", "my", "bump", "map.png"], None).unwrap();
        assert_eq!(o.file_name(), "my bump map.png");
        assert_relative_eq!(o.bump_multiplier(), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_texture_options_switch_values() {
        let o = parse_texture_options(&["-clamp", "TRUE", "-blendu", "maybe", "t.png"], None)
            .unwrap();
        assert!(o.is_clamp_enabled());
        assert!(!o.is_blend_u_enabled());
    }

    #[test]
    fn test_texture_options_missing_value() {
        let err = parse_texture_options(&["-boost"], None).unwrap_err();
        assert!(matches!(err, ObjError::TruncatedInput { .. }));
        let err = parse_texture_options(&["-boost", "high", "t.png"], None).unwrap_err();
        assert!(matches!(err, ObjError::MalformedNumber { .. }));
    }
}
