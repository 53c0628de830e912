//! Reference implementation wrappers
//!
//! Each wrapper asks one external CMS whether it accepts a profile and
//! reports what it read, so tests can compare against oxscale's view.

use anyhow::{Context, Result, anyhow};
use palette::Srgb;

/// lcms2: accept the profile and return its data color space
pub fn lcms2_color_space(data: &[u8]) -> Result<lcms2::ColorSpaceSignature> {
    let profile = lcms2::Profile::new_icc(data).context("lcms2 rejected profile")?;
    Ok(profile.color_space())
}

/// lcms2's built-in sRGB profile, serialized
pub fn lcms2_srgb_bytes() -> Result<Vec<u8>> {
    lcms2::Profile::new_srgb()
        .icc()
        .context("lcms2 failed to serialize sRGB")
}

/// lcms2 RGB profile built from D65-relative primaries and a pure gamma
pub fn lcms2_rgb_bytes(primaries: [[f64; 2]; 3], gamma: f64) -> Result<Vec<u8>> {
    let xy = |p: [f64; 2]| lcms2::CIExyY {
        x: p[0],
        y: p[1],
        Y: 1.0,
    };
    let white = xy([0.3127, 0.3290]);
    let triple = lcms2::CIExyYTRIPLE {
        Red: xy(primaries[0]),
        Green: xy(primaries[1]),
        Blue: xy(primaries[2]),
    };
    let curve = lcms2::ToneCurve::new(gamma);
    let profile = lcms2::Profile::new_rgb(&white, &triple, &[&curve, &curve, &curve])
        .context("lcms2 failed to build RGB profile")?;
    profile.icc().context("lcms2 failed to serialize RGB profile")
}

/// qcms: accept the profile
pub fn qcms_accepts(data: &[u8]) -> bool {
    qcms::Profile::new_from_slice(data, false).is_some()
}

/// moxcms: accept the profile and return its colorant columns
pub fn moxcms_colorants(data: &[u8]) -> Result<[[f64; 3]; 3]> {
    let profile = moxcms::ColorProfile::new_from_slice(data)
        .map_err(|e| anyhow!("moxcms rejected profile: {e:?}"))?;
    let (r, g, b) = (
        profile.red_colorant,
        profile.green_colorant,
        profile.blue_colorant,
    );
    Ok([[r.x, r.y, r.z], [g.x, g.y, g.z], [b.x, b.y, b.z]])
}

/// IEC 61966-2-1 decode of an 8-bit value, as palette computes it
pub fn palette_srgb_to_linear(v: u8) -> f32 {
    let x = v as f32 / 255.0;
    Srgb::new(x, x, x).into_linear().red
}
