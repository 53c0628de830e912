//! Canonical profile byte images
//!
//! Profiles are produced by a small ICC writer with a fixed tag order, so the
//! v4 sRGB and sGrey images double as templates for metadata-derived profiles
//! whose fields are patched at known offsets.

use std::sync::LazyLock;

use super::types::{TagSignature, TypeSignature, color_space, profile_class};
use crate::color::lut::srgb_decode;
use crate::color::{ICC_D50, chromatic_adaptation, rgb_to_xyz};
use crate::math::fixed::f64_to_s15_fixed16;
use crate::math::{Matrix3x3, Vector3};

const VERSION_4: u32 = 0x0430_0000;
const VERSION_2: u32 = 0x0210_0000;

/// Creator written into synthesized profiles
pub const CREATOR: u32 = u32::from_be_bytes(*b"magc");

/// CIE D65, Y normalized to 1
pub const D65: Vector3 = Vector3::new(0.3127 / 0.3290, 1.0, (1.0 - 0.3127 - 0.3290) / 0.3290);

/// sRGB colorants adapted to D50, one column per primary
pub const SRGB_COLORANTS: Matrix3x3 = Matrix3x3::from_columns(
    Vector3::new(0.43602939, 0.22243797, 0.01389754),
    Vector3::new(0.38510027, 0.71694100, 0.09707674),
    Vector3::new(0.14307328, 0.06062103, 0.71393112),
);

pub const ADOBE_RGB_COLORANTS: Matrix3x3 = Matrix3x3::from_columns(
    Vector3::new(0.60974189, 0.31111293, 0.01946551),
    Vector3::new(0.20527343, 0.62567449, 0.06087462),
    Vector3::new(0.14918756, 0.06321258, 0.74456527),
);

pub const DISPLAY_P3_COLORANTS: Matrix3x3 = Matrix3x3::from_columns(
    Vector3::new(0.51511960, 0.24118953, -0.00105045),
    Vector3::new(0.29197886, 0.69224341, 0.04187909),
    Vector3::new(0.15710442, 0.06656706, 0.78407676),
);

/// sRGB parametric curve, function type 3: g, a, b, c, d
const SRGB_PARAMS: [f64; 5] = [2.4, 1.0 / 1.055, 0.055 / 1.055, 1.0 / 12.92, 0.04045];

/// Adobe RGB (1998) gamma, exactly 563/256
const ADOBE_GAMMA: f64 = 563.0 / 256.0;

const COPYRIGHT: &str = "CC0";

// ============================================================================
// Template layout
// ============================================================================

/// Field offsets within the v4 RGB template
pub mod rgb_layout {
    pub const LEN: usize = 480;
    pub const NAME: usize = 280;
    pub const CHAD_DATA: usize = 352;
    pub const COLORANT_DATA: [usize; 3] = [396, 416, 436];
    pub const TRC: usize = 448;
    pub const TRC_SIZE_FIELDS: &[usize] = &[224, 236, 248];
}

/// Field offsets within the v4 grey template
pub mod grey_layout {
    pub const LEN: usize = 360;
    pub const NAME: usize = 220;
    pub const TRC: usize = 328;
    pub const TRC_SIZE_FIELDS: &[usize] = &[188];
}

// ============================================================================
// Writer
// ============================================================================

enum TagBody {
    Data(Vec<u8>),
    SameAs(TagSignature),
}

/// Minimal ICC writer: header, tag table, 4-byte aligned tag data
struct ProfileWriter {
    version: u32,
    class: u32,
    data_space: u32,
    pcs: u32,
    tags: Vec<(TagSignature, TagBody)>,
}

impl ProfileWriter {
    fn new(version: u32, class: u32, data_space: u32, pcs: u32) -> Self {
        Self {
            version,
            class,
            data_space,
            pcs,
            tags: Vec::new(),
        }
    }

    fn tag(mut self, sig: TagSignature, data: Vec<u8>) -> Self {
        self.tags.push((sig, TagBody::Data(data)));
        self
    }

    fn shared(mut self, sig: TagSignature, same_as: TagSignature) -> Self {
        self.tags.push((sig, TagBody::SameAs(same_as)));
        self
    }

    fn build(self) -> Vec<u8> {
        let table_end = 132 + self.tags.len() * 12;
        let mut buf = vec![0u8; table_end];

        put_u32(&mut buf, 8, self.version);
        put_u32(&mut buf, 12, self.class);
        put_u32(&mut buf, 16, self.data_space);
        put_u32(&mut buf, 20, self.pcs);
        for (i, v) in [2024u16, 1, 1, 0, 0, 0].into_iter().enumerate() {
            put_u16(&mut buf, 24 + i * 2, v);
        }
        put_u32(&mut buf, 36, u32::from_be_bytes(*b"acsp"));
        for (i, v) in ICC_D50.to_array().into_iter().enumerate() {
            put_i32(&mut buf, 68 + i * 4, f64_to_s15_fixed16(v));
        }
        put_u32(&mut buf, 128, self.tags.len() as u32);

        let mut placed: Vec<(TagSignature, u32, u32)> = Vec::with_capacity(self.tags.len());
        for (i, (sig, body)) in self.tags.into_iter().enumerate() {
            let (offset, size) = match body {
                TagBody::Data(data) => {
                    let offset = buf.len() as u32;
                    buf.extend_from_slice(&data);
                    buf.resize(buf.len().next_multiple_of(4), 0);
                    (offset, data.len() as u32)
                }
                TagBody::SameAs(other) => placed
                    .iter()
                    .find(|(s, ..)| *s == other)
                    .map(|&(_, o, n)| (o, n))
                    .unwrap_or((0, 0)),
            };

            let entry = 132 + i * 12;
            put_u32(&mut buf, entry, sig.0);
            put_u32(&mut buf, entry + 4, offset);
            put_u32(&mut buf, entry + 8, size);
            placed.push((sig, offset, size));
        }

        let len = buf.len() as u32;
        put_u32(&mut buf, 0, len);
        buf
    }
}

fn put_u16(buf: &mut [u8], offset: usize, v: u16) {
    buf[offset..offset + 2].copy_from_slice(&v.to_be_bytes());
}

fn put_u32(buf: &mut [u8], offset: usize, v: u32) {
    buf[offset..offset + 4].copy_from_slice(&v.to_be_bytes());
}

fn put_i32(buf: &mut [u8], offset: usize, v: i32) {
    buf[offset..offset + 4].copy_from_slice(&v.to_be_bytes());
}

fn type_header(sig: TypeSignature) -> Vec<u8> {
    let mut v = sig.0.to_be_bytes().to_vec();
    v.extend_from_slice(&[0; 4]);
    v
}

fn push_fixed(v: &mut Vec<u8>, x: f64) {
    v.extend_from_slice(&f64_to_s15_fixed16(x).to_be_bytes());
}

fn mluc(text: &str) -> Vec<u8> {
    let units: Vec<u16> = text.encode_utf16().collect();
    let mut v = type_header(TypeSignature::MLUC);
    v.extend_from_slice(&1u32.to_be_bytes());
    v.extend_from_slice(&12u32.to_be_bytes());
    v.extend_from_slice(b"enUS");
    v.extend_from_slice(&(units.len() as u32 * 2).to_be_bytes());
    v.extend_from_slice(&28u32.to_be_bytes());
    for u in units {
        v.extend_from_slice(&u.to_be_bytes());
    }
    v
}

/// v2 `desc` (textDescriptionType), ASCII only
fn text_description(text: &str) -> Vec<u8> {
    let mut v = type_header(TypeSignature::DESC);
    v.extend_from_slice(&(text.len() as u32 + 1).to_be_bytes());
    v.extend_from_slice(text.as_bytes());
    v.push(0);
    // empty Unicode and ScriptCode records
    v.extend_from_slice(&[0; 8]);
    v.extend_from_slice(&[0; 3]);
    v.extend_from_slice(&[0; 67]);
    v
}

fn text(text: &str) -> Vec<u8> {
    let mut v = type_header(TypeSignature::TEXT);
    v.extend_from_slice(text.as_bytes());
    v.push(0);
    v
}

fn xyz(c: Vector3) -> Vec<u8> {
    let mut v = type_header(TypeSignature::XYZ);
    for x in c.to_array() {
        push_fixed(&mut v, x);
    }
    v
}

fn sf32(m: &Matrix3x3) -> Vec<u8> {
    let mut v = type_header(TypeSignature::SF32);
    for i in 0..3 {
        for x in m.row(i).to_array() {
            push_fixed(&mut v, x);
        }
    }
    v
}

fn para(func: u16, params: &[f64]) -> Vec<u8> {
    let mut v = type_header(TypeSignature::PARA);
    v.extend_from_slice(&func.to_be_bytes());
    v.extend_from_slice(&[0; 2]);
    for &p in params {
        push_fixed(&mut v, p);
    }
    v
}

fn curv(points: &[u16]) -> Vec<u8> {
    let mut v = type_header(TypeSignature::CURVE);
    v.extend_from_slice(&(points.len() as u32).to_be_bytes());
    for p in points {
        v.extend_from_slice(&p.to_be_bytes());
    }
    v
}

fn srgb_points() -> Vec<u16> {
    (0..=255)
        .map(|i| (srgb_decode(i as f64 / 255.0) * u16::MAX as f64).round() as u16)
        .collect()
}

/// `mft2` CMYK→Lab table with a 2-point grid
///
/// The grid is a plain subtractive approximation, not measured press data.
fn cmyk_lut() -> Vec<u8> {
    let mut v = type_header(TypeSignature::LUT16);
    v.extend_from_slice(&[4, 3, 2, 0]);
    for i in 0..3 {
        for x in Matrix3x3::IDENTITY.row(i).to_array() {
            push_fixed(&mut v, x);
        }
    }
    v.extend_from_slice(&2u16.to_be_bytes());
    v.extend_from_slice(&2u16.to_be_bytes());

    let ramp = [0u16, u16::MAX];
    for _ in 0..4 {
        ramp.iter().for_each(|p| v.extend_from_slice(&p.to_be_bytes()));
    }

    for i in 0..16u32 {
        let [c, m, y, k] = [3, 2, 1, 0].map(|s| ((i >> s) & 1) as f64);
        let ink = 1.0 - k;
        let l = 100.0 * ink * (1.0 - 0.45 * c) * (1.0 - 0.5 * m) * (1.0 - 0.1 * y);
        let a = ink * (70.0 * m - 40.0 * c - 5.0 * y);
        let b = ink * (80.0 * y - 50.0 * c - 10.0 * m);

        let lab = [
            l / 100.0 * 65280.0,
            (a + 128.0).clamp(0.0, 255.0) * 256.0,
            (b + 128.0).clamp(0.0, 255.0) * 256.0,
        ];
        for x in lab {
            v.extend_from_slice(&(x.round() as u16).to_be_bytes());
        }
    }

    for _ in 0..3 {
        ramp.iter().for_each(|p| v.extend_from_slice(&p.to_be_bytes()));
    }
    v
}

// ============================================================================
// Canonical profiles
// ============================================================================

fn rgb_v4(name: &str, colorants: &Matrix3x3, trc: Vec<u8>) -> Vec<u8> {
    ProfileWriter::new(VERSION_4, profile_class::DISPLAY, color_space::RGB, color_space::XYZ)
        .tag(TagSignature::DESC, mluc(name))
        .tag(TagSignature::COPYRIGHT, mluc(COPYRIGHT))
        .tag(TagSignature::MEDIA_WHITE, xyz(ICC_D50))
        .tag(TagSignature::CHAD, sf32(&chromatic_adaptation(D65)))
        .tag(TagSignature::RED_COLORANT, xyz(colorants.column(0)))
        .tag(TagSignature::GREEN_COLORANT, xyz(colorants.column(1)))
        .tag(TagSignature::BLUE_COLORANT, xyz(colorants.column(2)))
        .tag(TagSignature::RED_TRC, trc)
        .shared(TagSignature::GREEN_TRC, TagSignature::RED_TRC)
        .shared(TagSignature::BLUE_TRC, TagSignature::RED_TRC)
        .build()
}

fn rgb_v2(name: &str, colorants: &Matrix3x3, trc: Vec<u8>) -> Vec<u8> {
    ProfileWriter::new(VERSION_2, profile_class::DISPLAY, color_space::RGB, color_space::XYZ)
        .tag(TagSignature::DESC, text_description(name))
        .tag(TagSignature::COPYRIGHT, text(COPYRIGHT))
        .tag(TagSignature::MEDIA_WHITE, xyz(ICC_D50))
        .tag(TagSignature::RED_COLORANT, xyz(colorants.column(0)))
        .tag(TagSignature::GREEN_COLORANT, xyz(colorants.column(1)))
        .tag(TagSignature::BLUE_COLORANT, xyz(colorants.column(2)))
        .tag(TagSignature::RED_TRC, trc)
        .shared(TagSignature::GREEN_TRC, TagSignature::RED_TRC)
        .shared(TagSignature::BLUE_TRC, TagSignature::RED_TRC)
        .build()
}

static SRGB_V4: LazyLock<Vec<u8>> =
    LazyLock::new(|| rgb_v4("sRGB", &SRGB_COLORANTS, para(3, &SRGB_PARAMS)));
static SRGB_COMPACT: LazyLock<Vec<u8>> =
    LazyLock::new(|| rgb_v2("sRGB", &SRGB_COLORANTS, curv(&srgb_points())));

static SGREY_V4: LazyLock<Vec<u8>> = LazyLock::new(|| {
    ProfileWriter::new(VERSION_4, profile_class::DISPLAY, color_space::GRAY, color_space::XYZ)
        .tag(TagSignature::DESC, mluc("sGry"))
        .tag(TagSignature::COPYRIGHT, mluc(COPYRIGHT))
        .tag(TagSignature::MEDIA_WHITE, xyz(ICC_D50))
        .tag(TagSignature::CHAD, sf32(&chromatic_adaptation(D65)))
        .tag(TagSignature::GRAY_TRC, para(3, &SRGB_PARAMS))
        .build()
});
static SGREY_COMPACT: LazyLock<Vec<u8>> = LazyLock::new(|| {
    ProfileWriter::new(VERSION_2, profile_class::DISPLAY, color_space::GRAY, color_space::XYZ)
        .tag(TagSignature::DESC, text_description("sGry"))
        .tag(TagSignature::COPYRIGHT, text(COPYRIGHT))
        .tag(TagSignature::MEDIA_WHITE, xyz(ICC_D50))
        .tag(TagSignature::GRAY_TRC, curv(&srgb_points()))
        .build()
});

static ADOBE_RGB_V4: LazyLock<Vec<u8>> =
    LazyLock::new(|| rgb_v4("aRGB", &ADOBE_RGB_COLORANTS, para(0, &[ADOBE_GAMMA])));
static ADOBE_RGB_COMPACT: LazyLock<Vec<u8>> =
    LazyLock::new(|| rgb_v2("aRGB", &ADOBE_RGB_COLORANTS, curv(&[0x233])));

static DISPLAY_P3_V4: LazyLock<Vec<u8>> =
    LazyLock::new(|| rgb_v4("DsP3", &DISPLAY_P3_COLORANTS, para(3, &SRGB_PARAMS)));
static DISPLAY_P3_COMPACT: LazyLock<Vec<u8>> =
    LazyLock::new(|| rgb_v2("DsP3", &DISPLAY_P3_COLORANTS, curv(&srgb_points())));

static CMYK_DEFAULT: LazyLock<Vec<u8>> = LazyLock::new(|| {
    ProfileWriter::new(VERSION_2, profile_class::OUTPUT, color_space::CMYK, color_space::LAB)
        .tag(TagSignature::DESC, text_description("CMYK"))
        .tag(TagSignature::COPYRIGHT, text(COPYRIGHT))
        .tag(TagSignature::MEDIA_WHITE, xyz(ICC_D50))
        .tag(TagSignature::A2B0, cmyk_lut())
        .build()
});

pub fn srgb_v4() -> &'static [u8] {
    &SRGB_V4
}

pub fn srgb_compact() -> &'static [u8] {
    &SRGB_COMPACT
}

pub fn sgrey_v4() -> &'static [u8] {
    &SGREY_V4
}

pub fn sgrey_compact() -> &'static [u8] {
    &SGREY_COMPACT
}

pub fn adobe_rgb_v4() -> &'static [u8] {
    &ADOBE_RGB_V4
}

pub fn adobe_rgb_compact() -> &'static [u8] {
    &ADOBE_RGB_COMPACT
}

pub fn display_p3_v4() -> &'static [u8] {
    &DISPLAY_P3_V4
}

pub fn display_p3_compact() -> &'static [u8] {
    &DISPLAY_P3_COMPACT
}

/// Placeholder CMYK output profile
///
/// Only the header and tag layout are meaningful. It is not a calibrated
/// CMYK characterization and gives rough colors if used to convert.
pub fn cmyk_default() -> &'static [u8] {
    &CMYK_DEFAULT
}

// ============================================================================
// Metadata templates
// ============================================================================

/// Legacy per-image color metadata
///
/// `gamma` is the file gamma (e.g. 0.45455); zero means "keep the template
/// curve". Chromaticities are XYZ with zero meaning "absent"; all four must
/// be present for the template colorants to be replaced.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProfileMetadata {
    pub name: [u8; 4],
    pub gamma: f64,
    pub white: Vector3,
    pub red: Vector3,
    pub green: Vector3,
    pub blue: Vector3,
}

impl ProfileMetadata {
    pub fn has_chromaticities(&self) -> bool {
        ![self.white, self.red, self.green, self.blue]
            .iter()
            .any(Vector3::is_zero)
    }
}

/// Patch the sRGB (or sGrey) template with metadata
pub fn patch_template(grey: bool, meta: &ProfileMetadata) -> Vec<u8> {
    let (template, name_at, trc_at, size_fields) = if grey {
        (sgrey_v4(), grey_layout::NAME, grey_layout::TRC, grey_layout::TRC_SIZE_FIELDS)
    } else {
        (srgb_v4(), rgb_layout::NAME, rgb_layout::TRC, rgb_layout::TRC_SIZE_FIELDS)
    };

    let mut buf = template.to_vec();
    buf[84..100].fill(0);
    put_u32(&mut buf, 80, CREATOR);
    for (i, &c) in meta.name.iter().enumerate() {
        put_u16(&mut buf, name_at + i * 2, c as u16);
    }

    if !grey && meta.has_chromaticities() {
        let adapt = chromatic_adaptation(meta.white);
        let axyz = adapt * rgb_to_xyz(meta.red, meta.green, meta.blue, meta.white);

        for i in 0..3 {
            for (j, x) in adapt.row(i).to_array().into_iter().enumerate() {
                put_i32(&mut buf, rgb_layout::CHAD_DATA + (i * 3 + j) * 4, f64_to_s15_fixed16(x));
            }
        }
        for (c, &at) in rgb_layout::COLORANT_DATA.iter().enumerate() {
            for (j, x) in axyz.column(c).to_array().into_iter().enumerate() {
                put_i32(&mut buf, at + j * 4, f64_to_s15_fixed16(x));
            }
        }
    }

    if meta.gamma != 0.0 {
        let len = buf.len() - 16;
        buf.truncate(len);
        put_u32(&mut buf, 0, len as u32);
        for &at in size_fields {
            put_u32(&mut buf, at, 16);
        }
        put_u16(&mut buf, trc_at + 8, 0);
        put_i32(&mut buf, trc_at + 12, f64_to_s15_fixed16(1.0 / meta.gamma));
    }

    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icc::IccReader;

    fn entry(data: &[u8], i: usize) -> (u32, u32, u32) {
        let r = IccReader::new(data);
        let e = 132 + i * 12;
        (r.u32_at(e).unwrap(), r.u32_at(e + 4).unwrap(), r.u32_at(e + 8).unwrap())
    }

    #[test]
    fn test_rgb_template_layout() {
        let data = srgb_v4();
        assert_eq!(data.len(), rgb_layout::LEN);
        assert_eq!(entry(data, 0), (TagSignature::DESC.0, 252, 36));
        assert_eq!(entry(data, 3), (TagSignature::CHAD.0, 344, 44));
        assert_eq!(entry(data, 4).1 + 8, rgb_layout::COLORANT_DATA[0] as u32);
        assert_eq!(entry(data, 6).1 + 8, rgb_layout::COLORANT_DATA[2] as u32);
        for (i, &field) in rgb_layout::TRC_SIZE_FIELDS.iter().enumerate() {
            assert_eq!(132 + (7 + i) * 12 + 8, field);
            let (_, offset, size) = entry(data, 7 + i);
            assert_eq!((offset, size), (rgb_layout::TRC as u32, 32));
        }
        assert_eq!(&data[rgb_layout::NAME..rgb_layout::NAME + 8], b"\0s\0R\0G\0B");
    }

    #[test]
    fn test_grey_template_layout() {
        let data = sgrey_v4();
        assert_eq!(data.len(), grey_layout::LEN);
        assert_eq!(entry(data, 4), (TagSignature::GRAY_TRC.0, grey_layout::TRC as u32, 32));
        assert_eq!(132 + 4 * 12 + 8, grey_layout::TRC_SIZE_FIELDS[0]);
        assert_eq!(&data[grey_layout::NAME..grey_layout::NAME + 8], b"\0s\0G\0r\0y");
    }

    #[test]
    fn test_cmyk_lut_size() {
        assert_eq!(cmyk_lut().len(), 176);
    }

    #[test]
    fn test_patch_name_and_gamma() {
        let meta = ProfileMetadata {
            name: *b"gAMA",
            gamma: 1.0 / 2.2,
            ..Default::default()
        };
        let data = patch_template(false, &meta);
        let r = IccReader::new(&data);

        assert_eq!(data.len(), rgb_layout::LEN - 16);
        assert_eq!(r.u32_at(0).unwrap() as usize, data.len());
        assert_eq!(r.u32_at(80).unwrap(), CREATOR);
        assert_eq!(&data[rgb_layout::NAME..rgb_layout::NAME + 8], b"\0g\0A\0M\0A");
        assert_eq!(r.u16_at(rgb_layout::TRC + 8).unwrap(), 0);
        assert_eq!(r.i32_at(rgb_layout::TRC + 12).unwrap(), 0x23333);
        assert_eq!(entry(&data, 8).2, 16);
    }

    #[test]
    fn test_patch_without_chromaticities_keeps_colorants() {
        let meta = ProfileMetadata {
            name: *b"test",
            white: D65,
            ..Default::default()
        };
        let data = patch_template(false, &meta);
        let at = rgb_layout::COLORANT_DATA[0];
        assert_eq!(&data[at..at + 12], &srgb_v4()[at..at + 12]);
    }
}
