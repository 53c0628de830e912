//! ICC profile parser and classifier
//!
//! Only what the fast conversion paths need is decoded: header color spaces,
//! the tag table, shared TRC curves and the RGB colorant matrix. LUT-based
//! profiles are classified and handed back with their bytes untouched.

use std::sync::Arc;

use tracing::{debug, trace};

use super::error::IccError;
use super::reader::IccReader;
use super::types::{
    PROFILE_SIGNATURE, ProfileColorSpace, TagEntry, TagSignature, TypeSignature,
};
use crate::color::ProfileCurve;
use crate::math::{Matrix3x3, Vector3};
use crate::math::fixed::s15_fixed16_to_f64;
use crate::profile::{ColorProfile, ColorProfileType};

/// 132 bytes of header and tag count, one 12-byte tag entry and a 16-byte
/// tag. Such a profile is useless but parseable.
pub const MIN_PROFILE_LENGTH: usize = 160;

const HEADER_LENGTH: usize = 128;
const TAG_TABLE_START: usize = HEADER_LENGTH + 4;
const TAG_ENTRY_LENGTH: usize = 12;
const MIN_TAG_LENGTH: u32 = 8;

/// Parameters read for `para` function types 0 through 4
const PARA_PARAM_COUNT: [usize; 5] = [1, 3, 4, 5, 7];

const FIXED_ONE: i32 = 0x10000;

/// Parse a profile, degrading any failure to [`ColorProfile::invalid`]
pub fn parse(data: &[u8]) -> Arc<ColorProfile> {
    match try_parse(data) {
        Ok(profile) => {
            debug!(
                len = data.len(),
                profile_type = ?profile.profile_type(),
                data_space = ?profile.data_color_space(),
                pcs = ?profile.pcs_color_space(),
                "parsed ICC profile"
            );
            Arc::new(profile)
        }
        Err(err) => {
            debug!(len = data.len(), %err, "rejected ICC profile");
            Arc::clone(ColorProfile::invalid())
        }
    }
}

/// Parse a profile, reporting why it was rejected
pub fn try_parse(data: &[u8]) -> Result<ColorProfile, IccError> {
    if data.len() < MIN_PROFILE_LENGTH {
        return Err(IccError::TooSmall {
            expected: MIN_PROFILE_LENGTH,
            actual: data.len(),
        });
    }

    let r = IccReader::new(data);
    let header_size = r.u32_at(0)?;
    if header_size as usize != data.len() {
        return Err(IccError::SizeMismatch {
            header_size,
            actual_size: data.len(),
        });
    }

    let signature = r.u32_at(36)?;
    if signature != PROFILE_SIGNATURE {
        return Err(IccError::InvalidSignature(signature));
    }

    let major = r.u8_at(8)?;
    if !matches!(major, 2 | 4) {
        return Err(IccError::UnsupportedVersion(major));
    }

    let data_space = ProfileColorSpace::from_data_signature(r.u32_at(16)?);
    let pcs = ProfileColorSpace::from_pcs_signature(r.u32_at(20)?);

    if pcs != ProfileColorSpace::Xyz
        || !matches!(data_space, ProfileColorSpace::Rgb | ProfileColorSpace::Grey)
    {
        let profile_type = match read_tag_table(&r) {
            Ok(tags) if has_lut(&tags) => ColorProfileType::Table,
            _ => ColorProfileType::Unknown,
        };
        trace!(?data_space, ?pcs, ?profile_type, "no fast path for color space");
        return Ok(ColorProfile::unclassified(data.to_vec(), data_space, pcs, profile_type));
    }

    let tags = read_tag_table(&r)?;
    if has_lut(&tags) {
        return Ok(ColorProfile::unclassified(
            data.to_vec(),
            data_space,
            pcs,
            ColorProfileType::Table,
        ));
    }

    if data_space == ProfileColorSpace::Grey {
        let trc = tag_data(&r, &tags, TagSignature::GRAY_TRC)?;
        let curve = decode_trc(trc, TagSignature::GRAY_TRC)?;
        return Ok(ColorProfile::curve(data.to_vec(), None, curve, data_space, pcs));
    }

    let rtrc = tag_data(&r, &tags, TagSignature::RED_TRC)?;
    let gtrc = tag_data(&r, &tags, TagSignature::GREEN_TRC)?;
    let btrc = tag_data(&r, &tags, TagSignature::BLUE_TRC)?;
    if rtrc != gtrc || rtrc != btrc {
        return Err(IccError::ChannelCurvesDiffer);
    }

    let curve = decode_trc(rtrc, TagSignature::RED_TRC)?;
    let matrix = decode_matrix(
        tag_data(&r, &tags, TagSignature::RED_COLORANT)?,
        tag_data(&r, &tags, TagSignature::GREEN_COLORANT)?,
        tag_data(&r, &tags, TagSignature::BLUE_COLORANT)?,
    )?;
    let inverse = matrix.invert().ok_or(IccError::SingularMatrix)?;

    Ok(ColorProfile::matrix(
        data.to_vec(),
        None,
        matrix,
        inverse,
        curve,
        data_space,
        pcs,
    ))
}

/// Read and validate every tag table entry
fn read_tag_table(r: &IccReader<'_>) -> Result<Vec<TagEntry>, IccError> {
    let len = r.len();
    let count = r.u32_at(HEADER_LENGTH)?;
    let table_end = TAG_TABLE_START as u64 + count as u64 * TAG_ENTRY_LENGTH as u64;
    if table_end > len as u64 {
        return Err(IccError::TagTableOverflow {
            count,
            profile_size: len,
        });
    }

    (0..count as usize)
        .map(|i| {
            let entry = TAG_TABLE_START + i * TAG_ENTRY_LENGTH;
            let tag = TagSignature(r.u32_at(entry)?);
            let offset = r.u32_at(entry + 4)?;
            let size = r.u32_at(entry + 8)?;

            if size < MIN_TAG_LENGTH {
                return Err(IccError::TagTooSmall { tag, size });
            }

            let end = offset as u64 + size as u64;
            if end > len as u64 {
                return Err(IccError::TagOutOfBounds {
                    tag,
                    offset,
                    size,
                    profile_size: len,
                });
            }

            Ok(TagEntry {
                tag,
                range: offset as usize..end as usize,
            })
        })
        .collect()
}

fn has_lut(tags: &[TagEntry]) -> bool {
    tags.iter()
        .any(|e| e.tag == TagSignature::A2B0 || e.tag == TagSignature::B2A0)
}

fn tag_data<'a>(
    r: &IccReader<'a>,
    tags: &[TagEntry],
    tag: TagSignature,
) -> Result<&'a [u8], IccError> {
    let entry = tags
        .iter()
        .find(|e| e.tag == tag)
        .ok_or(IccError::MissingTag(tag))?;
    r.bytes(entry.range.clone())
}

/// Decode a `curv` or `para` tag into a shared curve
///
/// Identity curves decode to [`ProfileCurve::linear`].
pub fn decode_trc(data: &[u8], tag: TagSignature) -> Result<Arc<ProfileCurve>, IccError> {
    let r = IccReader::new(data);
    if r.len() < 12 {
        return Err(IccError::InvalidCurve(tag));
    }

    let type_sig = r.u32_at(0)?;
    match TypeSignature(type_sig) {
        TypeSignature::CURVE => decode_curv(&r, tag),
        TypeSignature::PARA => decode_para(&r, tag),
        _ => Err(IccError::InvalidTagType { tag, type_sig }),
    }
}

fn decode_curv(r: &IccReader<'_>, tag: TagSignature) -> Result<Arc<ProfileCurve>, IccError> {
    let invalid = || IccError::InvalidCurve(tag);

    let count = r.u32_at(8)? as usize;
    let end = count
        .checked_mul(2)
        .and_then(|n| n.checked_add(12))
        .ok_or_else(invalid)?;
    let raw = r.bytes(12..end).map_err(|_| invalid())?;

    let points: Vec<u16> = raw
        .chunks_exact(2)
        .map(|p| u16::from_be_bytes([p[0], p[1]]))
        .collect();

    match points.as_slice() {
        [] | [0x100] | [0, u16::MAX] => Ok(Arc::clone(ProfileCurve::linear())),
        [0] => Err(invalid()),
        [0x1cd] => Ok(ProfileCurve::from_power(1.8)),
        [0x233] => Ok(Arc::clone(ProfileCurve::adobe_rgb())),
        [g] => Ok(ProfileCurve::from_power(*g as f64 / 256.0)),
        _ => ProfileCurve::from_points(&points).ok_or_else(invalid),
    }
}

fn decode_para(r: &IccReader<'_>, tag: TagSignature) -> Result<Arc<ProfileCurve>, IccError> {
    let invalid = || IccError::InvalidCurve(tag);

    let func = r.u16_at(8)?;
    let count = *PARA_PARAM_COUNT.get(func as usize).ok_or_else(invalid)?;

    // g, a, b, c, d, e, f in file order
    let mut p = [0i32; 7];
    for (i, v) in p.iter_mut().enumerate().take(count) {
        *v = r.i32_at(12 + i * 4).map_err(|_| invalid())?;
    }
    let [g, a, b, c, d, e, f] = p;

    if g == 0
        || (a == 0 && func > 0)
        || ((c as u32) > FIXED_ONE as u32 && func >= 2)
        || ((d as u32) > FIXED_ONE as u32 && func >= 3)
        || ((e as u32) > FIXED_ONE as u32 && func == 4)
    {
        return Err(invalid());
    }

    // x/32 slope-limited power curve
    let slope_limited = func == 3 && a == FIXED_ONE && b == 0 && c == FIXED_ONE / 32;
    if func == 0 || slope_limited {
        return Ok(match g {
            FIXED_ONE => Arc::clone(ProfileCurve::linear()),
            0x1cd00 | 0x1cccd => ProfileCurve::from_power(1.8),
            0x23300 | 0x23333 => Arc::clone(ProfileCurve::adobe_rgb()),
            _ => ProfileCurve::from_power(s15_fixed16_to_f64(g)),
        });
    }

    let [dg, da, db, mut dc, mut dd, mut de, mut df] = p.map(s15_fixed16_to_f64);
    match func {
        1 => dd = -db / da,
        2 => {
            df = dc;
            de = dc;
            dc = 0.0;
            dd = -db / da;
        }
        _ => de -= dc,
    }

    Ok(ProfileCurve::from_parameters(da, db, dc, dd, de, df, dg))
}

/// Assemble the RGB→XYZ matrix from the three colorant tags
///
/// Each colorant becomes one column.
pub fn decode_matrix(rxyz: &[u8], gxyz: &[u8], bxyz: &[u8]) -> Result<Matrix3x3, IccError> {
    let [r, g, b] = [rxyz, gxyz, bxyz].map(IccReader::new);

    let header = r.bytes(0..8)?;
    let type_sig = r.u32_at(0)?;
    if TypeSignature(type_sig) != TypeSignature::XYZ {
        return Err(IccError::InvalidTagType {
            tag: TagSignature::RED_COLORANT,
            type_sig,
        });
    }
    if g.bytes(0..8)? != header || b.bytes(0..8)? != header {
        return Err(IccError::ColorantHeaderMismatch);
    }

    let column = |t: &IccReader<'_>| -> Result<Vector3, IccError> {
        Ok(Vector3::new(
            s15_fixed16_to_f64(t.i32_at(8)?),
            s15_fixed16_to_f64(t.i32_at(12)?),
            s15_fixed16_to_f64(t.i32_at(16)?),
        ))
    };

    Ok(Matrix3x3::from_columns(column(&r)?, column(&g)?, column(&b)?))
}
