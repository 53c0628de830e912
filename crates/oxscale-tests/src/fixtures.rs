//! Test fixtures
//!
//! Hand-assembled ICC profiles and seeded random inputs.

use oxscale_core::Matrix3x3;
use oxscale_core::Vector3;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Random matrix with entries in `-2..2` and `|det| >= 0.05`
pub fn random_invertible_matrix(rng: &mut impl Rng) -> Matrix3x3 {
    loop {
        let mut column = || {
            Vector3::new(
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-2.0..2.0),
            )
        };
        let m = Matrix3x3::from_columns(column(), column(), column());
        if m.determinant().abs() >= 0.05 {
            return m;
        }
    }
}

/// Encode an `XYZ ` tag
pub fn xyz_tag(v: [f64; 3]) -> Vec<u8> {
    let mut out = b"XYZ \0\0\0\0".to_vec();
    for c in v {
        out.extend_from_slice(&((c * 65536.0).round() as i32).to_be_bytes());
    }
    out
}

/// Encode a `curv` tag
pub fn curv_tag(points: &[u16]) -> Vec<u8> {
    let mut out = b"curv\0\0\0\0".to_vec();
    out.extend_from_slice(&(points.len() as u32).to_be_bytes());
    for p in points {
        out.extend_from_slice(&p.to_be_bytes());
    }
    out
}

/// Encode a `para` tag from s15.16 parameters
pub fn para_tag(func: u16, params: &[i32]) -> Vec<u8> {
    let mut out = b"para\0\0\0\0".to_vec();
    out.extend_from_slice(&func.to_be_bytes());
    out.extend_from_slice(&[0, 0]);
    for p in params {
        out.extend_from_slice(&p.to_be_bytes());
    }
    out
}

enum TagData {
    Owned(Vec<u8>),
    Linked(usize),
}

/// Builds ICC profiles byte by byte
///
/// Tags are laid out after the table in insertion order, each padded to four
/// bytes. [`IccBuilder::link`] points a second signature at an earlier tag's
/// data, the way RGB profiles share one TRC.
pub struct IccBuilder {
    version: u8,
    class: [u8; 4],
    data_space: [u8; 4],
    pcs: [u8; 4],
    tags: Vec<([u8; 4], TagData)>,
}

impl IccBuilder {
    pub fn new(data_space: &[u8; 4], pcs: &[u8; 4]) -> Self {
        Self {
            version: 4,
            class: *b"mntr",
            data_space: *data_space,
            pcs: *pcs,
            tags: Vec::new(),
        }
    }

    /// Matrix/TRC RGB profile with one shared curve
    pub fn rgb(columns: [[f64; 3]; 3], trc: Vec<u8>) -> Self {
        Self::new(b"RGB ", b"XYZ ")
            .tag(b"rXYZ", xyz_tag(columns[0]))
            .tag(b"gXYZ", xyz_tag(columns[1]))
            .tag(b"bXYZ", xyz_tag(columns[2]))
            .tag(b"rTRC", trc)
            .link(b"gTRC", b"rTRC")
            .link(b"bTRC", b"rTRC")
    }

    pub fn grey(trc: Vec<u8>) -> Self {
        Self::new(b"GRAY", b"XYZ ").tag(b"kTRC", trc)
    }

    pub fn version(mut self, major: u8) -> Self {
        self.version = major;
        self
    }

    pub fn class(mut self, class: &[u8; 4]) -> Self {
        self.class = *class;
        self
    }

    pub fn tag(mut self, sig: &[u8; 4], data: Vec<u8>) -> Self {
        self.tags.push((*sig, TagData::Owned(data)));
        self
    }

    /// Add `sig` sharing the data of the earlier tag `target`
    ///
    /// # Panics
    ///
    /// If `target` has not been added.
    pub fn link(mut self, sig: &[u8; 4], target: &[u8; 4]) -> Self {
        let index = self
            .tags
            .iter()
            .position(|(s, _)| s == target)
            .unwrap_or_else(|| panic!("no tag {}", String::from_utf8_lossy(target)));
        self.tags.push((*sig, TagData::Linked(index)));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let table_end = 132 + self.tags.len() * 12;
        let mut table = Vec::with_capacity(self.tags.len() * 12);
        let mut body = Vec::new();
        let mut placed: Vec<(u32, u32)> = Vec::with_capacity(self.tags.len());

        for (sig, data) in &self.tags {
            let (offset, size) = match data {
                TagData::Owned(bytes) => {
                    let offset = (table_end + body.len()) as u32;
                    body.extend_from_slice(bytes);
                    body.resize(body.len().next_multiple_of(4), 0);
                    (offset, bytes.len() as u32)
                }
                TagData::Linked(index) => placed[*index],
            };
            placed.push((offset, size));
            table.extend_from_slice(sig);
            table.extend_from_slice(&offset.to_be_bytes());
            table.extend_from_slice(&size.to_be_bytes());
        }

        let mut out = vec![0u8; 128];
        out[8] = self.version;
        out[12..16].copy_from_slice(&self.class);
        out[16..20].copy_from_slice(&self.data_space);
        out[20..24].copy_from_slice(&self.pcs);
        out[36..40].copy_from_slice(b"acsp");
        // D50 illuminant
        for (i, v) in [0xf6d6i32, 0x10000, 0xd32d].into_iter().enumerate() {
            out[68 + i * 4..72 + i * 4].copy_from_slice(&v.to_be_bytes());
        }
        out.extend_from_slice(&(self.tags.len() as u32).to_be_bytes());
        out.extend_from_slice(&table);
        out.extend_from_slice(&body);

        let len = out.len() as u32;
        out[..4].copy_from_slice(&len.to_be_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_layout() {
        let bytes = IccBuilder::grey(curv_tag(&[0x100])).build();
        assert_eq!(&bytes[36..40], b"acsp");
        assert_eq!(u32::from_be_bytes(bytes[..4].try_into().unwrap()) as usize, bytes.len());
        // one entry, 14-byte curv padded to 16
        assert_eq!(bytes.len(), 132 + 12 + 16);
    }

    #[test]
    fn test_builder_links_share_data() {
        let bytes = IccBuilder::rgb([[0.4, 0.2, 0.0], [0.4, 0.7, 0.1], [0.1, 0.1, 0.7]], curv_tag(&[]))
            .build();
        let entry = |i: usize| &bytes[132 + i * 12 + 4..132 + i * 12 + 12];
        assert_eq!(entry(3), entry(4));
        assert_eq!(entry(3), entry(5));
    }

    #[test]
    fn test_random_invertible_matrix() {
        let mut rng = seeded_rng(7);
        for _ in 0..100 {
            assert!(random_invertible_matrix(&mut rng).invert().is_some());
        }
    }
}
