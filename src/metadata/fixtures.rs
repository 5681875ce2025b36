//! In-memory EXIF images for tests
//!
//! Builds little-endian TIFF structures with an optional Exif IFD
//! (DateTimeOriginal) and GPS IFD, and wraps them in a minimal JPEG.

const TYPE_ASCII: u16 = 2;
const TYPE_SHORT: u16 = 3;
const TYPE_LONG: u16 = 4;
const TYPE_RATIONAL: u16 = 5;

const TAG_ORIENTATION: u16 = 0x0112;
const TAG_EXIF_POINTER: u16 = 0x8769;
const TAG_GPS_POINTER: u16 = 0x8825;
const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;

struct Entry {
    tag: u16,
    kind: u16,
    count: u32,
    data: Vec<u8>,
}

impl Entry {
    fn ascii(tag: u16, s: &str) -> Self {
        let mut data = s.as_bytes().to_vec();
        data.push(0);
        Self {
            tag,
            kind: TYPE_ASCII,
            count: data.len() as u32,
            data,
        }
    }

    fn long(tag: u16, value: u32) -> Self {
        Self {
            tag,
            kind: TYPE_LONG,
            count: 1,
            data: value.to_le_bytes().to_vec(),
        }
    }

    fn short(tag: u16, value: u16) -> Self {
        Self {
            tag,
            kind: TYPE_SHORT,
            count: 1,
            data: value.to_le_bytes().to_vec(),
        }
    }

    fn rationals(tag: u16, values: &[(u32, u32)]) -> Self {
        let mut data = Vec::with_capacity(values.len() * 8);
        for (num, denom) in values {
            data.extend_from_slice(&num.to_le_bytes());
            data.extend_from_slice(&denom.to_le_bytes());
        }
        Self {
            tag,
            kind: TYPE_RATIONAL,
            count: values.len() as u32,
            data,
        }
    }
}

/// Serialize one IFD that starts at `start` (offset from the TIFF header).
/// Values longer than four bytes are placed right after the IFD.
fn ifd_bytes(start: u32, entries: &[Entry]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut extra = Vec::new();
    let mut data_offset = start + 2 + 12 * entries.len() as u32 + 4;

    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for entry in entries {
        out.extend_from_slice(&entry.tag.to_le_bytes());
        out.extend_from_slice(&entry.kind.to_le_bytes());
        out.extend_from_slice(&entry.count.to_le_bytes());
        if entry.data.len() <= 4 {
            let mut inline = entry.data.clone();
            inline.resize(4, 0);
            out.extend_from_slice(&inline);
        } else {
            out.extend_from_slice(&data_offset.to_le_bytes());
            extra.extend_from_slice(&entry.data);
            if entry.data.len() % 2 == 1 {
                extra.push(0);
            }
            data_offset = start + 2 + 12 * entries.len() as u32 + 4 + extra.len() as u32;
        }
    }
    // No next IFD
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&extra);
    out
}

type Dms = (u32, u32, u32);

/// Builder for a synthetic EXIF payload
#[derive(Default)]
pub struct ExifFixture {
    gps: Vec<Entry>,
    exif: Vec<Entry>,
}

impl ExifFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latitude(mut self, (d, m, s): Dms, hemisphere: &str) -> Self {
        self.gps.push(Entry::ascii(1, hemisphere));
        self.gps.push(Entry::rationals(2, &[(d, 1), (m, 1), (s, 1)]));
        self
    }

    pub fn longitude(mut self, (d, m, s): Dms, hemisphere: &str) -> Self {
        self.gps.push(Entry::ascii(3, hemisphere));
        self.gps.push(Entry::rationals(4, &[(d, 1), (m, 1), (s, 1)]));
        self
    }

    /// Raw rational components for the latitude sub-tag
    pub fn latitude_raw(mut self, values: &[(u32, u32)]) -> Self {
        self.gps.push(Entry::rationals(2, values));
        self
    }

    pub fn datetime_original(mut self, value: &str) -> Self {
        self.exif.push(Entry::ascii(TAG_DATE_TIME_ORIGINAL, value));
        self
    }

    /// Bare TIFF stream ("II*\0" header)
    pub fn to_tiff(&self) -> Vec<u8> {
        let ifd0_count = 1 + usize::from(!self.exif.is_empty()) + usize::from(!self.gps.is_empty());
        let ifd0_size = 2 + 12 * ifd0_count as u32 + 4;

        let exif_start = 8 + ifd0_size;
        let exif_ifd = if self.exif.is_empty() {
            Vec::new()
        } else {
            ifd_bytes(exif_start, &self.exif)
        };

        let gps_start = exif_start + exif_ifd.len() as u32;
        let gps_ifd = if self.gps.is_empty() {
            Vec::new()
        } else {
            ifd_bytes(gps_start, &self.gps)
        };

        let mut ifd0 = vec![Entry::short(TAG_ORIENTATION, 1)];
        if !self.exif.is_empty() {
            ifd0.push(Entry::long(TAG_EXIF_POINTER, exif_start));
        }
        if !self.gps.is_empty() {
            ifd0.push(Entry::long(TAG_GPS_POINTER, gps_start));
        }

        let mut out = b"II".to_vec();
        out.extend_from_slice(&42u16.to_le_bytes());
        out.extend_from_slice(&8u32.to_le_bytes());
        out.extend_from_slice(&ifd_bytes(8, &ifd0));
        out.extend_from_slice(&exif_ifd);
        out.extend_from_slice(&gps_ifd);
        out
    }

    /// Minimal JPEG: SOI, APP1 "Exif", EOI
    pub fn to_jpeg(&self) -> Vec<u8> {
        let tiff = self.to_tiff();
        let segment_len = (2 + 6 + tiff.len()) as u16;

        let mut out = vec![0xFF, 0xD8, 0xFF, 0xE1];
        out.extend_from_slice(&segment_len.to_be_bytes());
        out.extend_from_slice(b"Exif\0\0");
        out.extend_from_slice(&tiff);
        out.extend_from_slice(&[0xFF, 0xD9]);
        out
    }
}

/// JPEG with a JFIF header and no EXIF segment
pub fn jpeg_without_exif() -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
    out.extend_from_slice(b"JFIF\0");
    out.extend_from_slice(&[0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00]);
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}
