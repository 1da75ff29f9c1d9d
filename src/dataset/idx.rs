//! Reader for the IDX files the handwritten-digit benchmark is distributed in.
//!
//! Layout (all integers big-endian `u32`):
//!
//! | file   | magic  | header                 | payload                      |
//! |--------|--------|------------------------|------------------------------|
//! | images | `2051` | `count, rows, cols`    | `count·rows·cols` `u8` pixels |
//! | labels | `2049` | `count`                | `count` `u8` labels          |
//!
//! Nothing is downloaded: the four uncompressed files must already be on disk.

use std::fs;
use std::path::Path;

use log::debug;

use crate::dataset::InMemoryDataset;
use crate::error::{Error, Result};

pub const IMAGES_MAGIC: u32 = 2051;
pub const LABELS_MAGIC: u32 = 2049;

/// Number of digit classes.
pub const NUM_CLASSES: usize = 10;

/// Decoded image file: pixels scaled to `[0, 1]`, one flattened row-major image per row.
#[derive(Debug, Clone)]
pub struct IdxImages {
    pub count: usize,
    pub rows: usize,
    pub cols: usize,
    pub pixels: Vec<f32>,
}

impl IdxImages {
    pub fn num_features(&self) -> usize {
        self.rows * self.cols
    }
}

/// Which half of the benchmark to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    fn file_names(self) -> (&'static str, &'static str) {
        match self {
            Split::Train => ("train-images-idx3-ubyte", "train-labels-idx1-ubyte"),
            Split::Test => ("t10k-images-idx3-ubyte", "t10k-labels-idx1-ubyte"),
        }
    }
}

struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn read_u32(&mut self, what: &str) -> Result<u32> {
        let bytes = self.take(4, what)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        let end = self
            .offset
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| {
                Error::Format(format!(
                    "truncated {}: needed {} bytes at offset {}, file has {}",
                    what,
                    n,
                    self.offset,
                    self.data.len()
                ))
            })?;
        let slice = &self.data[self.offset..end];
        self.offset = end;
        Ok(slice)
    }
}

fn check_magic(cursor: &mut Cursor<'_>, expected: u32) -> Result<()> {
    let magic = cursor.read_u32("magic number")?;
    if magic != expected {
        return Err(Error::Format(format!(
            "bad magic number: expected {}, got {}",
            expected, magic
        )));
    }
    Ok(())
}

/// Decodes an in-memory IDX image file.
pub fn parse_idx_images(data: &[u8]) -> Result<IdxImages> {
    let mut cursor = Cursor::new(data);
    check_magic(&mut cursor, IMAGES_MAGIC)?;
    let count = cursor.read_u32("image count")? as usize;
    let rows = cursor.read_u32("row count")? as usize;
    let cols = cursor.read_u32("column count")? as usize;
    let len = count
        .checked_mul(rows)
        .and_then(|v| v.checked_mul(cols))
        .ok_or_else(|| Error::Format("image dimensions overflow".into()))?;
    let payload = cursor.take(len, "image payload")?;
    Ok(IdxImages {
        count,
        rows,
        cols,
        pixels: payload.iter().map(|&px| px as f32 / 255.0).collect(),
    })
}

/// Decodes an in-memory IDX label file.
pub fn parse_idx_labels(data: &[u8]) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(data);
    check_magic(&mut cursor, LABELS_MAGIC)?;
    let count = cursor.read_u32("label count")? as usize;
    Ok(cursor.take(count, "label payload")?.to_vec())
}

pub fn read_idx_images(path: impl AsRef<Path>) -> Result<IdxImages> {
    parse_idx_images(&fs::read(path)?)
}

pub fn read_idx_labels(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    parse_idx_labels(&fs::read(path)?)
}

/// Loads one split of the digit benchmark from `dir`.
///
/// # Errors
/// - [`Error::Io`] if a file cannot be read.
/// - [`Error::Format`] if a file is malformed, the image and label counts disagree, or a
///   label is not a digit.
pub fn load_mnist(dir: impl AsRef<Path>, split: Split) -> Result<InMemoryDataset> {
    let dir = dir.as_ref();
    let (images_file, labels_file) = split.file_names();
    let images = read_idx_images(dir.join(images_file))?;
    let labels = read_idx_labels(dir.join(labels_file))?;

    if images.count != labels.len() {
        return Err(Error::Format(format!(
            "{} images but {} labels",
            images.count,
            labels.len()
        )));
    }
    if let Some(bad) = labels.iter().find(|&&l| l as usize >= NUM_CLASSES) {
        return Err(Error::Format(format!("label {} is not a digit", bad)));
    }

    debug!(
        "loaded {:?} split: {} images of {}x{}",
        split, images.count, images.rows, images.cols
    );
    let num_features = images.num_features();
    InMemoryDataset::from_flat(
        images.pixels,
        num_features,
        labels.into_iter().map(f32::from).collect(),
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::dataset::Dataset;

    pub(crate) fn images_bytes(count: u32, rows: u32, cols: u32, pixels: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        for v in [IMAGES_MAGIC, count, rows, cols] {
            out.extend_from_slice(&v.to_be_bytes());
        }
        out.extend_from_slice(pixels);
        out
    }

    pub(crate) fn labels_bytes(labels: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&LABELS_MAGIC.to_be_bytes());
        out.extend_from_slice(&(labels.len() as u32).to_be_bytes());
        out.extend_from_slice(labels);
        out
    }

    #[test]
    fn test_parse_images_scales_pixels() {
        let bytes = images_bytes(2, 1, 2, &[0, 255, 51, 102]);
        let images = parse_idx_images(&bytes).unwrap();
        assert_eq!((images.count, images.rows, images.cols), (2, 1, 2));
        assert_eq!(images.num_features(), 2);
        assert_eq!(images.pixels, vec![0.0, 1.0, 0.2, 0.4]);
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!(parse_idx_labels(&labels_bytes(&[3, 1, 4])).unwrap(), vec![3, 1, 4]);
    }

    #[test]
    fn test_bad_magic() {
        let err = parse_idx_images(&labels_bytes(&[1, 2])).unwrap_err();
        assert!(matches!(err, Error::Format(ref m) if m.contains("magic")));
    }

    #[test]
    fn test_truncated_payload() {
        let bytes = images_bytes(2, 2, 2, &[0; 7]);
        let err = parse_idx_images(&bytes).unwrap_err();
        assert!(matches!(err, Error::Format(ref m) if m.contains("truncated")));

        let err = parse_idx_labels(&[0, 0, 8]).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn test_load_mnist_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("t10k-images-idx3-ubyte"),
            images_bytes(3, 2, 2, &[255; 12]),
        )
        .unwrap();
        fs::write(
            dir.path().join("t10k-labels-idx1-ubyte"),
            labels_bytes(&[7, 0, 9]),
        )
        .unwrap();

        let ds = load_mnist(dir.path(), Split::Test).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.num_features(), 4);
        assert_eq!(ds.labels(), &[7.0, 0.0, 9.0]);
    }

    #[test]
    fn test_load_mnist_count_mismatch_and_bad_label() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("train-images-idx3-ubyte");
        let labels = dir.path().join("train-labels-idx1-ubyte");

        fs::write(&images, images_bytes(2, 1, 1, &[1, 2])).unwrap();
        fs::write(&labels, labels_bytes(&[1])).unwrap();
        assert!(matches!(
            load_mnist(dir.path(), Split::Train),
            Err(Error::Format(ref m)) if m.contains("labels")
        ));

        fs::write(&labels, labels_bytes(&[1, 10])).unwrap();
        assert!(matches!(
            load_mnist(dir.path(), Split::Train),
            Err(Error::Format(ref m)) if m.contains("not a digit")
        ));
    }

    #[test]
    fn test_missing_files_are_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_mnist(dir.path(), Split::Train),
            Err(Error::Io(_))
        ));
    }
}
