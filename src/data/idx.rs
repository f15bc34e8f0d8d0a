//! IDX (MNIST-style) image/label parsing.
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-1:   0x00 0x00   (reserved, must be zero)
//! byte   2:     0x08        (dtype = uint8)
//! byte   3:     0x03        (number of dimensions = 3)
//! bytes  4-7:   N           (number of images, big-endian u32)
//! bytes  8-11:  rows        (image height in pixels, big-endian u32)
//! bytes 12-15:  cols        (image width in pixels, big-endian u32)
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-1:   0x00 0x00   (reserved, must be zero)
//! byte   2:     0x08        (dtype = uint8)
//! byte   3:     0x01        (number of dimensions = 1)
//! bytes  4-7:   N           (number of labels, big-endian u32)
//! bytes  8..:   N bytes, each a class index in [0, n_classes)
//! ```

use std::path::Path;

use tracing::info;

use crate::data::dataset::Dataset;
use crate::error::{PrnnError, Result};

pub const MNIST_TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
pub const MNIST_TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
pub const MNIST_TEST_IMAGES: &str = "t10k-images-idx3-ubyte";
pub const MNIST_TEST_LABELS: &str = "t10k-labels-idx1-ubyte";
pub const MNIST_CLASSES: usize = 10;

fn idx_err(msg: String) -> PrnnError {
    PrnnError::Idx(msg)
}

fn read_be_u32(bytes: &[u8], offset: usize) -> usize {
    u32::from_be_bytes([
        bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3],
    ]) as usize
}

fn check_magic(bytes: &[u8], dims: u8, what: &str) -> Result<()> {
    if bytes[0] != 0x00 || bytes[1] != 0x00 {
        return Err(idx_err(format!(
            "{} file: bytes 0-1 must be 0x00 0x00 (reserved), got 0x{:02X} 0x{:02X}.",
            what, bytes[0], bytes[1]
        )));
    }
    if bytes[2] != 0x08 {
        return Err(idx_err(format!(
            "{} file: byte 2 (dtype) must be 0x08 (uint8), got 0x{:02X}.",
            what, bytes[2]
        )));
    }
    if bytes[3] != dims {
        return Err(idx_err(format!(
            "{} file: byte 3 (dimensions) must be {}, got {}.",
            what, dims, bytes[3]
        )));
    }
    Ok(())
}

/// Parses an IDX3 image buffer and an IDX1 label buffer into a `Dataset`.
/// Pixels are divided by 255 so every feature lies in `[0, 1]`; labels stay
/// plain class indices.
pub fn parse_idx_pair(image_bytes: &[u8], label_bytes: &[u8], n_classes: usize) -> Result<Dataset> {
    if n_classes < 2 {
        return Err(PrnnError::invalid(format!("n_classes must be at least 2, got {}.", n_classes)));
    }

    // ── Image header ───────────────────────────────────────────────────────

    if image_bytes.len() < 16 {
        return Err(idx_err(format!(
            "image file too short: expected at least 16 header bytes, got {}.",
            image_bytes.len()
        )));
    }
    check_magic(image_bytes, 0x03, "image")?;

    let n_items = read_be_u32(image_bytes, 4);
    let rows = read_be_u32(image_bytes, 8);
    let cols = read_be_u32(image_bytes, 12);

    let n_pixels = rows.checked_mul(cols).ok_or_else(|| {
        idx_err(format!("image file: rows * cols overflows usize (rows={}, cols={}).", rows, cols))
    })?;
    let data_len = n_items.checked_mul(n_pixels).ok_or_else(|| {
        idx_err(format!(
            "image file: n_items * n_pixels overflows usize (n_items={}, n_pixels={}).",
            n_items, n_pixels
        ))
    })?;
    if image_bytes.len() - 16 < data_len {
        return Err(idx_err(format!(
            "image file too short: header declares {} items of {}x{} pixels \
             ({} data bytes), but only {} bytes follow the header.",
            n_items, rows, cols, data_len, image_bytes.len() - 16
        )));
    }

    // ── Label header ───────────────────────────────────────────────────────

    if label_bytes.len() < 8 {
        return Err(idx_err(format!(
            "label file too short: expected at least 8 header bytes, got {}.",
            label_bytes.len()
        )));
    }
    check_magic(label_bytes, 0x01, "label")?;

    let label_count = read_be_u32(label_bytes, 4);
    if label_count != n_items {
        return Err(idx_err(format!(
            "image file declares {} items but label file declares {}.",
            n_items, label_count
        )));
    }
    if label_bytes.len() - 8 < n_items {
        return Err(idx_err(format!(
            "label file too short: header declares {} labels but only {} bytes follow the header.",
            n_items, label_bytes.len() - 8
        )));
    }

    // ── Payload ────────────────────────────────────────────────────────────

    let inputs: Vec<Vec<f64>> = if n_pixels == 0 {
        vec![Vec::new(); n_items]
    } else {
        image_bytes[16..16 + data_len]
            .chunks_exact(n_pixels)
            .map(|chunk| chunk.iter().map(|&px| px as f64 / 255.0).collect())
            .collect()
    };

    let mut labels = Vec::with_capacity(n_items);
    for (i, &class) in label_bytes[8..8 + n_items].iter().enumerate() {
        let class = class as usize;
        if class >= n_classes {
            return Err(idx_err(format!(
                "label at index {}: class {} is out of range for n_classes={}.",
                i, class, n_classes
            )));
        }
        labels.push(class);
    }

    Dataset::new(inputs, labels)
}

/// Reads and parses an image/label file pair from disk.
pub fn load_idx_pair(
    image_path: impl AsRef<Path>,
    label_path: impl AsRef<Path>,
    n_classes: usize,
) -> Result<Dataset> {
    let image_bytes = std::fs::read(image_path.as_ref())?;
    let label_bytes = std::fs::read(label_path.as_ref())?;
    parse_idx_pair(&image_bytes, &label_bytes, n_classes)
}

/// Loads the MNIST train and test splits from `dir`, which must hold the four
/// uncompressed IDX files under their usual names.
pub fn load_mnist(dir: impl AsRef<Path>) -> Result<(Dataset, Dataset)> {
    let dir = dir.as_ref();
    let train = load_idx_pair(dir.join(MNIST_TRAIN_IMAGES), dir.join(MNIST_TRAIN_LABELS), MNIST_CLASSES)?;
    let test = load_idx_pair(dir.join(MNIST_TEST_IMAGES), dir.join(MNIST_TEST_LABELS), MNIST_CLASSES)?;
    info!(
        train = train.len(),
        test = test.len(),
        features = train.feature_count(),
        dir = %dir.display(),
        "loaded MNIST"
    );
    Ok((train, test))
}

/// Encodes a dataset as an IDX3/IDX1 pair.  Features are scaled back to bytes
/// by `round(x * 255)` clamped to `[0, 255]`.
pub fn encode_idx_pair(dataset: &Dataset, rows: usize, cols: usize) -> Result<(Vec<u8>, Vec<u8>)> {
    if dataset.inputs.iter().any(|x| x.len() != rows * cols) {
        return Err(PrnnError::invalid(format!("every input must have {}x{} features", rows, cols)));
    }
    if let Some(&label) = dataset.labels.iter().find(|&&l| l > u8::MAX as usize) {
        return Err(PrnnError::invalid(format!("label {} does not fit in a byte", label)));
    }

    let n = dataset.len() as u32;
    let mut images = vec![0x00, 0x00, 0x08, 0x03];
    images.extend_from_slice(&n.to_be_bytes());
    images.extend_from_slice(&(rows as u32).to_be_bytes());
    images.extend_from_slice(&(cols as u32).to_be_bytes());
    for x in dataset.inputs.iter().flatten() {
        images.push((x * 255.0).round().clamp(0.0, 255.0) as u8);
    }

    let mut labels = vec![0x00, 0x00, 0x08, 0x01];
    labels.extend_from_slice(&n.to_be_bytes());
    labels.extend(dataset.labels.iter().map(|&l| l as u8));

    Ok((images, labels))
}
