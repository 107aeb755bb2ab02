//! Acquisition Capture Files
//!
//! Raw two-channel acquisitions as exchanged with the analysis tools:
//! unsigned 16-bit little-endian words, channels interleaved, no header.
//!
//! ```text
//!   offset  0      2      4      6
//!          ┌──────┬──────┬──────┬──────┬───
//!          │ ch1₀ │ ch2₀ │ ch1₁ │ ch2₁ │ ...
//!          └──────┴──────┴──────┴──────┴───
//! ```
//!
//! [`load_capture`] splits the channels and removes each channel's mean,
//! ready for the spectrum analyzer.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use ppi_core::spectrum::remove_dc;
use ppi_core::types::AdcSample;

/// Capture file errors.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),
}

pub type CaptureResult<T> = Result<T, CaptureError>;

/// Streaming writer for interleaved capture files.
pub struct CaptureWriter<W: Write = BufWriter<File>> {
    writer: W,
    words: u64,
}

impl CaptureWriter<BufWriter<File>> {
    /// Create (or truncate) a capture file.
    pub fn create(path: &Path) -> CaptureResult<Self> {
        let file = File::create(path)?;
        tracing::debug!(path = %path.display(), "capture file created");
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> CaptureWriter<W> {
    /// Wrap an arbitrary sink.
    pub fn new(writer: W) -> Self {
        Self { writer, words: 0 }
    }

    /// Append already-interleaved words. The length must be even.
    pub fn write_interleaved(&mut self, samples: &[AdcSample]) -> CaptureResult<()> {
        if samples.len() % 2 != 0 {
            return Err(CaptureError::Format(format!(
                "interleaved block must hold an even number of words, got {}",
                samples.len()
            )));
        }
        for &s in samples {
            self.writer.write_u16::<LittleEndian>(s)?;
        }
        self.words += samples.len() as u64;
        Ok(())
    }

    /// Interleave and append one block per channel.
    pub fn write_channels(&mut self, ch1: &[AdcSample], ch2: &[AdcSample]) -> CaptureResult<()> {
        if ch1.len() != ch2.len() {
            return Err(CaptureError::Format(format!(
                "channel length mismatch: {} vs {}",
                ch1.len(),
                ch2.len()
            )));
        }
        for (&a, &b) in ch1.iter().zip(ch2) {
            self.writer.write_u16::<LittleEndian>(a)?;
            self.writer.write_u16::<LittleEndian>(b)?;
        }
        self.words += 2 * ch1.len() as u64;
        Ok(())
    }

    /// Samples per channel written so far.
    pub fn samples_per_channel(&self) -> u64 {
        self.words / 2
    }

    /// Flush and return the number of samples per channel.
    pub fn finish(mut self) -> CaptureResult<u64> {
        self.writer.flush()?;
        Ok(self.samples_per_channel())
    }
}

/// Channels of a loaded capture, mean removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureData {
    pub ch1: Vec<f64>,
    pub ch2: Vec<f64>,
}

impl CaptureData {
    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.ch1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ch1.is_empty()
    }
}

/// Decode interleaved little-endian words.
///
/// A trailing odd byte and an unpaired final word are ignored.
pub fn decode_capture(bytes: &[u8]) -> CaptureData {
    let words: Vec<u16> = bytes.chunks_exact(2).map(LittleEndian::read_u16).collect();
    let pairs = words.len() / 2;

    let mut ch1 = Vec::with_capacity(pairs);
    let mut ch2 = Vec::with_capacity(pairs);
    for pair in words.chunks_exact(2) {
        ch1.push(pair[0] as f64);
        ch2.push(pair[1] as f64);
    }
    remove_dc(&mut ch1);
    remove_dc(&mut ch2);

    CaptureData { ch1, ch2 }
}

/// Read a capture file and split it into DC-free channels.
pub fn load_capture(path: &Path) -> CaptureResult<CaptureData> {
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;
    let data = decode_capture(&bytes);
    tracing::debug!(path = %path.display(), samples = data.len(), "capture loaded");
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("acq.bin");

        let mut writer = CaptureWriter::create(&path).unwrap();
        writer.write_channels(&[10, 20, 30], &[100, 100, 100]).unwrap();
        writer.write_interleaved(&[40, 100]).unwrap();
        assert_eq!(writer.finish().unwrap(), 4);

        assert_eq!(std::fs::metadata(&path).unwrap().len(), 16);

        let data = load_capture(&path).unwrap();
        assert_eq!(data.len(), 4);
        // Mean of ch1 is 25.
        assert_relative_eq!(data.ch1[0], -15.0);
        assert_relative_eq!(data.ch1[3], 15.0);
        assert!(data.ch2.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_byte_layout_is_little_endian() {
        let mut buf = Vec::new();
        let mut writer = CaptureWriter::new(&mut buf);
        writer.write_channels(&[0x1234], &[0xABCD]).unwrap();
        writer.finish().unwrap();
        assert_eq!(buf, vec![0x34, 0x12, 0xCD, 0xAB]);
    }

    #[test]
    fn test_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.bin");
        std::fs::write(&path, b"").unwrap();
        let data = load_capture(&path).unwrap();
        assert!(data.is_empty());
        assert!(data.ch2.is_empty());
    }

    #[test]
    fn test_unpaired_tail_dropped() {
        // Three words and a stray byte: one full pair survives.
        let bytes = [1, 0, 2, 0, 3, 0, 9];
        let data = decode_capture(&bytes);
        assert_eq!(data.len(), 1);
        assert_eq!(data.ch1, vec![0.0]);
    }

    #[test]
    fn test_format_errors() {
        let mut writer = CaptureWriter::new(Vec::new());
        assert!(matches!(
            writer.write_channels(&[1, 2], &[1]),
            Err(CaptureError::Format(_))
        ));
        assert!(matches!(
            writer.write_interleaved(&[1, 2, 3]),
            Err(CaptureError::Format(_))
        ));
        assert_eq!(writer.samples_per_channel(), 0);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_capture(&dir.path().join("nope.bin")).unwrap_err();
        assert!(matches!(err, CaptureError::Io(_)));
    }
}
