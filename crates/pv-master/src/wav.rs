//! 16-bit stereo PCM WAV output for offline renders.

use pv_engine::Frame;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

const CHANNELS: u16 = 2;
const BITS_PER_SAMPLE: u16 = 16;
const BLOCK_ALIGN: u16 = CHANNELS * BITS_PER_SAMPLE / 8;
/// Bytes between the end of the RIFF size field and the first sample.
const HEADER_TAIL: u32 = 36;

/// Encode `frames` into `w` as a canonical 44-byte-header WAV stream.
pub fn write_wav(w: &mut impl Write, frames: &[Frame], sample_rate: u32) -> io::Result<()> {
    let data_len = u32::try_from(frames.len())
        .ok()
        .and_then(|n| n.checked_mul(BLOCK_ALIGN as u32))
        .filter(|n| n.checked_add(HEADER_TAIL).is_some())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "render too long for a WAV file"))?;

    w.write_all(b"RIFF")?;
    w.write_all(&(HEADER_TAIL + data_len).to_le_bytes())?;
    w.write_all(b"WAVE")?;

    w.write_all(b"fmt ")?;
    w.write_all(&16u32.to_le_bytes())?;
    w.write_all(&1u16.to_le_bytes())?; // PCM
    w.write_all(&CHANNELS.to_le_bytes())?;
    w.write_all(&sample_rate.to_le_bytes())?;
    w.write_all(&(sample_rate * BLOCK_ALIGN as u32).to_le_bytes())?;
    w.write_all(&BLOCK_ALIGN.to_le_bytes())?;
    w.write_all(&BITS_PER_SAMPLE.to_le_bytes())?;

    w.write_all(b"data")?;
    w.write_all(&data_len.to_le_bytes())?;
    for frame in frames {
        w.write_all(&frame.left.to_le_bytes())?;
        w.write_all(&frame.right.to_le_bytes())?;
    }
    Ok(())
}

/// Encode `frames` into an in-memory WAV image.
pub fn frames_to_wav(frames: &[Frame], sample_rate: u32) -> io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(44 + frames.len() * BLOCK_ALIGN as usize);
    write_wav(&mut buf, frames, sample_rate)?;
    Ok(buf)
}

/// Write `frames` to a file at `path`, replacing it if present.
pub fn save_wav(path: impl AsRef<Path>, frames: &[Frame], sample_rate: u32) -> io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write_wav(&mut w, frames, sample_rate)?;
    w.flush()
}
