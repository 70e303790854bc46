//! WAV reading and writing via hound.

use std::io::Cursor;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::buffer::PcmBuffer;
use crate::error::AudioError;

fn read_from<R: std::io::Read>(reader: WavReader<R>) -> Result<PcmBuffer, AudioError> {
    let spec = reader.spec();
    match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => {}
        (format, bits) => {
            return Err(AudioError::Wav(format!(
                "unsupported sample format: {:?} {}-bit, expected 16-bit int",
                format, bits
            )));
        }
    }
    let samples = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<i16>, _>>()?;
    Ok(PcmBuffer::new(samples, spec.sample_rate, spec.channels))
}

/// Read a 16-bit PCM WAV file.
pub fn read_wav(path: &Path) -> Result<PcmBuffer, AudioError> {
    read_from(WavReader::open(path)?)
}

/// Decode in-memory WAV bytes, as returned by PCM gateways.
pub fn decode_wav_bytes(bytes: &[u8]) -> Result<PcmBuffer, AudioError> {
    read_from(WavReader::new(Cursor::new(bytes))?)
}

/// Write a buffer as a 16-bit PCM WAV file.
pub fn write_wav(path: &Path, buffer: &PcmBuffer) -> Result<(), AudioError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let spec = WavSpec {
        channels: buffer.channels(),
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for &sample in buffer.samples() {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Encode a buffer to WAV bytes in memory.
pub fn encode_wav_bytes(buffer: &PcmBuffer) -> Result<Vec<u8>, AudioError> {
    let spec = WavSpec {
        channels: buffer.channels(),
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for &sample in buffer.samples() {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let buffer = PcmBuffer::new(vec![0, 1000, -1000, i16::MAX], 24_000, 1);

        write_wav(&path, &buffer).unwrap();
        assert_eq!(read_wav(&path).unwrap(), buffer);
    }

    #[test]
    fn in_memory_round_trip() {
        let buffer = PcmBuffer::new(vec![5; 480], 24_000, 2);
        let bytes = encode_wav_bytes(&buffer).unwrap();
        assert_eq!(decode_wav_bytes(&bytes).unwrap(), buffer);
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(decode_wav_bytes(&[0u8; 16]).is_err());
    }
}
