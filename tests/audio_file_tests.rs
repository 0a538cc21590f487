// Integration tests for WAV input used by the listen client
//
// Fixtures are generated on the fly with hound.

use anyhow::Result;
use hound::{SampleFormat, WavSpec, WavWriter};
use speech_relay::audio::{pcm16_le_bytes, AudioFile};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_wav(dir: &Path, name: &str, sample_rate: u32, channels: u16, samples: &[i16]) -> Result<PathBuf> {
    let path = dir.join(name);
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(path)
}

#[test]
fn test_audio_file_open() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let samples = vec![0i16; 16000];
    let path = write_wav(temp_dir.path(), "mono.wav", 16000, 1, &samples)?;

    let audio = AudioFile::open(&path)?;

    assert_eq!(audio.sample_rate, 16000);
    assert_eq!(audio.channels, 1);
    assert_eq!(audio.samples.len(), 16000);
    assert!((audio.duration_seconds - 1.0).abs() < 1e-9);
    assert!(audio.path.contains("mono.wav"));

    Ok(())
}

#[test]
fn test_audio_file_nonexistent() {
    let path = PathBuf::from("/nonexistent/path/to/audio.wav");
    let result = AudioFile::open(&path);

    assert!(result.is_err(), "Opening nonexistent file should fail");
}

#[test]
fn test_stereo_downmix_averages_channels() -> Result<()> {
    let temp_dir = TempDir::new()?;
    // Interleaved [L, R, L, R, ...]
    let samples = vec![100, 300, -200, -400, i16::MAX, i16::MAX];
    let path = write_wav(temp_dir.path(), "stereo.wav", 44100, 2, &samples)?;

    let audio = AudioFile::open(&path)?;
    assert_eq!(audio.channels, 2);
    assert_eq!(audio.to_mono(), vec![200, -300, i16::MAX]);

    Ok(())
}

#[test]
fn test_mono_passthrough() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let samples = vec![1, -1, 2, -2];
    let path = write_wav(temp_dir.path(), "mono.wav", 8000, 1, &samples)?;

    let audio = AudioFile::open(&path)?;
    assert_eq!(audio.to_mono(), samples);

    Ok(())
}

#[test]
fn test_pcm16_little_endian_encoding() {
    assert_eq!(pcm16_le_bytes(&[1, -1, 0x1234]), vec![0x01, 0x00, 0xff, 0xff, 0x34, 0x12]);
    assert!(pcm16_le_bytes(&[]).is_empty());
}

#[test]
fn test_zero_sample_rate_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("zero-rate.wav");

    // Canonical 44-byte header declaring 0Hz mono 16-bit PCM, two samples
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(b"WAVEfmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // channels
    bytes.extend_from_slice(&0u32.to_le_bytes()); // sample rate
    bytes.extend_from_slice(&0u32.to_le_bytes()); // byte rate
    bytes.extend_from_slice(&2u16.to_le_bytes()); // block align
    bytes.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&4u32.to_le_bytes());
    bytes.extend_from_slice(&[0x01, 0x00, 0x02, 0x00]);
    std::fs::write(&path, bytes)?;

    assert!(AudioFile::open(&path).is_err());
    Ok(())
}
