//! Clip decoding: WAV file -> mono f32 at the output device rate.

use super::resample::resample;
use anyhow::{bail, Context, Result};
use hound::{SampleFormat, WavReader};
use std::io::Read;
use std::path::Path;

/// Downmix interleaved multi-channel samples to mono while applying `convert`.
pub(super) fn append_downmixed_samples<T, F>(
    buf: &mut Vec<f32>,
    data: &[T],
    channels: usize,
    mut convert: F,
) where
    T: Copy,
    F: FnMut(T) -> f32,
{
    if channels <= 1 {
        buf.extend(data.iter().copied().map(&mut convert));
        return;
    }

    let mut acc = 0.0f32;
    let mut count = 0usize;
    for sample in data.iter().copied() {
        acc += convert(sample);
        count += 1;
        if count == channels {
            buf.push(acc / channels as f32);
            acc = 0.0;
            count = 0;
        }
    }
    if count > 0 {
        buf.push(acc / count as f32);
    }
}

/// Decode a WAV file and return mono samples at `output_rate`.
pub fn load_clip(path: &Path, output_rate: u32) -> Result<Vec<f32>> {
    let reader =
        WavReader::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    decode_wav(reader, output_rate).with_context(|| format!("failed to decode {}", path.display()))
}

pub(super) fn decode_wav<R: Read>(mut reader: WavReader<R>, output_rate: u32) -> Result<Vec<f32>> {
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));
    let mut mono = Vec::with_capacity(reader.len() as usize / channels);

    match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => {
            let samples = reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?;
            append_downmixed_samples(&mut mono, &samples, channels, |s| s);
        }
        (SampleFormat::Int, 8) => {
            let samples = reader.samples::<i8>().collect::<Result<Vec<_>, _>>()?;
            append_downmixed_samples(&mut mono, &samples, channels, |s| s as f32 / 128.0);
        }
        (SampleFormat::Int, 16) => {
            let samples = reader.samples::<i16>().collect::<Result<Vec<_>, _>>()?;
            append_downmixed_samples(&mut mono, &samples, channels, |s| s as f32 / 32_768.0);
        }
        (SampleFormat::Int, bits @ (24 | 32)) => {
            let scale = (1u64 << (bits - 1)) as f32;
            let samples = reader.samples::<i32>().collect::<Result<Vec<_>, _>>()?;
            append_downmixed_samples(&mut mono, &samples, channels, |s| s as f32 / scale);
        }
        (format, bits) => bail!("unsupported WAV sample format {format:?}/{bits}-bit"),
    }

    if mono.is_empty() {
        bail!("clip contains no samples");
    }
    Ok(resample(&mono, spec.sample_rate, output_rate))
}
