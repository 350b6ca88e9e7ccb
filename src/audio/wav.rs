//! Voice-note encoding: downmix, resample to 16 kHz, 16-bit PCM WAV.
//!
//! The transcription model accepts `audio/wav` inline data; 16 kHz mono is
//! plenty for speech and keeps the base64 payload small.

use std::io::Cursor;

/// Sample rate of encoded voice notes.
pub const VOICE_SAMPLE_RATE: u32 = 16_000;

/// Average interleaved frames down to one channel.
///
/// ```rust
/// use cinema_socrates::audio::to_mono;
///
/// assert_eq!(to_mono(&[1.0, 0.0, 0.5, 0.5], 2), vec![0.5, 0.5]);
/// ```
pub fn to_mono(interleaved: &[f32], channels: u16) -> Vec<f32> {
    let width = usize::from(channels);
    match width {
        0 => Vec::new(),
        1 => interleaved.to_vec(),
        _ => interleaved
            .chunks_exact(width)
            .map(|frame| frame.iter().sum::<f32>() / width as f32)
            .collect(),
    }
}

/// Linear-interpolation resampler.  Good enough for speech.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() || from_rate == 0 || to_rate == 0 {
        return samples.to_vec();
    }

    let step = from_rate as f64 / to_rate as f64;
    let out_len = (samples.len() as f64 / step).ceil() as usize;
    let last = samples.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * step;
            let left = (pos as usize).min(last);
            let right = (left + 1).min(last);
            let t = (pos - left as f64) as f32;
            samples[left] + (samples[right] - samples[left]) * t
        })
        .collect()
}

/// Encode mono `samples` at `sample_rate` as a 16-bit PCM WAV file.
///
/// Samples outside `[-1.0, 1.0]` are clipped.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &sample in samples {
            let clipped = sample.clamp(-1.0, 1.0);
            writer.write_sample((clipped * i16::MAX as f32) as i16)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Full voice-note conversion: interleaved device audio → 16 kHz mono WAV.
pub fn voice_note_wav(
    interleaved: &[f32],
    channels: u16,
    device_rate: u32,
) -> Result<Vec<u8>, hound::Error> {
    let mono = to_mono(interleaved, channels);
    let voice = resample(&mono, device_rate, VOICE_SAMPLE_RATE);
    encode_wav(&voice, VOICE_SAMPLE_RATE)
}
