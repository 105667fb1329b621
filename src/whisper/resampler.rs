use anyhow::Result;
use rubato::{Resampler, SincFixedIn, SincInterpolationType, WindowFunction};

pub const WHISPER_SAMPLE_RATE: u32 = 16000;

/// Sinc-resample interleaved audio to the 16kHz the model expects.
/// Audio already at 16kHz is returned unchanged.
pub fn resample_to_16khz(audio: &[f32], sample_rate: u32, channels: usize) -> Result<Vec<f32>> {
    if sample_rate == WHISPER_SAMPLE_RATE {
        return Ok(audio.to_vec());
    }

    let frames = audio.len() / channels.max(1);
    if frames == 0 {
        return Err(anyhow::anyhow!("No audio frames to resample"));
    }

    let params = rubato::SincInterpolationParameters {
        sinc_len: 128,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    // De-interleave into per-channel buffers for rubato.
    let mut input_channels: Vec<Vec<f32>> = (0..channels)
        .map(|ch| {
            audio
                .iter()
                .skip(ch)
                .step_by(channels)
                .copied()
                .collect::<Vec<f32>>()
        })
        .collect();
    for buf in &mut input_channels {
        buf.truncate(frames);
    }

    let ratio = WHISPER_SAMPLE_RATE as f64 / sample_rate as f64;
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, frames, channels)?;
    let resampled = resampler.process(&input_channels, None)?;

    let delay = resampler.output_delay();
    let expected_frames = (frames as f64 * ratio) as usize;
    let end = (delay + expected_frames).min(resampled[0].len());

    let mut output = Vec::with_capacity(expected_frames * channels);
    for frame in delay..end {
        for ch in 0..channels {
            output.push(resampled[ch][frame]);
        }
    }

    Ok(output)
}
