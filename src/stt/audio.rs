use std::path::Path;

use hound::{SampleFormat, WavReader};

/// Samples per calibration / energy buffer.
const BUFFER_FRAMES: usize = 1024;

/// Leading audio measured for background noise.
pub const CALIBRATION_SECS: f64 = 0.5;

const START_THRESHOLD: f64 = 300.0;
const DAMPING_PER_SEC: f64 = 0.15;
const ENERGY_RATIO: f64 = 1.5;

/// Mono 16-bit PCM.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

impl AudioClip {
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Raw big-endian samples, the `audio/l16` wire format.
    pub fn to_l16_be(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_be_bytes()).collect()
    }
}

/// Decode any PCM WAV file and downmix it to mono 16-bit.
pub fn read_wav(path: &Path) -> Result<AudioClip, hound::Error> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();

    if spec.sample_rate == 0 {
        return Err(hound::Error::FormatError("zero sample rate"));
    }

    let normalized: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };

    let channels = spec.channels.max(1) as usize;
    let samples = normalized
        .chunks(channels)
        .map(|frame| {
            let mono = frame.iter().sum::<f32>() / frame.len() as f32;
            (mono * 32768.0).clamp(-32768.0, 32767.0) as i16
        })
        .collect();

    Ok(AudioClip {
        samples,
        sample_rate: spec.sample_rate,
    })
}

pub fn rms(buffer: &[i16]) -> f64 {
    if buffer.is_empty() {
        return 0.0;
    }
    let sum: f64 = buffer.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum / buffer.len() as f64).sqrt()
}

/// Audio left after calibration, with the energy level speech must exceed.
#[derive(Debug, Clone)]
pub struct Calibrated {
    pub clip: AudioClip,
    pub energy_threshold: f64,
}

impl Calibrated {
    pub fn has_speech(&self) -> bool {
        self.clip
            .samples
            .chunks(BUFFER_FRAMES)
            .any(|buffer| rms(buffer) > self.energy_threshold)
    }
}

/// Measure the first `CALIBRATION_SECS` of the clip and derive a dynamic
/// energy threshold from it. The measured window is consumed unless it covers
/// the whole clip.
pub fn adjust_for_ambient_noise(clip: AudioClip) -> Calibrated {
    let seconds_per_buffer = BUFFER_FRAMES as f64 / clip.sample_rate.max(1) as f64;
    let damping = DAMPING_PER_SEC.powf(seconds_per_buffer);

    let mut threshold = START_THRESHOLD;
    let mut elapsed = 0.0;
    let mut consumed = 0;

    for buffer in clip.samples.chunks(BUFFER_FRAMES) {
        elapsed += seconds_per_buffer;
        if elapsed > CALIBRATION_SECS {
            break;
        }
        let target = rms(buffer) * ENERGY_RATIO;
        threshold = threshold * damping + target * (1.0 - damping);
        consumed += buffer.len();
    }

    let clip = if consumed < clip.samples.len() {
        AudioClip {
            samples: clip.samples[consumed..].to_vec(),
            sample_rate: clip.sample_rate,
        }
    } else {
        clip
    };

    Calibrated {
        clip,
        energy_threshold: threshold,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};
    use std::io::Cursor;

    pub(crate) const RATE: u32 = 16000;

    /// `silence_secs` of near-silence followed by `tone_secs` of a loud tone.
    pub(crate) fn wav_bytes(silence_secs: f64, tone_secs: f64) -> Vec<u8> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: RATE,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut buffer = Vec::new();
        {
            let mut writer = WavWriter::new(Cursor::new(&mut buffer), spec).unwrap();
            let silent = (silence_secs * RATE as f64) as usize;
            let tone = (tone_secs * RATE as f64) as usize;
            for i in 0..silent {
                writer.write_sample(if i % 2 == 0 { 20i16 } else { -20 }).unwrap();
            }
            for i in 0..tone {
                let t = i as f64 / RATE as f64;
                let s = (t * 440.0 * std::f64::consts::TAU).sin() * 8000.0;
                writer.write_sample(s as i16).unwrap();
            }
            writer.finalize().unwrap();
        }
        buffer
    }

    fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), bytes).unwrap();
        file
    }

    #[test]
    fn test_read_wav_mono_16() {
        let file = write_temp(&wav_bytes(0.25, 0.25));
        let clip = read_wav(file.path()).unwrap();
        assert_eq!(clip.sample_rate, RATE);
        assert_eq!(clip.samples.len(), 8000);
        assert_eq!(clip.samples[0], 20);
    }

    #[test]
    fn test_read_wav_downmixes_stereo() {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut bytes = Vec::new();
        {
            let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec).unwrap();
            for _ in 0..100 {
                writer.write_sample(1000i16).unwrap();
                writer.write_sample(-1000i16).unwrap();
            }
            writer.finalize().unwrap();
        }
        let file = write_temp(&bytes);
        let clip = read_wav(file.path()).unwrap();
        assert_eq!(clip.samples.len(), 100);
        assert!(clip.samples.iter().all(|&s| s == 0));
    }

    #[test]
    fn test_read_wav_rejects_garbage() {
        let file = write_temp(b"definitely not a wav file");
        assert!(read_wav(file.path()).is_err());
    }

    #[test]
    fn test_rms() {
        assert_eq!(rms(&[]), 0.0);
        assert_eq!(rms(&[3, -3, 3, -3]), 3.0);
    }

    #[test]
    fn test_calibration_consumes_leading_window() {
        let samples = vec![0i16; RATE as usize * 2];
        let calibrated = adjust_for_ambient_noise(AudioClip {
            samples,
            sample_rate: RATE,
        });
        // 0.5 s at 1024-sample buffers is seven whole buffers.
        assert_eq!(calibrated.clip.samples.len(), RATE as usize * 2 - 7 * 1024);
        assert!(calibrated.energy_threshold < START_THRESHOLD);
    }

    #[test]
    fn test_short_clip_is_kept_whole() {
        let clip = AudioClip {
            samples: vec![5; 2048],
            sample_rate: RATE,
        };
        let calibrated = adjust_for_ambient_noise(clip.clone());
        assert_eq!(calibrated.clip, clip);
    }

    #[test]
    fn test_speech_detected_after_quiet_lead_in() {
        let file = write_temp(&wav_bytes(0.5, 1.0));
        let calibrated = adjust_for_ambient_noise(read_wav(file.path()).unwrap());
        assert!(calibrated.has_speech());
    }

    #[test]
    fn test_silence_has_no_speech() {
        let file = write_temp(&wav_bytes(2.0, 0.0));
        let calibrated = adjust_for_ambient_noise(read_wav(file.path()).unwrap());
        assert!(!calibrated.has_speech());
    }

    #[test]
    fn test_l16_is_big_endian() {
        let clip = AudioClip {
            samples: vec![0x0102, -1],
            sample_rate: RATE,
        };
        assert_eq!(clip.to_l16_be(), vec![0x01, 0x02, 0xff, 0xff]);
        assert_eq!(clip.duration_secs(), 2.0 / RATE as f64);
    }
}
