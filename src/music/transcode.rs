use songbird::input::{ChildContainer, Input, RawAdapter};
use symphonia::core::io::ReadOnlySource;
use std::process::{Command, Stdio};
use tracing::debug;

use super::{MusicError, MusicResult};

/// Songbird mixes at 48kHz stereo.
pub const SAMPLE_RATE: u32 = 48_000;
pub const CHANNELS: u32 = 2;

/// Pipes a remote audio stream through `ffmpeg` as raw f32 PCM.
pub struct Transcoder {
    program: String,
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl Transcoder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn args(&self, stream_url: &str) -> Vec<String> {
        [
            "-reconnect",
            "1",
            "-reconnect_streamed",
            "1",
            "-reconnect_delay_max",
            "5",
            "-i",
            stream_url,
            "-vn",
            "-loglevel",
            "error",
            "-f",
            "f32le",
            "-ac",
            "2",
            "-ar",
            "48000",
            "pipe:1",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    /// Starts the transcoder and wraps its stdout as a songbird input.
    pub fn spawn(&self, stream_url: &str) -> MusicResult<Input> {
        debug!("Starting {} for {}", self.program, stream_url);
        let child = Command::new(&self.program)
            .args(self.args(stream_url))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                MusicError::TranscodeError(format!("Failed to start {}: {}", self.program, e))
            })?;

        Ok(RawAdapter::new(ReadOnlySource::new(ChildContainer::from(child)), SAMPLE_RATE, CHANNELS).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconnect_options_precede_the_input() {
        let args = Transcoder::default().args("https://media.example/a");
        let input_at = args.iter().position(|a| a == "-i").unwrap();

        assert_eq!(args[input_at + 1], "https://media.example/a");
        for flag in ["-reconnect", "-reconnect_streamed", "-reconnect_delay_max"] {
            let at = args.iter().position(|a| a == flag).unwrap();
            assert!(at < input_at, "{flag} must be an input option");
        }
        assert_eq!(args[args.iter().position(|a| a == "-reconnect_delay_max").unwrap() + 1], "5");
    }

    #[test]
    fn output_is_audio_only_pcm_on_stdout() {
        let args = Transcoder::default().args("u");

        assert!(args.contains(&"-vn".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("pipe:1"));
        let format_at = args.iter().position(|a| a == "-f").unwrap();
        assert_eq!(args[format_at + 1], "f32le");
    }

    #[test]
    fn missing_binary_is_a_transcode_error() {
        let err = Transcoder::new("definitely-not-ffmpeg-xyz")
            .spawn("u")
            .err()
            .unwrap();
        assert!(matches!(err, MusicError::TranscodeError(_)));
    }
}
