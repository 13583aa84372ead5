//! Audio round trip: send a recorded WAV, save the spoken reply.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use liveturn_common::LiveturnError;
use liveturn_config::{LiveturnConfig, Modality};
use liveturn_core::{ContentFilter, ToolRegistry, UserContent};
use tracing::{info, warn};

use crate::bootstrap::{self, SessionOptions};

const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant and answer in a friendly tone.";

fn audio_error(path: &Path, e: hound::Error) -> LiveturnError {
    LiveturnError::Audio(format!("{}: {e}", path.display()))
}

/// Read a 16-bit mono WAV recorded at `sample_rate` as little-endian PCM.
/// Nothing is resampled; any other format is rejected.
pub fn read_pcm(path: &Path, sample_rate: u32) -> Result<Vec<u8>, LiveturnError> {
    let reader = WavReader::open(path).map_err(|e| audio_error(path, e))?;
    let spec = reader.spec();

    if spec.channels != 1
        || spec.bits_per_sample != 16
        || spec.sample_format != SampleFormat::Int
    {
        return Err(LiveturnError::Audio(format!(
            "{}: expected 16-bit mono PCM, got {} channel(s) at {} bits",
            path.display(),
            spec.channels,
            spec.bits_per_sample
        )));
    }
    if spec.sample_rate != sample_rate {
        return Err(LiveturnError::Audio(format!(
            "{}: expected {sample_rate} Hz (audio.input_sample_rate), got {} Hz; input is not resampled",
            path.display(),
            spec.sample_rate
        )));
    }

    let mut pcm = Vec::with_capacity(reader.len() as usize * 2);
    for sample in reader.into_samples::<i16>() {
        let sample = sample.map_err(|e| audio_error(path, e))?;
        pcm.extend_from_slice(&sample.to_le_bytes());
    }
    Ok(pcm)
}

/// Write little-endian 16-bit PCM as a mono WAV. A trailing odd byte is
/// dropped.
pub fn write_pcm(path: &Path, pcm: &[u8], sample_rate: u32) -> Result<(), LiveturnError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).map_err(|e| audio_error(path, e))?;
    for chunk in pcm.chunks_exact(2) {
        writer
            .write_sample(i16::from_le_bytes([chunk[0], chunk[1]]))
            .map_err(|e| audio_error(path, e))?;
    }
    writer.finalize().map_err(|e| audio_error(path, e))
}

pub async fn run(config: &LiveturnConfig, input: &Path, output: &Path) -> Result<(), LiveturnError> {
    let rate = config.audio.input_sample_rate;
    let pcm = read_pcm(input, rate)?;
    info!(path = %input.display(), bytes = pcm.len(), "Read input audio");

    let mut options = SessionOptions::instruction_or(config, SYSTEM_INSTRUCTION);
    options.modality = Some(Modality::Audio);
    let mut session = bootstrap::connect(config, options, ToolRegistry::new(), ())
        .await?
        .with_filter(ContentFilter::MEDIA);

    let content = UserContent::media(format!("audio/pcm;rate={rate}"), pcm);
    let exchange = session
        .run_exchange(content)
        .await
        .map_err(bootstrap::session_error)?;
    session.close();
    bootstrap::report_terminal(&exchange.end);

    let reply = exchange.media_data();
    if reply.is_empty() {
        warn!("No audio in the reply");
        return Err(LiveturnError::Audio("the model returned no audio".into()));
    }

    write_pcm(output, &reply, config.audio.output_sample_rate)?;
    println!(
        "Wrote {} ({} samples at {} Hz)",
        output.display(),
        reply.len() / 2,
        config.audio.output_sample_rate
    );
    Ok(())
}
