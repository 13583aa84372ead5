use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// liveturn: live model sessions with streaming turns and local tools.
#[derive(Parser, Debug)]
#[command(name = "liveturn", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log directive override (e.g. `debug` or `liveturn_gemini=trace`).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive text chat. Type `quit` to exit.
    Chat,

    /// Ask the model to switch the lights, served by local tools.
    Lights {
        /// Message sent as the single user turn.
        #[arg(long, default_value = "Turn on the lights please")]
        prompt: String,
    },

    /// Fill a Business Model Canvas through conversation. `show` prints the
    /// canvas, `quit` prints it and exits.
    Canvas,

    /// Send a 16-bit mono WAV and save the spoken reply.
    ///
    /// The input must already be 16-bit mono PCM at `audio.input_sample_rate`
    /// (16000 Hz by default). It is not resampled or downmixed; convert it
    /// first, e.g. `sox in.wav -r 16000 -c 1 -b 16 out.wav`.
    Audio {
        /// Input WAV, already at the configured input sample rate.
        input: PathBuf,

        /// Where to write the reply.
        #[arg(short, long, default_value = "audio.wav")]
        output: PathBuf,
    },
}

pub fn parse() -> Args {
    Args::parse()
}
