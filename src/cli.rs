//! Command line interface

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

const EXAMPLES: &str = "\
Examples:
  novelreader --file novel.txt --preview          # Analyze text structure
  novelreader --file chapter1.txt                 # Live playback with Google voices
  novelreader --file story.txt --output story.wav # Generate an audiobook file
  novelreader --list-voices                       # Show voice information
  novelreader --file novel.txt --no-google        # Use system TTS instead";

/// Reads novels aloud with a distinct voice for every character
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "novelreader", version, about, after_help = EXAMPLES)]
pub struct Args {
    /// Text file to process
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Write the narration to this audio file instead of playing it
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Preview text analysis without generating audio
    #[arg(short, long)]
    pub preview: bool,

    /// Show available voice options (also accepted as -lv)
    #[arg(long)]
    pub list_voices: bool,

    /// Use system TTS instead of Google TTS
    #[arg(long)]
    pub no_google: bool,

    /// Print the preview analysis as JSON
    #[arg(long, requires = "preview")]
    pub json: bool,

    /// Configuration file (default: ~/.novelreader.cfg)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write debug logs to novelreader.log
    #[arg(short, long)]
    pub debug: bool,
}

impl Args {
    /// Parse the process arguments, accepting `-lv`
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }
}

/// Rewrite the two-letter `-lv` flag to `--list-voices`
///
/// clap only knows single-character short flags and would otherwise read
/// `-lv` as `-l -v`.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if arg.to_str() == Some("-lv") {
                OsString::from("--list-voices")
            } else {
                arg
            }
        })
        .collect()
}
