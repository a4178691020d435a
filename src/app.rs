//! Top-level run logic behind the command line

use crate::cli::Args;
use crate::config::Config;
use crate::reader::{Analysis, NovelReader, RunSummary};
use crate::speech::create_local_synth;
use crate::text::segment;
use crate::{voices, NovelReaderError, Result, VERSION};
use log::{info, warn};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Run the reader for parsed arguments, writing user output to `out`
pub fn run(args: &Args, out: &mut dyn Write) -> Result<()> {
    let json = args.preview && args.json;
    if !json {
        writeln!(out, "NovelReader {} - Text-to-Speech for novels", VERSION)?;
        writeln!(out, "{}", "=".repeat(55))?;
    }

    let config = load_config(args)?;

    if args.list_voices {
        voices::write_catalog(out)?;
        if args.no_google {
            write_system_voices(out)?;
        }
        return Ok(());
    }

    let path = args.file.as_deref().ok_or_else(|| {
        NovelReaderError::Input("--file is required unless using --list-voices".to_string())
    })?;
    if args.output.is_some() && args.no_google && !args.preview {
        return Err(NovelReaderError::Config(
            "--output needs Google TTS; the system voice cannot be recorded".to_string(),
        ));
    }

    let text = read_manuscript(path)?;
    let segments = segment(&text);
    let analysis = Analysis::new(&segments);
    info!("{}: {} segments", path.display(), segments.len());

    if json {
        writeln!(out, "{}", analysis.to_json()?)?;
        return Ok(());
    }

    writeln!(out, "Processing: {}", path.display())?;
    analysis.write_summary(out)?;

    if args.preview {
        analysis.write_preview(out, config.preview_segments(), config.preview_chars())?;
        return Ok(());
    }

    let mut reader = if args.no_google {
        writeln!(out, "Using system Text-to-Speech")?;
        NovelReader::local_only(config)
    } else {
        writeln!(out, "Using Google Text-to-Speech")?;
        writeln!(out, "Characters will automatically get distinct voices and accents")?;
        NovelReader::with_google(config)?
    };

    let summary = match &args.output {
        Some(output) => {
            writeln!(out)?;
            writeln!(out, "Generating audio file: {}", output.display())?;
            let summary = reader.export(&segments, output, out)?;
            writeln!(out, "Audio saved to: {}", output.display())?;
            summary
        }
        None => {
            writeln!(out)?;
            writeln!(out, "Starting playback...")?;
            writeln!(out)?;
            reader.play(&segments, out)?
        }
    };

    writeln!(out)?;
    writeln!(out, "Processing completed successfully!")?;
    write_run_summary(out, &summary)?;
    if reader.uses_remote() {
        writeln!(out)?;
        reader.write_voice_summary(out)?;
    }
    Ok(())
}

/// Process exit code for a run result
pub fn exit_code(result: &Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

/// Read a UTF-8 manuscript
pub fn read_manuscript(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(NovelReaderError::Input(format!(
            "File '{}' not found",
            path.display()
        )));
    }
    fs::read_to_string(path).map_err(|e| {
        NovelReaderError::Input(format!("Failed to read '{}': {}", path.display(), e))
    })
}

/// An explicit config path must load; the default one may fall back to
/// built-in settings
fn load_config(args: &Args) -> Result<Config> {
    match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load().or_else(|e| {
            warn!("Using default settings: {}", e);
            Ok(Config::defaults())
        }),
    }
}

fn write_system_voices(out: &mut dyn Write) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "System Text-to-Speech voices:")?;
    match create_local_synth().and_then(|synth| synth.voice_names()) {
        Ok(names) if names.is_empty() => writeln!(out, "  (voice selection not supported)")?,
        Ok(names) => {
            for (i, name) in names.iter().enumerate() {
                writeln!(out, "  {}: {}", i, name)?;
            }
        }
        Err(e) => writeln!(out, "  unavailable: {}", e)?,
    }
    Ok(())
}

fn write_run_summary(out: &mut dyn Write, summary: &RunSummary) -> Result<()> {
    writeln!(
        out,
        "{} segments: {} remote, {} fallback, {} local, {} skipped",
        summary.segments, summary.remote, summary.fallback, summary.local, summary.skipped
    )?;
    Ok(())
}
