//! # Decode Engine Usage Example
//!
//! Opens an MPEG audio file (or, without an argument, a synthesized stream of
//! silent frames), prints the header-scan statistics, drains it to PCM, then
//! seeks to the middle and drains again.
//!
//! Run with: `cargo run --example decode_demo --package core-decode -- [file.mp3]`

use core_decode::logging::{init_logging, LogFormat, LoggingConfig};
use core_decode::{DecoderConfig, Mp3Source, Result, SoundSource};
use std::time::Instant;

/// Silent MPEG-1 Layer III frames: 128 kbps, 44.1 kHz, stereo.
fn synthetic_stream(frames: usize) -> Vec<u8> {
    let mut frame = vec![0u8; 417];
    frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
    frame.repeat(frames)
}

/// Read `source` to the end, returning the number of samples and the peak level.
fn drain(source: &mut impl SoundSource) -> (u64, i16) {
    let mut pcm = vec![0i16; 4096];
    let mut total = 0u64;
    let mut peak = 0i16;
    loop {
        let produced = source.read(&mut pcm);
        total += produced as u64;
        peak = pcm[..produced]
            .iter()
            .fold(peak, |peak, s| peak.max(s.saturating_abs()));
        if produced < pcm.len() {
            return (total, peak);
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default().with_format(LogFormat::Compact))?;

    let config = DecoderConfig::default();
    let mut source = match std::env::args().nth(1) {
        Some(path) => {
            println!("Opening {}", path);
            Mp3Source::open(path, config)?
        }
        None => {
            println!("No file given, using 200 synthesized silent frames");
            Mp3Source::from_bytes(synthetic_stream(200), config)?
        }
    };

    let stats = source.stats();
    println!("Source type: {}", source.source_type());
    println!("   Codec: {:?}", source.codec());
    println!("   Frames: {}", stats.frame_count());
    println!("   Average bitrate: {} bps", stats.bitrate());
    println!("   Sample rate: {} Hz", stats.sample_rate());
    println!("   Channels: {}", stats.channels());
    println!("   Duration: {:?}", stats.duration_secs());
    println!("   Length: {} samples", source.length());

    let started = Instant::now();
    let (total, peak) = drain(&mut source);
    println!(
        "\nDecoded {} samples (peak {}) in {:?}",
        total,
        peak,
        started.elapsed()
    );

    let middle = source.length() / 2;
    source.seek(middle);
    let (rest, _) = drain(&mut source);
    println!("After seeking to {}: {} samples remain", middle, rest);

    Ok(())
}
