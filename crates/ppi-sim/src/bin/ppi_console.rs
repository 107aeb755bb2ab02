//! Headless radar console
//!
//! Runs the sweep and signal source for a fixed number of frames, logging
//! detections, and optionally records a dual-channel acquisition.
//!
//! ```text
//! ppi-console [--config PATH] [--frames N] [--fps F] [--speed S]
//!             [--capture PATH] [--pause]
//! ```

use std::path::PathBuf;

use ppi_core::adc::{offset_binary, DualChannelAdc};
use ppi_core::config::ConsoleConfig;
use ppi_core::observe::init_logging;
use ppi_core::spectrum::dominant_tone;
use ppi_sim::{load_capture, CaptureWriter, Console, DateTimeReadout};

const CAPTURE_SAMPLES: usize = 4096;

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

fn parse_arg<T>(args: &[String], flag: &str, default: T) -> Result<T, Box<dyn std::error::Error>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match arg_value(args, flag) {
        Some(raw) => raw
            .parse()
            .map_err(|e| format!("invalid value for {flag}: {raw} ({e})").into()),
        None => Ok(default),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    let config = match arg_value(&args, "--config") {
        Some(path) => ConsoleConfig::load_from(&PathBuf::from(path))?,
        None => ConsoleConfig::load()?,
    };
    init_logging(&config.logging);

    let frames: u64 = parse_arg(&args, "--frames", 600)?;
    let fps: f64 = parse_arg(&args, "--fps", 60.0)?;
    if !(fps.is_finite() && fps > 0.0) {
        return Err(format!("--fps must be positive, got {fps}").into());
    }
    let dt = 1.0 / fps;

    let mut console = Console::new(&config)?;
    if let Some(speed) = arg_value(&args, "--speed") {
        console.set_speed(speed.parse()?);
    }
    if args.iter().any(|a| a == "--pause") {
        console.toggle_pause();
    }

    tracing::info!(
        started = %DateTimeReadout::now(),
        frames,
        fps,
        speed = console.speed(),
        "console running"
    );

    let mut detections = 0usize;
    let mut reversals = 0usize;
    for _ in 0..frames {
        let snap = console.frame(dt)?;
        detections += snap.tick.triggered.len();
        reversals += usize::from(snap.tick.reversed);
    }

    console.open_analyzer();
    let tone = console.analyze();
    let state = console.sweep().state();

    println!("=== PPI Console Summary ===");
    println!("  Frames:      {}", console.frames());
    println!("  Sim time:    {:.2} s", console.frames() as f64 * dt);
    println!("  Sweep:       {:.1}° {:?}", state.angle, state.direction);
    println!("  Reversals:   {}", reversals);
    println!("  Detections:  {}", detections);
    for blip in console.sweep().active_blips() {
        println!(
            "    blip at {:.1}° range {:.2} intensity {:.2}",
            blip.angle, blip.distance_ratio, blip.intensity
        );
    }
    if let Some(tone) = tone {
        println!(
            "  Wave tone:   {:.1} kHz, {:.0} codes peak",
            tone.frequency_hz / 1e3,
            tone.amplitude
        );
    }

    if let Some(path) = arg_value(&args, "--capture") {
        let path = PathBuf::from(path);
        let adc = DualChannelAdc::new(config.adc.clone())?;
        let block: Vec<u16> = adc.acquire(CAPTURE_SAMPLES).into_iter().map(offset_binary).collect();

        let mut writer = CaptureWriter::create(&path)?;
        writer.write_interleaved(&block)?;
        let written = writer.finish()?;

        let data = load_capture(&path)?;
        let sample_rate = config.adc.sample_rate;
        println!("  Capture:     {} ({} samples/channel)", path.display(), written);
        for (name, channel) in [("ch1", &data.ch1), ("ch2", &data.ch2)] {
            if let Some(t) = dominant_tone(channel, sample_rate) {
                println!("    {}: {:.2} kHz, {:.0} codes peak", name, t.frequency_hz / 1e3, t.amplitude);
            }
        }
        tracing::info!(path = %path.display(), samples = written, "capture written");
    }

    tracing::info!(frames = console.frames(), detections, "console stopped");
    Ok(())
}
