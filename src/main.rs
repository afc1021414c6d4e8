use anyhow::{bail, Result};
use tracing_subscriber::EnvFilter;

use squat_coach::config::Config;
use squat_coach::replay;

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        bail!("usage: {} <frames.jsonl> [config.toml]", args[0]);
    }
    let frames_path = &args[1];
    let config = match args.get(2) {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(CONFIG_PATH),
    };

    println!("=== Squat Coach {} ===", env!("SQUAT_COACH_VERSION"));
    println!("Frames: {}", frames_path);
    println!(
        "Thresholds: knee up {}° / down {}°, back {}°, hip drop {}",
        config.analyzer.knee_up,
        config.analyzer.knee_down,
        config.analyzer.back_fail,
        config.analyzer.hip_drop_min
    );
    println!("Smoothing: {}", config.analyzer.smoothing_factor);
    println!();

    let frames = replay::read_frames(frames_path)?;
    let summary = replay::run(&config, &frames);

    for change in &summary.changes {
        println!(
            "[{:>7.2}s] #{:<5} {:?} -> {:?} (reps: {})",
            change.at_ms as f64 / 1000.0,
            change.frame,
            change.from,
            change.to,
            change.repetition_count
        );
    }
    for cue in &summary.spoken {
        println!("[{:>7.2}s] speak: \"{}\" ({})", cue.at_ms as f64 / 1000.0, cue.phrase, cue.token);
    }

    println!();
    println!("Frames: {} ({} rejected)", summary.frames, summary.rejected_frames);
    println!("Repetitions: {}", summary.repetition_count);
    println!("Final feedback: {}", summary.final_feedback);
    if summary.is_calibrated {
        println!("Standing hip height: {:.3}", summary.standing_hip_height);
    } else {
        println!("Standing hip height: not calibrated");
    }

    Ok(())
}
