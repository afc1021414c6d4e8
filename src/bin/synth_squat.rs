use anyhow::{bail, Context, Result};

use squat_coach::replay::write_frames;
use squat_coach::synth::{Rep, SquatScript};

const DEFAULT_REPS: usize = 5;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        bail!("usage: {} <out.jsonl> [reps]", args[0]);
    }
    let output = &args[1];
    let clean_reps: usize = match args.get(2) {
        Some(n) => n.parse().with_context(|| format!("Invalid rep count: {}", n))?,
        None => DEFAULT_REPS,
    };

    // 正しいレップの後に、失敗例を1回ずつ
    let mut reps = vec![Rep::Clean; clean_reps];
    reps.push(Rep::RoundedBack);
    reps.push(Rep::Shallow);

    let frames = SquatScript::new(reps).frames();
    write_frames(output, &frames)?;

    println!("Wrote {} frames ({} clean reps + 2 faulty) to {}", frames.len(), clean_reps, output);
    Ok(())
}
