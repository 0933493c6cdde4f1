use dice_stats::{Limits, Probability, ProbabilityExt, Summary};
use log::info;
use std::io::{self, BufRead, Write};

const BAR_WIDTH: f64 = 40.0;

fn load_limits() -> Result<Limits, Box<dyn std::error::Error>> {
    match std::env::args_os().nth(1) {
        Some(path) => {
            let limits = Limits::from_toml(&std::fs::read_to_string(&path)?)?;
            info!("loaded {:?} from {:?}", limits, path);
            Ok(limits)
        }
        None => Ok(Limits::default()),
    }
}

fn print_distribution(dist: &[Probability]) {
    let peak = dist.iter().map(|p| p.probability).fold(0.0, f64::max);
    for p in dist {
        let bar = "#".repeat((p.probability / peak * BAR_WIDTH).round() as usize);
        println!("{:>8} {:>8.4}% {}", p.value, p.probability * 100.0, bar);
    }
    println!("mean {:.4}", dist.mean());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let limits = load_limits()?;
    let mut rng = rand::thread_rng();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    print!("> ");
    io::stdout().flush()?;
    while let Some(Ok(line)) = lines.next() {
        match Summary::with(&line, &limits, &mut rng) {
            Ok(summary) => {
                println!("{}", summary);
                if summary.distribution.is_empty() {
                    println!("no distribution");
                } else {
                    print_distribution(&summary.distribution);
                }
            }
            Err(why) => eprintln!("Error: {}", why),
        }
        print!("> ");
        io::stdout().flush()?;
    }
    Ok(())
}
