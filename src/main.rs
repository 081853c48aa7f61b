use std::env;
use std::error::Error;
use std::path::Path;

use profilex::report::render_plan;
use profilex::{Analysis, ProfileConfig, TimestampedJournal};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // The first positional argument is a preset name or a JSON configuration
    // file; without one the CP3 preset is planned.
    let args: Vec<String> = env::args().skip(1).collect();
    let config = match args.iter().find(|arg| !arg.starts_with("--")) {
        Some(arg) if Path::new(arg).is_file() => ProfileConfig::from_path(arg)?,
        Some(arg) => ProfileConfig::preset(arg)?,
        None => ProfileConfig::default(),
    };

    let mut journal = TimestampedJournal::stdout();
    let model = Analysis::new(&mut journal).plan(&config)?;

    println!("{}", render_plan(&model));
    if args.iter().any(|arg| arg == "--json") {
        println!("{}", model.to_json()?);
    }

    Ok(())
}
