use std::env;
use std::fs;
use std::io::{self, Read};

use anyhow::{anyhow, Context, Result};
use log::info;

use ntu_timetable_ics::{expand, parse_timetable, to_ics, Config};

mod cli;

fn setup_logging() {
    if env::var("LOG").is_err() {
        env::set_var("LOG", "ntu_timetable_ics=info");
    }

    pretty_env_logger::init_custom_env("LOG");
}

fn main() -> Result<()> {
    setup_logging();

    let args = cli::parse(env::args().skip(1).collect());

    let html = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let timetable = parse_timetable(&html)
        .ok_or_else(|| anyhow!("input does not contain a timetable and an exam table"))?;

    info!(
        "extracted {} lessons and {} exams",
        timetable.lessons.len(),
        timetable.exams.len()
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&timetable)?);
        return Ok(());
    }

    let config = Config {
        semester_start: args.semester_start,
        recess_week: args.recess_week,
        utc_offset_hours: args.utc_offset_hours,
    };

    let events = expand(&timetable, &config)?;

    let calendar = to_ics(&events, config.utc_offset_hours);
    calendar
        .save_file(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    info!("wrote {} events to {}", events.len(), args.output.display());

    Ok(())
}
