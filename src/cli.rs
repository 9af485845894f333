use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use getopts::{Matches, Options};

pub struct Args {
    /// HTML input file; stdin when absent.
    pub input: Option<PathBuf>,
    pub output: PathBuf,
    pub semester_start: NaiveDate,
    pub recess_week: NaiveDate,
    pub utc_offset_hours: i64,
    pub json: bool,
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "s",
        "semester-start",
        "First Monday of the teaching semester (required)",
        "YYYY-MM-DD",
    );
    opts.optopt(
        "r",
        "recess-week",
        "Monday of the one-week recess (required)",
        "YYYY-MM-DD",
    );
    opts.optopt(
        "u",
        "utc-offset",
        "Offset of the timetable's wall clock from UTC [Default: 8]",
        "HOURS",
    );
    opts.optopt(
        "o",
        "output",
        "Calendar file to write [Default: ntu-timetable.ics]",
        "FILE",
    );
    opts.optflag(
        "j",
        "json",
        "Print the extracted records as JSON instead of writing a calendar",
    );
    opts
}

fn required_date(matches: &Matches, name: &str) -> NaiveDate {
    match matches.opt_get::<NaiveDate>(name) {
        Ok(Some(date)) => date,
        Ok(None) => {
            eprintln!("Missing required option '{name}'");
            process::exit(1);
        }
        Err(err) => {
            eprintln!("Provided value for option '{name}' is invalid: {err}");
            process::exit(1);
        }
    }
}

pub fn parse(args: Vec<String>) -> Args {
    let opts = opts();

    let matches = match opts.parse(args) {
        Ok(matches) => matches,
        Err(fail) => {
            eprintln!("{fail}");
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        println!(
            "{}",
            opts.usage(&format!(
                "{} [FILE]",
                opts.short_usage(env!("CARGO_PKG_NAME"))
            ))
        );
        process::exit(0);
    }

    let semester_start = required_date(&matches, "semester-start");
    let recess_week = required_date(&matches, "recess-week");

    let utc_offset_hours = match matches.opt_get_default("utc-offset", 8) {
        Ok(hours) => hours,
        Err(err) => {
            eprintln!("Provided value for option 'utc-offset' is invalid: {err}");
            process::exit(1);
        }
    };

    let output = matches
        .opt_str("output")
        .map_or_else(|| PathBuf::from("ntu-timetable.ics"), PathBuf::from);

    Args {
        input: matches.free.first().map(PathBuf::from),
        output,
        semester_start,
        recess_week,
        utc_offset_hours,
        json: matches.opt_present("json"),
    }
}
