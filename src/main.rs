use clap::{crate_version, App, Arg};
use log::{error, info, warn};
use nikki::build::{build_site, Outcome};
use nikki::config::Config;
use std::path::Path;
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = App::new("nikki")
        .version(crate_version!())
        .about("Builds a single scrollable diary page from dated text files")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .takes_value(true)
                .help("Project file to load instead of ./nikki.yaml"),
        )
        .arg(
            Arg::with_name("source")
                .short("s")
                .long("source")
                .value_name("DIR")
                .takes_value(true)
                .help("Directory of dated source files"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("FILE")
                .takes_value(true)
                .help("Page to write"),
        )
        .arg(
            Arg::with_name("strict")
                .long("strict")
                .help("Exit with a failure status when the source directory is missing"),
        )
        .get_matches();

    let mut config = match Config::load(matches.value_of("config").map(Path::new), Path::new("")) {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            process::exit(1);
        }
    };
    config.override_with(
        matches.value_of("source"),
        matches.value_of("output"),
        matches.is_present("strict"),
    );

    let outcome = match build_site(&config) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };
    match &outcome {
        Outcome::MissingSourceDirectory(dir) => {
            error!("source directory `{}` not found", dir.display())
        }
        Outcome::Empty => warn!(
            "no documents found in `{}`; wrote the placeholder page",
            config.source_directory.display()
        ),
        Outcome::Rendered(count) => info!("processed {} documents", count),
    }
    process::exit(outcome.exit_code(config.strict));
}
