use clap::Parser;

fn main() {
    let args = amiga_inspect::cli::Args::parse();
    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(err) = amiga_inspect::run(&args) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}
