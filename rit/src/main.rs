mod cli;

fn init_logger() {
    // DEBUG (truthy) turns on diagnostic lines on stderr
    let debug = std::env::var("DEBUG")
        .map(|v| !v.is_empty() && v != "0" && !v.eq_ignore_ascii_case("false"))
        .unwrap_or(false);
    let level = if debug { log::LevelFilter::Debug } else { log::LevelFilter::Off };
    env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .init();
}

pub fn main() -> ! {
    init_logger();
    if let Err(err) = cli::run(std::env::args_os()) {
        eprintln!("{}", err);
        std::process::exit(1)
    } else {
        std::process::exit(0)
    }
}
