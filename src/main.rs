use minsh::cli::{self, Cli};
use minsh::error::DIAGNOSTIC_PREFIX;
use minsh::signals;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli: Cli = argh::from_env();
    if let Err(e) = signals::install() {
        log::warn!("{:#}", e);
    }

    let code = match cli::run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", DIAGNOSTIC_PREFIX, e);
            1
        }
    };
    std::process::exit(code);
}
