use clap::Parser;
use herdfence::app::HerdfenceAppArguments;

fn main() {
    env_logger::init();
    let args = HerdfenceAppArguments::parse();
    if let Err(e) = args.app.run() {
        log::error!("herdfence failed: {e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
}
