fn main() {
    stagecoord::init_logging();

    if let Err(err) = stagecoord::run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
