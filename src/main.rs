fn main() {
    if let Err(err) = neben::cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
