fn main() {
    if let Err(e) = clientapi::cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
