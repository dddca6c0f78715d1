fn main() {
    if let Err(err) = kestrel::cli::run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
