fn main() {
    if let Err(err) = h1b_counting::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
