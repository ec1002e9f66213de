fn main() {
    let args: Vec<String> = std::env::args().collect();
    std::process::exit(hirarki::cli::run_with_args(&args));
}
