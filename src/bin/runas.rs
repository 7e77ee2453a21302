fn main() {
    std::process::exit(runas::cli::run());
}
