fn main() {
    if let Err(e) = fieldflow_lib::run() {
        eprintln!("fieldflow: {e}");
        std::process::exit(1);
    }
}
