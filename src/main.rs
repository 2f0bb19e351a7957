fn main() {
    if let Err(err) = publishing_dashboard::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
