//! textfeat CLI binary entrypoint.

fn main() {
    if let Err(err) = textfeat_cli::app::run() {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
