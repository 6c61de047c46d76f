use std::io;

fn main() {
    derby_cli::logging::init_logging();
    let code = derby_cli::run(std::env::args(), &mut io::stdout(), &mut io::stderr());
    std::process::exit(code);
}
