// Scaffold CLI Entry Point

use scaffold_cli::{logging::VerbosityLevel, output, router::CommandRouter};

fn main() {
    if let Err(e) = CommandRouter::route() {
        output::print_error(&e.user_message());
        if VerbosityLevel::Verbose.should_output() {
            eprintln!("{}", e.technical_details());
        }
        std::process::exit(e.exit_code());
    }
}
