//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use bitereserve_cli::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    bitereserve_cli::init_logging();
    match bitereserve_cli::run().await {
        Ok(()) => {}
        // Help and version output go through clap's own exit path.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("bitereserve: {err}");
            std::process::exit(1);
        }
    }
}
