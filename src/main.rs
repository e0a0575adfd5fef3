use colored::Colorize;
use std::process;

use htseq_combine::config::InputConfig;
use htseq_combine::logging::build_subscriber;

fn main() {
    eprintln!(
        "{} {}",
        "htseq-combine: combine htseq-count files into a DESeq count table.\n Version:"
            .cyan()
            .bold(),
        env!("CARGO_PKG_VERSION").cyan().bold()
    );
    let config = InputConfig::build().unwrap_or_else(|err| {
        eprintln!(
            "Problem parsing arguments: {}",
            err.to_string().red().bold()
        );
        process::exit(1);
    });
    #[cfg(debug_assertions)]
    dbg!(&config);

    let subscriber = build_subscriber(&config);
    let result = tracing::subscriber::with_default(subscriber, || htseq_combine::run(&config));
    if let Err(e) = result {
        eprintln!("Application error: {}", e.to_string().red().bold());
        process::exit(1);
    }
    eprintln!("✅ Combined table written to {}", config.output.display());
}
