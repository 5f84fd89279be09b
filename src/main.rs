fn main() {
    use clap::Parser;
    use std::error::Error;
    let args = bookscrape::cli::Args::parse();
    let level = bookscrape::logging::level_directive(args.quiet, args.verbose);
    if let Err(e) = bookscrape::logging::init_logging(level) {
        eprintln!("{}", e);
    }
    if let Err(e) = bookscrape::cli::run(&args) {
        tracing::error!("{}", e);
        if args.verbose {
            let mut source = e.source();
            while let Some(s) = source {
                tracing::error!("  cause: {}", s);
                source = s.source();
            }
        }
        std::process::exit(e.exit_code());
    }
}
