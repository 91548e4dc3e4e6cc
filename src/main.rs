use clap::Parser;
use seekfirst::core::config;
use seekfirst::core::loader;
use seekfirst::core::state::Session;
use seekfirst::tui;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "seekfirst", about = "Look up Bible passages and phrases as you type")]
struct Args {
    /// Verse document (XML with <b>/<c>/<v> elements)
    #[arg(long)]
    corpus: Option<PathBuf>,
    /// Book-name table (`Name,Abbreviation` rows in document order)
    #[arg(long)]
    books: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Nothing can log until the log file is known; hold records until then
    let mut deferred = config::DeferredLog::new();
    let file_config = match config::load_config(&mut deferred) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("seekfirst: {e}");
            std::process::exit(2);
        }
    };
    let resolved = config::resolve(
        &file_config,
        args.corpus.as_deref(),
        args.books.as_deref(),
        &mut deferred,
    );

    // Initialize file logger; the terminal is raw while the session runs
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }
    deferred.replay();

    log::info!(
        "Seekfirst starting with corpus {} and book table {}",
        resolved.corpus_path.display(),
        resolved.books_path.display()
    );

    let corpus = match loader::load(&resolved.corpus_path, &resolved.books_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Startup failed: {}", e);
            eprintln!("seekfirst: {e}");
            std::process::exit(1);
        }
    };

    let session = Session::from_config(corpus, &resolved);
    let code = match tui::run(session).await {
        Ok(()) => 0,
        Err(e) => {
            log::error!("Session failed: {}", e);
            eprintln!("seekfirst: {e}");
            1
        }
    };

    // Exit explicitly: a stdin read may still be parked on a blocking thread
    std::process::exit(code);
}
