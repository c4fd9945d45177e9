use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use shrimp_watermark::{FontResolver, ImageTransformPipeline, RunConfig, SystemFont};

#[derive(Parser)]
#[command(
    name = "shrimp-watermark",
    about = "Apply bottom-half blur and watermark to an image.",
    version,
    after_help = "Simple usage: shrimp-watermark -f <image>  (writes <name>_Shrimp.<ext> next to it)"
)]
struct Cli {
    /// Path to the image file to process. If not provided, you will be prompted to enter it.
    #[arg(short = 'f', long = "file-path")]
    file_path: Option<PathBuf>,

    /// Output file or directory. A directory receives <name>_Shrimp.<ext>;
    /// a file path without an extension gets the input's extension.
    #[arg(short = 'o', long = "output-path")]
    output_path: Option<PathBuf>,

    /// Extra font file to try before the default candidates (repeatable)
    #[arg(long = "font", value_name = "PATH")]
    fonts: Vec<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Ask on stdin until an existing file is entered. `None` on EOF.
fn prompt_for_file() -> Option<PathBuf> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        eprint!("Enter the path of the image file: ");
        let _ = io::stderr().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(_)) | None => return None,
        };
        let entered = line.trim();
        if entered.is_empty() {
            eprintln!("No path entered, try again or press Ctrl+D to quit.");
            continue;
        }
        let path = PathBuf::from(entered);
        if path.is_file() {
            return Some(path);
        }
        eprintln!("File does not exist: {entered}\nPlease enter a valid file path.");
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);
    let Cli {
        file_path,
        output_path,
        fonts,
        ..
    } = cli;

    let file_path = match file_path {
        Some(path) => path,
        None => match prompt_for_file() {
            Some(path) => path,
            None => {
                eprintln!("\nCancelled.");
                process::exit(1);
            }
        },
    };

    let fonts = fonts
        .into_iter()
        .rev()
        .fold(FontResolver::new(), |resolver, font| {
            resolver.prepend(SystemFont::new(font))
        });

    let config = RunConfig {
        file_path,
        output_target: output_path,
    };

    match ImageTransformPipeline::with_font_resolver(fonts).run(&config) {
        Ok(saved) => println!("{}", saved.display()),
        Err(e) => {
            error!("Failed to process image: {e}");
            process::exit(1);
        }
    }
}
