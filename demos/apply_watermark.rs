//! Watermark a single image.
//!
//! Usage:
//! ```sh
//! cargo run --example apply_watermark -- input.jpg [output]
//! ```

use std::env;
use std::path::Path;
use std::process;

use shrimp_watermark::ImageTransformPipeline;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <input> [output]", args[0]);
        process::exit(1);
    }

    let input = Path::new(&args[1]);
    let output = args.get(2).map(Path::new);

    match ImageTransformPipeline::new().process_file(input, output) {
        Ok(saved) => println!("Done: {}", saved.display()),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
