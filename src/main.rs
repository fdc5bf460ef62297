//! # tablesvg CLI
//!
//! Usage:
//!   tablesvg input.json -o matrix.svg --html matrix.html
//!   echo '{ ... }' | tablesvg -o matrix.svg
//!   tablesvg --example > matrix.json
//!
//! `--image` sets the image path written into the HTML page; it defaults to
//! the SVG output path. Set `RUST_LOG` to adjust log output.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].clone())
}

fn run(args: &[String]) -> tablesvg::Result<()> {
    // Read input
    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1])?
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    };

    let svg_path = flag_value(args, "-o").unwrap_or_else(|| "output.svg".to_string());
    let html_path = flag_value(args, "--html");
    let image_path = flag_value(args, "--image").unwrap_or_else(|| svg_path.clone());

    let rendered = tablesvg::render_json(&input)?;
    fs::write(&svg_path, &rendered.svg)?;
    tracing::info!(bytes = rendered.svg.len(), path = %svg_path, "wrote svg");

    if let Some(html_path) = html_path {
        let html = rendered.html(&image_path);
        fs::write(&html_path, &html)?;
        tracing::info!(bytes = html.len(), path = %html_path, "wrote html map");
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print!("{}", example_matrix_json());
        return ExitCode::SUCCESS;
    }

    setup_logging();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn example_matrix_json() -> &'static str {
    r##"{
  "id": "support-matrix",
  "config": { "fontSize": 12, "fontFamily": "Arial" },
  "children": [
    { "type": "TextCenter", "text": "Board", "width": 120, "height": 30, "bold": true },
    { "type": "TextCenter", "text": "Linux", "width": 90, "height": 30, "bold": true },
    { "type": "TextCenter", "text": "U-Boot", "width": 90, "height": 30, "bold": true },
    { "type": "NewLine" },
    { "type": "Line", "dx": 300, "dy": 0, "strokeWidth": 2 },
    { "type": "NewLine" },
    { "type": "TextCenter", "text": "alpha-v1", "width": 120, "height": 30 },
    { "type": "Link", "href": "https://example.org/boards/alpha-v1/linux", "children": [
      { "type": "RectContainer", "fill": "rgb(154,230,180)", "children": [
        { "type": "TextCenter", "text": "Good", "width": 90, "height": 30 }
      ]}
    ]},
    { "type": "Link", "href": "https://example.org/boards/alpha-v1/u-boot", "children": [
      { "type": "RectContainer", "fill": "rgb(254,215,170)", "children": [
        { "type": "TextCenter", "text": "Partial", "width": 90, "height": 30 }
      ]}
    ]},
    { "type": "NewLine" },
    { "type": "TextCenter", "text": "beta-x", "width": 120, "height": 30 },
    { "type": "RectContainer", "fill": "rgb(254,178,178)", "children": [
      { "type": "TextCenter", "text": "CFH", "width": 90, "height": 30 }
    ]},
    { "type": "Advance", "dx": 90 }
  ]
}
"##
}
