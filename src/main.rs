// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::Path;
use std::process;

use pico_args::Arguments;


const HELP: &str = "\
svgdoc is an SVG document manipulation tool.

USAGE:
  svgdoc [OPTIONS] <in-file> <out-file>

  The input kind is chosen by the file extension: '.json' is parsed as
  the JSON form, everything else as an SVG(Z).
  Same for the output: '.json' writes the JSON form, '.png' runs an
  external raster converter and everything else writes an SVG document.

OPTIONS:
  -h, --help                Prints help information
  -V, --version             Prints version information

  --transform TS            Applies a transform to every element,
                            e.g. 'matrix(1 0 0 1 10 20)' or 'rotate(45)'.
                            This option can be set multiple times;
                            transforms are composed left to right
  --omit-transform          Drops 'transform' attributes on output
  --converter NAME          Sets an external SVG to PNG converter.
                            Invoked as '<converter> <svg path> <png path>'
                            [default: convert]
  --quiet                   Disables warnings

ARGS:
  <in-file>                 Input file (.svg, .svgz or .json)
  <out-file>                Output file (.svg, .json or .png)
";

#[derive(Debug)]
struct Args {
    transforms: Vec<svgdoc::Transform>,
    omit_transform: bool,
    converter: String,
    quiet: bool,

    input: String,
    output: String,
}

fn collect_args() -> Result<Args, pico_args::Error> {
    let mut input = Arguments::from_env();

    if input.contains(["-h", "--help"]) {
        print!("{}", HELP);
        process::exit(0);
    }

    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        process::exit(0);
    }

    Ok(Args {
        transforms:     input.values_from_fn("--transform", parse_transform)?,
        omit_transform: input.contains("--omit-transform"),
        converter:      input.opt_value_from_str("--converter")?
                             .unwrap_or_else(|| "convert".to_string()),
        quiet:          input.contains("--quiet"),

        input:          input.free_from_str()?,
        output:         input.free_from_str()?,
    })
}

fn parse_transform(s: &str) -> Result<svgdoc::Transform, String> {
    s.parse().map_err(|_| "invalid transform".to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = match collect_args() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}.", e);
            process::exit(1);
        }
    };

    if !args.quiet {
        if let Ok(()) = log::set_logger(&LOGGER) {
            log::set_max_level(log::LevelFilter::Warn);
        }
    }

    if let Err(e) = process(args).await {
        eprintln!("Error: {}.", e);
        process::exit(1);
    }
}

async fn process(args: Args) -> Result<(), String> {
    let in_path = Path::new(&args.input);
    let svg = if has_extension(in_path, "json") {
        svgdoc::Svg::from_json_file(in_path).await
    } else {
        svgdoc::Svg::from_file(in_path).await
    }
    .map_err(|e| e.to_string())?;

    let svg = if args.transforms.is_empty() {
        svg
    } else {
        svg.apply_matrix(&args.transforms)
            .await
            .map_err(|e| e.to_string())?
    };

    let out_path = Path::new(&args.output);
    if has_extension(out_path, "png") {
        let opt = svgdoc::Options {
            output_path: Some(out_path.to_path_buf()),
            converter: args.converter,
            ..svgdoc::Options::default()
        };

        svg.save_png(&opt).await.map_err(|e| e.to_string())?;
    } else if has_extension(out_path, "json") {
        let json = svg.to_json(args.omit_transform);
        let text = serde_json::to_string_pretty(&json).map_err(|e| e.to_string())?;
        tokio::fs::write(out_path, text)
            .await
            .map_err(|e| e.to_string())?;
    } else {
        tokio::fs::write(out_path, svg.to_xml(args.omit_transform))
            .await
            .map_err(|e| e.to_string())?;
    }

    Ok(())
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}


/// A simple stderr logger.
static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::LevelFilter::Warn
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            let line = record.line().unwrap_or(0);

            match record.level() {
                log::Level::Error => eprintln!("Error (in {}:{}): {}", target, line, record.args()),
                log::Level::Warn  => eprintln!("Warning (in {}:{}): {}", target, line, record.args()),
                log::Level::Info  => eprintln!("Info (in {}:{}): {}", target, line, record.args()),
                log::Level::Debug => eprintln!("Debug (in {}:{}): {}", target, line, record.args()),
                log::Level::Trace => eprintln!("Trace (in {}:{}): {}", target, line, record.args()),
            }
        }
    }

    fn flush(&self) {}
}
