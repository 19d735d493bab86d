// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Saving options.
#[derive(Clone, Debug)]
pub struct Options {
    /// An explicit output path.
    ///
    /// When `None`, a unique path inside `output_dir` is generated from
    /// `file_stem`, the current time and a process-wide counter.
    ///
    /// Default: `None`
    pub output_path: Option<PathBuf>,

    /// Directory for generated output paths.
    ///
    /// Default: `std::env::temp_dir()`
    pub output_dir: PathBuf,

    /// File stem for generated output paths.
    ///
    /// Default: `svgdoc`
    pub file_stem: String,

    /// Source of timestamps for generated output paths,
    /// in milliseconds since the Unix epoch.
    ///
    /// Can be replaced to make generated paths reproducible.
    ///
    /// Default: the system clock
    pub clock: fn() -> u64,

    /// An external SVG to PNG converter.
    ///
    /// Invoked as `<converter> <svg path> <png path>`,
    /// ImageMagick-style.
    ///
    /// Default: `convert`
    pub converter: String,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            output_path: None,
            output_dir: std::env::temp_dir(),
            file_stem: "svgdoc".to_string(),
            clock: system_millis,
            converter: "convert".to_string(),
        }
    }
}

impl Options {
    /// Generates a unique output path with the provided extension.
    ///
    /// The counter guarantees that two generated paths are distinct
    /// even within one clock millisecond.
    pub(crate) fn generate_output_path(&self, extension: &str) -> PathBuf {
        static SEQ: AtomicU64 = AtomicU64::new(0);

        let seq = SEQ.fetch_add(1, Ordering::Relaxed);
        let name = format!("{}-{}-{}.{}", self.file_stem, (self.clock)(), seq, extension);
        self.output_dir.join(name)
    }
}

fn system_millis() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_millis() as u64,
        Err(_) => 0,
    }
}
