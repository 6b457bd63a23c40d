use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::models::Window;

pub const WINDOW_TABLE_HEADER: &str = "chrom\tstart\tstop\tdepth\tmapq\tread_balance";

///
/// Write windows as a tab-separated table with a header row, creating parent
/// directories as needed.
///
/// # Arguments
/// - path: the path to the file to dump to
/// - windows: rows to write, in order
pub fn write_window_table<'a, T: AsRef<Path>>(
    path: T,
    windows: impl IntoIterator<Item = &'a Window>,
) -> std::io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "{}", WINDOW_TABLE_HEADER)?;
    for window in windows {
        writeln!(writer, "{}", window.as_row())?;
    }
    writer.flush()
}
