use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Lazily iterate the lines of a text file.
pub(crate) fn read_lines<P: AsRef<Path>>(path: P) -> io::Result<io::Lines<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(BufReader::new(file).lines())
}
