use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;
use crate::error::StoreError;
use crate::report::{MetricRecord, HEADER};

/// Appends records to a result table, creating it if needed
///
/// The header is written only when the file is missing or holds nothing but blank lines, so
/// repeated sweeps against one table keep a single header at the top. Rows are written in the
/// order given and are never deduplicated. A table whose last row was cut off without a line
/// terminator gets one before the new rows
///
/// The header check and the append are not atomic together; concurrent writers to the same
/// table need their own locking
///
/// # Arguments
///
/// * `path`: The result table
/// * `records`: Rows to append, in order
///
/// returns: Result<(), StoreError>
pub fn append_records(path: &Path, records: &[MetricRecord]) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io { path: path.to_path_buf(), source };
    let csv_err = |source| StoreError::Csv { path: path.to_path_buf(), source };

    let existing = inspect(path).map_err(io_err)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path).map_err(io_err)?;
    if !existing.terminated {
        file.write_all(b"\n").map_err(io_err)?;
    }
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    if !existing.has_content {
        writer.write_record(HEADER).map_err(csv_err)?;
    }
    for record in records {
        writer.serialize(record).map_err(csv_err)?;
    }
    writer.flush().map_err(io_err)?;
    Ok(())
}

/// Reads every row of a result table back into records
pub fn read_table(path: &Path) -> Result<Vec<MetricRecord>, StoreError> {
    let csv_err = |source| StoreError::Csv { path: path.to_path_buf(), source };
    let file = File::open(path).map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
    let mut reader = csv::Reader::from_reader(file);
    reader.deserialize::<MetricRecord>().collect::<Result<Vec<_>, _>>().map_err(csv_err)
}

/// What a table already holds before rows are appended
struct Existing {
    has_content: bool,
    /// Empty, or ends with a line terminator
    terminated: bool,
}

// A missing file has no content
fn inspect(path: &Path) -> std::io::Result<Existing> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Existing { has_content: false, terminated: true }),
        Err(e) => return Err(e),
    };
    let mut has_content = false;
    for line in BufReader::new(&file).lines() {
        if !line?.trim().is_empty() {
            has_content = true;
            break;
        }
    }
    let terminated = if file.metadata()?.len() == 0 {
        true
    } else {
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))?;
        file.read_exact(&mut last)?;
        last[0] == b'\n'
    };
    Ok(Existing { has_content, terminated })
}
