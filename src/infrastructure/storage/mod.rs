mod log_reader;
mod log_writer;

use std::io;
use std::path;

pub use log_reader::*;
pub use log_writer::*;

pub const LINE_SEPARATOR: u8 = b'\n';

pub fn hostname() -> io::Result<String> {
    let name = nix::unistd::gethostname().map_err(io::Error::from)?;
    return Ok(name.to_string_lossy().to_string());
}

/// Every machine writes its own log, named after its host name.
pub fn host_log_path(data_dir: &path::Path) -> io::Result<path::PathBuf> {
    let hostname = hostname()?;
    if hostname.is_empty() || hostname.contains(path::is_separator) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("host name '{hostname}' cannot be used as a file name"),
        ));
    }

    return Ok(data_dir.join(hostname));
}
