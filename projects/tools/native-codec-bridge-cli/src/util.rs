use crate::error::CliError;
use lightweight_mmap::handles::ReadOnlyFileHandle;
use lightweight_mmap::mmap::ReadOnlyMmap;
use native_codec_bridge::AstcBlock;
use std::fs;
use std::path::Path;

/// Memory-maps `path` read-only and passes its contents to `f`.
///
/// Empty files are passed as an empty slice without mapping.
pub fn with_input<R>(
    path: &Path,
    f: impl FnOnce(&[u8]) -> Result<R, CliError>,
) -> Result<R, CliError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| CliError::NonUtf8Path(path.to_string_lossy().into_owned()))?;
    let mmap_error = |reason: String| CliError::Mmap {
        path: path_str.to_owned(),
        reason,
    };

    let handle = ReadOnlyFileHandle::open(path_str).map_err(|e| mmap_error(e.to_string()))?;
    let size = handle.size().map_err(|e| mmap_error(e.to_string()))? as usize;
    if size == 0 {
        return f(&[]);
    }

    let mapping = ReadOnlyMmap::new(&handle, 0, size).map_err(|e| mmap_error(e.to_string()))?;
    f(mapping.as_slice())
}

/// Writes `data` to `path`, creating parent directories as needed.
pub fn write_output(path: &Path, data: &[u8]) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, data)?;
    Ok(())
}

/// Parses an ASTC block footprint such as `6x6`.
pub fn parse_block(value: &str) -> Result<AstcBlock, String> {
    let invalid = || format!("Invalid block footprint: {value}. Expected WIDTHxHEIGHT, e.g. 6x6");
    let (x, y) = value.split_once(['x', 'X']).ok_or_else(invalid)?;
    let x = x.trim().parse().map_err(|_| invalid())?;
    let y = y.trim().parse().map_err(|_| invalid())?;
    let block = AstcBlock::new(x, y);
    if !block.is_valid() {
        return Err(format!("{value} is not a 2D ASTC block footprint"));
    }
    Ok(block)
}
