//! User interface module - terminal formatting and properties file output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::manager::PropertyReport;
use crate::properties;

pub mod formatter;

pub use formatter::{
    display_error, display_failures, display_properties, display_status, display_warning,
    format_property,
};

/// Write the report as a Java properties file at `path`.
pub fn write_properties_file(report: &PropertyReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "# Generated by nisse {}", env!("CARGO_PKG_VERSION"))?;
    properties::store(&mut writer, &report.properties)?;
    writer.flush()?;
    Ok(())
}
