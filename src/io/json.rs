use std::io::Write;

use serde::Serialize;

use crate::error::OrbitResult;

/// Write any contract value as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> OrbitResult<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}
