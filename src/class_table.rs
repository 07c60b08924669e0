//! Class table for classifiers: one label per line, in the model's class order.

use std::io::Write;

use crate::Result;

pub fn write_class_table<W: Write, S: AsRef<str>>(labels: &[S], w: &mut W) -> Result<()> {
    for label in labels {
        writeln!(w, "{}", label.as_ref())?;
    }
    Ok(())
}
