use std::io::Write;

use kmsprint_drm::{KmsQuery, PropertyInfo};
use log::warn;

use crate::Report;

impl<Q: KmsQuery, W: Write> Report<'_, Q, W> {
    /// Prints a property descriptor together with its current `value`.
    pub(crate) fn print_property(
        &mut self,
        property: &PropertyInfo,
        value: u64,
    ) -> anyhow::Result<()> {
        writeln!(self.out, "Property: {}", property.name)?;
        writeln!(self.out, "\tid           : {}", property.id)?;
        writeln!(self.out, "\tflags        : {}", property.flags)?;
        writeln!(self.out, "\tcount_values : {}", property.values.len())?;

        if !property.values.is_empty() {
            write!(self.out, "\tvalues       :")?;
            for value in &property.values {
                write!(self.out, " {value}")?;
            }
            writeln!(self.out)?;
        }

        writeln!(self.out, "\tcount_enums  : {}", property.enums.len())?;

        if property.is_blob() {
            match self.query.property_blob(value) {
                Ok(data) => writeln!(
                    self.out,
                    "blob is {} length, {:08X}",
                    data.len(),
                    first_word(&data)
                )?,
                Err(err) => {
                    warn!("Unable to get blob {value}: {err}");
                    writeln!(self.out, "error getting blob {value}")?;
                }
            }
        } else {
            let mut name = None;
            for e in &property.enums {
                writeln!(self.out, "\t\t{} = {}", e.value, e.name)?;
                if e.value == value {
                    name = Some(&e.name);
                }
            }

            match name {
                Some(name) => writeln!(self.out, "\tcon_value    : {name}")?,
                None => writeln!(self.out, "\tcon_value    : {value}")?,
            }
        }

        Ok(())
    }
}

/// Reads the first four bytes of a blob as a native endian word, zero padded.
fn first_word(data: &[u8]) -> u32 {
    let mut word = [0u8; 4];
    for (dst, src) in word.iter_mut().zip(data) {
        *dst = *src;
    }
    u32::from_ne_bytes(word)
}
