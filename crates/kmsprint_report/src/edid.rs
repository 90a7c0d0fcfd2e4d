use std::io::Write;

use kmsprint_drm::{ConnectorInfo, KmsQuery};
use log::{debug, warn};

use crate::Report;

const HEX_ROW_LEN: usize = 16;
/// Length of the base EDID block
const EDID_BLOCK_LEN: usize = 128;

impl<Q: KmsQuery, W: Write> Report<'_, Q, W> {
    /// Prints the EDID blob of a connector as hex, if it exposes one.
    pub(crate) fn print_edid(&mut self, connector: &ConnectorInfo) -> anyhow::Result<()> {
        let Some(blob_id) = self.find_edid_blob(connector) else {
            return Ok(());
        };

        let data = match self.query.property_blob(blob_id) {
            Ok(data) => data,
            Err(err) => {
                warn!("Unable to get EDID blob {blob_id}: {err}");
                writeln!(self.out, "\tedid           : error getting blob {blob_id}")?;
                return Ok(());
            }
        };

        writeln!(self.out, "\tedid           : {} bytes", data.len())?;
        // The parser panics on input shorter than a base block
        if data.len() < EDID_BLOCK_LEN {
            debug!("EDID blob {blob_id} is shorter than a base block");
        } else {
            match ::edid::parse(&data).to_result() {
                Ok(parsed) => {
                    let manufacturer: String = parsed.header.vendor.iter().collect();
                    writeln!(self.out, "\tmanufacturer   : {manufacturer}")?;
                    writeln!(self.out, "\tproduct        : 0x{:04x}", parsed.header.product)?;
                }
                Err(err) => debug!("Unable to parse EDID blob {blob_id}: {err:?}"),
            }
        }
        for row in data.chunks(HEX_ROW_LEN) {
            write!(self.out, "\t\t")?;
            for byte in row {
                write!(self.out, "{byte:02x}")?;
            }
            writeln!(self.out)?;
        }

        Ok(())
    }

    /// Returns the blob id held by the connector's `EDID` property, if it is set.
    fn find_edid_blob(&self, connector: &ConnectorInfo) -> Option<u64> {
        let prop_id = connector.props.iter().copied().find(|&prop_id| {
            match self.query.property(prop_id) {
                Ok(property) => property.name == "EDID" && property.is_blob(),
                Err(err) => {
                    debug!("Unable to get property {prop_id}: {err}");
                    false
                }
            }
        })?;

        connector.prop_value(prop_id).filter(|&blob_id| blob_id != 0)
    }
}
