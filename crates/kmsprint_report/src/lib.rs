//! Human readable dump of the KMS resources of a card
//!
//! [`Report`] walks the objects reachable through a [`KmsQuery`] and writes one block of text per
//! object. Which categories are printed is decided by the [`DumpArgs`].

use std::io::{self, Write};

use anyhow::Context;
use kmsprint_drm::names::{connector_status_name, connector_type_name, encoder_type_name};
use kmsprint_drm::{ConnectorInfo, CrtcInfo, EncoderInfo, FramebufferInfo, KmsQuery, Resources};
use kmsprint_shared::DumpArgs;
use log::{debug, warn};

mod edid;
mod mode;
mod property;

#[cfg(test)]
mod fake;

use mode::ModeSource;

/// Writes the resources of a card as text.
pub struct Report<'a, Q: KmsQuery, W: Write> {
    query: &'a Q,
    args: &'a DumpArgs,
    out: W,
}

impl<'a, Q: KmsQuery, W: Write> Report<'a, Q, W> {
    /// Creates a new report over `query` writing to `out`.
    pub fn new(query: &'a Q, args: &'a DumpArgs, out: W) -> Self {
        Self { query, args, out }
    }

    /// Returns the writer the report was written to.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Fetches the resource list and prints every requested category.
    ///
    /// Only a failure to get the resource list (or to write the output) is an error. Objects that
    /// can not be fetched are reported in the output and skipped.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let resources = match self.query.resources() {
            Ok(resources) => resources,
            Err(err) => {
                writeln!(self.out, "Failed to get resources from card")?;
                return Err(err).context("Failed to get resources from card");
            }
        };

        self.print_resources(&resources)?;
        self.out.flush().context("Failed to flush output")?;

        Ok(())
    }

    fn print_resources(&mut self, resources: &Resources) -> anyhow::Result<()> {
        writeln!(self.out, "Resources")?;
        writeln!(self.out)?;
        writeln!(self.out, "count_connectors : {}", resources.connectors.len())?;
        writeln!(self.out, "count_encoders   : {}", resources.encoders.len())?;
        writeln!(self.out, "count_crtcs      : {}", resources.crtcs.len())?;
        writeln!(self.out, "count_fbs        : {}", resources.framebuffers.len())?;
        writeln!(self.out)?;

        if self.args.connectors {
            let force_probe = !self.args.current;
            self.print_each(
                "connector",
                &resources.connectors,
                |query, id| query.connector(id, force_probe),
                Self::print_connector,
            )?;
            writeln!(self.out)?;
        }

        if self.args.encoders {
            self.print_each(
                "encoder",
                &resources.encoders,
                |query, id| query.encoder(id),
                Self::print_encoder,
            )?;
            writeln!(self.out)?;
        }

        if self.args.crtcs {
            self.print_each(
                "crtc",
                &resources.crtcs,
                |query, id| query.crtc(id),
                Self::print_crtc,
            )?;
            writeln!(self.out)?;
        }

        if self.args.framebuffers {
            self.print_each(
                "fb",
                &resources.framebuffers,
                |query, id| query.framebuffer(id),
                Self::print_framebuffer,
            )?;
        }

        Ok(())
    }

    /// Fetches and prints every object in `ids`, reporting the ones that can not be fetched.
    fn print_each<T>(
        &mut self,
        kind: &str,
        ids: &[u32],
        fetch: impl Fn(&Q, u32) -> io::Result<T>,
        mut print: impl FnMut(&mut Self, u32, T) -> anyhow::Result<()>,
    ) -> anyhow::Result<()> {
        for &id in ids {
            match fetch(self.query, id) {
                Ok(item) => print(&mut *self, id, item)?,
                Err(err) => {
                    warn!("Unable to get {kind} {id}: {err}");
                    writeln!(self.out, "Could not get {kind} {id}")?;
                }
            }
        }

        Ok(())
    }

    fn print_connector(&mut self, id: u32, connector: ConnectorInfo) -> anyhow::Result<()> {
        match connector_type_name(connector.connector_type) {
            Some(name) => writeln!(
                self.out,
                "Connector: {}-{}",
                name, connector.connector_type_id
            )?,
            None => writeln!(
                self.out,
                "Connector: {}-{}",
                connector.connector_type, connector.connector_type_id
            )?,
        }
        writeln!(self.out, "\tid             : {id}")?;
        writeln!(self.out, "\tencoder id     : {}", connector.encoder_id)?;
        writeln!(
            self.out,
            "\tconn           : {}",
            connector_status_name(connector.connection)
        )?;
        writeln!(
            self.out,
            "\tsize           : {}x{} (mm)",
            connector.mm_width, connector.mm_height
        )?;
        writeln!(self.out, "\tcount_modes    : {}", connector.modes.len())?;
        writeln!(self.out, "\tcount_props    : {}", connector.props.len())?;
        if !connector.props.is_empty() {
            write!(self.out, "\tprops          :")?;
            for prop in &connector.props {
                write!(self.out, " {prop}")?;
            }
            writeln!(self.out)?;
        }

        writeln!(self.out, "\tcount_encoders : {}", connector.encoders.len())?;
        if !connector.encoders.is_empty() {
            write!(self.out, "\tencoders       :")?;
            for encoder in &connector.encoders {
                write!(self.out, " {encoder}")?;
            }
            writeln!(self.out)?;
        }

        if self.args.modes {
            for (index, mode) in connector.modes.iter().enumerate() {
                self.print_mode(
                    mode,
                    ModeSource::Connector,
                    connector.encoder_id,
                    index as u32,
                )?;
            }
        }

        if self.args.edid {
            self.print_edid(&connector)?;
        }

        if self.args.full_props {
            for (&prop_id, &value) in connector.props.iter().zip(&connector.prop_values) {
                match self.query.property(prop_id) {
                    Ok(property) => self.print_property(&property, value)?,
                    Err(err) => debug!("Unable to get property {prop_id}: {err}"),
                }
            }
        }

        Ok(())
    }

    fn print_encoder(&mut self, id: u32, encoder: EncoderInfo) -> anyhow::Result<()> {
        match encoder_type_name(encoder.encoder_type) {
            Some(name) => writeln!(self.out, "Encoder: {name}")?,
            None => writeln!(self.out, "Encoder")?,
        }
        writeln!(self.out, "\tid     :{id}")?;
        writeln!(self.out, "\tcrtc_id   :{}", encoder.crtc_id)?;
        writeln!(self.out, "\ttype   :{}", encoder.encoder_type)?;
        writeln!(self.out, "\tpossible_crtcs  :0x{:x}", encoder.possible_crtcs)?;
        writeln!(self.out, "\tpossible_clones :0x{:x}", encoder.possible_clones)?;

        if self.args.debug_modes {
            writeln!(self.out, "Encoder map: {} to {}", id, encoder.crtc_id)?;
        }

        Ok(())
    }

    fn print_crtc(&mut self, id: u32, crtc: CrtcInfo) -> anyhow::Result<()> {
        writeln!(self.out, "Crtc")?;
        writeln!(self.out, "\tid             : {id}")?;
        writeln!(self.out, "\tx              : {}", crtc.x)?;
        writeln!(self.out, "\ty              : {}", crtc.y)?;
        writeln!(self.out, "\twidth          : {}", crtc.width)?;
        writeln!(self.out, "\theight         : {}", crtc.height)?;
        match &crtc.mode {
            Some(mode) => writeln!(self.out, "\tmode           : \"{}\"", mode.name)?,
            None => writeln!(self.out, "\tmode           : (none)")?,
        }
        writeln!(self.out, "\tgamma size     : {}", crtc.gamma_size)?;

        if self.args.debug_modes {
            if let Some(mode) = &crtc.mode {
                self.print_mode(mode, ModeSource::Crtc, id, 0)?;
            }
        }

        Ok(())
    }

    fn print_framebuffer(&mut self, _id: u32, fb: FramebufferInfo) -> anyhow::Result<()> {
        writeln!(self.out, "Framebuffer")?;
        writeln!(self.out, "\thandle    : {}", fb.handle)?;
        writeln!(self.out, "\twidth     : {}", fb.width)?;
        writeln!(self.out, "\theight    : {}", fb.height)?;
        writeln!(self.out, "\tpitch     : {}", fb.pitch)?;
        writeln!(self.out, "\tbpp       : {}", fb.bpp)?;
        writeln!(self.out, "\tdepth     : {}", fb.depth)?;
        writeln!(self.out, "\tbuffer_id : {}", fb.handle)?;

        Ok(())
    }
}
