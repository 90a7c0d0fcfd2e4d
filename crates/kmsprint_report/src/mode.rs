use std::io::Write;

use kmsprint_drm::names::{aspect_ratio_name, mode_aspect_ratio};
use kmsprint_drm::{KmsQuery, ModeInfo};

use crate::Report;

/// The object a printed mode belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ModeSource {
    /// One of the modes a connector supports
    Connector,
    /// The mode a CRTC is currently driving
    Crtc,
}

impl ModeSource {
    fn as_str(self) -> &'static str {
        match self {
            ModeSource::Connector => "connector",
            ModeSource::Crtc => "crtc",
        }
    }
}

impl<Q: KmsQuery, W: Write> Report<'_, Q, W> {
    /// Prints a mode in the style selected by the arguments.
    ///
    /// The two trailing numbers only show up in the debug style: the encoder id and mode index
    /// for connector modes, the CRTC id and 0 for CRTC modes.
    pub(crate) fn print_mode(
        &mut self,
        mode: &ModeInfo,
        source: ModeSource,
        first: u32,
        second: u32,
    ) -> anyhow::Result<()> {
        if self.args.debug_modes {
            writeln!(
                self.out,
                "Mode: {} @ {} Hz, clock: {:.2} Mhz, aspect: {} {} {} {}",
                mode.name,
                mode.vrefresh,
                f64::from(mode.clock) / 1000.0,
                aspect_ratio_name(mode_aspect_ratio(mode.flags)),
                source.as_str(),
                first,
                second
            )?;
        } else if self.args.full_modes {
            writeln!(self.out, "Mode: {}", mode.name)?;
            writeln!(self.out, "\tclock       : {}", mode.clock)?;
            writeln!(self.out, "\thdisplay    : {}", mode.hdisplay)?;
            writeln!(self.out, "\thsync_start : {}", mode.hsync_start)?;
            writeln!(self.out, "\thsync_end   : {}", mode.hsync_end)?;
            writeln!(self.out, "\thtotal      : {}", mode.htotal)?;
            writeln!(self.out, "\thskew       : {}", mode.hskew)?;
            writeln!(self.out, "\tvdisplay    : {}", mode.vdisplay)?;
            writeln!(self.out, "\tvsync_start : {}", mode.vsync_start)?;
            writeln!(self.out, "\tvsync_end   : {}", mode.vsync_end)?;
            writeln!(self.out, "\tvtotal      : {}", mode.vtotal)?;
            writeln!(self.out, "\tvscan       : {}", mode.vscan)?;
            writeln!(self.out, "\tvrefresh    : {}", mode.vrefresh)?;
            writeln!(self.out, "\tflags       : {}", mode.flags)?;
        } else {
            writeln!(
                self.out,
                "Mode: \"{}\" {}x{} {}",
                mode.name, mode.hdisplay, mode.vdisplay, mode.vrefresh
            )?;
        }

        Ok(())
    }
}
