//! DRM device management

use std::ffi::{CStr, c_char};
use std::io;
use std::os::fd::{AsFd, BorrowedFd, OwnedFd};
use std::path::{Path, PathBuf};

use anyhow::Context;
use drm::Device;
use drm::control::Device as ControlDevice;
use drm_ffi as ffi;
use log::{debug, info, warn};
use rustix::fs::{Mode, OFlags};

use crate::query::{
    ConnectorInfo, CrtcInfo, EncoderInfo, FramebufferInfo, KmsQuery, ModeInfo, PropertyEnum,
    PropertyInfo, Resources,
};

/// A DRM device wrapper that implements the drm-rs traits.
pub struct DrmDevice {
    fd: OwnedFd,
    path: PathBuf,
}

// Implement the drm-rs Device trait
impl Device for DrmDevice {}

impl AsFd for DrmDevice {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

// Implement ControlDevice for the mode setting queries
impl ControlDevice for DrmDevice {}

impl DrmDevice {
    /// Opens the device node at `path` for reading and writing.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let fd = rustix::fs::open(path, OFlags::RDWR | OFlags::CLOEXEC, Mode::empty())
            .with_context(|| format!("Failed to open {}", path.display()))?;

        Ok(Self {
            fd,
            path: path.to_path_buf(),
        })
    }

    /// Opens a device node.
    ///
    /// An explicit `device` path is opened as is. Otherwise the `card*` nodes in `/dev/dri` are
    /// tried in order and the first one that opens is used; when a `module` is given it also has
    /// to be driven by a driver of that name.
    pub fn open_matching(device: Option<&Path>, module: Option<&str>) -> anyhow::Result<Self> {
        if let Some(path) = device {
            info!("Opening DRM device {}", path.display());
            return Self::open(path);
        }

        for path in find_drm_devices()? {
            debug!("Trying to open {}", path.display());
            let device = match Self::open(&path) {
                Ok(device) => device,
                Err(err) => {
                    warn!("{err:#}");
                    continue;
                }
            };

            let Some(module) = module else {
                info!("Opened DRM device {}", path.display());
                return Ok(device);
            };

            match device.driver_name() {
                Ok(name) if name == module => {
                    info!("Opened DRM device {} driven by {}", path.display(), name);
                    return Ok(device);
                }
                Ok(name) => debug!("Skipping {} driven by {}", path.display(), name),
                Err(err) => warn!("{err:#}"),
            }
        }

        match module {
            Some(module) => anyhow::bail!("No DRM device driven by {module} found"),
            None => anyhow::bail!("No DRM device could be opened"),
        }
    }

    /// Returns the name of the kernel driver (e.g., "amdgpu", "i915", "nouveau").
    pub fn driver_name(&self) -> anyhow::Result<String> {
        let driver = self.get_driver().context("Failed to get DRM driver info")?;

        Ok(driver.name().to_string_lossy().into_owned())
    }

    /// Asks the kernel to report the picture aspect ratio in mode flags.
    pub fn enable_aspect_ratio(&self) -> io::Result<()> {
        self.set_client_capability(drm::ClientCapability::AspectRatio, true)
    }

    /// Returns the path of the opened device node.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KmsQuery for DrmDevice {
    fn resources(&self) -> io::Result<Resources> {
        let handles = self.resource_handles()?;

        Ok(Resources {
            connectors: handles.connectors().iter().map(|&h| u32::from(h)).collect(),
            encoders: handles.encoders().iter().map(|&h| u32::from(h)).collect(),
            crtcs: handles.crtcs().iter().map(|&h| u32::from(h)).collect(),
            framebuffers: handles.framebuffers().iter().map(|&h| u32::from(h)).collect(),
        })
    }

    fn connector(&self, id: u32, force_probe: bool) -> io::Result<ConnectorInfo> {
        let mut props = Vec::new();
        let mut prop_values = Vec::new();
        let mut modes = Vec::new();
        let mut encoders = Vec::new();

        let info = ffi::mode::get_connector(
            self.as_fd(),
            id,
            Some(&mut props),
            Some(&mut prop_values),
            Some(&mut modes),
            Some(&mut encoders),
            force_probe,
        )?;

        Ok(ConnectorInfo {
            connector_type: info.connector_type,
            connector_type_id: info.connector_type_id,
            encoder_id: info.encoder_id,
            connection: info.connection,
            mm_width: info.mm_width,
            mm_height: info.mm_height,
            modes: modes.iter().map(mode_info).collect(),
            props,
            prop_values,
            encoders,
        })
    }

    fn encoder(&self, id: u32) -> io::Result<EncoderInfo> {
        let info = ffi::mode::get_encoder(self.as_fd(), id)?;

        Ok(EncoderInfo {
            encoder_type: info.encoder_type,
            crtc_id: info.crtc_id,
            possible_crtcs: info.possible_crtcs,
            possible_clones: info.possible_clones,
        })
    }

    fn crtc(&self, id: u32) -> io::Result<CrtcInfo> {
        let info = ffi::mode::get_crtc(self.as_fd(), id)?;

        let mode = (info.mode_valid != 0).then(|| mode_info(&info.mode));
        let (width, height) = mode.as_ref().map_or((0, 0), |mode| {
            (u32::from(mode.hdisplay), u32::from(mode.vdisplay))
        });

        Ok(CrtcInfo {
            x: info.x,
            y: info.y,
            width,
            height,
            mode,
            gamma_size: info.gamma_size,
        })
    }

    fn framebuffer(&self, id: u32) -> io::Result<FramebufferInfo> {
        let info = ffi::mode::get_framebuffer(self.as_fd(), id)?;

        Ok(FramebufferInfo {
            handle: info.handle,
            width: info.width,
            height: info.height,
            pitch: info.pitch,
            bpp: info.bpp,
            depth: info.depth,
        })
    }

    fn property(&self, id: u32) -> io::Result<PropertyInfo> {
        let mut values = Vec::new();
        let mut enums = Vec::new();

        let info = ffi::mode::get_property(self.as_fd(), id, Some(&mut values), Some(&mut enums))?;

        Ok(PropertyInfo {
            id: info.prop_id,
            name: c_name(&info.name),
            flags: info.flags,
            values,
            enums: enums
                .iter()
                .map(|e| PropertyEnum {
                    value: e.value,
                    name: c_name(&e.name),
                })
                .collect(),
        })
    }

    fn property_blob(&self, id: u64) -> io::Result<Vec<u8>> {
        self.get_property_blob(id)
    }
}

/// Copies a kernel mode description into a [`ModeInfo`].
fn mode_info(mode: &ffi::drm_mode_modeinfo) -> ModeInfo {
    ModeInfo {
        name: c_name(&mode.name),
        clock: mode.clock,
        hdisplay: mode.hdisplay,
        hsync_start: mode.hsync_start,
        hsync_end: mode.hsync_end,
        htotal: mode.htotal,
        hskew: mode.hskew,
        vdisplay: mode.vdisplay,
        vsync_start: mode.vsync_start,
        vsync_end: mode.vsync_end,
        vtotal: mode.vtotal,
        vscan: mode.vscan,
        vrefresh: mode.vrefresh,
        flags: mode.flags,
    }
}

/// Converts a NUL padded name from a kernel struct. A name filling the whole buffer has no NUL
/// and is taken as is.
fn c_name(raw: &[c_char]) -> String {
    let bytes: Vec<u8> = raw.iter().map(|&c| c as u8).collect();

    match CStr::from_bytes_until_nul(&bytes) {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(_) => String::from_utf8_lossy(&bytes).into_owned(),
    }
}

/// Finds available DRM primary nodes.
///
/// Returns paths to `/dev/dri/card*` devices.
pub fn find_drm_devices() -> anyhow::Result<Vec<PathBuf>> {
    find_card_nodes(Path::new("/dev/dri"))
}

fn find_card_nodes(dri_path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !dri_path.exists() {
        anyhow::bail!(
            "{} does not exist - is the DRM subsystem loaded?",
            dri_path.display()
        );
    }

    let mut devices = Vec::new();

    for entry in std::fs::read_dir(dri_path)
        .with_context(|| format!("Failed to read {}", dri_path.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            // Look for card* devices (not renderD* which are render-only)
            if name.starts_with("card") {
                devices.push(path);
            }
        }
    }

    devices.sort();

    debug!("Found {} DRM device(s): {:?}", devices.len(), devices);

    Ok(devices)
}
