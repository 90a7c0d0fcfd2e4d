//! Snapshots of KMS objects and the trait used to fetch them
//!
//! Every snapshot is a plain copy of what the kernel reported. The numbers are kept raw so they
//! can be printed exactly as the driver returned them.

use std::io;

/// Property flag: the values describe an unsigned range
pub const PROP_RANGE: u32 = 1 << 1;
/// Property flag: the property can not be changed by user space
pub const PROP_IMMUTABLE: u32 = 1 << 2;
/// Property flag: the property is an enumeration
pub const PROP_ENUM: u32 = 1 << 3;
/// Property flag: the property value is a blob id
pub const PROP_BLOB: u32 = 1 << 4;
/// Property flag: the property is a bitmask of enum values
pub const PROP_BITMASK: u32 = 1 << 5;

/// Ids of the top level KMS objects of a card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resources {
    pub connectors: Vec<u32>,
    pub encoders: Vec<u32>,
    pub crtcs: Vec<u32>,
    pub framebuffers: Vec<u32>,
}

/// A display mode (timings and resolution).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeInfo {
    pub name: String,
    /// Pixel clock in kHz
    pub clock: u32,
    pub hdisplay: u16,
    pub hsync_start: u16,
    pub hsync_end: u16,
    pub htotal: u16,
    pub hskew: u16,
    pub vdisplay: u16,
    pub vsync_start: u16,
    pub vsync_end: u16,
    pub vtotal: u16,
    pub vscan: u16,
    pub vrefresh: u32,
    /// Raw mode flags, including the picture aspect ratio bits
    pub flags: u32,
}

/// A physical display output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectorInfo {
    /// Connector type code (VGA, HDMI-A, DP, ...)
    pub connector_type: u32,
    /// Index of the connector among the connectors of the same type
    pub connector_type_id: u32,
    /// Currently attached encoder, 0 if none
    pub encoder_id: u32,
    /// Raw connection status
    pub connection: u32,
    pub mm_width: u32,
    pub mm_height: u32,
    pub modes: Vec<ModeInfo>,
    /// Property ids, parallel to `prop_values`
    pub props: Vec<u32>,
    pub prop_values: Vec<u64>,
    /// Encoders that can drive this connector
    pub encoders: Vec<u32>,
}

impl ConnectorInfo {
    /// Returns the current value of the given property, if the connector has it.
    pub fn prop_value(&self, prop_id: u32) -> Option<u64> {
        self.props
            .iter()
            .position(|&id| id == prop_id)
            .and_then(|index| self.prop_values.get(index).copied())
    }
}

/// An encoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncoderInfo {
    pub encoder_type: u32,
    /// CRTC feeding this encoder, 0 if none
    pub crtc_id: u32,
    /// Bitmask over the CRTC list of the resources
    pub possible_crtcs: u32,
    /// Bitmask over the encoder list of the resources
    pub possible_clones: u32,
}

/// A display controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrtcInfo {
    pub x: u32,
    pub y: u32,
    /// Width of the active mode, 0 when no mode is set
    pub width: u32,
    /// Height of the active mode, 0 when no mode is set
    pub height: u32,
    pub mode: Option<ModeInfo>,
    pub gamma_size: u32,
}

/// A framebuffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FramebufferInfo {
    /// GEM handle of the backing buffer
    pub handle: u32,
    pub width: u32,
    pub height: u32,
    pub pitch: u32,
    pub bpp: u32,
    pub depth: u32,
}

/// A named value of an enum or bitmask property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyEnum {
    pub value: u64,
    pub name: String,
}

/// A property descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyInfo {
    pub id: u32,
    pub name: String,
    /// Raw `PROP_*` flags
    pub flags: u32,
    /// Range bounds or blob ids, depending on the property type
    pub values: Vec<u64>,
    pub enums: Vec<PropertyEnum>,
}

impl PropertyInfo {
    /// Returns whether the value of this property is a blob id.
    pub fn is_blob(&self) -> bool {
        self.flags & PROP_BLOB != 0
    }
}

/// Read-only access to the KMS objects of a card.
pub trait KmsQuery {
    /// Fetches the ids of all top level objects.
    fn resources(&self) -> io::Result<Resources>;

    /// Fetches a connector. Without `force_probe` the kernel returns its cached state.
    fn connector(&self, id: u32, force_probe: bool) -> io::Result<ConnectorInfo>;

    /// Fetches an encoder.
    fn encoder(&self, id: u32) -> io::Result<EncoderInfo>;

    /// Fetches a CRTC.
    fn crtc(&self, id: u32) -> io::Result<CrtcInfo>;

    /// Fetches a framebuffer.
    fn framebuffer(&self, id: u32) -> io::Result<FramebufferInfo>;

    /// Fetches a property descriptor.
    fn property(&self, id: u32) -> io::Result<PropertyInfo>;

    /// Fetches the payload of a property blob.
    fn property_blob(&self, id: u64) -> io::Result<Vec<u8>>;
}
