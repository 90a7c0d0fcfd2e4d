//! Human readable names for KMS type codes

/// Position of the picture aspect ratio bits inside the mode flags
const MODE_FLAG_PIC_AR_BITS_POS: u32 = 19;
/// Mask of the picture aspect ratio bits inside the mode flags
const MODE_FLAG_PIC_AR_MASK: u32 = 0x0F << MODE_FLAG_PIC_AR_BITS_POS;

const CONNECTOR_TYPE_NAMES: &[&str] = &[
    "Unknown",
    "VGA",
    "DVI-I",
    "DVI-D",
    "DVI-A",
    "Composite",
    "SVIDEO",
    "LVDS",
    "Component",
    "DIN",
    "DP",
    "HDMI-A",
    "HDMI-B",
    "TV",
    "eDP",
    "Virtual",
    "DSI",
    "DPI",
    "Writeback",
    "SPI",
    "USB",
];

const ENCODER_TYPE_NAMES: &[&str] = &[
    "none", "DAC", "TMDS", "LVDS", "TVDAC", "Virtual", "DSI", "DPMST", "DPI",
];

const ASPECT_RATIO_NAMES: &[&str] = &["n/a", "4:3", "16:9", "64:27", "256:135"];

/// Returns the name of a connector type code, `None` for codes this tool does not know.
pub fn connector_type_name(connector_type: u32) -> Option<&'static str> {
    CONNECTOR_TYPE_NAMES.get(connector_type as usize).copied()
}

/// Returns the name of a connector connection status.
pub fn connector_status_name(connection: u32) -> &'static str {
    match connection {
        1 => "connected",
        2 => "disconnected",
        _ => "unknown",
    }
}

/// Returns the name of an encoder type code, `None` for codes this tool does not know.
pub fn encoder_type_name(encoder_type: u32) -> Option<&'static str> {
    ENCODER_TYPE_NAMES.get(encoder_type as usize).copied()
}

/// Extracts the picture aspect ratio code from mode flags.
pub fn mode_aspect_ratio(flags: u32) -> u32 {
    (flags & MODE_FLAG_PIC_AR_MASK) >> MODE_FLAG_PIC_AR_BITS_POS
}

/// Returns the name of a picture aspect ratio code.
pub fn aspect_ratio_name(ratio: u32) -> &'static str {
    ASPECT_RATIO_NAMES
        .get(ratio as usize)
        .copied()
        .unwrap_or("n/a")
}
