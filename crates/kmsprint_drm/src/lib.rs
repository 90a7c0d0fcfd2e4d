//! DRM/KMS resource access
//!
//! This crate opens a DRM device node and exposes read-only snapshots of its mode setting
//! objects through the [`KmsQuery`] trait.

mod device;
pub mod names;
mod query;

pub use device::{DrmDevice, find_drm_devices};
pub use query::{
    ConnectorInfo, CrtcInfo, EncoderInfo, FramebufferInfo, KmsQuery, ModeInfo, PROP_BITMASK,
    PROP_BLOB, PROP_ENUM, PROP_IMMUTABLE, PROP_RANGE, PropertyEnum, PropertyInfo,
    Resources,
};
