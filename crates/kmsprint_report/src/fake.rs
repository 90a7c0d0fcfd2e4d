//! In-memory card used by the tests

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;

use kmsprint_drm::{
    ConnectorInfo, CrtcInfo, EncoderInfo, FramebufferInfo, KmsQuery, ModeInfo, PROP_BLOB,
    PROP_ENUM, PROP_IMMUTABLE, PropertyEnum, PropertyInfo, Resources,
};
use kmsprint_shared::DumpArgs;

use crate::Report;

/// Id of the DPMS property of the fake card
pub const DPMS_PROP: u32 = 1;
/// Id of the EDID property of the fake card
pub const EDID_PROP: u32 = 2;
/// Blob id holding the EDID of [`hdmi_connector`]
pub const EDID_BLOB: u64 = 100;

/// A query made against the fake card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Resources,
    Connector(u32, bool),
    Encoder(u32),
    Crtc(u32),
    Framebuffer(u32),
    Property(u32),
    PropertyBlob(u64),
}

/// A card whose objects are all stored in memory. Ids that are listed in the resources but have
/// no object behave like objects that vanished between the two queries.
pub struct FakeCard {
    pub resources: Resources,
    pub fail_resources: bool,
    pub connectors: HashMap<u32, ConnectorInfo>,
    pub encoders: HashMap<u32, EncoderInfo>,
    pub crtcs: HashMap<u32, CrtcInfo>,
    pub framebuffers: HashMap<u32, FramebufferInfo>,
    pub properties: HashMap<u32, PropertyInfo>,
    pub blobs: HashMap<u64, Vec<u8>>,
    queries: RefCell<Vec<Query>>,
}

impl Default for FakeCard {
    fn default() -> Self {
        let properties = [
            PropertyInfo {
                id: DPMS_PROP,
                name: "DPMS".into(),
                flags: PROP_ENUM,
                values: vec![0, 1, 2, 3],
                enums: ["On", "Standby", "Suspend", "Off"]
                    .into_iter()
                    .enumerate()
                    .map(|(value, name)| PropertyEnum {
                        value: value as u64,
                        name: name.into(),
                    })
                    .collect(),
            },
            PropertyInfo {
                id: EDID_PROP,
                name: "EDID".into(),
                flags: PROP_BLOB | PROP_IMMUTABLE,
                values: Vec::new(),
                enums: Vec::new(),
            },
        ]
        .into_iter()
        .map(|property| (property.id, property))
        .collect();

        Self {
            resources: Resources::default(),
            fail_resources: false,
            connectors: HashMap::new(),
            encoders: HashMap::new(),
            crtcs: HashMap::new(),
            framebuffers: HashMap::new(),
            properties,
            blobs: HashMap::from([(EDID_BLOB, sample_edid())]),
            queries: RefCell::new(Vec::new()),
        }
    }
}

impl FakeCard {
    /// A card whose resource query fails
    pub fn failing() -> Self {
        Self {
            fail_resources: true,
            ..Default::default()
        }
    }

    pub fn add_connector(&mut self, id: u32, connector: ConnectorInfo) {
        self.resources.connectors.push(id);
        self.connectors.insert(id, connector);
    }

    pub fn add_encoder(&mut self, id: u32, encoder: EncoderInfo) {
        self.resources.encoders.push(id);
        self.encoders.insert(id, encoder);
    }

    pub fn add_crtc(&mut self, id: u32, crtc: CrtcInfo) {
        self.resources.crtcs.push(id);
        self.crtcs.insert(id, crtc);
    }

    pub fn add_framebuffer(&mut self, id: u32, framebuffer: FramebufferInfo) {
        self.resources.framebuffers.push(id);
        self.framebuffers.insert(id, framebuffer);
    }

    /// Returns the queries made so far.
    pub fn queries(&self) -> Vec<Query> {
        self.queries.borrow().clone()
    }

    /// Returns the queries made so far and forgets them.
    pub fn take_queries(&self) -> Vec<Query> {
        self.queries.take()
    }

    fn record(&self, query: Query) {
        self.queries.borrow_mut().push(query);
    }
}

fn lookup<K: std::hash::Hash + Eq, T: Clone>(map: &HashMap<K, T>, key: &K) -> io::Result<T> {
    map.get(key)
        .cloned()
        .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
}

impl KmsQuery for FakeCard {
    fn resources(&self) -> io::Result<Resources> {
        self.record(Query::Resources);
        if self.fail_resources {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        Ok(self.resources.clone())
    }

    fn connector(&self, id: u32, force_probe: bool) -> io::Result<ConnectorInfo> {
        self.record(Query::Connector(id, force_probe));
        lookup(&self.connectors, &id)
    }

    fn encoder(&self, id: u32) -> io::Result<EncoderInfo> {
        self.record(Query::Encoder(id));
        lookup(&self.encoders, &id)
    }

    fn crtc(&self, id: u32) -> io::Result<CrtcInfo> {
        self.record(Query::Crtc(id));
        lookup(&self.crtcs, &id)
    }

    fn framebuffer(&self, id: u32) -> io::Result<FramebufferInfo> {
        self.record(Query::Framebuffer(id));
        lookup(&self.framebuffers, &id)
    }

    fn property(&self, id: u32) -> io::Result<PropertyInfo> {
        self.record(Query::Property(id));
        lookup(&self.properties, &id)
    }

    fn property_blob(&self, id: u64) -> io::Result<Vec<u8>> {
        self.record(Query::PropertyBlob(id));
        lookup(&self.blobs, &id)
    }
}

/// Parses flags the way the command line does.
pub fn args(flags: &[&str]) -> DumpArgs {
    DumpArgs::parse(
        std::iter::once("kmsprint")
            .chain(flags.iter().copied())
            .map(String::from),
    )
    .unwrap()
}

/// Runs a report over `card` and returns the text.
pub fn report(card: &FakeCard, args: &DumpArgs) -> anyhow::Result<String> {
    let mut report = Report::new(card, args, Vec::new());
    report.run()?;

    Ok(String::from_utf8(report.into_inner())?)
}

/// 1920x1080@60 with a 16:9 picture aspect ratio and positive syncs
pub fn mode_1080p() -> ModeInfo {
    ModeInfo {
        name: "1920x1080".into(),
        clock: 148500,
        hdisplay: 1920,
        hsync_start: 2008,
        hsync_end: 2052,
        htotal: 2200,
        hskew: 0,
        vdisplay: 1080,
        vsync_start: 1084,
        vsync_end: 1089,
        vtotal: 1125,
        vscan: 0,
        vrefresh: 60,
        flags: 0x5 | (2 << 19),
    }
}

/// 1280x720@60 without aspect ratio information
pub fn mode_720p() -> ModeInfo {
    ModeInfo {
        name: "1280x720".into(),
        clock: 74250,
        hdisplay: 1280,
        hsync_start: 1390,
        hsync_end: 1430,
        htotal: 1650,
        hskew: 0,
        vdisplay: 720,
        vsync_start: 725,
        vsync_end: 730,
        vtotal: 750,
        vscan: 0,
        vrefresh: 60,
        flags: 0x5,
    }
}

/// A connected HDMI connector with DPMS "Off" and an EDID blob
pub fn hdmi_connector() -> ConnectorInfo {
    ConnectorInfo {
        connector_type: 11,
        connector_type_id: 1,
        encoder_id: 40,
        connection: 1,
        mm_width: 600,
        mm_height: 340,
        modes: vec![mode_1080p(), mode_720p()],
        props: vec![DPMS_PROP, EDID_PROP],
        prop_values: vec![3, EDID_BLOB],
        encoders: vec![40, 41],
    }
}

/// A 128 byte base EDID block of a "DEL" monitor with product code 0xa0b1
pub fn sample_edid() -> Vec<u8> {
    let mut edid = vec![0u8; 128];
    edid[..8].copy_from_slice(&[0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00]);
    // D = 4, E = 5, L = 12 packed as 5 bit letters
    let manufacturer: u16 = (4 << 10) | (5 << 5) | 12;
    edid[8..10].copy_from_slice(&manufacturer.to_be_bytes());
    edid[10..12].copy_from_slice(&0xa0b1u16.to_le_bytes());
    // All four descriptor slots are dummy descriptors
    for slot in edid[54..126].chunks_mut(18) {
        slot[3] = 0x10;
    }
    edid
}
