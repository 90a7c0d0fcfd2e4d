use std::path::PathBuf;

/// Arguments provided at process start
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpArgs {
    /// Print the framebuffers
    pub framebuffers: bool,
    /// Print the EDID blob of each connector
    pub edid: bool,
    /// Print the CRTCs
    pub crtcs: bool,
    /// Print the modes of each connector
    pub modes: bool,
    /// Print the encoders
    pub encoders: bool,
    /// Print every timing field of a mode
    pub full_modes: bool,
    /// Print the properties of each connector
    pub full_props: bool,
    /// Print the connectors
    pub connectors: bool,
    /// Use the cached connector state instead of forcing a probe
    pub current: bool,
    /// Print modes in the compact debug style
    pub debug_modes: bool,
    /// Device node to open instead of probing `/dev/dri`
    pub device: Option<PathBuf>,
    /// Driver name the opened device has to match
    pub module: Option<String>,
    /// Path to the log file, logs go to stderr when unset
    pub log_file: Option<String>,
    /// Arguments that were not understood
    pub ignored: Vec<String>,
}

impl DumpArgs {
    /// Parse the arguments, skipping the program name. `None` indicates that the program should
    /// exit.
    pub fn parse(args: impl Iterator<Item = String>) -> Option<Self> {
        let mut parsed = Self::default();
        let mut defaults = true;
        let mut args = args.skip(1);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => {
                    print_help();
                    return None;
                }
                "-fb" => {
                    parsed.framebuffers = true;
                    defaults = false;
                }
                "-crtcs" => {
                    parsed.crtcs = true;
                    defaults = false;
                }
                "-cons" | "-modes" => {
                    parsed.connectors = true;
                    parsed.modes = true;
                    defaults = false;
                }
                "-full" => {
                    parsed.connectors = true;
                    parsed.modes = true;
                    parsed.full_modes = true;
                    defaults = false;
                }
                "-props" => {
                    parsed.connectors = true;
                    parsed.full_props = true;
                    defaults = false;
                }
                "-edids" => {
                    parsed.connectors = true;
                    parsed.edid = true;
                    defaults = false;
                }
                "-encoders" => {
                    parsed.encoders = true;
                    defaults = false;
                }
                "-v" => {
                    parsed.select_defaults();
                    parsed.full_modes = true;
                    parsed.full_props = true;
                    defaults = false;
                }
                "-current" => parsed.current = true,
                "-debug" => parsed.debug_modes = true,
                "-D" | "--device" => match args.next() {
                    Some(path) => parsed.device = Some(PathBuf::from(path)),
                    None => parsed.ignored.push(arg),
                },
                "-M" | "--module" => match args.next() {
                    Some(module) => parsed.module = Some(module),
                    None => parsed.ignored.push(arg),
                },
                "--log-file" => match args.next() {
                    Some(path) => parsed.log_file = Some(path),
                    None => parsed.ignored.push(arg),
                },
                _ => parsed.ignored.push(arg),
            }
        }

        if defaults {
            parsed.select_defaults();
        }

        Some(parsed)
    }

    /// Selects the categories printed when no category flag was given
    fn select_defaults(&mut self) {
        self.framebuffers = true;
        self.edid = true;
        self.crtcs = true;
        self.modes = true;
        self.encoders = true;
        self.connectors = true;
    }
}

fn print_help() {
    println!("Usage: kmsprint [OPTIONS]");
    println!("Options:");
    println!("  -fb                 Print framebuffers");
    println!("  -crtcs              Print CRTCs");
    println!("  -cons, -modes       Print connectors and their modes");
    println!("  -full               Print connectors and every mode timing");
    println!("  -props              Print connectors and their properties");
    println!("  -edids              Print connectors and their EDID");
    println!("  -encoders           Print encoders");
    println!("  -v                  Print everything");
    println!("  -current            Do not force a connector probe");
    println!("  -debug              Print modes in the compact debug style");
    println!("  -D, --device PATH   Open the given device node");
    println!("  -M, --module NAME   Open the first device driven by NAME");
    println!("  --log-file PATH     Append logs to PATH instead of stderr");
    println!("  -h, --help          Print this help message and exit");
}
