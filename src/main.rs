use std::{
    env::args,
    fs::OpenOptions,
    io::{self, Write},
};

use anyhow::Context;
use env_logger::{Builder, Target};
use kmsprint_drm::DrmDevice;
use kmsprint_report::Report;
use kmsprint_shared::DumpArgs;
use log::{LevelFilter, debug, error, warn};

fn main() -> anyhow::Result<()> {
    let Some(dump_args) = DumpArgs::parse(args()) else {
        return Ok(());
    };

    init_logger(dump_args.log_file.as_deref())?;
    for arg in &dump_args.ignored {
        warn!("Ignoring argument {arg}");
    }

    run_app(&dump_args).inspect_err(|err| error!("An error occurred: {err:#}"))
}

fn init_logger(log_file: Option<&str>) -> anyhow::Result<()> {
    let mut builder = Builder::new();
    builder.filter_level(LevelFilter::Warn);
    builder.parse_default_env();
    match log_file {
        Some(log_file) => {
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
                .context("Failed to open log file")?;
            builder.target(Target::Pipe(Box::new(log_file)));
        }
        None => {
            builder.target(Target::Stderr);
        }
    }
    builder.format(|buf, record| {
        writeln!(
            buf,
            "[{:<5}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        )
    });
    builder.init();

    Ok(())
}

/// Opens the device and prints its resources to stdout. Failing to open the device or to get
/// its resource list is an error, everything else is reported inline.
fn run_app(args: &DumpArgs) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "Starting test")?;

    let device = match DrmDevice::open_matching(args.device.as_deref(), args.module.as_deref()) {
        Ok(device) => device,
        Err(err) => {
            writeln!(stdout, "Failed to open the card fd ({err:#})")?;
            return Err(err);
        }
    };
    debug!("Using DRM device {}", device.path().display());

    if let Err(err) = device.enable_aspect_ratio() {
        debug!("Unable to enable aspect ratio reporting: {err}");
    }

    let mut report = Report::new(&device, args, stdout);
    report.run()?;

    let mut stdout = report.into_inner();
    writeln!(stdout, "Ok")?;

    Ok(())
}
