//! # Niimprint CLI
//!
//! Command-line interface for Niimbot label printers.
//!
//! ## Usage
//!
//! ```bash
//! # Firmware, hardware version and serial number
//! niimprint --address 01:23:45:67:89:AB info
//!
//! # Every info key, through a bound /dev/rfcomm0
//! niimprint --device /dev/rfcomm0 info --all
//!
//! # Label roll RFID tag and printer state
//! niimprint -a 01:23:45:67:89:AB rfid
//! niimprint -a 01:23:45:67:89:AB heartbeat
//!
//! # Print an image, 3 copies, darker
//! niimprint -a 01:23:45:67:89:AB print label.png --density 3 --quantity 3
//!
//! # Print text on a 12x40mm label
//! niimprint -a 01:23:45:67:89:AB print-label "Hello"
//! ```
//!
//! Records are printed to stdout as JSON. Logs go to stderr.

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, info};

use niimprint::{
    NiimprintError, Niimprinter, PrinterClient, PrinterConfig,
    job::JobOptions,
    printer::LabelSize,
    raster::{Bitmap, Dithering, MonoBitmap, text},
    transport::{BdAddr, SerialTransport, Transport, bluetooth::DEFAULT_DEVICE},
};

/// Niimprint - Niimbot label printer utility
#[derive(Parser, Debug)]
#[command(name = "niimprint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// MAC address of the printer (RFCOMM channel 1)
    #[arg(short, long, value_name = "XX:XX:XX:XX:XX:XX", conflicts_with = "device")]
    address: Option<BdAddr>,

    /// Bound RFCOMM device to use instead of a MAC address
    #[arg(long, value_name = "PATH")]
    device: Option<PathBuf>,

    /// Printer model
    #[arg(long, default_value = "d11", value_parser = parse_model)]
    model: PrinterConfig,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get printer information
    Info {
        /// Query every info key instead of SW/HW/S/N
        #[arg(long)]
        all: bool,
    },

    /// Get RFID information of the loaded labels
    Rfid,

    /// Send heartbeat
    Heartbeat,

    /// Print an image file
    Print {
        /// Image file (PNG, JPEG, ...)
        image: PathBuf,

        #[command(flatten)]
        job: JobArgs,

        /// Binarization method
        #[arg(long, value_enum, default_value_t = DitherArg::FloydSteinberg)]
        dither: DitherArg,

        /// Skip the image size check
        #[arg(long)]
        no_check: bool,
    },

    /// Render text and print it
    PrintLabel {
        /// Text to print, one line per \n
        text: String,

        #[command(flatten)]
        job: JobArgs,

        /// Label width in mm
        #[arg(short, long, default_value_t = 12.0)]
        width: f64,

        /// Label length in mm
        #[arg(short, long, default_value_t = 40.0)]
        length: f64,

        /// Skip the label size check
        #[arg(long)]
        no_check: bool,
    },
}

#[derive(clap::Args, Debug)]
struct JobArgs {
    /// Print density (1~3)
    #[arg(short, long, default_value_t = 2)]
    density: u8,

    /// Label type (1~3)
    #[arg(short = 't', long = "type", default_value_t = 1)]
    label_type: u8,

    /// Number of copies
    #[arg(short = 'n', long, default_value_t = 1)]
    quantity: u16,
}

impl JobArgs {
    fn options(&self) -> JobOptions {
        JobOptions {
            label_type: self.label_type,
            density: self.density,
            quantity: self.quantity,
            ..JobOptions::default()
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DitherArg {
    Threshold,
    Bayer,
    FloydSteinberg,
}

impl From<DitherArg> for Dithering {
    fn from(arg: DitherArg) -> Self {
        match arg {
            DitherArg::Threshold => Dithering::Threshold,
            DitherArg::Bayer => Dithering::Bayer,
            DitherArg::FloydSteinberg => Dithering::FloydSteinberg,
        }
    }
}

fn parse_model(s: &str) -> Result<PrinterConfig, String> {
    PrinterConfig::by_name(s).ok_or_else(|| {
        let known: Vec<&str> = PrinterConfig::ALL.iter().map(|c| c.name).collect();
        format!("unknown model '{}', expected one of {}", s, known.join(", "))
    })
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), NiimprintError> {
    // Fail on bad input before connecting
    let label = prepare_label(&cli)?;

    let transport = connect(&cli)?;
    let mut printer = Niimprinter::with_config(PrinterClient::new(transport), cli.model);

    if let Some((bitmap, no_check, options)) = label {
        if !no_check {
            printer.check_bitmap(&bitmap)?;
        }
        let report = printer.print_bitmap(&bitmap, options)?;
        info!(pages = report.pages, rows = report.rows, "printed");
        return print_json(&report);
    }

    match &cli.command {
        Commands::Info { all: false } => print_json(&printer.get_info()?),
        Commands::Info { all: true } => print_json(&printer.get_all_info()?),
        Commands::Rfid => print_json(&printer.get_rfid()?),
        Commands::Heartbeat => print_json(&printer.heartbeat()?),
        Commands::Print { .. } | Commands::PrintLabel { .. } => Ok(()),
    }
}

/// Bitmap, size-check flag and job options for the print commands.
fn prepare_label(cli: &Cli) -> Result<Option<(Bitmap, bool, JobOptions)>, NiimprintError> {
    let label = match &cli.command {
        Commands::Print {
            image,
            job,
            dither,
            no_check,
        } => (load_image(image, (*dither).into())?, *no_check, job.options()),
        Commands::PrintLabel {
            text: content,
            job,
            width,
            length,
            no_check,
        } => {
            let (width_px, length_px) = LabelSize::new(*width, *length).to_px(&cli.model);
            let bitmap = text::render_text(content, width_px, length_px)?;
            (bitmap, *no_check, job.options())
        }
        _ => return Ok(None),
    };

    // Catch bad settings before any bytes are sent
    label.2.validate()?;
    Ok(Some(label))
}

fn connect(cli: &Cli) -> Result<Box<dyn Transport>, NiimprintError> {
    if let Some(addr) = cli.address {
        return connect_rfcomm(addr);
    }

    let device = cli
        .device
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DEVICE));
    info!(device = %device.display(), "opening");
    Ok(Box::new(SerialTransport::open(&device)?))
}

#[cfg(target_os = "linux")]
fn connect_rfcomm(addr: BdAddr) -> Result<Box<dyn Transport>, NiimprintError> {
    use niimprint::transport::{RfcommSocket, rfcomm::DEFAULT_CHANNEL};
    Ok(Box::new(RfcommSocket::connect(addr, DEFAULT_CHANNEL)?))
}

#[cfg(not(target_os = "linux"))]
fn connect_rfcomm(addr: BdAddr) -> Result<Box<dyn Transport>, NiimprintError> {
    Err(NiimprintError::Transport(format!(
        "cannot connect to {}: RFCOMM sockets need Linux, bind a device and use --device",
        addr
    )))
}

fn load_image(path: &Path, dither: Dithering) -> Result<Bitmap, NiimprintError> {
    let image = image::open(path)
        .map_err(|e| NiimprintError::Image(format!("{}: {}", path.display(), e)))?;
    let bitmap = Bitmap::from_image(&image, dither);
    debug!(
        source_width = image.width(),
        source_height = image.height(),
        width = bitmap.width(),
        height = bitmap.height(),
        "loaded image"
    );
    Ok(bitmap)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), NiimprintError> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{}", json);
    Ok(())
}
