//! # Niimprinter
//!
//! High-level handle used by the CLI. Wraps a [`PrinterClient`] together
//! with the printer's hardware configuration and returns serializable
//! records.
//!
//! ```no_run
//! use niimprint::Niimprinter;
//!
//! let mut printer = Niimprinter::open("/dev/rfcomm0")?;
//! let info = printer.get_info()?;
//! println!("{}", serde_json::to_string(&info).unwrap());
//! # Ok::<(), niimprint::NiimprintError>(())
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::client::{ClientConfig, PrinterClient};
use crate::error::{NiimprintError, Result};
use crate::job::{self, JobOptions, JobReport};
use crate::printer::{PrinterConfig, models};
use crate::protocol::{Heartbeat, InfoKey, InfoValue, RfidRecord};
use crate::raster::MonoBitmap;
use crate::transport::{SerialTransport, Transport};

/// Firmware, hardware and serial number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceInfo {
    #[serde(rename = "SW")]
    pub software: Option<InfoValue>,
    #[serde(rename = "HW")]
    pub hardware: Option<InfoValue>,
    #[serde(rename = "S/N")]
    pub serial: Option<InfoValue>,
}

/// A connected printer.
pub struct Niimprinter<T> {
    client: PrinterClient<T>,
    config: PrinterConfig,
}

impl Niimprinter<SerialTransport> {
    /// Open a pre-bound RFCOMM TTY such as `/dev/rfcomm0`.
    pub fn open<P: AsRef<Path>>(device: P) -> Result<Self> {
        Ok(Self::new(SerialTransport::open(device)?))
    }
}

#[cfg(target_os = "linux")]
impl Niimprinter<crate::transport::RfcommSocket> {
    /// Connect to `addr` on RFCOMM channel 1.
    pub fn connect(addr: crate::transport::BdAddr) -> Result<Self> {
        let socket =
            crate::transport::RfcommSocket::connect(addr, crate::transport::rfcomm::DEFAULT_CHANNEL)?;
        Ok(Self::new(socket))
    }
}

impl<T: Transport> Niimprinter<T> {
    /// Wrap a connected transport; assumes a D11.
    pub fn new(transport: T) -> Self {
        Self::with_config(PrinterClient::new(transport), PrinterConfig::default())
    }

    pub fn with_config(client: PrinterClient<T>, config: PrinterConfig) -> Self {
        Self { client, config }
    }

    /// Build from a transport with a custom retry policy.
    pub fn with_client_config(transport: T, client: ClientConfig, config: PrinterConfig) -> Self {
        Self::with_config(PrinterClient::with_config(transport, client), config)
    }

    pub fn printer_config(&self) -> &PrinterConfig {
        &self.config
    }

    pub fn client(&self) -> &PrinterClient<T> {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut PrinterClient<T> {
        &mut self.client
    }

    pub fn get_info(&mut self) -> Result<DeviceInfo> {
        Ok(DeviceInfo {
            software: self.client.get_info(InfoKey::SoftVersion)?,
            hardware: self.client.get_info(InfoKey::HardVersion)?,
            serial: self.client.get_info(InfoKey::DeviceSerial)?,
        })
    }

    /// Every info key the printer answers, by protocol name, plus `MODEL`
    /// when the device type is a known model.
    pub fn get_all_info(&mut self) -> Result<BTreeMap<String, InfoValue>> {
        let mut out = BTreeMap::new();
        for (key, value) in self.client.get_all_info()? {
            let Some(value) = value else { continue };
            if key == InfoKey::DeviceType {
                if let Some(model) = value.as_integer().and_then(models::model_name) {
                    out.insert("MODEL".to_string(), InfoValue::Text(model.to_string()));
                }
            }
            out.insert(key.name().to_string(), value);
        }
        Ok(out)
    }

    pub fn get_rfid(&mut self) -> Result<Option<RfidRecord>> {
        self.client.get_rfid()
    }

    pub fn heartbeat(&mut self) -> Result<Heartbeat> {
        self.client.heartbeat()
    }

    /// Check that `bitmap` is exactly one printhead wide and not longer
    /// than the printer accepts.
    pub fn check_bitmap<B: MonoBitmap + ?Sized>(&self, bitmap: &B) -> Result<()> {
        if bitmap.width() != self.config.printhead_px {
            return Err(NiimprintError::Precondition(format!(
                "image is {} px wide, {} prints exactly {} px",
                bitmap.width(),
                self.config.name,
                self.config.printhead_px
            )));
        }
        if bitmap.height() > self.config.max_rows {
            return Err(NiimprintError::Precondition(format!(
                "image is {} px long, {} prints at most {} px",
                bitmap.height(),
                self.config.name,
                self.config.max_rows
            )));
        }
        Ok(())
    }

    /// Print `bitmap` as one page, `options.quantity` times.
    pub fn print_bitmap<B: MonoBitmap + ?Sized>(
        &mut self,
        bitmap: &B,
        options: JobOptions,
    ) -> Result<JobReport> {
        info!(
            printer = self.config.name,
            width = bitmap.width(),
            height = bitmap.height(),
            "printing"
        );
        job::print_bitmap(&mut self.client, bitmap, options)
    }
}
