//! # Print Job
//!
//! A print job drives one page through the printer in a fixed order:
//!
//! ```text
//! Idle
//!  → TypeSet          set_label_type(options.label_type)
//!  → DensitySet       set_label_density(options.density)
//!  → PrintStarted     start_print
//!  → ClearAllowed     allow_print_clear
//!  → PageStarted      start_page_print
//!  → DimensionSet     set_dimension(height, width)
//!  → QuantitySet      set_quantity(options.quantity)
//!  → Streaming        one print_row packet per bitmap row, no replies
//!  → PageEnded        end_page_print
//!  → PollingStatus    get_print_status until page == quantity
//!  → PrintEnded       end_print
//! ```
//!
//! Any error aborts the job where it stands. Nothing is rolled back: a job
//! that failed after `start_print` leaves the printer mid-job, and the
//! caller decides whether to send `end_print` or start over.
//!
//! A `false` success flag from the printer is logged and the job carries
//! on; printers report it for settings they silently clamp.
//!
//! ## Completion
//!
//! Status polling is bounded by [`JobOptions::max_status_polls`]. Running
//! out of polls fails with [`NiimprintError::JobIncomplete`] and
//! `end_print` is not sent. A poll that gets no reply counts against the
//! bound.
//!
//! ## Usage Example
//!
//! ```no_run
//! use niimprint::client::PrinterClient;
//! use niimprint::job::{JobOptions, PrintJob};
//! use niimprint::raster::Bitmap;
//! use niimprint::transport::SerialTransport;
//!
//! let transport = SerialTransport::open("/dev/rfcomm0")?;
//! let mut client = PrinterClient::new(transport);
//!
//! let label = Bitmap::from_fn(96, 320, |x, y| (x / 8 + y / 8) % 2 == 0);
//! let report = PrintJob::new(&label, JobOptions::default())?.run(&mut client)?;
//! println!("printed {} page(s)", report.pages);
//! # Ok::<(), niimprint::NiimprintError>(())
//! ```

use std::fmt;
use std::thread;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::client::PrinterClient;
use crate::client::operations::SETTING_RANGE;
use crate::error::{NiimprintError, Result};
use crate::raster::MonoBitmap;
use crate::raster::encoder;
use crate::transport::Transport;

/// Pause between `get_print_status` polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Status polls before giving up; about a minute at the default interval.
pub const DEFAULT_MAX_STATUS_POLLS: u32 = 600;

/// Settings for one print job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobOptions {
    /// Label type, 1..=3
    pub label_type: u8,
    /// Print density, 1..=3
    pub density: u8,
    /// Copies of the page
    pub quantity: u16,
    pub poll_interval: Duration,
    pub max_status_polls: u32,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            label_type: 1,
            density: 2,
            quantity: 1,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_status_polls: DEFAULT_MAX_STATUS_POLLS,
        }
    }
}

impl JobOptions {
    /// Reject settings the printer would refuse, before anything is sent.
    pub fn validate(&self) -> Result<()> {
        if !SETTING_RANGE.contains(&self.label_type) {
            return Err(NiimprintError::Precondition(format!(
                "label type must be between 1 and 3, got {}",
                self.label_type
            )));
        }
        if !SETTING_RANGE.contains(&self.density) {
            return Err(NiimprintError::Precondition(format!(
                "density must be between 1 and 3, got {}",
                self.density
            )));
        }
        if self.quantity == 0 {
            return Err(NiimprintError::Precondition(
                "quantity must be at least 1".to_string(),
            ));
        }
        if self.max_status_polls == 0 {
            return Err(NiimprintError::Precondition(
                "max_status_polls must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where a job is in its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Idle,
    TypeSet,
    DensitySet,
    PrintStarted,
    ClearAllowed,
    PageStarted,
    DimensionSet,
    QuantitySet,
    Streaming,
    PageEnded,
    PollingStatus,
    PrintEnded,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Idle => "idle",
            JobState::TypeSet => "type set",
            JobState::DensitySet => "density set",
            JobState::PrintStarted => "print started",
            JobState::ClearAllowed => "clear allowed",
            JobState::PageStarted => "page started",
            JobState::DimensionSet => "dimension set",
            JobState::QuantitySet => "quantity set",
            JobState::Streaming => "streaming",
            JobState::PageEnded => "page ended",
            JobState::PollingStatus => "polling status",
            JobState::PrintEnded => "print ended",
        };
        f.write_str(name)
    }
}

/// Outcome of a finished job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JobReport {
    /// Rows streamed
    pub rows: usize,
    /// Pages the printer reported as printed
    pub pages: u16,
    /// Status polls made
    pub polls: u32,
}

/// One page, ready to print.
pub struct PrintJob<'a, B: ?Sized> {
    bitmap: &'a B,
    options: JobOptions,
    state: JobState,
}

impl<'a, B: MonoBitmap + ?Sized> PrintJob<'a, B> {
    /// Check `options` and the bitmap size without touching the printer.
    pub fn new(bitmap: &'a B, options: JobOptions) -> Result<Self> {
        options.validate()?;

        if bitmap.width() == 0 || bitmap.height() == 0 {
            return Err(NiimprintError::Precondition(format!(
                "cannot print an empty {}x{} bitmap",
                bitmap.width(),
                bitmap.height()
            )));
        }
        if bitmap.height() > u16::MAX as usize {
            return Err(NiimprintError::Precondition(format!(
                "bitmap height {} exceeds {} rows",
                bitmap.height(),
                u16::MAX
            )));
        }
        // Fails on rows too wide for one packet
        encoder::rows(bitmap)?;

        Ok(Self {
            bitmap,
            options,
            state: JobState::Idle,
        })
    }

    pub fn options(&self) -> &JobOptions {
        &self.options
    }

    /// Last state reached. After a failed [`run`](Self::run) this is the
    /// last step that succeeded.
    pub fn state(&self) -> JobState {
        self.state
    }

    /// Print the page on `client`.
    pub fn run<T: Transport>(&mut self, client: &mut PrinterClient<T>) -> Result<JobReport> {
        if self.state != JobState::Idle {
            return Err(NiimprintError::Precondition(format!(
                "job already ran (state: {})",
                self.state
            )));
        }

        let opts = self.options;
        // Both checked in new()
        let height = self.bitmap.height() as u16;
        let width = self.bitmap.width() as u16;
        info!(width, height, quantity = opts.quantity, "starting print job");

        client.set_label_type(opts.label_type)?;
        self.advance(JobState::TypeSet);
        client.set_label_density(opts.density)?;
        self.advance(JobState::DensitySet);
        client.start_print()?;
        self.advance(JobState::PrintStarted);
        client.allow_print_clear()?;
        self.advance(JobState::ClearAllowed);
        client.start_page_print()?;
        self.advance(JobState::PageStarted);
        client.set_dimension(height, width)?;
        self.advance(JobState::DimensionSet);
        client.set_quantity(opts.quantity)?;
        self.advance(JobState::QuantitySet);

        self.advance(JobState::Streaming);
        let mut rows = 0;
        for packet in encoder::rows(self.bitmap)? {
            client.send(&packet)?;
            rows += 1;
        }
        debug!(rows, "rows sent");

        client.end_page_print()?;
        self.advance(JobState::PageEnded);

        self.advance(JobState::PollingStatus);
        let (pages, polls) = self.wait_for_pages(client)?;

        client.end_print()?;
        self.advance(JobState::PrintEnded);

        Ok(JobReport { rows, pages, polls })
    }

    fn advance(&mut self, state: JobState) {
        info!(from = %self.state, to = %state, "print job");
        self.state = state;
    }

    /// Poll until the printer reports `quantity` pages, returning the page
    /// count and the number of polls made.
    fn wait_for_pages<T: Transport>(&self, client: &mut PrinterClient<T>) -> Result<(u16, u32)> {
        let opts = &self.options;
        let mut printed = 0;

        for poll in 1..=opts.max_status_polls {
            if poll > 1 {
                client.cancel_token().check()?;
            }

            match client.get_print_status()? {
                Some(status) => {
                    debug!(?status, poll, "print status");
                    printed = status.page;
                    if status.page == opts.quantity {
                        return Ok((status.page, poll));
                    }
                }
                None => debug!(poll, "no print status reply"),
            }

            if poll < opts.max_status_polls && !opts.poll_interval.is_zero() {
                thread::sleep(opts.poll_interval);
            }
        }

        Err(NiimprintError::JobIncomplete {
            printed,
            requested: opts.quantity,
        })
    }
}

/// Validate and run a job in one call.
pub fn print_bitmap<T, B>(
    client: &mut PrinterClient<T>,
    bitmap: &B,
    options: JobOptions,
) -> Result<JobReport>
where
    T: Transport,
    B: MonoBitmap + ?Sized,
{
    PrintJob::new(bitmap, options)?.run(client)
}

// ============================================================================
// TESTS
// ============================================================================
