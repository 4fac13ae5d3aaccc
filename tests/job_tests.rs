//! # Print Job Tests
//!
//! Full print jobs against a simulated printer.

use std::time::Duration;

use niimprint::client::{CancelToken, ClientConfig, PrinterClient};
use niimprint::job::{self, JobOptions, JobReport, JobState, PrintJob};
use niimprint::protocol::Packet;
use niimprint::raster::Bitmap;
use niimprint::transport::MockTransport;
use niimprint::NiimprintError;
use pretty_assertions::assert_eq;

/// Reply type for each acknowledged request type.
fn ack(request: u8) -> Option<u8> {
    let reply = match request {
        0x23 => 0x33,
        0x21 => 0x31,
        0x01 => 0x02,
        0x20 => 0x30,
        0x03 => 0x04,
        0x13 => 0x14,
        0x15 => 0x16,
        0xE3 => 0xE4,
        0xF3 => 0xF4,
        _ => return None,
    };
    Some(reply)
}

fn ok(request: u8) -> Vec<Packet> {
    match ack(request) {
        Some(reply) => vec![Packet::new(reply, vec![0x01]).unwrap()],
        None => vec![],
    }
}

/// Acknowledges every command. Each status poll reports one more finished
/// page than the last, starting from zero, up to `pages`.
fn simulated_printer(pages: u16) -> MockTransport {
    let mut printed = 0u16;
    MockTransport::with_responder(move |req: &Packet| match req.packet_type() {
        0xA3 => {
            let [hi, lo] = printed.to_be_bytes();
            printed = (printed + 1).min(pages);
            vec![Packet::new(0xB3, vec![hi, lo, 0x64, 0x00]).unwrap()]
        }
        t => ok(t),
    })
}

fn client(mock: MockTransport) -> PrinterClient<MockTransport> {
    let config = ClientConfig {
        retry_interval: Duration::ZERO,
        ..ClientConfig::default()
    };
    PrinterClient::with_config(mock, config)
}

fn options(quantity: u16) -> JobOptions {
    JobOptions {
        quantity,
        poll_interval: Duration::ZERO,
        ..JobOptions::default()
    }
}

#[test]
fn test_job_command_sequence() {
    let bitmap = Bitmap::from_fn(96, 4, |x, y| x == y);
    let mut client = client(simulated_printer(2));

    let report = job::print_bitmap(&mut client, &bitmap, options(2)).unwrap();
    assert_eq!(
        report,
        JobReport {
            rows: 4,
            pages: 2,
            polls: 3
        }
    );

    let sent = client.transport().sent_packets();
    let types: Vec<u8> = sent.iter().map(Packet::packet_type).collect();
    assert_eq!(
        types,
        vec![
            0x23, 0x21, 0x01, 0x20, 0x03, 0x13, 0x15, // setup
            0x85, 0x85, 0x85, 0x85, // rows
            0xE3, // end page
            0xA3, 0xA3, 0xA3, // status: 0, 1, 2 pages
            0xF3,
        ]
    );

    // Settings and page geometry
    assert_eq!(sent[0].data(), &[1]);
    assert_eq!(sent[1].data(), &[2]);
    assert_eq!(sent[5].data(), &[0x00, 0x04, 0x00, 0x60]);
    assert_eq!(sent[6].data(), &[0x00, 0x02]);

    // Rows in order, each 6 header bytes + 12 packed bytes
    for (i, row) in sent[7..11].iter().enumerate() {
        assert_eq!(row.data().len(), 18);
        assert_eq!(&row.data()[..2], &(i as u16).to_be_bytes());
        assert_eq!(row.data()[5], 1);
    }
    // Row 0 has only pixel 0 set
    assert_eq!(&sent[7].data()[2..5], &[1, 0, 0]);
    assert_eq!(sent[7].data()[6], 0x80);
}

#[test]
fn test_job_uses_requested_settings() {
    let bitmap = Bitmap::new(96, 1);
    let mut client = client(simulated_printer(1));
    let opts = JobOptions {
        label_type: 3,
        density: 1,
        ..options(1)
    };

    job::print_bitmap(&mut client, &bitmap, opts).unwrap();
    let sent = client.transport().sent_packets();
    assert_eq!(sent[0].data(), &[3]);
    assert_eq!(sent[1].data(), &[1]);
}

#[test]
fn test_invalid_options_send_nothing() {
    let bitmap = Bitmap::new(96, 1);
    let mut client = client(simulated_printer(1));
    let opts = JobOptions {
        density: 5,
        ..options(1)
    };

    assert!(matches!(
        job::print_bitmap(&mut client, &bitmap, opts),
        Err(NiimprintError::Precondition(_))
    ));
    assert!(client.transport().sent_bytes().is_empty());
}

#[test]
fn test_printer_that_never_finishes() {
    let bitmap = Bitmap::new(96, 1);
    let mut client = client(simulated_printer(1));
    let opts = JobOptions {
        max_status_polls: 1,
        ..options(1)
    };
    let mut job = PrintJob::new(&bitmap, opts).unwrap();

    // The first poll reports zero pages and the bound is one poll
    let err = job.run(&mut client).unwrap_err();
    assert!(matches!(
        err,
        NiimprintError::JobIncomplete {
            printed: 0,
            requested: 1
        }
    ));
    assert_eq!(job.state(), JobState::PollingStatus);
}

#[test]
fn test_silent_status_counts_as_poll() {
    let bitmap = Bitmap::new(96, 1);
    // Never answers a status poll
    let mock = MockTransport::with_responder(|req: &Packet| ok(req.packet_type()));
    let mut client = client(mock);
    let opts = JobOptions {
        max_status_polls: 3,
        ..options(1)
    };

    let err = job::print_bitmap(&mut client, &bitmap, opts).unwrap_err();
    assert!(matches!(err, NiimprintError::JobIncomplete { printed: 0, .. }));
}

#[test]
fn test_cancel_during_polling() {
    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    let mock = MockTransport::with_responder(move |req: &Packet| match req.packet_type() {
        0xA3 => {
            trigger.cancel();
            vec![Packet::new(0xB3, vec![0, 0, 0, 0]).unwrap()]
        }
        t => ok(t),
    });
    let mut client = client(mock);
    client.set_cancel_token(cancel);

    let bitmap = Bitmap::new(96, 2);
    let err = job::print_bitmap(&mut client, &bitmap, options(1)).unwrap_err();
    assert!(matches!(err, NiimprintError::Cancelled));

    let polls = client
        .transport()
        .sent_packets()
        .iter()
        .filter(|p| p.packet_type() == 0xA3)
        .count();
    assert_eq!(polls, 1);
}
