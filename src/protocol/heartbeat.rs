//! # Heartbeat Replies
//!
//! The heartbeat reply has no self-describing structure. Different firmware
//! generations send payloads of different lengths and the field positions
//! depend entirely on that length:
//!
//! | Length | closingstate | powerlevel | paperstate | rfidreadstate |
//! |--------|--------------|------------|------------|---------------|
//! | 9  | 8  | -  | -  | -  |
//! | 10 | 8  | 9  | -  | 8  |
//! | 13 | 9  | 10 | 11 | 12 |
//! | 19 | 15 | 16 | 17 | 18 |
//! | 20 | -  | -  | 18 | 19 |
//!
//! The 10-byte layout reads `rfidreadstate` from the same offset as
//! `closingstate`; printers using that layout report it that way.
//!
//! Any other length decodes to a record with every field absent.

use serde::Serialize;

/// Printer state reported by a heartbeat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Heartbeat {
    pub closingstate: Option<u8>,
    pub powerlevel: Option<u8>,
    pub paperstate: Option<u8>,
    pub rfidreadstate: Option<u8>,
}

/// Field offsets for one payload shape.
#[derive(Debug, Clone, Copy)]
struct Layout {
    len: usize,
    closingstate: Option<usize>,
    powerlevel: Option<usize>,
    paperstate: Option<usize>,
    rfidreadstate: Option<usize>,
}

const LAYOUTS: [Layout; 5] = [
    Layout {
        len: 9,
        closingstate: Some(8),
        powerlevel: None,
        paperstate: None,
        rfidreadstate: None,
    },
    Layout {
        len: 10,
        closingstate: Some(8),
        powerlevel: Some(9),
        paperstate: None,
        rfidreadstate: Some(8),
    },
    Layout {
        len: 13,
        closingstate: Some(9),
        powerlevel: Some(10),
        paperstate: Some(11),
        rfidreadstate: Some(12),
    },
    Layout {
        len: 19,
        closingstate: Some(15),
        powerlevel: Some(16),
        paperstate: Some(17),
        rfidreadstate: Some(18),
    },
    Layout {
        len: 20,
        closingstate: None,
        powerlevel: None,
        paperstate: Some(18),
        rfidreadstate: Some(19),
    },
];

/// Decode a heartbeat reply payload.
pub fn parse(data: &[u8]) -> Heartbeat {
    let Some(layout) = LAYOUTS.iter().find(|l| l.len == data.len()) else {
        return Heartbeat::default();
    };
    let at = |offset: Option<usize>| offset.and_then(|i| data.get(i).copied());

    Heartbeat {
        closingstate: at(layout.closingstate),
        powerlevel: at(layout.powerlevel),
        paperstate: at(layout.paperstate),
        rfidreadstate: at(layout.rfidreadstate),
    }
}

// ============================================================================
// TESTS
// ============================================================================
