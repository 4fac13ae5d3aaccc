//! # Model Identifiers
//!
//! `get_info(DEVICETYPE)` returns a numeric model id. Several ids can map to
//! the same model (hardware revisions). The table is informational: it is
//! only used to label `info` output, never to pick protocol behavior.
//!
//! The table is partial. It lists the common D and B series models; an id
//! missing here is reported without a `MODEL` entry.

/// `(model name, device type ids)`
pub const MODELS: &[(&str, &[u16])] = &[
    ("B3S", &[256, 257, 258]),
    ("D11", &[512]),
    ("D11S", &[514]),
    ("D11-H", &[528]),
    ("B21", &[768, 769, 770, 771]),
    ("B21S", &[777]),
    ("D110", &[2304, 2305]),
    ("D110-M", &[2320]),
    ("D101", &[2560]),
    ("B203", &[2816]),
    ("B18", &[3584]),
    ("B1", &[4096]),
    ("K3", &[4864]),
    ("B31", &[5632]),
];

/// Model name for a `DEVICETYPE` value.
pub fn model_name(device_type: u64) -> Option<&'static str> {
    let id = u16::try_from(device_type).ok()?;
    MODELS
        .iter()
        .find(|(_, ids)| ids.contains(&id))
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_known_ids() {
        assert_eq!(model_name(512), Some("D11"));
        assert_eq!(model_name(770), Some("B21"));
        assert_eq!(model_name(4096), Some("B1"));
    }

    #[test]
    fn test_unknown_ids() {
        assert_eq!(model_name(0), None);
        assert_eq!(model_name(u64::MAX), None);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut seen = HashSet::new();
        for (name, ids) in MODELS {
            for id in *ids {
                assert!(seen.insert(*id), "{} reuses id {}", name, id);
            }
        }
    }
}
