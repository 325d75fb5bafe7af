//! Recognition of the 16-byte "magic preamble" and its selector word.
//!
//! The preamble is a fixed 4-instruction sequence that would otherwise
//! decode as four real (but useless) `or`-style instructions. The entry
//! point checks for it *before* running the ordinary dispatcher, because the
//! host-request pseudo-instructions it introduces have no ordinary encoding
//! of their own.

/// The literal 4-word preamble, as little-endian 32-bit words.
pub const PREAMBLE_WORDS: [u32; 4] = [0x0045_0c00, 0x0045_3400, 0x0045_7400, 0x0045_4c00];

/// One of the four pseudo-instructions a recognized preamble's selector word
/// can choose.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostRequest {
    /// Selector `0x001535ad`.
    ClientRequest,
    /// Selector `0x001539ce`.
    QueryNominalReturnAddr,
    /// Selector `0x00153def`.
    CallNoRedir,
    /// Selector `0x00154210`.
    IrInjection,
}

impl HostRequest {
    /// Maps a selector word to the request it names, or `None` if the word
    /// following a recognized preamble is not one of the four valid
    /// selectors (a hard decode error per the format description).
    pub const fn from_selector(word: u32) -> Option<Self> {
        match word {
            0x0015_35ad => Some(Self::ClientRequest),
            0x0015_39ce => Some(Self::QueryNominalReturnAddr),
            0x0015_3def => Some(Self::CallNoRedir),
            0x0015_4210 => Some(Self::IrInjection),
            _ => None,
        }
    }
}

/// True iff `words` begins with the literal 4-word preamble.
pub fn matches_preamble(words: &[u32]) -> bool {
    words.len() >= PREAMBLE_WORDS.len() && words[..PREAMBLE_WORDS.len()] == PREAMBLE_WORDS
}

/// The whole pseudo-instruction recognized at a preamble site: its selector
/// word decoded into a [`HostRequest`], plus the fixed 20-byte length of
/// preamble + selector that every variant shares.
pub const PSEUDO_INSTRUCTION_LENGTH: u32 = 20;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_literal_preamble() {
        let mut stream = PREAMBLE_WORDS.to_vec();
        stream.push(0x0015_35ad);
        assert!(matches_preamble(&stream));
    }

    #[test]
    fn rejects_non_preamble() {
        assert!(!matches_preamble(&[0, 0, 0, 0]));
        assert!(!matches_preamble(&PREAMBLE_WORDS[..3]));
    }

    #[test]
    fn maps_all_four_selectors() {
        assert_eq!(
            HostRequest::from_selector(0x0015_35ad),
            Some(HostRequest::ClientRequest)
        );
        assert_eq!(
            HostRequest::from_selector(0x0015_39ce),
            Some(HostRequest::QueryNominalReturnAddr)
        );
        assert_eq!(
            HostRequest::from_selector(0x0015_3def),
            Some(HostRequest::CallNoRedir)
        );
        assert_eq!(
            HostRequest::from_selector(0x0015_4210),
            Some(HostRequest::IrInjection)
        );
        assert_eq!(HostRequest::from_selector(0xdead_beef), None);
    }
}
