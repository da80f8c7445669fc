use std::fmt::Display;

use blake3::Hash;

/// Content digest of an audio payload.
///
/// Stored next to every blob so a damaged record can be told apart from
/// a good one when it is read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PayloadDigest(pub Hash);

impl PayloadDigest {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(blake3::hash(bytes))
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex().to_string()
    }

    pub fn from_hex(hex: &str) -> anyhow::Result<Self> {
        Ok(Self(Hash::from_hex(hex)?))
    }
}

impl Display for PayloadDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() -> anyhow::Result<()> {
        let digest = PayloadDigest::from_bytes(b"some audio");
        assert_eq!(PayloadDigest::from_hex(&digest.to_hex())?, digest);
        assert_ne!(digest, PayloadDigest::from_bytes(b"other audio"));
        Ok(())
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert!(PayloadDigest::from_hex("not-a-digest").is_err());
    }
}
