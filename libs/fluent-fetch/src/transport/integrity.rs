//! Subresource integrity checks (`sha256-...`, `sha384-...`, `sha512-...`).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256, Sha384, Sha512};

/// Whether `body` satisfies the integrity `metadata`.
///
/// Metadata is a whitespace-separated list of `<alg>-<base64>[?options]`
/// entries; one matching entry is enough. Entries with unknown algorithms are
/// ignored, and metadata without any known entry accepts every body.
pub fn verify(metadata: &str, body: &[u8]) -> bool {
    let mut known = 0_usize;
    for entry in metadata.split_whitespace() {
        let entry = entry.split_once('?').map_or(entry, |(hash, _)| hash);
        let Some((alg, expected)) = entry.split_once('-') else {
            continue;
        };
        let actual = match alg.to_ascii_lowercase().as_str() {
            "sha256" => STANDARD.encode(Sha256::digest(body)),
            "sha384" => STANDARD.encode(Sha384::digest(body)),
            "sha512" => STANDARD.encode(Sha512::digest(body)),
            _ => continue,
        };
        known += 1;
        if actual == expected {
            return true;
        }
    }
    known == 0
}
