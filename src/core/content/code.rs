//! Generation code allocation
//!
//! Produces short, human-typable generation codes. The allocator itself
//! carries no uniqueness guarantee; the caller checks the store and retries
//! (see `GenerationManager::create_active_generation`).

use crate::domain::ids::{GenerationCode, CODE_ALPHABET, CODE_LENGTH};
use rand::rngs::OsRng;
use rand::RngCore;

/// Allocate a fresh 10-character generation code
///
/// One CSPRNG byte per character, reduced modulo the alphabet length. The
/// alphabet has 32 characters, so the reduction is bias-free.
pub fn allocate_code() -> GenerationCode {
    let mut bytes = [0u8; CODE_LENGTH];
    OsRng.fill_bytes(&mut bytes);

    let code: String = bytes
        .iter()
        .map(|b| CODE_ALPHABET[*b as usize % CODE_ALPHABET.len()] as char)
        .collect();

    GenerationCode::new(code).expect("allocated code is always well-formed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocated_code_is_valid() {
        let code = allocate_code();
        assert_eq!(code.as_str().len(), CODE_LENGTH);
        assert!(code
            .as_str()
            .bytes()
            .all(|b| CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_allocated_codes_vary() {
        // 32^10 possible codes; two equal draws in a row mean the RNG is
        // not being consulted.
        let a = allocate_code();
        let b = allocate_code();
        assert_ne!(a, b);
    }

    #[test]
    fn test_no_confusable_characters() {
        for _ in 0..20 {
            let code = allocate_code();
            for c in ['0', '1', 'I', 'O'] {
                assert!(!code.as_str().contains(c));
            }
        }
    }
}
