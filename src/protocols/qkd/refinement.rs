//! Error correction and privacy amplification.
//!
//! Both stages are simplified. Correction is an identity step that assumes it always
//! succeeds below the QBER threshold; a real reconciliation scheme replaces `correct`.
//! Amplification keeps the first half of the key. Truncation does not remove an
//! eavesdropper's partial knowledge the way a universal hash would, so the output is
//! not a security guarantee.

/// Returns both keys untouched.
pub fn correct(sender_key: Vec<bool>, receiver_key: Vec<bool>) -> (Vec<bool>, Vec<bool>) {
    (sender_key, receiver_key)
}

/// Keeps the first `len / 2` bits (floor).
pub fn amplify(key: &[bool]) -> Vec<bool> {
    key[..key.len() / 2].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correction_changes_nothing() {
        let a = vec![true, false, true];
        let b = vec![true, true, true];
        assert_eq!(correct(a.clone(), b.clone()), (a, b));
    }

    #[test]
    fn amplify_halves_with_floor() {
        assert!(amplify(&[]).is_empty());
        assert!(amplify(&[true]).is_empty());
        assert_eq!(amplify(&[true, false]), vec![true]);
        assert_eq!(amplify(&[false, true, true, false, true]), vec![false, true]);
    }
}
