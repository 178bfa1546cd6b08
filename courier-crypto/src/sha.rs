/// SHA-1 of one or more byte slices, hashed as a single concatenation.
///
/// ```rust
/// let digest = courier_crypto::sha1!(b"foo", b"bar");
/// assert_eq!(digest, courier_crypto::sha1!(b"foobar"));
/// ```
#[macro_export]
macro_rules! sha1 {
    ( $( $part:expr ),+ $(,)? ) => {{
        use ::sha1::{Digest, Sha1};
        let mut hasher = Sha1::new();
        $( hasher.update($part); )+
        <[u8; 20]>::from(hasher.finalize())
    }};
}

/// SHA-256 of one or more byte slices, hashed as a single concatenation.
#[macro_export]
macro_rules! sha256 {
    ( $( $part:expr ),+ $(,)? ) => {{
        use ::sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        $( hasher.update($part); )+
        <[u8; 32]>::from(hasher.finalize())
    }};
}
