use crate::models::{Algorithm, Digest};

/// Incremental hash state. Single use: fed in order, then finalized once.
pub trait Hasher: Send {
    fn update(&mut self, data: &[u8]);

    fn finalize(self: Box<Self>) -> Digest;
}

/// Adapter for every RustCrypto `Digest` implementation (SHA-1, SHA-2, SHA-3).
struct RustCrypto<D>(D);

impl<D> Hasher for RustCrypto<D>
where
    D: sha2::Digest + Send,
{
    fn update(&mut self, data: &[u8]) {
        sha2::Digest::update(&mut self.0, data);
    }

    fn finalize(self: Box<Self>) -> Digest {
        Digest::from(sha2::Digest::finalize(self.0).as_slice())
    }
}

struct Md5(md5::Context);

impl Hasher for Md5 {
    fn update(&mut self, data: &[u8]) {
        self.0.consume(data);
    }

    fn finalize(self: Box<Self>) -> Digest {
        Digest::from(&self.0.finalize().0[..])
    }
}

struct Blake3(blake3::Hasher);

impl Hasher for Blake3 {
    fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    fn finalize(self: Box<Self>) -> Digest {
        Digest::from(&self.0.finalize().as_bytes()[..])
    }
}

impl Algorithm {
    /// Fresh accumulator for one computation. Never share the result between tasks.
    pub fn hasher(&self) -> Box<dyn Hasher> {
        match self {
            Algorithm::Md5 => Box::new(Md5(md5::Context::new())),
            Algorithm::Sha1 => Box::new(RustCrypto(<sha1::Sha1 as sha2::Digest>::new())),
            Algorithm::Sha256 => Box::new(RustCrypto(<sha2::Sha256 as sha2::Digest>::new())),
            Algorithm::Sha512 => Box::new(RustCrypto(<sha2::Sha512 as sha2::Digest>::new())),
            Algorithm::Sha3_256 => Box::new(RustCrypto(<sha3::Sha3_256 as sha2::Digest>::new())),
            Algorithm::Blake3 => Box::new(Blake3(blake3::Hasher::new())),
        }
    }
}

/// Hash an in-memory buffer in one go.
pub fn hash_bytes(algorithm: Algorithm, data: &[u8]) -> Digest {
    let mut hasher = algorithm.hasher();
    hasher.update(data);
    hasher.finalize()
}
