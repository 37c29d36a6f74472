use digest::Digest;

pub trait Hasher: Send {
    fn update(&mut self, data: &[u8]);
    fn finalize(self) -> Vec<u8>;
}

/// Adapter from any `digest::Digest` to [`Hasher`].
pub struct DigestHasher<D: Digest + Send>(D);

impl<D: Digest + Send> DigestHasher<D> {
    pub fn new() -> Self { Self(D::new()) }

    pub fn digest(data: &[u8]) -> Vec<u8> { D::digest(data).to_vec() }
}

impl<D: Digest + Send> Default for DigestHasher<D> {
    fn default() -> Self { Self::new() }
}

impl<D: Digest + Send> Hasher for DigestHasher<D> {
    fn update(&mut self, data: &[u8]) { Digest::update(&mut self.0, data); }
    fn finalize(self) -> Vec<u8> { self.0.finalize().to_vec() }
}

pub type Sha256Hasher = DigestHasher<sha2::Sha256>;
pub type Sha512Hasher = DigestHasher<sha2::Sha512>;
