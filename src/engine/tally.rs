use std::collections::BTreeMap;

/// Encode counts per size and per codec. Posters are counted apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    sizes: BTreeMap<String, usize>,
    codecs: BTreeMap<String, usize>,
    posters: usize,
    total: usize,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a size show up with a count of 0 before anything is recorded for it
    pub fn register_size(&mut self, size: &str) {
        self.sizes.entry(size.to_string()).or_insert(0);
    }

    pub fn record_encode(&mut self, size: &str, codec: &str) {
        *self.sizes.entry(size.to_string()).or_insert(0) += 1;
        *self.codecs.entry(codec.to_string()).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn record_poster(&mut self) {
        self.posters += 1;
    }

    pub fn size_count(&self, size: &str) -> usize {
        self.sizes.get(size).copied().unwrap_or(0)
    }

    pub fn codec_count(&self, codec: &str) -> usize {
        self.codecs.get(codec).copied().unwrap_or(0)
    }

    pub fn sizes(&self) -> impl Iterator<Item = (&str, usize)> {
        self.sizes.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn codecs(&self) -> impl Iterator<Item = (&str, usize)> {
        self.codecs.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn posters(&self) -> usize {
        self.posters
    }

    /// Encodes only
    pub fn total(&self) -> usize {
        self.total
    }
}
