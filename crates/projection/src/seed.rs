/// Sums the UTF-16 code units of `topic`.
///
/// The caller is responsible for trimming; case and inner whitespace change
/// the seed. An empty topic yields `0`.
pub fn derive_seed(topic: &str) -> u64 {
    topic.encode_utf16().map(u64::from).sum()
}
