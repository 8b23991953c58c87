/// Helper function to seed the food placer from JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    // Math.random only carries 52 bits, stitch two draws together
    let half = || (random() * f64::from(u32::MAX)) as u64;
    (half() << 32) | half()
}

/// Percent-encodes `value` the same way `encodeURIComponent` does.
pub(crate) fn encode_component(value: &str) -> String {
    js_sys::encode_uri_component(value).into()
}
