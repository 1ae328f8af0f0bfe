//! Rotating status captions for generating items.

/// Captions cycled while an item is generating, in display order.
pub const STATUS_CAPTIONS: &[&str] = &[
    "Recoding...",
    "Extracting likeness...",
    "Locating era...",
    "Developing film...",
    "Stabilizing timeline...",
];

/// Caption for the given tick count.
pub fn status_caption(tick: usize) -> &'static str {
    STATUS_CAPTIONS[tick % STATUS_CAPTIONS.len()]
}
