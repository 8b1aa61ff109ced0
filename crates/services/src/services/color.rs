use std::collections::HashMap;

/// Estimates a representative color for thumbnails and placeholders by
/// bucketing a sparse sample of pixels into coarse RGB cells.
#[derive(Clone)]
pub struct ColorService {
    sample_stride: u32,
    default_color: String,
}

impl ColorService {
    pub fn new(sample_stride: u32, default_color: String) -> Self {
        Self {
            sample_stride,
            default_color,
        }
    }

    /// Lowercase `#rrggbb` for the most common quantized color in the image.
    /// Never fails: undecodable input falls back to the configured default.
    pub fn dominant_hex(&self, bytes: &[u8]) -> String {
        match self.try_dominant(bytes) {
            Some(hex) => hex,
            None => {
                tracing::debug!("Could not sample dominant color, using default");
                self.default_color.clone()
            }
        }
    }

    fn try_dominant(&self, bytes: &[u8]) -> Option<String> {
        let img = image::load_from_memory(bytes).ok()?;
        let rgb = img.to_rgb8();
        let stride = self.sample_stride.max(1) as usize;

        let mut counts: HashMap<(u8, u8, u8), u64> = HashMap::new();
        // Insertion order decides ties, so the first bucket seen wins.
        let mut order: Vec<(u8, u8, u8)> = Vec::new();

        for (i, pixel) in rgb.pixels().enumerate() {
            if i % stride != 0 {
                continue;
            }
            let key = (
                quantize(pixel.0[0]),
                quantize(pixel.0[1]),
                quantize(pixel.0[2]),
            );
            match counts.get_mut(&key) {
                Some(count) => *count += 1,
                None => {
                    counts.insert(key, 1);
                    order.push(key);
                }
            }
        }

        let mut best: Option<((u8, u8, u8), u64)> = None;
        for key in order {
            let count = counts[&key];
            if best.map(|(_, c)| count > c).unwrap_or(true) {
                best = Some((key, count));
            }
        }

        best.map(|((r, g, b), _)| format!("#{r:02x}{g:02x}{b:02x}"))
    }
}

/// Collapses a channel into one of eight 32-wide cells.
fn quantize(channel: u8) -> u8 {
    (channel / 32) * 32
}
