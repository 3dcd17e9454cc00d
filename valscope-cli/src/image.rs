//! JSON memory images.
//!
//! ```json
//! {
//!   "byte_order": "little",
//!   "regions": [
//!     { "base": 4096, "bytes": "68656c6c6f00", "label": ".rodata", "readable": true }
//!   ]
//! }
//! ```

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use valscope::{ByteOrder, MemoryImage, MemoryProtection, MemoryRegion};

#[derive(Debug, Deserialize)]
struct ImageFile {
    #[serde(default)]
    byte_order: Option<String>,
    regions: Vec<RegionSpec>,
}

#[derive(Debug, Deserialize)]
struct RegionSpec {
    base: u64,
    bytes: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default = "default_readable")]
    readable: bool,
}

fn default_readable() -> bool {
    true
}

/// A memory image together with the byte order of the target it was taken from.
pub struct LoadedImage {
    pub memory: MemoryImage,
    pub byte_order: ByteOrder,
}

/// Load a memory image from a JSON file.
pub fn load_image(path: &Path) -> anyhow::Result<LoadedImage> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read image: {}", path.display()))?;
    parse_image(&text).with_context(|| format!("failed to load image: {}", path.display()))
}

fn parse_image(text: &str) -> anyhow::Result<LoadedImage> {
    let file: ImageFile = serde_json::from_str(text)?;

    let byte_order = match file.byte_order.as_deref() {
        None => ByteOrder::host(),
        Some(name) => name
            .parse::<ByteOrder>()
            .map_err(|_| anyhow::anyhow!("unknown byte order '{name}' (expected: little, big)"))?,
    };

    let mut memory = MemoryImage::new();
    for (index, region) in file.regions.into_iter().enumerate() {
        let data = decode_hex(&region.bytes)
            .with_context(|| format!("region {index} at 0x{:x}", region.base))?;
        let protection = if region.readable {
            MemoryProtection::READ_WRITE
        } else {
            MemoryProtection::WRITE
        };
        let label = region.label.unwrap_or_else(|| format!("region{index}"));
        memory.map_region(MemoryRegion::new(region.base, data, protection, label))?;
    }

    Ok(LoadedImage { memory, byte_order })
}

fn decode_hex(text: &str) -> anyhow::Result<Vec<u8>> {
    let digits: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    hex::decode(&digits).with_context(|| format!("invalid hex bytes '{digits}'"))
}
