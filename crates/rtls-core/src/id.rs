use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for scene item IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Interned identifier for a tag, anchor, or other item in the scene.
///
/// Tags and anchors are addressed by their 64-bit device address; the
/// interned form is `tag:0x<hex>` / `anchor:0x<hex>` so the two never collide.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(Spur);

impl ItemId {
    /// Intern a string as an ItemId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        ItemId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    pub fn tag(address: u64) -> Self {
        Self::intern(&format!("tag:{}", hex_address(address)))
    }

    pub fn anchor(address: u64) -> Self {
        Self::intern(&format!("anchor:{}", hex_address(address)))
    }

    /// Device address encoded in a `tag:`/`anchor:` id, if any.
    pub fn address(&self) -> Option<u64> {
        let (_, hex) = self.as_str().split_once(":0x")?;
        u64::from_str_radix(hex, 16).ok()
    }
}

/// Hex form used in the tag table and the config file, e.g. `0x1a2b`.
pub fn hex_address(address: u64) -> String {
    format!("0x{address:x}")
}

/// Parse a device address written in hex, with or without a `0x` prefix.
pub fn parse_hex_address(text: &str) -> Result<u64, String> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u64::from_str_radix(digits, 16).map_err(|e| format!("bad address `{text}`: {e}"))
}

/// Label shown for a tag with no configured label.
pub fn default_tag_label(address: u64) -> String {
    format!("Tag {:04X}", address & 0xFFFF)
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ItemId::intern(&s))
    }
}
