use tagwire_types::serde::ByteOrder;

pub const DEFAULT_BUFFER_SIZE: usize = 16 * 1024;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct CodecConfig {
    pub byte_order: ByteOrder,
    /// Capacity of the buffer [`crate::Codec::serialize`] allocates.
    pub default_buffer_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::LittleEndian,
            default_buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl CodecConfig {
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }
    pub fn with_default_buffer_size(mut self, size: usize) -> Self {
        self.default_buffer_size = size;
        self
    }
}
