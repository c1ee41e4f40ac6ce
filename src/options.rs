/// Options for request-line decoders.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// The maximum number of bytes allowed for a start-line (including the trailing CRLF).
    pub max_start_line_size: usize,
}
impl DecodeOptions {
    /// The default value of `max_start_line_size` field.
    pub const DEFAULT_MAX_START_LINE_SIZE: usize = 0xFFFF;
}
impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            max_start_line_size: Self::DEFAULT_MAX_START_LINE_SIZE,
        }
    }
}
