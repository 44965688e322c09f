// encodings/mod.rs - Character decoding over raw byte buffers.
// Only UTF-8 is supported; invalid bytes step as single characters.

pub mod utf8;
