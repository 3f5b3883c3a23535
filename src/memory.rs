use std::io;
use std::io::Read;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// how much RAM we have
pub const RAM_SIZE_BYTES: usize = 4096;

/// bytes per font glyph; glyphs are 4 pixels wide so only the high nibble is used
pub const GLYPH_BYTES: u16 = 5;

/// Represents the machine's address space. Every access goes through here, so
/// nothing outside this module indexes raw memory.
///
/// Single-byte accesses wrap modulo the RAM size. Slice accesses are clamped
/// to the end of RAM, so a request that runs off the end comes back short.
pub trait MemoryMap {
    /// write unknown len of data into memory at a particular address; returns
    /// how many bytes landed. if the reader fails part way through, whatever
    /// was read before the failure is still written
    fn write_any(&mut self, reader: &mut impl io::Read, addr: u16) -> Result<usize, io::Error> {
        let mut buf = Vec::new();
        let res = reader.read_to_end(&mut buf);
        let written = self.write(buf.as_slice(), addr);
        if written < buf.len() {
            log::warn!(
                "program truncated: {} of {} bytes fit at {:#05x}",
                written,
                buf.len(),
                addr
            );
        }
        res?;
        Ok(written)
    }

    /// write a chunk of bytes into RAM, truncated at the end of memory
    fn write(&mut self, data: &[u8], addr: u16) -> usize {
        let bytes = self.get_rw_slice(addr, data.len());
        let mut d: &[u8] = data;
        // reading from a slice into a slice can't fail
        d.read(bytes).unwrap_or(0)
    }

    fn read_byte(&self, addr: u16) -> u8;

    fn write_byte(&mut self, addr: u16, value: u8);

    /// get a big-endian two-byte word, e.g. an opcode
    fn get_word(&self, addr: u16) -> u16 {
        ((self.read_byte(addr) as u16) << 8) | (self.read_byte(addr.wrapping_add(1)) as u16)
    }

    /// get a r/w slice of the underlying memory
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> &mut [u8];

    /// get a r/o slice of the underlying memory
    fn get_ro_slice(&self, addr: u16, len: usize) -> &[u8];
}

/// 4K of RAM with the hex font baked in below the program area
///
///   0x0000-0x01ff  interpreter (font lives here)
///   0x0200-0x0fff  program
pub struct Memory {
    bytes: Box<[u8]>,
    font_addr: u16,
}

fn span(addr: u16, len: usize) -> (usize, usize) {
    let start = (addr as usize).min(RAM_SIZE_BYTES);
    let end = start.saturating_add(len).min(RAM_SIZE_BYTES);
    (start, end)
}

impl MemoryMap for Memory {
    fn read_byte(&self, addr: u16) -> u8 {
        self.bytes[addr as usize % RAM_SIZE_BYTES]
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        self.bytes[addr as usize % RAM_SIZE_BYTES] = value;
    }

    fn get_rw_slice(&mut self, addr: u16, len: usize) -> &mut [u8] {
        let (start, end) = span(addr, len);
        &mut self.bytes[start..end]
    }

    fn get_ro_slice(&self, addr: u16, len: usize) -> &[u8] {
        let (start, end) = span(addr, len);
        &self.bytes[start..end]
    }
}

impl Memory {
    /// zeroed RAM with the font copied to `font_addr`
    pub fn new(font_addr: u16) -> Self {
        let mut mm = Memory {
            bytes: vec![0u8; RAM_SIZE_BYTES].into_boxed_slice(),
            font_addr,
        };
        mm.write(&FONT, font_addr);
        mm
    }

    /// address of the glyph for the low nibble of `digit`
    pub fn glyph_addr(&self, digit: u8) -> u16 {
        self.font_addr
            .wrapping_add((digit & 0x0f) as u16 * GLYPH_BYTES)
    }

    pub fn font_addr(&self) -> u16 {
        self.font_addr
    }

    /// load a raw program image at `addr`
    pub fn load_program(&mut self, reader: &mut impl io::Read, addr: u16) -> Result<usize, io::Error> {
        self.write_any(reader, addr)
    }

    /// load pre-assembled instruction words at `addr`, big-endian
    pub fn load_words(&mut self, words: &[u16], addr: u16) -> usize {
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_be_bytes()).collect();
        let written = self.write(&bytes, addr);
        if written < bytes.len() {
            log::warn!(
                "program truncated: {} of {} bytes fit at {:#05x}",
                written,
                bytes.len(),
                addr
            );
        }
        written
    }
}

pub const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_FONT_ADDR;

    /// a reader that hands out some bytes, then fails
    struct Flaky(Vec<u8>);

    impl io::Read for Flaky {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() {
                return Err(io::Error::new(io::ErrorKind::Other, "gone"));
            }
            let n = self.0.len().min(buf.len());
            buf[..n].copy_from_slice(&self.0[..n]);
            self.0.drain(..n);
            Ok(n)
        }
    }

    #[test]
    fn test_memory_zeroed() {
        let m = Memory::new(DEFAULT_FONT_ADDR);
        // NB. memory is zeroed from 0x200 because before that we bake in the font
        assert_eq!(m.bytes[0x200..], [0; 0xe00]);
    }

    #[test]
    fn test_font_in_place() {
        let m = Memory::new(DEFAULT_FONT_ADDR);
        assert_eq!(m.get_ro_slice(0x050, 80), &FONT[..]);
        assert_eq!(m.get_ro_slice(0x000, 0x50), &[0; 0x50][..]);
    }

    #[test]
    fn test_glyph_addr() {
        let m = Memory::new(DEFAULT_FONT_ADDR);
        assert_eq!(m.glyph_addr(0x0), 0x050);
        assert_eq!(m.glyph_addr(0xA), 0x050 + 50);
        // only the low nibble picks a glyph
        assert_eq!(m.glyph_addr(0x1F), m.glyph_addr(0xF));
        assert_eq!(m.get_ro_slice(m.glyph_addr(1), 5), &[0x20, 0x60, 0x20, 0x20, 0x70]);
    }

    #[test]
    fn test_write_any_data_ok() -> Result<(), io::Error> {
        let mut dst = Memory::new(0x000);
        let mut src: &[u8] = &[0, 1, 2, 3, 4, 5, 6, 7];
        assert_eq!(dst.write_any(&mut src, 0x300)?, 8);
        assert_eq!(dst.get_ro_slice(0x2fc, 12), &[0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7]);
        Ok(())
    }

    #[test]
    fn test_write_truncates_at_end() {
        let mut dst = Memory::new(DEFAULT_FONT_ADDR);
        let src: &[u8] = &[9; 8];
        assert_eq!(dst.write(src, 4092), 4);
        assert_eq!(dst.get_ro_slice(4092, 8), &[9, 9, 9, 9]);
        // nothing wrapped round to the bottom
        assert_eq!(dst.read_byte(0), 0);
    }

    #[test]
    fn test_slices_clamped() {
        let mut m = Memory::new(DEFAULT_FONT_ADDR);
        assert_eq!(m.get_ro_slice(4095, 10).len(), 1);
        assert!(m.get_ro_slice(0xffff, 10).is_empty());
        assert!(m.get_rw_slice(5000, 1).is_empty());
    }

    #[test]
    fn test_byte_access_wraps() {
        let mut m = Memory::new(DEFAULT_FONT_ADDR);
        m.write_byte(0x1000 + 0x300, 0xAB);
        assert_eq!(m.read_byte(0x300), 0xAB);
    }

    #[test]
    fn test_read_word() {
        let mut m = Memory::new(DEFAULT_FONT_ADDR);
        m.write(&[0x12, 0x34, 0x56], 0x400);
        assert_eq!(m.get_word(0x400), 0x1234);
        assert_eq!(m.get_word(0x401), 0x3456);
    }

    #[test]
    fn test_program_load_ok() -> Result<(), io::Error> {
        let mut dst = Memory::new(DEFAULT_FONT_ADDR);
        let mut prog: &[u8] = &[0x00, 0xe0]; // clear screen
        dst.load_program(&mut prog, 0x200)?;
        assert_eq!(dst.get_ro_slice(0x200, 2), &[0x00, 0xe0]);
        Ok(())
    }

    #[test]
    fn test_load_words_big_endian() {
        let mut m = Memory::new(DEFAULT_FONT_ADDR);
        assert_eq!(m.load_words(&[0x6011, 0x6112], 0x200), 4);
        assert_eq!(m.get_ro_slice(0x200, 4), &[0x60, 0x11, 0x61, 0x12]);
    }

    #[test]
    fn test_failed_load_keeps_partial_bytes() {
        let mut m = Memory::new(DEFAULT_FONT_ADDR);
        let mut src = Flaky(vec![0xAA, 0xBB]);
        assert!(m.load_program(&mut src, 0x200).is_err());
        assert_eq!(m.get_ro_slice(0x200, 2), &[0xAA, 0xBB]);
    }
}
