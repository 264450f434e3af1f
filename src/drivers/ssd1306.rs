// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Solomon SSD1306 128x64 monochrome OLED over I²C, used as a 21x8 character terminal.
//!
//! Text is rendered with a 5x7 font into a local frame buffer, one 8-pixel page per text row,
//! and the whole buffer is pushed to the panel on [`flush`](Terminal::flush).
//!
//! Wiring:
//! - SCL/SDA to the board's I²C2 pins
//! - SA0 low (address 0x3C)
//!
//! A panel that does not acknowledge its address fails [`Ssd1306::init`], which is how startup
//! tells that the display is missing.

use core::fmt::{self, Write};

use embedded_hal::i2c::I2c;
use log::warn;
use thiserror::Error;

use crate::drivers::console::Terminal;

/// I²C address with SA0 tied low.
pub const DEFAULT_ADDRESS: u8 = 0x3C;

pub const WIDTH_PX: usize = 128;
pub const PAGES: usize = 8;

/// Glyph width plus one blank column.
const CELL_WIDTH: usize = 6;

// Control bytes
const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

// Commands
const CMD_DISPLAY_OFF: u8 = 0xAE;
const CMD_DISPLAY_ON: u8 = 0xAF;
const CMD_SET_COLUMN_RANGE: u8 = 0x21;
const CMD_SET_PAGE_RANGE: u8 = 0x22;

/// Power-up sequence for a 128x64 panel on the internal charge pump, horizontal addressing.
#[rustfmt::skip]
const INIT_SEQUENCE: [u8; 25] = [
    CMD_DISPLAY_OFF,
    0xD5, 0x80, // clock divide
    0xA8, 0x3F, // multiplex 64
    0xD3, 0x00, // display offset
    0x40,       // start line 0
    0x8D, 0x14, // charge pump on
    0x20, 0x00, // horizontal addressing
    0xA1,       // segment remap
    0xC8,       // COM scan descending
    0xDA, 0x12, // COM pins
    0x81, 0xCF, // contrast
    0xD9, 0xF1, // pre-charge
    0xDB, 0x40, // VCOMH
    0xA4,       // follow RAM
    0xA6,       // normal, not inverted
    CMD_DISPLAY_ON,
];

/// Data bytes per I²C write when pushing the frame buffer.
const CHUNK_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum Ssd1306Error<E> {
    #[error("i2c transfer failed: {0:?}")]
    Bus(E),
}

pub struct Ssd1306<I2C> {
    i2c: I2C,
    address: u8,
    buffer: [u8; WIDTH_PX * PAGES],
    column: usize,
    page: usize,
}

impl<I2C: I2c> Ssd1306<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            buffer: [0; WIDTH_PX * PAGES],
            column: 0,
            page: 0,
        }
    }

    /// Run the power-up sequence. Fails if the panel does not acknowledge.
    pub fn init(&mut self) -> Result<(), Ssd1306Error<I2C::Error>> {
        for &cmd in INIT_SEQUENCE.iter() {
            self.command(cmd)?;
        }
        Ok(())
    }

    /// Send the frame buffer to the panel.
    pub fn show(&mut self) -> Result<(), Ssd1306Error<I2C::Error>> {
        for cmd in [
            CMD_SET_COLUMN_RANGE,
            0,
            (WIDTH_PX - 1) as u8,
            CMD_SET_PAGE_RANGE,
            0,
            (PAGES - 1) as u8,
        ] {
            self.command(cmd)?;
        }

        let mut frame = [0u8; CHUNK_LEN + 1];
        frame[0] = CONTROL_DATA;
        for chunk in self.buffer.chunks(CHUNK_LEN) {
            frame[1..=chunk.len()].copy_from_slice(chunk);
            self.i2c
                .write(self.address, &frame[..=chunk.len()])
                .map_err(Ssd1306Error::Bus)?;
        }
        Ok(())
    }

    /// Blank the frame buffer and move the cursor to the top-left cell.
    pub fn clear_buffer(&mut self) {
        self.buffer.fill(0);
        self.column = 0;
        self.page = 0;
    }

    /// Frame buffer, one byte per 8-pixel column, pages top to bottom.
    pub fn buffer(&self) -> &[u8; WIDTH_PX * PAGES] {
        &self.buffer
    }

    pub fn free(self) -> I2C {
        self.i2c
    }

    fn command(&mut self, cmd: u8) -> Result<(), Ssd1306Error<I2C::Error>> {
        self.i2c
            .write(self.address, &[CONTROL_COMMAND, cmd])
            .map_err(Ssd1306Error::Bus)
    }

    fn put_char(&mut self, c: char) {
        match c {
            '\r' => self.column = 0,
            '\n' => {
                self.page += 1;
                self.column = 0;
            }
            _ => {
                // Off the right or bottom edge: clipped.
                if self.page >= PAGES || self.column + CELL_WIDTH > WIDTH_PX {
                    return;
                }
                let start = self.page * WIDTH_PX + self.column;
                self.buffer[start..start + 5].copy_from_slice(glyph(c));
                self.buffer[start + 5] = 0;
                self.column += CELL_WIDTH;
            }
        }
    }
}

impl<I2C: I2c> Write for Ssd1306<I2C> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        s.chars().for_each(|c| self.put_char(c));
        Ok(())
    }
}

impl<I2C: I2c> Terminal for Ssd1306<I2C> {
    fn open(&mut self) -> fmt::Result {
        self.init().map_err(|e| {
            warn!("display init failed: {}", e);
            fmt::Error
        })
    }

    fn clear(&mut self) -> fmt::Result {
        self.clear_buffer();
        Ok(())
    }

    fn flush(&mut self) -> fmt::Result {
        self.show().map_err(|e| {
            warn!("display update failed: {}", e);
            fmt::Error
        })
    }
}

/// Column bitmap (LSB at the top) for printable ASCII; anything else draws as `?`.
fn glyph(c: char) -> &'static [u8; 5] {
    let index = match c {
        ' '..='~' => c as usize - ' ' as usize,
        _ => '?' as usize - ' ' as usize,
    };
    &FONT_5X7[index]
}

#[rustfmt::skip]
const FONT_5X7: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x08, 0x2A, 0x1C, 0x2A, 0x08], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x08, 0x14, 0x22, 0x41, 0x00], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x00, 0x41, 0x22, 0x14, 0x08], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x09, 0x01], // F
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x07, 0x08, 0x70, 0x08, 0x07], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x7F, 0x41, 0x41, 0x00], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // backslash
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x7F, 0x10, 0x28, 0x44, 0x00], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x08, 0x04, 0x08, 0x10, 0x08], // ~
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::Console;
    use crate::io::Screen;
    use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

    /// Records every write; `present: false` NACKs the address.
    struct FakeBus {
        present: bool,
        writes: Vec<Vec<u8>>,
    }

    impl FakeBus {
        fn new(present: bool) -> Self {
            Self {
                present,
                writes: Vec::new(),
            }
        }
    }

    impl ErrorType for FakeBus {
        type Error = ErrorKind;
    }

    impl I2c for FakeBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), ErrorKind> {
            assert_eq!(address, DEFAULT_ADDRESS);
            if !self.present {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
            for op in operations {
                if let Operation::Write(bytes) = op {
                    self.writes.push(bytes.to_vec());
                }
            }
            Ok(())
        }
    }

    #[test]
    fn init_ends_by_turning_the_panel_on() {
        let mut oled = Ssd1306::new(FakeBus::new(true), DEFAULT_ADDRESS);
        oled.init().unwrap();

        let writes = oled.free().writes;
        assert_eq!(writes.len(), INIT_SEQUENCE.len());
        assert!(writes.iter().all(|w| w.len() == 2 && w[0] == CONTROL_COMMAND));
        assert_eq!(writes.last().unwrap(), &vec![CONTROL_COMMAND, CMD_DISPLAY_ON]);
    }

    #[test]
    fn missing_panel_fails_init() {
        let mut oled = Ssd1306::new(FakeBus::new(false), DEFAULT_ADDRESS);
        assert!(matches!(
            oled.init(),
            Err(Ssd1306Error::Bus(ErrorKind::NoAcknowledge(_)))
        ));
        assert!(Terminal::open(&mut oled).is_err());
    }

    #[test]
    fn text_lands_in_the_cursor_cell() {
        let mut oled = Ssd1306::new(FakeBus::new(true), DEFAULT_ADDRESS);
        write!(oled, "A\r\n A").unwrap();

        let buf = oled.buffer();
        assert_eq!(&buf[0..6], &[0x7E, 0x11, 0x11, 0x11, 0x7E, 0x00]);
        // Second row, second cell.
        let start = WIDTH_PX + CELL_WIDTH;
        assert_eq!(&buf[start..start + 5], glyph('A'));
        assert!(buf[..WIDTH_PX][6..].iter().all(|&b| b == 0));
    }

    #[test]
    fn overlong_lines_and_rows_are_clipped() {
        let mut oled = Ssd1306::new(FakeBus::new(true), DEFAULT_ADDRESS);
        for _ in 0..PAGES + 2 {
            writeln!(oled, "{}", "#".repeat(30)).unwrap();
        }
        // 21 cells of 6 columns, the last two columns stay blank.
        assert_eq!(oled.buffer()[WIDTH_PX - 2..WIDTH_PX], [0, 0]);
        assert_eq!(oled.buffer()[WIDTH_PX - 3], 0);
        assert_eq!(oled.buffer()[WIDTH_PX - 4], glyph('#')[4]);
    }

    #[test]
    fn show_sends_the_whole_frame() {
        let mut oled = Ssd1306::new(FakeBus::new(true), DEFAULT_ADDRESS);
        oled.show().unwrap();

        let writes = oled.free().writes;
        let data: usize = writes
            .iter()
            .filter(|w| w[0] == CONTROL_DATA)
            .map(|w| w.len() - 1)
            .sum();
        assert_eq!(data, WIDTH_PX * PAGES);
    }

    #[test]
    fn console_screens_render_on_the_panel() {
        let mut console = Console::new(Ssd1306::new(FakeBus::new(true), DEFAULT_ADDRESS));
        console.open().unwrap();
        console.draw(Screen::RoundStaged { round: 0 }).unwrap();

        let oled = console.free();
        // "Round 1" is centred: 7 characters in 21 columns, 7 cells of padding.
        let start = 7 * CELL_WIDTH;
        assert_eq!(&oled.buffer()[start..start + 5], glyph('R'));
        assert!(oled.buffer()[..start].iter().all(|&b| b == 0));
    }
}
