//! MMC2 Mapper (Mapper 9).
//!
//! Used by a single commercial game, Mike Tyson's Punch-Out!!, MMC2 is
//! notable for its CHR-fetch address latches rather than any banking
//! sophistication.
//!
//! Memory layout:
//! - PRG-ROM: one switchable 8KB bank at $8000-$9FFF; the top three 8KB
//!   banks are fixed at $A000-$FFFF.
//! - CHR-ROM: two 4KB windows ($0000-$0FFF, $1000-$1FFF), each with two
//!   banks selected by a latch that flips when the PPU fetches a tile at
//!   one of four magic addresses.
//!
//! Latch behavior (from Nesdev):
//! - PPU reads $0FD8 -> latch 0 := $FD
//! - PPU reads $0FE8 -> latch 0 := $FE
//! - PPU reads $1FD8-$1FDF -> latch 1 := $FD
//! - PPU reads $1FE8-$1FEF -> latch 1 := $FE
//!
//! The latch updates after the fetch completes, so the triggering tile
//! itself is drawn from the bank that was active before the switch.

use crate::mapper::{Mapper, Mirroring};
use crate::rom::Rom;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const PRG_BANK_SIZE: usize = 8192;
const CHR_WINDOW_SIZE: usize = 4096;

/// CHR latch state: the hardware only distinguishes the $FD/$FE tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
enum Latch {
    Fd,
    Fe,
}

/// MMC2 mapper implementation.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mmc2 {
    prg_rom: Vec<u8>,
    chr_rom: Vec<u8>,
    prg_banks: usize,
    chr_banks_4k: usize,

    prg_bank: u8,

    chr_fd_0000: u8,
    chr_fe_0000: u8,
    chr_fd_1000: u8,
    chr_fe_1000: u8,

    latch0: Latch,
    latch1: Latch,

    mirroring: Mirroring,
}

impl Mmc2 {
    /// Create a new MMC2 mapper from ROM data.
    #[must_use]
    pub fn new(rom: &Rom) -> Self {
        let prg_banks = (rom.prg_rom.len() / PRG_BANK_SIZE).max(1);
        let chr_banks_4k = (rom.chr_rom.len() / CHR_WINDOW_SIZE).max(1);

        Self {
            prg_rom: rom.prg_rom.clone(),
            chr_rom: rom.chr_rom.clone(),
            prg_banks,
            chr_banks_4k,
            prg_bank: 0,
            chr_fd_0000: 0,
            chr_fe_0000: 0,
            chr_fd_1000: 0,
            chr_fe_1000: 0,
            latch0: Latch::Fe,
            latch1: Latch::Fe,
            mirroring: rom.header.mirroring,
        }
    }

    /// Resolve the fixed bank N from the top (1 = last bank).
    fn bank_from_end(&self, n: usize) -> usize {
        self.prg_banks.saturating_sub(n)
    }

    fn chr_window(&self, addr: u16) -> (usize, usize) {
        let addr = addr & 0x1FFF;
        let offset = (addr & 0x0FFF) as usize;

        if addr < 0x1000 {
            let bank = match self.latch0 {
                Latch::Fd => self.chr_fd_0000,
                Latch::Fe => self.chr_fe_0000,
            };
            (bank as usize % self.chr_banks_4k, offset)
        } else {
            let bank = match self.latch1 {
                Latch::Fd => self.chr_fd_1000,
                Latch::Fe => self.chr_fe_1000,
            };
            (bank as usize % self.chr_banks_4k, offset)
        }
    }

    /// Flip the CHR latches after a pattern-table fetch lands on one of the
    /// four magic addresses. Called after the byte has already been read.
    fn update_latches(&mut self, addr: u16) {
        match addr & 0x1FFF {
            0x0FD8 => self.latch0 = Latch::Fd,
            0x0FE8 => self.latch0 = Latch::Fe,
            0x1FD8..=0x1FDF => self.latch1 = Latch::Fd,
            0x1FE8..=0x1FEF => self.latch1 = Latch::Fe,
            _ => {}
        }
    }
}

impl Mapper for Mmc2 {
    fn read_prg(&self, addr: u16) -> u8 {
        let bank = match addr {
            0x8000..=0x9FFF => (self.prg_bank as usize) % self.prg_banks,
            0xA000..=0xBFFF => self.bank_from_end(3),
            0xC000..=0xDFFF => self.bank_from_end(2),
            0xE000..=0xFFFF => self.bank_from_end(1),
            _ => return 0,
        };
        let offset = (addr & 0x1FFF) as usize;
        self.prg_rom
            .get(bank * PRG_BANK_SIZE + offset)
            .copied()
            .unwrap_or(0)
    }

    fn write_prg(&mut self, addr: u16, val: u8) {
        match addr {
            0xA000..=0xAFFF => self.prg_bank = val & 0x0F,
            0xB000..=0xBFFF => self.chr_fd_0000 = val & 0x1F,
            0xC000..=0xCFFF => self.chr_fe_0000 = val & 0x1F,
            0xD000..=0xDFFF => self.chr_fd_1000 = val & 0x1F,
            0xE000..=0xEFFF => self.chr_fe_1000 = val & 0x1F,
            0xF000..=0xFFFF => {
                self.mirroring = if val & 0x01 == 0 {
                    Mirroring::Vertical
                } else {
                    Mirroring::Horizontal
                };
            }
            _ => {}
        }
    }

    fn read_chr(&mut self, addr: u16) -> u8 {
        let (bank, offset) = self.chr_window(addr);
        let value = self
            .chr_rom
            .get(bank * CHR_WINDOW_SIZE + offset)
            .copied()
            .unwrap_or(0);
        self.update_latches(addr);
        value
    }

    fn write_chr(&mut self, _addr: u16, _val: u8) {
        // MMC2 boards ship CHR-ROM only; writes are ignored.
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    fn mapper_number(&self) -> u16 {
        9
    }

    fn mapper_name(&self) -> &'static str {
        "MMC2"
    }

    fn reset(&mut self) {
        self.prg_bank = 0;
        self.chr_fd_0000 = 0;
        self.chr_fe_0000 = 0;
        self.chr_fd_1000 = 0;
        self.chr_fe_1000 = 0;
        self.latch0 = Latch::Fe;
        self.latch1 = Latch::Fe;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rom::RomHeader;

    fn create_test_rom(prg_banks: u8, chr_banks_4k: u8) -> Rom {
        let prg_size = prg_banks as usize * PRG_BANK_SIZE;
        let chr_size = chr_banks_4k as usize * CHR_WINDOW_SIZE;

        let mut prg_rom = vec![0u8; prg_size];
        for bank in 0..prg_banks as usize {
            for i in 0..PRG_BANK_SIZE {
                prg_rom[bank * PRG_BANK_SIZE + i] = bank as u8;
            }
        }

        let mut chr_rom = vec![0u8; chr_size];
        for bank in 0..chr_banks_4k as usize {
            for i in 0..CHR_WINDOW_SIZE {
                chr_rom[bank * CHR_WINDOW_SIZE + i] = bank as u8;
            }
        }

        Rom {
            header: RomHeader {
                prg_rom_size: prg_size,
                chr_rom_size: chr_size,
                mapper_number: 9,
                submapper: 0,
                prg_ram_size: 0,
                prg_nvram_size: 0,
                chr_ram_size: 0,
                chr_nvram_size: 0,
                mirroring: Mirroring::Vertical,
                has_battery: false,
                has_trainer: false,
                nes2_format: false,
            },
            prg_rom,
            chr_rom,
            trainer: None,
        }
    }

    #[test]
    fn test_mmc2_fixed_banks() {
        let rom = create_test_rom(8, 4);
        let mapper = Mmc2::new(&rom);

        assert_eq!(mapper.read_prg(0x8000), 0);
        assert_eq!(mapper.read_prg(0xA000), 5); // bank_from_end(3)
        assert_eq!(mapper.read_prg(0xC000), 6);
        assert_eq!(mapper.read_prg(0xE000), 7);
    }

    #[test]
    fn test_mmc2_prg_bank_switch() {
        let rom = create_test_rom(8, 4);
        let mut mapper = Mmc2::new(&rom);

        mapper.write_prg(0xA000, 3);
        assert_eq!(mapper.read_prg(0x8000), 3);
        // Fixed banks never move.
        assert_eq!(mapper.read_prg(0xE000), 7);
    }

    #[test]
    fn test_mmc2_chr_latch_switching() {
        let rom = create_test_rom(2, 4);
        let mut mapper = Mmc2::new(&rom);

        mapper.write_prg(0xB000, 0); // latch0=$FD bank
        mapper.write_prg(0xC000, 1); // latch0=$FE bank

        // Power-on latch0 defaults to $FE -> bank 1.
        assert_eq!(mapper.read_chr(0x0000), 1);

        // Reading the $0FD8 trigger address flips latch0 to $FD afterwards.
        let _ = mapper.read_chr(0x0FD8);
        assert_eq!(mapper.read_chr(0x0000), 0);

        let _ = mapper.read_chr(0x0FE8);
        assert_eq!(mapper.read_chr(0x0000), 1);
    }

    #[test]
    fn test_mmc2_mirroring_register() {
        let rom = create_test_rom(2, 4);
        let mut mapper = Mmc2::new(&rom);

        mapper.write_prg(0xF000, 0x01);
        assert_eq!(mapper.mirroring(), Mirroring::Horizontal);

        mapper.write_prg(0xF000, 0x00);
        assert_eq!(mapper.mirroring(), Mirroring::Vertical);
    }

    #[test]
    fn test_mmc2_info() {
        let rom = create_test_rom(2, 4);
        let mapper = Mmc2::new(&rom);
        assert_eq!(mapper.mapper_number(), 9);
        assert_eq!(mapper.mapper_name(), "MMC2");
    }
}
