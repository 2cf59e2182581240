//! Addressable memory: register file, RAM and VRAM.

use kcpu_bytecode::{MAX_EXACT_ADDRESS, REGISTER_COUNT, Region, Target};

use super::error::Fault;

/// Upper bound on `width * height`, for the builder and for `g_init`.
pub const MAX_SCREEN_CELLS: u64 = 1 << 24;

/// Upper bound on the number of RAM cells.
pub const MAX_RAM_CELLS: usize = 1 << 24;

/// Convert a stack value to an address or cell index.
///
/// The value must be finite, non-negative, integral and no larger than
/// 2^53; anything else is rejected instead of truncated.
pub fn to_address(value: f64) -> Result<u64, Fault> {
    let exact = value.is_finite()
        && value >= 0.0
        && value.fract() == 0.0
        && value <= MAX_EXACT_ADDRESS as f64;
    if !exact {
        return Err(Fault::InvalidAddress(value));
    }
    Ok(value as u64)
}

/// Registers, RAM and a `width x height` VRAM, all zero-initialized.
#[derive(Clone, Debug, PartialEq)]
pub struct Memory {
    registers: [f64; REGISTER_COUNT],
    ram: Vec<f64>,
    vram: Vec<f64>,
    width: usize,
    height: usize,
}

impl Memory {
    /// Zeroed memory; sizes above [`MAX_RAM_CELLS`] or [`MAX_SCREEN_CELLS`]
    /// are rejected before anything is allocated.
    pub fn new(ram_size: usize, width: usize, height: usize) -> Result<Self, Fault> {
        if ram_size > MAX_RAM_CELLS {
            return Err(Fault::RamTooLarge(ram_size));
        }
        let cells = screen_cells(width as u64, height as u64)?;

        Ok(Self {
            registers: [0.0; REGISTER_COUNT],
            ram: vec![0.0; ram_size],
            vram: vec![0.0; cells],
            width,
            height,
        })
    }

    pub fn registers(&self) -> &[f64] {
        &self.registers
    }

    pub fn ram(&self) -> &[f64] {
        &self.ram
    }

    pub fn vram(&self) -> &[f64] {
        &self.vram
    }

    /// Screen dimensions as `(width, height)`.
    pub fn screen(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn read(&self, target: Target) -> Result<f64, Fault> {
        match target {
            Target::Register(r) => self
                .registers
                .get(r as usize)
                .copied()
                .ok_or(Fault::RegisterOutOfRange(r)),
            Target::Ram(raw) => {
                let i = cell(Region::Ram, raw, self.ram.len())?;
                Ok(self.ram[i])
            }
            Target::Vram(raw) => {
                let i = cell(Region::Vram, raw, self.vram.len())?;
                Ok(self.vram[i])
            }
        }
    }

    pub fn write(&mut self, target: Target, value: f64) -> Result<(), Fault> {
        *self.slot(target)? = value;
        Ok(())
    }

    /// Resolve a target to its cell, checking region bounds.
    fn slot(&mut self, target: Target) -> Result<&mut f64, Fault> {
        match target {
            Target::Register(r) => self
                .registers
                .get_mut(r as usize)
                .ok_or(Fault::RegisterOutOfRange(r)),
            Target::Ram(raw) => {
                let i = cell(Region::Ram, raw, self.ram.len())?;
                Ok(&mut self.ram[i])
            }
            Target::Vram(raw) => {
                let i = cell(Region::Vram, raw, self.vram.len())?;
                Ok(&mut self.vram[i])
            }
        }
    }

    /// Replace VRAM with a zeroed `width x height` buffer.
    pub fn init_screen(&mut self, width: u64, height: u64) -> Result<(), Fault> {
        let cells = screen_cells(width, height)?;
        let (Ok(w), Ok(h)) = (usize::try_from(width), usize::try_from(height)) else {
            return Err(Fault::ScreenTooLarge { width, height });
        };

        self.width = w;
        self.height = h;
        self.vram = vec![0.0; cells];
        Ok(())
    }

    pub fn fill_vram(&mut self, value: f64) {
        self.vram.fill(value);
    }
}

/// Cell count of a `width x height` screen, if within [`MAX_SCREEN_CELLS`].
fn screen_cells(width: u64, height: u64) -> Result<usize, Fault> {
    width
        .checked_mul(height)
        .filter(|&n| n <= MAX_SCREEN_CELLS)
        .map(|n| n as usize)
        .ok_or(Fault::ScreenTooLarge { width, height })
}

fn cell(region: Region, raw: f64, len: usize) -> Result<usize, Fault> {
    let index = to_address(raw)?;
    match usize::try_from(index) {
        Ok(i) if i < len => Ok(i),
        _ => Err(Fault::MemoryOutOfRange { region, index, len }),
    }
}
