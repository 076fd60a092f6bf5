/*
    Flash Storage Resources

    The last flash sector emulates a byte-addressed EEPROM. Reads and writes
    hit a RAM mirror; commit() erases the sector and writes the mirror back.
*/

use super::*;

pub type StorageFlash<'d> = Flash<'d, peripherals::FLASH, Blocking, FLASH_SIZE>;

pub struct FlashEeprom<'d> {
    flash: StorageFlash<'d>,
    mirror: [u8; EEPROM_SIZE],
    dirty: bool,
}

impl<'d> FlashEeprom<'d> {
    pub fn new(flash: StorageFlash<'d>) -> Self {
        Self {
            flash,
            mirror: [0xFF; EEPROM_SIZE],
            dirty: false,
        }
    }

    /// Fills the mirror from flash. Call once at boot.
    pub fn load(&mut self) -> Result<(), StorageError> {
        self.flash.blocking_read(STORAGE_OFFSET, &mut self.mirror).map_err(|_| StorageError::Device)?;
        self.dirty = false;
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        return self.dirty;
    }

    /// Writes pending changes back. Blocks for the sector erase, only call
    /// while the motors are off. A failed commit is retried on the next change.
    pub fn commit(&mut self) -> Result<(), StorageError> {
        if !self.dirty {
            return Ok(());
        }
        self.dirty = false;

        let end = STORAGE_OFFSET + EEPROM_SIZE as u32;
        self.flash.blocking_erase(STORAGE_OFFSET, end).map_err(|_| StorageError::Device)?;
        self.flash.blocking_write(STORAGE_OFFSET, &self.mirror).map_err(|_| StorageError::Device)?;
        log::info!("storage: committed {} bytes", EEPROM_SIZE);
        Ok(())
    }
}

impl<'d> Eeprom for FlashEeprom<'d> {
    const SIZE: usize = EEPROM_SIZE;

    fn read_raw(&mut self, addr: u16, buf: &mut [u8]) -> Result<(), StorageError> {
        let start = addr as usize;
        let src = self.mirror.get(start..start + buf.len()).ok_or(StorageError::Device)?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn write_raw(&mut self, addr: u16, data: &[u8]) -> Result<(), StorageError> {
        let start = addr as usize;
        let dst = self.mirror.get_mut(start..start + data.len()).ok_or(StorageError::Device)?;
        if dst != data {
            dst.copy_from_slice(data);
            self.dirty = true;
        }
        Ok(())
    }
}
