/*
    Persistent Storage

    Address Map
    - 0x0000 parameter table, one u32 (f32 bits) per field, active tier byte after it
    - 0x0100 maze main slot, 4 bytes per cell
    - 0x0500 maze backup slot, 4 bytes per cell
*/

use super::general_params::GeneralParams;
use super::general_params::SpeedTier;
use super::general_params::PARAM_COUNT;

/* --------------------------- Address Map -------------------------- */
pub const PARAMS_ADDR: u16 = 0x0000;
pub const ACTIVE_TIER_ADDR: u16 = PARAMS_ADDR + (PARAM_COUNT as u16) * 4;
pub const MAZE_MAIN_ADDR: u16 = 0x0100;
pub const MAZE_BACKUP_ADDR: u16 = 0x0500;
pub const BYTES_PER_CELL: u16 = 4;

/// Size of the emulated EEPROM, one RP2040 flash sector.
pub const EEPROM_SIZE: usize = 4096;

/* --------------------------- Errors -------------------------- */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// `addr..addr + len` is outside the device.
    OutOfRange { addr: u16, len: u16 },
    /// The device reported a failure.
    Device,
    /// Stored data does not decode into a valid value.
    Corrupt,
}

/* --------------------------- Eeprom Trait -------------------------- */
/// Byte-addressed non-volatile memory. Implementors provide raw access,
/// every typed accessor validates the range first.
pub trait Eeprom {
    const SIZE: usize;

    fn read_raw(&mut self, addr: u16, buf: &mut [u8]) -> Result<(), StorageError>;
    fn write_raw(&mut self, addr: u16, data: &[u8]) -> Result<(), StorageError>;

    fn check_range(&self, addr: u16, len: usize) -> Result<(), StorageError> {
        let end = addr as usize + len;
        if end > Self::SIZE {
            return Err(StorageError::OutOfRange {
                addr,
                len: len.min(u16::MAX as usize) as u16,
            });
        }
        Ok(())
    }

    fn read(&mut self, addr: u16, buf: &mut [u8]) -> Result<(), StorageError> {
        self.check_range(addr, buf.len())?;
        self.read_raw(addr, buf)
    }

    fn write(&mut self, addr: u16, data: &[u8]) -> Result<(), StorageError> {
        self.check_range(addr, data.len())?;
        self.write_raw(addr, data)
    }

    fn read_u8(&mut self, addr: u16) -> Result<u8, StorageError> {
        let mut buf = [0u8; 1];
        self.read(addr, &mut buf)?;
        Ok(buf[0])
    }

    fn read_u16(&mut self, addr: u16) -> Result<u16, StorageError> {
        let mut buf = [0u8; 2];
        self.read(addr, &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    fn read_u32(&mut self, addr: u16) -> Result<u32, StorageError> {
        let mut buf = [0u8; 4];
        self.read(addr, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn write_u8(&mut self, addr: u16, value: u8) -> Result<(), StorageError> {
        self.write(addr, &[value])
    }

    fn write_u16(&mut self, addr: u16, value: u16) -> Result<(), StorageError> {
        self.write(addr, &value.to_le_bytes())
    }

    fn write_u32(&mut self, addr: u16, value: u32) -> Result<(), StorageError> {
        self.write(addr, &value.to_le_bytes())
    }
}

/* --------------------------- RAM Eeprom -------------------------- */
/// RAM-backed device. Starts erased (all 0xFF) like a fresh flash sector.
#[derive(Debug, Clone)]
pub struct MemoryEeprom<const N: usize = EEPROM_SIZE> {
    data: [u8; N],
}

impl<const N: usize> MemoryEeprom<N> {
    pub const fn new() -> Self {
        Self { data: [0xFF; N] }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl<const N: usize> Default for MemoryEeprom<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Eeprom for MemoryEeprom<N> {
    const SIZE: usize = N;

    fn read_raw(&mut self, addr: u16, buf: &mut [u8]) -> Result<(), StorageError> {
        let start = addr as usize;
        let src = self.data.get(start..start + buf.len()).ok_or(StorageError::Device)?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn write_raw(&mut self, addr: u16, data: &[u8]) -> Result<(), StorageError> {
        let start = addr as usize;
        let dst = self.data.get_mut(start..start + data.len()).ok_or(StorageError::Device)?;
        dst.copy_from_slice(data);
        Ok(())
    }
}

/* --------------------------- Parameter Table -------------------------- */
pub fn save_params<E: Eeprom>(eeprom: &mut E, params: &GeneralParams) -> Result<(), StorageError> {
    for index in 0..PARAM_COUNT {
        let value = params.get(index).unwrap_or(0.0);
        eeprom.write_u32(PARAMS_ADDR + (index as u16) * 4, value.to_bits())?;
    }
    Ok(())
}

/// Reads the parameter table. An erased or damaged table is reported as
/// [`StorageError::Corrupt`] so the caller can pick the tier defaults.
pub fn load_params<E: Eeprom>(eeprom: &mut E) -> Result<GeneralParams, StorageError> {
    let mut params = GeneralParams::default();
    for index in 0..PARAM_COUNT {
        let value = f32::from_bits(eeprom.read_u32(PARAMS_ADDR + (index as u16) * 4)?);
        params.set(index, value).map_err(|_| StorageError::Corrupt)?;
    }
    Ok(params)
}

pub fn save_active_tier<E: Eeprom>(eeprom: &mut E, tier: SpeedTier) -> Result<(), StorageError> {
    eeprom.write_u8(ACTIVE_TIER_ADDR, tier as u8)
}

pub fn load_active_tier<E: Eeprom>(eeprom: &mut E) -> Result<SpeedTier, StorageError> {
    let value = eeprom.read_u8(ACTIVE_TIER_ADDR)?;
    SpeedTier::try_from(value).map_err(|_| StorageError::Corrupt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_access_is_little_endian() {
        let mut eeprom = MemoryEeprom::<16>::new();
        eeprom.write_u32(4, 0x1234_5678).unwrap();
        assert_eq!(eeprom.read_u8(4), Ok(0x78));
        assert_eq!(eeprom.read_u16(6), Ok(0x1234));
        assert_eq!(eeprom.read_u32(4), Ok(0x1234_5678));
    }

    #[test]
    fn out_of_range_is_rejected_before_access() {
        let mut eeprom = MemoryEeprom::<16>::new();
        assert_eq!(eeprom.write_u32(14, 1), Err(StorageError::OutOfRange { addr: 14, len: 4 }));
        assert_eq!(eeprom.read_u16(16), Err(StorageError::OutOfRange { addr: 16, len: 2 }));
        assert!(eeprom.as_bytes().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn parameter_table_round_trip() {
        let mut eeprom = MemoryEeprom::<EEPROM_SIZE>::new();
        let mut params = GeneralParams::for_tier(SpeedTier::Fast);
        params.wall.kd = 0.125;
        save_params(&mut eeprom, &params).unwrap();
        save_active_tier(&mut eeprom, SpeedTier::Fast).unwrap();

        let loaded = load_params(&mut eeprom).unwrap();
        assert_eq!(loaded.wall.kd, 0.125);
        assert_eq!(loaded.fan_speed, params.fan_speed);
        assert_eq!(loaded.enable_wall_break_correction, params.enable_wall_break_correction);
        assert_eq!(load_active_tier(&mut eeprom), Ok(SpeedTier::Fast));
    }

    #[test]
    fn erased_device_is_corrupt() {
        let mut eeprom = MemoryEeprom::<EEPROM_SIZE>::new();
        assert_eq!(load_params(&mut eeprom), Err(StorageError::Corrupt));
        assert_eq!(load_active_tier(&mut eeprom), Err(StorageError::Corrupt));
    }
}
