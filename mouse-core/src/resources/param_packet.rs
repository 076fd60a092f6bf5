/*
* Parameter Update Packet
    Input Command Pattern
        [HEADER] [OP_CODE] [INDEX u8] [VALUE f32 big endian]
    Output Pattern
        [HEADER] [ERROR_CODE] [OP_CODE]
*/

use super::general_params::GeneralParams;
use super::general_params::PARAM_COUNT;

/* --------------------------- HEADER -------------------------- */
pub const COMMAND_HEADER: u8 = 0xFF;
pub const RESPONSE_LEN: usize = 3;

/* --------------------------- OP_CODE -------------------------- */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum OpCode {
    UpdateParameters = 1,
}

impl TryFrom<u8> for OpCode {
    type Error = ErrorCode;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(OpCode::UpdateParameters),
            _ => Err(ErrorCode::OpCodeNotFound),
        }
    }
}

/* --------------------------- Error Code -------------------------- */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ErrorCode {
    NoError = 0,
    OpCodeNotFound = 1,
    NonFiniteFloat = 2,
    ReadByteError = 3,
    InvalidIndex = 4,
    InvalidHeaderCode = 5,
}

/* --------------------------- Parsed Packet -------------------------- */
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParamUpdate {
    pub index: u8,
    pub value: f32,
}

impl ParamUpdate {
    pub fn apply(&self, params: &mut GeneralParams) -> Result<(), ErrorCode> {
        params.set(self.index as usize, self.value)
    }
}

/* --------------------------- Command Read Trait -------------------------- */
pub trait FromBeBytes: Sized {
    const SIZE: usize;
    fn from_be_bytes(bytes: &[u8]) -> Option<Self>;
}

impl FromBeBytes for u8 {
    const SIZE: usize = 1;
    fn from_be_bytes(bytes: &[u8]) -> Option<Self> {
        bytes.first().copied()
    }
}

impl FromBeBytes for f32 {
    const SIZE: usize = 4;
    fn from_be_bytes(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(f32::from_be_bytes)
    }
}

/* --------------------------- Command Handler -------------------------- */
pub struct CommandHandler<'a> {
    data: &'a [u8],
    cursor: usize,
}

impl<'a> CommandHandler<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, cursor: 0 }
    }

    pub fn read<T: FromBeBytes>(&mut self) -> Option<T> {
        let size = T::SIZE;
        let bytes = self.data.get(self.cursor..self.cursor + size)?;
        let val = T::from_be_bytes(bytes)?;

        self.cursor += size;
        Some(val)
    }

    pub fn read_f32(&mut self) -> Result<f32, ErrorCode> {
        let val: f32 = self.read().ok_or(ErrorCode::ReadByteError)?;
        if val.is_finite() {
            Ok(val)
        } else {
            Err(ErrorCode::NonFiniteFloat)
        }
    }

    pub fn process_command(&mut self) -> Result<ParamUpdate, ErrorCode> {
        let header: u8 = self.read().ok_or(ErrorCode::ReadByteError)?;
        if header != COMMAND_HEADER {
            return Err(ErrorCode::InvalidHeaderCode);
        }

        let op_code: u8 = self.read().ok_or(ErrorCode::ReadByteError)?;
        match OpCode::try_from(op_code)? {
            OpCode::UpdateParameters => {
                /* update_parameters
                    index (u8) = 1
                    value (f32) = 4
                */
                let index: u8 = self.read().ok_or(ErrorCode::ReadByteError)?;
                if index as usize >= PARAM_COUNT {
                    return Err(ErrorCode::InvalidIndex);
                }
                let value = self.read_f32()?;
                Ok(ParamUpdate { index, value })
            }
        }
    }
}

pub fn response(result: Result<(), ErrorCode>) -> [u8; RESPONSE_LEN] {
    let error_code = match result {
        Ok(()) => ErrorCode::NoError,
        Err(code) => code,
    };
    [COMMAND_HEADER, error_code as u8, OpCode::UpdateParameters as u8]
}
