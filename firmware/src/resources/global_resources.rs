/*
* Global Resources
*/

use super::*;

/* --------------------------- Handlers -------------------------- */
pub static SENSORS: SensorHandler = SensorHandler::new();

/* --------------------------- Channels -------------------------- */
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, DriverCommand, COMMAND_CHANNEL_SIZE> = Channel::new();

/* --------------------------- ENUM -------------------------- */
#[derive(Debug, Clone, Copy, PartialEq, defmt::Format)]
pub enum Press {
    Short,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, defmt::Format)]
pub enum DriverCommand {
    UpdateParam(ParamUpdate),
    Button(Press),
}
