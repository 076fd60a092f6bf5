/*
* USB Handler
*
*  Logs go out over the CDC serial port; parameter packets come in on it.
*  A rejected packet is answered right away, an accepted one is answered by
*  the control task once it has been applied.
*/

use super::*;

use mouse_core::resources::response;
use mouse_core::resources::CommandHandler;

struct UsbHandler;

impl ReceiverHandler for UsbHandler {
    async fn handle_data(&self, raw_data: &[u8]) {
        if raw_data.is_empty() {
            return;
        }

        match CommandHandler::new(raw_data).process_command() {
            Ok(update) => {
                COMMAND_CHANNEL.send(DriverCommand::UpdateParam(update)).await;
            },
            Err(code) => {
                log::warn!("param packet rejected: {:?} {:02X?}", code, response(Err(code)));
            },
        }
    }

    fn new() -> Self {
        Self
    }
}

#[embassy_executor::task]
pub async fn usb_logger_task(driver: Driver<'static, USB>) {
    embassy_usb_logger::run!(1024, log::LevelFilter::Info, driver, UsbHandler);
}
