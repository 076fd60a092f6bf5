/*
    Start Button Task

    Short press: start or stop. Long press while idle: next run tier.
*/

use super::*;

#[embassy_executor::task]
pub async fn button_task(resources: ButtonResources) {
    let mut button = Input::new(resources.START_PIN, Pull::Up);

    loop {
        button.wait_for_falling_edge().await;
        Timer::after_millis(BUTTON_DEBOUNCE_MS).await;
        if button.is_high() {
            continue;
        }

        let pressed_at = Instant::now();
        button.wait_for_high().await;
        let press = if pressed_at.elapsed() >= Duration::from_millis(BUTTON_LONG_PRESS_MS) {
            Press::Long
        }
        else {
            Press::Short
        };

        COMMAND_CHANNEL.send(DriverCommand::Button(press)).await;
        Timer::after_millis(BUTTON_DEBOUNCE_MS).await;
    }
}
