//! SSD1306 OLED status display.
//!
//! Redraws only when the visible content changes; the panel is driven over
//! blocking I²C, so skipping identical frames keeps the bus quiet.

use defmt::{info, warn};
use embassy_nrf::peripherals::TWISPI0;
use embassy_nrf::twim::Twim;
use embassy_time::{Duration, Ticker};
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;
use steer_remote::config::DISPLAY_REFRESH_MS;
use steer_remote::state::RemoteState;
use steer_remote::ui::{contrast_for, Page, PageToggle, StatusView, TITLE};
use steer_remote::Error;

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Initialise the SSD1306 display and clear the screen.
pub fn init<I2C>(i2c: I2C) -> Result<Display<I2C>, Error>
where
    I2C: embedded_hal::i2c::I2c,
{
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    display.init().map_err(|_| Error::Display)?;
    display.clear_buffer();
    display.flush().map_err(|_| Error::Display)?;
    Ok(display)
}

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}

/// Render the readout page.
pub fn draw_readout<I2C>(display: &mut Display<I2C>, view: &StatusView) -> Result<(), Error>
where
    I2C: embedded_hal::i2c::I2c,
{
    let lines = view.lines()?;
    display.clear_buffer();
    for (row, line) in lines.iter().enumerate() {
        let y = 10 + (row as i32 * 14);
        let _ = Text::new(line.as_str(), Point::new(0, y), text_style()).draw(display);
    }
    display.flush().map_err(|_| Error::Display)
}

/// Render the title page.
pub fn draw_title<I2C>(display: &mut Display<I2C>) -> Result<(), Error>
where
    I2C: embedded_hal::i2c::I2c,
{
    display.clear_buffer();
    let _ = Text::new(TITLE, Point::new(0, 24), text_style()).draw(display);
    let _ = Text::new("press A+B to return", Point::new(0, 44), text_style()).draw(display);
    display.flush().map_err(|_| Error::Display)
}

#[embassy_executor::task]
pub async fn display_task(i2c: Twim<'static, TWISPI0>, state: &'static RemoteState) {
    let mut display = match init(i2c) {
        Ok(display) => display,
        Err(e) => {
            warn!("display: init failed: {}", e);
            return;
        }
    };

    let mut toggle = PageToggle::new();
    let mut contrast = None;
    let mut shown: Option<(Page, Option<StatusView>)> = None;
    let mut ticker = Ticker::every(Duration::from_millis(DISPLAY_REFRESH_MS));

    loop {
        if toggle.update(state.both_pressed()) {
            info!("display: page {}", toggle.page());
        }

        let level = contrast_for(state.levels().distance);
        if contrast != Some(level) {
            if display.set_brightness(Brightness::custom(1, level)).is_err() {
                warn!("display: contrast update failed");
            }
            contrast = Some(level);
        }

        let content = match toggle.page() {
            Page::Readout => (Page::Readout, Some(StatusView::capture(state))),
            Page::Title => (Page::Title, None),
        };
        if shown != Some(content) {
            let drawn = match &content.1 {
                Some(view) => draw_readout(&mut display, view),
                None => draw_title(&mut display),
            };
            match drawn {
                Ok(()) => shown = Some(content),
                Err(e) => warn!("display: draw failed: {}", e),
            }
        }

        ticker.next().await;
    }
}
