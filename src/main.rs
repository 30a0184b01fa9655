//! steer-remote firmware entry point (nRF52840).
//!
//! Brings up the peripherals, then hands each one to its task. All
//! behaviour lives in the `steer_remote` library and `tasks/`.

#![no_std]
#![no_main]

mod tasks;

use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::{bind_interrupts, peripherals, saadc, twim, uarte};
use embassy_sync::mutex::Mutex;
use static_cell::StaticCell;
use steer_remote::gesture::GestureBuffer;
use steer_remote::state::{AnalogChannel, EncoderSide, RemoteState};
use {defmt_rtt as _, panic_probe as _};

use tasks::analog::{analog_task, SaadcChannel, SharedAdc};
use tasks::display::display_task;
use tasks::encoder::{encoder_task, EncoderPins};
use tasks::heartbeat::heartbeat_task;
use tasks::serial::{rx_task, tx_task};
use tasks::Gestures;

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    UARTE0_UART0 => uarte::InterruptHandler<peripherals::UARTE0>;
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

static STATE: RemoteState = RemoteState::new();
static GESTURES: Gestures = GestureBuffer::new();
static ADC: StaticCell<SharedAdc> = StaticCell::new();
static OPAMP_LOW_POWER: StaticCell<Output<'static>> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("steer-remote starting");

    // Op-amp stays in normal-power mode for the life of the firmware.
    OPAMP_LOW_POWER.init(Output::new(p.P0_15, Level::Low, OutputDrive::Standard));

    // SAADC: volume, distance, battery (scan order matches `adc_slot`).
    let mut adc = saadc::Saadc::new(
        p.SAADC,
        Irqs,
        saadc::Config::default(),
        [
            saadc::ChannelConfig::single_ended(p.P0_02),
            saadc::ChannelConfig::single_ended(p.P0_03),
            saadc::ChannelConfig::single_ended(p.P0_04),
        ],
    );
    adc.calibrate().await;
    let adc: &'static SharedAdc = ADC.init(Mutex::new(adc));

    // Controller link.
    let mut uart_config = uarte::Config::default();
    uart_config.parity = uarte::Parity::EXCLUDED;
    uart_config.baudrate = uarte::Baudrate::BAUD115200;
    let uart = uarte::Uarte::new(p.UARTE0, Irqs, p.P0_08, p.P0_06, uart_config);
    let (tx, rx) = uart.split_with_idle(p.TIMER0, p.PPI_CH0, p.PPI_CH1);

    // Status display.
    let mut i2c_config = twim::Config::default();
    i2c_config.frequency = twim::Frequency::K400;
    let i2c = twim::Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, i2c_config);

    let encoder_a = EncoderPins {
        cha: Input::new(p.P1_01, Pull::Up),
        chb: Input::new(p.P1_02, Pull::Up),
        switch: Input::new(p.P1_03, Pull::Up),
    };
    let encoder_b = EncoderPins {
        cha: Input::new(p.P1_04, Pull::Up),
        chb: Input::new(p.P1_05, Pull::Up),
        switch: Input::new(p.P1_06, Pull::Up),
    };

    let heartbeat = Output::new(p.P0_13, Level::Low, OutputDrive::Standard);
    let low_battery = Output::new(p.P0_14, Level::Low, OutputDrive::Standard);

    for channel in [AnalogChannel::Volume, AnalogChannel::Distance, AnalogChannel::Battery] {
        unwrap!(spawner.spawn(analog_task(channel, SaadcChannel::new(adc, channel), &STATE)));
    }
    unwrap!(spawner.spawn(encoder_task(EncoderSide::A, encoder_a, &STATE, &GESTURES)));
    unwrap!(spawner.spawn(encoder_task(EncoderSide::B, encoder_b, &STATE, &GESTURES)));
    unwrap!(spawner.spawn(tx_task(tx, &STATE)));
    unwrap!(spawner.spawn(rx_task(rx)));
    unwrap!(spawner.spawn(display_task(i2c, &STATE)));
    unwrap!(spawner.spawn(heartbeat_task(heartbeat, low_battery, &STATE)));

    info!("steer-remote running");
}
