#![no_std]
#![no_main]

use defmt::{debug, error, info, unwrap, Debug2Format};
use defmt_rtt as _;
use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_rp::bind_interrupts;
use embassy_rp::i2c::{self, Async, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Ticker};
use heapless::Vec;
use static_cell::StaticCell;
use untztrument::board::{apply_display_settings, blink_rate};
use untztrument::config::{
    ENCODER_COUNT, ENCODER_PIN_COUNT, ENCODER_PULL_UP, ENCODER_SETUP, I2C_FREQUENCY_HZ,
    MODULE_ADDRESSES, POLL_PERIOD_US, SCAN_PERIOD_MS,
};
use untztrument::{init_grid, Encoder, EncoderManager, EncoderValues, SioPort, TrellisGrid};

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

type I2cBus = Mutex<CriticalSectionRawMutex, I2c<'static, I2C0, Async>>;
type BusDevice = I2cDevice<'static, CriticalSectionRawMutex, I2c<'static, I2C0, Async>>;

/// Shared I2C bus; every Trellis module gets its own device handle.
static I2C_BUS: StaticCell<I2cBus> = StaticCell::new();

/// Encoder values published by the encoder task.
static ENCODER_VALUES: EncoderValues<ENCODER_COUNT> = EncoderValues::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("UNTZtrument starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- Encoder Setup ---
    let mut port: SioPort<'static, ENCODER_PIN_COUNT> = SioPort::new();
    let pins = [
        (unwrap!(port.attach(p.PIN_10)), unwrap!(port.attach(p.PIN_11))),
        (unwrap!(port.attach(p.PIN_12)), unwrap!(port.attach(p.PIN_13))),
        (unwrap!(port.attach(p.PIN_14)), unwrap!(port.attach(p.PIN_15))),
        (unwrap!(port.attach(p.PIN_16)), unwrap!(port.attach(p.PIN_17))),
    ];

    let mut encoders: EncoderManager<u8, ENCODER_COUNT> = EncoderManager::new();
    for ((a, b), (lo, hi, wrap, value)) in pins.into_iter().zip(ENCODER_SETUP) {
        let id = unwrap!(encoders.register(Encoder::new(a, b, ENCODER_PULL_UP)));
        // Bounds first, then value, so the value is clipped to the new range.
        unwrap!(encoders.set_bounds(id, lo, hi, wrap));
        unwrap!(encoders.set_value(id, value));
    }

    // --- I2C Setup ---
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2C_FREQUENCY_HZ;
    let i2c = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c_config);
    let bus = I2C_BUS.init(Mutex::new(i2c));

    spawner.spawn(encoder_task(encoders, port).unwrap());
    spawner.spawn(grid_task(bus).unwrap());

    info!("UNTZtrument initialized");
}

/// Encoder task - configures pins once, then polls on a fixed period.
#[embassy_executor::task]
async fn encoder_task(
    mut encoders: EncoderManager<u8, ENCODER_COUNT>,
    mut port: SioPort<'static, ENCODER_PIN_COUNT>,
) {
    encoders.begin(&mut port);
    ENCODER_VALUES.publish(&encoders);
    info!("Polling {} encoders", encoders.len());

    let mut ticker = Ticker::every(Duration::from_micros(POLL_PERIOD_US));
    loop {
        ticker.next().await;
        if encoders.poll(&mut port) {
            ENCODER_VALUES.publish(&encoders);
        }
    }
}

/// Grid task - scans keys, toggles LEDs and follows encoder changes.
#[embassy_executor::task]
async fn grid_task(bus: &'static I2cBus) {
    let modules = MODULE_ADDRESSES
        .iter()
        .map(|&address| (I2cDevice::new(bus), address));
    let mut grid: TrellisGrid<BusDevice> = match init_grid(modules).await {
        Ok(grid) => grid,
        Err(e) => {
            error!("Grid layout error: {:?}", e);
            return;
        }
    };

    let mut ticker = Ticker::every(Duration::from_millis(SCAN_PERIOD_MS));
    loop {
        match select(ticker.next(), ENCODER_VALUES.wait()).await {
            Either::First(()) => scan(&mut grid).await,
            Either::Second(()) => {
                let values = ENCODER_VALUES.snapshot();
                debug!("Encoders: {}", values);
                apply_display_settings(&mut grid, values[0], blink_rate(values[1])).await;
            }
        }
    }
}

/// Read the keys once and toggle the LED under every new press.
async fn scan(grid: &mut TrellisGrid<BusDevice>) {
    match grid.read_switches().await {
        Ok(true) => {}
        Ok(false) => return,
        Err(e) => {
            error!("Key scan failed: {}", Debug2Format(&e));
            return;
        }
    }

    let pressed: Vec<u8, 128> = grid.pressed_keys().collect();
    for index in pressed {
        let on = grid.toggle_led(index);
        let (x, y) = grid.index_to_xy(index);
        debug!("Key {} at ({}, {}) -> LED {}", index, x, y, on);
    }

    if let Err(e) = grid.write_display().await {
        error!("Display update failed: {}", Debug2Format(&e));
    }
}
