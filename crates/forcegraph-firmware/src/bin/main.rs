#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use embassy_executor::Spawner;
use embassy_time::{Duration, Instant, Timer};
use esp_hal::clock::CpuClock;
use esp_hal::delay::Delay;
use esp_hal::gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull};
use esp_hal::timer::timg::TimerGroup;
use esp_storage::FlashStorage;
use log::{error, info};

// Display-LCD panel specific imports
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::spi::master::{Config as SpiConfig, Spi};
use mipidsi::interface::SpiInterface;
use mipidsi::{Builder as MipidsiBuilder, models::ILI9342CRgb565};

use forcegraph_core::chart::DisplaySurface;
use forcegraph_core::config::{Config, WINDOW_CAPACITY};
use forcegraph_core::controller::Controller;
use forcegraph_core::storage::CalibrationStore;
use forcegraph_firmware::button::PushButton;
use forcegraph_firmware::flash_region::EspFlashRegion;
use forcegraph_firmware::load_cell::LoadCellSensor;

const DISPLAY_WIDTH: u16 = 320;
const DISPLAY_HEIGHT: u16 = 240;

/// Pause between loop iterations; short enough for clean button sampling
const LOOP_PERIOD_MS: u64 = 5;

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    rtt_target::rprintln!("PANIC: {}", info);
    loop {}
}

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

#[allow(
    clippy::large_stack_frames,
    reason = "it's not unusual to allocate larger buffers etc. in main"
)]
#[esp_rtos::main]
async fn main(_spawner: Spawner) -> ! {
    rtt_target::rtt_init_log!();

    let hal_config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(hal_config);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    info!("Embassy initialized!");

    // Configure and initialize the display

    // 1. Configure SPI bus
    let spi_bus = Spi::new(peripherals.SPI2, SpiConfig::default())
        .expect("Failed to configure SPI bus")
        .with_sck(peripherals.GPIO36)
        .with_mosi(peripherals.GPIO37);

    // 2. Create a dummy CS pin (we don't use hardware CS for this display)
    let cs = Output::new(peripherals.GPIO35, Level::High, OutputConfig::default());

    // 3. Wrap the SPI bus as a SPI device (required by embedded-hal traits)
    let spi_device = ExclusiveDevice::new_no_delay(spi_bus, cs).expect("Failed to create SPI device");

    // 4. Set up DC (Data/Command) pin
    let dc = Output::new(peripherals.GPIO34, Level::Low, OutputConfig::default());

    // 5. Create a buffer for SPI batching (larger = faster, uses more RAM)
    let mut spi_buffer = [0u8; 64];

    // 6. Create display interface
    let di = SpiInterface::new(spi_device, dc, &mut spi_buffer);

    // 7. Build and initialize the display driver
    let display = MipidsiBuilder::new(ILI9342CRgb565, di)
        .display_size(DISPLAY_WIDTH, DISPLAY_HEIGHT)
        .init(&mut embassy_time::Delay)
        .expect("Failed to initialize display");
    let mut surface = DisplaySurface::new(display);

    info!("Display initialized!");

    // HX711 on Port A: DT on GPIO1, SCK on GPIO2
    let hx711_sck = Output::new(peripherals.GPIO2, Level::Low, OutputConfig::default());
    let hx711_dt = Input::new(peripherals.GPIO1, InputConfig::default());
    let mut sensor = LoadCellSensor::new(hx711_sck, hx711_dt, Delay::new());

    let config = Config::default();

    // BOOT button, active low
    let button_pin = Input::new(peripherals.GPIO0, InputConfig::default().with_pull(Pull::Up));
    let mut button = PushButton::new(button_pin, config.button);

    let flash = EspFlashRegion::new(FlashStorage::new(peripherals.FLASH));
    let mut store = CalibrationStore::new(flash, config.store.default_calibration);

    let mut controller = Controller::<WINDOW_CAPACITY>::new(config);
    if let Err(e) = controller.startup(now_ms(), &mut sensor, &mut store, &mut surface) {
        error!("Startup failed: {}", e);
    }
    info!(
        "Running with calibration constant {}",
        controller.calibration_constant()
    );

    loop {
        if let Err(e) = controller.tick(now_ms(), &mut sensor, &mut button, &mut store, &mut surface) {
            error!("{}", e);
        }
        Timer::after(Duration::from_millis(LOOP_PERIOD_MS)).await;
    }
}
