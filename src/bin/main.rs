#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]

use core::net::Ipv4Addr;

use alloc::format;
use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_net::{tcp::TcpSocket, Config, DhcpConfig, Runner, Stack, StackResources};
use embassy_sync::{blocking_mutex::raw::NoopRawMutex, channel::Channel};
use embassy_time::{Duration, Timer};
use embedded_io_async::Write;
use esp_hal::{
    clock::CpuClock,
    delay::Delay,
    gpio::{Level, Output, OutputConfig},
    i2c::master::{Config as I2cConfig, I2c},
    time::Rate,
    timer::{systimer::SystemTimer, timg::TimerGroup},
    Blocking,
};
use esp_wifi::{
    wifi::{ClientConfiguration, Configuration, WifiController, WifiDevice, WifiEvent},
    EspWifiController,
};
use tinymqtt::MqttClient;
use tsl2561::{
    Gain, IntegrationTime, Package, RawReading, Tsl2561, ADDRESS_GND, ADDRESS_VDD,
    DEFAULT_ADDRESS,
};
use {esp_backtrace as _, esp_println as _};

extern crate alloc;

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

const SSID: &str = env!("SSID");
const PASSWORD: &str = env!("PASSWORD");
const HOSTNAME: &str = env!("HOSTNAME");
const MQTT_CLIENT_ID: &str = env!("MQTT_CLIENT_ID");
const MQTT_BROKER: &str = env!("MQTT_BROKER");
const MQTT_PORT: &str = env!("MQTT_PORT");
const MQTT_TOPIC: &str = env!("MQTT_TOPIC");

// ADDR SEL wiring: "gnd", "vdd", anything else is floating.
const SENSOR_ADDRESS: u8 = match option_env!("TSL2561_ADDRESS") {
    Some(sel) => match sel.as_bytes() {
        b"gnd" => ADDRESS_GND,
        b"vdd" => ADDRESS_VDD,
        _ => DEFAULT_ADDRESS,
    },
    None => DEFAULT_ADDRESS,
};

const SENSOR_PACKAGE: Package = match option_env!("TSL2561_PACKAGE") {
    Some(package) => match package.as_bytes() {
        b"cs" => Package::Cs,
        _ => Package::Standard,
    },
    None => Package::Standard,
};

macro_rules! mk_static {
    ($t:ty,$val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        #[deny(unused_attributes)]
        let x = STATIC_CELL.uninit().write(($val));
        x
    }};
}

struct Sample {
    raw: RawReading,
    gain: Gain,
    /// `None` when the reading was saturated.
    lux: Option<f64>,
}

type SampleChannel = Channel<NoopRawMutex, Sample, 1>;

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(size: 64 * 1024);

    let timer0 = SystemTimer::new(peripherals.SYSTIMER);
    esp_hal_embassy::init(timer0.alarm0);

    info!("Embassy initialized!");

    let mut rng = esp_hal::rng::Rng::new(peripherals.RNG);
    let timer1 = TimerGroup::new(peripherals.TIMG0);
    let wifi_init = &*mk_static!(
        EspWifiController<'static>,
        esp_wifi::init(timer1.timer0, rng, peripherals.RADIO_CLK)
            .expect("Failed to initialize WIFI controller")
    );
    let (wifi_controller, wifi_interfaces) = esp_wifi::wifi::new(wifi_init, peripherals.WIFI)
        .expect("Failed to initialize WIFI controller");

    let wifi_device: WifiDevice<'_> = wifi_interfaces.sta;
    let mut dhcp_config = DhcpConfig::default();
    dhcp_config.hostname =
        Some(heapless::String::try_from(HOSTNAME).expect("Hostname is too long"));
    let wifi_config = Config::dhcpv4(dhcp_config);
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;
    let (sta_stack, sta_runner) = embassy_net::new(
        wifi_device,
        wifi_config,
        mk_static!(StackResources<4>, StackResources::<4>::new()),
        seed,
    );

    let sample_channel = &*mk_static!(SampleChannel, Channel::new());

    spawner.spawn(connection(wifi_controller)).ok();
    spawner.spawn(net_task(sta_runner)).ok();

    while !sta_stack.is_link_up() {
        info!("=> Connecting...");
        Timer::after(Duration::from_millis(500)).await;
    }
    Timer::after(Duration::from_millis(500)).await;

    // Blinky LED every 500ms
    let led = Output::new(peripherals.GPIO8, Level::High, OutputConfig::default());
    spawner.spawn(toggle(led)).ok();

    let i2c = I2c::new(
        peripherals.I2C0,
        I2cConfig::default().with_frequency(Rate::from_khz(100)),
    )
    .expect("Failed to initialize I2C0")
    .with_sda(peripherals.GPIO4)
    .with_scl(peripherals.GPIO5);
    spawner.spawn(lux_task(i2c, sample_channel)).ok();

    spawner.spawn(mqtt_task(sta_stack, sample_channel)).ok();
}

#[embassy_executor::task]
async fn connection(mut controller: WifiController<'static>) {
    info!("Wifi starting...");
    loop {
        let client_config = Configuration::Client(ClientConfiguration {
            ssid: SSID.into(),
            password: PASSWORD.into(),
            auth_method: esp_wifi::wifi::AuthMethod::WPAWPA2Personal,
            ..Default::default()
        });
        match controller.set_configuration(&client_config) {
            Ok(_) => info!("Set_configuration successful"),
            Err(e) => info!("Set_configuration unsuccessful: {:?}", e),
        };
        match controller.set_mode(esp_wifi::wifi::WifiMode::Sta) {
            Ok(_) => info!("Set_wifi_mode successful"),
            Err(e) => info!("Set_wifi_mode unsuccessful: {:?}", e),
        }
        match controller.start_async().await {
            Ok(_) => info!("Start_wifi successful"),
            Err(e) => info!("Start_wifi unsuccessful: {:?}", e),
        }

        match controller.connect_async().await {
            Ok(_) => {
                info!("Connection successful");
                controller.wait_for_event(WifiEvent::StaDisconnected).await;
                info!("Disconnected...");
            }
            Err(e) => {
                info!("Connection unsuccessful: {:?}", e);
                Timer::after(Duration::from_secs(1)).await;
            }
        }
    }
}

#[embassy_executor::task]
async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await;
}

#[embassy_executor::task]
async fn toggle(mut led: Output<'static>) {
    loop {
        led.toggle();
        Timer::after(Duration::from_millis(500)).await;
    }
}

#[embassy_executor::task]
async fn lux_task(i2c: I2c<'static, Blocking>, sample_channel: &'static SampleChannel) {
    let mut tsl = match Tsl2561::new(i2c, Delay::new(), SENSOR_ADDRESS, SENSOR_PACKAGE) {
        Ok(tsl) => tsl,
        Err(e) => {
            warn!("TSL2561 init failed: {}", e);
            return;
        }
    };
    if let Err(e) = tsl.set_integration_time(IntegrationTime::Medium) {
        warn!("TSL2561 configuration failed: {}", e);
    }
    // Stay powered down between samples; every read powers up and waits for a conversion.
    if let Err(e) = tsl.set_active(false) {
        warn!("TSL2561 power down failed: {}", e);
    }

    loop {
        // Each read from power-down blocks for the 120ms settle time, and an autogain
        // switch reads twice, so this executor stalls for up to 240ms.
        match tsl.read_channels(true) {
            Ok(raw) => {
                let sample = Sample {
                    raw,
                    gain: tsl.gain(),
                    lux: tsl.lux(raw).ok(),
                };
                sample_channel.try_send(sample).ok();
            }
            Err(e) => info!("TSL2561 read error: {}", e),
        }
        Timer::after(Duration::from_secs(1)).await;
    }
}

#[embassy_executor::task]
async fn mqtt_task(stack: Stack<'static>, sample_channel: &'static SampleChannel) {
    let mut rx_buffer = [0u8; 1024];
    let mut tx_buffer = [0u8; 1024];
    let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
    let remote_endpoint = (
        MQTT_BROKER
            .parse::<Ipv4Addr>()
            .expect("MQTT_BROKER is not valid"),
        MQTT_PORT.parse::<u16>().expect("MQTT_PORT is not valid"),
    );
    while socket.connect(remote_endpoint).await.is_err() {
        info!("Failed to connect to MQTT broker, retrying...");
        Timer::after(Duration::from_secs(1)).await;
    }
    socket.set_keep_alive(Some(Duration::from_secs(5)));

    let mut mqtt_client: MqttClient<1024> = MqttClient::new();
    let connect = match mqtt_client.connect(MQTT_CLIENT_ID, None) {
        Ok(packet) => packet,
        Err(e) => {
            warn!("MQTT connect packet: {}", format!("{:?}", e).as_str());
            return;
        }
    };
    if let Err(e) = socket.write_all(connect).await {
        info!("Err: {:?}", e);
        return;
    }
    socket.flush().await.ok();

    let mut response_buf = [0u8; 1024];
    match socket.read(&mut response_buf).await {
        Ok(size) => {
            info!("Read {} bytes from socket", size);
            match mqtt_client.receive_packet(&response_buf[..size], |_, _, _| {}) {
                Ok(_) => info!("MQTT client connected successfully"),
                Err(e) => info!(
                    "Failed to connect MQTT client: {}",
                    format!("{:?}", e).as_str()
                ),
            }
        }
        Err(e) => {
            info!("Failed to read from socket: {:?}", e);
            return;
        }
    }

    loop {
        let sample = sample_channel.receive().await;
        let lux = match sample.lux {
            Some(lux) => format!("{:.2}", lux),
            None => "null".into(),
        };
        let payload = format!(
            "{{\"sensor_id\": \"{}\", \"lux\": {}, \"broadband\": {}, \"ir\": {}, \"gain\": {}}}",
            MQTT_CLIENT_ID,
            lux,
            sample.raw.broadband,
            sample.raw.ir,
            sample.gain.factor()
        );
        match mqtt_client.publish(MQTT_TOPIC, payload.as_bytes()) {
            Ok(packet) => match socket.write_all(packet).await {
                Ok(()) => {
                    info!("Published {} bytes", packet.len());
                    socket.flush().await.ok();
                }
                Err(e) => info!("Err: {:?}", e),
            },
            Err(e) => info!("Publishing error: {}", format!("{:?}", e).as_str()),
        }
    }
}
