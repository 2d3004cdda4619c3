//! # Native Transport
//!
//! Serial port access for Linux, macOS and Windows through `serialport`.
//!
//! [`NativeSerialTransport`] implements the poll-style [`Transport`] seam:
//! reads never wait for data, they return what the OS has buffered.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

use std::io::{self, Read, Write};

use bridge_runtime::{bridge_debug, bridge_warn};
use core_types::{ParityMode, SerialConfig, Transport, TransportError};
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, SerialPortType, StopBits};

/// `serialport`-backed transport holding at most one open handle.
#[derive(Default)]
pub struct NativeSerialTransport {
    port: Option<Box<dyn SerialPort>>,
    port_name: Option<String>,
}

impl NativeSerialTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

fn io_error(port_name: Option<&str>, err: impl std::fmt::Display) -> TransportError {
    TransportError::Io(format!("{} on {}", err, port_name.unwrap_or("<closed>")))
}

impl Transport for NativeSerialTransport {
    fn open(&mut self, config: &SerialConfig) -> Result<(), TransportError> {
        self.close();

        let unavailable = |reason: String| TransportError::Unavailable {
            port: config.port.clone(),
            reason,
        };

        let name = normalize_port_name(&config.port);
        let port = serialport::new(&name, config.baud_rate)
            .data_bits(data_bits(config.data_bits).map_err(unavailable)?)
            .parity(parity(config.parity))
            .stop_bits(stop_bits(config.stop_bits).map_err(unavailable)?)
            .flow_control(FlowControl::None)
            .timeout(config.timeout())
            .open()
            .map_err(|e| unavailable(e.to_string()))?;

        // Bytes queued while we were disconnected belong to requests nobody is waiting on.
        if let Err(e) = port.clear(ClearBuffer::Input) {
            bridge_warn!("NativeSerialTransport: could not clear input on {}: {}", name, e);
        }

        bridge_debug!(
            "NativeSerialTransport: opened {} @ {} baud",
            name,
            config.baud_rate
        );
        self.port = Some(port);
        self.port_name = Some(name);
        Ok(())
    }

    fn close(&mut self) {
        if self.port.take().is_some() {
            bridge_debug!(
                "NativeSerialTransport: closed {}",
                self.port_name.as_deref().unwrap_or("<unknown>")
            );
        }
        self.port_name = None;
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn read_available(&mut self) -> Result<Vec<u8>, TransportError> {
        let port_name = self.port_name.as_deref();
        let Some(port) = self.port.as_mut() else {
            return Err(TransportError::NotConnected);
        };

        let pending = match port.bytes_to_read() {
            Ok(n) => n as usize,
            Err(e) => return Err(io_error(port_name, e)),
        };
        if pending == 0 {
            return Ok(Vec::new());
        }

        let mut buf = vec![0u8; pending];
        match port.read(&mut buf) {
            Ok(n) => {
                buf.truncate(n);
                Ok(buf)
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(Vec::new()),
            Err(e) => Err(io_error(port_name, e)),
        }
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let port_name = self.port_name.as_deref();
        let Some(port) = self.port.as_mut() else {
            return Err(TransportError::NotConnected);
        };

        let result = port.write_all(data).and_then(|()| port.flush());
        result.map_err(|e| io_error(port_name, e))
    }
}

fn data_bits(bits: u8) -> Result<DataBits, String> {
    match bits {
        5 => Ok(DataBits::Five),
        6 => Ok(DataBits::Six),
        7 => Ok(DataBits::Seven),
        8 => Ok(DataBits::Eight),
        other => Err(format!("Invalid data bits '{}': must be 5-8", other)),
    }
}

fn stop_bits(bits: u8) -> Result<StopBits, String> {
    match bits {
        1 => Ok(StopBits::One),
        2 => Ok(StopBits::Two),
        other => Err(format!("Invalid stop bits '{}': must be 1 or 2", other)),
    }
}

fn parity(mode: ParityMode) -> Parity {
    match mode {
        ParityMode::None => Parity::None,
        ParityMode::Even => Parity::Even,
        ParityMode::Odd => Parity::Odd,
    }
}

/// On Windows, COM ports >= 10 need the `\\.\COMxx` form.
pub fn normalize_port_name(name: &str) -> String {
    if cfg!(target_os = "windows") {
        windows_device_path(name)
    } else {
        name.to_string()
    }
}

fn windows_device_path(name: &str) -> String {
    let needs_prefix = name
        .strip_prefix("COM")
        .and_then(|n| n.parse::<u32>().ok())
        .is_some_and(|n| n >= 10);
    if needs_prefix {
        format!(r"\\.\{}", name)
    } else {
        name.to_string()
    }
}

/// A serial port visible to the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSummary {
    pub name: String,
    pub description: String,
}

/// Enumerate serial ports, describing USB devices by VID/PID and product.
pub fn list_ports() -> Result<Vec<PortSummary>, TransportError> {
    let ports = serialport::available_ports().map_err(|e| TransportError::Unavailable {
        port: "<enumeration>".into(),
        reason: e.to_string(),
    })?;

    Ok(ports
        .into_iter()
        .map(|port| PortSummary {
            description: describe_port_type(&port.port_type),
            name: port.port_name,
        })
        .collect())
}

fn describe_port_type(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(info) => {
            let mut desc = format!("USB (VID: 0x{:04x}, PID: 0x{:04x})", info.vid, info.pid);
            if let Some(product) = &info.product {
                desc.push_str(", ");
                desc.push_str(product);
            }
            if let Some(manufacturer) = &info.manufacturer {
                desc.push_str(" by ");
                desc.push_str(manufacturer);
            }
            desc
        }
        SerialPortType::BluetoothPort => "Bluetooth".into(),
        SerialPortType::PciPort => "PCI".into(),
        SerialPortType::Unknown => "Unknown".into(),
    }
}
