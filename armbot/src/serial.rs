//! # Serial output
//!
//! Line oriented text output over a transport supplied by the host. Every value written becomes
//! exactly one line.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::{fmt, io};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A transport which accepts lines of text.
pub trait TextSink {
    /// Open the transport at the given baud rate.
    fn begin(&mut self, baud_rate: u32);

    /// Emit one line. The sink adds the line terminator.
    fn write_line(&mut self, text: &str);
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// [`TextSink`] over anything implementing [`std::io::Write`], e.g. stdout or a serial device
/// file.
pub struct WriteSink<W> {
    writer: W,
}

/// The serial port as seen by the arm.
pub struct SerialPort<S> {
    sink: S,
    baud_rate: Option<u32>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A value which can be written to the serial port.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum SerialValue {
    Text(String),
    Integer(i64),
    Float(f32),
    Bool(bool),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl fmt::Display for SerialValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerialValue::Text(s) => f.write_str(s),
            SerialValue::Integer(i) => write!(f, "{}", i),
            // Two decimal places, as microcontroller serial libraries print floats
            SerialValue::Float(x) if x.is_nan() => f.write_str("nan"),
            SerialValue::Float(x) if x.is_infinite() => {
                f.write_str(if *x > 0.0 { "inf" } else { "-inf" })
            }
            SerialValue::Float(x) => write!(f, "{:.2}", x),
            SerialValue::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
        }
    }
}

impl From<&str> for SerialValue {
    fn from(s: &str) -> Self {
        SerialValue::Text(s.to_string())
    }
}

impl From<String> for SerialValue {
    fn from(s: String) -> Self {
        SerialValue::Text(s)
    }
}

impl From<i32> for SerialValue {
    fn from(i: i32) -> Self {
        SerialValue::Integer(i as i64)
    }
}

impl From<i64> for SerialValue {
    fn from(i: i64) -> Self {
        SerialValue::Integer(i)
    }
}

impl From<f32> for SerialValue {
    fn from(x: f32) -> Self {
        SerialValue::Float(x)
    }
}

impl From<bool> for SerialValue {
    fn from(b: bool) -> Self {
        SerialValue::Bool(b)
    }
}

impl<W> WriteSink<W>
where
    W: io::Write
{
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W> TextSink for WriteSink<W>
where
    W: io::Write
{
    fn begin(&mut self, baud_rate: u32) {
        debug!("Serial sink opened at {} baud", baud_rate);
    }

    fn write_line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.writer, "{}", text).and_then(|_| self.writer.flush()) {
            warn!("Couldn't write to serial sink: {}", e);
        }
    }
}

impl<S> SerialPort<S>
where
    S: TextSink
{
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            baud_rate: None,
        }
    }

    /// Open the port.
    pub fn start(&mut self, baud_rate: u32) {
        self.sink.begin(baud_rate);
        self.baud_rate = Some(baud_rate);
    }

    /// Baud rate the port was started with, if it has been.
    pub fn baud_rate(&self) -> Option<u32> {
        self.baud_rate
    }

    /// Format a value and write it as one line.
    pub fn write<V>(&mut self, value: V)
    where
        V: Into<SerialValue>
    {
        let line = value.into().to_string();
        self.sink.write_line(&line);
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_formatting() {
        assert_eq!(SerialValue::from(true).to_string(), "true");
        assert_eq!(SerialValue::from(false).to_string(), "false");
        assert_eq!(SerialValue::from(3.14f32).to_string(), "3.14");
        assert_eq!(SerialValue::from(-2.5f32).to_string(), "-2.50");
        assert_eq!(SerialValue::from(f32::NAN).to_string(), "nan");
        assert_eq!(SerialValue::from(-42).to_string(), "-42");
        assert_eq!(SerialValue::from(1i64 << 40).to_string(), "1099511627776");
        assert_eq!(SerialValue::from("hello").to_string(), "hello");
        assert_eq!(SerialValue::from(String::from("arm")).to_string(), "arm");
    }

    #[test]
    fn test_write_sink_one_line_per_value() {
        let mut port = SerialPort::new(WriteSink::new(Vec::new()));
        port.start(115200);
        port.write(true);
        port.write(3.14f32);
        port.write("done");

        assert_eq!(port.baud_rate(), Some(115200));
        assert_eq!(
            String::from_utf8(port.sink.writer.clone()).unwrap(),
            "true\n3.14\ndone\n"
        );
    }
}
