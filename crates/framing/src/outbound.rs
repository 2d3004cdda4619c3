use core_types::WeatherRecord;

/// Terminator appended to every line written to the MCU.
pub const FRAME_TERMINATOR: &str = "\r\n";

/// Field separator of the success frame.
pub const FIELD_DELIMITER: &str = "|";

/// Number of fields the MCU parser expects in a success frame.
pub const FIELD_COUNT: usize = 6;

/// Sent instead of a weather frame whenever fetch, persist or format fails.
/// It contains no delimiter, so the MCU's six-field parser rejects it.
pub const FALLBACK_FRAME: &str = "ERROR:获取天气数据失败";

/// A formatted weather response, without the line terminator.
///
/// Field order is positional and fixed:
/// `record_time|temp|feels_like|precip|icon|humidity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundFrame {
    line: String,
}

impl OutboundFrame {
    pub fn from_record(record: &WeatherRecord) -> Self {
        let fields: [&str; FIELD_COUNT] = [
            &record.record_time,
            &record.temp,
            &record.feels_like,
            &record.precip,
            &record.icon,
            &record.humidity,
        ];
        Self {
            line: fields.join(FIELD_DELIMITER),
        }
    }

    /// The frame body as written before the terminator.
    pub fn as_line(&self) -> &str {
        &self.line
    }

    /// Bytes as they appear on the wire, terminator included.
    pub fn to_wire_bytes(&self) -> Vec<u8> {
        encode_line(&self.line)
    }
}

/// Append the frame terminator to `line` and return the wire bytes.
pub fn encode_line(line: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(line.len() + FRAME_TERMINATOR.len());
    bytes.extend_from_slice(line.as_bytes());
    bytes.extend_from_slice(FRAME_TERMINATOR.as_bytes());
    bytes
}
