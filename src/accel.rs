//! Accelerometer device constants and sample decoding.
//!
//! Every accelerometer-bearing port talks to the same device type (an
//! ADXL345-class part) behind the bus multiplexer. This module holds the
//! register map the init sequence writes, the burst-read start register,
//! and the little-endian vector decoding. The interrupt-safe transaction
//! sequences themselves live on [`PortCore`](crate::port::PortCore), since
//! they need the port's bus select code.

/// I2C device address of the accelerometer.
pub const ACCEL_ADDR: u8 = 0x53;

/// Activity threshold register.
pub const REG_THRESH_ACT: u8 = 0x24;
/// Activity threshold value written at init.
pub const THRESH_ACT_VAL: u8 = 0x20;

/// Bandwidth / output-rate register.
pub const REG_BW_RATE: u8 = 0x2C;
/// Bandwidth value written at init (100 Hz output rate).
pub const BW_RATE_VAL: u8 = 0x0A;

/// Power control register.
pub const REG_POWER_CTL: u8 = 0x2D;
/// Power control: sleep bit.
pub const POWER_CTL_SLEEP: u8 = 0x04;
/// Power control: measurement-enable bit.
pub const POWER_CTL_MEASURE: u8 = 0x08;

/// Interrupt enable register.
pub const REG_INT_ENABLE: u8 = 0x2E;
/// Interrupt enable value: all sources disabled.
pub const INT_DISABLE_ALL: u8 = 0x00;

/// Data format register.
pub const REG_DATA_FORMAT: u8 = 0x31;
/// Data format value written at init (full resolution, widest range).
pub const DATA_FORMAT_VAL: u8 = 0x0B;

/// FIFO control register.
pub const REG_FIFO_CTL: u8 = 0x38;
/// FIFO control value written at init (bypass mode).
pub const FIFO_BYPASS: u8 = 0x00;

/// First register of the 6-byte X/Y/Z burst read.
pub const REG_DATA_START: u8 = 0x32;

/// Length of one triaxial burst read in bytes.
pub const VECTOR_LEN: usize = 6;

/// Minimum byte count accepted as a good transfer.
///
/// Short transfers of 5 bytes still reconstruct x, y, and half of z and are
/// accepted; this leniency is a deliberate hardware workaround carried over
/// from the original board bring-up. Anything shorter is a failed read.
pub const MIN_VECTOR_BYTES: usize = 5;

/// One decoded triaxial sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccelReading {
    /// X axis, raw signed counts.
    pub x: i16,
    /// Y axis, raw signed counts.
    pub y: i16,
    /// Z axis, raw signed counts.
    pub z: i16,
}

/// Decode a raw burst buffer into axis values.
///
/// Each axis is a little-endian signed 16-bit pair:
///
/// ```rust
/// use portmux::accel::decode_vector;
///
/// let reading = decode_vector(&[0x34, 0x12, 0x78, 0x56, 0xAB, 0xCD]);
/// assert_eq!(reading.x, 0x1234);
/// assert_eq!(reading.y, 0x5678);
/// assert_eq!(reading.z, 0xCDABu16 as i16);
/// ```
pub fn decode_vector(buf: &[u8; VECTOR_LEN]) -> AccelReading {
    AccelReading {
        x: i16::from_le_bytes([buf[0], buf[1]]),
        y: i16::from_le_bytes([buf[2], buf[3]]),
        z: i16::from_le_bytes([buf[4], buf[5]]),
    }
}

/// The init-time register write sequence, in on-wire order.
///
/// The doubled bandwidth write is intentional; the part needs the repeat to
/// settle after power-up.
pub const INIT_SEQUENCE: [(u8, u8); 7] = [
    (REG_THRESH_ACT, THRESH_ACT_VAL),
    (REG_BW_RATE, BW_RATE_VAL),
    (REG_BW_RATE, BW_RATE_VAL),
    (REG_POWER_CTL, POWER_CTL_SLEEP | POWER_CTL_MEASURE),
    (REG_INT_ENABLE, INT_DISABLE_ALL),
    (REG_DATA_FORMAT, DATA_FORMAT_VAL),
    (REG_FIFO_CTL, FIFO_BYPASS),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_is_little_endian_per_axis() {
        let reading = decode_vector(&[0x34, 0x12, 0x78, 0x56, 0xAB, 0xCD]);
        assert_eq!(reading.x, 0x1234);
        assert_eq!(reading.y, 0x5678);
        assert_eq!(reading.z, 0xCDABu16 as i16);
    }

    #[test]
    fn decode_preserves_sign() {
        let reading = decode_vector(&[0xFF, 0xFF, 0x00, 0x80, 0x01, 0x00]);
        assert_eq!(reading.x, -1);
        assert_eq!(reading.y, i16::MIN);
        assert_eq!(reading.z, 1);
    }

    #[test]
    fn init_sequence_writes_bandwidth_twice() {
        let bw_writes = INIT_SEQUENCE
            .iter()
            .filter(|(reg, _)| *reg == REG_BW_RATE)
            .count();
        assert_eq!(bw_writes, 2);
    }
}
