//! Bounded cursor and writer over raw HID report bytes

use crate::{HidCommonError, HidCommonResult};

/// Sequential little-endian reader over a borrowed report.
///
/// Every read checks the remaining length first and fails with
/// [`HidCommonError::Truncated`] instead of reading past the end.
#[derive(Debug, Clone)]
pub struct ReportParser<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> ReportParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            buffer: data,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    fn truncated(&self, wanted: usize) -> HidCommonError {
        HidCommonError::Truncated {
            offset: self.position,
            wanted,
            remaining: self.remaining(),
        }
    }

    fn take(&mut self, count: usize) -> HidCommonResult<&'a [u8]> {
        let bytes = self
            .buffer
            .get(self.position..)
            .and_then(|rest| rest.get(..count))
            .ok_or_else(|| self.truncated(count))?;
        self.position += count;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> HidCommonResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> HidCommonResult<u8> {
        let [value] = self.read_array()?;
        Ok(value)
    }

    pub fn read_u16_le(&mut self) -> HidCommonResult<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16_le(&mut self) -> HidCommonResult<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> HidCommonResult<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32_le(&mut self) -> HidCommonResult<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn peek_u8(&self) -> HidCommonResult<u8> {
        self.buffer
            .get(self.position)
            .copied()
            .ok_or_else(|| self.truncated(1))
    }

    /// Advance past `count` bytes; fails without moving if fewer remain.
    pub fn skip(&mut self, count: usize) -> HidCommonResult<()> {
        self.take(count).map(|_| ())
    }
}

/// Little-endian report writer.
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    buffer: Vec<u8>,
}

impl ReportBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.buffer.push(value);
        self
    }

    pub fn write_u16_le(&mut self, value: u16) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_parser_u8() {
        let data = [0x01, 0x02, 0x03];
        let mut parser = ReportParser::new(&data);

        assert_eq!(parser.read_u8().expect("read byte"), 0x01);
        assert_eq!(parser.read_u8().expect("read byte"), 0x02);
        assert_eq!(parser.read_u8().expect("read byte"), 0x03);
        assert!(parser.read_u8().is_err());
    }

    #[test]
    fn test_report_parser_u16_le() {
        let data = [0x34, 0x12];
        let mut parser = ReportParser::new(&data);

        assert_eq!(parser.read_u16_le().expect("read u16"), 0x1234);
    }

    #[test]
    fn test_report_parser_u32_le() {
        let data = [0x78, 0x56, 0x34, 0x12];
        let mut parser = ReportParser::new(&data);

        assert_eq!(parser.read_u32_le().expect("read u32"), 0x12345678);
    }

    #[test]
    fn test_report_parser_array() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05];
        let mut parser = ReportParser::new(&data);

        let bytes: [u8; 3] = parser.read_array().expect("read array");
        assert_eq!(bytes, [0x01, 0x02, 0x03]);
        assert!(parser.read_array::<3>().is_err());
        assert_eq!(parser.remaining(), 2);
    }

    #[test]
    fn test_failed_read_does_not_advance() {
        let data = [0xAA, 0xBB, 0xCC];
        let mut parser = ReportParser::new(&data);
        parser.skip(2).expect("skip two");

        let err = parser.read_u16_le();
        assert!(matches!(
            err,
            Err(HidCommonError::Truncated {
                offset: 2,
                wanted: 2,
                remaining: 1
            })
        ));
        assert_eq!(parser.position(), 2);
        assert_eq!(parser.read_u8().expect("last byte"), 0xCC);
    }

    #[test]
    fn test_skip_past_end_fails() {
        let data = [0u8; 4];
        let mut parser = ReportParser::new(&data);
        assert!(parser.skip(5).is_err());
        assert_eq!(parser.position(), 0);
        assert!(parser.skip(4).is_ok());
        assert_eq!(parser.remaining(), 0);
    }

    #[test]
    fn test_report_builder() {
        let mut builder = ReportBuilder::with_capacity(16);

        builder
            .write_u8(0x01)
            .write_u16_le(0x1234)
            .write_u8(0xAA);

        let data = builder.into_inner();
        assert_eq!(data, vec![0x01, 0x34, 0x12, 0xAA]);
    }
}
