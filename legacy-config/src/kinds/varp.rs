//! Player variable (varp) definitions
//!
//! Only the client parameter survives decoding. The other opcodes are
//! consumed and dropped, so they are not written back out.

use serde::Serialize;
use tracing::trace;

use crate::buffer::Buffer;
use crate::definition::{Definition, DefinitionKind};
use crate::error::Result;
use crate::property::{ConfigProperty, ConfigPropertyMap, Opcode, VarpProperty};

/// Varp definition kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Varp;

pub type VarpDefinition = Definition<Varp>;

/// Varps keep nothing outside the property map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VarpInline;

impl DefinitionKind for Varp {
    const ENTRY_NAME: &'static str = "varp";

    type Inline = VarpInline;

    fn template() -> Result<ConfigPropertyMap> {
        ConfigPropertyMap::from_properties([(
            5,
            ConfigProperty::unsigned_short(VarpProperty::Parameter, 0).boxed(),
        )])
    }

    fn decode_inline(
        _inline: &mut VarpInline,
        opcode: Opcode,
        buffer: &mut Buffer<'_>,
    ) -> Result<bool> {
        match opcode {
            1 | 2 => buffer.skip(1)?,
            7 | 12 => buffer.skip(4)?,
            10 => {
                buffer.read_string()?;
            }
            3 | 4 | 6 | 8 | 11 | 13 => {}
            _ => return Ok(false),
        }
        trace!(opcode, "discarded varp opcode");
        Ok(true)
    }

    fn encode_inline(_inline: &VarpInline, _buffer: &mut Vec<u8>) -> Result<()> {
        Ok(())
    }
}

impl VarpDefinition {
    /// Client parameter, if the record sets one
    pub fn parameter(&self) -> Option<u16> {
        self.present(VarpProperty::Parameter).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::DefinitionDecoder;
    use crate::error::ConfigError;

    fn decoder() -> DefinitionDecoder<Varp> {
        DefinitionDecoder::new().unwrap()
    }

    #[test]
    fn test_parameter_decodes() {
        let data = [5, 0x00, 0x2A, 0];
        let mut buffer = Buffer::new(&data);
        let varp = decoder().decode(7, &mut buffer).unwrap();

        assert_eq!(varp.id(), 7);
        assert_eq!(varp.parameter(), Some(42));
        assert_eq!(buffer.position(), 4);
    }

    #[test]
    fn test_no_parameter() {
        let data = [1, 0x63, 0];
        let mut buffer = Buffer::new(&data);
        let varp = decoder().decode(0, &mut buffer).unwrap();

        assert_eq!(varp.parameter(), None);
        assert_eq!(buffer.position(), 3);
    }

    #[test]
    fn test_discarded_opcodes_consume_payloads() {
        let mut data = vec![2, 9, 7, 1, 2, 3, 4, 3, 10];
        data.extend_from_slice(b"unused\n");
        data.extend_from_slice(&[12, 0, 0, 0, 1, 13, 5, 0x01, 0x00, 0]);

        let mut buffer = Buffer::new(&data);
        let varp = decoder().decode(1, &mut buffer).unwrap();
        assert_eq!(varp.parameter(), Some(256));
        assert!(buffer.is_empty());

        // Only the parameter is written back
        assert_eq!(varp.encode().unwrap(), [5, 0x01, 0x00, 0]);
    }

    #[test]
    fn test_empty_record() {
        let varp = decoder().decode_bytes(3, &[0]).unwrap();
        assert_eq!(varp.parameter(), None);
        assert_eq!(varp.encode().unwrap(), [0]);
    }

    #[test]
    fn test_unknown_opcode_fails() {
        let err = decoder().decode_bytes(9, &[14, 0]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownOpcode {
                kind: "varp",
                id: 9,
                opcode: 14
            }
        ));
    }

    #[test]
    fn test_truncated_record_fails() {
        assert!(matches!(
            decoder().decode_bytes(0, &[5, 0x00]),
            Err(ConfigError::BufferUnderrun { offset: 1, .. })
        ));
        // Missing terminator
        assert!(matches!(
            decoder().decode_bytes(0, &[5, 0x00, 0x01]),
            Err(ConfigError::BufferUnderrun { offset: 3, .. })
        ));
    }

    #[test]
    fn test_set_parameter_encodes() {
        let mut varp = VarpDefinition::from_template(4).unwrap();
        varp.property_mut::<u16>(VarpProperty::Parameter)
            .unwrap()
            .set(17);
        assert_eq!(varp.encode().unwrap(), [5, 0x00, 0x11, 0]);
    }
}
