//! Integration tests for whole config entries.
//!
//! Builds `.dat`/`.idx` pairs by hand, then checks that:
//! 1. Sequential and indexed decoding agree
//! 2. Re-encoded entries decode to the same definitions
//! 3. Caller-supplied templates change what the decode loop accepts

use legacy_config::{
    ConfigError, ConfigProperty, ConfigPropertyMap, DefinitionDecoder, DefinitionKind, Identikit,
    Item, ItemDefinition, ItemProperty, Npc, Object, Part, Sequence, Varp, decode_entry,
    decode_indexed, encode_entry,
};

// ============================================================================
// Entry builder
// ============================================================================

/// Accumulates records and produces a matching `.dat` and `.idx`
#[derive(Default)]
struct EntryBuilder {
    records: Vec<Vec<u8>>,
}

impl EntryBuilder {
    fn record(mut self, record: &[u8]) -> Self {
        self.records.push(record.to_vec());
        self
    }

    fn build(&self) -> (Vec<u8>, Vec<u8>) {
        let count = (self.records.len() as u16).to_be_bytes();
        let mut dat = count.to_vec();
        let mut idx = count.to_vec();
        for record in &self.records {
            dat.extend_from_slice(record);
            idx.extend_from_slice(&(record.len() as u16).to_be_bytes());
        }
        (dat, idx)
    }
}

fn string(opcode: u8, value: &str) -> Vec<u8> {
    let mut out = vec![opcode];
    out.extend_from_slice(value.as_bytes());
    out.push(b'\n');
    out
}

fn item_entry() -> EntryBuilder {
    let mut sword = string(2, "Bronze sword");
    sword.extend_from_slice(&[1, 0x0A, 0x1B, 12, 0x00, 0x00, 0x00, 0x1A]);
    sword.extend_from_slice(&string(36, "Wield"));
    sword.push(0);

    let mut noted = vec![97, 0x04, 0xE4, 98, 0x03, 0x31];
    noted.push(0);

    let mut members = string(2, "Rune scimitar");
    members.extend_from_slice(&[16, 40, 1, 0x00, 0x3C, 0x12, 0x34, 0]);

    EntryBuilder::default()
        .record(&sword)
        .record(&noted)
        .record(&[0])
        .record(&members)
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_item_entry_sequential_matches_indexed() {
    let (dat, idx) = item_entry().build();
    let decoder = DefinitionDecoder::<Item>::new().unwrap();

    let sequential = decode_entry(&decoder, &dat).unwrap();
    let indexed = decode_indexed(&decoder, &dat, &idx).unwrap();
    assert_eq!(sequential.len(), 4);
    assert_eq!(sequential, indexed);

    assert_eq!(sequential[0].name(), "Bronze sword");
    assert_eq!(sequential[0].value(), 26);
    assert!(sequential[1].is_note());
    assert_eq!(sequential[2].name(), "null");
    assert!(sequential[3].members());
    assert_eq!(sequential[3].recolors()[0].replacement, 0x1234);
}

#[test]
fn test_item_entry_reencodes_to_equal_definitions() {
    let (dat, _) = item_entry().build();
    let decoder = DefinitionDecoder::<Item>::new().unwrap();
    let items = decode_entry(&decoder, &dat).unwrap();

    let encoded = encode_entry(&items).unwrap();
    let again = decode_indexed(&decoder, &encoded.dat, &encoded.idx).unwrap();
    assert_eq!(again, items);

    // Canonical output is stable
    assert_eq!(encode_entry(&again).unwrap(), encoded);
}

#[test]
fn test_every_kind_reencodes() {
    fn roundtrip<K: DefinitionKind>(records: &[&[u8]]) {
        let builder = records
            .iter()
            .fold(EntryBuilder::default(), |builder, record| builder.record(record));
        let (dat, idx) = builder.build();
        let decoder = DefinitionDecoder::<K>::new().unwrap();

        let decoded = decode_indexed(&decoder, &dat, &idx).unwrap();
        let encoded = encode_entry(&decoded).unwrap();
        assert_eq!(decode_entry(&decoder, &encoded.dat).unwrap(), decoded);
    }

    roundtrip::<Npc>(&[
        &[1, 1, 0x00, 0x05, 12, 2, 93, 0],
        &[106, 0xFF, 0xFF, 0x00, 0x09, 0, 0x00, 0x01, 0],
    ]);
    roundtrip::<Object>(&[&[1, 1, 0x00, 0x07, 10, 14, 2, 17, 0], &[19, 1, 0]]);
    roundtrip::<Varp>(&[&[5, 0x00, 0x01, 0], &[7, 0, 0, 0, 9, 0]]);
    roundtrip::<Identikit>(&[&[1, 12, 2, 1, 0x00, 0x08, 0], &[3, 60, 0x00, 0x02, 0]]);
    roundtrip::<Sequence>(&[
        &[1, 1, 0x00, 0x01, 0xFF, 0xFF, 0x00, 0x05, 5, 10, 0],
        &[0],
    ]);
}

#[test]
fn test_first_failure_is_reported() {
    let (dat, idx) = EntryBuilder::default()
        .record(&[5, 0x00, 0x01, 0])
        .record(&[99, 0])
        .build();
    let decoder = DefinitionDecoder::<Varp>::new().unwrap();

    assert!(matches!(
        decode_entry(&decoder, &dat),
        Err(ConfigError::UnknownOpcode { id: 1, opcode: 99, .. })
    ));
    assert!(matches!(
        decode_indexed(&decoder, &dat, &idx),
        Err(ConfigError::UnknownOpcode { id: 1, opcode: 99, .. })
    ));
}

#[test]
fn test_custom_template() {
    // A trimmed template: only name and value, value moved to opcode 20
    let template = ConfigPropertyMap::from_properties([
        (2, ConfigProperty::string(ItemProperty::Name, "null").boxed()),
        (20, ConfigProperty::int(ItemProperty::Value, 1).boxed()),
    ])
    .unwrap();
    let decoder = DefinitionDecoder::<Item>::with_template(template);

    let mut record = string(2, "Tinderbox");
    record.extend_from_slice(&[20, 0x00, 0x00, 0x00, 0x01, 0]);
    let item: ItemDefinition = decoder.decode_bytes(590, &record).unwrap();
    assert_eq!(item.name(), "Tinderbox");
    assert_eq!(item.value(), 1);
    assert!(!item.stackable());

    // Opcode 12 is no longer registered and is not an inline case either
    assert!(matches!(
        decoder.decode_bytes(590, &[12, 0, 0, 0, 1, 0]),
        Err(ConfigError::UnknownOpcode { opcode: 12, .. })
    ));
}

#[test]
fn test_decoded_definitions_do_not_touch_template() {
    let decoder = DefinitionDecoder::<Item>::new().unwrap();
    let mut record = string(2, "Knife");
    record.push(0);
    let mut item = decoder.decode_bytes(1, &record).unwrap();
    assert_eq!(item.name(), "Knife");

    item.property_mut::<String>(ItemProperty::Name)
        .unwrap()
        .set("Chisel".to_string());
    assert_eq!(item.name(), "Chisel");

    let template_name = decoder
        .template()
        .property::<String>(ItemProperty::Name)
        .unwrap();
    assert_eq!(template_name.value(), "null");
    assert!(template_name.get().is_none());
}

#[test]
fn test_part_asymmetry_survives_entry_roundtrip() {
    let (dat, _) = EntryBuilder::default().record(&[1, 13, 0]).build();
    let decoder = DefinitionDecoder::<Identikit>::new().unwrap();
    let kits = decode_entry(&decoder, &dat).unwrap();
    assert_eq!(kits[0].part(), Part::Feet);

    let encoded = encode_entry(&kits).unwrap();
    assert_eq!(&encoded.dat[2..], &[1, 6, 0]);
}
