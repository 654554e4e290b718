use std::fs::File;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use tes_strings::align::find_pairs;
use tes_strings::error::{Error, Result};
use tes_strings::read::StringsReader;
use tes_strings::write::encode;
use tes_strings::StringsWriter;
use tes_strings::{parse, LanguagePair, ReadOptions, StringKind};
use tracing_test::traced_test;

fn resource(name: &str) -> PathBuf {
    PathBuf::from(format!(
        "{}/resources/{}",
        env!("CARGO_MANIFEST_DIR"),
        name
    ))
}

#[traced_test]
#[test]
fn parse_strings() -> Result<()> {
    let mut file = File::open(resource("hello_world.strings"))?;
    let strings = StringsReader::new(&mut file, StringKind::Strings)?;

    assert_eq!(strings.len(), 2);
    assert_eq!(strings.by_id(1), Some("Hello"));
    assert_eq!(strings.by_id(2), Some("World"));

    Ok(())
}

#[traced_test]
#[test]
fn open_selects_kind_from_extension() -> Result<()> {
    let strings = StringsReader::open(resource("legacy_cp1252.ilstrings"))?;

    assert_eq!(strings.kind(), StringKind::ILStrings);
    assert_eq!(strings.by_id(100), Some("Café"));
    assert_eq!(strings.by_id(101), Some("Ysgramor\u{2019}s Tomb"));
    assert_eq!(strings.by_id(102), Some("padded"));
    assert_eq!(strings.dropped(), 0);

    Ok(())
}

#[traced_test]
#[test]
fn reencoding_preserves_entries() -> Result<()> {
    for name in ["hello_world.strings", "legacy_cp1252.ilstrings"] {
        let path = resource(name);
        let kind = StringKind::from_path(&path)?;
        let original = parse(&std::fs::read(&path)?, kind)?;

        let reparsed = parse(&encode(&original, kind)?, kind)?;
        assert_eq!(reparsed, original);
    }

    Ok(())
}

#[traced_test]
#[test]
fn discover_pairs() -> Result<()> {
    let pairs = find_pairs(resource("pairs"), &LanguagePair::default())?;

    let found = pairs
        .iter()
        .map(|p| (p.group.as_str(), p.kind))
        .collect::<Vec<_>>();
    assert_eq!(
        found,
        vec![
            ("corrupt", StringKind::Strings),
            ("dawnguard", StringKind::DLStrings),
            ("dawnguard", StringKind::Strings),
        ]
    );

    Ok(())
}

#[traced_test]
#[test]
fn read_pairs() -> Result<()> {
    let pairs = find_pairs(resource("pairs"), &LanguagePair::default())?;

    let corrupt = pairs[0].read(ReadOptions::default());
    assert!(matches!(corrupt, Err(Error::TruncatedDirectory { count: 5, .. })));

    let aligned = pairs[2].read(ReadOptions::default())?;
    assert_eq!(
        aligned.pairs().collect::<Vec<_>>(),
        vec![
            (1, "Dragon Priest", "Жрец драконов"),
            (2, "Vampire Lord", "Лорд-вампир"),
            (3, "Crossbow", ""),
        ]
    );

    Ok(())
}

#[traced_test]
#[test]
fn written_tables_open_from_disk() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("hearthfire_english.dlstrings");

    let mut writer = StringsWriter::new(File::create(&path)?, StringKind::DLStrings);
    writer.add(7, "Lakeview Manor")?;
    writer.add(3, "Windstad Manor")?;
    writer.finish()?;

    let strings = StringsReader::open(&path)?;
    assert_eq!(strings.kind(), StringKind::DLStrings);
    assert_eq!(strings.len(), 2);
    assert_eq!(strings.by_id(3), Some("Windstad Manor"));
    assert_eq!(strings.by_id(7), Some("Lakeview Manor"));

    Ok(())
}

#[traced_test]
#[test]
fn table_serializes_as_object() -> Result<()> {
    let strings = StringsReader::open(resource("hello_world.strings"))?;

    let json = serde_json::to_value(strings.get_entries()).map_err(std::io::Error::other)?;
    assert_eq!(json, serde_json::json!({ "1": "Hello", "2": "World" }));

    Ok(())
}
